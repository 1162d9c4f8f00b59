use std::time::Duration;

use anyhow::{Context, Result};

/// Service configuration loaded from environment variables.
/// Everything has a default; transcription stays disabled until `SPEECH_API_URL` is set.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub max_upload_bytes: usize,
    pub ffmpeg_bin: String,
    pub speech_api_url: Option<String>,
    pub speech_api_key: Option<String>,
    pub speech_model: String,
    pub transcript_timeout: Duration,
}

const BYTES_PER_MB: usize = 1024 * 1024;

impl Config {
    /// Environment overrides on top of [`Config::default`].
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = Config::default();
        let max_upload_mb: usize =
            parse_env("MAX_UPLOAD_MB", defaults.max_upload_bytes / BYTES_PER_MB)?;
        let transcript_timeout_secs: u64 =
            parse_env("TRANSCRIPT_TIMEOUT_SECS", defaults.transcript_timeout.as_secs())?;

        Ok(Config {
            port: parse_env("PORT", defaults.port)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or(defaults.rust_log),
            max_upload_bytes: max_upload_mb * BYTES_PER_MB,
            ffmpeg_bin: std::env::var("FFMPEG_BIN").unwrap_or(defaults.ffmpeg_bin),
            speech_api_url: optional_env("SPEECH_API_URL"),
            speech_api_key: optional_env("SPEECH_API_KEY"),
            speech_model: std::env::var("SPEECH_MODEL").unwrap_or(defaults.speech_model),
            transcript_timeout: Duration::from_secs(transcript_timeout_secs),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            rust_log: "info".to_string(),
            max_upload_bytes: 16 * BYTES_PER_MB,
            ffmpeg_bin: "ffmpeg".to_string(),
            speech_api_url: None,
            speech_api_key: None,
            speech_model: "whisper-1".to_string(),
            transcript_timeout: Duration::from_secs(120),
        }
    }
}

/// Reads `key` and parses it, falling back to `default` when unset.
fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        Err(_) => Ok(default),
    }
}

/// Unset and blank values are both treated as absent.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_env_falls_back_to_default() {
        let port: u16 = parse_env("RECRUIT_SCORER_TEST_UNSET_PORT", 9090).unwrap();
        assert_eq!(port, 9090);
    }

    #[test]
    fn test_parse_env_rejects_garbage() {
        std::env::set_var("RECRUIT_SCORER_TEST_BAD_PORT", "not-a-port");
        let result: Result<u16> = parse_env("RECRUIT_SCORER_TEST_BAD_PORT", 8080);
        assert!(result.is_err());
        let msg = format!("{:#}", result.unwrap_err());
        assert!(msg.contains("RECRUIT_SCORER_TEST_BAD_PORT"), "got: {msg}");
    }

    #[test]
    fn test_optional_env_treats_blank_as_unset() {
        std::env::set_var("RECRUIT_SCORER_TEST_BLANK", "   ");
        assert!(optional_env("RECRUIT_SCORER_TEST_BLANK").is_none());
    }

    #[test]
    fn test_default_config_disables_transcription() {
        let config = Config::default();
        assert!(config.speech_api_url.is_none());
        assert_eq!(config.max_upload_bytes, 16 * 1024 * 1024);
        assert_eq!(config.transcript_timeout, Duration::from_secs(120));
        assert_eq!(config.speech_model, "whisper-1");
    }

    #[test]
    fn test_from_env_overrides_defaults() {
        std::env::set_var("TRANSCRIPT_TIMEOUT_SECS", "30");
        std::env::set_var("MAX_UPLOAD_MB", "2");
        let config = Config::from_env().unwrap();
        assert_eq!(config.transcript_timeout, Duration::from_secs(30));
        assert_eq!(config.max_upload_bytes, 2 * 1024 * 1024);
    }
}
