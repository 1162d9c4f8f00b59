//! Speech-to-text backends.
//!
//! `HttpTranscriber` talks to any OpenAI-compatible `/audio/transcriptions` endpoint
//! (hosted Whisper, whisper.cpp server, etc.). `DisabledTranscriber` is used when no
//! endpoint is configured; scoring then relies on the resume alone.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{multipart, Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::scoring::ExtractionError;

const MAX_RETRIES: u32 = 3;

/// Carried in `AppState` as `Arc<dyn Transcriber>`.
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, wav: Vec<u8>) -> Result<String, ExtractionError>;

    /// `false` lets callers skip audio extraction entirely.
    fn is_enabled(&self) -> bool {
        true
    }
}

pub struct DisabledTranscriber;

#[async_trait]
impl Transcriber for DisabledTranscriber {
    async fn transcribe(&self, _wav: Vec<u8>) -> Result<String, ExtractionError> {
        Err(ExtractionError::Transcription(
            "no speech endpoint configured".to_string(),
        ))
    }

    fn is_enabled(&self) -> bool {
        false
    }
}

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
}

#[derive(Clone)]
pub struct HttpTranscriber {
    client: Client,
    url: String,
    api_key: Option<String>,
    model: String,
}

impl HttpTranscriber {
    pub fn new(url: String, api_key: Option<String>, model: String) -> reqwest::Result<Self> {
        Ok(Self {
            client: Client::builder()
                .timeout(Duration::from_secs(120))
                .build()?,
            url,
            api_key,
            model,
        })
    }

    async fn send_once(&self, wav: Vec<u8>) -> Result<reqwest::Response, reqwest::Error> {
        let file = multipart::Part::bytes(wav)
            .file_name("audio.wav")
            .mime_str("audio/wav")?;
        let form = multipart::Form::new()
            .part("file", file)
            .text("model", self.model.clone())
            .text("response_format", "json");

        let mut request = self.client.post(&self.url).multipart(form);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }
        request.send().await
    }
}

#[async_trait]
impl Transcriber for HttpTranscriber {
    /// Retries on 429 and 5xx with exponential backoff; other failures return immediately.
    async fn transcribe(&self, wav: Vec<u8>) -> Result<String, ExtractionError> {
        let mut last_error = String::new();

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s
                let delay = Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "Transcription attempt {} failed ({last_error}), retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = match self.send_once(wav.clone()).await {
                Ok(r) => r,
                Err(e) if e.is_timeout() || e.is_connect() => {
                    last_error = e.to_string();
                    continue;
                }
                Err(e) => return Err(ExtractionError::Transcription(e.to_string())),
            };

            let status = response.status();
            if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
                last_error = format!("status {status}");
                continue;
            }
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(ExtractionError::Transcription(format!(
                    "status {status}: {body}"
                )));
            }

            let parsed: TranscriptionResponse = response
                .json()
                .await
                .map_err(|e| ExtractionError::Transcription(format!("bad response body: {e}")))?;

            if parsed.text.trim().is_empty() {
                return Err(ExtractionError::NoText);
            }
            debug!("Transcribed {} chars of speech", parsed.text.len());
            return Ok(parsed.text);
        }

        Err(ExtractionError::Transcription(format!(
            "gave up after {MAX_RETRIES} attempts: {last_error}"
        )))
    }
}
