//! Audio extraction from candidate videos via ffmpeg.
//!
//! The video is written to a temp file, ffmpeg writes a 16 kHz mono WAV to a second
//! temp file, and the WAV is read back once. Both files are deleted when their
//! handles drop, so cleanup also happens on every error path.

use tokio::process::Command;
use tracing::debug;

use crate::scoring::ExtractionError;

#[derive(Debug, Clone)]
pub struct AudioExtractor {
    ffmpeg_bin: String,
}

impl AudioExtractor {
    pub fn new(ffmpeg_bin: impl Into<String>) -> Self {
        Self {
            ffmpeg_bin: ffmpeg_bin.into(),
        }
    }

    /// Returns the audio track of `video` as WAV bytes.
    pub async fn extract_wav(&self, video: &[u8]) -> Result<Vec<u8>, ExtractionError> {
        if video.is_empty() {
            return Err(ExtractionError::Audio("media upload is empty".to_string()));
        }

        let input = tempfile::Builder::new()
            .prefix("candidate-video-")
            .tempfile()?;
        tokio::fs::write(input.path(), video).await?;

        let output = tempfile::Builder::new()
            .prefix("candidate-audio-")
            .suffix(".wav")
            .tempfile()?;

        let result = Command::new(&self.ffmpeg_bin)
            .args(["-y", "-loglevel", "error", "-i"])
            .arg(input.path())
            .args(["-vn", "-ac", "1", "-ar", "16000", "-f", "wav"])
            .arg(output.path())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| ExtractionError::Audio(format!("failed to run {}: {e}", self.ffmpeg_bin)))?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(ExtractionError::Audio(format!(
                "{} exited with {}: {}",
                self.ffmpeg_bin,
                result.status,
                stderr.trim()
            )));
        }

        let wav = tokio::fs::read(output.path()).await?;
        if wav.is_empty() {
            return Err(ExtractionError::Audio("no audio track found".to_string()));
        }

        debug!("Extracted {} bytes of WAV audio", wav.len());
        Ok(wav)
    }
}
