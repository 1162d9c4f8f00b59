//! Scoring pipeline — gathers resume and transcript text, then aggregates.
//!
//! This is the boundary the application layer calls once per submission. It
//! never returns an error: extraction failures become empty text, a missing
//! transcript becomes "no audio", and aggregation failures become the degraded
//! zero-score report.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::media::audio::AudioExtractor;
use crate::media::transcriber::Transcriber;
use crate::scoring::aggregate::{aggregate, ScoreReport};
use crate::scoring::normalize::{
    normalize_document, normalize_transcript_text, NormalizedDocument, NEW_CANDIDATE,
};
use crate::scoring::skills::SkillSpec;
use crate::scoring::ExtractionError;

/// Everything submitted with one application that the scorer reads.
#[derive(Debug, Clone)]
pub struct ApplicationMaterials {
    pub resume: Bytes,
    pub video: Option<Bytes>,
    pub skills: SkillSpec,
}

#[derive(Clone)]
pub struct CandidateScorer {
    audio: AudioExtractor,
    transcriber: Arc<dyn Transcriber>,
    transcript_timeout: Duration,
}

impl CandidateScorer {
    pub fn new(
        audio: AudioExtractor,
        transcriber: Arc<dyn Transcriber>,
        transcript_timeout: Duration,
    ) -> Self {
        Self {
            audio,
            transcriber,
            transcript_timeout,
        }
    }

    /// Scores one application. Resume parsing and transcription run concurrently.
    pub async fn score(&self, materials: ApplicationMaterials) -> ScoreReport {
        let request_id = Uuid::new_v4();
        let required = materials.skills.requirements();
        info!(
            %request_id,
            skills = required.len(),
            has_video = materials.video.is_some(),
            "Scoring application"
        );

        let resume = materials.resume;
        let resume_task = tokio::task::spawn_blocking(move || normalize_document(&resume));
        let transcript = self.transcript_text(materials.video.as_deref()).await;

        let document = resume_task.await.unwrap_or_else(|e| {
            error!(%request_id, "Resume extraction task failed: {e}");
            NormalizedDocument {
                text: String::new(),
                candidate_name: NEW_CANDIDATE.to_string(),
            }
        });

        let candidate_text = format!("{} {}", document.text, transcript)
            .trim()
            .to_string();

        let report = tokio::task::spawn_blocking(move || {
            aggregate(
                &required,
                &candidate_text,
                &transcript,
                &document.candidate_name,
            )
        })
        .await
        .unwrap_or_else(|e| {
            error!(%request_id, "Aggregation task failed: {e}");
            ScoreReport::failed()
        });

        info!(
            %request_id,
            final_score = report.final_score,
            "Application scored"
        );
        report
    }

    /// Normalized transcript of `video`, or empty when there is no video or any
    /// step fails or exceeds the transcript timeout.
    pub async fn transcript_text(&self, video: Option<&[u8]>) -> String {
        let Some(video) = video else {
            return String::new();
        };
        if !self.transcriber.is_enabled() {
            debug!("Transcription disabled; ignoring video");
            return String::new();
        }

        let timeout = self.transcript_timeout;
        let outcome = tokio::time::timeout(timeout, self.transcribe_video(video))
            .await
            .unwrap_or(Err(ExtractionError::Timeout(timeout.as_secs())));

        match outcome {
            Ok(raw) => normalize_transcript_text(&raw),
            Err(e) => {
                warn!("Video transcription failed, continuing without it: {e}");
                String::new()
            }
        }
    }

    async fn transcribe_video(&self, video: &[u8]) -> Result<String, ExtractionError> {
        let wav = self.audio.extract_wav(video).await?;
        self.transcriber.transcribe(wav).await
    }
}
