//! Axum route handlers for the Scoring API.

use axum::{
    extract::{Multipart, State},
    Json,
};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::scoring::aggregate::{GraphData, ScoreOutcome, ScoreReport};
use crate::scoring::analytics::{
    application_sentiment, sentiment_distribution, SentimentDistribution,
};
use crate::scoring::normalize::{collapse_whitespace, extract_document_text, resolve_display_name};
use crate::scoring::pipeline::ApplicationMaterials;
use crate::scoring::skills::SkillSpec;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ScoreResponse {
    #[serde(flatten)]
    pub outcome: ScoreOutcome,
    pub display_name: String,
    pub scored_at: DateTime<Utc>,
    pub report: ScoreReport,
}

#[derive(Debug, Serialize)]
pub struct ExtractJdResponse {
    pub extracted_text: String,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct SentimentDistributionRequest {
    pub graphs: Vec<Option<GraphData>>,
}

#[derive(Debug, Serialize)]
pub struct ApplicationSentimentsResponse {
    pub labels: Vec<String>,
}

/// Multipart fields of a score request, before validation.
#[derive(Default)]
struct ScoreForm {
    resume: Option<Bytes>,
    video: Option<Bytes>,
    skills: Option<String>,
    full_name: Option<String>,
}

impl ScoreForm {
    async fn read(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = ScoreForm::default();
        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "resume" => form.resume = Some(field.bytes().await?),
                "video" => form.video = Some(field.bytes().await?).filter(|b| !b.is_empty()),
                "skills" => form.skills = Some(field.text().await?),
                "full_name" => form.full_name = Some(field.text().await?),
                _ => {}
            }
        }
        Ok(form)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/score
///
/// Scores a resume (and optional interview video) against a job's required skills.
/// Only malformed requests fail; scoring problems come back as a zero-score report.
pub async fn handle_score(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ScoreResponse>, AppError> {
    let form = ScoreForm::read(multipart).await?;

    let resume = form
        .resume
        .ok_or_else(|| AppError::Validation("resume is required".to_string()))?;
    let skills = form
        .skills
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| AppError::Validation("skills is required".to_string()))?;

    let report = state
        .scorer
        .score(ApplicationMaterials {
            resume,
            video: form.video,
            skills: SkillSpec::parse_raw(&skills),
        })
        .await;

    let display_name = resolve_display_name(form.full_name.as_deref(), &report.candidate_name);

    Ok(Json(ScoreResponse {
        outcome: report.outcome(),
        display_name,
        scored_at: Utc::now(),
        report,
    }))
}

/// POST /api/v1/jd/extract
///
/// Returns the text of an uploaded job description, whitespace-collapsed, casing kept.
pub async fn handle_extract_jd(mut multipart: Multipart) -> Result<Json<ExtractJdResponse>, AppError> {
    let mut file: Option<Bytes> = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some("file") {
            file = Some(field.bytes().await?);
        }
    }

    let file = file
        .filter(|f| !f.is_empty())
        .ok_or_else(|| AppError::Validation("No file uploaded".to_string()))?;

    let text = tokio::task::spawn_blocking(move || extract_document_text(&file))
        .await
        .map_err(|e| AppError::Internal(e.into()))?
        .map_err(|e| AppError::UnprocessableEntity(format!("Could not read document: {e}")))?;

    Ok(Json(ExtractJdResponse {
        extracted_text: collapse_whitespace(&text),
        message: "Parsed successfully".to_string(),
    }))
}

/// POST /api/v1/analytics/sentiment
///
/// Buckets stored graph data into Positive / Neutral / Negative counts.
pub async fn handle_sentiment_distribution(
    Json(request): Json<SentimentDistributionRequest>,
) -> Json<SentimentDistribution> {
    Json(sentiment_distribution(
        request.graphs.iter().map(Option::as_ref),
    ))
}

/// POST /api/v1/analytics/sentiment/labels
///
/// One short tone label per application, in request order.
pub async fn handle_application_sentiments(
    Json(request): Json<SentimentDistributionRequest>,
) -> Json<ApplicationSentimentsResponse> {
    Json(ApplicationSentimentsResponse {
        labels: request
            .graphs
            .iter()
            .map(|g| application_sentiment(g.as_ref()))
            .collect(),
    })
}
