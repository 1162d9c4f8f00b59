mod config;
mod errors;
mod media;
mod routes;
mod scoring;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::media::audio::AudioExtractor;
use crate::media::transcriber::{DisabledTranscriber, HttpTranscriber, Transcriber};
use crate::routes::build_router;
use crate::scoring::pipeline::CandidateScorer;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting recruit-scorer v{}", env!("CARGO_PKG_VERSION"));

    // Speech backend: HTTP when configured, otherwise resume-only scoring
    let transcriber: Arc<dyn Transcriber> = match &config.speech_api_url {
        Some(url) => {
            info!("Transcription enabled (model: {})", config.speech_model);
            Arc::new(HttpTranscriber::new(
                url.clone(),
                config.speech_api_key.clone(),
                config.speech_model.clone(),
            )?)
        }
        None => {
            info!("SPEECH_API_URL not set; interview videos will be ignored");
            Arc::new(DisabledTranscriber)
        }
    };

    let scorer = CandidateScorer::new(
        AudioExtractor::new(config.ffmpeg_bin.clone()),
        transcriber,
        config.transcript_timeout,
    );

    let state = AppState { scorer };

    let app = build_router(state, config.max_upload_bytes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
