mod backend_client;
mod config;
mod editor;
mod errors;
mod export;
mod integrations;
mod models;
mod persistence;
mod photo;
mod render;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::backend_client::ServiceClient;
use crate::config::Config;
use crate::editor::{EditorSession, InFlight};
use crate::export::GenPdfExporter;
use crate::integrations::{HttpResumeAnalyzer, HttpResumeParser};
use crate::persistence::HttpPersistenceService;
use crate::photo::transcoder::JpegTranscoder;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume Composer v{}", env!("CARGO_PKG_VERSION"));

    // One client for the persistence, parsing and analysis services
    let backend = ServiceClient::new(
        &config.backend_url,
        Duration::from_secs(config.http_timeout_secs),
    )?;
    info!("Backend client initialized ({})", config.backend_url);

    let exporter = GenPdfExporter::new(&config.font_dir, &config.font_family);
    info!(
        "PDF exporter using font family {} from {}",
        config.font_family, config.font_dir
    );

    // Build app state
    let state = AppState {
        session: Arc::new(RwLock::new(EditorSession::default())),
        in_flight: Arc::new(InFlight::default()),
        persistence: Arc::new(HttpPersistenceService::new(backend.clone())),
        parser: Arc::new(HttpResumeParser::new(backend.clone())),
        analyzer: Arc::new(HttpResumeAnalyzer::new(backend)),
        transcoder: Arc::new(JpegTranscoder),
        exporter: Arc::new(exporter),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the editor UI has a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
