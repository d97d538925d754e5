use std::sync::Arc;

use tokio::sync::RwLock;

use crate::editor::{EditorSession, InFlight};
use crate::export::DocumentExporter;
use crate::integrations::{ResumeAnalyzer, ResumeParser};
use crate::persistence::PersistenceService;
use crate::photo::ImageTranscoder;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// The one live document. Handlers clone it out, run a transition, and commit.
    pub session: Arc<RwLock<EditorSession>>,
    pub in_flight: Arc<InFlight>,
    pub persistence: Arc<dyn PersistenceService>,
    pub parser: Arc<dyn ResumeParser>,
    pub analyzer: Arc<dyn ResumeAnalyzer>,
    /// CPU-bound; only called from `spawn_blocking`.
    pub transcoder: Arc<dyn ImageTranscoder>,
    /// CPU-bound; only called from `spawn_blocking`.
    pub exporter: Arc<dyn DocumentExporter>,
}
