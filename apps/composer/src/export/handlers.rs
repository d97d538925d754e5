use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
};
use tracing::info;

use crate::editor::Operation;
use crate::errors::AppError;
use crate::export::{content_disposition, export_file_name};
use crate::render::render;
use crate::state::AppState;

/// POST /api/v1/resume/export
/// Renders the current document and returns it as a PDF attachment.
pub async fn handle_export(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let _guard = state.in_flight.begin(Operation::Export)?;
    let tree = render(&state.session.read().await.document);
    let file_name = export_file_name(tree.person_name());
    let disposition = content_disposition(tree.person_name());

    // genpdf layout and image masking are CPU-bound.
    let exporter = state.exporter.clone();
    let bytes = tokio::task::spawn_blocking(move || exporter.export(&tree))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in export: {e}")))??;

    info!("Exported {file_name} ({} bytes)", bytes.len());
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    ))
}
