use axum::extract::{Multipart, State};
use axum::Json;

use crate::editor::handlers::{commit, EditResponse};
use crate::editor::transitions::{remove_photo, set_photo};
use crate::editor::Operation;
use crate::errors::AppError;
use crate::photo::{process_upload, PhotoUpload};
use crate::routes::upload::read_file;
use crate::state::AppState;

/// POST /api/v1/photo (multipart field `photo`)
pub async fn handle_upload_photo(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<EditResponse>, AppError> {
    let _guard = state.in_flight.begin(Operation::PhotoUpload)?;
    let file = read_file(multipart, "photo").await?;
    let upload = PhotoUpload {
        content_type: file.content_type,
        bytes: file.bytes,
    };

    // Decode and re-encode are CPU-bound; keep them off the async executor.
    let transcoder = state.transcoder.clone();
    let data_url = tokio::task::spawn_blocking(move || process_upload(transcoder.as_ref(), &upload))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in photo upload: {e}")))??;

    let (document, ()) = commit(&state, |doc| Ok((set_photo(doc, data_url), ()))).await?;
    Ok(Json(EditResponse { id: None, document }))
}

/// DELETE /api/v1/photo
pub async fn handle_remove_photo(
    State(state): State<AppState>,
) -> Result<Json<EditResponse>, AppError> {
    let (document, ()) = commit(&state, |doc| Ok((remove_photo(doc), ()))).await?;
    Ok(Json(EditResponse { id: None, document }))
}
