use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::editor::Operation;
use crate::errors::AppError;
use crate::models::ResumeDocument;
use crate::persistence::{load, save};
use crate::state::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadResponse {
    pub resume_id: String,
    pub resume_name: String,
    pub document: ResumeDocument,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SaveRequest {
    /// Defaults to the name the session already carries.
    #[serde(default)]
    pub resume_name: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveResponse {
    pub resume_id: String,
    pub resume_name: String,
    pub updated: bool,
}

/// POST /api/v1/resume/load/:id
pub async fn handle_load(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<LoadResponse>, AppError> {
    let _guard = state.in_flight.begin(Operation::Load)?;
    let loaded = load(state.persistence.as_ref(), &id).await?;

    let mut session = state.session.write().await;
    session.commit(loaded.document.clone());
    session.enter_edit_mode(loaded.resume_name.clone(), loaded.resume_id.clone());
    session.last_loaded_at = Some(Utc::now());

    Ok(Json(LoadResponse {
        resume_id: loaded.resume_id,
        resume_name: loaded.resume_name,
        document: loaded.document,
    }))
}

/// POST /api/v1/resume/save
pub async fn handle_save(
    State(state): State<AppState>,
    body: Option<Json<SaveRequest>>,
) -> Result<Json<SaveResponse>, AppError> {
    let _guard = state.in_flight.begin(Operation::Save)?;
    let req = body.map(|Json(req)| req).unwrap_or_default();

    let (document, resume_name, editing_id) = {
        let session = state.session.read().await;
        (
            session.document.clone(),
            req.resume_name.unwrap_or_else(|| session.resume_name.clone()),
            session.editing_id.clone(),
        )
    };

    let resume_id = save(
        state.persistence.as_ref(),
        &document,
        &resume_name,
        editing_id.as_deref(),
    )
    .await?;

    let resume_name = resume_name.trim().to_string();
    let mut session = state.session.write().await;
    session.enter_edit_mode(resume_name.clone(), resume_id.clone());
    session.last_saved_at = Some(Utc::now());

    Ok(Json(SaveResponse {
        resume_id,
        resume_name,
        updated: editing_id.is_some(),
    }))
}
