use axum::extract::{Multipart, State};
use axum::Json;
use serde::Deserialize;

use crate::editor::handlers::{commit, EditResponse};
use crate::editor::Operation;
use crate::errors::AppError;
use crate::integrations::analysis::analyze;
use crate::integrations::parser::{import_pdf, merge_parsed};
use crate::integrations::AnalysisReport;
use crate::routes::upload::read_file;
use crate::state::AppState;

/// POST /api/v1/resume/import (multipart field `file`)
pub async fn handle_import(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<EditResponse>, AppError> {
    let _guard = state.in_flight.begin(Operation::Import)?;
    let file = read_file(multipart, "file").await?;

    let parsed = import_pdf(
        state.parser.as_ref(),
        &file.file_name,
        &file.content_type,
        file.bytes,
    )
    .await?;

    let (document, ()) = commit(&state, |doc| Ok((merge_parsed(doc, parsed), ()))).await?;
    Ok(Json(EditResponse { id: None, document }))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    pub job_role: String,
    #[serde(default)]
    pub experience_level: String,
}

/// POST /api/v1/resume/analyze
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<AnalysisReport>, AppError> {
    let _guard = state.in_flight.begin(Operation::Analyze)?;
    let document = state.session.read().await.document.clone();
    let report = analyze(
        state.analyzer.as_ref(),
        &document,
        &req.job_role,
        &req.experience_level,
    )
    .await?;
    Ok(Json(report))
}
