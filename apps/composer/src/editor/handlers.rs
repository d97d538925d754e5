use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::editor::content::{EducationFields, ExperienceFields, PersonalInfoPatch, ProjectFields};
use crate::editor::transitions as t;
use crate::editor::{EditError, Operation, SessionStatus};
use crate::errors::AppError;
use crate::models::{CustomKind, ResumeDocument, TemplateKind};
use crate::state::AppState;

/// The document after an edit, plus the id of whatever the edit created.
#[derive(Debug, Serialize)]
pub struct EditResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub document: ResumeDocument,
}

/// Runs `transition` on the live document and commits its result. A rejected transition
/// leaves the session untouched.
pub(crate) async fn commit<R>(
    state: &AppState,
    transition: impl FnOnce(&ResumeDocument) -> Result<(ResumeDocument, R), EditError>,
) -> Result<(ResumeDocument, R), AppError> {
    let mut session = state.session.write().await;
    if state.in_flight.is_running(Operation::Load) {
        warn!("Edit applied while a load is in flight; the loaded resume will replace it");
    }
    let (next, out) = transition(&session.document)?;
    session.commit(next.clone());
    Ok((next, out))
}

async fn edit(
    state: &AppState,
    transition: impl FnOnce(&ResumeDocument) -> Result<ResumeDocument, EditError>,
) -> Result<Json<EditResponse>, AppError> {
    let (document, ()) = commit(state, |doc| transition(doc).map(|next| (next, ()))).await?;
    Ok(Json(EditResponse { id: None, document }))
}

async fn create(
    state: &AppState,
    transition: impl FnOnce(&ResumeDocument) -> Result<(ResumeDocument, String), EditError>,
) -> Result<Json<EditResponse>, AppError> {
    let (document, id) = commit(state, transition).await?;
    debug!("Created {id}");
    Ok(Json(EditResponse {
        id: Some(id),
        document,
    }))
}

/// GET /api/v1/resume
pub async fn handle_get_resume(State(state): State<AppState>) -> Json<ResumeDocument> {
    Json(state.session.read().await.document.clone())
}

/// GET /api/v1/session
pub async fn handle_session_status(State(state): State<AppState>) -> Json<SessionStatus> {
    let session = state.session.read().await;
    Json(SessionStatus::new(&session, &state.in_flight))
}

// ────────────────────────────────────────────────────────────────────────────
// Section order
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/sections/:index/move-up
pub async fn handle_move_up(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Result<Json<EditResponse>, AppError> {
    edit(&state, |doc| Ok(t::move_up(doc, index))).await
}

/// POST /api/v1/sections/:index/move-down
pub async fn handle_move_down(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Result<Json<EditResponse>, AppError> {
    edit(&state, |doc| Ok(t::move_down(doc, index))).await
}

/// POST /api/v1/sections/:id/toggle
pub async fn handle_toggle(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<EditResponse>, AppError> {
    edit(&state, |doc| Ok(t::toggle(doc, &id))).await
}

// ────────────────────────────────────────────────────────────────────────────
// Custom sections
// ────────────────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateCustomSection {
    pub heading: String,
    #[serde(rename = "type")]
    pub kind: CustomKind,
}

#[derive(Deserialize)]
pub struct TextBody {
    pub text: String,
}

#[derive(Deserialize)]
pub struct ValueBody {
    pub value: String,
}

/// POST /api/v1/custom-sections
pub async fn handle_create_custom_section(
    State(state): State<AppState>,
    Json(req): Json<CreateCustomSection>,
) -> Result<Json<EditResponse>, AppError> {
    create(&state, |doc| t::create_custom_section(doc, &req.heading, req.kind)).await
}

/// DELETE /api/v1/custom-sections/:id
pub async fn handle_remove_custom_section(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<EditResponse>, AppError> {
    edit(&state, |doc| Ok(t::remove_custom_section(doc, &id))).await
}

/// PUT /api/v1/custom-sections/:id/text
pub async fn handle_set_custom_text(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<TextBody>,
) -> Result<Json<EditResponse>, AppError> {
    edit(&state, |doc| t::set_custom_text(doc, &id, &req.text)).await
}

/// POST /api/v1/custom-sections/:id/tags
pub async fn handle_add_custom_tag(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ValueBody>,
) -> Result<Json<EditResponse>, AppError> {
    edit(&state, |doc| t::add_custom_tag(doc, &id, &req.value)).await
}

/// DELETE /api/v1/custom-sections/:id/tags/:index
pub async fn handle_remove_custom_tag(
    State(state): State<AppState>,
    Path((id, index)): Path<(String, usize)>,
) -> Result<Json<EditResponse>, AppError> {
    edit(&state, |doc| t::remove_custom_tag(doc, &id, index)).await
}

/// POST /api/v1/custom-sections/:id/items
pub async fn handle_add_custom_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<EditResponse>, AppError> {
    create(&state, |doc| t::add_custom_item(doc, &id)).await
}

/// PUT /api/v1/custom-sections/:id/items/:item_id
pub async fn handle_update_custom_item(
    State(state): State<AppState>,
    Path((id, item_id)): Path<(String, String)>,
    Json(req): Json<TextBody>,
) -> Result<Json<EditResponse>, AppError> {
    edit(&state, |doc| t::update_custom_item(doc, &id, &item_id, &req.text)).await
}

/// DELETE /api/v1/custom-sections/:id/items/:item_id
pub async fn handle_remove_custom_item(
    State(state): State<AppState>,
    Path((id, item_id)): Path<(String, String)>,
) -> Result<Json<EditResponse>, AppError> {
    edit(&state, |doc| t::remove_custom_item(doc, &id, &item_id)).await
}

// ────────────────────────────────────────────────────────────────────────────
// Content
// ────────────────────────────────────────────────────────────────────────────

/// PATCH /api/v1/content/personal-info
pub async fn handle_update_personal_info(
    State(state): State<AppState>,
    Json(patch): Json<PersonalInfoPatch>,
) -> Result<Json<EditResponse>, AppError> {
    edit(&state, |doc| Ok(t::update_personal_info(doc, patch))).await
}

#[derive(Deserialize)]
pub struct SummaryBody {
    pub summary: String,
}

/// PUT /api/v1/content/summary
pub async fn handle_set_summary(
    State(state): State<AppState>,
    Json(req): Json<SummaryBody>,
) -> Result<Json<EditResponse>, AppError> {
    edit(&state, |doc| Ok(t::set_summary(doc, &req.summary))).await
}

/// POST /api/v1/content/skills
pub async fn handle_add_skill(
    State(state): State<AppState>,
    Json(req): Json<ValueBody>,
) -> Result<Json<EditResponse>, AppError> {
    edit(&state, |doc| t::add_skill(doc, &req.value)).await
}

/// DELETE /api/v1/content/skills/:index
pub async fn handle_remove_skill(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Result<Json<EditResponse>, AppError> {
    edit(&state, |doc| Ok(t::remove_skill(doc, index))).await
}

/// POST /api/v1/content/certifications
pub async fn handle_add_certification(
    State(state): State<AppState>,
    Json(req): Json<ValueBody>,
) -> Result<Json<EditResponse>, AppError> {
    edit(&state, |doc| t::add_certification(doc, &req.value)).await
}

/// DELETE /api/v1/content/certifications/:index
pub async fn handle_remove_certification(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Result<Json<EditResponse>, AppError> {
    edit(&state, |doc| Ok(t::remove_certification(doc, index))).await
}

/// POST /api/v1/content/education
pub async fn handle_add_education(
    State(state): State<AppState>,
    Json(fields): Json<EducationFields>,
) -> Result<Json<EditResponse>, AppError> {
    create(&state, |doc| Ok(t::add_education(doc, fields))).await
}

/// PUT /api/v1/content/education/:id
pub async fn handle_update_education(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(fields): Json<EducationFields>,
) -> Result<Json<EditResponse>, AppError> {
    edit(&state, |doc| t::update_education(doc, &id, fields)).await
}

/// DELETE /api/v1/content/education/:id
pub async fn handle_remove_education(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<EditResponse>, AppError> {
    edit(&state, |doc| Ok(t::remove_education(doc, &id))).await
}

/// POST /api/v1/content/experience
pub async fn handle_add_experience(
    State(state): State<AppState>,
    Json(fields): Json<ExperienceFields>,
) -> Result<Json<EditResponse>, AppError> {
    create(&state, |doc| Ok(t::add_experience(doc, fields))).await
}

/// PUT /api/v1/content/experience/:id
pub async fn handle_update_experience(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(fields): Json<ExperienceFields>,
) -> Result<Json<EditResponse>, AppError> {
    edit(&state, |doc| t::update_experience(doc, &id, fields)).await
}

/// DELETE /api/v1/content/experience/:id
pub async fn handle_remove_experience(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<EditResponse>, AppError> {
    edit(&state, |doc| Ok(t::remove_experience(doc, &id))).await
}

/// POST /api/v1/content/projects
pub async fn handle_add_project(
    State(state): State<AppState>,
    Json(fields): Json<ProjectFields>,
) -> Result<Json<EditResponse>, AppError> {
    create(&state, |doc| Ok(t::add_project(doc, fields))).await
}

/// PUT /api/v1/content/projects/:id
pub async fn handle_update_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(fields): Json<ProjectFields>,
) -> Result<Json<EditResponse>, AppError> {
    edit(&state, |doc| t::update_project(doc, &id, fields)).await
}

/// DELETE /api/v1/content/projects/:id
pub async fn handle_remove_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<EditResponse>, AppError> {
    edit(&state, |doc| Ok(t::remove_project(doc, &id))).await
}

// ────────────────────────────────────────────────────────────────────────────
// Template
// ────────────────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateBody {
    pub template: TemplateKind,
    pub accent_color: Option<String>,
}

/// PUT /api/v1/template
pub async fn handle_select_template(
    State(state): State<AppState>,
    Json(req): Json<TemplateBody>,
) -> Result<Json<EditResponse>, AppError> {
    edit(&state, |doc| {
        t::select_template(doc, req.template, req.accent_color.as_deref())
    })
    .await
}
