use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use crate::models::TemplateKind;
use crate::render::color::PRESET_ACCENTS;
use crate::render::{render, render_as, RenderTree};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct PreviewQuery {
    /// Renders with this template without changing the selection.
    pub template: Option<TemplateKind>,
}

/// GET /api/v1/preview
pub async fn handle_preview(
    State(state): State<AppState>,
    Query(params): Query<PreviewQuery>,
) -> Json<RenderTree> {
    let session = state.session.read().await;
    let tree = match params.template {
        Some(template) => render_as(&session.document, template),
        None => render(&session.document),
    };
    Json(tree)
}

/// GET /api/v1/template/accents
pub async fn handle_accent_presets() -> Json<&'static [&'static str]> {
    Json(PRESET_ACCENTS)
}
