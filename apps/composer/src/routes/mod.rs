pub mod health;
pub mod upload;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, patch, post, put},
    Router,
};

use crate::editor::handlers as editor;
use crate::export::handlers as export;
use crate::integrations::handlers as integrations;
use crate::persistence::handlers as persistence;
use crate::photo::handlers as photo;
use crate::render::handlers as preview;
use crate::state::AppState;

/// Large enough for the biggest accepted upload (a 10 MiB PDF) plus multipart framing,
/// so size rejections come from the upload checks with their own messages.
const MAX_REQUEST_BYTES: usize = 12 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Document and session
        .route("/api/v1/resume", get(editor::handle_get_resume))
        .route("/api/v1/session", get(editor::handle_session_status))
        .route("/api/v1/preview", get(preview::handle_preview))
        // Section order
        .route(
            "/api/v1/sections/:section/move-up",
            post(editor::handle_move_up),
        )
        .route(
            "/api/v1/sections/:section/move-down",
            post(editor::handle_move_down),
        )
        .route("/api/v1/sections/:section/toggle", post(editor::handle_toggle))
        // Custom sections
        .route(
            "/api/v1/custom-sections",
            post(editor::handle_create_custom_section),
        )
        .route(
            "/api/v1/custom-sections/:id",
            delete(editor::handle_remove_custom_section),
        )
        .route(
            "/api/v1/custom-sections/:id/text",
            put(editor::handle_set_custom_text),
        )
        .route(
            "/api/v1/custom-sections/:id/tags",
            post(editor::handle_add_custom_tag),
        )
        .route(
            "/api/v1/custom-sections/:id/tags/:index",
            delete(editor::handle_remove_custom_tag),
        )
        .route(
            "/api/v1/custom-sections/:id/items",
            post(editor::handle_add_custom_item),
        )
        .route(
            "/api/v1/custom-sections/:id/items/:item_id",
            put(editor::handle_update_custom_item).delete(editor::handle_remove_custom_item),
        )
        // Content
        .route(
            "/api/v1/content/personal-info",
            patch(editor::handle_update_personal_info),
        )
        .route("/api/v1/content/summary", put(editor::handle_set_summary))
        .route("/api/v1/content/skills", post(editor::handle_add_skill))
        .route(
            "/api/v1/content/skills/:index",
            delete(editor::handle_remove_skill),
        )
        .route(
            "/api/v1/content/certifications",
            post(editor::handle_add_certification),
        )
        .route(
            "/api/v1/content/certifications/:index",
            delete(editor::handle_remove_certification),
        )
        .route(
            "/api/v1/content/education",
            post(editor::handle_add_education),
        )
        .route(
            "/api/v1/content/education/:id",
            put(editor::handle_update_education).delete(editor::handle_remove_education),
        )
        .route(
            "/api/v1/content/experience",
            post(editor::handle_add_experience),
        )
        .route(
            "/api/v1/content/experience/:id",
            put(editor::handle_update_experience).delete(editor::handle_remove_experience),
        )
        .route("/api/v1/content/projects", post(editor::handle_add_project))
        .route(
            "/api/v1/content/projects/:id",
            put(editor::handle_update_project).delete(editor::handle_remove_project),
        )
        // Template and photo
        .route("/api/v1/template", put(editor::handle_select_template))
        .route(
            "/api/v1/template/accents",
            get(preview::handle_accent_presets),
        )
        .route(
            "/api/v1/photo",
            post(photo::handle_upload_photo).delete(photo::handle_remove_photo),
        )
        // Boundary calls
        .route("/api/v1/resume/load/:id", post(persistence::handle_load))
        .route("/api/v1/resume/save", post(persistence::handle_save))
        .route("/api/v1/resume/export", post(export::handle_export))
        .route("/api/v1/resume/import", post(integrations::handle_import))
        .route("/api/v1/resume/analyze", post(integrations::handle_analyze))
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BYTES))
        .with_state(state)
}
