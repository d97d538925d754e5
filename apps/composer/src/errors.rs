use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::backend_client::ServiceError;
use crate::editor::EditError;
use crate::export::ExportError;
use crate::integrations::IntegrationError;
use crate::persistence::PersistError;
use crate::photo::PhotoError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("A {0} is already in progress")]
    Busy(String),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::PayloadTooLarge(msg) => {
                (StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE", msg.clone())
            }
            AppError::Busy(op) => (
                StatusCode::CONFLICT,
                "BUSY",
                format!("A {op} is already in progress"),
            ),
            AppError::Upstream(msg) => {
                tracing::error!("Upstream error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "UPSTREAM_ERROR",
                    "The resume service is unavailable. Please try again.".to_string(),
                )
            }
            AppError::Export(msg) => {
                tracing::error!("Export error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "EXPORT_ERROR",
                    "Failed to generate PDF. Please try again.".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

impl From<EditError> for AppError {
    fn from(e: EditError) -> Self {
        if e.is_not_found() {
            AppError::NotFound(e.to_string())
        } else {
            AppError::Validation(e.to_string())
        }
    }
}

impl From<PhotoError> for AppError {
    fn from(e: PhotoError) -> Self {
        match e {
            e if e.is_resource_limit() => AppError::PayloadTooLarge(e.to_string()),
            PhotoError::Encode(msg) => AppError::Internal(anyhow::anyhow!("photo encode: {msg}")),
            e => AppError::Validation(e.to_string()),
        }
    }
}

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        if e.is_not_found() {
            AppError::NotFound("Resume not found".to_string())
        } else {
            AppError::Upstream(e.to_string())
        }
    }
}

impl From<PersistError> for AppError {
    fn from(e: PersistError) -> Self {
        match e {
            PersistError::BlankName => AppError::Validation(e.to_string()),
            PersistError::PayloadTooLarge { .. } => AppError::PayloadTooLarge(e.to_string()),
            PersistError::InvalidRecord(msg) => AppError::Upstream(msg),
            PersistError::Encode(e) => AppError::Internal(e.into()),
            PersistError::Service(e) => e.into(),
        }
    }
}

impl From<IntegrationError> for AppError {
    fn from(e: IntegrationError) -> Self {
        match e {
            IntegrationError::TooLarge { .. } => AppError::PayloadTooLarge(e.to_string()),
            IntegrationError::Service(e) => e.into(),
            e => AppError::Validation(e.to_string()),
        }
    }
}

impl From<ExportError> for AppError {
    fn from(e: ExportError) -> Self {
        AppError::Export(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_per_error_family() {
        let cases: Vec<(AppError, StatusCode)> = vec![
            (EditError::BlankTag.into(), StatusCode::BAD_REQUEST),
            (
                EditError::UnknownCustomSection("x".into()).into(),
                StatusCode::NOT_FOUND,
            ),
            (
                PhotoError::TooLarge { size: 2, limit: 1 }.into(),
                StatusCode::PAYLOAD_TOO_LARGE,
            ),
            (PersistError::BlankName.into(), StatusCode::BAD_REQUEST),
            (
                PersistError::Service(ServiceError::Unavailable { attempts: 3 }).into(),
                StatusCode::BAD_GATEWAY,
            ),
            (AppError::Busy("save".into()), StatusCode::CONFLICT),
            (
                ExportError::Photo("bad".into()).into(),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[test]
    fn test_backend_404_maps_to_not_found() {
        let err: AppError = ServiceError::Api {
            status: 404,
            message: "missing".into(),
        }
        .into();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
