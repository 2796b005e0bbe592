use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use receipt_core::{CatalogError, Error as CoreError};
use receipt_mailer::MailerError;
use serde_json::json;
use thiserror::Error;

use crate::vision::VisionError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("failed to parse template")]
    ParseFailed,

    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    /// A collaborator (email provider, vision model) failed. The message is
    /// shown to the user as-is.
    #[error("{0}")]
    ExternalService(String),

    #[error("Feature not configured: {0}")]
    NotConfigured(String),

    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Parse(_) => ApiError::ParseFailed,
            CoreError::Catalog(CatalogError::UnknownTemplate(id)) => ApiError::TemplateNotFound(id),
            CoreError::Draft(e) => ApiError::BadRequest(e.to_string()),
        }
    }
}

impl From<MailerError> for ApiError {
    fn from(err: MailerError) -> Self {
        if err.is_invalid_request() {
            return ApiError::BadRequest(err.to_string());
        }

        match err {
            MailerError::Config(msg) => ApiError::InternalError(msg),
            other => ApiError::ExternalService(other.to_string()),
        }
    }
}

impl From<VisionError> for ApiError {
    fn from(err: VisionError) -> Self {
        match err {
            VisionError::InvalidImage(_) => ApiError::BadRequest(err.to_string()),
            VisionError::Config(msg) => ApiError::InternalError(msg),
            other => ApiError::ExternalService(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::BadRequest(ref msg) => (StatusCode::BAD_REQUEST, msg.as_str()),
            ApiError::ParseFailed => (StatusCode::BAD_REQUEST, "failed to parse template"),
            ApiError::TemplateNotFound(_) => (StatusCode::NOT_FOUND, "Template not found"),
            ApiError::ExternalService(ref msg) => (StatusCode::BAD_GATEWAY, msg.as_str()),
            ApiError::NotConfigured(ref feature) => (StatusCode::NOT_IMPLEMENTED, feature.as_str()),
            ApiError::InternalError(ref msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.as_str()),
        };

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %error_message, "Request failed");
        }

        let body = Json(json!({
            "error": error_message,
            "code": status.as_u16()
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
