use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::error;

use scribe_completion::CompletionError;
use scribe_types::api::{DetailResponse, ErrorResponse};

use crate::validate::FieldErrors;

/// Handler error. Detail for server-side failures is logged here and never
/// sent to the client.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("not found")]
    NotFound,

    #[error("validation failed: {0:?}")]
    Validation(FieldErrors),

    #[error("malformed request body: {0}")]
    MalformedBody(String),

    #[error("prompt is required")]
    MissingPrompt,

    /// The completion service failed or returned something unusable.
    #[error(transparent)]
    Upstream(#[from] CompletionError),

    /// Persisting a generated post failed.
    #[error("failed to store generated post: {0}")]
    GenerationStorage(anyhow::Error),

    #[error("storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound => detail(StatusCode::NOT_FOUND, "Not found."),
            ApiError::Validation(errors) => (StatusCode::BAD_REQUEST, Json(errors)).into_response(),
            ApiError::MalformedBody(msg) => detail(StatusCode::BAD_REQUEST, msg),
            ApiError::MissingPrompt => error_body(StatusCode::BAD_REQUEST, "Prompt is required"),
            ApiError::Upstream(e) => {
                error!(error = %e, timeout = e.is_timeout(), "Blog generation failed");
                error_body(StatusCode::INTERNAL_SERVER_ERROR, "Failed to generate blog post")
            }
            ApiError::GenerationStorage(e) => {
                error!(error = %e, "Blog generation failed while storing post");
                error_body(StatusCode::INTERNAL_SERVER_ERROR, "Failed to generate blog post")
            }
            ApiError::Storage(e) => {
                error!(error = %e, "Storage error");
                error_body(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        }
    }
}

fn detail(status: StatusCode, detail: impl Into<String>) -> Response {
    (status, Json(DetailResponse { detail: detail.into() })).into_response()
}

fn error_body(status: StatusCode, error: &str) -> Response {
    (status, Json(ErrorResponse { error: error.to_string() })).into_response()
}
