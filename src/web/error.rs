use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Request-level failure. Every variant surfaces as a generic 500; details
/// only go to the log.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("template rendering failed: {0}")]
    Template(#[from] tera::Error),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!("Application error: {:?}", self);
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
