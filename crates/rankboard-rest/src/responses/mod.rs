//! API response types.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use rankboard_core::RankboardError;
use tracing::error;

/// Body sent for every failed request. The cause is logged, never returned.
pub const INTERNAL_ERROR_BODY: &str = "Internal server error";

/// Application error type for Axum.
#[derive(Debug)]
pub struct AppError(pub RankboardError);

impl From<RankboardError> for AppError {
    fn from(err: RankboardError) -> Self {
        Self(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        error!(error = %self.0, code = self.0.error_code(), "Request failed");

        (
            status,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            INTERNAL_ERROR_BODY,
        )
            .into_response()
    }
}

/// Result type for Axum handlers.
pub type ApiResult<T> = Result<T, AppError>;
