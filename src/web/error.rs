//! JSON error responses for the public API.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;
use tracing::{info, warn};
use ts_rs::TS;

use crate::recipes::RecipeError;
use crate::spoonacular::UpstreamError;

const UNAVAILABLE_MESSAGE: &str = "Recipe provider unavailable";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum ApiErrorCode {
    ValidationError,
    NotFound,
    UpstreamRejected,
    UpstreamUnavailable,
}

/// Error body: `{"error": "...", "code": "..."}`.
#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct ApiErrorBody {
    pub error: String,
    pub code: ApiErrorCode,
}

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: ApiErrorCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, code: ApiErrorCode, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, ApiErrorCode::ValidationError, message)
    }
}

impl From<RecipeError> for ApiError {
    fn from(err: RecipeError) -> Self {
        match err {
            RecipeError::Validation(message) => Self::bad_request(message),
            RecipeError::Upstream(upstream) => upstream.into(),
        }
    }
}

impl From<UpstreamError> for ApiError {
    fn from(err: UpstreamError) -> Self {
        match err {
            UpstreamError::NotFound(id) => Self::new(
                StatusCode::NOT_FOUND,
                ApiErrorCode::NotFound,
                format!("Recipe {id} not found"),
            ),
            UpstreamError::Rejected { status, message } => Self::new(
                StatusCode::from_u16(status)
                    .ok()
                    .filter(|s| s.is_client_error())
                    .unwrap_or(StatusCode::BAD_GATEWAY),
                ApiErrorCode::UpstreamRejected,
                message,
            ),
            // Transport details stay in the server logs.
            UpstreamError::Unavailable(_) | UpstreamError::ParseFailed { .. } => Self::new(
                StatusCode::BAD_GATEWAY,
                ApiErrorCode::UpstreamUnavailable,
                UNAVAILABLE_MESSAGE,
            ),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            warn!(status = self.status.as_u16(), code = ?self.code, error = %self.message, "request failed");
        } else {
            info!(status = self.status.as_u16(), code = ?self.code, error = %self.message, "request rejected");
        }

        let body = ApiErrorBody {
            error: self.message,
            code: self.code,
        };
        (self.status, Json(body)).into_response()
    }
}
