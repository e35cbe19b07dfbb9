//! HTTP error mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;

/// Message for any request naming a note that does not exist.
pub const NOTE_NOT_FOUND: &str = "Note not found";

/// Error body returned by every failing endpoint.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    pub error: String,
    /// Underlying detail, present on server errors only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Errors a handler can return.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    /// Store failure: `summary` names the failed action, `detail` the cause.
    Store {
        summary: &'static str,
        detail: String,
    },
}

impl ApiError {
    /// Classify a core error, using `summary` if it turns out to be a store
    /// failure.
    pub fn from_core(summary: &'static str, err: pinnote_core::Error) -> Self {
        match err {
            pinnote_core::Error::Validation(msg) => ApiError::BadRequest(msg),
            err if err.is_not_found() => ApiError::NotFound(NOTE_NOT_FOUND.to_string()),
            err => ApiError::Store {
                summary,
                detail: err.to_string(),
            },
        }
    }

    /// Closure form of [`ApiError::from_core`] for `map_err`.
    pub fn op(summary: &'static str) -> impl FnOnce(pinnote_core::Error) -> Self {
        move |err| Self::from_core(summary, err)
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Store { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<pinnote_core::Error> for ApiError {
    fn from(err: pinnote_core::Error) -> Self {
        Self::from_core("Internal server error", err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            ApiError::BadRequest(msg) | ApiError::NotFound(msg) => ErrorBody {
                error: msg,
                message: None,
            },
            ApiError::Store { summary, detail } => {
                error!(
                    subsystem = "api",
                    component = "error",
                    error = %detail,
                    "{}",
                    summary
                );
                ErrorBody {
                    error: summary.to_string(),
                    message: Some(detail),
                }
            }
        };

        (status, Json(body)).into_response()
    }
}
