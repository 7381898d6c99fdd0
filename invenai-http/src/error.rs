use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

pub const FETCH_FAILED: &str = "Failed to fetch inventory items";
pub const SAVE_FAILED: &str = "Failed to save inventory items";
pub const DELETE_FAILED: &str = "Failed to delete item";
pub const ITEM_NOT_FOUND: &str = "Item not found";

/// Handler error, rendered as a status code and an `{error}` body.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(&'static str),

    #[error("{0}")]
    NotFound(&'static str),

    #[error("{0}")]
    Internal(&'static str),

    #[error("Assistant is not configured")]
    Unconfigured,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Unconfigured => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Error from the HTTP client side of the remote collection.
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server error: {status} - {message}")]
    Status { status: u16, message: String },

    #[error("invalid server URL: {0}")]
    InvalidUrl(String),
}
