use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::error::SpotifyError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    MissingTrackId,
    NotReady,
    NotFound(&'static str),
    Internal(&'static str),
}

impl ApiError {
    /// Maps a core error into the HTTP taxonomy with endpoint-specific messages.
    pub fn from_spotify(err: SpotifyError, not_found: &'static str, internal: &'static str) -> Self {
        match err {
            SpotifyError::NotReady | SpotifyError::MissingSessionCookie => ApiError::NotReady,
            SpotifyError::NotFound => ApiError::NotFound(not_found),
            _ => ApiError::Internal(internal),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingTrackId => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::NotReady | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            ApiError::MissingTrackId => "Missing trackId",
            ApiError::NotReady => "Access token not ready",
            ApiError::NotFound(msg) | ApiError::Internal(msg) => msg,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.message() }))).into_response()
    }
}
