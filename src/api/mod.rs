//! # API Module
//!
//! This module provides the HTTP endpoints of the service. Handlers are thin:
//! they validate the `trackId` query parameter, call into
//! [`crate::management`] and translate the outcome into a redirect, a
//! streamed body or JSON.
//!
//! ## Endpoints
//!
//! ### Artwork
//!
//! - [`canvas`] - `GET /canvas?trackId=` (also `/spotify/canvas`). Redirects to
//!   the canvas video, or to the album art when the track has no canvas. With
//!   `CANVAS_MODE=stream` the video is proxied instead of redirected.
//!
//! ### Lyrics
//!
//! - [`lyric`] - `GET /lyric?trackId=` (also `/spotify/lyric`). Answers
//!   `{trackId, lyrics: [{startTimeMs, words}]}`.
//!
//! ### Monitoring
//!
//! - [`health`] - Token readiness, secret version and request counters.
//!
//! ### Everything else
//!
//! - [`fallback`] - Redirects to `FALLBACK_REDIRECT_URL`, or answers 404.
//!
//! ## Error Responses
//!
//! Failures are JSON bodies of the form `{"error": "..."}`:
//!
//! | Status | Message |
//! |--------|---------|
//! | 400 | `Missing trackId` |
//! | 404 | `No canvas or album art` / `No lyrics found` |
//! | 500 | `Access token not ready` / `Failed to fetch lyrics` |
//!
//! Upstream transport errors are logged and never forwarded verbatim.
//!
//! ## CORS
//!
//! [`allow_any_origin`] adds `Access-Control-Allow-Origin: *` to every response.
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use axum::{Router, routing::get};
//! use canvas_lyric::api::{canvas, lyric};
//!
//! let app = Router::new()
//!     .route("/canvas", get(canvas))
//!     .route("/lyric", get(lyric));
//! ```

use axum::{
    extract::{Query, rejection::QueryRejection},
    http::{HeaderValue, header},
    response::Response,
};
use serde::Deserialize;

mod canvas;
mod error;
mod fallback;
mod health;
mod lyric;

pub use canvas::canvas;
pub use error::ApiError;
pub use fallback::fallback;
pub use health::health;
pub use lyric::lyric;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrackQuery {
    #[serde(rename = "trackId")]
    pub track_id: Option<String>,
}

impl TrackQuery {
    /// Unwraps the extracted query. A query string that fails to parse, such
    /// as a repeated `trackId`, reads as one without `trackId`.
    pub fn or_empty(query: Result<Query<TrackQuery>, QueryRejection>) -> Self {
        query.map(|Query(query)| query).unwrap_or_default()
    }

    pub fn track_id(&self) -> Result<&str, ApiError> {
        self.track_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or(ApiError::MissingTrackId)
    }
}

pub async fn allow_any_origin(mut response: Response) -> Response {
    response.headers_mut().insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    response
}
