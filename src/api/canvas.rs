use std::sync::Arc;

use axum::{
    Extension,
    body::Body,
    extract::{Query, rejection::QueryRejection},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use reqwest::Client;

use crate::{
    api::{ApiError, TrackQuery},
    config::CanvasMode,
    error::Result,
    server::AppState,
    spotify,
    types::ResolvedArtwork,
    warning,
};

pub async fn canvas(
    query: std::result::Result<Query<TrackQuery>, QueryRejection>,
    Extension(state): Extension<Arc<AppState>>,
) -> Response {
    state.stats.record_request();
    let query = TrackQuery::or_empty(query);

    match resolve_canvas(&query, &state).await {
        Ok(response) => response,
        Err(e) => {
            state.stats.record_failure();
            e.into_response()
        }
    }
}

async fn resolve_canvas(
    query: &TrackQuery,
    state: &AppState,
) -> std::result::Result<Response, ApiError> {
    let track_id = query.track_id()?;
    let artwork = state.artwork.resolve(track_id).await.map_err(|e| {
        ApiError::from_spotify(e, "No canvas or album art", "Failed to resolve canvas")
    })?;

    match artwork {
        ResolvedArtwork::Canvas(url) if state.canvas_mode == CanvasMode::Stream => {
            match stream_video(&state.client, &url).await {
                Ok(response) => Ok(response),
                Err(e) => {
                    warning!("Canvas stream failed, redirecting instead: {}", e);
                    Ok(redirect(url))
                }
            }
        }
        ResolvedArtwork::Canvas(url) | ResolvedArtwork::AlbumArt(url) => Ok(redirect(url)),
        ResolvedArtwork::NotFound => Err(ApiError::NotFound("No canvas or album art")),
    }
}

fn redirect(url: String) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, url)]).into_response()
}

async fn stream_video(client: &Client, url: &str) -> Result<Response> {
    let upstream = spotify::canvas::open_video(client, url).await?;

    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("video/mp4")),
            (header::CACHE_CONTROL, HeaderValue::from_static("no-store")),
        ],
        Body::from_stream(upstream.bytes_stream()),
    )
        .into_response())
}
