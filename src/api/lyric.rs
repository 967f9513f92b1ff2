use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Query, rejection::QueryRejection},
    response::{IntoResponse, Response},
};

use crate::{
    api::{ApiError, TrackQuery},
    error::SpotifyError,
    server::AppState,
    types::LyricsResponse,
    warning,
};

pub async fn lyric(
    query: Result<Query<TrackQuery>, QueryRejection>,
    Extension(state): Extension<Arc<AppState>>,
) -> Response {
    state.stats.record_request();
    let query = TrackQuery::or_empty(query);

    match fetch_lyrics(&query, &state).await {
        Ok(body) => Json(body).into_response(),
        Err(e) => {
            state.stats.record_failure();
            e.into_response()
        }
    }
}

async fn fetch_lyrics(query: &TrackQuery, state: &AppState) -> Result<LyricsResponse, ApiError> {
    let track_id = query.track_id()?;

    match state.lyrics.fetch(track_id).await {
        Ok(lyrics) => Ok(LyricsResponse {
            track_id: track_id.to_string(),
            lyrics,
        }),
        Err(e) => {
            if !matches!(e, SpotifyError::NotReady | SpotifyError::NotFound) {
                warning!("Lyric error for track {}: {}", track_id, e);
            }
            Err(ApiError::from_spotify(e, "No lyrics found", "Failed to fetch lyrics"))
        }
    }
}
