use reqwest::{Client, StatusCode};

use crate::{
    error::{Result, SpotifyError},
    spotify::{Endpoints, ensure_success, read_json, url_with_id},
    types::ColorLyricsResponse,
};

/// Retrieves time-synced lyrics for a track.
///
/// Calls the color-lyrics endpoint with `format=json` and `market=from_token`,
/// so the market is taken from the account behind the bearer token. The
/// `App-Platform: WebPlayer` header is required by the endpoint.
///
/// # Errors
///
/// - `SpotifyError::NotFound` when Spotify answers `404` (no lyrics exist)
/// - `SpotifyError::Http`/`Status`/`Decode` for every other failure
pub async fn fetch_color_lyrics(
    client: &Client,
    endpoints: &Endpoints,
    token: &str,
    track_id: &str,
) -> Result<ColorLyricsResponse> {
    let url = url_with_id(&endpoints.lyrics_url, track_id)?;
    let response = client
        .get(url)
        .bearer_auth(token)
        .header("App-Platform", "WebPlayer")
        .query(&[("format", "json"), ("market", "from_token")])
        .send()
        .await?;

    if response.status() == StatusCode::NOT_FOUND {
        return Err(SpotifyError::NotFound);
    }
    let response = ensure_success(response, "lyrics")?;

    read_json(response, "lyrics").await
}
