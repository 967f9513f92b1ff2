use reqwest::Client;

use crate::{
    error::Result,
    spotify::{Endpoints, ensure_success, read_json, url_with_id},
    types::TrackResponse,
};

/// Retrieves track metadata from the Web API.
///
/// Only the album images are deserialised; they feed the album art fallback
/// when a track has no canvas.
///
/// # Errors
///
/// Transport, status and decode failures are returned unchanged. The caller
/// decides whether they end the fallback chain.
///
/// # Example
///
/// ```
/// let track = fetch_track(&client, &endpoints, &token, "4uLU6hMCjMI75M1A2tKUQC").await?;
/// println!("{:?}", track.album_art());
/// ```
pub async fn fetch_track(
    client: &Client,
    endpoints: &Endpoints,
    token: &str,
    track_id: &str,
) -> Result<TrackResponse> {
    let url = url_with_id(&endpoints.tracks_url, track_id)?;
    let response = client.get(url).bearer_auth(token).send().await?;
    let response = ensure_success(response, "track")?;

    read_json(response, "track metadata").await
}
