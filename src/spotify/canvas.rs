use reqwest::{Client, Response, header};

use crate::{
    error::Result,
    protocol,
    spotify::{Endpoints, ensure_success},
    types::{CanvasRequest, CanvasResponse},
};

const PROTOBUF_CONTENT_TYPE: &str = "application/x-protobuf";

/// Requests canvas metadata for a track URI.
///
/// Posts the protobuf-encoded request to the canvaz-cache endpoint with the
/// bearer token and decodes the protobuf response. Candidate order is kept
/// exactly as Spotify returns it.
///
/// # Arguments
///
/// * `token` - Current bearer token
/// * `track_uri` - Full URI, e.g. `spotify:track:4uLU6hMCjMI75M1A2tKUQC`
///
/// # Errors
///
/// `SpotifyError::Http`/`Status` on transport failures and
/// `SpotifyError::Decode` when the body is not a valid canvas response.
pub async fn fetch_canvases(
    client: &Client,
    endpoints: &Endpoints,
    token: &str,
    track_uri: &str,
) -> Result<CanvasResponse> {
    let body = protocol::encode_request(&CanvasRequest {
        track_uri: track_uri.to_string(),
    });

    let response = client
        .post(&endpoints.canvas_url)
        .bearer_auth(token)
        .header(header::CONTENT_TYPE, PROTOBUF_CONTENT_TYPE)
        .header(header::ACCEPT, PROTOBUF_CONTENT_TYPE)
        .body(body)
        .send()
        .await?;
    let response = ensure_success(response, "canvas")?;
    let bytes = response.bytes().await?;

    Ok(protocol::decode_response(&bytes)?)
}

/// Opens a canvas video for streaming.
///
/// The returned response has a successful status; its body has not been read.
pub async fn open_video(client: &Client, url: &str) -> Result<Response> {
    let response = client.get(url).send().await?;
    ensure_success(response, "canvas video")
}
