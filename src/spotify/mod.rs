//! # Spotify Integration Module
//!
//! This module is the only place that talks to Spotify. Each submodule wraps
//! one family of unofficial web-player endpoints and returns typed results;
//! none of them keep state. Freshness, fallbacks and token lifecycle live in
//! [`crate::management`].
//!
//! ## Architecture
//!
//! ```text
//! HTTP Layer (api, cli)
//!          ↓
//! Management Layer (SecretStore, TokenManager, ArtworkResolver, LyricsFetcher)
//!          ↓
//! Spotify Integration Layer
//!     ├── Secrets (versioned TOTP secret dictionary)
//!     ├── Authentication (server time, TOTP token exchange)
//!     ├── Canvas (protobuf canvaz-cache endpoint)
//!     ├── Tracks (album art metadata)
//!     └── Lyrics (color-lyrics endpoint)
//!          ↓
//! HTTP Layer (reqwest)
//! ```
//!
//! ## Core Modules
//!
//! - [`secrets`] - Fetches the remote secret dictionary and selects the newest version
//! - [`auth`] - Reads upstream server time and exchanges TOTP codes for a bearer token
//! - [`canvas`] - Posts the binary canvas request and decodes the binary response
//! - [`tracks`] - Reads track metadata for the album art fallback
//! - [`lyrics`] - Reads time-synced lyric lines
//!
//! ## Authentication Strategy
//!
//! The web player does not use OAuth. A long-lived `sp_dc` session cookie is
//! exchanged for a short-lived bearer token, and the exchange must carry two
//! TOTP codes: one for local time and one for Spotify's server time. The TOTP
//! secret rotates and is published as an obfuscated, versioned dictionary.
//!
//! ## Error Handling
//!
//! Every function returns [`crate::error::Result`]. Transport failures become
//! `SpotifyError::Http`, non-2xx answers `SpotifyError::Status` and malformed
//! bodies `SpotifyError::Decode`. Nothing here retries; each call is attempted
//! exactly once.
//!
//! ## Dependencies
//!
//! - **reqwest** - HTTP client with timeouts and streaming bodies
//! - **serde_json** - JSON decoding of the web-player responses

use std::time::Duration;

use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;

use crate::error::{Result, SpotifyError};

pub mod auth;
pub mod canvas;
pub mod lyrics;
pub mod secrets;
pub mod tracks;

pub const DEFAULT_SECRETS_URL: &str =
    "https://raw.githubusercontent.com/xyloflake/spot-secrets-go/refs/heads/main/secrets/secretDict.json";
pub const SERVER_TIME_URL: &str = "https://open.spotify.com/api/server-time";
pub const TOKEN_URL: &str = "https://open.spotify.com/api/token";
pub const CANVAS_URL: &str = "https://gue1-spclient.spotify.com/canvaz-cache/v0/canvases";
pub const TRACKS_URL: &str = "https://api.spotify.com/v1/tracks";
pub const LYRICS_URL: &str = "https://spclient.wg.spotify.com/color-lyrics/v2/track";

pub const WEB_PLAYER_ORIGIN: &str = "https://open.spotify.com";
pub const USER_AGENT: &str = "Mozilla/5.0";

/// Upstream URLs used by the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub secrets_url: String,
    pub server_time_url: String,
    pub token_url: String,
    pub canvas_url: String,
    pub tracks_url: String,
    pub lyrics_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            secrets_url: DEFAULT_SECRETS_URL.to_string(),
            server_time_url: SERVER_TIME_URL.to_string(),
            token_url: TOKEN_URL.to_string(),
            canvas_url: CANVAS_URL.to_string(),
            tracks_url: TRACKS_URL.to_string(),
            lyrics_url: LYRICS_URL.to_string(),
        }
    }
}

impl Endpoints {
    /// Points every endpoint at one host, keeping Spotify's path layout.
    ///
    /// Useful behind a forwarding proxy or against a local stand-in.
    ///
    /// # Example
    ///
    /// ```
    /// let endpoints = Endpoints::with_base("http://127.0.0.1:8080");
    /// assert_eq!(endpoints.token_url, "http://127.0.0.1:8080/api/token");
    /// ```
    pub fn with_base(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            secrets_url: format!("{base}/secrets/secretDict.json"),
            server_time_url: format!("{base}/api/server-time"),
            token_url: format!("{base}/api/token"),
            canvas_url: format!("{base}/canvaz-cache/v0/canvases"),
            tracks_url: format!("{base}/v1/tracks"),
            lyrics_url: format!("{base}/color-lyrics/v2/track"),
        }
    }
}

/// Builds the shared HTTP client used for every upstream call.
///
/// # Arguments
///
/// * `timeout` - Applied to each request as a whole; a timeout surfaces as an
///   ordinary `SpotifyError::Http`
///
/// # Errors
///
/// Fails only if the TLS backend cannot be initialised.
pub fn http_client(timeout: Duration) -> Result<Client> {
    Ok(Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()?)
}

/// Appends `id` to `base` as a single percent-encoded path segment.
pub fn url_with_id(base: &str, id: &str) -> Result<Url> {
    let mut url = Url::parse(base).map_err(|_| SpotifyError::InvalidEndpoint(base.to_string()))?;
    url.path_segments_mut()
        .map_err(|_| SpotifyError::InvalidEndpoint(base.to_string()))?
        .pop_if_empty()
        .push(id);
    Ok(url)
}

pub(crate) fn ensure_success(response: Response, endpoint: &'static str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(SpotifyError::Status { endpoint, status })
    }
}

pub(crate) async fn read_json<T: DeserializeOwned>(
    response: Response,
    what: &'static str,
) -> Result<T> {
    let body = response.bytes().await?;
    serde_json::from_slice(&body).map_err(|e| SpotifyError::decode(what, e))
}
