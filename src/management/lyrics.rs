use std::sync::Arc;

use reqwest::Client;

use crate::{
    error::{Result, SpotifyError},
    management::TokenManager,
    spotify::{Endpoints, lyrics::fetch_color_lyrics},
    types::LyricLine,
};

/// Fetches time-synced lyrics with the current bearer token.
#[derive(Clone)]
pub struct LyricsFetcher {
    client: Client,
    endpoints: Endpoints,
    tokens: Arc<TokenManager>,
}

impl LyricsFetcher {
    pub fn new(client: Client, endpoints: Endpoints, tokens: Arc<TokenManager>) -> Self {
        LyricsFetcher {
            client,
            endpoints,
            tokens,
        }
    }

    /// Retrieves the lyric lines of a track.
    ///
    /// # Returns
    ///
    /// Lines in upstream order with `startTimeMs` normalized to an integer.
    /// Order is never changed, even when start times are not ascending.
    ///
    /// # Errors
    ///
    /// - `SpotifyError::NotReady` when no usable token is held (no upstream call is made)
    /// - `SpotifyError::NotFound` when upstream answers 404 or `lyrics.lines` is missing or empty
    /// - `SpotifyError::Http`/`Status`/`Decode` for any other upstream failure
    pub async fn fetch(&self, track_id: &str) -> Result<Vec<LyricLine>> {
        let token = self.tokens.bearer().await?;
        let response = fetch_color_lyrics(&self.client, &self.endpoints, &token, track_id).await?;

        let lines = response
            .lyrics
            .and_then(|body| body.lines)
            .unwrap_or_default();
        if lines.is_empty() {
            return Err(SpotifyError::NotFound);
        }

        Ok(lines
            .into_iter()
            .map(|line| LyricLine {
                start_time_ms: line.start_time_ms,
                words: line.words,
            })
            .collect())
    }
}
