use std::{fmt, sync::Arc};

use reqwest::Client;

use crate::{
    error::Result,
    info,
    management::TokenManager,
    spotify::{Endpoints, canvas::fetch_canvases, tracks::fetch_track},
    types::ResolvedArtwork,
    utils, warning,
};

/// One place a track's artwork can come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtworkSource {
    Canvas,
    AlbumArt,
}

/// Sources tried by [`ArtworkResolver::resolve`], first match wins.
pub const FALLBACK_ORDER: [ArtworkSource; 2] = [ArtworkSource::Canvas, ArtworkSource::AlbumArt];

impl fmt::Display for ArtworkSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtworkSource::Canvas => write!(f, "canvas"),
            ArtworkSource::AlbumArt => write!(f, "album art"),
        }
    }
}

/// Resolves track IDs to a canvas video or, failing that, album art.
///
/// Cheap to clone; clones share the HTTP client and the token manager.
#[derive(Clone)]
pub struct ArtworkResolver {
    client: Client,
    endpoints: Endpoints,
    tokens: Arc<TokenManager>,
}

impl ArtworkResolver {
    pub fn new(client: Client, endpoints: Endpoints, tokens: Arc<TokenManager>) -> Self {
        ArtworkResolver {
            client,
            endpoints,
            tokens,
        }
    }

    /// Resolves a track to its canvas, its album art, or nothing.
    ///
    /// Sources are tried in [`FALLBACK_ORDER`]. Each source is called once,
    /// and an empty result or an upstream failure moves on to the next one.
    ///
    /// # Arguments
    ///
    /// * `track_id` - Bare Spotify track ID, e.g. `4uLU6hMCjMI75M1A2tKUQC`
    ///
    /// # Returns
    ///
    /// [`ResolvedArtwork::NotFound`] when every source came up empty.
    ///
    /// # Errors
    ///
    /// Only `SpotifyError::NotReady`, returned before any upstream call when
    /// no usable token is held.
    ///
    /// # Example
    ///
    /// ```
    /// match resolver.resolve("4uLU6hMCjMI75M1A2tKUQC").await? {
    ///     ResolvedArtwork::Canvas(url) => println!("canvas {url}"),
    ///     ResolvedArtwork::AlbumArt(url) => println!("album art {url}"),
    ///     ResolvedArtwork::NotFound => println!("nothing"),
    /// }
    /// ```
    pub async fn resolve(&self, track_id: &str) -> Result<ResolvedArtwork> {
        let token = self.tokens.bearer().await?;

        for source in FALLBACK_ORDER {
            match self.try_source(source, &token, track_id).await {
                Ok(Some(artwork)) => {
                    info!("Resolved {} for track {}", source, track_id);
                    return Ok(artwork);
                }
                Ok(None) => info!("No {} for track {}", source, track_id),
                Err(e) => warning!("{} fetch failed for track {}: {}", source, track_id, e),
            }
        }

        Ok(ResolvedArtwork::NotFound)
    }

    async fn try_source(
        &self,
        source: ArtworkSource,
        token: &str,
        track_id: &str,
    ) -> Result<Option<ResolvedArtwork>> {
        match source {
            ArtworkSource::Canvas => {
                let uri = utils::track_uri(track_id);
                let response = fetch_canvases(&self.client, &self.endpoints, token, &uri).await?;
                Ok(response
                    .first_url()
                    .map(|url| ResolvedArtwork::Canvas(url.to_string())))
            }
            ArtworkSource::AlbumArt => {
                let track = fetch_track(&self.client, &self.endpoints, token, track_id).await?;
                Ok(track
                    .album_art()
                    .map(|url| ResolvedArtwork::AlbumArt(url.to_string())))
            }
        }
    }
}
