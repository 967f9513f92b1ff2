use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use tabled::Tabled;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretVersion {
    pub version: String,
    pub raw_digits: Vec<u32>,
}

/// Decoded TOTP secret material, hex encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TotpSeed {
    pub version: String,
    pub secret_hex: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
    pub value: String,
    pub minted_at: DateTime<Utc>,
    pub expires_at_ms: Option<i64>,
}

impl AccessToken {
    /// Whether the upstream expiry has passed at `now_ms`.
    ///
    /// Tokens minted without an expiry timestamp are never considered expired.
    pub fn is_expired_at(&self, now_ms: u64) -> bool {
        self.expires_at_ms
            .is_some_and(|expires| expires <= i64::try_from(now_ms).unwrap_or(i64::MAX))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanvasRequest {
    pub track_uri: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Canvas {
    pub id: String,
    pub url: String,
    pub file_id: String,
    pub canvas_type: i32,
    pub entity_uri: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CanvasResponse {
    pub canvases: Vec<Canvas>,
    pub ttl_in_seconds: i64,
}

impl CanvasResponse {
    /// First non-empty canvas URL, in upstream order.
    pub fn first_url(&self) -> Option<&str> {
        self.canvases
            .iter()
            .map(|c| c.url.as_str())
            .find(|url| !url.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedArtwork {
    Canvas(String),
    AlbumArt(String),
    NotFound,
}

impl ResolvedArtwork {
    pub fn url(&self) -> Option<&str> {
        match self {
            ResolvedArtwork::Canvas(url) | ResolvedArtwork::AlbumArt(url) => Some(url),
            ResolvedArtwork::NotFound => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LyricLine {
    pub start_time_ms: u64,
    pub words: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LyricsResponse {
    pub track_id: String,
    pub lyrics: Vec<LyricLine>,
}

#[derive(Tabled)]
pub struct LyricTableRow {
    pub start: String,
    pub words: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerTimeResponse {
    #[serde(rename = "serverTime", deserialize_with = "number_or_string")]
    pub server_time: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    #[serde(rename = "accessToken", default)]
    pub access_token: Option<String>,
    #[serde(rename = "accessTokenExpirationTimestampMs", default)]
    pub expires_at_ms: Option<i64>,
    #[serde(rename = "isAnonymous", default)]
    pub is_anonymous: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrackResponse {
    #[serde(default)]
    pub album: Option<TrackAlbum>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrackAlbum {
    #[serde(default)]
    pub images: Vec<AlbumImage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AlbumImage {
    #[serde(default)]
    pub url: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl TrackResponse {
    /// URL of the first album image, the largest one upstream.
    pub fn album_art(&self) -> Option<&str> {
        self.album
            .as_ref()?
            .images
            .first()?
            .url
            .as_deref()
            .filter(|url| !url.is_empty())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ColorLyricsResponse {
    #[serde(default)]
    pub lyrics: Option<ColorLyricsBody>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ColorLyricsBody {
    #[serde(rename = "syncType", default)]
    pub sync_type: Option<String>,
    #[serde(default)]
    pub lines: Option<Vec<ColorLyricsLine>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ColorLyricsLine {
    // absent on some unsynced lines
    #[serde(rename = "startTimeMs", default, deserialize_with = "number_or_string")]
    pub start_time_ms: u64,
    #[serde(default)]
    pub words: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(u64),
    Text(String),
}

// upstream sends millisecond and second counters both as strings and as numbers
fn number_or_string<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n),
        NumberOrString::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}
