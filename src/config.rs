//! Configuration management for the canvas and lyrics service.
//!
//! This module handles loading and accessing configuration values from environment
//! variables and `.env` files. It provides a centralized way to manage the session
//! cookie, server settings, refresh cadences and upstream endpoints.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the current working directory
//! 3. `.env` file in the local data directory
//! 4. Application defaults (where applicable)
//!
//! Unlike most accessors, a missing `SP_DC` never panics. The service starts
//! without it and reports every token request as not ready.

use std::{env, fmt, path::PathBuf, str::FromStr, time::Duration};

use crate::spotify::{DEFAULT_SECRETS_URL, Endpoints};

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_TOKEN_REFRESH_SECS: u64 = 60;
const DEFAULT_SECRET_REFRESH_SECS: u64 = 60 * 60;
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

/// Loads environment variables from `.env` files.
///
/// Creates the local data directory if it doesn't exist, loads a `.env` file
/// from the current working directory, then `canvas-lyric/.env` inside the
/// data directory. Variables that are already set in the process
/// environment are never overwritten, and both files are optional.
///
/// # Directory Structure
///
/// The function looks for the `.env` file in:
/// - Linux: `~/.local/share/canvas-lyric/.env`
/// - macOS: `~/Library/Application Support/canvas-lyric/.env`
/// - Windows: `%LOCALAPPDATA%/canvas-lyric/.env`
///
/// # Errors
///
/// Returns an error string if the data directory cannot be created or if an
/// existing `.env` file cannot be parsed.
///
/// # Example
///
/// ```
/// use canvas_lyric::config;
///
/// #[tokio::main]
/// async fn main() {
///     if let Err(e) = config::load_env().await {
///         eprintln!("Configuration error: {}", e);
///     }
/// }
/// ```
pub async fn load_env() -> Result<(), String> {
    let path = env_file_path();
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    match dotenv::dotenv() {
        Ok(_) => {}
        Err(e) if e.not_found() => {}
        Err(e) => return Err(e.to_string()),
    }

    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| e.to_string())?;
    }

    Ok(())
}

fn env_file_path() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("canvas-lyric/.env");
    path
}

/// Returns the Spotify `sp_dc` session cookie.
///
/// Retrieves the `SP_DC` environment variable. The cookie identifies the
/// calling account and is only ever sent to the server-time and token
/// endpoints.
///
/// # Returns
///
/// `None` if the variable is unset or blank. Callers treat that as a
/// configuration error that is reported once and never crashes the process.
///
/// # Security Note
///
/// The cookie is a long-lived credential and should never be logged.
pub fn sp_dc() -> Option<String> {
    env::var("SP_DC")
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Returns the listen port from `PORT`, defaulting to 3000.
pub fn port() -> u16 {
    env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(DEFAULT_PORT)
}

/// Returns the server address the HTTP service binds to.
///
/// `SERVER_ADDRESS` takes precedence over `PORT` when set.
///
/// # Example
///
/// ```
/// let addr = server_addr(); // e.g., "0.0.0.0:3000"
/// ```
pub fn server_addr() -> String {
    env::var("SERVER_ADDRESS").unwrap_or_else(|_| format!("0.0.0.0:{}", port()))
}

/// Returns the URL of the remote secret dictionary.
///
/// The document maps version labels to obfuscated digit sequences. Override
/// it with `SECRETS_URL` when the default mirror goes stale.
pub fn secrets_url() -> String {
    env::var("SECRETS_URL").unwrap_or_else(|_| DEFAULT_SECRETS_URL.to_string())
}

/// Returns the cadence of the background token refresh (`TOKEN_REFRESH_SECS`).
pub fn token_refresh_interval() -> Duration {
    env_secs("TOKEN_REFRESH_SECS", DEFAULT_TOKEN_REFRESH_SECS)
}

/// Returns the minimum time between two secret dictionary fetches
/// (`SECRET_REFRESH_SECS`).
pub fn secret_refresh_interval() -> Duration {
    env_secs("SECRET_REFRESH_SECS", DEFAULT_SECRET_REFRESH_SECS)
}

/// Returns the timeout applied to every outbound request (`HTTP_TIMEOUT_SECS`).
pub fn http_timeout() -> Duration {
    env_secs("HTTP_TIMEOUT_SECS", DEFAULT_HTTP_TIMEOUT_SECS)
}

/// Returns how canvas videos are delivered (`CANVAS_MODE`).
///
/// Unknown values fall back to [`CanvasMode::Redirect`].
pub fn canvas_mode() -> CanvasMode {
    env::var("CANVAS_MODE")
        .ok()
        .and_then(|m| m.parse().ok())
        .unwrap_or_default()
}

/// Returns the URL that unknown paths redirect to (`FALLBACK_REDIRECT_URL`).
///
/// Without it, unknown paths answer with a JSON 404.
pub fn fallback_redirect_url() -> Option<String> {
    env::var("FALLBACK_REDIRECT_URL")
        .ok()
        .filter(|v| !v.trim().is_empty())
}

/// Returns the upstream endpoint table with configured overrides applied.
pub fn endpoints() -> Endpoints {
    Endpoints {
        secrets_url: secrets_url(),
        ..Endpoints::default()
    }
}

/// Everything the service state needs, gathered in one place.
///
/// [`Settings::from_env`] reads the accessors above; tests and embedders can
/// build the struct directly to point the service at other endpoints.
#[derive(Debug, Clone)]
pub struct Settings {
    pub endpoints: Endpoints,
    pub sp_dc: Option<String>,
    pub secret_refresh_interval: Duration,
    pub canvas_mode: CanvasMode,
    pub fallback_redirect: Option<String>,
}

impl Settings {
    pub fn from_env() -> Self {
        Settings {
            endpoints: endpoints(),
            sp_dc: sp_dc(),
            secret_refresh_interval: secret_refresh_interval(),
            canvas_mode: canvas_mode(),
            fallback_redirect: fallback_redirect_url(),
        }
    }
}

fn env_secs(key: &str, default: u64) -> Duration {
    let secs = env::var(key)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .unwrap_or(default);
    Duration::from_secs(secs)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CanvasMode {
    /// Answer with a `302` pointing at the canvas video.
    #[default]
    Redirect,
    /// Proxy the canvas video body through the service.
    Stream,
}

impl FromStr for CanvasMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "redirect" => Ok(CanvasMode::Redirect),
            "stream" => Ok(CanvasMode::Stream),
            other => Err(format!("unknown canvas mode: {other}")),
        }
    }
}

impl fmt::Display for CanvasMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CanvasMode::Redirect => write!(f, "redirect"),
            CanvasMode::Stream => write!(f, "stream"),
        }
    }
}
