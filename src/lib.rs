//! Spotify Canvas and Lyrics Service Library
//!
//! This library resolves Spotify track IDs into canvas videos (with an album
//! art fallback) and time-synced lyrics through Spotify's web-player API. The
//! web player authorizes with a short-lived bearer token that is minted from
//! an `sp_dc` session cookie and a pair of TOTP codes, so most of the library
//! is about keeping that token fresh.
//!
//! # Modules
//!
//! - `api` - HTTP handlers for the canvas, lyric and health endpoints
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `error` - Error taxonomy shared by all pipelines
//! - `management` - Secret store, token manager, artwork resolver and lyrics fetcher
//! - `protocol` - Protobuf codec for the canvas endpoint
//! - `server` - Shared state, router and background token refresh
//! - `spotify` - Raw calls to the Spotify web-player endpoints
//! - `types` - Data structures and type definitions
//! - `utils` - Secret decoding, TOTP generation and small helpers
//!
//! # Example
//!
//! ```
//! use canvas_lyric::{config, server};
//!
//! #[tokio::main]
//! async fn main() {
//!     config::load_env().await.ok();
//!     server::start_api_server().await;
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod management;
pub mod protocol;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;

/// Prints an informational message with a blue bullet point.
///
/// Creates a formatted output line with a distinctive blue "o" indicator
/// followed by the provided message. Used for request tracing and status
/// updates throughout the application.
///
/// # Example
///
/// ```
/// info!("Requesting canvas for track {}", track_id);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// Used when a token is minted, a secret version is installed or a command
/// completes.
///
/// # Example
///
/// ```
/// success!("TOTP updated to version {}", version);
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Creates a formatted error output with a red "!" indicator and immediately
/// terminates the program with exit code 1. Only used for startup failures
/// that leave nothing to serve; request-time failures use [`warning!`].
///
/// # Example
///
/// ```
/// error!("Failed to parse server address: {}", e);
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Used for every failure that is contained by a fallback: a secret fetch
/// falling back to the baked-in secret, server time falling back to local
/// time, a canvas lookup falling back to album art, a failed token refresh.
///
/// # Example
///
/// ```
/// warning!("Failed to get server time, using local time: {}", e);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
