//! # CLI Module
//!
//! This module implements the subcommands of the `canvas-lyric` binary. Apart
//! from [`serve`], every command runs the same pipeline as the HTTP service
//! once, in the foreground, and prints the outcome. They are handy for
//! checking an `SP_DC` cookie or a secret mirror without starting a server.
//!
//! ## Commands
//!
//! - [`serve`] - Runs the HTTP service with background token refresh
//! - [`token`] - Mints one access token and prints it with its expiry
//! - [`secret`] - Fetches the secret dictionary and prints the version in use
//! - [`canvas`] - Resolves a track to a canvas video or album art URL
//! - [`lyrics`] - Prints a track's synced lyrics as a table
//!
//! ## Usage Patterns
//!
//! ```bash
//! canvas-lyric serve                          # Start the HTTP service
//! canvas-lyric token                          # Check that SP_DC still works
//! canvas-lyric canvas 4uLU6hMCjMI75M1A2tKUQC  # Canvas or album art URL
//! canvas-lyric lyrics 4uLU6hMCjMI75M1A2tKUQC  # Synced lyrics table
//! ```
//!
//! ## Error Handling
//!
//! Failures that leave nothing to show end the process through the
//! [`crate::error!`] macro. Outcomes that are legitimate, like a track
//! without lyrics, are reported with [`crate::warning!`].

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::{
    config::{self, Settings},
    error,
    server::AppState,
    spotify,
};

mod canvas;
mod lyrics;
mod secret;
mod serve;
mod token;

pub use canvas::canvas;
pub use lyrics::lyrics;
pub use secret::secret;
pub use serve::serve;
pub use token::token;

fn local_state() -> AppState {
    match spotify::http_client(config::http_timeout()) {
        Ok(client) => AppState::new(client, Settings::from_env()),
        Err(e) => error!("Failed to build HTTP client: {}", e),
    }
}

/// Builds the state and mints a token, exiting if that fails.
async fn ready_state() -> AppState {
    let state = local_state();

    let pb = spinner("Requesting Spotify access token...");
    let result = state.tokens.refresh().await;
    pb.finish_and_clear();

    if let Err(e) = result {
        error!("Failed to get token: {}", e);
    }
    state
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    pb
}
