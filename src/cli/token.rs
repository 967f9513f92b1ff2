use chrono::{DateTime, Utc};

use crate::{
    cli::{local_state, spinner},
    error, info, success,
};

pub async fn token() {
    let state = local_state();

    let pb = spinner("Requesting Spotify access token...");
    let result = state.tokens.refresh().await;
    pb.finish_and_clear();

    let token = match result {
        Ok(token) => token,
        Err(e) => error!("Failed to get token: {}", e),
    };

    success!("Spotify access token obtained");
    if let Some(version) = state.tokens.secrets().version().await {
        info!("TOTP secret version: {}", version);
    }
    match token.expires_at_ms.and_then(DateTime::<Utc>::from_timestamp_millis) {
        Some(expires) => info!("Expires at {}", expires.to_rfc3339()),
        None => info!("Expiry not reported"),
    }
    println!("{}", token.value);
}
