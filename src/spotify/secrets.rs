use std::collections::HashMap;

use reqwest::Client;
use serde_json::Value;

use crate::{
    error::{Result, SpotifyError},
    spotify::{ensure_success, read_json},
    types::SecretVersion,
};

/// Fetches the remote secret dictionary and returns its newest version.
///
/// The dictionary is a JSON object mapping version labels to obfuscated digit
/// sequences, for example `{"18": [..], "19": [..]}`. Only the newest entry is
/// returned; older versions are never merged or kept.
///
/// # Arguments
///
/// * `client` - Shared HTTP client (its timeout bounds this call)
/// * `url` - Location of the secret dictionary
///
/// # Errors
///
/// - `SpotifyError::Http` / `SpotifyError::Status` for transport failures
/// - `SpotifyError::Decode` when the body is not a JSON object, holds no
///   numeric version label, or the newest entry is not a list of integers
///
/// # Example
///
/// ```
/// let secret = fetch_newest_secret(&client, &config::secrets_url()).await?;
/// println!("secret version {}", secret.version);
/// ```
pub async fn fetch_newest_secret(client: &Client, url: &str) -> Result<SecretVersion> {
    let response = client.get(url).send().await?;
    let response = ensure_success(response, "secrets")?;
    let dict: HashMap<String, Value> = read_json(response, "secret dictionary").await?;

    newest_version(dict)
}

/// Selects the numerically largest version label.
///
/// Labels that do not parse as integers are ignored rather than compared as
/// text, so `"9"` never wins over `"10"` and junk keys never crash the lookup.
/// An empty or all-junk dictionary is an error.
pub fn newest_version(dict: HashMap<String, Value>) -> Result<SecretVersion> {
    let (label, digits) = dict
        .into_iter()
        .filter_map(|(label, digits)| {
            label
                .trim()
                .parse::<u64>()
                .ok()
                .map(|n| (n, label, digits))
        })
        .max_by_key(|(n, _, _)| *n)
        .map(|(_, label, digits)| (label, digits))
        .ok_or_else(|| SpotifyError::decode("secret dictionary", "no numeric versions found"))?;

    let raw_digits: Vec<u32> =
        serde_json::from_value(digits).map_err(|e| SpotifyError::decode("secret digits", e))?;
    if raw_digits.is_empty() {
        return Err(SpotifyError::decode("secret digits", "empty digit sequence"));
    }

    Ok(SecretVersion {
        version: label.trim().to_string(),
        raw_digits,
    })
}
