//! Error taxonomy shared by the secret, token, canvas and lyrics pipelines.
//!
//! Upstream failures (`Http`, `Status`, `Decode`) are contained at the
//! lowest component that has a fallback. Only [`SpotifyError::NotReady`] and
//! [`SpotifyError::NotFound`] are meant to reach HTTP callers as-is.

use reqwest::StatusCode;
use thiserror::Error;

use crate::protocol::WireError;

#[derive(Debug, Error)]
pub enum SpotifyError {
    /// `SP_DC` is not configured. Every mint attempt fails until it is set.
    #[error("SP_DC session cookie is not configured")]
    MissingSessionCookie,

    /// The token endpoint answered with an anonymous token.
    #[error("sp_dc cookie is invalid or expired")]
    SessionRejected,

    /// No access token has been minted yet.
    #[error("Access token not ready")]
    NotReady,

    #[error("Not found")]
    NotFound,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("upstream {endpoint} returned status {status}")]
    Status {
        endpoint: &'static str,
        status: StatusCode,
    },

    #[error("failed to decode {what}: {reason}")]
    Decode { what: &'static str, reason: String },

    #[error("invalid endpoint url {0}")]
    InvalidEndpoint(String),
}

impl SpotifyError {
    pub fn decode(what: &'static str, reason: impl ToString) -> Self {
        SpotifyError::Decode {
            what,
            reason: reason.to_string(),
        }
    }
}

impl From<WireError> for SpotifyError {
    fn from(err: WireError) -> Self {
        SpotifyError::decode("canvas response", err)
    }
}

pub type Result<T> = std::result::Result<T, SpotifyError>;
