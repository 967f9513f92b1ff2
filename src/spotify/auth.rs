use reqwest::{Client, RequestBuilder, header};

use crate::{
    error::Result,
    spotify::{Endpoints, WEB_PLAYER_ORIGIN, ensure_success, read_json},
    types::{ServerTimeResponse, TokenResponse},
};

pub const TOKEN_REASON: &str = "canvas-lyric";
pub const TOKEN_PRODUCT_TYPE: &str = "mobile-web-player";

/// Query parameters of a token exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenParams {
    /// TOTP code for local wall-clock time.
    pub totp: String,
    /// TOTP code for Spotify's server time.
    pub totp_server: String,
    /// Version label of the secret both codes were generated with.
    pub totp_ver: String,
}

impl TokenParams {
    fn query(&self) -> [(&'static str, &str); 5] {
        [
            ("reason", TOKEN_REASON),
            ("productType", TOKEN_PRODUCT_TYPE),
            ("totp", &self.totp),
            ("totpVer", &self.totp_ver),
            ("totpServer", &self.totp_server),
        ]
    }
}

/// Reads Spotify's current server time.
///
/// The endpoint answers `{"serverTime": <seconds>}`. Comparing codes for
/// local and server time lets the token endpoint tolerate clock drift.
///
/// # Returns
///
/// Server time in milliseconds since the Unix epoch.
///
/// # Errors
///
/// Any transport, status or decode failure. Callers fall back to local time
/// and never abort a mint because of it.
pub async fn fetch_server_time(client: &Client, endpoints: &Endpoints, sp_dc: &str) -> Result<u64> {
    let response = with_session(client.get(&endpoints.server_time_url), sp_dc)
        .send()
        .await?;
    let response = ensure_success(response, "server-time")?;
    let body: ServerTimeResponse = read_json(response, "server time").await?;

    Ok(body.server_time.saturating_mul(1000))
}

/// Exchanges the session cookie and a TOTP pair for a bearer token.
///
/// Sends `reason`, `productType`, `totp`, `totpVer` and `totpServer` as query
/// parameters, with the `sp_dc` cookie and web-player `Origin`/`Referer`
/// headers.
///
/// # Returns
///
/// The raw token response. Validation of `accessToken` and `isAnonymous` is
/// left to [`crate::management::TokenManager`].
///
/// # Example
///
/// ```
/// let params = TokenParams { totp, totp_server, totp_ver: "19".into() };
/// let token = request_token(&client, &endpoints, &sp_dc, &params).await?;
/// ```
pub async fn request_token(
    client: &Client,
    endpoints: &Endpoints,
    sp_dc: &str,
    params: &TokenParams,
) -> Result<TokenResponse> {
    let response = with_session(client.get(&endpoints.token_url), sp_dc)
        .query(&params.query())
        .send()
        .await?;
    let response = ensure_success(response, "token")?;

    read_json(response, "token response").await
}

fn with_session(request: RequestBuilder, sp_dc: &str) -> RequestBuilder {
    request
        .header(header::COOKIE, format!("sp_dc={sp_dc}"))
        .header(header::ORIGIN, WEB_PLAYER_ORIGIN)
        .header(header::REFERER, WEB_PLAYER_ORIGIN)
}
