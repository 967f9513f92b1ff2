use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use chrono::Utc;
use reqwest::Client;
use tokio::{
    sync::{RwLock, watch},
    task::JoinHandle,
    time::MissedTickBehavior,
};

use crate::{
    error::{Result, SpotifyError},
    management::SecretStore,
    spotify::{
        Endpoints,
        auth::{TokenParams, fetch_server_time, request_token},
    },
    success,
    types::AccessToken,
    utils::{self, TotpGenerator},
    warning,
};

/// Mints bearer tokens and holds the most recent one.
///
/// The token is replaced as a whole on each successful mint and is never
/// cleared by a failed one.
pub struct TokenManager {
    client: Client,
    endpoints: Endpoints,
    sp_dc: Option<String>,
    secrets: Arc<SecretStore>,
    token: RwLock<Option<AccessToken>>,
    missing_cookie_reported: AtomicBool,
}

impl TokenManager {
    pub fn new(
        client: Client,
        endpoints: Endpoints,
        sp_dc: Option<String>,
        secrets: Arc<SecretStore>,
    ) -> Self {
        TokenManager {
            client,
            endpoints,
            sp_dc,
            secrets,
            token: RwLock::new(None),
            missing_cookie_reported: AtomicBool::new(false),
        }
    }

    pub async fn refresh(&self) -> Result<AccessToken> {
        let Some(sp_dc) = self.sp_dc.as_deref() else {
            if !self.missing_cookie_reported.swap(true, Ordering::SeqCst) {
                warning!("SP_DC is not set. Tokens cannot be minted until it is configured.");
            }
            return Err(SpotifyError::MissingSessionCookie);
        };

        self.secrets.ensure_fresh().await;
        let seed = self.secrets.current_seed().await;
        let generator =
            TotpGenerator::new(&seed).map_err(|e| SpotifyError::decode("TOTP secret", e))?;

        let local_ms = utils::now_ms();
        let server_ms = match fetch_server_time(&self.client, &self.endpoints, sp_dc).await {
            Ok(ms) => ms,
            Err(e) => {
                warning!("Failed to get server time, using local time: {}", e);
                local_ms
            }
        };

        let params = TokenParams {
            totp: generator.generate(local_ms),
            totp_server: generator.generate(server_ms),
            totp_ver: seed.version.clone(),
        };
        let response = request_token(&self.client, &self.endpoints, sp_dc, &params).await?;

        if response.is_anonymous {
            return Err(SpotifyError::SessionRejected);
        }
        let value = response
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| SpotifyError::decode("token response", "no accessToken returned"))?;

        let token = AccessToken {
            value,
            minted_at: Utc::now(),
            expires_at_ms: response.expires_at_ms,
        };
        *self.token.write().await = Some(token.clone());
        Ok(token)
    }

    /// The most recently minted token, expired or not.
    pub async fn current(&self) -> Option<AccessToken> {
        self.token.read().await.clone()
    }

    /// Bearer value for upstream calls.
    ///
    /// # Errors
    ///
    /// `NotReady` when nothing was minted yet, or when the held token is past
    /// its upstream expiry. An expired token stays held until a refresh
    /// replaces it.
    pub async fn bearer(&self) -> Result<String> {
        self.token
            .read()
            .await
            .as_ref()
            .filter(|t| !t.is_expired_at(utils::now_ms()))
            .map(|t| t.value.clone())
            .ok_or(SpotifyError::NotReady)
    }

    /// Whether [`TokenManager::bearer`] would hand out a token right now.
    pub async fn is_ready(&self) -> bool {
        self.bearer().await.is_ok()
    }

    pub fn secrets(&self) -> &SecretStore {
        &self.secrets
    }

    /// Refreshes immediately, then every `period`, until `shutdown` flips to true.
    pub fn spawn_refresh_loop(
        self: Arc<Self>,
        period: Duration,
        mut shutdown: watch::Receiver<bool>,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = ticker.tick() => match self.refresh().await {
                        Ok(_) => success!("Spotify access token refreshed"),
                        // reported once by refresh()
                        Err(SpotifyError::MissingSessionCookie) => {}
                        Err(e) => warning!("Failed to get token: {}", e),
                    },
                    changed = shutdown.changed() => {
                        if changed.is_err() || *shutdown.borrow() {
                            break;
                        }
                    }
                }
            }
        })
    }
}
