use std::{sync::Arc, time::Duration};

use reqwest::Client;
use tokio::{
    sync::{Mutex, RwLock},
    time::Instant,
};

use crate::{
    spotify,
    success,
    types::{SecretVersion, TotpSeed},
    utils::{decode_secret, fallback_secret},
    warning,
};

/// Owns the current TOTP seed and keeps it in sync with the remote dictionary.
///
/// The store holds at most one seed, always the newest version it has seen.
/// Until a fetch succeeds it serves the baked-in fallback secret, so token
/// minting never waits on the dictionary host.
pub struct SecretStore {
    client: Client,
    url: String,
    refresh_interval: Duration,
    last_fetch: Mutex<Option<Instant>>,
    seed: RwLock<Option<Arc<TotpSeed>>>,
}

impl SecretStore {
    /// Creates an empty store. Nothing is fetched until [`SecretStore::ensure_fresh`].
    ///
    /// # Arguments
    ///
    /// * `client` - Shared HTTP client
    /// * `url` - Location of the secret dictionary
    /// * `refresh_interval` - Minimum time between two fetch attempts
    ///
    /// # Example
    ///
    /// ```
    /// let store = SecretStore::new(client, config::secrets_url(), config::secret_refresh_interval());
    /// store.ensure_fresh().await;
    /// ```
    pub fn new(client: Client, url: impl Into<String>, refresh_interval: Duration) -> Self {
        SecretStore {
            client,
            url: url.into(),
            refresh_interval,
            last_fetch: Mutex::new(None),
            seed: RwLock::new(None),
        }
    }

    /// Fetches the dictionary at most once per refresh interval.
    ///
    /// Every attempt starts a new window, including failed ones. A failure
    /// keeps whatever seed is held and installs the fallback only when none is.
    /// Concurrent callers queue on the window lock, so one interval never
    /// produces more than one request.
    ///
    /// Never fails. Fetch errors are logged with [`crate::warning!`].
    pub async fn ensure_fresh(&self) {
        let mut last_fetch = self.last_fetch.lock().await;
        if let Some(at) = *last_fetch {
            if at.elapsed() < self.refresh_interval {
                return;
            }
        }
        *last_fetch = Some(Instant::now());

        match spotify::secrets::fetch_newest_secret(&self.client, &self.url).await {
            Ok(secret) => self.install(secret).await,
            Err(e) => {
                warning!("Failed to fetch TOTP secrets: {}", e);
                self.current_seed().await;
            }
        }
    }

    /// Returns the current seed, loading the fallback if nothing was ever installed.
    ///
    /// # Returns
    ///
    /// A shared handle to the seed. A later install replaces the stored seed
    /// without touching handles already given out.
    pub async fn current_seed(&self) -> Arc<TotpSeed> {
        if let Some(seed) = self.seed.read().await.as_ref() {
            return Arc::clone(seed);
        }

        let mut slot = self.seed.write().await;
        let seed = slot.get_or_insert_with(|| {
            warning!("Using fallback secret");
            Arc::new(decode_secret(&fallback_secret()))
        });
        Arc::clone(seed)
    }

    /// Version label of the held seed, or `None` before the first install.
    pub async fn version(&self) -> Option<String> {
        self.seed
            .read()
            .await
            .as_ref()
            .map(|seed| seed.version.clone())
    }

    async fn install(&self, secret: SecretVersion) {
        let mut slot = self.seed.write().await;
        if slot.as_ref().is_some_and(|seed| seed.version == secret.version) {
            return;
        }

        *slot = Some(Arc::new(decode_secret(&secret)));
        success!("TOTP updated to version {}", secret.version);
    }
}
