use std::{
    net::SocketAddr,
    str::FromStr,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use axum::{Extension, Router, middleware, routing::get};
use reqwest::Client;
use tokio::sync::watch;

use crate::{
    api,
    config::{self, CanvasMode, Settings},
    error, info,
    management::{ArtworkResolver, LyricsFetcher, SecretStore, TokenManager},
    spotify, success, warning,
};

pub struct AppState {
    pub tokens: Arc<TokenManager>,
    pub artwork: ArtworkResolver,
    pub lyrics: LyricsFetcher,
    pub client: Client,
    pub canvas_mode: CanvasMode,
    pub fallback_redirect: Option<String>,
    pub stats: RequestStats,
}

impl AppState {
    pub fn new(client: Client, settings: Settings) -> Self {
        let secrets = Arc::new(SecretStore::new(
            client.clone(),
            settings.endpoints.secrets_url.clone(),
            settings.secret_refresh_interval,
        ));
        let tokens = Arc::new(TokenManager::new(
            client.clone(),
            settings.endpoints.clone(),
            settings.sp_dc,
            secrets,
        ));

        AppState {
            artwork: ArtworkResolver::new(
                client.clone(),
                settings.endpoints.clone(),
                Arc::clone(&tokens),
            ),
            lyrics: LyricsFetcher::new(client.clone(), settings.endpoints, Arc::clone(&tokens)),
            tokens,
            client,
            canvas_mode: settings.canvas_mode,
            fallback_redirect: settings.fallback_redirect,
            stats: RequestStats::default(),
        }
    }
}

/// Counts canvas and lyric requests and how many of them failed.
#[derive(Debug, Default)]
pub struct RequestStats {
    total: AtomicU64,
    failed: AtomicU64,
}

impl RequestStats {
    pub fn record_request(&self) {
        self.total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    /// `(total, failed)`
    pub fn snapshot(&self) -> (u64, u64) {
        (
            self.total.load(Ordering::Relaxed),
            self.failed.load(Ordering::Relaxed),
        )
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/canvas", get(api::canvas))
        .route("/spotify/canvas", get(api::canvas))
        .route("/lyric", get(api::lyric))
        .route("/spotify/lyric", get(api::lyric))
        .fallback(api::fallback)
        .layer(middleware::map_response(api::allow_any_origin))
        .layer(Extension(state))
}

/// Serves the API until Ctrl-C, refreshing the access token in the background.
pub async fn start_api_server() {
    let client = match spotify::http_client(config::http_timeout()) {
        Ok(client) => client,
        Err(e) => error!("Failed to build HTTP client: {}", e),
    };
    let state = Arc::new(AppState::new(client, Settings::from_env()));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let refresher =
        Arc::clone(&state.tokens).spawn_refresh_loop(config::token_refresh_interval(), shutdown_rx);

    let addr = match SocketAddr::from_str(&config::server_addr()) {
        Ok(addr) => addr,
        Err(e) => error!("Failed to parse server address: {}", e),
    };
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => error!("Failed to bind {}: {}", addr, e),
    };

    success!("Server running at http://{}", addr);
    if let Err(e) = axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        warning!("Server error: {}", e);
    }

    let _ = shutdown_tx.send(true);
    if let Err(e) = refresher.await {
        warning!("Token refresh task ended abnormally: {}", e);
    }
    info!("Server stopped");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warning!("Cannot listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down...");
}
