mod common;

use std::time::Duration;

use canvas_lyric::{
    error::SpotifyError,
    types::{AccessToken, SecretVersion},
    utils::{decode_secret, generate_totp},
};
use common::{MockUpstream, Reply, SP_DC, token_json};
use serde_json::json;
use tokio::sync::watch;

#[tokio::test]
async fn test_refresh_mints_token() {
    let mock = MockUpstream::start().await;
    let tokens = mock.token_manager(Some(SP_DC));

    assert!(!tokens.is_ready().await);
    let token = tokens.refresh().await.unwrap();

    assert_eq!(token.value, "mock-token");
    assert_eq!(token.expires_at_ms, Some(4_102_444_800_000));
    assert!(tokens.is_ready().await);
    assert_eq!(tokens.bearer().await.unwrap(), "mock-token");
    assert_eq!(tokens.current().await, Some(token));
}

#[tokio::test]
async fn test_refresh_sends_totp_pair() {
    let mock = MockUpstream::start().await;
    let tokens = mock.token_manager(Some(SP_DC));

    tokens.refresh().await.unwrap();

    let queries = mock.state.token_queries.lock().unwrap().clone();
    assert_eq!(queries.len(), 1);
    let query = &queries[0];
    assert_eq!(query["reason"], "canvas-lyric");
    assert_eq!(query["productType"], "mobile-web-player");
    assert_eq!(query["totpVer"], "18");
    assert_eq!(query["totp"].len(), 6);

    // the mock reports serverTime 1700000010
    let seed = decode_secret(&SecretVersion {
        version: "18".to_string(),
        raw_digits: vec![1, 2, 3],
    });
    assert_eq!(
        query["totpServer"],
        generate_totp(&seed, 1_700_000_010_000).unwrap()
    );

    let cookies = mock.state.cookies.lock().unwrap().clone();
    assert_eq!(cookies, vec![format!("sp_dc={SP_DC}")]);
    assert_eq!(mock.hits("secrets"), 1);
    assert_eq!(mock.hits("server-time"), 1);
}

#[tokio::test]
async fn test_server_time_failure_uses_local_time() {
    let mock = MockUpstream::start().await;
    mock.set_server_time(Reply::Status(500));
    let tokens = mock.token_manager(Some(SP_DC));

    tokens.refresh().await.unwrap();

    let query = mock.state.token_queries.lock().unwrap()[0].clone();
    assert_eq!(query["totp"], query["totpServer"]);
    assert!(tokens.is_ready().await);
}

#[tokio::test]
async fn test_secret_failure_mints_with_fallback() {
    let mock = MockUpstream::start().await;
    mock.set_secrets(Reply::Status(500));
    let tokens = mock.token_manager(Some(SP_DC));

    tokens.refresh().await.unwrap();

    let query = mock.state.token_queries.lock().unwrap()[0].clone();
    assert_eq!(query["totpVer"], "19");
    assert_eq!(tokens.secrets().version().await.as_deref(), Some("19"));
}

#[tokio::test]
async fn test_failed_refresh_keeps_previous_token() {
    let mock = MockUpstream::start().await;
    let tokens = mock.token_manager(Some(SP_DC));
    tokens.refresh().await.unwrap();

    mock.set_token(Reply::Status(500));
    let err = tokens.refresh().await.unwrap_err();

    assert!(matches!(err, SpotifyError::Status { .. }));
    assert_eq!(tokens.bearer().await.unwrap(), "mock-token");
}

#[tokio::test]
async fn test_expired_token_is_not_ready() {
    let mock = MockUpstream::start().await;
    mock.set_token(Reply::Json(json!({
        "accessToken": "expired-token",
        "accessTokenExpirationTimestampMs": 1000,
        "isAnonymous": false,
    })));
    let tokens = mock.token_manager(Some(SP_DC));
    tokens.refresh().await.unwrap();

    mock.set_token(Reply::Status(500));
    assert!(tokens.refresh().await.is_err());

    assert!(matches!(tokens.bearer().await, Err(SpotifyError::NotReady)));
    assert!(!tokens.is_ready().await);
    // still held until a refresh succeeds
    assert_eq!(tokens.current().await.unwrap().value, "expired-token");

    mock.set_token(Reply::Json(token_json("fresh-token")));
    tokens.refresh().await.unwrap();
    assert_eq!(tokens.bearer().await.unwrap(), "fresh-token");
}

#[test]
fn test_token_expiry() {
    let mut token = AccessToken {
        value: "t".to_string(),
        minted_at: chrono::Utc::now(),
        expires_at_ms: Some(2_000),
    };

    assert!(!token.is_expired_at(1_999));
    assert!(token.is_expired_at(2_000));
    assert!(token.is_expired_at(u64::MAX));

    token.expires_at_ms = None;
    assert!(!token.is_expired_at(u64::MAX));
}

#[tokio::test]
async fn test_successful_refresh_replaces_token() {
    let mock = MockUpstream::start().await;
    let tokens = mock.token_manager(Some(SP_DC));
    tokens.refresh().await.unwrap();

    mock.set_token(Reply::Json(token_json("second-token")));
    tokens.refresh().await.unwrap();

    assert_eq!(tokens.bearer().await.unwrap(), "second-token");
}

#[tokio::test]
async fn test_missing_cookie_is_not_ready() {
    let mock = MockUpstream::start().await;
    let tokens = mock.token_manager(None);

    assert!(matches!(
        tokens.refresh().await,
        Err(SpotifyError::MissingSessionCookie)
    ));
    assert!(matches!(
        tokens.refresh().await,
        Err(SpotifyError::MissingSessionCookie)
    ));
    assert!(matches!(tokens.bearer().await, Err(SpotifyError::NotReady)));
    assert_eq!(mock.hits("token"), 0);
    assert_eq!(mock.hits("secrets"), 0);
}

#[tokio::test]
async fn test_anonymous_token_is_rejected() {
    let mock = MockUpstream::start().await;
    mock.set_token(Reply::Json(json!({
        "accessToken": "anonymous-token",
        "isAnonymous": true,
    })));
    let tokens = mock.token_manager(Some(SP_DC));

    assert!(matches!(
        tokens.refresh().await,
        Err(SpotifyError::SessionRejected)
    ));
    assert!(!tokens.is_ready().await);
}

#[tokio::test]
async fn test_missing_access_token_is_decode_error() {
    let mock = MockUpstream::start().await;
    mock.set_token(Reply::Json(json!({ "accessToken": "", "isAnonymous": false })));
    let tokens = mock.token_manager(Some(SP_DC));

    assert!(matches!(
        tokens.refresh().await,
        Err(SpotifyError::Decode { .. })
    ));
    assert!(!tokens.is_ready().await);
}

#[tokio::test]
async fn test_refresh_loop_mints_immediately_and_stops() {
    let mock = MockUpstream::start().await;
    let tokens = mock.token_manager(Some(SP_DC));
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let handle = std::sync::Arc::clone(&tokens)
        .spawn_refresh_loop(Duration::from_secs(3600), shutdown_rx);

    for _ in 0..100 {
        if tokens.is_ready().await {
            break;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    assert!(tokens.is_ready().await);
    assert_eq!(mock.hits("token"), 1);

    shutdown_tx.send(true).unwrap();
    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .unwrap()
        .unwrap();
}
