#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Duration,
};

use axum::{
    Extension, Json, Router,
    body::Bytes,
    extract::{Path, Query},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use canvas_lyric::{
    config::{CanvasMode, Settings},
    management::{SecretStore, TokenManager},
    spotify::{self, Endpoints},
};
use reqwest::Client;
use serde_json::{Value, json};

pub const SP_DC: &str = "test-cookie";
pub const TRACK_ID: &str = "4uLU6hMCjMI75M1A2tKUQC";
pub const ALBUM_ART_URL: &str = "https://i.scdn.co/image/album-640";
pub const VIDEO_BYTES: &[u8] = b"not really an mp4";

/// What a mocked JSON route answers with.
#[derive(Debug, Clone)]
pub enum Reply {
    Json(Value),
    Status(u16),
}

#[derive(Debug, Clone)]
pub enum CanvasReply {
    Urls(Vec<String>),
    Status(u16),
}

/// Everything a request to the mock can observe or change.
pub struct MockState {
    pub secrets: Mutex<Reply>,
    pub server_time: Mutex<Reply>,
    pub token: Mutex<Reply>,
    pub canvas: Mutex<CanvasReply>,
    pub track: Mutex<Reply>,
    pub lyrics: Mutex<Reply>,
    pub token_queries: Mutex<Vec<HashMap<String, String>>>,
    pub cookies: Mutex<Vec<String>>,
    pub canvas_bodies: Mutex<Vec<Vec<u8>>>,
    pub bearers: Mutex<Vec<String>>,
    pub lyrics_queries: Mutex<Vec<HashMap<String, String>>>,
    pub app_platforms: Mutex<Vec<String>>,
    hits: Mutex<HashMap<&'static str, usize>>,
}

impl MockState {
    fn hit(&self, route: &'static str) {
        *self.hits.lock().unwrap().entry(route).or_default() += 1;
    }
}

impl Default for MockState {
    fn default() -> Self {
        MockState {
            secrets: Mutex::new(Reply::Json(secret_dict(&[("18", vec![1, 2, 3])]))),
            server_time: Mutex::new(Reply::Json(json!({ "serverTime": 1_700_000_010u64 }))),
            token: Mutex::new(Reply::Json(token_json("mock-token"))),
            canvas: Mutex::new(CanvasReply::Urls(vec![
                "https://canvaz.scdn.co/upload/video.mp4".to_string(),
            ])),
            track: Mutex::new(Reply::Json(track_json(ALBUM_ART_URL))),
            lyrics: Mutex::new(Reply::Json(lyrics_json(&[
                json!({ "startTimeMs": "1000", "words": "first line" }),
                json!({ "startTimeMs": 2500, "words": "second line" }),
            ]))),
            token_queries: Mutex::new(Vec::new()),
            cookies: Mutex::new(Vec::new()),
            canvas_bodies: Mutex::new(Vec::new()),
            bearers: Mutex::new(Vec::new()),
            lyrics_queries: Mutex::new(Vec::new()),
            app_platforms: Mutex::new(Vec::new()),
            hits: Mutex::new(HashMap::new()),
        }
    }
}

/// A local stand-in for every upstream the service talks to.
pub struct MockUpstream {
    pub base: String,
    pub state: Arc<MockState>,
}

impl MockUpstream {
    pub async fn start() -> Self {
        let state = Arc::new(MockState::default());
        let app = Router::new()
            .route("/secrets/secretDict.json", get(secrets))
            .route("/api/server-time", get(server_time))
            .route("/api/token", get(token))
            .route("/canvaz-cache/v0/canvases", post(canvases))
            .route("/v1/tracks/{id}", get(track))
            .route("/color-lyrics/v2/track/{id}", get(lyrics))
            .route("/video.mp4", get(video))
            .layer(Extension(Arc::clone(&state)));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        MockUpstream {
            base: format!("http://{addr}"),
            state,
        }
    }

    pub fn endpoints(&self) -> Endpoints {
        Endpoints::with_base(&self.base)
    }

    pub fn hits(&self, route: &str) -> usize {
        self.state
            .hits
            .lock()
            .unwrap()
            .get(route)
            .copied()
            .unwrap_or(0)
    }

    pub fn video_url(&self) -> String {
        format!("{}/video.mp4", self.base)
    }

    pub fn set_secrets(&self, reply: Reply) {
        *self.state.secrets.lock().unwrap() = reply;
    }

    pub fn set_server_time(&self, reply: Reply) {
        *self.state.server_time.lock().unwrap() = reply;
    }

    pub fn set_token(&self, reply: Reply) {
        *self.state.token.lock().unwrap() = reply;
    }

    pub fn set_canvas(&self, reply: CanvasReply) {
        *self.state.canvas.lock().unwrap() = reply;
    }

    pub fn set_track(&self, reply: Reply) {
        *self.state.track.lock().unwrap() = reply;
    }

    pub fn set_lyrics(&self, reply: Reply) {
        *self.state.lyrics.lock().unwrap() = reply;
    }

    pub fn settings(&self, sp_dc: Option<&str>) -> Settings {
        Settings {
            endpoints: self.endpoints(),
            sp_dc: sp_dc.map(str::to_string),
            secret_refresh_interval: Duration::from_secs(3600),
            canvas_mode: CanvasMode::Redirect,
            fallback_redirect: None,
        }
    }

    pub fn secret_store(&self, refresh_interval: Duration) -> Arc<SecretStore> {
        Arc::new(SecretStore::new(
            client(),
            self.endpoints().secrets_url,
            refresh_interval,
        ))
    }

    pub fn token_manager(&self, sp_dc: Option<&str>) -> Arc<TokenManager> {
        Arc::new(TokenManager::new(
            client(),
            self.endpoints(),
            sp_dc.map(str::to_string),
            self.secret_store(Duration::from_secs(3600)),
        ))
    }
}

pub fn client() -> Client {
    spotify::http_client(Duration::from_secs(5)).unwrap()
}

pub fn secret_dict(entries: &[(&str, Vec<u32>)]) -> Value {
    let map: serde_json::Map<String, Value> = entries
        .iter()
        .map(|(version, digits)| (version.to_string(), json!(digits)))
        .collect();
    Value::Object(map)
}

pub fn token_json(value: &str) -> Value {
    json!({
        "clientId": "mock-client",
        "accessToken": value,
        "accessTokenExpirationTimestampMs": 4_102_444_800_000i64,
        "isAnonymous": false,
    })
}

pub fn track_json(image_url: &str) -> Value {
    json!({
        "id": TRACK_ID,
        "album": {
            "images": [
                { "url": image_url, "width": 640, "height": 640 },
                { "url": "https://i.scdn.co/image/album-300", "width": 300, "height": 300 },
            ]
        }
    })
}

pub fn lyrics_json(lines: &[Value]) -> Value {
    json!({
        "lyrics": { "syncType": "LINE_SYNCED", "lines": lines },
        "colors": { "background": -1 },
    })
}

/// Protobuf canvas response with one canvas per url and a ttl of 600.
pub fn canvas_bytes(urls: &[String]) -> Vec<u8> {
    let mut out = Vec::new();
    for url in urls {
        let mut canvas = Vec::new();
        canvas.push(0x12);
        canvas.push(url.len() as u8);
        canvas.extend_from_slice(url.as_bytes());
        out.push(0x0a);
        out.push(canvas.len() as u8);
        out.extend_from_slice(&canvas);
    }
    out.extend_from_slice(&[0x10, 0xd8, 0x04]);
    out
}

fn reply(reply: Reply) -> Response {
    match reply {
        Reply::Json(value) => Json(value).into_response(),
        Reply::Status(code) => StatusCode::from_u16(code).unwrap().into_response(),
    }
}

fn bearer(headers: &HeaderMap) -> String {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

async fn secrets(Extension(state): Extension<Arc<MockState>>) -> Response {
    state.hit("secrets");
    reply(state.secrets.lock().unwrap().clone())
}

async fn server_time(Extension(state): Extension<Arc<MockState>>) -> Response {
    state.hit("server-time");
    reply(state.server_time.lock().unwrap().clone())
}

async fn token(
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    Extension(state): Extension<Arc<MockState>>,
) -> Response {
    state.hit("token");
    state.token_queries.lock().unwrap().push(query);
    if let Some(cookie) = headers.get(header::COOKIE).and_then(|v| v.to_str().ok()) {
        state.cookies.lock().unwrap().push(cookie.to_string());
    }
    reply(state.token.lock().unwrap().clone())
}

async fn canvases(
    headers: HeaderMap,
    Extension(state): Extension<Arc<MockState>>,
    body: Bytes,
) -> Response {
    state.hit("canvas");
    state.canvas_bodies.lock().unwrap().push(body.to_vec());
    state.bearers.lock().unwrap().push(bearer(&headers));

    let canvas = state.canvas.lock().unwrap().clone();
    match canvas {
        CanvasReply::Urls(urls) => (
            [(header::CONTENT_TYPE, "application/x-protobuf")],
            canvas_bytes(&urls),
        )
            .into_response(),
        CanvasReply::Status(code) => StatusCode::from_u16(code).unwrap().into_response(),
    }
}

async fn track(
    Path(_id): Path<String>,
    headers: HeaderMap,
    Extension(state): Extension<Arc<MockState>>,
) -> Response {
    state.hit("track");
    state.bearers.lock().unwrap().push(bearer(&headers));
    reply(state.track.lock().unwrap().clone())
}

async fn lyrics(
    Path(_id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    Extension(state): Extension<Arc<MockState>>,
) -> Response {
    state.hit("lyrics");
    state.lyrics_queries.lock().unwrap().push(query);
    if let Some(platform) = headers.get("app-platform").and_then(|v| v.to_str().ok()) {
        state.app_platforms.lock().unwrap().push(platform.to_string());
    }
    reply(state.lyrics.lock().unwrap().clone())
}

async fn video(Extension(state): Extension<Arc<MockState>>) -> Response {
    state.hit("video");
    ([(header::CONTENT_TYPE, "video/mp4")], VIDEO_BYTES).into_response()
}
