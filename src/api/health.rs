use std::sync::Arc;

use axum::{Extension, response::Json};
use serde_json::{Value, json};

use crate::server::AppState;

pub async fn health(Extension(state): Extension<Arc<AppState>>) -> Json<Value> {
    let (total, failed) = state.stats.snapshot();

    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "tokenReady": state.tokens.is_ready().await,
        "secretVersion": state.tokens.secrets().version().await,
        "requests": {
            "total": total,
            "failed": failed,
        }
    }))
}
