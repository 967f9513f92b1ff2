use std::sync::Arc;

use axum::{
    Extension, Json,
    http::{StatusCode, Uri, header},
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::{info, server::AppState};

pub async fn fallback(uri: Uri, Extension(state): Extension<Arc<AppState>>) -> Response {
    match &state.fallback_redirect {
        Some(target) => {
            info!("Unknown path {}, redirecting to {}", uri, target);
            (StatusCode::FOUND, [(header::LOCATION, target.clone())]).into_response()
        }
        None => (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" }))).into_response(),
    }
}
