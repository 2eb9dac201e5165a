use axum::{extract::State, Json};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::app::AppState;

/// GET /health: liveness probe, returns build metadata and queue depth.
pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<Value> {
    let dashboard = state.dashboard.lock().await;
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "git_sha": env!("COVIDASH_GIT_SHA"),
        "updates": dashboard.updates.len(),
        "pending_actions": dashboard.updates.pending_actions(),
    }))
}
