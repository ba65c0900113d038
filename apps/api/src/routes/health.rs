use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns service status with the configured model, live session count, and
/// cache sizes.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "resume-analyzer",
        "model": state.analyzer.model(),
        "sessions": state.sessions.len(),
        "cache": state.analyzer.caches().stats(),
    }))
}
