use axum::extract::State;
use axum::Json;

use crate::api::AppState;

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// League files are read per request; readiness reports what is configured.
pub async fn ready(State(state): State<AppState>) -> Json<serde_json::Value> {
    let leagues = state.service.leagues();
    Json(serde_json::json!({
        "status": "ready",
        "leagues": leagues.len(),
    }))
}
