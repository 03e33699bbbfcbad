use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

/// Liveness probe. No store round-trip — just confirms the process is up.
pub async fn healthz() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}
