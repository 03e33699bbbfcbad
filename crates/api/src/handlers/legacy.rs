use crate::error::ApiError;
use axum::extract::Path;
use axum::response::Response;

/// `POST /tasks/{id}/check-funding` (`spec.md` §1 Non-goals: active
/// funding checks against the chain are explicitly out of scope;
/// `spec.md` §7 "Public (no auth required)"). Kept as a thin acknowledgement
/// so older clients that still call this endpoint get a defined response
/// instead of a 404; it does not trigger any chain read or projection write.
pub async fn check_funding(Path(_task_id): Path<String>) -> Result<Response, ApiError> {
    Ok(crate::error::json_ok(serde_json::json!({ "acknowledged": true })))
}
