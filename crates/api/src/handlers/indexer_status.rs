use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::State;
use axum::response::Response;
use serde::Serialize;

#[derive(Serialize)]
struct StatusResponse {
    head: u64,
    cursor: u64,
    last: Option<LastStep>,
    error: Option<String>,
}

#[derive(Serialize)]
struct LastStep {
    from: u64,
    to: u64,
    processed: u64,
    idle: bool,
}

/// `GET /indexer/status` (`spec.md` §4.6).
pub async fn get_status(State(state): State<AppState>) -> Result<Response, ApiError> {
    let status = state.indexer_status.status().await;
    let body = StatusResponse {
        head: status.head,
        cursor: status.cursor,
        last: status.last_step.map(|s| LastStep { from: s.from, to: s.to, processed: s.processed, idle: s.idle }),
        error: status.last_error,
    };
    Ok(crate::error::json_ok(body))
}
