use crate::dto::EventDto;
use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::response::Response;
use clawed_store::events;

/// `GET /tasks/{id}/events` (`spec.md` §4.6): raw journal, ordered by
/// `(block_number, log_index)`.
pub async fn list_events(State(state): State<AppState>, Path(task_id): Path<String>) -> Result<Response, ApiError> {
    let mut conn = state.store.acquire().await?;
    let rows = events::list_events_for_task(&mut conn, state.chain_id, &state.contract_address_str, &task_id).await?;
    let out: Vec<EventDto> = rows.into_iter().map(EventDto::from).collect();
    Ok(crate::error::json_ok(out))
}
