use crate::dto::TaskDto;
use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::response::Response;
use clawed_store::{metadata, tasks};

/// `GET /wallets/{address}/tasks` (`spec.md` §4.6): tasks where this wallet
/// is the requester or has at least one submission as agent.
pub async fn list_tasks_for_wallet(State(state): State<AppState>, Path(address): Path<String>) -> Result<Response, ApiError> {
    let mut conn = state.store.acquire().await?;
    let rows = tasks::list_tasks_for_wallet(&mut conn, state.chain_id, &state.contract_address_str, &address).await?;
    let mut out = Vec::with_capacity(rows.len());
    for row in rows {
        let meta = metadata::get_task_metadata(&mut conn, state.chain_id, &state.contract_address_str, &row.task_id).await?;
        out.push(TaskDto::from_row(row, meta.map(|m| (m.title, m.instructions))));
    }
    Ok(crate::error::json_ok(out))
}
