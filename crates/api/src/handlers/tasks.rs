use crate::dto::TaskDto;
use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::response::Response;
use clawed_store::{metadata, tasks};

/// `GET /tasks` (`spec.md` §4.6): latest 200 tasks joined with metadata.
pub async fn list_tasks(State(state): State<AppState>) -> Result<Response, ApiError> {
    let mut conn = state.store.acquire().await?;
    let rows = tasks::list_recent_tasks(&mut conn, state.chain_id, &state.contract_address_str).await?;
    let mut out = Vec::with_capacity(rows.len());
    for row in rows {
        let meta = metadata::get_task_metadata(&mut conn, state.chain_id, &state.contract_address_str, &row.task_id).await?;
        out.push(TaskDto::from_row(row, meta.map(|m| (m.title, m.instructions))));
    }
    Ok(crate::error::json_ok(out))
}

/// `GET /tasks/{id}` (`spec.md` §4.6): single task with metadata; 404 if absent.
pub async fn get_task(State(state): State<AppState>, Path(task_id): Path<String>) -> Result<Response, ApiError> {
    let mut conn = state.store.acquire().await?;
    let row = tasks::get_task(&mut conn, state.chain_id, &state.contract_address_str, &task_id).await?.ok_or(ApiError::NotFound)?;
    let meta = metadata::get_task_metadata(&mut conn, state.chain_id, &state.contract_address_str, &task_id).await?;
    Ok(crate::error::json_ok(TaskDto::from_row(row, meta.map(|m| (m.title, m.instructions)))))
}

#[derive(serde::Deserialize)]
pub struct SaveMetadataRequest {
    pub title: String,
    pub instructions: String,
    #[serde(rename = "specHash")]
    pub spec_hash: String,
}

/// `POST /tasks/{id}/metadata` (`spec.md` §4.5).
pub async fn save_metadata(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
    headers: axum::http::HeaderMap,
    method: axum::http::Method,
    uri: axum::http::Uri,
    body: axum::body::Bytes,
) -> Result<Response, ApiError> {
    let payload: SaveMetadataRequest = serde_json::from_slice(&body).map_err(|_| ApiError::Validation("invalid_body"))?;

    let wallet = crate::auth_extract::authenticate(&state, &method, uri.path(), &headers, &body).await?;
    let wallet = crate::auth_extract::require_authenticated(wallet)?;

    let mut conn = state.store.acquire().await?;
    let task = tasks::get_task(&mut conn, state.chain_id, &state.contract_address_str, &task_id).await?.ok_or(ApiError::NotFound)?;

    let requester = task.requester.as_deref().ok_or(ApiError::Forbidden("not_requester"))?;
    if !requester.eq_ignore_ascii_case(&format!("{wallet:#x}")) {
        return Err(ApiError::Forbidden("not_requester"));
    }

    if let Some(existing) = &task.spec_hash {
        if !existing.eq_ignore_ascii_case(&payload.spec_hash) {
            return Err(ApiError::Conflict("spec_hash_mismatch"));
        }
    }

    let row = clawed_store::models::TaskMetadataRow {
        task_id: task_id.clone(),
        spec_hash: payload.spec_hash,
        title: payload.title,
        instructions: payload.instructions,
        created_by: format!("{wallet:#x}"),
    };
    metadata::upsert_task_metadata(&mut conn, state.chain_id, &state.contract_address_str, &row).await?;

    Ok(crate::error::json_ok(serde_json::json!({ "ok": true })))
}
