use crate::dto::SubmissionDto;
use crate::error::ApiError;
use crate::state::AppState;
use alloy_primitives::U256;
use axum::extract::{Path, Query, State};
use axum::response::Response;
use clawed_store::{models::ProofRow, proofs, submissions, tasks};
use serde::Deserialize;
use std::str::FromStr;

/// `?cursor=` query parameter for `GET /tasks/{id}/submissions` (`spec.md`
/// §9 "Unbounded submissions" resolution): the last `submission_id` seen on
/// the previous page, or absent for the first page.
#[derive(Debug, Deserialize)]
pub struct SubmissionsQuery {
    pub cursor: Option<String>,
}

/// `GET /tasks/{id}/submissions` (`spec.md` §4.5): `proof_text` is only
/// included for the caller who is either the task's requester or the
/// submission's own agent; everyone else sees it omitted. Capped at
/// `submissions::SUBMISSIONS_PAGE_LIMIT` rows per page.
pub async fn list_submissions(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
    Query(query): Query<SubmissionsQuery>,
    headers: axum::http::HeaderMap,
    method: axum::http::Method,
    uri: axum::http::Uri,
) -> Result<Response, ApiError> {
    let caller = crate::auth_extract::authenticate(&state, &method, uri.path(), &headers, &[]).await?;
    let caller_str = caller.map(|a| format!("{a:#x}"));

    let cursor = query
        .cursor
        .as_deref()
        .map(U256::from_str)
        .transpose()
        .map_err(|_| ApiError::Validation("invalid_cursor"))?;

    let mut conn = state.store.acquire().await?;
    let task = tasks::get_task(&mut conn, state.chain_id, &state.contract_address_str, &task_id).await?.ok_or(ApiError::NotFound)?;
    let views = submissions::list_submissions_for_task(&mut conn, state.chain_id, &state.contract_address_str, &task_id, cursor).await?;

    let is_requester = task.requester.as_deref().zip(caller_str.as_deref()).map(|(r, c)| r.eq_ignore_ascii_case(c)).unwrap_or(false);

    let mut out = Vec::with_capacity(views.len());
    for view in views {
        let is_agent = view.agent.as_deref().zip(caller_str.as_deref()).map(|(a, c)| a.eq_ignore_ascii_case(c)).unwrap_or(false);
        let proof_text = if is_requester || is_agent {
            proofs::latest_proof_text(&mut conn, state.chain_id, &state.contract_address_str, &task_id, view.submission_id).await?
        } else {
            None
        };
        out.push(SubmissionDto::from_view(view, proof_text));
    }
    Ok(crate::error::json_ok(out))
}

#[derive(serde::Deserialize)]
pub struct SaveProofRequest {
    #[serde(rename = "proofText")]
    pub proof_text: String,
    #[serde(rename = "proofHash")]
    pub proof_hash: String,
    #[serde(rename = "txHash")]
    pub tx_hash: Option<String>,
}

/// `POST /tasks/{id}/submissions/{sid}/proof` (`spec.md` §4.5).
pub async fn save_proof(
    State(state): State<AppState>,
    Path((task_id, submission_id)): Path<(String, String)>,
    headers: axum::http::HeaderMap,
    method: axum::http::Method,
    uri: axum::http::Uri,
    body: axum::body::Bytes,
) -> Result<Response, ApiError> {
    let payload: SaveProofRequest = serde_json::from_slice(&body).map_err(|_| ApiError::Validation("invalid_body"))?;

    let wallet = crate::auth_extract::authenticate(&state, &method, uri.path(), &headers, &body).await?;
    let wallet = crate::auth_extract::require_authenticated(wallet)?;
    let wallet_str = format!("{wallet:#x}");

    let submission_id_u256 = U256::from_str(&submission_id).map_err(|_| ApiError::Validation("invalid_submission_id"))?;

    let mut conn = state.store.acquire().await?;
    let identity = submissions::get_submission_identity(&mut conn, state.chain_id, &state.contract_address_str, &task_id, submission_id_u256)
        .await?
        .ok_or(ApiError::NotFound)?;

    let agent = identity.agent.as_deref().ok_or(ApiError::Forbidden("not_agent"))?;
    if !agent.eq_ignore_ascii_case(&wallet_str) {
        return Err(ApiError::Forbidden("not_agent"));
    }

    if let Some(existing) = &identity.proof_hash {
        if !existing.eq_ignore_ascii_case(&payload.proof_hash) {
            return Err(ApiError::Conflict("proof_hash_mismatch"));
        }
    }

    let row = ProofRow {
        task_id: task_id.clone(),
        submission_id: clawed_store::models::u256_to_decimal(submission_id_u256),
        wallet: wallet_str,
        proof_text: payload.proof_text,
        proof_hash: payload.proof_hash,
        tx_hash: payload.tx_hash,
    };
    proofs::insert_proof(&mut conn, state.chain_id, &state.contract_address_str, &row).await?;

    Ok(crate::error::json_ok(serde_json::json!({ "ok": true })))
}
