//! Pulls the four request-envelope headers off an `axum` request and runs
//! them through `clawed_auth::verify_envelope` (`spec.md` §4.4).

use crate::error::ApiError;
use crate::state::AppState;
use alloy_primitives::Address;
use axum::http::{HeaderMap, Method};
use chrono::Utc;
use clawed_auth::{verify_envelope, Envelope};

/// `Ok(None)` means anonymous (no envelope headers present, `spec.md` §4.4
/// step 1). `Ok(Some(address))` means a verified wallet. `Err` means an
/// envelope was present but failed verification.
pub async fn authenticate(state: &AppState, method: &Method, path: &str, headers: &HeaderMap, body: &[u8]) -> Result<Option<Address>, ApiError> {
    let header_str = |name: &str| headers.get(name).and_then(|v| v.to_str().ok()).map(str::to_string);

    let (wallet_address, signature, timestamp, nonce) =
        match (header_str("wallet-address"), header_str("signature"), header_str("timestamp"), header_str("nonce")) {
            (Some(w), Some(s), Some(t), Some(n)) => (w, s, t, n),
            _ => return Ok(None),
        };

    let timestamp_ms = timestamp.parse::<i64>().map_err(|_| ApiError::Unauthorized("invalid_timestamp"))?;
    let envelope = Envelope { wallet_address, signature, timestamp_ms, nonce };

    let mut conn = state.store.acquire().await?;
    let body_opt = if body.is_empty() { None } else { Some(body) };
    let address = verify_envelope(&mut conn, &state.auth_config, method.as_str(), path, body_opt, &envelope, Utc::now()).await?;
    Ok(Some(address))
}

pub fn require_authenticated(wallet: Option<Address>) -> Result<Address, ApiError> {
    wallet.ok_or(ApiError::Unauthorized("authentication_required"))
}
