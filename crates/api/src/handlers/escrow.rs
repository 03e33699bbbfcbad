use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::State;
use axum::response::Response;

/// `GET /escrow` (`spec.md` §4.6): contract-level view values, fetched once
/// at startup and cached in `AppState`.
pub async fn get_escrow(State(state): State<AppState>) -> Result<Response, ApiError> {
    Ok(crate::error::json_ok(state.escrow_view.clone()))
}
