//! Route table for the Read API, off-chain Metadata Service, and health
//! endpoint. Layer ordering follows the ioi-foundation gateway: rate limit
//! as a route layer scoped to state, `CatchPanicLayer` and `TraceLayer`
//! outside it so a panicking handler still gets a traced, non-crashing
//! response.

use crate::handlers::{escrow, events, health, indexer_status, legacy, submissions, tasks, wallets};
use crate::rate_limit::rate_limit_middleware;
use crate::state::AppState;
use axum::routing::{get, post};
use axum::{middleware, Router};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(health::healthz))
        .route("/escrow", get(escrow::get_escrow))
        .route("/indexer/status", get(indexer_status::get_status))
        .route("/tasks", get(tasks::list_tasks))
        .route("/tasks/:task_id", get(tasks::get_task))
        .route("/tasks/:task_id/metadata", post(tasks::save_metadata))
        .route("/tasks/:task_id/events", get(events::list_events))
        .route("/tasks/:task_id/submissions", get(submissions::list_submissions))
        .route("/tasks/:task_id/submissions/:submission_id/proof", post(submissions::save_proof))
        .route("/tasks/:task_id/check-funding", post(legacy::check_funding))
        .route("/wallets/:address/tasks", get(wallets::list_tasks_for_wallet))
        .route_layer(middleware::from_fn_with_state(state.clone(), rate_limit_middleware))
        .with_state(state)
        .layer(CatchPanicLayer::new())
        .layer(TraceLayer::new_for_http())
}
