use crate::rate_limit::RateLimiter;
use alloy_primitives::Address;
use clawed_auth::AuthConfig;
use clawed_indexer::StatusProvider;
use clawed_store::PgStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: PgStore,
    pub auth_config: AuthConfig,
    pub chain_id: i64,
    pub contract_address: Address,
    pub contract_address_str: String,
    pub indexer_status: Arc<dyn StatusProvider>,
    pub escrow_view: clawed_chain::EscrowView,
    pub rate_limiter: Arc<RateLimiter>,
    pub trust_proxy: bool,
}
