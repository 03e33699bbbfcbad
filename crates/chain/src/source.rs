//! The Chain Source abstraction (`spec.md` §2.1): `getBlockNumber`,
//! `getLogs`, and an optional subscribed log stream, backed by `alloy`.
//!
//! Grounded on the teacher's `ProviderBuilder::new().wallet(..).on_http(..)`
//! construction in `apps/src/bin/publisher.rs`, generalized to a read-only
//! `Provider` behind a trait object so the indexer and its tests don't
//! depend on a concrete transport.

use crate::error::ChainError;
use alloy::primitives::Address;
use alloy::providers::{Provider, ProviderBuilder, RootProvider};
use alloy::rpc::types::{Filter, Log};
use alloy::transports::http::{Client, Http};
use async_trait::async_trait;
use std::time::Duration;
use url::Url;

/// Operation timeout applied to every RPC call (`spec.md` §5, default 10s).
pub const DEFAULT_RPC_TIMEOUT: Duration = Duration::from_secs(10);

#[async_trait]
pub trait ChainSource: Send + Sync {
    async fn block_number(&self) -> Result<u64, ChainError>;

    async fn get_logs(&self, filter: &Filter) -> Result<Vec<Log>, ChainError>;
}

/// HTTP JSON-RPC backed `ChainSource`. Live-tail subscription (the
/// optional websocket push path of `spec.md` §4.2) is implemented
/// separately in `clawed-indexer` against a `PubsubFrontend`-capable
/// provider, since only a websocket endpoint supports it.
pub struct HttpChainSource {
    provider: RootProvider<Http<Client>>,
    timeout: Duration,
}

impl HttpChainSource {
    pub fn connect(rpc_url: Url) -> Self {
        let provider = ProviderBuilder::new().on_http(rpc_url);
        Self { provider, timeout: DEFAULT_RPC_TIMEOUT }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn provider(&self) -> &RootProvider<Http<Client>> {
        &self.provider
    }
}

#[async_trait]
impl ChainSource for HttpChainSource {
    async fn block_number(&self) -> Result<u64, ChainError> {
        tokio::time::timeout(self.timeout, self.provider.get_block_number())
            .await
            .map_err(|_| ChainError::Timeout(self.timeout))?
            .map_err(|e| ChainError::Rpc(e.to_string()))
    }

    async fn get_logs(&self, filter: &Filter) -> Result<Vec<Log>, ChainError> {
        tokio::time::timeout(self.timeout, self.provider.get_logs(filter))
            .await
            .map_err(|_| ChainError::Timeout(self.timeout))?
            .map_err(|e| ChainError::Rpc(e.to_string()))
    }
}

/// Builds the `getLogs` filter for the contract address and the union of
/// known event topics (`spec.md` §4.2 step 6). An empty topic list means
/// "all topics from this address", which is exactly what's wanted since the
/// decoder itself discards anything outside the closed event set.
pub fn contract_filter(contract_address: Address, from_block: u64, to_block: u64) -> Filter {
    Filter::new()
        .address(contract_address)
        .from_block(from_block)
        .to_block(to_block)
}
