//! Indexer tuning knobs (`spec.md` §6.3).

use alloy_primitives::Address;

#[derive(Debug, Clone)]
pub struct IndexerConfig {
    pub chain_id: i64,
    pub contract_address: Address,
    pub confirmations: u64,
    pub batch_blocks: u64,
    pub poll_interval_ms: u64,
    pub far_behind_threshold: u64,
    pub bootstrap_tail_blocks: u64,
    /// One-shot reindex override, consumed on the first `advance_once` call.
    pub force_from_block: Option<u64>,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            chain_id: 8453,
            contract_address: Address::ZERO,
            confirmations: 15,
            batch_blocks: 1_500,
            poll_interval_ms: 10_000,
            far_behind_threshold: 1_000_000,
            bootstrap_tail_blocks: 5_000,
            force_from_block: None,
        }
    }
}
