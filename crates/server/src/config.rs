//! Recognized options (`spec.md` §6.3, `SPEC_FULL.md` §6.3), loaded from
//! CLI flags or environment/`.env`, mirroring the teacher's
//! `#[arg(long, env = "...")]` `Args` struct in `apps/src/bin/publisher.rs`.

use alloy_primitives::Address;
use clap::Parser;
use std::net::SocketAddr;
use url::Url;

#[derive(Parser, Debug, Clone)]
#[command(name = "clawed-server", about = "ClawedEscrow indexer + Read API")]
pub struct Config {
    /// HTTP JSON-RPC endpoint for the indexed chain.
    #[arg(long, env = "CHAIN_RPC_URL")]
    pub chain_rpc_url: Url,

    /// Optional websocket endpoint used for the live-tail subscription.
    #[arg(long, env = "CHAIN_RPC_WS_URL")]
    pub chain_rpc_ws_url: Option<Url>,

    /// Contract address being indexed.
    #[arg(long, env = "ESCROW_CONTRACT_ADDRESS")]
    pub escrow_contract_address: Address,

    /// Expected chain id.
    #[arg(long, env = "CHAIN_ID", default_value_t = 8453)]
    pub chain_id: i64,

    #[arg(long, env = "INDEXER_CONFIRMATIONS", default_value_t = 15)]
    pub indexer_confirmations: u64,

    #[arg(long, env = "INDEXER_BATCH_BLOCKS", default_value_t = 1500)]
    pub indexer_batch_blocks: u64,

    #[arg(long, env = "INDEXER_POLL_INTERVAL_MS", default_value_t = 10_000)]
    pub indexer_poll_interval_ms: u64,

    #[arg(long, env = "FAR_BEHIND_THRESHOLD", default_value_t = 1_000_000)]
    pub far_behind_threshold: u64,

    #[arg(long, env = "BOOTSTRAP_TAIL_BLOCKS", default_value_t = 5000)]
    pub bootstrap_tail_blocks: u64,

    /// One-shot override for the first backfill step; cleared after use.
    #[arg(long, env = "FORCE_FROM_BLOCK")]
    pub force_from_block: Option<u64>,

    #[arg(long, env = "SIGNATURE_WINDOW_MS", default_value_t = 120_000)]
    pub signature_window_ms: i64,

    #[arg(long, env = "NONCE_TTL_MS", default_value_t = 300_000)]
    pub nonce_ttl_ms: i64,

    #[arg(long, env = "RATE_LIMIT_WINDOW_MS", default_value_t = 60_000)]
    pub rate_limit_window_ms: u64,

    #[arg(long, env = "RATE_LIMIT_MAX", default_value_t = 100)]
    pub rate_limit_max: u32,

    /// Postgres connection string.
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: String,

    /// Address the `axum` server binds.
    #[arg(long, env = "HTTP_BIND_ADDR", default_value = "0.0.0.0:8080")]
    pub http_bind_addr: SocketAddr,

    /// Honor `X-Forwarded-For` for rate limiting (`spec.md` §5).
    #[arg(long, env = "TRUST_PROXY", default_value_t = false)]
    pub trust_proxy: bool,
}
