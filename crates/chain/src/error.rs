/// `spec.md` §7 `ChainUnavailable` — RPC failures and timeouts. Recovered by
/// retrying on the next indexer tick; never fatal to the process.
#[derive(Debug, thiserror::Error)]
pub enum ChainError {
    #[error("rpc request failed: {0}")]
    Rpc(String),

    #[error("rpc request timed out after {0:?}")]
    Timeout(std::time::Duration),
}
