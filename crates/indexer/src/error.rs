#[derive(Debug, thiserror::Error)]
pub enum IndexerError {
    #[error(transparent)]
    Chain(#[from] clawed_chain::ChainError),

    #[error(transparent)]
    Store(#[from] clawed_store::StoreError),
}
