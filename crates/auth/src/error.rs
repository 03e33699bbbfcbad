//! `spec.md` §7 `Unauthorized` taxonomy for the request envelope.

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid_address")]
    InvalidAddress,

    #[error("expired")]
    SkewExceeded,

    #[error("invalid_signature")]
    InvalidSignature,

    #[error("nonce_already_used")]
    NonceAlreadyUsed,

    #[error(transparent)]
    Store(#[from] clawed_store::StoreError),
}

impl AuthError {
    /// Machine-readable code for the `{ error: code }` envelope (`spec.md` §7).
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidAddress => "invalid_address",
            Self::SkewExceeded => "expired",
            Self::InvalidSignature => "invalid_signature",
            Self::NonceAlreadyUsed => "nonce_already_used",
            Self::Store(_) => "internal_error",
        }
    }
}
