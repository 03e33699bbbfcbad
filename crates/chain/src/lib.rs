pub mod abi;
pub mod decoder;
pub mod error;
pub mod escrow_view;
pub mod source;

pub use decoder::{decode_log, DecodeCounters, DecodedEvent};
pub use error::ChainError;
pub use escrow_view::{fetch_escrow_view, EscrowView};
pub use source::{contract_filter, ChainSource, HttpChainSource, DEFAULT_RPC_TIMEOUT};
