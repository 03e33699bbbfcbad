pub mod apply;
pub mod config;
pub mod engine;
pub mod error;
pub mod live_tail;

pub use config::IndexerConfig;
pub use engine::{IndexerEngine, IndexerStatus, StatusProvider, StepResult};
pub use error::IndexerError;
