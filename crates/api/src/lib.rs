pub mod auth_extract;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod rate_limit;
pub mod router;
pub mod state;

pub use error::ApiError;
pub use router::build_router;
pub use state::AppState;
