pub mod config;
pub mod error;
pub mod message;
pub mod verify;

pub use config::AuthConfig;
pub use error::AuthError;
pub use verify::{verify_envelope, Envelope};
