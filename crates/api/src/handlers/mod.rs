pub mod escrow;
pub mod events;
pub mod health;
pub mod indexer_status;
pub mod legacy;
pub mod submissions;
pub mod tasks;
pub mod wallets;
