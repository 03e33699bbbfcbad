//! Row-shaped types and the `U256`/`BigDecimal` bridge (`spec.md` §9 "never
//! coerce amounts... to 64-bit floats"). Columns that hold on-chain integers
//! are `NUMERIC` so they always round-trip exactly.

use alloy_primitives::U256;
use bigdecimal::BigDecimal;
use std::str::FromStr;

pub fn u256_to_decimal(value: U256) -> BigDecimal {
    BigDecimal::from_str(&value.to_string()).expect("U256 decimal string is always valid")
}

pub fn decimal_to_u256(value: &BigDecimal) -> U256 {
    U256::from_str_radix(&value.to_string(), 10).expect("stored amount is a non-negative integer")
}

#[derive(Debug, Clone)]
pub struct TaskRow {
    pub task_id: String,
    pub requester: Option<String>,
    pub spec_hash: Option<String>,
    pub payout_amount: Option<BigDecimal>,
    pub max_winners: Option<i16>,
    pub deposit_fee_amount: Option<BigDecimal>,
    pub recipient_fee_amount: Option<BigDecimal>,
    pub balance: Option<BigDecimal>,
    pub deadline: Option<i64>,
    pub review_window: Option<i64>,
    pub escalation_window: Option<i64>,
    pub approved_count: i32,
    pub withdrawn_count: i32,
    pub pending_submissions: i32,
    pub submission_count: i64,
    pub claim_count: i64,
    pub status: i16,
    pub created_block: Option<i64>,
    pub created_tx: Option<String>,
    pub updated_block: Option<i64>,
    pub updated_tx: Option<String>,
}

#[derive(Debug, Clone)]
pub struct EventRow {
    pub tx_hash: String,
    pub log_index: i64,
    pub block_number: i64,
    pub block_hash: String,
    pub event_name: String,
    pub task_id: Option<String>,
    pub args: serde_json::Value,
}

#[derive(Debug, Clone)]
pub struct TaskMetadataRow {
    pub task_id: String,
    pub spec_hash: String,
    pub title: String,
    pub instructions: String,
    pub created_by: String,
}

#[derive(Debug, Clone)]
pub struct ProofRow {
    pub task_id: String,
    pub submission_id: BigDecimal,
    pub wallet: String,
    pub proof_text: String,
    pub proof_hash: String,
    pub tx_hash: Option<String>,
}
