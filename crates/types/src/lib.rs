//! Domain types shared by every ClawedEscrow crate: on-chain identity
//! newtypes, the task/submission status state machines, and the canonical
//! JSON hashing used to bind off-chain metadata to on-chain commitments.

pub mod canonical;
pub mod status;

pub use alloy_primitives::{Address, B256, U256};
pub use status::{SubmissionStatus, TaskStatus};

use serde::{Deserialize, Serialize};
use std::fmt;

/// On-chain task identifier. Preserved as `U256` internally and serialized as
/// a decimal string so large ids never round-trip through a float.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId(pub U256);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for TaskId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for TaskId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        U256::from_str_radix(&s, 10)
            .map(TaskId)
            .map_err(serde::de::Error::custom)
    }
}

impl std::str::FromStr for TaskId {
    type Err = alloy_primitives::ruint::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        U256::from_str_radix(s, 10).map(TaskId)
    }
}

/// Per-task submission sequence number, ascending from 1, used to order the
/// submissions endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubmissionId(pub u64);

impl fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Provenance of a projection row: the log that last wrote it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Provenance {
    pub block_number: u64,
    pub block_hash: B256,
    pub tx_hash: B256,
    pub log_index: u64,
}

/// Serializes a `U256`/`u128`-sized quantity as a decimal string, never as a
/// JSON number, per the "never coerce amounts to 64-bit floats" design note.
pub fn decimal_string(value: U256) -> String {
    value.to_string()
}
