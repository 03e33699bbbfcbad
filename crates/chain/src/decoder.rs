//! Turns a raw `eth_getLogs` entry into a typed [`DecodedEvent`], per
//! `spec.md` §4.1.

use crate::abi;
use alloy::primitives::{Address, B256, U256};
use alloy::rpc::types::Log;
use alloy::sol_types::SolEvent;
use clawed_types::TaskId;
use std::sync::atomic::{AtomicU64, Ordering};

/// The closed event set recognized by the decoder (`spec.md` §4.1/§6.1).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedEvent {
    TaskCreated {
        task_id: TaskId,
        requester: Address,
        payout_amount: U256,
        max_winners: u16,
        deadline: u64,
        spec_hash: B256,
    },
    TaskFunded {
        task_id: TaskId,
        requester: Address,
        escrowed_amount: U256,
        deposit_fee_paid: U256,
    },
    Claimed {
        task_id: TaskId,
        submission_id: U256,
        agent: Address,
    },
    ProofSubmitted {
        task_id: TaskId,
        submission_id: U256,
        agent: Address,
        proof_hash: B256,
    },
    Approved {
        task_id: TaskId,
        submission_id: U256,
    },
    Rejected {
        task_id: TaskId,
        submission_id: U256,
    },
    Withdrawn {
        task_id: TaskId,
        submission_id: U256,
        agent: Address,
        net_payout: U256,
        recipient_fee: U256,
    },
    DisputeOpened {
        task_id: TaskId,
        submission_id: U256,
    },
    DisputeResolved {
        task_id: TaskId,
        submission_id: U256,
        approved: bool,
    },
    TaskClosed {
        task_id: TaskId,
        requester: Address,
        refunded: U256,
    },
    TaskCancelled {
        task_id: TaskId,
        requester: Address,
        refunded: U256,
    },
    TaskRefunded {
        task_id: TaskId,
        requester: Address,
        refunded: U256,
        reason: String,
    },
}

impl DecodedEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::TaskCreated { .. } => "TaskCreated",
            Self::TaskFunded { .. } => "TaskFunded",
            Self::Claimed { .. } => "Claimed",
            Self::ProofSubmitted { .. } => "ProofSubmitted",
            Self::Approved { .. } => "Approved",
            Self::Rejected { .. } => "Rejected",
            Self::Withdrawn { .. } => "Withdrawn",
            Self::DisputeOpened { .. } => "DisputeOpened",
            Self::DisputeResolved { .. } => "DisputeResolved",
            Self::TaskClosed { .. } => "TaskClosed",
            Self::TaskCancelled { .. } => "TaskCancelled",
            Self::TaskRefunded { .. } => "TaskRefunded",
        }
    }

    /// The first indexed argument, when the event carries one (`spec.md`
    /// §4.1 "Extract task_id as the first indexed argument when present").
    pub fn task_id(&self) -> Option<TaskId> {
        match self {
            Self::TaskCreated { task_id, .. }
            | Self::TaskFunded { task_id, .. }
            | Self::Claimed { task_id, .. }
            | Self::ProofSubmitted { task_id, .. }
            | Self::Approved { task_id, .. }
            | Self::Rejected { task_id, .. }
            | Self::Withdrawn { task_id, .. }
            | Self::DisputeOpened { task_id, .. }
            | Self::DisputeResolved { task_id, .. }
            | Self::TaskClosed { task_id, .. }
            | Self::TaskCancelled { task_id, .. }
            | Self::TaskRefunded { task_id, .. } => Some(*task_id),
        }
    }
}

/// Running counters for `spec.md` §2.1's "Undecodable... structured
/// counter" requirement, surfaced through `IndexerEngine::status()`.
#[derive(Debug, Default)]
pub struct DecodeCounters {
    pub decoded: AtomicU64,
    pub undecodable: AtomicU64,
}

impl DecodeCounters {
    pub fn decoded(&self) -> u64 {
        self.decoded.load(Ordering::Relaxed)
    }

    pub fn undecodable(&self) -> u64 {
        self.undecodable.load(Ordering::Relaxed)
    }
}

/// Filters by contract address (case-insensitively, since `Address`
/// equality is already byte-wise) and decodes against the closed event set.
/// Unknown topics or decode failures return `None` and bump the
/// undecodable counter; they never abort the caller's batch (`spec.md` §4.1).
pub fn decode_log(log: &Log, contract_address: Address, counters: &DecodeCounters) -> Option<DecodedEvent> {
    if log.address() != contract_address {
        return None;
    }
    let Some(topic0) = log.topic0().copied() else {
        counters.undecodable.fetch_add(1, Ordering::Relaxed);
        return None;
    };

    let decoded = match topic0 {
        t if t == abi::TaskCreated::SIGNATURE_HASH => abi::TaskCreated::decode_log(&log.inner, true)
            .ok()
            .map(|e| DecodedEvent::TaskCreated {
                task_id: TaskId(e.taskId),
                requester: e.requester,
                payout_amount: U256::from(e.payoutAmount),
                max_winners: e.maxWinners,
                deadline: u64::try_from(e.deadline).unwrap_or(u64::MAX),
                spec_hash: e.specHash,
            }),
        t if t == abi::TaskFunded::SIGNATURE_HASH => abi::TaskFunded::decode_log(&log.inner, true)
            .ok()
            .map(|e| DecodedEvent::TaskFunded {
                task_id: TaskId(e.taskId),
                requester: e.requester,
                escrowed_amount: e.escrowedAmount,
                deposit_fee_paid: e.depositFeePaid,
            }),
        t if t == abi::Claimed::SIGNATURE_HASH => abi::Claimed::decode_log(&log.inner, true)
            .ok()
            .map(|e| DecodedEvent::Claimed {
                task_id: TaskId(e.taskId),
                submission_id: e.submissionId,
                agent: e.agent,
            }),
        t if t == abi::ProofSubmitted::SIGNATURE_HASH => abi::ProofSubmitted::decode_log(&log.inner, true)
            .ok()
            .map(|e| DecodedEvent::ProofSubmitted {
                task_id: TaskId(e.taskId),
                submission_id: e.submissionId,
                agent: e.agent,
                proof_hash: e.proofHash,
            }),
        t if t == abi::Approved::SIGNATURE_HASH => abi::Approved::decode_log(&log.inner, true)
            .ok()
            .map(|e| DecodedEvent::Approved {
                task_id: TaskId(e.taskId),
                submission_id: e.submissionId,
            }),
        t if t == abi::Rejected::SIGNATURE_HASH => abi::Rejected::decode_log(&log.inner, true)
            .ok()
            .map(|e| DecodedEvent::Rejected {
                task_id: TaskId(e.taskId),
                submission_id: e.submissionId,
            }),
        t if t == abi::Withdrawn::SIGNATURE_HASH => abi::Withdrawn::decode_log(&log.inner, true)
            .ok()
            .map(|e| DecodedEvent::Withdrawn {
                task_id: TaskId(e.taskId),
                submission_id: e.submissionId,
                agent: e.agent,
                net_payout: e.netPayout,
                recipient_fee: e.recipientFee,
            }),
        t if t == abi::DisputeOpened::SIGNATURE_HASH => abi::DisputeOpened::decode_log(&log.inner, true)
            .ok()
            .map(|e| DecodedEvent::DisputeOpened {
                task_id: TaskId(e.taskId),
                submission_id: e.submissionId,
            }),
        t if t == abi::DisputeResolved::SIGNATURE_HASH => abi::DisputeResolved::decode_log(&log.inner, true)
            .ok()
            .map(|e| DecodedEvent::DisputeResolved {
                task_id: TaskId(e.taskId),
                submission_id: e.submissionId,
                approved: e.approved,
            }),
        t if t == abi::TaskClosed::SIGNATURE_HASH => abi::TaskClosed::decode_log(&log.inner, true)
            .ok()
            .map(|e| DecodedEvent::TaskClosed {
                task_id: TaskId(e.taskId),
                requester: e.requester,
                refunded: e.refunded,
            }),
        t if t == abi::TaskCancelled::SIGNATURE_HASH => abi::TaskCancelled::decode_log(&log.inner, true)
            .ok()
            .map(|e| DecodedEvent::TaskCancelled {
                task_id: TaskId(e.taskId),
                requester: e.requester,
                refunded: e.refunded,
            }),
        t if t == abi::TaskRefunded::SIGNATURE_HASH => abi::TaskRefunded::decode_log(&log.inner, true)
            .ok()
            .map(|e| DecodedEvent::TaskRefunded {
                task_id: TaskId(e.taskId),
                requester: e.requester,
                refunded: e.refunded,
                reason: e.reason,
            }),
        _ => None,
    };

    match decoded {
        Some(event) => {
            counters.decoded.fetch_add(1, Ordering::Relaxed);
            Some(event)
        }
        None => {
            counters.undecodable.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(topic0 = %topic0, "undecodable log");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{address, b256, LogData};
    use alloy::rpc::types::Log as RpcLog;

    fn make_log(address: Address, data: LogData) -> Log {
        RpcLog {
            inner: alloy::primitives::Log { address, data },
            block_hash: Some(B256::ZERO),
            block_number: Some(1),
            block_timestamp: None,
            transaction_hash: Some(B256::ZERO),
            transaction_index: Some(0),
            log_index: Some(0),
            removed: false,
        }
    }

    #[test]
    fn decodes_task_created_and_extracts_task_id() {
        let contract = address!("000000000000000000000000000000000000aa");
        let event = abi::TaskCreated {
            taskId: U256::from(7u64),
            requester: address!("00000000000000000000000000000000000001"),
            payoutAmount: 100_000_000u128,
            maxWinners: 1,
            deadline: alloy::primitives::Uint::<40, 1>::from(1_999_000_000u64),
            specHash: b256!("1111111111111111111111111111111111111111111111111111111111111111").into(),
        };
        let log_data = event.encode_log_data();
        let log = make_log(contract, log_data);
        let counters = DecodeCounters::default();

        let decoded = decode_log(&log, contract, &counters).expect("should decode");
        assert_eq!(decoded.name(), "TaskCreated");
        assert_eq!(decoded.task_id(), Some(TaskId(U256::from(7u64))));
        assert_eq!(counters.decoded(), 1);
        assert_eq!(counters.undecodable(), 0);
    }

    #[test]
    fn wrong_contract_address_is_ignored_without_counting() {
        let contract = address!("000000000000000000000000000000000000aa");
        let other = address!("00000000000000000000000000000000000bbb");
        let event = abi::Claimed {
            taskId: U256::from(1u64),
            submissionId: U256::from(1u64),
            agent: address!("00000000000000000000000000000000000002"),
        };
        let log = make_log(other, event.encode_log_data());
        let counters = DecodeCounters::default();
        assert!(decode_log(&log, contract, &counters).is_none());
        assert_eq!(counters.decoded(), 0);
        assert_eq!(counters.undecodable(), 0);
    }

    #[test]
    fn unknown_topic_is_undecodable_but_does_not_panic() {
        let contract = address!("000000000000000000000000000000000000aa");
        let log_data = LogData::new(
            vec![b256!("2222222222222222222222222222222222222222222222222222222222222222")],
            Default::default(),
        )
        .unwrap();
        let log = make_log(contract, log_data);
        let counters = DecodeCounters::default();
        assert!(decode_log(&log, contract, &counters).is_none());
        assert_eq!(counters.undecodable(), 1);
    }
}
