//! Response shapes for the Read API (`spec.md` §4.6 "All responses carry
//! stable shapes; big integers are decimal strings").

use clawed_store::events::EventJournalRow;
use clawed_store::submissions::SubmissionView;
use clawed_store::tasks::TaskRow;
use clawed_types::{SubmissionStatus, TaskStatus};
use serde::Serialize;

fn task_status_name(status: i16) -> &'static str {
    match TaskStatus::from_i16(status) {
        Some(TaskStatus::None) => "none",
        Some(TaskStatus::Created) => "created",
        Some(TaskStatus::Funded) => "funded",
        Some(TaskStatus::Cancelled) => "cancelled",
        Some(TaskStatus::Completed) => "completed",
        Some(TaskStatus::Closed) => "closed",
        None => "unknown",
    }
}

fn submission_status_name(status: i16) -> &'static str {
    match SubmissionStatus::from_i16(status) {
        Some(SubmissionStatus::None) => "none",
        Some(SubmissionStatus::Claimed) => "claimed",
        Some(SubmissionStatus::Submitted) => "submitted",
        Some(SubmissionStatus::Approved) => "approved",
        Some(SubmissionStatus::Rejected) => "rejected",
        Some(SubmissionStatus::Withdrawn) => "withdrawn",
        Some(SubmissionStatus::Disputed) => "disputed",
        None => "unknown",
    }
}

#[derive(Debug, Serialize)]
pub struct TaskDto {
    pub task_id: String,
    pub requester: Option<String>,
    pub spec_hash: Option<String>,
    pub payout_amount: Option<String>,
    pub max_winners: Option<i16>,
    pub deposit_fee_amount: Option<String>,
    pub recipient_fee_amount: Option<String>,
    pub balance: Option<String>,
    pub deadline: Option<i64>,
    pub review_window: Option<i64>,
    pub escalation_window: Option<i64>,
    pub approved_count: i32,
    pub withdrawn_count: i32,
    pub pending_submissions: i32,
    pub submission_count: i64,
    pub claim_count: i64,
    pub status: &'static str,
    pub title: Option<String>,
    pub instructions: Option<String>,
}

impl TaskDto {
    pub fn from_row(row: TaskRow, metadata: Option<(String, String)>) -> Self {
        let (title, instructions) = match metadata {
            Some((t, i)) => (Some(t), Some(i)),
            None => (None, None),
        };
        TaskDto {
            task_id: row.task_id,
            requester: row.requester,
            spec_hash: row.spec_hash,
            payout_amount: row.payout_amount.map(|v| v.to_string()),
            max_winners: row.max_winners,
            deposit_fee_amount: row.deposit_fee_amount.map(|v| v.to_string()),
            recipient_fee_amount: row.recipient_fee_amount.map(|v| v.to_string()),
            balance: row.balance.map(|v| v.to_string()),
            deadline: row.deadline,
            review_window: row.review_window,
            escalation_window: row.escalation_window,
            approved_count: row.approved_count,
            withdrawn_count: row.withdrawn_count,
            pending_submissions: row.pending_submissions,
            submission_count: row.submission_count,
            claim_count: row.claim_count,
            status: task_status_name(row.status),
            title,
            instructions,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SubmissionDto {
    pub submission_id: String,
    pub agent: Option<String>,
    pub status: &'static str,
    pub submitted_at: Option<i64>,
    pub proof_hash: Option<String>,
    pub proof_text: Option<String>,
}

impl SubmissionDto {
    /// `proof_text` is `None` unless the caller already resolved it under
    /// the privacy gate in `spec.md` §4.5.
    pub fn from_view(view: SubmissionView, proof_text: Option<String>) -> Self {
        SubmissionDto {
            submission_id: clawed_types::decimal_string(view.submission_id),
            agent: view.agent,
            status: submission_status_name(view.status),
            submitted_at: view.submitted_at,
            proof_hash: view.proof_hash,
            proof_text,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EventDto {
    pub block_number: i64,
    pub log_index: i64,
    pub event_name: String,
    pub task_id: Option<String>,
    pub tx_hash: String,
    pub args: serde_json::Value,
}

impl From<EventJournalRow> for EventDto {
    fn from(row: EventJournalRow) -> Self {
        EventDto {
            block_number: row.block_number,
            log_index: row.log_index,
            event_name: row.event_name,
            task_id: row.task_id,
            tx_hash: row.tx_hash,
            args: row.args,
        }
    }
}
