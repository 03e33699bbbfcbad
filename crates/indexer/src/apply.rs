//! Maps one decoded log to its `EventRecord` insert plus projection
//! side-effects (`spec.md` §4.3), gated on first observation so duplicate
//! delivery from both the poll loop and the live tail is a no-op
//! (`spec.md` §5, invariant 1 "Idempotence").

use crate::error::IndexerError;
use clawed_chain::DecodedEvent;
use clawed_store::models::EventRow;
use clawed_store::{events, submissions, tasks};
use clawed_types::{decimal_string, Provenance};
use serde_json::json;
use sqlx::PgConnection;

fn event_args(event: &DecodedEvent) -> serde_json::Value {
    match event {
        DecodedEvent::TaskCreated { requester, payout_amount, max_winners, deadline, spec_hash, .. } => json!({
            "requester": format!("{requester:#x}"),
            "payoutAmount": decimal_string(*payout_amount),
            "maxWinners": max_winners,
            "deadline": deadline,
            "specHash": format!("{spec_hash:#x}"),
        }),
        DecodedEvent::TaskFunded { requester, escrowed_amount, deposit_fee_paid, .. } => json!({
            "requester": format!("{requester:#x}"),
            "escrowedAmount": decimal_string(*escrowed_amount),
            "depositFeePaid": decimal_string(*deposit_fee_paid),
        }),
        DecodedEvent::Claimed { submission_id, agent, .. } => json!({
            "submissionId": decimal_string(*submission_id),
            "agent": format!("{agent:#x}"),
        }),
        DecodedEvent::ProofSubmitted { submission_id, agent, proof_hash, .. } => json!({
            "submissionId": decimal_string(*submission_id),
            "agent": format!("{agent:#x}"),
            "proofHash": format!("{proof_hash:#x}"),
        }),
        DecodedEvent::Approved { submission_id, .. } => json!({ "submissionId": decimal_string(*submission_id) }),
        DecodedEvent::Rejected { submission_id, .. } => json!({ "submissionId": decimal_string(*submission_id) }),
        DecodedEvent::Withdrawn { submission_id, agent, net_payout, recipient_fee, .. } => json!({
            "submissionId": decimal_string(*submission_id),
            "agent": format!("{agent:#x}"),
            "netPayout": decimal_string(*net_payout),
            "recipientFee": decimal_string(*recipient_fee),
        }),
        DecodedEvent::DisputeOpened { submission_id, .. } => json!({ "submissionId": decimal_string(*submission_id) }),
        DecodedEvent::DisputeResolved { submission_id, approved, .. } => json!({
            "submissionId": decimal_string(*submission_id),
            "approved": approved,
        }),
        DecodedEvent::TaskClosed { requester, refunded, .. } => json!({
            "requester": format!("{requester:#x}"),
            "refunded": decimal_string(*refunded),
        }),
        DecodedEvent::TaskCancelled { requester, refunded, .. } => json!({
            "requester": format!("{requester:#x}"),
            "refunded": decimal_string(*refunded),
        }),
        DecodedEvent::TaskRefunded { requester, refunded, reason, .. } => json!({
            "requester": format!("{requester:#x}"),
            "refunded": decimal_string(*refunded),
            "reason": reason,
        }),
    }
}

/// Applies one decoded log within the caller's transaction. `spec.md` §5:
/// "all writes that touch related rows... execute within a single
/// transaction per log to preserve the invariant 'if the event record
/// exists, its projection side-effect has been applied'".
pub async fn apply_event(
    conn: &mut PgConnection,
    chain_id: i64,
    contract_address: &str,
    event: &DecodedEvent,
    provenance: &Provenance,
) -> Result<(), IndexerError> {
    let task_id = event.task_id().map(|t| t.to_string());
    let tx_hash = format!("{:#x}", provenance.tx_hash);
    let block_hash = format!("{:#x}", provenance.block_hash);

    let row = EventRow {
        tx_hash: tx_hash.clone(),
        log_index: provenance.log_index as i64,
        block_number: provenance.block_number as i64,
        block_hash,
        event_name: event.name().to_string(),
        task_id: task_id.clone(),
        args: event_args(event),
    };

    let is_new = events::insert_event(conn, chain_id, contract_address, &row).await?;
    if !is_new {
        return Ok(());
    }

    let Some(task_id) = task_id else {
        return Ok(());
    };
    let block_number = provenance.block_number as i64;

    match event {
        DecodedEvent::TaskCreated { requester, payout_amount, max_winners, deadline, spec_hash, .. } => {
            tasks::apply_task_created(
                conn,
                chain_id,
                contract_address,
                &task_id,
                &format!("{requester:#x}"),
                u128::try_from(*payout_amount).unwrap_or(u128::MAX),
                *max_winners,
                *deadline,
                &format!("{spec_hash:#x}"),
                block_number,
                &tx_hash,
            )
            .await?;
        }
        DecodedEvent::TaskFunded { requester, escrowed_amount, .. } => {
            tasks::apply_task_funded(
                conn,
                chain_id,
                contract_address,
                &task_id,
                &format!("{requester:#x}"),
                *escrowed_amount,
                block_number,
                &tx_hash,
            )
            .await?;
        }
        DecodedEvent::Claimed { submission_id, agent, .. } => {
            submissions::apply_claimed(conn, chain_id, contract_address, &task_id, *submission_id, &format!("{agent:#x}"), block_number, &tx_hash)
                .await?;
            tasks::increment_claim_count(conn, chain_id, contract_address, &task_id).await?;
        }
        DecodedEvent::ProofSubmitted { submission_id, proof_hash, .. } => {
            submissions::apply_proof_submitted(
                conn,
                chain_id,
                contract_address,
                &task_id,
                *submission_id,
                &format!("{proof_hash:#x}"),
                None,
                block_number,
                &tx_hash,
            )
            .await?;
            tasks::increment_pending_and_submission_count(conn, chain_id, contract_address, &task_id).await?;
        }
        DecodedEvent::Approved { submission_id, .. } => {
            submissions::apply_approved(conn, chain_id, contract_address, &task_id, *submission_id, block_number, &tx_hash).await?;
            tasks::record_approval(conn, chain_id, contract_address, &task_id).await?;
        }
        DecodedEvent::Rejected { submission_id, .. } => {
            submissions::apply_rejected(conn, chain_id, contract_address, &task_id, *submission_id, block_number, &tx_hash).await?;
            tasks::record_rejection(conn, chain_id, contract_address, &task_id).await?;
        }
        DecodedEvent::Withdrawn { submission_id, .. } => {
            submissions::apply_withdrawn(conn, chain_id, contract_address, &task_id, *submission_id, block_number, &tx_hash).await?;
            tasks::record_withdrawal(conn, chain_id, contract_address, &task_id).await?;
        }
        DecodedEvent::DisputeOpened { submission_id, .. } => {
            submissions::apply_disputed(conn, chain_id, contract_address, &task_id, *submission_id, block_number, &tx_hash).await?;
        }
        DecodedEvent::DisputeResolved { submission_id, approved, .. } => {
            if *approved {
                submissions::apply_approved(conn, chain_id, contract_address, &task_id, *submission_id, block_number, &tx_hash).await?;
                tasks::record_approval(conn, chain_id, contract_address, &task_id).await?;
            } else {
                submissions::apply_rejected(conn, chain_id, contract_address, &task_id, *submission_id, block_number, &tx_hash).await?;
                tasks::record_rejection(conn, chain_id, contract_address, &task_id).await?;
            }
        }
        DecodedEvent::TaskCancelled { .. } | DecodedEvent::TaskRefunded { .. } => {
            tasks::apply_task_cancelled(conn, chain_id, contract_address, &task_id, block_number, &tx_hash).await?;
        }
        DecodedEvent::TaskClosed { .. } => {
            tasks::apply_task_closed(conn, chain_id, contract_address, &task_id, block_number, &tx_hash).await?;
        }
    }

    Ok(())
}
