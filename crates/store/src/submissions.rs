//! `SubmissionProjection` writes and reads (`spec.md` §4.3, §4.6).

use crate::error::StoreError;
use crate::models::{decimal_to_u256, u256_to_decimal};
use alloy_primitives::U256;
use bigdecimal::BigDecimal;
use clawed_types::SubmissionStatus;
use sqlx::{FromRow, PgConnection};

/// `Claimed(taskId, submissionId, agent)` (`spec.md` §4.3): `agent` is set
/// once here and never changes afterward.
#[allow(clippy::too_many_arguments)]
pub async fn apply_claimed(
    conn: &mut PgConnection,
    chain_id: i64,
    contract_address: &str,
    task_id: &str,
    submission_id: U256,
    agent: &str,
    block_number: i64,
    tx_hash: &str,
) -> Result<(), StoreError> {
    sqlx::query(
        r#"INSERT INTO escrow_submissions
             (chain_id, contract_address, task_id, submission_id, agent, status,
              created_block, created_tx, updated_block, updated_tx)
           VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $7, $8)
           ON CONFLICT (chain_id, contract_address, task_id, submission_id) DO UPDATE SET
             agent = COALESCE(escrow_submissions.agent, EXCLUDED.agent),
             created_block = COALESCE(escrow_submissions.created_block, EXCLUDED.created_block),
             created_tx = COALESCE(escrow_submissions.created_tx, EXCLUDED.created_tx),
             updated_block = EXCLUDED.updated_block,
             updated_tx = EXCLUDED.updated_tx"#,
    )
    .bind(chain_id)
    .bind(contract_address)
    .bind(task_id)
    .bind(u256_to_decimal(submission_id))
    .bind(agent)
    .bind(SubmissionStatus::Claimed.as_i16())
    .bind(block_number)
    .bind(tx_hash)
    .execute(conn)
    .await?;
    Ok(())
}

/// `ProofSubmitted(taskId, submissionId, agent, proofHash)` (`spec.md` §4.3):
/// `proof_hash` is set here only; later events never overwrite it.
#[allow(clippy::too_many_arguments)]
pub async fn apply_proof_submitted(
    conn: &mut PgConnection,
    chain_id: i64,
    contract_address: &str,
    task_id: &str,
    submission_id: U256,
    proof_hash: &str,
    submitted_at: Option<i64>,
    block_number: i64,
    tx_hash: &str,
) -> Result<(), StoreError> {
    sqlx::query(
        r#"INSERT INTO escrow_submissions
             (chain_id, contract_address, task_id, submission_id, status, proof_hash, submitted_at,
              created_block, created_tx, updated_block, updated_tx)
           VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $8, $9)
           ON CONFLICT (chain_id, contract_address, task_id, submission_id) DO UPDATE SET
             status = $5,
             proof_hash = COALESCE(escrow_submissions.proof_hash, EXCLUDED.proof_hash),
             submitted_at = COALESCE(escrow_submissions.submitted_at, EXCLUDED.submitted_at),
             updated_block = EXCLUDED.updated_block,
             updated_tx = EXCLUDED.updated_tx"#,
    )
    .bind(chain_id)
    .bind(contract_address)
    .bind(task_id)
    .bind(u256_to_decimal(submission_id))
    .bind(SubmissionStatus::Submitted.as_i16())
    .bind(proof_hash)
    .bind(submitted_at)
    .bind(block_number)
    .bind(tx_hash)
    .execute(conn)
    .await?;
    Ok(())
}

async fn set_submission_status(
    conn: &mut PgConnection,
    chain_id: i64,
    contract_address: &str,
    task_id: &str,
    submission_id: U256,
    status: SubmissionStatus,
    block_number: i64,
    tx_hash: &str,
) -> Result<(), StoreError> {
    sqlx::query(
        r#"INSERT INTO escrow_submissions
             (chain_id, contract_address, task_id, submission_id, status, created_block, created_tx, updated_block, updated_tx)
           VALUES ($1, $2, $3, $4, $5, $6, $7, $6, $7)
           ON CONFLICT (chain_id, contract_address, task_id, submission_id) DO UPDATE SET
             status = EXCLUDED.status,
             updated_block = EXCLUDED.updated_block,
             updated_tx = EXCLUDED.updated_tx"#,
    )
    .bind(chain_id)
    .bind(contract_address)
    .bind(task_id)
    .bind(u256_to_decimal(submission_id))
    .bind(status.as_i16())
    .bind(block_number)
    .bind(tx_hash)
    .execute(conn)
    .await?;
    Ok(())
}

pub async fn apply_approved(
    conn: &mut PgConnection,
    chain_id: i64,
    contract_address: &str,
    task_id: &str,
    submission_id: U256,
    block_number: i64,
    tx_hash: &str,
) -> Result<(), StoreError> {
    set_submission_status(conn, chain_id, contract_address, task_id, submission_id, SubmissionStatus::Approved, block_number, tx_hash).await
}

pub async fn apply_rejected(
    conn: &mut PgConnection,
    chain_id: i64,
    contract_address: &str,
    task_id: &str,
    submission_id: U256,
    block_number: i64,
    tx_hash: &str,
) -> Result<(), StoreError> {
    set_submission_status(conn, chain_id, contract_address, task_id, submission_id, SubmissionStatus::Rejected, block_number, tx_hash).await
}

pub async fn apply_disputed(
    conn: &mut PgConnection,
    chain_id: i64,
    contract_address: &str,
    task_id: &str,
    submission_id: U256,
    block_number: i64,
    tx_hash: &str,
) -> Result<(), StoreError> {
    set_submission_status(conn, chain_id, contract_address, task_id, submission_id, SubmissionStatus::Disputed, block_number, tx_hash).await
}

pub async fn apply_withdrawn(
    conn: &mut PgConnection,
    chain_id: i64,
    contract_address: &str,
    task_id: &str,
    submission_id: U256,
    block_number: i64,
    tx_hash: &str,
) -> Result<(), StoreError> {
    set_submission_status(conn, chain_id, contract_address, task_id, submission_id, SubmissionStatus::Withdrawn, block_number, tx_hash).await
}

#[derive(Debug, Clone, FromRow)]
struct SubmissionRowSql {
    submission_id: BigDecimal,
    agent: Option<String>,
    status: i16,
    submitted_at: Option<i64>,
    proof_hash: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SubmissionView {
    pub submission_id: U256,
    pub agent: Option<String>,
    pub status: i16,
    pub submitted_at: Option<i64>,
    pub proof_hash: Option<String>,
}

/// Hard cap on one page of `GET /tasks/{id}/submissions` (`spec.md` §9
/// "Unbounded submissions" resolution, `SPEC_FULL.md` §9: "paginates with a
/// 500-row cap and a `cursor` query parameter").
pub const SUBMISSIONS_PAGE_LIMIT: i64 = 500;

/// `GET /tasks/{id}/submissions` (`spec.md` §4.5/§4.6): ordered by numeric
/// `submission_id` ascending, capped at `SUBMISSIONS_PAGE_LIMIT` rows.
/// `cursor` is the last `submission_id` seen on the previous page — only
/// submissions after it are returned. Proof-text gating happens at the API
/// layer, which separately queries `proofs::latest_proof_text`.
pub async fn list_submissions_for_task(
    conn: &mut PgConnection,
    chain_id: i64,
    contract_address: &str,
    task_id: &str,
    cursor: Option<U256>,
) -> Result<Vec<SubmissionView>, StoreError> {
    let cursor_decimal = cursor.map(u256_to_decimal);
    let rows = sqlx::query_as::<_, SubmissionRowSql>(
        r#"SELECT submission_id, agent, status, submitted_at, proof_hash
           FROM escrow_submissions
           WHERE chain_id = $1 AND contract_address = $2 AND task_id = $3
             AND ($4::numeric IS NULL OR submission_id > $4)
           ORDER BY submission_id ASC
           LIMIT $5"#,
    )
    .bind(chain_id)
    .bind(contract_address)
    .bind(task_id)
    .bind(cursor_decimal)
    .bind(SUBMISSIONS_PAGE_LIMIT)
    .fetch_all(conn)
    .await?;
    Ok(rows
        .into_iter()
        .map(|r| SubmissionView {
            submission_id: decimal_to_u256(&r.submission_id),
            agent: r.agent,
            status: r.status,
            submitted_at: r.submitted_at,
            proof_hash: r.proof_hash,
        })
        .collect())
}

#[derive(Debug, Clone, FromRow)]
pub struct SubmissionIdentityRow {
    pub agent: Option<String>,
    pub proof_hash: Option<String>,
}

pub async fn get_submission_identity(
    conn: &mut PgConnection,
    chain_id: i64,
    contract_address: &str,
    task_id: &str,
    submission_id: U256,
) -> Result<Option<SubmissionIdentityRow>, StoreError> {
    let row = sqlx::query_as::<_, SubmissionIdentityRow>(
        r#"SELECT agent, proof_hash FROM escrow_submissions
           WHERE chain_id = $1 AND contract_address = $2 AND task_id = $3 AND submission_id = $4"#,
    )
    .bind(chain_id)
    .bind(contract_address)
    .bind(task_id)
    .bind(u256_to_decimal(submission_id))
    .fetch_optional(conn)
    .await?;
    Ok(row)
}
