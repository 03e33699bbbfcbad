//! `OffchainProof` (`spec.md` §3, §4.5): append-only history per submission.

use crate::error::StoreError;
use crate::models::{u256_to_decimal, ProofRow};
use alloy_primitives::U256;
use sqlx::{FromRow, PgConnection};

pub async fn insert_proof(
    conn: &mut PgConnection,
    chain_id: i64,
    contract_address: &str,
    row: &ProofRow,
) -> Result<(), StoreError> {
    sqlx::query(
        r#"INSERT INTO escrow_submission_proofs
             (chain_id, contract_address, task_id, submission_id, wallet, proof_text, proof_hash, tx_hash)
           VALUES ($1, $2, $3, $4, $5, $6, $7, $8)"#,
    )
    .bind(chain_id)
    .bind(contract_address)
    .bind(&row.task_id)
    .bind(&row.submission_id)
    .bind(&row.wallet)
    .bind(&row.proof_text)
    .bind(&row.proof_hash)
    .bind(&row.tx_hash)
    .execute(conn)
    .await?;
    Ok(())
}

#[derive(Debug, Clone, FromRow)]
struct ProofTextRow {
    proof_text: String,
}

/// Latest `proof_text` for a submission, used by the Read API's privacy
/// gate (`spec.md` §4.5 "returns the latest proof_text only when..."). The
/// caller decides whether the requester is entitled to see it.
pub async fn latest_proof_text(
    conn: &mut PgConnection,
    chain_id: i64,
    contract_address: &str,
    task_id: &str,
    submission_id: U256,
) -> Result<Option<String>, StoreError> {
    let row = sqlx::query_as::<_, ProofTextRow>(
        r#"SELECT proof_text FROM escrow_submission_proofs
           WHERE chain_id = $1 AND contract_address = $2 AND task_id = $3 AND submission_id = $4
           ORDER BY created_at DESC LIMIT 1"#,
    )
    .bind(chain_id)
    .bind(contract_address)
    .bind(task_id)
    .bind(u256_to_decimal(submission_id))
    .fetch_optional(conn)
    .await?;
    Ok(row.map(|r| r.proof_text))
}
