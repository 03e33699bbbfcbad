//! `OffchainTaskMetadata` (`spec.md` §3, §4.5): one upserted row per task.

use crate::error::StoreError;
use crate::models::TaskMetadataRow;
use sqlx::{FromRow, PgConnection};

pub async fn upsert_task_metadata(
    conn: &mut PgConnection,
    chain_id: i64,
    contract_address: &str,
    row: &TaskMetadataRow,
) -> Result<(), StoreError> {
    sqlx::query(
        r#"INSERT INTO escrow_task_metadata
             (chain_id, contract_address, task_id, spec_hash, title, instructions, created_by, updated_at)
           VALUES ($1, $2, $3, $4, $5, $6, $7, now())
           ON CONFLICT (chain_id, contract_address, task_id) DO UPDATE SET
             spec_hash = EXCLUDED.spec_hash,
             title = EXCLUDED.title,
             instructions = EXCLUDED.instructions,
             updated_at = now()"#,
    )
    .bind(chain_id)
    .bind(contract_address)
    .bind(&row.task_id)
    .bind(&row.spec_hash)
    .bind(&row.title)
    .bind(&row.instructions)
    .bind(&row.created_by)
    .execute(conn)
    .await?;
    Ok(())
}

#[derive(Debug, Clone, FromRow)]
pub struct TaskMetadataView {
    pub title: String,
    pub instructions: String,
}

pub async fn get_task_metadata(
    conn: &mut PgConnection,
    chain_id: i64,
    contract_address: &str,
    task_id: &str,
) -> Result<Option<TaskMetadataView>, StoreError> {
    let row = sqlx::query_as::<_, TaskMetadataView>(
        r#"SELECT title, instructions FROM escrow_task_metadata
           WHERE chain_id = $1 AND contract_address = $2 AND task_id = $3"#,
    )
    .bind(chain_id)
    .bind(contract_address)
    .bind(task_id)
    .fetch_optional(conn)
    .await?;
    Ok(row)
}
