//! Append-only `EventRecord` journal (`spec.md` §3). Primary key
//! `(chain_id, contract_address, tx_hash, log_index)` makes inserts
//! idempotent by construction.

use crate::error::StoreError;
use crate::models::EventRow;
use sqlx::{FromRow, PgConnection};

/// Returns `true` when a new row was actually inserted, `false` when the
/// primary key already existed (`spec.md` §4.2 step 7 "insert the
/// EventRecord (idempotent)"). Callers should gate projection side-effects
/// on this to make re-delivery by both the poll loop and the live tail safe
/// (`spec.md` §5 "no ordering is guaranteed... relies on per-log idempotence").
pub async fn insert_event(
    conn: &mut PgConnection,
    chain_id: i64,
    contract_address: &str,
    row: &EventRow,
) -> Result<bool, StoreError> {
    let result = sqlx::query(
        r#"INSERT INTO escrow_events
             (chain_id, contract_address, tx_hash, log_index, block_number, block_hash, event_name, task_id, args)
           VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
           ON CONFLICT (chain_id, contract_address, tx_hash, log_index) DO NOTHING"#,
    )
    .bind(chain_id)
    .bind(contract_address)
    .bind(&row.tx_hash)
    .bind(row.log_index)
    .bind(row.block_number)
    .bind(&row.block_hash)
    .bind(&row.event_name)
    .bind(&row.task_id)
    .bind(&row.args)
    .execute(conn)
    .await?;
    Ok(result.rows_affected() > 0)
}

#[derive(Debug, Clone, FromRow)]
pub struct EventJournalRow {
    pub block_number: i64,
    pub log_index: i64,
    pub event_name: String,
    pub task_id: Option<String>,
    pub args: serde_json::Value,
    pub tx_hash: String,
}

/// `GET /tasks/{id}/events` (`spec.md` §4.6), ordered `(block_number, log_index)`.
pub async fn list_events_for_task(
    conn: &mut PgConnection,
    chain_id: i64,
    contract_address: &str,
    task_id: &str,
) -> Result<Vec<EventJournalRow>, StoreError> {
    let rows = sqlx::query_as::<_, EventJournalRow>(
        r#"SELECT block_number, log_index, event_name, task_id, args, tx_hash
           FROM escrow_events
           WHERE chain_id = $1 AND contract_address = $2 AND task_id = $3
           ORDER BY block_number ASC, log_index ASC"#,
    )
    .bind(chain_id)
    .bind(contract_address)
    .bind(task_id)
    .fetch_all(conn)
    .await?;
    Ok(rows)
}
