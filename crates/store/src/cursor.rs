//! `IndexerCursor` (`spec.md` §3): one row per `(chain_id, contract_address)`.

use crate::error::StoreError;
use sqlx::{PgConnection, Row};

pub async fn get_cursor(
    conn: &mut PgConnection,
    chain_id: i64,
    contract_address: &str,
) -> Result<Option<i64>, StoreError> {
    let row = sqlx::query(
        r#"SELECT last_processed_block FROM escrow_indexer_cursor
           WHERE chain_id = $1 AND contract_address = $2"#,
    )
    .bind(chain_id)
    .bind(contract_address)
    .fetch_optional(conn)
    .await?;
    Ok(row.map(|r| r.get::<i64, _>("last_processed_block")))
}

/// Upserts the cursor. Callers are responsible for never passing a value
/// lower than the previously persisted one (`spec.md` §3 monotonicity).
pub async fn set_cursor(
    conn: &mut PgConnection,
    chain_id: i64,
    contract_address: &str,
    last_processed_block: i64,
) -> Result<(), StoreError> {
    sqlx::query(
        r#"INSERT INTO escrow_indexer_cursor (chain_id, contract_address, last_processed_block, updated_at)
           VALUES ($1, $2, $3, now())
           ON CONFLICT (chain_id, contract_address)
           DO UPDATE SET last_processed_block = EXCLUDED.last_processed_block, updated_at = now()"#,
    )
    .bind(chain_id)
    .bind(contract_address)
    .bind(last_processed_block)
    .execute(conn)
    .await?;
    Ok(())
}
