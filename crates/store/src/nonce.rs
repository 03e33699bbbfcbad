//! `UsedNonce` (`spec.md` §3, §4.4): TTL-bounded anti-replay set.

use crate::error::StoreError;
use chrono::{DateTime, Utc};
use sqlx::PgConnection;

/// Peeks whether `nonce` is already present, without consuming it
/// (`spec.md` §4.4 step 4 "Nonce is not in UsedNonce" must be checked before
/// step 5's signature recovery). Racing this against a concurrent request for
/// the same nonce can both see "unused" — `try_consume_nonce`'s atomic insert
/// is still what makes replay of a *valid* request race-safe.
pub async fn nonce_is_used(conn: &mut PgConnection, nonce: &str) -> Result<bool, StoreError> {
    let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM escrow_used_nonces WHERE nonce = $1)")
        .bind(nonce)
        .fetch_one(conn)
        .await?;
    Ok(exists)
}

/// Inserts the nonce if unused; returns `false` if it was already present
/// (`spec.md` §4.4 step 4 "Nonce is not in UsedNonce"). The unique
/// constraint on `nonce` makes concurrent replay attempts race-safe.
pub async fn try_consume_nonce(
    conn: &mut PgConnection,
    nonce: &str,
    expires_at: DateTime<Utc>,
) -> Result<bool, StoreError> {
    let result = sqlx::query(
        r#"INSERT INTO escrow_used_nonces (nonce, expires_at) VALUES ($1, $2)
           ON CONFLICT (nonce) DO NOTHING"#,
    )
    .bind(nonce)
    .bind(expires_at)
    .execute(conn)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Periodic sweep so the table doesn't grow unbounded (`spec.md` §5 "periodic
/// TTL sweep").
pub async fn sweep_expired_nonces(conn: &mut PgConnection, now: DateTime<Utc>) -> Result<u64, StoreError> {
    let result = sqlx::query("DELETE FROM escrow_used_nonces WHERE expires_at < $1")
        .bind(now)
        .execute(conn)
        .await?;
    Ok(result.rows_affected())
}
