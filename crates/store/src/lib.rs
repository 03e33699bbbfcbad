pub mod cursor;
pub mod error;
pub mod events;
pub mod metadata;
pub mod models;
pub mod nonce;
pub mod proofs;
pub mod submissions;
pub mod tasks;

pub use error::StoreError;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgConnection, PgPool, Postgres, Transaction};

/// Thin handle around a `sqlx` connection pool (`spec.md` §3 "durable,
/// transactional... store"). All query functions in this crate take a
/// `&mut PgConnection` so callers can choose a pooled connection or a
/// transaction depending on the atomicity they need.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new().max_connections(10).connect(database_url).await?;
        Ok(Self { pool })
    }

    /// Wraps an already-connected pool, e.g. one handed out by
    /// `#[sqlx::test]` in another crate's integration tests.
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// `spec.md` §5 "all writes that touch related rows... execute within a
    /// single transaction per log". Callers apply one log's EventRecord
    /// insert and its projection side-effects through this transaction and
    /// commit once.
    pub async fn begin(&self) -> Result<Transaction<'static, Postgres>, StoreError> {
        Ok(self.pool.begin().await?)
    }

    pub async fn acquire(&self) -> Result<sqlx::pool::PoolConnection<Postgres>, StoreError> {
        Ok(self.pool.acquire().await?)
    }
}

/// Convenience alias so call sites can write `&mut *tx` without naming the
/// concrete `sqlx` transaction type.
pub type Conn = PgConnection;
