//! The backfill polling loop and its one-step algorithm (`spec.md` §4.2).

use crate::apply::apply_event;
use crate::config::IndexerConfig;
use clawed_chain::source::contract_filter;
use clawed_chain::{decode_log, ChainSource, DecodeCounters};
use clawed_store::{cursor, PgStore};
use clawed_types::Provenance;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Debug, Clone, Default)]
pub struct StepResult {
    pub head: u64,
    pub target: u64,
    pub from: u64,
    pub to: u64,
    pub processed: u64,
    pub idle: bool,
}

#[derive(Debug, Clone)]
pub struct IndexerStatus {
    pub head: u64,
    pub cursor: u64,
    pub last_step: Option<StepResult>,
    pub last_error: Option<String>,
    pub logs_decoded: u64,
    pub logs_undecodable: u64,
}

/// One step of the algorithm plus the mutable state it needs between ticks
/// (`spec.md` §9 "Global state... replace with an injectable context"):
/// the `force_from_block` one-shot flag and the last observed head/error,
/// rather than module-level statics.
pub struct IndexerEngine<C: ChainSource> {
    chain: Arc<C>,
    store: PgStore,
    config: Mutex<IndexerConfig>,
    counters: DecodeCounters,
    last_head: AtomicU64,
    last_error: Mutex<Option<String>>,
    last_step: Mutex<Option<StepResult>>,
}

impl<C: ChainSource> IndexerEngine<C> {
    pub fn new(chain: Arc<C>, store: PgStore, config: IndexerConfig) -> Self {
        Self {
            chain,
            store,
            config: Mutex::new(config),
            counters: DecodeCounters::default(),
            last_head: AtomicU64::new(0),
            last_error: Mutex::new(None),
            last_step: Mutex::new(None),
        }
    }

    fn contract_address_str(address: alloy::primitives::Address) -> String {
        format!("{address:#x}")
    }

    /// `spec.md` §4.2 algorithm, steps 1-8.
    pub async fn advance_once(&self) -> StepResult {
        let result = self.try_advance_once().await;
        match result {
            Ok(step) => {
                *self.last_step.lock().await = Some(step.clone());
                *self.last_error.lock().await = None;
                step
            }
            Err(e) => {
                tracing::warn!(error = %e, "indexer step failed, will retry next tick");
                *self.last_error.lock().await = Some(e.to_string());
                StepResult::default()
            }
        }
    }

    async fn try_advance_once(&self) -> Result<StepResult, crate::error::IndexerError> {
        let config = self.config.lock().await.clone();
        let contract = Self::contract_address_str(config.contract_address);

        let head = self.chain.block_number().await?;
        self.last_head.store(head, Ordering::Relaxed);
        let target = head.saturating_sub(config.confirmations);

        let mut conn = self.store.acquire().await?;
        let mut last = cursor::get_cursor(&mut conn, config.chain_id, &contract).await?.map(|v| v as u64).unwrap_or(0);

        if last == 0 || target.saturating_sub(last) > config.far_behind_threshold {
            last = target.saturating_sub(config.bootstrap_tail_blocks);
            cursor::set_cursor(&mut conn, config.chain_id, &contract, last as i64).await?;
            tracing::info!(last, target, "bootstrapped cursor");
        }

        if let Some(force_from) = config.force_from_block {
            let adjusted = last.min(force_from.saturating_sub(1));
            if adjusted != last {
                last = adjusted;
                cursor::set_cursor(&mut conn, config.chain_id, &contract, last as i64).await?;
            }
            self.config.lock().await.force_from_block = None;
        }

        let from = last + 1;
        if from > target {
            return Ok(StepResult { head, target, from, to: last, processed: 0, idle: true });
        }

        let to = target.min(from + config.batch_blocks - 1);
        let filter = contract_filter(config.contract_address, from, to);
        let logs = self.chain.get_logs(&filter).await?;

        let mut tx = self.store.begin().await?;
        let mut processed = 0u64;
        for log in &logs {
            let Some(event) = decode_log(log, config.contract_address, &self.counters) else { continue };
            let provenance = Provenance {
                block_number: log.block_number.unwrap_or(0),
                block_hash: log.block_hash.unwrap_or_default(),
                tx_hash: log.transaction_hash.unwrap_or_default(),
                log_index: log.log_index.unwrap_or(0),
            };
            apply_event(&mut tx, config.chain_id, &contract, &event, &provenance).await?;
            processed += 1;
        }
        cursor::set_cursor(&mut tx, config.chain_id, &contract, to as i64).await?;
        tx.commit().await?;

        Ok(StepResult { head, target, from, to, processed, idle: false })
    }

    /// `spec.md` §4.2 "status() (head, cursor, last step, last error)".
    pub async fn status(&self) -> IndexerStatus {
        let config = self.config.lock().await.clone();
        let contract = Self::contract_address_str(config.contract_address);
        let cursor_value = match self.store.acquire().await {
            Ok(mut conn) => cursor::get_cursor(&mut conn, config.chain_id, &contract).await.ok().flatten().unwrap_or(0) as u64,
            Err(_) => 0,
        };
        IndexerStatus {
            head: self.last_head.load(Ordering::Relaxed),
            cursor: cursor_value,
            last_step: self.last_step.lock().await.clone(),
            last_error: self.last_error.lock().await.clone(),
            logs_decoded: self.counters.decoded(),
            logs_undecodable: self.counters.undecodable(),
        }
    }

    /// Runs `advance_once` on `poll_interval_ms` ticks until cancelled
    /// (`spec.md` §4.2, §5 cooperative concurrency).
    pub async fn run_backfill_loop(self: Arc<Self>, cancel: tokio_util::sync::CancellationToken) {
        let interval_ms = self.config.lock().await.poll_interval_ms;
        let mut ticker = tokio::time::interval(std::time::Duration::from_millis(interval_ms));
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("backfill loop shutting down");
                    return;
                }
                _ = ticker.tick() => {
                    self.advance_once().await;
                }
            }
        }
    }

    /// Optional websocket push path (`spec.md` §4.2 "Live tail (optional)").
    /// Applies each log through the same `apply_event` code path as the
    /// backfill loop and shares its `DecodeCounters`; it never advances the
    /// cursor, since that stays the backfill loop's job.
    pub async fn run_live_tail(self: Arc<Self>, ws_url: url::Url, cancel: tokio_util::sync::CancellationToken) {
        use futures::StreamExt;

        let config = self.config.lock().await.clone();
        let mut stream = match crate::live_tail::subscribe_contract_logs(ws_url, config.contract_address).await {
            Ok(stream) => Box::pin(stream),
            Err(e) => {
                tracing::warn!(error = %e, "live tail subscription failed, running backfill-only");
                return;
            }
        };
        let contract = Self::contract_address_str(config.contract_address);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("live tail shutting down");
                    return;
                }
                maybe_log = stream.next() => {
                    let Some(log) = maybe_log else {
                        tracing::warn!("live tail stream ended");
                        return;
                    };
                    let Some(event) = decode_log(&log, config.contract_address, &self.counters) else { continue };
                    let provenance = Provenance {
                        block_number: log.block_number.unwrap_or(0),
                        block_hash: log.block_hash.unwrap_or_default(),
                        tx_hash: log.transaction_hash.unwrap_or_default(),
                        log_index: log.log_index.unwrap_or(0),
                    };
                    match self.store.begin().await {
                        Ok(mut tx) => {
                            if let Err(e) = apply_event(&mut tx, config.chain_id, &contract, &event, &provenance).await {
                                tracing::warn!(error = %e, "live tail apply failed");
                                continue;
                            }
                            if let Err(e) = tx.commit().await {
                                tracing::warn!(error = %e, "live tail commit failed");
                            }
                        }
                        Err(e) => tracing::warn!(error = %e, "live tail could not start transaction"),
                    }
                }
            }
        }
    }
}

/// Lets `clawed-api` depend on "something with an indexer status" without
/// naming the concrete `ChainSource` implementation.
#[async_trait::async_trait]
pub trait StatusProvider: Send + Sync {
    async fn status(&self) -> IndexerStatus;
}

#[async_trait::async_trait]
impl<C: ChainSource> StatusProvider for IndexerEngine<C> {
    async fn status(&self) -> IndexerStatus {
        IndexerEngine::status(self).await
    }
}
