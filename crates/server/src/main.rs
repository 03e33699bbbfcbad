//! Binary entry point: loads config, connects the store and chain source,
//! builds the indexer engine, and runs the backfill loop, optional live
//! tail, and the `axum` server as three cooperating tasks (`spec.md` §5).

mod config;

use clap::Parser;
use clawed_api::AppState;
use clawed_auth::AuthConfig;
use clawed_chain::{fetch_escrow_view, HttpChainSource};
use clawed_indexer::{IndexerConfig, IndexerEngine};
use clawed_store::PgStore;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let config = config::Config::parse();

    let store = PgStore::connect(&config.database_url).await?;
    store.migrate().await?;

    let chain = Arc::new(HttpChainSource::connect(config.chain_rpc_url.clone()));
    let escrow_view = fetch_escrow_view(chain.provider().clone(), config.escrow_contract_address).await?;

    let indexer_config = IndexerConfig {
        chain_id: config.chain_id,
        contract_address: config.escrow_contract_address,
        confirmations: config.indexer_confirmations,
        batch_blocks: config.indexer_batch_blocks,
        poll_interval_ms: config.indexer_poll_interval_ms,
        far_behind_threshold: config.far_behind_threshold,
        bootstrap_tail_blocks: config.bootstrap_tail_blocks,
        force_from_block: config.force_from_block,
    };
    let engine = Arc::new(IndexerEngine::new(chain, store.clone(), indexer_config));

    let auth_config = AuthConfig { signature_window_ms: config.signature_window_ms, nonce_ttl_ms: config.nonce_ttl_ms };

    let state = AppState {
        store,
        auth_config,
        chain_id: config.chain_id,
        contract_address: config.escrow_contract_address,
        contract_address_str: format!("{:#x}", config.escrow_contract_address),
        indexer_status: engine.clone(),
        escrow_view,
        rate_limiter: Arc::new(clawed_api::rate_limit::RateLimiter::new(config.rate_limit_window_ms, config.rate_limit_max)),
        trust_proxy: config.trust_proxy,
    };

    let cancel = CancellationToken::new();

    let backfill_handle = tokio::spawn(engine.clone().run_backfill_loop(cancel.child_token()));

    let live_tail_handle = config.chain_rpc_ws_url.clone().map(|ws_url| tokio::spawn(engine.clone().run_live_tail(ws_url, cancel.child_token())));

    let app = clawed_api::build_router(state);
    let listener = tokio::net::TcpListener::bind(config.http_bind_addr).await?;
    tracing::info!(addr = %config.http_bind_addr, "clawed-server listening");

    let server_cancel = cancel.child_token();
    let server = axum::serve(listener, app.into_make_service_with_connect_info::<std::net::SocketAddr>())
        .with_graceful_shutdown(async move { server_cancel.cancelled().await });

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!(error = %e, "http server error");
            }
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("shutdown signal received");
        }
    }

    cancel.cancel();
    backfill_handle.await.ok();
    if let Some(handle) = live_tail_handle {
        handle.await.ok();
    }

    Ok(())
}
