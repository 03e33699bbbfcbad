//! End-to-end HTTP scenario tests (`spec.md` §8 S3-S5) driven through the
//! real `axum` router with a real Postgres behind it.

use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::SignerSync;
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use clawed_api::state::AppState;
use clawed_auth::message::{body_sha256_hex, canonical_message};
use clawed_indexer::{IndexerStatus, StatusProvider};
use clawed_store::PgStore;
use sqlx::PgPool;
use std::sync::Arc;
use tower::ServiceExt;

const CHAIN_ID: i64 = 8453;
const CONTRACT: &str = "0x0000000000000000000000000000000000000001";

struct FakeStatus;

#[async_trait]
impl StatusProvider for FakeStatus {
    async fn status(&self) -> IndexerStatus {
        IndexerStatus { head: 0, cursor: 0, last_step: None, last_error: None, logs_decoded: 0, logs_undecodable: 0 }
    }
}

fn test_state(pool: PgPool) -> AppState {
    AppState {
        store: PgStore::from_pool(pool),
        auth_config: clawed_auth::AuthConfig::default(),
        chain_id: CHAIN_ID,
        contract_address: CONTRACT.parse().unwrap(),
        contract_address_str: CONTRACT.to_string(),
        indexer_status: Arc::new(FakeStatus),
        escrow_view: clawed_chain::EscrowView {
            usdc: Address::ZERO,
            treasury: Address::ZERO,
            arbiter: Address::ZERO,
            deposit_fee_bps: 0,
            recipient_fee_bps: 0,
        },
        rate_limiter: Arc::new(clawed_api::rate_limit::RateLimiter::new(60_000, 1_000)),
        trust_proxy: false,
    }
}

fn signed_envelope_headers(signer: &PrivateKeySigner, method: &str, path: &str, body: &[u8], nonce: &str) -> Vec<(&'static str, String)> {
    let timestamp_ms: i64 = 1_700_000_000_000;
    let digest = body_sha256_hex(Some(body).filter(|b| !b.is_empty()));
    let message = canonical_message(method, path, timestamp_ms, nonce, &digest);
    let signature = signer.sign_message_sync(message.as_bytes()).unwrap();
    vec![
        ("wallet-address", format!("{:#x}", signer.address())),
        ("signature", signature.to_string()),
        ("timestamp", timestamp_ms.to_string()),
        ("nonce", nonce.to_string()),
    ]
}

/// S3 (`spec.md` §8): saving metadata with a `specHash` that conflicts with
/// an already-set one is rejected with 409.
#[sqlx::test(migrations = "../store/migrations")]
async fn spec_hash_mismatch_is_rejected(pool: PgPool) -> sqlx::Result<()> {
    let state = test_state(pool);
    let signer = PrivateKeySigner::random();

    {
        let mut conn = state.store.acquire().await.unwrap();
        clawed_store::tasks::apply_task_created(
            &mut conn,
            CHAIN_ID,
            CONTRACT,
            "1",
            &format!("{:#x}", signer.address()),
            1_000_000,
            1,
            9_999_999_999,
            "0xaaaa",
            100,
            "0xcreate",
        )
        .await
        .unwrap();

        let row = clawed_store::models::TaskMetadataRow {
            task_id: "1".to_string(),
            spec_hash: "0xaaaa".to_string(),
            title: "first".to_string(),
            instructions: "do the thing".to_string(),
            created_by: format!("{:#x}", signer.address()),
        };
        clawed_store::metadata::upsert_task_metadata(&mut conn, CHAIN_ID, CONTRACT, &row).await.unwrap();
    }

    let app = clawed_api::build_router(state);
    let body = serde_json::json!({ "title": "second", "instructions": "do something else", "specHash": "0xbbbb" }).to_string();
    let headers = signed_envelope_headers(&signer, "POST", "/tasks/1/metadata", body.as_bytes(), "nonce-1");

    let mut request = Request::builder().method("POST").uri("/tasks/1/metadata");
    for (name, value) in &headers {
        request = request.header(*name, value);
    }
    let request = request.header("content-type", "application/json").body(Body::from(body)).unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    Ok(())
}

/// S4 (`spec.md` §8): saving a proof as a wallet that is not the
/// submission's agent is rejected with 403.
#[sqlx::test(migrations = "../store/migrations")]
async fn proof_save_by_non_agent_is_forbidden(pool: PgPool) -> sqlx::Result<()> {
    let state = test_state(pool);
    let agent = PrivateKeySigner::random();
    let impostor = PrivateKeySigner::random();

    {
        let mut conn = state.store.acquire().await.unwrap();
        clawed_store::submissions::apply_claimed(&mut conn, CHAIN_ID, CONTRACT, "1", alloy::primitives::U256::from(1u64), &format!("{:#x}", agent.address()), 100, "0xclaim")
            .await
            .unwrap();
    }

    let app = clawed_api::build_router(state);
    let body = serde_json::json!({ "proofText": "done", "proofHash": "0xproof" }).to_string();
    let headers = signed_envelope_headers(&impostor, "POST", "/tasks/1/submissions/1/proof", body.as_bytes(), "nonce-2");

    let mut request = Request::builder().method("POST").uri("/tasks/1/submissions/1/proof");
    for (name, value) in &headers {
        request = request.header(*name, value);
    }
    let request = request.header("content-type", "application/json").body(Body::from(body)).unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    Ok(())
}

/// S5 (`spec.md` §8): replaying the same nonce on a second request is
/// rejected even though the signature itself is valid.
#[sqlx::test(migrations = "../store/migrations")]
async fn nonce_replay_is_rejected(pool: PgPool) -> sqlx::Result<()> {
    let state = test_state(pool);
    let signer = PrivateKeySigner::random();

    {
        let mut conn = state.store.acquire().await.unwrap();
        clawed_store::tasks::apply_task_created(
            &mut conn,
            CHAIN_ID,
            CONTRACT,
            "1",
            &format!("{:#x}", signer.address()),
            1_000_000,
            1,
            9_999_999_999,
            "0xaaaa",
            100,
            "0xcreate",
        )
        .await
        .unwrap();
    }

    let app = clawed_api::build_router(state);
    let body = serde_json::json!({ "title": "t", "instructions": "i", "specHash": "0xaaaa" }).to_string();
    let headers = signed_envelope_headers(&signer, "POST", "/tasks/1/metadata", body.as_bytes(), "same-nonce");

    let build_request = |headers: &[(&'static str, String)], body: String| {
        let mut request = Request::builder().method("POST").uri("/tasks/1/metadata");
        for (name, value) in headers {
            request = request.header(*name, value);
        }
        request.header("content-type", "application/json").body(Body::from(body)).unwrap()
    };

    let first = app.clone().oneshot(build_request(&headers, body.clone())).await.unwrap();
    assert_eq!(first.status(), StatusCode::OK);

    let second = app.oneshot(build_request(&headers, body)).await.unwrap();
    assert_eq!(second.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}
