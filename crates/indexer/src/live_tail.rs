//! Optional websocket push path (`spec.md` §2.1, §4.2 "Live tail
//! (optional)"). Grounded on the blockscout `user-ops-indexer` reference's
//! poll/realtime merge: the tail applies logs through the exact same
//! `apply_event` code path as the backfill loop, so duplicate delivery is
//! safe by idempotence rather than by explicit de-duplication.

use alloy::providers::{Provider, ProviderBuilder, WsConnect};
use alloy::rpc::types::Filter;
use alloy_primitives::Address;
use url::Url;

/// Connects a websocket provider and subscribes to logs from the contract,
/// returning the raw stream for the caller to decode and apply.
pub async fn subscribe_contract_logs(
    ws_url: Url,
    contract_address: Address,
) -> Result<impl futures::Stream<Item = alloy::rpc::types::Log>, clawed_chain::ChainError> {
    let provider = ProviderBuilder::new()
        .connect_ws(WsConnect::new(ws_url))
        .await
        .map_err(|e| clawed_chain::ChainError::Rpc(e.to_string()))?;
    let filter = Filter::new().address(contract_address);
    let subscription = provider.subscribe_logs(&filter).await.map_err(|e| clawed_chain::ChainError::Rpc(e.to_string()))?;
    Ok(subscription.into_stream())
}
