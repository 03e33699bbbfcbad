//! Read-only contract view values for `GET /escrow` (`spec.md` §4.6). These
//! sit outside the event ABI the rest of this crate treats as the contract's
//! only interface, but the Read API still needs them, so they get their own
//! small `sol!` call interface rather than being bolted onto [`crate::abi`].

use crate::error::ChainError;
use alloy::primitives::{Address, U256};
use alloy::providers::Provider;
use alloy::sol;

sol! {
    #[sol(rpc)]
    interface IEscrowView {
        function usdc() external view returns (address);
        function treasury() external view returns (address);
        function arbiter() external view returns (address);
        function depositFeeBps() external view returns (uint256);
        function recipientFeeBps() external view returns (uint256);
    }
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct EscrowView {
    pub usdc: Address,
    pub treasury: Address,
    pub arbiter: Address,
    pub deposit_fee_bps: u64,
    pub recipient_fee_bps: u64,
}

/// Fetched once at server startup and cached; these values change rarely if
/// ever, so the Read API does not re-fetch them per request.
pub async fn fetch_escrow_view<P: Provider + Clone>(provider: P, contract_address: Address) -> Result<EscrowView, ChainError> {
    let contract = IEscrowView::new(contract_address, provider);
    let usdc = contract.usdc().call().await.map_err(|e| ChainError::Rpc(e.to_string()))?._0;
    let treasury = contract.treasury().call().await.map_err(|e| ChainError::Rpc(e.to_string()))?._0;
    let arbiter = contract.arbiter().call().await.map_err(|e| ChainError::Rpc(e.to_string()))?._0;
    let deposit_fee_bps = contract.depositFeeBps().call().await.map_err(|e| ChainError::Rpc(e.to_string()))?._0;
    let recipient_fee_bps = contract.recipientFeeBps().call().await.map_err(|e| ChainError::Rpc(e.to_string()))?._0;

    Ok(EscrowView {
        usdc,
        treasury,
        arbiter,
        deposit_fee_bps: u256_to_u64(deposit_fee_bps),
        recipient_fee_bps: u256_to_u64(recipient_fee_bps),
    })
}

fn u256_to_u64(value: U256) -> u64 {
    u64::try_from(value).unwrap_or(u64::MAX)
}
