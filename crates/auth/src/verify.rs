//! Request envelope verification (`spec.md` §4.4).

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::message::{body_sha256_hex, canonical_message};
use alloy::primitives::{Address, Signature};
use chrono::{DateTime, Utc};
use clawed_store::nonce;
use sqlx::PgConnection;
use std::str::FromStr;

/// The four signed headers (`spec.md` §4.4): `wallet-address`, `signature`,
/// `timestamp`, `nonce`. Absent entirely means anonymous (step 1); present
/// means every field must parse and verify.
#[derive(Debug, Clone)]
pub struct Envelope {
    pub wallet_address: String,
    pub signature: String,
    pub timestamp_ms: i64,
    pub nonce: String,
}

/// Verifies one request envelope and returns the authenticated wallet
/// address, lowercased. `body` is the raw request body bytes (`None`/empty
/// both digest as `{}`).
///
/// Follows `spec.md` §4.4's ordered "reject on first failure" steps: address
/// parse, skew window, nonce-not-already-used, signature recovery, then the
/// nonce is actually consumed. Checking the nonce before recovering the
/// signature means a request that is both replayed and forged is rejected as
/// `nonce_already_used`, matching the spec's step order; the final atomic
/// insert in `clawed_store::nonce` still makes concurrent replay of a valid
/// request race-safe even though the peek above isn't atomic with it.
pub async fn verify_envelope(
    conn: &mut PgConnection,
    config: &AuthConfig,
    method: &str,
    path: &str,
    body: Option<&[u8]>,
    envelope: &Envelope,
    now: DateTime<Utc>,
) -> Result<Address, AuthError> {
    let claimed_address = Address::from_str(&envelope.wallet_address).map_err(|_| AuthError::InvalidAddress)?;

    let skew_ms = (now.timestamp_millis() - envelope.timestamp_ms).abs();
    if skew_ms > config.signature_window_ms {
        return Err(AuthError::SkewExceeded);
    }

    if nonce::nonce_is_used(conn, &envelope.nonce).await? {
        return Err(AuthError::NonceAlreadyUsed);
    }

    let digest = body_sha256_hex(body);
    let message = canonical_message(method, path, envelope.timestamp_ms, &envelope.nonce, &digest);
    let recovered = recover_and_check(&message, &envelope.signature, claimed_address)?;

    let expires_at = now + chrono::Duration::milliseconds(config.nonce_ttl_ms);
    let consumed = nonce::try_consume_nonce(conn, &envelope.nonce, expires_at).await?;
    if !consumed {
        return Err(AuthError::NonceAlreadyUsed);
    }

    Ok(recovered)
}

/// Recovers the `personal_sign` signer of `message` and checks it matches
/// `claimed`, case-insensitively (address equality is already byte-wise).
fn recover_and_check(message: &str, signature_hex: &str, claimed: Address) -> Result<Address, AuthError> {
    let signature = Signature::from_str(signature_hex).map_err(|_| AuthError::InvalidSignature)?;
    let recovered = signature.recover_address_from_msg(message.as_bytes()).map_err(|_| AuthError::InvalidSignature)?;
    if recovered != claimed {
        return Err(AuthError::InvalidSignature);
    }
    Ok(recovered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::signers::local::PrivateKeySigner;
    use alloy::signers::SignerSync;

    #[test]
    fn recovers_matching_signer() {
        let signer = PrivateKeySigner::random();
        let address = signer.address();
        let message = canonical_message("POST", "/tasks/7/metadata", 1_700_000_000_000, "n1", "deadbeef");
        let signature = signer.sign_message_sync(message.as_bytes()).expect("sign");
        let recovered = recover_and_check(&message, &signature.to_string(), address).expect("should recover");
        assert_eq!(recovered, address);
    }

    #[test]
    fn rejects_signature_from_a_different_signer() {
        let signer = PrivateKeySigner::random();
        let other = PrivateKeySigner::random().address();
        let message = canonical_message("POST", "/tasks/7/metadata", 1_700_000_000_000, "n1", "deadbeef");
        let signature = signer.sign_message_sync(message.as_bytes()).expect("sign");
        assert!(recover_and_check(&message, &signature.to_string(), other).is_err());
    }
}
