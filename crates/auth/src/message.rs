//! The byte-exact signed message (`spec.md` §4.4, GLOSSARY "Canonical
//! message"): `"ClawedEscrow\n{METHOD}\n{PATH}\n{timestamp}\n{nonce}\n{body_sha256_hex}"`.

use sha2::{Digest, Sha256};

/// SHA-256 of the UTF-8 JSON body, lowercase hex. An absent body is treated
/// as the empty object `{}`, per `spec.md` §4.4.
pub fn body_sha256_hex(body: Option<&[u8]>) -> String {
    let bytes = body.filter(|b| !b.is_empty()).unwrap_or(b"{}");
    let digest = Sha256::digest(bytes);
    hex::encode(digest)
}

pub fn canonical_message(method: &str, path: &str, timestamp_ms: i64, nonce: &str, body_sha256_hex: &str) -> String {
    format!("ClawedEscrow\n{method}\n{path}\n{timestamp_ms}\n{nonce}\n{body_sha256_hex}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_digest_of_absent_body_matches_empty_object() {
        assert_eq!(body_sha256_hex(None), body_sha256_hex(Some(b"{}")));
    }

    #[test]
    fn message_is_byte_exact() {
        let msg = canonical_message("POST", "/tasks/7/metadata", 1_700_000_000_000, "abc123", "deadbeef");
        assert_eq!(msg, "ClawedEscrow\nPOST\n/tasks/7/metadata\n1700000000000\nabc123\ndeadbeef");
    }
}
