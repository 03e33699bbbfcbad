//! Canonical JSON and the keccak256 commitments bound to on-chain
//! `specHash`/`proofHash`.
//!
//! `spec.md` §9 flags the object serialization used to compute `specHash` as
//! an open question ("the source computes specHash using the default object
//! serialization ... MUST specify canonical JSON or change to EIP-712").
//! This resolves it to canonical JSON: keys sorted ascending by byte value,
//! no insignificant whitespace, explicit UTF-8 — see `DESIGN.md`.

use alloy_primitives::{keccak256, B256};

/// Canonical JSON object for the two-field task metadata commitment. Keys are
/// written in sorted order with no whitespace; a bespoke serializer is used
/// instead of `serde_json::to_string` because `serde_json`'s map ordering is
/// insertion-order, not canonical, and therefore not reproducible by a
/// client implemented in a different language.
pub fn canonical_task_metadata_json(title: &str, instructions: &str) -> String {
    let mut out = String::with_capacity(title.len() + instructions.len() + 32);
    out.push('{');
    out.push_str("\"instructions\":");
    push_json_string(&mut out, instructions);
    out.push(',');
    out.push_str("\"title\":");
    push_json_string(&mut out, title);
    out.push('}');
    out
}

/// `keccak256(utf8(canonical_task_metadata_json(title, instructions)))`,
/// compared against the on-chain `specHash` in the Metadata Service (§4.5).
pub fn spec_hash(title: &str, instructions: &str) -> B256 {
    keccak256(canonical_task_metadata_json(title, instructions).as_bytes())
}

/// `keccak256(utf8(proof_text))`, compared against the on-chain
/// `proofHash` (§3 `OffchainProof` invariant).
pub fn proof_hash(proof_text: &str) -> B256 {
    keccak256(proof_text.as_bytes())
}

fn push_json_string(out: &mut String, value: &str) {
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_json_sorts_keys_regardless_of_argument_order() {
        let json = canonical_task_metadata_json("Fix the bug", "Do the thing");
        assert_eq!(json, r#"{"instructions":"Do the thing","title":"Fix the bug"}"#);
    }

    #[test]
    fn canonical_json_escapes_control_characters() {
        let json = canonical_task_metadata_json("a\"b", "line1\nline2");
        assert_eq!(json, r#"{"instructions":"line1\nline2","title":"a\"b"}"#);
    }

    #[test]
    fn spec_hash_is_deterministic() {
        let a = spec_hash("Fix the bug", "Do the thing");
        let b = spec_hash("Fix the bug", "Do the thing");
        assert_eq!(a, b);
    }

    #[test]
    fn spec_hash_changes_with_content() {
        let a = spec_hash("Fix the bug", "Do the thing");
        let b = spec_hash("Fix the bug", "Do the other thing");
        assert_ne!(a, b);
    }
}
