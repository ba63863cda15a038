//! Canonical JSON normalization and digest computation.
//!
//! Digests are SHA-256 over a canonical serialization: object keys sorted,
//! compact separators. Array order is preserved; callers that need
//! order-invariance sort before serializing.

use sha2::{Digest as _, Sha256};

use crate::domain::error::Result;

/// Recursively sort JSON object keys.
fn sort_keys(value: &serde_json::Value) -> serde_json::Value {
    match value {
        serde_json::Value::Object(map) => {
            let mut entries: Vec<(&String, &serde_json::Value)> = map.iter().collect();
            entries.sort_by(|(a, _), (b, _)| a.cmp(b));

            let mut sorted = serde_json::Map::new();
            for (key, inner) in entries {
                sorted.insert(key.clone(), sort_keys(inner));
            }
            serde_json::Value::Object(sorted)
        }
        serde_json::Value::Array(arr) => {
            serde_json::Value::Array(arr.iter().map(sort_keys).collect())
        }
        other => other.clone(),
    }
}

/// Convert a JSON value to canonical form: sorted keys, compact output.
pub fn canonical_json(value: &serde_json::Value) -> Result<String> {
    Ok(serde_json::to_string(&sort_keys(value))?)
}

/// Compute a SHA-256 hex digest of canonical JSON.
pub fn compute_digest(value: &serde_json::Value) -> Result<String> {
    let canonical = canonical_json(value)?;
    Ok(digest_bytes(canonical.as_bytes()))
}

/// Compute a SHA-256 hex digest over raw bytes.
pub fn digest_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_json_field_order_invariant() {
        let input1 = serde_json::json!({ "a": 1, "b": 2, "c": 3 });
        let input2 = serde_json::json!({ "c": 3, "a": 1, "b": 2 });
        assert_eq!(
            canonical_json(&input1).expect("canonical 1"),
            canonical_json(&input2).expect("canonical 2")
        );
    }

    #[test]
    fn test_canonical_json_nested_field_order_invariant() {
        let input1 = serde_json::json!({ "outer": { "z": 1, "y": 2 } });
        let input2 = serde_json::json!({ "outer": { "y": 2, "z": 1 } });
        assert_eq!(
            canonical_json(&input1).expect("canonical 1"),
            canonical_json(&input2).expect("canonical 2")
        );
    }

    #[test]
    fn test_canonical_json_array_order_preserved() {
        let input1 = serde_json::json!({ "array": [3, 1, 2] });
        let input2 = serde_json::json!({ "array": [1, 2, 3] });
        assert_ne!(
            canonical_json(&input1).expect("canonical 1"),
            canonical_json(&input2).expect("canonical 2")
        );
    }

    #[test]
    fn test_compute_digest_is_hex_sha256() {
        let input = serde_json::json!({ "name": "tripwire" });
        let digest = compute_digest(&input).expect("digest");
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_compute_digest_single_field_delta() {
        let input1 = serde_json::json!({ "id": "broken-import" });
        let input2 = serde_json::json!({ "id": "broken-import-2" });
        assert_ne!(
            compute_digest(&input1).expect("digest 1"),
            compute_digest(&input2).expect("digest 2")
        );
    }

    #[test]
    fn test_digest_bytes_deterministic() {
        assert_eq!(digest_bytes(b"fixture"), digest_bytes(b"fixture"));
        assert_ne!(digest_bytes(b"fixture"), digest_bytes(b"fixtures"));
    }
}
