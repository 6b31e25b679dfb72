//! Content hashing for change suppression.

use sha2::{Digest, Sha256};

use super::KeyValueConfig;

/// SHA-256 of the canonical `key=value\n` rendering, as uppercase hex.
///
/// An empty mapping hashes to the empty string.
pub fn content_hash(kv: &KeyValueConfig) -> String {
    if kv.is_empty() {
        return String::new();
    }

    let mut hasher = Sha256::new();
    for (k, v) in kv.sorted() {
        hasher.update(k.as_bytes());
        hasher.update(b"=");
        hasher.update(v.as_bytes());
        hasher.update(b"\n");
    }
    hex::encode_upper(hasher.finalize())
}
