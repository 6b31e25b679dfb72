//! Source precedence.

use super::KeyValueConfig;

/// Merge two mappings; `local` wins on key collision.
pub fn merge(remote: &KeyValueConfig, local: &KeyValueConfig) -> KeyValueConfig {
    let mut merged = remote.clone();
    for (k, v) in local.iter() {
        merged.insert(k, v);
    }
    merged
}
