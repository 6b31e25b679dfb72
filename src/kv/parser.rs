//! `key=value` text parsing.

use super::KeyValueConfig;

/// Parse line-oriented `key=value` text.
///
/// Blank lines and lines starting with `#` are skipped, as are lines without
/// `=` or with an empty key. The first `=` splits key from value and both are
/// trimmed. Later duplicates overwrite earlier ones. A leading UTF-8 byte
/// order mark is ignored.
pub fn parse_kv(content: &str) -> KeyValueConfig {
    let content = content.strip_prefix('\u{FEFF}').unwrap_or(content);
    let mut kv = KeyValueConfig::new();

    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let Some((key, value)) = trimmed.split_once('=') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        kv.insert(key, value.trim());
    }

    kv
}
