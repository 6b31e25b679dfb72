//! Line-oriented `key=value` configuration content.
//!
//! # Data Flow
//! ```text
//! remote text ─┐
//!              ├─ parser.rs (parse_kv) ─→ KeyValueConfig ─┐
//! local text ──┘                                          ├─ merge.rs (local wins)
//!                                                         └─→ hash.rs (content_hash)
//! ```
//!
//! # Design Decisions
//! - Keys are case-insensitive; the first spelling seen is kept
//! - Keys are folded to upper case, so `ab` sorts before `a_b`
//! - Integers are 32-bit; wider values count as unparsable
//! - A mapping is never mutated after it has been produced
//! - Parsing never fails, malformed lines are dropped

pub mod hash;
pub mod merge;
pub mod parser;

use std::collections::HashMap;

pub use hash::content_hash;
pub use merge::merge;
pub use parser::parse_kv;

#[derive(Debug, Clone)]
struct Entry {
    key: String,
    value: String,
}

/// A parsed configuration mapping with case-insensitive keys.
#[derive(Debug, Clone, Default)]
pub struct KeyValueConfig {
    entries: HashMap<String, Entry>,
}

impl KeyValueConfig {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    fn fold(key: &str) -> String {
        key.to_uppercase()
    }

    /// Insert or overwrite a value. An existing key keeps its original spelling.
    pub(crate) fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        self.entries
            .entry(Self::fold(&key))
            .and_modify(|e| e.value = value.clone())
            .or_insert(Entry { key, value });
    }

    /// Look up a value by key, ignoring case.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(&Self::fold(key)).map(|e| e.value.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(&Self::fold(key))
    }

    /// Parse the value under `key` as a 32-bit integer.
    ///
    /// Returns `None` when the key is absent or the value is not an integer
    /// in `i32` range.
    pub fn get_int(&self, key: &str) -> Option<i64> {
        self.get(key)
            .and_then(|v| v.trim().parse::<i32>().ok())
            .map(i64::from)
    }

    /// Parse the value under `key` as a boolean (`true`/`false`, any case).
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        let v = self.get(key)?.trim();
        if v.eq_ignore_ascii_case("true") {
            Some(true)
        } else if v.eq_ignore_ascii_case("false") {
            Some(false)
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(key, value)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .values()
            .map(|e| (e.key.as_str(), e.value.as_str()))
    }

    /// Entries sorted by upper-cased key.
    pub fn sorted(&self) -> Vec<(&str, &str)> {
        let mut pairs: Vec<(&String, &Entry)> = self.entries.iter().collect();
        pairs.sort_by(|a, b| a.0.cmp(b.0));
        pairs
            .into_iter()
            .map(|(_, e)| (e.key.as_str(), e.value.as_str()))
            .collect()
    }

    /// Render back to `key=value` lines.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for (k, v) in self.sorted() {
            out.push_str(k);
            out.push('=');
            out.push_str(v);
            out.push('\n');
        }
        out
    }
}

impl PartialEq for KeyValueConfig {
    fn eq(&self, other: &Self) -> bool {
        self.entries.len() == other.entries.len()
            && self
                .entries
                .iter()
                .all(|(k, e)| other.entries.get(k).is_some_and(|o| o.value == e.value))
    }
}

impl Eq for KeyValueConfig {}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for KeyValueConfig {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut kv = Self::new();
        for (k, v) in iter {
            kv.insert(k, v);
        }
        kv
    }
}
