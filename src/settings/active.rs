//! Typed settings currently in effect.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::kv::KeyValueConfig;

/// Minimum poll interval in seconds.
pub const MIN_POLL_SECONDS: u64 = 1;

/// Every key this pipeline understands. Other keys are carried but ignored.
pub const RECOGNIZED_KEYS: [&str; 21] = [
    "ema_fast",
    "ema_mid",
    "ema_slow",
    "tp_ticks",
    "sl_ticks",
    "quantity",
    "use_fvg",
    "use_imbalance",
    "use_range_filter",
    "range_lookback",
    "range_max_ticks",
    "account_mode",
    "max_ema_length",
    "max_ticks",
    "max_quantity",
    "max_range_lookback",
    "max_range_ticks",
    "poll_seconds",
    "lkg_path",
    "config_version",
    "updated_at",
];

/// The active trading configuration read by the signal and execution side.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ActiveConfig {
    pub ema_fast: i64,
    pub ema_mid: i64,
    pub ema_slow: i64,

    /// Take-profit distance in ticks.
    pub tp_ticks: i64,
    /// Stop-loss distance in ticks.
    pub sl_ticks: i64,
    pub quantity: i64,

    pub use_fvg: bool,
    pub use_imbalance: bool,
    pub use_range_filter: bool,
    pub range_lookback: i64,
    pub range_max_ticks: i64,

    /// Declared account class, `demo` or `live`.
    pub account_mode: String,

    /// Seconds between polls (never below one).
    pub poll_seconds: u64,

    /// Overrides where the last-known-good snapshot is written.
    pub lkg_path: Option<PathBuf>,

    pub config_version: String,
    pub updated_at: String,
}

impl Default for ActiveConfig {
    fn default() -> Self {
        Self {
            ema_fast: 10,
            ema_mid: 50,
            ema_slow: 200,
            tp_ticks: 20,
            sl_ticks: 16,
            quantity: 1,
            use_fvg: false,
            use_imbalance: false,
            use_range_filter: false,
            range_lookback: 20,
            range_max_ticks: 24,
            account_mode: "demo".to_string(),
            poll_seconds: 5,
            lkg_path: None,
            config_version: String::new(),
            updated_at: String::new(),
        }
    }
}

impl ActiveConfig {
    /// Settings after copying every recognized field of `kv`.
    ///
    /// Absent or unparsable values keep the current setting. Only call this
    /// with a mapping that already passed validation.
    pub fn applied_from(&self, kv: &KeyValueConfig) -> Self {
        let int = |key: &str, current: i64| kv.get_int(key).unwrap_or(current);
        let flag = |key: &str, current: bool| kv.get_bool(key).unwrap_or(current);

        let poll_seconds = match kv.get_int("poll_seconds") {
            Some(secs) => secs.max(MIN_POLL_SECONDS as i64) as u64,
            None => self.poll_seconds,
        };

        let lkg_path = match kv.get("lkg_path").map(str::trim) {
            Some(p) if !p.is_empty() => Some(PathBuf::from(p)),
            _ => self.lkg_path.clone(),
        };

        Self {
            ema_fast: int("ema_fast", self.ema_fast),
            ema_mid: int("ema_mid", self.ema_mid),
            ema_slow: int("ema_slow", self.ema_slow),
            tp_ticks: int("tp_ticks", self.tp_ticks),
            sl_ticks: int("sl_ticks", self.sl_ticks),
            quantity: int("quantity", self.quantity),
            use_fvg: flag("use_fvg", self.use_fvg),
            use_imbalance: flag("use_imbalance", self.use_imbalance),
            use_range_filter: flag("use_range_filter", self.use_range_filter),
            range_lookback: int("range_lookback", self.range_lookback),
            range_max_ticks: int("range_max_ticks", self.range_max_ticks),
            account_mode: kv
                .get("account_mode")
                .map(str::to_string)
                .unwrap_or_else(|| self.account_mode.clone()),
            poll_seconds,
            lkg_path,
            config_version: kv.get("config_version").unwrap_or_default().to_string(),
            updated_at: kv.get("updated_at").unwrap_or_default().to_string(),
        }
    }

}

/// Keys of `kv` this pipeline does not understand, sorted.
pub fn unrecognized_keys(kv: &KeyValueConfig) -> Vec<&str> {
    kv.sorted()
        .into_iter()
        .map(|(k, _)| k)
        .filter(|k| !RECOGNIZED_KEYS.iter().any(|r| r.eq_ignore_ascii_case(k)))
        .collect()
}
