//! Validation bounds.

use serde::{Deserialize, Serialize};

use crate::kv::KeyValueConfig;

pub const EMA_MIN: i64 = 1;
pub const TICKS_MIN: i64 = 1;
pub const QTY_MIN: i64 = 1;
pub const RANGE_LOOKBACK_MIN: i64 = 2;
pub const RANGE_TICKS_MIN: i64 = 1;

/// Keys carrying bound maximums, with the fixed minimum each must respect.
pub const BOUND_KEYS: [(&str, i64); 5] = [
    ("max_ema_length", EMA_MIN),
    ("max_ticks", TICKS_MIN),
    ("max_quantity", QTY_MIN),
    ("max_range_lookback", RANGE_LOOKBACK_MIN),
    ("max_range_ticks", RANGE_TICKS_MIN),
];

/// Configurable maximums. Minimums are the fixed constants above.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ValidationBounds {
    pub max_ema_length: i64,
    pub max_ticks: i64,
    pub max_quantity: i64,
    pub max_range_lookback: i64,
    pub max_range_ticks: i64,
}

impl Default for ValidationBounds {
    fn default() -> Self {
        Self {
            max_ema_length: 400,
            max_ticks: 200,
            max_quantity: 50,
            max_range_lookback: 500,
            max_range_ticks: 200,
        }
    }
}

impl ValidationBounds {
    /// Bounds after applying the `max_*` keys of `kv`; absent or non-integer
    /// values keep the current maximum.
    pub fn updated_from(&self, kv: &KeyValueConfig) -> Self {
        Self {
            max_ema_length: kv.get_int("max_ema_length").unwrap_or(self.max_ema_length),
            max_ticks: kv.get_int("max_ticks").unwrap_or(self.max_ticks),
            max_quantity: kv.get_int("max_quantity").unwrap_or(self.max_quantity),
            max_range_lookback: kv
                .get_int("max_range_lookback")
                .unwrap_or(self.max_range_lookback),
            max_range_ticks: kv.get_int("max_range_ticks").unwrap_or(self.max_range_ticks),
        }
    }
}
