//! Bounds validation of a merged mapping.
//!
//! Every field is checked and every violation collected. Any violation
//! rejects the whole mapping.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use super::active::ActiveConfig;
use super::bounds::{
    ValidationBounds, BOUND_KEYS, EMA_MIN, QTY_MIN, RANGE_LOOKBACK_MIN, RANGE_TICKS_MIN,
    TICKS_MIN,
};
use crate::kv::KeyValueConfig;

/// A single rule broken by a mapping.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    #[error("{field}={value} outside [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },

    #[error("{field} cannot be zero")]
    ZeroDistance { field: &'static str },

    #[error("{field}={value} below minimum {min}")]
    InvalidBound {
        field: &'static str,
        value: i64,
        min: i64,
    },
}

/// Primary reason reported for a rejected mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationCause {
    OutOfRange,
    InvalidBound,
    ZeroDistance,
}

impl fmt::Display for ValidationCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationCause::OutOfRange => write!(f, "out-of-range parameter"),
            ValidationCause::InvalidBound => write!(f, "invalid bound maximum"),
            ValidationCause::ZeroDistance => write!(f, "tp/sl cannot be zero"),
        }
    }
}

/// All violations found in one validation pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{cause}: {}", format_violations(.violations))]
pub struct ValidationReport {
    pub cause: ValidationCause,
    pub violations: Vec<Violation>,
}

fn format_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl ValidationReport {
    fn from_violations(violations: Vec<Violation>) -> Option<Self> {
        let has = |pred: fn(&Violation) -> bool| violations.iter().any(pred);
        let cause = if has(|v| matches!(v, Violation::OutOfRange { .. })) {
            ValidationCause::OutOfRange
        } else if has(|v| matches!(v, Violation::InvalidBound { .. })) {
            ValidationCause::InvalidBound
        } else if has(|v| matches!(v, Violation::ZeroDistance { .. })) {
            ValidationCause::ZeroDistance
        } else {
            return None;
        };
        Some(Self { cause, violations })
    }
}

/// Validate `kv` against the bounds currently in effect.
///
/// Fields absent from `kv`, or not integers, are checked at their `active`
/// value. `max_*` keys in `kv` never widen the bounds used for this pass.
pub fn validate(
    kv: &KeyValueConfig,
    active: &ActiveConfig,
    bounds: &ValidationBounds,
) -> Result<(), ValidationReport> {
    let field = |key: &str, current: i64| kv.get_int(key).unwrap_or(current);

    let ranged: [(&'static str, i64, i64, i64); 8] = [
        ("ema_fast", field("ema_fast", active.ema_fast), EMA_MIN, bounds.max_ema_length),
        ("ema_mid", field("ema_mid", active.ema_mid), EMA_MIN, bounds.max_ema_length),
        ("ema_slow", field("ema_slow", active.ema_slow), EMA_MIN, bounds.max_ema_length),
        ("tp_ticks", field("tp_ticks", active.tp_ticks), TICKS_MIN, bounds.max_ticks),
        ("sl_ticks", field("sl_ticks", active.sl_ticks), TICKS_MIN, bounds.max_ticks),
        ("quantity", field("quantity", active.quantity), QTY_MIN, bounds.max_quantity),
        (
            "range_lookback",
            field("range_lookback", active.range_lookback),
            RANGE_LOOKBACK_MIN,
            bounds.max_range_lookback,
        ),
        (
            "range_max_ticks",
            field("range_max_ticks", active.range_max_ticks),
            RANGE_TICKS_MIN,
            bounds.max_range_ticks,
        ),
    ];

    let mut violations = Vec::new();

    for (name, value, min, max) in ranged {
        let is_stop_distance = name == "tp_ticks" || name == "sl_ticks";
        if is_stop_distance && value == 0 {
            violations.push(Violation::ZeroDistance { field: name });
        } else if value < min || value > max {
            violations.push(Violation::OutOfRange {
                field: name,
                value,
                min,
                max,
            });
        }
    }

    for (name, min) in BOUND_KEYS {
        if let Some(value) = kv.get_int(name) {
            if value < min {
                violations.push(Violation::InvalidBound {
                    field: name,
                    value,
                    min,
                });
            }
        }
    }

    match ValidationReport::from_violations(violations) {
        Some(report) => Err(report),
        None => Ok(()),
    }
}
