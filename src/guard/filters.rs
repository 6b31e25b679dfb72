//! Entry filters over recent bars.
//!
//! Each filter is an independent predicate. [`EntryFilters`] combines the
//! ones enabled in the active configuration with a logical AND.

use crate::settings::ActiveConfig;

/// Minimum body-to-range ratio for an imbalance candle.
pub const IMBALANCE_BODY_RATIO: f64 = 0.6;

/// Trade direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Long,
    Short,
}

/// One OHLC bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bar {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl Bar {
    pub fn new(open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            open,
            high,
            low,
            close,
        }
    }
}

/// Bars ordered newest first: `bars[0]` is the current bar.
pub type BarWindow<'a> = &'a [Bar];

/// Recent high-low range must fit within `max_ticks * tick_size`.
///
/// Looks at the newest `lookback` bars, or all of them when fewer exist.
/// A lookback of one or less disables the check.
pub fn range_ok(bars: BarWindow<'_>, lookback: usize, max_ticks: i64, tick_size: f64) -> bool {
    if lookback <= 1 || bars.is_empty() {
        return true;
    }
    let window = &bars[..lookback.min(bars.len())];
    let highest = window.iter().map(|b| b.high).fold(f64::MIN, f64::max);
    let lowest = window.iter().map(|b| b.low).fold(f64::MAX, f64::min);
    highest - lowest <= max_ticks as f64 * tick_size
}

/// Current bar must be a strong candle in the trade direction.
pub fn imbalance_ok(bar: &Bar, direction: Direction) -> bool {
    let range = bar.high - bar.low;
    if range <= 0.0 {
        return false;
    }
    let body = (bar.close - bar.open).abs();
    if body / range < IMBALANCE_BODY_RATIO {
        return false;
    }
    match direction {
        Direction::Long => bar.close >= bar.open,
        Direction::Short => bar.close <= bar.open,
    }
}

/// A fair value gap between the two previous bars must exist in the trade
/// direction. Passes when fewer than three bars are available.
pub fn fvg_ok(bars: BarWindow<'_>, direction: Direction) -> bool {
    if bars.len() < 3 {
        return true;
    }
    match direction {
        Direction::Long => bars[1].low > bars[2].high,
        Direction::Short => bars[1].high < bars[2].low,
    }
}

/// Filters enabled by the active configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryFilters {
    pub use_fvg: bool,
    pub use_imbalance: bool,
    pub use_range_filter: bool,
    pub range_lookback: usize,
    pub range_max_ticks: i64,
    pub tick_size: f64,
}

impl EntryFilters {
    pub fn from_config(config: &ActiveConfig, tick_size: f64) -> Self {
        Self {
            use_fvg: config.use_fvg,
            use_imbalance: config.use_imbalance,
            use_range_filter: config.use_range_filter,
            range_lookback: config.range_lookback.max(0) as usize,
            range_max_ticks: config.range_max_ticks,
            tick_size,
        }
    }

    /// True when every enabled filter passes for `direction`.
    pub fn allows(&self, bars: BarWindow<'_>, direction: Direction) -> bool {
        let range = !self.use_range_filter
            || range_ok(bars, self.range_lookback, self.range_max_ticks, self.tick_size);
        let imbalance =
            !self.use_imbalance || bars.first().is_some_and(|b| imbalance_ok(b, direction));
        let fvg = !self.use_fvg || fvg_ok(bars, direction);

        range && imbalance && fvg
    }
}
