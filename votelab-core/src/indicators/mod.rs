//! Indicator library.
//!
//! Single-series indicators (SMA, EMA, RSI) implement the `Indicator` trait;
//! MACD and Bollinger Bands produce several aligned series and expose their own
//! `compute`. Every function has a free-function form taking a price slice and
//! window parameters, returning `InvalidParameter` for a zero window.

pub mod bollinger;
pub mod ema;
pub mod indicator;
pub mod macd;
pub mod rolling;
pub mod rsi;
pub mod sma;

pub use bollinger::{bollinger, Bollinger, BollingerSeries, BAND_MULTIPLIER};
pub use ema::{ema, ema_of_series, Ema};
pub use indicator::{
    check_window, is_defined, value_at, Indicator, IndicatorError, IndicatorValues,
};
pub use macd::{macd, Macd, MacdSeries};
pub use rsi::{rsi, Rsi};
pub use sma::{sma, Sma};

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
