//! Simple Moving Average (SMA).
//!
//! Trailing mean of prices over a window.
//! Lookback: window - 1 (first valid value at index window-1).

use super::indicator::{check_window, Indicator, IndicatorError};
use super::rolling::rolling_mean;

#[derive(Debug, Clone)]
pub struct Sma {
    window: usize,
    name: String,
}

impl Sma {
    pub fn new(window: usize) -> Result<Self, IndicatorError> {
        let window = check_window("sma", window)?;
        Ok(Self {
            window,
            name: format!("sma_{window}"),
        })
    }

    pub fn window(&self) -> usize {
        self.window
    }
}

impl Indicator for Sma {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.window.saturating_sub(1)
    }

    fn compute(&self, prices: &[f64]) -> Vec<f64> {
        rolling_mean(prices, self.window)
    }
}

/// SMA of `prices` over `window`.
pub fn sma(prices: &[f64], window: usize) -> Result<Vec<f64>, IndicatorError> {
    Ok(Sma::new(window)?.compute(prices))
}
