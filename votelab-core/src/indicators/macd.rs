//! Moving Average Convergence/Divergence (MACD).
//!
//! line   = EMA(price, fast) - EMA(price, slow)
//! signal = EMA(line, signal)
//!
//! Both series are defined wherever the price is. A fast window that is not
//! shorter than the slow one only flips the sign convention.

use serde::Serialize;

use super::ema::ema_of_series;
use super::indicator::{check_window, IndicatorError};

/// MACD line and its signal line, index-aligned with the input prices.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MacdSeries {
    pub line: Vec<f64>,
    pub signal: Vec<f64>,
}

#[derive(Debug, Clone)]
pub struct Macd {
    fast: usize,
    slow: usize,
    signal: usize,
}

impl Macd {
    pub fn new(fast: usize, slow: usize, signal: usize) -> Result<Self, IndicatorError> {
        Ok(Self {
            fast: check_window("macd_fast", fast)?,
            slow: check_window("macd_slow", slow)?,
            signal: check_window("macd_signal", signal)?,
        })
    }

    pub fn line_name(&self) -> String {
        format!("macd_line_{}_{}", self.fast, self.slow)
    }

    pub fn signal_name(&self) -> String {
        format!("macd_signal_{}_{}_{}", self.fast, self.slow, self.signal)
    }

    pub fn compute(&self, prices: &[f64]) -> MacdSeries {
        let fast = ema_of_series(prices, self.fast);
        let slow = ema_of_series(prices, self.slow);
        let line: Vec<f64> = fast.iter().zip(&slow).map(|(f, s)| f - s).collect();
        let signal = ema_of_series(&line, self.signal);
        MacdSeries { line, signal }
    }
}

/// MACD of `prices`.
pub fn macd(
    prices: &[f64],
    fast: usize,
    slow: usize,
    signal: usize,
) -> Result<MacdSeries, IndicatorError> {
    Ok(Macd::new(fast, slow, signal)?.compute(prices))
}
