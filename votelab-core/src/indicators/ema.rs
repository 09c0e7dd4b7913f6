//! Exponential Moving Average (EMA).
//!
//! Recursive: EMA[t] = alpha * price[t] + (1 - alpha) * EMA[t-1], alpha = 2 / (window + 1).
//! Seed: EMA[0] = price[0]. Defined from the first index, no warmup gap.

use super::indicator::{check_window, Indicator, IndicatorError};

#[derive(Debug, Clone)]
pub struct Ema {
    window: usize,
    name: String,
}

impl Ema {
    pub fn new(window: usize) -> Result<Self, IndicatorError> {
        let window = check_window("ema", window)?;
        Ok(Self {
            window,
            name: format!("ema_{window}"),
        })
    }

    pub fn window(&self) -> usize {
        self.window
    }
}

impl Indicator for Ema {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        0
    }

    fn compute(&self, prices: &[f64]) -> Vec<f64> {
        ema_of_series(prices, self.window)
    }
}

/// EMA of an arbitrary series, seeded with its first value.
///
/// Used directly by MACD for the signal line. A NaN input taints every later
/// position. `window` must be >= 1.
pub fn ema_of_series(values: &[f64], window: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];
    if n == 0 || window == 0 {
        return result;
    }

    let alpha = 2.0 / (window as f64 + 1.0);
    let mut prev = values[0];
    result[0] = prev;

    for i in 1..n {
        if values[i].is_nan() || prev.is_nan() {
            break;
        }
        let ema = alpha * values[i] + (1.0 - alpha) * prev;
        result[i] = ema;
        prev = ema;
    }

    result
}

/// EMA of `prices` over `window`.
pub fn ema(prices: &[f64], window: usize) -> Result<Vec<f64>, IndicatorError> {
    Ok(Ema::new(window)?.compute(prices))
}
