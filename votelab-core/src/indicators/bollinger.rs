//! Bollinger Bands: moving average +/- 2 standard deviations.
//!
//! - Middle: SMA(price, window)
//! - Upper: middle + 2 * stddev(price, window)
//! - Lower: middle - 2 * stddev(price, window)
//!
//! Uses sample stddev (divide by window - 1), the usual charting convention.
//! Lookback: window - 1. A window of 1 leaves the outer bands undefined.

use serde::Serialize;

use super::indicator::{check_window, IndicatorError};
use super::rolling::{rolling_mean, rolling_sample_std};

/// Band width in standard deviations.
pub const BAND_MULTIPLIER: f64 = 2.0;

/// The three bands, index-aligned with the input prices.
#[derive(Debug, Clone, Serialize)]
pub struct BollingerSeries {
    pub upper: Vec<f64>,
    pub middle: Vec<f64>,
    pub lower: Vec<f64>,
}

#[derive(Debug, Clone)]
pub struct Bollinger {
    window: usize,
}

impl Bollinger {
    pub fn new(window: usize) -> Result<Self, IndicatorError> {
        Ok(Self {
            window: check_window("bb_window", window)?,
        })
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn lookback(&self) -> usize {
        self.window.saturating_sub(1)
    }

    pub fn compute(&self, prices: &[f64]) -> BollingerSeries {
        let middle = rolling_mean(prices, self.window);
        let stddev = rolling_sample_std(prices, self.window);

        let (upper, lower) = middle
            .iter()
            .zip(&stddev)
            .map(|(&m, &sd)| (m + BAND_MULTIPLIER * sd, m - BAND_MULTIPLIER * sd))
            .unzip();

        BollingerSeries {
            upper,
            middle,
            lower,
        }
    }
}

/// Bollinger Bands of `prices` over `window`.
pub fn bollinger(prices: &[f64], window: usize) -> Result<BollingerSeries, IndicatorError> {
    Ok(Bollinger::new(window)?.compute(prices))
}
