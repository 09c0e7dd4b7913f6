//! Relative Strength Index (RSI).
//!
//! Simple trailing means (not Wilder smoothing) of gains and losses:
//! RSI = 100 - 100 / (1 + avg_gain / avg_loss)
//! Lookback: window (the first delta exists at index 1).
//! Edge case: avg_loss == 0 → RSI = 100, including a flat window.

use super::indicator::{check_window, Indicator, IndicatorError};
use super::rolling::rolling_mean;

#[derive(Debug, Clone)]
pub struct Rsi {
    window: usize,
    name: String,
}

impl Rsi {
    pub fn new(window: usize) -> Result<Self, IndicatorError> {
        let window = check_window("rsi", window)?;
        Ok(Self {
            window,
            name: format!("rsi_{window}"),
        })
    }

    pub fn window(&self) -> usize {
        self.window
    }
}

impl Indicator for Rsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.window
    }

    fn compute(&self, prices: &[f64]) -> Vec<f64> {
        let n = prices.len();
        let mut result = vec![f64::NAN; n];
        if n < 2 {
            return result;
        }

        // gains[k] / losses[k] belong to the delta ending at index k + 1
        let (gains, losses): (Vec<f64>, Vec<f64>) = prices
            .windows(2)
            .map(|w| {
                let delta = w[1] - w[0];
                if delta.is_nan() {
                    (f64::NAN, f64::NAN)
                } else {
                    (delta.max(0.0), (-delta).max(0.0))
                }
            })
            .unzip();

        let avg_gain = rolling_mean(&gains, self.window);
        let avg_loss = rolling_mean(&losses, self.window);

        for k in 0..gains.len() {
            if avg_gain[k].is_nan() || avg_loss[k].is_nan() {
                continue;
            }
            result[k + 1] = compute_rsi(avg_gain[k], avg_loss[k]);
        }

        result
    }
}

fn compute_rsi(avg_gain: f64, avg_loss: f64) -> f64 {
    let avg_gain = avg_gain.max(0.0);
    let avg_loss = avg_loss.max(0.0);
    if avg_loss == 0.0 {
        100.0
    } else {
        100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
    }
}

/// RSI of `prices` over `window`.
pub fn rsi(prices: &[f64], window: usize) -> Result<Vec<f64>, IndicatorError> {
    Ok(Rsi::new(window)?.compute(prices))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    #[test]
    fn rsi_all_gains() {
        let result = rsi(&[100.0, 101.0, 102.0, 103.0, 104.0, 105.0], 3).unwrap();
        assert!(result[..3].iter().all(|v| v.is_nan()));
        assert_eq!(result[3], 100.0);
        assert_eq!(result[5], 100.0);
    }

    #[test]
    fn rsi_all_losses() {
        let result = rsi(&[105.0, 104.0, 103.0, 102.0, 101.0, 100.0], 3).unwrap();
        assert_approx(result[3], 0.0, DEFAULT_EPSILON);
    }

    #[test]
    fn rsi_flat_window_is_100() {
        let result = rsi(&[50.0, 50.0, 50.0, 50.0], 3).unwrap();
        assert_eq!(result[3], 100.0);
    }

    #[test]
    fn rsi_mixed() {
        // Deltas: +0.34, -0.25, -0.48, +0.72
        // window=3 at index 3: gains=0.34, losses=0.73 → RSI = 100 - 100/(1 + 0.34/0.73)
        let result = rsi(&[44.0, 44.34, 44.09, 43.61, 44.33], 3).unwrap();
        let expected = 100.0 - 100.0 / (1.0 + 0.34 / 0.73);
        assert_approx(result[3], expected, 1e-9);

        // index 4: gains=0.72, losses=0.73
        let expected = 100.0 - 100.0 / (1.0 + 0.72 / 0.73);
        assert_approx(result[4], expected, 1e-9);
    }

    #[test]
    fn rsi_loss_leaving_window_restores_100() {
        // One loss at delta index 1, then gains only.
        let result = rsi(&[10.0, 9.0, 9.5, 10.0, 10.5, 11.0], 3).unwrap();
        assert!(result[3] < 100.0);
        assert_eq!(result[5], 100.0);
    }

    #[test]
    fn rsi_bounds() {
        let result = rsi(&[100.0, 105.0, 98.0, 110.0, 95.0, 115.0, 90.0, 120.0], 3).unwrap();
        for (i, &v) in result.iter().enumerate() {
            if !v.is_nan() {
                assert!((0.0..=100.0).contains(&v), "RSI out of bounds at {i}: {v}");
            }
        }
    }

    #[test]
    fn rsi_window_at_least_length_is_undefined() {
        assert!(rsi(&[1.0, 2.0, 3.0], 3).unwrap().iter().all(|v| v.is_nan()));
        assert!(rsi(&[1.0, 2.0, 3.0], 7).unwrap().iter().all(|v| v.is_nan()));
        assert!(rsi(&[], 7).unwrap().is_empty());
    }

    #[test]
    fn rsi_lookback() {
        assert_eq!(Rsi::new(14).unwrap().lookback(), 14);
        assert!(Rsi::new(0).is_err());
    }
}
