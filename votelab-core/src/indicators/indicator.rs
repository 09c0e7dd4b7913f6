//! Indicator trait, window validation and the named derived-series container.
//!
//! Indicators are pure functions: price history in, numeric series out.
//! Every output series has the same length as its input; positions still
//! inside the warmup hold `f64::NAN`, the undefined marker.

use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

/// Caller contract violations when configuring an indicator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndicatorError {
    #[error("invalid parameter: {name} must be a positive window, got {value}")]
    InvalidParameter { name: &'static str, value: usize },
}

/// Reject a zero-length window.
pub fn check_window(name: &'static str, value: usize) -> Result<usize, IndicatorError> {
    if value == 0 {
        Err(IndicatorError::InvalidParameter { name, value })
    } else {
        Ok(value)
    }
}

/// Trait for single-series indicators.
///
/// # Look-ahead guard
/// The value at index t may only depend on prices `0..=t`.
pub trait Indicator: Send + Sync {
    /// Human-readable name (e.g., "sma_20", "rsi_14").
    fn name(&self) -> &str;

    /// Number of leading positions that are undefined on a long enough input.
    fn lookback(&self) -> usize;

    /// Compute the indicator over the whole price series.
    fn compute(&self, prices: &[f64]) -> Vec<f64>;
}

/// True when `value` is a computed value rather than the undefined marker.
pub fn is_defined(value: f64) -> bool {
    !value.is_nan()
}

/// Value at `index`, or `None` when out of range or still undefined.
pub fn value_at(series: &[f64], index: usize) -> Option<f64> {
    series.get(index).copied().filter(|v| is_defined(*v))
}

/// Container for named derived series, ordered by name.
///
/// Serializes undefined positions as `null`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct IndicatorValues {
    series: BTreeMap<String, Vec<f64>>,
}

impl IndicatorValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a named indicator series.
    pub fn insert(&mut self, name: impl Into<String>, values: Vec<f64>) {
        self.series.insert(name.into(), values);
    }

    /// Defined value of a named series at `index`.
    pub fn get(&self, name: &str, index: usize) -> Option<f64> {
        self.series.get(name).and_then(|v| value_at(v, index))
    }

    /// Get the full series for a named indicator.
    pub fn get_series(&self, name: &str) -> Option<&[f64]> {
        self.series.get(name).map(|v| v.as_slice())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.series.keys().map(|k| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.series.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Number of indicator series stored.
    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}
