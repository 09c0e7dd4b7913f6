//! Price points and the validated price series every computation reads.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single observed price at an instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub timestamp: DateTime<Utc>,
    pub price: f64,
}

impl PricePoint {
    pub fn new(timestamp: DateTime<Utc>, price: f64) -> Self {
        Self { timestamp, price }
    }
}

/// Errors raised while building or querying a `PriceSeries`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SeriesError {
    #[error("timestamp at index {index} is not strictly after its predecessor")]
    NonMonotonicTimestamp { index: usize },

    #[error("price at index {index} must be positive and finite, got {price}")]
    InvalidPrice { index: usize, price: f64 },

    #[error("epoch milliseconds {millis} are out of range")]
    InvalidTimestamp { millis: i64 },

    #[error("price series is empty")]
    EmptySeries,
}

/// Ordered sequence of price points with unique, strictly increasing timestamps.
///
/// The constructor is the only way in, so every `PriceSeries` in circulation
/// satisfies the ordering and positivity invariants. An empty series is valid;
/// indicators degrade it to empty output.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(points: Vec<PricePoint>) -> Result<Self, SeriesError> {
        for (index, point) in points.iter().enumerate() {
            if !point.price.is_finite() || point.price <= 0.0 {
                return Err(SeriesError::InvalidPrice {
                    index,
                    price: point.price,
                });
            }
            if index > 0 && point.timestamp <= points[index - 1].timestamp {
                return Err(SeriesError::NonMonotonicTimestamp { index });
            }
        }
        Ok(Self { points })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from `(epoch_millis, price)` pairs, the layout of market-chart
    /// API responses.
    pub fn from_millis(pairs: &[(i64, f64)]) -> Result<Self, SeriesError> {
        let points = pairs
            .iter()
            .map(|&(millis, price)| {
                Utc.timestamp_millis_opt(millis)
                    .single()
                    .map(|timestamp| PricePoint { timestamp, price })
                    .ok_or(SeriesError::InvalidTimestamp { millis })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(points)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn get(&self, index: usize) -> Option<&PricePoint> {
        self.points.get(index)
    }

    /// Price column, index-aligned with `points()`.
    pub fn prices(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.price).collect()
    }

    /// Most recent point.
    pub fn latest(&self) -> Result<&PricePoint, SeriesError> {
        self.points.last().ok_or(SeriesError::EmptySeries)
    }
}

impl<'de> Deserialize<'de> for PriceSeries {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            points: Vec<PricePoint>,
        }

        let raw = Raw::deserialize(deserializer)?;
        PriceSeries::new(raw.points).map_err(serde::de::Error::custom)
    }
}

/// Build a daily series from bare prices starting 2024-01-01. Test helper.
#[cfg(test)]
pub fn make_series(prices: &[f64]) -> PriceSeries {
    let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let points = prices
        .iter()
        .enumerate()
        .map(|(i, &price)| PricePoint::new(base + chrono::Duration::days(i as i64), price))
        .collect();
    PriceSeries::new(points).unwrap()
}
