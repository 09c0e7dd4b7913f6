//! Price alerts: threshold checks against a price series.
//!
//! Only the predicate lives here; storing alerts and notifying anyone is the
//! caller's business.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::{PricePoint, PriceSeries, SeriesError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertDirection {
    Above,
    Below,
}

impl FromStr for AlertDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "above" => Ok(Self::Above),
            "below" => Ok(Self::Below),
            other => Err(format!("unknown alert direction '{other}' (expected above or below)")),
        }
    }
}

impl fmt::Display for AlertDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Above => f.write_str("above"),
            Self::Below => f.write_str("below"),
        }
    }
}

/// Fires when the price is strictly beyond the threshold in the given direction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceAlert {
    pub threshold: f64,
    pub direction: AlertDirection,
}

impl PriceAlert {
    pub fn new(threshold: f64, direction: AlertDirection) -> Self {
        Self {
            threshold,
            direction,
        }
    }

    pub fn is_triggered(&self, price: f64) -> bool {
        match self.direction {
            AlertDirection::Above => price > self.threshold,
            AlertDirection::Below => price < self.threshold,
        }
    }

    /// Check the most recent price of `series`.
    pub fn check_latest(&self, series: &PriceSeries) -> Result<bool, SeriesError> {
        Ok(self.is_triggered(series.latest()?.price))
    }

    /// Earliest point that satisfies the alert.
    pub fn first_trigger<'a>(&self, series: &'a PriceSeries) -> Option<(usize, &'a PricePoint)> {
        series
            .points()
            .iter()
            .enumerate()
            .find(|(_, p)| self.is_triggered(p.price))
    }
}
