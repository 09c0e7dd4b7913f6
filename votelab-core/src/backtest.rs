//! Backtest summary: buy/sell transition points extracted from a signal series.
//!
//! Post-processes the synthesizer output after the fact. Pure function:
//! price series + signal records → transition events and counts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::PriceSeries;
use crate::signals::SignalRecord;

/// Direction of a signal flip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransitionKind {
    /// false → true
    Buy,
    /// true → false
    Sell,
}

/// A step where the signal flipped relative to the previous step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionEvent {
    pub index: usize,
    pub timestamp: DateTime<Utc>,
    pub price: f64,
    pub kind: TransitionKind,
}

/// Ordered transitions between consecutive records.
///
/// The first step has no predecessor and never emits. Only steps present in
/// both `series` and `records` are considered.
pub fn extract_transitions(series: &PriceSeries, records: &[SignalRecord]) -> Vec<TransitionEvent> {
    records
        .windows(2)
        .zip(series.points().iter().skip(1))
        .enumerate()
        .filter_map(|(offset, (pair, point))| {
            let kind = match (pair[0].signal, pair[1].signal) {
                (false, true) => TransitionKind::Buy,
                (true, false) => TransitionKind::Sell,
                _ => return None,
            };
            Some(TransitionEvent {
                index: offset + 1,
                timestamp: point.timestamp,
                price: point.price,
                kind,
            })
        })
        .collect()
}

/// Scalar reduction of a signal series for reporting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestSummary {
    pub observations: usize,
    /// Steps where the signal is true.
    pub bullish_count: usize,
    pub buy_events: usize,
    pub sell_events: usize,
    pub transitions: Vec<TransitionEvent>,
}

impl BacktestSummary {
    pub fn from_records(series: &PriceSeries, records: &[SignalRecord]) -> Self {
        let transitions = extract_transitions(series, records);
        let buy_events = transitions
            .iter()
            .filter(|t| t.kind == TransitionKind::Buy)
            .count();
        Self {
            observations: records.len(),
            bullish_count: records.iter().filter(|r| r.signal).count(),
            buy_events,
            sell_events: transitions.len() - buy_events,
            transitions,
        }
    }

    /// Share of steps that were bullish, 0 for an empty series.
    pub fn bullish_ratio(&self) -> f64 {
        if self.observations == 0 {
            0.0
        } else {
            self.bullish_count as f64 / self.observations as f64
        }
    }
}
