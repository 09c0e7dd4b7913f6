//! Run fingerprinting: deterministic identification of a pipeline run.
//!
//! - `dataset_hash`: the price series (timestamps and exact price bits).
//! - `config_hash`: the indicator selection and window parameters.
//! - `run_id`: both combined. Identical inputs always give the same `run_id`,
//!   and since the pipeline is a pure function, the same output.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::{IndicatorSelection, PriceSeries};
use crate::profile::IndicatorParams;

/// BLAKE3 identity of a run's inputs, hex encoded.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunFingerprint {
    pub run_id: String,
    pub dataset_hash: String,
    pub config_hash: String,
}

impl RunFingerprint {
    pub fn compute(
        series: &PriceSeries,
        selection: &IndicatorSelection,
        params: &IndicatorParams,
    ) -> Self {
        let dataset_hash = dataset_hash(series);
        let config_hash = config_hash(selection, params);

        let mut hasher = blake3::Hasher::new();
        hasher.update(dataset_hash.as_bytes());
        hasher.update(b"+");
        hasher.update(config_hash.as_bytes());

        Self {
            run_id: hasher.finalize().to_hex().to_string(),
            dataset_hash,
            config_hash,
        }
    }

    /// First 12 hex characters of the run id, for display.
    pub fn short_id(&self) -> &str {
        &self.run_id[..12.min(self.run_id.len())]
    }
}

impl fmt::Display for RunFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.run_id)
    }
}

fn dataset_hash(series: &PriceSeries) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(&(series.len() as u64).to_le_bytes());
    for point in series.points() {
        hasher.update(&point.timestamp.timestamp_millis().to_le_bytes());
        hasher.update(&point.price.to_bits().to_le_bytes());
    }
    hasher.finalize().to_hex().to_string()
}

fn config_hash(selection: &IndicatorSelection, params: &IndicatorParams) -> String {
    let canonical = format!(
        "{selection}|sma={}|ema={}|rsi={}|macd={}/{}/{}|bb={}",
        params.sma,
        params.ema,
        params.rsi,
        params.macd_fast,
        params.macd_slow,
        params.macd_signal,
        params.bb_window,
    );
    blake3::hash(canonical.as_bytes()).to_hex().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::price::make_series;

    #[test]
    fn hashing_is_deterministic() {
        let series = make_series(&[1.0, 2.0, 3.0]);
        let sel = IndicatorSelection::all();
        let params = IndicatorParams::short();
        assert_eq!(
            RunFingerprint::compute(&series, &sel, &params),
            RunFingerprint::compute(&series, &sel, &params)
        );
    }

    #[test]
    fn price_change_changes_dataset_hash_only() {
        let sel = IndicatorSelection::all();
        let params = IndicatorParams::short();
        let a = RunFingerprint::compute(&make_series(&[1.0, 2.0, 3.0]), &sel, &params);
        let b = RunFingerprint::compute(&make_series(&[1.0, 2.0, 3.000001]), &sel, &params);
        assert_ne!(a.dataset_hash, b.dataset_hash);
        assert_eq!(a.config_hash, b.config_hash);
        assert_ne!(a.run_id, b.run_id);
    }

    #[test]
    fn params_and_selection_change_config_hash() {
        let series = make_series(&[1.0, 2.0, 3.0]);
        let all = IndicatorSelection::all();
        let base = RunFingerprint::compute(&series, &all, &IndicatorParams::short());
        let long = RunFingerprint::compute(&series, &all, &IndicatorParams::long());
        let sma_only = RunFingerprint::compute(
            &series,
            &IndicatorSelection::parse("SMA").unwrap(),
            &IndicatorParams::short(),
        );
        assert_ne!(base.config_hash, long.config_hash);
        assert_ne!(base.config_hash, sma_only.config_hash);
        assert_eq!(base.dataset_hash, long.dataset_hash);
    }

    #[test]
    fn short_id_is_prefix() {
        let fp = RunFingerprint::compute(
            &PriceSeries::empty(),
            &IndicatorSelection::empty(),
            &IndicatorParams::short(),
        );
        assert_eq!(fp.run_id.len(), 64);
        assert!(fp.run_id.starts_with(fp.short_id()));
        assert_eq!(fp.short_id().len(), 12);
    }
}
