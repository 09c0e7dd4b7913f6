//! End-to-end run: price series + selection + params → votes and transitions.
//!
//! Stateless. Each call builds fresh voters, so concurrent runs share nothing.

use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

use crate::backtest::BacktestSummary;
use crate::domain::{IndicatorKind, IndicatorSelection, PriceSeries};
use crate::fingerprint::RunFingerprint;
use crate::indicators::{IndicatorError, IndicatorValues};
use crate::profile::{IndicatorParams, ProfileError, ProfileSet};
use crate::signals::{Opinion, SignalRecord, SignalSynthesizer};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Indicator(#[from] IndicatorError),

    #[error(transparent)]
    Profile(#[from] ProfileError),
}

/// Everything a reporting collaborator needs from one run.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineOutput {
    pub fingerprint: RunFingerprint,
    pub params: IndicatorParams,
    pub selection: IndicatorSelection,
    pub indicators: IndicatorValues,
    pub opinions: BTreeMap<IndicatorKind, Vec<Opinion>>,
    pub records: Vec<SignalRecord>,
    pub summary: BacktestSummary,
}

/// Run the vote over `series` with explicit parameters.
pub fn run(
    series: &PriceSeries,
    selection: &IndicatorSelection,
    params: &IndicatorParams,
) -> Result<PipelineOutput, IndicatorError> {
    let span = tracing::info_span!(
        "pipeline",
        steps = series.len(),
        selection = %selection,
    );
    let _guard = span.enter();

    params.validate()?;
    let synthesizer = SignalSynthesizer::new(selection, params)?;
    if series.len() <= synthesizer.warmup() {
        tracing::debug!(
            warmup = synthesizer.warmup(),
            "series shorter than the slowest warmup; some voters never vote"
        );
    }

    let synthesis = synthesizer.run(&series.prices());
    let summary = BacktestSummary::from_records(series, &synthesis.records);

    tracing::info!(
        bullish = summary.bullish_count,
        buys = summary.buy_events,
        sells = summary.sell_events,
        "pipeline finished"
    );

    Ok(PipelineOutput {
        fingerprint: RunFingerprint::compute(series, selection, params),
        params: *params,
        selection: selection.clone(),
        indicators: synthesis.indicators,
        opinions: synthesis.opinions,
        records: synthesis.records,
        summary,
    })
}

/// Resolve `label` in `profiles`, then run.
pub fn run_profile(
    series: &PriceSeries,
    selection: &IndicatorSelection,
    profiles: &ProfileSet,
    label: &str,
) -> Result<PipelineOutput, PipelineError> {
    let params = profiles.resolve(label)?;
    tracing::debug!(profile = label, "resolved horizon profile");
    Ok(run(series, selection, params)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::price::make_series;

    #[test]
    fn unknown_profile_fails() {
        let err = run_profile(
            &make_series(&[1.0]),
            &IndicatorSelection::all(),
            &ProfileSet::builtin(),
            "weekly",
        )
        .unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Profile(ProfileError::ProfileNotFound(_))
        ));
    }

    #[test]
    fn zero_window_fails_even_for_unselected_indicator() {
        let params = IndicatorParams {
            bb_window: 0,
            ..IndicatorParams::short()
        };
        let err = run(
            &make_series(&[1.0, 2.0]),
            &IndicatorSelection::parse("SMA").unwrap(),
            &params,
        )
        .unwrap_err();
        assert_eq!(
            err,
            IndicatorError::InvalidParameter {
                name: "bb_window",
                value: 0
            }
        );
    }

    #[test]
    fn empty_series_yields_empty_output() {
        let out = run(
            &PriceSeries::empty(),
            &IndicatorSelection::all(),
            &IndicatorParams::short(),
        )
        .unwrap();
        assert!(out.records.is_empty());
        assert_eq!(out.summary.observations, 0);
        assert!(out.indicators.iter().all(|(_, s)| s.is_empty()));
    }

    #[test]
    fn output_is_aligned_with_input() {
        let prices: Vec<f64> = (0..40).map(|i| 50.0 + (i % 7) as f64).collect();
        let series = make_series(&prices);
        let out = run_profile(
            &series,
            &IndicatorSelection::all(),
            &ProfileSet::builtin(),
            "short",
        )
        .unwrap();
        assert_eq!(out.records.len(), 40);
        for (name, values) in out.indicators.iter() {
            assert_eq!(values.len(), 40, "series {name} is misaligned");
        }
        assert_eq!(out.params, IndicatorParams::short());
    }
}
