//! votelab core — technical indicators combined into a majority-vote signal.
//!
//! This crate is the pure, synchronous heart of votelab:
//! - Domain types (price points, validated price series, indicator selection)
//! - Indicator library (SMA, EMA, RSI, MACD, Bollinger Bands) over price slices
//! - Voters turning each indicator into a per-step bullish/bearish opinion
//! - Vote aggregation with a strict-majority, bearish-on-tie policy
//! - Horizon profiles (label → window lengths) loaded from TOML
//! - Backtest summary of signal transitions, price alerts, run fingerprints
//!
//! Nothing here performs I/O beyond reading a profile file on request.

pub mod alert;
pub mod backtest;
pub mod domain;
pub mod fingerprint;
pub mod indicators;
pub mod pipeline;
pub mod profile;
pub mod signals;

pub use backtest::{extract_transitions, BacktestSummary, TransitionEvent, TransitionKind};
pub use domain::{IndicatorKind, IndicatorSelection, PricePoint, PriceSeries, SeriesError};
pub use pipeline::{run, run_profile, PipelineError, PipelineOutput};
pub use profile::{IndicatorParams, ProfileError, ProfileSet};
pub use signals::{SignalRecord, SignalSynthesizer};
