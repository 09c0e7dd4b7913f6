//! Signal synthesis: evaluate every selected voter and count votes per step.
//!
//! At each step a defined `true` opinion is a buy vote, a defined `false`
//! opinion is a sell vote and an undefined opinion abstains. The step is
//! bullish only on a strict majority: `buy_votes > sell_votes`. Ties, the
//! all-abstain case and the empty selection all resolve bearish.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::{IndicatorKind, IndicatorSelection};
use crate::indicators::{IndicatorError, IndicatorValues};
use crate::profile::IndicatorParams;

use super::factory::create_voters;
use super::voter::{Opinion, Voter, VoterOutput};

/// Vote tally and final signal at one step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalRecord {
    pub buy_votes: usize,
    pub sell_votes: usize,
    /// True when net bullish.
    pub signal: bool,
}

impl SignalRecord {
    pub fn from_votes(buy_votes: usize, sell_votes: usize) -> Self {
        Self {
            buy_votes,
            sell_votes,
            signal: buy_votes > sell_votes,
        }
    }

    pub fn abstentions(&self, selected: usize) -> usize {
        selected.saturating_sub(self.buy_votes + self.sell_votes)
    }
}

/// Tally opinion series into `len` records. Missing positions abstain.
pub fn aggregate_votes(opinions: &[Vec<Opinion>], len: usize) -> Vec<SignalRecord> {
    (0..len)
        .map(|i| {
            let (buy, sell) = opinions
                .iter()
                .filter_map(|series| series.get(i).copied().flatten())
                .fold((0, 0), |(buy, sell), bullish| {
                    if bullish {
                        (buy + 1, sell)
                    } else {
                        (buy, sell + 1)
                    }
                });
            SignalRecord::from_votes(buy, sell)
        })
        .collect()
}

/// Everything the synthesizer produced for one price series.
#[derive(Debug, Clone, Serialize)]
pub struct Synthesis {
    pub indicators: IndicatorValues,
    pub opinions: BTreeMap<IndicatorKind, Vec<Opinion>>,
    pub records: Vec<SignalRecord>,
}

/// Runs a fixed set of voters over price series.
pub struct SignalSynthesizer {
    voters: Vec<Box<dyn Voter>>,
}

impl SignalSynthesizer {
    pub fn new(
        selection: &IndicatorSelection,
        params: &IndicatorParams,
    ) -> Result<Self, IndicatorError> {
        Ok(Self {
            voters: create_voters(selection, params)?,
        })
    }

    /// Steps until every voter can hold an opinion.
    pub fn warmup(&self) -> usize {
        self.voters.iter().map(|v| v.warmup()).max().unwrap_or(0)
    }

    pub fn run(&self, prices: &[f64]) -> Synthesis {
        tracing::debug!(
            voters = self.voters.len(),
            steps = prices.len(),
            "evaluating voters"
        );

        // Voters are independent; collect keeps their order.
        let outputs: Vec<(IndicatorKind, VoterOutput)> = self
            .voters
            .par_iter()
            .map(|voter| (voter.kind(), voter.evaluate(prices)))
            .collect();

        let mut indicators = IndicatorValues::new();
        let mut opinions = BTreeMap::new();
        for (kind, output) in outputs {
            for (name, series) in output.series {
                indicators.insert(name, series);
            }
            opinions.insert(kind, output.opinions);
        }

        let columns: Vec<Vec<Opinion>> = opinions.values().cloned().collect();
        let records = aggregate_votes(&columns, prices.len());

        tracing::debug!(
            bullish = records.iter().filter(|r| r.signal).count(),
            "votes aggregated"
        );

        Synthesis {
            indicators,
            opinions,
            records,
        }
    }
}
