//! Voters: one per indicator, turning a derived series into per-step opinions.
//!
//! An opinion is `Some(true)` (bullish), `Some(false)` (bearish) or `None`
//! while the indicator is still warming up at that step.
//!
//! | Indicator | Bullish when                |
//! |-----------|-----------------------------|
//! | SMA       | price > SMA                 |
//! | EMA       | price > EMA                 |
//! | RSI       | RSI < 30 (oversold)         |
//! | MACD      | MACD line > signal line     |
//! | BB        | price < lower band          |

use crate::domain::IndicatorKind;
use crate::indicators::{value_at, Bollinger, Ema, Indicator, Macd, Rsi, Sma};

/// Per-step opinion of one indicator.
pub type Opinion = Option<bool>;

/// RSI level below which the market counts as oversold.
pub const RSI_OVERSOLD: f64 = 30.0;

/// What a voter produced: the derived series it published and its opinions.
#[derive(Debug, Clone)]
pub struct VoterOutput {
    pub series: Vec<(String, Vec<f64>)>,
    pub opinions: Vec<Opinion>,
}

/// Trait for indicator voters.
///
/// A voter sees only the price history; it must not read past index t when
/// forming the opinion at t.
pub trait Voter: Send + Sync {
    fn kind(&self) -> IndicatorKind;

    /// Steps before the first defined opinion on a long enough series.
    fn warmup(&self) -> usize;

    fn evaluate(&self, prices: &[f64]) -> VoterOutput;
}

/// Opinion at every step from two aligned series; undefined if either is.
fn compare(a: &[f64], b: &[f64], bullish: impl Fn(f64, f64) -> bool) -> Vec<Opinion> {
    (0..a.len())
        .map(|i| Some(bullish(value_at(a, i)?, value_at(b, i)?)))
        .collect()
}

#[derive(Debug, Clone)]
pub struct SmaVoter {
    sma: Sma,
}

impl SmaVoter {
    pub fn new(sma: Sma) -> Self {
        Self { sma }
    }
}

impl Voter for SmaVoter {
    fn kind(&self) -> IndicatorKind {
        IndicatorKind::Sma
    }

    fn warmup(&self) -> usize {
        self.sma.lookback()
    }

    fn evaluate(&self, prices: &[f64]) -> VoterOutput {
        let sma = self.sma.compute(prices);
        let opinions = compare(prices, &sma, |price, avg| price > avg);
        VoterOutput {
            series: vec![(self.sma.name().to_string(), sma)],
            opinions,
        }
    }
}

#[derive(Debug, Clone)]
pub struct EmaVoter {
    ema: Ema,
}

impl EmaVoter {
    pub fn new(ema: Ema) -> Self {
        Self { ema }
    }
}

impl Voter for EmaVoter {
    fn kind(&self) -> IndicatorKind {
        IndicatorKind::Ema
    }

    fn warmup(&self) -> usize {
        self.ema.lookback()
    }

    fn evaluate(&self, prices: &[f64]) -> VoterOutput {
        let ema = self.ema.compute(prices);
        let opinions = compare(prices, &ema, |price, avg| price > avg);
        VoterOutput {
            series: vec![(self.ema.name().to_string(), ema)],
            opinions,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RsiVoter {
    rsi: Rsi,
    oversold: f64,
}

impl RsiVoter {
    pub fn new(rsi: Rsi) -> Self {
        Self {
            rsi,
            oversold: RSI_OVERSOLD,
        }
    }
}

impl Voter for RsiVoter {
    fn kind(&self) -> IndicatorKind {
        IndicatorKind::Rsi
    }

    fn warmup(&self) -> usize {
        self.rsi.lookback()
    }

    fn evaluate(&self, prices: &[f64]) -> VoterOutput {
        let rsi = self.rsi.compute(prices);
        let opinions = (0..rsi.len())
            .map(|i| value_at(&rsi, i).map(|r| r < self.oversold))
            .collect();
        VoterOutput {
            series: vec![(self.rsi.name().to_string(), rsi)],
            opinions,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MacdVoter {
    macd: Macd,
}

impl MacdVoter {
    pub fn new(macd: Macd) -> Self {
        Self { macd }
    }
}

impl Voter for MacdVoter {
    fn kind(&self) -> IndicatorKind {
        IndicatorKind::Macd
    }

    fn warmup(&self) -> usize {
        0
    }

    fn evaluate(&self, prices: &[f64]) -> VoterOutput {
        let series = self.macd.compute(prices);
        let opinions = compare(&series.line, &series.signal, |line, signal| line > signal);
        VoterOutput {
            series: vec![
                (self.macd.line_name(), series.line),
                (self.macd.signal_name(), series.signal),
            ],
            opinions,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BollingerVoter {
    bb: Bollinger,
}

impl BollingerVoter {
    pub fn new(bb: Bollinger) -> Self {
        Self { bb }
    }
}

impl Voter for BollingerVoter {
    fn kind(&self) -> IndicatorKind {
        IndicatorKind::Bb
    }

    fn warmup(&self) -> usize {
        // the lower band needs two points for a sample deviation
        self.bb.window().max(2) - 1
    }

    fn evaluate(&self, prices: &[f64]) -> VoterOutput {
        let bands = self.bb.compute(prices);
        let opinions = compare(prices, &bands.lower, |price, lower| price < lower);
        let window = self.bb.window();
        VoterOutput {
            series: vec![
                (format!("bb_upper_{window}"), bands.upper),
                (format!("bb_middle_{window}"), bands.middle),
                (format!("bb_lower_{window}"), bands.lower),
            ],
            opinions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sma_voter_bullish_above_average() {
        let mut prices = vec![10.0; 10];
        prices.push(11.0);
        let out = SmaVoter::new(Sma::new(10).unwrap()).evaluate(&prices);
        assert!(out.opinions[..9].iter().all(|o| o.is_none()));
        // SMA[9] = 10, price 10 is not above it
        assert_eq!(out.opinions[9], Some(false));
        assert_eq!(out.opinions[10], Some(true));
        assert_eq!(out.series[0].0, "sma_10");
    }

    #[test]
    fn ema_voter_defined_from_first_step() {
        let out = EmaVoter::new(Ema::new(3).unwrap()).evaluate(&[10.0, 12.0, 11.0]);
        // price[0] == EMA[0] → not above
        assert_eq!(out.opinions, vec![Some(false), Some(true), Some(false)]);
    }

    #[test]
    fn rsi_voter_bullish_when_oversold() {
        let falling = [105.0, 104.0, 103.0, 102.0, 101.0];
        let out = RsiVoter::new(Rsi::new(3).unwrap()).evaluate(&falling);
        assert_eq!(out.opinions[..3], [None, None, None]);
        assert_eq!(out.opinions[3], Some(true));

        let rising = [101.0, 102.0, 103.0, 104.0, 105.0];
        let out = RsiVoter::new(Rsi::new(3).unwrap()).evaluate(&rising);
        assert_eq!(out.opinions[4], Some(false));
    }

    #[test]
    fn macd_voter_publishes_both_lines() {
        let prices: Vec<f64> = (0..40).map(|i| 100.0 + i as f64).collect();
        let out = MacdVoter::new(Macd::new(12, 26, 9).unwrap()).evaluate(&prices);
        let names: Vec<&str> = out.series.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["macd_line_12_26", "macd_signal_12_26_9"]);
        // line == signal == 0 at the seed
        assert_eq!(out.opinions[0], Some(false));
        assert_eq!(out.opinions[39], Some(true));
    }

    #[test]
    fn bollinger_voter_bullish_below_lower_band() {
        // window of 6: the crash to 50 sits about 2.04 sample deviations below the mean
        let prices = [100.0, 101.0, 100.0, 101.0, 100.0, 101.0, 50.0];
        let out = BollingerVoter::new(Bollinger::new(6).unwrap()).evaluate(&prices);
        assert!(out.opinions[..5].iter().all(|o| o.is_none()));
        assert_eq!(out.opinions[5], Some(false));
        assert_eq!(out.opinions[6], Some(true));
        assert_eq!(out.series.len(), 3);
    }

    #[test]
    fn bollinger_voter_window_one_never_votes() {
        let voter = BollingerVoter::new(Bollinger::new(1).unwrap());
        assert!(voter.evaluate(&[1.0, 2.0]).opinions.iter().all(|o| o.is_none()));
        assert_eq!(voter.warmup(), 1);
    }

    #[test]
    fn flat_tail_after_variation_is_not_bullish() {
        let mut prices: Vec<f64> = (0..30)
            .map(|i| 25.0 + (i as f64 * 0.7).sin() * 2.3 + i as f64 * 0.071)
            .collect();
        let last = prices[29];
        prices.extend([last; 10]);

        let sma = SmaVoter::new(Sma::new(10).unwrap()).evaluate(&prices);
        let bb = BollingerVoter::new(Bollinger::new(10).unwrap()).evaluate(&prices);
        for i in 38..prices.len() {
            assert_eq!(sma.opinions[i], Some(false), "SMA at {i}");
            assert_eq!(bb.opinions[i], Some(false), "BB at {i}");
        }
    }
}
