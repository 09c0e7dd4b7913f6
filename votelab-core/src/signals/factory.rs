//! Factory: builds voters for an indicator selection from a parameter bundle.

use crate::domain::{IndicatorKind, IndicatorSelection};
use crate::indicators::{Bollinger, Ema, IndicatorError, Macd, Rsi, Sma};
use crate::profile::IndicatorParams;

use super::voter::{BollingerVoter, EmaVoter, MacdVoter, RsiVoter, SmaVoter, Voter};

/// Create the voter for one indicator.
pub fn create_voter(
    kind: IndicatorKind,
    params: &IndicatorParams,
) -> Result<Box<dyn Voter>, IndicatorError> {
    Ok(match kind {
        IndicatorKind::Sma => Box::new(SmaVoter::new(Sma::new(params.sma)?)),
        IndicatorKind::Ema => Box::new(EmaVoter::new(Ema::new(params.ema)?)),
        IndicatorKind::Rsi => Box::new(RsiVoter::new(Rsi::new(params.rsi)?)),
        IndicatorKind::Macd => Box::new(MacdVoter::new(Macd::new(
            params.macd_fast,
            params.macd_slow,
            params.macd_signal,
        )?)),
        IndicatorKind::Bb => Box::new(BollingerVoter::new(Bollinger::new(params.bb_window)?)),
    })
}

/// Create one voter per selected indicator, in selection order.
pub fn create_voters(
    selection: &IndicatorSelection,
    params: &IndicatorParams,
) -> Result<Vec<Box<dyn Voter>>, IndicatorError> {
    selection
        .iter()
        .map(|kind| create_voter(kind, params))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_every_kind() {
        let params = IndicatorParams::short();
        for kind in IndicatorKind::ALL {
            let voter = create_voter(kind, &params).unwrap();
            assert_eq!(voter.kind(), kind);
        }
    }

    #[test]
    fn warmups_follow_params() {
        let params = IndicatorParams::long();
        let warmup = |kind| create_voter(kind, &params).unwrap().warmup();
        assert_eq!(warmup(IndicatorKind::Sma), 49);
        assert_eq!(warmup(IndicatorKind::Ema), 0);
        assert_eq!(warmup(IndicatorKind::Rsi), 14);
        assert_eq!(warmup(IndicatorKind::Macd), 0);
        assert_eq!(warmup(IndicatorKind::Bb), 19);
    }

    #[test]
    fn selection_order_is_kept() {
        let selection = IndicatorSelection::parse("BB,SMA").unwrap();
        let voters = create_voters(&selection, &IndicatorParams::short()).unwrap();
        let kinds: Vec<_> = voters.iter().map(|v| v.kind()).collect();
        assert_eq!(kinds, vec![IndicatorKind::Sma, IndicatorKind::Bb]);
    }

    #[test]
    fn zero_window_fails_for_selected_kind_only() {
        let params = IndicatorParams {
            rsi: 0,
            ..IndicatorParams::short()
        };
        assert!(create_voters(&IndicatorSelection::parse("SMA").unwrap(), &params).is_ok());
        assert_eq!(
            create_voters(&IndicatorSelection::parse("SMA,RSI").unwrap(), &params).err(),
            Some(IndicatorError::InvalidParameter { name: "rsi", value: 0 })
        );
    }
}
