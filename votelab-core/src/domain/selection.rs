//! Indicator vocabulary and the caller's chosen subset.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The five indicators that can take part in a vote.
///
/// Declaration order is the menu order (1-based) and the order in which
/// opinions are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IndicatorKind {
    Sma,
    Ema,
    Rsi,
    Macd,
    Bb,
}

impl IndicatorKind {
    pub const ALL: [IndicatorKind; 5] = [Self::Sma, Self::Ema, Self::Rsi, Self::Macd, Self::Bb];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Sma => "SMA",
            Self::Ema => "EMA",
            Self::Rsi => "RSI",
            Self::Macd => "MACD",
            Self::Bb => "BB",
        }
    }

    /// 1-based position in the menu.
    pub fn menu_number(&self) -> usize {
        Self::ALL.iter().position(|k| k == self).map_or(0, |p| p + 1)
    }
}

impl fmt::Display for IndicatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("unknown indicator '{0}' (expected one of SMA, EMA, RSI, MACD, BB or 1-5)")]
    UnknownIndicator(String),
}

impl FromStr for IndicatorKind {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        if let Ok(number) = token.parse::<usize>() {
            return number
                .checked_sub(1)
                .and_then(|i| Self::ALL.get(i).copied())
                .ok_or_else(|| SelectionError::UnknownIndicator(token.to_string()));
        }
        match token.to_ascii_lowercase().as_str() {
            "sma" => Ok(Self::Sma),
            "ema" => Ok(Self::Ema),
            "rsi" => Ok(Self::Rsi),
            "macd" => Ok(Self::Macd),
            "bb" | "bollinger" => Ok(Self::Bb),
            _ => Err(SelectionError::UnknownIndicator(token.to_string())),
        }
    }
}

/// Set of indicators that vote. Ordered by `IndicatorKind`, duplicates collapse.
///
/// An empty selection is legal: every step then ends 0/0 and resolves bearish.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorSelection(BTreeSet<IndicatorKind>);

impl IndicatorSelection {
    pub fn new(kinds: impl IntoIterator<Item = IndicatorKind>) -> Self {
        Self(kinds.into_iter().collect())
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn all() -> Self {
        Self::new(IndicatorKind::ALL)
    }

    /// Parse a comma-separated list such as `"SMA, rsi"` or `"1,3"`.
    pub fn parse(input: &str) -> Result<Self, SelectionError> {
        input
            .split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(IndicatorKind::from_str)
            .collect::<Result<BTreeSet<_>, _>>()
            .map(Self)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, kind: IndicatorKind) -> bool {
        self.0.contains(&kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = IndicatorKind> + '_ {
        self.0.iter().copied()
    }
}

impl FromStr for IndicatorSelection {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for IndicatorSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let labels: Vec<&str> = self.0.iter().map(|k| k.label()).collect();
        f.write_str(&labels.join(","))
    }
}
