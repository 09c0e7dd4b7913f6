//! Horizon profiles: named bundles of indicator windows.
//!
//! A `ProfileSet` maps a horizon label ("short", "long", or anything a caller
//! adds) to an `IndicatorParams`. The built-in set is plain data; a TOML file
//! with one table per label extends or overrides it:
//!
//! ```toml
//! [swing]
//! sma = 20
//! ema = 20
//! rsi = 10
//! macd_fast = 12
//! macd_slow = 26
//! macd_signal = 9
//! bb_window = 20
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

use crate::indicators::{check_window, IndicatorError};

/// Window lengths consumed by the indicator library and the voters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IndicatorParams {
    pub sma: usize,
    pub ema: usize,
    pub rsi: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub bb_window: usize,
}

impl IndicatorParams {
    pub fn short() -> Self {
        Self {
            sma: 10,
            ema: 10,
            rsi: 7,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            bb_window: 20,
        }
    }

    pub fn long() -> Self {
        Self {
            sma: 50,
            ema: 50,
            rsi: 14,
            ..Self::short()
        }
    }

    /// Every window must be positive. An inverted MACD pair is allowed and
    /// only logged.
    pub fn validate(&self) -> Result<(), IndicatorError> {
        check_window("sma", self.sma)?;
        check_window("ema", self.ema)?;
        check_window("rsi", self.rsi)?;
        check_window("macd_fast", self.macd_fast)?;
        check_window("macd_slow", self.macd_slow)?;
        check_window("macd_signal", self.macd_signal)?;
        check_window("bb_window", self.bb_window)?;

        if self.macd_fast >= self.macd_slow {
            tracing::warn!(
                macd_fast = self.macd_fast,
                macd_slow = self.macd_slow,
                "macd_fast is not below macd_slow; MACD sign convention is inverted"
            );
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("profile not found: '{0}'")]
    ProfileNotFound(String),

    #[error("profile '{label}': {source}")]
    InvalidParameter {
        label: String,
        #[source]
        source: IndicatorError,
    },

    #[error("parse profiles TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("serialize profiles: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("read profiles file: {0}")]
    Io(#[from] std::io::Error),
}

/// Label → parameters mapping.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileSet {
    profiles: BTreeMap<String, IndicatorParams>,
}

impl ProfileSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// The two stock horizons: `short` and `long`.
    pub fn builtin() -> Self {
        let mut set = Self::new();
        set.profiles.insert("short".into(), IndicatorParams::short());
        set.profiles.insert("long".into(), IndicatorParams::long());
        set
    }

    /// Parse profiles from a TOML string. Every profile is validated.
    pub fn from_toml(content: &str) -> Result<Self, ProfileError> {
        let set: Self = toml::from_str(content)?;
        for (label, params) in &set.profiles {
            params
                .validate()
                .map_err(|source| ProfileError::InvalidParameter {
                    label: label.clone(),
                    source,
                })?;
        }
        Ok(set)
    }

    /// Load profiles from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ProfileError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn to_toml(&self) -> Result<String, ProfileError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Add or replace a profile.
    pub fn insert(
        &mut self,
        label: impl Into<String>,
        params: IndicatorParams,
    ) -> Result<(), ProfileError> {
        let label = label.into();
        params
            .validate()
            .map_err(|source| ProfileError::InvalidParameter {
                label: label.clone(),
                source,
            })?;
        self.profiles.insert(label, params);
        Ok(())
    }

    /// Merge `other` in; its labels win over existing ones.
    pub fn extend(&mut self, other: ProfileSet) {
        self.profiles.extend(other.profiles);
    }

    /// Look up the parameters for a horizon label.
    pub fn resolve(&self, label: &str) -> Result<&IndicatorParams, ProfileError> {
        self.profiles
            .get(label)
            .ok_or_else(|| ProfileError::ProfileNotFound(label.to_string()))
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.profiles.keys().map(|k| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &IndicatorParams)> {
        self.profiles.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}
