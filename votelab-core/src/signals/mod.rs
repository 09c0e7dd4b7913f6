//! Signal synthesis: per-indicator opinions combined by majority vote.
//!
//! Voters are portfolio-agnostic: they receive the price history only. The
//! synthesizer never looks at anything but the voters' opinions when counting.

pub mod factory;
pub mod synthesizer;
pub mod voter;

pub use factory::{create_voter, create_voters};
pub use synthesizer::{aggregate_votes, SignalRecord, SignalSynthesizer, Synthesis};
pub use voter::{
    BollingerVoter, EmaVoter, MacdVoter, Opinion, RsiVoter, SmaVoter, Voter, VoterOutput,
    RSI_OVERSOLD,
};
