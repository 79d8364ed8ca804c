//! Error taxonomy for the arcade core
//!
//! Every failure here is local to one round: it either prevents the round
//! from starting or forces a deterministic terminal multiplier.

use crate::round::GameKind;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ArcadeError {
    /// Bet exceeds the available balance; nothing was mutated
    #[error("insufficient funds: bet {bet:.2} exceeds balance {balance:.2}")]
    InsufficientFunds { bet: f64, balance: f64 },

    /// Out-of-range bet, target, grid or tuning parameter
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Probability of the next event is zero (or undefined)
    #[error("degenerate probability: {0}")]
    DegenerateProbability(&'static str),

    #[error("a {0} round is already in progress")]
    RoundInProgress(GameKind),

    #[error("no active {0} round")]
    NoActiveRound(GameKind),

    #[error("tile {index} is out of range or already revealed")]
    InvalidTile { index: usize },

    /// The outcome-grade entropy source failed
    #[error("entropy source unavailable: {0}")]
    Entropy(String),
}

impl ArcadeError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        ArcadeError::InvalidConfiguration(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, ArcadeError>;
