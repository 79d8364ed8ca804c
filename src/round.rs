//! Round bookkeeping shared by every game
//!
//! A round's outcome is committed when it starts (crash point, mine layout,
//! dice roll); frames only reveal it. Plinko is the exception: the ball's
//! flight is the outcome.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::RoundConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameKind {
    Crash,
    Dice,
    Mines,
    Plinko,
}

impl GameKind {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "crash" => Some(GameKind::Crash),
            "dice" => Some(GameKind::Dice),
            "mines" => Some(GameKind::Mines),
            "plinko" => Some(GameKind::Plinko),
            _ => None,
        }
    }
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameKind::Crash => write!(f, "crash"),
            GameKind::Dice => write!(f, "dice"),
            GameKind::Mines => write!(f, "mines"),
            GameKind::Plinko => write!(f, "plinko"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoundId(pub u64);

impl fmt::Display for RoundId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Monotonic round id allocator, one per arcade
#[derive(Debug, Clone, Default)]
pub struct RoundIds {
    next: u64,
}

impl RoundIds {
    /// Id the next accepted round will get; does not consume it
    pub fn peek(&self) -> RoundId {
        RoundId(self.next + 1)
    }

    pub fn next_id(&mut self) -> RoundId {
        self.next += 1;
        RoundId(self.next)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundState {
    Running,
    Resolved,
}

/// A single bet from start to resolution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Round<O> {
    pub id: RoundId,
    pub config: RoundConfig,
    /// Result fixed at start (crash point, mine grid, dice roll)
    pub committed: O,
    pub state: RoundState,
}

impl<O> Round<O> {
    pub fn start(id: RoundId, config: RoundConfig, committed: O) -> Self {
        Self {
            id,
            config,
            committed,
            state: RoundState::Running,
        }
    }

    pub fn is_running(&self) -> bool {
        self.state == RoundState::Running
    }

    pub fn bet(&self) -> f64 {
        self.config.bet
    }
}

/// Terminal result of a round, handed to the wallet and the UI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    pub round_id: RoundId,
    pub game: GameKind,
    pub bet: f64,
    /// Multiplier applied to the bet (0 on a loss)
    pub multiplier: f64,
    pub payout: f64,
}

impl Resolution {
    pub fn win(round_id: RoundId, game: GameKind, bet: f64, multiplier: f64) -> Self {
        Self {
            round_id,
            game,
            bet,
            multiplier,
            payout: bet * multiplier,
        }
    }

    pub fn loss(round_id: RoundId, game: GameKind, bet: f64) -> Self {
        Self {
            round_id,
            game,
            bet,
            multiplier: 0.0,
            payout: 0.0,
        }
    }

    /// Plinko buckets below 1x still pay out but are a net loss
    pub fn is_win(&self) -> bool {
        self.payout > self.bet
    }
}

/// Screen position of one in-flight Plinko ball
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BallPosition {
    pub id: RoundId,
    pub x: f32,
    pub y: f32,
}

/// Everything a renderer needs to draw one frame
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    /// True crash multiplier of the running round
    pub progress: Option<f64>,
    /// Smoothed crash multiplier for display
    pub display_multiplier: Option<f64>,
    /// Smoothed crash curve, oldest first
    pub chart: Vec<f64>,
    pub ball_positions: Vec<BallPosition>,
    /// What a mines cashout would pay now (1.0 before the first reveal)
    pub mines_multiplier: Option<f64>,
    pub balance: f64,
}
