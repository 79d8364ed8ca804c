//! Virtuasino - outcome and simulation core for a browser casino arcade
//!
//! Core modules:
//! - `rng`: cosmetic and outcome-grade random draws
//! - `outcome`: house-edge-adjusted payout models (crash, dice, mines, plinko tables)
//! - `sim`: frame-driven engines (Plinko physics, Crash growth curve, Mines recompute)
//! - `games`: per-game round controllers and the `Arcade` aggregate
//! - `wallet`: balance collaborator interface
//! - `events`: observer interface for the UI
//!
//! The core never owns a scheduler: the host calls `Arcade::tick` with the
//! elapsed milliseconds of each rendered frame.

pub mod config;
pub mod error;
pub mod events;
pub mod games;
pub mod history;
pub mod outcome;
pub mod rng;
pub mod round;
pub mod settings;
pub mod sim;
pub mod wallet;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use config::{DiceMode, GameParams, RiskLevel, RoundConfig, Tuning};
pub use error::{ArcadeError, Result};
pub use events::{ArcadeEvent, ArcadeObserver};
pub use games::Arcade;
pub use rng::{RandomSource, SeededRandom, SystemRandom};
pub use round::{FrameSnapshot, GameKind, Resolution, RoundId};
pub use settings::{PerformanceMode, Settings};
pub use wallet::{SharedBalance, Wallet};

/// Game configuration constants
pub mod consts {
    /// Fixed Plinko frame step in milliseconds (60 Hz display clock)
    pub const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Maximum fixed frames per host tick to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Host deltas above this are treated as a stall (tab hidden, debugger)
    pub const MAX_FRAME_DELTA_MS: f64 = 100.0;

    /// 3% house edge
    pub const HOUSE_EDGE: f64 = 0.97;
    pub const MIN_BET: f64 = 1.0;
    pub const MAX_BET: f64 = 10_000.0;
    /// Starting and reset balance
    pub const DEFAULT_BALANCE: f64 = 10_000.0;

    /// Dice rolls are 1..=100
    pub const DICE_SIDES: u32 = 100;
    pub const DICE_MIN_TARGET: u32 = 1;
    pub const DICE_MAX_TARGET: u32 = 98;

    pub const MINES_GRID_SIZES: [usize; 3] = [3, 4, 5];
    /// At most 80% of tiles may be mines
    pub const MAX_MINE_PERCENT: usize = 80;

    /// Plinko board defaults (pixels, per-frame units)
    pub const PLINKO_ROWS: usize = 8;
    /// Largest pin field the board geometry supports
    pub const PLINKO_MAX_ROWS: usize = 16;
    pub const PLINKO_BOARD_WIDTH: f32 = 600.0;
    pub const PLINKO_BOARD_HEIGHT: f32 = 600.0;
    pub const PLINKO_GRAVITY: f32 = 0.2;
    pub const PLINKO_FRICTION: f32 = 0.99;
    pub const PLINKO_BOUNCE: f32 = 0.6;
    pub const PLINKO_BALL_RADIUS: f32 = 6.0;
    pub const PLINKO_PIN_RADIUS: f32 = 3.0;
    /// Random spread of a pin bounce around the contact normal (±45°)
    pub const PLINKO_BOUNCE_SPREAD: f32 = std::f32::consts::FRAC_PI_4;

    /// Crash curve defaults (per elapsed millisecond)
    pub const CRASH_GROWTH_RATE: f64 = 0.000_05;
    pub const CRASH_VOLATILITY: f64 = 0.000_2;
    pub const CRASH_SMOOTHING: f64 = 0.3;
    pub const CRASH_CHART_POINTS: usize = 300;
    /// Cap on committed crash points (guards u -> 1)
    pub const MAX_CRASH_POINT: f64 = 1_000_000.0;
    pub const MIN_AUTO_CASHOUT: f64 = 1.01;

    /// Entries kept in each game's recent-results list
    pub const HISTORY_LEN: usize = 10;
}
