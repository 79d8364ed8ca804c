//! Round configuration and engine tuning
//!
//! `RoundConfig` is what a player submits with a bet; it is validated before
//! any random draw or balance debit and is immutable afterwards. `Tuning` is
//! the operator-side numeric configuration, loadable from JSON.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{ArcadeError, Result};
use crate::round::GameKind;

/// Dice bet direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiceMode {
    Under,
    Over,
}

impl DiceMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiceMode::Under => "under",
            DiceMode::Over => "over",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "under" => Some(DiceMode::Under),
            "over" => Some(DiceMode::Over),
            _ => None,
        }
    }
}

/// Plinko risk level, selects one of the fixed multiplier tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    #[default]
    Medium,
    High,
}

impl RiskLevel {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(RiskLevel::Low),
            "medium" | "med" => Some(RiskLevel::Medium),
            "high" => Some(RiskLevel::High),
            _ => None,
        }
    }
}

/// Per-game parameters of a round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "game", rename_all = "lowercase")]
pub enum GameParams {
    Crash { auto_cashout: Option<f64> },
    Dice { target: u32, mode: DiceMode },
    Mines { grid_size: usize, mine_count: usize },
    Plinko { risk: RiskLevel },
}

impl GameParams {
    pub fn kind(&self) -> GameKind {
        match self {
            GameParams::Crash { .. } => GameKind::Crash,
            GameParams::Dice { .. } => GameKind::Dice,
            GameParams::Mines { .. } => GameKind::Mines,
            GameParams::Plinko { .. } => GameKind::Plinko,
        }
    }
}

/// A player's bet plus game parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundConfig {
    pub bet: f64,
    pub params: GameParams,
}

impl RoundConfig {
    pub fn crash(bet: f64, auto_cashout: Option<f64>) -> Self {
        Self {
            bet,
            params: GameParams::Crash { auto_cashout },
        }
    }

    pub fn dice(bet: f64, target: u32, mode: DiceMode) -> Self {
        Self {
            bet,
            params: GameParams::Dice { target, mode },
        }
    }

    pub fn mines(bet: f64, grid_size: usize, mine_count: usize) -> Self {
        Self {
            bet,
            params: GameParams::Mines {
                grid_size,
                mine_count,
            },
        }
    }

    pub fn plinko(bet: f64, risk: RiskLevel) -> Self {
        Self {
            bet,
            params: GameParams::Plinko { risk },
        }
    }

    pub fn kind(&self) -> GameKind {
        self.params.kind()
    }

    /// Reject anything out of range before a draw or debit happens
    pub fn validate(&self, tuning: &Tuning) -> Result<()> {
        if !self.bet.is_finite() || self.bet < tuning.min_bet || self.bet > tuning.max_bet {
            return Err(ArcadeError::invalid(format!(
                "bet {} outside [{}, {}]",
                self.bet, tuning.min_bet, tuning.max_bet
            )));
        }

        match self.params {
            GameParams::Crash { auto_cashout } => {
                if let Some(target) = auto_cashout {
                    if !target.is_finite() || target < MIN_AUTO_CASHOUT {
                        return Err(ArcadeError::invalid(format!(
                            "auto cashout {target} below {MIN_AUTO_CASHOUT}"
                        )));
                    }
                }
            }
            GameParams::Dice { target, .. } => {
                if !(DICE_MIN_TARGET..=DICE_MAX_TARGET).contains(&target) {
                    return Err(ArcadeError::invalid(format!(
                        "dice target {target} outside [{DICE_MIN_TARGET}, {DICE_MAX_TARGET}]"
                    )));
                }
            }
            GameParams::Mines {
                grid_size,
                mine_count,
            } => {
                if !MINES_GRID_SIZES.contains(&grid_size) {
                    return Err(ArcadeError::invalid(format!(
                        "grid size {grid_size} not one of {MINES_GRID_SIZES:?}"
                    )));
                }
                let max = max_mines(grid_size);
                if mine_count < 1 || mine_count > max {
                    return Err(ArcadeError::invalid(format!(
                        "mine count {mine_count} outside [1, {max}] for {grid_size}x{grid_size}"
                    )));
                }
            }
            GameParams::Plinko { .. } => {}
        }
        Ok(())
    }
}

/// Largest mine count allowed on a `size`×`size` grid
pub fn max_mines(grid_size: usize) -> usize {
    (grid_size * grid_size) * MAX_MINE_PERCENT / 100
}

/// Plinko board geometry and per-frame physics constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlinkoTuning {
    pub rows: usize,
    pub width: f32,
    pub height: f32,
    /// Downward acceleration per frame
    pub gravity: f32,
    /// Velocity multiplier per frame
    pub friction: f32,
    /// Speed retained on pin and wall bounces
    pub bounce: f32,
    pub ball_radius: f32,
    pub pin_radius: f32,
}

impl Default for PlinkoTuning {
    fn default() -> Self {
        Self {
            rows: PLINKO_ROWS,
            width: PLINKO_BOARD_WIDTH,
            height: PLINKO_BOARD_HEIGHT,
            gravity: PLINKO_GRAVITY,
            friction: PLINKO_FRICTION,
            bounce: PLINKO_BOUNCE,
            ball_radius: PLINKO_BALL_RADIUS,
            pin_radius: PLINKO_PIN_RADIUS,
        }
    }
}

/// Crash growth curve constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrashTuning {
    /// Exponential growth per elapsed millisecond
    pub growth_rate: f64,
    /// Fluctuation amplitude per elapsed millisecond
    pub volatility: f64,
    /// Display smoothing factor in (0, 1]
    pub smoothing: f64,
    /// Upper bound on chart length; the performance preset picks within it
    pub chart_points: usize,
    pub max_crash_point: f64,
}

impl Default for CrashTuning {
    fn default() -> Self {
        Self {
            growth_rate: CRASH_GROWTH_RATE,
            volatility: CRASH_VOLATILITY,
            smoothing: CRASH_SMOOTHING,
            chart_points: CRASH_CHART_POINTS,
            max_crash_point: MAX_CRASH_POINT,
        }
    }
}

/// Operator-side engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Multiplicative edge applied to fair odds, in (0, 1)
    pub house_edge: f64,
    pub min_bet: f64,
    pub max_bet: f64,
    pub plinko: PlinkoTuning,
    pub crash: CrashTuning,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            house_edge: HOUSE_EDGE,
            min_bet: MIN_BET,
            max_bet: MAX_BET,
            plinko: PlinkoTuning::default(),
            crash: CrashTuning::default(),
        }
    }
}

impl Tuning {
    /// Parse and validate a JSON tuning document; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let tuning: Tuning = serde_json::from_str(json)
            .map_err(|e| ArcadeError::invalid(format!("tuning: {e}")))?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ArcadeError::invalid(format!("tuning: {e}")))
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.house_edge > 0.0 && self.house_edge < 1.0) {
            return Err(ArcadeError::invalid(format!(
                "house edge {} outside (0, 1)",
                self.house_edge
            )));
        }
        if !(is_positive(self.min_bet) && self.max_bet.is_finite() && self.min_bet <= self.max_bet) {
            return Err(ArcadeError::invalid("bet bounds must satisfy 0 < min <= max"));
        }

        let p = &self.plinko;
        if !(1..=PLINKO_MAX_ROWS).contains(&p.rows) {
            return Err(ArcadeError::invalid(format!(
                "plinko rows {} outside [1, {PLINKO_MAX_ROWS}]",
                p.rows
            )));
        }
        if !is_positive(f64::from(p.width)) || !is_positive(f64::from(p.height)) {
            return Err(ArcadeError::invalid("plinko board must have a positive size"));
        }
        if !is_positive(f64::from(p.ball_radius))
            || !is_positive(f64::from(p.pin_radius))
            || p.ball_radius * 2.0 >= p.width
            || p.ball_radius * 2.0 >= p.height
        {
            return Err(ArcadeError::invalid("plinko radii must be positive and fit the board"));
        }
        // Without downward pull a ball never reaches the buckets
        if !is_positive(f64::from(p.gravity)) {
            return Err(ArcadeError::invalid(format!(
                "plinko gravity {} must be positive",
                p.gravity
            )));
        }
        if !(p.friction > 0.0 && p.friction <= 1.0) || !(p.bounce > 0.0 && p.bounce <= 1.0) {
            return Err(ArcadeError::invalid("plinko friction and bounce must be in (0, 1]"));
        }

        let c = &self.crash;
        if !is_positive(c.growth_rate) || !(c.volatility.is_finite() && c.volatility >= 0.0) {
            return Err(ArcadeError::invalid(
                "crash growth must be positive and volatility non-negative",
            ));
        }
        if !(c.smoothing > 0.0 && c.smoothing <= 1.0) {
            return Err(ArcadeError::invalid("crash smoothing must be in (0, 1]"));
        }
        if c.chart_points < 2 || !(c.max_crash_point.is_finite() && c.max_crash_point >= 1.0) {
            return Err(ArcadeError::invalid("crash chart needs 2+ points and a finite max crash >= 1"));
        }
        Ok(())
    }
}

/// Finite and strictly above zero (rejects NaN)
fn is_positive(v: f64) -> bool {
    v.is_finite() && v > 0.0
}
