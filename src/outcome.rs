//! Outcome models
//!
//! Pure functions from random draws and configuration to house-edge-adjusted
//! results. Nothing here touches the wallet or the frame clock.

use serde::{Deserialize, Serialize};

use crate::config::{DiceMode, RiskLevel};
use crate::consts::DICE_SIDES;
use crate::error::{ArcadeError, Result};
use crate::rng::RandomSource;

/// Largest `u` fed into the crash formula: one 32-bit step below 1
const MAX_CRASH_UNIT: f64 = 1.0 - 1.0 / 4_294_967_296.0;

// ---------------------------------------------------------------------------
// Crash
// ---------------------------------------------------------------------------

/// Crash point for a given uniform draw `u ∈ [0, 1)`
///
/// `raw = edge · e / (1 − u)`, floored to two decimals, never below 1 and
/// never above `max_crash_point`. Deterministic in `u`.
pub fn crash_point_from_unit(u: f64, house_edge: f64, max_crash_point: f64) -> f64 {
    let u = if u.is_nan() { 0.0 } else { u.clamp(0.0, MAX_CRASH_UNIT) };
    let raw = house_edge * std::f64::consts::E / (1.0 - u);
    let floored = (raw * 100.0).floor() / 100.0;
    floored.clamp(1.0, max_crash_point.max(1.0))
}

/// Commit a crash point from one outcome-grade draw
pub fn draw_crash_point(
    rng: &mut impl RandomSource,
    house_edge: f64,
    max_crash_point: f64,
) -> Result<f64> {
    let u = rng.secure_unit()?;
    Ok(crash_point_from_unit(u, house_edge, max_crash_point))
}

// ---------------------------------------------------------------------------
// Dice
// ---------------------------------------------------------------------------

/// Probability of winning a dice bet, in [0, 1]
pub fn dice_win_chance(target: u32, mode: DiceMode) -> f64 {
    let sides = DICE_SIDES;
    let winning = match mode {
        // result <= target
        DiceMode::Under => target.min(sides),
        // result >= target
        DiceMode::Over => (sides + 1).saturating_sub(target.max(1)),
    };
    f64::from(winning) / f64::from(sides)
}

/// Dice payout multiplier `(1 / chance) · edge`
pub fn try_dice_multiplier(target: u32, mode: DiceMode, house_edge: f64) -> Result<f64> {
    let chance = dice_win_chance(target, mode);
    if chance <= 0.0 {
        return Err(ArcadeError::DegenerateProbability("dice win chance is zero"));
    }
    Ok(house_edge / chance)
}

/// Dice multiplier with `0.0` as the degenerate sentinel
pub fn dice_multiplier(target: u32, mode: DiceMode, house_edge: f64) -> f64 {
    try_dice_multiplier(target, mode, house_edge).unwrap_or_else(|e| {
        log::warn!("dice target {target} {}: {e}", mode.as_str());
        0.0
    })
}

pub fn dice_wins(result: u32, target: u32, mode: DiceMode) -> bool {
    match mode {
        DiceMode::Under => result <= target,
        DiceMode::Over => result >= target,
    }
}

pub fn roll_dice(rng: &mut impl RandomSource) -> Result<u32> {
    rng.secure_range(1, DICE_SIDES)
}

/// Live win chance and multiplier for a dice target, shown before betting
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiceQuote {
    /// Percent, 0..=100
    pub win_chance: f64,
    pub multiplier: f64,
}

impl DiceQuote {
    pub fn new(target: u32, mode: DiceMode, house_edge: f64) -> Self {
        Self {
            win_chance: dice_win_chance(target, mode) * 100.0,
            multiplier: dice_multiplier(target, mode, house_edge),
        }
    }
}

// ---------------------------------------------------------------------------
// Mines
// ---------------------------------------------------------------------------

/// Cashout multiplier after `revealed` safe tiles
///
/// While the round is live every mine is still hidden, so the next reveal is
/// safe with probability `(remaining − mines) / remaining` where
/// `remaining = total − revealed`. The multiplier is the house-edged inverse.
pub fn try_mines_multiplier(
    total_tiles: usize,
    mine_count: usize,
    revealed: usize,
    house_edge: f64,
) -> Result<f64> {
    let remaining = total_tiles.saturating_sub(revealed);
    if remaining == 0 {
        return Err(ArcadeError::DegenerateProbability("no tiles remaining"));
    }
    let safe_remaining = remaining.saturating_sub(mine_count);
    if safe_remaining == 0 {
        return Err(ArcadeError::DegenerateProbability("no safe tiles remaining"));
    }
    let p_safe = safe_remaining as f64 / remaining as f64;
    Ok(house_edge / p_safe)
}

/// Mines multiplier with `0.0` as the degenerate sentinel
pub fn mines_multiplier(total_tiles: usize, mine_count: usize, revealed: usize, house_edge: f64) -> f64 {
    try_mines_multiplier(total_tiles, mine_count, revealed, house_edge).unwrap_or_else(|e| {
        log::warn!("mines {revealed}/{total_tiles} revealed with {mine_count} mines: {e}");
        0.0
    })
}

/// Square grid of hidden mines, row-major
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MineGrid {
    size: usize,
    cells: Vec<bool>,
}

impl MineGrid {
    /// Place exactly `mine_count` mines uniformly at random
    ///
    /// Partial Fisher-Yates over tile indices with outcome-grade draws: one
    /// draw per mine, so generation always terminates and never duplicates.
    pub fn generate(size: usize, mine_count: usize, rng: &mut impl RandomSource) -> Result<Self> {
        let total = size * size;
        if mine_count == 0 || mine_count >= total {
            return Err(ArcadeError::invalid(format!(
                "cannot place {mine_count} mines on {total} tiles"
            )));
        }
        let last = u32::try_from(total - 1)
            .map_err(|_| ArcadeError::invalid(format!("grid of {total} tiles is too large")))?;

        let mut indices: Vec<usize> = (0..total).collect();
        for i in 0..mine_count {
            let j = rng.secure_range(i as u32, last)? as usize;
            indices.swap(i, j);
        }

        let mut cells = vec![false; total];
        for &idx in &indices[..mine_count] {
            cells[idx] = true;
        }
        Ok(Self { size, cells })
    }

    /// Build a grid from explicit mine positions
    pub fn from_mines(size: usize, mines: &[usize]) -> Result<Self> {
        let total = size * size;
        let mut cells = vec![false; total];
        for &idx in mines {
            match cells.get_mut(idx) {
                Some(cell) if !*cell => *cell = true,
                _ => return Err(ArcadeError::invalid(format!("bad mine position {idx}"))),
            }
        }
        Ok(Self { size, cells })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn total_tiles(&self) -> usize {
        self.cells.len()
    }

    pub fn mine_count(&self) -> usize {
        self.cells.iter().filter(|&&m| m).count()
    }

    /// `None` when `index` is off the grid
    pub fn is_mine(&self, index: usize) -> Option<bool> {
        self.cells.get(index).copied()
    }

    pub fn mine_positions(&self) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter_map(|(i, &m)| m.then_some(i))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Plinko
// ---------------------------------------------------------------------------

const LOW_RISK: [f64; 8] = [1.5, 1.3, 1.1, 1.0, 1.0, 1.1, 1.3, 1.5];
const MEDIUM_RISK: [f64; 8] = [3.0, 1.5, 1.2, 0.5, 0.5, 1.2, 1.5, 3.0];
const HIGH_RISK: [f64; 8] = [5.0, 2.0, 0.3, 0.2, 0.2, 0.3, 2.0, 5.0];

/// Landing-bucket multipliers, left to right. Edges highest, center lowest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiplierTable(Vec<f64>);

impl MultiplierTable {
    pub fn for_risk(risk: RiskLevel) -> Self {
        let values = match risk {
            RiskLevel::Low => LOW_RISK,
            RiskLevel::Medium => MEDIUM_RISK,
            RiskLevel::High => HIGH_RISK,
        };
        Self(values.to_vec())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn values(&self) -> &[f64] {
        &self.0
    }

    /// Multiplier for a bucket, clamped to the last bucket
    pub fn get(&self, bucket: usize) -> f64 {
        self.0
            .get(bucket.min(self.0.len().saturating_sub(1)))
            .copied()
            .unwrap_or(0.0)
    }

    /// `floor(x / width · n)` clamped to `[0, n − 1]`
    pub fn bucket_for(&self, x: f32, board_width: f32) -> usize {
        let n = self.0.len();
        if n == 0 || board_width <= 0.0 {
            return 0;
        }
        let raw = (x / board_width * n as f32).floor();
        if raw.is_nan() || raw < 0.0 {
            0
        } else {
            (raw as usize).min(n - 1)
        }
    }

    pub fn is_symmetric(&self) -> bool {
        self.0.iter().eq(self.0.iter().rev())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::HOUSE_EDGE;
    use crate::rng::SeededRandom;
    use crate::rng::testing::ScriptedRandom;
    use proptest::prelude::*;

    #[test]
    fn test_crash_point_half_draw() {
        // 0.97 · e / 0.5 = 5.2733...
        let cp = crash_point_from_unit(0.5, HOUSE_EDGE, 1e6);
        assert!((cp - 5.27).abs() < 1e-9, "got {cp}");
    }

    #[test]
    fn test_crash_point_floor_is_one() {
        // 0.97 · e ≈ 2.64 at u = 0, so small draws still crash above 1
        assert!((crash_point_from_unit(0.0, HOUSE_EDGE, 1e6) - 2.63).abs() < 1e-9);
        // A tiny edge drives raw below 1
        assert_eq!(crash_point_from_unit(0.0, 0.1, 1e6), 1.0);
    }

    #[test]
    fn test_crash_point_guards_unit_one() {
        let cp = crash_point_from_unit(1.0, HOUSE_EDGE, 1e6);
        assert!(cp.is_finite());
        assert_eq!(cp, 1e6);
        assert_eq!(crash_point_from_unit(f64::NAN, HOUSE_EDGE, 1e6), 2.63);
    }

    #[test]
    fn test_draw_crash_point_uses_secure_unit() {
        let mut rng = ScriptedRandom::new([ScriptedRandom::bits_for_unit(0.5)]);
        let cp = draw_crash_point(&mut rng, HOUSE_EDGE, 1e6).unwrap();
        assert!((cp - 5.27).abs() < 1e-9);
    }

    #[test]
    fn test_dice_under_fifty() {
        let m = dice_multiplier(50, DiceMode::Under, HOUSE_EDGE);
        assert!((m - 1.94).abs() < 1e-9);
        // Fair odds without edge
        assert!((dice_multiplier(50, DiceMode::Under, 1.0) - 2.0).abs() < 1e-9);

        assert!(dice_wins(37, 50, DiceMode::Under));
        assert!(!dice_wins(63, 50, DiceMode::Under));
        assert!(dice_wins(50, 50, DiceMode::Under));
    }

    #[test]
    fn test_dice_over_is_symmetric() {
        // Over 51 wins on 51..=100, same 50% as under 50
        assert_eq!(dice_win_chance(51, DiceMode::Over), 0.5);
        assert!(
            (dice_multiplier(51, DiceMode::Over, HOUSE_EDGE)
                - dice_multiplier(50, DiceMode::Under, HOUSE_EDGE))
            .abs()
                < 1e-12
        );
        assert!(dice_wins(63, 50, DiceMode::Over));
        assert!(!dice_wins(37, 50, DiceMode::Over));
    }

    #[test]
    fn test_dice_degenerate_target() {
        assert!(matches!(
            try_dice_multiplier(0, DiceMode::Under, HOUSE_EDGE),
            Err(ArcadeError::DegenerateProbability(_))
        ));
        assert_eq!(dice_multiplier(0, DiceMode::Under, HOUSE_EDGE), 0.0);
        assert_eq!(dice_multiplier(101, DiceMode::Over, HOUSE_EDGE), 0.0);
    }

    #[test]
    fn test_dice_quote_recomputes_per_target() {
        let q = DiceQuote::new(25, DiceMode::Under, HOUSE_EDGE);
        assert_eq!(q.win_chance, 25.0);
        assert!((q.multiplier - 3.88).abs() < 1e-9);
    }

    #[test]
    fn test_mines_three_by_three() {
        let m = mines_multiplier(9, 3, 0, HOUSE_EDGE);
        assert!((m - 1.455).abs() < 1e-9, "got {m}");
    }

    #[test]
    fn test_mines_degenerate_when_board_cleared() {
        // 9 tiles, 3 mines, 6 revealed: no safe tiles left
        assert!(matches!(
            try_mines_multiplier(9, 3, 6, HOUSE_EDGE),
            Err(ArcadeError::DegenerateProbability(_))
        ));
        assert_eq!(mines_multiplier(9, 3, 6, HOUSE_EDGE), 0.0);
        assert_eq!(mines_multiplier(9, 3, 9, HOUSE_EDGE), 0.0);
        assert_eq!(mines_multiplier(9, 3, 12, HOUSE_EDGE), 0.0);
        // Every tile a mine: nothing safe to price even before a reveal
        assert_eq!(mines_multiplier(9, 9, 0, HOUSE_EDGE), 0.0);
    }

    #[test]
    fn test_mine_grid_exact_count() {
        let mut rng = SeededRandom::new(7);
        let grid = MineGrid::generate(5, 20, &mut rng).unwrap();
        assert_eq!(grid.total_tiles(), 25);
        assert_eq!(grid.mine_count(), 20);
        assert_eq!(grid.mine_positions().len(), 20);
        assert_eq!(grid.is_mine(25), None);
    }

    #[test]
    fn test_mine_grid_rejects_full_board() {
        let mut rng = SeededRandom::new(7);
        assert!(MineGrid::generate(3, 9, &mut rng).is_err());
        assert!(MineGrid::generate(3, 0, &mut rng).is_err());
    }

    #[test]
    fn test_mine_grid_positions_roughly_uniform() {
        // One mine on 3x3: each tile should get ~1/9 of placements
        let mut rng = SeededRandom::new(99);
        let mut counts = [0u32; 9];
        let rounds = 9_000;
        for _ in 0..rounds {
            let grid = MineGrid::generate(3, 1, &mut rng).unwrap();
            counts[grid.mine_positions()[0]] += 1;
        }
        for c in counts {
            assert!((800..1200).contains(&c), "skewed placement: {counts:?}");
        }
    }

    #[test]
    fn test_mine_grid_from_mines() {
        let grid = MineGrid::from_mines(3, &[0, 4, 8]).unwrap();
        assert_eq!(grid.mine_positions(), vec![0, 4, 8]);
        assert!(MineGrid::from_mines(3, &[0, 0]).is_err());
        assert!(MineGrid::from_mines(3, &[9]).is_err());
    }

    #[test]
    fn test_multiplier_tables_symmetric_edges_high() {
        for risk in [RiskLevel::Low, RiskLevel::Medium, RiskLevel::High] {
            let table = MultiplierTable::for_risk(risk);
            assert!(table.is_symmetric());
            let center = table.get(table.len() / 2);
            assert!(table.get(0) > center);
            assert_eq!(table.get(0), table.get(table.len() - 1));
        }
    }

    #[test]
    fn test_bucket_for_clamps() {
        let table = MultiplierTable::for_risk(RiskLevel::Medium);
        assert_eq!(table.bucket_for(-5.0, 600.0), 0);
        assert_eq!(table.bucket_for(0.0, 600.0), 0);
        assert_eq!(table.bucket_for(299.0, 600.0), 3);
        assert_eq!(table.bucket_for(300.0, 600.0), 4);
        assert_eq!(table.bucket_for(600.0, 600.0), 7);
        assert_eq!(table.bucket_for(900.0, 600.0), 7);
        assert_eq!(table.get(42), 3.0);
    }

    proptest! {
        #[test]
        fn prop_crash_point_at_least_one_and_deterministic(u in 0.0f64..1.0) {
            let a = crash_point_from_unit(u, HOUSE_EDGE, 1e6);
            let b = crash_point_from_unit(u, HOUSE_EDGE, 1e6);
            prop_assert!(a >= 1.0);
            prop_assert!(a.is_finite());
            prop_assert_eq!(a, b);
        }

        #[test]
        fn prop_mine_grid_exact_count(seed in any::<u64>(), size in 3usize..=5, ratio in 0.0f64..1.0) {
            let total = size * size;
            let mines = 1 + ((total - 2) as f64 * ratio) as usize;
            let mut rng = SeededRandom::new(seed);
            let grid = MineGrid::generate(size, mines, &mut rng).unwrap();
            prop_assert_eq!(grid.mine_count(), mines);
            let positions = grid.mine_positions();
            let mut dedup = positions.clone();
            dedup.dedup();
            prop_assert_eq!(positions.len(), dedup.len());
        }

        #[test]
        fn prop_mines_multiplier_monotonic(size in 3usize..=5, mines in 1usize..=20) {
            let total = size * size;
            prop_assume!(mines < total);
            let safe = total - mines;
            for revealed in 0..safe.saturating_sub(1) {
                let now = mines_multiplier(total, mines, revealed, HOUSE_EDGE);
                let next = mines_multiplier(total, mines, revealed + 1, HOUSE_EDGE);
                prop_assert!(next >= now, "{} -> {} at {}", now, next, revealed);
            }
        }
    }
}
