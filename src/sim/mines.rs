//! Mines reveal state and multiplier recompute
//!
//! The mine layout is committed at round start; this tracks which tiles the
//! player has opened and recomputes the cashout multiplier after each one.

use serde::{Deserialize, Serialize};

use crate::error::{ArcadeError, Result};
use crate::outcome::{MineGrid, try_mines_multiplier};

/// Result of opening one tile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RevealOutcome {
    /// Safe tile; round continues at the new multiplier
    Safe { multiplier: f64 },
    /// Last safe tile; round wins at `multiplier`
    BoardCleared { multiplier: f64 },
    /// Mine; round lost
    Mine,
}

#[derive(Debug, Clone)]
pub struct MinesBoard {
    grid: MineGrid,
    revealed: Vec<bool>,
    revealed_count: usize,
    house_edge: f64,
    /// Multiplier a cashout would pay right now
    multiplier: f64,
    exploded: bool,
}

impl MinesBoard {
    pub fn new(grid: MineGrid, house_edge: f64) -> Self {
        let total = grid.total_tiles();
        let mut board = Self {
            revealed: vec![false; total],
            revealed_count: 0,
            house_edge,
            multiplier: 0.0,
            exploded: false,
            grid,
        };
        board.multiplier = board.recompute().unwrap_or(0.0);
        board
    }

    fn recompute(&self) -> Result<f64> {
        try_mines_multiplier(
            self.grid.total_tiles(),
            self.grid.mine_count(),
            self.revealed_count,
            self.house_edge,
        )
    }

    /// Open a tile. Revealing twice, off the grid, or after the round ended
    /// is rejected without changing state.
    pub fn reveal(&mut self, index: usize) -> Result<RevealOutcome> {
        if self.is_finished() || self.revealed.get(index).copied().unwrap_or(true) {
            return Err(ArcadeError::InvalidTile { index });
        }
        self.revealed[index] = true;
        self.revealed_count += 1;

        if self.grid.is_mine(index) == Some(true) {
            self.exploded = true;
            self.multiplier = 0.0;
            return Ok(RevealOutcome::Mine);
        }

        if self.is_cleared() {
            // No next reveal to price; pay what the last safe tile was worth
            log::debug!("board cleared after {} reveals", self.revealed_count);
            return Ok(RevealOutcome::BoardCleared {
                multiplier: self.multiplier,
            });
        }

        match self.recompute() {
            Ok(m) => self.multiplier = m,
            Err(e) => {
                log::warn!("mines recompute: {e}");
                self.multiplier = 0.0;
            }
        }
        Ok(RevealOutcome::Safe {
            multiplier: self.multiplier,
        })
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    pub fn revealed_count(&self) -> usize {
        self.revealed_count
    }

    pub fn is_revealed(&self, index: usize) -> bool {
        self.revealed.get(index).copied().unwrap_or(false)
    }

    pub fn is_cleared(&self) -> bool {
        !self.exploded && self.revealed_count == self.grid.total_tiles() - self.grid.mine_count()
    }

    pub fn is_finished(&self) -> bool {
        self.exploded || self.is_cleared()
    }

    pub fn grid(&self) -> &MineGrid {
        &self.grid
    }
}
