//! Mines round controller

use serde::{Deserialize, Serialize};

use crate::config::{GameParams, RoundConfig, Tuning};
use crate::error::{ArcadeError, Result};
use crate::history::History;
use crate::outcome::{MineGrid, mines_multiplier};
use crate::rng::RandomSource;
use crate::round::{GameKind, Resolution, Round, RoundId, RoundState};
use crate::sim::{MinesBoard, RevealOutcome};
use crate::wallet::Wallet;

use super::commit;

/// What one tile click produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinesReveal {
    pub round_id: RoundId,
    pub index: usize,
    pub outcome: RevealOutcome,
    /// Cashout multiplier after this reveal (0 on a mine)
    pub multiplier: f64,
    /// Set when the reveal ended the round
    pub resolution: Option<Resolution>,
    /// Full mine layout, exposed once the round is over
    pub mines: Option<Vec<usize>>,
}

#[derive(Debug, Clone, Default)]
pub struct MinesGame {
    round: Option<Round<MinesBoard>>,
    history: History,
}

impl MinesGame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(
        &mut self,
        id: RoundId,
        config: RoundConfig,
        tuning: &Tuning,
        wallet: &impl Wallet,
        rng: &mut impl RandomSource,
    ) -> Result<()> {
        if self.is_running() {
            return Err(ArcadeError::RoundInProgress(GameKind::Mines));
        }
        config.validate(tuning)?;
        let GameParams::Mines {
            grid_size,
            mine_count,
        } = config.params
        else {
            return Err(ArcadeError::invalid("not a mines round"));
        };

        let grid = commit(wallet, config.bet, || {
            MineGrid::generate(grid_size, mine_count, rng)
        })?;
        let board = MinesBoard::new(grid, tuning.house_edge);
        log::info!(
            "Mines {id} started: {grid_size}x{grid_size}, {mine_count} mines, bet {:.2}",
            config.bet
        );
        self.round = Some(Round::start(id, config, board));
        Ok(())
    }

    pub fn reveal(&mut self, index: usize, wallet: &impl Wallet) -> Result<MinesReveal> {
        let round = self
            .round
            .as_mut()
            .filter(|r| r.is_running())
            .ok_or(ArcadeError::NoActiveRound(GameKind::Mines))?;
        let outcome = round.committed.reveal(index)?;
        log::debug!("Mines {} tile {index}: {outcome:?}", round.id);

        let resolution = match outcome {
            RevealOutcome::Safe { .. } => None,
            RevealOutcome::BoardCleared { multiplier } => {
                Some(settle(round, &mut self.history, multiplier, wallet))
            }
            RevealOutcome::Mine => Some(settle(round, &mut self.history, 0.0, wallet)),
        };

        Ok(MinesReveal {
            round_id: round.id,
            index,
            outcome,
            multiplier: round.committed.multiplier(),
            mines: resolution
                .as_ref()
                .map(|_| round.committed.grid().mine_positions()),
            resolution,
        })
    }

    /// Take the current multiplier. Before the first reveal this returns the bet.
    pub fn cashout(&mut self, wallet: &impl Wallet) -> Result<Resolution> {
        let round = self
            .round
            .as_mut()
            .filter(|r| r.is_running())
            .ok_or(ArcadeError::NoActiveRound(GameKind::Mines))?;
        let multiplier = cashout_multiplier(&round.committed);
        Ok(settle(round, &mut self.history, multiplier, wallet))
    }

    pub fn is_running(&self) -> bool {
        self.round.as_ref().is_some_and(|r| r.is_running())
    }

    /// Current (or last) round's board
    pub fn board(&self) -> Option<&MinesBoard> {
        self.round.as_ref().map(|r| &r.committed)
    }

    /// What `cashout` would pay right now, if a round is running
    pub fn live_multiplier(&self) -> Option<f64> {
        self.round
            .as_ref()
            .filter(|r| r.is_running())
            .map(|r| cashout_multiplier(&r.committed))
    }

    pub fn history(&self) -> &History {
        &self.history
    }
}

/// Multiplier the first safe reveal earns on a fresh board
pub fn quote(grid_size: usize, mine_count: usize, house_edge: f64) -> f64 {
    mines_multiplier(grid_size * grid_size, mine_count, 0, house_edge)
}

/// An untouched board refunds the bet
fn cashout_multiplier(board: &MinesBoard) -> f64 {
    if board.revealed_count() == 0 {
        1.0
    } else {
        board.multiplier()
    }
}

fn settle(
    round: &mut Round<MinesBoard>,
    history: &mut History,
    multiplier: f64,
    wallet: &impl Wallet,
) -> Resolution {
    round.state = RoundState::Resolved;
    let resolution = if multiplier > 0.0 {
        let res = Resolution::win(round.id, GameKind::Mines, round.bet(), multiplier);
        wallet.credit(res.payout);
        res
    } else {
        Resolution::loss(round.id, GameKind::Mines, round.bet())
    };

    let board = &round.committed;
    let size = board.grid().size();
    log::info!(
        "Mines {} ended after {} reveals at {multiplier:.2}x, paid {:.2}",
        round.id,
        board.revealed_count(),
        resolution.payout
    );
    history.record(
        resolution.clone(),
        format!(
            "{size}x{size}, {} mines, {} clicks",
            board.grid().mine_count(),
            board.revealed_count()
        ),
    );
    resolution
}
