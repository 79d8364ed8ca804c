//! Plinko round controller
//!
//! Every dropped ball is its own round. Nothing is drawn up front: the bet is
//! debited at drop time and the bucket the ball lands in decides the payout.

use crate::config::{GameParams, RoundConfig, Tuning};
use crate::error::{ArcadeError, Result};
use crate::history::History;
use crate::rng::RandomSource;
use crate::round::{BallPosition, GameKind, Resolution, RoundId};
use crate::sim::PlinkoSim;
use crate::wallet::Wallet;

#[derive(Debug, Clone)]
pub struct PlinkoGame {
    sim: PlinkoSim,
    history: History,
}

impl PlinkoGame {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            sim: PlinkoSim::new(&tuning.plinko),
            history: History::new(),
        }
    }

    pub fn drop_ball(
        &mut self,
        id: RoundId,
        config: &RoundConfig,
        tuning: &Tuning,
        wallet: &impl Wallet,
    ) -> Result<()> {
        config.validate(tuning)?;
        let GameParams::Plinko { risk } = config.params else {
            return Err(ArcadeError::invalid("not a plinko round"));
        };
        wallet.debit(config.bet)?;
        self.sim.drop_ball(id, config.bet, risk);
        log::info!("Plinko {id} dropped: bet {:.2}, {risk:?} risk", config.bet);
        Ok(())
    }

    /// One fixed physics frame; credits and returns every ball that landed
    pub fn step(&mut self, wallet: &impl Wallet, rng: &mut impl RandomSource) -> Vec<Resolution> {
        self.sim
            .step(rng)
            .into_iter()
            .map(|landing| {
                let res = Resolution::win(
                    landing.ball_id,
                    GameKind::Plinko,
                    landing.bet,
                    landing.multiplier,
                );
                wallet.credit(res.payout);
                log::info!(
                    "Plinko {} landed in bucket {} at {:.1}x, paid {:.2}",
                    landing.ball_id,
                    landing.bucket,
                    landing.multiplier,
                    res.payout
                );
                self.history.record(
                    res.clone(),
                    format!("bucket {} ({:.1}x)", landing.bucket, landing.multiplier),
                );
                res
            })
            .collect()
    }

    /// Rebuild the pin field for a new canvas size; balls in flight keep going
    pub fn resize(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.sim.resize(width, height);
            log::debug!("Plinko board resized to {width}x{height}");
        } else {
            log::warn!("Ignoring plinko resize to {width}x{height}");
        }
    }

    pub fn positions(&self) -> Vec<BallPosition> {
        self.sim.positions()
    }

    pub fn balls_in_flight(&self) -> usize {
        self.sim.balls().len()
    }

    pub fn sim(&self) -> &PlinkoSim {
        &self.sim
    }

    pub fn history(&self) -> &History {
        &self.history
    }
}
