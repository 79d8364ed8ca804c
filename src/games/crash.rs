//! Crash round controller
//!
//! The crash point is drawn once, after the bet is debited. Each tick grows
//! the curve; the round ends on a manual cashout, an auto-cashout or the crash.

use crate::config::{GameParams, RoundConfig, Tuning};
use crate::error::{ArcadeError, Result};
use crate::history::History;
use crate::outcome::draw_crash_point;
use crate::rng::RandomSource;
use crate::round::{GameKind, Resolution, Round, RoundId, RoundState};
use crate::sim::{CurveStatus, GrowthCurve};
use crate::wallet::Wallet;

use super::commit;

#[derive(Debug, Clone, Default)]
pub struct CrashGame {
    round: Option<Round<GrowthCurve>>,
    history: History,
}

impl CrashGame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(
        &mut self,
        id: RoundId,
        config: RoundConfig,
        tuning: &Tuning,
        chart_points: usize,
        wallet: &impl Wallet,
        rng: &mut impl RandomSource,
    ) -> Result<()> {
        if self.is_running() {
            return Err(ArcadeError::RoundInProgress(GameKind::Crash));
        }
        config.validate(tuning)?;
        let GameParams::Crash { auto_cashout } = config.params else {
            return Err(ArcadeError::invalid("not a crash round"));
        };

        let crash_point = commit(wallet, config.bet, || {
            draw_crash_point(rng, tuning.house_edge, tuning.crash.max_crash_point)
        })?;

        let mut curve = GrowthCurve::new(&tuning.crash, crash_point, auto_cashout);
        curve.set_chart_points(chart_points);
        log::info!(
            "Crash {id} started: bet {:.2}, auto {:?}",
            config.bet,
            auto_cashout
        );
        log::debug!("Crash {id} committed at {crash_point:.2}x");
        self.round = Some(Round::start(id, config, curve));
        Ok(())
    }

    /// Advance the running round; returns its resolution when it ends this frame
    pub fn advance(
        &mut self,
        elapsed_ms: f64,
        wallet: &impl Wallet,
        rng: &mut impl RandomSource,
    ) -> Option<Resolution> {
        let round = self.round.as_mut().filter(|r| r.is_running())?;
        match round.committed.advance(elapsed_ms, rng) {
            CurveStatus::Rising => None,
            CurveStatus::AutoCashout { multiplier } => {
                Some(pay_out(round, &mut self.history, multiplier, wallet))
            }
            CurveStatus::Crashed { .. } => Some(crash_out(round, &mut self.history)),
        }
    }

    /// Manual cashout at the current true multiplier
    pub fn cashout(&mut self, wallet: &impl Wallet) -> Result<Resolution> {
        let round = self
            .round
            .as_mut()
            .filter(|r| r.is_running())
            .ok_or(ArcadeError::NoActiveRound(GameKind::Crash))?;
        let multiplier = round.committed.multiplier();
        Ok(pay_out(round, &mut self.history, multiplier, wallet))
    }

    pub fn is_running(&self) -> bool {
        self.round.as_ref().is_some_and(|r| r.is_running())
    }

    /// Current (or last) round's curve
    pub fn curve(&self) -> Option<&GrowthCurve> {
        self.round.as_ref().map(|r| &r.committed)
    }

    pub fn set_chart_points(&mut self, points: usize) {
        if let Some(round) = self.round.as_mut() {
            round.committed.set_chart_points(points);
        }
    }

    pub fn history(&self) -> &History {
        &self.history
    }
}

fn pay_out(
    round: &mut Round<GrowthCurve>,
    history: &mut History,
    multiplier: f64,
    wallet: &impl Wallet,
) -> Resolution {
    round.state = RoundState::Resolved;
    let crash_point = round.committed.crash_point();
    let resolution = Resolution::win(round.id, GameKind::Crash, round.bet(), multiplier);
    wallet.credit(resolution.payout);
    log::info!(
        "Crash {} cashed out at {multiplier:.2}x (crash point {crash_point:.2}x), paid {:.2}",
        round.id,
        resolution.payout
    );
    history.record(
        resolution.clone(),
        format!("cashed out {multiplier:.2}x / crashed {crash_point:.2}x"),
    );
    resolution
}

fn crash_out(round: &mut Round<GrowthCurve>, history: &mut History) -> Resolution {
    round.state = RoundState::Resolved;
    let crash_point = round.committed.crash_point();
    let resolution = Resolution::loss(round.id, GameKind::Crash, round.bet());
    log::info!("Crash {} crashed at {crash_point:.2}x", round.id);
    history.record(resolution.clone(), format!("crashed {crash_point:.2}x"));
    resolution
}
