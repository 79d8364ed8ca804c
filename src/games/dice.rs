//! Dice round controller
//!
//! A dice round resolves the moment it starts: debit, roll, pay.

use serde::{Deserialize, Serialize};

use crate::config::{DiceMode, GameParams, RoundConfig, Tuning};
use crate::error::{ArcadeError, Result};
use crate::history::History;
use crate::outcome::{DiceQuote, dice_wins, roll_dice};
use crate::rng::RandomSource;
use crate::round::{GameKind, Resolution, RoundId};
use crate::wallet::Wallet;

use super::commit;

/// One settled roll
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiceRoll {
    pub resolution: Resolution,
    pub roll: u32,
    pub target: u32,
    pub mode: DiceMode,
    pub quote: DiceQuote,
}

#[derive(Debug, Clone, Default)]
pub struct DiceGame {
    last: Option<DiceRoll>,
    history: History,
}

impl DiceGame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn roll(
        &mut self,
        id: RoundId,
        config: &RoundConfig,
        tuning: &Tuning,
        wallet: &impl Wallet,
        rng: &mut impl RandomSource,
    ) -> Result<DiceRoll> {
        config.validate(tuning)?;
        let GameParams::Dice { target, mode } = config.params else {
            return Err(ArcadeError::invalid("not a dice round"));
        };
        let quote = DiceQuote::new(target, mode, tuning.house_edge);

        let roll = commit(wallet, config.bet, || roll_dice(rng))?;

        let resolution = if dice_wins(roll, target, mode) {
            let res = Resolution::win(id, GameKind::Dice, config.bet, quote.multiplier);
            wallet.credit(res.payout);
            res
        } else {
            Resolution::loss(id, GameKind::Dice, config.bet)
        };
        log::info!(
            "Dice {id}: {} {target} rolled {roll}, paid {:.2}",
            mode.as_str(),
            resolution.payout
        );

        let result = DiceRoll {
            resolution,
            roll,
            target,
            mode,
            quote,
        };
        self.history.record(
            result.resolution.clone(),
            format!("{} {target}: {roll}", mode.as_str()),
        );
        self.last = Some(result.clone());
        Ok(result)
    }

    pub fn last_roll(&self) -> Option<&DiceRoll> {
        self.last.as_ref()
    }

    pub fn history(&self) -> &History {
        &self.history
    }
}
