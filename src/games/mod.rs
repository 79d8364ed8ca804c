//! Round controllers and the arcade that drives them
//!
//! Each controller owns one game's round state and history. `Arcade` wires
//! them to the shared wallet, the random source and the frame clock, and
//! fans results out to observers. The host calls `tick` once per rendered
//! frame; nothing here schedules itself.

pub mod crash;
pub mod dice;
pub mod mines;
pub mod plinko;

pub use crash::CrashGame;
pub use dice::{DiceGame, DiceRoll};
pub use mines::{MinesGame, MinesReveal};
pub use plinko::PlinkoGame;

use crate::config::{DiceMode, RoundConfig, Tuning};
use crate::error::{ArcadeError, Result};
use crate::events::{ArcadeEvent, ArcadeObserver, Observers};
use crate::history::History;
use crate::outcome::DiceQuote;
use crate::rng::RandomSource;
use crate::round::{FrameSnapshot, GameKind, Resolution, RoundId, RoundIds};
use crate::settings::Settings;
use crate::sim::FrameClock;
use crate::wallet::{SharedBalance, Wallet};

/// Debit `bet`, then run the committing draw. A failed draw refunds the bet.
pub(crate) fn commit<T>(
    wallet: &impl Wallet,
    bet: f64,
    draw: impl FnOnce() -> Result<T>,
) -> Result<T> {
    wallet.debit(bet)?;
    draw().inspect_err(|e| {
        log::warn!("outcome draw failed, refunding {bet:.2}: {e}");
        wallet.credit(bet);
    })
}

pub struct Arcade<W: Wallet, R: RandomSource> {
    wallet: W,
    rng: R,
    tuning: Tuning,
    settings: Settings,
    clock: FrameClock,
    ids: RoundIds,
    observers: Observers,
    crash: CrashGame,
    dice: DiceGame,
    mines: MinesGame,
    plinko: PlinkoGame,
}

impl<W: Wallet, R: RandomSource> Arcade<W, R> {
    pub fn new(wallet: W, rng: R, tuning: Tuning) -> Result<Self> {
        tuning.validate()?;
        let settings = Settings::default();
        let mut clock = FrameClock::default();
        clock.set_time_scale(settings.animation_speed);
        Ok(Self {
            plinko: PlinkoGame::new(&tuning),
            wallet,
            rng,
            tuning,
            settings,
            clock,
            ids: RoundIds::default(),
            observers: Observers::default(),
            crash: CrashGame::new(),
            dice: DiceGame::new(),
            mines: MinesGame::new(),
        })
    }

    pub fn subscribe(&mut self, observer: impl ArcadeObserver + 'static) {
        self.observers.subscribe(observer);
    }

    /// Validate, debit and commit a new round. Dice resolves before this returns.
    pub fn start_round(&mut self, config: RoundConfig) -> Result<RoundId> {
        let game = config.kind();
        let bet = config.bet;
        // Rejected starts must not burn an id
        let id = self.ids.peek();

        let resolved = match game {
            GameKind::Crash => {
                let points = self.chart_points(&self.settings);
                self.crash
                    .start(id, config, &self.tuning, points, &self.wallet, &mut self.rng)?;
                None
            }
            GameKind::Dice => {
                let roll = self
                    .dice
                    .roll(id, &config, &self.tuning, &self.wallet, &mut self.rng)?;
                Some(roll.resolution)
            }
            GameKind::Mines => {
                self.mines
                    .start(id, config, &self.tuning, &self.wallet, &mut self.rng)?;
                None
            }
            GameKind::Plinko => {
                self.plinko
                    .drop_ball(id, &config, &self.tuning, &self.wallet)?;
                None
            }
        };
        self.ids.next_id();

        self.observers.emit(ArcadeEvent::RoundStarted {
            round_id: id,
            game,
            bet,
        });
        self.emit_balance();
        if let Some(res) = resolved {
            self.finish(res);
        }
        Ok(id)
    }

    /// Manual cashout of a running crash or mines round
    pub fn cashout(&mut self, game: GameKind) -> Result<Resolution> {
        let res = match game {
            GameKind::Crash => self.crash.cashout(&self.wallet)?,
            GameKind::Mines => self.mines.cashout(&self.wallet)?,
            GameKind::Dice | GameKind::Plinko => return Err(ArcadeError::NoActiveRound(game)),
        };
        self.finish(res.clone());
        Ok(res)
    }

    pub fn reveal_tile(&mut self, index: usize) -> Result<MinesReveal> {
        let reveal = self.mines.reveal(index, &self.wallet)?;
        self.observers.emit(ArcadeEvent::TileRevealed(reveal.clone()));
        if let Some(res) = &reveal.resolution {
            self.finish(res.clone());
        }
        Ok(reveal)
    }

    /// Advance every running simulation by one host frame
    pub fn tick(&mut self, delta_ms: f64) -> FrameSnapshot {
        let budget = self.clock.advance(delta_ms);

        if budget.elapsed_ms > 0.0 {
            if let Some(res) = self
                .crash
                .advance(budget.elapsed_ms, &self.wallet, &mut self.rng)
            {
                self.finish(res);
            }
        }

        for _ in 0..budget.steps {
            for res in self.plinko.step(&self.wallet, &mut self.rng) {
                self.finish(res);
            }
        }

        self.snapshot()
    }

    pub fn snapshot(&self) -> FrameSnapshot {
        let running = self.crash.curve().filter(|_| self.crash.is_running());
        FrameSnapshot {
            progress: running.map(|c| c.multiplier()),
            display_multiplier: running.map(|c| c.display_multiplier()),
            chart: self
                .crash
                .curve()
                .map(|c| c.chart().collect())
                .unwrap_or_default(),
            ball_positions: self.plinko.positions(),
            mines_multiplier: self.mines.live_multiplier(),
            balance: self.wallet.balance(),
        }
    }

    pub fn apply_settings(&mut self, settings: Settings) {
        let settings = settings.normalized();
        self.clock.set_time_scale(settings.animation_speed);
        let points = self.chart_points(&settings);
        self.crash.set_chart_points(points);
        log::info!(
            "Settings applied: {} performance, {:.1}x speed",
            settings.performance_mode.as_str(),
            settings.animation_speed
        );
        self.settings = settings.clone();
        self.observers.emit(ArcadeEvent::SettingsChanged(settings));
    }

    /// Chart length for the performance preset, capped by the operator tuning
    fn chart_points(&self, settings: &Settings) -> usize {
        settings.chart_points().min(self.tuning.crash.chart_points)
    }

    pub fn dice_quote(&self, target: u32, mode: DiceMode) -> DiceQuote {
        DiceQuote::new(target, mode, self.tuning.house_edge)
    }

    pub fn mines_quote(&self, grid_size: usize, mine_count: usize) -> f64 {
        mines::quote(grid_size, mine_count, self.tuning.house_edge)
    }

    pub fn resize_plinko(&mut self, width: f32, height: f32) {
        self.plinko.resize(width, height);
    }

    pub fn history(&self, game: GameKind) -> &History {
        match game {
            GameKind::Crash => self.crash.history(),
            GameKind::Dice => self.dice.history(),
            GameKind::Mines => self.mines.history(),
            GameKind::Plinko => self.plinko.history(),
        }
    }

    pub fn is_running(&self, game: GameKind) -> bool {
        match game {
            GameKind::Crash => self.crash.is_running(),
            GameKind::Dice => false,
            GameKind::Mines => self.mines.is_running(),
            GameKind::Plinko => self.plinko.balls_in_flight() > 0,
        }
    }

    pub fn balance(&self) -> f64 {
        self.wallet.balance()
    }

    pub fn wallet(&self) -> &W {
        &self.wallet
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn crash(&self) -> &CrashGame {
        &self.crash
    }

    pub fn dice(&self) -> &DiceGame {
        &self.dice
    }

    pub fn mines(&self) -> &MinesGame {
        &self.mines
    }

    pub fn plinko(&self) -> &PlinkoGame {
        &self.plinko
    }

    fn finish(&mut self, res: Resolution) {
        self.observers.emit(ArcadeEvent::RoundResolved(res));
        self.emit_balance();
    }

    fn emit_balance(&mut self) {
        let balance = self.wallet.balance();
        self.observers.emit(ArcadeEvent::BalanceChanged { balance });
    }
}

impl<R: RandomSource> Arcade<SharedBalance, R> {
    /// Restore the starting balance
    pub fn reset_balance(&mut self) {
        self.wallet.reset();
        self.emit_balance();
    }
}
