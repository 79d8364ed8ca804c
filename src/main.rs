//! Virtuasino entry point
//!
//! The browser build loads the library through `web::WebArcade`. Natively
//! this runs a headless session: it plays a batch of rounds of every game
//! on a synthetic 60 Hz clock and logs the measured return to player.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use virtuasino::consts::FRAME_MS;
    use virtuasino::{
        Arcade, DiceMode, GameKind, RandomSource, RiskLevel, RoundConfig, SeededRandom,
        SharedBalance, Tuning, Wallet,
    };

    const BET: f64 = 1.0;
    /// Frames before a crash round is abandoned as stuck
    const MAX_FRAMES: u32 = 1_000_000;

    /// Bets placed and payouts received by one game
    #[derive(Debug, Default)]
    struct Tally {
        wagered: f64,
        returned: f64,
        rounds: u32,
    }

    impl Tally {
        fn rtp(&self) -> f64 {
            if self.wagered > 0.0 {
                self.returned / self.wagered
            } else {
                0.0
            }
        }
    }

    fn play<R: RandomSource>(
        arcade: &mut Arcade<SharedBalance, R>,
        config: RoundConfig,
        tally: &mut Tally,
    ) -> virtuasino::Result<()> {
        let game = config.kind();
        let before = arcade.balance();
        arcade.start_round(config)?;

        match game {
            GameKind::Mines => {
                // Open tiles in order until two safe reveals or a mine
                let mut opened = 0;
                for index in 0.. {
                    if !arcade.is_running(GameKind::Mines) || opened == 2 {
                        break;
                    }
                    let reveal = arcade.reveal_tile(index)?;
                    if reveal.resolution.is_none() {
                        opened += 1;
                    }
                }
                if arcade.is_running(GameKind::Mines) {
                    arcade.cashout(GameKind::Mines)?;
                }
            }
            GameKind::Crash | GameKind::Plinko => {
                let mut frames = 0;
                while arcade.is_running(game) && frames < MAX_FRAMES {
                    arcade.tick(FRAME_MS);
                    frames += 1;
                }
            }
            GameKind::Dice => {}
        }

        tally.wagered += BET;
        tally.returned += arcade.balance() - before + BET;
        tally.rounds += 1;
        Ok(())
    }

    pub fn run(rounds: u32, seed: u64) -> virtuasino::Result<()> {
        let mut arcade = Arcade::new(
            SharedBalance::new(f64::from(rounds) * 10.0),
            SeededRandom::new(seed),
            Tuning::default(),
        )?;

        let games = [
            ("crash @2x", RoundConfig::crash(BET, Some(2.0))),
            ("dice under 50", RoundConfig::dice(BET, 50, DiceMode::Under)),
            ("dice over 75", RoundConfig::dice(BET, 75, DiceMode::Over)),
            ("mines 5x5/3", RoundConfig::mines(BET, 5, 3)),
            ("plinko low", RoundConfig::plinko(BET, RiskLevel::Low)),
            ("plinko medium", RoundConfig::plinko(BET, RiskLevel::Medium)),
            ("plinko high", RoundConfig::plinko(BET, RiskLevel::High)),
        ];

        for (name, config) in games {
            let mut tally = Tally::default();
            for _ in 0..rounds {
                play(&mut arcade, config.clone(), &mut tally)?;
            }
            log::info!(
                "{name:>14}: {} rounds, RTP {:.2}%",
                tally.rounds,
                tally.rtp() * 100.0
            );
        }

        log::info!("Final balance {:.2}", arcade.wallet().balance());
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let rounds = args.next().and_then(|a| a.parse().ok()).unwrap_or(1_000);
    let seed = args.next().and_then(|a| a.parse().ok()).unwrap_or(0x5eed);

    log::info!("Virtuasino (native) headless session: {rounds} rounds per game, seed {seed}");
    if let Err(e) = headless::run(rounds, seed) {
        log::error!("Session aborted: {e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is web::start, this is just to satisfy the compiler
}
