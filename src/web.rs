//! Browser bindings
//!
//! Thin wasm-bindgen facade over `Arcade`. Structured values cross the
//! boundary as JSON strings; the page's render loop calls `tick` from
//! `requestAnimationFrame` and drains events after each call.

use std::cell::RefCell;
use std::rc::Rc;

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::config::{DiceMode, RoundConfig, Tuning};
use crate::events::ArcadeEvent;
use crate::games::Arcade;
use crate::rng::SystemRandom;
use crate::round::GameKind;
use crate::settings::Settings;
use crate::wallet::SharedBalance;

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn to_json(value: &impl Serialize) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(js_err)
}

fn parse_game(game: &str) -> Result<GameKind, JsValue> {
    GameKind::from_str(game).ok_or_else(|| js_err(format!("unknown game '{game}'")))
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    // A second init (hot reload) keeps the existing logger
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("Virtuasino core loaded");
}

#[wasm_bindgen]
pub struct WebArcade {
    inner: Arcade<SharedBalance, SystemRandom>,
    events: Rc<RefCell<Vec<ArcadeEvent>>>,
}

#[wasm_bindgen]
impl WebArcade {
    /// `tuning_json` may be omitted for the default tuning
    #[wasm_bindgen(constructor)]
    pub fn new(tuning_json: Option<String>) -> Result<WebArcade, JsValue> {
        let tuning = match tuning_json {
            Some(json) => Tuning::from_json(&json).map_err(js_err)?,
            None => Tuning::default(),
        };
        let rng = SystemRandom::new().map_err(js_err)?;
        let mut inner = Arcade::new(SharedBalance::default(), rng, tuning).map_err(js_err)?;

        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        inner.subscribe(move |e: &ArcadeEvent| sink.borrow_mut().push(e.clone()));

        Ok(Self { inner, events })
    }

    /// Returns the new round id
    pub fn start_round(&mut self, config_json: &str) -> Result<f64, JsValue> {
        let config: RoundConfig = serde_json::from_str(config_json).map_err(js_err)?;
        let id = self.inner.start_round(config).map_err(js_err)?;
        Ok(id.0 as f64)
    }

    pub fn cashout(&mut self, game: &str) -> Result<String, JsValue> {
        let game = parse_game(game)?;
        let res = self.inner.cashout(game).map_err(js_err)?;
        to_json(&res)
    }

    pub fn reveal_tile(&mut self, index: usize) -> Result<String, JsValue> {
        let reveal = self.inner.reveal_tile(index).map_err(js_err)?;
        to_json(&reveal)
    }

    /// Advance by one rendered frame and return the frame snapshot
    pub fn tick(&mut self, delta_ms: f64) -> Result<String, JsValue> {
        let snapshot = self.inner.tick(delta_ms);
        to_json(&snapshot)
    }

    /// Events emitted since the last drain, oldest first
    pub fn drain_events(&mut self) -> Result<String, JsValue> {
        let drained: Vec<ArcadeEvent> = self.events.borrow_mut().drain(..).collect();
        to_json(&drained)
    }

    pub fn apply_settings(&mut self, settings_json: &str) -> Result<(), JsValue> {
        let settings = Settings::from_json(settings_json).map_err(js_err)?;
        self.inner.apply_settings(settings);
        Ok(())
    }

    pub fn settings(&self) -> Result<String, JsValue> {
        self.inner.settings().to_json().map_err(js_err)
    }

    pub fn dice_quote(&self, target: u32, mode: &str) -> Result<String, JsValue> {
        let mode = DiceMode::from_str(mode).ok_or_else(|| js_err(format!("unknown mode '{mode}'")))?;
        to_json(&self.inner.dice_quote(target, mode))
    }

    pub fn mines_quote(&self, grid_size: usize, mine_count: usize) -> f64 {
        self.inner.mines_quote(grid_size, mine_count)
    }

    pub fn resize_plinko(&mut self, width: f32, height: f32) {
        self.inner.resize_plinko(width, height);
    }

    pub fn history(&self, game: &str) -> Result<String, JsValue> {
        let game = parse_game(game)?;
        to_json(self.inner.history(game))
    }

    pub fn balance(&self) -> f64 {
        self.inner.balance()
    }

    pub fn reset_balance(&mut self) {
        self.inner.reset_balance();
    }
}
