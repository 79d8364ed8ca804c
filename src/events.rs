//! Core-to-UI notifications
//!
//! The UI subscribes an observer (a closure or a channel) instead of
//! listening on a global event bus.

use std::sync::mpsc::{self, Receiver};

use serde::Serialize;

use crate::games::MinesReveal;
use crate::round::{GameKind, Resolution, RoundId};
use crate::settings::Settings;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ArcadeEvent {
    RoundStarted {
        round_id: RoundId,
        game: GameKind,
        bet: f64,
    },
    TileRevealed(MinesReveal),
    RoundResolved(Resolution),
    BalanceChanged {
        balance: f64,
    },
    SettingsChanged(Settings),
}

pub trait ArcadeObserver {
    fn notify(&mut self, event: &ArcadeEvent);
}

impl<F: FnMut(&ArcadeEvent)> ArcadeObserver for F {
    fn notify(&mut self, event: &ArcadeEvent) {
        self(event)
    }
}

/// Observer that forwards every event into an mpsc channel
pub fn channel() -> (impl ArcadeObserver + Send + 'static, Receiver<ArcadeEvent>) {
    let (tx, rx) = mpsc::channel();
    let observer = move |event: &ArcadeEvent| {
        // Receiver dropped: the UI stopped listening
        let _ = tx.send(event.clone());
    };
    (observer, rx)
}

#[derive(Default)]
pub struct Observers {
    list: Vec<Box<dyn ArcadeObserver>>,
}

impl Observers {
    pub fn subscribe(&mut self, observer: impl ArcadeObserver + 'static) {
        self.list.push(Box::new(observer));
    }

    pub fn emit(&mut self, event: ArcadeEvent) {
        log::trace!("event {event:?}");
        for observer in &mut self.list {
            observer.notify(&event);
        }
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }
}
