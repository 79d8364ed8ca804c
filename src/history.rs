//! Recent results per game
//!
//! Newest first, capped at `HISTORY_LEN` entries.

use serde::{Deserialize, Serialize};

use crate::consts::HISTORY_LEN;
use crate::round::Resolution;

/// One finished round as shown in a game's history list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub resolution: Resolution,
    /// Game-specific summary, e.g. "UNDER 50 -> 37" or "3x3, 3 mines, 4 clicks"
    pub detail: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct History {
    entries: Vec<HistoryEntry>,
}

impl History {
    pub fn new() -> Self {
        Self {
            entries: Vec::with_capacity(HISTORY_LEN + 1),
        }
    }

    /// Insert at the front, dropping the oldest entry past the cap
    pub fn record(&mut self, resolution: Resolution, detail: impl Into<String>) {
        self.entries.insert(
            0,
            HistoryEntry {
                resolution,
                detail: detail.into(),
            },
        );
        self.entries.truncate(HISTORY_LEN);
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.first()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Net result of the listed rounds (payouts minus bets)
    pub fn net(&self) -> f64 {
        self.entries
            .iter()
            .map(|e| e.resolution.payout - e.resolution.bet)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::round::{GameKind, RoundId};

    fn res(id: u64, multiplier: f64) -> Resolution {
        Resolution::win(RoundId(id), GameKind::Crash, 10.0, multiplier)
    }

    #[test]
    fn test_newest_first() {
        let mut h = History::new();
        h.record(res(1, 2.0), "2.00x");
        h.record(res(2, 0.0), "crashed");
        assert_eq!(h.latest().unwrap().resolution.round_id, RoundId(2));
        assert_eq!(h.entries()[1].detail, "2.00x");
    }

    #[test]
    fn test_capped_length() {
        let mut h = History::new();
        for i in 0..25 {
            h.record(res(i, 1.0), "");
        }
        assert_eq!(h.len(), HISTORY_LEN);
        assert_eq!(h.latest().unwrap().resolution.round_id, RoundId(24));
        assert_eq!(h.entries().last().unwrap().resolution.round_id, RoundId(15));
    }

    #[test]
    fn test_net() {
        let mut h = History::new();
        assert!(h.is_empty());
        h.record(res(1, 2.0), "");
        h.record(Resolution::loss(RoundId(2), GameKind::Crash, 10.0), "");
        assert!((h.net() - 0.0).abs() < 1e-9);
    }
}
