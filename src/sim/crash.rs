//! Crash growth curve
//!
//! The multiplier grows exponentially with elapsed time plus a random
//! fluctuation that can slow growth but never reverse it. The crash point is
//! committed before the first frame; the curve only decides when it is
//! revealed.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::config::CrashTuning;
use crate::rng::RandomSource;

/// What a frame of the curve decided
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CurveStatus {
    Rising,
    /// Reached the auto-cashout target (checked before the crash)
    AutoCashout { multiplier: f64 },
    /// Reached the committed crash point
    Crashed { multiplier: f64 },
}

/// Multiplier state for one crash round
#[derive(Debug, Clone)]
pub struct GrowthCurve {
    growth_rate: f64,
    volatility: f64,
    smoothing: f64,
    max_points: usize,
    crash_point: f64,
    auto_cashout: Option<f64>,
    /// True multiplier, used for every outcome decision
    multiplier: f64,
    /// Render-only value, eased toward `multiplier`
    smoothed: f64,
    elapsed_ms: f64,
    chart: VecDeque<f64>,
}

impl GrowthCurve {
    pub fn new(tuning: &CrashTuning, crash_point: f64, auto_cashout: Option<f64>) -> Self {
        let max_points = tuning.chart_points.max(2);
        let mut chart = VecDeque::with_capacity(max_points);
        chart.push_back(1.0);
        Self {
            growth_rate: tuning.growth_rate,
            volatility: tuning.volatility,
            smoothing: tuning.smoothing,
            max_points,
            crash_point,
            auto_cashout,
            multiplier: 1.0,
            smoothed: 1.0,
            elapsed_ms: 0.0,
            chart,
        }
    }

    /// Resize the chart buffer (performance setting). Drops the oldest points.
    pub fn set_chart_points(&mut self, max_points: usize) {
        self.max_points = max_points.max(2);
        while self.chart.len() > self.max_points {
            self.chart.pop_front();
        }
    }

    /// Advance the curve by `elapsed_ms` of frame time
    pub fn advance(&mut self, elapsed_ms: f64, rng: &mut impl RandomSource) -> CurveStatus {
        let elapsed = if elapsed_ms.is_finite() {
            elapsed_ms.max(0.0)
        } else {
            0.0
        };
        self.elapsed_ms += elapsed;

        let base_increase = (self.growth_rate * elapsed).exp() - 1.0;
        let fluctuation = rng.uniform(-0.5, 0.5) * self.volatility * elapsed;
        // Fluctuation may cancel growth but never push the multiplier down
        let total_increase = base_increase + fluctuation.max(-base_increase);
        self.multiplier *= 1.0 + total_increase;

        self.smoothed += (self.multiplier - self.smoothed) * self.smoothing;
        self.chart.push_back(self.smoothed);
        if self.chart.len() > self.max_points {
            self.chart.pop_front();
        }

        if let Some(target) = self.auto_cashout {
            if self.multiplier >= target {
                return CurveStatus::AutoCashout {
                    multiplier: self.multiplier,
                };
            }
        }
        if self.multiplier >= self.crash_point {
            return CurveStatus::Crashed {
                multiplier: self.multiplier,
            };
        }
        CurveStatus::Rising
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    pub fn display_multiplier(&self) -> f64 {
        self.smoothed
    }

    pub fn crash_point(&self) -> f64 {
        self.crash_point
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    pub fn chart(&self) -> impl Iterator<Item = f64> + '_ {
        self.chart.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::FRAME_MS;
    use crate::rng::SeededRandom;
    use crate::rng::testing::ScriptedRandom;

    fn curve(crash_point: f64, auto: Option<f64>) -> GrowthCurve {
        GrowthCurve::new(&CrashTuning::default(), crash_point, auto)
    }

    #[test]
    fn test_pure_exponential_without_jitter() {
        // Scripted uniform is 0, so only the base growth applies
        let mut c = curve(100.0, None);
        let mut rng = ScriptedRandom::new([]);
        for _ in 0..10 {
            c.advance(100.0, &mut rng);
        }
        let expected = (0.000_05f64 * 1000.0).exp();
        assert!((c.multiplier() - expected).abs() < 1e-9);
        assert!((c.elapsed_ms() - 1000.0).abs() < 1e-9);
    }

    #[test]
    fn test_multiplier_never_decreases() {
        let tuning = CrashTuning {
            volatility: 0.05,
            ..CrashTuning::default()
        };
        let mut c = GrowthCurve::new(&tuning, 1e9, None);
        let mut rng = SeededRandom::new(17);
        let mut last = c.multiplier();
        for _ in 0..2_000 {
            c.advance(FRAME_MS, &mut rng);
            assert!(c.multiplier() >= last);
            last = c.multiplier();
        }
    }

    #[test]
    fn test_crash_reveal() {
        let mut c = curve(1.5, None);
        let mut rng = SeededRandom::new(5);
        let status = loop {
            match c.advance(FRAME_MS, &mut rng) {
                CurveStatus::Rising => assert!(c.multiplier() < 1.5),
                other => break other,
            }
        };
        match status {
            CurveStatus::Crashed { multiplier } => assert!(multiplier >= 1.5),
            other => panic!("expected crash, got {other:?}"),
        }
    }

    #[test]
    fn test_auto_cashout_checked_before_crash() {
        // A single big frame overshoots both the target and the crash point
        let mut c = curve(1.2, Some(1.1));
        let mut rng = ScriptedRandom::new([]);
        let status = c.advance(10_000.0, &mut rng);
        assert!(matches!(status, CurveStatus::AutoCashout { .. }));
    }

    #[test]
    fn test_crash_point_of_one_crashes_immediately() {
        let mut c = curve(1.0, None);
        let mut rng = ScriptedRandom::new([]);
        assert!(matches!(
            c.advance(0.0, &mut rng),
            CurveStatus::Crashed { .. }
        ));
    }

    #[test]
    fn test_negative_and_nan_elapsed_are_ignored() {
        let mut c = curve(10.0, None);
        let mut rng = ScriptedRandom::new([]);
        c.advance(-50.0, &mut rng);
        c.advance(f64::NAN, &mut rng);
        assert_eq!(c.multiplier(), 1.0);
        assert_eq!(c.elapsed_ms(), 0.0);
    }

    #[test]
    fn test_display_value_lags_true_multiplier() {
        let mut c = curve(100.0, None);
        let mut rng = ScriptedRandom::new([]);
        c.advance(1_000.0, &mut rng);
        let m = c.multiplier();
        let expected = 1.0 + (m - 1.0) * 0.3;
        assert!((c.display_multiplier() - expected).abs() < 1e-12);
        assert!(c.display_multiplier() < m);
    }

    #[test]
    fn test_chart_is_capped() {
        let tuning = CrashTuning {
            chart_points: 5,
            ..CrashTuning::default()
        };
        let mut c = GrowthCurve::new(&tuning, 1e9, None);
        assert_eq!(c.chart().collect::<Vec<_>>(), vec![1.0]);
        let mut rng = SeededRandom::new(2);
        for _ in 0..20 {
            c.advance(FRAME_MS, &mut rng);
        }
        assert_eq!(c.chart().count(), 5);
        c.set_chart_points(3);
        assert_eq!(c.chart().count(), 3);
        assert_eq!(c.chart().last(), Some(c.display_multiplier()));
    }
}
