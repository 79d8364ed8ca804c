//! Fixed-step frame accumulator
//!
//! The host calls `advance` with whatever wall-clock delta its render loop
//! produced; the clock turns that into a clamped elapsed time (for the crash
//! curve) and a whole number of fixed Plinko frames.

use crate::consts::{FRAME_MS, MAX_FRAME_DELTA_MS, MAX_SUBSTEPS};

/// Time handed to the engines for one host tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameBudget {
    /// Clamped, speed-scaled elapsed milliseconds
    pub elapsed_ms: f64,
    /// Fixed physics frames to run
    pub steps: u32,
}

#[derive(Debug, Clone)]
pub struct FrameClock {
    accumulator_ms: f64,
    time_scale: f64,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self {
            accumulator_ms: 0.0,
            time_scale: 1.0,
        }
    }
}

impl FrameClock {
    /// Animation speed multiplier (settings); non-positive values are ignored
    pub fn set_time_scale(&mut self, scale: f64) {
        if scale.is_finite() && scale > 0.0 {
            self.time_scale = scale;
        }
    }

    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    pub fn advance(&mut self, delta_ms: f64) -> FrameBudget {
        let delta = if delta_ms.is_finite() { delta_ms } else { 0.0 };
        let elapsed_ms = (delta * self.time_scale).clamp(0.0, MAX_FRAME_DELTA_MS);
        self.accumulator_ms += elapsed_ms;

        let mut steps = 0;
        while self.accumulator_ms >= FRAME_MS && steps < MAX_SUBSTEPS {
            self.accumulator_ms -= FRAME_MS;
            steps += 1;
        }

        FrameBudget { elapsed_ms, steps }
    }

    pub fn reset(&mut self) {
        self.accumulator_ms = 0.0;
    }
}
