//! Random draws
//!
//! Two kinds of draw live behind one trait:
//! - `uniform`: fast, non-cryptographic, used for cosmetic jitter only
//!   (pin bounce angles, crash curve fluctuation)
//! - `secure_*`: outcome-grade 32-bit draws used for everything that decides
//!   money (dice roll, crash point, mine placement)

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::error::{ArcadeError, Result};

/// 2^32 as a float, the denominator for mapping a u32 onto [0, 1)
const U32_SPAN: f64 = 4_294_967_296.0;

pub trait RandomSource {
    /// Uniform float in `[min, max)`. Cosmetic only.
    fn uniform(&mut self, min: f64, max: f64) -> f64;

    /// 32 uniformly distributed bits from the outcome-grade source
    fn secure_u32(&mut self) -> Result<u32>;

    /// Uniform integer in the inclusive range `[min, max]`
    ///
    /// Maps the raw draw as `floor(bits / 2^32 * (max - min + 1)) + min`.
    fn secure_range(&mut self, min: u32, max: u32) -> Result<u32> {
        if min > max {
            return Err(ArcadeError::invalid(format!(
                "empty draw range [{min}, {max}]"
            )));
        }
        let span = u64::from(max - min) + 1;
        let scaled = (u64::from(self.secure_u32()?) * span) >> 32;
        Ok(min + scaled as u32)
    }

    /// Continuous draw in `[0, 1)` with 32 bits of resolution
    fn secure_unit(&mut self) -> Result<f64> {
        Ok(f64::from(self.secure_u32()?) / U32_SPAN)
    }
}

/// Production source: PCG for cosmetics, OS entropy for outcomes
#[derive(Debug, Clone)]
pub struct SystemRandom {
    cosmetic: Pcg32,
}

impl SystemRandom {
    pub fn new() -> Result<Self> {
        let seed = getrandom::u64().map_err(|e| ArcadeError::Entropy(e.to_string()))?;
        Ok(Self {
            cosmetic: Pcg32::seed_from_u64(seed),
        })
    }
}

impl RandomSource for SystemRandom {
    fn uniform(&mut self, min: f64, max: f64) -> f64 {
        min + (max - min) * self.cosmetic.random::<f64>()
    }

    fn secure_u32(&mut self) -> Result<u32> {
        getrandom::u32().map_err(|e| ArcadeError::Entropy(e.to_string()))
    }
}

/// Fully deterministic source for replays, simulations and tests.
///
/// Outcome draws come from the same PCG stream as cosmetic ones, so this is
/// predictable by construction and must not back real-money play.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    seed: u64,
    rng: Pcg32,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl RandomSource for SeededRandom {
    fn uniform(&mut self, min: f64, max: f64) -> f64 {
        min + (max - min) * self.rng.random::<f64>()
    }

    fn secure_u32(&mut self) -> Result<u32> {
        Ok(self.rng.random::<u32>())
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn uniform(&mut self, min: f64, max: f64) -> f64 {
        (**self).uniform(min, max)
    }

    fn secure_u32(&mut self) -> Result<u32> {
        (**self).secure_u32()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::collections::VecDeque;

    /// Replays a fixed queue of secure draws; cosmetic draws return the midpoint
    pub struct ScriptedRandom {
        secure: VecDeque<u32>,
    }

    impl ScriptedRandom {
        pub fn new(draws: impl IntoIterator<Item = u32>) -> Self {
            Self {
                secure: draws.into_iter().collect(),
            }
        }

        /// Raw bits that `secure_range(min, max)` maps onto `value`
        pub fn bits_for(value: u32, min: u32, max: u32) -> u32 {
            let span = u64::from(max - min) + 1;
            let offset = u64::from(value - min);
            // Lower bound of the bucket, rounded up
            ((offset << 32).div_ceil(span)) as u32
        }

        /// Raw bits that `secure_unit` maps onto `u` (u must be a multiple of 2^-32)
        pub fn bits_for_unit(u: f64) -> u32 {
            (u * U32_SPAN) as u32
        }
    }

    impl RandomSource for ScriptedRandom {
        fn uniform(&mut self, min: f64, max: f64) -> f64 {
            (min + max) / 2.0
        }

        fn secure_u32(&mut self) -> Result<u32> {
            self.secure
                .pop_front()
                .ok_or_else(|| ArcadeError::Entropy("script exhausted".into()))
        }
    }
}
