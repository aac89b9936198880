//! Random source for particle spawning.
//!
//! All randomness in the engine flows through a [`SpawnContext`] owned by the
//! simulation, so tests can pin outputs with [`SpawnContext::seeded`] while
//! regular runs use an entropy seed.

use glam::Vec3;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::TAU;

/// Injectable random source with helpers for common burst patterns.
///
/// ```ignore
/// let mut ctx = SpawnContext::seeded(42);
/// let dir = ctx.random_direction();
/// let life = 0.4 + 0.15 * ctx.random();
/// ```
#[derive(Debug, Clone)]
pub struct SpawnContext {
    rng: SmallRng,
}

impl SpawnContext {
    /// Context seeded from OS entropy; different every run.
    pub fn new() -> Self {
        Self {
            rng: SmallRng::from_entropy(),
        }
    }

    /// Deterministic context for reproducible tests.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    // ========== Random primitives ==========

    /// Random f32 in `[0, 1)`.
    #[inline]
    pub fn random(&mut self) -> f32 {
        self.rng.gen()
    }

    /// Random f32 in `[min, max)`. Returns `min` for an empty range.
    #[inline]
    pub fn random_range(&mut self, min: f32, max: f32) -> f32 {
        if max <= min {
            return min;
        }
        self.rng.gen_range(min..max)
    }

    /// Random index in `0..len`. `len` must be non-zero.
    #[inline]
    pub fn random_index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }

    // ========== Direction helpers ==========

    /// Random unit vector, uniformly distributed on the unit sphere.
    ///
    /// Uses `theta = 2π·U`, `phi = acos(2V − 1)` so that equal areas of the
    /// sphere receive equal probability.
    pub fn random_direction(&mut self) -> Vec3 {
        let theta = self.random() * TAU;
        let phi = (2.0 * self.random() - 1.0).clamp(-1.0, 1.0).acos();
        Vec3::new(
            phi.sin() * theta.cos(),
            phi.sin() * theta.sin(),
            phi.cos(),
        )
    }
}

impl Default for SpawnContext {
    fn default() -> Self {
        Self::new()
    }
}
