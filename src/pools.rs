//! Particle population.
//!
//! Particles live in three pools by role:
//!
//! | Pool | Contents |
//! |------|----------|
//! | `launchers` | Ascending shells, one per launch |
//! | `explosions` | Burst stars from primary, secondary and second-order bursts, including image silhouettes |
//! | `trails` | Stationary echoes |
//!
//! A particle is created into exactly one pool and stays there until it is
//! culled. New particles enter through [`ParticlePools::admit`], which enforces
//! the global `max_particles` cap by dropping whatever does not fit.

use crate::particle::{Particle, ParticleVertex};

/// Which pool a batch of particles goes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PoolKind {
    Launchers,
    Explosions,
    Trails,
}

/// Per-pool population at one instant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolCounts {
    pub launchers: usize,
    pub explosions: usize,
    pub trails: usize,
}

impl PoolCounts {
    pub fn total(&self) -> usize {
        self.launchers + self.explosions + self.trails
    }
}

/// The three particle pools plus the population cap.
#[derive(Debug, Clone)]
pub struct ParticlePools {
    pub(crate) launchers: Vec<Particle>,
    pub(crate) explosions: Vec<Particle>,
    pub(crate) trails: Vec<Particle>,
    max_particles: usize,
    dropped: u64,
}

impl ParticlePools {
    pub fn new(max_particles: usize) -> Self {
        Self {
            launchers: Vec::new(),
            explosions: Vec::new(),
            trails: Vec::new(),
            max_particles,
            dropped: 0,
        }
    }

    pub fn launchers(&self) -> &[Particle] {
        &self.launchers
    }

    pub fn explosions(&self) -> &[Particle] {
        &self.explosions
    }

    pub fn trails(&self) -> &[Particle] {
        &self.trails
    }

    pub fn pool(&self, kind: PoolKind) -> &[Particle] {
        match kind {
            PoolKind::Launchers => &self.launchers,
            PoolKind::Explosions => &self.explosions,
            PoolKind::Trails => &self.trails,
        }
    }

    fn pool_mut(&mut self, kind: PoolKind) -> &mut Vec<Particle> {
        match kind {
            PoolKind::Launchers => &mut self.launchers,
            PoolKind::Explosions => &mut self.explosions,
            PoolKind::Trails => &mut self.trails,
        }
    }

    pub fn counts(&self) -> PoolCounts {
        PoolCounts {
            launchers: self.launchers.len(),
            explosions: self.explosions.len(),
            trails: self.trails.len(),
        }
    }

    pub fn total(&self) -> usize {
        self.launchers.len() + self.explosions.len() + self.trails.len()
    }

    pub fn max_particles(&self) -> usize {
        self.max_particles
    }

    /// Change the cap. Particles already alive are kept even if over the new cap.
    pub fn set_max_particles(&mut self, max: usize) {
        self.max_particles = max;
    }

    /// Room left under the cap.
    pub fn remaining_capacity(&self) -> usize {
        self.max_particles.saturating_sub(self.total())
    }

    /// Spawns rejected by the cap since creation.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Move `batch` into the pool, keeping as many as fit under the cap.
    ///
    /// Particles past the cap are dropped from the end of the batch. Returns
    /// how many were admitted.
    pub fn admit(&mut self, kind: PoolKind, mut batch: Vec<Particle>) -> usize {
        let room = self.remaining_capacity();
        if batch.len() > room {
            let over = batch.len() - room;
            self.dropped += over as u64;
            log::warn!(
                "Particle cap {} reached, dropped {} {:?} spawns",
                self.max_particles,
                over,
                kind
            );
            batch.truncate(room);
        }
        let admitted = batch.len();
        self.pool_mut(kind).append(&mut batch);
        admitted
    }

    /// Remove every particle that burned out or fell below the ground plane.
    ///
    /// Returns the number removed.
    pub fn cull(&mut self) -> usize {
        let before = self.total();
        self.launchers.retain(|p| !p.is_dead());
        self.explosions.retain(|p| !p.is_dead());
        self.trails.retain(|p| !p.is_dead());
        before - self.total()
    }

    /// Every live particle in draw order: launchers, explosions, then trails.
    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.launchers
            .iter()
            .chain(self.explosions.iter())
            .chain(self.trails.iter())
    }

    /// Read view of this frame's particles, in draw order.
    pub fn render_list(&self) -> Vec<&Particle> {
        self.iter().collect()
    }

    /// This frame's particles packed for GPU upload, in draw order.
    pub fn vertices(&self) -> Vec<ParticleVertex> {
        self.iter().map(Particle::to_vertex).collect()
    }

    pub fn clear(&mut self) {
        self.launchers.clear();
        self.explosions.clear();
        self.trails.clear();
    }
}

impl Default for ParticlePools {
    fn default() -> Self {
        Self::new(crate::config::FireworkConfig::default().max_particles)
    }
}
