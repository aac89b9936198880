//! Per-tick particle physics and aging.
//!
//! A [`Stepper`] captures the knobs for one tick (scaled `dt`, gravity, color
//! curve, spiral rate) and advances individual particles. It never touches
//! pools; the simulation decides what to do with the results (explode
//! shells, spawn echoes, cull).
//!
//! # Step Order
//!
//! For every particle with `life > 0`:
//!
//! 1. spiral particles turn their horizontal velocity
//! 2. `position += velocity * dt`
//! 3. `velocity.y += gravity * dt`
//! 4. `life -= dt`, clamped at zero
//! 5. `color` is recomputed from `initial_color`, except for image particles

use glam::Vec3;

use crate::color;
use crate::config::FireworkConfig;
use crate::particle::{Particle, ShapeKind};

/// Physics parameters for a single tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stepper {
    /// Already scaled by the time scale.
    pub dt: f32,
    pub gravity: f32,
    pub fade_threshold: f32,
    pub spiral_angular_speed: f32,
    pub tail_shrink: f32,
    pub tail_min_size: f32,
}

impl Stepper {
    /// Stepper for a tick of `scaled_dt` seconds.
    pub fn new(config: &FireworkConfig, scaled_dt: f32) -> Self {
        Self {
            dt: scaled_dt,
            gravity: config.gravity,
            fade_threshold: config.fade_threshold,
            spiral_angular_speed: config.spiral_angular_speed,
            tail_shrink: config.trail.shrink,
            tail_min_size: config.trail.min_size,
        }
    }

    /// Advance a moving particle (shell or burst star).
    ///
    /// Returns the position before the update, or `None` if the particle was
    /// already spent and left untouched.
    pub fn advance(&self, p: &mut Particle) -> Option<Vec3> {
        if !p.is_alive() {
            return None;
        }
        let previous = p.position;

        if p.shape == ShapeKind::Spiral && !p.is_tail {
            self.rotate_spiral(p);
        }

        p.position += p.velocity * self.dt;
        p.velocity.y += self.gravity * self.dt;
        p.life = (p.life - self.dt).max(0.0);

        if p.shape != ShapeKind::Image {
            p.color = color::shade(p.initial_color, p.life, p.max_life, self.fade_threshold);
        }

        Some(previous)
    }

    /// Age a stationary trail echo, shrinking it as it fades.
    ///
    /// A zero-length tick leaves the echo untouched.
    pub fn advance_tail(&self, p: &mut Particle) {
        if !p.is_alive() || self.dt <= 0.0 {
            return;
        }
        let elapsed = 1.0 - p.life_ratio();
        p.size = (p.size * (1.0 - elapsed * self.tail_shrink)).max(self.tail_min_size);
        p.life = (p.life - self.dt).max(0.0);
        p.color = color::shade(p.initial_color, p.life, p.max_life, self.fade_threshold);
    }

    /// Sweep the horizontal velocity around the up axis.
    ///
    /// Horizontal speed is preserved; only the direction turns, which bends
    /// the spiral arms into helices.
    pub fn rotate_spiral(&self, p: &mut Particle) {
        p.rotation_angle += self.dt * self.spiral_angular_speed;
        let speed = Vec3::new(p.velocity.x, 0.0, p.velocity.z).length();
        p.velocity.x = speed * p.rotation_angle.cos();
        p.velocity.z = speed * p.rotation_angle.sin();
    }
}

/// Whether an ascending shell should explode: it stopped climbing or burned out.
#[inline]
pub fn has_peaked(p: &Particle) -> bool {
    p.velocity.y <= 0.0 || p.life <= 0.0
}

/// Whether a burst star fires its own small burst this tick.
#[inline]
pub fn triggers_rebound(p: &Particle, was_alive: bool) -> bool {
    p.can_explode_again && was_alive && !p.is_alive()
}
