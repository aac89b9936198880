//! Hands-free firework show.
//!
//! [`AutoShow`] launches a random shell at a fixed interval, mixing the
//! shapes the way the demo show does:
//!
//! | Share | Launch |
//! |-------|--------|
//! | 15% | Image shell (only with images registered); the next slot stays empty |
//! | 30% | Dual-color sphere |
//! | 40% | Dual-color multi-layer |
//! | rest | Single-color heart |
//!
//! # Example
//!
//! ```ignore
//! let mut show = AutoShow::new(config.show.clone()).with_image(logo);
//! loop {
//!     let dt = clock.tick();
//!     show.tick(dt, &mut sim)?;
//!     sim.update(dt)?;
//! }
//! ```

use std::sync::Arc;

use glam::Vec3;

use crate::color;
use crate::config::ShowConfig;
use crate::error::Result;
use crate::particle::ShapeKind;
use crate::simulation::{FireworkSystem, LaunchParams};
use crate::spawn::SpawnContext;
use crate::textures::BurstImage;

/// Interval-driven random launcher.
#[derive(Debug, Clone)]
pub struct AutoShow {
    config: ShowConfig,
    images: Vec<Arc<BurstImage>>,
    rng: SpawnContext,
    since_last: f32,
    skip_next: bool,
    launched: u64,
}

impl AutoShow {
    pub fn new(config: ShowConfig) -> Self {
        Self {
            config,
            images: Vec::new(),
            rng: SpawnContext::new(),
            since_last: 0.0,
            skip_next: false,
            launched: 0,
        }
    }

    pub fn with_rng(mut self, rng: SpawnContext) -> Self {
        self.rng = rng;
        self
    }

    /// Make `image` eligible for image shells.
    pub fn with_image(mut self, image: Arc<BurstImage>) -> Self {
        self.images.push(image);
        self
    }

    pub fn with_images<I: IntoIterator<Item = Arc<BurstImage>>>(mut self, images: I) -> Self {
        self.images.extend(images);
        self
    }

    pub fn config(&self) -> &ShowConfig {
        &self.config
    }

    /// Shells launched so far.
    pub fn launched(&self) -> u64 {
        self.launched
    }

    /// Advance the schedule by `dt` and return the launch due now, if any.
    ///
    /// At most one launch is returned per call.
    pub fn advance(&mut self, dt: f32) -> Option<LaunchParams> {
        self.since_last += dt.max(0.0);
        if self.since_last < self.config.interval {
            return None;
        }
        self.since_last = (self.since_last - self.config.interval).min(self.config.interval);

        if self.skip_next {
            self.skip_next = false;
            return None;
        }

        let params = self.pick();
        self.skip_next = params.shape == ShapeKind::Image;
        self.launched += 1;
        Some(params)
    }

    /// Advance the schedule and launch into `sim` when a slot is due.
    ///
    /// Returns whether a shell was launched.
    pub fn tick(&mut self, dt: f32, sim: &mut FireworkSystem) -> Result<bool> {
        match self.advance(dt) {
            Some(params) => {
                sim.launch(params)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Roll the next launch without touching the schedule.
    pub fn pick(&mut self) -> LaunchParams {
        let c = &self.config;
        let position = Vec3::new(
            self.rng.random_range(c.x_range.x, c.x_range.y),
            c.pad_height,
            self.rng.random_range(c.z_range.x, c.z_range.y),
        );
        let size = c.size_min + self.rng.random() * c.size_span;

        let roll = if self.images.is_empty() {
            c.image_chance + self.rng.random() * (1.0 - c.image_chance)
        } else {
            self.rng.random()
        };

        if roll < c.image_chance {
            let image = Arc::clone(&self.images[self.rng.random_index(self.images.len())]);
            return LaunchParams::new(position, ShapeKind::Image)
                .with_life(c.image_life)
                .with_size(size * c.image_size_scale)
                .with_image(image);
        }

        let (primary, secondary) = color::random_color_pair(&mut self.rng);
        let shape = if roll < c.image_chance + c.sphere_chance {
            ShapeKind::Sphere
        } else if roll < c.image_chance + c.sphere_chance + c.multi_layer_chance {
            ShapeKind::MultiLayer
        } else {
            ShapeKind::Heart
        };

        let params = LaunchParams::new(position, shape)
            .with_life(c.life)
            .with_color(primary)
            .with_size(size);
        if shape == ShapeKind::Heart {
            params
        } else {
            params.with_secondary(secondary)
        }
    }
}
