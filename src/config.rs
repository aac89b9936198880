//! Tunable simulation parameters.
//!
//! Every constant that shapes a show lives here: gravity, time scale, trail
//! look, burst sizes and the per-shape scatter parameters. Defaults reproduce
//! the crisp short-lived bursts of the reference show. Configurations can be
//! built in code with the `with_*` methods or loaded from JSON; missing JSON
//! fields fall back to their defaults.
//!
//! ```ignore
//! let config = FireworkConfig::default()
//!     .with_gravity(-6.0)
//!     .with_time_scale(0.5)
//!     .with_trail(TrailConfig { life: 0.5, ..Default::default() });
//! ```

use std::fs;
use std::path::Path;

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::{FireworkError, Result};
use crate::particle::ShapeKind;
use crate::spawn::SpawnContext;

/// Complete engine configuration.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FireworkConfig {
    /// Signed acceleration along +Y, in units/s².
    pub gravity: f32,
    /// Multiplier applied to every `dt` passed to `update` (slow motion < 1).
    pub time_scale: f32,
    /// Life ratio below which particles fade out.
    pub fade_threshold: f32,
    /// Angular speed of spiral particles, in rad/s.
    pub spiral_angular_speed: f32,
    /// Upper bound on live particles across all pools.
    pub max_particles: usize,
    /// Shape used when an image burst cannot be generated. `None` drops it.
    pub image_fallback: Option<ShapeKind>,
    pub launch: LaunchConfig,
    pub trail: TrailConfig,
    pub initial_tail: InitialTailConfig,
    pub burst: BurstConfig,
    pub shapes: ShapeParams,
    pub double_explosion: DoubleExplosionConfig,
    pub image: ImageBurstConfig,
    pub light: LightConfig,
    pub show: ShowConfig,
}

impl Default for FireworkConfig {
    fn default() -> Self {
        Self {
            gravity: -9.8,
            time_scale: 1.0,
            fade_threshold: crate::color::DEFAULT_FADE_THRESHOLD,
            spiral_angular_speed: 3.0,
            max_particles: 200_000,
            image_fallback: Some(ShapeKind::Sphere),
            launch: LaunchConfig::default(),
            trail: TrailConfig::default(),
            initial_tail: InitialTailConfig::default(),
            burst: BurstConfig::default(),
            shapes: ShapeParams::default(),
            double_explosion: DoubleExplosionConfig::default(),
            image: ImageBurstConfig::default(),
            light: LightConfig::default(),
            show: ShowConfig::default(),
        }
    }
}

impl FireworkConfig {
    /// Parse a configuration from JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check that every knob is in a usable range.
    pub fn validate(&self) -> Result<()> {
        fn check(ok: bool, what: &str) -> Result<()> {
            if ok {
                Ok(())
            } else {
                Err(FireworkError::InvalidArgument(what.to_string()))
            }
        }

        check(self.gravity.is_finite(), "gravity must be finite")?;
        check(
            self.time_scale.is_finite() && self.time_scale >= 0.0,
            "time_scale must be >= 0",
        )?;
        check(
            self.fade_threshold > 0.0 && self.fade_threshold < 1.0,
            "fade_threshold must be in (0, 1)",
        )?;
        check(
            (0.0..=1.0).contains(&self.trail.alpha),
            "trail.alpha must be in [0, 1]",
        )?;
        check(self.trail.life > 0.0, "trail.life must be > 0")?;
        check(self.initial_tail.life > 0.0, "initial_tail.life must be > 0")?;
        check(
            self.burst.secondary_delay >= 0.0,
            "burst.secondary_delay must be >= 0",
        )?;
        check(self.shapes.multi_layer.layers > 0, "multi_layer.layers must be > 0")?;
        check(self.shapes.spiral.arms > 0, "spiral.arms must be > 0")?;
        check(self.image.extent > 0.0, "image.extent must be > 0")?;
        check(self.show.interval > 0.0, "show.interval must be > 0")?;
        check(
            self.show.image_chance + self.show.sphere_chance + self.show.multi_layer_chance <= 1.0,
            "show chances must sum to at most 1",
        )?;
        Ok(())
    }

    // =========================================================================
    // BUILDER METHODS
    // =========================================================================

    pub fn with_gravity(mut self, gravity: f32) -> Self {
        self.gravity = gravity;
        self
    }

    /// Set the slow-motion factor. Negative values clamp to 0 (paused).
    pub fn with_time_scale(mut self, scale: f32) -> Self {
        self.time_scale = scale.max(0.0);
        self
    }

    pub fn with_trail(mut self, trail: TrailConfig) -> Self {
        self.trail = trail;
        self
    }

    /// Disable trail echoes entirely.
    pub fn without_trails(mut self) -> Self {
        self.trail.enabled = false;
        self.initial_tail.count = 0;
        self
    }

    pub fn with_burst(mut self, burst: BurstConfig) -> Self {
        self.burst = burst;
        self
    }

    pub fn with_max_particles(mut self, max: usize) -> Self {
        self.max_particles = max;
        self
    }

    pub fn with_image_fallback(mut self, fallback: Option<ShapeKind>) -> Self {
        self.image_fallback = fallback;
        self
    }
}

/// Ascending shell parameters.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LaunchConfig {
    /// Initial upward speed of every shell.
    pub speed: f32,
    /// Brightness multiplier of the shell's displayed color before its first tick.
    pub glow: f32,
    /// Multiplier from requested size to shell size.
    pub size_scale: f32,
    /// Size used when a launch does not specify one.
    pub launcher_size: f32,
    /// Size of burst children.
    pub child_size: f32,
    /// Requested life is scaled by `life_jitter_min + life_jitter_span * rand`.
    pub life_jitter_min: f32,
    pub life_jitter_span: f32,
    /// Default launch pad; launches at exactly this point are scattered.
    pub default_pad: Vec3,
    pub scatter_default_pad: bool,
    /// Half extents of the pad scatter on X and Z.
    pub scatter_half_x: f32,
    pub scatter_half_z: f32,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            speed: 12.0,
            glow: 10.0,
            size_scale: 2.5,
            launcher_size: 0.1,
            child_size: 0.08,
            life_jitter_min: 0.6,
            life_jitter_span: 0.2,
            default_pad: Vec3::new(0.0, 0.5, 0.0),
            scatter_default_pad: true,
            scatter_half_x: 8.0,
            scatter_half_z: 5.0,
        }
    }
}

/// Echo particles spawned behind every moving non-tail particle.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TrailConfig {
    pub enabled: bool,
    /// Lifetime of each echo in seconds.
    pub life: f32,
    /// Alpha multiplier applied to the parent's color.
    pub alpha: f32,
    /// Echoes per parent per tick, spread between the old and new position.
    pub spawn_per_tick: u32,
    /// Per-tick shrink factor, weighted by elapsed life fraction.
    pub shrink: f32,
    pub min_size: f32,
}

impl Default for TrailConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            life: 0.3,
            alpha: 0.5,
            spawn_per_tick: 1,
            shrink: 0.05,
            min_size: 0.01,
        }
    }
}

/// Echoes seeded beneath a shell at launch so it leaves the pad with a tail.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InitialTailConfig {
    pub count: u32,
    /// Vertical spacing between seeded echoes.
    pub step: f32,
    pub life: f32,
}

impl Default for InitialTailConfig {
    fn default() -> Self {
        Self {
            count: 5,
            step: 0.05,
            life: 0.3,
        }
    }
}

/// Burst sizes and the delayed second burst.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BurstConfig {
    pub primary_count: u32,
    pub secondary_count: u32,
    pub primary_radius: f32,
    /// Delay between a primary burst and its second burst, in seconds.
    pub secondary_delay: f32,
    pub secondary_radius: f32,
    /// Shapes whose primary burst schedules a second burst. Image bursts never do.
    pub secondary_shapes: Vec<ShapeKind>,
}

impl BurstConfig {
    /// Whether a primary burst of `shape` schedules a second burst.
    pub fn schedules_secondary(&self, shape: ShapeKind) -> bool {
        shape.has_secondary() && self.secondary_shapes.contains(&shape)
    }
}

impl Default for BurstConfig {
    fn default() -> Self {
        Self {
            primary_count: 150,
            secondary_count: 90,
            primary_radius: 3.0,
            secondary_delay: 0.1,
            secondary_radius: 5.0,
            secondary_shapes: ShapeKind::ALL
                .into_iter()
                .filter(|s| s.has_secondary())
                .collect(),
        }
    }
}

/// Randomized lifetime `base + spread * rand`, in seconds.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct LifeBand {
    pub base: f32,
    pub spread: f32,
}

impl LifeBand {
    pub const fn new(base: f32, spread: f32) -> Self {
        Self { base, spread }
    }

    pub fn sample(&self, ctx: &mut SpawnContext) -> f32 {
        (self.base + self.spread * ctx.random()).max(f32::EPSILON)
    }
}

/// Scatter parameters for every burst generator.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ShapeParams {
    pub sphere: SphereParams,
    pub ring: RingParams,
    pub multi_layer: MultiLayerParams,
    pub spiral: SpiralParams,
    pub heart: HeartParams,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SphereParams {
    /// Speed is `radius * (radius_min + radius_spread * rand)`.
    pub radius_min: f32,
    pub radius_spread: f32,
    pub life: LifeBand,
}

impl Default for SphereParams {
    fn default() -> Self {
        Self {
            radius_min: 1.1,
            radius_spread: 0.3,
            life: LifeBand::new(0.4, 0.15),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RingParams {
    pub radius_min: f32,
    pub radius_spread: f32,
    /// Upward speed is `lift_min + lift_spread * rand`.
    pub lift_min: f32,
    pub lift_spread: f32,
    pub life: LifeBand,
}

impl Default for RingParams {
    fn default() -> Self {
        Self {
            radius_min: 0.9,
            radius_spread: 0.2,
            lift_min: 0.5,
            lift_spread: 0.5,
            life: LifeBand::new(0.35, 0.15),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MultiLayerParams {
    pub layers: u32,
    /// Innermost shell radius as a fraction of the burst radius.
    pub inner: f32,
    /// Radius added per shell, as a fraction of the burst radius.
    pub step: f32,
    pub life: LifeBand,
    /// Extra lifetime per shell.
    pub life_step: f32,
    /// Extra relative size per shell.
    pub size_step: f32,
    /// RGB multipliers per shell; shells past the end reuse the last entry.
    pub tints: Vec<Vec3>,
}

impl Default for MultiLayerParams {
    fn default() -> Self {
        Self {
            layers: 3,
            inner: 0.9,
            step: 0.3,
            life: LifeBand::new(0.4, 0.15),
            life_step: 0.1,
            size_step: 0.2,
            tints: vec![
                Vec3::ONE,
                Vec3::new(0.8, 1.2, 0.9),
                Vec3::new(1.2, 0.9, 1.1),
            ],
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SpiralParams {
    pub arms: u32,
    /// Full turns swept from the first to the last particle.
    pub turns: f32,
    /// Radius at the first particle, as a fraction of the burst radius.
    pub inner: f32,
    /// Radius gained across the burst, as a fraction of the burst radius.
    pub growth: f32,
    /// Horizontal speed multiplier.
    pub horizontal: f32,
    pub lift_min: f32,
    pub lift_spread: f32,
    pub life: LifeBand,
}

impl Default for SpiralParams {
    fn default() -> Self {
        Self {
            arms: 3,
            turns: 2.0,
            inner: 0.4,
            growth: 0.8,
            horizontal: 0.8,
            lift_min: 1.5,
            lift_spread: 0.5,
            life: LifeBand::new(0.45, 0.15),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HeartParams {
    /// Curve scale at the reference radius of 3.
    pub scale: f32,
    pub jitter: f32,
    pub lift: f32,
    /// Width of the random depth offset, centered on zero.
    pub depth: f32,
    /// Final velocity multiplier.
    pub speed: f32,
    pub life: LifeBand,
}

impl Default for HeartParams {
    fn default() -> Self {
        Self {
            scale: 0.15,
            jitter: 0.3,
            lift: 1.0,
            depth: 0.5,
            speed: 1.5,
            life: LifeBand::new(0.45, 0.15),
        }
    }
}

/// Second-order bursts fired by double-explosion stars when they burn out.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DoubleExplosionConfig {
    pub child_count: u32,
    pub child_radius: f32,
}

impl Default for DoubleExplosionConfig {
    fn default() -> Self {
        Self {
            child_count: 8,
            child_radius: 0.8,
        }
    }
}

/// Image silhouette bursts.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ImageBurstConfig {
    /// Pixels with alpha below this are skipped.
    pub alpha_threshold: f32,
    /// The image is fit into a square of this many world units.
    pub extent: f32,
    /// Velocity per world unit of offset from the image center.
    pub expand_speed: f32,
    /// Color multiplier keeping image particles under the bloom threshold.
    pub brightness: f32,
    pub life: f32,
    pub size: f32,
}

impl Default for ImageBurstConfig {
    fn default() -> Self {
        Self {
            alpha_threshold: 0.1,
            extent: 4.0,
            expand_speed: 0.8,
            brightness: 0.11,
            life: 0.8,
            size: 0.015,
        }
    }
}

/// Flash light requested from the lighting collaborator per primary burst.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LightConfig {
    pub intensity: f32,
    pub duration: f32,
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            intensity: 25.0,
            duration: 0.1,
        }
    }
}

/// Automatic show schedule.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ShowConfig {
    /// Seconds between launches.
    pub interval: f32,
    /// Probability of an image shell, when images are available.
    pub image_chance: f32,
    /// Probability of a dual-color sphere.
    pub sphere_chance: f32,
    /// Probability of a dual-color multi-layer shell. The rest are single-color hearts.
    pub multi_layer_chance: f32,
    /// Launch area on the ground plane: X range then Z range.
    pub x_range: Vec2,
    pub z_range: Vec2,
    pub pad_height: f32,
    pub size_min: f32,
    pub size_span: f32,
    /// Requested life of regular shells.
    pub life: f32,
    /// Image shells fly shorter and larger.
    pub image_life: f32,
    pub image_size_scale: f32,
}

impl Default for ShowConfig {
    fn default() -> Self {
        Self {
            interval: 0.8,
            image_chance: 0.15,
            sphere_chance: 0.3,
            multi_layer_chance: 0.4,
            x_range: Vec2::new(-4.0, 10.0),
            z_range: Vec2::new(-2.5, 1.5),
            pad_height: 0.5,
            size_min: 0.1,
            size_span: 0.05,
            life: 1.5,
            image_life: 1.0,
            image_size_scale: 1.4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        FireworkConfig::default().validate().unwrap();
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config =
            FireworkConfig::from_json_str(r#"{ "gravity": -4.0, "trail": { "life": 0.5 } }"#)
                .unwrap();
        assert_eq!(config.gravity, -4.0);
        assert_eq!(config.trail.life, 0.5);
        assert_eq!(config.trail.alpha, TrailConfig::default().alpha);
        assert_eq!(config.burst, BurstConfig::default());
    }

    #[test]
    fn test_json_round_trip() {
        let config = FireworkConfig::default()
            .with_gravity(-3.0)
            .with_image_fallback(None);
        let json = config.to_json().unwrap();
        assert_eq!(FireworkConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = FireworkConfig::from_json_str(r#"{ "fade_threshold": 0.0 }"#).unwrap_err();
        assert!(matches!(err, FireworkError::InvalidArgument(_)));

        let err = FireworkConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, FireworkError::Config(_)));
    }

    #[test]
    fn test_builder_chain() {
        let config = FireworkConfig::default()
            .with_time_scale(-2.0)
            .with_max_particles(10)
            .without_trails();
        assert_eq!(config.time_scale, 0.0);
        assert_eq!(config.max_particles, 10);
        assert!(!config.trail.enabled);
        assert_eq!(config.initial_tail.count, 0);
    }

    #[test]
    fn test_secondary_eligibility() {
        let mut burst = BurstConfig::default();
        assert!(burst.schedules_secondary(ShapeKind::Ring));
        assert!(!burst.schedules_secondary(ShapeKind::Image));

        burst.secondary_shapes = vec![ShapeKind::Sphere, ShapeKind::Image];
        assert!(!burst.schedules_secondary(ShapeKind::Ring));
        assert!(!burst.schedules_secondary(ShapeKind::Image));
    }

    #[test]
    fn test_life_band_sample() {
        let band = LifeBand::new(0.4, 0.15);
        let mut ctx = SpawnContext::seeded(11);
        for _ in 0..100 {
            let life = band.sample(&mut ctx);
            assert!((0.4..=0.55).contains(&life));
        }
    }
}
