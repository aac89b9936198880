//! Particle data model.
//!
//! Every firework element is a [`Particle`]: ascending shells, burst children
//! and trail echoes share the same representation and differ only in which
//! pool owns them and in the `is_tail` / `shape` tags.

use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use glam::{Vec3, Vec4};
use serde::{Deserialize, Serialize};

use crate::error::FireworkError;
use crate::textures::BurstImage;

/// Burst shape tag carried by every particle.
///
/// Selects the scatter pattern when a shell explodes, and drives
/// shape-specific behavior while the burst is in flight (spiral rotation,
/// fixed image colors, second-order bursts).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u32)]
pub enum ShapeKind {
    /// Jittered spherical shell.
    #[default]
    Sphere = 0,
    /// Horizontal ring with a slight upward bias.
    Ring = 1,
    /// Three concentric hue-shifted shells.
    MultiLayer = 2,
    /// Interleaved helical arms.
    Spiral = 3,
    /// Parametric heart curve.
    Heart = 4,
    /// Sphere whose stars burst again when they burn out.
    DoubleExplosion = 5,
    /// Silhouette reconstructed from an image.
    Image = 6,
}

impl ShapeKind {
    /// Every known shape, in tag order.
    pub const ALL: [ShapeKind; 7] = [
        ShapeKind::Sphere,
        ShapeKind::Ring,
        ShapeKind::MultiLayer,
        ShapeKind::Spiral,
        ShapeKind::Heart,
        ShapeKind::DoubleExplosion,
        ShapeKind::Image,
    ];

    /// Whether a primary burst of this shape can schedule a delayed second burst.
    pub fn has_secondary(self) -> bool {
        !matches!(self, ShapeKind::Image)
    }
}

impl From<ShapeKind> for u32 {
    fn from(shape: ShapeKind) -> u32 {
        shape as u32
    }
}

impl TryFrom<u32> for ShapeKind {
    type Error = FireworkError;

    fn try_from(tag: u32) -> Result<Self, Self::Error> {
        ShapeKind::ALL
            .get(tag as usize)
            .copied()
            .ok_or(FireworkError::InvalidShape(tag))
    }
}

/// A single simulated point.
#[derive(Debug, Clone)]
pub struct Particle {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Currently displayed RGBA, recomputed every tick.
    pub color: Vec4,
    /// Reference RGBA the color curve is derived from.
    pub initial_color: Vec4,
    /// Accent color for the delayed second burst of dual-color shells.
    pub secondary_color: Option<Vec4>,
    /// Remaining lifetime in seconds.
    pub life: f32,
    /// Lifetime at spawn; normalization denominator for color and size curves.
    pub max_life: f32,
    pub size: f32,
    pub shape: ShapeKind,
    /// Trail echoes never emit trails of their own.
    pub is_tail: bool,
    /// Burst particle that fires a small burst of its own when it burns out.
    pub can_explode_again: bool,
    /// Orbit angle used by spiral particles.
    pub rotation_angle: f32,
    /// Decoded image for image shells.
    pub image: Option<Arc<BurstImage>>,
}

impl Particle {
    /// Create a particle at `position` moving with `velocity`.
    ///
    /// `life` is clamped to be non-negative and becomes `max_life`.
    pub fn new(
        position: Vec3,
        velocity: Vec3,
        color: Vec4,
        life: f32,
        size: f32,
        shape: ShapeKind,
    ) -> Self {
        let life = life.max(0.0);
        Self {
            position,
            velocity,
            color,
            initial_color: color,
            secondary_color: None,
            life,
            max_life: life,
            size,
            shape,
            is_tail: false,
            can_explode_again: false,
            rotation_angle: 0.0,
            image: None,
        }
    }

    /// Remaining life as a fraction of `max_life`, in `[0, 1]`.
    ///
    /// A particle with a non-positive `max_life` is already spent.
    #[inline]
    pub fn life_ratio(&self) -> f32 {
        if self.max_life <= 0.0 {
            return 0.0;
        }
        (self.life / self.max_life).clamp(0.0, 1.0)
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.life > 0.0
    }

    /// Whether the culling pass removes this particle.
    #[inline]
    pub fn is_dead(&self) -> bool {
        self.life <= 0.0 || self.position.y < 0.0
    }

    /// The color a delayed second burst of this shell uses.
    pub fn burst_accent(&self) -> Vec4 {
        self.secondary_color.unwrap_or(self.initial_color)
    }

    pub fn to_vertex(&self) -> ParticleVertex {
        ParticleVertex {
            position: self.position.to_array(),
            size: self.size,
            color: self.color.to_array(),
        }
    }
}

/// GPU vertex layout for point-sprite rendering.
///
/// Tightly packed: `position` at offset 0, `size` at 12, `color` at 16.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct ParticleVertex {
    pub position: [f32; 3],
    pub size: f32,
    pub color: [f32; 4],
}

impl ParticleVertex {
    /// Byte stride of one vertex.
    pub const STRIDE: usize = std::mem::size_of::<ParticleVertex>();
    pub const POSITION_OFFSET: u32 = 0;
    pub const SIZE_OFFSET: u32 = 12;
    pub const COLOR_OFFSET: u32 = 16;
}
