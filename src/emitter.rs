//! Explosion geometry generators.
//!
//! When a shell explodes, an [`Emitter`] scatters a burst of new particles
//! around the explosion center. Every generator is a pure scatter function:
//! given a [`Burst`] description and a random source, it appends particles to
//! an output pool and returns how many it added.
//!
//! # Emitter Types
//!
//! | Type | Pattern |
//! |------|---------|
//! | [`Emitter::Sphere`] | Area-uniform directions, jittered radius band |
//! | [`Emitter::Ring`] | Evenly spaced horizontal circle, slight lift |
//! | [`Emitter::MultiLayer`] | Concentric tinted shells, outer shells live longer |
//! | [`Emitter::Spiral`] | Interleaved arms sweeping outward |
//! | [`Emitter::Heart`] | Parametric heart curve with depth jitter |
//! | [`Emitter::DoubleExplosion`] | Sphere whose stars burst again on burnout |
//! | [`Emitter::Image`] | Expanding silhouette of an image's opaque pixels |
//!
//! # Example
//!
//! ```ignore
//! let burst = Burst::new(Vec3::new(0.0, 8.0, 0.0), Vec4::new(1.0, 0.2, 0.2, 1.0), 150, 3.0);
//! let added = Emitter::Ring.emit(&mut ctx, &config, &burst, &mut pool);
//! ```

use std::f32::consts::TAU;
use std::sync::Arc;

use glam::{Vec3, Vec4};

use crate::config::{
    FireworkConfig, HeartParams, ImageBurstConfig, MultiLayerParams, RingParams, SphereParams,
    SpiralParams,
};
use crate::error::{FireworkError, Result};
use crate::particle::{Particle, ShapeKind};
use crate::spawn::SpawnContext;
use crate::textures::BurstImage;

/// Where, how big and what color a burst is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Burst {
    pub center: Vec3,
    pub color: Vec4,
    /// Requested particle count. Image bursts emit one particle per opaque pixel instead.
    pub count: u32,
    /// Base outward speed; each generator scales it by its own factors.
    pub radius: f32,
}

impl Burst {
    pub fn new(center: Vec3, color: Vec4, count: u32, radius: f32) -> Self {
        Self {
            center,
            color,
            count,
            radius,
        }
    }
}

/// Burst scatter pattern, one variant per [`ShapeKind`].
#[derive(Debug, Clone)]
pub enum Emitter {
    Sphere,
    Ring,
    MultiLayer,
    Spiral,
    Heart,
    DoubleExplosion,
    /// Image bursts carry their decoded pixels.
    Image(Arc<BurstImage>),
}

impl Emitter {
    /// Select the emitter for a shape tag.
    ///
    /// Image shapes need the decoded image; without one this fails with
    /// [`FireworkError::MissingImage`].
    pub fn from_shape(shape: ShapeKind, image: Option<&Arc<BurstImage>>) -> Result<Self> {
        Ok(match shape {
            ShapeKind::Sphere => Emitter::Sphere,
            ShapeKind::Ring => Emitter::Ring,
            ShapeKind::MultiLayer => Emitter::MultiLayer,
            ShapeKind::Spiral => Emitter::Spiral,
            ShapeKind::Heart => Emitter::Heart,
            ShapeKind::DoubleExplosion => Emitter::DoubleExplosion,
            ShapeKind::Image => Emitter::Image(image.cloned().ok_or(FireworkError::MissingImage)?),
        })
    }

    /// Shape tag stamped on the particles this emitter produces.
    pub fn shape(&self) -> ShapeKind {
        match self {
            Emitter::Sphere => ShapeKind::Sphere,
            Emitter::Ring => ShapeKind::Ring,
            Emitter::MultiLayer => ShapeKind::MultiLayer,
            Emitter::Spiral => ShapeKind::Spiral,
            Emitter::Heart => ShapeKind::Heart,
            Emitter::DoubleExplosion => ShapeKind::DoubleExplosion,
            Emitter::Image(_) => ShapeKind::Image,
        }
    }

    /// Append the burst's particles to `out`. Returns the number appended.
    pub fn emit(
        &self,
        ctx: &mut SpawnContext,
        config: &FireworkConfig,
        burst: &Burst,
        out: &mut Vec<Particle>,
    ) -> usize {
        let shapes = &config.shapes;
        let child_size = config.launch.child_size;
        match self {
            Emitter::Sphere => sphere(ctx, &shapes.sphere, burst, child_size, out),
            Emitter::Ring => ring(ctx, &shapes.ring, burst, child_size, out),
            Emitter::MultiLayer => multi_layer(ctx, &shapes.multi_layer, burst, child_size, out),
            Emitter::Spiral => spiral(ctx, &shapes.spiral, burst, child_size, out),
            Emitter::Heart => heart(ctx, &shapes.heart, burst, child_size, out),
            Emitter::DoubleExplosion => sphere_shell(
                ctx,
                &shapes.sphere,
                burst,
                child_size,
                ShapeKind::DoubleExplosion,
                true,
                out,
            ),
            Emitter::Image(img) => image(&config.image, img, burst.center, out),
        }
    }
}

/// Sphere burst: `count` particles on area-uniform directions.
///
/// Speed lies in `radius * [radius_min, radius_min + radius_spread)`.
pub fn sphere(
    ctx: &mut SpawnContext,
    params: &SphereParams,
    burst: &Burst,
    child_size: f32,
    out: &mut Vec<Particle>,
) -> usize {
    sphere_shell(ctx, params, burst, child_size, ShapeKind::Sphere, false, out)
}

fn sphere_shell(
    ctx: &mut SpawnContext,
    params: &SphereParams,
    burst: &Burst,
    child_size: f32,
    shape: ShapeKind,
    can_explode_again: bool,
    out: &mut Vec<Particle>,
) -> usize {
    out.reserve(burst.count as usize);
    for _ in 0..burst.count {
        let dir = ctx.random_direction();
        let speed = burst.radius * (params.radius_min + params.radius_spread * ctx.random());

        let mut p = Particle::new(
            burst.center,
            dir * speed,
            burst.color,
            params.life.sample(ctx),
            child_size,
            shape,
        );
        p.can_explode_again = can_explode_again;
        out.push(p);
    }
    burst.count as usize
}

/// Ring burst: evenly spaced angles on a horizontal circle with a small lift.
pub fn ring(
    ctx: &mut SpawnContext,
    params: &RingParams,
    burst: &Burst,
    child_size: f32,
    out: &mut Vec<Particle>,
) -> usize {
    let count = burst.count;
    out.reserve(count as usize);
    for i in 0..count {
        let angle = i as f32 / count as f32 * TAU;
        let r = burst.radius * (params.radius_min + params.radius_spread * ctx.random());
        let lift = params.lift_min + params.lift_spread * ctx.random();

        out.push(Particle::new(
            burst.center,
            Vec3::new(angle.cos() * r, lift, angle.sin() * r),
            burst.color,
            params.life.sample(ctx),
            child_size,
            ShapeKind::Ring,
        ));
    }
    count as usize
}

/// Multi-layer burst: concentric sphere-sampled shells.
///
/// The count is split across shells (earlier shells take the remainder).
/// Outer shells are larger, slightly bigger points, tinted and longer lived.
pub fn multi_layer(
    ctx: &mut SpawnContext,
    params: &MultiLayerParams,
    burst: &Burst,
    child_size: f32,
    out: &mut Vec<Particle>,
) -> usize {
    let layers = params.layers.max(1);
    let per_layer = burst.count / layers;
    let remainder = burst.count % layers;
    out.reserve(burst.count as usize);

    for layer in 0..layers {
        let n = per_layer + u32::from(layer < remainder);
        let layer_f = layer as f32;
        let radius = burst.radius * (params.inner + layer_f * params.step);
        let tint = params
            .tints
            .get(layer as usize)
            .or(params.tints.last())
            .copied()
            .unwrap_or(Vec3::ONE);
        let color = (burst.color.truncate() * tint).extend(burst.color.w);
        let size = child_size * (1.0 + layer_f * params.size_step);

        for _ in 0..n {
            let dir = ctx.random_direction();
            let life = params.life.sample(ctx) + layer_f * params.life_step;
            out.push(Particle::new(
                burst.center,
                dir * radius,
                color,
                life,
                size,
                ShapeKind::MultiLayer,
            ));
        }
    }
    burst.count as usize
}

/// Spiral burst: `arms` interleaved arms sweeping outward.
///
/// Particle `i` sits on arm `i % arms`; its angle advances with `i` and its
/// radius grows with `i`. The starting angle is stored in `rotation_angle`
/// so the stepper can keep the arms turning.
pub fn spiral(
    ctx: &mut SpawnContext,
    params: &SpiralParams,
    burst: &Burst,
    child_size: f32,
    out: &mut Vec<Particle>,
) -> usize {
    let count = burst.count;
    let arms = params.arms.max(1);
    out.reserve(count as usize);

    for i in 0..count {
        let progress = i as f32 / count as f32;
        let arm = i % arms;
        let base = arm as f32 / arms as f32 * TAU;
        let angle = base + progress * params.turns * TAU;
        let r = burst.radius * (params.inner + progress * params.growth);
        let lift = params.lift_min + params.lift_spread * ctx.random();

        let mut p = Particle::new(
            burst.center,
            Vec3::new(
                angle.cos() * r * params.horizontal,
                lift,
                angle.sin() * r * params.horizontal,
            ),
            burst.color,
            params.life.sample(ctx),
            child_size,
            ShapeKind::Spiral,
        );
        p.rotation_angle = angle;
        out.push(p);
    }
    count as usize
}

/// Point on the classic heart curve for `t` in `[0, 2π)`.
pub fn heart_curve(t: f32) -> (f32, f32) {
    let x = 16.0 * t.sin().powi(3);
    let y = 13.0 * t.cos() - 5.0 * (2.0 * t).cos() - 2.0 * (3.0 * t).cos() - (4.0 * t).cos();
    (x, y)
}

/// Heart burst: the heart curve in the XY plane with jitter and random depth.
pub fn heart(
    ctx: &mut SpawnContext,
    params: &HeartParams,
    burst: &Burst,
    child_size: f32,
    out: &mut Vec<Particle>,
) -> usize {
    let count = burst.count;
    // The curve scale is tuned for a radius of 3.
    let scale = params.scale * (burst.radius / 3.0);
    out.reserve(count as usize);

    for i in 0..count {
        let t = i as f32 / count as f32 * TAU;
        let (x, y) = heart_curve(t);
        let velocity = Vec3::new(
            x * scale + ctx.random() * params.jitter,
            y * scale + ctx.random() * params.jitter + params.lift,
            ctx.random() * params.depth - params.depth * 0.5,
        ) * params.speed;

        out.push(Particle::new(
            burst.center,
            velocity,
            burst.color,
            params.life.sample(ctx),
            child_size,
            ShapeKind::Heart,
        ));
    }
    count as usize
}

/// Image burst: one tail-flagged particle per sufficiently opaque pixel.
///
/// The image is fit into an `extent`-sized square centered on the burst, with
/// image rows mapped top-down to +Y. Each particle flies outward in the XY
/// plane at a speed proportional to its pixel's offset from the center, so
/// the cloud keeps the picture's silhouette as it grows. Colors are scaled
/// down by `brightness` to stay below the bloom threshold.
pub fn image(
    params: &ImageBurstConfig,
    img: &BurstImage,
    center: Vec3,
    out: &mut Vec<Particle>,
) -> usize {
    let (w, h) = (img.width() as f32, img.height() as f32);
    let scale = (params.extent / w).min(params.extent / h);
    let half_w = w * scale * 0.5;
    let half_h = h * scale * 0.5;

    let before = out.len();
    for (x, y, rgba) in img.pixels() {
        if rgba.w < params.alpha_threshold {
            continue;
        }
        let offset_x = x as f32 * scale - half_w;
        let offset_y = half_h - y as f32 * scale;

        let mut p = Particle::new(
            center,
            Vec3::new(offset_x, offset_y, 0.0) * params.expand_speed,
            rgba * params.brightness,
            params.life,
            params.size,
            ShapeKind::Image,
        );
        p.is_tail = true;
        out.push(p);
    }
    out.len() - before
}

#[cfg(test)]
mod tests {
    use super::*;

    const CENTER: Vec3 = Vec3::new(1.0, 10.0, -2.0);
    const RED: Vec4 = Vec4::new(1.0, 0.0, 0.0, 1.0);

    fn burst(count: u32) -> Burst {
        Burst::new(CENTER, RED, count, 3.0)
    }

    #[test]
    fn test_sphere_count_and_speed_band() {
        let mut ctx = SpawnContext::seeded(1);
        let params = SphereParams::default();
        let mut out = Vec::new();

        let added = sphere(&mut ctx, &params, &burst(150), 0.08, &mut out);

        assert_eq!(added, 150);
        assert_eq!(out.len(), 150);
        for p in &out {
            assert_eq!(p.shape, ShapeKind::Sphere);
            assert_eq!(p.position, CENTER);
            let speed = p.velocity.length();
            assert!(speed >= 3.0 * 1.1 - 1e-3 && speed <= 3.0 * 1.4 + 1e-3, "speed {speed}");
            assert!(p.life >= 0.4 && p.life <= 0.55);
            assert_eq!(p.life, p.max_life);
            assert!(!p.is_tail);
            assert!(!p.can_explode_again);
        }
    }

    #[test]
    fn test_sphere_appends_without_clearing() {
        let mut ctx = SpawnContext::seeded(2);
        let mut out = vec![Particle::new(Vec3::ZERO, Vec3::ZERO, RED, 1.0, 0.1, ShapeKind::Ring)];
        sphere(&mut ctx, &SphereParams::default(), &burst(10), 0.08, &mut out);
        assert_eq!(out.len(), 11);
        assert_eq!(out[0].shape, ShapeKind::Ring);
    }

    #[test]
    fn test_ring_is_horizontal_with_lift() {
        let mut ctx = SpawnContext::seeded(3);
        let params = RingParams::default();
        let mut out = Vec::new();
        ring(&mut ctx, &params, &burst(8), 0.08, &mut out);

        assert_eq!(out.len(), 8);
        for (i, p) in out.iter().enumerate() {
            let expected = i as f32 / 8.0 * TAU;
            let angle = p.velocity.z.atan2(p.velocity.x).rem_euclid(TAU);
            let diff = (angle - expected).abs();
            assert!(diff < 1e-3 || (TAU - diff) < 1e-3);
            assert!(p.velocity.y >= 0.5 && p.velocity.y <= 1.0);
            let r = (p.velocity.x.powi(2) + p.velocity.z.powi(2)).sqrt();
            assert!(r >= 3.0 * 0.9 - 1e-3 && r <= 3.0 * 1.1 + 1e-3);
        }
    }

    #[test]
    fn test_multi_layer_splits_count_and_tints() {
        let mut ctx = SpawnContext::seeded(4);
        let params = MultiLayerParams::default();
        let mut out = Vec::new();
        let added = multi_layer(&mut ctx, &params, &burst(100), 0.1, &mut out);

        assert_eq!(added, 100);
        assert_eq!(out.len(), 100);

        let radii = [3.0 * 0.9, 3.0 * 1.2, 3.0 * 1.5];
        let counts: Vec<usize> = radii
            .iter()
            .map(|r| {
                out.iter()
                    .filter(|p| (p.velocity.length() - r).abs() < 1e-3)
                    .count()
            })
            .collect();
        assert_eq!(counts, vec![34, 33, 33]);

        let outer = out.last().unwrap();
        assert!((outer.initial_color.x - 1.2).abs() < 1e-5);
        assert!((outer.size - 0.1 * 1.4).abs() < 1e-5);
        assert!(outer.max_life >= 0.6 && outer.max_life <= 0.75);
    }

    #[test]
    fn test_spiral_arms_and_rotation() {
        let mut ctx = SpawnContext::seeded(5);
        let params = SpiralParams::default();
        let mut out = Vec::new();
        spiral(&mut ctx, &params, &burst(9), 0.08, &mut out);

        assert_eq!(out.len(), 9);
        // First particle of each arm starts at its arm offset.
        for arm in 0..3 {
            let p = &out[arm];
            let progress = arm as f32 / 9.0;
            let expected = arm as f32 / 3.0 * TAU + progress * 2.0 * TAU;
            assert!((p.rotation_angle - expected).abs() < 1e-4);
        }
        // Radius grows with index.
        let horizontal = |p: &Particle| (p.velocity.x.powi(2) + p.velocity.z.powi(2)).sqrt();
        assert!(horizontal(&out[8]) > horizontal(&out[0]));
        assert!(out.iter().all(|p| p.velocity.y >= 1.5 && p.velocity.y <= 2.0));
    }

    #[test]
    fn test_heart_curve_points() {
        let (x, y) = heart_curve(0.0);
        assert!(x.abs() < 1e-5);
        assert!((y - 5.0).abs() < 1e-4);

        let (x, _) = heart_curve(std::f32::consts::FRAC_PI_2);
        assert!((x - 16.0).abs() < 1e-4);
    }

    #[test]
    fn test_heart_depth_bounded() {
        let mut ctx = SpawnContext::seeded(6);
        let params = HeartParams::default();
        let mut out = Vec::new();
        heart(&mut ctx, &params, &burst(60), 0.08, &mut out);

        assert_eq!(out.len(), 60);
        for p in &out {
            assert!(p.velocity.z.abs() <= 0.25 * 1.5 + 1e-5);
            assert_eq!(p.shape, ShapeKind::Heart);
        }
    }

    #[test]
    fn test_image_skips_transparent_pixels() {
        // 3x1: opaque, transparent, barely visible (alpha 20/255 < 0.1)
        let img = BurstImage::from_rgba(
            vec![255, 255, 255, 255, 255, 0, 0, 0, 0, 255, 0, 20],
            3,
            1,
        )
        .unwrap();
        let params = ImageBurstConfig::default();
        let mut out = Vec::new();

        let added = image(&params, &img, CENTER, &mut out);

        assert_eq!(added, 1);
        let p = &out[0];
        assert!(p.is_tail);
        assert_eq!(p.shape, ShapeKind::Image);
        assert_eq!(p.velocity.z, 0.0);
        // Leftmost pixel flies left.
        assert!(p.velocity.x < 0.0);
        assert!((p.color.x - 0.11).abs() < 1e-5);
    }

    #[test]
    fn test_image_is_centered_and_flipped() {
        // 2x2 all opaque
        let img = BurstImage::from_rgba(vec![255; 16], 2, 2).unwrap();
        let mut out = Vec::new();
        image(&ImageBurstConfig::default(), &img, Vec3::ZERO, &mut out);

        assert_eq!(out.len(), 4);
        // Top-left pixel: offset (-2, +2) * 0.8
        assert!((out[0].velocity - Vec3::new(-1.6, 1.6, 0.0)).length() < 1e-5);
        // Bottom-left pixel moves down relative to the top row.
        assert!(out[2].velocity.y < out[0].velocity.y);
    }

    #[test]
    fn test_from_shape_requires_image() {
        let err = Emitter::from_shape(ShapeKind::Image, None).unwrap_err();
        assert!(matches!(err, FireworkError::MissingImage));

        for shape in ShapeKind::ALL {
            if shape == ShapeKind::Image {
                continue;
            }
            assert_eq!(Emitter::from_shape(shape, None).unwrap().shape(), shape);
        }
    }

    #[test]
    fn test_double_explosion_marks_chain() {
        let mut ctx = SpawnContext::seeded(7);
        let config = FireworkConfig::default();
        let mut out = Vec::new();
        Emitter::DoubleExplosion.emit(&mut ctx, &config, &burst(20), &mut out);

        assert_eq!(out.len(), 20);
        assert!(out.iter().all(|p| p.can_explode_again));
        assert!(out.iter().all(|p| p.shape == ShapeKind::DoubleExplosion));
    }
}
