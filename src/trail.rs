//! Trail echoes.
//!
//! Every moving non-tail particle leaves stationary "echo" copies of itself at
//! the positions it just left. Echoes are dimmer, short lived and never emit
//! echoes of their own, so the trail is a position history bounded by the
//! echo lifetime.

use glam::Vec3;

use crate::config::{InitialTailConfig, TrailConfig};
use crate::particle::Particle;

/// Stationary dimmed copy of `parent` at `at`, living `life` seconds.
pub fn echo(parent: &Particle, at: Vec3, life: f32, alpha: f32) -> Particle {
    let life = life.max(0.0);
    let mut tail = parent.clone();
    tail.position = at;
    tail.velocity = Vec3::ZERO;
    tail.is_tail = true;
    tail.can_explode_again = false;
    tail.image = None;
    tail.life = life;
    tail.max_life = life;
    tail.color.w *= alpha;
    tail.initial_color.w *= alpha;
    tail
}

/// Append the echoes `parent` leaves behind after moving from `previous`.
///
/// One echo lands exactly on `previous`; with `spawn_per_tick > 1` the rest
/// are spread evenly toward the new position. Nothing is emitted for tail
/// particles, for a zero-length tick, or when trails are disabled.
pub fn emit_echoes(
    parent: &Particle,
    previous: Vec3,
    dt: f32,
    config: &TrailConfig,
    out: &mut Vec<Particle>,
) -> usize {
    if !config.enabled || parent.is_tail || dt <= 0.0 || config.spawn_per_tick == 0 {
        return 0;
    }

    let n = config.spawn_per_tick;
    for k in 0..n {
        let t = k as f32 / n as f32;
        let at = previous.lerp(parent.position, t);
        out.push(echo(parent, at, config.life, config.alpha));
    }
    n as usize
}

/// Seed echoes stacked beneath a freshly launched shell.
pub fn seed_launch_tail(
    shell: &Particle,
    config: &InitialTailConfig,
    alpha: f32,
    out: &mut Vec<Particle>,
) -> usize {
    for k in 0..config.count {
        let at = shell.position - Vec3::Y * config.step * (k + 1) as f32;
        out.push(echo(shell, at, config.life, alpha));
    }
    config.count as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particle::ShapeKind;
    use glam::Vec4;

    fn parent() -> Particle {
        let mut p = Particle::new(
            Vec3::new(0.0, 2.0, 0.0),
            Vec3::new(0.0, 5.0, 0.0),
            Vec4::new(1.0, 0.5, 0.0, 1.0),
            1.0,
            0.1,
            ShapeKind::Sphere,
        );
        p.can_explode_again = true;
        p
    }

    #[test]
    fn test_echo_copies_and_dims() {
        let e = echo(&parent(), Vec3::new(0.0, 1.5, 0.0), 0.3, 0.5);
        assert!(e.is_tail);
        assert!(!e.can_explode_again);
        assert_eq!(e.velocity, Vec3::ZERO);
        assert_eq!(e.position, Vec3::new(0.0, 1.5, 0.0));
        assert_eq!(e.life, 0.3);
        assert_eq!(e.max_life, 0.3);
        assert_eq!(e.color.w, 0.5);
        assert_eq!(e.initial_color.w, 0.5);
        assert_eq!(e.shape, ShapeKind::Sphere);
    }

    #[test]
    fn test_one_echo_per_tick_at_previous_position() {
        let config = TrailConfig::default();
        let mut out = Vec::new();
        let n = emit_echoes(&parent(), Vec3::new(0.0, 1.9, 0.0), 0.02, &config, &mut out);
        assert_eq!(n, 1);
        assert_eq!(out[0].position, Vec3::new(0.0, 1.9, 0.0));
    }

    #[test]
    fn test_multiple_echoes_interpolate() {
        let config = TrailConfig {
            spawn_per_tick: 4,
            ..Default::default()
        };
        let mut out = Vec::new();
        emit_echoes(&parent(), Vec3::new(0.0, 1.0, 0.0), 0.1, &config, &mut out);
        let ys: Vec<f32> = out.iter().map(|p| p.position.y).collect();
        assert_eq!(ys, vec![1.0, 1.25, 1.5, 1.75]);
    }

    #[test]
    fn test_tails_never_echo() {
        let mut tail = parent();
        tail.is_tail = true;
        let mut out = Vec::new();
        let n = emit_echoes(&tail, Vec3::ZERO, 0.1, &TrailConfig::default(), &mut out);
        assert_eq!(n, 0);
        assert!(out.is_empty());
    }

    #[test]
    fn test_zero_dt_emits_nothing() {
        let mut out = Vec::new();
        let n = emit_echoes(&parent(), Vec3::ZERO, 0.0, &TrailConfig::default(), &mut out);
        assert_eq!(n, 0);
    }

    #[test]
    fn test_seed_launch_tail_stacks_below() {
        let config = InitialTailConfig {
            count: 3,
            step: 0.1,
            life: 0.2,
        };
        let mut out = Vec::new();
        seed_launch_tail(&parent(), &config, 0.5, &mut out);
        assert_eq!(out.len(), 3);
        assert!((out[2].position.y - 1.7).abs() < 1e-5);
        assert!(out.iter().all(|p| p.is_tail && p.life == 0.2));
    }
}
