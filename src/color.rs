//! Color and alpha shaping.
//!
//! Burst colors follow a flash → hold → fade silhouette instead of a
//! continuous decay: full opacity for most of a particle's life, then a
//! linear fade over the final stretch.
//!
//! ```text
//! alpha
//!  1.0 |■■■■■■■■■■■■■■■■■■■■■\
//!      |                      \
//!  0.0 +-----------------------\---> life ratio (1 → 0)
//!      1.0  0.95          0.15  0
//! ```

use glam::{Vec3, Vec4};

use crate::spawn::SpawnContext;

/// Life ratio above which a particle is in its initial flash.
pub const FLASH_THRESHOLD: f32 = 0.95;

/// Default life ratio below which particles fade out.
pub const DEFAULT_FADE_THRESHOLD: f32 = 0.15;

/// Phase of the color curve a particle is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorPhase {
    Flash,
    Hold,
    Fade,
}

/// Which segment of the curve `ratio` falls into.
pub fn phase(ratio: f32, fade_threshold: f32) -> ColorPhase {
    if ratio > FLASH_THRESHOLD {
        ColorPhase::Flash
    } else if ratio > fade_threshold {
        ColorPhase::Hold
    } else {
        ColorPhase::Fade
    }
}

/// Displayed color for a particle with `life` seconds left out of `max_life`.
///
/// RGB is always the initial RGB. Alpha is the initial alpha during the
/// flash and hold phases and ramps linearly to zero once the life ratio drops
/// to `fade_threshold`. A non-positive `max_life` counts as expired.
pub fn shade(initial: Vec4, life: f32, max_life: f32, fade_threshold: f32) -> Vec4 {
    if max_life <= 0.0 {
        return initial.truncate().extend(0.0);
    }
    let ratio = (life / max_life).clamp(0.0, 1.0);

    let curve = match phase(ratio, fade_threshold) {
        ColorPhase::Flash | ColorPhase::Hold => 1.0,
        ColorPhase::Fade if fade_threshold > 0.0 => ratio / fade_threshold,
        ColorPhase::Fade => 0.0,
    };

    initial.truncate().extend(initial.w * curve)
}

/// Convert HSV to RGB.
///
/// * `h` - 0.0 to 1.0 (wraps: red → yellow → green → cyan → blue → magenta → red)
/// * `s` - 0.0 (gray) to 1.0 (vivid)
/// * `v` - 0.0 (black) to 1.0 (bright)
pub fn hsv_to_rgb(h: f32, s: f32, v: f32) -> Vec3 {
    let h = h.rem_euclid(1.0);
    let c = v * s;
    let x = c * (1.0 - ((h * 6.0) % 2.0 - 1.0).abs());
    let m = v - c;

    let (r, g, b) = match (h * 6.0) as u32 % 6 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    Vec3::new(r + m, g + m, b + m)
}

/// Random primary color with a related accent for dual-color shells.
///
/// The primary is a random hue and saturation with value in `[0.5, 1.0]` so
/// it never reads as dark. The accent shifts hue by up to ±0.2 and nudges
/// saturation and value by up to ±0.15.
pub fn random_color_pair(ctx: &mut SpawnContext) -> (Vec4, Vec4) {
    let hue = ctx.random();
    let saturation = ctx.random();
    let value = 0.5 + ctx.random() * 0.5;
    let primary = hsv_to_rgb(hue, saturation, value).extend(1.0);

    let hue2 = (hue + ctx.random_range(-0.2, 0.2) + 1.0).rem_euclid(1.0);
    let saturation2 = (saturation + ctx.random_range(-0.15, 0.15)).clamp(0.0, 1.0);
    let value2 = (value + ctx.random_range(-0.15, 0.15)).clamp(0.0, 1.0);
    let secondary = hsv_to_rgb(hue2, saturation2, value2).extend(1.0);

    (primary, secondary)
}
