//! Delayed second bursts.
//!
//! Every non-image primary burst schedules a follow-up burst at the same spot
//! a short moment later. Pending bursts wait in a [`DelayedQueue`] and are
//! handed back to the simulation once their timer runs out.
//!
//! # Example
//!
//! ```ignore
//! let mut queue = DelayedQueue::new();
//! queue.push(DelayedExplosion::new(apex, color, ShapeKind::Ring, 0.1, 5.0));
//!
//! queue.tick(0.05); // nothing yet
//! for burst in queue.tick(0.05) {
//!     // fire the second ring
//! }
//! ```

use glam::{Vec3, Vec4};

use crate::particle::ShapeKind;

/// A burst waiting to go off.
#[derive(Clone, Debug, PartialEq)]
pub struct DelayedExplosion {
    pub position: Vec3,
    pub color: Vec4,
    pub shape: ShapeKind,
    /// Seconds left before firing.
    pub timer: f32,
    pub radius: f32,
}

impl DelayedExplosion {
    pub fn new(position: Vec3, color: Vec4, shape: ShapeKind, timer: f32, radius: f32) -> Self {
        Self {
            position,
            color,
            shape,
            timer,
            radius,
        }
    }

    #[inline]
    pub fn is_due(&self) -> bool {
        self.timer <= 0.0
    }
}

/// Pending delayed bursts in scheduling order.
#[derive(Clone, Debug, Default)]
pub struct DelayedQueue {
    pending: Vec<DelayedExplosion>,
}

impl DelayedQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, explosion: DelayedExplosion) {
        self.pending.push(explosion);
    }

    /// Count every timer down by `dt` and remove the ones that ran out.
    ///
    /// Due bursts are returned in the order they were scheduled. Each entry
    /// fires exactly once.
    pub fn tick(&mut self, dt: f32) -> Vec<DelayedExplosion> {
        let mut due = Vec::new();
        let mut i = 0;
        while i < self.pending.len() {
            self.pending[i].timer -= dt;
            if self.pending[i].is_due() {
                due.push(self.pending.remove(i));
            } else {
                i += 1;
            }
        }
        due
    }

    pub fn pending(&self) -> &[DelayedExplosion] {
        &self.pending
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn delayed(timer: f32, shape: ShapeKind) -> DelayedExplosion {
        DelayedExplosion::new(Vec3::new(1.0, 8.0, 0.0), Vec4::ONE, shape, timer, 5.0)
    }

    #[test]
    fn test_fires_once_after_delay() {
        let mut queue = DelayedQueue::new();
        queue.push(delayed(0.1, ShapeKind::Sphere));

        assert!(queue.tick(0.05).is_empty());
        assert_eq!(queue.len(), 1);

        let fired = queue.tick(0.05);
        assert_eq!(fired.len(), 1);
        assert!(queue.is_empty());

        assert!(queue.tick(0.05).is_empty());
    }

    #[test]
    fn test_due_bursts_keep_schedule_order() {
        let mut queue = DelayedQueue::new();
        queue.push(delayed(0.1, ShapeKind::Ring));
        queue.push(delayed(0.5, ShapeKind::Heart));
        queue.push(delayed(0.05, ShapeKind::Spiral));

        let fired: Vec<ShapeKind> = queue.tick(0.2).into_iter().map(|d| d.shape).collect();
        assert_eq!(fired, vec![ShapeKind::Ring, ShapeKind::Spiral]);
        assert_eq!(queue.pending()[0].shape, ShapeKind::Heart);
    }

    #[test]
    fn test_zero_delay_fires_on_next_tick() {
        let mut queue = DelayedQueue::new();
        queue.push(delayed(0.0, ShapeKind::Sphere));
        assert_eq!(queue.tick(0.0).len(), 1);
    }
}
