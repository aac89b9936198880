//! Outgoing notifications for lighting and audio.
//!
//! The engine does not own lights or a mixer. It reports launches and
//! primary bursts through a [`FireworkObserver`] installed on the system;
//! every call is fire-and-forget.
//!
//! # Example
//!
//! ```ignore
//! struct Flashes(Vec<Vec3>);
//!
//! impl FireworkObserver for Flashes {
//!     fn notify_burst(&mut self, event: BurstEvent) {
//!         self.0.push(event.position);
//!     }
//! }
//!
//! let sim = FireworkSystem::new(config).with_observer(Flashes(Vec::new()));
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec3;

use crate::particle::ShapeKind;

/// Sound the audio collaborator should play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCue {
    /// A shell leaving the pad.
    Rise,
    /// A primary burst.
    Explosion,
}

/// A shell was launched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaunchEvent {
    pub position: Vec3,
    pub shape: ShapeKind,
    pub cue: SoundCue,
}

/// A primary burst went off; request a transient point light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BurstEvent {
    pub position: Vec3,
    /// Light color (RGB of the shell's base color).
    pub color: Vec3,
    pub intensity: f32,
    /// Suggested light lifetime in seconds.
    pub duration: f32,
    pub shape: ShapeKind,
    pub cue: SoundCue,
}

/// Receiver for engine notifications.
pub trait FireworkObserver {
    fn notify_burst(&mut self, event: BurstEvent);

    fn notify_launch(&mut self, _event: LaunchEvent) {}
}

impl<F: FnMut(BurstEvent)> FireworkObserver for F {
    fn notify_burst(&mut self, event: BurstEvent) {
        self(event)
    }
}

/// Either kind of notification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FireworkEvent {
    Launch(LaunchEvent),
    Burst(BurstEvent),
}

/// Observer that records every notification.
///
/// Clones share the same log, so keep one handle and install the other.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Rc<RefCell<Vec<FireworkEvent>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<FireworkEvent> {
        self.events.borrow().clone()
    }

    pub fn bursts(&self) -> Vec<BurstEvent> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                FireworkEvent::Burst(b) => Some(*b),
                FireworkEvent::Launch(_) => None,
            })
            .collect()
    }

    pub fn launches(&self) -> Vec<LaunchEvent> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                FireworkEvent::Launch(l) => Some(*l),
                FireworkEvent::Burst(_) => None,
            })
            .collect()
    }

    /// Take every recorded event, leaving the log empty.
    pub fn drain(&self) -> Vec<FireworkEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }
}

impl FireworkObserver for EventLog {
    fn notify_burst(&mut self, event: BurstEvent) {
        self.events.borrow_mut().push(FireworkEvent::Burst(event));
    }

    fn notify_launch(&mut self, event: LaunchEvent) {
        self.events.borrow_mut().push(FireworkEvent::Launch(event));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn burst() -> BurstEvent {
        BurstEvent {
            position: Vec3::new(0.0, 9.0, 0.0),
            color: Vec3::X,
            intensity: 25.0,
            duration: 0.1,
            shape: ShapeKind::Ring,
            cue: SoundCue::Explosion,
        }
    }

    #[test]
    fn test_event_log_shares_between_clones() {
        let log = EventLog::new();
        let mut installed = log.clone();

        installed.notify_launch(LaunchEvent {
            position: Vec3::ZERO,
            shape: ShapeKind::Ring,
            cue: SoundCue::Rise,
        });
        installed.notify_burst(burst());

        assert_eq!(log.launches().len(), 1);
        assert_eq!(log.bursts(), vec![burst()]);
        assert_eq!(log.drain().len(), 2);
        assert!(log.events().is_empty());
    }

    #[test]
    fn test_closure_observer() {
        let mut seen = 0;
        {
            let mut observer = |_: BurstEvent| seen += 1;
            observer.notify_burst(burst());
            observer.notify_launch(LaunchEvent {
                position: Vec3::ZERO,
                shape: ShapeKind::Sphere,
                cue: SoundCue::Rise,
            });
            observer.notify_burst(burst());
        }
        assert_eq!(seen, 2);
    }
}
