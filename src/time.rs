//! Frame clock feeding `FireworkSystem::update`.
//!
//! The engine never measures time itself. A [`FrameClock`] turns wall time
//! (or a fixed step, for headless runs and tests) into the per-frame delta the
//! simulation consumes. Slow motion is the simulation's `time_scale`, not the
//! clock's; the clock only reports how much real time passed.
//!
//! # Example
//!
//! ```ignore
//! let mut clock = FrameClock::new();
//!
//! loop {
//!     let dt = clock.tick();
//!     sim.update(dt)?;
//!     if clock.frame() % 60 == 0 {
//!         log::info!("{:.1} fps", clock.fps());
//!     }
//! }
//! ```

use std::time::{Duration, Instant};

/// Longest delta handed out by default; longer stalls are clamped so a hitch
/// does not teleport every shell past its apex.
pub const DEFAULT_MAX_DELTA: f32 = 0.1;

/// How the clock advances.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClockMode {
    /// Deltas measured from `Instant::now()`.
    RealTime,
    /// Every tick advances by the same step, regardless of wall time.
    Fixed(f32),
}

/// Frame timing for the render loop.
#[derive(Debug)]
pub struct FrameClock {
    mode: ClockMode,
    last_frame: Instant,
    elapsed: f64,
    delta: f32,
    max_delta: f32,
    frame_count: u64,
    paused: bool,
    fps: f32,
    fps_frames: u64,
    fps_window: f32,
}

impl FrameClock {
    /// Wall-clock timing starting now.
    pub fn new() -> Self {
        Self::with_mode(ClockMode::RealTime)
    }

    /// Fixed-step timing: every tick advances exactly `step` seconds.
    pub fn fixed(step: f32) -> Self {
        Self::with_mode(ClockMode::Fixed(step.max(0.0)))
    }

    pub fn with_mode(mode: ClockMode) -> Self {
        Self {
            mode,
            last_frame: Instant::now(),
            elapsed: 0.0,
            delta: 0.0,
            max_delta: DEFAULT_MAX_DELTA,
            frame_count: 0,
            paused: false,
            fps: 0.0,
            fps_frames: 0,
            fps_window: 0.0,
        }
    }

    /// Set the clamp applied to real-time deltas.
    pub fn with_max_delta(mut self, max_delta: f32) -> Self {
        self.max_delta = max_delta.max(0.0);
        self
    }

    /// Advance one frame and return the delta to simulate.
    ///
    /// Paused clocks return 0 and do not count frames.
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let measured = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;

        if self.paused {
            self.delta = 0.0;
            return 0.0;
        }

        self.delta = match self.mode {
            ClockMode::RealTime => measured.min(self.max_delta),
            ClockMode::Fixed(step) => step,
        };
        self.elapsed += self.delta as f64;
        self.frame_count += 1;

        self.fps_frames += 1;
        self.fps_window += self.delta;
        if self.fps_window >= 0.5 {
            self.fps = self.fps_frames as f32 / self.fps_window;
            self.fps_frames = 0;
            self.fps_window = 0.0;
        }

        self.delta
    }

    /// Simulated seconds since start, excluding paused time.
    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed as f32
    }

    #[inline]
    pub fn delta(&self) -> f32 {
        self.delta
    }

    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    /// Frames per simulated second, refreshed every half second.
    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }

    #[inline]
    pub fn mode(&self) -> ClockMode {
        self.mode
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            self.last_frame = Instant::now();
        }
    }

    pub fn toggle_pause(&mut self) {
        if self.paused {
            self.resume();
        } else {
            self.pause();
        }
    }

    /// Restart from zero, keeping the mode and clamp.
    pub fn reset(&mut self) {
        *self = Self::with_mode(self.mode).with_max_delta(self.max_delta);
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_fixed_step_ignores_wall_time() {
        let mut clock = FrameClock::fixed(1.0 / 60.0);
        thread::sleep(Duration::from_millis(20));
        let dt = clock.tick();

        assert!((dt - 1.0 / 60.0).abs() < 1e-7);
        assert_eq!(clock.frame(), 1);
    }

    #[test]
    fn test_real_time_is_clamped() {
        let mut clock = FrameClock::new().with_max_delta(0.005);
        thread::sleep(Duration::from_millis(20));
        let dt = clock.tick();

        assert!(dt > 0.0);
        assert!(dt <= 0.005);
    }

    #[test]
    fn test_pause_freezes_elapsed() {
        let mut clock = FrameClock::fixed(0.1);
        clock.tick();
        clock.pause();

        assert_eq!(clock.tick(), 0.0);
        assert!((clock.elapsed() - 0.1).abs() < 1e-6);
        assert_eq!(clock.frame(), 1);

        clock.toggle_pause();
        clock.tick();
        assert!((clock.elapsed() - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_fps_from_fixed_steps() {
        let mut clock = FrameClock::fixed(0.01);
        for _ in 0..60 {
            clock.tick();
        }
        assert!((clock.fps() - 100.0).abs() < 1.0);
    }

    #[test]
    fn test_reset_keeps_mode() {
        let mut clock = FrameClock::fixed(0.02);
        clock.tick();
        clock.reset();
        assert_eq!(clock.frame(), 0);
        assert_eq!(clock.mode(), ClockMode::Fixed(0.02));
    }
}
