//! The firework system: launches, per-tick update and the render view.
//!
//! [`FireworkSystem`] owns every pool, the delayed-burst queue and the random
//! source. Callers drive it with a frame delta and read particles back for
//! drawing; nothing here sleeps or measures time.
//!
//! # Tick Order
//!
//! 1. Ascending shells move and leave echoes; shells that stopped climbing or
//!    burned out are removed and burst.
//! 2. Burst stars move and leave echoes; double-explosion stars that burned
//!    out this tick fire their small rebound bursts.
//! 3. The delayed queue counts down and fires due second bursts.
//! 4. Existing echoes shrink and fade, then this tick's echoes are appended.
//! 5. Spent and underground particles are culled.
//!
//! # Example
//!
//! ```ignore
//! let mut sim = FireworkSystem::new(FireworkConfig::default());
//! sim.launch(
//!     LaunchParams::new(Vec3::new(0.0, 0.5, 0.0), ShapeKind::Ring)
//!         .with_color(Vec4::new(1.0, 0.3, 0.2, 1.0))
//!         .with_secondary(Vec4::new(0.9, 0.8, 0.2, 1.0)),
//! )?;
//!
//! loop {
//!     let report = sim.update(1.0 / 60.0)?;
//!     upload(bytemuck::cast_slice(&sim.vertices()));
//! }
//! ```

use std::ops::AddAssign;
use std::sync::Arc;

use glam::{Vec3, Vec4};

use crate::config::FireworkConfig;
use crate::emitter::{self, Burst, Emitter};
use crate::error::{FireworkError, Result};
use crate::events::{BurstEvent, FireworkObserver, LaunchEvent, SoundCue};
use crate::lifecycle::{self, Stepper};
use crate::particle::{Particle, ParticleVertex, ShapeKind};
use crate::pools::{ParticlePools, PoolCounts, PoolKind};
use crate::spawn::SpawnContext;
use crate::sub_emitter::{DelayedExplosion, DelayedQueue};
use crate::textures::BurstImage;
use crate::trail;

/// What to launch.
///
/// Defaults: 1.5 s requested life, white, no accent, configured launcher size.
#[derive(Debug, Clone)]
pub struct LaunchParams {
    pub position: Vec3,
    pub shape: ShapeKind,
    /// Requested life; the shell's real life is jittered down from this.
    pub life: f32,
    pub color: Vec4,
    /// Accent for the delayed second burst. `None` keeps the shell single-color.
    pub secondary: Option<Vec4>,
    pub size: Option<f32>,
    pub image: Option<Arc<BurstImage>>,
}

impl LaunchParams {
    pub fn new(position: Vec3, shape: ShapeKind) -> Self {
        Self {
            position,
            shape,
            life: 1.5,
            color: Vec4::ONE,
            secondary: None,
            size: None,
            image: None,
        }
    }

    pub fn with_life(mut self, life: f32) -> Self {
        self.life = life;
        self
    }

    pub fn with_color(mut self, color: Vec4) -> Self {
        self.color = color;
        self
    }

    pub fn with_secondary(mut self, color: Vec4) -> Self {
        self.secondary = Some(color);
        self
    }

    pub fn with_size(mut self, size: f32) -> Self {
        self.size = Some(size);
        self
    }

    /// Attach the decoded image an image shell will burst into.
    pub fn with_image(mut self, image: Arc<BurstImage>) -> Self {
        self.image = Some(image);
        self
    }
}

/// Counters for one `update` call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Shells converted into bursts.
    pub exploded: usize,
    /// Primary bursts generated.
    pub bursts: usize,
    /// Delayed second bursts fired.
    pub secondaries: usize,
    /// Double-explosion rebound bursts fired.
    pub rebounds: usize,
    /// Trail echoes admitted.
    pub echoes: usize,
    /// Particles removed by culling.
    pub culled: usize,
    /// Spawns rejected by the particle cap.
    pub dropped: u64,
}

impl AddAssign for TickReport {
    fn add_assign(&mut self, rhs: Self) {
        self.exploded += rhs.exploded;
        self.bursts += rhs.bursts;
        self.secondaries += rhs.secondaries;
        self.rebounds += rhs.rebounds;
        self.echoes += rhs.echoes;
        self.culled += rhs.culled;
        self.dropped += rhs.dropped;
    }
}

/// The simulation state.
pub struct FireworkSystem {
    config: FireworkConfig,
    rng: SpawnContext,
    pools: ParticlePools,
    delayed: DelayedQueue,
    observer: Option<Box<dyn FireworkObserver>>,
}

impl FireworkSystem {
    pub fn new(config: FireworkConfig) -> Self {
        let pools = ParticlePools::new(config.max_particles);
        Self {
            config,
            rng: SpawnContext::new(),
            pools,
            delayed: DelayedQueue::new(),
            observer: None,
        }
    }

    /// Replace the random source, e.g. with [`SpawnContext::seeded`] for
    /// reproducible runs.
    pub fn with_rng(mut self, rng: SpawnContext) -> Self {
        self.rng = rng;
        self
    }

    pub fn with_observer<O: FireworkObserver + 'static>(mut self, observer: O) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    pub fn set_observer(&mut self, observer: Option<Box<dyn FireworkObserver>>) {
        self.observer = observer;
    }

    pub fn config(&self) -> &FireworkConfig {
        &self.config
    }

    /// Mutable access to the live configuration. Changes apply from the next tick.
    pub fn config_mut(&mut self) -> &mut FireworkConfig {
        &mut self.config
    }

    pub fn pools(&self) -> &ParticlePools {
        &self.pools
    }

    pub fn counts(&self) -> PoolCounts {
        self.pools.counts()
    }

    pub fn particle_count(&self) -> usize {
        self.pools.total()
    }

    pub fn pending_secondaries(&self) -> usize {
        self.delayed.len()
    }

    /// Drop every particle and pending second burst.
    pub fn clear(&mut self) {
        self.pools.clear();
        self.delayed.clear();
    }

    // =========================================================================
    // LAUNCHING
    // =========================================================================

    /// Launch one ascending shell.
    ///
    /// The shell rises at the configured launch speed with its requested life
    /// jittered down, so shells burst at varying heights. A launch at exactly
    /// the default pad is scattered across the launch field.
    pub fn launch(&mut self, params: LaunchParams) -> Result<()> {
        if !params.position.is_finite() {
            return Err(FireworkError::InvalidArgument(format!(
                "launch position must be finite, got {}",
                params.position
            )));
        }
        if !params.life.is_finite() || params.life < 0.0 {
            return Err(FireworkError::InvalidArgument(format!(
                "launch life must be >= 0, got {}",
                params.life
            )));
        }

        let launch = &self.config.launch;
        let mut position = params.position;
        if launch.scatter_default_pad && position == launch.default_pad {
            position.x = self
                .rng
                .random_range(-launch.scatter_half_x, launch.scatter_half_x);
            position.z = self
                .rng
                .random_range(-launch.scatter_half_z, launch.scatter_half_z);
        }

        let life =
            params.life * (launch.life_jitter_min + launch.life_jitter_span * self.rng.random());
        let size = params.size.unwrap_or(launch.launcher_size) * launch.size_scale;

        let mut shell = Particle::new(
            position,
            Vec3::new(0.0, launch.speed, 0.0),
            params.color,
            life,
            size,
            params.shape,
        );
        // Image shells launch unlit
        if params.shape != ShapeKind::Image {
            shell.color = (params.color.truncate() * launch.glow).extend(params.color.w);
        }
        shell.secondary_color = params.secondary;
        shell.image = params.image;

        let mut tail = Vec::new();
        trail::seed_launch_tail(
            &shell,
            &self.config.initial_tail,
            self.config.trail.alpha,
            &mut tail,
        );

        if self.pools.admit(PoolKind::Launchers, vec![shell]) == 0 {
            return Ok(());
        }
        self.pools.admit(PoolKind::Trails, tail);

        log::debug!("Launched {:?} shell at {}", params.shape, position);
        if let Some(observer) = self.observer.as_mut() {
            observer.notify_launch(LaunchEvent {
                position,
                shape: params.shape,
                cue: SoundCue::Rise,
            });
        }
        Ok(())
    }

    /// Launch by raw shape tag, as sent by input bindings.
    ///
    /// Unknown tags fail with [`FireworkError::InvalidShape`].
    pub fn launch_indexed(&mut self, shape_index: u32, mut params: LaunchParams) -> Result<()> {
        params.shape = ShapeKind::try_from(shape_index)?;
        self.launch(params)
    }

    // =========================================================================
    // BURSTS
    // =========================================================================

    /// Burst `source` at its position.
    ///
    /// A primary burst uses the primary count and radius, requests a flash
    /// light and, for eligible shapes, schedules a delayed second burst in the
    /// shell's accent color. A secondary burst uses the secondary count and
    /// radius and schedules nothing. Returns the number of stars admitted.
    pub fn create_explosion(&mut self, source: &Particle, is_secondary: bool) -> Result<usize> {
        let emitter = Emitter::from_shape(source.shape, source.image.as_ref())?;

        let burst_config = &self.config.burst;
        let burst = if is_secondary {
            Burst::new(
                source.position,
                source.initial_color,
                burst_config.secondary_count,
                burst_config.secondary_radius,
            )
        } else {
            Burst::new(
                source.position,
                source.initial_color,
                burst_config.primary_count,
                burst_config.primary_radius,
            )
        };

        if !is_secondary {
            if burst_config.schedules_secondary(source.shape) {
                self.delayed.push(DelayedExplosion::new(
                    source.position,
                    source.burst_accent(),
                    source.shape,
                    burst_config.secondary_delay,
                    burst_config.secondary_radius,
                ));
            }

            if let Some(observer) = self.observer.as_mut() {
                observer.notify_burst(BurstEvent {
                    position: source.position,
                    color: source.initial_color.truncate(),
                    intensity: self.config.light.intensity,
                    duration: self.config.light.duration,
                    shape: source.shape,
                    cue: SoundCue::Explosion,
                });
            }
        }

        Ok(self.emit_burst(&emitter, &burst, is_secondary))
    }

    /// Primary burst for a shell leaving the launcher pool, degrading image
    /// failures to the configured fallback shape.
    fn explode_shell(&mut self, shell: Particle) -> usize {
        let fallback = self.config.image_fallback;
        match self.create_explosion(&shell, false) {
            Ok(n) => n,
            Err(err) => match fallback {
                Some(fallback) if fallback != ShapeKind::Image => {
                    log::warn!("{}, bursting as {:?} instead", err, fallback);
                    let mut substitute = shell;
                    substitute.shape = fallback;
                    substitute.image = None;
                    self.create_explosion(&substitute, false).unwrap_or(0)
                }
                _ => {
                    log::warn!("{}, burst dropped", err);
                    0
                }
            },
        }
    }

    fn fire_delayed(&mut self, delayed: &DelayedExplosion) -> usize {
        let emitter = match Emitter::from_shape(delayed.shape, None) {
            Ok(emitter) => emitter,
            Err(err) => {
                log::warn!("Skipping delayed {:?} burst: {}", delayed.shape, err);
                return 0;
            }
        };
        let burst = Burst::new(
            delayed.position,
            delayed.color,
            self.config.burst.secondary_count,
            delayed.radius,
        );
        self.emit_burst(&emitter, &burst, true)
    }

    fn emit_burst(&mut self, emitter: &Emitter, burst: &Burst, is_secondary: bool) -> usize {
        let mut stars = Vec::new();
        emitter.emit(&mut self.rng, &self.config, burst, &mut stars);
        if is_secondary {
            for star in &mut stars {
                star.can_explode_again = false;
            }
        }
        let admitted = self.pools.admit(PoolKind::Explosions, stars);
        log::debug!(
            "{:?} {} burst at {}: {} stars",
            emitter.shape(),
            if is_secondary { "secondary" } else { "primary" },
            burst.center,
            admitted
        );
        admitted
    }

    // =========================================================================
    // UPDATE
    // =========================================================================

    /// Advance the simulation by `dt` seconds of wall time.
    ///
    /// `dt` is scaled by the configured time scale. Negative or non-finite
    /// deltas, or a negative or non-finite time scale, are rejected; a zero delta moves nothing and spawns no echoes.
    pub fn update(&mut self, dt: f32) -> Result<TickReport> {
        if !dt.is_finite() || dt < 0.0 {
            return Err(FireworkError::InvalidDelta(dt));
        }
        let time_scale = self.config.time_scale;
        if !time_scale.is_finite() || time_scale < 0.0 {
            return Err(FireworkError::InvalidArgument(format!(
                "time_scale must be >= 0, got {}",
                time_scale
            )));
        }
        self.pools.set_max_particles(self.config.max_particles);
        let dropped_before = self.pools.dropped();

        let dt = dt * time_scale;
        let stepper = Stepper::new(&self.config, dt);
        let mut report = TickReport::default();
        let mut echoes = Vec::new();

        // Ascending shells
        for shell in &mut self.pools.launchers {
            if let Some(previous) = stepper.advance(shell) {
                trail::emit_echoes(shell, previous, dt, &self.config.trail, &mut echoes);
            }
        }
        let (peaked, climbing): (Vec<Particle>, Vec<Particle>) =
            std::mem::take(&mut self.pools.launchers)
                .into_iter()
                .partition(lifecycle::has_peaked);
        self.pools.launchers = climbing;

        for shell in peaked {
            report.exploded += 1;
            if self.explode_shell(shell) > 0 {
                report.bursts += 1;
            }
        }

        // Burst stars
        let mut rebounds = Vec::new();
        for star in &mut self.pools.explosions {
            let was_alive = star.is_alive();
            if let Some(previous) = stepper.advance(star) {
                trail::emit_echoes(star, previous, dt, &self.config.trail, &mut echoes);
            }
            if lifecycle::triggers_rebound(star, was_alive) {
                star.can_explode_again = false;
                rebounds.push((star.position, star.initial_color));
            }
        }
        for (center, color) in rebounds {
            let burst = Burst::new(
                center,
                color,
                self.config.double_explosion.child_count,
                self.config.double_explosion.child_radius,
            );
            let mut children = Vec::new();
            emitter::sphere(
                &mut self.rng,
                &self.config.shapes.sphere,
                &burst,
                self.config.launch.child_size,
                &mut children,
            );
            self.pools.admit(PoolKind::Explosions, children);
            report.rebounds += 1;
        }

        // Delayed second bursts
        for delayed in self.delayed.tick(dt) {
            self.fire_delayed(&delayed);
            report.secondaries += 1;
        }

        // Echoes
        for echo in &mut self.pools.trails {
            stepper.advance_tail(echo);
        }
        report.echoes = self.pools.admit(PoolKind::Trails, echoes);

        report.culled = self.pools.cull();
        report.dropped = self.pools.dropped() - dropped_before;
        Ok(report)
    }

    // =========================================================================
    // RENDER VIEW
    // =========================================================================

    /// Owned copy of every live particle in draw order.
    pub fn snapshot(&self) -> Vec<Particle> {
        self.pools.iter().cloned().collect()
    }

    /// Borrowed view of every live particle in draw order.
    pub fn render_list(&self) -> Vec<&Particle> {
        self.pools.render_list()
    }

    /// Live particles packed for GPU upload, in draw order.
    pub fn vertices(&self) -> Vec<ParticleVertex> {
        self.pools.vertices()
    }
}

impl Default for FireworkSystem {
    fn default() -> Self {
        Self::new(FireworkConfig::default())
    }
}

impl std::fmt::Debug for FireworkSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FireworkSystem")
            .field("counts", &self.pools.counts())
            .field("pending_secondaries", &self.delayed.len())
            .field("has_observer", &self.observer.is_some())
            .finish()
    }
}
