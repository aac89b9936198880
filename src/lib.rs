//! # Pyro - Firework Particle Engine
//!
//! CPU particle simulation for real-time firework shows: shells rise from the
//! launch pad, burst into parametric shapes at their apex, leave fading
//! trails and fire delayed second bursts.
//!
//! Pyro owns the simulation only. Drawing, lighting and audio stay with the
//! host application, which reads particles back every frame and listens for
//! burst events.
//!
//! ## Quick Start
//!
//! ```ignore
//! use pyro::prelude::*;
//!
//! fn main() -> pyro::Result<()> {
//!     let mut sim = FireworkSystem::new(FireworkConfig::default());
//!     sim.launch(
//!         LaunchParams::new(Vec3::new(2.0, 0.5, -1.0), ShapeKind::Spiral)
//!             .with_color(Vec4::new(0.2, 0.6, 1.0, 1.0)),
//!     )?;
//!
//!     let mut clock = FrameClock::fixed(1.0 / 60.0);
//!     for _ in 0..240 {
//!         sim.update(clock.tick())?;
//!         let verts = sim.vertices();
//!         // upload bytemuck::cast_slice(&verts) to a vertex buffer
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### Lifecycle
//!
//! Every particle is a shell, a burst star or a trail echo, each kept in its
//! own pool. A shell that stops climbing or burns out bursts through the
//! [`Emitter`](emitter::Emitter) matching its [`ShapeKind`]. Moving particles
//! drop stationary echoes behind them. Anything that burns out or falls below
//! the ground plane is culled at the end of the tick.
//!
//! ### Shapes
//!
//! | Shape | Burst |
//! |-------|-------|
//! | `Sphere` | Area-uniform shell of stars |
//! | `Ring` | Horizontal circle |
//! | `MultiLayer` | Three tinted concentric shells |
//! | `Spiral` | Rotating arms |
//! | `Heart` | Parametric heart outline |
//! | `DoubleExplosion` | Sphere whose stars burst again |
//! | `Image` | Silhouette of a decoded picture |
//!
//! ### Color
//!
//! Burst colors follow a fixed curve over the normalized remaining life: a
//! bright flash, a steady hold, then a linear alpha fade over the last 15%.
//! See [`color::shade`].
//!
//! ### Collaborators
//!
//! - Rendering reads [`FireworkSystem::render_list`] or the packed
//!   [`FireworkSystem::vertices`].
//! - Lights and sound implement [`FireworkObserver`].
//! - Images are decoded ahead of time into an [`ImageLibrary`].

pub mod color;
pub mod config;
pub mod emitter;
pub mod error;
pub mod events;
pub mod lifecycle;
pub mod particle;
pub mod pools;
pub mod show;
pub mod simulation;
pub mod spawn;
pub mod sub_emitter;
pub mod textures;
pub mod time;
pub mod trail;

pub use bytemuck;
pub use glam::{Vec2, Vec3, Vec4};

pub use config::FireworkConfig;
pub use error::{FireworkError, Result};
pub use events::{BurstEvent, FireworkObserver, LaunchEvent, SoundCue};
pub use particle::{Particle, ParticleVertex, ShapeKind};
pub use simulation::{FireworkSystem, LaunchParams, TickReport};
pub use textures::{BurstImage, ImageLibrary};

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use pyro::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::{
        BurstConfig, FireworkConfig, ImageBurstConfig, LaunchConfig, ShapeParams, ShowConfig,
        TrailConfig,
    };
    pub use crate::emitter::{Burst, Emitter};
    pub use crate::error::{FireworkError, Result};
    pub use crate::events::{BurstEvent, EventLog, FireworkObserver, LaunchEvent, SoundCue};
    pub use crate::particle::{Particle, ParticleVertex, ShapeKind};
    pub use crate::pools::{ParticlePools, PoolCounts};
    pub use crate::show::AutoShow;
    pub use crate::simulation::{FireworkSystem, LaunchParams, TickReport};
    pub use crate::spawn::SpawnContext;
    pub use crate::textures::{BurstImage, ImageLibrary};
    pub use crate::time::FrameClock;
    pub use crate::{Vec2, Vec3, Vec4};
}
