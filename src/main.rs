//! Headless firework show.
//!
//! ```text
//! pyro [CONFIG.json] [IMAGE...]
//! ```
//!
//! Runs the automatic show for `PYRO_SECONDS` simulated seconds (default 20)
//! at a fixed 60 Hz step and logs population statistics once per second. Set
//! `RUST_LOG=debug` to see every burst.

use std::process::ExitCode;

use pyro::prelude::*;

const STEP: f32 = 1.0 / 60.0;

fn run() -> pyro::Result<()> {
    let mut args = std::env::args().skip(1);

    let config = match args.next() {
        Some(path) => {
            log::info!("Loading config from {}", path);
            FireworkConfig::load(&path)?
        }
        None => FireworkConfig::default(),
    };

    let mut images = ImageLibrary::new();
    for path in args {
        if let Err(err) = images.load(&path) {
            log::warn!("Skipping image: {}", err);
        }
    }

    let seconds: f32 = std::env::var("PYRO_SECONDS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(20.0);

    let events = EventLog::new();
    let mut sim = FireworkSystem::new(config.clone()).with_observer(events.clone());
    let mut show = AutoShow::new(config.show).with_images(images.images().cloned());
    let mut clock = FrameClock::fixed(STEP);

    let mut total = TickReport::default();
    let mut peak = 0;
    let mut next_report = 1.0;

    while clock.elapsed() < seconds {
        let dt = clock.tick();
        show.tick(dt, &mut sim)?;
        total += sim.update(dt)?;
        peak = peak.max(sim.particle_count());

        if clock.elapsed() >= next_report {
            next_report += 1.0;
            let counts = sim.counts();
            log::info!(
                "t={:>5.1}s launchers={} stars={} echoes={} pending={} events={}",
                clock.elapsed(),
                counts.launchers,
                counts.explosions,
                counts.trails,
                sim.pending_secondaries(),
                events.drain().len()
            );
        }
    }

    log::info!(
        "Done: {} shells, {} bursts, {} second bursts, {} rebounds, {} echoes, peak {} particles, {} dropped",
        show.launched(),
        total.bursts,
        total.secondaries,
        total.rebounds,
        total.echoes,
        peak,
        total.dropped
    );
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{}", err);
            ExitCode::FAILURE
        }
    }
}
