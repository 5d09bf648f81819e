//! Frostbite headless runner
//!
//! Loads a level, walks the player along the configured route and drives
//! the level session over two clocks: a fixed clock for temperature and
//! movement, and a frame clock for perception and the respawn sequence.
//! Prints a JSON summary of the run on stdout when done.
//!
//! Run with: cargo run --bin frost-sim [level.toml]

mod route;
mod summary;

use frost_core::ScreenOverlay;
use frost_gamestate::{FadeOverlay, LevelConfig, LevelSession};
use route::RouteDriver;
use std::cell::RefCell;
use std::rc::Rc;
use summary::RunSummary;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match std::env::args().nth(1) {
        Some(path) => match LevelConfig::load_from_file(&path) {
            Ok(mut config) => {
                config.apply_overrides(|key| std::env::var(key).ok());
                config
            }
            Err(e) => {
                log::error!("Cannot load level {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => LevelConfig::load(),
    };
    config.print_summary();

    match run(config) {
        Ok(summary) => match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{}", json),
            Err(e) => log::error!("Failed to encode run summary: {}", e),
        },
        Err(e) => {
            log::error!("Level failed to start: {}", e);
            std::process::exit(1);
        }
    }
}

/// Run a level for its configured duration
fn run(config: LevelConfig) -> frost_gamestate::Result<RunSummary> {
    let sim = config.simulation.clone();
    let fixed_dt = sim.fixed_dt();
    let frame_dt = sim.frame_dt();

    let overlay = Rc::new(RefCell::new(FadeOverlay::new()));
    let mut session = LevelSession::new(config)?.with_overlay(Box::new(overlay.clone()));
    let mut driver = RouteDriver::new(sim.route.clone(), sim.walk_speed, sim.run_speed);

    let mut respawns_seen = 0;
    let mut accumulator = 0.0f32;
    let mut elapsed = 0.0f32;
    let mut fixed_ticks = 0u64;
    let mut frames = 0u64;

    log::info!(
        "Simulating {:.1}s at {} ticks/s, {} frames/s",
        sim.duration,
        sim.fixed_rate,
        sim.frame_rate
    );

    while elapsed < sim.duration {
        accumulator += frame_dt;
        while accumulator >= fixed_dt {
            accumulator -= fixed_dt;

            let position = session.player().borrow().position();
            let input = driver.step(position, fixed_dt);
            session.drive_player(input.displacement, Some(input.movement), input.cooling, fixed_dt);
            session.fixed_update(fixed_dt);
            fixed_ticks += 1;
        }

        session.frame_update(frame_dt);
        frames += 1;
        elapsed += frame_dt;

        let completed = session.respawn().completed();
        if completed != respawns_seen {
            respawns_seen = completed;
            driver.restart();
            log::info!("Route restarted after respawn {}", completed);
        }

        if frames % (sim.frame_rate.max(1.0) as u64) == 0 {
            let player = session.player().borrow();
            log::debug!(
                "t={:.1}s temp={:.2} seen_by={} fade={:.2}",
                elapsed,
                player.temperature(),
                player.visibility().count(),
                overlay.borrow().opacity()
            );
        }
    }

    let final_temperature = session.player().borrow().temperature();
    let summary = RunSummary {
        level: session.config().name.clone(),
        simulated_seconds: session.time(),
        fixed_ticks,
        frames,
        respawns: 0,
        resets: 0,
        threat_deaths: 0,
        contacts: 0,
        rejected_player_ticks: 0,
        final_temperature,
        route_finished: driver.is_finished(),
    };
    Ok(summary.with_stats(session.unload()))
}
