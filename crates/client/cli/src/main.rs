//! Headless match runner.
//!
//! Loads a mission from the content directory and plays it with a scripted
//! player for a fixed number of ticks, logging every turn.
mod config;
mod report;

use anyhow::Result;
use tactics_content::ContentFactory;
use tactics_core::Role;
use tactics_runtime::{ChaseProvider, Runtime, WaitProvider};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use config::{CliConfig, PlayerKind};

fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    setup_logging();

    let config = CliConfig::from_env();
    tracing::info!(?config, "starting");

    let factory = ContentFactory::new(&config.data_dir);
    let engine = factory.load_config()?;
    let mission = factory.load_mission(&config.mission, &engine)?;

    let mut builder = Runtime::builder().engine_config(engine).mission(mission);
    if let Some(seed) = config.seed {
        builder = builder.seed(seed);
    }
    builder = match config.player {
        PlayerKind::Chase => builder.player_provider(ChaseProvider),
        PlayerKind::Wait => builder.player_provider(WaitProvider),
    };
    let mut runtime = builder.build()?;

    let dt = config.tick_seconds();
    for _ in 0..config.max_ticks {
        runtime.tick(dt)?;
        for event in runtime.drain_events() {
            report::log_event(runtime.machine(), &event);
        }
    }

    let machine = runtime.machine();
    for role in [Role::Player, Role::Enemy] {
        if let Some(actor) = machine.actor(role) {
            let cell = machine.actor_cell(role).ok().map(|cell| machine.grid().coord_of(cell));
            tracing::info!(%role, name = %actor.name, at = ?cell, facing = %actor.facing, "final position");
        }
    }
    tracing::info!(
        mission = runtime.mission_name(),
        turns = runtime.turn_number(),
        ticks = runtime.ticks(),
        "match finished"
    );
    Ok(())
}

/// Logs to stderr, filtered by `RUST_LOG` with `info` as the floor.
fn setup_logging() {
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::INFO.into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
