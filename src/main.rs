//! Beltworks headless demo entry point.
//!
//! A tile-based conveyor transport simulation using:
//! - **bevy_ecs** for entity-component-system architecture
//! - **glam** for 2D vector math
//! - data-driven animation graphs resolved through a condition registry
//!
//! This executable builds a small belt layout with a corner, spawns items,
//! and runs the fixed-interval simulation for a number of ticks, logging
//! item state after each tick. A renderer would sit on top of the same world
//! and read the Sprite components; none is included here.
//!
//! # Running
//!
//! ```sh
//! RUST_LOG=debug cargo run -- --ticks 40
//! ```

use bevy_ecs::prelude::*;
use clap::Parser;
use std::path::PathBuf;

use beltworks::components::conveyor::{ConveyorItem, Lane};
use beltworks::game;
use beltworks::resources::gridindex::GridIndex;
use beltworks::resources::simconfig::SimConfig;
use beltworks::resources::worldtime::SimulationClock;

/// Beltworks conveyor simulation
#[derive(Parser)]
#[command(version, about = "Headless conveyor-belt transport simulation demo")]
struct Cli {
    /// Number of simulation ticks to run.
    #[arg(long, default_value_t = 40)]
    ticks: u64,

    /// Path to the INI configuration file.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Chance per tick of spawning an extra item on the first belt.
    #[arg(long, default_value_t = 0.0)]
    spawn_chance: f32,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = match cli.config {
        Some(path) => SimConfig::with_path(path),
        None => SimConfig::new(),
    };
    config.load_from_file().ok(); // ignore errors, use defaults
    let tick_interval = config.tick_interval;

    let mut world = World::new();
    game::init_world(&mut world, config);
    game::setup_demo(&mut world);

    let mut schedule = game::build_simulation_schedule();
    let first_belt = {
        let grid = world.resource::<GridIndex>();
        grid.get(glam::IVec2::new(0, 2))
    };

    while world.resource::<SimulationClock>().tick_count < cli.ticks {
        game::advance_simulation(&mut world, &mut schedule, tick_interval);

        if cli.spawn_chance > 0.0
            && fastrand::f32() < cli.spawn_chance
            && let Some(belt) = first_belt
        {
            game::spawn_conveyor_item(&mut world, belt, Lane::Left);
        }

        let tick = world.resource::<SimulationClock>().tick_count;
        let mut query = world.query::<(Entity, &ConveyorItem)>();
        for (entity, item) in query.iter(&world) {
            log::info!(
                "tick {tick}: item {entity:?} on belt {:?} lane {:?} progress {:.2}",
                item.conveyor,
                item.lane,
                item.progress
            );
        }
    }
}
