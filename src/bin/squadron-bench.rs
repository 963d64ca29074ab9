use clap::Parser;
use itertools::*;
use log::*;
use serde::Serialize;
use squadron::geometry::Location;
use squadron::host::{AgentClass, Team};
use squadron::logging;
use squadron::sim::{GridWorld, Simulation, WorldConfig, WorldEvent};
use squadron::{Role, SwarmConfig};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "squadron-bench")]
#[command(about = "Run a squad scenario on the reference grid world and print a JSON summary")]
struct Opts {
    /// Swarm configuration (JSON). Defaults apply to anything it leaves out.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(short, long, default_value = "300")]
    rounds: u32,

    #[arg(short, long, default_value = "4")]
    coordinators: u32,

    #[arg(long, default_value = "3")]
    towers: u32,

    #[arg(long, default_value = "30")]
    width: i32,

    #[arg(long, default_value = "30")]
    height: i32,

    /// Put a wall between the squad and the towers.
    #[arg(long)]
    wall: bool,

    /// off, error, warn, info, debug or trace.
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

#[derive(Serialize)]
struct Summary {
    rounds: u32,
    leaders: usize,
    followers: usize,
    spawned: usize,
    evolved: usize,
    died: usize,
    towers_captured: usize,
    towers_held: usize,
    towers_total: usize,
    /// Shortest ground path from the first coordinator to the nearest tower.
    optimal_path_length: Option<usize>,
}

fn build_world(opts: &Opts) -> Result<GridWorld, String> {
    if opts.width < 8 || opts.height < 8 {
        return Err(format!("grid {}x{} is too small", opts.width, opts.height));
    }

    let mut world = GridWorld::new(WorldConfig {
        width: opts.width,
        height: opts.height,
        ..WorldConfig::default()
    });

    let middle = opts.height / 2;

    for index in 0..opts.coordinators as i32 {
        let location = Location::new(2 + index % 3, middle - 1 + index / 3);
        world.add_agent_with_energy(Team::Red, AgentClass::Coordinator, location, 60.0);
    }

    let spacing = (opts.height / (opts.towers as i32 + 1)).max(1);
    for index in 0..opts.towers as i32 {
        world.add_agent(Team::Neutral, AgentClass::Tower, Location::new(opts.width - 3, spacing * (index + 1)));
    }

    if opts.wall {
        let x = opts.width / 2;
        world.add_obstacle_rect(Location::new(x, middle - 4), Location::new(x + 1, middle + 4));
    }

    Ok(world)
}

fn summarize(simulation: &Simulation, rounds: u32, optimal_path_length: Option<usize>) -> Summary {
    let world = simulation.world();

    let events = world
        .events()
        .iter()
        .map(|event| match event {
            WorldEvent::Spawned { .. } => "spawned",
            WorldEvent::Evolved { .. } => "evolved",
            WorldEvent::Captured { .. } => "captured",
            WorldEvent::Died { .. } => "died",
        })
        .counts();

    let count = |kind: &str| events.get(kind).copied().unwrap_or(0);

    let towers: Vec<_> = world.bodies().filter(|b| b.class == AgentClass::Tower).collect();

    Summary {
        rounds,
        leaders: simulation.agents().filter(|a| matches!(a.role(), Role::Leader(_))).count(),
        followers: simulation.agents().filter(|a| matches!(a.role(), Role::Follower(_))).count(),
        spawned: count("spawned"),
        evolved: count("evolved"),
        died: count("died"),
        towers_captured: count("captured"),
        towers_held: towers.iter().filter(|b| b.team == Team::Red).count(),
        towers_total: towers.len(),
        optimal_path_length,
    }
}

fn main() -> Result<(), String> {
    let opts = Opts::parse();

    let level: LevelFilter = opts
        .log_level
        .parse()
        .map_err(|_| format!("Unknown log level '{}'", opts.log_level))?;

    logging::setup_logging(level).map_err(|err| format!("Failed to set up logging: {}", err))?;

    let config = match &opts.config {
        Some(path) => SwarmConfig::from_path(path).map_err(|err| format!("Failed to load {}: {}", path.display(), err))?,
        None => SwarmConfig::default(),
    };

    let world = build_world(&opts)?;

    let optimal_path_length = {
        let start = world.bodies().find(|b| b.class == AgentClass::Coordinator).map(|b| b.location);
        let tower = world.bodies().find(|b| b.class == AgentClass::Tower).map(|b| b.location);

        match (start, tower) {
            (Some(start), Some(tower)) => world.path_length(start, tower),
            _ => None,
        }
    };

    let mut simulation = Simulation::new(world, config);

    info!("Running {} rounds with {} coordinators and {} towers", opts.rounds, opts.coordinators, opts.towers);

    simulation.run(opts.rounds);

    let summary = summarize(&simulation, opts.rounds, optimal_path_length);

    let output = serde_json::to_string_pretty(&summary).map_err(|err| format!("Failed to serialize summary: {}", err))?;

    println!("{}", output);

    Ok(())
}
