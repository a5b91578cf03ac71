mod config;
mod observer;
mod strategy;

use anyhow::{Context, Result};
use clap::Parser;
use config::{RunConfig, Settings, StrategyKind, SEED_ENV};
use finder_core::render::{explored_view_to_strings, room_to_strings};
use finder_core::{
    BacktrackerGenerator, Finder, FinderId, Point, Room, RoomSpec, Simulation, SimulationResult,
};
use observer::{MoveCounts, MoveStats};
use serde::Serialize;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use strategy::Strategy;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "finder-cli")]
#[command(
    about = "Runs finders through a generated maze until one reaches the finish",
    long_about = None
)]
struct Args {
    /// Maze width in cells
    #[arg(long)]
    width: Option<usize>,

    /// Maze height in cells
    #[arg(long)]
    height: Option<usize>,

    /// Number of finders
    #[arg(short, long)]
    finders: Option<u32>,

    /// Seed string for the maze, spawns and strategy (defaults to MAZE_SEED)
    #[arg(short, long)]
    seed: Option<String>,

    /// Tick budget
    #[arg(long)]
    max_ticks: Option<usize>,

    #[arg(long, requires = "finish_y")]
    finish_x: Option<i32>,

    #[arg(long, requires = "finish_x")]
    finish_y: Option<i32>,

    #[arg(long, value_enum)]
    strategy: Option<StrategyKind>,

    /// JSON file with defaults for any of the options above
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output JSON path ("-" for stdout)
    #[arg(short, long, default_value = "-")]
    output: String,

    /// Print the final maze and every finder's exploration grid to stderr
    #[arg(long)]
    render: bool,

    /// Verbose output level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn overrides(&self) -> Settings {
        Settings {
            width: self.width,
            height: self.height,
            finders: self.finders,
            seed: self.seed.clone(),
            max_ticks: self.max_ticks,
            finish_x: self.finish_x,
            finish_y: self.finish_y,
            strategy: self.strategy,
        }
    }
}

#[derive(Debug, Serialize)]
struct FinderReport {
    id: FinderId,
    spawn: Point,
    position: Point,
    explored_cells: usize,
    moves: MoveCounts,
}

#[derive(Debug, Serialize)]
struct Report {
    config: RunConfig,
    finish: Point,
    #[serde(flatten)]
    result: SimulationResult,
    finders: Vec<FinderReport>,
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = if std::env::var_os(EnvFilter::DEFAULT_ENV).is_some() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::new(default_level)
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn build_room(config: &RunConfig) -> Result<Room> {
    let spawns = config
        .spawn_points()
        .into_iter()
        .enumerate()
        .map(|(i, p)| (Finder::new(i as FinderId + 1), p))
        .collect();
    let spec = RoomSpec {
        width: config.width,
        height: config.height,
        spawns,
        finish_point: config.finish,
        seed: config.seed.as_deref(),
    };
    Room::create(&BacktrackerGenerator, spec).context("failed to build room")
}

fn report(
    config: RunConfig,
    result: SimulationResult,
    room: &Room,
    stats: &MoveStats,
) -> Result<Report> {
    let finders = room
        .finders()
        .iter()
        .map(|f| -> Result<FinderReport> {
            Ok(FinderReport {
                id: f.id,
                spawn: room.spawn_point(f.id)?,
                position: room.position(f.id)?,
                explored_cells: f.explored_map.explored_count(),
                moves: stats.counts().get(&f.id).copied().unwrap_or_default(),
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(Report {
        config,
        finish: room.finish_point(),
        result,
        finders,
    })
}

fn render(room: &Room) -> Result<()> {
    let mut stderr = io::stderr().lock();
    for line in room_to_strings(room) {
        writeln!(stderr, "{line}")?;
    }
    for finder in room.finders() {
        writeln!(stderr, "\nfinder {}:", finder.id)?;
        for line in explored_view_to_strings(room, finder.id)? {
            writeln!(stderr, "{line}")?;
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    init_tracing(args.verbose);

    let file_settings = match &args.config {
        Some(path) => Settings::from_file(path)?,
        None => Settings::default(),
    };
    let config = file_settings
        .merge(args.overrides())
        .resolve(std::env::var(SEED_ENV).ok())?;
    info!(?config, "starting");

    let room = build_room(&config)?;
    let strategy = Strategy::new(config.strategy, config.sub_seed("strategy").as_deref());
    let mut simulation = Simulation::new(strategy)
        .with_observer(MoveStats::default())
        .with_max_ticks_count(config.max_ticks);
    let (result, room) = simulation.run(room).context("simulation failed")?;

    if args.render {
        render(&room)?;
    }

    let out = report(config, result, &room, simulation.observer())?;
    let serialized = serde_json::to_string_pretty(&out)?;
    if args.output == "-" {
        let mut stdout = io::stdout().lock();
        stdout.write_all(serialized.as_bytes())?;
        stdout.write_all(b"\n")?;
    } else {
        fs::write(&args.output, serialized)
            .with_context(|| format!("failed to write output file: {}", &args.output))?;
    }

    Ok(())
}
