//! Headless NeonDrop simulator.
//!
//! Drives the engine with a fixed timestep and a greedy autoplayer, then prints the session
//! summary as JSON. Useful for checking a day's mercy curve and for replaying a seed.

mod autoplay;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use neon_drop::core::{BoardEngine, GameConfig, MercyStats, MercySystem, Statistics};
use neon_drop::types::{GameAction, Phase, TICK_MS};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Daily mercy seed
    #[arg(short, long, default_value_t = 12345, allow_negative_numbers = true)]
    seed: i32,

    /// Seed for the 7-bag shuffle
    #[arg(short, long, default_value_t = 1)]
    bag_seed: u32,

    /// Stop after this many locked pieces
    #[arg(short, long, default_value_t = 500)]
    pieces: u32,

    /// Milliseconds per simulated frame
    #[arg(short, long, default_value_t = TICK_MS)]
    tick_ms: u32,

    /// JSON configuration file (LOCK_DELAY, LOCK_DELAY_FLOAT, PIECES)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Deal only from the 7-bag
    #[arg(long)]
    no_mercy: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Summary {
    seed: i32,
    bag_seed: u32,
    phase: Phase,
    score: u32,
    lines: u32,
    level: u32,
    stack_height: u32,
    frames: u64,
    simulated_ms: u64,
    stats: Statistics,
    mercy: Option<MercyStats>,
}

fn load_config(path: Option<&PathBuf>) -> Result<GameConfig> {
    let Some(path) = path else {
        return Ok(GameConfig::default());
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    GameConfig::from_json(&json).with_context(|| format!("invalid config {}", path.display()))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    anyhow::ensure!(args.tick_ms > 0, "--tick-ms must be positive");

    let config = load_config(args.config.as_ref())?;
    let mut engine = if args.no_mercy {
        BoardEngine::new(config, args.bag_seed)
    } else {
        BoardEngine::with_mercy(config, args.bag_seed, MercySystem::new(args.seed))
    };

    let summary = run(&mut engine, &args);
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn run(engine: &mut BoardEngine, args: &Args) -> Summary {
    engine.handle_input(GameAction::Start);

    let mut frames: u64 = 0;
    let mut pending: Vec<GameAction> = Vec::new();
    let mut planned_for = u32::MAX;

    while engine.phase() == Phase::Playing && engine.statistics().pieces_placed < args.pieces {
        let placed = engine.statistics().pieces_placed;
        if planned_for != placed {
            planned_for = placed;
            pending = autoplay::plan(engine)
                .map(|p| p.actions)
                .unwrap_or_default();
            pending.reverse();
        }

        // One input per frame, like a fast human.
        if let Some(action) = pending.pop() {
            engine.handle_input(action);
        }
        engine.update(args.tick_ms);
        frames += 1;
    }

    tracing::info!(
        frames,
        score = engine.score(),
        pieces = engine.statistics().pieces_placed,
        "simulation finished"
    );

    Summary {
        seed: args.seed,
        bag_seed: args.bag_seed,
        phase: engine.phase(),
        score: engine.score(),
        lines: engine.lines(),
        level: engine.level(),
        stack_height: engine.stack_height(),
        frames,
        simulated_ms: frames * u64::from(args.tick_ms),
        stats: engine.statistics(),
        mercy: engine.mercy_stats(),
    }
}
