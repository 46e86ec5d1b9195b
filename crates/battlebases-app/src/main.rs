//! BattleBases headless host.
//!
//! Runs one match with both teams on autopilot, either as fast as possible or
//! paced in real time on the game loop thread, and prints a JSON summary.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use serde::Serialize;
use tracing::{error, info};

use battlebases_app::autopilot::{run_match, Autopilot};
use battlebases_app::game_loop::log_highlights;
use battlebases_app::state::HostState;
use battlebases_core::commands::PlayerCommand;
use battlebases_core::config::GameConfig;
use battlebases_core::enums::{GamePhase, Team};
use battlebases_core::state::GameStateSnapshot;
use battlebases_sim::{SimConfig, SimulationEngine};

/// Run a BattleBases match without a frontend.
#[derive(Parser, Debug)]
#[command(name = "battlebases")]
#[command(version, about, long_about = None)]
struct Args {
    /// RNG seed. Same seed, same match.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Stop after this many ticks if nobody has won.
    #[arg(long, default_value_t = 30 * 60 * 5)]
    ticks: u64,

    /// JSON game configuration. Built-in defaults when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Pace the match in real time on the game loop thread.
    #[arg(long)]
    realtime: bool,

    /// Time scale for real-time runs.
    #[arg(long, default_value_t = 1.0)]
    time_scale: f64,
}

/// What the host prints when the match ends.
#[derive(Debug, Serialize)]
struct MatchReport {
    seed: u64,
    ticks: u64,
    elapsed_secs: f64,
    phase: GamePhase,
    winner: Option<Team>,
    fighters: usize,
    battles: usize,
}

impl MatchReport {
    fn new(seed: u64, snapshot: &GameStateSnapshot) -> Self {
        Self {
            seed,
            ticks: snapshot.time.tick,
            elapsed_secs: snapshot.time.elapsed_secs,
            phase: snapshot.phase,
            winner: snapshot.winner,
            fighters: snapshot.fighters.len(),
            battles: snapshot.battles.len(),
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let game = match &args.config {
        Some(path) => match GameConfig::from_path(path) {
            Ok(game) => game,
            Err(err) => {
                error!(%err, "could not load configuration");
                return ExitCode::FAILURE;
            }
        },
        None => GameConfig::default(),
    };
    let config = SimConfig {
        seed: args.seed,
        time_scale: args.time_scale,
        game,
    };

    let result = if args.realtime {
        run_realtime(config, args.ticks)
    } else {
        Some(run_headless(config, args.ticks))
    };
    let Some(snapshot) = result else {
        return ExitCode::FAILURE;
    };

    let report = MatchReport::new(args.seed, &snapshot);
    info!(winner = ?report.winner, ticks = report.ticks, "match finished");
    match serde_json::to_string_pretty(&report) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(%err, "could not serialize report");
            ExitCode::FAILURE
        }
    }
}

fn pilots() -> [Autopilot; 2] {
    Team::ALL.map(Autopilot::new)
}

/// Tick the engine back to back on this thread.
fn run_headless(config: SimConfig, max_ticks: u64) -> GameStateSnapshot {
    let game = config.game.clone();
    let mut engine = SimulationEngine::new(config);
    let mut pilots = pilots();

    engine.queue_command(PlayerCommand::StartMatch);
    let mut snapshot = engine.tick();
    while snapshot.phase != GamePhase::MatchOver && snapshot.time.tick < max_ticks {
        for pilot in &mut pilots {
            if let Some(command) = pilot.plan(&snapshot, &game) {
                engine.queue_command(command);
            }
        }
        snapshot = engine.tick();
        log_highlights(&snapshot);
    }
    snapshot
}

/// Run on the game loop thread, polling the latest snapshot.
fn run_realtime(config: SimConfig, max_ticks: u64) -> Option<GameStateSnapshot> {
    let game = config.game.clone();
    let host = HostState::new();
    let mut pilots = pilots();

    if let Err(err) = host
        .start_simulation(config)
        .and_then(|()| host.send_command(PlayerCommand::StartMatch))
    {
        error!(%err, "could not start game loop");
        return None;
    }

    let last = run_match(&host, &mut pilots, &game, max_ticks);

    if let Err(err) = host.shutdown() {
        error!(%err, "game loop did not shut down cleanly");
    }
    last
}
