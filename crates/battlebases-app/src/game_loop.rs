//! Game loop thread: runs the simulation engine at 30Hz and publishes snapshots.
//!
//! The engine is created inside this thread so it is never shared.
//! Commands arrive via `mpsc` channel. Each snapshot is handed to a sink
//! callback and stored in shared state for synchronous polling.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use battlebases_core::constants::TICK_RATE;
use battlebases_core::events::CombatEvent;
use battlebases_core::state::GameStateSnapshot;
use battlebases_sim::engine::{SimConfig, SimulationEngine};

use crate::state::GameLoopCommand;

/// Nominal duration of one tick at 1x speed.
pub const TICK_DURATION: Duration = Duration::from_nanos(1_000_000_000 / TICK_RATE as u64);

/// Spawns the game loop in a new thread.
///
/// Returns the command sender and the thread handle.
pub fn spawn_game_loop<F>(
    config: SimConfig,
    latest_snapshot: Arc<Mutex<Option<GameStateSnapshot>>>,
    sink: F,
) -> std::io::Result<(mpsc::Sender<GameLoopCommand>, JoinHandle<()>)>
where
    F: FnMut(&GameStateSnapshot) + Send + 'static,
{
    let (cmd_tx, cmd_rx) = mpsc::channel::<GameLoopCommand>();

    let handle = std::thread::Builder::new()
        .name("battlebases-game-loop".into())
        .spawn(move || {
            run_game_loop(config, cmd_rx, &latest_snapshot, sink);
        })?;

    Ok((cmd_tx, handle))
}

/// The game loop. Runs until Shutdown command or channel disconnect.
fn run_game_loop<F>(
    config: SimConfig,
    cmd_rx: mpsc::Receiver<GameLoopCommand>,
    latest_snapshot: &Mutex<Option<GameStateSnapshot>>,
    mut sink: F,
) where
    F: FnMut(&GameStateSnapshot),
{
    let mut engine = SimulationEngine::new(config);
    let mut next_tick_time = Instant::now();
    info!("game loop started");

    loop {
        // 1. Drain all pending commands
        loop {
            match cmd_rx.try_recv() {
                Ok(GameLoopCommand::PlayerCommand(cmd)) => {
                    engine.queue_command(cmd);
                }
                Ok(GameLoopCommand::Shutdown) | Err(mpsc::TryRecvError::Disconnected) => {
                    info!(tick = engine.time().tick, "game loop stopped");
                    return;
                }
                Err(mpsc::TryRecvError::Empty) => break,
            }
        }

        // 2. Advance one tick (engine handles pause semantics internally)
        let snapshot = engine.tick();
        log_highlights(&snapshot);

        // 3. Hand the snapshot to the host
        sink(&snapshot);

        // 4. Store latest snapshot for synchronous polling
        if let Ok(mut lock) = latest_snapshot.lock() {
            *lock = Some(snapshot);
        }

        // 5. Sleep until next tick, adjusting for time_scale
        let time_scale = engine.time_scale();
        let effective_tick_duration = if time_scale > 0.001 {
            TICK_DURATION.div_f64(time_scale)
        } else {
            TICK_DURATION
        };

        next_tick_time += effective_tick_duration;
        let now = Instant::now();
        if next_tick_time > now {
            std::thread::sleep(next_tick_time - now);
        } else if now - next_tick_time > effective_tick_duration * 2 {
            // Too far behind: reset to avoid a catch-up spiral
            debug!("game loop fell behind, resetting tick clock");
            next_tick_time = now;
        }
    }
}

/// Log the events a host operator cares about.
pub fn log_highlights(snapshot: &GameStateSnapshot) {
    for event in &snapshot.events {
        match event {
            CombatEvent::Purchased { team, unit, .. } => {
                debug!(?team, %unit, tick = snapshot.time.tick, "purchase")
            }
            CombatEvent::Defeated { fighter, team, kind } => {
                debug!(%fighter, ?team, ?kind, tick = snapshot.time.tick, "defeated")
            }
            CombatEvent::GameOver { loser } => {
                info!(?loser, tick = snapshot.time.tick, "game over")
            }
            _ => {}
        }
    }
}
