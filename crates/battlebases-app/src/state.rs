//! Host state shared between the controlling thread and the game loop thread.

use std::sync::mpsc;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::JoinHandle;

use thiserror::Error;

use battlebases_core::commands::PlayerCommand;
use battlebases_core::state::GameStateSnapshot;
use battlebases_sim::SimConfig;

use crate::game_loop;

/// Commands sent from the host to the game loop thread.
#[derive(Debug)]
pub enum GameLoopCommand {
    /// A player command to forward to the simulation engine.
    PlayerCommand(PlayerCommand),
    /// Shut down the game loop thread gracefully.
    Shutdown,
}

#[derive(Debug, Error)]
pub enum HostError {
    #[error("simulation already running")]
    AlreadyRunning,
    #[error("simulation not started")]
    NotStarted,
    #[error("game loop has stopped")]
    LoopStopped,
    #[error("host state lock poisoned")]
    Poisoned,
    #[error("failed to spawn game loop thread: {0}")]
    Spawn(#[from] std::io::Error),
}

impl<T> From<PoisonError<T>> for HostError {
    fn from(_: PoisonError<T>) -> Self {
        HostError::Poisoned
    }
}

/// Handle to a running (or not yet started) game loop.
///
/// Every field sits behind a mutex so the handle can be shared by reference
/// between threads.
pub struct HostState {
    /// Channel sender to forward commands to the game loop thread.
    /// `None` before `start_simulation` is called.
    command_tx: Mutex<Option<mpsc::Sender<GameLoopCommand>>>,
    loop_handle: Mutex<Option<JoinHandle<()>>>,
    /// Latest snapshot, updated by the game loop thread after each tick.
    pub latest_snapshot: Arc<Mutex<Option<GameStateSnapshot>>>,
}

impl Default for HostState {
    fn default() -> Self {
        Self {
            command_tx: Mutex::new(None),
            loop_handle: Mutex::new(None),
            latest_snapshot: Arc::new(Mutex::new(None)),
        }
    }
}

impl HostState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.command_tx
            .lock()
            .map(|tx| tx.is_some())
            .unwrap_or(false)
    }

    /// Spawn the game loop thread if it is not already running.
    pub fn start_simulation(&self, config: SimConfig) -> Result<(), HostError> {
        self.start_simulation_with_sink(config, |_| {})
    }

    /// Like [`start_simulation`](Self::start_simulation), also handing every
    /// snapshot to `sink` on the game loop thread.
    pub fn start_simulation_with_sink<F>(&self, config: SimConfig, sink: F) -> Result<(), HostError>
    where
        F: FnMut(&GameStateSnapshot) + Send + 'static,
    {
        let mut tx_lock = self.command_tx.lock()?;
        if tx_lock.is_some() {
            return Err(HostError::AlreadyRunning);
        }
        let (cmd_tx, handle) =
            game_loop::spawn_game_loop(config, self.latest_snapshot.clone(), sink)?;
        *tx_lock = Some(cmd_tx);
        *self.loop_handle.lock()? = Some(handle);
        Ok(())
    }

    /// Whether a started game loop thread has exited without being shut down.
    pub fn has_stopped(&self) -> bool {
        self.loop_handle
            .lock()
            .map(|handle| handle.as_ref().is_some_and(|h| h.is_finished()))
            .unwrap_or(true)
    }

    /// Forward a player command to the simulation.
    pub fn send_command(&self, command: PlayerCommand) -> Result<(), HostError> {
        let tx_lock = self.command_tx.lock()?;
        match tx_lock.as_ref() {
            Some(tx) => tx
                .send(GameLoopCommand::PlayerCommand(command))
                .map_err(|_| HostError::LoopStopped),
            None => Err(HostError::NotStarted),
        }
    }

    /// The most recent snapshot, if the loop has ticked at least once.
    pub fn snapshot(&self) -> Option<GameStateSnapshot> {
        self.latest_snapshot.lock().ok().and_then(|s| s.clone())
    }

    /// Stop the loop and wait for its thread to finish.
    pub fn shutdown(&self) -> Result<(), HostError> {
        let Some(tx) = self.command_tx.lock()?.take() else {
            return Err(HostError::NotStarted);
        };
        // The loop may already have exited on its own.
        let _ = tx.send(GameLoopCommand::Shutdown);
        if let Some(handle) = self.loop_handle.lock()?.take() {
            handle.join().map_err(|_| HostError::LoopStopped)?;
        }
        Ok(())
    }
}
