//! Simulation engine, the core of the game.
//!
//! `SimulationEngine` owns the hecs ECS world and the combat scheduler,
//! processes player commands, runs all systems, and produces
//! `GameStateSnapshot`s. Completely headless, enabling deterministic testing.

use std::collections::{BTreeMap, VecDeque};

use hecs::World;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use battlebases_core::commands::PlayerCommand;
use battlebases_core::config::GameConfig;
use battlebases_core::constants::{DT, MAX_TIME_SCALE};
use battlebases_core::enums::{FighterKind, GamePhase, Team};
use battlebases_core::events::CombatEvent;
use battlebases_core::state::GameStateSnapshot;
use battlebases_core::types::SimTime;

use crate::scheduler::CombatScheduler;
use crate::spawn::{self, PurchaseOutcome};
use crate::systems;
use crate::systems::economy::Treasury;
use crate::world_setup;

/// Configuration for starting a new simulation.
///
/// Serializable so a run can be replayed from its recorded seed and config.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
    /// Initial time scale (1.0 = normal).
    pub time_scale: f64,
    pub game: GameConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            time_scale: 1.0,
            game: GameConfig::default(),
        }
    }
}

/// Keep a requested time scale within `0..=MAX_TIME_SCALE`. Anything that is
/// not a number runs at normal speed.
fn clamp_time_scale(scale: f64) -> f64 {
    if scale.is_nan() {
        1.0
    } else {
        scale.clamp(0.0, MAX_TIME_SCALE)
    }
}

/// The simulation engine. Owns the ECS world and all sim state.
pub struct SimulationEngine {
    world: World,
    time: SimTime,
    phase: GamePhase,
    time_scale: f64,
    rng: ChaCha8Rng,
    config: GameConfig,
    command_queue: VecDeque<PlayerCommand>,
    despawn_buffer: Vec<hecs::Entity>,
    events: Vec<CombatEvent>,
    scheduler: CombatScheduler,
    treasuries: BTreeMap<Team, Treasury>,
    winner: Option<Team>,
}

impl SimulationEngine {
    /// Create a new simulation engine with the given config.
    pub fn new(config: SimConfig) -> Self {
        let mut game = config.game;
        if let Err(err) = game.validate() {
            error!(%err, "invalid game configuration, using defaults");
            game = GameConfig::default();
        }
        for fix in game.sanitize() {
            warn!("{fix}");
        }

        Self {
            world: World::new(),
            time: SimTime::default(),
            phase: GamePhase::default(),
            time_scale: clamp_time_scale(config.time_scale),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            config: game,
            command_queue: VecDeque::new(),
            despawn_buffer: Vec::new(),
            events: Vec::new(),
            scheduler: CombatScheduler::new(),
            treasuries: BTreeMap::new(),
            winner: None,
        }
    }

    /// Queue a player command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance the simulation by one tick and return the resulting snapshot.
    pub fn tick(&mut self) -> GameStateSnapshot {
        self.process_commands();

        if self.phase == GamePhase::Active {
            self.run_systems();
            self.time.advance();
        }

        let events = std::mem::take(&mut self.events);
        systems::snapshot::build_snapshot(
            &self.world,
            &self.time,
            self.phase,
            &self.scheduler,
            &self.treasuries,
            events,
            self.winner,
        )
    }

    /// Get the current game phase.
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Get the current simulation time.
    pub fn time(&self) -> SimTime {
        self.time
    }

    /// Get the current time scale.
    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn scheduler(&self) -> &CombatScheduler {
        &self.scheduler
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn treasury(&self, team: Team) -> Option<&Treasury> {
        self.treasuries.get(&team)
    }

    /// The team that won, once the match is over.
    pub fn winner(&self) -> Option<Team> {
        self.winner
    }

    /// Spawn a unit from a named archetype directly onto the lane (for tests).
    #[cfg(test)]
    pub fn spawn_unit_at(
        &mut self,
        team: Team,
        archetype: &str,
        x: f64,
    ) -> battlebases_core::types::FighterId {
        let config = self.config.archetypes[archetype].clone();
        spawn::spawn_fighter(
            &mut self.world,
            &mut self.scheduler,
            &mut self.events,
            spawn::SpawnRequest {
                team,
                name: archetype,
                archetype: &config,
                x,
                spawner: None,
            },
        )
    }

    /// Mutable world access (for tests that stage positions or damage).
    #[cfg(test)]
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Process all queued commands.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    /// Handle a single player command.
    fn handle_command(&mut self, command: PlayerCommand) {
        match command {
            PlayerCommand::StartMatch => {
                if self.phase == GamePhase::Setup {
                    world_setup::setup_match(
                        &mut self.world,
                        &mut self.scheduler,
                        &self.config,
                        &mut self.events,
                    );
                    self.treasuries = Team::ALL
                        .into_iter()
                        .map(|team| (team, Treasury::from_config(&self.config.treasury)))
                        .collect();
                    self.phase = GamePhase::Active;
                    self.time = SimTime::default();
                    info!("match started");
                }
            }
            PlayerCommand::Pause => {
                if self.phase == GamePhase::Active {
                    self.phase = GamePhase::Paused;
                }
            }
            PlayerCommand::Resume => {
                if self.phase == GamePhase::Paused {
                    self.phase = GamePhase::Active;
                }
            }
            PlayerCommand::SetTimeScale { scale } => {
                self.time_scale = clamp_time_scale(scale);
            }
            PlayerCommand::PurchaseUnit {
                team,
                outpost,
                unit,
            } => {
                if !matches!(self.phase, GamePhase::Active | GamePhase::Paused) {
                    return;
                }
                let Some(treasury) = self.treasuries.get_mut(&team) else {
                    return;
                };
                let outcome = spawn::purchase_unit(
                    &mut self.world,
                    &mut self.scheduler,
                    treasury,
                    &self.config,
                    &mut self.events,
                    team,
                    outpost,
                    &unit,
                );
                match outcome {
                    PurchaseOutcome::Spawned(fighter) => {
                        info!(?team, %fighter, %unit, outpost, "unit purchased")
                    }
                    refused => debug!(?team, %unit, outpost, ?refused, "purchase refused"),
                }
            }
        }
    }

    /// Run all systems in order.
    fn run_systems(&mut self) {
        let first_new = self.events.len();

        // 1. Funding turns
        systems::economy::run(&mut self.treasuries, DT);
        // 2. Lane walking
        systems::walk::run(&mut self.world, &self.scheduler, DT);
        // 3. Contact detection, forming new battles
        systems::contact::run(
            &self.world,
            &mut self.scheduler,
            &mut self.rng,
            &mut self.events,
        );
        // 4. Battles
        self.scheduler
            .advance(&mut self.world, DT, &mut self.events);
        // 5. React to outcomes
        self.apply_outcomes(first_new);
        // 6. Cleanup (defeated fighters)
        systems::cleanup::run(&mut self.world, &mut self.despawn_buffer);
    }

    /// Free victorious walkers and end the match when a main base falls.
    fn apply_outcomes(&mut self, first_new: usize) {
        let mut released = Vec::new();
        let mut fallen_base = None;
        for event in &self.events[first_new..] {
            match *event {
                CombatEvent::VictoryFree { fighter } => released.push(fighter),
                CombatEvent::Defeated {
                    team,
                    kind: FighterKind::MainBase,
                    ..
                } if fallen_base.is_none() => fallen_base = Some(team),
                CombatEvent::Defeated { fighter, kind, .. } => {
                    debug!(%fighter, ?kind, "fighter defeated")
                }
                _ => {}
            }
        }

        for fighter in released {
            systems::walk::release(&mut self.world, fighter);
        }

        if let Some(loser) = fallen_base {
            self.winner = Some(loser.enemy());
            self.phase = GamePhase::MatchOver;
            info!(?loser, winner = ?loser.enemy(), "main base destroyed, match over");
            self.events.push(CombatEvent::GameOver { loser });
        }
    }
}
