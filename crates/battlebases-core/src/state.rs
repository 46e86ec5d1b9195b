//! Game state snapshot: the complete visible state published by the engine each tick.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::CombatEvent;
use crate::types::{BattleKey, FighterId, SimTime};

/// Complete game state broadcast after each tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameStateSnapshot {
    pub time: SimTime,
    pub phase: GamePhase,
    pub fighters: Vec<FighterView>,
    pub battles: Vec<BattleView>,
    pub treasuries: Vec<TreasuryView>,
    /// Combat events produced during this tick.
    pub events: Vec<CombatEvent>,
    /// Set once a main base has fallen.
    pub winner: Option<Team>,
}

/// A fighter on the lane.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FighterView {
    pub id: FighterId,
    pub archetype: String,
    pub team: Team,
    pub kind: FighterKind,
    pub health: u32,
    pub max_health: u32,
    pub x: f64,
    /// Walk phase for mobile units, `None` for structures.
    pub walk: Option<WalkPhase>,
}

/// A battle in the scheduler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattleView {
    pub key: BattleKey,
    pub first: FighterId,
    pub second: FighterId,
    pub status: BattleStatus,
    pub interruptible: bool,
}

/// A team's funds and the outposts it can still buy from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreasuryView {
    pub team: Team,
    pub funds: u32,
    pub outposts: Vec<u32>,
}
