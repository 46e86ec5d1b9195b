//! Snapshot system: queries the ECS world and builds a complete GameStateSnapshot.
//!
//! Read-only: it never modifies the world.

use std::collections::BTreeMap;

use hecs::World;

use battlebases_combat::Fighter;
use battlebases_core::components::{Archetype, Spawner, Walker};
use battlebases_core::constants::MAX_SNAPSHOT_EVENTS;
use battlebases_core::enums::*;
use battlebases_core::events::CombatEvent;
use battlebases_core::state::*;
use battlebases_core::types::{LanePosition, SimTime};

use crate::scheduler::{fighter_id, CombatScheduler};
use crate::systems::economy::Treasury;

/// Build a complete GameStateSnapshot from the current world state.
pub fn build_snapshot(
    world: &World,
    time: &SimTime,
    phase: GamePhase,
    scheduler: &CombatScheduler,
    treasuries: &BTreeMap<Team, Treasury>,
    mut events: Vec<CombatEvent>,
    winner: Option<Team>,
) -> GameStateSnapshot {
    if events.len() > MAX_SNAPSHOT_EVENTS {
        let excess = events.len() - MAX_SNAPSHOT_EVENTS;
        events.drain(..excess);
    }

    GameStateSnapshot {
        time: *time,
        phase,
        fighters: build_fighters(world),
        battles: build_battles(scheduler),
        treasuries: build_treasuries(world, treasuries),
        events,
        winner,
    }
}

fn build_fighters(world: &World) -> Vec<FighterView> {
    let mut fighters: Vec<FighterView> = world
        .query::<(&Fighter, &LanePosition, &Archetype, Option<&Walker>)>()
        .iter()
        .map(|(entity, (fighter, pos, archetype, walker))| FighterView {
            id: fighter_id(entity),
            archetype: archetype.name.clone(),
            team: fighter.team,
            kind: fighter.kind,
            health: fighter.health(),
            max_health: fighter.max_health(),
            x: pos.x,
            walk: walker.map(|w| w.phase),
        })
        .collect();
    fighters.sort_by_key(|f| f.id);
    fighters
}

fn build_battles(scheduler: &CombatScheduler) -> Vec<BattleView> {
    scheduler
        .battles()
        .map(|battle| BattleView {
            key: battle.key(),
            first: battle.first(),
            second: battle.second(),
            status: battle.status(),
            interruptible: battle.interruptible(),
        })
        .collect()
}

fn build_treasuries(world: &World, treasuries: &BTreeMap<Team, Treasury>) -> Vec<TreasuryView> {
    treasuries
        .iter()
        .map(|(&team, treasury)| TreasuryView {
            team,
            funds: treasury.funds,
            outposts: outpost_slots(world, team),
        })
        .collect()
}

/// Slots of the team's outposts that are still standing, in order.
pub fn outpost_slots(world: &World, team: Team) -> Vec<u32> {
    let mut slots: Vec<u32> = world
        .query::<(&Spawner, &Fighter)>()
        .iter()
        .filter(|(_, (spawner, fighter))| spawner.team == team && !fighter.is_dead())
        .map(|(_, (spawner, _))| spawner.slot)
        .collect();
    slots.sort_unstable();
    slots
}
