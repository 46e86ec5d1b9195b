//! Spawn coordination: turns archetype configuration into fighter entities,
//! registers them with the scheduler, and gates purchases at outposts.

use hecs::{EntityBuilder, World};
use tracing::debug;

use battlebases_combat::Fighter;
use battlebases_core::components::{Archetype, ContactRange, Spawner, Walker};
use battlebases_core::config::{ArchetypeConfig, GameConfig};
use battlebases_core::constants::SPAWN_CLEAR_RADIUS;
use battlebases_core::enums::{FighterKind, Team, WalkPhase};
use battlebases_core::events::CombatEvent;
use battlebases_core::types::{FighterId, LanePosition};

use crate::scheduler::{fighter_id, CombatScheduler};
use crate::systems::economy::Treasury;

/// Everything needed to put one fighter on the lane.
pub struct SpawnRequest<'a> {
    pub team: Team,
    /// Archetype name, kept for snapshots.
    pub name: &'a str,
    pub archetype: &'a ArchetypeConfig,
    pub x: f64,
    /// Present when the new fighter is an outpost others spawn from.
    pub spawner: Option<Spawner>,
}

/// Result of a purchase attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurchaseOutcome {
    Spawned(FighterId),
    UnknownUnit,
    /// The team has no standing outpost in that slot.
    UnknownOutpost,
    InsufficientFunds,
    SpawnAreaBlocked,
}

/// Spawn a fighter, register it with the scheduler and announce it.
pub fn spawn_fighter(
    world: &mut World,
    scheduler: &mut CombatScheduler,
    events: &mut Vec<CombatEvent>,
    request: SpawnRequest<'_>,
) -> FighterId {
    let archetype = request.archetype;
    let fighter = Fighter::from_archetype(request.team, archetype);

    let mut builder = EntityBuilder::new();
    builder.add(fighter);
    builder.add(LanePosition::new(request.x));
    builder.add(ContactRange {
        reach: archetype.reach,
    });
    builder.add(Archetype {
        name: request.name.to_string(),
    });
    if archetype.kind == FighterKind::Mobile {
        builder.add(Walker {
            walk_speed: archetype.walk_speed,
            turn_time: archetype.turn_time,
            cur_walk_time: 0.0,
            rest_remaining: 0.0,
            phase: WalkPhase::Walking,
        });
    }
    if let Some(spawner) = request.spawner {
        builder.add(spawner);
    }

    let id = fighter_id(world.spawn(builder.build()));
    scheduler.report_spawn(id);
    debug!(fighter = %id, name = request.name, team = ?request.team, x = request.x, "spawned");
    events.push(CombatEvent::Spawned {
        fighter: id,
        team: request.team,
        kind: archetype.kind,
    });
    id
}

/// No living mobile unit stands within the clearance radius of `x`.
pub fn is_spawn_area_clear(world: &World, x: f64) -> bool {
    let spot = LanePosition::new(x);
    !world
        .query::<(&Fighter, &LanePosition)>()
        .iter()
        .any(|(_, (fighter, pos))| {
            fighter.kind == FighterKind::Mobile
                && !fighter.is_dead()
                && pos.distance_to(&spot) <= SPAWN_CLEAR_RADIUS
        })
}

/// Find where the team's outpost in `slot` spawns units, if it still stands.
fn spawn_point(world: &World, team: Team, slot: u32) -> Option<f64> {
    world
        .query::<(&Spawner, &Fighter)>()
        .iter()
        .find(|(_, (spawner, fighter))| {
            spawner.team == team && spawner.slot == slot && !fighter.is_dead()
        })
        .map(|(_, (spawner, _))| spawner.spawn_x)
}

/// Buy `unit` for `team` and spawn it at the outpost in `slot`.
/// Nothing changes unless every check passes.
#[allow(clippy::too_many_arguments)]
pub fn purchase_unit(
    world: &mut World,
    scheduler: &mut CombatScheduler,
    treasury: &mut Treasury,
    config: &GameConfig,
    events: &mut Vec<CombatEvent>,
    team: Team,
    slot: u32,
    unit: &str,
) -> PurchaseOutcome {
    let Some(offer) = config.offer(unit) else {
        return PurchaseOutcome::UnknownUnit;
    };
    let Some(archetype) = config.archetype(&offer.archetype) else {
        return PurchaseOutcome::UnknownUnit;
    };
    let Some(x) = spawn_point(world, team, slot) else {
        return PurchaseOutcome::UnknownOutpost;
    };
    if !treasury.can_afford(offer.cost) {
        return PurchaseOutcome::InsufficientFunds;
    }
    if !is_spawn_area_clear(world, x) {
        return PurchaseOutcome::SpawnAreaBlocked;
    }
    if !treasury.spend(offer.cost) {
        return PurchaseOutcome::InsufficientFunds;
    }

    let fighter = spawn_fighter(
        world,
        scheduler,
        events,
        SpawnRequest {
            team,
            name: &offer.archetype,
            archetype,
            x,
            spawner: None,
        },
    );
    events.push(CombatEvent::Purchased {
        team,
        unit: offer.name.clone(),
        cost: offer.cost,
        fighter,
    });
    PurchaseOutcome::Spawned(fighter)
}
