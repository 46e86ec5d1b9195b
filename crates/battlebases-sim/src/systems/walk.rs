//! Lane walking.
//!
//! Mobile units cover `walk_speed` world units over a walk turn of
//! `turn_time` seconds, then rest for `turn_time` before the next turn.
//! A unit stops while it takes part in any battle, as attacker or target,
//! paused or not, and while an enemy it could hit is within its reach.

use hecs::World;

use battlebases_combat::Fighter;
use battlebases_core::components::{ContactRange, Walker};
use battlebases_core::constants::{LANE_LENGTH, TIMER_EPSILON};
use battlebases_core::enums::{Team, WalkPhase};
use battlebases_core::types::{FighterId, LanePosition};

use crate::scheduler::{entity_of, fighter_id, CombatScheduler};

/// Run one walk step for every living walker.
pub fn run(world: &mut World, scheduler: &CombatScheduler, dt: f64) {
    let targets: Vec<(Team, LanePosition)> = world
        .query::<(&Fighter, &LanePosition)>()
        .iter()
        .filter(|(_, (fighter, _))| !fighter.is_dead() && fighter.can_be_targeted())
        .map(|(_, (fighter, pos))| (fighter.team, *pos))
        .collect();

    for (entity, (walker, pos, fighter, range)) in
        world.query_mut::<(&mut Walker, &mut LanePosition, &Fighter, &ContactRange)>()
    {
        if fighter.is_dead() {
            continue;
        }
        let busy = scheduler.is_engaged(fighter_id(entity));
        let blocked = targets
            .iter()
            .any(|(team, other)| *team != fighter.team && pos.distance_to(other) <= range.reach);
        if busy || blocked {
            halt(walker);
        } else {
            step(walker, pos, fighter.team.direction(), dt);
        }
    }
}

/// Advance one walker by `dt` seconds along `direction`.
pub fn step(walker: &mut Walker, pos: &mut LanePosition, direction: f64, dt: f64) {
    if walker.phase == WalkPhase::Halted {
        start_turn(walker);
    }

    match walker.phase {
        WalkPhase::Walking => {
            let speed = walker.walk_speed / walker.turn_time.max(f64::EPSILON);
            walker.cur_walk_time += dt;
            pos.x = (pos.x + direction * speed * dt).clamp(0.0, LANE_LENGTH);
            if walker.cur_walk_time + TIMER_EPSILON >= walker.turn_time {
                walker.phase = WalkPhase::Resting;
                walker.rest_remaining = walker.turn_time;
                walker.cur_walk_time = 0.0;
            }
        }
        WalkPhase::Resting => {
            walker.rest_remaining -= dt;
            if walker.rest_remaining <= TIMER_EPSILON {
                start_turn(walker);
            }
        }
        WalkPhase::Halted => {}
    }
}

fn halt(walker: &mut Walker) {
    walker.phase = WalkPhase::Halted;
    walker.cur_walk_time = 0.0;
    walker.rest_remaining = 0.0;
}

fn start_turn(walker: &mut Walker) {
    walker.phase = WalkPhase::Walking;
    walker.cur_walk_time = 0.0;
    walker.rest_remaining = 0.0;
}

/// A fighter won its last battle: start a fresh walk turn.
pub fn release(world: &mut World, fighter: FighterId) {
    let Some(entity) = entity_of(fighter) else {
        return;
    };
    if let Ok(mut walker) = world.get::<&mut Walker>(entity) {
        start_turn(&mut walker);
    }
}
