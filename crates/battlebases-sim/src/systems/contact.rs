//! Distance-based contact detection.
//!
//! Every tick, each pair of living enemies within the longer of their two
//! reaches is reported to the scheduler, lower id first. Reports are
//! idempotent, so pairs already fighting are simply acknowledged again.

use hecs::World;
use rand::Rng;

use battlebases_combat::Fighter;
use battlebases_core::components::ContactRange;
use battlebases_core::events::CombatEvent;
use battlebases_core::types::LanePosition;

use crate::scheduler::{fighter_id, CombatScheduler};

/// Report every pair in contact.
pub fn run<R: Rng + ?Sized>(
    world: &World,
    scheduler: &mut CombatScheduler,
    rng: &mut R,
    events: &mut Vec<CombatEvent>,
) {
    let mut fighters: Vec<_> = world
        .query::<(&Fighter, &LanePosition, &ContactRange)>()
        .iter()
        .filter(|(_, (fighter, _, _))| !fighter.is_dead())
        .map(|(entity, (fighter, pos, range))| (fighter_id(entity), fighter.team, *pos, range.reach))
        .collect();
    fighters.sort_by_key(|&(id, ..)| id);

    for (i, &(a, team_a, pos_a, reach_a)) in fighters.iter().enumerate() {
        for &(b, team_b, pos_b, reach_b) in &fighters[i + 1..] {
            if team_a == team_b || pos_a.distance_to(&pos_b) > reach_a.max(reach_b) {
                continue;
            }
            scheduler.report_enemy_contact(world, rng, a, b, events);
        }
    }
}
