//! Cleanup system: removes defeated fighters from the world.

use hecs::{Entity, World};

use battlebases_combat::Fighter;

/// Despawn every dead fighter. The scheduler has already reported and
/// forgotten them by the time this runs.
/// Uses a pre-allocated buffer to avoid per-tick allocation.
pub fn run(world: &mut World, despawn_buffer: &mut Vec<Entity>) {
    despawn_buffer.clear();

    for (entity, fighter) in world.query_mut::<&Fighter>() {
        if fighter.is_dead() {
            despawn_buffer.push(entity);
        }
    }

    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
}
