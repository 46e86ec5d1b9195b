//! Battlefield setup: each team's main base, base gun and outposts.

use hecs::World;
use tracing::warn;

use battlebases_core::components::Spawner;
use battlebases_core::config::GameConfig;
use battlebases_core::constants::{DEFENSE_GUN_OFFSET, OUTPOST_SPAWN_OFFSET};
use battlebases_core::enums::Team;
use battlebases_core::events::CombatEvent;
use battlebases_core::types::FighterId;

use crate::scheduler::CombatScheduler;
use crate::spawn::{spawn_fighter, SpawnRequest};

/// Build both teams' structures. The gun sits just behind the base; outposts
/// are spread toward the enemy.
pub fn setup_match(
    world: &mut World,
    scheduler: &mut CombatScheduler,
    config: &GameConfig,
    events: &mut Vec<CombatEvent>,
) {
    for team in Team::ALL {
        let base_x = team.home_x();
        let dir = team.direction();
        let layout = &config.battlefield;

        spawn_structure(world, scheduler, config, events, team, &layout.main_base, base_x, None);

        if let Some(gun) = &layout.defense_gun {
            let x = base_x - dir * DEFENSE_GUN_OFFSET;
            spawn_structure(world, scheduler, config, events, team, gun, x, None);
        }

        for (slot, offset) in (0u32..).zip(&layout.outpost_offsets) {
            let x = base_x + dir * offset;
            let spawner = Spawner {
                team,
                slot,
                spawn_x: x + dir * OUTPOST_SPAWN_OFFSET,
            };
            spawn_structure(world, scheduler, config, events, team, &layout.outpost, x, Some(spawner));
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn spawn_structure(
    world: &mut World,
    scheduler: &mut CombatScheduler,
    config: &GameConfig,
    events: &mut Vec<CombatEvent>,
    team: Team,
    name: &str,
    x: f64,
    spawner: Option<Spawner>,
) -> Option<FighterId> {
    let Some(archetype) = config.archetype(name) else {
        warn!(name, ?team, "battlefield archetype missing, structure skipped");
        return None;
    };
    Some(spawn_fighter(
        world,
        scheduler,
        events,
        SpawnRequest {
            team,
            name,
            archetype,
            x,
            spawner,
        },
    ))
}
