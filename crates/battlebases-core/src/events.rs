//! Events emitted by the simulation for listeners outside the combat core
//! (despawn, movement, score and UI feedback).

use serde::{Deserialize, Serialize};

use crate::enums::{FighterKind, Team};
use crate::types::{BattleKey, FighterId};

/// Everything the simulation tells the outside world about combat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CombatEvent {
    /// A fighter entered the world and was registered with the scheduler.
    Spawned {
        fighter: FighterId,
        team: Team,
        kind: FighterKind,
    },
    /// A new battle was formed. `paused` battles wait behind another target.
    BattleStarted {
        battle: BattleKey,
        first: FighterId,
        second: FighterId,
        paused: bool,
    },
    /// A battle was suspended so its attacker could deal with a new enemy.
    BattlePaused { battle: BattleKey },
    /// A suspended battle picked up again.
    BattleResumed { battle: BattleKey },
    /// One attack landed.
    Attack {
        attacker: FighterId,
        defender: FighterId,
        damage: u32,
        remaining_health: u32,
    },
    /// A fighter lost all health. Its entity should be torn down.
    Defeated {
        fighter: FighterId,
        team: Team,
        kind: FighterKind,
    },
    /// A fighter won and has nothing left to fight; it may move again.
    VictoryFree { fighter: FighterId },
    /// A team bought a unit.
    Purchased {
        team: Team,
        unit: String,
        cost: u32,
        fighter: FighterId,
    },
    /// A main base fell.
    GameOver { loser: Team },
}
