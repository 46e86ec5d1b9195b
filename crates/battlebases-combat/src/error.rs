//! Errors raised by battle bookkeeping.

use battlebases_core::types::{BattleKey, FighterId};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CombatError {
    /// A resolved battle was ticked again instead of being removed.
    #[error("battle {0} was ticked after it resolved")]
    BattleResolved(BattleKey),

    /// A fighter was given a battle to attack in but has no usable attack.
    #[error("fighter {0} cannot attack")]
    UnarmedAttacker(FighterId),
}
