//! A single two-party engagement and its attack timers.
//!
//! The first-listed fighter always attacks. The second-listed fighter attacks
//! back only in a mutual battle; a one-attacker battle (against a structure,
//! or fought by a base gun) never arms the second side.

use battlebases_core::constants::{INITIATIVE_LOSER_DELAY_FACTOR, TIMER_EPSILON};
use battlebases_core::enums::BattleStatus;
use battlebases_core::types::{BattleKey, FighterId};

use crate::error::CombatError;
use crate::fighter::Fighter;

/// How a battle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattleOutcome {
    Won { winner: FighterId, loser: FighterId },
    /// The battle cannot continue but nobody won it here, e.g. one side was
    /// removed from the world.
    Abandoned { survivor: Option<FighterId> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattleState {
    Active,
    Paused,
    Resolved(BattleOutcome),
}

/// One attack that landed during a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttackReport {
    pub attacker: FighterId,
    pub defender: FighterId,
    pub damage: u32,
    pub remaining_health: u32,
    pub killed: bool,
}

/// Everything that happened to a battle during one tick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    pub attacks: Vec<AttackReport>,
    pub outcome: Option<BattleOutcome>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Battle {
    first: FighterId,
    second: FighterId,
    /// Time accumulated toward the first side's next attack.
    first_charge: f64,
    /// `None` when the second side never attacks in this battle.
    second_charge: Option<f64>,
    state: BattleState,
    interruptible: bool,
}

impl Battle {
    /// A battle where both sides trade blows. `first` holds initiative and
    /// attacks after one period; `second` waits an extra half period.
    pub fn mutual(
        first_id: FighterId,
        first: &Fighter,
        second_id: FighterId,
        second: &Fighter,
    ) -> Result<Self, CombatError> {
        let mut battle = Self::one_attacker(first_id, first, second_id, second)?;
        if second.can_attack() && first.can_be_targeted() {
            battle.second_charge = second
                .attack_period()
                .map(|period| -period * INITIATIVE_LOSER_DELAY_FACTOR);
        }
        Ok(battle)
    }

    /// A battle where only `attacker` ever strikes.
    pub fn one_attacker(
        attacker_id: FighterId,
        attacker: &Fighter,
        target_id: FighterId,
        target: &Fighter,
    ) -> Result<Self, CombatError> {
        if !attacker.can_attack() {
            return Err(CombatError::UnarmedAttacker(attacker_id));
        }
        Ok(Self {
            first: attacker_id,
            second: target_id,
            first_charge: 0.0,
            second_charge: None,
            state: BattleState::Active,
            interruptible: attacker.is_structure() || target.is_structure(),
        })
    }

    pub fn key(&self) -> BattleKey {
        BattleKey::new(self.first, self.second)
    }

    pub fn first(&self) -> FighterId {
        self.first
    }

    pub fn second(&self) -> FighterId {
        self.second
    }

    pub fn state(&self) -> BattleState {
        self.state
    }

    /// Status for snapshots. Resolved battles never outlive the tick they
    /// resolve in, so they report as active.
    pub fn status(&self) -> BattleStatus {
        match self.state {
            BattleState::Paused => BattleStatus::Paused,
            BattleState::Active | BattleState::Resolved(_) => BattleStatus::Active,
        }
    }

    pub fn is_paused(&self) -> bool {
        self.state == BattleState::Paused
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self.state, BattleState::Resolved(_))
    }

    /// A structure is involved, so the attacker may be pulled away.
    pub fn interruptible(&self) -> bool {
        self.interruptible
    }

    pub fn only_first_can_attack(&self) -> bool {
        self.second_charge.is_none()
    }

    pub fn contains(&self, fighter: FighterId) -> bool {
        self.first == fighter || self.second == fighter
    }

    /// Whether `fighter` strikes in this battle, as opposed to only being hit.
    pub fn is_attacker(&self, fighter: FighterId) -> bool {
        self.first == fighter || (self.second == fighter && self.second_charge.is_some())
    }

    pub fn opponent_of(&self, fighter: FighterId) -> Option<FighterId> {
        if fighter == self.first {
            Some(self.second)
        } else if fighter == self.second {
            Some(self.first)
        } else {
            None
        }
    }

    /// Pause or unpause. Returns whether the state changed; resolved battles
    /// never change.
    pub fn set_paused(&mut self, paused: bool) -> bool {
        let next = match (self.state, paused) {
            (BattleState::Active, true) => BattleState::Paused,
            (BattleState::Paused, false) => BattleState::Active,
            _ => return false,
        };
        self.state = next;
        true
    }

    /// Mark the battle finished without ticking it, e.g. when one side was
    /// torn down elsewhere.
    pub fn abandon(&mut self, survivor: Option<FighterId>) -> BattleOutcome {
        let outcome = BattleOutcome::Abandoned { survivor };
        self.state = BattleState::Resolved(outcome);
        outcome
    }

    /// Advance both attack timers by `dt` and land whatever attacks fall due,
    /// first side before second. Each side attacks at most once per tick.
    ///
    /// `first` and `second` must be the fighters this battle was built for.
    pub fn tick(
        &mut self,
        dt: f64,
        first: &mut Fighter,
        second: &mut Fighter,
    ) -> Result<TickReport, CombatError> {
        match self.state {
            BattleState::Paused => return Ok(TickReport::default()),
            BattleState::Resolved(_) => return Err(CombatError::BattleResolved(self.key())),
            BattleState::Active => {}
        }

        let mut report = TickReport::default();

        // Someone fell in another battle earlier this pass.
        let already_over = match (first.is_dead(), second.is_dead()) {
            (false, false) => None,
            (true, true) => Some(BattleOutcome::Abandoned { survivor: None }),
            (true, false) => Some(BattleOutcome::Won {
                winner: self.second,
                loser: self.first,
            }),
            (false, true) => Some(BattleOutcome::Won {
                winner: self.first,
                loser: self.second,
            }),
        };
        if let Some(outcome) = already_over {
            self.state = BattleState::Resolved(outcome);
            report.outcome = Some(outcome);
            return Ok(report);
        }

        self.first_charge += dt;
        if let Some(attack) = strike(&mut self.first_charge, first, self.first, second, self.second) {
            report.attacks.push(attack);
            if attack.killed {
                return Ok(self.finish(report, self.first, self.second));
            }
        }

        if let Some(charge) = self.second_charge.as_mut() {
            *charge += dt;
            if let Some(attack) = strike(charge, second, self.second, first, self.first) {
                report.attacks.push(attack);
                if attack.killed {
                    return Ok(self.finish(report, self.second, self.first));
                }
            }
        }

        Ok(report)
    }

    fn finish(&mut self, mut report: TickReport, winner: FighterId, loser: FighterId) -> TickReport {
        let outcome = BattleOutcome::Won { winner, loser };
        self.state = BattleState::Resolved(outcome);
        report.outcome = Some(outcome);
        report
    }
}

/// Land one attack if `charge` has reached the attacker's period.
fn strike(
    charge: &mut f64,
    attacker: &Fighter,
    attacker_id: FighterId,
    defender: &mut Fighter,
    defender_id: FighterId,
) -> Option<AttackReport> {
    let period = attacker.attack_period()?;
    if *charge + TIMER_EPSILON < period {
        return None;
    }
    *charge = 0.0;
    let damage = attacker.attack_strength();
    let outcome = defender.apply_damage(damage);
    Some(AttackReport {
        attacker: attacker_id,
        defender: defender_id,
        damage,
        remaining_health: outcome.health,
        killed: outcome.killed,
    })
}
