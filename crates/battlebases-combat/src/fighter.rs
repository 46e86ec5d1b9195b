//! The combat record of one combatant.

use serde::{Deserialize, Serialize};

use battlebases_core::config::ArchetypeConfig;
use battlebases_core::enums::{FighterKind, Team};

/// Health and attack state of one combatant.
///
/// `health` only moves through [`Fighter::apply_damage`], so `is_dead` always
/// matches `health == 0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fighter {
    pub kind: FighterKind,
    pub team: Team,
    health: u32,
    max_health: u32,
    attack_strength: u32,
    /// `None` when the fighter cannot attack.
    attack_period: Option<f64>,
    is_dead: bool,
}

/// Result of a single [`Fighter::apply_damage`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DamageOutcome {
    pub health: u32,
    /// True only on the call that took health to zero.
    pub killed: bool,
}

impl Fighter {
    /// Build a fighter. A non-positive or non-finite `attack_period`, or a kind
    /// that never attacks, leaves the fighter unarmed.
    pub fn new(
        kind: FighterKind,
        team: Team,
        health: u32,
        attack_strength: u32,
        attack_period: f64,
    ) -> Self {
        let armed = kind.can_ever_attack() && attack_period.is_finite() && attack_period > 0.0;
        Self {
            kind,
            team,
            health,
            max_health: health,
            attack_strength,
            attack_period: armed.then_some(attack_period),
            is_dead: health == 0,
        }
    }

    pub fn from_archetype(team: Team, archetype: &ArchetypeConfig) -> Self {
        Self::new(
            archetype.kind,
            team,
            archetype.health,
            archetype.attack_strength,
            archetype.attack_period,
        )
    }

    pub fn health(&self) -> u32 {
        self.health
    }

    pub fn max_health(&self) -> u32 {
        self.max_health
    }

    pub fn attack_strength(&self) -> u32 {
        self.attack_strength
    }

    pub fn attack_period(&self) -> Option<f64> {
        self.attack_period
    }

    pub fn is_dead(&self) -> bool {
        self.is_dead
    }

    /// Subtract `amount` from health, clamping at zero. Dead fighters stay dead
    /// and ignore further damage.
    pub fn apply_damage(&mut self, amount: u32) -> DamageOutcome {
        if self.is_dead {
            return DamageOutcome {
                health: 0,
                killed: false,
            };
        }
        self.health = self.health.saturating_sub(amount);
        self.is_dead = self.health == 0;
        DamageOutcome {
            health: self.health,
            killed: self.is_dead,
        }
    }

    pub fn can_attack(&self) -> bool {
        self.attack_period.is_some() && !self.is_dead
    }

    pub fn can_be_targeted(&self) -> bool {
        self.kind.can_be_targeted()
    }

    pub fn is_structure(&self) -> bool {
        self.kind.is_structure()
    }
}
