//! Team treasuries: funds released on a fixed turn and spent on purchases.

use std::collections::BTreeMap;

use battlebases_core::config::TreasuryConfig;
use battlebases_core::constants::{DEFAULT_FUNDS_PER_TURN, DEFAULT_SECS_PER_TURN, TIMER_EPSILON};
use battlebases_core::enums::Team;

/// One team's funds.
#[derive(Debug, Clone, PartialEq)]
pub struct Treasury {
    pub funds: u32,
    pub funds_per_turn: u32,
    pub secs_per_turn: f64,
    /// Time accumulated toward the next funding turn.
    timer: f64,
}

impl Treasury {
    /// Build from configuration, falling back to the defaults for rates that
    /// are not positive.
    pub fn from_config(config: &TreasuryConfig) -> Self {
        let funds_per_turn = u32::try_from(config.funds_per_turn)
            .ok()
            .filter(|&funds| funds > 0)
            .unwrap_or(DEFAULT_FUNDS_PER_TURN);
        let secs_per_turn = if config.secs_per_turn > 0.0 {
            config.secs_per_turn
        } else {
            DEFAULT_SECS_PER_TURN
        };
        Self {
            funds: config.starting_funds,
            funds_per_turn,
            secs_per_turn,
            timer: 0.0,
        }
    }

    /// Advance the funding clock, releasing funds for every completed turn.
    /// Returns the amount released.
    pub fn tick(&mut self, dt: f64) -> u32 {
        self.timer += dt;
        let mut released = 0u32;
        while self.timer + TIMER_EPSILON >= self.secs_per_turn {
            self.timer -= self.secs_per_turn;
            released = released.saturating_add(self.funds_per_turn);
        }
        self.funds = self.funds.saturating_add(released);
        released
    }

    pub fn can_afford(&self, cost: u32) -> bool {
        self.funds >= cost
    }

    /// Take `cost` out of the treasury. Refused if it would go negative.
    pub fn spend(&mut self, cost: u32) -> bool {
        match self.funds.checked_sub(cost) {
            Some(rest) => {
                self.funds = rest;
                true
            }
            None => false,
        }
    }
}

/// Advance every team's funding clock.
pub fn run(treasuries: &mut BTreeMap<Team, Treasury>, dt: f64) {
    for treasury in treasuries.values_mut() {
        treasury.tick(dt);
    }
}
