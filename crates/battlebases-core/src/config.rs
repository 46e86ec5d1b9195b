//! Match configuration: fighter archetypes, the purchase list, treasury rates
//! and battlefield layout.
//!
//! Configuration is read-only once a match starts. It can be loaded from JSON;
//! anything missing from the file falls back to the built-in defaults.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::*;
use crate::enums::FighterKind;

/// Errors raised while loading or validating a [`GameConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("offer '{offer}' refers to unknown archetype '{archetype}'")]
    UnknownArchetype { offer: String, archetype: String },

    #[error("offer '{offer}' sells '{archetype}', which is not a mobile unit")]
    NotPurchasable { offer: String, archetype: String },

    #[error("battlefield {role} refers to unknown archetype '{archetype}'")]
    MissingRole { role: &'static str, archetype: String },

    #[error("battlefield {role} '{archetype}' must be of kind {expected:?}")]
    WrongKind {
        role: &'static str,
        archetype: String,
        expected: FighterKind,
    },
}

/// Stats for one kind of entity, supplied when the entity is created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchetypeConfig {
    pub kind: FighterKind,
    pub health: u32,
    #[serde(default)]
    pub attack_strength: u32,
    /// Seconds between attacks. Zero or negative means the entity cannot attack.
    #[serde(default)]
    pub attack_period: f64,
    /// Distance covered per walk turn. Only meaningful for mobile units.
    #[serde(default)]
    pub walk_speed: f64,
    /// Length of a walk turn in seconds. Only meaningful for mobile units.
    #[serde(default)]
    pub turn_time: f64,
    pub reach: f64,
}

/// A unit that can be bought at an outpost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitOffer {
    pub name: String,
    pub archetype: String,
    pub cost: u32,
}

/// Per-team funding rates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreasuryConfig {
    pub starting_funds: u32,
    /// Funds released each turn. Non-positive values fall back to the default.
    pub funds_per_turn: i64,
    /// Length of a funding turn in seconds. Non-positive values fall back to the default.
    pub secs_per_turn: f64,
}

impl Default for TreasuryConfig {
    fn default() -> Self {
        Self {
            starting_funds: DEFAULT_STARTING_FUNDS,
            funds_per_turn: DEFAULT_FUNDS_PER_TURN as i64,
            secs_per_turn: DEFAULT_SECS_PER_TURN,
        }
    }
}

/// Which archetypes fill the fixed structures of each team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattlefieldConfig {
    pub main_base: String,
    /// Optional gun guarding the main base.
    pub defense_gun: Option<String>,
    pub outpost: String,
    /// Distance of each outpost from its team's base, toward the enemy.
    pub outpost_offsets: Vec<f64>,
}

impl Default for BattlefieldConfig {
    fn default() -> Self {
        Self {
            main_base: "main_base".into(),
            defense_gun: Some("defense_gun".into()),
            outpost: "outpost".into(),
            outpost_offsets: OUTPOST_OFFSETS.to_vec(),
        }
    }
}

/// The complete match configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub archetypes: BTreeMap<String, ArchetypeConfig>,
    pub purchase_list: Vec<UnitOffer>,
    pub treasury: TreasuryConfig,
    pub battlefield: BattlefieldConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        let mut archetypes = BTreeMap::new();
        archetypes.insert(
            "soldier".to_string(),
            ArchetypeConfig {
                kind: FighterKind::Mobile,
                health: SOLDIER_HEALTH,
                attack_strength: SOLDIER_ATTACK,
                attack_period: SOLDIER_PERIOD,
                walk_speed: SOLDIER_WALK_SPEED,
                turn_time: SOLDIER_TURN_TIME,
                reach: MELEE_REACH,
            },
        );
        archetypes.insert(
            "brute".to_string(),
            ArchetypeConfig {
                kind: FighterKind::Mobile,
                health: BRUTE_HEALTH,
                attack_strength: BRUTE_ATTACK,
                attack_period: BRUTE_PERIOD,
                walk_speed: BRUTE_WALK_SPEED,
                turn_time: BRUTE_TURN_TIME,
                reach: MELEE_REACH,
            },
        );
        archetypes.insert(
            "defense_gun".to_string(),
            ArchetypeConfig {
                kind: FighterKind::StaticDefense,
                health: DEFENSE_GUN_HEALTH,
                attack_strength: DEFENSE_GUN_ATTACK,
                attack_period: DEFENSE_GUN_PERIOD,
                walk_speed: 0.0,
                turn_time: 0.0,
                reach: DEFENSE_GUN_REACH,
            },
        );
        archetypes.insert(
            "outpost".to_string(),
            ArchetypeConfig {
                kind: FighterKind::Outpost,
                health: OUTPOST_HEALTH,
                attack_strength: 0,
                attack_period: 0.0,
                walk_speed: 0.0,
                turn_time: 0.0,
                reach: STRUCTURE_REACH,
            },
        );
        archetypes.insert(
            "main_base".to_string(),
            ArchetypeConfig {
                kind: FighterKind::MainBase,
                health: MAIN_BASE_HEALTH,
                attack_strength: 0,
                attack_period: 0.0,
                walk_speed: 0.0,
                turn_time: 0.0,
                reach: STRUCTURE_REACH,
            },
        );

        Self {
            archetypes,
            purchase_list: vec![
                UnitOffer {
                    name: "Soldier".into(),
                    archetype: "soldier".into(),
                    cost: SOLDIER_COST,
                },
                UnitOffer {
                    name: "Brute".into(),
                    archetype: "brute".into(),
                    cost: BRUTE_COST,
                },
            ],
            treasury: TreasuryConfig::default(),
            battlefield: BattlefieldConfig::default(),
        }
    }
}

impl GameConfig {
    /// Parse and validate a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn archetype(&self, name: &str) -> Option<&ArchetypeConfig> {
        self.archetypes.get(name)
    }

    pub fn offer(&self, name: &str) -> Option<&UnitOffer> {
        self.purchase_list.iter().find(|offer| offer.name == name)
    }

    /// Check cross references between offers, archetypes and the battlefield.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for offer in &self.purchase_list {
            let archetype = self.archetype(&offer.archetype).ok_or_else(|| {
                ConfigError::UnknownArchetype {
                    offer: offer.name.clone(),
                    archetype: offer.archetype.clone(),
                }
            })?;
            if archetype.kind != FighterKind::Mobile {
                return Err(ConfigError::NotPurchasable {
                    offer: offer.name.clone(),
                    archetype: offer.archetype.clone(),
                });
            }
        }

        let battlefield = &self.battlefield;
        self.check_role("main base", &battlefield.main_base, FighterKind::MainBase)?;
        self.check_role("outpost", &battlefield.outpost, FighterKind::Outpost)?;
        if let Some(gun) = &battlefield.defense_gun {
            self.check_role("defense gun", gun, FighterKind::StaticDefense)?;
        }
        Ok(())
    }

    fn check_role(
        &self,
        role: &'static str,
        name: &str,
        expected: FighterKind,
    ) -> Result<(), ConfigError> {
        let archetype = self.archetype(name).ok_or_else(|| ConfigError::MissingRole {
            role,
            archetype: name.to_string(),
        })?;
        if archetype.kind != expected {
            return Err(ConfigError::WrongKind {
                role,
                archetype: name.to_string(),
                expected,
            });
        }
        Ok(())
    }

    /// Replace unusable tuning values with documented defaults.
    /// Returns a description of every substitution made.
    pub fn sanitize(&mut self) -> Vec<String> {
        let mut fixes = Vec::new();

        for (name, archetype) in &mut self.archetypes {
            if archetype.kind != FighterKind::Mobile {
                continue;
            }
            if !(archetype.walk_speed > 0.0) {
                fixes.push(format!(
                    "archetype '{name}': walk_speed {} replaced with {SOLDIER_WALK_SPEED}",
                    archetype.walk_speed
                ));
                archetype.walk_speed = SOLDIER_WALK_SPEED;
            }
            if !(archetype.turn_time > 0.0) {
                fixes.push(format!(
                    "archetype '{name}': turn_time {} replaced with {SOLDIER_TURN_TIME}",
                    archetype.turn_time
                ));
                archetype.turn_time = SOLDIER_TURN_TIME;
            }
        }

        let treasury = &mut self.treasury;
        if treasury.funds_per_turn <= 0 {
            fixes.push(format!(
                "treasury: funds_per_turn {} replaced with {DEFAULT_FUNDS_PER_TURN}",
                treasury.funds_per_turn
            ));
            treasury.funds_per_turn = DEFAULT_FUNDS_PER_TURN as i64;
        }
        if !(treasury.secs_per_turn > 0.0) {
            fixes.push(format!(
                "treasury: secs_per_turn {} replaced with {DEFAULT_SECS_PER_TURN}",
                treasury.secs_per_turn
            ));
            treasury.secs_per_turn = DEFAULT_SECS_PER_TURN;
        }

        fixes
    }
}
