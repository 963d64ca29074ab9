//! Tunables for the coordination core, grouped by concern.
//!
//! Every group deserializes with defaults, so a configuration file only needs to name
//! what it changes:
//!
//! ```json
//! { "squad": { "min_headcount": 6 }, "timing": { "attack_threshold": 200 } }
//! ```

use crate::error::ConfigError;
use crate::transfer::TransferPolicy;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwarmConfig {
    pub squad: SquadConfig,
    pub timing: TimingConfig,
    pub election: ElectionConfig,
    pub arbitration: ArbitrationConfig,
    pub movement: MovementConfig,
    pub combat: CombatConfig,
    pub heal: HealConfig,
    pub spawn: SpawnConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SquadConfig {
    /// Claims whose member count has reached this are ignored.
    pub max_squad_size: usize,
    /// Sensed allies (excluding the leader) below which the squad spawns.
    pub min_headcount: usize,
}

impl Default for SquadConfig {
    fn default() -> Self {
        SquadConfig {
            max_squad_size: 4,
            min_headcount: 4,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub wake_threshold: u32,
    pub attack_threshold: u32,
    /// Ticks without a directive before a member stops trusting its last one.
    pub leader_timeout: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        TimingConfig {
            wake_threshold: 70,
            attack_threshold: 150,
            leader_timeout: 20,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElectionConfig {
    pub patience: u32,
    pub stagger: u32,
}

impl Default for ElectionConfig {
    fn default() -> Self {
        ElectionConfig { patience: 0, stagger: 4 }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArbitrationConfig {
    pub finder_timeout: u32,
    /// Chebyshev range at which a sensed enemy unit turns the directive into Defend.
    pub engagement_range: u32,
}

impl Default for ArbitrationConfig {
    fn default() -> Self {
        ArbitrationConfig {
            finder_timeout: 30,
            engagement_range: 3,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    /// The leader only advances while every allied coordinator is this close.
    pub cohesion_radius: f64,
    pub leader_leash: f64,
}

impl Default for MovementConfig {
    fn default() -> Self {
        MovementConfig {
            cohesion_radius: 8.0,
            leader_leash: 12.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    pub retreat_fraction: f64,
    pub evolve_fraction: f64,
}

impl Default for CombatConfig {
    fn default() -> Self {
        CombatConfig {
            retreat_fraction: 0.5,
            evolve_fraction: 0.75,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealConfig {
    /// Absolute energy a healer must exceed before giving anything.
    pub floor: f64,
    /// Energy a healer always keeps.
    pub upkeep_reserve: f64,
    /// Allies below this fraction of max energy need healing.
    pub heal_fraction: f64,
    /// A scout below this heads back to its leader instead of healing.
    pub medic_floor: f64,
}

impl Default for HealConfig {
    fn default() -> Self {
        HealConfig {
            floor: 9.375,
            upkeep_reserve: 1.0,
            heal_fraction: 0.5,
            medic_floor: 20.0,
        }
    }
}

impl HealConfig {
    pub fn policy(&self) -> TransferPolicy {
        TransferPolicy {
            floor: self.floor,
            upkeep_reserve: self.upkeep_reserve,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    pub cost: f64,
    /// Spawn only above `cost * energy_factor`.
    pub energy_factor: f64,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        SpawnConfig {
            cost: 20.0,
            energy_factor: 2.0,
        }
    }
}

impl SwarmConfig {
    pub fn from_json_str(raw: &str) -> Result<SwarmConfig, ConfigError> {
        let config: SwarmConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<SwarmConfig, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        SwarmConfig::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.squad.max_squad_size < 1 {
            return Err(ConfigError::Invalid("squad.max_squad_size must be at least 1".to_string()));
        }
        if self.election.stagger < 1 {
            return Err(ConfigError::Invalid("election.stagger must be at least 1".to_string()));
        }
        if self.timing.wake_threshold > self.timing.attack_threshold {
            return Err(ConfigError::Invalid(format!(
                "timing.wake_threshold ({}) exceeds timing.attack_threshold ({})",
                self.timing.wake_threshold, self.timing.attack_threshold
            )));
        }
        if self.heal.upkeep_reserve < 0.0 || self.heal.floor < self.heal.upkeep_reserve {
            return Err(ConfigError::Invalid(format!(
                "heal.floor ({}) must be at least heal.upkeep_reserve ({}) and the reserve non-negative",
                self.heal.floor, self.heal.upkeep_reserve
            )));
        }
        for (name, fraction) in [
            ("combat.retreat_fraction", self.combat.retreat_fraction),
            ("combat.evolve_fraction", self.combat.evolve_fraction),
            ("heal.heal_fraction", self.heal.heal_fraction),
        ] {
            if !(0.0..=1.0).contains(&fraction) {
                return Err(ConfigError::Invalid(format!("{} must be within 0..=1, got {}", name, fraction)));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_files_keep_defaults() {
        let config = SwarmConfig::from_json_str(r#"{ "squad": { "min_headcount": 6 } }"#).unwrap();

        assert_eq!(config.squad.min_headcount, 6);
        assert_eq!(config.squad.max_squad_size, 4);
        assert_eq!(config.timing, TimingConfig::default());
    }

    #[test]
    fn empty_object_is_the_default() {
        assert_eq!(SwarmConfig::from_json_str("{}").unwrap(), SwarmConfig::default());
    }

    #[test]
    fn inverted_thresholds_are_rejected() {
        let raw = r#"{ "timing": { "wake_threshold": 200, "attack_threshold": 100 } }"#;

        assert!(matches!(SwarmConfig::from_json_str(raw), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn heal_floor_below_reserve_is_rejected() {
        let raw = r#"{ "heal": { "floor": 1.0, "upkeep_reserve": 5.0 } }"#;

        assert!(matches!(SwarmConfig::from_json_str(raw), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(SwarmConfig::from_json_str("{ squad"), Err(ConfigError::Parse(_))));
    }
}
