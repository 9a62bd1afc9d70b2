//! Balance configuration.
//!
//! The numbers that shape a run (starting gain and goal, upgrade prices,
//! autosave cadence, number formatting) live in `assets/balance.json` and
//! are embedded at build time. Every struct is `#[serde(default)]`, so a
//! document only needs the keys it wants to change.

use serde::{Deserialize, Serialize};

use super::format;
use super::state::{BoostKind, UPGRADE_SLOTS};

const EMBEDDED_BALANCE: &str = include_str!("../../../assets/balance.json");

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpgradeConfig {
    pub name: String,
    pub description: String,
    pub cost: f64,
    pub cost_scaling: f64,
    pub boost: BoostKind,
}

impl Default for UpgradeConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            cost: 1.0,
            cost_scaling: 5.0,
            boost: BoostKind::Additive,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatConfig {
    /// Values at or above this switch to scientific notation.
    pub threshold: f64,
    /// Decimal places kept when rounding.
    pub precision: u32,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            threshold: format::DEFAULT_THRESHOLD,
            precision: format::DEFAULT_PRECISION,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub initial_gain: f64,
    pub initial_goal: f64,
    /// Added to the base gain on every prestige.
    pub gain_step: f64,
    /// Multiplies the base goal on every prestige.
    pub goal_multiplier: f64,
    pub default_theme: String,
    /// Themes offered by the theme selector.
    pub themes: Vec<String>,
    pub upgrades: [UpgradeConfig; UPGRADE_SLOTS],
    pub ticks_per_sec: u32,
    pub autosave_secs: u32,
    pub format: FormatConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            initial_gain: 1.0,
            initial_goal: 10.0,
            gain_step: 1.0,
            goal_multiplier: 2.0,
            default_theme: "dark".to_string(),
            themes: vec!["dark".to_string(), "light".to_string()],
            upgrades: [
                UpgradeConfig {
                    name: "Point Multiplier".to_string(),
                    description: "Doubles prestige points per prestige".to_string(),
                    cost: 2.0,
                    cost_scaling: 5.0,
                    boost: BoostKind::Exponential,
                },
                UpgradeConfig {
                    name: "Number Gain".to_string(),
                    description: "+1 to every click".to_string(),
                    cost: 4.0,
                    cost_scaling: 5.0,
                    boost: BoostKind::Additive,
                },
                UpgradeConfig {
                    name: "Cheaper Goal".to_string(),
                    description: "Prestige goal x0.9".to_string(),
                    cost: 5.0,
                    cost_scaling: 5.0,
                    boost: BoostKind::DecayMultiplier,
                },
            ],
            ticks_per_sec: 10,
            autosave_secs: 5,
            format: FormatConfig::default(),
        }
    }
}

impl GameConfig {
    /// Parse a balance document. Missing keys fall back to the defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// The balance document compiled into the binary, or the defaults if
    /// it does not parse.
    pub fn embedded() -> Self {
        match Self::from_json(EMBEDDED_BALANCE) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("balance.json is invalid, using built-in defaults: {e}");
                Self::default()
            }
        }
    }

    /// Ticks between two autosaves.
    pub fn autosave_interval_ticks(&self) -> u32 {
        (self.ticks_per_sec * self.autosave_secs).max(1)
    }
}
