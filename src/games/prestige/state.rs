/// Prestige Clicker game state definitions.
use serde::{Deserialize, Serialize};

use super::config::GameConfig;

/// Number of upgrade slots. The slot order is fixed and doubles as the
/// field order in the save string.
pub const UPGRADE_SLOTS: usize = 3;

/// How an upgrade's purchase count turns into an effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoostKind {
    /// `2^amount`. Multiplies prestige point gain.
    Exponential,
    /// `amount`. Added to click gain.
    Additive,
    /// `0.9^amount`. Shrinks the prestige goal.
    DecayMultiplier,
}

impl BoostKind {
    /// Effect magnitude after `amount` purchases.
    pub fn effect(self, amount: u32) -> f64 {
        let exponent = i32::try_from(amount).unwrap_or(i32::MAX);
        match self {
            BoostKind::Exponential => 2f64.powi(exponent),
            BoostKind::Additive => amount as f64,
            BoostKind::DecayMultiplier => 0.9f64.powi(exponent),
        }
    }
}

/// A prestige upgrade slot.
#[derive(Clone, Debug, PartialEq)]
pub struct Upgrade {
    /// Current purchase price in prestige points.
    pub cost: f64,
    /// Multiplier applied to `cost` after each purchase.
    pub cost_scaling: f64,
    /// Times purchased.
    pub amount: u32,
    pub boost: BoostKind,
}

impl Upgrade {
    pub fn effect(&self) -> f64 {
        self.boost.effect(self.amount)
    }

    /// Effect the slot would have after one more purchase.
    pub fn next_effect(&self) -> f64 {
        self.boost.effect(self.amount.saturating_add(1))
    }
}

/// Which top-level screen is shown.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UiState {
    #[default]
    Main,
    Options,
}

impl UiState {
    /// Word used in the save string.
    pub fn as_str(self) -> &'static str {
        match self {
            UiState::Main => "main",
            UiState::Options => "options",
        }
    }

    pub fn parse(s: &str) -> Option<UiState> {
        match s {
            "main" => Some(UiState::Main),
            "options" => Some(UiState::Options),
            _ => None,
        }
    }
}

/// Everything that survives a save/load cycle.
#[derive(Clone, Debug, PartialEq)]
pub struct ProgressionState {
    pub theme: String,
    pub ui_state: UiState,
    pub score: f64,
    pub base_gain: f64,
    pub base_goal: f64,
    pub prestiges: u64,
    pub prestige_points: f64,
    pub upgrades: [Upgrade; UPGRADE_SLOTS],
}

impl ProgressionState {
    /// Fresh state built from the balance configuration.
    pub fn initial(config: &GameConfig) -> Self {
        Self {
            theme: config.default_theme.clone(),
            ui_state: UiState::Main,
            score: 0.0,
            base_gain: config.initial_gain,
            base_goal: config.initial_goal,
            prestiges: 0,
            prestige_points: 0.0,
            upgrades: config.upgrades.clone().map(|u| Upgrade {
                cost: u.cost,
                cost_scaling: u.cost_scaling,
                amount: 0,
                boost: u.boost,
            }),
        }
    }

    /// Score added per click.
    pub fn effective_gain(&self) -> f64 {
        self.base_gain + self.upgrades[1].effect()
    }

    /// Score needed to prestige.
    pub fn effective_goal(&self) -> f64 {
        self.base_goal * self.upgrades[2].effect()
    }

    /// Prestige points awarded by the next prestige.
    pub fn prestige_point_gain(&self) -> f64 {
        self.upgrades[0].effect()
    }

    pub fn can_prestige(&self) -> bool {
        self.score >= self.effective_goal()
    }

    pub fn can_afford(&self, slot: usize) -> bool {
        self.upgrades
            .get(slot)
            .is_some_and(|u| self.prestige_points >= u.cost)
    }

    /// Progress towards the goal, clamped to `0.0..=1.0`.
    pub fn goal_progress(&self) -> f64 {
        let goal = self.effective_goal();
        if goal <= 0.0 {
            return 1.0;
        }
        (self.score / goal).clamp(0.0, 1.0)
    }
}

impl Default for ProgressionState {
    fn default() -> Self {
        Self::initial(&GameConfig::default())
    }
}
