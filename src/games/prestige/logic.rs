//! Progression rules: clicking, prestiging, buying upgrades, resetting.
//!
//! Every function takes the state explicitly and reports what happened
//! through an outcome enum. Rejected operations leave the state untouched.

use crate::confirm::Confirm;

use super::config::GameConfig;
use super::state::{ProgressionState, UiState};

pub const PRESTIGE_CONFIRM: &str = "Are you sure you want to prestige? This will reset your score, \
     while adding 1 to your number gain and doubling the goal. You will also receive a Prestige point.";

/// Asked in order before a full reset; every one must be accepted.
pub const RESET_CONFIRMS: [&str; 3] = [
    "Do you want to reset your save? You will lose everything!",
    "Are you sure about this? There is no way to get your save back!",
    "This is your last warning!",
];

#[derive(Clone, Debug, PartialEq)]
pub enum PrestigeOutcome {
    /// Prestiged and earned `points`.
    Prestiged { points: f64 },
    /// The first-prestige confirmation was refused.
    Declined,
    /// Score is below the goal.
    NotReady,
}

#[derive(Clone, Debug, PartialEq)]
pub enum PurchaseOutcome {
    Purchased { slot: usize, price: f64 },
    Unaffordable { slot: usize },
    UnknownSlot { slot: usize },
}

#[derive(Clone, Debug, PartialEq)]
pub enum ResetOutcome {
    Reset,
    /// Refused at confirmation `stage` (0-based).
    Declined { stage: usize },
}

/// Manual click: add the effective gain to the score.
pub fn click(state: &mut ProgressionState) -> f64 {
    let gain = state.effective_gain();
    state.score += gain;
    gain
}

/// Reset the score for permanent gain and prestige points.
///
/// The very first prestige asks `confirm` before doing anything.
pub fn prestige(
    state: &mut ProgressionState,
    config: &GameConfig,
    confirm: &mut dyn Confirm,
) -> PrestigeOutcome {
    if !state.can_prestige() {
        return PrestigeOutcome::NotReady;
    }
    if state.prestiges == 0 && !confirm.ask(PRESTIGE_CONFIRM) {
        return PrestigeOutcome::Declined;
    }

    // Awarded from the upgrade state as it was before the reset.
    let points = state.prestige_point_gain();

    state.score = 0.0;
    state.base_gain += config.gain_step;
    state.base_goal *= config.goal_multiplier;
    state.prestiges = state.prestiges.saturating_add(1);
    state.prestige_points += points;

    PrestigeOutcome::Prestiged { points }
}

/// Spend prestige points on an upgrade slot.
///
/// A successful purchase also restarts the current run: score, base gain
/// and base goal go back to their starting values, whichever slot was
/// bought.
pub fn buy_upgrade(
    state: &mut ProgressionState,
    config: &GameConfig,
    slot: usize,
) -> PurchaseOutcome {
    let Some(upgrade) = state.upgrades.get_mut(slot) else {
        return PurchaseOutcome::UnknownSlot { slot };
    };
    let price = upgrade.cost;
    if state.prestige_points < price {
        return PurchaseOutcome::Unaffordable { slot };
    }

    upgrade.amount = upgrade.amount.saturating_add(1);
    upgrade.cost *= upgrade.cost_scaling;
    state.prestige_points -= price;

    state.score = 0.0;
    state.base_gain = config.initial_gain;
    state.base_goal = config.initial_goal;

    PurchaseOutcome::Purchased { slot, price }
}

/// Wipe everything back to a fresh state after three confirmations.
/// Persisting the result is the caller's job.
pub fn reset_all(
    state: &mut ProgressionState,
    config: &GameConfig,
    confirm: &mut dyn Confirm,
) -> ResetOutcome {
    for (stage, message) in RESET_CONFIRMS.iter().enumerate() {
        if !confirm.ask(message) {
            return ResetOutcome::Declined { stage };
        }
    }
    *state = ProgressionState::initial(config);
    ResetOutcome::Reset
}

pub fn set_theme(state: &mut ProgressionState, theme: &str) {
    state.theme = theme.to_string();
}

pub fn set_ui_state(state: &mut ProgressionState, ui_state: UiState) {
    state.ui_state = ui_state;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::confirm::testing::ScriptedConfirm;

    fn config() -> GameConfig {
        GameConfig::default()
    }

    #[test]
    fn click_adds_base_gain() {
        let mut state = ProgressionState::default();
        assert_eq!(click(&mut state), 1.0);
        assert_eq!(state.score, 1.0);
    }

    #[test]
    fn click_includes_additive_upgrade() {
        let mut state = ProgressionState::default();
        state.base_gain = 2.0;
        state.upgrades[1].amount = 3;
        click(&mut state);
        click(&mut state);
        assert_eq!(state.score, 10.0);
    }

    #[test]
    fn first_prestige_confirmed() {
        let mut state = ProgressionState::default();
        state.score = 10.0;
        let mut confirm = ScriptedConfirm::new(&[true]);
        let outcome = prestige(&mut state, &config(), &mut confirm);
        assert_eq!(outcome, PrestigeOutcome::Prestiged { points: 1.0 });
        assert_eq!(state.score, 0.0);
        assert_eq!(state.base_gain, 2.0);
        assert_eq!(state.base_goal, 20.0);
        assert_eq!(state.prestiges, 1);
        assert_eq!(state.prestige_points, 1.0);
        assert_eq!(confirm.asked, vec![PRESTIGE_CONFIRM]);
    }

    #[test]
    fn declined_first_prestige_changes_nothing_and_asks_again() {
        let mut state = ProgressionState::default();
        state.score = 12.0;
        let before = state.clone();
        let mut confirm = ScriptedConfirm::new(&[false, false]);

        assert_eq!(
            prestige(&mut state, &config(), &mut confirm),
            PrestigeOutcome::Declined
        );
        assert_eq!(state, before);

        assert_eq!(
            prestige(&mut state, &config(), &mut confirm),
            PrestigeOutcome::Declined
        );
        assert_eq!(state, before);
        assert_eq!(confirm.asked.len(), 2);
    }

    #[test]
    fn later_prestiges_skip_confirmation() {
        let mut state = ProgressionState::default();
        state.prestiges = 1;
        state.base_goal = 20.0;
        state.score = 20.0;
        let mut confirm = ScriptedConfirm::new(&[]);
        let outcome = prestige(&mut state, &config(), &mut confirm);
        assert_eq!(outcome, PrestigeOutcome::Prestiged { points: 1.0 });
        assert!(confirm.asked.is_empty());
        assert_eq!(state.prestiges, 2);
        assert_eq!(state.base_goal, 40.0);
    }

    #[test]
    fn prestige_below_goal_is_not_ready() {
        let mut state = ProgressionState::default();
        state.score = 9.0;
        let before = state.clone();
        let mut confirm = ScriptedConfirm::always_yes();
        assert_eq!(
            prestige(&mut state, &config(), &mut confirm),
            PrestigeOutcome::NotReady
        );
        assert_eq!(state, before);
        assert!(confirm.asked.is_empty());
    }

    #[test]
    fn prestige_uses_reduced_goal() {
        let mut state = ProgressionState::default();
        state.prestiges = 1;
        state.upgrades[2].amount = 1; // goal 10 * 0.9 = 9
        state.score = 9.5;
        let mut confirm = ScriptedConfirm::new(&[]);
        assert!(matches!(
            prestige(&mut state, &config(), &mut confirm),
            PrestigeOutcome::Prestiged { .. }
        ));
    }

    #[test]
    fn prestige_points_scale_with_multiplier_upgrade() {
        let mut state = ProgressionState::default();
        state.prestiges = 3;
        state.upgrades[0].amount = 2;
        state.score = 10.0;
        state.prestige_points = 1.0;
        let mut confirm = ScriptedConfirm::new(&[]);
        prestige(&mut state, &config(), &mut confirm);
        assert_eq!(state.prestige_points, 5.0);
    }

    #[test]
    fn buy_upgrade_mini_resets_the_run() {
        let mut state = ProgressionState::default();
        state.score = 500.0;
        state.base_gain = 3.0;
        state.base_goal = 40.0;
        state.prestige_points = 2.0;

        let outcome = buy_upgrade(&mut state, &config(), 0);
        assert_eq!(outcome, PurchaseOutcome::Purchased { slot: 0, price: 2.0 });
        assert_eq!(state.score, 0.0);
        assert_eq!(state.base_gain, 1.0);
        assert_eq!(state.base_goal, 10.0);
        assert_eq!(state.upgrades[0].amount, 1);
        assert_eq!(state.upgrades[0].cost, 10.0);
        assert_eq!(state.prestige_points, 0.0);
    }

    #[test]
    fn mini_reset_keeps_prestige_count() {
        let mut state = ProgressionState::default();
        state.prestiges = 4;
        state.prestige_points = 5.0;
        buy_upgrade(&mut state, &config(), 2);
        assert_eq!(state.prestiges, 4);
        assert_eq!(state.prestige_points, 0.0);
        assert_eq!(state.upgrades[2].cost, 25.0);
    }

    #[test]
    fn buy_upgrade_unaffordable_is_a_no_op() {
        let mut state = ProgressionState::default();
        state.score = 77.0;
        state.prestige_points = 3.0;
        let before = state.clone();
        assert_eq!(
            buy_upgrade(&mut state, &config(), 1),
            PurchaseOutcome::Unaffordable { slot: 1 }
        );
        assert_eq!(state, before);
    }

    #[test]
    fn buy_upgrade_unknown_slot_is_a_no_op() {
        let mut state = ProgressionState::default();
        state.prestige_points = 100.0;
        let before = state.clone();
        assert_eq!(
            buy_upgrade(&mut state, &config(), 3),
            PurchaseOutcome::UnknownSlot { slot: 3 }
        );
        assert_eq!(state, before);
    }

    #[test]
    fn repeated_purchases_grow_cost_geometrically() {
        let mut state = ProgressionState::default();
        state.prestige_points = 1e9;
        for _ in 0..4 {
            buy_upgrade(&mut state, &config(), 1);
        }
        assert_eq!(state.upgrades[1].amount, 4);
        assert_eq!(state.upgrades[1].cost, 4.0 * 5f64.powi(4));
        let spent = 4.0 + 20.0 + 100.0 + 500.0;
        assert_eq!(state.prestige_points, 1e9 - spent);
    }

    #[test]
    fn reset_all_after_three_confirmations() {
        let mut state = ProgressionState::default();
        state.theme = "light".to_string();
        state.ui_state = UiState::Options;
        state.score = 99.0;
        state.prestiges = 7;
        state.prestige_points = 30.0;
        state.upgrades[1].amount = 2;
        state.upgrades[1].cost = 100.0;
        let mut confirm = ScriptedConfirm::new(&[true, true, true]);

        assert_eq!(reset_all(&mut state, &config(), &mut confirm), ResetOutcome::Reset);
        assert_eq!(state, ProgressionState::default());
        assert_eq!(confirm.asked, RESET_CONFIRMS.to_vec());
    }

    #[test]
    fn reset_all_declined_at_each_stage() {
        for stage in 0..3 {
            let mut answers = vec![true; stage];
            answers.push(false);
            let mut confirm = ScriptedConfirm::new(&answers);
            let mut state = ProgressionState::default();
            state.score = 42.0;
            let before = state.clone();

            assert_eq!(
                reset_all(&mut state, &config(), &mut confirm),
                ResetOutcome::Declined { stage }
            );
            assert_eq!(state, before);
            assert_eq!(confirm.asked.len(), stage + 1);
        }
    }

    #[test]
    fn setters_are_unguarded() {
        let mut state = ProgressionState::default();
        set_theme(&mut state, "light");
        set_ui_state(&mut state, UiState::Options);
        assert_eq!(state.theme, "light");
        assert_eq!(state.ui_state, UiState::Options);
        set_ui_state(&mut state, UiState::Options);
        assert_eq!(state.ui_state, UiState::Options);
    }

    #[test]
    fn prestige_count_saturates_at_the_top() {
        let mut state =
            crate::games::prestige::save::decode("dark|main|10|10|1|18446744073709551615|0");
        assert_eq!(state.prestiges, u64::MAX);
        let mut confirm = ScriptedConfirm::new(&[]);
        assert_eq!(
            prestige(&mut state, &config(), &mut confirm),
            PrestigeOutcome::Prestiged { points: 1.0 }
        );
        assert_eq!(state.prestiges, u64::MAX);
        assert!(confirm.asked.is_empty());
    }

    #[test]
    fn purchase_count_saturates_at_the_top() {
        let mut state = ProgressionState::default();
        state.upgrades[1].amount = u32::MAX;
        state.prestige_points = 4.0;
        assert_eq!(
            buy_upgrade(&mut state, &config(), 1),
            PurchaseOutcome::Purchased { slot: 1, price: 4.0 }
        );
        assert_eq!(state.upgrades[1].amount, u32::MAX);
    }
}
