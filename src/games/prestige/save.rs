//! Save string encode/decode.
//!
//! ## Format
//!
//! One line, `|`-separated, always in this order:
//!
//! ```text
//! theme|ui|score|goal|gain|prestiges|points|cost0|amount0|cost1|amount1|cost2|amount2
//! ```
//!
//! e.g. `dark|main|0|10|1|0|0|2|0|4|0|5|0`.
//!
//! ## Compatibility
//!
//! Fields are only ever appended. Older saves with fewer fields load with
//! the missing tail taken from the fresh-state defaults. A field that is
//! present but unreadable (not a number, negative where that is impossible)
//! is treated the same as a missing one and logged as corrupt, so one bad
//! field never poisons the rest of the run.
//!
//! `cost_scaling` and the boost kind are balance data, not save data; only
//! the current `cost` is stored.

use super::state::{ProgressionState, UiState, UPGRADE_SLOTS};

pub const DELIMITER: char = '|';

/// セーブに書ける upgrade amount の上限。効果計算では `i32` の指数になるため、
/// これを超える値は壊れたフィールドとして扱う。
const MAX_AMOUNT: u64 = i32::MAX as u64;

/// Fields written by [`encode`].
pub const FIELD_COUNT: usize = 7 + 2 * UPGRADE_SLOTS;

const FIELD_NAMES: [&str; FIELD_COUNT] = [
    "theme",
    "ui_state",
    "score",
    "goal",
    "gain",
    "prestiges",
    "prestige_points",
    "upgrade0.cost",
    "upgrade0.amount",
    "upgrade1.cost",
    "upgrade1.amount",
    "upgrade2.cost",
    "upgrade2.amount",
];

/// Serialize the state into a save string.
pub fn encode(state: &ProgressionState) -> String {
    let mut fields: Vec<String> = vec![
        state.theme.clone(),
        state.ui_state.as_str().to_string(),
        state.score.to_string(),
        state.base_goal.to_string(),
        state.base_gain.to_string(),
        state.prestiges.to_string(),
        state.prestige_points.to_string(),
    ];
    for upgrade in &state.upgrades {
        fields.push(upgrade.cost.to_string());
        fields.push(upgrade.amount.to_string());
    }
    fields.join(&DELIMITER.to_string())
}

/// Decode a save string, filling gaps from a fresh default state.
pub fn decode(raw: &str) -> ProgressionState {
    decode_with(raw, &ProgressionState::default())
}

/// Decode a save string, filling gaps from `defaults`.
///
/// Never fails: every field that is missing or unreadable keeps the value
/// from `defaults`.
pub fn decode_with(raw: &str, defaults: &ProgressionState) -> ProgressionState {
    let fields: Vec<&str> = raw.split(DELIMITER).collect();
    let mut state = defaults.clone();

    if let Some(theme) = field(&fields, 0) {
        if theme.is_empty() {
            corrupt(0, theme);
        } else {
            state.theme = theme.to_string();
        }
    }
    if let Some(ui) = field(&fields, 1) {
        match UiState::parse(ui) {
            Some(ui_state) => state.ui_state = ui_state,
            None => corrupt(1, ui),
        }
    }

    read_number(&fields, 2, |v| v >= 0.0, &mut state.score);
    read_number(&fields, 3, |v| v > 0.0, &mut state.base_goal);
    read_number(&fields, 4, |v| v >= 1.0, &mut state.base_gain);
    read_count(&fields, 5, u64::MAX, &mut state.prestiges);
    read_number(&fields, 6, |v| v >= 0.0, &mut state.prestige_points);

    for (slot, upgrade) in state.upgrades.iter_mut().enumerate() {
        let base = 7 + slot * 2;
        read_number(&fields, base, |v| v > 0.0, &mut upgrade.cost);
        let mut amount = u64::from(upgrade.amount);
        read_count(&fields, base + 1, MAX_AMOUNT, &mut amount);
        upgrade.amount = u32::try_from(amount).unwrap_or(upgrade.amount);
    }

    state
}

fn field<'a>(fields: &[&'a str], index: usize) -> Option<&'a str> {
    fields.get(index).copied()
}

fn corrupt(index: usize, raw: &str) {
    log::warn!(
        "save field `{}` is corrupt ({:?}), using the default",
        FIELD_NAMES[index],
        raw
    );
}

/// Integer-valued number: fractional parts are dropped, the way an integer
/// parse of `"12.7"` reads `12`.
fn parse_integer(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .map(f64::trunc)
}

fn read_number(fields: &[&str], index: usize, valid: impl Fn(f64) -> bool, out: &mut f64) {
    let Some(raw) = field(fields, index) else {
        return;
    };
    match parse_integer(raw).filter(|v| valid(*v)) {
        Some(v) => *out = v,
        None => corrupt(index, raw),
    }
}

/// Read a whole count in `0..=max`. Anything larger is corrupt.
fn read_count(fields: &[&str], index: usize, max: u64, out: &mut u64) {
    let Some(raw) = field(fields, index) else {
        return;
    };
    match parse_integer(raw).filter(|v| *v >= 0.0 && *v <= max as f64) {
        Some(v) => *out = v as u64,
        None => corrupt(index, raw),
    }
}
