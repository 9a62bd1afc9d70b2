/// Prestige Clicker: click to a goal, prestige for points, spend the
/// points on upgrades.
pub mod actions;
pub mod config;
pub mod format;
pub mod logic;
pub mod render;
pub mod save;
pub mod slots;
pub mod state;

use std::cell::RefCell;
use std::rc::Rc;

use ratzilla::ratatui::layout::Rect;
use ratzilla::ratatui::Frame;

use crate::confirm::Confirm;
use crate::games::Game;
use crate::input::{ClickState, InputEvent};
use crate::store::KeyValueStore;
use crate::time::AutosaveTimer;

use config::GameConfig;
use logic::{PrestigeOutcome, PurchaseOutcome, ResetOutcome};
use slots::SaveSlots;
use state::{ProgressionState, UiState, UPGRADE_SLOTS};

/// Message log entries kept.
const LOG_CAPACITY: usize = 50;

/// A dropdown-style chooser on the options screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Selector {
    Theme,
    SaveFile,
}

/// Emitted after every operation that changed something.
#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    Clicked { gain: f64 },
    Prestiged { points: f64 },
    PrestigeDeclined,
    UpgradePurchased { slot: usize, price: f64 },
    UpgradeUnaffordable { slot: usize },
    ResetCompleted,
    ResetDeclined { stage: usize },
    ThemeChanged(String),
    UiStateChanged(UiState),
    SelectorChanged(Option<Selector>),
    SlotSwitched { slot: usize },
    Saved { slot: usize },
    SaveFailed { slot: usize, error: String },
}

#[derive(Clone, Debug)]
pub struct LogEntry {
    pub text: String,
    pub important: bool,
}

type Listener = Box<dyn FnMut(&GameEvent)>;

pub struct PrestigeGame<S: KeyValueStore, C: Confirm> {
    pub state: ProgressionState,
    pub config: GameConfig,
    pub selector: Option<Selector>,
    pub log: Vec<LogEntry>,
    slots: SaveSlots<S>,
    confirm: C,
    autosave: AutosaveTimer,
    listeners: Vec<Listener>,
}

impl<S: KeyValueStore, C: Confirm> PrestigeGame<S, C> {
    /// Load the slots from `store` and resume the active one.
    pub fn new(config: GameConfig, store: S, confirm: C) -> Self {
        let fresh = ProgressionState::initial(&config);
        let slots = SaveSlots::load(store, &save::encode(&fresh));
        let state = save::decode_with(slots.active_raw(), &fresh);
        log::info!("resumed save slot {}", slots.active() + 1);

        let mut game = Self {
            state,
            autosave: AutosaveTimer::new(config.autosave_interval_ticks()),
            config,
            selector: None,
            log: Vec::new(),
            slots,
            confirm,
            listeners: Vec::new(),
        };
        game.add_log(&format!("Loaded save file {}", game.slots.active() + 1), false);
        game
    }

    /// Call `listener` after every state change.
    pub fn subscribe(&mut self, listener: impl FnMut(&GameEvent) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn click(&mut self) {
        let gain = logic::click(&mut self.state);
        self.emit(GameEvent::Clicked { gain });
    }

    pub fn prestige(&mut self) -> PrestigeOutcome {
        let outcome = logic::prestige(&mut self.state, &self.config, &mut self.confirm);
        match &outcome {
            PrestigeOutcome::Prestiged { points } => {
                log::info!(
                    "prestige #{}: +{} points",
                    self.state.prestiges,
                    format::format_default(*points)
                );
                self.emit(GameEvent::Prestiged { points: *points })
            }
            PrestigeOutcome::Declined => self.emit(GameEvent::PrestigeDeclined),
            PrestigeOutcome::NotReady => {}
        }
        outcome
    }

    pub fn buy_upgrade(&mut self, slot: usize) -> PurchaseOutcome {
        let outcome = logic::buy_upgrade(&mut self.state, &self.config, slot);
        match &outcome {
            PurchaseOutcome::Purchased { slot, price } => self.emit(GameEvent::UpgradePurchased {
                slot: *slot,
                price: *price,
            }),
            PurchaseOutcome::Unaffordable { slot } => {
                self.emit(GameEvent::UpgradeUnaffordable { slot: *slot })
            }
            PurchaseOutcome::UnknownSlot { .. } => {}
        }
        outcome
    }

    /// Wipe the active slot after three confirmations, then save it.
    pub fn reset_all(&mut self) -> ResetOutcome {
        let outcome = logic::reset_all(&mut self.state, &self.config, &mut self.confirm);
        match &outcome {
            ResetOutcome::Reset => {
                log::info!("save slot {} reset", self.slots.active() + 1);
                self.selector = None;
                self.emit(GameEvent::ResetCompleted);
                self.save();
            }
            ResetOutcome::Declined { stage } => {
                self.emit(GameEvent::ResetDeclined { stage: *stage })
            }
        }
        outcome
    }

    pub fn set_theme(&mut self, theme: &str) {
        logic::set_theme(&mut self.state, theme);
        self.emit(GameEvent::ThemeChanged(theme.to_string()));
    }

    /// Switch screens. Any open selector closes.
    pub fn set_ui_state(&mut self, ui_state: UiState) {
        logic::set_ui_state(&mut self.state, ui_state);
        self.emit(GameEvent::UiStateChanged(ui_state));
        self.set_selector(None);
    }

    pub fn set_selector(&mut self, selector: Option<Selector>) {
        self.selector = selector;
        self.emit(GameEvent::SelectorChanged(selector));
    }

    /// Save the current run, then load `slot` in its place.
    pub fn select_slot(&mut self, slot: usize) {
        if slot >= self.slots.slot_count() || slot == self.slots.active() {
            return;
        }
        self.save();
        if let Err(e) = self.slots.select(slot) {
            log::warn!("could not remember active slot {}: {e}", slot + 1);
        }
        let fresh = ProgressionState::initial(&self.config);
        self.state = save::decode_with(self.slots.active_raw(), &fresh);
        self.selector = None;
        log::info!("switched to save slot {}", slot + 1);
        self.emit(GameEvent::SlotSwitched { slot });
    }

    /// Write the current state to the active slot.
    pub fn save(&mut self) -> bool {
        let slot = self.slots.active();
        let encoded = save::encode(&self.state);
        self.autosave.restart();
        match self.slots.write_active(&encoded) {
            Ok(()) => {
                self.emit(GameEvent::Saved { slot });
                true
            }
            Err(e) => {
                log::warn!("saving slot {} failed: {e}", slot + 1);
                self.emit(GameEvent::SaveFailed {
                    slot,
                    error: e.to_string(),
                });
                false
            }
        }
    }

    pub fn active_slot(&self) -> usize {
        self.slots.active()
    }

    /// Decoded contents of every slot, for the save-file selector. The
    /// active slot shows the live state rather than its last save.
    pub fn slot_previews(&self) -> Vec<ProgressionState> {
        let fresh = ProgressionState::initial(&self.config);
        (0..self.slots.slot_count())
            .map(|slot| {
                if slot == self.slots.active() {
                    self.state.clone()
                } else {
                    save::decode_with(self.slots.raw(slot).unwrap_or_default(), &fresh)
                }
            })
            .collect()
    }

    /// Number formatted with the configured threshold and precision.
    pub fn fmt(&self, value: f64) -> String {
        format::format_scientific(value, self.config.format.threshold, self.config.format.precision)
    }

    fn add_log(&mut self, text: &str, important: bool) {
        self.log.push(LogEntry {
            text: text.to_string(),
            important,
        });
        if self.log.len() > LOG_CAPACITY {
            self.log.remove(0);
        }
    }

    fn describe(&self, event: &GameEvent) -> Option<(String, bool)> {
        let text = match event {
            GameEvent::Prestiged { points } => (
                format!(
                    "Prestiged! +{} prestige point{}",
                    self.fmt(*points),
                    format::plural_suffix(*points)
                ),
                true,
            ),
            GameEvent::PrestigeDeclined => ("Prestige cancelled".to_string(), false),
            GameEvent::UpgradePurchased { slot, .. } => (
                format!(
                    "Bought {} (level {}). The run starts over.",
                    self.config.upgrades[*slot].name, self.state.upgrades[*slot].amount
                ),
                true,
            ),
            GameEvent::UpgradeUnaffordable { slot } => (
                format!("Not enough prestige points for {}", self.config.upgrades[*slot].name),
                false,
            ),
            GameEvent::ResetCompleted => ("Save file reset".to_string(), true),
            GameEvent::ResetDeclined { .. } => ("Reset cancelled".to_string(), false),
            GameEvent::ThemeChanged(theme) => (format!("Theme: {theme}"), false),
            GameEvent::SlotSwitched { slot } => (format!("Loaded save file {}", slot + 1), true),
            GameEvent::SaveFailed { error, .. } => (format!("Save failed: {error}"), true),
            GameEvent::Clicked { .. }
            | GameEvent::UiStateChanged(_)
            | GameEvent::SelectorChanged(_)
            | GameEvent::Saved { .. } => return None,
        };
        Some(text)
    }

    fn emit(&mut self, event: GameEvent) {
        if let Some((text, important)) = self.describe(&event) {
            self.add_log(&text, important);
        }
        if let GameEvent::Saved { slot } = event {
            log::debug!("saved slot {}", slot + 1);
        }
        for listener in &mut self.listeners {
            listener(&event);
        }
    }

    fn pick(&mut self, index: usize) -> bool {
        match self.selector {
            Some(Selector::Theme) => {
                let Some(theme) = self.config.themes.get(index).cloned() else {
                    return false;
                };
                self.set_theme(&theme);
                self.set_selector(None);
                true
            }
            Some(Selector::SaveFile) => {
                if index >= self.slots.slot_count() {
                    return false;
                }
                self.select_slot(index);
                self.set_selector(None);
                true
            }
            None => false,
        }
    }

    fn toggle_selector(&mut self, selector: Selector) {
        if self.selector == Some(selector) {
            self.set_selector(None);
        } else {
            self.set_selector(Some(selector));
        }
    }

    fn handle_key(&mut self, key: char) -> bool {
        match (self.state.ui_state, key) {
            (_, 'm') => self.set_ui_state(UiState::Main),
            (_, 'o') => self.set_ui_state(UiState::Options),
            (UiState::Main, 'c') => self.click(),
            (UiState::Main, 'p') => {
                self.prestige();
            }
            (UiState::Main, '1'..='9') => {
                let slot = key as usize - '1' as usize;
                if slot >= UPGRADE_SLOTS {
                    return false;
                }
                self.buy_upgrade(slot);
            }
            (UiState::Options, 'a'..='z') if self.selector.is_some() => {
                return self.pick(key as usize - 'a' as usize);
            }
            (UiState::Options, 't') => self.toggle_selector(Selector::Theme),
            (UiState::Options, 's') => self.toggle_selector(Selector::SaveFile),
            (UiState::Options, 'r') => {
                self.reset_all();
            }
            _ => return false,
        }
        true
    }

    fn handle_action(&mut self, action: u16) -> bool {
        use actions::*;
        match action {
            CLICK => self.click(),
            PRESTIGE => {
                self.prestige();
            }
            TAB_MAIN => self.set_ui_state(UiState::Main),
            TAB_OPTIONS => self.set_ui_state(UiState::Options),
            OPEN_THEME_SELECTOR => self.toggle_selector(Selector::Theme),
            OPEN_SAVE_SELECTOR => self.toggle_selector(Selector::SaveFile),
            CLOSE_SELECTOR => self.set_selector(None),
            RESET_SAVE => {
                self.reset_all();
            }
            a if (BUY_UPGRADE_BASE..BUY_UPGRADE_BASE + UPGRADE_SLOTS as u16).contains(&a) => {
                self.buy_upgrade((a - BUY_UPGRADE_BASE) as usize);
            }
            a if (PICK_THEME_BASE..PICK_SLOT_BASE).contains(&a) => {
                self.selector = Some(Selector::Theme);
                return self.pick((a - PICK_THEME_BASE) as usize);
            }
            a if (PICK_SLOT_BASE..PICK_SLOT_BASE + 100).contains(&a) => {
                self.selector = Some(Selector::SaveFile);
                return self.pick((a - PICK_SLOT_BASE) as usize);
            }
            _ => return false,
        }
        true
    }

    #[cfg(test)]
    fn store(&self) -> &S {
        self.slots.store()
    }
}

impl<S: KeyValueStore, C: Confirm> Game for PrestigeGame<S, C> {
    fn handle_input(&mut self, event: &InputEvent) -> bool {
        match event {
            InputEvent::Key(c) => self.handle_key(*c),
            InputEvent::Click(action) => self.handle_action(*action),
            InputEvent::Cancel => {
                if self.selector.is_some() {
                    self.set_selector(None);
                    true
                } else if self.state.ui_state == UiState::Options {
                    self.set_ui_state(UiState::Main);
                    true
                } else {
                    false
                }
            }
        }
    }

    fn tick(&mut self, delta_ticks: u32) {
        if self.autosave.advance(delta_ticks) {
            self.save();
        }
    }

    fn render(&self, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
        render::render(self, f, area, click_state);
    }
}
