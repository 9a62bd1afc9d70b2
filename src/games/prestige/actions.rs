//! Semantic action IDs for Prestige Clicker click targets.

// ── Main screen ─────────────────────────────────────────────────
pub const CLICK: u16 = 0;
pub const PRESTIGE: u16 = 1;

// ── Tabs ────────────────────────────────────────────────────────
pub const TAB_MAIN: u16 = 10;
pub const TAB_OPTIONS: u16 = 11;

// ── Upgrade purchase (base + slot) ──────────────────────────────
pub const BUY_UPGRADE_BASE: u16 = 100;

// ── Options screen ──────────────────────────────────────────────
pub const OPEN_THEME_SELECTOR: u16 = 200;
pub const OPEN_SAVE_SELECTOR: u16 = 201;
pub const CLOSE_SELECTOR: u16 = 202;
pub const RESET_SAVE: u16 = 210;

// ── Selector entries (base + entry index) ───────────────────────
pub const PICK_THEME_BASE: u16 = 300;
pub const PICK_SLOT_BASE: u16 = 400;
