//! Input events and click hit-testing.
//!
//! Keyboard keys arrive as characters. Mouse and touch presses are turned
//! into terminal cells in `main.rs` and matched against the click targets
//! registered during the last render.

use ratzilla::ratatui::layout::Rect;

/// A normalized input event.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Key(char),
    /// Escape / back.
    Cancel,
    /// Press on a registered target, carrying its action ID.
    Click(u16),
}

#[derive(Debug, Clone)]
pub struct ClickTarget {
    pub rect: Rect,
    pub action_id: u16,
}

/// Click targets from the last frame plus the terminal size they were
/// laid out for.
#[derive(Default)]
pub struct ClickState {
    pub targets: Vec<ClickTarget>,
    pub terminal_cols: u16,
    pub terminal_rows: u16,
}

impl ClickState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new frame at the given terminal size.
    pub fn begin_frame(&mut self, cols: u16, rows: u16) {
        self.terminal_cols = cols;
        self.terminal_rows = rows;
        self.targets.clear();
    }

    pub fn add_click_target(&mut self, rect: Rect, action_id: u16) {
        self.targets.push(ClickTarget { rect, action_id });
    }

    /// Register the whole width of `area` at `row`. Rows outside `area`
    /// are dropped.
    pub fn add_row_target(&mut self, area: Rect, row: u16, action_id: u16) {
        if (area.y..area.y + area.height).contains(&row) {
            self.add_click_target(Rect::new(area.x, row, area.width, 1), action_id);
        }
    }

    /// Register one target per tab of a single-row tab bar.
    ///
    /// `tabs` holds `(label_width, action_id)` in display order, with
    /// `separator_width` columns between labels. Each target reaches halfway
    /// into the neighbouring separators, and the outer tabs stretch to the
    /// edges of `width`, so the whole bar is tappable.
    pub fn register_tab_targets(
        &mut self,
        tabs: &[(u16, u16)],
        separator_width: u16,
        x: u16,
        y: u16,
        width: u16,
        height: u16,
    ) {
        if tabs.is_empty() || width == 0 {
            return;
        }
        let half_sep = separator_width / 2;
        let mut left = 0u16;
        let mut cursor = 0u16;
        for (i, &(label_width, action_id)) in tabs.iter().enumerate() {
            cursor += label_width;
            let right = if i + 1 == tabs.len() {
                width
            } else {
                (cursor + half_sep).min(width)
            };
            if right > left {
                self.add_click_target(Rect::new(x + left, y, right - left, height), action_id);
            }
            left = right;
            cursor += separator_width;
        }
    }

    /// Action at a cell. Later targets sit on top of earlier ones.
    pub fn hit_test(&self, col: u16, row: u16) -> Option<u16> {
        self.targets
            .iter()
            .rev()
            .find(|t| {
                let r = t.rect;
                col >= r.x && col < r.x + r.width && row >= r.y && row < r.y + r.height
            })
            .map(|t| t.action_id)
    }
}

/// Below this many columns the side log panel is hidden.
pub fn is_narrow_layout(width: u16) -> bool {
    width < 80
}

/// Map a pixel offset inside the grid element to a cell index along one
/// axis. `None` when outside the grid or the grid has no size.
pub fn pixel_to_cell(offset: f64, extent: f64, cells: u16) -> Option<u16> {
    if extent <= 0.0 || cells == 0 || offset < 0.0 {
        return None;
    }
    let cell = (offset / (extent / cells as f64)) as u16;
    (cell < cells).then_some(cell)
}
