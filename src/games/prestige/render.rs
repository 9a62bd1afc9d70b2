//! Prestige Clicker rendering: header, screen tabs, main/options screens
//! and the message log.

use std::cell::RefCell;
use std::rc::Rc;

use ratzilla::ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratzilla::ratatui::style::{Color, Modifier, Style};
use ratzilla::ratatui::text::{Line, Span};
use ratzilla::ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratzilla::ratatui::Frame;

use crate::confirm::Confirm;
use crate::input::{is_narrow_layout, ClickState};
use crate::store::KeyValueStore;
use crate::widgets::{ClickableList, TabBar};

use super::actions::*;
use super::format::plural_suffix;
use super::state::{BoostKind, UiState};
use super::{PrestigeGame, Selector};

const PROGRESS_WIDTH: usize = 20;

/// Colours for one theme.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Palette {
    bg: Color,
    fg: Color,
    accent: Color,
    dim: Color,
    border: Color,
    highlight: Color,
}

impl Palette {
    /// Unknown theme names get the dark palette.
    fn for_theme(theme: &str) -> Self {
        match theme {
            "light" => Palette {
                bg: Color::White,
                fg: Color::Black,
                accent: Color::Blue,
                dim: Color::Gray,
                border: Color::Blue,
                highlight: Color::Magenta,
            },
            _ => Palette {
                bg: Color::Black,
                fg: Color::White,
                accent: Color::Yellow,
                dim: Color::DarkGray,
                border: Color::Cyan,
                highlight: Color::Green,
            },
        }
    }

    fn key(&self, enabled: bool) -> Style {
        if enabled {
            Style::default().fg(self.accent).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.dim)
        }
    }

    fn text(&self, enabled: bool) -> Style {
        Style::default().fg(if enabled { self.fg } else { self.dim })
    }

    fn block(&self, title: &str) -> Block<'static> {
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.border))
            .title(format!(" {title} "))
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

fn progress_bar(ratio: f64, width: usize) -> String {
    let filled = ((ratio.clamp(0.0, 1.0) * width as f64).round() as usize).min(width);
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

pub fn render<S: KeyValueStore, C: Confirm>(
    game: &PrestigeGame<S, C>,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let palette = Palette::for_theme(&game.state.theme);
    f.render_widget(
        Block::default().style(Style::default().bg(palette.bg).fg(palette.fg)),
        area,
    );

    let (main_area, log_area) = if is_narrow_layout(area.width) {
        (area, None)
    } else {
        let h_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(area);
        (h_chunks[0], Some(h_chunks[1]))
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Length(3),
            Constraint::Min(5),
        ])
        .split(main_area);

    render_header(game, &palette, f, chunks[0]);
    render_tabs(game, &palette, f, chunks[1], click_state);
    match game.state.ui_state {
        UiState::Main => render_main(game, &palette, f, chunks[2], click_state),
        UiState::Options => render_options(game, &palette, f, chunks[2], click_state),
    }

    if let Some(log_area) = log_area {
        render_log(game, &palette, f, log_area);
    }
}

fn render_header<S: KeyValueStore, C: Confirm>(
    game: &PrestigeGame<S, C>,
    palette: &Palette,
    f: &mut Frame,
    area: Rect,
) {
    let state = &game.state;
    let goal = state.effective_goal();
    let progress_style = if state.can_prestige() {
        Style::default().fg(palette.highlight).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(palette.accent)
    };

    let lines = vec![
        Line::from(vec![
            Span::styled("Number: ", palette.text(false)),
            Span::styled(
                game.fmt(state.score),
                Style::default().fg(palette.fg).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::styled(format!("Goal: {} ", game.fmt(goal)), palette.text(true)),
            Span::styled(progress_bar(state.goal_progress(), PROGRESS_WIDTH), progress_style),
            Span::styled(
                format!(" {:.0}%", state.goal_progress() * 100.0),
                palette.text(false),
            ),
        ]),
        Line::from(Span::styled(
            format!(
                "{} prestige{} · {} prestige point{}",
                state.prestiges,
                plural_suffix(state.prestiges as f64),
                game.fmt(state.prestige_points),
                plural_suffix(state.prestige_points),
            ),
            palette.text(false),
        )),
    ];

    let title = format!("Prestige Clicker · File {}", game.active_slot() + 1);
    f.render_widget(Paragraph::new(lines).block(palette.block(&title)), area);
}

fn render_tabs<S: KeyValueStore, C: Confirm>(
    game: &PrestigeGame<S, C>,
    palette: &Palette,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let tab_style = |active: bool| {
        if active {
            Style::default()
                .fg(palette.bg)
                .bg(palette.accent)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(palette.accent)
        }
    };
    let on_main = game.state.ui_state == UiState::Main;

    let mut cs = click_state.borrow_mut();
    TabBar::new(" │ ")
        .tab("[m] Main", tab_style(on_main), TAB_MAIN)
        .tab("[o] Options", tab_style(!on_main), TAB_OPTIONS)
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(palette.border)))
        .render(f, area, &mut cs);
}

fn boost_text(kind: BoostKind, effect: f64, fmt: impl Fn(f64) -> String) -> String {
    match kind {
        BoostKind::Exponential => format!("x{} prestige points", fmt(effect)),
        BoostKind::Additive => format!("+{} number gain", fmt(effect)),
        BoostKind::DecayMultiplier => format!("x{} goal", fmt(effect)),
    }
}

fn render_main<S: KeyValueStore, C: Confirm>(
    game: &PrestigeGame<S, C>,
    palette: &Palette,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let state = &game.state;
    let gain = state.effective_gain();
    let points = state.prestige_point_gain();
    let ready = state.can_prestige();

    let mut cl = ClickableList::new();
    cl.push_clickable(
        Line::from(vec![
            Span::styled(" [c] ", palette.key(true)),
            Span::styled(
                format!("Click (+{} number{})", game.fmt(gain), plural_suffix(gain)),
                palette.text(true),
            ),
        ]),
        CLICK,
    );
    cl.push_clickable(
        Line::from(vec![
            Span::styled(" [p] ", palette.key(ready)),
            Span::styled(
                format!(
                    "Prestige (+{} point{})",
                    game.fmt(points),
                    plural_suffix(points)
                ),
                palette.text(ready),
            ),
        ]),
        PRESTIGE,
    );
    cl.push(Line::from(""));
    cl.push(Line::from(Span::styled(
        " Upgrades",
        Style::default().fg(palette.border).add_modifier(Modifier::BOLD),
    )));

    for (slot, (upgrade, info)) in state.upgrades.iter().zip(&game.config.upgrades).enumerate() {
        let affordable = state.can_afford(slot);
        let fmt = |v: f64| game.fmt(v);
        cl.push_clickable(
            Line::from(vec![
                Span::styled(format!(" [{}] ", slot + 1), palette.key(affordable)),
                Span::styled(
                    format!(
                        "{} ({}): {} → {} · {} PP",
                        info.name,
                        upgrade.amount,
                        boost_text(upgrade.boost, upgrade.effect(), fmt),
                        boost_text(upgrade.boost, upgrade.next_effect(), fmt),
                        game.fmt(upgrade.cost),
                    ),
                    palette.text(affordable),
                ),
            ]),
            BUY_UPGRADE_BASE + slot as u16,
        );
        if !info.description.is_empty() {
            cl.push(Line::from(Span::styled(
                format!("     {}", info.description),
                palette.text(false),
            )));
        }
    }

    let mut cs = click_state.borrow_mut();
    cl.register_targets(area, &mut cs, 1, 1);
    f.render_widget(
        Paragraph::new(cl.into_lines()).block(palette.block("Main")),
        area,
    );
}

fn render_options<S: KeyValueStore, C: Confirm>(
    game: &PrestigeGame<S, C>,
    palette: &Palette,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let state = &game.state;
    let open = game.selector;
    let arrow = |selector: Selector| if open == Some(selector) { "▴" } else { "▾" };

    let mut cl = ClickableList::new();
    cl.push_clickable(
        Line::from(vec![
            Span::styled(" [t] ", palette.key(true)),
            Span::styled(
                format!("Theme: {} {}", capitalize(&state.theme), arrow(Selector::Theme)),
                palette.text(true),
            ),
        ]),
        OPEN_THEME_SELECTOR,
    );
    if open == Some(Selector::Theme) {
        for (i, theme) in game.config.themes.iter().enumerate() {
            let current = *theme == state.theme;
            let key = (b'a' + i as u8) as char;
            cl.push_clickable(
                Line::from(vec![
                    Span::styled(format!("     [{key}] "), palette.key(true)),
                    Span::styled(
                        format!("{}{}", capitalize(theme), if current { " ✓" } else { "" }),
                        palette.text(true),
                    ),
                ]),
                PICK_THEME_BASE + i as u16,
            );
        }
    }

    cl.push_clickable(
        Line::from(vec![
            Span::styled(" [s] ", palette.key(true)),
            Span::styled(
                format!("Save file: {} {}", game.active_slot() + 1, arrow(Selector::SaveFile)),
                palette.text(true),
            ),
        ]),
        OPEN_SAVE_SELECTOR,
    );
    if open == Some(Selector::SaveFile) {
        for (slot, preview) in game.slot_previews().iter().enumerate() {
            let current = slot == game.active_slot();
            let key = (b'a' + slot as u8) as char;
            cl.push_clickable(
                Line::from(vec![
                    Span::styled(format!("     [{key}] "), palette.key(true)),
                    Span::styled(
                        format!(
                            "File {}: {} number · {} prestige{}{}",
                            slot + 1,
                            game.fmt(preview.score),
                            preview.prestiges,
                            plural_suffix(preview.prestiges as f64),
                            if current { " ✓" } else { "" },
                        ),
                        palette.text(true),
                    ),
                ]),
                PICK_SLOT_BASE + slot as u16,
            );
        }
    }

    cl.push(Line::from(""));
    cl.push_clickable(
        Line::from(vec![
            Span::styled(" [r] ", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
            Span::styled("Reset save file", Style::default().fg(Color::Red)),
        ]),
        RESET_SAVE,
    );
    cl.push(Line::from(""));
    let back = if open.is_some() { CLOSE_SELECTOR } else { TAB_MAIN };
    cl.push_clickable(
        Line::from(vec![
            Span::styled(" [Esc] ", palette.key(true)),
            Span::styled(if open.is_some() { "Close" } else { "Back" }, palette.text(true)),
        ]),
        back,
    );

    let mut cs = click_state.borrow_mut();
    cl.register_targets(area, &mut cs, 1, 1);
    f.render_widget(
        Paragraph::new(cl.into_lines()).block(palette.block("Options")),
        area,
    );
}

fn render_log<S: KeyValueStore, C: Confirm>(
    game: &PrestigeGame<S, C>,
    palette: &Palette,
    f: &mut Frame,
    area: Rect,
) {
    let visible_height = area.height.saturating_sub(2) as usize;

    // 新しいものが上。
    let lines: Vec<Line> = game
        .log
        .iter()
        .rev()
        .take(visible_height)
        .enumerate()
        .map(|(i, entry)| {
            let style = match (entry.important, i < 3) {
                (true, true) => Style::default().fg(palette.accent).add_modifier(Modifier::BOLD),
                (true, false) => Style::default().fg(palette.accent),
                (false, true) => Style::default().fg(palette.fg),
                (false, false) => Style::default().fg(palette.dim),
            };
            Line::from(Span::styled(entry.text.as_str(), style))
        })
        .collect();

    f.render_widget(
        Paragraph::new(lines)
            .block(palette.block("Log"))
            .wrap(Wrap { trim: false }),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::confirm::testing::ScriptedConfirm;
    use crate::games::prestige::config::GameConfig;
    use crate::store::MemoryStore;
    use ratzilla::ratatui::backend::TestBackend;
    use ratzilla::ratatui::Terminal;

    fn draw(
        game: &PrestigeGame<MemoryStore, ScriptedConfirm>,
        cols: u16,
        rows: u16,
    ) -> (Rc<RefCell<ClickState>>, String) {
        let click_state = Rc::new(RefCell::new(ClickState::new()));
        let mut terminal = Terminal::new(TestBackend::new(cols, rows)).unwrap();
        click_state.borrow_mut().begin_frame(cols, rows);
        terminal
            .draw(|f| {
                let area = f.area();
                render(game, f, area, &click_state);
            })
            .unwrap();
        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        (click_state, text)
    }

    fn new_game() -> PrestigeGame<MemoryStore, ScriptedConfirm> {
        PrestigeGame::new(GameConfig::default(), MemoryStore::new(), ScriptedConfirm::new(&[]))
    }

    #[test]
    fn capitalize_words() {
        assert_eq!(capitalize("dark"), "Dark");
        assert_eq!(capitalize("lIGHT"), "Light");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn progress_bar_fills() {
        assert_eq!(progress_bar(0.0, 4), "░░░░");
        assert_eq!(progress_bar(0.5, 4), "██░░");
        assert_eq!(progress_bar(3.0, 4), "████");
    }

    #[test]
    fn unknown_theme_uses_dark_palette() {
        assert_eq!(Palette::for_theme("neon"), Palette::for_theme("dark"));
        assert_ne!(Palette::for_theme("light"), Palette::for_theme("dark"));
    }

    #[test]
    fn boost_descriptions() {
        let fmt = |v: f64| v.to_string();
        assert_eq!(boost_text(BoostKind::Exponential, 4.0, fmt), "x4 prestige points");
        assert_eq!(boost_text(BoostKind::Additive, 2.0, fmt), "+2 number gain");
        assert_eq!(boost_text(BoostKind::DecayMultiplier, 0.9, fmt), "x0.9 goal");
    }

    #[test]
    fn main_screen_registers_click_targets() {
        let game = new_game();
        let (click_state, text) = draw(&game, 100, 30);
        let cs = click_state.borrow();
        let actions: Vec<u16> = cs.targets.iter().map(|t| t.action_id).collect();
        for action in [TAB_MAIN, TAB_OPTIONS, CLICK, PRESTIGE, BUY_UPGRADE_BASE, BUY_UPGRADE_BASE + 2] {
            assert!(actions.contains(&action), "missing target {action}");
        }
        assert!(text.contains("Point Multiplier"));
        assert!(text.contains("Log"));
    }

    #[test]
    fn narrow_layout_hides_log() {
        let game = new_game();
        let (_, text) = draw(&game, 60, 30);
        assert!(!text.contains(" Log "));
    }

    #[test]
    fn options_screen_lists_open_selector_entries() {
        let mut game = new_game();
        game.set_ui_state(UiState::Options);
        game.set_selector(Some(Selector::SaveFile));
        let (click_state, text) = draw(&game, 100, 30);
        let cs = click_state.borrow();
        let actions: Vec<u16> = cs.targets.iter().map(|t| t.action_id).collect();
        for slot in 0..3 {
            assert!(actions.contains(&(PICK_SLOT_BASE + slot)));
        }
        assert!(actions.contains(&CLOSE_SELECTOR));
        assert!(!actions.contains(&PICK_THEME_BASE));
        assert!(text.contains("File 3"));
    }
}
