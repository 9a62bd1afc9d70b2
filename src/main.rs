mod confirm;
mod games;
mod input;
mod logging;
mod store;
mod time;
mod widgets;

use std::{cell::RefCell, io, rc::Rc};

use confirm::BrowserConfirm;
use games::prestige::config::GameConfig;
use games::prestige::PrestigeGame;
use games::Game;
use input::{pixel_to_cell, ClickState, InputEvent};
use log::LevelFilter;
use ratzilla::event::{KeyCode, MouseButton, MouseEventKind};
use ratzilla::ratatui::Terminal;
use ratzilla::{DomBackend, WebRenderer};
use store::BrowserStore;
use time::GameTime;

/// Query the grid container's bounding rect and convert pixel coordinates to
/// a `(col, row)` cell.
fn dom_pixel_to_cell(mouse_x: u32, mouse_y: u32, cs: &ClickState) -> Option<(u16, u16)> {
    let window = web_sys::window()?;
    let document = window.document()?;

    // DomBackend は <body> 直下にグリッド用の <div> を作る。
    let grid = document.query_selector("body > div").ok()??;
    let rect = grid.get_bounding_client_rect();

    let col = pixel_to_cell(mouse_x as f64 - rect.left(), rect.width(), cs.terminal_cols)?;
    let row = pixel_to_cell(mouse_y as f64 - rect.top(), rect.height(), cs.terminal_rows)?;
    log::trace!("click at pixel ({mouse_x}, {mouse_y}) -> cell ({col}, {row})");
    Some((col, row))
}

fn main() -> io::Result<()> {
    console_error_panic_hook::set_once();
    logging::init(LevelFilter::Info);

    let config = GameConfig::embedded();
    let mut clock = GameTime::new(config.ticks_per_sec);
    let game = PrestigeGame::new(config, BrowserStore::open(), BrowserConfirm);
    let game: Rc<RefCell<dyn Game>> = Rc::new(RefCell::new(game));
    let click_state = Rc::new(RefCell::new(ClickState::new()));

    let backend = DomBackend::new()?;
    let terminal = Terminal::new(backend)?;

    terminal.on_mouse_event({
        let game = game.clone();
        let click_state = click_state.clone();
        move |mouse_event| {
            if mouse_event.event != MouseEventKind::Pressed
                || mouse_event.button != MouseButton::Left
            {
                return;
            }

            let action = {
                let cs = click_state.borrow();
                if cs.terminal_rows == 0 || cs.terminal_cols == 0 {
                    return;
                }
                dom_pixel_to_cell(mouse_event.x, mouse_event.y, &cs)
                    .and_then(|(col, row)| cs.hit_test(col, row))
            };

            if let Some(action) = action {
                game.borrow_mut().handle_input(&InputEvent::Click(action));
            }
        }
    });

    terminal.on_key_event({
        let game = game.clone();
        move |key_event| {
            let event = match key_event.code {
                KeyCode::Char(c) => InputEvent::Key(c.to_ascii_lowercase()),
                KeyCode::Esc => InputEvent::Cancel,
                _ => return,
            };
            game.borrow_mut().handle_input(&event);
        }
    });

    terminal.draw_web({
        let click_state = click_state.clone();
        move |f| {
            let ticks = clock.update(js_sys::Date::now());
            if ticks > 0 {
                game.borrow_mut().tick(ticks);
            }

            let size = f.area();
            click_state.borrow_mut().begin_frame(size.width, size.height);
            game.borrow().render(f, size, &click_state);
        }
    });

    Ok(())
}
