//! Keyboard dispatch.
//!
//! Translates a key press into controller calls. When the press submits
//! something, the resulting [`Request`] is handed back to the event loop to
//! be run off the UI thread.

use crate::gateway::Request;
use crate::session::Screen;
use crate::ui::app::{App, InputMode};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Lines moved by PageUp / PageDown.
pub const PAGE_SCROLL: u16 = 10;

pub fn handle_key(app: &mut App, key: KeyEvent) -> Option<Request> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    // Global bindings
    match key.code {
        KeyCode::Char('c') if ctrl => {
            app.should_quit = true;
            return None;
        }
        KeyCode::Char('t') if ctrl => {
            app.toggle_language();
            return None;
        }
        _ => {}
    }

    match (app.session.screen, app.mode) {
        (Screen::Home, _) => handle_home(app, key, ctrl),
        (Screen::Chat, InputMode::FilePath) => handle_file_prompt(app, key, ctrl),
        (Screen::Chat, InputMode::Prompt) => handle_chat(app, key, ctrl),
    }
}

fn handle_home(app: &mut App, key: KeyEvent, ctrl: bool) -> Option<Request> {
    match key.code {
        KeyCode::Esc => app.should_quit = true,
        KeyCode::Up | KeyCode::BackTab => app.previous_module(),
        KeyCode::Down | KeyCode::Tab => app.next_module(),
        KeyCode::Enter => {
            if app.input.trim().is_empty() {
                app.select_module(app.selected_module());
            } else {
                return app.submit_input();
            }
        }
        KeyCode::Backspace => app.input_pop_char(),
        KeyCode::Char(c) if !ctrl => app.input_push_char(c),
        _ => {}
    }
    None
}

fn handle_chat(app: &mut App, key: KeyEvent, ctrl: bool) -> Option<Request> {
    match key.code {
        KeyCode::Esc => app.go_home(),
        KeyCode::Enter => return app.submit_input(),
        KeyCode::Char('o') if ctrl => app.open_file_prompt(),
        KeyCode::PageUp => app.scroll_up(PAGE_SCROLL),
        KeyCode::PageDown => app.scroll_down(PAGE_SCROLL),
        KeyCode::Up => app.scroll_up(1),
        KeyCode::Down => app.scroll_down(1),
        KeyCode::End => app.pin_to_bottom(),
        KeyCode::Backspace => app.input_pop_char(),
        KeyCode::Char(c) if !ctrl => app.input_push_char(c),
        _ => {}
    }
    None
}

fn handle_file_prompt(app: &mut App, key: KeyEvent, ctrl: bool) -> Option<Request> {
    match key.code {
        KeyCode::Esc => app.close_file_prompt(),
        KeyCode::Enter => return app.submit_file_prompt(),
        KeyCode::Backspace => app.input_pop_char(),
        KeyCode::Char(c) if !ctrl => app.input_push_char(c),
        _ => {}
    }
    None
}
