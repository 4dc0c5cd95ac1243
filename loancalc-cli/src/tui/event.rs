//! Event handling for keyboard input using crossterm.

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::io;
use std::time::Duration;
use tui_input::backend::crossterm::EventHandler;

use crate::tui::app::{App, Focus};

/// Poll for events and handle them.
/// Returns Ok(true) if the app should quit.
pub fn handle_events(app: &mut App) -> io::Result<bool> {
    // Poll for events with a small timeout so alert timers keep ticking
    if event::poll(Duration::from_millis(100))?
        && let Event::Key(key) = event::read()?
    {
        // Only handle key press events, not release
        if key.kind == KeyEventKind::Press {
            handle_key(app, key);
        }
    }

    app.on_tick();
    Ok(!app.running)
}

/// Applies one key press to the app.
pub fn handle_key(app: &mut App, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    // Global shortcuts
    match key.code {
        KeyCode::Char('c') if ctrl => {
            app.running = false;
            return;
        }
        KeyCode::Char('s') if ctrl => {
            app.submit();
            return;
        }
        KeyCode::Char('r') if ctrl => {
            app.reset();
            return;
        }
        KeyCode::Esc => {
            app.close_alert();
            return;
        }
        KeyCode::Tab | KeyCode::Down => {
            app.focus_next();
            return;
        }
        KeyCode::BackTab | KeyCode::Up => {
            app.focus_prev();
            return;
        }
        KeyCode::PageDown => {
            app.scroll_down();
            return;
        }
        KeyCode::PageUp => {
            app.scroll_up();
            return;
        }
        _ => {}
    }

    match app.focus() {
        Focus::Field(_) => handle_field_key(app, key),
        Focus::Calculate => handle_button_key(app, key.code, App::submit),
        Focus::Clear => handle_button_key(app, key.code, App::reset),
    }
}

/// Text editing inside a focused field.
fn handle_field_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => {
            // Commit and move on, like leaving the field
            app.focus_next();
        }
        _ => {
            let before = app.input.value().to_string();
            app.input.handle_event(&Event::Key(key));
            if app.input.value() != before {
                app.on_input();
            }
        }
    }
}

fn handle_button_key(app: &mut App, key: KeyCode, action: fn(&mut App)) {
    match key {
        KeyCode::Enter | KeyCode::Char(' ') => action(app),
        KeyCode::Char('q') => app.running = false,
        KeyCode::Char('j') => app.scroll_down(),
        KeyCode::Char('k') => app.scroll_up(),
        _ => {}
    }
}
