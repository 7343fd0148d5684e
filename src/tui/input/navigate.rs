use crossterm::event::{KeyCode, KeyEvent};

use crate::tui::app::{App, Outcome};

pub(super) fn handle_navigate(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Up | KeyCode::Char('k') => app.move_cursor(-1),
        KeyCode::Down | KeyCode::Char('j') => app.move_cursor(1),

        // Navigation
        KeyCode::Char('n') => app.navigate(),
        KeyCode::Char('s') => app.finish_navigation(Outcome::Success),
        KeyCode::Char('f') => app.finish_navigation(Outcome::Failure),
        KeyCode::Char('t') => app.finish_navigation(Outcome::Timeout),
        KeyCode::Char('b') => app.history_back(),

        // Optimistic edits
        KeyCode::Char('e') | KeyCode::Enter => app.start_edit(),
        KeyCode::Char('o') => app.resolve_edit(Outcome::Success),
        KeyCode::Char('x') => app.resolve_edit(Outcome::Failure),
        KeyCode::Char('c') => app.clear_all(),
        _ => {}
    }
}
