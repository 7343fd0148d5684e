pub mod helpers;
pub mod overlay;
pub mod progress_bar;
pub mod slot_list;
pub mod status_row;
pub mod toasts;

#[cfg(test)]
pub mod test_helpers;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Style;
use ratatui::widgets::Block;

use super::app::App;

/// Main render function: bar, page content, overlays, status row
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // Background fill
    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    // Layout: progress bar (1 row) | content | status row (1 row)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(area);

    progress_bar::render_progress_bar(frame, app, chunks[0]);
    slot_list::render_slot_list(frame, app, chunks[1]);

    // The overlay covers the page content but not the bar
    if app.document().overlay_visible {
        overlay::render_loading_overlay(frame, app, chunks[1]);
    }

    toasts::render_toasts(frame, app, chunks[1]);
    status_row::render_status_row(frame, app, chunks[2]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::app::Outcome;
    use std::time::Duration;
    use test_helpers::*;

    #[test]
    fn bar_row_tracks_navigation() {
        let mut app = test_app();
        let idle = render_to_string(TERM_W, TERM_H, |frame, _| render(frame, &app));
        assert!(!idle.contains('\u{2501}'));

        app.navigate();
        app.advance_to(Duration::from_millis(300));
        let loading = render_to_string(TERM_W, TERM_H, |frame, _| render(frame, &app));
        let bar = loading.lines().next().unwrap_or_default();
        assert!(bar.starts_with('\u{2501}'));
        // No overlay before the reveal delay
        assert!(loading.contains("Conta corrente"));

        app.finish_navigation(Outcome::Success);
        let done = render_to_string(TERM_W, TERM_H, |frame, _| render(frame, &app));
        let bar = done.lines().next().unwrap_or_default();
        assert_eq!(bar.chars().filter(|c| *c == '\u{2501}').count(), TERM_W as usize);

        app.advance_to(Duration::from_millis(500));
        let hidden = render_to_string(TERM_W, TERM_H, |frame, _| render(frame, &app));
        assert!(!hidden.contains('\u{2501}'));
    }
}
