use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use super::helpers::centered_rect;
use crate::tui::app::App;
use crate::util::unicode;

/// Full loading overlay, shown once a navigation outlasts the reveal delay
pub fn render_loading_overlay(frame: &mut Frame, app: &App, area: Rect) {
    let message = &app.runtime.config().navigation.loading_message;
    let width = (unicode::display_width(message) as u16 + 8).max(24);
    let overlay_area = centered_rect(width, 5, area);

    // Clear the area behind the overlay
    frame.render_widget(Clear, overlay_area);

    let bg = app.theme.overlay_bg;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.bar).bg(bg))
        .style(Style::default().bg(bg));

    let percent = app.document().progress.round() as u32;
    let lines = vec![
        Line::from(Span::styled(
            message.as_str(),
            Style::default()
                .fg(app.theme.text_bright)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("{percent}%"),
            Style::default().fg(app.theme.dim).bg(bg),
        )),
    ];
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(block),
        overlay_area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::*;
    use std::time::Duration;

    #[test]
    fn overlay_shows_loading_message() {
        let mut app = test_app();
        app.navigate();
        app.advance_to(Duration::from_millis(600));
        let output = render_to_string(TERM_W, TERM_H, |frame, area| {
            render_loading_overlay(frame, &app, area);
        });
        assert!(output.contains("Carregando…"));
        assert!(output.contains('%'));
        assert!(output.contains('\u{250C}'));
    }
}
