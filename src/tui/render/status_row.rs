use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use super::helpers::spans_width;
use crate::tui::app::{App, Mode};
use crate::util::unicode;

const NAVIGATE_HINT: &str = "n nav  s/f/t finish  b back  e edit  o/x resolve  c clear  q quit";
const EDIT_HINT: &str = "Enter send  Esc cancel";

/// Render the status row: live-region text on the left, key hints on the right
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    let announcement = app.document().live_region.as_str();
    let hint = match app.mode {
        Mode::Navigate => NAVIGATE_HINT,
        Mode::Edit => EDIT_HINT,
    };

    let mut spans = vec![Span::styled(
        unicode::truncate_to_width(announcement, width),
        Style::default().fg(app.theme.text_bright).bg(bg),
    )];
    let content_width = spans_width(&spans);
    let hint_width = unicode::display_width(hint);
    if content_width + hint_width + 2 <= width {
        let padding = width - content_width - hint_width;
        spans.push(Span::styled(" ".repeat(padding), Style::default().bg(bg)));
        spans.push(Span::styled(hint, Style::default().fg(app.theme.dim).bg(bg)));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
