use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::App;

/// Cells filled for `percent` of `width`
pub(super) fn filled_cells(percent: f64, width: u16) -> usize {
    let fraction = (percent / 100.0).clamp(0.0, 1.0);
    (fraction * width as f64).round() as usize
}

/// Thin bar along the top edge, visible while a navigation is tracked
pub fn render_progress_bar(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let doc = app.document();
    if !doc.bar_visible {
        frame.render_widget(Paragraph::new("").style(Style::default().bg(bg)), area);
        return;
    }

    let filled = filled_cells(doc.progress, area.width);
    let rest = area.width as usize - filled;
    let line = Line::from(vec![
        Span::styled("\u{2501}".repeat(filled), Style::default().fg(app.theme.bar).bg(bg)),
        Span::styled(" ".repeat(rest), Style::default().bg(bg)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}
