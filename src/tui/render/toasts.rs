use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Clear, Paragraph};

use super::helpers::spans_width;
use crate::tui::app::App;
use crate::util::unicode;

const MAX_TOAST_WIDTH: usize = 48;

/// Stack visible toasts in the top-right corner of `area`, newest last
pub fn render_toasts(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let max_width = MAX_TOAST_WIDTH.min(area.width as usize);
    for (row, (_, toast)) in app.document().toasts().enumerate() {
        if row as u16 >= area.height {
            break;
        }
        let color = app.theme.toast_color(toast.kind);
        let message = unicode::truncate_to_width(&toast.message, max_width.saturating_sub(3));
        let spans = vec![
            Span::styled(" \u{25CF} ", Style::default().fg(color).bg(bg)),
            Span::styled(message, Style::default().fg(app.theme.text_bright).bg(bg)),
        ];
        let width = spans_width(&spans).min(area.width as usize) as u16;
        let toast_area = Rect::new(area.x + area.width - width, area.y + row as u16, width, 1);
        frame.render_widget(Clear, toast_area);
        frame.render_widget(Paragraph::new(Line::from(spans)), toast_area);
    }
}
