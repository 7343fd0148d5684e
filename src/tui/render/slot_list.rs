use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::SlotMarker;
use crate::tui::app::{App, Mode};
use crate::util::unicode;

const LABEL_WIDTH: usize = 26;
const SKELETON: &str = "░░░░░░░░░░";

/// The demo page: one row per slot, styled by its marker
pub fn render_slot_list(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let doc = app.document();
    let width = area.width as usize;

    let mut lines: Vec<Line> = vec![Line::from("")];
    for (index, slot) in app.slots.iter().enumerate() {
        let selected = index == app.cursor;
        let row_bg = if selected { app.theme.selection_bg } else { bg };
        let editing = selected && app.mode == Mode::Edit;

        let (value, value_style) = if editing {
            (
                format!("{}\u{258C}", app.edit_buffer),
                Style::default().fg(app.theme.text_bright).bg(row_bg),
            )
        } else if doc.skeleton_visible {
            (SKELETON.to_string(), Style::default().fg(app.theme.dim).bg(row_bg))
        } else {
            let style = match doc.marker(slot.node) {
                Some(SlotMarker::Tentative) => Style::default()
                    .fg(app.theme.dim)
                    .bg(row_bg)
                    .add_modifier(Modifier::ITALIC),
                Some(SlotMarker::Error) => Style::default()
                    .fg(app.theme.error)
                    .bg(row_bg)
                    .add_modifier(Modifier::BOLD),
                None => Style::default().fg(app.theme.text).bg(row_bg),
            };
            (doc.value(slot.node).unwrap_or_default().to_string(), style)
        };

        let cursor = if selected { "\u{25B8} " } else { "  " };
        let label = unicode::fit_to_width(slot.id.as_str(), LABEL_WIDTH);
        let used = 2 + LABEL_WIDTH;
        let value = unicode::truncate_to_width(&value, width.saturating_sub(used));
        let pad = width.saturating_sub(used + unicode::display_width(&value));

        lines.push(Line::from(vec![
            Span::styled(cursor, Style::default().fg(app.theme.bar).bg(row_bg)),
            Span::styled(label, Style::default().fg(app.theme.dim).bg(row_bg)),
            Span::styled(value, value_style),
            Span::styled(" ".repeat(pad), Style::default().bg(row_bg)),
        ]));
    }

    if !app.pending_edits.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("  {} edit(s) awaiting the server", app.pending_edits.len()),
            Style::default().fg(app.theme.dim).bg(bg),
        )));
    }

    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::app::Outcome;
    use crate::tui::render::test_helpers::*;

    #[test]
    fn lists_slots_with_cursor() {
        let app = test_app();
        let output = render_to_string(TERM_W, 8, |frame, area| {
            render_slot_list(frame, &app, area);
        });
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(
            lines,
            vec![
                "",
                "\u{25B8} account-name              Conta corrente",
                "  account-balance           R$ 1.234,56",
                "  transaction-description   Mercado",
                "  transaction-amount        R$ 89,90",
            ]
        );
    }

    #[test]
    fn editing_shows_buffer_and_pending_count() {
        let mut app = test_app();
        app.cursor = 3;
        app.start_edit();
        app.edit_push('5');
        let output = render_to_string(TERM_W, 8, |frame, area| {
            render_slot_list(frame, &app, area);
        });
        assert!(output.contains("R$ 899,05\u{258C}"));

        app.submit_edit();
        let output = render_to_string(TERM_W, 8, |frame, area| {
            render_slot_list(frame, &app, area);
        });
        assert!(output.contains("R$ 899,05"));
        assert!(output.contains("1 edit(s) awaiting the server"));

        app.resolve_edit(Outcome::Failure);
        let output = render_to_string(TERM_W, 8, |frame, area| {
            render_slot_list(frame, &app, area);
        });
        assert!(output.contains("R$ 89,90"));
        assert!(!output.contains("awaiting"));
    }

    #[test]
    fn skeleton_hides_values() {
        let mut app = test_app();
        app.navigate();
        app.advance_to(std::time::Duration::from_millis(500));
        let output = render_to_string(TERM_W, 8, |frame, area| {
            render_slot_list(frame, &app, area);
        });
        assert!(!output.contains("Conta corrente"));
        assert!(output.contains(SKELETON));
    }
}
