use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::tui::App;

/// Scroll window that keeps the current question visible. Shared with the
/// mouse hit-testing in the event loop.
pub fn scroll_offset(current: usize, total: usize, visible: usize) -> usize {
    if visible == 0 || total <= visible {
        return 0;
    }
    if current >= visible {
        (current + 1 - visible).min(total - visible)
    } else {
        0
    }
}

pub fn draw_sidebar(f: &mut Frame, area: Rect, app: &App) {
    let store = app.session.store();
    let total = store.total();
    let current = store.current();
    let visible = area.height.saturating_sub(2) as usize;
    let offset = scroll_offset(current, total, visible);

    let mut lines: Vec<Line> = Vec::new();
    for index in offset..(offset + visible).min(total) {
        let answered = store.is_answered(index);
        let marker = if answered { "✓" } else { "·" };
        let marker_style = if answered {
            Style::default().fg(Color::Green)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let label = format!(" Q{:<3}", index + 1);
        let label_style = if index == current {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };

        lines.push(Line::from(vec![
            Span::styled(label, label_style),
            Span::raw(" "),
            Span::styled(marker.to_string(), marker_style),
        ]));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Questions ");
    let widget = Paragraph::new(lines).block(block);
    f.render_widget(widget, area);
}
