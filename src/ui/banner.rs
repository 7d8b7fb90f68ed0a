use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use crate::tui::App;

/// Transient violation warning. Auto-dismissed by the event loop after its
/// 3-second window; this only paints whatever is currently live.
pub fn draw_banner(f: &mut Frame, area: Rect, app: &App) {
    let Some(banner) = app.session.banner() else {
        return;
    };

    let width = (banner.text.len() as u16 + 6).min(area.width);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let rect = Rect::new(x, area.y + 1, width, 3);

    let lines = vec![Line::from(Span::styled(
        format!(" ⚠ {} ", banner.text),
        Style::default()
            .fg(Color::White)
            .bg(Color::Red)
            .add_modifier(Modifier::BOLD),
    ))];

    f.render_widget(Clear, rect);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red).bg(Color::Red));
    let widget = Paragraph::new(lines)
        .block(block)
        .style(Style::default().bg(Color::Red));
    f.render_widget(widget, rect);
}
