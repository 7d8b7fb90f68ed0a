use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::tui::App;

pub fn draw_statusbar(f: &mut Frame, area: Rect, app: &App) {
    let store = app.session.store();
    let ledger = app.session.ledger();
    let percent = (store.progress() * 100.0).round() as u32;

    let mut spans = vec![
        Span::raw(" "),
        Span::styled(
            format!(
                "{}/{} answered ({}%)",
                store.answered_count(),
                store.total(),
                percent
            ),
            Style::default().fg(Color::Green),
        ),
        Span::raw("   "),
        Span::styled(
            format!("⚠ {}/{} warnings", ledger.count(), ledger.threshold()),
            if ledger.count() > 0 {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default().fg(Color::DarkGray)
            },
        ),
    ];

    if let Some(error) = &app.session.submit_error {
        spans.push(Span::raw("   "));
        spans.push(Span::styled(
            format!("✗ {} — Ctrl+S to retry", error),
            Style::default().fg(Color::Red),
        ));
    }

    let widget =
        Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Rgb(30, 30, 30)));
    f.render_widget(widget, area);
}
