use chrono::Utc;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::timer::format_duration;
use crate::tui::App;

pub fn draw_waiting(f: &mut Frame, area: Rect, app: &App) {
    let def = &app.session.definition;
    let until_start = (def.start - Utc::now()).num_seconds().max(0) as u64;

    let lines = vec![
        Line::from(""),
        Line::from(""),
        Line::from(Span::styled(
            def.title.clone(),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("This assessment has not opened yet."),
        Line::from(""),
        Line::from(format!(
            "Opens: {}  (in {})",
            def.start.format("%Y-%m-%d %H:%M UTC"),
            format_duration(until_start)
        )),
        Line::from(""),
        Line::from(Span::styled(
            "[Ctrl+Q] Quit",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let block = Block::default().borders(Borders::ALL);
    let widget = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Center);
    f.render_widget(widget, area);
}

pub fn draw_closed(f: &mut Frame, area: Rect, app: &App) {
    let def = &app.session.definition;

    let lines = vec![
        Line::from(""),
        Line::from(""),
        Line::from(Span::styled(
            "This assessment is closed.",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(format!("Closed: {}", def.end.format("%Y-%m-%d %H:%M UTC"))),
        Line::from(""),
        Line::from("Contact your instructor if you believe this is wrong."),
        Line::from(""),
        Line::from(Span::styled(
            "[Enter] Exit",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let block = Block::default().borders(Borders::ALL);
    let widget = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Center);
    f.render_widget(widget, area);
}
