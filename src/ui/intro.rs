use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::timer::format_duration;
use crate::tui::App;

pub fn draw_preamble(f: &mut Frame, area: Rect, app: &App) {
    let def = &app.session.definition;

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            def.title.clone(),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            def.subject.clone(),
            Style::default().fg(Color::Cyan),
        )),
        Line::from(""),
    ];

    if let Some(group) = &def.target_group {
        lines.push(Line::from(format!("For: {}", group)));
    }
    lines.push(Line::from(format!(
        "Questions: {}    Duration: {}",
        def.question_count(),
        format_duration(def.duration_seconds())
    )));
    lines.push(Line::from(format!(
        "Total marks: {}    Passing marks: {}",
        def.total_marks, def.passing_marks
    )));
    lines.push(Line::from(format!(
        "Closes: {}",
        def.end.format("%Y-%m-%d %H:%M UTC")
    )));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Integrity rules",
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(
        "Leaving the window, right-clicking, copying, pasting and",
    ));
    lines.push(Line::from(
        "restricted shortcuts are recorded as violations.",
    ));
    lines.push(Line::from(format!(
        "After {} violations the assessment is submitted automatically.",
        app.session.ledger().threshold()
    )));
    lines.push(Line::from(""));
    lines.push(Line::from(
        "The timer starts as soon as you begin and cannot be paused.",
    ));
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled(
            "[Enter] Begin",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("    "),
        Span::styled("[Ctrl+Q] Quit", Style::default().fg(Color::DarkGray)),
    ]));
    lines.push(Line::from(""));

    let block = Block::default().borders(Borders::ALL);
    let widget = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: false });
    f.render_widget(widget, area);
}
