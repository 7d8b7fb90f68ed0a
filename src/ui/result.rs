use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::session::SubmitTrigger;
use crate::tui::App;

pub fn draw_submitting(f: &mut Frame, area: Rect, app: &App) {
    let reason = app
        .session
        .submit_trigger
        .map(|t| t.describe())
        .unwrap_or("manual confirmation");

    let lines = vec![
        Line::from(""),
        Line::from(""),
        Line::from(Span::styled(
            "Submitting...",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(format!("Reason: {}", reason)),
        Line::from(""),
        Line::from("Sending your answers to the assessment service."),
        Line::from(""),
    ];

    let block = Block::default().borders(Borders::ALL);
    let widget = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Center);
    f.render_widget(widget, area);
}

pub fn draw_done(f: &mut Frame, area: Rect, app: &App) {
    let submitted = app
        .session
        .submitted_at
        .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "just now".to_string());

    let mut lines = vec![
        Line::from(""),
        Line::from(""),
        Line::from(Span::styled(
            "✓  Assessment Submitted",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(format!("Submitted: {}", submitted)),
    ];

    if let Some(SubmitTrigger::TimerExpired) = app.session.submit_trigger {
        lines.push(Line::from("Time expired — your answers were sent automatically."));
    }
    if let Some(SubmitTrigger::ViolationThreshold) = app.session.submit_trigger {
        lines.push(Line::from(
            "The violation limit was reached — your answers were sent automatically.",
        ));
    }
    if let Some(notice) = &app.submit_notice {
        lines.push(Line::from(""));
        lines.push(Line::from(notice.clone()));
    }

    lines.push(Line::from(""));
    lines.push(Line::from("You cannot modify your submission."));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "[Enter] Exit",
        Style::default().fg(Color::DarkGray),
    )));

    let block = Block::default().borders(Borders::ALL);
    let widget = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Center);
    f.render_widget(widget, area);
}
