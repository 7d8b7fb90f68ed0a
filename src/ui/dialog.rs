use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use crate::tui::{App, Dialog};

pub fn draw_dialog(f: &mut Frame, area: Rect, app: &App) {
    match app.dialog {
        Some(Dialog::ConfirmSubmit) => draw_confirm_submit(f, area, app),
        Some(Dialog::ConfirmQuit) => draw_confirm_quit(f, area),
        Some(Dialog::LowTime) => draw_low_time(f, area),
        Some(Dialog::Help) => draw_help(f, area),
        None => {}
    }
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

fn draw_confirm_submit(f: &mut Frame, area: Rect, app: &App) {
    let unanswered = app.session.store().unanswered_count();

    let mut lines: Vec<Line> = vec![
        Line::from(""),
        Line::from(Span::styled(
            "   Submit your assessment?",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    if unanswered > 0 {
        lines.push(Line::from(Span::styled(
            format!("   {} questions are not answered.", unanswered),
            Style::default().fg(Color::White),
        )));
        lines.push(Line::from(""));
    }

    lines.push(Line::from("   You cannot change answers afterwards."));
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("   [Enter] Confirm", Style::default().fg(Color::Green)),
        Span::raw("    "),
        Span::styled("[Esc] Cancel", Style::default().fg(Color::DarkGray)),
    ]));
    lines.push(Line::from(""));

    let rect = centered_rect(46, lines.len() as u16, area);
    f.render_widget(Clear, rect);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));
    f.render_widget(Paragraph::new(lines).block(block), rect);
}

fn draw_confirm_quit(f: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "   Abandon the assessment?",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("   Nothing will be submitted and your"),
        Line::from("   answers will be discarded."),
        Line::from(""),
        Line::from(vec![
            Span::styled("   [Enter] Quit", Style::default().fg(Color::Red)),
            Span::raw("    "),
            Span::styled("[Esc] Keep working", Style::default().fg(Color::DarkGray)),
        ]),
        Line::from(""),
    ];

    let rect = centered_rect(44, lines.len() as u16, area);
    f.render_widget(Clear, rect);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));
    f.render_widget(Paragraph::new(lines).block(block), rect);
}

fn draw_low_time(f: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "   ⚠  2 MINUTES REMAINING",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("   The assessment submits automatically"),
        Line::from("   when time expires."),
        Line::from(""),
        Line::from(Span::styled(
            "          [Enter] Continue",
            Style::default().fg(Color::Green),
        )),
        Line::from(""),
    ];

    let rect = centered_rect(44, lines.len() as u16, area);
    f.render_widget(Clear, rect);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));
    f.render_widget(Paragraph::new(lines).block(block), rect);
}

fn draw_help(f: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "   Key Bindings",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("   arrows     Previous/Next question"),
        Line::from("   PgUp/PgDn  Jump 5 questions"),
        Line::from("   Home/End   First/Last question"),
        Line::from("   a-d        Select choice"),
        Line::from("   t/f        True or False"),
        Line::from("   Ctrl+S     Submit assessment"),
        Line::from("   Ctrl+Q     Quit (abandons session)"),
        Line::from("   ?          This help"),
        Line::from(""),
        Line::from("   Focus loss, right-click, copy/paste and"),
        Line::from("   restricted shortcuts are recorded as"),
        Line::from("   integrity violations."),
        Line::from(""),
        Line::from(Span::styled(
            "        [Esc] Close",
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
    ];

    let rect = centered_rect(48, lines.len() as u16, area);
    f.render_widget(Clear, rect);
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Help ")
        .border_style(Style::default().fg(Color::Cyan));
    f.render_widget(Paragraph::new(lines).block(block), rect);
}
