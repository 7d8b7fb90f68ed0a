use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::timer::format_duration;
use crate::tui::{low_time, App};

pub fn draw_titlebar(f: &mut Frame, area: Rect, app: &App) {
    let title = format!(
        "[ {} — {} ]",
        app.session.definition.title, app.session.definition.subject
    );

    let remaining = app.session.remaining_seconds();
    let timer_text = format!(" {} remaining ", format_duration(remaining));
    let timer_span = if low_time(app) {
        Span::styled(
            timer_text.clone(),
            Style::default()
                .fg(Color::White)
                .bg(Color::Red)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        Span::styled(timer_text.clone(), Style::default().fg(Color::Rgb(200, 200, 120)))
    };

    let title_span = Span::styled(
        title.clone(),
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    );

    let available = area.width as usize;
    let center_pad = available.saturating_sub(title.len()) / 2;
    let right_pad = available.saturating_sub(center_pad + title.len() + timer_text.len());

    let line = Line::from(vec![
        Span::raw(" ".repeat(center_pad)),
        title_span,
        Span::raw(" ".repeat(right_pad)),
        timer_span,
    ]);

    let widget = Paragraph::new(line)
        .style(Style::default().bg(Color::DarkGray))
        .alignment(Alignment::Left);
    f.render_widget(widget, area);
}
