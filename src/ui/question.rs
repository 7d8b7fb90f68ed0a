use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::model::QuestionKind;
use crate::tui::App;

pub fn draw_question(f: &mut Frame, area: Rect, app: &App) {
    let store = app.session.store();
    let index = store.current();
    let Some(question) = app.session.definition.questions.get(index) else {
        return;
    };

    let mut lines: Vec<Line> = Vec::new();

    lines.push(Line::from(Span::styled(
        format!(
            "Question {} of {}   ({}, {} marks)",
            index + 1,
            store.total(),
            question.kind.label(),
            question.marks
        ),
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(""));
    lines.push(Line::from(question.text.clone()));
    lines.push(Line::from(""));

    match &question.kind {
        QuestionKind::MultipleChoice { options } => {
            let selected = store.answer(index);
            for (i, option) in options.iter().enumerate() {
                let label = (b'a' + i as u8) as char;
                let is_selected = selected == Some(option.as_str());
                let marker = if is_selected { "(•)" } else { "( )" };
                let style = if is_selected {
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::White)
                };
                lines.push(Line::from(Span::styled(
                    format!("  {} {}. {}", marker, label, option),
                    style,
                )));
            }
        }
        QuestionKind::TrueFalse => {
            let selected = store.answer(index);
            for (value, key) in [("True", 't'), ("False", 'f')] {
                let is_selected = selected == Some(value);
                let marker = if is_selected { "(•)" } else { "( )" };
                let style = if is_selected {
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::White)
                };
                lines.push(Line::from(Span::styled(
                    format!("  {} {}. {}", marker, key, value),
                    style,
                )));
            }
        }
        QuestionKind::ShortAnswer => {
            lines.push(Line::from(Span::styled(
                "  Your answer:",
                Style::default().fg(Color::DarkGray),
            )));
            let (before, after) = split_at_cursor(&app.text_input, app.text_cursor);
            lines.push(Line::from(vec![
                Span::raw("  > "),
                Span::raw(before.to_string()),
                Span::styled("█", Style::default().fg(Color::Cyan)),
                Span::raw(after.to_string()),
            ]));
        }
    }

    let block = Block::default().borders(Borders::ALL);
    let widget = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
    f.render_widget(widget, area);
}

fn split_at_cursor(text: &str, cursor: usize) -> (&str, &str) {
    let cursor = cursor.min(text.len());
    text.split_at(cursor)
}
