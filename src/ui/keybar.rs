use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::model::QuestionKind;
use crate::tui::App;

pub fn draw_keybar(f: &mut Frame, area: Rect, app: &App) {
    let index = app.session.store().current();
    let kind = app.session.definition.questions.get(index).map(|q| &q.kind);
    let answer_hint = match kind {
        Some(QuestionKind::MultipleChoice { .. }) => "a-d select",
        Some(QuestionKind::TrueFalse) => "t/f select",
        Some(QuestionKind::ShortAnswer) => "type to answer",
        None => "",
    };

    let hints = format!(
        " {}  │  arrows navigate  │  PgUp/PgDn jump  │  Ctrl+S submit  │  Ctrl+Q quit  │  ? help",
        answer_hint
    );

    let widget = Paragraph::new(Line::from(Span::styled(
        hints,
        Style::default().fg(Color::DarkGray),
    )));
    f.render_widget(widget, area);
}
