pub mod banner;
pub mod dialog;
pub mod intro;
pub mod keybar;
pub mod layout;
pub mod question;
pub mod result;
pub mod sidebar;
pub mod statusbar;
pub mod titlebar;
pub mod waiting;

use ratatui::Frame;

use crate::tui::{App, Screen};

pub fn draw(f: &mut Frame, app: &App) {
    let area = f.area();

    match app.screen {
        Screen::Waiting => waiting::draw_waiting(f, area, app),
        Screen::Preamble => intro::draw_preamble(f, area, app),
        Screen::Working => draw_working(f, area, app),
        Screen::Submitting => result::draw_submitting(f, area, app),
        Screen::Done => result::draw_done(f, area, app),
        Screen::Closed => waiting::draw_closed(f, area, app),
    }
}

fn draw_working(f: &mut Frame, area: ratatui::layout::Rect, app: &App) {
    let layout = layout::compute_layout(area);

    titlebar::draw_titlebar(f, layout.titlebar, app);
    sidebar::draw_sidebar(f, layout.sidebar, app);
    question::draw_question(f, layout.main, app);
    statusbar::draw_statusbar(f, layout.statusbar, app);
    keybar::draw_keybar(f, layout.keybar, app);

    if app.dialog.is_some() {
        dialog::draw_dialog(f, area, app);
    }

    // Warning banner sits above everything, including dialogs.
    if app.session.banner().is_some() {
        banner::draw_banner(f, area, app);
    }
}
