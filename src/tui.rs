use std::io;
use std::sync::mpsc;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use ratatui::crossterm::event::{
    self, DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture, Event,
    KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::crossterm::execute;
use ratatui::crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::layout::Rect;
use ratatui::prelude::CrosstermBackend;
use ratatui::Terminal;

use crate::bootstrap::{window_status, WindowStatus};
use crate::ledger::LedgerOutcome;
use crate::model::QuestionKind;
use crate::monitor::PlatformSignal;
use crate::service::AssessmentService;
use crate::session::{Session, SessionPhase, SubmitTrigger};
use crate::submit::{self, SubmitEvent};
use crate::timer::{self, TimerEvent, TimerHandle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Waiting,
    Preamble,
    Working,
    Submitting,
    Done,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialog {
    ConfirmSubmit,
    ConfirmQuit,
    LowTime,
    Help,
}

/// Frontend state around the session core.
pub struct App {
    pub session: Session,
    pub screen: Screen,
    pub dialog: Option<Dialog>,
    pub text_input: String,
    pub text_cursor: usize,
    pub submit_notice: Option<String>,
    pub should_quit: bool,
    /// Terminal size when the session began; shrinking below it is the
    /// terminal analog of leaving fullscreen.
    base_size: Option<(u16, u16)>,
}

impl App {
    pub fn new(session: Session) -> Self {
        let screen = match window_status(&session.definition, Utc::now()) {
            WindowStatus::NotYetOpen => Screen::Waiting,
            WindowStatus::Open => Screen::Preamble,
            WindowStatus::Closed => Screen::Closed,
        };
        Self {
            session,
            screen,
            dialog: None,
            text_input: String::new(),
            text_cursor: 0,
            submit_notice: None,
            should_quit: false,
            base_size: None,
        }
    }

    fn jump_to(&mut self, index: usize) {
        self.session.jump_to(index);
        self.load_text_input();
    }

    fn next_question(&mut self) {
        self.session.next_question();
        self.load_text_input();
    }

    fn prev_question(&mut self) {
        self.session.prev_question();
        self.load_text_input();
    }

    fn load_text_input(&mut self) {
        let index = self.session.store().current();
        self.text_input = self
            .session
            .store()
            .answer(index)
            .unwrap_or_default()
            .to_string();
        self.text_cursor = self.text_input.len();
    }

    /// Write-through: the store always mirrors the buffer, so navigation can
    /// never discard an in-flight edit.
    fn sync_text_answer(&mut self) {
        let index = self.session.store().current();
        if self.text_input.is_empty() {
            self.session.clear_answer(index);
        } else {
            let value = self.text_input.clone();
            self.session.set_answer(index, value);
        }
    }

    fn current_kind(&self) -> Option<&QuestionKind> {
        let index = self.session.store().current();
        self.session.definition.questions.get(index).map(|q| &q.kind)
    }
}

pub fn run_tui(
    session: Session,
    service: Arc<dyn AssessmentService + Send + Sync>,
) -> anyhow::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableFocusChange
    )?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(session);
    let result = main_loop(&mut terminal, &mut app, &service);

    disable_raw_mode().ok();
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableFocusChange
    )
    .ok();

    result
}

fn main_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    service: &Arc<dyn AssessmentService + Send + Sync>,
) -> anyhow::Result<()> {
    let (submit_tx, submit_rx) = mpsc::channel::<SubmitEvent>();
    let mut clock: Option<(TimerHandle, mpsc::Receiver<TimerEvent>)> = None;

    loop {
        app.session.expire_banner(Instant::now());
        terminal.draw(|f| crate::ui::draw(f, app))?;

        if app.should_quit {
            break;
        }

        if event::poll(Duration::from_millis(100))? {
            let ev = event::read()?;
            handle_event(ev, app, service, &submit_tx, &mut clock)?;
        }

        let pending: Vec<TimerEvent> = match &clock {
            Some((_, rx)) => rx.try_iter().collect(),
            None => Vec::new(),
        };
        for ev in pending {
            handle_timer(ev, app, service, &submit_tx);
        }

        while let Ok(ev) = submit_rx.try_recv() {
            handle_submit_event(ev, app, &mut clock);
        }

        if app.screen == Screen::Waiting
            && window_status(&app.session.definition, Utc::now()) == WindowStatus::Open
        {
            app.screen = Screen::Preamble;
        }
    }

    // Release on every exit path, completed or abandoned.
    if let Some((handle, _)) = &clock {
        handle.stop();
    }
    app.session.teardown();

    Ok(())
}

/// Chords and events reserved as integrity signals. These never reach the
/// normal input path.
fn map_signal(ev: &Event, base_size: Option<(u16, u16)>) -> Option<PlatformSignal> {
    match ev {
        Event::FocusLost => Some(PlatformSignal::FocusLost),
        Event::Mouse(m) if matches!(m.kind, MouseEventKind::Down(MouseButton::Right)) => {
            Some(PlatformSignal::ContextMenu)
        }
        Event::Key(key) => {
            let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
            let shift = key.modifiers.contains(KeyModifiers::SHIFT);
            match key.code {
                KeyCode::Char('c') if ctrl => Some(PlatformSignal::CopyChord),
                KeyCode::Insert if ctrl => Some(PlatformSignal::CopyChord),
                KeyCode::Char('v') if ctrl => Some(PlatformSignal::PasteInput),
                KeyCode::Insert if shift => Some(PlatformSignal::PasteInput),
                KeyCode::Char('z') if ctrl => Some(PlatformSignal::RestrictedChord),
                KeyCode::Char('d') if ctrl => Some(PlatformSignal::RestrictedChord),
                KeyCode::F(12) => Some(PlatformSignal::RestrictedChord),
                _ => None,
            }
        }
        Event::Resize(w, h) => {
            let (bw, bh) = base_size?;
            if *w < bw || *h < bh {
                Some(PlatformSignal::WindowShrunk)
            } else {
                None
            }
        }
        _ => None,
    }
}

fn handle_event(
    ev: Event,
    app: &mut App,
    service: &Arc<dyn AssessmentService + Send + Sync>,
    submit_tx: &mpsc::Sender<SubmitEvent>,
    clock: &mut Option<(TimerHandle, mpsc::Receiver<TimerEvent>)>,
) -> anyhow::Result<()> {
    if let Some(signal) = map_signal(&ev, app.base_size) {
        let outcome = app.session.record_signal(signal, Utc::now(), Instant::now());
        if let Some(LedgerOutcome::ThresholdReached(count)) = outcome {
            tracing::warn!(count, "violation threshold reached, forcing submission");
            if submit::request_submit(
                &mut app.session,
                SubmitTrigger::ViolationThreshold,
                service,
                submit_tx,
            ) {
                app.dialog = None;
                app.screen = Screen::Submitting;
            }
        }
        return Ok(());
    }

    match ev {
        Event::Key(key) => handle_key(key, app, service, submit_tx, clock),
        Event::Mouse(mouse) => {
            handle_mouse(mouse, app);
            Ok(())
        }
        _ => Ok(()),
    }
}

fn handle_key(
    key: KeyEvent,
    app: &mut App,
    service: &Arc<dyn AssessmentService + Send + Sync>,
    submit_tx: &mpsc::Sender<SubmitEvent>,
    clock: &mut Option<(TimerHandle, mpsc::Receiver<TimerEvent>)>,
) -> anyhow::Result<()> {
    if app.dialog.is_some() {
        handle_dialog_key(key, app, service, submit_tx);
        return Ok(());
    }

    match app.screen {
        Screen::Waiting => {
            if key.code == KeyCode::Char('q') && key.modifiers.contains(KeyModifiers::CONTROL) {
                app.should_quit = true;
            }
        }
        Screen::Preamble => handle_preamble_key(key, app, clock),
        Screen::Working => handle_working_key(key, app),
        Screen::Submitting => {}
        Screen::Done | Screen::Closed => {
            if key.code == KeyCode::Enter {
                app.should_quit = true;
            }
        }
    }
    Ok(())
}

fn handle_preamble_key(
    key: KeyEvent,
    app: &mut App,
    clock: &mut Option<(TimerHandle, mpsc::Receiver<TimerEvent>)>,
) {
    match key.code {
        KeyCode::Enter => {
            app.session.begin(Utc::now());
            let duration = app.session.definition.duration_seconds();
            *clock = Some(timer::spawn_countdown(duration));
            app.base_size = ratatui::crossterm::terminal::size().ok();
            app.screen = Screen::Working;
            app.load_text_input();
        }
        KeyCode::Char('q') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.should_quit = true;
        }
        _ => {}
    }
}

fn handle_working_key(key: KeyEvent, app: &mut App) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    if ctrl {
        match key.code {
            KeyCode::Char('s') => {
                app.dialog = Some(Dialog::ConfirmSubmit);
            }
            KeyCode::Char('q') => {
                app.dialog = Some(Dialog::ConfirmQuit);
            }
            _ => {}
        }
        return;
    }

    let is_text = matches!(app.current_kind(), Some(QuestionKind::ShortAnswer));
    if is_text {
        handle_text_key(key, app);
        return;
    }

    match key.code {
        KeyCode::Char('?') => {
            app.dialog = Some(Dialog::Help);
        }
        KeyCode::Up | KeyCode::Left => app.prev_question(),
        KeyCode::Down | KeyCode::Right | KeyCode::Enter => app.next_question(),
        KeyCode::Char(c) if c.is_ascii_alphabetic() => {
            let current = app.session.store().current();
            match app.current_kind().cloned() {
                Some(QuestionKind::MultipleChoice { options }) => {
                    let idx = (c.to_ascii_lowercase() as u8 - b'a') as usize;
                    if let Some(option) = options.get(idx) {
                        app.session.set_answer(current, option.clone());
                    }
                }
                Some(QuestionKind::TrueFalse) => match c.to_ascii_lowercase() {
                    't' => app.session.set_answer(current, "True"),
                    'f' => app.session.set_answer(current, "False"),
                    _ => {}
                },
                _ => {}
            }
        }
        _ => handle_page_keys(key, app),
    }
}

fn handle_text_key(key: KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Char(c) => {
            app.text_input.insert(app.text_cursor, c);
            app.text_cursor += c.len_utf8();
            app.sync_text_answer();
        }
        KeyCode::Backspace => {
            if app.text_cursor > 0 {
                let prev = floor_char_boundary(&app.text_input, app.text_cursor - 1);
                app.text_input.remove(prev);
                app.text_cursor = prev;
                app.sync_text_answer();
            }
        }
        KeyCode::Delete => {
            if app.text_cursor < app.text_input.len() {
                app.text_input.remove(app.text_cursor);
                app.sync_text_answer();
            }
        }
        KeyCode::Left => {
            if app.text_cursor > 0 {
                app.text_cursor = floor_char_boundary(&app.text_input, app.text_cursor - 1);
            }
        }
        KeyCode::Right => {
            if app.text_cursor < app.text_input.len() {
                let mut next = app.text_cursor + 1;
                while next < app.text_input.len() && !app.text_input.is_char_boundary(next) {
                    next += 1;
                }
                app.text_cursor = next;
            }
        }
        KeyCode::Home => app.text_cursor = 0,
        KeyCode::End => app.text_cursor = app.text_input.len(),
        KeyCode::Enter | KeyCode::Down => app.next_question(),
        KeyCode::Up => app.prev_question(),
        KeyCode::PageUp | KeyCode::PageDown => handle_page_keys(key, app),
        _ => {}
    }
}

fn floor_char_boundary(s: &str, mut index: usize) -> usize {
    while index > 0 && !s.is_char_boundary(index) {
        index -= 1;
    }
    index
}

fn handle_page_keys(key: KeyEvent, app: &mut App) {
    let total = app.session.store().total();
    let current = app.session.store().current();
    match key.code {
        KeyCode::PageUp => app.jump_to(current.saturating_sub(5)),
        KeyCode::PageDown => app.jump_to((current + 5).min(total.saturating_sub(1))),
        KeyCode::Home => app.jump_to(0),
        KeyCode::End => {
            if total > 0 {
                app.jump_to(total - 1);
            }
        }
        _ => {}
    }
}

fn handle_dialog_key(
    key: KeyEvent,
    app: &mut App,
    service: &Arc<dyn AssessmentService + Send + Sync>,
    submit_tx: &mpsc::Sender<SubmitEvent>,
) {
    match app.dialog {
        Some(Dialog::ConfirmSubmit) => match key.code {
            KeyCode::Enter => {
                app.dialog = None;
                if submit::request_submit(
                    &mut app.session,
                    SubmitTrigger::Manual,
                    service,
                    submit_tx,
                ) {
                    app.screen = Screen::Submitting;
                }
            }
            KeyCode::Esc => app.dialog = None,
            _ => {}
        },
        Some(Dialog::ConfirmQuit) => match key.code {
            KeyCode::Enter => {
                app.dialog = None;
                app.should_quit = true;
            }
            KeyCode::Esc => app.dialog = None,
            _ => {}
        },
        Some(Dialog::LowTime) => {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                app.dialog = None;
            }
        }
        Some(Dialog::Help) => {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?')) {
                app.dialog = None;
            }
        }
        None => {}
    }
}

fn handle_timer(
    event: TimerEvent,
    app: &mut App,
    service: &Arc<dyn AssessmentService + Send + Sync>,
    submit_tx: &mpsc::Sender<SubmitEvent>,
) {
    match event {
        TimerEvent::Tick(secs) => {
            app.session.set_remaining(secs);
        }
        TimerEvent::LowTime => {
            if app.screen == Screen::Working && app.dialog.is_none() {
                app.dialog = Some(Dialog::LowTime);
            }
        }
        TimerEvent::Expired => {
            app.session.set_remaining(0);
            if submit::request_submit(
                &mut app.session,
                SubmitTrigger::TimerExpired,
                service,
                submit_tx,
            ) {
                app.dialog = None;
                app.screen = Screen::Submitting;
            }
        }
    }
}

fn handle_submit_event(
    event: SubmitEvent,
    app: &mut App,
    clock: &mut Option<(TimerHandle, mpsc::Receiver<TimerEvent>)>,
) {
    match event {
        SubmitEvent::Accepted { at, message } => {
            app.session.complete_submission(at);
            if let Some((handle, _)) = clock.take() {
                handle.stop();
            }
            app.submit_notice = message;
            app.screen = Screen::Done;
        }
        SubmitEvent::Failed { error } => {
            app.session.submission_failed(error);
            app.screen = Screen::Working;
            app.load_text_input();
        }
    }
}

fn handle_mouse(mouse: MouseEvent, app: &mut App) {
    if app.screen != Screen::Working || app.dialog.is_some() {
        return;
    }

    let Ok((width, height)) = ratatui::crossterm::terminal::size() else {
        return;
    };
    let area = Rect::new(0, 0, width, height);
    let layout = crate::ui::layout::compute_layout(area);

    let in_sidebar = |x: u16, y: u16| {
        x >= layout.sidebar.x
            && x < layout.sidebar.x + layout.sidebar.width
            && y >= layout.sidebar.y
            && y < layout.sidebar.y + layout.sidebar.height
    };

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            let (x, y) = (mouse.column, mouse.row);
            if in_sidebar(x, y) {
                let visible = layout.sidebar.height.saturating_sub(2) as usize;
                let row = y.saturating_sub(layout.sidebar.y + 1) as usize;
                let total = app.session.store().total();
                let offset = crate::ui::sidebar::scroll_offset(
                    app.session.store().current(),
                    total,
                    visible,
                );
                let index = offset + row;
                if row < visible && index < total {
                    app.jump_to(index);
                }
            }
        }
        MouseEventKind::ScrollUp => {
            if in_sidebar(mouse.column, mouse.row) {
                app.prev_question();
            }
        }
        MouseEventKind::ScrollDown => {
            if in_sidebar(mouse.column, mouse.row) {
                app.next_question();
            }
        }
        _ => {}
    }
}

/// True while the countdown should be shown highlighted.
pub fn low_time(app: &App) -> bool {
    app.session.phase() != SessionPhase::NotStarted
        && app.session.remaining_seconds() <= timer::LOW_TIME_SECS
}
