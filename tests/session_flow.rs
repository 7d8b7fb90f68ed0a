use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use chrono::Utc;

use termexam::error::ServiceError;
use termexam::ledger::LedgerOutcome;
use termexam::model::{AssessmentDefinition, Question, QuestionKind};
use termexam::monitor::PlatformSignal;
use termexam::service::{AssessmentService, SubmitAck, SubmitRequest};
use termexam::session::{Session, SessionPhase, SubmitTrigger};
use termexam::submit::{self, SubmitEvent};

fn definition(question_count: usize, duration_minutes: u32) -> AssessmentDefinition {
    let questions = (0..question_count)
        .map(|i| Question {
            id: format!("q{}", i + 1),
            text: format!("Question number {}", i + 1),
            kind: QuestionKind::ShortAnswer,
            correct_answer: "answer".to_string(),
            marks: 2,
        })
        .collect();

    AssessmentDefinition {
        id: "mock-test".to_string(),
        title: "Mock Assessment".to_string(),
        subject: "General".to_string(),
        target_group: None,
        start: Utc::now() - chrono::Duration::hours(1),
        end: Utc::now() + chrono::Duration::hours(1),
        duration_minutes,
        total_marks: 2 * question_count as u32,
        passing_marks: question_count as u32,
        questions,
    }
}

struct RecordingService {
    calls: AtomicUsize,
    fail_next: AtomicUsize,
    requests: Mutex<Vec<SubmitRequest>>,
}

impl RecordingService {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            fail_next: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn failing_once() -> Arc<Self> {
        let service = Self::new();
        service.fail_next.store(1, Ordering::SeqCst);
        service
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl AssessmentService for RecordingService {
    fn fetch_definition(&self, id: &str) -> Result<AssessmentDefinition, ServiceError> {
        Err(ServiceError::NotFound(id.to_string()))
    }

    fn submit(&self, request: &SubmitRequest) -> Result<SubmitAck, ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        if self.fail_next.load(Ordering::SeqCst) > 0 {
            self.fail_next.fetch_sub(1, Ordering::SeqCst);
            return Err(ServiceError::Network("connection refused".to_string()));
        }
        Ok(SubmitAck {
            success: true,
            message: None,
        })
    }
}

fn recv_event(rx: &mpsc::Receiver<SubmitEvent>) -> SubmitEvent {
    rx.recv_timeout(Duration::from_secs(5))
        .expect("no submission outcome arrived")
}

#[test]
fn scenario_timer_expiry_submits_once_with_partial_answers() {
    let recording = RecordingService::new();
    let service: Arc<dyn AssessmentService + Send + Sync> = recording.clone();
    let (tx, rx) = mpsc::channel();

    let mut session = Session::new(definition(3, 10), 4);
    session.begin(Utc::now());

    session.set_answer(0, "ownership");
    session.set_answer(2, "borrowing");

    session.record_signal(PlatformSignal::FocusLost, Utc::now(), Instant::now());
    session.record_signal(PlatformSignal::CopyChord, Utc::now(), Instant::now());
    assert_eq!(session.ledger().count(), 2);

    // Clock runs out.
    session.set_remaining(0);
    assert!(submit::request_submit(
        &mut session,
        SubmitTrigger::TimerExpired,
        &service,
        &tx
    ));
    // A second expiry tick arriving late is dropped by the lock.
    assert!(!submit::request_submit(
        &mut session,
        SubmitTrigger::TimerExpired,
        &service,
        &tx
    ));

    match recv_event(&rx) {
        SubmitEvent::Accepted { at, .. } => session.complete_submission(at),
        SubmitEvent::Failed { error } => panic!("unexpected failure: {}", error),
    }

    assert_eq!(recording.calls(), 1);
    let requests = recording.requests.lock().unwrap();
    let payload = &requests[0];
    assert_eq!(payload.answers.len(), 3);
    assert_eq!(payload.answers[0].answer.as_deref(), Some("ownership"));
    assert_eq!(payload.answers[1].answer, None);
    assert_eq!(payload.answers[2].answer.as_deref(), Some("borrowing"));
    assert_eq!(payload.violations.len(), 2);
    assert_eq!(payload.time_spent, 600);
    assert_eq!(session.phase(), SessionPhase::Submitted);
}

#[test]
fn scenario_violation_threshold_forces_exactly_one_submission() {
    let recording = RecordingService::new();
    let service: Arc<dyn AssessmentService + Send + Sync> = recording.clone();
    let (tx, rx) = mpsc::channel();

    let mut session = Session::new(definition(3, 10), 4);
    session.begin(Utc::now());

    let mut threshold_signals = 0;
    for _ in 0..4 {
        let t0 = Instant::now();
        let outcome = session
            .record_signal(PlatformSignal::ContextMenu, Utc::now(), t0)
            .expect("armed detector must record");

        // Every violation surfaces a transient warning with a 3s window.
        let banner = session.banner().expect("warning visible");
        assert_eq!(banner.until, t0 + Duration::from_secs(3));

        if let LedgerOutcome::ThresholdReached(count) = outcome {
            threshold_signals += 1;
            assert_eq!(count, 4);
            assert!(submit::request_submit(
                &mut session,
                SubmitTrigger::ViolationThreshold,
                &service,
                &tx
            ));
        }
    }
    assert_eq!(threshold_signals, 1);

    // No warning once submission has begun, and later signals are inert.
    assert!(session.banner().is_none());
    assert!(session
        .record_signal(PlatformSignal::ContextMenu, Utc::now(), Instant::now())
        .is_none());

    match recv_event(&rx) {
        SubmitEvent::Accepted { at, .. } => session.complete_submission(at),
        SubmitEvent::Failed { error } => panic!("unexpected failure: {}", error),
    }

    assert_eq!(recording.calls(), 1);
    assert_eq!(recording.requests.lock().unwrap()[0].violations.len(), 4);
}

#[test]
fn scenario_racing_manual_and_expiry_triggers_collapse_to_one_dispatch() {
    let recording = RecordingService::new();
    let service: Arc<dyn AssessmentService + Send + Sync> = recording.clone();
    let (tx, rx) = mpsc::channel();

    let mut session = Session::new(definition(2, 10), 4);
    session.begin(Utc::now());
    session.set_answer(0, "first");

    // Both triggers land in the same turn; only the first wins the lock.
    assert!(submit::request_submit(
        &mut session,
        SubmitTrigger::Manual,
        &service,
        &tx
    ));
    assert!(!submit::request_submit(
        &mut session,
        SubmitTrigger::TimerExpired,
        &service,
        &tx
    ));

    match recv_event(&rx) {
        SubmitEvent::Accepted { at, .. } => session.complete_submission(at),
        SubmitEvent::Failed { error } => panic!("unexpected failure: {}", error),
    }

    assert_eq!(recording.calls(), 1);
    assert_eq!(session.submit_trigger, Some(SubmitTrigger::Manual));
}

#[test]
fn scenario_failed_submission_recovers_and_retries_once() {
    let recording = RecordingService::failing_once();
    let service: Arc<dyn AssessmentService + Send + Sync> = recording.clone();
    let (tx, rx) = mpsc::channel();

    let mut session = Session::new(definition(2, 10), 4);
    session.begin(Utc::now());
    session.set_answer(0, "first");

    assert!(submit::request_submit(
        &mut session,
        SubmitTrigger::Manual,
        &service,
        &tx
    ));
    // While the first dispatch is outstanding no trigger gets through.
    assert!(!submit::request_submit(
        &mut session,
        SubmitTrigger::Manual,
        &service,
        &tx
    ));

    match recv_event(&rx) {
        SubmitEvent::Failed { error } => session.submission_failed(error),
        SubmitEvent::Accepted { .. } => panic!("first dispatch should fail"),
    }
    assert_eq!(session.phase(), SessionPhase::InProgress);
    assert!(session.submit_error.is_some());

    // Learner retries; this one goes through.
    assert!(submit::request_submit(
        &mut session,
        SubmitTrigger::Manual,
        &service,
        &tx
    ));
    match recv_event(&rx) {
        SubmitEvent::Accepted { at, .. } => session.complete_submission(at),
        SubmitEvent::Failed { error } => panic!("retry failed: {}", error),
    }

    assert_eq!(recording.calls(), 2);
    assert_eq!(session.phase(), SessionPhase::Submitted);
    assert!(session.submit_error.is_none());

    // Submitted sessions are frozen.
    session.set_answer(1, "late");
    assert_eq!(session.store().answer(1), None);
    assert!(session
        .record_signal(PlatformSignal::FocusLost, Utc::now(), Instant::now())
        .is_none());
}

#[test]
fn answers_survive_arbitrary_navigation() {
    let mut session = Session::new(definition(5, 10), 4);
    session.begin(Utc::now());

    session.set_answer(0, "a");
    session.jump_to(4);
    session.set_answer(4, "e");
    session.jump_to(2);
    session.set_answer(2, "c");
    session.jump_to(0);
    session.prev_question(); // already at the first question
    session.next_question();

    assert_eq!(session.store().current(), 1);
    assert_eq!(session.store().answer(0), Some("a"));
    assert_eq!(session.store().answer(2), Some("c"));
    assert_eq!(session.store().answer(4), Some("e"));
    assert_eq!(session.store().answered_count(), 3);

    // Out-of-range writes and jumps are ignored.
    session.set_answer(17, "nope");
    session.jump_to(17);
    assert_eq!(session.store().current(), 1);
    assert_eq!(session.store().answered_count(), 3);
}

#[test]
fn warning_banner_expires_after_three_seconds() {
    let mut session = Session::new(definition(2, 10), 4);
    session.begin(Utc::now());

    let t0 = Instant::now();
    session.record_signal(PlatformSignal::PasteInput, Utc::now(), t0);
    assert!(session.banner().is_some());

    session.expire_banner(t0 + Duration::from_millis(2900));
    assert!(session.banner().is_some());

    session.expire_banner(t0 + Duration::from_secs(3));
    assert!(session.banner().is_none());
}
