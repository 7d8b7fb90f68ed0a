use std::time::Duration;

use chrono::Utc;

use termexam::ledger::{LedgerOutcome, ViolationLedger};
use termexam::model::{Violation, ViolationKind};
use termexam::monitor::{Monitor, PlatformSignal};
use termexam::store::AnswerStore;
use termexam::timer::{spawn_countdown, TimerEvent};

fn violation(kind: ViolationKind) -> Violation {
    Violation {
        kind,
        timestamp: Utc::now(),
        question_index: 0,
    }
}

#[test]
fn countdown_expires_exactly_once() {
    let (_handle, rx) = spawn_countdown(2);

    let mut ticks = Vec::new();
    let mut expired = 0;
    while let Ok(event) = rx.recv_timeout(Duration::from_secs(5)) {
        match event {
            TimerEvent::Tick(secs) => ticks.push(secs),
            TimerEvent::Expired => expired += 1,
            TimerEvent::LowTime => {}
        }
    }

    assert_eq!(expired, 1);
    assert_eq!(ticks.first(), Some(&2));
    assert_eq!(ticks.last(), Some(&0));
    // Monotonically non-increasing all the way down.
    assert!(ticks.windows(2).all(|w| w[0] >= w[1]));
}

#[test]
fn countdown_stops_when_asked() {
    let (handle, rx) = spawn_countdown(600);
    assert!(matches!(
        rx.recv_timeout(Duration::from_secs(2)),
        Ok(TimerEvent::Tick(600))
    ));

    handle.stop();

    // The thread exits without expiring; the channel just closes.
    loop {
        match rx.recv_timeout(Duration::from_secs(5)) {
            Ok(TimerEvent::Expired) => panic!("stopped timer must not expire"),
            Ok(_) => continue,
            Err(_) => break,
        }
    }
}

#[test]
fn ledger_threshold_raised_exactly_once() {
    let mut ledger = ViolationLedger::new(4);

    assert_eq!(
        ledger.record(violation(ViolationKind::RightClick)),
        LedgerOutcome::Recorded(1)
    );
    assert_eq!(
        ledger.record(violation(ViolationKind::RightClick)),
        LedgerOutcome::Recorded(2)
    );
    assert_eq!(
        ledger.record(violation(ViolationKind::TabSwitch)),
        LedgerOutcome::Recorded(3)
    );
    assert_eq!(
        ledger.record(violation(ViolationKind::RightClick)),
        LedgerOutcome::ThresholdReached(4)
    );
    // Count keeps growing but the signal never re-raises.
    assert_eq!(
        ledger.record(violation(ViolationKind::Copy)),
        LedgerOutcome::Recorded(5)
    );
    assert_eq!(ledger.count(), 5);
    assert!(ledger.tripped());
    assert_eq!(ledger.entries().len(), 5);
}

#[test]
fn ledger_count_is_monotonic() {
    let mut ledger = ViolationLedger::new(4);
    let mut previous = 0;
    for _ in 0..10 {
        ledger.record(violation(ViolationKind::Paste));
        assert!(ledger.count() > previous);
        previous = ledger.count();
    }
}

#[test]
fn store_keys_stay_in_bounds() {
    let mut store = AnswerStore::new(3);

    store.set_answer(0, "a");
    store.set_answer(2, "c");
    store.set_answer(3, "out of range");
    store.set_answer(99, "way out");

    assert_eq!(store.answered_count(), 2);
    assert_eq!(store.answer(3), None);

    store.set_answer(0, "overwritten");
    assert_eq!(store.answer(0), Some("overwritten"));
    assert_eq!(store.answered_count(), 2);

    store.clear_answer(0);
    assert_eq!(store.answer(0), None);
    assert_eq!(store.answered_count(), 1);
}

#[test]
fn store_navigation_never_touches_answers() {
    let mut store = AnswerStore::new(4);
    store.set_answer(1, "kept");

    store.jump_to(3);
    store.jump_to(0);
    store.jump_to(9); // ignored
    store.next();
    store.next();
    store.prev();

    assert_eq!(store.current(), 1);
    assert_eq!(store.answer(1), Some("kept"));
    assert_eq!(store.answered_count(), 1);
}

#[test]
fn store_progress_is_a_derived_ratio() {
    let mut store = AnswerStore::new(4);
    assert_eq!(store.progress(), 0.0);

    store.set_answer(0, "x");
    store.set_answer(1, "y");
    assert!((store.progress() - 0.5).abs() < f64::EPSILON);

    assert_eq!(AnswerStore::new(0).progress(), 0.0);
}

#[test]
fn monitor_detectors_arm_and_tear_down_together() {
    let mut monitor = Monitor::with_default_detectors();
    assert_eq!(monitor.armed_count(), 0);

    // Stopped detectors ignore every signal.
    assert!(monitor
        .observe(PlatformSignal::FocusLost, 0, Utc::now())
        .is_none());

    monitor.start_all();
    assert_eq!(monitor.armed_count(), 6);

    let violation = monitor
        .observe(PlatformSignal::FocusLost, 2, Utc::now())
        .expect("armed detector fires");
    assert_eq!(violation.kind, ViolationKind::TabSwitch);
    assert_eq!(violation.question_index, 2);

    monitor.stop_all();
    assert_eq!(monitor.armed_count(), 0);
    assert!(monitor
        .observe(PlatformSignal::CopyChord, 0, Utc::now())
        .is_none());
}

#[test]
fn monitor_maps_each_signal_to_its_kind() {
    let mut monitor = Monitor::with_default_detectors();
    monitor.start_all();

    let cases = [
        (PlatformSignal::FocusLost, ViolationKind::TabSwitch),
        (PlatformSignal::ContextMenu, ViolationKind::RightClick),
        (PlatformSignal::CopyChord, ViolationKind::Copy),
        (PlatformSignal::PasteInput, ViolationKind::Paste),
        (PlatformSignal::RestrictedChord, ViolationKind::RestrictedKey),
        (PlatformSignal::WindowShrunk, ViolationKind::FullscreenExit),
    ];

    for (signal, expected) in cases {
        let violation = monitor.observe(signal, 0, Utc::now()).unwrap();
        assert_eq!(violation.kind, expected);
    }
}
