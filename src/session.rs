use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};

use crate::ledger::{LedgerOutcome, ViolationLedger};
use crate::model::AssessmentDefinition;
use crate::monitor::{Monitor, PlatformSignal};
use crate::store::AnswerStore;

/// How long a violation warning stays on screen. Independent of the main
/// countdown.
pub const WARNING_VISIBILITY: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    NotStarted,
    InProgress,
    Submitting,
    Submitted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitTrigger {
    Manual,
    TimerExpired,
    ViolationThreshold,
}

impl SubmitTrigger {
    pub fn describe(&self) -> &'static str {
        match self {
            SubmitTrigger::Manual => "manual confirmation",
            SubmitTrigger::TimerExpired => "time expired",
            SubmitTrigger::ViolationThreshold => "violation limit reached",
        }
    }
}

#[derive(Debug, Clone)]
pub struct WarningBanner {
    pub text: String,
    pub until: Instant,
}

/// All mutable session state, threaded explicitly through the event loop.
/// Created empty at session start, discarded when the session ends.
pub struct Session {
    pub definition: AssessmentDefinition,
    store: AnswerStore,
    ledger: ViolationLedger,
    monitor: Monitor,
    phase: SessionPhase,
    remaining_seconds: u64,
    pub started_at: Option<DateTime<Utc>>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub submit_error: Option<String>,
    pub submit_trigger: Option<SubmitTrigger>,
    banner: Option<WarningBanner>,
}

impl Session {
    pub fn new(definition: AssessmentDefinition, threshold: usize) -> Self {
        let remaining = definition.duration_seconds();
        let store = AnswerStore::new(definition.question_count());
        Self {
            definition,
            store,
            ledger: ViolationLedger::new(threshold),
            monitor: Monitor::with_default_detectors(),
            phase: SessionPhase::NotStarted,
            remaining_seconds: remaining,
            started_at: None,
            submitted_at: None,
            submit_error: None,
            submit_trigger: None,
            banner: None,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn store(&self) -> &AnswerStore {
        &self.store
    }

    pub fn ledger(&self) -> &ViolationLedger {
        &self.ledger
    }

    pub fn monitor(&self) -> &Monitor {
        &self.monitor
    }

    /// NotStarted → InProgress: arms every detector and starts the clock.
    pub fn begin(&mut self, at: DateTime<Utc>) {
        if self.phase != SessionPhase::NotStarted {
            return;
        }
        self.phase = SessionPhase::InProgress;
        self.started_at = Some(at);
        self.remaining_seconds = self.definition.duration_seconds();
        self.monitor.start_all();
        tracing::info!(
            assessment = %self.definition.id,
            questions = self.definition.question_count(),
            duration_secs = self.remaining_seconds,
            "session started"
        );
    }

    /// The single submission lock. Every trigger (manual confirm, timer
    /// expiry, ledger threshold) funnels through here; only a session that
    /// is strictly InProgress may move to Submitting, so racing triggers in
    /// the same turn collapse to one dispatch.
    pub fn begin_submission(&mut self, trigger: SubmitTrigger) -> bool {
        if self.phase != SessionPhase::InProgress {
            tracing::debug!(?trigger, phase = ?self.phase, "submit trigger ignored");
            return false;
        }
        self.phase = SessionPhase::Submitting;
        self.submit_trigger = Some(trigger);
        self.submit_error = None;
        self.banner = None;
        tracing::info!(?trigger, "submission started");
        true
    }

    /// Submitting → InProgress. The learner (or a forced trigger that has
    /// not fired yet) may retry; nothing retries automatically.
    pub fn submission_failed(&mut self, message: impl Into<String>) {
        if self.phase != SessionPhase::Submitting {
            return;
        }
        let message = message.into();
        tracing::warn!(error = %message, "submission failed");
        self.phase = SessionPhase::InProgress;
        self.submit_error = Some(message);
    }

    /// Submitting → Submitted: tears down every detector and freezes all
    /// session state.
    pub fn complete_submission(&mut self, at: DateTime<Utc>) {
        if self.phase != SessionPhase::Submitting {
            return;
        }
        self.phase = SessionPhase::Submitted;
        self.submitted_at = Some(at);
        self.banner = None;
        self.monitor.stop_all();
        tracing::info!(
            answered = self.store.answered_count(),
            violations = self.ledger.count(),
            "submission accepted"
        );
    }

    /// Detector teardown for abandoned sessions (quit mid-test). The timer
    /// thread is stopped by its handle at the same call site.
    pub fn teardown(&mut self) {
        self.monitor.stop_all();
        self.banner = None;
    }

    /// Feeds one platform signal through the detector registry. Only an
    /// InProgress session records violations or shows warnings.
    pub fn record_signal(
        &mut self,
        signal: PlatformSignal,
        at: DateTime<Utc>,
        now: Instant,
    ) -> Option<LedgerOutcome> {
        if self.phase != SessionPhase::InProgress {
            return None;
        }
        let violation = self.monitor.observe(signal, self.store.current(), at)?;
        tracing::warn!(
            kind = ?violation.kind,
            question = violation.question_index,
            count = self.ledger.count() + 1,
            "integrity violation"
        );
        let text = format!(
            "{} (warning {} of {})",
            violation.kind.warning_text(),
            self.ledger.count() + 1,
            self.ledger.threshold()
        );
        let outcome = self.ledger.record(violation);
        self.banner = Some(WarningBanner {
            text,
            until: now + WARNING_VISIBILITY,
        });
        Some(outcome)
    }

    pub fn banner(&self) -> Option<&WarningBanner> {
        self.banner.as_ref()
    }

    pub fn expire_banner(&mut self, now: Instant) {
        if let Some(banner) = &self.banner {
            if now >= banner.until {
                self.banner = None;
            }
        }
    }

    pub fn set_remaining(&mut self, secs: u64) {
        if matches!(
            self.phase,
            SessionPhase::InProgress | SessionPhase::Submitting
        ) {
            self.remaining_seconds = secs.min(self.definition.duration_seconds());
        }
    }

    pub fn remaining_seconds(&self) -> u64 {
        self.remaining_seconds
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.definition.duration_seconds() - self.remaining_seconds
    }

    pub fn set_answer(&mut self, index: usize, value: impl Into<String>) {
        if self.phase == SessionPhase::InProgress {
            self.store.set_answer(index, value);
        }
    }

    pub fn clear_answer(&mut self, index: usize) {
        if self.phase == SessionPhase::InProgress {
            self.store.clear_answer(index);
        }
    }

    pub fn jump_to(&mut self, index: usize) {
        if self.phase == SessionPhase::InProgress {
            self.store.jump_to(index);
        }
    }

    pub fn next_question(&mut self) {
        if self.phase == SessionPhase::InProgress {
            self.store.next();
        }
    }

    pub fn prev_question(&mut self) {
        if self.phase == SessionPhase::InProgress {
            self.store.prev();
        }
    }
}
