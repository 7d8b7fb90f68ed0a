use crate::model::Violation;

pub const DEFAULT_THRESHOLD: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerOutcome {
    Recorded(usize),
    /// The entry that reached the threshold. Raised at most once per session;
    /// later entries come back as `Recorded` even though the count stays at
    /// or above the threshold.
    ThresholdReached(usize),
}

/// Ordered, append-only record of integrity violations. Entries are never
/// removed and the ledger never resets while the session lives.
#[derive(Debug, Clone)]
pub struct ViolationLedger {
    entries: Vec<Violation>,
    threshold: usize,
    tripped: bool,
}

impl ViolationLedger {
    pub fn new(threshold: usize) -> Self {
        Self {
            entries: Vec::new(),
            threshold: threshold.max(1),
            tripped: false,
        }
    }

    pub fn record(&mut self, violation: Violation) -> LedgerOutcome {
        self.entries.push(violation);
        let count = self.entries.len();
        if !self.tripped && count >= self.threshold {
            self.tripped = true;
            LedgerOutcome::ThresholdReached(count)
        } else {
            LedgerOutcome::Recorded(count)
        }
    }

    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[Violation] {
        &self.entries
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    pub fn tripped(&self) -> bool {
        self.tripped
    }
}
