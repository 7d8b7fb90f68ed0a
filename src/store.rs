use std::collections::HashMap;

/// Keyed response storage plus the current-question pointer. Navigation never
/// touches stored answers; keys stay inside [0, total).
#[derive(Debug, Clone)]
pub struct AnswerStore {
    answers: HashMap<usize, String>,
    current: usize,
    total: usize,
}

impl AnswerStore {
    pub fn new(total: usize) -> Self {
        Self {
            answers: HashMap::new(),
            current: 0,
            total,
        }
    }

    /// Overwrites any prior response for `index`. Out-of-range indices and
    /// empty values are ignored (an empty entry means "unanswered", cleared
    /// via `clear_answer`).
    pub fn set_answer(&mut self, index: usize, value: impl Into<String>) {
        if index >= self.total {
            return;
        }
        let value = value.into();
        if value.is_empty() {
            return;
        }
        self.answers.insert(index, value);
    }

    pub fn clear_answer(&mut self, index: usize) {
        self.answers.remove(&index);
    }

    pub fn answer(&self, index: usize) -> Option<&str> {
        self.answers.get(&index).map(String::as_str)
    }

    pub fn is_answered(&self, index: usize) -> bool {
        self.answers.contains_key(&index)
    }

    pub fn jump_to(&mut self, index: usize) {
        if index < self.total {
            self.current = index;
        }
    }

    pub fn next(&mut self) {
        if self.current + 1 < self.total {
            self.current += 1;
        }
    }

    pub fn prev(&mut self) {
        if self.current > 0 {
            self.current -= 1;
        }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    pub fn unanswered_count(&self) -> usize {
        self.total - self.answers.len()
    }

    /// Derived read for the UI, not stored state.
    pub fn progress(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.answers.len() as f64 / self.total as f64
    }
}
