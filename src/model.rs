use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One assessment as delivered by the service. Immutable once fetched.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentDefinition {
    pub id: String,
    pub title: String,
    pub subject: String,
    #[serde(default)]
    pub target_group: Option<String>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(rename = "duration")]
    pub duration_minutes: u32,
    pub total_marks: u32,
    pub passing_marks: u32,
    pub questions: Vec<Question>,
}

impl AssessmentDefinition {
    pub fn duration_seconds(&self) -> u64 {
        u64::from(self.duration_minutes) * 60
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }
}

/// The correct answer travels to the client inside the definition and is
/// echoed back at submission time. A tampered client could misreport its own
/// correctness; the wire contract is kept as the service defines it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    #[serde(rename = "question")]
    pub text: String,
    #[serde(flatten)]
    pub kind: QuestionKind,
    pub correct_answer: String,
    pub marks: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "questionType")]
pub enum QuestionKind {
    #[serde(rename = "mcq")]
    MultipleChoice { options: Vec<String> },
    #[serde(rename = "truefalse")]
    TrueFalse,
    #[serde(rename = "short")]
    ShortAnswer,
}

impl QuestionKind {
    pub fn label(&self) -> &'static str {
        match self {
            QuestionKind::MultipleChoice { .. } => "multiple choice",
            QuestionKind::TrueFalse => "true / false",
            QuestionKind::ShortAnswer => "short answer",
        }
    }
}

/// The six detector kinds. Wire names match the service's violation log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViolationKind {
    #[serde(rename = "tab-switch")]
    TabSwitch,
    #[serde(rename = "right-click")]
    RightClick,
    #[serde(rename = "copy")]
    Copy,
    #[serde(rename = "paste")]
    Paste,
    #[serde(rename = "restricted-key")]
    RestrictedKey,
    #[serde(rename = "fullscreen-exit")]
    FullscreenExit,
}

impl ViolationKind {
    pub fn warning_text(&self) -> &'static str {
        match self {
            ViolationKind::TabSwitch => "Switching away from the assessment is not allowed",
            ViolationKind::RightClick => "Right-click is disabled during the assessment",
            ViolationKind::Copy => "Copying is disabled during the assessment",
            ViolationKind::Paste => "Pasting is disabled during the assessment",
            ViolationKind::RestrictedKey => "That keyboard shortcut is disabled",
            ViolationKind::FullscreenExit => "Do not leave the assessment window",
        }
    }
}

/// Append-only integrity record. Serializes to the submission wire shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Violation {
    #[serde(rename = "violationType")]
    pub kind: ViolationKind,
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "question")]
    pub question_index: usize,
}
