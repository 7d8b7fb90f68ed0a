use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ServiceError;
use crate::model::{AssessmentDefinition, Violation};

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Submission body. Field names are the service's wire contract; note that
/// `correctAnswer` is echoed back from the fetched definition (the service
/// owns grading, the client just reports what it was given).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequest {
    pub test_id: String,
    pub answers: Vec<AnswerEntry>,
    pub violations: Vec<Violation>,
    /// Elapsed seconds: duration minus remaining time at submission.
    pub time_spent: u64,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerEntry {
    pub question_id: String,
    /// `None` serializes to `null`, the stand-in for an unanswered question.
    pub answer: Option<String>,
    pub question_text: String,
    pub correct_answer: String,
    pub marks: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitAck {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Wire contract toward the external assessment/grading service. The HTTP
/// implementation is the production path; tests substitute doubles.
pub trait AssessmentService {
    fn fetch_definition(&self, id: &str) -> Result<AssessmentDefinition, ServiceError>;
    fn submit(&self, request: &SubmitRequest) -> Result<SubmitAck, ServiceError>;
}

pub struct HttpAssessmentService {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl HttpAssessmentService {
    pub fn new(base_url: &str) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .expect("failed to build HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl AssessmentService for HttpAssessmentService {
    fn fetch_definition(&self, id: &str) -> Result<AssessmentDefinition, ServiceError> {
        let url = self.endpoint(&format!("/api/tests/{}", id));
        tracing::debug!(%url, "fetching assessment definition");

        let response = self.client.get(&url).send()?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ServiceError::NotFound(id.to_string()));
        }
        if !status.is_success() {
            let message = response.text().unwrap_or_default();
            return Err(ServiceError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let definition: AssessmentDefinition = response
            .json()
            .map_err(|e| ServiceError::Decode(e.to_string()))?;
        Ok(definition)
    }

    fn submit(&self, request: &SubmitRequest) -> Result<SubmitAck, ServiceError> {
        let url = self.endpoint(&format!("/api/tests/{}/submit", request.test_id));
        tracing::debug!(%url, answers = request.answers.len(), "posting submission");

        let response = self.client.post(&url).json(request).send()?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().unwrap_or_default();
            return Err(ServiceError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let ack: SubmitAck = response
            .json()
            .map_err(|e| ServiceError::Decode(e.to_string()))?;

        if !ack.success {
            let message = ack
                .message
                .unwrap_or_else(|| "submission not accepted".to_string());
            return Err(ServiceError::Rejected(message));
        }
        Ok(ack)
    }
}

/// Offline stand-in used with `--definition`: submissions are written to a
/// local JSON file instead of POSTed, so a session can be exercised with no
/// service reachable.
pub struct OfflineService {
    export_dir: std::path::PathBuf,
}

impl OfflineService {
    pub fn new(export_dir: std::path::PathBuf) -> Self {
        Self { export_dir }
    }
}

impl AssessmentService for OfflineService {
    fn fetch_definition(&self, id: &str) -> Result<AssessmentDefinition, ServiceError> {
        Err(ServiceError::NotFound(id.to_string()))
    }

    fn submit(&self, request: &SubmitRequest) -> Result<SubmitAck, ServiceError> {
        let path = crate::submit::export_payload(request, &self.export_dir)
            .map_err(|e| ServiceError::Network(e.to_string()))?;
        Ok(SubmitAck {
            success: true,
            message: Some(format!("saved to {}", path.display())),
        })
    }
}
