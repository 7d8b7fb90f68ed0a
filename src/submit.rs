use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;

use chrono::{DateTime, Utc};

use crate::service::{AnswerEntry, AssessmentService, SubmitRequest};
use crate::session::{Session, SubmitTrigger};

/// Outcome of one dispatch, delivered back into the session loop.
#[derive(Debug, Clone)]
pub enum SubmitEvent {
    Accepted {
        at: DateTime<Utc>,
        message: Option<String>,
    },
    Failed {
        error: String,
    },
}

/// Assembles the payload: one entry per question in definition order, with
/// `None` standing in for every unanswered question.
pub fn build_submission(session: &Session, submitted_at: DateTime<Utc>) -> SubmitRequest {
    let answers: Vec<AnswerEntry> = session
        .definition
        .questions
        .iter()
        .enumerate()
        .map(|(index, q)| AnswerEntry {
            question_id: q.id.clone(),
            answer: session.store().answer(index).map(str::to_string),
            question_text: q.text.clone(),
            correct_answer: q.correct_answer.clone(),
            marks: q.marks,
        })
        .collect();

    SubmitRequest {
        test_id: session.definition.id.clone(),
        answers,
        violations: session.ledger().entries().to_vec(),
        time_spent: session.elapsed_seconds(),
        submitted_at,
    }
}

/// The trigger funnel. Honors the trigger only if the session's submission
/// lock is free (strictly InProgress); otherwise the signal is dropped, not
/// queued. Returns whether a dispatch actually started.
pub fn request_submit(
    session: &mut Session,
    trigger: SubmitTrigger,
    service: &Arc<dyn AssessmentService + Send + Sync>,
    events: &mpsc::Sender<SubmitEvent>,
) -> bool {
    if !session.begin_submission(trigger) {
        return false;
    }

    let request = build_submission(session, Utc::now());
    dispatch(service.clone(), request, events.clone());
    true
}

/// Runs the network call on a worker thread so the session loop never
/// blocks; the single submission lock is already held.
fn dispatch(
    service: Arc<dyn AssessmentService + Send + Sync>,
    request: SubmitRequest,
    events: mpsc::Sender<SubmitEvent>,
) {
    thread::spawn(move || {
        let event = match service.submit(&request) {
            Ok(ack) => SubmitEvent::Accepted {
                at: Utc::now(),
                message: ack.message,
            },
            Err(e) => SubmitEvent::Failed {
                error: e.to_string(),
            },
        };
        let _ = events.send(event);
    });
}

/// Writes the payload as pretty JSON; the offline fallback when no service
/// is reachable.
pub fn export_payload(request: &SubmitRequest, dir: &Path) -> Result<PathBuf, std::io::Error> {
    std::fs::create_dir_all(dir)?;
    let filename = format!(
        "submission-{}-{}.json",
        request.test_id,
        request.submitted_at.format("%Y%m%dT%H%M%SZ")
    );
    let path = dir.join(filename);
    let json = serde_json::to_string_pretty(request)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    std::fs::write(&path, json)?;
    tracing::info!(path = %path.display(), "submission exported");
    Ok(path)
}
