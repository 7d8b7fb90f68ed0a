use chrono::Utc;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use termexam::error::ServiceError;
use termexam::model::QuestionKind;
use termexam::service::{
    AnswerEntry, AssessmentService, HttpAssessmentService, SubmitRequest,
};

fn definition_body() -> serde_json::Value {
    json!({
        "id": "net-101",
        "title": "Networking Basics",
        "subject": "Networking",
        "targetGroup": "Batch 2026",
        "start": "2026-01-01T09:00:00Z",
        "end": "2026-12-31T17:00:00Z",
        "duration": 30,
        "totalMarks": 4,
        "passingMarks": 2,
        "questions": [
            {
                "id": "q1",
                "question": "Which port does HTTPS use by default?",
                "questionType": "mcq",
                "options": ["80", "443", "22", "8080"],
                "correctAnswer": "443",
                "marks": 2
            },
            {
                "id": "q2",
                "question": "UDP guarantees in-order delivery.",
                "questionType": "truefalse",
                "correctAnswer": "False",
                "marks": 2
            }
        ]
    })
}

fn submit_request() -> SubmitRequest {
    SubmitRequest {
        test_id: "net-101".to_string(),
        answers: vec![AnswerEntry {
            question_id: "q1".to_string(),
            answer: Some("443".to_string()),
            question_text: "Which port does HTTPS use by default?".to_string(),
            correct_answer: "443".to_string(),
            marks: 2,
        }],
        violations: Vec::new(),
        time_spent: 42,
        submitted_at: Utc::now(),
    }
}

#[tokio::test]
async fn fetches_and_decodes_a_definition() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tests/net-101"))
        .respond_with(ResponseTemplate::new(200).set_body_json(definition_body()))
        .expect(1)
        .mount(&server)
        .await;

    let base = server.uri();
    let def = tokio::task::spawn_blocking(move || {
        HttpAssessmentService::new(&base).fetch_definition("net-101")
    })
    .await
    .unwrap()
    .unwrap();

    assert_eq!(def.id, "net-101");
    assert_eq!(def.question_count(), 2);
    assert!(matches!(
        def.questions[0].kind,
        QuestionKind::MultipleChoice { .. }
    ));
    assert_eq!(def.questions[1].kind, QuestionKind::TrueFalse);
}

#[tokio::test]
async fn missing_assessment_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tests/ghost"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let base = server.uri();
    let err = tokio::task::spawn_blocking(move || {
        HttpAssessmentService::new(&base).fetch_definition("ghost")
    })
    .await
    .unwrap()
    .unwrap_err();

    assert!(matches!(err, ServiceError::NotFound(id) if id == "ghost"));
}

#[tokio::test]
async fn submit_posts_the_wire_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/tests/net-101/submit"))
        .and(body_partial_json(json!({
            "testId": "net-101",
            "timeSpent": 42
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"success": true, "message": "recorded"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let base = server.uri();
    let ack = tokio::task::spawn_blocking(move || {
        HttpAssessmentService::new(&base).submit(&submit_request())
    })
    .await
    .unwrap()
    .unwrap();

    assert!(ack.success);
    assert_eq!(ack.message.as_deref(), Some("recorded"));
}

#[tokio::test]
async fn rejected_submission_is_a_recoverable_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/tests/net-101/submit"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"success": false, "message": "window closed"})),
        )
        .mount(&server)
        .await;

    let base = server.uri();
    let err = tokio::task::spawn_blocking(move || {
        HttpAssessmentService::new(&base).submit(&submit_request())
    })
    .await
    .unwrap()
    .unwrap_err();

    assert!(matches!(err, ServiceError::Rejected(msg) if msg == "window closed"));
}

#[tokio::test]
async fn server_failure_is_an_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/tests/net-101/submit"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let base = server.uri();
    let err = tokio::task::spawn_blocking(move || {
        HttpAssessmentService::new(&base).submit(&submit_request())
    })
    .await
    .unwrap()
    .unwrap_err();

    assert!(matches!(err, ServiceError::Api { status: 500, .. }));
}
