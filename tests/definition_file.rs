use std::path::Path;

use termexam::bootstrap::{load_definition_file, validate_definition, window_status, WindowStatus};
use termexam::error::DefinitionError;
use termexam::model::QuestionKind;

#[test]
fn loads_sample_definition() {
    let def = load_definition_file(Path::new("fixtures/sample_assessment.yaml")).unwrap();

    assert_eq!(def.id, "rust-fundamentals-01");
    assert_eq!(def.title, "Rust Fundamentals");
    assert_eq!(def.subject, "Programming");
    assert_eq!(def.target_group.as_deref(), Some("Batch 2026"));
    assert_eq!(def.duration_minutes, 10);
    assert_eq!(def.duration_seconds(), 600);
    assert_eq!(def.total_marks, 10);
    assert_eq!(def.passing_marks, 5);
    assert_eq!(def.question_count(), 5);

    match &def.questions[0].kind {
        QuestionKind::MultipleChoice { options } => {
            assert_eq!(options.len(), 4);
            assert_eq!(options[0], "let");
        }
        other => panic!("expected multiple choice, got {:?}", other),
    }
    assert_eq!(def.questions[0].correct_answer, "let");
    assert_eq!(def.questions[1].kind, QuestionKind::TrueFalse);
    assert_eq!(def.questions[2].kind, QuestionKind::ShortAnswer);

    validate_definition(&def).unwrap();
}

#[test]
fn missing_file_is_a_read_error() {
    let err = load_definition_file(Path::new("fixtures/does_not_exist.yaml")).unwrap_err();
    assert!(matches!(err, DefinitionError::Read { .. }));
}

#[test]
fn validation_rejects_degenerate_definitions() {
    let mut def = load_definition_file(Path::new("fixtures/sample_assessment.yaml")).unwrap();

    let mut empty = def.clone();
    empty.questions.clear();
    assert!(matches!(
        validate_definition(&empty),
        Err(DefinitionError::Invalid(_))
    ));

    let mut zero_duration = def.clone();
    zero_duration.duration_minutes = 0;
    assert!(matches!(
        validate_definition(&zero_duration),
        Err(DefinitionError::Invalid(_))
    ));

    let mut inverted_window = def.clone();
    inverted_window.end = inverted_window.start;
    assert!(matches!(
        validate_definition(&inverted_window),
        Err(DefinitionError::Invalid(_))
    ));

    def.questions[0].kind = QuestionKind::MultipleChoice {
        options: vec!["only one".to_string()],
    };
    assert!(matches!(
        validate_definition(&def),
        Err(DefinitionError::Invalid(_))
    ));
}

#[test]
fn window_status_tracks_the_validity_window() {
    let def = load_definition_file(Path::new("fixtures/sample_assessment.yaml")).unwrap();

    assert_eq!(
        window_status(&def, def.start - chrono::Duration::minutes(1)),
        WindowStatus::NotYetOpen
    );
    assert_eq!(
        window_status(&def, def.start + chrono::Duration::minutes(1)),
        WindowStatus::Open
    );
    assert_eq!(
        window_status(&def, def.end + chrono::Duration::minutes(1)),
        WindowStatus::Closed
    );
}
