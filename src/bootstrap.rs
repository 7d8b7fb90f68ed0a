use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::cli::Cli;
use crate::error::DefinitionError;
use crate::model::{AssessmentDefinition, QuestionKind};
use crate::service::{AssessmentService, HttpAssessmentService, OfflineService};
use crate::session::Session;

/// Where the session stands relative to the definition's validity window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowStatus {
    NotYetOpen,
    Open,
    Closed,
}

pub fn window_status(definition: &AssessmentDefinition, now: DateTime<Utc>) -> WindowStatus {
    if now < definition.start {
        WindowStatus::NotYetOpen
    } else if now > definition.end {
        WindowStatus::Closed
    } else {
        WindowStatus::Open
    }
}

/// Everything the frontend needs to run one session.
pub struct Bootstrap {
    pub session: Session,
    pub service: Arc<dyn AssessmentService + Send + Sync>,
}

/// Resolves the definition source (service fetch or local YAML), validates
/// it, and initializes the session components.
pub fn bootstrap(cli: &Cli, data_dir: &Path) -> anyhow::Result<Bootstrap> {
    let (definition, service): (AssessmentDefinition, Arc<dyn AssessmentService + Send + Sync>) =
        if let Some(path) = &cli.definition {
            let definition = load_definition_file(Path::new(path))?;
            let service: Arc<dyn AssessmentService + Send + Sync> =
                Arc::new(OfflineService::new(data_dir.join("submissions")));
            (definition, service)
        } else {
            let id = cli
                .assessment_id
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("an assessment id or --definition is required"))?;
            let service: Arc<dyn AssessmentService + Send + Sync> =
                Arc::new(HttpAssessmentService::new(&cli.server));
            let definition = service.fetch_definition(id)?;
            (definition, service)
        };

    validate_definition(&definition)?;
    tracing::info!(
        assessment = %definition.id,
        title = %definition.title,
        questions = definition.question_count(),
        "definition loaded"
    );

    Ok(Bootstrap {
        session: Session::new(definition, cli.threshold),
        service,
    })
}

pub fn load_definition_file(path: &Path) -> Result<AssessmentDefinition, DefinitionError> {
    let content = std::fs::read_to_string(path).map_err(|source| DefinitionError::Read {
        path: path.display().to_string(),
        source,
    })?;
    serde_yaml::from_str(&content).map_err(|e| DefinitionError::Parse(e.to_string()))
}

pub fn validate_definition(definition: &AssessmentDefinition) -> Result<(), DefinitionError> {
    if definition.questions.is_empty() {
        return Err(DefinitionError::Invalid("no questions".to_string()));
    }
    if definition.duration_minutes == 0 {
        return Err(DefinitionError::Invalid("zero duration".to_string()));
    }
    if definition.end <= definition.start {
        return Err(DefinitionError::Invalid(
            "window ends before it starts".to_string(),
        ));
    }
    for (index, question) in definition.questions.iter().enumerate() {
        if question.marks == 0 {
            return Err(DefinitionError::Invalid(format!(
                "question {} has zero marks",
                index + 1
            )));
        }
        if let QuestionKind::MultipleChoice { options } = &question.kind {
            if options.len() < 2 {
                return Err(DefinitionError::Invalid(format!(
                    "question {} needs at least two options",
                    index + 1
                )));
            }
        }
    }
    Ok(())
}

/// Platform data dir (logs, offline exports), overridable from the CLI.
pub fn resolve_data_dir(cli: &Cli) -> PathBuf {
    if let Some(dir) = &cli.data_dir {
        return PathBuf::from(dir);
    }
    directories::ProjectDirs::from("", "", "termexam")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}
