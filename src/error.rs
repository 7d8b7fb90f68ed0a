use thiserror::Error;

/// Errors from the assessment service wire contract.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("assessment {0} not found")]
    NotFound(String),

    #[error("service error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    #[error("network error: {0}")]
    Network(String),

    #[error("malformed service response: {0}")]
    Decode(String),

    /// The service answered `success: false`. Recoverable: the session
    /// returns to InProgress and a later trigger may retry.
    #[error("submission rejected: {0}")]
    Rejected(String),
}

impl From<reqwest::Error> for ServiceError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ServiceError::Decode(e.to_string())
        } else {
            ServiceError::Network(e.to_string())
        }
    }
}

/// Errors loading or validating an assessment definition.
#[derive(Debug, Error)]
pub enum DefinitionError {
    #[error("cannot read definition file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("malformed definition: {0}")]
    Parse(String),

    #[error("invalid definition: {0}")]
    Invalid(String),
}
