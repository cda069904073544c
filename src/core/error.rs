use std::io;
use std::time::Duration;
use thiserror::Error;

/// Reasons a user turn is rejected before anything is dispatched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// The message was empty after trimming whitespace
    EmptyMessage,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::EmptyMessage => write!(f, "message is empty"),
        }
    }
}

/// Unified error type for the chat client
#[derive(Error, Debug)]
pub enum ChatError {
    /// A user turn failed validation; nothing was appended
    #[error("Validation error: {0}")]
    Validation(ValidationError),

    /// A model id is not registered in the catalog
    #[error("Model not found: {0}")]
    ModelNotFound(String),

    /// A model id was registered twice
    #[error("Duplicate model id: {0}")]
    DuplicateModel(String),

    /// A connector id is not registered
    #[error("Unknown connector: {0}")]
    UnknownConnector(String),

    /// A correlation id does not name an outstanding request
    #[error("No pending request with id {0}")]
    UnknownRequest(u64),

    /// The response provider rejected the request
    #[error("Provider failure: {0}")]
    ProviderFailure(String),

    /// The response provider did not answer in time
    #[error("Provider timed out after {}s", .0.as_secs_f64())]
    ProviderTimeout(Duration),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// User input errors
    #[error("Input error: {0}")]
    Input(String),

    /// IO-related errors
    #[error("IO error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl ChatError {
    /// Errors the caller absorbs locally instead of surfacing as failures
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ChatError::Validation(_) | ChatError::ModelNotFound(_) | ChatError::UnknownConnector(_)
        )
    }
}

impl From<ValidationError> for ChatError {
    fn from(err: ValidationError) -> Self {
        ChatError::Validation(err)
    }
}

impl From<serde_json::Error> for ChatError {
    fn from(err: serde_json::Error) -> Self {
        ChatError::Serialization(format!("JSON error: {}", err))
    }
}

impl From<serde_yml::Error> for ChatError {
    fn from(err: serde_yml::Error) -> Self {
        ChatError::Serialization(format!("YAML error: {}", err))
    }
}

