//! Error types for the compass core library.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Comprehensive error type for all compass operations.
#[derive(Error, Debug)]
pub enum CompassError {
    /// No workflow or checklist definition resolves to the given name
    #[error("No workflow or checklist named '{name}'")]
    DefinitionNotFound { name: String },
    /// Session not found for the given ID (absent or expired)
    #[error("Session '{id}' not found (it may have completed or expired)")]
    SessionNotFound { id: String },
    /// Plan item not found for the given ID
    #[error("Plan item '{id}' not found")]
    PlanItemNotFound { id: String },
    /// Operation is illegal for the current session or frame state
    #[error("Invalid session state: {message}")]
    InvalidState { message: String },
    /// File system operation errors
    #[error("File system error at path '{path}': {source}")]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Serialization/deserialization errors for persisted records
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
    /// A definition file could not be parsed as YAML
    #[error("Failed to parse definition '{path}': {source}")]
    DefinitionParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    /// A definition file parsed but failed validation
    #[error("Invalid definition '{path}': {reason}")]
    InvalidDefinition { path: PathBuf, reason: String },
    /// Invalid input validation errors
    #[error("Invalid input for field '{field}': {reason}")]
    InvalidInput { field: String, reason: String },
    /// XDG directory specification errors
    #[error("XDG directory error: {0}")]
    XdgDirectory(String),
}

impl CompassError {
    /// Creates a persistence error for a filesystem failure at a path.
    pub fn persistence(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Persistence {
            path: path.into(),
            source,
        }
    }

    /// Creates an invalid-state error with a message.
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState {
            message: message.into(),
        }
    }

    /// Creates an invalid-input error for a field.
    pub fn invalid_input(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Extension trait mapping I/O results to persistence errors with the
/// offending path attached.
pub trait PersistenceResultExt<T> {
    /// Attach a path to an I/O error, converting to `CompassError`.
    fn at_path(self, path: &Path) -> Result<T>;
}

impl<T> PersistenceResultExt<T> for std::result::Result<T, std::io::Error> {
    fn at_path(self, path: &Path) -> Result<T> {
        self.map_err(|e| CompassError::persistence(path, e))
    }
}

/// Result type alias for compass operations
pub type Result<T> = std::result::Result<T, CompassError>;
