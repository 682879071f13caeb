//! Error types for yas-docs.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum DocsError {
    #[error("I/O error at '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse task document '{}': {source}", path.display())]
    Yaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    /// The task document does not have the expected shape.
    #[error("invalid task document: {0}")]
    Validation(String),

    /// A log append request is incomplete or malformed.
    #[error("{0}")]
    InvalidAppend(String),

    #[error("Invalid --log-date value: '{0}'")]
    InvalidDate(String),

    #[error("Invalid timestamp in --log-entry: '{0}'")]
    InvalidTimestamp(String),

    #[error("--append-log cannot be combined with --check")]
    AppendWithCheck,
}

impl DocsError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}
