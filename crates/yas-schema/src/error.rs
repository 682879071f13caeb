//! Error types for yas-schema.

use std::path::PathBuf;

/// Errors raised while extracting tables or writing generated entities.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// The requested table has no `CREATE TABLE` block in the dump.
    #[error("table {table} not found in SQL dump")]
    TableNotFound { table: String },

    #[error("I/O error at '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl SchemaError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
