//! Documentation sync configuration.

use serde::{Deserialize, Serialize};

fn default_tasks() -> String {
    "docs/tasks.yaml".to_string()
}

fn default_status() -> String {
    "docs/STATUS.md".to_string()
}

fn default_execution_log() -> String {
    "docs/EXECUTION_LOG.md".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DocsConfig {
    /// Task document (source of truth, rewritten in normalized form).
    #[serde(default = "default_tasks")]
    pub tasks: String,

    /// Status digest rendered from metadata and tasks.
    #[serde(default = "default_status")]
    pub status: String,

    /// Session log digest rendered from the execution log.
    #[serde(default = "default_execution_log")]
    pub execution_log: String,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            tasks: default_tasks(),
            status: default_status(),
            execution_log: default_execution_log(),
        }
    }
}
