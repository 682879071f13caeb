//! # yas-docs
//!
//! Keeps the project status artifacts in sync with `docs/tasks.yaml`.
//!
//! - [`TaskDocument`] parses and validates the task file
//! - [`normalize`] orders metadata, categories and tasks and sorts the
//!   execution log
//! - [`render_status`] and [`render_execution_log`] project the document into
//!   markdown
//! - [`sync`] ties them together with optional session append, check mode and
//!   atomic write-if-changed
//!
//! Scalar quoting in the written YAML is controlled per value through
//! [`yaml::Node`].

mod append;
mod document;
mod error;
mod normalize;
mod report;
mod sync;
pub mod yaml;

pub use append::LogAppend;
pub use document::{
    DATE_FORMAT, ExecutionLogEntry, ExecutionLogRow, PINNED_METADATA_KEYS, STANDARD_CATEGORIES,
    TIME_FORMAT, TaskCategory, TaskDocument, TaskRecord,
};
pub use error::DocsError;
pub use normalize::{iso_date, normalize, ordered_metadata};
pub use report::{escape_cell, render_execution_log, render_status};
pub use sync::{AppendedSession, SyncOptions, SyncPaths, SyncReport, sync};
