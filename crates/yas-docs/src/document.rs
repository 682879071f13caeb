//! Typed view of `docs/tasks.yaml`.
//!
//! Parsing validates the document shape and canonicalizes log dates and
//! timestamps; ordering and sorting happen in [`crate::normalize`].

use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;
use serde_yaml::{Mapping, Value};
use tracing::warn;

use crate::error::DocsError;
use crate::yaml::{self, Node, inline_text, key_text, scalar_text};

/// Metadata keys emitted first, in this order.
pub const PINNED_METADATA_KEYS: [&str; 4] =
    ["project_overview", "current_focus", "blockers", "next_steps"];

/// Task categories that always exist, in this order.
pub const STANDARD_CATEGORIES: [&str; 3] = ["backlog", "in_progress", "completed"];

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M";

const TOP_LEVEL_KEYS: [&str; 3] = ["metadata", "tasks", "execution_log"];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskDocument {
    /// Free-form project metadata in document order.
    pub metadata: Mapping,
    pub categories: Vec<TaskCategory>,
    pub execution_log: Vec<ExecutionLogEntry>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskCategory {
    pub name: String,
    pub tasks: Vec<TaskRecord>,
}

/// One task. A `None` field was absent from the source; `Some(Value::Null)`
/// was present but empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskRecord {
    pub id: Option<Value>,
    pub title: Option<Value>,
    pub owner: Option<Value>,
    pub due: Option<Value>,
    pub completed_on: Option<Value>,
    pub notes: Option<Value>,
    /// Unrecognized fields in source order.
    pub extra: Mapping,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutionLogEntry {
    pub date: NaiveDate,
    pub author: String,
    pub summary: String,
    pub rows: Vec<ExecutionLogRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutionLogRow {
    pub timestamp: NaiveTime,
    pub change: String,
    pub notes: String,
}

impl TaskDocument {
    /// Load a task document. A missing or blank file is an empty document.
    pub fn load(path: &Path) -> Result<Self, DocsError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(source) if source.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => return Err(DocsError::io(path, source)),
        };
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        let value: Value = serde_yaml::from_str(&text).map_err(|source| DocsError::Yaml {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_value(value)
    }

    /// Parse YAML text. Blank text is an empty document.
    pub fn parse(text: &str) -> Result<Self, DocsError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        let value: Value = serde_yaml::from_str(text)
            .map_err(|source| DocsError::validation(format!("malformed YAML: {source}")))?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, DocsError> {
        ensure_unique_keys(&value, "")?;
        let root = match value {
            Value::Null => return Ok(Self::default()),
            Value::Mapping(root) => root,
            _ => return Err(DocsError::validation("document root must be a mapping")),
        };

        for key in root.keys() {
            let key = key_text(key);
            if !TOP_LEVEL_KEYS.contains(&key.as_str()) {
                warn!(%key, "dropping unknown top-level key from task document");
            }
        }

        let metadata = match root.get("metadata") {
            None | Some(Value::Null) => Mapping::new(),
            Some(Value::Mapping(metadata)) => metadata.clone(),
            Some(_) => return Err(DocsError::validation("metadata section must be a mapping")),
        };

        let categories = match root.get("tasks") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Mapping(tasks)) => parse_categories(tasks)?,
            Some(_) => return Err(DocsError::validation("tasks section must be a mapping")),
        };

        let execution_log = match root.get("execution_log") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Sequence(entries)) => entries
                .iter()
                .enumerate()
                .map(|(index, entry)| ExecutionLogEntry::from_value(index + 1, entry))
                .collect::<Result<_, _>>()?,
            Some(_) => return Err(DocsError::validation("execution_log section must be a list")),
        };

        Ok(Self {
            metadata,
            categories,
            execution_log,
        })
    }

    #[must_use]
    pub fn category(&self, name: &str) -> Option<&TaskCategory> {
        self.categories.iter().find(|category| category.name == name)
    }

    /// Tasks of `name`, empty when the category does not exist.
    #[must_use]
    pub fn tasks(&self, name: &str) -> &[TaskRecord] {
        self.category(name)
            .map_or(&[], |category| category.tasks.as_slice())
    }

    #[must_use]
    pub fn to_node(&self) -> Node {
        let categories = self
            .categories
            .iter()
            .map(|category| {
                let tasks = category.tasks.iter().map(TaskRecord::to_node).collect();
                (category.name.clone(), Node::Seq(tasks))
            })
            .collect();
        let log = self
            .execution_log
            .iter()
            .map(ExecutionLogEntry::to_node)
            .collect();

        Node::Map(vec![
            ("metadata".to_string(), Node::from_mapping(&self.metadata)),
            ("tasks".to_string(), Node::Map(categories)),
            ("execution_log".to_string(), Node::Seq(log)),
        ])
    }

    /// Serialized YAML, ending in one newline.
    #[must_use]
    pub fn to_yaml(&self) -> String {
        yaml::to_string(&self.to_node())
    }
}

fn parse_categories(tasks: &Mapping) -> Result<Vec<TaskCategory>, DocsError> {
    tasks
        .iter()
        .map(|(key, value)| {
            let name = key_text(key);
            let tasks = match value {
                Value::Null => Vec::new(),
                Value::Sequence(items) => items
                    .iter()
                    .map(|item| match item {
                        Value::Mapping(fields) => Ok(TaskRecord::from_mapping(fields)),
                        _ => Err(DocsError::validation(format!(
                            "tasks.{name} must contain mappings"
                        ))),
                    })
                    .collect::<Result<_, _>>()?,
                _ => return Err(DocsError::validation(format!("tasks.{name} must be a list"))),
            };
            Ok(TaskCategory { name, tasks })
        })
        .collect()
}

impl TaskRecord {
    #[must_use]
    pub fn from_mapping(fields: &Mapping) -> Self {
        let mut record = Self::default();
        for (key, value) in fields {
            let slot = match key_text(key).as_str() {
                "id" => &mut record.id,
                "title" => &mut record.title,
                "owner" => &mut record.owner,
                "due" => &mut record.due,
                "completed_on" => &mut record.completed_on,
                "notes" => &mut record.notes,
                _ => {
                    record.extra.insert(key.clone(), value.clone());
                    continue;
                }
            };
            *slot = Some(value.clone());
        }
        record
    }

    /// Known fields in canonical order, then extras. String dates are quoted.
    #[must_use]
    pub fn to_node(&self) -> Node {
        let known = [
            ("id", &self.id, false),
            ("title", &self.title, false),
            ("owner", &self.owner, false),
            ("due", &self.due, true),
            ("completed_on", &self.completed_on, true),
            ("notes", &self.notes, false),
        ];

        let mut fields: Vec<(String, Node)> = known
            .into_iter()
            .filter_map(|(key, value, is_date)| {
                let node = match value.as_ref()? {
                    Value::String(text) if is_date => Node::quoted(text.clone()),
                    value => Node::from_value(value),
                };
                Some((key.to_string(), node))
            })
            .collect();
        fields.extend(
            self.extra
                .iter()
                .map(|(key, value)| (key_text(key), Node::from_value(value))),
        );
        Node::Map(fields)
    }
}

impl ExecutionLogEntry {
    fn from_value(position: usize, value: &Value) -> Result<Self, DocsError> {
        let Value::Mapping(fields) = value else {
            return Err(DocsError::validation("execution_log must contain mappings"));
        };

        let raw_date = fields.get("date").map(inline_text).unwrap_or_default();
        let date = NaiveDate::parse_from_str(raw_date.trim(), DATE_FORMAT).map_err(|_| {
            DocsError::validation(format!(
                "invalid date in execution_log entry {position}: '{raw_date}'"
            ))
        })?;

        let rows = match fields.get("entries") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Sequence(rows)) => rows
                .iter()
                .map(|row| ExecutionLogRow::from_value(date, row))
                .collect::<Result<_, _>>()?,
            Some(_) => {
                return Err(DocsError::validation(format!(
                    "execution_log entry {date} must contain an 'entries' list"
                )));
            }
        };

        Ok(Self {
            date,
            author: text_field(fields, "author"),
            summary: text_field(fields, "summary"),
            rows,
        })
    }

    #[must_use]
    pub fn to_node(&self) -> Node {
        let rows = self.rows.iter().map(ExecutionLogRow::to_node).collect();
        Node::Map(vec![
            (
                "date".to_string(),
                Node::plain(self.date.format(DATE_FORMAT).to_string()),
            ),
            ("author".to_string(), Node::plain(self.author.clone())),
            ("summary".to_string(), Node::plain(self.summary.clone())),
            ("entries".to_string(), Node::Seq(rows)),
        ])
    }
}

impl ExecutionLogRow {
    fn from_value(date: NaiveDate, value: &Value) -> Result<Self, DocsError> {
        let Value::Mapping(fields) = value else {
            return Err(DocsError::validation(format!(
                "execution_log entry {date} rows must be mappings"
            )));
        };

        let raw = text_field(fields, "timestamp");
        let timestamp = NaiveTime::parse_from_str(&raw, TIME_FORMAT).map_err(|_| {
            DocsError::validation(format!(
                "invalid timestamp in execution_log entry {date}: '{raw}'"
            ))
        })?;

        Ok(Self {
            timestamp,
            change: text_field(fields, "change"),
            notes: text_field(fields, "notes"),
        })
    }

    #[must_use]
    pub fn to_node(&self) -> Node {
        Node::Map(vec![
            (
                "timestamp".to_string(),
                Node::quoted(self.timestamp.format(TIME_FORMAT).to_string()),
            ),
            ("change".to_string(), Node::plain(self.change.clone())),
            ("notes".to_string(), Node::plain(self.notes.clone())),
        ])
    }
}

/// Mapping keys are written as text, so two keys with the same text
/// (`1` and `'1'`) cannot both be kept.
fn ensure_unique_keys(value: &Value, path: &str) -> Result<(), DocsError> {
    match value {
        Value::Mapping(mapping) => {
            let mut seen = HashSet::new();
            for (key, child) in mapping {
                let key = key_text(key);
                let child_path = if path.is_empty() {
                    key.clone()
                } else {
                    format!("{path}.{key}")
                };
                if !seen.insert(key.clone()) {
                    let location = if path.is_empty() { "document root" } else { path };
                    return Err(DocsError::validation(format!(
                        "duplicate key '{key}' in {location}"
                    )));
                }
                ensure_unique_keys(child, &child_path)?;
            }
            Ok(())
        }
        Value::Sequence(items) => items
            .iter()
            .try_for_each(|item| ensure_unique_keys(item, path)),
        Value::Tagged(tagged) => ensure_unique_keys(&tagged.value, path),
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => Ok(()),
    }
}

/// Trimmed text of a scalar field; empty when absent or null.
fn text_field(fields: &Mapping, key: &str) -> String {
    fields
        .get(key)
        .and_then(scalar_text)
        .map(|text| text.trim().to_string())
        .unwrap_or_default()
}
