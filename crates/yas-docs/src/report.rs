//! Markdown projections of a normalized [`TaskDocument`].

use serde_yaml::{Number, Value};

use crate::document::{DATE_FORMAT, ExecutionLogEntry, TIME_FORMAT, TaskDocument, TaskRecord};
use crate::yaml::{self, Node, inline_text, key_text};

const NO_OVERVIEW: &str = "Project overview is not yet documented.";
const NO_ACTIVE_WORK: &str = "- No active work items recorded.";
const NO_BLOCKERS: &str = "No active blockers.";
const NO_UPCOMING: &str = "- No upcoming tasks queued.";

/// `docs/STATUS.md`
#[must_use]
pub fn render_status(document: &TaskDocument) -> String {
    let metadata = &document.metadata;
    let mut lines: Vec<String> = Vec::new();

    let overview = metadata
        .get("project_overview")
        .map(inline_text)
        .unwrap_or_default();
    let overview = match overview.trim() {
        "" => NO_OVERVIEW.to_string(),
        text => text.to_string(),
    };
    lines.extend(["# Project Overview".into(), String::new(), overview, String::new()]);

    lines.extend(["# Current Status".into(), String::new()]);
    let focus = bullet_items(metadata.get("current_focus"));
    if !focus.is_empty() {
        lines.extend(focus);
    } else if document.tasks("in_progress").is_empty() {
        lines.push(NO_ACTIVE_WORK.to_string());
    } else {
        lines.extend(document.tasks("in_progress").iter().map(|task| {
            format!(
                "- {}: {} (owner: {}, due: {})",
                field_or(task.id.as_ref(), "N/A"),
                field_or(task.title.as_ref(), "Untitled"),
                field_or(task.owner.as_ref(), "Unassigned"),
                field_or(task.due.as_ref(), "TBD"),
            )
        }));
    }
    lines.push(String::new());

    lines.extend(["# Blockers".into(), String::new()]);
    let blockers = bullet_items(metadata.get("blockers"));
    if blockers.is_empty() {
        lines.push(NO_BLOCKERS.to_string());
    } else {
        lines.extend(blockers);
    }
    lines.push(String::new());

    lines.extend(["# Next Steps".into(), String::new()]);
    let steps = bullet_items(metadata.get("next_steps"));
    if !steps.is_empty() {
        lines.extend(steps);
    } else if document.tasks("backlog").is_empty() {
        lines.push(NO_UPCOMING.to_string());
    } else {
        lines.extend(document.tasks("backlog").iter().map(backlog_line));
    }
    lines.push(String::new());

    lines.join("\n")
}

/// `docs/EXECUTION_LOG.md`, newest session first.
#[must_use]
pub fn render_execution_log(document: &TaskDocument) -> String {
    let entries = &document.execution_log;
    let front_matter = yaml::to_string(&front_matter(entries));

    let mut lines = vec![
        "---".to_string(),
        front_matter.trim_end().to_string(),
        "---".to_string(),
        String::new(),
        "# Execution Log".to_string(),
        String::new(),
    ];

    for entry in entries {
        let heading = format!(
            "## {} — {} ({})",
            entry.date.format(DATE_FORMAT),
            entry.summary,
            entry.author
        );
        lines.extend([
            heading.trim().to_string(),
            String::new(),
            "| Timestamp | Change | Notes |".to_string(),
            "|-----------|--------|-------|".to_string(),
        ]);
        lines.extend(entry.rows.iter().map(|row| {
            format!(
                "| {} | {} | {} |",
                escape_cell(&row.timestamp.format(TIME_FORMAT).to_string()),
                escape_cell(&row.change),
                escape_cell(&row.notes),
            )
        }));
        lines.push(String::new());
    }

    let mut text = lines.join("\n").trim_end().to_string();
    text.push('\n');
    text
}

fn front_matter(entries: &[ExecutionLogEntry]) -> Node {
    let mut fields = vec![(
        "sessions_tracked".to_string(),
        Node::Number(Number::from(entries.len())),
    )];
    if let Some(latest) = entries.first() {
        fields.extend([
            (
                "latest_date".to_string(),
                Node::plain(latest.date.format(DATE_FORMAT).to_string()),
            ),
            ("latest_author".to_string(), Node::plain(latest.author.clone())),
            (
                "latest_summary".to_string(),
                Node::plain(latest.summary.clone()),
            ),
        ]);
    }
    Node::Map(fields)
}

/// Pipe characters would split a markdown table cell.
#[must_use]
pub fn escape_cell(text: &str) -> String {
    text.replace('|', r"\|")
}

/// `- item` lines for a metadata list; a lone scalar is one item.
fn bullet_items(value: Option<&Value>) -> Vec<String> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Sequence(items)) => items
            .iter()
            .map(|item| format!("- {}", inline_text(item)))
            .collect(),
        Some(Value::Mapping(mapping)) => mapping
            .iter()
            .map(|(key, value)| format!("- {}: {}", key_text(key), inline_text(value)))
            .collect(),
        Some(scalar) => {
            let text = inline_text(scalar);
            if text.trim().is_empty() {
                Vec::new()
            } else {
                vec![format!("- {}", text.trim())]
            }
        }
    }
}

fn backlog_line(task: &TaskRecord) -> String {
    format!(
        "- {}: {}",
        field_or(task.id.as_ref(), "N/A"),
        field_or(task.title.as_ref(), "Untitled")
    )
}

fn field_or(value: Option<&Value>, fallback: &str) -> String {
    let text = value.map(inline_text).unwrap_or_default();
    if text.is_empty() {
        fallback.to_string()
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::normalize::normalize;

    fn document(text: &str) -> TaskDocument {
        let mut document = TaskDocument::parse(text).expect("document parses");
        normalize(&mut document);
        document
    }

    #[test]
    fn empty_document_uses_every_fallback() {
        let expected = "\
# Project Overview

Project overview is not yet documented.

# Current Status

- No active work items recorded.

# Blockers

No active blockers.

# Next Steps

- No upcoming tasks queued.
";
        assert_eq!(render_status(&TaskDocument::default()), expected);
    }

    #[test]
    fn tasks_fill_status_when_metadata_lists_are_empty() {
        let document = document(
            "metadata:
  project_overview: '  Quality tracker  '
  current_focus: []
tasks:
  in_progress:
    - id: T-4
      title: Audit trail
      owner: null
  backlog:
    - title: Export CSV
",
        );

        let expected = "\
# Project Overview

Quality tracker

# Current Status

- T-4: Audit trail (owner: Unassigned, due: TBD)

# Blockers

No active blockers.

# Next Steps

- N/A: Export CSV
";
        assert_eq!(render_status(&document), expected);
    }

    #[test]
    fn metadata_lists_take_precedence() {
        let document = document(
            "metadata:
  current_focus: Stabilize sync
  blockers:
    - Vendor API down
  next_steps:
    - Ship 1.2
tasks:
  in_progress:
    - id: T-1
",
        );

        let status = render_status(&document);
        assert!(status.contains("# Current Status\n\n- Stabilize sync\n"));
        assert!(status.contains("# Blockers\n\n- Vendor API down\n"));
        assert!(status.contains("# Next Steps\n\n- Ship 1.2\n"));
        assert!(!status.contains("T-1"));
    }

    #[test]
    fn execution_log_has_front_matter_and_escaped_tables() {
        let document = document(
            "execution_log:
  - date: '2025-01-15'
    author: Ana
    summary: Kickoff
    entries:
      - timestamp: '10:00'
        change: Draft
        notes: ''
  - date: '2025-02-01'
    author: Ben
    summary: 'Schema: sync'
    entries:
      - timestamp: '09:00'
        change: Added a|b column
        notes: see | docs
",
        );

        let expected = "\
---
sessions_tracked: 2
latest_date: '2025-02-01'
latest_author: Ben
latest_summary: 'Schema: sync'
---

# Execution Log

## 2025-02-01 — Schema: sync (Ben)

| Timestamp | Change | Notes |
|-----------|--------|-------|
| 09:00 | Added a\\|b column | see \\| docs |

## 2025-01-15 — Kickoff (Ana)

| Timestamp | Change | Notes |
|-----------|--------|-------|
| 10:00 | Draft |  |
";
        assert_eq!(render_execution_log(&document), expected);
    }

    #[test]
    fn empty_log_renders_count_only() {
        assert_eq!(
            render_execution_log(&TaskDocument::default()),
            "---\nsessions_tracked: 0\n---\n\n# Execution Log\n"
        );
    }
}
