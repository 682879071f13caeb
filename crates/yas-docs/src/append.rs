//! Building a new execution-log session from command-line input.

use chrono::{NaiveDate, NaiveTime};

use crate::document::{DATE_FORMAT, ExecutionLogEntry, ExecutionLogRow, TIME_FORMAT};
use crate::error::DocsError;

const ENTRY_FORMAT_ERROR: &str = "Each --log-entry must contain exactly two pipe characters \
                                  and be in the format 'HH:MM|Change|Notes'.";

/// Raw `--append-log` arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogAppend {
    pub date: Option<String>,
    pub author: Option<String>,
    pub summary: Option<String>,
    /// `HH:MM|Change|Notes` rows.
    pub entries: Vec<String>,
}

impl LogAppend {
    /// Validate every argument and build the session.
    ///
    /// Fails before touching any document, so a bad row never leaves a
    /// partial session behind.
    pub fn build(&self) -> Result<ExecutionLogEntry, DocsError> {
        let required = [
            ("--log-date", &self.date),
            ("--log-author", &self.author),
            ("--log-summary", &self.summary),
        ];
        let missing: Vec<&str> = required
            .iter()
            .filter(|(_, value)| value.as_deref().is_none_or(|value| value.trim().is_empty()))
            .map(|(flag, _)| *flag)
            .collect();
        if !missing.is_empty() {
            return Err(DocsError::InvalidAppend(format!(
                "Missing required arguments for --append-log: {}",
                missing.join(", ")
            )));
        }
        if self.entries.is_empty() {
            return Err(DocsError::InvalidAppend(
                "At least one --log-entry is required when using --append-log".to_string(),
            ));
        }

        let raw_date = self.date.as_deref().unwrap_or_default();
        let date = NaiveDate::parse_from_str(raw_date.trim(), DATE_FORMAT)
            .map_err(|_| DocsError::InvalidDate(raw_date.to_string()))?;
        let rows = self
            .entries
            .iter()
            .map(|raw| parse_row(raw))
            .collect::<Result<_, _>>()?;

        Ok(ExecutionLogEntry {
            date,
            author: trimmed(self.author.as_deref()),
            summary: trimmed(self.summary.as_deref()),
            rows,
        })
    }
}

fn parse_row(raw: &str) -> Result<ExecutionLogRow, DocsError> {
    let parts: Vec<&str> = raw.split('|').map(str::trim).collect();
    let [timestamp, change, notes] = parts.as_slice() else {
        return Err(DocsError::InvalidAppend(ENTRY_FORMAT_ERROR.to_string()));
    };
    if timestamp.is_empty() {
        return Err(DocsError::InvalidAppend(ENTRY_FORMAT_ERROR.to_string()));
    }
    let timestamp = NaiveTime::parse_from_str(timestamp, TIME_FORMAT)
        .map_err(|_| DocsError::InvalidTimestamp((*timestamp).to_string()))?;

    Ok(ExecutionLogRow {
        timestamp,
        change: (*change).to_string(),
        notes: (*notes).to_string(),
    })
}

fn trimmed(value: Option<&str>) -> String {
    value.unwrap_or_default().trim().to_string()
}
