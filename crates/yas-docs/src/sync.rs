//! One sync pass: load, optionally append, normalize, render, write-if-changed.

use std::fs;
use std::io::{ErrorKind, Write as _};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Serialize;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::append::LogAppend;
use crate::document::TaskDocument;
use crate::error::DocsError;
use crate::normalize::normalize;
use crate::report::{render_execution_log, render_status};

/// The three artifacts a sync maintains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncPaths {
    pub tasks: PathBuf,
    pub status: PathBuf,
    pub execution_log: PathBuf,
}

#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    /// Report drift without writing.
    pub check: bool,
    pub append: Option<LogAppend>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppendedSession {
    pub date: NaiveDate,
    pub author: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub check: bool,
    pub written: Vec<PathBuf>,
    pub unchanged: Vec<PathBuf>,
    /// Artifacts that differ from their rendered form. Only filled in check mode.
    pub out_of_date: Vec<PathBuf>,
    pub appended: Option<AppendedSession>,
}

impl SyncReport {
    #[must_use]
    pub fn is_up_to_date(&self) -> bool {
        self.out_of_date.is_empty()
    }
}

/// Run one sync pass.
///
/// Every artifact is rendered before the first write, so validation and
/// append errors leave all files untouched.
pub fn sync(paths: &SyncPaths, options: &SyncOptions) -> Result<SyncReport, DocsError> {
    if options.check && options.append.is_some() {
        return Err(DocsError::AppendWithCheck);
    }
    let session = options.append.as_ref().map(LogAppend::build).transpose()?;

    let mut document = TaskDocument::load(&paths.tasks)?;
    if let Some(session) = &session {
        document.execution_log.push(session.clone());
    }
    normalize(&mut document);

    let artifacts = [
        (&paths.tasks, document.to_yaml()),
        (&paths.status, render_status(&document)),
        (&paths.execution_log, render_execution_log(&document)),
    ];

    let mut report = SyncReport {
        check: options.check,
        ..SyncReport::default()
    };
    for (path, content) in artifacts {
        if read_existing(path)? == content {
            debug!(path = %path.display(), "artifact unchanged");
            report.unchanged.push(path.clone());
        } else if options.check {
            debug!(path = %path.display(), "artifact out of date");
            report.out_of_date.push(path.clone());
        } else {
            write_atomic(path, &content)?;
            debug!(path = %path.display(), "artifact written");
            report.written.push(path.clone());
        }
    }

    report.appended = session.map(|session| AppendedSession {
        date: session.date,
        author: session.author,
    });
    Ok(report)
}

/// Current content of `path`; empty when the file does not exist.
fn read_existing(path: &Path) -> Result<String, DocsError> {
    match fs::read(path) {
        Ok(bytes) => Ok(String::from_utf8_lossy(&bytes).into_owned()),
        Err(source) if source.kind() == ErrorKind::NotFound => Ok(String::new()),
        Err(source) => Err(DocsError::io(path, source)),
    }
}

/// Write through a temp file in the target directory, then rename over it.
fn write_atomic(path: &Path, content: &str) -> Result<(), DocsError> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(|source| DocsError::io(parent, source))?;

    let mut file = NamedTempFile::new_in(parent).map_err(|source| DocsError::io(parent, source))?;
    file.write_all(content.as_bytes())
        .map_err(|source| DocsError::io(file.path(), source))?;
    file.persist(path)
        .map_err(|error| DocsError::io(path, error.error))?;
    Ok(())
}
