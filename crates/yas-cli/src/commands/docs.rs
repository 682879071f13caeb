use std::path::PathBuf;
use std::process::ExitCode;

use serde::Serialize;
use yas_docs::{AppendedSession, LogAppend, SyncOptions, SyncPaths, sync};

use crate::cli::GlobalFlags;
use crate::cli::subcommands::{DocsCommands, SyncArgs};
use crate::context::AppContext;
use crate::output::{TextView, output};

/// Handle `yas docs`.
pub fn handle(
    action: &DocsCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<ExitCode> {
    match action {
        DocsCommands::Sync(args) => handle_sync(args, ctx, flags),
    }
}

#[derive(Debug, Serialize)]
struct SyncResponse {
    check: bool,
    written: Vec<PathBuf>,
    unchanged: Vec<PathBuf>,
    out_of_date: Vec<PathBuf>,
    appended: Option<AppendedSession>,
}

impl TextView for SyncResponse {
    /// Drift is reported on stderr, so check mode prints nothing here.
    fn to_text(&self) -> String {
        self.appended
            .as_ref()
            .map(|session| {
                format!(
                    "Appended execution session for {} by {}.",
                    session.date, session.author
                )
            })
            .unwrap_or_default()
    }
}

fn handle_sync(
    args: &SyncArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<ExitCode> {
    let docs = &ctx.config.docs;
    let paths = SyncPaths {
        tasks: ctx.resolve(&docs.tasks),
        status: ctx.resolve(&docs.status),
        execution_log: ctx.resolve(&docs.execution_log),
    };
    let options = SyncOptions {
        check: args.check,
        append: args.append_log.then(|| LogAppend {
            date: args.log_date.clone(),
            author: args.log_author.clone(),
            summary: args.log_summary.clone(),
            entries: args.log_entries.clone(),
        }),
    };

    let report = sync(&paths, &options)?;

    let relative = |paths: Vec<PathBuf>| -> Vec<PathBuf> {
        paths
            .iter()
            .map(|path| ctx.display_path(path).to_path_buf())
            .collect()
    };
    let response = SyncResponse {
        check: report.check,
        written: relative(report.written),
        unchanged: relative(report.unchanged),
        out_of_date: relative(report.out_of_date),
        appended: report.appended,
    };
    output(&response, flags)?;

    if response.out_of_date.is_empty() {
        return Ok(ExitCode::SUCCESS);
    }
    let listed: Vec<String> = response
        .out_of_date
        .iter()
        .map(|path| path.display().to_string())
        .collect();
    eprintln!(
        "Status documentation is out of date: {}",
        listed.join(", ")
    );
    Ok(ExitCode::FAILURE)
}
