use clap::{Args, Subcommand};

/// Status documentation.
#[derive(Clone, Debug, Subcommand)]
pub enum DocsCommands {
    /// Normalize the task file and regenerate STATUS.md and EXECUTION_LOG.md.
    Sync(SyncArgs),
}

#[derive(Clone, Debug, Args)]
pub struct SyncArgs {
    /// Do not write files; exit with 1 if changes would be made.
    #[arg(long)]
    pub check: bool,
    /// Append a new execution log session using the --log-* arguments.
    #[arg(long)]
    pub append_log: bool,
    /// Date for the new session (YYYY-MM-DD).
    #[arg(long)]
    pub log_date: Option<String>,
    /// Author of the execution session.
    #[arg(long)]
    pub log_author: Option<String>,
    /// Short summary for the session.
    #[arg(long)]
    pub log_summary: Option<String>,
    /// Session row in the format 'HH:MM|Change|Notes'. Repeat for more rows.
    #[arg(long = "log-entry")]
    pub log_entries: Vec<String>,
}
