use clap::Subcommand;

use crate::cli::subcommands::{DocsCommands, ModelsCommands};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Entity generation from the SQL schema dump.
    Models {
        #[command(subcommand)]
        action: ModelsCommands,
    },
    /// Status documentation maintenance.
    Docs {
        #[command(subcommand)]
        action: DocsCommands,
    },
}
