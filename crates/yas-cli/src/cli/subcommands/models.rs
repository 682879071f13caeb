use clap::{Args, Subcommand};

/// Entity generation.
#[derive(Clone, Debug, Subcommand)]
pub enum ModelsCommands {
    /// Generate one entity file per table in the table list.
    Generate(GenerateArgs),
    /// List dump tables that have no generated entity file.
    Missing(MissingArgs),
}

#[derive(Clone, Debug, Args)]
pub struct GenerateArgs {
    /// SQL dump to read (defaults to `models.sql_dump`).
    #[arg(long)]
    pub sql: Option<String>,
    /// Table list, one name per line (defaults to `models.table_list`).
    #[arg(long)]
    pub tables: Option<String>,
    /// Output directory (defaults to `models.output_dir`).
    #[arg(long)]
    pub output: Option<String>,
    /// Namespace for generated classes (defaults to `models.namespace`).
    #[arg(long)]
    pub namespace: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct MissingArgs {
    /// SQL dump to read (defaults to `models.sql_dump`).
    #[arg(long)]
    pub sql: Option<String>,
    /// Directory holding generated entities (defaults to `models.output_dir`).
    #[arg(long)]
    pub output: Option<String>,
    /// Store the list in the configured table-list file.
    #[arg(long)]
    pub write: bool,
}
