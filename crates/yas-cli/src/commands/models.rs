use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use serde::Serialize;
use yas_schema::{
    GenerateRequest, GeneratedEntity, generate_entities, read_sql_dump, tables_without_entities,
    write_table_list,
};

use crate::cli::GlobalFlags;
use crate::cli::subcommands::{GenerateArgs, MissingArgs, ModelsCommands};
use crate::context::AppContext;
use crate::output::{TextView, output};

/// Handle `yas models`.
pub fn handle(
    action: &ModelsCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<ExitCode> {
    match action {
        ModelsCommands::Generate(args) => generate(args, ctx, flags),
        ModelsCommands::Missing(args) => missing(args, ctx, flags),
    }
}

#[derive(Debug, Serialize)]
struct GenerateResponse {
    output_dir: PathBuf,
    generated: Vec<GeneratedEntity>,
    skipped: Vec<String>,
}

impl TextView for GenerateResponse {
    fn to_text(&self) -> String {
        let mut lines = vec![format!(
            "Generated {} {} in {}",
            self.generated.len(),
            plural(self.generated.len(), "entity", "entities"),
            self.output_dir.display()
        )];
        lines.extend(self.generated.iter().map(|entity| {
            format!(
                "  {}  {} ({} {})",
                entity.path.display(),
                entity.table,
                entity.columns,
                plural(entity.columns, "column", "columns")
            )
        }));
        if !self.skipped.is_empty() {
            lines.push(format!(
                "Skipped {} {} missing from the SQL dump: {}",
                self.skipped.len(),
                plural(self.skipped.len(), "table", "tables"),
                self.skipped.join(", ")
            ));
        }
        lines.join("\n")
    }
}

fn generate(
    args: &GenerateArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<ExitCode> {
    let mut config = ctx.config.clone();
    let models = &mut config.models;
    if let Some(sql) = &args.sql {
        models.sql_dump.clone_from(sql);
    }
    if let Some(tables) = &args.tables {
        models.table_list.clone_from(tables);
    }
    if let Some(output_dir) = &args.output {
        models.output_dir.clone_from(output_dir);
    }
    if let Some(namespace) = &args.namespace {
        models.namespace.clone_from(namespace);
    }
    config.validate().context("invalid models options")?;

    let request = GenerateRequest {
        sql_dump: ctx.resolve(&config.models.sql_dump),
        table_list: ctx.resolve(&config.models.table_list),
        output_dir: ctx.resolve(&config.models.output_dir),
        namespace: config.models.namespace.trim().to_string(),
    };
    let report = generate_entities(&request).context("entity generation failed")?;
    for table in &report.skipped {
        eprintln!("Table '{table}' not found in SQL dump; skipping.");
    }

    let response = GenerateResponse {
        output_dir: ctx.display_path(&request.output_dir).to_path_buf(),
        generated: report
            .generated
            .into_iter()
            .map(|entity| GeneratedEntity {
                path: ctx.display_path(&entity.path).to_path_buf(),
                ..entity
            })
            .collect(),
        skipped: report.skipped,
    };
    output(&response, flags)?;
    Ok(ExitCode::SUCCESS)
}

#[derive(Debug, Serialize)]
struct MissingResponse {
    tables: Vec<String>,
    written_to: Option<PathBuf>,
}

impl TextView for MissingResponse {
    fn to_text(&self) -> String {
        let mut lines = if self.tables.is_empty() {
            vec!["All dump tables have generated entities.".to_string()]
        } else {
            self.tables.clone()
        };
        if let Some(path) = &self.written_to {
            lines.push(format!(
                "Wrote {} table {} to {}",
                self.tables.len(),
                plural(self.tables.len(), "name", "names"),
                path.display()
            ));
        }
        lines.join("\n")
    }
}

fn missing(
    args: &MissingArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<ExitCode> {
    let models = &ctx.config.models;
    let sql_dump = ctx.resolve(args.sql.as_deref().unwrap_or(&models.sql_dump));
    let output_dir = ctx.resolve(args.output.as_deref().unwrap_or(&models.output_dir));

    let dump = read_sql_dump(&sql_dump).context("failed to read SQL dump")?;
    let tables = tables_without_entities(&dump, &output_dir);

    let written_to = if args.write {
        let path = ctx.resolve(&models.table_list);
        write_table_list(&path, &tables).context("failed to write table list")?;
        Some(ctx.display_path(&path).to_path_buf())
    } else {
        None
    };

    output(&MissingResponse { tables, written_to }, flags)?;
    Ok(ExitCode::SUCCESS)
}

const fn plural<'a>(count: usize, one: &'a str, many: &'a str) -> &'a str {
    if count == 1 { one } else { many }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn generate_text_lists_entities_and_skips() {
        let response = GenerateResponse {
            output_dir: PathBuf::from("Models/Generated"),
            generated: vec![GeneratedEntity {
                table: "users".to_string(),
                class_name: "Users".to_string(),
                path: PathBuf::from("Models/Generated/Users.cs"),
                columns: 1,
            }],
            skipped: vec!["ghost".to_string(), "phantom".to_string()],
        };
        assert_eq!(
            response.to_text(),
            "Generated 1 entity in Models/Generated\n  Models/Generated/Users.cs  users (1 column)\nSkipped 2 tables missing from the SQL dump: ghost, phantom"
        );
    }

    #[test]
    fn missing_text_reports_written_list() {
        let response = MissingResponse {
            tables: vec!["audit_log".to_string()],
            written_to: Some(PathBuf::from("tables_without_models.txt")),
        };
        assert_eq!(
            response.to_text(),
            "audit_log\nWrote 1 table name to tables_without_models.txt"
        );
    }
}
