//! Batch generation: one entity file per requested table.
//!
//! A table missing from the dump is a per-table warning, never a batch
//! failure. I/O errors abort the batch.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

use crate::dump::SchemaDump;
use crate::entity::EntityDescriptor;
use crate::error::SchemaError;
use crate::naming::pascal_case;
use crate::render::render_csharp;

/// Inputs of a generation run.
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub sql_dump: PathBuf,
    pub table_list: PathBuf,
    pub output_dir: PathBuf,
    pub namespace: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedEntity {
    pub table: String,
    pub class_name: String,
    pub path: PathBuf,
    pub columns: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GenerationReport {
    pub generated: Vec<GeneratedEntity>,
    /// Requested tables with no `CREATE TABLE` block in the dump.
    pub skipped: Vec<String>,
}

/// Read the dump and table list named by `request`, then generate.
pub fn generate_entities(request: &GenerateRequest) -> Result<GenerationReport, SchemaError> {
    let dump = read_sql_dump(&request.sql_dump)?;
    let tables = read_table_list(&request.table_list)?;
    generate_from_dump(&dump, &tables, &request.output_dir, &request.namespace)
}

/// Generate entity files for `tables` into `output_dir`.
pub fn generate_from_dump(
    dump: &SchemaDump,
    tables: &[String],
    output_dir: &Path,
    namespace: &str,
) -> Result<GenerationReport, SchemaError> {
    fs::create_dir_all(output_dir).map_err(|source| SchemaError::io(output_dir, source))?;

    let mut report = GenerationReport::default();
    for table in tables {
        let schema = match dump.table(table) {
            Ok(schema) => schema,
            Err(SchemaError::TableNotFound { table }) => {
                debug!(%table, "table not found in SQL dump; skipping");
                report.skipped.push(table);
                continue;
            }
            Err(error) => return Err(error),
        };

        let entity = EntityDescriptor::build(&schema);
        let path = output_dir.join(entity.file_name());
        fs::write(&path, render_csharp(&entity, namespace))
            .map_err(|source| SchemaError::io(&path, source))?;
        info!(%table, path = %path.display(), "generated entity");

        report.generated.push(GeneratedEntity {
            table: table.clone(),
            class_name: entity.class_name,
            path,
            columns: entity.properties.len(),
        });
    }

    Ok(report)
}

/// Read a dump, tolerating invalid UTF-8.
pub fn read_sql_dump(path: &Path) -> Result<SchemaDump, SchemaError> {
    let bytes = fs::read(path).map_err(|source| SchemaError::io(path, source))?;
    let dump = SchemaDump::parse(&String::from_utf8_lossy(&bytes));
    debug!(path = %path.display(), tables = dump.table_names().len(), "indexed SQL dump");
    Ok(dump)
}

pub fn read_table_list(path: &Path) -> Result<Vec<String>, SchemaError> {
    let text = fs::read_to_string(path).map_err(|source| SchemaError::io(path, source))?;
    Ok(parse_table_list(&text))
}

/// One table name per line; blank lines ignored.
#[must_use]
pub fn parse_table_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Dump tables whose entity file does not exist in `output_dir`.
#[must_use]
pub fn tables_without_entities(dump: &SchemaDump, output_dir: &Path) -> Vec<String> {
    dump.table_names()
        .iter()
        .filter(|table| dump.contains(table))
        .filter(|table| {
            !output_dir
                .join(format!("{}.cs", pascal_case(table)))
                .exists()
        })
        .cloned()
        .collect()
}

/// Write `tables` in the format [`read_table_list`] accepts.
pub fn write_table_list(path: &Path, tables: &[String]) -> Result<(), SchemaError> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| SchemaError::io(parent, source))?;
    }
    let mut text = tables.join("\n");
    if !text.is_empty() {
        text.push('\n');
    }
    fs::write(path, text).map_err(|source| SchemaError::io(path, source))
}
