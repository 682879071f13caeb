//! # yas-schema
//!
//! Entity generation from a MySQL-style schema dump.
//!
//! The pipeline is linear:
//! - [`SchemaDump`] indexes `CREATE TABLE` blocks and extracts a
//!   [`TableSchema`] (columns, declared types, nullability, primary key)
//! - [`normalize_type`] maps declared SQL types to [`SemanticType`]
//! - [`EntityDescriptor`] plans the generated class (names, attributes,
//!   nullability representation)
//! - [`render_csharp`] emits the Entity Framework source text
//! - [`generate_entities`] runs the batch over a table list, skipping tables
//!   the dump does not declare

mod dump;
mod entity;
mod error;
mod generate;
mod naming;
mod render;
mod types;

pub use dump::{ColumnDescriptor, SchemaDump, TableSchema};
pub use entity::{Attribute, EntityDescriptor, PropertySpec, Representation};
pub use error::SchemaError;
pub use generate::{
    GenerateRequest, GeneratedEntity, GenerationReport, generate_entities, generate_from_dump,
    parse_table_list, read_sql_dump, read_table_list, tables_without_entities, write_table_list,
};
pub use naming::{FALLBACK_NAME, pascal_case};
pub use render::render_csharp;
pub use types::{SemanticType, is_nullable, normalize_type};
