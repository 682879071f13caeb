//! Entity generator configuration.

use serde::{Deserialize, Serialize};

fn default_sql_dump() -> String {
    "YASGMP.sql".to_string()
}

fn default_table_list() -> String {
    "tables_without_models.txt".to_string()
}

fn default_output_dir() -> String {
    "Models/Generated".to_string()
}

fn default_namespace() -> String {
    "YasGMP.Models.Generated".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ModelsConfig {
    /// SQL dump containing the `CREATE TABLE` statements.
    #[serde(default = "default_sql_dump")]
    pub sql_dump: String,

    /// Newline-delimited list of tables to generate entities for.
    #[serde(default = "default_table_list")]
    pub table_list: String,

    /// Directory receiving one `<ClassName>.cs` per table.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Namespace wrapping every generated entity.
    #[serde(default = "default_namespace")]
    pub namespace: String,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            sql_dump: default_sql_dump(),
            table_list: default_table_list(),
            output_dir: default_output_dir(),
            namespace: default_namespace(),
        }
    }
}
