//! `CREATE TABLE` extraction from a MySQL-style schema dump.
//!
//! This is pattern matching, not a DDL grammar: each table block is located
//! by its `` CREATE TABLE `name` ( ... ) ENGINE `` frame, then read line by
//! line for column declarations and `PRIMARY KEY (...)` clauses.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use tracing::warn;

use crate::error::SchemaError;
use crate::types::{SemanticType, is_nullable, normalize_type};

static CREATE_TABLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)CREATE TABLE (?:IF NOT EXISTS )?`([^`]+)` \((.*?)\)\s*ENGINE")
        .expect("CREATE TABLE pattern is valid")
});

static COLUMN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^`(?P<name>\w+)`\s+(?P<type>(?:unsigned\s+)?[a-z][a-z0-9_]*(?:\s*\([^)]*\))?(?:\s+(?:unsigned|signed|zerofill)\b)*)",
    )
    .expect("column pattern is valid")
});

static PRIMARY_KEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)PRIMARY KEY\s*\(([^)]*)\)").expect("PRIMARY KEY pattern is valid")
});

/// One declared column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnDescriptor {
    pub name: String,
    /// Declared type text as written in the dump (`decimal(10,2)`).
    pub raw_type: String,
    pub semantic: SemanticType,
    pub nullable: bool,
}

/// Columns and primary key of one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableSchema {
    pub name: String,
    /// Columns in declaration order.
    pub columns: Vec<ColumnDescriptor>,
    /// Primary-key columns in clause order, each a member of `columns`.
    pub primary_key: Vec<String>,
    /// Distinct column names in the `PRIMARY KEY` clauses, known or not.
    pub declared_key_len: usize,
}

impl TableSchema {
    /// The key column when the primary key declares exactly one column.
    ///
    /// Composite keys yield `None` even when some of their columns were not
    /// extracted.
    #[must_use]
    pub fn single_key(&self) -> Option<&str> {
        match (self.declared_key_len, self.primary_key.as_slice()) {
            (1, [only]) => Some(only.as_str()),
            _ => None,
        }
    }

    #[must_use]
    pub fn column(&self, name: &str) -> Option<&ColumnDescriptor> {
        self.columns.iter().find(|column| column.name == name)
    }
}

/// Index of every `CREATE TABLE` block in a dump.
#[derive(Debug, Clone, Default)]
pub struct SchemaDump {
    order: Vec<String>,
    bodies: HashMap<String, String>,
}

impl SchemaDump {
    /// Index the table blocks of `sql`. A repeated table name keeps the last
    /// block.
    #[must_use]
    pub fn parse(sql: &str) -> Self {
        let mut dump = Self::default();
        for captures in CREATE_TABLE.captures_iter(sql) {
            let name = captures[1].to_string();
            let body = captures[2].to_string();
            if dump.bodies.insert(name.clone(), body).is_none() {
                dump.order.push(name);
            }
        }
        dump
    }

    /// Table names in the order they first appear in the dump.
    #[must_use]
    pub fn table_names(&self) -> &[String] {
        &self.order
    }

    #[must_use]
    pub fn contains(&self, table: &str) -> bool {
        self.bodies
            .get(table)
            .is_some_and(|body| !body.trim().is_empty())
    }

    /// Extract the columns and primary key of `table`.
    pub fn table(&self, table: &str) -> Result<TableSchema, SchemaError> {
        let body = self
            .bodies
            .get(table)
            .filter(|body| !body.trim().is_empty())
            .ok_or_else(|| SchemaError::TableNotFound {
                table: table.to_string(),
            })?;

        let mut columns = Vec::new();
        let mut declared_key = Vec::<String>::new();

        for line in body.lines().map(str::trim) {
            if let Some(captures) = PRIMARY_KEY.captures(line) {
                for key in captures[1].split(',').filter_map(key_column_name) {
                    if !declared_key.contains(&key) {
                        declared_key.push(key);
                    }
                }
            }

            if let Some(captures) = COLUMN.captures(line) {
                let raw_type = captures["type"].trim().to_string();
                columns.push(ColumnDescriptor {
                    name: captures["name"].to_string(),
                    semantic: normalize_type(&raw_type),
                    raw_type,
                    nullable: is_nullable(line),
                });
            }
        }

        let declared_key_len = declared_key.len();
        let primary_key = declared_key
            .into_iter()
            .filter(|key| {
                let known = columns.iter().any(|column| &column.name == key);
                if !known {
                    warn!(table, column = %key, "primary key names an undeclared column; ignoring");
                }
                known
            })
            .collect();

        Ok(TableSchema {
            name: table.to_string(),
            columns,
            primary_key,
            declared_key_len,
        })
    }
}

/// `` `col` ``, `col`, or `` `col`(10) `` -> `col`.
fn key_column_name(raw: &str) -> Option<String> {
    let name = raw
        .split('(')
        .next()
        .unwrap_or_default()
        .trim_matches(|c: char| c == '`' || c.is_whitespace());
    (!name.is_empty()).then(|| name.to_string())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const DUMP: &str = r"
--
-- Table structure for table `users`
--

DROP TABLE IF EXISTS `users`;
CREATE TABLE `users` (
  `id` int(11) NOT NULL AUTO_INCREMENT,
  `username` varchar(100) NOT NULL,
  `balance` decimal(10,2) DEFAULT NULL,
  `is_active` tinyint(1) NOT NULL DEFAULT '1',
  `avatar` longblob,
  PRIMARY KEY (`id`),
  UNIQUE KEY `uq_username` (`username`),
  KEY `idx_active` (`is_active`)
) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4;

CREATE TABLE `role_permissions` (
  `role_id` int(11) NOT NULL,
  `permission_id` int(11) NOT NULL,
  `granted_at` datetime DEFAULT CURRENT_TIMESTAMP,
  PRIMARY KEY (`role_id`,`permission_id`),
  CONSTRAINT `fk_role` FOREIGN KEY (`role_id`) REFERENCES `roles` (`id`)
) ENGINE=InnoDB;
";

    #[test]
    fn indexes_tables_in_dump_order() {
        let dump = SchemaDump::parse(DUMP);
        assert_eq!(dump.table_names(), ["users", "role_permissions"]);
        assert!(dump.contains("users"));
        assert!(!dump.contains("roles"));
    }

    #[test]
    fn extracts_columns_in_declaration_order() {
        let table = SchemaDump::parse(DUMP).table("users").expect("users exists");
        let names: Vec<&str> = table.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["id", "username", "balance", "is_active", "avatar"]);
    }

    #[test]
    fn captures_raw_type_and_semantics() {
        let table = SchemaDump::parse(DUMP).table("users").expect("users exists");

        let balance = table.column("balance").expect("balance column");
        assert_eq!(balance.raw_type, "decimal(10,2)");
        assert_eq!(
            balance.semantic,
            SemanticType::Decimal {
                precision: Some(10),
                scale: Some(2)
            }
        );
        assert!(balance.nullable);

        let username = table.column("username").expect("username column");
        assert_eq!(username.raw_type, "varchar(100)");
        assert!(!username.nullable);

        let flag = table.column("is_active").expect("is_active column");
        assert_eq!(flag.semantic, SemanticType::Boolean);

        let avatar = table.column("avatar").expect("avatar column");
        assert_eq!(avatar.semantic, SemanticType::Bytes);
        assert!(avatar.nullable);
    }

    #[test]
    fn single_primary_key_is_reported() {
        let table = SchemaDump::parse(DUMP).table("users").expect("users exists");
        assert_eq!(table.primary_key, ["id"]);
        assert_eq!(table.single_key(), Some("id"));
    }

    #[test]
    fn composite_primary_key_has_no_single_key() {
        let table = SchemaDump::parse(DUMP)
            .table("role_permissions")
            .expect("role_permissions exists");
        assert_eq!(table.primary_key, ["role_id", "permission_id"]);
        assert_eq!(table.single_key(), None);
    }

    #[test]
    fn key_and_constraint_lines_are_not_columns() {
        let table = SchemaDump::parse(DUMP)
            .table("role_permissions")
            .expect("role_permissions exists");
        assert_eq!(table.columns.len(), 3);
    }

    #[test]
    fn missing_table_is_reported() {
        let err = SchemaDump::parse(DUMP)
            .table("audit_log")
            .expect_err("audit_log is absent");
        assert!(matches!(err, SchemaError::TableNotFound { ref table } if table == "audit_log"));
    }

    #[test]
    fn repeated_primary_key_clause_is_deduplicated() {
        let sql = "CREATE TABLE `t` (\n  `id` int NOT NULL,\n  PRIMARY KEY (`id`),\n  PRIMARY KEY (`id`)\n) ENGINE=InnoDB;";
        let table = SchemaDump::parse(sql).table("t").expect("t exists");
        assert_eq!(table.single_key(), Some("id"));
    }

    #[test]
    fn unknown_primary_key_column_is_dropped() {
        let sql = "CREATE TABLE `t` (\n  `id` int NOT NULL,\n  PRIMARY KEY (`ghost`)\n) ENGINE=InnoDB;";
        let table = SchemaDump::parse(sql).table("t").expect("t exists");
        assert!(table.primary_key.is_empty());
        assert_eq!(table.single_key(), None);
    }

    #[test]
    fn composite_key_with_unextracted_column_marks_no_key() {
        let sql = "CREATE TABLE `t` (\n  `id` int NOT NULL,\n  `order-no` int NOT NULL,\n  PRIMARY KEY (`id`,`order-no`)\n) ENGINE=InnoDB;";
        let table = SchemaDump::parse(sql).table("t").expect("t exists");
        assert_eq!(table.primary_key, ["id"]);
        assert_eq!(table.declared_key_len, 2);
        assert_eq!(table.single_key(), None);
    }

    #[test]
    fn unsigned_suffix_is_part_of_raw_type() {
        let sql = "CREATE TABLE `t` (\n  `id` bigint(20) unsigned NOT NULL,\n  PRIMARY KEY (`id`)\n) ENGINE=InnoDB;";
        let table = SchemaDump::parse(sql).table("t").expect("t exists");
        let id = table.column("id").expect("id column");
        assert_eq!(id.raw_type, "bigint(20) unsigned");
        assert_eq!(id.semantic, SemanticType::Int64);
    }

    #[test]
    fn prefix_length_key_column_is_trimmed() {
        assert_eq!(key_column_name(" `slug`(32"), Some("slug".to_string()));
        assert_eq!(key_column_name(" `` "), None);
    }
}
