//! End-to-end runs of the `yas` binary against a temporary project.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use pretty_assertions::assert_eq;
use tempfile::TempDir;

const DUMP: &str = "\
CREATE TABLE `work_orders` (
  `id` int(11) NOT NULL AUTO_INCREMENT,
  `title` varchar(80) NOT NULL,
  `cost` decimal(10,2) DEFAULT NULL,
  PRIMARY KEY (`id`)
) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4;
";

const TASKS: &str = "\
metadata:
  project_overview: Demo project
tasks:
  backlog:
    - id: T-2
      title: Second
    - id: T-1
      title: First
      due: 2025-01-01
";

fn yas(project: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_yas"))
        .arg("--project")
        .arg(project)
        .args(args)
        .env_remove("YAS_LOG")
        .output()
        .expect("yas should run")
}

fn project() -> TempDir {
    let temp = TempDir::new().expect("tempdir should create");
    fs::write(temp.path().join("YASGMP.sql"), DUMP).expect("dump should write");
    fs::write(
        temp.path().join("tables_without_models.txt"),
        "work_orders\nghost_table\n",
    )
    .expect("table list should write");
    fs::create_dir_all(temp.path().join("docs")).expect("docs dir should create");
    fs::write(temp.path().join("docs/tasks.yaml"), TASKS).expect("tasks should write");
    temp
}

#[test]
fn models_generate_writes_entities_and_warns_on_missing_tables() {
    let temp = project();

    let output = yas(temp.path(), &["models", "generate"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Generated 1 entity in Models/Generated"));
    assert!(stdout.contains("ghost_table"));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Table 'ghost_table' not found in SQL dump; skipping."));
    assert!(temp.path().join("Models/Generated/WorkOrders.cs").exists());
}

#[test]
fn models_generate_reports_missing_tables_in_quiet_mode() {
    let temp = project();

    let output = yas(temp.path(), &["--quiet", "models", "generate"]);

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "");
    let stderr = String::from_utf8_lossy(&output.stderr);
    let diagnostics: Vec<&str> = stderr
        .lines()
        .filter(|line| line.contains("ghost_table"))
        .collect();
    assert_eq!(
        diagnostics,
        ["Table 'ghost_table' not found in SQL dump; skipping."]
    );
}

#[test]
fn models_missing_can_refresh_the_table_list() {
    let temp = project();

    let output = yas(temp.path(), &["models", "missing", "--write"]);

    assert!(output.status.success());
    assert_eq!(
        fs::read_to_string(temp.path().join("tables_without_models.txt"))
            .expect("list should read"),
        "work_orders\n"
    );
}

#[test]
fn docs_check_fails_until_synced() {
    let temp = project();

    let before = yas(temp.path(), &["docs", "sync", "--check"]);
    assert_eq!(before.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&before.stderr);
    assert!(stderr.contains("Status documentation is out of date: docs/tasks.yaml, docs/STATUS.md, docs/EXECUTION_LOG.md"));

    let synced = yas(temp.path(), &["docs", "sync"]);
    assert!(synced.status.success());

    let after = yas(temp.path(), &["docs", "sync", "--check"]);
    assert!(after.status.success());
}

#[test]
fn docs_append_reports_the_session() {
    let temp = project();

    let output = yas(
        temp.path(),
        &[
            "docs",
            "sync",
            "--append-log",
            "--log-date",
            "2025-02-10",
            "--log-author",
            "Cleo",
            "--log-summary",
            "Docs sync",
            "--log-entry",
            "09:00|Synced|ok",
        ],
    );

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "Appended execution session for 2025-02-10 by Cleo.\n"
    );
}

#[test]
fn docs_append_rejects_check_mode() {
    let temp = project();

    let output = yas(temp.path(), &["docs", "sync", "--check", "--append-log"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(
        String::from_utf8_lossy(&output.stderr)
            .contains("yas error: --append-log cannot be combined with --check")
    );
}
