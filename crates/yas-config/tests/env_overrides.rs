use std::path::Path;

use figment::Jail;
use yas_config::YasConfig;

#[test]
fn env_overrides_nested_values() {
    Jail::expect_with(|jail| {
        jail.set_env("YAS_DOCS__STATUS", "out/STATUS.md");
        jail.set_env("YAS_MODELS__OUTPUT_DIR", "out/models");

        let config = YasConfig::load(Path::new(".")).expect("config loads");
        assert_eq!(config.docs.status, "out/STATUS.md");
        assert_eq!(config.models.output_dir, "out/models");
        Ok(())
    });
}

#[test]
fn env_beats_project_toml() {
    Jail::expect_with(|jail| {
        jail.create_dir(".yas")?;
        jail.create_file(
            ".yas/config.toml",
            r#"
[models]
namespace = "From.Toml"
"#,
        )?;
        jail.set_env("YAS_MODELS__NAMESPACE", "From.Env");

        let config = YasConfig::load(Path::new(".")).expect("config loads");
        assert_eq!(config.models.namespace, "From.Env");
        Ok(())
    });
}

#[test]
fn dotenv_file_in_project_root_is_loaded() {
    Jail::expect_with(|jail| {
        jail.create_file(".env", "YAS_DOCS__TASKS=from-dotenv/tasks.yaml\n")?;

        let config = YasConfig::load_with_dotenv(Path::new(".")).expect("config loads");
        assert_eq!(config.docs.tasks, "from-dotenv/tasks.yaml");
        Ok(())
    });
}
