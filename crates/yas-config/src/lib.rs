//! # yas-config
//!
//! Layered configuration loading for the yas developer tools using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`YAS_*` prefix, `__` as separator)
//! 2. Project-level `<project>/.yas/config.toml`
//! 3. User-level `~/.config/yas/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `YAS_MODELS__NAMESPACE` -> `models.namespace`,
//! `YAS_DOCS__TASKS` -> `docs.tasks`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use std::path::Path;
//! use yas_config::YasConfig;
//!
//! let root = Path::new(".");
//! let config = YasConfig::load_with_dotenv(root).expect("config");
//! println!("tasks live at {}", config.resolve(root, &config.docs.tasks).display());
//! ```

mod docs;
mod error;
mod models;

pub use docs::DocsConfig;
pub use error::ConfigError;
pub use models::ModelsConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Project-local configuration directory name.
pub const PROJECT_CONFIG_DIR: &str = ".yas";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct YasConfig {
    #[serde(default)]
    pub models: ModelsConfig,
    #[serde(default)]
    pub docs: DocsConfig,
}

impl YasConfig {
    /// Load configuration for the project rooted at `project_root`.
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] if you need
    /// `.env` file loading.
    pub fn load(project_root: &Path) -> Result<Self, ConfigError> {
        let config: Self = Self::figment(project_root).extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration after reading `<project_root>/.env`, if present.
    pub fn load_with_dotenv(project_root: &Path) -> Result<Self, ConfigError> {
        let env_path = project_root.join(".env");
        if env_path.exists() {
            let _ = dotenvy::from_path(&env_path);
        }
        Self::load(project_root)
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment directly or add providers on
    /// top.
    pub fn figment(project_root: &Path) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = project_root.join(PROJECT_CONFIG_DIR).join("config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed("YAS_").split("__"))
    }

    /// Resolve a configured path against the project root.
    ///
    /// Absolute paths are returned unchanged.
    #[must_use]
    pub fn resolve(&self, project_root: &Path, path: &str) -> PathBuf {
        let candidate = Path::new(path);
        if candidate.is_absolute() {
            candidate.to_path_buf()
        } else {
            project_root.join(candidate)
        }
    }

    /// Reject values the tools cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("models.sql_dump", &self.models.sql_dump),
            ("models.table_list", &self.models.table_list),
            ("models.output_dir", &self.models.output_dir),
            ("docs.tasks", &self.docs.tasks),
            ("docs.status", &self.docs.status),
            ("docs.execution_log", &self.docs.execution_log),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    reason: "path must not be empty".to_string(),
                });
            }
        }

        let namespace = self.models.namespace.trim();
        if namespace.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "models.namespace".to_string(),
                reason: "namespace must not be empty".to_string(),
            });
        }
        if !namespace
            .split('.')
            .all(|segment| is_identifier(segment))
        {
            return Err(ConfigError::InvalidValue {
                field: "models.namespace".to_string(),
                reason: format!("'{namespace}' is not a dotted identifier"),
            });
        }

        Ok(())
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("yas").join("config.toml"))
    }
}

fn is_identifier(segment: &str) -> bool {
    let mut chars = segment.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
