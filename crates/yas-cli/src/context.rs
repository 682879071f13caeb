use std::path::{Path, PathBuf};

use anyhow::Context;
use yas_config::YasConfig;

use crate::cli::GlobalFlags;

/// Project root plus the configuration loaded for it.
#[derive(Debug, Clone)]
pub struct AppContext {
    pub project_root: PathBuf,
    pub config: YasConfig,
}

impl AppContext {
    pub fn init(flags: &GlobalFlags) -> anyhow::Result<Self> {
        let project_root = resolve_project_root(flags.project.as_deref())?;
        let config = YasConfig::load_with_dotenv(&project_root).with_context(|| {
            format!(
                "failed to load configuration for {}",
                project_root.display()
            )
        })?;
        tracing::debug!(root = %project_root.display(), "loaded project configuration");

        Ok(Self {
            project_root,
            config,
        })
    }

    /// Resolve a configured or overriding path against the project root.
    #[must_use]
    pub fn resolve(&self, path: &str) -> PathBuf {
        self.config.resolve(&self.project_root, path)
    }

    /// `path` relative to the project root when it lies inside it.
    #[must_use]
    pub fn display_path<'a>(&self, path: &'a Path) -> &'a Path {
        path.strip_prefix(&self.project_root).unwrap_or(path)
    }
}

fn resolve_project_root(project_override: Option<&str>) -> anyhow::Result<PathBuf> {
    if let Some(path) = project_override {
        let explicit = PathBuf::from(path);
        if explicit.is_dir() {
            return Ok(explicit);
        }
        anyhow::bail!(
            "invalid --project '{}': directory does not exist",
            explicit.display()
        );
    }

    std::env::current_dir().context("failed to read current directory")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_project_directory_is_rejected() {
        let error = resolve_project_root(Some("/definitely/not/here"))
            .expect_err("directory does not exist");
        assert!(error.to_string().contains("directory does not exist"));
    }

    #[test]
    fn display_path_strips_project_root() {
        let ctx = AppContext {
            project_root: PathBuf::from("/work/app"),
            config: YasConfig::default(),
        };
        assert_eq!(
            ctx.display_path(Path::new("/work/app/docs/STATUS.md")),
            Path::new("docs/STATUS.md")
        );
        assert_eq!(
            ctx.display_path(Path::new("/elsewhere/x.md")),
            Path::new("/elsewhere/x.md")
        );
    }
}
