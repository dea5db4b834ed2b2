use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

pub(crate) const DB_ENV: &str = "WEDDINGTUI_DB";
pub(crate) const LOG_ENV: &str = "WEDDINGTUI_LOG";
const DEFAULT_LOG_FILTER: &str = "info";

/// Where the planner keeps its files, and how loudly it logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Config {
    pub(crate) data_dir: PathBuf,
    pub(crate) db_path: PathBuf,
    pub(crate) log_path: PathBuf,
    pub(crate) log_filter: String,
}

impl Config {
    /// Resolve from the process environment and the platform data directory,
    /// creating the data directory if needed.
    pub(crate) fn load() -> Result<Self> {
        let proj_dirs = directories::ProjectDirs::from("com", "weddingtui", "WeddingTUI")
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
        let config = Self::resolve(proj_dirs.data_dir(), |key| std::env::var(key).ok());
        config.ensure_dirs()?;
        Ok(config)
    }

    /// Build a config rooted at `data_dir`, applying overrides from `lookup`.
    /// Blank override values are ignored.
    pub(crate) fn resolve(data_dir: &Path, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let db_path = non_blank(DB_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir.join("weddingtui.db"));
        let log_filter = non_blank(LOG_ENV).unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        Self {
            data_dir: data_dir.to_path_buf(),
            db_path,
            log_path: data_dir.join("weddingtui.log"),
            log_filter,
        }
    }

    fn ensure_dirs(&self) -> Result<()> {
        std::fs::create_dir_all(&self.data_dir).with_context(|| {
            format!("Failed to create data directory: {}", self.data_dir.display())
        })?;
        if let Some(parent) = self.db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create database directory: {}", parent.display())
            })?;
        }
        debug!(db = %self.db_path.display(), "data directory ready");
        Ok(())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
