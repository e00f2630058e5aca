//! User-level defaults for a handful of global options
//!
//! Sources, later ones overriding earlier ones:
//! 1. Built-in values
//! 2. `~/.krr/krr.toml`
//! 3. `./.krr/krr.toml`
//! 4. `KRR_*` environment variables (e.g. `KRR_MAX_WORKERS=4`)

use crate::error::ConfigResult;
use crate::formatters::DEFAULT_FORMATTER;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Directory holding the defaults file, relative to home or the working directory
pub const CONFIG_DIR_NAME: &str = ".krr";

/// Defaults file name
pub const CONFIG_FILE_NAME: &str = "krr.toml";

/// Environment variable prefix
pub const ENV_PREFIX: &str = "KRR_";

/// Defaults feeding the command-line option defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolDefaults {
    pub formatter: String,
    pub max_workers: i64,
    pub cpu_min_value: i64,
    pub memory_min_value: i64,
    pub prometheus_url: Option<String>,
}

impl Default for ToolDefaults {
    fn default() -> Self {
        Self {
            formatter: DEFAULT_FORMATTER.to_string(),
            max_workers: 10,
            cpu_min_value: 10,
            memory_min_value: 100,
            prometheus_url: None,
        }
    }
}

impl ToolDefaults {
    /// Load from the discovered files and the environment
    pub fn load() -> ConfigResult<Self> {
        Self::load_from(&Self::discover_files())
    }

    /// Load from explicit files (lowest priority first) and the environment
    ///
    /// Missing files are skipped.
    pub fn load_from(files: &[PathBuf]) -> ConfigResult<Self> {
        let defaults: Self = Self::figment(files).extract()?;
        debug!(
            formatter = %defaults.formatter,
            max_workers = defaults.max_workers,
            "Loaded tool defaults"
        );
        Ok(defaults)
    }

    fn figment(files: &[PathBuf]) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));

        for path in files {
            trace!("Merging defaults file: {}", path.display());
            figment = figment.merge(Toml::file(path));
        }

        figment.merge(Env::prefixed(ENV_PREFIX).map(|key| key.as_str().to_lowercase().into()))
    }

    /// Candidate defaults files, home directory first
    pub fn discover_files() -> Vec<PathBuf> {
        let mut files = Vec::new();
        if let Some(home) = dirs::home_dir() {
            files.push(config_file_in(&home));
        }
        if let Ok(cwd) = std::env::current_dir() {
            let local = config_file_in(&cwd);
            if !files.contains(&local) {
                files.push(local);
            }
        }
        files
    }
}

fn config_file_in(dir: &Path) -> PathBuf {
    dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME)
}
