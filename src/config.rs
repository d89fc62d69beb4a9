// Layered configuration: defaults, YAML file, environment, CLI flags

use crate::remaining::Locale;
use crate::snapshot::SNAPSHOT_FILE;
use eyre::{Context, Result, eyre};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const ENV_DIR: &str = "TODOSTORE_DIR";
pub const ENV_LOCALE: &str = "TODOSTORE_LOCALE";

/// Resolved settings
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Directory holding the snapshot file
    pub data_dir: PathBuf,
    pub locale: Locale,
}

/// On-disk config file; every key optional
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub data_dir: Option<PathBuf>,
    pub locale: Option<Locale>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            locale: Locale::default(),
        }
    }
}

impl Config {
    /// Path of the snapshot file
    pub fn snapshot_path(&self) -> PathBuf {
        self.data_dir.join(SNAPSHOT_FILE)
    }

    /// Resolve from the default config file and process environment
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let path = config_path.map(Path::to_path_buf).or_else(default_config_path);
        let file = match path {
            Some(p) => read_config_file(&p)?,
            None => ConfigFile::default(),
        };
        let env = |key: &str| std::env::var(key).ok();
        Self::resolve(file, env)
    }

    /// Merge layers, later ones winning: defaults, file, environment
    pub fn resolve<F>(file: ConfigFile, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(dir) = file.data_dir {
            config.data_dir = dir;
        }
        if let Some(locale) = file.locale {
            config.locale = locale;
        }

        if let Some(dir) = env(ENV_DIR).filter(|s| !s.is_empty()) {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(locale) = env(ENV_LOCALE).filter(|s| !s.is_empty()) {
            config.locale = locale
                .parse()
                .with_context(|| format!("Invalid {}", ENV_LOCALE))?;
        }

        debug!(data_dir = ?config.data_dir, locale = %config.locale, "Resolved config");
        Ok(config)
    }
}

/// Parse a YAML config file; a missing file yields empty settings
pub fn read_config_file(path: &Path) -> Result<ConfigFile> {
    if !path.exists() {
        return Ok(ConfigFile::default());
    }
    let content = fs::read_to_string(path).with_context(|| format!("Failed to read config file {:?}", path))?;
    if content.trim().is_empty() {
        return Ok(ConfigFile::default());
    }
    serde_yaml::from_str(&content).map_err(|e| eyre!("Failed to parse config file {:?}: {}", path, e))
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("todostore"))
        .unwrap_or_else(|| PathBuf::from(".todostore"))
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("todostore").join("config.yaml"))
}
