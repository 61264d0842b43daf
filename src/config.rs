use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::{debug, info};

use crate::model::AppConfig;

pub const APP_DIR: &str = "daylist";
pub const DATA_DIR_ENV: &str = "DAYLIST_DATA_DIR";

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.toml"))
}

/// Loads `config.toml`. An explicit path must exist; the default location is optional.
#[tracing::instrument]
pub fn load_config(explicit: Option<&Path>) -> anyhow::Result<AppConfig> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match default_config_path() {
            Some(path) if path.exists() => path,
            _ => {
                debug!("no config file; using defaults");
                return Ok(AppConfig::default());
            }
        },
    };

    let text = fs::read_to_string(&path)
        .with_context(|| format!("failed reading config {}", path.display()))?;
    let config: AppConfig =
        toml::from_str(&text).with_context(|| format!("invalid config {}", path.display()))?;

    info!(config = %path.display(), ?config, "loaded config");
    Ok(config)
}

/// `--data-dir`, then `DAYLIST_DATA_DIR`, then the config file, then the platform data dir.
pub fn resolve_data_dir(cli_dir: Option<&Path>, config: &AppConfig) -> PathBuf {
    if let Some(dir) = cli_dir {
        return dir.to_path_buf();
    }
    if let Some(dir) = std::env::var_os(DATA_DIR_ENV).filter(|v| !v.is_empty()) {
        return PathBuf::from(dir);
    }
    if let Some(dir) = config.data_dir.as_deref().filter(|d| !d.trim().is_empty()) {
        return expand_tilde(dir);
    }

    let mut base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    base.push(APP_DIR);
    base
}

fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}
