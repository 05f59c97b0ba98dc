//! Discovery of the style configuration file.
//!
//! A configuration file holds style overrides that become the `user` level
//! of every diagram the CLI renders. `--config` names the file directly.
//! Otherwise the first existing file among [`LOCAL_CONFIG`] (relative to the
//! working directory) and `config.toml` in the platform config directory is
//! used. Without any file the built-in defaults render unchanged.
//!
//! Only the TOML shape is checked here. Style keys and values are validated
//! when the diagram builder applies them.

use std::{
    fs,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use thiserror::Error;

use fretwork::{FretworkError, config::AppConfig};

/// Configuration file looked up in the working directory.
const LOCAL_CONFIG: &str = "fretwork/config.toml";

/// File name inside the platform config directory.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Failures reading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse TOML configuration: {0}")]
    Parse(String),

    #[error("Missing configuration file: {0}")]
    MissingFile(PathBuf),
}

impl From<ConfigError> for FretworkError {
    fn from(err: ConfigError) -> Self {
        FretworkError::Config(err.to_string())
    }
}

/// Load the style configuration for a CLI run.
///
/// An explicit path must exist. Discovered files are only used when present,
/// and a run without any configuration file uses [`AppConfig::default`].
///
/// # Errors
///
/// Returns [`FretworkError::Config`] for a missing explicit file or a file
/// that is not valid TOML for [`AppConfig`], and [`FretworkError::Io`] if a
/// file exists but cannot be read.
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<AppConfig, FretworkError> {
    if let Some(path) = explicit_path {
        let path = path.as_ref();
        info!(path = path.display().to_string(); "Loading configuration from --config");
        return load_config_file(path);
    }

    match discovered_config_paths()
        .into_iter()
        .find(|path| path.exists())
    {
        Some(path) => {
            info!(path = path.display().to_string(); "Loading discovered configuration");
            load_config_file(&path)
        }
        None => {
            debug!("No configuration file found, rendering with built-in styles");
            Ok(AppConfig::default())
        }
    }
}

/// Candidate configuration files in lookup order.
fn discovered_config_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(LOCAL_CONFIG)];
    match ProjectDirs::from("com", "fretwork", "fretwork") {
        Some(dirs) => paths.push(dirs.config_dir().join(CONFIG_FILE_NAME)),
        None => debug!("Could not determine platform-specific config directory"),
    }
    paths
}

fn load_config_file(path: &Path) -> Result<AppConfig, FretworkError> {
    if !path.exists() {
        return Err(ConfigError::MissingFile(path.to_path_buf()).into());
    }

    let content = fs::read_to_string(path)?;
    let config: AppConfig =
        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;
    debug!(entries = config.style().entries().len(); "Configuration parsed");
    Ok(config)
}
