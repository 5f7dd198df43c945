//! Configuration file discovery and loading
//!
//! Settings are layered, highest priority first:
//! 1. CLI arguments
//! 2. Environment variables (handled by clap in the server crate)
//! 3. A TOML config file found by [`find_config_file`]
//! 4. Built-in defaults

use std::env;
use std::fmt;
use std::path::{Path, PathBuf};

use log::debug;
use serde::de::DeserializeOwned;

use crate::APP_NAME;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Where a configuration was (or would be) loaded from
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    /// Path given on the command line or through the config env var
    Explicit(PathBuf),
    /// Found in the working directory
    CurrentDir(PathBuf),
    /// Found under $XDG_CONFIG_HOME/climate-api/ (or ~/.config/climate-api/)
    XdgConfig(PathBuf),
    /// Found under /etc/climate-api/
    System(PathBuf),
    /// Nothing found, built-in defaults apply
    Defaults,
}

impl ConfigSource {
    pub fn path(&self) -> Option<&Path> {
        match self {
            ConfigSource::Explicit(p)
            | ConfigSource::CurrentDir(p)
            | ConfigSource::XdgConfig(p)
            | ConfigSource::System(p) => Some(p),
            ConfigSource::Defaults => None,
        }
    }
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.path() {
            Some(path) => write!(f, "{}", path.display()),
            None => write!(f, "(defaults)"),
        }
    }
}

/// Candidate config locations in search order. Does not touch the filesystem.
pub fn config_candidates(env_var: &str, filename: &str) -> Vec<ConfigSource> {
    let mut candidates = Vec::with_capacity(4);

    if let Ok(path) = env::var(env_var) {
        candidates.push(ConfigSource::Explicit(PathBuf::from(path)));
    }
    candidates.push(ConfigSource::CurrentDir(PathBuf::from(filename)));
    if let Some(dir) = xdg_config_dir() {
        candidates.push(ConfigSource::XdgConfig(dir.join(APP_NAME).join(filename)));
    }
    candidates.push(ConfigSource::System(
        PathBuf::from("/etc").join(APP_NAME).join(filename),
    ));

    candidates
}

/// Find the first existing config file, falling back to [`ConfigSource::Defaults`]
pub fn find_config_file(env_var: &str, filename: &str) -> ConfigSource {
    config_candidates(env_var, filename)
        .into_iter()
        .find(|candidate| {
            let exists = candidate.path().is_some_and(Path::exists);
            debug!("config candidate {} exists: {}", candidate, exists);
            exists
        })
        .unwrap_or(ConfigSource::Defaults)
}

fn xdg_config_dir() -> Option<PathBuf> {
    env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|_| env::var("HOME").map(|home| PathBuf::from(home).join(".config")))
        .ok()
}

/// Load and parse a TOML config file, or return `T::default()` for [`ConfigSource::Defaults`]
pub fn load_config<T: DeserializeOwned + Default>(source: &ConfigSource) -> Result<T, ConfigError> {
    let Some(path) = source.path() else {
        return Ok(T::default());
    };

    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
