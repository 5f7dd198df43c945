//! Climate API Core Library
//!
//! Shared utilities for the climate API server:
//! - Configuration discovery and TOML loading
//! - Filesystem checks for the dataset file

mod config;
pub mod fs;

pub use config::{config_candidates, find_config_file, load_config, ConfigError, ConfigSource};
pub use fs::{is_file, path_exists, require_file, FsError};

/// Application name used for config paths
pub const APP_NAME: &str = "climate-api";

/// Default API port
pub const DEFAULT_API_PORT: u16 = 5000;

/// Default location of the observation dataset
pub const DEFAULT_DATABASE_PATH: &str = "./Resources/hawaii.sqlite";

/// Default number of pooled dataset connections
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Default per-request timeout in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
