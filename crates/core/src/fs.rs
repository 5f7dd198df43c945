//! Filesystem checks

use std::path::{Path, PathBuf};

use log::info;

#[derive(thiserror::Error, Debug)]
pub enum FsError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("Not a regular file: {0}")]
    NotAFile(PathBuf),
}

/// Check if a path exists
pub fn path_exists(path: &str) -> bool {
    Path::new(path).exists()
}

/// Check if a path is a regular file
pub fn is_file(path: &str) -> bool {
    Path::new(path).is_file()
}

/// Require an existing regular file, returning its path
///
/// Used before opening the read-only dataset so a missing file is reported
/// clearly instead of as a driver error.
pub fn require_file(path: &str) -> Result<PathBuf, FsError> {
    let path_buf = PathBuf::from(path);
    if !path_exists(path) {
        return Err(FsError::NotFound(path_buf));
    }
    if !is_file(path) {
        return Err(FsError::NotAFile(path_buf));
    }
    info!("Using dataset file: {}", path_buf.display());
    Ok(path_buf)
}
