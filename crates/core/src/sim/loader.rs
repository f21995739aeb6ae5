//! Configuration and meta-data file loading.
//!
//! This module reads simulator inputs from disk. It performs:
//! 1. **Configuration loading:** Text or JSON configuration files, with
//!    relative paths resolved against the configuration file's directory.
//! 2. **Program loading:** Meta-data files parsed into a validated [`Program`].

use std::fs;
use std::path::Path;

use crate::config::{Config, ConfigError};
use crate::metadata::{self, MetadataError};
use crate::program::Program;

/// Loads a text configuration file.
///
/// Relative `File Path` and `Log File Path` values are resolved against the
/// directory holding `path`.
///
/// # Errors
///
/// Returns [`ConfigError::FileAccess`] if the file cannot be read, or the
/// parse error of [`Config::parse_str`].
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::FileAccess {
        path: path.to_path_buf(),
        source,
    })?;
    let config = Config::parse_str(&text)?;
    tracing::debug!(path = %path.display(), "configuration loaded");
    Ok(config.resolve_paths(base_dir(path)))
}

/// Loads a JSON configuration file; paths resolve as in [`load_config`].
///
/// # Errors
///
/// Returns [`ConfigError::FileAccess`], [`ConfigError::Json`] or
/// [`ConfigError::DataOutOfRange`].
pub fn load_config_json(path: &Path) -> Result<Config, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::FileAccess {
        path: path.to_path_buf(),
        source,
    })?;
    let config = Config::from_json(&text)?;
    tracing::debug!(path = %path.display(), "json configuration loaded");
    Ok(config.resolve_paths(base_dir(path)))
}

/// Loads and validates a meta-data file.
///
/// # Errors
///
/// Returns [`MetadataError::FileAccess`] if the file cannot be read, or the
/// parse error of [`metadata::parse_str`].
pub fn load_program(path: &Path) -> Result<Program, MetadataError> {
    let text = fs::read_to_string(path).map_err(|source| MetadataError::FileAccess {
        path: path.to_path_buf(),
        source,
    })?;
    let program = metadata::parse_str(&text)?;
    tracing::debug!(
        path = %path.display(),
        operations = program.len(),
        processes = program.process_count(),
        "meta-data loaded"
    );
    Ok(program)
}

fn base_dir(path: &Path) -> &Path {
    path.parent().unwrap_or_else(|| Path::new(""))
}
