//! Path management for TaskWeave configuration and data files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/taskweave/         # Config directory
//! └── config.toml              # API keys and settings
//!
//! ~/.taskweave/                # Data directory
//! └── tasks/                   # Task snapshots (JSON, one file per task)
//! ```

use std::path::PathBuf;

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Unified path management for TaskWeave.
pub struct WeavePaths;

impl WeavePaths {
    /// Returns the TaskWeave configuration directory (`~/.config/taskweave`).
    pub fn config_dir() -> Result<PathBuf, PathError> {
        let home = dirs::home_dir().ok_or(PathError::HomeDirNotFound)?;
        Ok(home.join(".config").join("taskweave"))
    }

    /// Returns the path to the configuration file
    /// (`~/.config/taskweave/config.toml`).
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns the default data directory (`~/.taskweave`).
    pub fn default_data_dir() -> Result<PathBuf, PathError> {
        let home = dirs::home_dir().ok_or(PathError::HomeDirNotFound)?;
        Ok(home.join(".taskweave"))
    }
}
