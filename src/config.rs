//! Configuration for logkv
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

use crate::error::{LogKvError, Result};
use crate::file::OpenMode;

/// Extension of every log file
pub const LOG_EXTENSION: &str = "dblog";

/// Main configuration for a logkv instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Directory holding the log file
    /// Internal structure:
    ///   {data_dir}/
    ///     └── {tablespace}.dblog   (append-only record log)
    pub data_dir: PathBuf,

    /// Name of the log inside `data_dir`
    pub tablespace: String,

    /// How the log file is opened
    pub open_mode: OpenMode,

    // -------------------------------------------------------------------------
    // Durability Configuration
    // -------------------------------------------------------------------------
    /// fsync after every append
    pub sync_on_write: bool,

    // -------------------------------------------------------------------------
    // Index Configuration
    // -------------------------------------------------------------------------
    /// Scan the log and rebuild the index right after opening.
    /// Off by default: a freshly opened engine starts with an empty index.
    pub replay_on_open: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./logkv_data"),
            tablespace: "default".to_string(),
            open_mode: OpenMode::Append,
            sync_on_write: false,
            replay_on_open: false,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Path of the log file: `{data_dir}/{tablespace}.dblog`
    pub fn log_path(&self) -> PathBuf {
        self.data_dir
            .join(format!("{}.{}", self.tablespace.trim(), LOG_EXTENSION))
    }

    /// Check the tablespace name
    pub fn validate(&self) -> Result<()> {
        validate_tablespace(&self.tablespace)
    }
}

/// Tablespace names end up in file names, so only `[A-Za-z0-9_-]` is allowed
pub(crate) fn validate_tablespace(tablespace: &str) -> Result<()> {
    let name = tablespace.trim();

    if name.is_empty() {
        return Err(LogKvError::Config("Tablespace cannot be empty".to_string()));
    }

    if let Some(bad) = name
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '_' || *c == '-'))
    {
        return Err(LogKvError::Config(format!(
            "Invalid character {:?} in tablespace {:?}",
            bad, name
        )));
    }

    Ok(())
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the data directory
    pub fn data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_dir = path.into();
        self
    }

    /// Set the tablespace (log file name without extension)
    pub fn tablespace(mut self, name: impl Into<String>) -> Self {
        self.config.tablespace = name.into();
        self
    }

    /// Set the open mode
    pub fn open_mode(mut self, mode: OpenMode) -> Self {
        self.config.open_mode = mode;
        self
    }

    /// fsync after every append
    pub fn sync_on_write(mut self, enabled: bool) -> Self {
        self.config.sync_on_write = enabled;
        self
    }

    /// Rebuild the index from the log on open
    pub fn replay_on_open(mut self, enabled: bool) -> Self {
        self.config.replay_on_open = enabled;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
