//! File system persistence for configuration
//!
//! Reads and writes the config file with atomic writes (temp file +
//! rename), a backup of the previous file before every overwrite, and
//! graceful handling of missing or invalid content.

use crate::{Config, ConfigError, ConfigResult, CONFIG_VERSION};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Returns the platform config file location for the application
pub fn default_config_path() -> ConfigResult<PathBuf> {
    let dirs = directories::ProjectDirs::from("", "", "bookshelf").ok_or_else(|| {
        ConfigError::PathResolutionError {
            reason: "no home directory available".to_string(),
        }
    })?;
    Ok(dirs.config_dir().join("config.toml"))
}

/// Handles configuration file persistence
pub struct ConfigPersistence {
    config_path: PathBuf,
}

impl ConfigPersistence {
    /// Creates a persistence handler for the given config file path
    pub fn new(config_path: PathBuf) -> Self {
        Self { config_path }
    }

    /// Returns the config file path
    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// Loads configuration from file
    ///
    /// A missing file yields the default config. An empty or
    /// unparseable file is an error. Validation problems in an
    /// otherwise well-formed file are logged as warnings so the user
    /// can fix them without losing data.
    pub fn load(&self) -> ConfigResult<Config> {
        if !self.config_path.exists() {
            log::info!(
                "Config file not found at {}, using defaults",
                self.config_path.display()
            );
            return Ok(Config::default());
        }

        let contents =
            fs::read_to_string(&self.config_path).map_err(|e| ConfigError::ReadError {
                path: self.config_path.clone(),
                source: e,
            })?;

        // An empty file is corruption, not a valid default
        if contents.trim().is_empty() {
            return Err(ConfigError::ReadError {
                path: self.config_path.clone(),
                source: std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    "Config file is empty or contains only whitespace",
                ),
            });
        }

        let config: Config = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: self.config_path.clone(),
            source: e,
        })?;

        if config.version > CONFIG_VERSION {
            log::warn!(
                "Config version {} is newer than supported version {}",
                config.version,
                CONFIG_VERSION
            );
        }

        if let Err(errors) = config.validate() {
            let error_msg = errors
                .iter()
                .map(|e| e.to_string())
                .collect::<Vec<_>>()
                .join("; ");
            log::warn!("Config validation warnings: {}", error_msg);
        }

        Ok(config)
    }

    /// Saves configuration to file atomically
    pub fn save(&self, config: &Config) -> ConfigResult<()> {
        if let Err(errors) = config.validate() {
            let error_msg = errors
                .iter()
                .map(|e| e.to_string())
                .collect::<Vec<_>>()
                .join("; ");
            return Err(ConfigError::ValidationError(error_msg));
        }

        let parent = match self.config_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        if !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::DirectoryCreationError {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        if self.config_path.exists() {
            let backup_path = self.config_path.with_extension("toml.backup");
            fs::copy(&self.config_path, &backup_path)
                .map_err(|e| ConfigError::BackupError { source: e })?;
            log::debug!("Backed up config to {}", backup_path.display());
        }

        let toml_string = toml::to_string_pretty(config)?;

        let mut temp_file =
            NamedTempFile::new_in(parent).map_err(|e| ConfigError::WriteError {
                path: self.config_path.clone(),
                source: e,
            })?;
        temp_file
            .write_all(toml_string.as_bytes())
            .map_err(|e| ConfigError::WriteError {
                path: self.config_path.clone(),
                source: e,
            })?;
        temp_file
            .persist(&self.config_path)
            .map_err(|e| ConfigError::WriteError {
                path: self.config_path.clone(),
                source: e.error,
            })?;

        log::info!("Config saved to {}", self.config_path.display());
        Ok(())
    }
}
