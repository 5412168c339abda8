//! Configuration for the home library application
//!
//! Supplies the data-file path and backup retention to the storage and
//! catalog layers. Sections validate themselves via [`ConfigSection`];
//! invalid values loaded from disk degrade to warnings rather than
//! losing the user's file, and saves are atomic.

mod error;
mod persistence;
mod validation;

pub use error::{ConfigError, ConfigResult, ValidationError};
pub use persistence::{default_config_path, ConfigPersistence};
pub use validation::{ConfigSection, Validator};

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Current config file format version
pub const CONFIG_VERSION: u32 = 1;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Config file format version
    pub version: u32,

    /// Library data settings
    pub library: LibrarySection,

    /// Backup retention settings
    pub backup: BackupSection,
}

impl Config {
    /// Creates a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates all sections, collecting every error
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(section_errors) = self.library.validate() {
            errors.extend(section_errors);
        }
        if let Err(section_errors) = self.backup.validate() {
            errors.extend(section_errors);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            library: LibrarySection::default(),
            backup: BackupSection::default(),
        }
    }
}

/// Library data settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LibrarySection {
    /// Path to the CSV data file
    pub data_file: PathBuf,

    /// Log level filter (error, warn, info, debug, trace)
    pub log_level: String,
}

impl Default for LibrarySection {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("Biblioteka.csv"),
            log_level: "info".to_string(),
        }
    }
}

impl ConfigSection for LibrarySection {
    fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(e) = Validator::not_empty(&self.data_file.to_string_lossy(), "library.data_file")
        {
            errors.push(e);
        }

        let allowed = ["error", "warn", "info", "debug", "trace"].map(String::from);
        if let Err(e) = Validator::one_of(&self.log_level, &allowed, "library.log_level") {
            errors.push(e);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn section_name(&self) -> &'static str {
        "library"
    }
}

/// Backup retention settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BackupSection {
    /// Snapshot the data file before every save
    pub auto_backup: bool,

    /// Maximum number of snapshots kept per data file
    pub max_backups: usize,
}

impl Default for BackupSection {
    fn default() -> Self {
        Self {
            auto_backup: true,
            max_backups: 10,
        }
    }
}

impl ConfigSection for BackupSection {
    fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(e) = Validator::in_range(self.max_backups, 1, 100, "backup.max_backups") {
            errors.push(e);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn section_name(&self) -> &'static str {
        "backup"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.version, CONFIG_VERSION);
        assert_eq!(config.backup.max_backups, 10);
        assert!(config.backup.auto_backup);
        assert_eq!(config.library.data_file, PathBuf::from("Biblioteka.csv"));
    }

    #[test]
    fn test_invalid_max_backups_fails_validation() {
        let mut config = Config::default();
        config.backup.max_backups = 0;

        let errors = config.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "backup.max_backups");
    }

    #[test]
    fn test_empty_data_file_fails_validation() {
        let mut config = Config::default();
        config.library.data_file = PathBuf::new();

        let errors = config.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "library.data_file");
    }

    #[test]
    fn test_invalid_log_level_fails_validation() {
        let mut config = Config::default();
        config.library.log_level = "loud".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_section_names() {
        assert_eq!(LibrarySection::default().section_name(), "library");
        assert_eq!(BackupSection::default().section_name(), "backup");
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = Config::default();
        config.backup.max_backups = 5;

        let toml_string = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_string).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let parsed: Config = toml::from_str("[backup]\nmax_backups = 3\n").unwrap();
        assert_eq!(parsed.backup.max_backups, 3);
        assert!(parsed.backup.auto_backup);
        assert_eq!(parsed.library.log_level, "info");
    }
}
