//! Timestamped backups of the data file with automatic rotation
//!
//! Every save of the record set is preceded by a snapshot named
//! `<data-file>.backup_<YYYYMMDD_HHMMSS>`, co-located with the
//! original. Only the most recent `max_backups` snapshots are kept;
//! older ones are pruned oldest-first by modification time.

use crate::error::{StoreError, StoreResult};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Default number of snapshots retained per data file
pub const DEFAULT_MAX_BACKUPS: usize = 10;

/// Manages data file backups
#[derive(Debug, Clone)]
pub struct BackupManager {
    max_backups: usize,
}

impl BackupManager {
    /// Creates a backup manager with the default retention count
    pub fn new() -> Self {
        Self {
            max_backups: DEFAULT_MAX_BACKUPS,
        }
    }

    /// Sets the maximum number of backups to keep
    pub fn with_max_backups(mut self, max: usize) -> Self {
        self.max_backups = max;
        self
    }

    /// Returns the retention count
    pub fn max_backups(&self) -> usize {
        self.max_backups
    }

    /// Creates a timestamped snapshot of the file, then prunes old ones
    ///
    /// Returns `Ok(None)` when the source file does not exist yet. The
    /// source is only ever opened for reading, so a crash mid-copy
    /// cannot corrupt it.
    pub fn backup(&self, path: &Path) -> StoreResult<Option<PathBuf>> {
        if !path.exists() {
            return Ok(None);
        }

        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let mut backup_path = PathBuf::from(format!("{}.backup_{}", path.display(), timestamp));

        // Two saves within the same second must not overwrite a snapshot
        let mut attempt = 1;
        while backup_path.exists() {
            backup_path =
                PathBuf::from(format!("{}.backup_{}_{}", path.display(), timestamp, attempt));
            attempt += 1;
        }

        fs::copy(path, &backup_path).map_err(|e| StoreError::Backup {
            path: path.to_path_buf(),
            source: e,
        })?;

        log::debug!("Created backup at {}", backup_path.display());

        self.prune(path);

        Ok(Some(backup_path))
    }

    /// Deletes the oldest backups beyond the retention count
    ///
    /// Deletion failures are logged and never fatal.
    pub fn prune(&self, path: &Path) {
        let backups = self.list_backups(path);
        if backups.len() <= self.max_backups {
            return;
        }

        let to_delete = backups.len() - self.max_backups;
        for old in backups.iter().take(to_delete) {
            match fs::remove_file(old) {
                Ok(()) => log::info!("Removed old backup {}", old.display()),
                Err(e) => log::warn!("Could not remove old backup {}: {}", old.display(), e),
            }
        }
    }

    /// Lists all backups of the file, oldest first
    pub fn list_backups(&self, path: &Path) -> Vec<PathBuf> {
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            return Vec::new();
        };
        let prefix = format!("{}.backup_", file_name);

        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };

        let entries = match fs::read_dir(parent) {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("Could not list backups in {}: {}", parent.display(), e);
                return Vec::new();
            }
        };

        let mut backups: Vec<(SystemTime, PathBuf)> = entries
            .flatten()
            .filter(|entry| {
                entry
                    .file_name()
                    .to_str()
                    .is_some_and(|name| name.starts_with(&prefix))
            })
            .filter_map(|entry| {
                let modified = entry.metadata().and_then(|m| m.modified()).ok()?;
                Some((modified, entry.path()))
            })
            .collect();

        backups.sort();
        backups.into_iter().map(|(_, path)| path).collect()
    }
}

impl Default for BackupManager {
    fn default() -> Self {
        Self::new()
    }
}
