//! Error types for the storage layer

use std::path::PathBuf;
use thiserror::Error;

/// Result type for storage operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur while persisting the record set
#[derive(Debug, Error)]
pub enum StoreError {
    /// Failed to write the data file
    #[error("Failed to write data file at {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to serialize records to CSV
    #[error("Failed to serialize records: {0}")]
    Csv(#[from] csv::Error),

    /// Failed to snapshot the data file before overwriting it
    #[error("Failed to back up data file at {path}: {source}")]
    Backup {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_names_path() {
        let err = StoreError::Write {
            path: PathBuf::from("/tmp/biblioteka.csv"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.to_string().contains("/tmp/biblioteka.csv"));
    }
}
