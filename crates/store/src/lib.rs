//! Flat-file persistence for the home library
//!
//! Translates between the on-disk CSV representation and the in-memory
//! [`bookshelf_core::Book`] records, and keeps timestamped, rotation-bounded
//! backups of the data file.
//!
//! Design contract: `load` fails soft (empty set plus a logged cause),
//! `save` snapshots the existing file before overwriting it, and no
//! error ever panics past this boundary.

pub mod backup;
pub mod columns;
mod csv_store;
mod error;

pub use backup::BackupManager;
pub use csv_store::CsvStore;
pub use error::{StoreError, StoreResult};
