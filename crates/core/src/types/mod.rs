//! Domain types for the home library
//!
//! Models organized by responsibility:
//! - `book`: the book record and its embedded loan sub-state
//! - `stats`: library-wide statistics
//! - `common`: shared traits and delimited-name helpers

mod book;
mod common;
mod stats;

// Re-export all public types
pub use book::Book;
pub use common::{join_names, split_names, Validator};
pub use stats::LibraryStats;
