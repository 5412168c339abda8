pub mod error;
pub mod types;

// Re-export commonly used types
pub use error::LoanError;
pub use types::{join_names, split_names, Book, LibraryStats, Validator};
