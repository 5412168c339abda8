//! Error types for catalog operations

use bookshelf_store::StoreError;
use thiserror::Error;

/// Result type for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Errors returned by the public catalog operations
#[derive(Debug, Error)]
pub enum CatalogError {
    /// No record matches the given title
    #[error("Book not found: {0}")]
    BookNotFound(String),

    /// The record failed validation before persistence
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Loan requested for a book that is already out
    #[error("Book is already loaned: {0}")]
    AlreadyLoaned(String),

    /// Return requested for a book that is not out
    #[error("Book is not loaned: {0}")]
    NotLoaned(String),

    /// The storage layer failed to persist the record set
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
}
