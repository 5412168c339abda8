//! Domain-level errors

use thiserror::Error;

/// Errors raised by loan state transitions on a [`crate::Book`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoanError {
    /// The book is already out on loan
    #[error("book is already loaned")]
    AlreadyLoaned,

    /// The book is not currently loaned
    #[error("book is not loaned")]
    NotLoaned,
}
