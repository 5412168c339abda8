//! Book catalog service
//!
//! High-level orchestration over the record store: CRUD by title,
//! search, the loan state machine, derived pick-list indexes, and
//! statistics. This is the only layer the presentation code talks to;
//! it returns plain data and explicit failure values, never panics.

mod error;
pub mod index;
pub mod search;
mod service;
pub mod stats;

pub use error::{CatalogError, CatalogResult};
pub use index::Indexes;
pub use search::SearchCriteria;
pub use service::{BookDraft, BookPatch, BookService, LoanDetails};
