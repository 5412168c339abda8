//! Library-wide statistics

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Aggregate statistics over the whole record set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibraryStats {
    pub total_books: usize,
    pub loaned_books: usize,
    pub available_books: usize,
    pub authors_count: usize,
    pub genres_count: usize,
    pub publishers_count: usize,
    /// Loan date of the most recent still-outstanding loan
    pub last_loan_date: Option<NaiveDate>,
}

impl LibraryStats {
    /// Creates empty statistics
    pub fn empty() -> Self {
        Self {
            total_books: 0,
            loaned_books: 0,
            available_books: 0,
            authors_count: 0,
            genres_count: 0,
            publishers_count: 0,
            last_loan_date: None,
        }
    }

    /// Returns the percentage of books currently out on loan
    pub fn loaned_percentage(&self) -> f64 {
        if self.total_books == 0 {
            return 0.0;
        }
        (self.loaned_books as f64 / self.total_books as f64) * 100.0
    }
}

impl Default for LibraryStats {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_stats() {
        let stats = LibraryStats::empty();
        assert_eq!(stats.total_books, 0);
        assert_eq!(stats.loaned_books, 0);
        assert!(stats.last_loan_date.is_none());
        assert_eq!(stats.loaned_percentage(), 0.0);
    }

    #[test]
    fn test_loaned_percentage() {
        let stats = LibraryStats {
            total_books: 4,
            loaned_books: 1,
            available_books: 3,
            ..LibraryStats::empty()
        };
        assert_eq!(stats.loaned_percentage(), 25.0);
    }

    #[test]
    fn test_default_is_empty() {
        assert_eq!(LibraryStats::default(), LibraryStats::empty());
    }
}
