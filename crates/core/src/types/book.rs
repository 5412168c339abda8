//! Book record and its embedded loan sub-state

use crate::error::LoanError;
use crate::types::Validator;
use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// One catalog entry representing a physical or logical book
///
/// The loan sub-state is embedded rather than modeled as a separate
/// entity: a record carries who borrowed it and when, and availability
/// is *derived* from those fields (see [`Book::is_currently_loaned`]),
/// never trusted from the stored flag alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// Positive, unique within a record set; assigned on add, never reused
    pub sequence_number: u32,
    pub title: String,
    /// One or more author names joined with `"; "`
    pub authors: String,
    pub publication_year: Option<i32>,
    pub genre: Option<String>,
    pub series: Option<String>,
    pub collection: Option<String>,
    /// Zero or more publisher names joined with `"; "`
    pub publishers: Option<String>,
    pub isbn: Option<String>,
    /// Binding type; enumerated-ish (hardcover/paperback/spiral/other) but free text
    pub binding: Option<String>,
    pub note: Option<String>,

    // Loan sub-state
    pub is_loaned: bool,
    pub loan_date: Option<NaiveDate>,
    pub return_date: Option<NaiveDate>,
    pub borrowed_by: Option<String>,
    pub loan_note: Option<String>,
}

impl Book {
    /// Creates a new book with required fields and empty loan state
    pub fn new(sequence_number: u32, title: impl Into<String>, authors: impl Into<String>) -> Self {
        Self {
            sequence_number,
            title: title.into(),
            authors: authors.into(),
            publication_year: None,
            genre: None,
            series: None,
            collection: None,
            publishers: None,
            isbn: None,
            binding: None,
            note: None,
            is_loaned: false,
            loan_date: None,
            return_date: None,
            borrowed_by: None,
            loan_note: None,
        }
    }

    /// Returns true if the book is currently out on loan
    ///
    /// A populated `return_date` means the book is available again,
    /// regardless of a stale `is_loaned` flag.
    pub fn is_currently_loaned(&self) -> bool {
        self.is_loaned && self.return_date.is_none()
    }

    /// Loans the book to a borrower
    ///
    /// Fails if the book is already out. `date` defaults to today.
    pub fn loan_to(
        &mut self,
        borrower: impl Into<String>,
        date: Option<NaiveDate>,
    ) -> Result<(), LoanError> {
        if self.is_currently_loaned() {
            return Err(LoanError::AlreadyLoaned);
        }

        self.is_loaned = true;
        self.borrowed_by = Some(borrower.into());
        self.loan_date = Some(date.unwrap_or_else(|| Local::now().date_naive()));
        self.return_date = None;
        Ok(())
    }

    /// Returns the book from a loan
    ///
    /// Fails if the book is not currently loaned. `date` defaults to
    /// today. `borrowed_by` and `loan_date` are kept as history.
    pub fn return_from_loan(&mut self, date: Option<NaiveDate>) -> Result<(), LoanError> {
        if !self.is_currently_loaned() {
            return Err(LoanError::NotLoaned);
        }

        self.return_date = Some(date.unwrap_or_else(|| Local::now().date_naive()));
        self.is_loaned = false;
        Ok(())
    }
}

impl Validator for Book {
    fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.sequence_number == 0 {
            errors.push("Sequence number must be positive".to_string());
        }

        if self.title.trim().is_empty() {
            errors.push("Title cannot be empty".to_string());
        }

        if self.authors.trim().is_empty() {
            errors.push("Authors cannot be empty".to_string());
        }

        if let Some(year) = self.publication_year {
            let max_year = Local::now().year() + 1;
            if !(1000..=max_year).contains(&year) {
                errors.push(format!(
                    "Publication year must be between 1000 and {}",
                    max_year
                ));
            }
        }

        if let Some(ref isbn) = self.isbn {
            let digits = isbn.chars().filter(char::is_ascii_digit).count();
            if !isbn.trim().is_empty() && digits != 10 && digits != 13 {
                errors.push("ISBN must contain 10 or 13 digits".to_string());
            }
        }

        if let (Some(loaned), Some(returned)) = (self.loan_date, self.return_date) {
            if returned < loaned {
                errors.push("Return date cannot precede loan date".to_string());
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_book_new() {
        let book = Book::new(1, "На Дрини ћуприја", "Иво Андрић");
        assert_eq!(book.sequence_number, 1);
        assert_eq!(book.title, "На Дрини ћуприја");
        assert!(!book.is_loaned);
        assert!(!book.is_currently_loaned());
        assert!(book.loan_date.is_none());
        assert!(book.borrowed_by.is_none());
    }

    #[test]
    fn test_validation_success() {
        let book = Book::new(1, "Test", "Author");
        assert!(book.is_valid());
    }

    #[test]
    fn test_validation_empty_title() {
        let book = Book::new(1, "   ", "Author");
        assert!(!book.is_valid());
    }

    #[test]
    fn test_validation_empty_authors() {
        let book = Book::new(1, "Test", "");
        assert!(!book.is_valid());
    }

    #[test]
    fn test_validation_zero_sequence_number() {
        let book = Book::new(0, "Test", "Author");
        assert!(!book.is_valid());
    }

    #[test]
    fn test_validation_year_bounds() {
        let mut book = Book::new(1, "Test", "Author");
        book.publication_year = Some(1961);
        assert!(book.is_valid());

        book.publication_year = Some(999);
        assert!(!book.is_valid());

        book.publication_year = Some(Local::now().year() + 2);
        assert!(!book.is_valid());
    }

    #[test]
    fn test_validation_isbn_digit_count() {
        let mut book = Book::new(1, "Test", "Author");

        book.isbn = Some("86-01-00123-5".to_string());
        assert!(book.is_valid());

        book.isbn = Some("978-86-521-0123-4".to_string());
        assert!(book.is_valid());

        book.isbn = Some("12345".to_string());
        assert!(!book.is_valid());
    }

    #[test]
    fn test_validation_return_before_loan() {
        let mut book = Book::new(1, "Test", "Author");
        book.loan_date = Some(date(2024, 5, 10));
        book.return_date = Some(date(2024, 5, 1));
        assert!(!book.is_valid());

        book.return_date = Some(date(2024, 5, 10));
        assert!(book.is_valid());
    }

    #[test]
    fn test_loan_sets_fields() {
        let mut book = Book::new(1, "Test", "Author");
        book.loan_to("Милица", Some(date(2024, 3, 1))).unwrap();

        assert!(book.is_currently_loaned());
        assert_eq!(book.borrowed_by.as_deref(), Some("Милица"));
        assert_eq!(book.loan_date, Some(date(2024, 3, 1)));
        assert!(book.return_date.is_none());
    }

    #[test]
    fn test_loan_defaults_to_today() {
        let mut book = Book::new(1, "Test", "Author");
        book.loan_to("Марко", None).unwrap();
        assert_eq!(book.loan_date, Some(Local::now().date_naive()));
    }

    #[test]
    fn test_double_loan_rejected() {
        let mut book = Book::new(1, "Test", "Author");
        book.loan_to("Ана", None).unwrap();

        let result = book.loan_to("Марко", None);
        assert_eq!(result, Err(LoanError::AlreadyLoaned));
        // First loan untouched
        assert_eq!(book.borrowed_by.as_deref(), Some("Ана"));
    }

    #[test]
    fn test_return_keeps_history() {
        let mut book = Book::new(1, "Test", "Author");
        book.loan_to("Ана", Some(date(2024, 3, 1))).unwrap();
        book.return_from_loan(Some(date(2024, 4, 1))).unwrap();

        assert!(!book.is_currently_loaned());
        assert!(!book.is_loaned);
        assert_eq!(book.return_date, Some(date(2024, 4, 1)));
        assert_eq!(book.borrowed_by.as_deref(), Some("Ана"));
        assert_eq!(book.loan_date, Some(date(2024, 3, 1)));
    }

    #[test]
    fn test_return_without_loan_rejected() {
        let mut book = Book::new(1, "Test", "Author");
        assert_eq!(book.return_from_loan(None), Err(LoanError::NotLoaned));
    }

    #[test]
    fn test_loan_again_after_return() {
        let mut book = Book::new(1, "Test", "Author");
        book.loan_to("Ана", None).unwrap();
        book.return_from_loan(None).unwrap();

        book.loan_to("Марко", None).unwrap();
        assert!(book.is_currently_loaned());
        assert_eq!(book.borrowed_by.as_deref(), Some("Марко"));
        assert!(book.return_date.is_none());
    }

    #[test]
    fn test_stale_flag_with_return_date_is_available() {
        let mut book = Book::new(1, "Test", "Author");
        book.is_loaned = true;
        book.return_date = Some(date(2024, 1, 1));
        // Derived availability wins over the stale flag
        assert!(!book.is_currently_loaned());
    }
}
