//! The book service: aggregate root over the record store
//!
//! Every mutating operation works on the in-memory set, persists the
//! whole set through the store, and rebuilds the derived indexes on
//! success. A failed save rolls the in-memory set back, so the service
//! never drifts from disk.

use crate::error::{CatalogError, CatalogResult};
use crate::index::Indexes;
use crate::search::SearchCriteria;
use crate::stats;
use bookshelf_core::{join_names, split_names, Book, LibraryStats, Validator};
use bookshelf_store::{columns, CsvStore};
use chrono::NaiveDate;

/// Input for creating a new record; the sequence number is assigned by
/// the service
#[derive(Debug, Clone, Default)]
pub struct BookDraft {
    pub title: String,
    pub authors: String,
    pub publication_year: Option<i32>,
    pub genre: Option<String>,
    pub series: Option<String>,
    pub collection: Option<String>,
    pub publishers: Option<String>,
    pub isbn: Option<String>,
    pub binding: Option<String>,
    pub note: Option<String>,
}

impl BookDraft {
    pub fn new(title: impl Into<String>, authors: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            authors: authors.into(),
            ..Self::default()
        }
    }
}

/// Field-level overwrite patch for `update`
///
/// `Some` replaces the field; for optional fields an empty string
/// clears it. The year travels as text because the presentation layer
/// sends raw form input; a non-numeric value is a validation failure.
#[derive(Debug, Clone, Default)]
pub struct BookPatch {
    pub title: Option<String>,
    pub authors: Option<String>,
    pub publication_year: Option<String>,
    pub genre: Option<String>,
    pub series: Option<String>,
    pub collection: Option<String>,
    pub publishers: Option<String>,
    pub isbn: Option<String>,
    pub binding: Option<String>,
    pub note: Option<String>,
}

/// Loan sub-fields for display; never-populated fields carry the
/// `Нема података` sentinel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoanDetails {
    pub currently_loaned: bool,
    pub loan_date: String,
    pub return_date: String,
    pub borrowed_by: String,
    pub loan_note: String,
}

/// High-level book management over a CSV-backed store
pub struct BookService {
    store: CsvStore,
    books: Vec<Book>,
    indexes: Indexes,
}

impl BookService {
    /// Creates a service with an empty in-memory set
    pub fn new(store: CsvStore) -> Self {
        Self {
            store,
            books: Vec::new(),
            indexes: Indexes::default(),
        }
    }

    /// Creates a service and loads the current record set
    pub fn open(store: CsvStore) -> Self {
        let mut service = Self::new(store);
        service.load();
        service
    }

    /// Reloads the record set from the store; returns the record count
    pub fn load(&mut self) -> usize {
        self.books = self.store.load();
        self.indexes = Indexes::build(&self.books);
        self.books.len()
    }

    /// Returns all records
    pub fn books(&self) -> &[Book] {
        &self.books
    }

    /// Returns the record count
    pub fn book_count(&self) -> usize {
        self.books.len()
    }

    /// Returns the derived pick-list indexes
    pub fn indexes(&self) -> &Indexes {
        &self.indexes
    }

    /// Finds a record by case-insensitive title equality
    pub fn find_by_title(&self, title: &str) -> Option<&Book> {
        self.position_by_title(title).map(|index| &self.books[index])
    }

    /// Adds a new record; returns the assigned sequence number
    pub fn add(&mut self, draft: BookDraft) -> CatalogResult<u32> {
        let sequence_number = next_sequence_number(&self.books);

        let mut book = Book::new(
            sequence_number,
            draft.title.trim(),
            join_names(&split_names(&draft.authors)),
        );
        book.publication_year = draft.publication_year;
        book.genre = normalize(draft.genre);
        book.series = normalize(draft.series);
        book.collection = normalize(draft.collection);
        book.publishers = normalize(draft.publishers).map(|p| join_names(&split_names(&p)));
        book.isbn = normalize(draft.isbn);
        book.binding = normalize(draft.binding);
        book.note = normalize(draft.note);

        validate(&book)?;

        let previous = self.books.clone();
        self.books.push(book);
        self.persist(previous)?;

        log::info!("Added book with sequence number {}", sequence_number);
        Ok(sequence_number)
    }

    /// Overwrites fields of the record matching the title
    pub fn update(&mut self, title: &str, patch: BookPatch) -> CatalogResult<()> {
        let index = self
            .position_by_title(title)
            .ok_or_else(|| CatalogError::BookNotFound(title.to_string()))?;

        let mut updated = self.books[index].clone();
        apply_patch(&mut updated, patch)?;
        validate(&updated)?;

        let previous = self.books.clone();
        self.books[index] = updated;
        self.persist(previous)?;

        log::info!("Updated book '{}'", title);
        Ok(())
    }

    /// Removes the record matching the title
    pub fn delete(&mut self, title: &str) -> CatalogResult<()> {
        let index = self
            .position_by_title(title)
            .ok_or_else(|| CatalogError::BookNotFound(title.to_string()))?;

        let previous = self.books.clone();
        let removed = self.books.remove(index);
        self.persist(previous)?;

        log::info!("Deleted book '{}'", removed.title);
        Ok(())
    }

    /// Returns records matching every non-empty criterion
    pub fn search(&self, criteria: &SearchCriteria) -> Vec<&Book> {
        self.books
            .iter()
            .filter(|book| criteria.matches(book))
            .collect()
    }

    /// Loans the matched book to a borrower
    pub fn loan(
        &mut self,
        title: &str,
        borrower: &str,
        date: Option<NaiveDate>,
        note: Option<String>,
    ) -> CatalogResult<()> {
        let index = self
            .position_by_title(title)
            .ok_or_else(|| CatalogError::BookNotFound(title.to_string()))?;

        if borrower.trim().is_empty() {
            return Err(CatalogError::Validation(
                "Borrower cannot be empty".to_string(),
            ));
        }

        let mut book = self.books[index].clone();
        if book.loan_to(borrower.trim(), date).is_err() {
            log::error!("Book '{}' is already loaned", book.title);
            return Err(CatalogError::AlreadyLoaned(book.title));
        }
        book.loan_note = normalize(note);

        let previous = self.books.clone();
        self.books[index] = book;
        self.persist(previous)?;

        log::info!("Loaned '{}' to {}", title, borrower.trim());
        Ok(())
    }

    /// Returns the matched book from its loan
    pub fn return_book(&mut self, title: &str, date: Option<NaiveDate>) -> CatalogResult<()> {
        let index = self
            .position_by_title(title)
            .ok_or_else(|| CatalogError::BookNotFound(title.to_string()))?;

        let mut book = self.books[index].clone();
        if book.return_from_loan(date).is_err() {
            log::error!("Book '{}' is not loaned", book.title);
            return Err(CatalogError::NotLoaned(book.title));
        }

        let previous = self.books.clone();
        self.books[index] = book;
        self.persist(previous)?;

        log::info!("Returned '{}'", title);
        Ok(())
    }

    /// Returns the loan sub-fields for a matched title, or `None` when
    /// no record matches
    pub fn loan_details(&self, title: &str) -> Option<LoanDetails> {
        let book = self.find_by_title(title)?;

        let text = |value: Option<&str>| match value {
            Some(v) if !v.trim().is_empty() => v.to_string(),
            _ => columns::NO_DATA.to_string(),
        };
        let date_text = |value: Option<NaiveDate>| match value {
            Some(date) => date.format("%Y-%m-%d").to_string(),
            None => columns::NO_DATA.to_string(),
        };

        Some(LoanDetails {
            currently_loaned: book.is_currently_loaned(),
            loan_date: date_text(book.loan_date),
            return_date: date_text(book.return_date),
            borrowed_by: text(book.borrowed_by.as_deref()),
            loan_note: text(book.loan_note.as_deref()),
        })
    }

    /// Records currently out on loan
    pub fn loaned_books(&self) -> Vec<&Book> {
        self.books
            .iter()
            .filter(|book| book.is_currently_loaned())
            .collect()
    }

    /// Records available for loan
    pub fn available_books(&self) -> Vec<&Book> {
        self.books
            .iter()
            .filter(|book| !book.is_currently_loaned())
            .collect()
    }

    /// Computes library-wide statistics
    pub fn stats(&self) -> LibraryStats {
        stats::compute_stats(&self.books)
    }

    fn position_by_title(&self, title: &str) -> Option<usize> {
        let needle = title.trim().to_lowercase();
        self.books
            .iter()
            .position(|book| book.title.trim().to_lowercase() == needle)
    }

    /// Saves the in-memory set; restores `previous` on failure
    fn persist(&mut self, previous: Vec<Book>) -> CatalogResult<()> {
        match self.store.save(&self.books) {
            Ok(()) => {
                self.indexes = Indexes::build(&self.books);
                Ok(())
            }
            Err(e) => {
                log::error!("Save failed, rolling back in-memory change: {}", e);
                self.books = previous;
                Err(CatalogError::Storage(e))
            }
        }
    }
}

/// One past the highest number in use, so numbers freed by a delete
/// are never re-minted
fn next_sequence_number(books: &[Book]) -> u32 {
    books
        .iter()
        .map(|book| book.sequence_number)
        .max()
        .unwrap_or(0)
        + 1
}

fn normalize(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn validate(book: &Book) -> CatalogResult<()> {
    book.validate()
        .map_err(|errors| CatalogError::Validation(errors.join("; ")))
}

fn apply_patch(book: &mut Book, patch: BookPatch) -> CatalogResult<()> {
    if let Some(title) = patch.title {
        book.title = title.trim().to_string();
    }
    if let Some(authors) = patch.authors {
        book.authors = join_names(&split_names(&authors));
    }
    if let Some(year) = patch.publication_year {
        let year = year.trim();
        if year.is_empty() {
            book.publication_year = None;
        } else {
            book.publication_year = Some(year.parse().map_err(|_| {
                CatalogError::Validation(format!("Publication year must be numeric, got '{}'", year))
            })?);
        }
    }
    if let Some(genre) = patch.genre {
        book.genre = normalize(Some(genre));
    }
    if let Some(series) = patch.series {
        book.series = normalize(Some(series));
    }
    if let Some(collection) = patch.collection {
        book.collection = normalize(Some(collection));
    }
    if let Some(publishers) = patch.publishers {
        // Patch text always lands in the canonical publishers field
        book.publishers = normalize(Some(publishers)).map(|p| join_names(&split_names(&p)));
    }
    if let Some(isbn) = patch.isbn {
        book.isbn = normalize(Some(isbn));
    }
    if let Some(binding) = patch.binding {
        book.binding = normalize(Some(binding));
    }
    if let Some(note) = patch.note {
        book.note = normalize(Some(note));
    }
    Ok(())
}
