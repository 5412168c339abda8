//! Multi-field substring search
//!
//! Every non-empty criterion must match as a case-insensitive
//! substring of the corresponding record field; criteria are AND-ed.
//! There is no OR or negation.

use bookshelf_core::Book;

/// Per-field substring criteria
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchCriteria {
    pub title: Option<String>,
    pub authors: Option<String>,
    pub genre: Option<String>,
    pub series: Option<String>,
    pub collection: Option<String>,
    pub publishers: Option<String>,
    pub isbn: Option<String>,
    pub binding: Option<String>,
    pub note: Option<String>,
    pub borrowed_by: Option<String>,
}

impl SearchCriteria {
    /// Creates an empty criteria set (matches everything)
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, value: impl Into<String>) -> Self {
        self.title = Some(value.into());
        self
    }

    pub fn with_authors(mut self, value: impl Into<String>) -> Self {
        self.authors = Some(value.into());
        self
    }

    pub fn with_genre(mut self, value: impl Into<String>) -> Self {
        self.genre = Some(value.into());
        self
    }

    pub fn with_publishers(mut self, value: impl Into<String>) -> Self {
        self.publishers = Some(value.into());
        self
    }

    pub fn with_borrowed_by(mut self, value: impl Into<String>) -> Self {
        self.borrowed_by = Some(value.into());
        self
    }

    /// Returns true when no criterion carries a non-empty value
    pub fn is_empty(&self) -> bool {
        [
            &self.title,
            &self.authors,
            &self.genre,
            &self.series,
            &self.collection,
            &self.publishers,
            &self.isbn,
            &self.binding,
            &self.note,
            &self.borrowed_by,
        ]
        .iter()
        .all(|criterion| criterion.as_deref().map_or(true, |value| value.trim().is_empty()))
    }

    /// Tests a record against every non-empty criterion
    pub fn matches(&self, book: &Book) -> bool {
        field_matches(Some(&book.title), &self.title)
            && field_matches(Some(&book.authors), &self.authors)
            && field_matches(book.genre.as_deref(), &self.genre)
            && field_matches(book.series.as_deref(), &self.series)
            && field_matches(book.collection.as_deref(), &self.collection)
            && field_matches(book.publishers.as_deref(), &self.publishers)
            && field_matches(book.isbn.as_deref(), &self.isbn)
            && field_matches(book.binding.as_deref(), &self.binding)
            && field_matches(book.note.as_deref(), &self.note)
            && field_matches(book.borrowed_by.as_deref(), &self.borrowed_by)
    }
}

/// Case-insensitive substring test; an absent field reads as empty
fn field_matches(value: Option<&str>, criterion: &Option<String>) -> bool {
    let Some(needle) = criterion.as_deref().map(str::trim) else {
        return true;
    };
    if needle.is_empty() {
        return true;
    }
    value
        .unwrap_or("")
        .to_lowercase()
        .contains(&needle.to_lowercase())
}
