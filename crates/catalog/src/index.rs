//! Derived pick-list indexes
//!
//! Sorted, deduplicated value lists recomputed from the record set
//! after every mutation. They drive autocomplete and filter widgets in
//! the presentation layer and are never a source of truth.

use bookshelf_core::{split_names, Book};
use std::collections::BTreeSet;

/// All derived lists, rebuilt together
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Indexes {
    pub authors: Vec<String>,
    pub genres: Vec<String>,
    pub publishers: Vec<String>,
    pub bindings: Vec<String>,
    pub series: Vec<String>,
}

impl Indexes {
    /// Builds every index from the current record set
    pub fn build(books: &[Book]) -> Self {
        Self {
            authors: authors(books),
            genres: genres(books),
            publishers: publishers(books),
            bindings: bindings(books),
            series: series(books),
        }
    }
}

/// Unique author names, split on `;`, sorted
pub fn authors(books: &[Book]) -> Vec<String> {
    unique_split(books, |book| Some(book.authors.as_str()))
}

/// Unique genres, sorted
pub fn genres(books: &[Book]) -> Vec<String> {
    unique_whole(books, |book| book.genre.as_deref())
}

/// Unique publisher names, split on `;`, sorted
pub fn publishers(books: &[Book]) -> Vec<String> {
    unique_split(books, |book| book.publishers.as_deref())
}

/// Unique binding types, sorted
pub fn bindings(books: &[Book]) -> Vec<String> {
    unique_whole(books, |book| book.binding.as_deref())
}

/// Unique series names, sorted
pub fn series(books: &[Book]) -> Vec<String> {
    unique_whole(books, |book| book.series.as_deref())
}

fn unique_split<'a>(books: &'a [Book], get: impl Fn(&'a Book) -> Option<&'a str>) -> Vec<String> {
    let mut values = BTreeSet::new();
    for book in books {
        if let Some(text) = get(book) {
            values.extend(split_names(text));
        }
    }
    values.into_iter().collect()
}

fn unique_whole<'a>(books: &'a [Book], get: impl Fn(&'a Book) -> Option<&'a str>) -> Vec<String> {
    let mut values = BTreeSet::new();
    for book in books {
        if let Some(text) = get(book) {
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                values.insert(trimmed.to_string());
            }
        }
    }
    values.into_iter().collect()
}
