//! Statistics aggregation over the record set

use crate::index;
use bookshelf_core::{split_names, Book, LibraryStats};
use std::collections::HashMap;

/// Computes library-wide statistics
pub fn compute_stats(books: &[Book]) -> LibraryStats {
    let loaned_books = books.iter().filter(|b| b.is_currently_loaned()).count();

    let last_loan_date = books
        .iter()
        .filter(|b| b.is_currently_loaned())
        .filter_map(|b| b.loan_date)
        .max();

    LibraryStats {
        total_books: books.len(),
        loaned_books,
        available_books: books.len() - loaned_books,
        authors_count: index::authors(books).len(),
        genres_count: index::genres(books).len(),
        publishers_count: index::publishers(books).len(),
        last_loan_date,
    }
}

/// Book count per genre, sorted by genre name
pub fn books_per_genre(books: &[Book]) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = count_by(books, |book| {
        book.genre.iter().map(|g| g.trim().to_string()).collect()
    })
    .into_iter()
    .collect();
    counts.sort();
    counts
}

/// Book count per publisher (multi-valued cells counted once per name),
/// sorted by publisher name
pub fn books_per_publisher(books: &[Book]) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = count_by(books, |book| {
        book.publishers
            .as_deref()
            .map(split_names)
            .unwrap_or_default()
    })
    .into_iter()
    .collect();
    counts.sort();
    counts
}

/// The `n` most frequent authors, by book count descending, ties broken
/// by name
pub fn top_authors(books: &[Book], n: usize) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> =
        count_by(books, |book| split_names(&book.authors))
            .into_iter()
            .collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    counts.truncate(n);
    counts
}

fn count_by(books: &[Book], keys: impl Fn(&Book) -> Vec<String>) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for book in books {
        for key in keys(book) {
            if !key.is_empty() {
                *counts.entry(key).or_insert(0) += 1;
            }
        }
    }
    counts
}
