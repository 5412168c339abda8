//! CSV adapter between disk rows and typed book records
//!
//! Load is forgiving at the storage boundary: missing file, undecodable
//! bytes, or an incomplete header yield an empty set with a logged
//! cause, and individually malformed rows are skipped with a warning.
//! Save snapshots the existing file first, then replaces it atomically
//! through a temp file in the same directory.

use crate::backup::BackupManager;
use crate::columns;
use crate::error::{StoreError, StoreResult};
use bookshelf_core::Book;
use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, Writer};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// CSV-backed record store
pub struct CsvStore {
    path: PathBuf,
    backups: BackupManager,
}

impl CsvStore {
    /// Creates a store for the given data file path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            backups: BackupManager::new(),
        }
    }

    /// Replaces the backup manager (e.g. to change retention)
    pub fn with_backup_manager(mut self, backups: BackupManager) -> Self {
        self.backups = backups;
        self
    }

    /// Returns the data file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the backup manager
    pub fn backups(&self) -> &BackupManager {
        &self.backups
    }

    /// Loads all records from the data file
    ///
    /// Never returns an error: every failure mode degrades to an empty
    /// set (or a shorter set, for row-level problems) with the cause
    /// logged.
    pub fn load(&self) -> Vec<Book> {
        if !self.path.exists() {
            log::warn!("Data file does not exist: {}", self.path.display());
            return Vec::new();
        }

        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) => {
                log::error!("Could not read data file {}: {}", self.path.display(), e);
                return Vec::new();
            }
        };

        // Strict UTF-8 first; legacy files fall back to lossy decoding
        let text = match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(e) => {
                log::warn!(
                    "Data file {} is not valid UTF-8, decoding lossily",
                    self.path.display()
                );
                String::from_utf8_lossy(e.as_bytes()).into_owned()
            }
        };

        if text.trim().is_empty() {
            log::warn!("Data file {} is empty", self.path.display());
            return Vec::new();
        }

        let mut reader = ReaderBuilder::new()
            .flexible(true)
            .from_reader(text.as_bytes());

        let headers = match reader.headers() {
            Ok(headers) => headers.clone(),
            Err(e) => {
                log::error!("Could not parse CSV header: {}", e);
                return Vec::new();
            }
        };

        for required in columns::REQUIRED {
            if !headers.iter().any(|h| h.trim() == required) {
                log::error!(
                    "Data file {} is missing required column '{}'",
                    self.path.display(),
                    required
                );
                return Vec::new();
            }
        }

        let mut books = Vec::new();
        let mut seen_numbers = HashSet::new();

        for (index, result) in reader.records().enumerate() {
            let row_number = index + 2; // header is row 1
            let record = match result {
                Ok(record) => record,
                Err(e) => {
                    log::warn!("Skipping unreadable row {}: {}", row_number, e);
                    continue;
                }
            };

            let Some(book) = row_to_book(&headers, &record, row_number) else {
                continue;
            };

            // External edits can introduce duplicates; keep the rows
            // but flag them (the application never renumbers)
            if !seen_numbers.insert(book.sequence_number) {
                log::warn!(
                    "Duplicate sequence number {} at row {}",
                    book.sequence_number,
                    row_number
                );
            }

            books.push(book);
        }

        log::info!("Loaded {} books from {}", books.len(), self.path.display());
        books
    }

    /// Writes the full record set back to the data file
    ///
    /// The existing file is snapshotted first; a failed snapshot aborts
    /// the save. The new content lands via temp file + rename, so the
    /// data file is never observed half-written.
    pub fn save(&self, books: &[Book]) -> StoreResult<()> {
        match self.backups.backup(&self.path)? {
            Some(backup_path) => log::debug!("Snapshotted to {}", backup_path.display()),
            None => log::debug!("No existing data file to snapshot"),
        }

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut temp_file = NamedTempFile::new_in(dir).map_err(|e| StoreError::Write {
            path: self.path.clone(),
            source: e,
        })?;

        {
            let mut writer = Writer::from_writer(temp_file.as_file_mut());
            writer.write_record(columns::WRITE_HEADER)?;
            for book in books {
                writer.write_record(&book_to_row(book))?;
            }
            writer.flush().map_err(|e| StoreError::Write {
                path: self.path.clone(),
                source: e,
            })?;
        }

        temp_file.persist(&self.path).map_err(|e| StoreError::Write {
            path: self.path.clone(),
            source: e.error,
        })?;

        log::info!("Saved {} books to {}", books.len(), self.path.display());
        Ok(())
    }
}

/// Looks up a cell by column name; missing cells read as empty
fn field<'a>(headers: &StringRecord, record: &'a StringRecord, name: &str) -> &'a str {
    headers
        .iter()
        .position(|h| h.trim() == name)
        .and_then(|index| record.get(index))
        .unwrap_or("")
        .trim()
}

fn optional(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Parses a date in any of the formats seen in historical data files
fn parse_flexible_date(value: &str) -> Option<NaiveDate> {
    const FORMATS: [&str; 4] = ["%Y-%m-%d", "%d.%m.%Y", "%d/%m/%Y", "%Y/%m/%d"];
    FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
}

fn is_affirmative(value: &str) -> bool {
    matches!(
        value.to_lowercase().as_str(),
        "да" | "yes" | "true" | "1"
    )
}

fn row_to_book(headers: &StringRecord, record: &StringRecord, row_number: usize) -> Option<Book> {
    let title = field(headers, record, columns::TITLE);
    let authors = field(headers, record, columns::AUTHORS);
    let sequence_raw = field(headers, record, columns::SEQUENCE_NUMBER);

    if title.is_empty() || authors.is_empty() {
        log::warn!(
            "Skipping row {}: missing required title or authors",
            row_number
        );
        return None;
    }

    let sequence_number = match sequence_raw.parse::<u32>() {
        Ok(number) if number > 0 => number,
        _ => {
            log::warn!(
                "Skipping row {}: invalid sequence number '{}'",
                row_number,
                sequence_raw
            );
            return None;
        }
    };

    let mut book = Book::new(sequence_number, title, authors);

    let year_raw = field(headers, record, columns::PUBLICATION_YEAR);
    if !year_raw.is_empty() {
        match year_raw.parse::<i32>() {
            Ok(year) => book.publication_year = Some(year),
            Err(_) => log::warn!(
                "Row {}: ignoring non-numeric publication year '{}'",
                row_number,
                year_raw
            ),
        }
    }

    book.genre = optional(field(headers, record, columns::GENRE));
    book.series = optional(field(headers, record, columns::SERIES));
    book.collection = optional(field(headers, record, columns::COLLECTION));
    book.isbn = optional(field(headers, record, columns::ISBN));
    book.binding = optional(field(headers, record, columns::BINDING));
    book.note = optional(field(headers, record, columns::NOTE));

    // Legacy singular publisher column folds into the canonical one;
    // when both are populated the canonical column wins
    let canonical = field(headers, record, columns::PUBLISHERS);
    let legacy = field(headers, record, columns::PUBLISHER_LEGACY);
    book.publishers = optional(if canonical.is_empty() { legacy } else { canonical });

    let loaned_raw = field(headers, record, columns::LOANED);
    book.is_loaned = is_affirmative(loaned_raw);
    book.loan_date = parse_flexible_date(field(headers, record, columns::LOAN_DATE));

    // Very old files put the loan date in the flag cell itself
    if book.loan_date.is_none() && !book.is_loaned {
        if let Some(date) = parse_flexible_date(loaned_raw) {
            book.loan_date = Some(date);
            book.is_loaned = true;
        }
    }

    let returned_raw = field(headers, record, columns::RETURNED);
    if !returned_raw.is_empty() {
        match parse_flexible_date(returned_raw) {
            Some(date) => book.return_date = Some(date),
            None => log::warn!(
                "Row {}: ignoring unparseable return date '{}'",
                row_number,
                returned_raw
            ),
        }
    }

    book.borrowed_by = optional(field(headers, record, columns::BORROWED_BY));
    book.loan_note = optional(field(headers, record, columns::LOAN_NOTE));

    Some(book)
}

fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

fn book_to_row(book: &Book) -> Vec<String> {
    vec![
        book.sequence_number.to_string(),
        book.title.clone(),
        book.authors.clone(),
        book.publication_year
            .map(|y| y.to_string())
            .unwrap_or_default(),
        book.genre.clone().unwrap_or_default(),
        book.series.clone().unwrap_or_default(),
        book.collection.clone().unwrap_or_default(),
        book.publishers.clone().unwrap_or_default(),
        book.isbn.clone().unwrap_or_default(),
        book.binding.clone().unwrap_or_default(),
        book.note.clone().unwrap_or_default(),
        if book.is_loaned {
            columns::LOANED_YES.to_string()
        } else {
            String::new()
        },
        format_date(book.loan_date),
        format_date(book.return_date),
        book.borrowed_by.clone().unwrap_or_default(),
        book.loan_note.clone().unwrap_or_default(),
    ]
}
