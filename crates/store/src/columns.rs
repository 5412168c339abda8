//! CSV column schema
//!
//! Header names match the historical Serbian data files. `Издавач`
//! (singular) is a legacy synonym for the canonical `Издавачи` column:
//! it is accepted on read and folded into the canonical field, and
//! never written back.

pub const SEQUENCE_NUMBER: &str = "Редни број";
pub const TITLE: &str = "Наслов";
pub const AUTHORS: &str = "Писац";
pub const PUBLICATION_YEAR: &str = "Година издавања";
pub const GENRE: &str = "Жанр";
pub const SERIES: &str = "Серијал";
pub const COLLECTION: &str = "Колекција";
/// Canonical multi-valued publisher column
pub const PUBLISHERS: &str = "Издавачи";
/// Legacy single-valued publisher column, read-only
pub const PUBLISHER_LEGACY: &str = "Издавач";
pub const ISBN: &str = "ИСБН";
pub const BINDING: &str = "Повез";
pub const NOTE: &str = "Напомена";
/// Loaned flag, `Да`/empty convention
pub const LOANED: &str = "Позајмљена";
pub const LOAN_DATE: &str = "Датум позајмице";
/// Return date, or blank while the book is out
pub const RETURNED: &str = "Враћена";
pub const BORROWED_BY: &str = "Ко је позајмио";
pub const LOAN_NOTE: &str = "Напомена о позајмици";

/// Cell value marking a loaned book
pub const LOANED_YES: &str = "Да";

/// Sentinel for loan-detail queries on never-loaned records
pub const NO_DATA: &str = "Нема података";

/// Columns a data file must declare for the load to proceed
pub const REQUIRED: [&str; 3] = [SEQUENCE_NUMBER, TITLE, AUTHORS];

/// Column order for serialization; sequence number always first
pub const WRITE_HEADER: [&str; 16] = [
    SEQUENCE_NUMBER,
    TITLE,
    AUTHORS,
    PUBLICATION_YEAR,
    GENRE,
    SERIES,
    COLLECTION,
    PUBLISHERS,
    ISBN,
    BINDING,
    NOTE,
    LOANED,
    LOAN_DATE,
    RETURNED,
    BORROWED_BY,
    LOAN_NOTE,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_columns_are_written() {
        for column in REQUIRED {
            assert!(WRITE_HEADER.contains(&column));
        }
    }

    #[test]
    fn test_sequence_number_is_first() {
        assert_eq!(WRITE_HEADER[0], SEQUENCE_NUMBER);
    }

    #[test]
    fn test_legacy_publisher_column_is_not_written() {
        assert!(!WRITE_HEADER.contains(&PUBLISHER_LEGACY));
    }
}
