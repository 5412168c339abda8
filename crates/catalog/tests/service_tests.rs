//! End-to-end tests driving the service against a real data file

use bookshelf_catalog::{BookDraft, BookPatch, BookService, CatalogError, SearchCriteria};
use bookshelf_store::{BackupManager, CsvStore};
use chrono::NaiveDate;
use std::thread::sleep;
use std::time::Duration;
use tempfile::TempDir;

fn open_service(dir: &TempDir) -> BookService {
    BookService::open(CsvStore::new(dir.path().join("biblioteka.csv")))
}

fn draft(title: &str, authors: &str) -> BookDraft {
    BookDraft::new(title, authors)
}

#[test]
fn test_added_book_survives_reopen() {
    let dir = TempDir::new().unwrap();

    let mut service = open_service(&dir);
    let mut new_book = draft("На Дрини ћуприја", "Иво Андрић");
    new_book.publication_year = Some(1945);
    new_book.genre = Some("Роман".to_string());
    assert_eq!(service.add(new_book).unwrap(), 1);

    let reopened = open_service(&dir);
    assert_eq!(reopened.book_count(), 1);

    let book = reopened.find_by_title("на дрини ћуприја").unwrap();
    assert_eq!(book.sequence_number, 1);
    assert_eq!(book.publication_year, Some(1945));
    assert_eq!(book.genre.as_deref(), Some("Роман"));
}

#[test]
fn test_loan_cycle() {
    let dir = TempDir::new().unwrap();
    let mut service = open_service(&dir);
    service.add(draft("Проклета авлија", "Иво Андрић")).unwrap();

    let loan_date = NaiveDate::from_ymd_opt(2024, 3, 1);
    service
        .loan(
            "Проклета авлија",
            "Марко",
            loan_date,
            Some("врати до лета".to_string()),
        )
        .unwrap();

    // A second loan of the same book must fail
    let second = service.loan("Проклета авлија", "Ана", None, None);
    assert!(matches!(second, Err(CatalogError::AlreadyLoaned(_))));

    let details = service.loan_details("Проклета авлија").unwrap();
    assert!(details.currently_loaned);
    assert_eq!(details.loan_date, "2024-03-01");
    assert_eq!(details.borrowed_by, "Марко");
    assert_eq!(details.loan_note, "врати до лета");

    service
        .return_book("Проклета авлија", NaiveDate::from_ymd_opt(2024, 6, 1))
        .unwrap();

    // Loan history is preserved for display
    let details = service.loan_details("Проклета авлија").unwrap();
    assert!(!details.currently_loaned);
    assert_eq!(details.return_date, "2024-06-01");
    assert_eq!(details.borrowed_by, "Марко");

    // Back on the shelf, it can go out again
    service.loan("Проклета авлија", "Ана", None, None).unwrap();
    assert_eq!(service.loaned_books().len(), 1);
    assert!(service.available_books().is_empty());
}

#[test]
fn test_return_of_unloaned_book_fails() {
    let dir = TempDir::new().unwrap();
    let mut service = open_service(&dir);
    service.add(draft("Наслов", "Писац")).unwrap();

    let result = service.return_book("Наслов", None);
    assert!(matches!(result, Err(CatalogError::NotLoaned(_))));
}

#[test]
fn test_loan_state_survives_reopen() {
    let dir = TempDir::new().unwrap();

    let mut service = open_service(&dir);
    service.add(draft("Наслов", "Писац")).unwrap();
    service
        .loan("Наслов", "Марко", NaiveDate::from_ymd_opt(2024, 5, 10), None)
        .unwrap();

    let reopened = open_service(&dir);
    let book = reopened.find_by_title("Наслов").unwrap();
    assert!(book.is_currently_loaned());
    assert_eq!(book.borrowed_by.as_deref(), Some("Марко"));
    assert_eq!(book.loan_date, NaiveDate::from_ymd_opt(2024, 5, 10));
}

#[test]
fn test_search_is_anded_across_fields() {
    let dir = TempDir::new().unwrap();
    let mut service = open_service(&dir);

    let mut first = draft("На Дрини ћуприја", "Иво Андрић");
    first.genre = Some("Роман".to_string());
    service.add(first).unwrap();

    let mut second = draft("Госпођа министарка", "Бранислав Нушић");
    second.genre = Some("Комедија".to_string());
    service.add(second).unwrap();

    let by_author = SearchCriteria::new().with_authors("андрић");
    assert_eq!(service.search(&by_author).len(), 1);

    // Both criteria must hold at once
    let impossible = SearchCriteria::new()
        .with_authors("Андрић")
        .with_genre("Комедија");
    assert!(service.search(&impossible).is_empty());

    let everything = SearchCriteria::new();
    assert_eq!(service.search(&everything).len(), 2);
}

#[test]
fn test_delete_renumbers_nothing() {
    let dir = TempDir::new().unwrap();
    let mut service = open_service(&dir);
    service.add(draft("Прва", "Писац А")).unwrap();
    service.add(draft("Друга", "Писац Б")).unwrap();
    service.add(draft("Трећа", "Писац В")).unwrap();

    service.delete("Друга").unwrap();

    let numbers: Vec<u32> = service
        .books()
        .iter()
        .map(|b| b.sequence_number)
        .collect();
    assert_eq!(numbers, vec![1, 3]);

    // The next add continues past the highest number ever assigned
    assert_eq!(service.add(draft("Четврта", "Писац Г")).unwrap(), 4);

    // No duplicates, even after the gap from the delete
    let numbers: Vec<u32> = service
        .books()
        .iter()
        .map(|b| b.sequence_number)
        .collect();
    let unique: std::collections::HashSet<u32> = numbers.iter().copied().collect();
    assert_eq!(unique.len(), numbers.len());

    // Still true after a reload from disk
    let reopened = open_service(&dir);
    let reloaded: Vec<u32> = reopened
        .books()
        .iter()
        .map(|b| b.sequence_number)
        .collect();
    assert_eq!(reloaded, vec![1, 3, 4]);
}

#[test]
fn test_backup_retention_across_saves() {
    let dir = TempDir::new().unwrap();
    let store = CsvStore::new(dir.path().join("biblioteka.csv"))
        .with_backup_manager(BackupManager::new().with_max_backups(3));
    let mut service = BookService::open(store);

    for i in 0..6 {
        service
            .add(draft(&format!("Наслов {}", i), "Писац"))
            .unwrap();
        sleep(Duration::from_millis(30));
    }

    // Five saves had an existing file to snapshot; only three remain
    let dir_backups: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .flatten()
        .filter(|e| {
            e.file_name()
                .to_str()
                .is_some_and(|n| n.contains(".backup_"))
        })
        .collect();
    assert_eq!(dir_backups.len(), 3);
}

#[test]
fn test_update_persists_to_disk() {
    let dir = TempDir::new().unwrap();

    let mut service = open_service(&dir);
    service.add(draft("Наслов", "Писац")).unwrap();

    let patch = BookPatch {
        publishers: Some("Просвета ; Нолит".to_string()),
        ..BookPatch::default()
    };
    service.update("Наслов", patch).unwrap();

    let reopened = open_service(&dir);
    let book = reopened.find_by_title("Наслов").unwrap();
    assert_eq!(book.publishers.as_deref(), Some("Просвета; Нолит"));
    assert_eq!(reopened.indexes().publishers, vec!["Нолит", "Просвета"]);
}

#[test]
fn test_validation_failure_changes_nothing_on_disk() {
    let dir = TempDir::new().unwrap();

    let mut service = open_service(&dir);
    service.add(draft("Наслов", "Писац")).unwrap();

    let mut bad = draft("Друга", "Писац");
    bad.publication_year = Some(99);
    assert!(matches!(
        service.add(bad),
        Err(CatalogError::Validation(_))
    ));

    assert_eq!(service.book_count(), 1);
    assert_eq!(open_service(&dir).book_count(), 1);
}
