// Tests for the durable page cache

use hisco_core::data::Database;
use hisco_scanner::PageStore;
use tempfile::TempDir;

fn create_test_db() -> (TempDir, Database) {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("pages.db");
    let db = Database::new(&db_path).unwrap();
    (temp_dir, db)
}

// ============================================================================
// Database Creation Tests
// ============================================================================

#[test]
fn test_database_creation() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("pages.db");

    let db = Database::new(&db_path);
    assert!(db.is_ok());
    assert!(db_path.exists());
}

#[test]
fn test_database_exists_and_drop() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("pages.db");

    assert!(!Database::exists(&db_path));

    {
        let _db = Database::new(&db_path).unwrap();
    }
    assert!(Database::exists(&db_path));

    Database::drop(&db_path).unwrap();
    assert!(!Database::exists(&db_path));
}

#[test]
fn test_empty_cache() {
    let (_temp_dir, db) = create_test_db();

    assert_eq!(db.page_count().unwrap(), 0);
    assert_eq!(db.get_page("http://historyofwork.iisg.nl/major.php").unwrap(), None);
}

// ============================================================================
// Page Tests
// ============================================================================

#[test]
fn test_put_and_get_page() {
    let (_temp_dir, db) = create_test_db();
    let url = "http://historyofwork.iisg.nl/major.php";

    db.put_page(url, "<html>major</html>").unwrap();

    assert_eq!(db.get_page(url).unwrap().as_deref(), Some("<html>major</html>"));
    assert_eq!(db.page_count().unwrap(), 1);
    assert!(db.fetched_at(url).unwrap().is_some());
}

#[test]
fn test_first_write_wins() {
    let (_temp_dir, db) = create_test_db();
    let url = "http://historyofwork.iisg.nl/major.php";

    db.put_page(url, "first").unwrap();
    db.put_page(url, "second").unwrap();

    assert_eq!(db.get_page(url).unwrap().as_deref(), Some("first"));
    assert_eq!(db.page_count().unwrap(), 1);
}

#[test]
fn test_pages_survive_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("pages.db");
    let url = "http://historyofwork.iisg.nl/list_minor.php?text01=1";

    {
        let db = Database::new(&db_path).unwrap();
        db.put_page(url, "minor groups").unwrap();
    }

    let reopened = Database::new(&db_path).unwrap();
    assert_eq!(reopened.get_page(url).unwrap().as_deref(), Some("minor groups"));
}

#[test]
fn test_page_store_impl() {
    let db = Database::in_memory().unwrap();
    let store: &dyn PageStore = &db;

    assert_eq!(store.load("http://a.example/").unwrap(), None);
    store.store("http://a.example/", "body").unwrap();
    assert_eq!(store.load("http://a.example/").unwrap().as_deref(), Some("body"));
}

#[test]
fn test_body_is_byte_identical() {
    let (_temp_dir, db) = create_test_db();
    let url = "http://historyofwork.iisg.nl/detail_hiswi.php?know_id=1";
    let body = "Bäcker – baker’s \"quoted\"\r\n\ttabbed";

    db.put_page(url, body).unwrap();

    assert_eq!(db.get_page(url).unwrap().as_deref(), Some(body));
}
