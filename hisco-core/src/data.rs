use hisco_scanner::{PageStore, ScanError};
use rusqlite::{Connection, OptionalExtension, Result, params};
use std::fs;
use std::path::Path;

/// Durable page cache backed by SQLite: one row per absolute URL.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Delete the database file along with any WAL sidecar files.
    pub fn drop(path: &Path) -> std::io::Result<()> {
        fs::remove_file(path)?;
        for suffix in ["-wal", "-shm"] {
            let mut sidecar = path.as_os_str().to_owned();
            sidecar.push(suffix);
            if Path::new(&sidecar).exists() {
                fs::remove_file(&sidecar)?;
            }
        }
        Ok(())
    }

    pub fn exists(path: &Path) -> bool {
        path.exists()
    }

    pub fn new(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
            ",
        )?;

        let db = Database { conn };
        db.init_schema()?;
        Ok(db)
    }

    pub fn in_memory() -> Result<Self> {
        let db = Database {
            conn: Connection::open_in_memory()?,
        };
        db.init_schema()?;
        Ok(db)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS pages (
                url TEXT PRIMARY KEY,
                body TEXT NOT NULL,
                fetched_at INTEGER NOT NULL
            );
            ",
        )?;
        Ok(())
    }

    pub fn get_page(&self, url: &str) -> Result<Option<String>> {
        self.conn
            .query_row("SELECT body FROM pages WHERE url = ?1", params![url], |row| {
                row.get(0)
            })
            .optional()
    }

    /// Store a body unless the URL is already cached; the first write wins.
    pub fn put_page(&self, url: &str, body: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR IGNORE INTO pages (url, body, fetched_at) VALUES (?1, ?2, ?3)",
            params![url, body, chrono::Utc::now().timestamp()],
        )?;
        Ok(())
    }

    pub fn page_count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM pages", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Unix timestamp of the first fetch of `url`.
    pub fn fetched_at(&self, url: &str) -> Result<Option<i64>> {
        self.conn
            .query_row(
                "SELECT fetched_at FROM pages WHERE url = ?1",
                params![url],
                |row| row.get(0),
            )
            .optional()
    }
}

impl PageStore for Database {
    fn load(&self, url: &str) -> hisco_scanner::Result<Option<String>> {
        self.get_page(url)
            .map_err(|e| ScanError::CacheError(e.to_string()))
    }

    fn store(&self, url: &str, body: &str) -> hisco_scanner::Result<()> {
        self.put_page(url, body)
            .map_err(|e| ScanError::CacheError(e.to_string()))
    }
}
