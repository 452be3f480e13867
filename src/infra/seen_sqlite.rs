use chrono::Utc;
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::info;

use crate::app::ports::SeenFingerprints;
use crate::error::{CleanerError, Result};

/// Durable seen-fingerprint index for cross-run dedup. A listing scraped again on a
/// later run is still recognized because its hash survives in this table.
pub struct SqliteSeenFingerprints {
    conn: Mutex<Connection>,
}

impl SqliteSeenFingerprints {
    pub fn open<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let db_path = db_path.as_ref();
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(db_path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        info!(path = %db_path.display(), "Opened seen-fingerprint index");
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS seen_fingerprints (
                content_hash   TEXT PRIMARY KEY,
                first_seen_at  INTEGER NOT NULL
            );
            "#,
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|e| CleanerError::StoreUnavailable {
            message: format!("sqlite connection lock poisoned: {}", e),
        })
    }

    /// Unix timestamp of the first sighting, if any.
    pub fn first_seen_at(&self, fingerprint: &str) -> Result<Option<i64>> {
        let conn = self.conn()?;
        let mut stmt =
            conn.prepare("SELECT first_seen_at FROM seen_fingerprints WHERE content_hash = ?1")?;
        let mut rows = stmt.query(params![fingerprint])?;
        let first_seen = match rows.next()? {
            Some(row) => Some(row.get::<_, i64>(0)?),
            None => None,
        };
        Ok(first_seen)
    }
}

impl SeenFingerprints for SqliteSeenFingerprints {
    fn check_and_insert(&self, fingerprint: &str) -> Result<bool> {
        // INSERT OR IGNORE is the check-and-set: one statement, one row changed on first sight
        let changed = self.conn()?.execute(
            "INSERT OR IGNORE INTO seen_fingerprints (content_hash, first_seen_at) VALUES (?1, ?2)",
            params![fingerprint, Utc::now().timestamp()],
        )?;
        Ok(changed == 1)
    }

    fn contains(&self, fingerprint: &str) -> Result<bool> {
        Ok(self.first_seen_at(fingerprint)?.is_some())
    }

    fn len(&self) -> Result<usize> {
        let count: i64 = self
            .conn()?
            .query_row("SELECT COUNT(*) FROM seen_fingerprints", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}
