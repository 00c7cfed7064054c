use crate::prefs::KeyValueBackend;
use rusqlite::{params, Connection, OptionalExtension};

/// SQLite-backed key/value table holding the persisted preferences.
pub struct SqliteBackend {
    conn: Connection,
}

impl SqliteBackend {
    /// Open (or create) the preference database at `path`.
    pub fn open(path: &str) -> Result<Self, rusqlite::Error> {
        Self::with_connection(Connection::open(path)?)
    }

    pub fn in_memory() -> Result<Self, rusqlite::Error> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, rusqlite::Error> {
        // Initialize schema for preferences
        conn.execute(
            "CREATE TABLE IF NOT EXISTS preferences (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )",
            [],
        )?;

        Ok(Self { conn })
    }
}

impl KeyValueBackend for SqliteBackend {
    fn read(&self, key: &str) -> Result<Option<String>, rusqlite::Error> {
        self.conn
            .query_row(
                "SELECT value FROM preferences WHERE key = ?",
                [key],
                |row| row.get(0),
            )
            .optional()
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), rusqlite::Error> {
        // Last write wins
        self.conn.execute(
            "INSERT INTO preferences (key, value) VALUES (?, ?)
             ON CONFLICT(key)
             DO UPDATE SET value = excluded.value, updated_at = CURRENT_TIMESTAMP",
            params![key, value],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_reads_none() {
        let backend = SqliteBackend::in_memory().unwrap();
        assert_eq!(backend.read("bookmarks").unwrap(), None);
    }

    #[test]
    fn write_overwrites_previous_value() {
        let mut backend = SqliteBackend::in_memory().unwrap();
        backend.write("bookmarks", "[\"AAPL\"]").unwrap();
        backend.write("bookmarks", "[\"MSFT\"]").unwrap();
        assert_eq!(
            backend.read("bookmarks").unwrap().as_deref(),
            Some("[\"MSFT\"]")
        );
    }

    #[test]
    fn survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.sqlite");
        let path = path.to_str().unwrap();
        {
            let mut backend = SqliteBackend::open(path).unwrap();
            backend.write("savedFilters", "[]").unwrap();
        }
        let backend = SqliteBackend::open(path).unwrap();
        assert_eq!(backend.read("savedFilters").unwrap().as_deref(), Some("[]"));
    }
}
