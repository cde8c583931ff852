use std::path::PathBuf;

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    SqliteError(#[from] rusqlite::Error),
    #[error("Failed to create storage directory: {0}")]
    DirectoryError(String),
}

/// Durable key-value storage backed by a single SQLite table. Each
/// persisted slice of application state lives under its own key;
/// writes are last-write-wins at the key level.
pub struct Storage {
    conn: Connection,
}

impl Storage {
    /// Open (or create) the storage file and initialize the schema.
    pub fn open(path: &str) -> Result<Self, StorageError> {
        let db_path = PathBuf::from(path);

        // Create parent directory if it doesn't exist
        if let Some(parent) = db_path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| StorageError::DirectoryError(e.to_string()))?;
            }
        }

        let conn = Connection::open(&db_path)?;

        let storage = Storage { conn };
        storage.initialize_schema()?;

        Ok(storage)
    }

    /// In-memory storage, gone when dropped. Used by tests.
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        let storage = Storage { conn };
        storage.initialize_schema()?;
        Ok(storage)
    }

    fn initialize_schema(&self) -> Result<(), StorageError> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS state (
                key             TEXT PRIMARY KEY,
                value           TEXT NOT NULL,
                updated_at      TEXT NOT NULL
            )",
            [],
        )?;
        Ok(())
    }

    /// Read the blob stored under `key`, if any.
    pub fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let mut stmt = self.conn.prepare("SELECT value FROM state WHERE key = ?1")?;
        let value = stmt
            .query_row(rusqlite::params![key], |row| row.get(0))
            .optional()?;
        Ok(value)
    }

    /// Write (or overwrite) the blob stored under `key`.
    pub fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO state (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at",
            rusqlite::params![key, value, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_key_reads_as_none() {
        let storage = Storage::open_in_memory().unwrap();
        assert!(storage.get("goals").unwrap().is_none());
    }

    #[test]
    fn set_then_get_round_trips() {
        let storage = Storage::open_in_memory().unwrap();
        storage.set("goals", "[]").unwrap();
        assert_eq!(storage.get("goals").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn later_write_wins() {
        let storage = Storage::open_in_memory().unwrap();
        storage.set("subscription", "{}").unwrap();
        storage
            .set("subscription", "{\"expires_at\":null}")
            .unwrap();
        assert_eq!(
            storage.get("subscription").unwrap().as_deref(),
            Some("{\"expires_at\":null}")
        );
    }

    #[test]
    fn keys_are_independent() {
        let storage = Storage::open_in_memory().unwrap();
        storage.set("goals", "[]").unwrap();
        storage.set("subscription", "{}").unwrap();
        assert_eq!(storage.get("goals").unwrap().as_deref(), Some("[]"));
        assert_eq!(storage.get("subscription").unwrap().as_deref(), Some("{}"));
    }

    #[test]
    fn data_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.db");
        let path = path.to_str().unwrap();

        {
            let storage = Storage::open(path).unwrap();
            storage.set("goals", "[1]").unwrap();
        }

        let storage = Storage::open(path).unwrap();
        assert_eq!(storage.get("goals").unwrap().as_deref(), Some("[1]"));
    }
}
