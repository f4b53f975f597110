use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension};

use crate::error::PopcornError;
use crate::models::WatchedEntry;

const SCHEMA_V1: &str = "CREATE TABLE IF NOT EXISTS slots (
    key        TEXT PRIMARY KEY NOT NULL,
    value      TEXT NOT NULL,
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);";

/// SQLite-backed key-value slots, one JSON document per key.
pub struct Storage {
    conn: Connection,
}

impl Storage {
    /// Open (or create) the database at the given path and run migrations.
    pub fn open(path: &Path) -> Result<Self, PopcornError> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        run_migrations(&conn)?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self, PopcornError> {
        let conn = Connection::open_in_memory()?;
        run_migrations(&conn)?;
        Ok(Self { conn })
    }

    // ── Raw slots ───────────────────────────────────────────────

    /// Read the raw contents of a slot.
    pub fn get_slot(&self, key: &str) -> Result<Option<String>, PopcornError> {
        self.conn
            .query_row(
                "SELECT value FROM slots WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .map_err(Into::into)
    }

    /// Overwrite a slot in a single statement.
    pub fn put_slot(&self, key: &str, value: &str) -> Result<(), PopcornError> {
        self.conn.execute(
            "INSERT INTO slots (key, value, updated_at) VALUES (?1, ?2, datetime('now'))
             ON CONFLICT(key) DO UPDATE SET value = excluded.value,
                                            updated_at = excluded.updated_at",
            params![key, value],
        )?;
        Ok(())
    }

    /// Remove a slot. Returns whether it existed.
    pub fn delete_slot(&self, key: &str) -> Result<bool, PopcornError> {
        let n = self
            .conn
            .execute("DELETE FROM slots WHERE key = ?1", params![key])?;
        Ok(n > 0)
    }

    // ── Watched list ────────────────────────────────────────────

    /// Load the watched list stored under `key`.
    ///
    /// A missing slot, a read failure or content that does not parse all
    /// yield an empty list.
    pub fn load_watched(&self, key: &str) -> Vec<WatchedEntry> {
        let raw = match self.get_slot(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!(key, error = %e, "Failed to read watched slot");
                return Vec::new();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(key, error = %e, "Discarding unparsable watched slot");
                Vec::new()
            }
        }
    }

    /// Overwrite the slot under `key` with a full snapshot of `entries`.
    pub fn save_watched(&self, key: &str, entries: &[WatchedEntry]) -> Result<(), PopcornError> {
        let json = serde_json::to_string(entries)?;
        self.put_slot(key, &json)?;
        tracing::debug!(key, count = entries.len(), "Saved watched snapshot");
        Ok(())
    }
}

fn run_migrations(conn: &Connection) -> Result<(), PopcornError> {
    let version: i32 = conn
        .pragma_query_value(None, "user_version", |row| row.get(0))
        .unwrap_or(0);

    if version < 1 {
        conn.execute_batch(SCHEMA_V1)?;
        conn.pragma_update(None, "user_version", 1)?;
    }
    Ok(())
}
