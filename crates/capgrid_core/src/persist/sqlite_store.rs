//! SQLite-backed snapshot store.
//!
//! # Invariants
//! - One row per slot in `grid_snapshots`; writes upsert.
//! - The connection must come from `db::open_db*` so the schema is verified.

use super::{SnapshotResult, SnapshotStore};
use rusqlite::{params, Connection, OptionalExtension};

/// Snapshot store over a migrated SQLite connection.
pub struct SqliteSnapshotStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSnapshotStore<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl SnapshotStore for SqliteSnapshotStore<'_> {
    fn read(&self, key: &str) -> SnapshotResult<Option<String>> {
        let payload = self
            .conn
            .query_row(
                "SELECT payload
                 FROM grid_snapshots
                 WHERE snapshot_key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(payload)
    }

    fn write(&self, key: &str, payload: &str) -> SnapshotResult<()> {
        self.conn.execute(
            "INSERT INTO grid_snapshots (snapshot_key, payload)
             VALUES (?1, ?2)
             ON CONFLICT(snapshot_key) DO UPDATE SET
                payload = excluded.payload,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![key, payload],
        )?;
        Ok(())
    }

    fn clear(&self) -> SnapshotResult<()> {
        self.conn.execute("DELETE FROM grid_snapshots;", [])?;
        Ok(())
    }
}
