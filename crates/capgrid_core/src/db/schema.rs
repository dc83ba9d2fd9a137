//! Snapshot table schema.
//!
//! Version 1 is the only schema: one `grid_snapshots` row per slot.

use super::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

/// Schema version written by this build.
pub const SCHEMA_VERSION: u32 = 1;

const SNAPSHOT_TABLE: &str = "grid_snapshots";
const SNAPSHOT_TABLE_DDL: &str = include_str!("grid_snapshots.sql");
const KEY_COLUMN: &str = "snapshot_key";
const VALUE_COLUMNS: [&str; 2] = ["payload", "updated_at"];

/// Reads `PRAGMA user_version`.
pub fn schema_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?)
}

/// Brings `conn` to `SCHEMA_VERSION` and verifies the snapshot table.
///
/// Returns `true` when the schema was created or upgraded, `false` when it
/// was already current. Existing snapshot rows are kept, and a failed
/// verification leaves the file at its old version.
///
/// # Errors
/// - `SchemaTooNew` when the file carries a higher version.
/// - `SchemaMismatch` when `grid_snapshots` lacks the expected columns.
pub fn ensure_schema(conn: &mut Connection) -> DbResult<bool> {
    let found = schema_version(conn)?;
    if found > SCHEMA_VERSION {
        return Err(DbError::SchemaTooNew {
            found,
            supported: SCHEMA_VERSION,
        });
    }

    if found == SCHEMA_VERSION {
        verify_snapshot_table(conn)?;
        return Ok(false);
    }

    let tx = conn.transaction()?;
    tx.execute_batch(SNAPSHOT_TABLE_DDL)?;
    verify_snapshot_table(&tx)?;
    tx.pragma_update(None, "user_version", SCHEMA_VERSION)?;
    tx.commit()?;
    info!(
        "event=db_schema module=db status=upgraded from_version={found} to_version={SCHEMA_VERSION}"
    );
    Ok(true)
}

fn verify_snapshot_table(conn: &Connection) -> DbResult<()> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({SNAPSHOT_TABLE});"))?;
    let columns = stmt
        .query_map([], |row| Ok((row.get::<_, String>(1)?, row.get::<_, i64>(5)?)))?
        .collect::<Result<Vec<_>, _>>()?;

    match columns.iter().find(|(name, _)| name == KEY_COLUMN) {
        Some((_, 1)) => {}
        Some(_) => {
            return Err(DbError::SchemaMismatch {
                detail: format!("`{KEY_COLUMN}` is not the primary key"),
            })
        }
        None => {
            return Err(DbError::SchemaMismatch {
                detail: format!("missing column `{KEY_COLUMN}`"),
            })
        }
    }
    if let Some(missing) = VALUE_COLUMNS
        .iter()
        .find(|expected| !columns.iter().any(|(name, _)| name == *expected))
    {
        return Err(DbError::SchemaMismatch {
            detail: format!("missing column `{missing}`"),
        });
    }
    Ok(())
}
