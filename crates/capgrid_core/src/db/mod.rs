//! SQLite storage for grid snapshots.
//!
//! # Responsibility
//! - Open connections and bring them to the snapshot schema.
//! - Refuse files written by a newer capgrid or holding a foreign
//!   `grid_snapshots` table.
//!
//! # Invariants
//! - Schema version lives in `PRAGMA user_version`.
//! - No snapshot is read or written through a connection whose schema was
//!   not verified.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod open;
pub mod schema;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// File was written by a newer schema than this build understands.
    SchemaTooNew { found: u32, supported: u32 },
    /// `grid_snapshots` exists but lacks an expected column or key.
    SchemaMismatch { detail: String },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::SchemaTooNew { found, supported } => write!(
                f,
                "snapshot database schema {found} is newer than supported {supported}"
            ),
            Self::SchemaMismatch { detail } => {
                write!(f, "grid_snapshots table has an unexpected shape: {detail}")
            }
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
