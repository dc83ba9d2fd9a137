//! Snapshot persistence for the grid.
//!
//! # Responsibility
//! - Define the single-key blob store contract the grid snapshots into.
//! - Encode/decode the two collection snapshots (`dimensions`, `subjects`).
//!
//! # Invariants
//! - Slots are written independently; a reader validates both together.
//! - Decoded snapshots must have unique ids and in-range scores, otherwise
//!   they are rejected as invalid data instead of masked.

mod memory_store;
mod sqlite_store;

pub use memory_store::MemorySnapshotStore;
pub use sqlite_store::SqliteSnapshotStore;

use crate::db::DbError;
use crate::model::dimension::Dimension;
use crate::model::subject::Subject;
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Slot holding the ordered dimension list.
pub const DIMENSIONS_KEY: &str = "dimensions";
/// Slot holding the ordered subject list.
pub const SUBJECTS_KEY: &str = "subjects";

pub type SnapshotResult<T> = Result<T, SnapshotError>;

/// Errors from snapshot persistence.
#[derive(Debug)]
pub enum SnapshotError {
    Db(DbError),
    Serde(serde_json::Error),
    /// Backend refused the write (in-memory store configured to fail).
    Unavailable(&'static str),
    /// Snapshot decoded but violates grid invariants.
    InvalidData(String),
}

impl Display for SnapshotError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Serde(err) => write!(f, "snapshot payload is not valid json: {err}"),
            Self::Unavailable(reason) => write!(f, "snapshot store unavailable: {reason}"),
            Self::InvalidData(message) => write!(f, "invalid snapshot data: {message}"),
        }
    }
}

impl Error for SnapshotError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Serde(err) => Some(err),
            Self::Unavailable(_) => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for SnapshotError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for SnapshotError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for SnapshotError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serde(value)
    }
}

/// Durable single-key blob store.
pub trait SnapshotStore {
    /// Reads one slot; `None` when the slot was never written.
    fn read(&self, key: &str) -> SnapshotResult<Option<String>>;
    /// Overwrites one slot.
    fn write(&self, key: &str, payload: &str) -> SnapshotResult<()>;
    /// Removes every slot.
    fn clear(&self) -> SnapshotResult<()>;
}

/// Serializes both collections as `(dimensions_json, subjects_json)`.
pub fn encode_snapshot(
    dimensions: &[Dimension],
    subjects: &[Subject],
) -> SnapshotResult<(String, String)> {
    Ok((
        serde_json::to_string(dimensions)?,
        serde_json::to_string(subjects)?,
    ))
}

/// Parses and validates both collection snapshots.
pub fn decode_snapshot(
    dimensions_json: &str,
    subjects_json: &str,
) -> SnapshotResult<(Vec<Dimension>, Vec<Subject>)> {
    let dimensions: Vec<Dimension> = serde_json::from_str(dimensions_json)?;
    let subjects: Vec<Subject> = serde_json::from_str(subjects_json)?;

    ensure_unique_ids(dimensions.iter().map(|dimension| dimension.id.as_str()), "dimension")?;
    ensure_unique_ids(subjects.iter().map(|subject| subject.id.as_str()), "subject")?;
    if let Some(subject) = subjects.iter().find(|subject| !subject.scores.is_in_range()) {
        return Err(SnapshotError::InvalidData(format!(
            "subject `{}` holds an out-of-range score",
            subject.id
        )));
    }

    Ok((dimensions, subjects))
}

fn ensure_unique_ids<'a>(
    ids: impl Iterator<Item = &'a str>,
    kind: &'static str,
) -> SnapshotResult<()> {
    let mut seen = HashSet::new();
    for id in ids {
        if id.trim().is_empty() {
            return Err(SnapshotError::InvalidData(format!("empty {kind} id")));
        }
        if !seen.insert(id) {
            return Err(SnapshotError::InvalidData(format!(
                "duplicate {kind} id `{id}`"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{decode_snapshot, encode_snapshot, SnapshotError};
    use crate::model::dimension::Dimension;
    use crate::model::subject::Subject;

    #[test]
    fn encoded_snapshot_decodes_to_same_collections() {
        let dimensions = vec![Dimension::with_id("perf_1", "Perf")];
        let mut subject = Subject::with_id("sw_1", "Tool", "#2563eb");
        subject.scores.set("perf_1", 6);
        subject.descriptions.set("perf_1", "ok");

        let (dims_json, subjects_json) = encode_snapshot(&dimensions, &[subject.clone()]).unwrap();
        let (decoded_dims, decoded_subjects) = decode_snapshot(&dims_json, &subjects_json).unwrap();
        assert_eq!(decoded_dims, dimensions);
        assert_eq!(decoded_subjects, vec![subject]);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let err = decode_snapshot(
            r#"[{"id":"a","name":"A"},{"id":"a","name":"B"}]"#,
            "[]",
        )
        .unwrap_err();
        assert!(matches!(err, SnapshotError::InvalidData(message) if message.contains("duplicate")));
    }

    #[test]
    fn out_of_range_scores_are_rejected() {
        let err = decode_snapshot(
            "[]",
            r##"[{"id":"s","name":"S","color":"#000000","scores":{"d":42}}]"##,
        )
        .unwrap_err();
        assert!(matches!(err, SnapshotError::InvalidData(_)));
    }

    #[test]
    fn missing_cell_maps_default_to_empty() {
        let (_, subjects) =
            decode_snapshot("[]", r##"[{"id":"s","name":"S","color":"#000000"}]"##).unwrap();
        assert!(subjects[0].scores.is_empty());
        assert!(subjects[0].descriptions.is_empty());
    }

    #[test]
    fn malformed_json_is_a_serde_error() {
        let err = decode_snapshot("{not json", "[]").unwrap_err();
        assert!(matches!(err, SnapshotError::Serde(_)));
    }
}
