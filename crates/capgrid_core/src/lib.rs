//! Core grid logic for capgrid.
//! This crate is the single source of truth for grid invariants: entity
//! identity, matrix consistency, CSV reconciliation and derived totals.

pub mod aggregate;
pub mod config;
pub mod csv;
pub mod db;
pub mod defaults;
pub mod logging;
pub mod model;
pub mod persist;
pub mod service;
pub mod store;
pub mod summary;

pub use aggregate::{leader, totals, SubjectTotal};
pub use config::{ConfigError, GridConfig, SummaryConfig};
pub use csv::{export_csv, import_csv, CsvImportError, ImportOutcome, ImportPolicy};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::cells::{DescriptionCells, Score, ScoreCells, DEFAULT_SCORE, MAX_SCORE, MIN_SCORE};
pub use model::dimension::Dimension;
pub use model::id::{ColorToken, DimensionId, SubjectId};
pub use model::subject::Subject;
pub use persist::{
    MemorySnapshotStore, SnapshotError, SnapshotResult, SnapshotStore, SqliteSnapshotStore,
};
pub use service::grid_service::{GridService, ImportReport, LoadSource};
pub use store::{EntityStore, GridCollection};
pub use summary::{
    summarize, HttpSummaryGenerator, SummaryDimension, SummaryError, SummaryGenerator, SummaryJob,
    SummaryRequest, FALLBACK_SUMMARY,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
