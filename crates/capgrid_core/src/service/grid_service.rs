//! Grid use-case service.
//!
//! # Responsibility
//! - Own the process-wide `EntityStore` together with its snapshot store.
//! - Rehydrate once at startup and snapshot after every committed mutation.
//! - Run CSV import as one all-or-nothing transaction.
//!
//! # Invariants
//! - No-op operations (blank names, unknown ids, bad indices) do not write
//!   snapshots.
//! - Snapshot failures are logged and never roll back in-memory state.
//! - Startup never fails: unreadable snapshots fall back to built-in
//!   defaults for both collections.

use crate::aggregate::{self, SubjectTotal};
use crate::csv::{export_csv, export_file_name, import_csv, CsvImportError, ImportPolicy};
use crate::defaults::{default_dimensions, default_subjects};
use crate::model::dimension::Dimension;
use crate::model::id::ColorToken;
use crate::model::subject::Subject;
use crate::persist::{
    decode_snapshot, encode_snapshot, SnapshotResult, SnapshotStore, DIMENSIONS_KEY, SUBJECTS_KEY,
};
use crate::store::{EntityStore, GridCollection};
use crate::summary::SummaryRequest;
use chrono::NaiveDate;
use log::{info, warn};

/// Counts reported after a committed import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportReport {
    pub dimensions: usize,
    pub subjects: usize,
    pub reused: usize,
    pub minted: usize,
}

/// Where the grid state came from at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    Snapshot,
    Defaults,
}

/// Grid facade combining the entity store with snapshot persistence.
pub struct GridService<S: SnapshotStore> {
    store: EntityStore,
    snapshots: S,
    load_source: LoadSource,
}

impl<S: SnapshotStore> GridService<S> {
    /// Rehydrates the grid from `snapshots`.
    ///
    /// Absent or corrupt slots fall back to built-in defaults, logged as a
    /// warning.
    pub fn load(snapshots: S) -> Self {
        let (store, load_source) = match read_snapshot(&snapshots) {
            Ok(Some((dimensions, subjects))) => {
                info!(
                    "event=grid_load module=service status=ok source=snapshot dimensions={} subjects={}",
                    dimensions.len(),
                    subjects.len()
                );
                (EntityStore::from_parts(dimensions, subjects), LoadSource::Snapshot)
            }
            Ok(None) => {
                info!("event=grid_load module=service status=ok source=defaults reason=absent");
                (default_store(), LoadSource::Defaults)
            }
            Err(err) => {
                warn!(
                    "event=grid_load module=service status=fallback source=defaults error={}",
                    err
                );
                (default_store(), LoadSource::Defaults)
            }
        };
        Self {
            store,
            snapshots,
            load_source,
        }
    }

    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    pub fn snapshots(&self) -> &S {
        &self.snapshots
    }

    pub fn load_source(&self) -> LoadSource {
        self.load_source
    }

    pub fn add_dimension(&mut self, name: &str) -> Option<Dimension> {
        let added = self.store.add_dimension(name)?;
        info!(
            "event=dimension_add module=service status=ok dimension_id={}",
            added.id
        );
        self.persist();
        Some(added)
    }

    pub fn add_subject(&mut self, name: &str) -> Option<Subject> {
        let added = self.store.add_subject(name)?;
        info!(
            "event=subject_add module=service status=ok subject_id={}",
            added.id
        );
        self.persist();
        Some(added)
    }

    pub fn rename_dimension(&mut self, id: &str, name: &str) -> bool {
        self.commit_if(|store| store.rename_dimension(id, name))
    }

    pub fn update_subject_details(&mut self, id: &str, name: &str, color: ColorToken) -> bool {
        self.commit_if(|store| store.update_subject_details(id, name, color))
    }

    pub fn delete_dimension(&mut self, id: &str) -> bool {
        self.commit_if(|store| store.delete_dimension(id))
    }

    pub fn delete_subject(&mut self, id: &str) -> bool {
        self.commit_if(|store| store.delete_subject(id))
    }

    /// Moves one entity and returns the resulting id order.
    pub fn reorder(
        &mut self,
        collection: GridCollection,
        old_index: usize,
        new_index: usize,
    ) -> Vec<String> {
        let before = self.store.order(collection);
        let after = self.store.reorder(collection, old_index, new_index);
        if after != before {
            self.persist();
        }
        after
    }

    pub fn set_score(&mut self, subject_id: &str, dimension_id: &str, value: f64) -> bool {
        self.commit_if(|store| store.set_score(subject_id, dimension_id, value))
    }

    pub fn set_score_text(&mut self, subject_id: &str, dimension_id: &str, raw: &str) -> bool {
        self.commit_if(|store| store.set_score_text(subject_id, dimension_id, raw))
    }

    pub fn set_description(&mut self, subject_id: &str, dimension_id: &str, text: &str) -> bool {
        self.commit_if(|store| store.set_description(subject_id, dimension_id, text))
    }

    /// Parses `text` and, on success, swaps it in as the live grid.
    ///
    /// # Errors
    /// Returns the format error unchanged; the live grid is untouched.
    pub fn import_csv(
        &mut self,
        text: &str,
        policy: ImportPolicy,
    ) -> Result<ImportReport, CsvImportError> {
        let outcome = match import_csv(text, &self.store, policy) {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(
                    "event=grid_import module=service status=error policy={:?} error={}",
                    policy, err
                );
                return Err(err);
            }
        };

        let report = ImportReport {
            dimensions: outcome.dimensions.len(),
            subjects: outcome.subjects.len(),
            reused: outcome.reused,
            minted: outcome.minted,
        };
        self.store.replace_all(outcome.dimensions, outcome.subjects);
        info!(
            "event=grid_import module=service status=ok policy={:?} dimensions={} subjects={} reused={} minted={}",
            policy, report.dimensions, report.subjects, report.reused, report.minted
        );
        self.persist();
        Ok(report)
    }

    /// Serializes the current grid.
    pub fn export_csv(&self) -> String {
        export_csv(self.store.dimensions(), self.store.subjects())
    }

    /// Export file name for `date`.
    pub fn export_file_name(&self, date: NaiveDate) -> String {
        export_file_name(date)
    }

    /// Discards live and persisted state and restores the built-in grid.
    pub fn reset(&mut self) {
        if let Err(err) = self.snapshots.clear() {
            warn!("event=grid_reset module=service status=warn stage=clear error={err}");
        }
        self.store
            .replace_all(default_dimensions(), default_subjects());
        self.load_source = LoadSource::Defaults;
        info!("event=grid_reset module=service status=ok");
        self.persist();
    }

    pub fn totals(&self) -> Vec<SubjectTotal> {
        aggregate::totals(&self.store)
    }

    pub fn leader(&self) -> Option<&Subject> {
        aggregate::leader(&self.store)
    }

    /// Immutable snapshot for an off-thread summary call.
    pub fn summary_request(&self) -> SummaryRequest {
        SummaryRequest::from_store(&self.store)
    }

    fn commit_if(&mut self, mutate: impl FnOnce(&mut EntityStore) -> bool) -> bool {
        let changed = mutate(&mut self.store);
        if changed {
            self.persist();
        }
        changed
    }

    fn persist(&self) {
        if let Err(err) = write_snapshot(&self.snapshots, &self.store) {
            warn!("event=grid_snapshot module=service status=error error={err}");
        }
    }
}

fn default_store() -> EntityStore {
    EntityStore::from_parts(default_dimensions(), default_subjects())
}

fn read_snapshot<S: SnapshotStore>(
    snapshots: &S,
) -> SnapshotResult<Option<(Vec<Dimension>, Vec<Subject>)>> {
    let dimensions = snapshots.read(DIMENSIONS_KEY)?;
    let subjects = snapshots.read(SUBJECTS_KEY)?;
    match (dimensions, subjects) {
        (Some(dimensions), Some(subjects)) => decode_snapshot(&dimensions, &subjects).map(Some),
        _ => Ok(None),
    }
}

fn write_snapshot<S: SnapshotStore>(snapshots: &S, store: &EntityStore) -> SnapshotResult<()> {
    let (dimensions, subjects) = encode_snapshot(store.dimensions(), store.subjects())?;
    snapshots.write(DIMENSIONS_KEY, &dimensions)?;
    snapshots.write(SUBJECTS_KEY, &subjects)?;
    Ok(())
}
