use capgrid_core::defaults::{default_dimensions, default_subjects};
use capgrid_core::persist::{DIMENSIONS_KEY, SUBJECTS_KEY};
use capgrid_core::{
    GridCollection, GridService, ImportPolicy, LoadSource, MemorySnapshotStore, SnapshotStore,
};

fn fresh_service() -> GridService<MemorySnapshotStore> {
    GridService::load(MemorySnapshotStore::new())
}

fn subject_names(service: &GridService<MemorySnapshotStore>) -> Vec<String> {
    service
        .store()
        .subjects()
        .iter()
        .map(|subject| subject.name.clone())
        .collect()
}

#[test]
fn empty_store_loads_defaults_without_writing() {
    let service = fresh_service();
    assert_eq!(service.load_source(), LoadSource::Defaults);
    assert_eq!(service.store().dimensions(), default_dimensions().as_slice());
    assert_eq!(service.store().subjects(), default_subjects().as_slice());
    assert!(service.snapshots().is_empty());
}

#[test]
fn corrupt_snapshot_falls_back_to_defaults() {
    let snapshots =
        MemorySnapshotStore::with_slots([(DIMENSIONS_KEY, "{broken"), (SUBJECTS_KEY, "[]")]);
    let service = GridService::load(snapshots);
    assert_eq!(service.load_source(), LoadSource::Defaults);
    assert_eq!(service.store().dimensions(), default_dimensions().as_slice());
}

#[test]
fn half_written_snapshot_falls_back_to_defaults() {
    let snapshots = MemorySnapshotStore::with_slots([(DIMENSIONS_KEY, "[]")]);
    let service = GridService::load(snapshots);
    assert_eq!(service.load_source(), LoadSource::Defaults);
    assert_eq!(service.store().subjects(), default_subjects().as_slice());
}

#[test]
fn committed_mutation_writes_both_slots() {
    let mut service = fresh_service();
    service.add_subject("Delta Watch").unwrap();

    let subjects = service.snapshots().read(SUBJECTS_KEY).unwrap().unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&subjects).unwrap();
    let names = parsed
        .as_array()
        .unwrap()
        .iter()
        .map(|subject| subject["name"].as_str().unwrap().to_string())
        .collect::<Vec<_>>();
    assert_eq!(names.last().map(String::as_str), Some("Delta Watch"));
    assert!(service.snapshots().read(DIMENSIONS_KEY).unwrap().is_some());
}

#[test]
fn noop_operations_do_not_write_snapshots() {
    let mut service = fresh_service();
    assert!(service.add_dimension("  ").is_none());
    assert!(!service.delete_subject("missing"));
    assert!(!service.set_score("missing", "dim_detection", 3.0));
    let order = service.reorder(GridCollection::Dimensions, 0, 99);
    assert_eq!(order.len(), default_dimensions().len());
    assert!(service.snapshots().is_empty());
}

#[test]
fn failed_snapshot_write_keeps_in_memory_state() {
    let mut service = GridService::load(MemorySnapshotStore::failing_writes());
    let added = service.add_dimension("Latency").unwrap();
    assert!(service.store().dimension(&added.id).is_some());
    for subject in service.store().subjects() {
        assert_eq!(subject.scores.get(&added.id), 5);
    }
}

#[test]
fn reset_restores_defaults_and_persists_them() {
    let mut service = fresh_service();
    service.add_subject("Delta Watch").unwrap();
    service.delete_dimension("dim_detection");

    service.reset();
    assert_eq!(service.store().dimensions(), default_dimensions().as_slice());
    assert_eq!(service.store().subjects(), default_subjects().as_slice());

    let reloaded = GridService::load(MemorySnapshotStore::with_slots([
        (
            DIMENSIONS_KEY,
            service.snapshots().read(DIMENSIONS_KEY).unwrap().unwrap().as_str(),
        ),
        (
            SUBJECTS_KEY,
            service.snapshots().read(SUBJECTS_KEY).unwrap().unwrap().as_str(),
        ),
    ]));
    assert_eq!(reloaded.load_source(), LoadSource::Snapshot);
    assert_eq!(reloaded.store().subjects(), default_subjects().as_slice());
}

#[test]
fn leader_tracks_deletion() {
    let mut service = fresh_service();
    let leader = service.leader().unwrap().id.clone();
    assert!(service.delete_subject(&leader));
    let next = service.leader().unwrap();
    assert_ne!(next.id, leader);
    assert!(service.totals().iter().all(|total| total.subject_id != leader));
}

#[test]
fn deleting_subject_leaves_other_columns_untouched() {
    let mut service = fresh_service();
    let before = service.store().subjects().to_vec();
    assert!(service.delete_subject(&before[1].id));

    let after = service.store().subjects();
    assert_eq!(after.len(), before.len() - 1);
    assert_eq!(after[0], before[0]);
    assert_eq!(after[1], before[2]);
}

#[test]
fn failed_import_leaves_grid_and_snapshots_unchanged() {
    let mut service = fresh_service();
    service.add_subject("Delta Watch").unwrap();
    let subjects_before = service.store().subjects().to_vec();
    let dimensions_before = service.store().dimensions().to_vec();
    let snapshot_before = service.snapshots().read(SUBJECTS_KEY).unwrap();

    assert!(service
        .import_csv("Dimension,Type,X", ImportPolicy::Replace)
        .is_err());

    assert_eq!(service.store().subjects(), subjects_before.as_slice());
    assert_eq!(service.store().dimensions(), dimensions_before.as_slice());
    assert_eq!(service.snapshots().read(SUBJECTS_KEY).unwrap(), snapshot_before);
}

#[test]
fn reorder_subjects_changes_display_order_only() {
    let mut service = fresh_service();
    let before = subject_names(&service);
    service.reorder(GridCollection::Subjects, 0, 2);
    let after = subject_names(&service);
    assert_eq!(after, vec![before[1].clone(), before[2].clone(), before[0].clone()]);
    assert!(!service.snapshots().is_empty());
}

#[test]
fn summary_request_is_a_detached_snapshot() {
    let mut service = fresh_service();
    let request = service.summary_request();
    service.add_dimension("Latency").unwrap();
    assert_eq!(request.dimensions.len(), default_dimensions().len());
    assert_eq!(request.subjects.len(), default_subjects().len());
}
