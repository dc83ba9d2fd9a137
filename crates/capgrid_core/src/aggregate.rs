//! Derived read-only totals over the grid.
//!
//! Totals sum scores over current dimensions only; absent cells count as `0`.

use crate::model::id::SubjectId;
use crate::model::subject::Subject;
use crate::store::EntityStore;

/// Total score of one subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectTotal {
    pub subject_id: SubjectId,
    pub name: String,
    pub total: u32,
}

/// Per-subject totals in current display order.
pub fn totals(store: &EntityStore) -> Vec<SubjectTotal> {
    store
        .subjects()
        .iter()
        .map(|subject| SubjectTotal {
            subject_id: subject.id.clone(),
            name: subject.name.clone(),
            total: subject.total_score(store.dimensions()),
        })
        .collect()
}

/// Subject with the highest total.
///
/// Ties resolve to the subject that comes first in display order. Returns
/// `None` for an empty grid.
pub fn leader(store: &EntityStore) -> Option<&Subject> {
    let mut best: Option<(&Subject, u32)> = None;
    for subject in store.subjects() {
        let total = subject.total_score(store.dimensions());
        match best {
            Some((_, best_total)) if total <= best_total => {}
            _ => best = Some((subject, total)),
        }
    }
    best.map(|(subject, _)| subject)
}

#[cfg(test)]
mod tests {
    use super::{leader, totals};
    use crate::store::EntityStore;

    #[test]
    fn empty_grid_has_no_leader() {
        assert!(leader(&EntityStore::new()).is_none());
    }

    #[test]
    fn leader_follows_highest_total_and_deletion() {
        let mut store = EntityStore::new();
        let detection = store.add_dimension("Detection").unwrap();
        let a = store.add_subject("A").unwrap();
        let b = store.add_subject("B").unwrap();
        store.set_score(&a.id, &detection.id, 8.0);
        store.set_score(&b.id, &detection.id, 6.0);

        assert_eq!(leader(&store).unwrap().id, a.id);

        store.delete_subject(&a.id);
        assert_eq!(leader(&store).unwrap().id, b.id);
    }

    #[test]
    fn ties_resolve_to_first_in_display_order() {
        let mut store = EntityStore::new();
        store.add_dimension("Detection").unwrap();
        let first = store.add_subject("First").unwrap();
        let second = store.add_subject("Second").unwrap();
        assert_eq!(leader(&store).unwrap().id, first.id);

        store.reorder(crate::store::GridCollection::Subjects, 1, 0);
        assert_eq!(leader(&store).unwrap().id, second.id);
    }

    #[test]
    fn totals_treat_missing_cells_as_zero() {
        let mut store = EntityStore::new();
        let subject = store.add_subject("Early").unwrap();
        let added = store.add_dimension("Perf").unwrap();
        store.add_dimension("Cost").unwrap();
        store.set_score(&subject.id, &added.id, 3.0);

        let rows = totals(&store);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].total, 3 + 5);
    }
}
