//! Matrix accessor over the entity store.
//!
//! Cells are addressed by `(subject_id, dimension_id)`. The dimension id is
//! not validated, so writes against a deleted dimension land as dead keys.

use super::EntityStore;
use crate::model::cells::{clamp_score, parse_score_input, Score, ABSENT_SCORE};

impl EntityStore {
    /// Stored score, or `0` when the subject or cell is absent.
    pub fn get_score(&self, subject_id: &str, dimension_id: &str) -> Score {
        self.subject(subject_id)
            .map_or(ABSENT_SCORE, |subject| subject.scores.get(dimension_id))
    }

    /// Writes a clamped score. Returns `false` when the subject is unknown.
    pub fn set_score(&mut self, subject_id: &str, dimension_id: &str, value: f64) -> bool {
        self.write_score(subject_id, dimension_id, clamp_score(value))
    }

    /// Writes a score typed as free text; non-numeric text becomes `0`.
    pub fn set_score_text(&mut self, subject_id: &str, dimension_id: &str, raw: &str) -> bool {
        self.write_score(subject_id, dimension_id, parse_score_input(raw))
    }

    /// Stored description, or `None` when not set.
    pub fn get_description(&self, subject_id: &str, dimension_id: &str) -> Option<&str> {
        self.subject(subject_id)
            .and_then(|subject| subject.descriptions.get(dimension_id))
    }

    /// Writes free-form text; blank text clears the cell. Returns `false` when
    /// the subject is unknown.
    pub fn set_description(&mut self, subject_id: &str, dimension_id: &str, text: &str) -> bool {
        match self.subject_mut(subject_id) {
            Some(subject) => {
                subject.descriptions.set(dimension_id, text);
                true
            }
            None => false,
        }
    }

    fn write_score(&mut self, subject_id: &str, dimension_id: &str, score: Score) -> bool {
        match self.subject_mut(subject_id) {
            Some(subject) => {
                subject.scores.set(dimension_id, score);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::store::EntityStore;

    fn store_with_cell() -> (EntityStore, String, String) {
        let mut store = EntityStore::new();
        let dimension = store.add_dimension("Perf").unwrap();
        let subject = store.add_subject("Tool").unwrap();
        (store, subject.id, dimension.id)
    }

    #[test]
    fn set_score_clamps_to_range() {
        let (mut store, subject_id, dimension_id) = store_with_cell();
        assert!(store.set_score(&subject_id, &dimension_id, 14.0));
        assert_eq!(store.get_score(&subject_id, &dimension_id), 10);
        assert!(store.set_score(&subject_id, &dimension_id, -2.0));
        assert_eq!(store.get_score(&subject_id, &dimension_id), 0);
        assert!(store.set_score_text(&subject_id, &dimension_id, "abc"));
        assert_eq!(store.get_score(&subject_id, &dimension_id), 0);
    }

    #[test]
    fn unknown_subject_is_noop_and_reads_zero() {
        let (mut store, _, dimension_id) = store_with_cell();
        assert!(!store.set_score("missing", &dimension_id, 3.0));
        assert!(!store.set_description("missing", &dimension_id, "x"));
        assert_eq!(store.get_score("missing", &dimension_id), 0);
        assert_eq!(store.get_description("missing", &dimension_id), None);
    }

    #[test]
    fn descriptions_are_unclamped_free_text() {
        let (mut store, subject_id, dimension_id) = store_with_cell();
        assert_eq!(store.get_description(&subject_id, &dimension_id), None);
        let text = "handles \"quoted\", multi\nline text";
        assert!(store.set_description(&subject_id, &dimension_id, text));
        assert_eq!(store.get_description(&subject_id, &dimension_id), Some(text));
    }
}
