//! In-memory entity store for the comparison grid.
//!
//! # Responsibility
//! - Own the ordered dimension and subject collections.
//! - Apply CRUD and reorder operations together with their matrix side
//!   effects, so a caller never observes the two out of sync.
//!
//! # Invariants
//! - Ids are unique within their collection and never reissued within one
//!   store lifetime, even after deletion.
//! - Display order is the `Vec` order; only add, delete, reorder and
//!   wholesale replacement change it.
//! - Deleting a dimension does not prune subject cells (dead keys are kept).
//! - Blank names and unknown ids turn operations into no-ops.

mod matrix;
pub mod reorder;

use crate::model::cells::DEFAULT_SCORE;
use crate::model::dimension::Dimension;
use crate::model::id::ColorToken;
use crate::model::subject::Subject;
use std::collections::HashSet;

pub use reorder::{move_item, reorder};

/// Which ordered collection an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridCollection {
    Dimensions,
    Subjects,
}

/// Process-wide grid state, passed explicitly to every component that needs it.
#[derive(Debug, Clone, Default)]
pub struct EntityStore {
    dimensions: Vec<Dimension>,
    subjects: Vec<Subject>,
    issued_ids: HashSet<String>,
}

impl EntityStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store from already-identified collections.
    pub fn from_parts(dimensions: Vec<Dimension>, subjects: Vec<Subject>) -> Self {
        let mut store = Self::new();
        store.replace_all(dimensions, subjects);
        store
    }

    pub fn dimensions(&self) -> &[Dimension] {
        &self.dimensions
    }

    pub fn subjects(&self) -> &[Subject] {
        &self.subjects
    }

    pub fn dimension(&self, id: &str) -> Option<&Dimension> {
        self.dimensions.iter().find(|dimension| dimension.id == id)
    }

    pub fn subject(&self, id: &str) -> Option<&Subject> {
        self.subjects.iter().find(|subject| subject.id == id)
    }

    /// Returns whether `id` was ever issued to an entity of this store.
    pub fn is_id_issued(&self, id: &str) -> bool {
        self.issued_ids.contains(id)
    }

    /// Appends a new dimension and seeds a default score for it on every
    /// existing subject.
    ///
    /// Returns `None` (no-op) when `name` is blank.
    pub fn add_dimension(&mut self, name: &str) -> Option<Dimension> {
        let name = normalize_name(name)?;
        let dimension = Dimension::new(name, |id| self.issued_ids.contains(id));
        for subject in &mut self.subjects {
            subject.scores.set(dimension.id.as_str(), DEFAULT_SCORE);
        }
        self.issued_ids.insert(dimension.id.clone());
        self.dimensions.push(dimension.clone());
        Some(dimension)
    }

    /// Appends a new subject scored at the default for every current dimension.
    ///
    /// Returns `None` (no-op) when `name` is blank.
    pub fn add_subject(&mut self, name: &str) -> Option<Subject> {
        let name = normalize_name(name)?;
        let subject = Subject::new(name, &self.dimensions, |id| self.issued_ids.contains(id));
        self.issued_ids.insert(subject.id.clone());
        self.subjects.push(subject.clone());
        Some(subject)
    }

    /// Renames one dimension in place. Returns `false` when nothing changed.
    pub fn rename_dimension(&mut self, id: &str, name: &str) -> bool {
        let Some(name) = normalize_name(name) else {
            return false;
        };
        match self.dimensions.iter_mut().find(|dimension| dimension.id == id) {
            Some(dimension) => {
                dimension.name = name;
                true
            }
            None => false,
        }
    }

    /// Updates subject name and color in place. Returns `false` when nothing
    /// changed.
    pub fn update_subject_details(&mut self, id: &str, name: &str, color: ColorToken) -> bool {
        let Some(name) = normalize_name(name) else {
            return false;
        };
        match self.subject_mut(id) {
            Some(subject) => {
                subject.name = name;
                subject.color = color;
                true
            }
            None => false,
        }
    }

    /// Removes one dimension from the order; subject cells are left as-is.
    pub fn delete_dimension(&mut self, id: &str) -> bool {
        let before = self.dimensions.len();
        self.dimensions.retain(|dimension| dimension.id != id);
        self.dimensions.len() != before
    }

    /// Removes one subject together with its whole column.
    pub fn delete_subject(&mut self, id: &str) -> bool {
        let before = self.subjects.len();
        self.subjects.retain(|subject| subject.id != id);
        self.subjects.len() != before
    }

    /// Moves one entity and returns the resulting id order.
    ///
    /// Invalid or equal indices return the unmodified order.
    pub fn reorder(
        &mut self,
        collection: GridCollection,
        old_index: usize,
        new_index: usize,
    ) -> Vec<String> {
        match collection {
            GridCollection::Dimensions => {
                move_item(&mut self.dimensions, old_index, new_index);
            }
            GridCollection::Subjects => {
                move_item(&mut self.subjects, old_index, new_index);
            }
        }
        self.order(collection)
    }

    /// Current id order of one collection.
    pub fn order(&self, collection: GridCollection) -> Vec<String> {
        match collection {
            GridCollection::Dimensions => self
                .dimensions
                .iter()
                .map(|dimension| dimension.id.clone())
                .collect(),
            GridCollection::Subjects => self
                .subjects
                .iter()
                .map(|subject| subject.id.clone())
                .collect(),
        }
    }

    /// Replaces both collections in one step.
    ///
    /// Previously issued ids stay reserved.
    pub fn replace_all(&mut self, dimensions: Vec<Dimension>, subjects: Vec<Subject>) {
        self.issued_ids
            .extend(dimensions.iter().map(|dimension| dimension.id.clone()));
        self.issued_ids
            .extend(subjects.iter().map(|subject| subject.id.clone()));
        self.dimensions = dimensions;
        self.subjects = subjects;
    }

    fn subject_mut(&mut self, id: &str) -> Option<&mut Subject> {
        self.subjects.iter_mut().find(|subject| subject.id == id)
    }
}

fn normalize_name(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_string())
}
