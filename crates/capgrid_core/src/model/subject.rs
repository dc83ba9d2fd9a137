//! Subject (matrix column) model.
//!
//! # Invariants
//! - `id` and `color` survive renames and re-imports under the same name.
//! - `scores`/`descriptions` keys may outlive the dimensions they point to.

use crate::model::cells::{DescriptionCells, ScoreCells, DEFAULT_SCORE};
use crate::model::dimension::Dimension;
use crate::model::id::{mint_subject_id, random_color, ColorToken, SubjectId};
use serde::{Deserialize, Serialize};

/// One evaluated item, rendered as a matrix column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub id: SubjectId,
    pub name: String,
    pub color: ColorToken,
    #[serde(default)]
    pub scores: ScoreCells,
    #[serde(default)]
    pub descriptions: DescriptionCells,
}

impl Subject {
    /// Creates a subject with minted id and color and a default score for
    /// every given dimension.
    pub fn new(
        name: impl Into<String>,
        dimensions: &[Dimension],
        taken: impl Fn(&str) -> bool,
    ) -> Self {
        let mut subject = Self::with_id(mint_subject_id(taken), name, random_color());
        for dimension in dimensions {
            subject.scores.set(dimension.id.as_str(), DEFAULT_SCORE);
        }
        subject
    }

    /// Creates a subject with caller-provided identity and empty cells.
    pub fn with_id(
        id: impl Into<SubjectId>,
        name: impl Into<String>,
        color: impl Into<ColorToken>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color: color.into(),
            scores: ScoreCells::new(),
            descriptions: DescriptionCells::new(),
        }
    }

    /// Sums scores over `dimensions`; absent cells count as `0`.
    ///
    /// Keys of deleted dimensions do not contribute.
    pub fn total_score(&self, dimensions: &[Dimension]) -> u32 {
        dimensions
            .iter()
            .map(|dimension| u32::from(self.scores.get(dimension.id.as_str())))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::Subject;
    use crate::model::dimension::Dimension;

    #[test]
    fn new_subject_seeds_default_score_per_dimension() {
        let dimensions = vec![
            Dimension::with_id("perf_1", "Perf"),
            Dimension::with_id("cost_1", "Cost"),
        ];
        let subject = Subject::new("Tool", &dimensions, |_| false);
        assert_eq!(subject.scores.get("perf_1"), 5);
        assert_eq!(subject.scores.get("cost_1"), 5);
        assert_eq!(subject.scores.len(), 2);
        assert!(subject.descriptions.is_empty());
    }

    #[test]
    fn total_ignores_orphaned_keys() {
        let dimensions = vec![Dimension::with_id("perf_1", "Perf")];
        let mut subject = Subject::with_id("sw_1", "Tool", "#2563eb");
        subject.scores.set("perf_1", 4);
        subject.scores.set("deleted_dim", 9);
        assert_eq!(subject.total_score(&dimensions), 4);
    }
}
