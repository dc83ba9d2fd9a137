//! Sparse matrix cells keyed by dimension id.
//!
//! # Responsibility
//! - Hold one subject's scores and descriptions.
//! - Define the default-on-absent contract for each cell kind.
//!
//! # Invariants
//! - Stored scores are always within `[MIN_SCORE, MAX_SCORE]`.
//! - An absent score reads as `0`; an absent description reads as `None`.
//! - Whitespace-only descriptions are never stored.

use crate::model::id::DimensionId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Integer score of one cell.
pub type Score = u8;

pub const MIN_SCORE: Score = 0;
pub const MAX_SCORE: Score = 10;
/// Score seeded into every cell created by an explicit add operation.
pub const DEFAULT_SCORE: Score = 5;
/// Score reported for a cell that holds no value.
pub const ABSENT_SCORE: Score = 0;

/// Clamps manual input to the score range.
///
/// Non-numeric input (`NaN`) is treated as `0`; fractions are truncated.
pub fn clamp_score(value: f64) -> Score {
    if value.is_nan() {
        return MIN_SCORE;
    }
    value
        .clamp(f64::from(MIN_SCORE), f64::from(MAX_SCORE))
        .trunc() as Score
}

/// Parses manual text input, treating non-numeric text as `0` before clamping.
pub fn parse_score_input(raw: &str) -> Score {
    clamp_score(raw.trim().parse::<f64>().unwrap_or(0.0))
}

/// Coerces a score read from an imported file.
///
/// Non-numeric and out-of-range values become `0`.
pub fn coerce_imported_score(raw: &str) -> Score {
    match raw.trim().parse::<f64>() {
        Ok(value) if value >= f64::from(MIN_SCORE) && value <= f64::from(MAX_SCORE) => {
            value.trunc() as Score
        }
        _ => ABSENT_SCORE,
    }
}

/// Score cells of one subject.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoreCells(BTreeMap<DimensionId, Score>);

impl ScoreCells {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads one score, `0` when absent.
    pub fn get(&self, dimension_id: &str) -> Score {
        self.0.get(dimension_id).copied().unwrap_or(ABSENT_SCORE)
    }

    pub fn contains(&self, dimension_id: &str) -> bool {
        self.0.contains_key(dimension_id)
    }

    /// Writes one score, clamping to the valid range.
    pub fn set(&mut self, dimension_id: impl Into<DimensionId>, score: Score) {
        self.0.insert(dimension_id.into(), score.min(MAX_SCORE));
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Score)> {
        self.0.iter().map(|(key, value)| (key.as_str(), *value))
    }

    pub(crate) fn is_in_range(&self) -> bool {
        self.0.values().all(|score| *score <= MAX_SCORE)
    }
}

/// Description cells of one subject.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DescriptionCells(BTreeMap<DimensionId, String>);

impl DescriptionCells {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads one description, `None` when not set.
    pub fn get(&self, dimension_id: &str) -> Option<&str> {
        self.0.get(dimension_id).map(String::as_str)
    }

    /// Writes free-form text; blank text clears the cell.
    pub fn set(&mut self, dimension_id: impl Into<DimensionId>, text: impl Into<String>) {
        let dimension_id = dimension_id.into();
        let text = text.into();
        if text.trim().is_empty() {
            self.0.remove(&dimension_id);
        } else {
            self.0.insert(dimension_id, text);
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::{
        clamp_score, coerce_imported_score, parse_score_input, DescriptionCells, ScoreCells,
    };

    #[test]
    fn clamp_score_bounds_and_truncates() {
        assert_eq!(clamp_score(-3.0), 0);
        assert_eq!(clamp_score(42.0), 10);
        assert_eq!(clamp_score(7.9), 7);
        assert_eq!(clamp_score(f64::NAN), 0);
        assert_eq!(clamp_score(f64::INFINITY), 10);
    }

    #[test]
    fn manual_text_input_treats_garbage_as_zero() {
        assert_eq!(parse_score_input(" 9 "), 9);
        assert_eq!(parse_score_input("eleven"), 0);
        assert_eq!(parse_score_input("15"), 10);
    }

    #[test]
    fn imported_scores_outside_range_become_zero() {
        assert_eq!(coerce_imported_score("7"), 7);
        assert_eq!(coerce_imported_score(" 10 "), 10);
        assert_eq!(coerce_imported_score("11"), 0);
        assert_eq!(coerce_imported_score("-1"), 0);
        assert_eq!(coerce_imported_score("n/a"), 0);
        assert_eq!(coerce_imported_score(""), 0);
    }

    #[test]
    fn absent_cells_use_defined_defaults() {
        let scores = ScoreCells::new();
        let descriptions = DescriptionCells::new();
        assert_eq!(scores.get("missing"), 0);
        assert_eq!(descriptions.get("missing"), None);
    }

    #[test]
    fn blank_description_clears_cell() {
        let mut descriptions = DescriptionCells::new();
        descriptions.set("perf", "fast");
        assert_eq!(descriptions.get("perf"), Some("fast"));
        descriptions.set("perf", "   ");
        assert_eq!(descriptions.get("perf"), None);
        assert!(descriptions.is_empty());
    }

    #[test]
    fn score_cells_serialize_as_plain_map() {
        let mut scores = ScoreCells::new();
        scores.set("perf", 7);
        let json = serde_json::to_string(&scores).unwrap();
        assert_eq!(json, r#"{"perf":7}"#);
    }
}
