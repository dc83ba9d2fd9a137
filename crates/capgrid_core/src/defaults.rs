//! Built-in seed grid used on first start, on unreadable snapshots and on
//! reset.
//!
//! Seed ids are fixed so a reset always yields the same identities.

use crate::model::dimension::Dimension;
use crate::model::subject::Subject;

const SEED_DIMENSIONS: &[(&str, &str)] = &[
    ("dim_detection", "Detection"),
    ("dim_response", "Response"),
    ("dim_integration", "Integration"),
    ("dim_usability", "Usability"),
    ("dim_cost", "Cost Efficiency"),
];

// Scores follow `SEED_DIMENSIONS` order.
const SEED_SUBJECTS: &[(&str, &str, &str, [u8; 5])] = &[
    ("sw_alpha", "Alpha Sentinel", "#2563eb", [8, 7, 6, 7, 5]),
    ("sw_beta", "Beta Guard", "#16a34a", [6, 8, 7, 6, 7]),
    ("sw_gamma", "Gamma Shield", "#dc2626", [7, 6, 8, 5, 8]),
];

const SEED_DESCRIPTIONS: &[(&str, &str, &str)] = &[
    (
        "sw_alpha",
        "dim_detection",
        "Behavioral engine with a low false-positive rate",
    ),
    ("sw_gamma", "dim_cost", "Flat per-seat pricing"),
];

/// Seed dimensions in display order.
pub fn default_dimensions() -> Vec<Dimension> {
    SEED_DIMENSIONS
        .iter()
        .map(|(id, name)| Dimension::with_id(*id, *name))
        .collect()
}

/// Seed subjects in display order, fully scored against the seed dimensions.
pub fn default_subjects() -> Vec<Subject> {
    SEED_SUBJECTS
        .iter()
        .map(|(id, name, color, scores)| {
            let mut subject = Subject::with_id(*id, *name, *color);
            for ((dimension_id, _), score) in SEED_DIMENSIONS.iter().zip(scores) {
                subject.scores.set(*dimension_id, *score);
            }
            for (_, dimension_id, text) in SEED_DESCRIPTIONS
                .iter()
                .filter(|(subject_id, _, _)| subject_id == id)
            {
                subject.descriptions.set(*dimension_id, *text);
            }
            subject
        })
        .collect()
}
