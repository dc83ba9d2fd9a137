//! Grid to CSV serialization.

use super::field::escape_field;
use super::{
    BOM, HEADER_DIMENSION, HEADER_TYPE, LINE_ENDING, ROW_TYPE_DESCRIPTION, ROW_TYPE_SCORE,
};
use crate::model::dimension::Dimension;
use crate::model::subject::Subject;
use chrono::NaiveDate;

const EXPORT_FILE_PREFIX: &str = "capability_matrix";

/// Serializes the grid in current display order.
///
/// Missing scores export as `0`, missing descriptions as empty fields.
pub fn export_csv(dimensions: &[Dimension], subjects: &[Subject]) -> String {
    let mut out = String::new();
    out.push(BOM);

    let mut header = vec![HEADER_DIMENSION.to_string(), HEADER_TYPE.to_string()];
    header.extend(subjects.iter().map(|subject| subject.name.clone()));
    push_row(&mut out, &header);

    for dimension in dimensions {
        let mut score_row = vec![dimension.name.clone(), ROW_TYPE_SCORE.to_string()];
        score_row.extend(
            subjects
                .iter()
                .map(|subject| subject.scores.get(dimension.id.as_str()).to_string()),
        );
        push_row(&mut out, &score_row);

        let mut description_row =
            vec![dimension.name.clone(), ROW_TYPE_DESCRIPTION.to_string()];
        description_row.extend(subjects.iter().map(|subject| {
            subject
                .descriptions
                .get(dimension.id.as_str())
                .unwrap_or_default()
                .to_string()
        }));
        push_row(&mut out, &description_row);
    }

    out
}

/// File name for an export taken on `date`.
pub fn export_file_name(date: NaiveDate) -> String {
    format!("{EXPORT_FILE_PREFIX}_{}.csv", date.format("%Y-%m-%d"))
}

fn push_row(out: &mut String, fields: &[String]) {
    let escaped = fields
        .iter()
        .map(|field| escape_field(field))
        .collect::<Vec<_>>();
    out.push_str(&escaped.join(","));
    out.push_str(LINE_ENDING);
}
