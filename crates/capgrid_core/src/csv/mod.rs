//! CSV exchange format for the comparison grid.
//!
//! # Responsibility
//! - Serialize the grid into a spreadsheet-compatible table.
//! - Parse an externally edited table back into identity-stable entities.
//!
//! # Invariants
//! - Export starts with a UTF-8 byte-order mark and a
//!   `Dimension,Type,<subjects...>` header.
//! - Every dimension exports exactly one `Score` row followed by one
//!   `Description` row.
//! - Import is all-or-nothing: it returns a complete new state or an error,
//!   never a partially applied one.

mod export;
mod field;
mod import;

pub use export::{export_csv, export_file_name};
pub use field::{escape_field, split_line, split_records, UnclosedQuote};
pub use import::{import_csv, CsvImportError, ImportOutcome, ImportPolicy};

/// UTF-8 byte-order mark written at the start of every export.
pub const BOM: char = '\u{feff}';

pub(crate) const HEADER_DIMENSION: &str = "Dimension";
pub(crate) const HEADER_TYPE: &str = "Type";
pub(crate) const ROW_TYPE_SCORE: &str = "Score";
pub(crate) const ROW_TYPE_DESCRIPTION: &str = "Description";
pub(crate) const LINE_ENDING: &str = "\r\n";
