//! CSV to grid reconciliation.
//!
//! # Invariants
//! - Subjects and dimensions are reconciled by exact trimmed-name match, so a
//!   re-imported entity keeps its id (and, for subjects, its color).
//! - A dimension name seen twice in one file resolves to one dimension.
//! - The caller's store is only read; the outcome is committed by the caller.

use super::field::{split_line, split_records, UnclosedQuote};
use super::BOM;
use crate::model::cells::coerce_imported_score;
use crate::model::dimension::Dimension;
use crate::model::id::{mint_dimension_id, mint_subject_id, random_color, DimensionId};
use crate::model::subject::Subject;
use crate::store::EntityStore;
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

const MIN_RECORDS: usize = 2;
const MIN_FIELDS: usize = 3;
const FIRST_VALUE_COLUMN: usize = 2;

/// How a successful import combines with the live grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ImportPolicy {
    /// The file becomes the whole grid; entities absent from it are dropped.
    #[default]
    Replace,
    /// Entities absent from the file are kept in their prior order; new ones
    /// are appended. Matched subjects keep cells the file does not mention.
    Merge,
}

/// Format errors that abort an import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CsvImportError {
    /// Fewer than two non-blank records.
    TooFewLines { found: usize },
    /// Header lacks the `Dimension`, `Type` and at least one subject column.
    HeaderTooShort { found: usize },
    /// No data row resolved to a dimension.
    NoDimensions,
    /// No header column resolved to a subject.
    NoSubjects,
    /// A quoted field opened on `line` is never closed.
    UnclosedQuote { line: usize },
}

impl Display for CsvImportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TooFewLines { found } => write!(
                f,
                "csv needs a header and at least one data row, found {found} line(s)"
            ),
            Self::HeaderTooShort { found } => write!(
                f,
                "csv header needs Dimension, Type and at least one subject column, found {found} column(s)"
            ),
            Self::NoDimensions => write!(f, "csv contains no dimension rows"),
            Self::NoSubjects => write!(f, "csv header contains no subject names"),
            Self::UnclosedQuote { line } => {
                write!(f, "csv quoted field opened on line {line} is never closed")
            }
        }
    }
}

impl Error for CsvImportError {}

impl From<UnclosedQuote> for CsvImportError {
    fn from(value: UnclosedQuote) -> Self {
        Self::UnclosedQuote { line: value.line }
    }
}

/// Fully resolved grid produced by a successful import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportOutcome {
    pub dimensions: Vec<Dimension>,
    pub subjects: Vec<Subject>,
    /// Entities whose id was reused from the live grid.
    pub reused: usize,
    /// Entities that received a freshly minted id.
    pub minted: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowKind {
    Score,
    Description,
}

impl RowKind {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "score" => Some(Self::Score),
            "description" => Some(Self::Description),
            _ => None,
        }
    }
}

/// Parses `text` and reconciles it against `current`.
///
/// # Errors
/// - Returns `TooFewLines` / `HeaderTooShort` / `UnclosedQuote` for malformed
///   input.
/// - Returns `NoDimensions` / `NoSubjects` when nothing usable was resolved.
pub fn import_csv(
    text: &str,
    current: &EntityStore,
    policy: ImportPolicy,
) -> Result<ImportOutcome, CsvImportError> {
    let text = text.strip_prefix(BOM).unwrap_or(text);
    let records = split_records(text)?;
    if records.len() < MIN_RECORDS {
        return Err(CsvImportError::TooFewLines {
            found: records.len(),
        });
    }

    let header = split_line(&records[0]);
    if header.len() < MIN_FIELDS {
        return Err(CsvImportError::HeaderTooShort {
            found: header.len(),
        });
    }

    let mut pass = ReconcilePass::new(current, policy);
    let columns = header[FIRST_VALUE_COLUMN..]
        .iter()
        .map(|name| pass.resolve_subject(name.trim()))
        .collect::<Vec<_>>();

    for record in &records[1..] {
        let fields = split_line(record);
        if fields.len() < MIN_FIELDS {
            continue;
        }
        let name = fields[0].trim();
        if name.is_empty() {
            continue;
        }
        let Some(kind) = RowKind::parse(&fields[1]) else {
            continue;
        };

        let dimension_id = pass.resolve_dimension(name);
        for (value, column) in fields[FIRST_VALUE_COLUMN..].iter().zip(&columns) {
            let Some(index) = column else {
                continue;
            };
            let subject = &mut pass.subjects[*index];
            match kind {
                RowKind::Score => subject
                    .scores
                    .set(dimension_id.as_str(), coerce_imported_score(value)),
                RowKind::Description => subject
                    .descriptions
                    .set(dimension_id.as_str(), value.as_str()),
            }
        }
    }

    pass.finish()
}

struct ReconcilePass<'a> {
    current: &'a EntityStore,
    policy: ImportPolicy,
    dimensions: Vec<Dimension>,
    subjects: Vec<Subject>,
    minted_ids: HashSet<String>,
    reused: usize,
}

impl<'a> ReconcilePass<'a> {
    fn new(current: &'a EntityStore, policy: ImportPolicy) -> Self {
        Self {
            current,
            policy,
            dimensions: Vec::new(),
            subjects: Vec::new(),
            minted_ids: HashSet::new(),
            reused: 0,
        }
    }

    fn is_taken(&self, id: &str) -> bool {
        self.current.is_id_issued(id) || self.minted_ids.contains(id)
    }

    /// Maps one header column to an index into `subjects`.
    fn resolve_subject(&mut self, name: &str) -> Option<usize> {
        if name.is_empty() {
            return None;
        }
        if let Some(index) = self
            .subjects
            .iter()
            .position(|subject| subject.name == name)
        {
            return Some(index);
        }

        let current = self.current;
        let prior = current
            .subjects()
            .iter()
            .find(|subject| subject.name.trim() == name);
        let subject = match prior {
            Some(existing) => {
                self.reused += 1;
                match self.policy {
                    ImportPolicy::Replace => {
                        Subject::with_id(existing.id.clone(), name, existing.color.clone())
                    }
                    ImportPolicy::Merge => {
                        let mut merged = existing.clone();
                        merged.name = name.to_string();
                        merged
                    }
                }
            }
            None => {
                let id = mint_subject_id(|id| self.is_taken(id));
                self.minted_ids.insert(id.clone());
                Subject::with_id(id, name, random_color())
            }
        };
        self.subjects.push(subject);
        Some(self.subjects.len() - 1)
    }

    /// Resolves a row's dimension, first within this pass, then against the
    /// live grid, minting a new id only when both miss.
    fn resolve_dimension(&mut self, name: &str) -> DimensionId {
        if let Some(existing) = self
            .dimensions
            .iter()
            .find(|dimension| dimension.name == name)
        {
            return existing.id.clone();
        }

        let current = self.current;
        let prior_id = current
            .dimensions()
            .iter()
            .find(|dimension| dimension.name.trim() == name)
            .map(|dimension| dimension.id.clone());
        let id = match prior_id {
            Some(id) => {
                self.reused += 1;
                id
            }
            None => {
                let id = mint_dimension_id(name, |id| self.is_taken(id));
                self.minted_ids.insert(id.clone());
                id
            }
        };
        self.dimensions.push(Dimension::with_id(id.clone(), name));
        id
    }

    fn finish(self) -> Result<ImportOutcome, CsvImportError> {
        if self.dimensions.is_empty() {
            return Err(CsvImportError::NoDimensions);
        }
        if self.subjects.is_empty() {
            return Err(CsvImportError::NoSubjects);
        }

        let minted = self.minted_ids.len();
        let (dimensions, subjects) = match self.policy {
            ImportPolicy::Replace => (self.dimensions, self.subjects),
            ImportPolicy::Merge => (
                merge_by_id(self.current.dimensions(), self.dimensions, |d| &d.id),
                merge_by_id(self.current.subjects(), self.subjects, |s| &s.id),
            ),
        };

        Ok(ImportOutcome {
            dimensions,
            subjects,
            reused: self.reused,
            minted,
        })
    }
}

/// Keeps `prior` order, substituting resolved entries with the same id, then
/// appends resolved entries that are new.
fn merge_by_id<T: Clone>(prior: &[T], resolved: Vec<T>, id_of: impl Fn(&T) -> &String) -> Vec<T> {
    let prior_ids = prior.iter().map(|item| id_of(item).clone()).collect::<HashSet<_>>();
    let mut merged = prior
        .iter()
        .map(|item| {
            resolved
                .iter()
                .find(|candidate| id_of(*candidate) == id_of(item))
                .cloned()
                .unwrap_or_else(|| item.clone())
        })
        .collect::<Vec<_>>();
    merged.extend(
        resolved
            .into_iter()
            .filter(|item| !prior_ids.contains(id_of(item))),
    );
    merged
}
