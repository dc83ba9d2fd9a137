//! Identity allocation for grid entities.
//!
//! # Responsibility
//! - Mint collision-resistant string identifiers for dimensions and subjects.
//! - Pick pseudo-random display colors for newly minted subjects.
//!
//! # Invariants
//! - Dimension ids have the shape `<slug>_<suffix>`.
//! - Subject ids have the shape `sw_<suffix>`.
//! - Callers pass a `taken` predicate so a minted id never collides with an id
//!   already issued in the session.

use once_cell::sync::Lazy;
use regex::Regex;
use uuid::Uuid;

/// Stable identifier of one dimension (matrix row).
pub type DimensionId = String;
/// Stable identifier of one subject (matrix column).
pub type SubjectId = String;
/// Display color token, stored as `#rrggbb`.
pub type ColorToken = String;

const SUFFIX_LEN: usize = 8;
const FALLBACK_SLUG: &str = "dimension";
const SUBJECT_ID_PREFIX: &str = "sw";
const MAX_SLUG_CHARS: usize = 32;

const SUBJECT_PALETTE: &[&str] = &[
    "#2563eb", "#16a34a", "#dc2626", "#d97706", "#7c3aed", "#0891b2", "#db2777", "#4d7c0f",
    "#ea580c", "#0f766e", "#9333ea", "#475569",
];

static NON_SLUG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("valid slug regex"));

/// Lowercases `name` and collapses every run of non-alphanumerics into `_`.
///
/// Returns a fixed fallback slug when nothing alphanumeric remains.
pub fn slug(name: &str) -> String {
    let lowered = name.trim().to_lowercase();
    let collapsed = NON_SLUG_RE.replace_all(&lowered, "_");
    let trimmed = collapsed.trim_matches('_');
    if trimmed.is_empty() {
        return FALLBACK_SLUG.to_string();
    }
    trimmed.chars().take(MAX_SLUG_CHARS).collect()
}

/// Random lowercase hex suffix.
pub fn random_suffix() -> String {
    let mut suffix = Uuid::new_v4().simple().to_string();
    suffix.truncate(SUFFIX_LEN);
    suffix
}

/// Mints a dimension id derived from `name` that `taken` does not report.
pub fn mint_dimension_id(name: &str, taken: impl Fn(&str) -> bool) -> DimensionId {
    let base = slug(name);
    mint_unique(|| format!("{base}_{}", random_suffix()), taken)
}

/// Mints a subject id that `taken` does not report.
pub fn mint_subject_id(taken: impl Fn(&str) -> bool) -> SubjectId {
    mint_unique(|| format!("{SUBJECT_ID_PREFIX}_{}", random_suffix()), taken)
}

/// Picks one display color from the built-in palette.
pub fn random_color() -> ColorToken {
    let bytes = Uuid::new_v4();
    let index = usize::from(bytes.as_bytes()[0]) % SUBJECT_PALETTE.len();
    SUBJECT_PALETTE[index].to_string()
}

/// Returns whether `value` is a `#rrggbb` color token.
pub fn is_color_token(value: &str) -> bool {
    let Some(hex) = value.strip_prefix('#') else {
        return false;
    };
    hex.len() == 6 && hex.chars().all(|ch| ch.is_ascii_hexdigit())
}

fn mint_unique(mut mint: impl FnMut() -> String, taken: impl Fn(&str) -> bool) -> String {
    loop {
        let candidate = mint();
        if !taken(candidate.as_str()) {
            return candidate;
        }
    }
}
