//! Dimension (matrix row) model.

use crate::model::id::{mint_dimension_id, DimensionId};
use serde::{Deserialize, Serialize};

/// One named evaluation criterion.
///
/// `name` is user-editable and not required to be unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimension {
    pub id: DimensionId,
    pub name: String,
}

impl Dimension {
    /// Creates a dimension with a freshly minted id.
    pub fn new(name: impl Into<String>, taken: impl Fn(&str) -> bool) -> Self {
        let name = name.into();
        let id = mint_dimension_id(name.as_str(), taken);
        Self { id, name }
    }

    /// Creates a dimension with a caller-provided id.
    ///
    /// Used by import, snapshot and seed paths where identity already exists.
    pub fn with_id(id: impl Into<DimensionId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}
