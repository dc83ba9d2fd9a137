//! Grid domain model.
//!
//! # Responsibility
//! - Define the canonical records for matrix rows (`Dimension`) and columns
//!   (`Subject`).
//! - Own identifier minting and the sparse cell maps keyed by dimension id.
//!
//! # Invariants
//! - Entity ids are stable strings and are never rewritten after minting.
//! - Cell maps may hold keys for dimensions that no longer exist.

pub mod cells;
pub mod dimension;
pub mod id;
pub mod subject;
