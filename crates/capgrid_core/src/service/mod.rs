//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate store mutations, persistence and CSV exchange into
//!   use-case level APIs.
//! - Keep CLI callers decoupled from storage details.

pub mod grid_service;
