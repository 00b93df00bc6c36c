//! Planner domain model.
//!
//! # Responsibility
//! - Define the persisted document shape and its typed records.
//! - Keep mutation rules next to the data they guard.
//!
//! # Invariants
//! - Finance plans are a closed sum type; no cross-variant fields.
//! - Session state (`session`) never reaches the persisted document.

pub mod document;
pub mod finance;
pub mod learning;
pub mod session;
