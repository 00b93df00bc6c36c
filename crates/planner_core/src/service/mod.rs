//! Planner use-case services.
//!
//! # Responsibility
//! - Turn discrete UI actions into document mutations plus a save.
//! - Keep presentation layers decoupled from storage details.

pub mod action;
pub mod planner_service;
