//! Flutter-facing bridge over `planner_core`.

pub mod api;
