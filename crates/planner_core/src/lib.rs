//! Core domain logic for the college planner.
//! This crate is the single source of truth for planner invariants.

pub mod logging;
pub mod metrics;
pub mod model;
pub mod service;
pub mod store;

pub use logging::{default_log_level, init_logging, logging_status};
pub use metrics::{
    daily_goal_progress, savings_goal_percent, sip_final_value, sip_projection,
    status_distribution, subject_progress, task_completion_percent, StatusDistribution,
    SubjectProgress,
};
pub use model::document::{Document, Learning, MoveDirection, PlannerError, PlannerResult};
pub use model::finance::{
    FieldRangeError, FinancePlan, FinancePlanKind, MonthlyBudget, SavingsGoal, SipPlan,
    StockExperiment, SIP_MAX_RATE, SIP_YEARS_RANGE,
};
pub use model::learning::{Task, TaskStatus};
pub use model::session::{DailyGoal, EditState, FinanceSubmission, Session};
pub use service::action::{ActionOutcome, PlannerAction};
pub use service::planner_service::{PlannerService, ServiceError, ServiceResult};
pub use store::{
    DocumentStore, JsonFileStore, MemoryStore, StoreError, StoreResult, DEFAULT_DATA_FILE_NAME,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
