//! Discrete presentation-layer actions.
//!
//! One `PlannerAction` corresponds to one user gesture (button, checkbox,
//! form submit). Actions carry exactly the parameters the matching document
//! mutation needs and are serializable so FFI callers can send them as JSON.

use crate::model::document::MoveDirection;
use crate::model::finance::FinancePlan;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum PlannerAction {
    AddFinance {
        plan: FinancePlan,
    },
    UpdateFinance {
        index: usize,
        plan: FinancePlan,
    },
    DeleteFinance {
        index: usize,
    },
    MoveFinance {
        index: usize,
        direction: MoveDirection,
    },
    SetBudgetCategory {
        index: usize,
        name: String,
        amount: f64,
    },
    DeleteBudgetCategory {
        index: usize,
        name: String,
    },
    AddSubject {
        name: String,
    },
    DeleteSubject {
        name: String,
    },
    MoveSubject {
        index: usize,
        direction: MoveDirection,
    },
    AddTasks {
        subject: String,
        lines: Vec<String>,
    },
    SetTaskStatus {
        subject: String,
        task_index: usize,
        done: bool,
    },
    DeleteTask {
        subject: String,
        task_index: usize,
    },
}

impl PlannerAction {
    /// Stable snake_case name used in log events.
    pub fn name(&self) -> &'static str {
        match self {
            Self::AddFinance { .. } => "add_finance",
            Self::UpdateFinance { .. } => "update_finance",
            Self::DeleteFinance { .. } => "delete_finance",
            Self::MoveFinance { .. } => "move_finance",
            Self::SetBudgetCategory { .. } => "set_budget_category",
            Self::DeleteBudgetCategory { .. } => "delete_budget_category",
            Self::AddSubject { .. } => "add_subject",
            Self::DeleteSubject { .. } => "delete_subject",
            Self::MoveSubject { .. } => "move_subject",
            Self::AddTasks { .. } => "add_tasks",
            Self::SetTaskStatus { .. } => "set_task_status",
            Self::DeleteTask { .. } => "delete_task",
        }
    }
}

/// Result of applying one action.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActionOutcome {
    /// Whether the document was mutated (and therefore saved).
    pub changed: bool,
    /// Index of the appended finance plan, for `AddFinance`.
    pub index: Option<usize>,
    /// Number of tasks added, for `AddTasks`.
    pub count: Option<usize>,
}

impl ActionOutcome {
    pub(crate) fn mutated() -> Self {
        Self {
            changed: true,
            ..Self::default()
        }
    }

    pub(crate) fn noop() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::PlannerAction;
    use crate::model::document::MoveDirection;

    #[test]
    fn actions_decode_from_tagged_json() {
        let action: PlannerAction = serde_json::from_value(serde_json::json!({
            "action": "move_subject",
            "index": 1,
            "direction": "up"
        }))
        .unwrap();
        assert_eq!(
            action,
            PlannerAction::MoveSubject {
                index: 1,
                direction: MoveDirection::Up
            }
        );
        assert_eq!(action.name(), "move_subject");
    }

    #[test]
    fn add_finance_embeds_tagged_plan() {
        let action: PlannerAction = serde_json::from_value(serde_json::json!({
            "action": "add_finance",
            "plan": {
                "type": "SIP",
                "name": "Index fund",
                "amount": 1000.0,
                "rate": 12.0,
                "years": 5
            }
        }))
        .unwrap();
        assert_eq!(action.name(), "add_finance");
    }
}
