//! Planner document and its in-memory mutation contract.
//!
//! # Responsibility
//! - Define the persisted root shape (`finance` + `learning`).
//! - Apply add/edit/delete/move mutations without touching storage.
//!
//! # Invariants
//! - `finance` and `learning` preserve user-visible order.
//! - Subject names are unique; deleting a subject drops all its tasks.
//! - Move operations are adjacent swaps and no-ops at the boundaries.

use crate::model::finance::{FinancePlan, MonthlyBudget};
use crate::model::learning::{parse_task_lines, Task, TaskStatus};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Subject name -> ordered tasks, in subject display order.
pub type Learning = IndexMap<String, Vec<Task>>;

/// Direction for adjacent-swap reordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveDirection {
    Up,
    Down,
}

impl MoveDirection {
    pub fn reversed(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
        }
    }

    /// Returns the neighbor index, or `None` at a boundary.
    fn neighbor(self, index: usize, len: usize) -> Option<usize> {
        if index >= len {
            return None;
        }
        match self {
            Self::Up => index.checked_sub(1),
            Self::Down => (index + 1 < len).then_some(index + 1),
        }
    }
}

/// Mutation failures on a planner document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlannerError {
    FinanceIndexOutOfRange { index: usize, len: usize },
    /// Category edits target a plan that is not a monthly budget.
    NotMonthlyBudget(usize),
    SubjectExists(String),
    SubjectNotFound(String),
    TaskIndexOutOfRange {
        subject: String,
        index: usize,
        len: usize,
    },
    GoalIndexOutOfRange { index: usize, len: usize },
}

impl Display for PlannerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FinanceIndexOutOfRange { index, len } => {
                write!(f, "finance plan index {index} out of range (len {len})")
            }
            Self::NotMonthlyBudget(index) => {
                write!(f, "finance plan {index} is not a monthly budget")
            }
            Self::SubjectExists(name) => write!(f, "subject already exists: {name}"),
            Self::SubjectNotFound(name) => write!(f, "subject not found: {name}"),
            Self::TaskIndexOutOfRange {
                subject,
                index,
                len,
            } => write!(
                f,
                "task index {index} out of range for subject {subject} (len {len})"
            ),
            Self::GoalIndexOutOfRange { index, len } => {
                write!(f, "daily goal index {index} out of range (len {len})")
            }
        }
    }
}

impl PlannerError {
    /// Stable machine-readable code, free of user-entered text.
    pub fn code(&self) -> &'static str {
        match self {
            Self::FinanceIndexOutOfRange { .. } => "finance_index_out_of_range",
            Self::NotMonthlyBudget(_) => "not_monthly_budget",
            Self::SubjectExists(_) => "subject_exists",
            Self::SubjectNotFound(_) => "subject_not_found",
            Self::TaskIndexOutOfRange { .. } => "task_index_out_of_range",
            Self::GoalIndexOutOfRange { .. } => "goal_index_out_of_range",
        }
    }
}

impl Error for PlannerError {}

pub type PlannerResult<T> = Result<T, PlannerError>;

/// Root persisted planner state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub finance: Vec<FinancePlan>,
    #[serde(default)]
    pub learning: Learning,
}

impl Document {
    /// Appends a plan and returns its index. Never de-duplicates.
    pub fn append_finance(&mut self, plan: FinancePlan) -> usize {
        self.finance.push(plan);
        self.finance.len() - 1
    }

    /// Replaces the plan at `index`.
    pub fn update_finance(&mut self, index: usize, plan: FinancePlan) -> PlannerResult<()> {
        let slot = self.finance_mut(index)?;
        *slot = plan;
        Ok(())
    }

    /// Removes the plan at `index`, shifting later plans up.
    pub fn delete_finance(&mut self, index: usize) -> PlannerResult<FinancePlan> {
        self.ensure_finance_index(index)?;
        Ok(self.finance.remove(index))
    }

    /// Swaps the plan at `index` with its neighbor.
    ///
    /// Returns `false` without mutating at a boundary or for an unknown index.
    pub fn move_finance(&mut self, index: usize, direction: MoveDirection) -> bool {
        match direction.neighbor(index, self.finance.len()) {
            Some(other) => {
                self.finance.swap(index, other);
                true
            }
            None => false,
        }
    }

    /// Upserts a category allocation on the monthly budget at `index`.
    pub fn set_budget_category(
        &mut self,
        index: usize,
        name: impl Into<String>,
        amount: f64,
    ) -> PlannerResult<()> {
        self.budget_mut(index)?.set_category(name, amount);
        Ok(())
    }

    /// Removes a category allocation from the monthly budget at `index`.
    pub fn delete_budget_category(
        &mut self,
        index: usize,
        name: &str,
    ) -> PlannerResult<Option<f64>> {
        Ok(self.budget_mut(index)?.remove_category(name))
    }

    /// Inserts an empty subject at the end of the subject order.
    ///
    /// # Errors
    /// - `SubjectExists` when the name is taken; the document is unchanged.
    pub fn add_subject(&mut self, name: impl Into<String>) -> PlannerResult<()> {
        let name = name.into();
        if self.learning.contains_key(&name) {
            return Err(PlannerError::SubjectExists(name));
        }
        self.learning.insert(name, Vec::new());
        Ok(())
    }

    /// Removes a subject with all of its tasks.
    pub fn delete_subject(&mut self, name: &str) -> PlannerResult<Vec<Task>> {
        self.learning
            .shift_remove(name)
            .ok_or_else(|| PlannerError::SubjectNotFound(name.to_string()))
    }

    /// Swaps the subject at `index` with its neighbor in key order.
    pub fn move_subject(&mut self, index: usize, direction: MoveDirection) -> bool {
        match direction.neighbor(index, self.learning.len()) {
            Some(other) => {
                self.learning.swap_indices(index, other);
                true
            }
            None => false,
        }
    }

    /// Subject names in display order.
    pub fn subject_names(&self) -> Vec<&str> {
        self.learning.keys().map(String::as_str).collect()
    }

    /// Appends one `Todo` task per non-blank line.
    ///
    /// Each entry is split on line breaks and trimmed; blank lines are
    /// dropped. Returns the number of tasks added.
    pub fn add_tasks_bulk<S: AsRef<str>>(
        &mut self,
        subject: &str,
        lines: &[S],
    ) -> PlannerResult<usize> {
        let tasks = self.tasks_mut(subject)?;
        let before = tasks.len();
        tasks.extend(
            lines
                .iter()
                .flat_map(|entry| parse_task_lines(entry.as_ref()))
                .map(Task::new),
        );
        Ok(tasks.len() - before)
    }

    /// Text-area form of `add_tasks_bulk`.
    pub fn add_tasks_text(&mut self, subject: &str, text: &str) -> PlannerResult<usize> {
        self.add_tasks_bulk(subject, &[text])
    }

    /// Sets a task to `Done` when `done`, otherwise to `Todo`.
    ///
    /// An `InProgress` task that is unchecked becomes `Todo`.
    pub fn set_task_status(
        &mut self,
        subject: &str,
        task_index: usize,
        done: bool,
    ) -> PlannerResult<()> {
        self.task_mut(subject, task_index)?.status = TaskStatus::from_checked(done);
        Ok(())
    }

    /// Removes one task, shifting later tasks up.
    pub fn delete_task(&mut self, subject: &str, task_index: usize) -> PlannerResult<Task> {
        let tasks = self.tasks_mut(subject)?;
        if task_index >= tasks.len() {
            return Err(PlannerError::TaskIndexOutOfRange {
                subject: subject.to_string(),
                index: task_index,
                len: tasks.len(),
            });
        }
        Ok(tasks.remove(task_index))
    }

    fn ensure_finance_index(&self, index: usize) -> PlannerResult<()> {
        if index < self.finance.len() {
            Ok(())
        } else {
            Err(PlannerError::FinanceIndexOutOfRange {
                index,
                len: self.finance.len(),
            })
        }
    }

    fn finance_mut(&mut self, index: usize) -> PlannerResult<&mut FinancePlan> {
        let len = self.finance.len();
        self.finance
            .get_mut(index)
            .ok_or(PlannerError::FinanceIndexOutOfRange { index, len })
    }

    fn budget_mut(&mut self, index: usize) -> PlannerResult<&mut MonthlyBudget> {
        self.finance_mut(index)?
            .as_budget_mut()
            .ok_or(PlannerError::NotMonthlyBudget(index))
    }

    fn tasks_mut(&mut self, subject: &str) -> PlannerResult<&mut Vec<Task>> {
        self.learning
            .get_mut(subject)
            .ok_or_else(|| PlannerError::SubjectNotFound(subject.to_string()))
    }

    fn task_mut(&mut self, subject: &str, task_index: usize) -> PlannerResult<&mut Task> {
        let tasks = self.tasks_mut(subject)?;
        let len = tasks.len();
        tasks
            .get_mut(task_index)
            .ok_or_else(|| PlannerError::TaskIndexOutOfRange {
                subject: subject.to_string(),
                index: task_index,
                len,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::{Document, MoveDirection, PlannerError};
    use crate::model::finance::{FinancePlan, SavingsGoal};

    fn goal(name: &str) -> FinancePlan {
        FinancePlan::SavingsGoal(SavingsGoal {
            name: name.to_string(),
            target: 100.0,
            saved: 10.0,
        })
    }

    #[test]
    fn append_finance_returns_last_index_and_allows_duplicates() {
        let mut doc = Document::default();
        assert_eq!(doc.append_finance(goal("a")), 0);
        assert_eq!(doc.append_finance(goal("a")), 1);
        assert_eq!(doc.finance.len(), 2);
    }

    #[test]
    fn update_and_delete_reject_unknown_index() {
        let mut doc = Document::default();
        doc.append_finance(goal("a"));

        let err = doc.update_finance(3, goal("b")).unwrap_err();
        assert_eq!(err, PlannerError::FinanceIndexOutOfRange { index: 3, len: 1 });
        let err = doc.delete_finance(1).unwrap_err();
        assert_eq!(err, PlannerError::FinanceIndexOutOfRange { index: 1, len: 1 });
        assert_eq!(doc.finance, vec![goal("a")]);
    }

    #[test]
    fn move_on_unknown_index_is_noop() {
        let mut doc = Document::default();
        doc.append_finance(goal("a"));
        assert!(!doc.move_finance(5, MoveDirection::Up));
        assert!(!doc.move_subject(0, MoveDirection::Down));
    }

    #[test]
    fn set_budget_category_rejects_other_plan_kinds() {
        let mut doc = Document::default();
        doc.append_finance(goal("a"));
        let err = doc.set_budget_category(0, "Rent", 10.0).unwrap_err();
        assert_eq!(err, PlannerError::NotMonthlyBudget(0));
    }

    #[test]
    fn delete_task_reports_missing_subject_and_index() {
        let mut doc = Document::default();
        assert_eq!(
            doc.delete_task("Math", 0).unwrap_err(),
            PlannerError::SubjectNotFound("Math".to_string())
        );

        doc.add_subject("Math").unwrap();
        assert_eq!(
            doc.delete_task("Math", 0).unwrap_err(),
            PlannerError::TaskIndexOutOfRange {
                subject: "Math".to_string(),
                index: 0,
                len: 0,
            }
        );
    }
}
