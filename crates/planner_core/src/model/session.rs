//! Session-scoped planner state that is never written to disk.
//!
//! # Responsibility
//! - Hold the daily goal checklist for the current process.
//! - Track which finance plan the add form is editing.
//!
//! # Invariants
//! - Nothing here is part of `Document`; a reload starts empty.
//! - A finance submission resets the edit state whether it updates or
//!   appends.

use crate::model::document::{PlannerError, PlannerResult};
use crate::model::finance::FinancePlanKind;
use serde::{Deserialize, Serialize};

/// One entry of the daily goal checklist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyGoal {
    pub goal: String,
    pub done: bool,
}

/// Edit-mode flags for the finance add form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EditState {
    pub finance_kind: Option<FinancePlanKind>,
    pub finance_index: Option<usize>,
}

impl EditState {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_editing(&self) -> bool {
        self.finance_index.is_some()
    }
}

/// Where a submitted finance form lands in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinanceSubmission {
    Append,
    Replace(usize),
}

/// Process-lifetime UI state owned by the presentation layer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub daily_goals: Vec<DailyGoal>,
    pub edit: EditState,
}

impl Session {
    /// Appends an unchecked goal and returns its index.
    pub fn add_daily_goal(&mut self, goal: impl Into<String>) -> usize {
        self.daily_goals.push(DailyGoal {
            goal: goal.into(),
            done: false,
        });
        self.daily_goals.len() - 1
    }

    pub fn set_daily_goal_done(&mut self, index: usize, done: bool) -> PlannerResult<()> {
        let len = self.daily_goals.len();
        let goal = self
            .daily_goals
            .get_mut(index)
            .ok_or(PlannerError::GoalIndexOutOfRange { index, len })?;
        goal.done = done;
        Ok(())
    }

    pub fn delete_daily_goal(&mut self, index: usize) -> PlannerResult<DailyGoal> {
        if index >= self.daily_goals.len() {
            return Err(PlannerError::GoalIndexOutOfRange {
                index,
                len: self.daily_goals.len(),
            });
        }
        Ok(self.daily_goals.remove(index))
    }

    /// Count of checked goals.
    pub fn daily_goals_done(&self) -> usize {
        self.daily_goals.iter().filter(|goal| goal.done).count()
    }

    /// Marks the plan at `index` as being edited through the `kind` form.
    pub fn begin_edit(&mut self, index: usize, kind: FinancePlanKind) {
        self.edit = EditState {
            finance_kind: Some(kind),
            finance_index: Some(index),
        };
    }

    /// Decides whether a submitted `kind` form replaces or appends.
    ///
    /// Replacement happens only when the edit flags name the same kind and
    /// the edited index is the last plan (`finance_len - 1`); every other
    /// submission appends. Edit flags are cleared afterwards.
    pub fn route_submission(
        &mut self,
        kind: FinancePlanKind,
        finance_len: usize,
    ) -> FinanceSubmission {
        let route = match self.edit {
            EditState {
                finance_kind: Some(edit_kind),
                finance_index: Some(index),
            } if edit_kind == kind && finance_len > 0 && index == finance_len - 1 => {
                FinanceSubmission::Replace(index)
            }
            _ => FinanceSubmission::Append,
        };
        self.edit.reset();
        route
    }
}
