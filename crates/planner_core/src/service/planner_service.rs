//! Planner use-case service.
//!
//! # Responsibility
//! - Own the current document for one presentation session.
//! - Run every user action as mutate -> save -> expose updated document.
//!
//! # Invariants
//! - Every successful mutation is followed by a full-document save.
//! - The in-memory document only advances once that save succeeds.
//! - Rejected actions (duplicate subject, bad index) and boundary moves do
//!   not save, because nothing changed.
//! - Store failures propagate; the service never masks a failed save.

use crate::model::document::{Document, MoveDirection, PlannerError, PlannerResult};
use crate::model::finance::FinancePlan;
use crate::model::learning::Task;
use crate::model::session::{FinanceSubmission, Session};
use crate::service::action::{ActionOutcome, PlannerAction};
use crate::store::{DocumentStore, StoreError};
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors from planner service operations.
#[derive(Debug)]
pub enum ServiceError {
    /// Rejected mutation; document unchanged.
    Planner(PlannerError),
    /// Load/save failure.
    Store(StoreError),
}

impl ServiceError {
    /// Whether the caller can report the error inline and keep going.
    ///
    /// Store failures abort the current session.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Planner(_))
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Planner(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Planner(err) => Some(err),
            Self::Store(err) => Some(err),
        }
    }
}

impl From<PlannerError> for ServiceError {
    fn from(value: PlannerError) -> Self {
        Self::Planner(value)
    }
}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Planner session facade over one document store.
pub struct PlannerService<S: DocumentStore> {
    store: S,
    document: Document,
}

impl<S: DocumentStore> PlannerService<S> {
    /// Loads the document from `store`.
    ///
    /// # Errors
    /// - `ServiceError::Store` when the backing data cannot be read or parsed.
    pub fn open(store: S) -> ServiceResult<Self> {
        let document = store.load()?;
        Ok(Self { store, document })
    }

    /// Current document, as it was loaded or last successfully saved.
    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn into_document(self) -> Document {
        self.document
    }

    /// Discards in-memory state and reloads from the store.
    pub fn reload(&mut self) -> ServiceResult<&Document> {
        self.document = self.store.load()?;
        Ok(&self.document)
    }

    /// Applies one action and returns the updated document.
    pub fn dispatch(&mut self, action: PlannerAction) -> ServiceResult<&Document> {
        self.apply(action)?;
        Ok(&self.document)
    }

    /// Applies one action, saving when it mutated the document.
    pub fn apply(&mut self, action: PlannerAction) -> ServiceResult<ActionOutcome> {
        let name = action.name();
        let result = self.apply_inner(action);
        match &result {
            Ok(outcome) => info!(
                "event=planner_action module=service status={} action={}",
                if outcome.changed { "ok" } else { "noop" },
                name
            ),
            Err(ServiceError::Planner(err)) => warn!(
                "event=planner_action module=service status=rejected action={} error_code={}",
                name,
                err.code()
            ),
            Err(err) => error!(
                "event=planner_action module=service status=error action={} error_code=store_failed error={}",
                name, err
            ),
        }
        result
    }

    fn apply_inner(&mut self, action: PlannerAction) -> ServiceResult<ActionOutcome> {
        match action {
            PlannerAction::AddFinance { plan } => {
                let index = self.add_finance(plan)?;
                Ok(ActionOutcome {
                    index: Some(index),
                    ..ActionOutcome::mutated()
                })
            }
            PlannerAction::UpdateFinance { index, plan } => {
                self.update_finance(index, plan)?;
                Ok(ActionOutcome::mutated())
            }
            PlannerAction::DeleteFinance { index } => {
                self.delete_finance(index)?;
                Ok(ActionOutcome::mutated())
            }
            PlannerAction::MoveFinance { index, direction } => {
                Ok(moved(self.move_finance(index, direction)?))
            }
            PlannerAction::SetBudgetCategory {
                index,
                name,
                amount,
            } => {
                self.set_budget_category(index, name, amount)?;
                Ok(ActionOutcome::mutated())
            }
            PlannerAction::DeleteBudgetCategory { index, name } => {
                self.delete_budget_category(index, &name)?;
                Ok(ActionOutcome::mutated())
            }
            PlannerAction::AddSubject { name } => {
                self.add_subject(name)?;
                Ok(ActionOutcome::mutated())
            }
            PlannerAction::DeleteSubject { name } => {
                self.delete_subject(&name)?;
                Ok(ActionOutcome::mutated())
            }
            PlannerAction::MoveSubject { index, direction } => {
                Ok(moved(self.move_subject(index, direction)?))
            }
            PlannerAction::AddTasks { subject, lines } => {
                let count = self.add_tasks_bulk(&subject, lines.as_slice())?;
                Ok(ActionOutcome {
                    count: Some(count),
                    ..ActionOutcome::mutated()
                })
            }
            PlannerAction::SetTaskStatus {
                subject,
                task_index,
                done,
            } => {
                self.set_task_status(&subject, task_index, done)?;
                Ok(ActionOutcome::mutated())
            }
            PlannerAction::DeleteTask {
                subject,
                task_index,
            } => {
                self.delete_task(&subject, task_index)?;
                Ok(ActionOutcome::mutated())
            }
        }
    }

    pub fn add_finance(&mut self, plan: FinancePlan) -> ServiceResult<usize> {
        self.commit(|doc| Ok(doc.append_finance(plan)))
    }

    pub fn update_finance(&mut self, index: usize, plan: FinancePlan) -> ServiceResult<()> {
        self.commit(|doc| doc.update_finance(index, plan))
    }

    pub fn delete_finance(&mut self, index: usize) -> ServiceResult<FinancePlan> {
        self.commit(|doc| doc.delete_finance(index))
    }

    /// Returns `false` (and skips the save) for a boundary move.
    pub fn move_finance(&mut self, index: usize, direction: MoveDirection) -> ServiceResult<bool> {
        self.commit_if_changed(|doc| doc.move_finance(index, direction))
    }

    pub fn set_budget_category(
        &mut self,
        index: usize,
        name: impl Into<String>,
        amount: f64,
    ) -> ServiceResult<()> {
        self.commit(|doc| doc.set_budget_category(index, name, amount))
    }

    pub fn delete_budget_category(
        &mut self,
        index: usize,
        name: &str,
    ) -> ServiceResult<Option<f64>> {
        self.commit(|doc| doc.delete_budget_category(index, name))
    }

    /// Adds an empty subject.
    ///
    /// # Errors
    /// - `ServiceError::Planner(PlannerError::SubjectExists)` for a duplicate
    ///   name; nothing is saved.
    pub fn add_subject(&mut self, name: impl Into<String>) -> ServiceResult<()> {
        self.commit(|doc| doc.add_subject(name))
    }

    pub fn delete_subject(&mut self, name: &str) -> ServiceResult<Vec<Task>> {
        self.commit(|doc| doc.delete_subject(name))
    }

    pub fn move_subject(&mut self, index: usize, direction: MoveDirection) -> ServiceResult<bool> {
        self.commit_if_changed(|doc| doc.move_subject(index, direction))
    }

    pub fn add_tasks_bulk<L: AsRef<str>>(
        &mut self,
        subject: &str,
        lines: &[L],
    ) -> ServiceResult<usize> {
        self.commit(|doc| doc.add_tasks_bulk(subject, lines))
    }

    /// Checkbox toggle; unchecking always yields `Todo`.
    pub fn set_task_status(
        &mut self,
        subject: &str,
        task_index: usize,
        done: bool,
    ) -> ServiceResult<()> {
        self.commit(|doc| doc.set_task_status(subject, task_index, done))
    }

    pub fn delete_task(&mut self, subject: &str, task_index: usize) -> ServiceResult<Task> {
        self.commit(|doc| doc.delete_task(subject, task_index))
    }

    /// Saves a submitted finance form, honoring the session's edit flags.
    ///
    /// Returns the index the plan now occupies and the route taken, so the
    /// caller can tell an in-place update from an append.
    pub fn submit_finance(
        &mut self,
        session: &mut Session,
        plan: FinancePlan,
    ) -> ServiceResult<(usize, FinanceSubmission)> {
        let route = session.route_submission(plan.kind(), self.document.finance.len());
        let index = match route {
            FinanceSubmission::Replace(index) => {
                self.update_finance(index, plan)?;
                index
            }
            FinanceSubmission::Append => self.add_finance(plan)?,
        };
        Ok((index, route))
    }

    /// Runs one mutation on a working copy and saves it.
    ///
    /// The working copy replaces the document only after the save succeeds,
    /// so a rejected mutation or a failed save leaves `document()` unchanged.
    fn commit<T>(
        &mut self,
        mutate: impl FnOnce(&mut Document) -> PlannerResult<T>,
    ) -> ServiceResult<T> {
        let mut draft = self.document.clone();
        let value = mutate(&mut draft)?;
        self.store.save(&draft)?;
        self.document = draft;
        Ok(value)
    }

    /// Like `commit`, but a mutation reporting `false` is not saved.
    fn commit_if_changed(
        &mut self,
        mutate: impl FnOnce(&mut Document) -> bool,
    ) -> ServiceResult<bool> {
        let mut draft = self.document.clone();
        if !mutate(&mut draft) {
            return Ok(false);
        }
        self.store.save(&draft)?;
        self.document = draft;
        Ok(true)
    }
}

fn moved(changed: bool) -> ActionOutcome {
    if changed {
        ActionOutcome::mutated()
    } else {
        ActionOutcome::noop()
    }
}
