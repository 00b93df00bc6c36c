//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose planner actions and derived figures to Dart via FRB.
//! - Return the updated document as JSON after every action.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Each call runs load -> apply -> save under one process-wide lock.
//! - Daily goals and edit flags live only in process memory.

use planner_core::{
    core_version as core_version_inner, daily_goal_progress, init_logging as init_logging_inner,
    ping as ping_inner, savings_goal_percent, sip_final_value, sip_projection,
    status_distribution, subject_progress, Document, FieldRangeError, FinancePlan,
    FinancePlanKind, FinanceSubmission, JsonFileStore, MonthlyBudget, PlannerAction,
    PlannerService, ServiceError, Session, SipPlan, DEFAULT_DATA_FILE_NAME,
};
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};

const DATA_PATH_ENV: &str = "PLANNER_DATA_PATH";
static DATA_PATH: OnceLock<PathBuf> = OnceLock::new();
static SESSION: OnceLock<Mutex<Session>> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Idempotent for the same `level + log_dir`; conflicting calls fail.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Pins the planner data file for this process.
///
/// Must be called before the first planner call to take effect; otherwise
/// `PLANNER_DATA_PATH` or `planner_data.json` in the working directory is
/// used.
///
/// # FFI contract
/// - Repeating the same path is accepted; a different path is rejected.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn configure_data_path(path: String) -> String {
    let trimmed = path.trim();
    if trimmed.is_empty() {
        return "data path cannot be empty".to_string();
    }
    let requested = PathBuf::from(trimmed);
    let active = DATA_PATH.get_or_init(|| requested.clone());
    if *active == requested {
        String::new()
    } else {
        format!(
            "data path already configured at `{}`; refusing to switch to `{}`",
            active.display(),
            requested.display()
        )
    }
}

/// Response envelope for document-returning calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannerResponse {
    /// Whether the call succeeded.
    pub ok: bool,
    /// Whether the error (if any) can be shown inline and the UI can go on.
    pub recoverable: bool,
    /// Human-readable message for diagnostics/UI.
    pub message: String,
    /// Current document JSON; present on success and on rejected actions.
    pub document_json: Option<String>,
}

impl PlannerResponse {
    fn success(message: impl Into<String>, document: &Document) -> Self {
        match serde_json::to_string(document) {
            Ok(json) => Self {
                ok: true,
                recoverable: true,
                message: message.into(),
                document_json: Some(json),
            },
            Err(err) => Self::fatal(format!("document encode failed: {err}")),
        }
    }

    fn rejected(message: impl Into<String>, document: &Document) -> Self {
        Self {
            ok: false,
            recoverable: true,
            message: message.into(),
            document_json: serde_json::to_string(document).ok(),
        }
    }

    fn fatal(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            recoverable: false,
            message: message.into(),
            document_json: None,
        }
    }
}

/// Loads the current document.
#[flutter_rust_bridge::frb(sync)]
pub fn planner_load() -> PlannerResponse {
    let _session = lock_session();
    match open_service() {
        Ok(service) => PlannerResponse::success("Loaded.", service.document()),
        Err(err) => PlannerResponse::fatal(format!("planner_load failed: {err}")),
    }
}

/// Applies one JSON-encoded `PlannerAction` and saves.
///
/// Example: `{"action":"add_subject","name":"Physics"}`.
///
/// # FFI contract
/// - Malformed action JSON is a recoverable rejection.
/// - Plan fields outside the form ranges are recoverable rejections.
/// - A blank subject or category name is ignored; nothing is saved.
/// - Duplicate subject and bad indices are recoverable rejections.
/// - Read/parse/write failures of the data file are fatal.
#[flutter_rust_bridge::frb(sync)]
pub fn planner_apply(action_json: String) -> PlannerResponse {
    let _session = lock_session();
    let mut service = match open_service() {
        Ok(service) => service,
        Err(err) => return PlannerResponse::fatal(format!("planner_apply failed: {err}")),
    };
    let action: PlannerAction = match serde_json::from_str(&action_json) {
        Ok(action) => action,
        Err(err) => {
            return PlannerResponse::rejected(
                format!("invalid action: {err}"),
                service.document(),
            )
        }
    };
    if is_blank_input(&action) {
        return PlannerResponse::success("Nothing to change.", service.document());
    }
    if let Err(err) = check_action_ranges(&action) {
        return PlannerResponse::rejected(format!("invalid input: {err}"), service.document());
    }
    let name = action.name();
    match service.apply(action) {
        Ok(outcome) if outcome.changed => PlannerResponse::success(
            action_message(name, outcome.count),
            service.document(),
        ),
        Ok(_) => PlannerResponse::success("Nothing to change.", service.document()),
        Err(err) => service_failure(name, err, service.document()),
    }
}

/// Saves a submitted finance form, replacing the plan being edited when
/// the edit flags allow it.
///
/// Answers `Plan updated!` only when the plan was replaced in place; a
/// submission that fell back to appending answers `Plan saved!`.
#[flutter_rust_bridge::frb(sync)]
pub fn planner_submit_finance(plan_json: String) -> PlannerResponse {
    let mut session = lock_session();
    let mut service = match open_service() {
        Ok(service) => service,
        Err(err) => {
            return PlannerResponse::fatal(format!("planner_submit_finance failed: {err}"))
        }
    };
    let plan: FinancePlan = match serde_json::from_str(&plan_json) {
        Ok(plan) => plan,
        Err(err) => {
            return PlannerResponse::rejected(format!("invalid plan: {err}"), service.document())
        }
    };
    if let Err(err) = plan.check_ranges() {
        return PlannerResponse::rejected(format!("invalid plan: {err}"), service.document());
    }
    match service.submit_finance(&mut session, plan) {
        Ok((_, FinanceSubmission::Replace(_))) => {
            PlannerResponse::success("Plan updated!", service.document())
        }
        Ok((_, FinanceSubmission::Append)) => {
            PlannerResponse::success("Plan saved!", service.document())
        }
        Err(err) => service_failure("submit_finance", err, service.document()),
    }
}

/// Marks the plan at `index` as being edited.
#[flutter_rust_bridge::frb(sync)]
pub fn planner_begin_edit(index: u32) -> PlannerResponse {
    let mut session = lock_session();
    let service = match open_service() {
        Ok(service) => service,
        Err(err) => return PlannerResponse::fatal(format!("planner_begin_edit failed: {err}")),
    };
    let index = index as usize;
    match service.document().finance.get(index) {
        Some(plan) => {
            session.begin_edit(index, plan.kind());
            PlannerResponse::success("Editing plan.", service.document())
        }
        None => PlannerResponse::rejected(
            format!("finance plan index {index} out of range"),
            service.document(),
        ),
    }
}

/// Clears the edit flags (form cancel).
#[flutter_rust_bridge::frb(sync)]
pub fn planner_cancel_edit() {
    lock_session().edit.reset();
}

/// Finance plan kind offered by the add form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinanceKindItem {
    /// Persisted `type` tag, e.g. `Savings Goal`.
    pub tag: String,
    pub description: String,
}

/// Lists plan kinds in form order with their explanations.
#[flutter_rust_bridge::frb(sync)]
pub fn planner_finance_kinds() -> Vec<FinanceKindItem> {
    FinancePlanKind::ALL
        .into_iter()
        .map(|kind| FinanceKindItem {
            tag: kind.tag().to_string(),
            description: kind.description().to_string(),
        })
        .collect()
}

/// SIP projection envelope for the chart.
#[derive(Debug, Clone, PartialEq)]
pub struct SipProjectionResponse {
    pub ok: bool,
    pub message: String,
    /// Cumulative value per month; empty when rejected.
    pub values: Vec<f64>,
    pub final_value: f64,
}

/// Month-by-month SIP value series.
///
/// # FFI contract
/// - `amount >= 0`, `rate` in `0..=20`, `years` in `1..=50`; anything else
///   is rejected with an empty series.
#[flutter_rust_bridge::frb(sync)]
pub fn planner_sip_projection(amount: f64, rate: f64, years: u32) -> SipProjectionResponse {
    if let Err(err) = SipPlan::check_inputs(amount, rate, years) {
        return SipProjectionResponse {
            ok: false,
            message: err.to_string(),
            values: Vec::new(),
            final_value: 0.0,
        };
    }
    SipProjectionResponse {
        ok: true,
        message: String::new(),
        values: sip_projection(amount, rate, years),
        final_value: sip_final_value(amount, rate, years),
    }
}

/// Savings goal progress in percent (0 for a zero target).
#[flutter_rust_bridge::frb(sync)]
pub fn planner_savings_goal_percent(target: f64, saved: f64) -> f64 {
    savings_goal_percent(target, saved)
}

/// Progress bar and status chart figures for one subject.
#[derive(Debug, Clone, PartialEq)]
pub struct SubjectProgressResponse {
    pub ok: bool,
    pub message: String,
    pub done: u32,
    pub total: u32,
    pub percent: f64,
    pub todo_count: u32,
    pub in_progress_count: u32,
    pub done_count: u32,
}

#[flutter_rust_bridge::frb(sync)]
pub fn planner_subject_progress(subject: String) -> SubjectProgressResponse {
    let _session = lock_session();
    let document = match open_service() {
        Ok(service) => service.into_document(),
        Err(err) => return subject_progress_failure(format!("subject_progress failed: {err}")),
    };
    let Some(tasks) = document.learning.get(&subject) else {
        return subject_progress_failure("subject not found".to_string());
    };

    let progress = subject_progress(tasks);
    let distribution = status_distribution(tasks);
    SubjectProgressResponse {
        ok: true,
        message: format!("{}/{} tasks done", progress.done, progress.total),
        done: to_u32(progress.done),
        total: to_u32(progress.total),
        percent: progress.percent,
        todo_count: to_u32(distribution.todo),
        in_progress_count: to_u32(distribution.in_progress),
        done_count: to_u32(distribution.done),
    }
}

/// One row of the daily goal checklist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyGoalItem {
    pub goal: String,
    pub done: bool,
}

/// Daily goal checklist snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyGoalsResponse {
    pub ok: bool,
    pub message: String,
    pub items: Vec<DailyGoalItem>,
    pub done: u32,
    pub total: u32,
    /// Completed fraction in `[0, 1]`.
    pub progress: f64,
}

#[flutter_rust_bridge::frb(sync)]
pub fn daily_goals_list() -> DailyGoalsResponse {
    daily_goals_snapshot(&lock_session(), "")
}

/// Adds an unchecked goal. Blank input is ignored.
#[flutter_rust_bridge::frb(sync)]
pub fn daily_goal_add(goal: String) -> DailyGoalsResponse {
    let mut session = lock_session();
    let goal = goal.trim();
    if goal.is_empty() {
        return daily_goals_snapshot(&session, "");
    }
    session.add_daily_goal(goal);
    daily_goals_snapshot(&session, "Goal added!")
}

#[flutter_rust_bridge::frb(sync)]
pub fn daily_goal_set_done(index: u32, done: bool) -> DailyGoalsResponse {
    let mut session = lock_session();
    match session.set_daily_goal_done(index as usize, done) {
        Ok(()) => daily_goals_snapshot(&session, ""),
        Err(err) => daily_goals_failure(&session, err.to_string()),
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn daily_goal_delete(index: u32) -> DailyGoalsResponse {
    let mut session = lock_session();
    match session.delete_daily_goal(index as usize) {
        Ok(_) => daily_goals_snapshot(&session, ""),
        Err(err) => daily_goals_failure(&session, err.to_string()),
    }
}

fn resolve_data_path() -> PathBuf {
    DATA_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var(DATA_PATH_ENV) {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            PathBuf::from(DEFAULT_DATA_FILE_NAME)
        })
        .clone()
}

fn open_service() -> Result<PlannerService<JsonFileStore>, ServiceError> {
    PlannerService::open(JsonFileStore::new(resolve_data_path()))
}

fn lock_session() -> MutexGuard<'static, Session> {
    SESSION
        .get_or_init(|| Mutex::new(Session::default()))
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
}

/// Blank subject or category names are ignored like blank daily goals.
fn is_blank_input(action: &PlannerAction) -> bool {
    match action {
        PlannerAction::AddSubject { name } | PlannerAction::SetBudgetCategory { name, .. } => {
            name.trim().is_empty()
        }
        _ => false,
    }
}

fn check_action_ranges(action: &PlannerAction) -> Result<(), FieldRangeError> {
    match action {
        PlannerAction::AddFinance { plan } | PlannerAction::UpdateFinance { plan, .. } => {
            plan.check_ranges()
        }
        PlannerAction::SetBudgetCategory { amount, .. } => {
            MonthlyBudget::check_category_amount(*amount)
        }
        _ => Ok(()),
    }
}

fn service_failure(name: &str, err: ServiceError, document: &Document) -> PlannerResponse {
    if err.is_recoverable() {
        PlannerResponse::rejected(err.to_string(), document)
    } else {
        PlannerResponse::fatal(format!("{name} failed: {err}"))
    }
}

fn action_message(name: &str, count: Option<usize>) -> String {
    match (name, count) {
        ("add_finance", _) => "Plan saved!".to_string(),
        ("update_finance", _) => "Plan updated!".to_string(),
        ("delete_finance", _) => "Deleted!".to_string(),
        ("add_subject", _) => "Subject added.".to_string(),
        ("delete_subject", _) => "Subject deleted!".to_string(),
        ("add_tasks", Some(count)) => format!("Added {count} tasks!"),
        ("set_budget_category", _) => "Category updated!".to_string(),
        ("delete_budget_category", _) => "Category deleted!".to_string(),
        _ => "Saved.".to_string(),
    }
}

fn subject_progress_failure(message: String) -> SubjectProgressResponse {
    SubjectProgressResponse {
        ok: false,
        message,
        done: 0,
        total: 0,
        percent: 0.0,
        todo_count: 0,
        in_progress_count: 0,
        done_count: 0,
    }
}

fn daily_goals_snapshot(session: &Session, message: &str) -> DailyGoalsResponse {
    DailyGoalsResponse {
        ok: true,
        message: message.to_string(),
        items: session
            .daily_goals
            .iter()
            .map(|goal| DailyGoalItem {
                goal: goal.goal.clone(),
                done: goal.done,
            })
            .collect(),
        done: to_u32(session.daily_goals_done()),
        total: to_u32(session.daily_goals.len()),
        progress: daily_goal_progress(&session.daily_goals),
    }
}

fn daily_goals_failure(session: &Session, message: String) -> DailyGoalsResponse {
    DailyGoalsResponse {
        ok: false,
        message,
        ..daily_goals_snapshot(session, "")
    }
}

fn to_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}
