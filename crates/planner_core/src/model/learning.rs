//! Learning task domain model.
//!
//! # Invariants
//! - New tasks start as `TaskStatus::Todo`.
//! - Subject names are unique keys; see `Document::learning`.

use serde::{Deserialize, Serialize};

/// Three-valued task lifecycle state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    #[default]
    #[serde(rename = "ToDo")]
    Todo,
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(rename = "Done")]
    Done,
}

impl TaskStatus {
    /// All statuses in chart order.
    pub const ALL: [TaskStatus; 3] = [TaskStatus::Todo, TaskStatus::InProgress, TaskStatus::Done];

    /// Persisted label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Todo => "ToDo",
            Self::InProgress => "In Progress",
            Self::Done => "Done",
        }
    }

    /// Maps a checkbox value onto a status.
    ///
    /// Only `Done` and `Todo` are reachable: unchecking an `InProgress` task
    /// yields `Todo`, so the third state is lost.
    pub fn from_checked(done: bool) -> Self {
        if done {
            Self::Done
        } else {
            Self::Todo
        }
    }
}

/// One learning item under a subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub task: String,
    pub status: TaskStatus,
}

impl Task {
    /// Creates a task with default `Todo` status.
    pub fn new(task: impl Into<String>) -> Self {
        Self {
            task: task.into(),
            status: TaskStatus::Todo,
        }
    }

    pub fn is_done(&self) -> bool {
        self.status == TaskStatus::Done
    }
}

/// Splits free-form input into task texts.
///
/// Any of `\n`, `\r\n` or a bare `\r` ends a line. Lines are trimmed and
/// blank lines are dropped.
pub fn parse_task_lines(text: &str) -> Vec<String> {
    text.split(['\n', '\r'])
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{parse_task_lines, Task, TaskStatus};

    #[test]
    fn new_task_defaults_to_todo() {
        let task = Task::new("Read chapter 3");
        assert_eq!(task.status, TaskStatus::Todo);
        assert!(!task.is_done());
    }

    #[test]
    fn parse_task_lines_trims_and_drops_blanks() {
        let lines = parse_task_lines("a\n\n  b  \r\n\t\n");
        assert_eq!(lines, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn parse_task_lines_splits_on_bare_carriage_return() {
        let lines = parse_task_lines("Limits\rDerivatives\r\rIntegrals");
        assert_eq!(lines, vec!["Limits", "Derivatives", "Integrals"]);
    }

    #[test]
    fn status_serializes_with_display_labels() {
        for status in TaskStatus::ALL {
            let json = serde_json::to_value(status).unwrap();
            assert_eq!(json, status.label());
        }
    }
}
