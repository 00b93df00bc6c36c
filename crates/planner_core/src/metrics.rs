//! Pure derived figures for charts and progress bars.
//!
//! # Invariants
//! - Nothing here mutates a document.
//! - Percentages guard their denominator and return `0.0` for empty input.

use crate::model::finance::{FinancePlan, SavingsGoal};
use crate::model::learning::{Task, TaskStatus};
use crate::model::session::DailyGoal;

/// Month-by-month cumulative SIP value.
///
/// Produces `years * 12` values where each month is
/// `previous * (1 + rate / 12 / 100) + amount`, starting from zero.
/// Allocates one value per month; check caller input with
/// `SipPlan::check_inputs` first.
pub fn sip_projection(amount: f64, rate: f64, years: u32) -> Vec<f64> {
    let growth = monthly_growth(rate);
    (0..months(years))
        .scan(0.0, |total, _| {
            *total = *total * growth + amount;
            Some(*total)
        })
        .collect()
}

/// Projected value at the end of the plan, `0.0` for a zero-length plan.
///
/// Folds without collecting the series, so any stored plan can be shown.
pub fn sip_final_value(amount: f64, rate: f64, years: u32) -> f64 {
    let growth = monthly_growth(rate);
    (0..months(years)).fold(0.0, |total, _| total * growth + amount)
}

fn monthly_growth(rate: f64) -> f64 {
    1.0 + rate / 12.0 / 100.0
}

fn months(years: u32) -> u64 {
    u64::from(years) * 12
}

/// `saved / target * 100`, or `0.0` when `target` is not positive.
pub fn savings_goal_percent(target: f64, saved: f64) -> f64 {
    if target > 0.0 {
        saved / target * 100.0
    } else {
        0.0
    }
}

/// Share of `Done` tasks in percent, `0.0` for an empty subject.
pub fn task_completion_percent(tasks: &[Task]) -> f64 {
    let total = tasks.len();
    if total == 0 {
        return 0.0;
    }
    let done = tasks.iter().filter(|task| task.is_done()).count();
    done as f64 / total as f64 * 100.0
}

/// Checked share of daily goals as a fraction in `[0, 1]`.
pub fn daily_goal_progress(goals: &[DailyGoal]) -> f64 {
    if goals.is_empty() {
        return 0.0;
    }
    let done = goals.iter().filter(|goal| goal.done).count();
    done as f64 / goals.len() as f64
}

/// Task count per status; every status is present, zero-filled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusDistribution {
    pub todo: usize,
    pub in_progress: usize,
    pub done: usize,
}

impl StatusDistribution {
    pub fn count(&self, status: TaskStatus) -> usize {
        match status {
            TaskStatus::Todo => self.todo,
            TaskStatus::InProgress => self.in_progress,
            TaskStatus::Done => self.done,
        }
    }

    /// `(status, count)` pairs in chart order.
    pub fn entries(&self) -> [(TaskStatus, usize); 3] {
        TaskStatus::ALL.map(|status| (status, self.count(status)))
    }

    pub fn total(&self) -> usize {
        self.todo + self.in_progress + self.done
    }
}

pub fn status_distribution(tasks: &[Task]) -> StatusDistribution {
    tasks
        .iter()
        .fold(StatusDistribution::default(), |mut acc, task| {
            match task.status {
                TaskStatus::Todo => acc.todo += 1,
                TaskStatus::InProgress => acc.in_progress += 1,
                TaskStatus::Done => acc.done += 1,
            }
            acc
        })
}

/// Progress bar figures for one subject.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubjectProgress {
    pub done: usize,
    pub total: usize,
    pub percent: f64,
}

pub fn subject_progress(tasks: &[Task]) -> SubjectProgress {
    SubjectProgress {
        done: tasks.iter().filter(|task| task.is_done()).count(),
        total: tasks.len(),
        percent: task_completion_percent(tasks),
    }
}

impl SavingsGoal {
    pub fn percent(&self) -> f64 {
        savings_goal_percent(self.target, self.saved)
    }
}

impl FinancePlan {
    /// Headline figure rendered under a plan, if the kind has one.
    ///
    /// - SIP: projected final value.
    /// - Savings goal: percent of target saved.
    /// - Stock experiment: current value minus invested amount.
    pub fn headline_value(&self) -> Option<f64> {
        match self {
            Self::Sip(plan) => Some(sip_final_value(plan.amount, plan.rate, plan.years)),
            Self::SavingsGoal(goal) => Some(goal.percent()),
            Self::StockExperiment(experiment) => Some(experiment.result - experiment.invested),
            Self::MonthlyBudget(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        daily_goal_progress, savings_goal_percent, sip_final_value, sip_projection,
        status_distribution, subject_progress, task_completion_percent,
    };
    use crate::model::learning::{Task, TaskStatus};
    use crate::model::session::DailyGoal;

    fn task(status: TaskStatus) -> Task {
        Task {
            task: "t".to_string(),
            status,
        }
    }

    #[test]
    fn sip_projection_follows_monthly_compounding() {
        let values = sip_projection(1000.0, 12.0, 1);
        assert_eq!(values.len(), 12);
        assert!((values[0] - 1000.0).abs() < 1e-9);
        assert!((values[1] - 2010.0).abs() < 1e-9);

        let mut prev = 0.0;
        for value in &values {
            assert!((value - (prev * 1.01 + 1000.0)).abs() < 1e-9);
            assert!(*value > prev);
            prev = *value;
        }
        assert!((values[11] - 12_682.50).abs() < 0.01);
    }

    #[test]
    fn sip_projection_is_repeatable_and_zero_rate_is_linear() {
        assert_eq!(sip_projection(500.0, 8.5, 3), sip_projection(500.0, 8.5, 3));
        assert_eq!(sip_final_value(100.0, 0.0, 2), 2_400.0);
        assert_eq!(sip_final_value(100.0, 5.0, 0), 0.0);
    }

    #[test]
    fn savings_goal_percent_guards_zero_target() {
        assert_eq!(savings_goal_percent(0.0, 50.0), 0.0);
        assert_eq!(savings_goal_percent(200.0, 50.0), 25.0);
    }

    #[test]
    fn completion_and_distribution_cover_all_statuses() {
        let tasks = vec![
            task(TaskStatus::Done),
            task(TaskStatus::Todo),
            task(TaskStatus::Done),
            task(TaskStatus::InProgress),
        ];
        assert_eq!(task_completion_percent(&tasks), 50.0);
        assert_eq!(task_completion_percent(&[]), 0.0);

        let distribution = status_distribution(&tasks);
        assert_eq!(
            distribution.entries(),
            [
                (TaskStatus::Todo, 1),
                (TaskStatus::InProgress, 1),
                (TaskStatus::Done, 2)
            ]
        );
        assert_eq!(distribution.total(), 4);

        let empty = status_distribution(&[]);
        assert_eq!(empty.entries().map(|(_, count)| count), [0, 0, 0]);

        let progress = subject_progress(&tasks);
        assert_eq!((progress.done, progress.total), (2, 4));
    }

    #[test]
    fn daily_goal_progress_is_fraction() {
        assert_eq!(daily_goal_progress(&[]), 0.0);
        let goals = vec![
            DailyGoal {
                goal: "a".to_string(),
                done: true,
            },
            DailyGoal {
                goal: "b".to_string(),
                done: false,
            },
        ];
        assert_eq!(daily_goal_progress(&goals), 0.5);
    }
}
