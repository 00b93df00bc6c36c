//! Finance plan domain model.
//!
//! # Responsibility
//! - Define the four finance plan variants and their wire shape.
//! - Provide in-place helpers for budget category allocation.
//!
//! # Invariants
//! - Every plan carries exactly the fields of its `type` tag.
//! - Unknown fields in persisted input are dropped on load and never
//!   re-serialized.
//! - `categories` is omitted from JSON until the first category is set.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Wire tag values for `FinancePlan::type`.
pub const SIP_TAG: &str = "SIP";
pub const MONTHLY_BUDGET_TAG: &str = "Monthly Budget";
pub const SAVINGS_GOAL_TAG: &str = "Savings Goal";
pub const STOCK_EXPERIMENT_TAG: &str = "Stock Experiment";

/// Shortest and longest SIP duration the forms accept, in years.
pub const SIP_YEARS_RANGE: (u32, u32) = (1, 50);
/// Highest expected annual SIP return the forms accept, in percent.
pub const SIP_MAX_RATE: f64 = 20.0;

/// A form field outside its accepted range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldRangeError {
    pub field: &'static str,
    pub value: f64,
    pub min: f64,
    pub max: Option<f64>,
}

impl Display for FieldRangeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.max {
            Some(max) => write!(
                f,
                "{} must be between {} and {}, got {}",
                self.field, self.min, max, self.value
            ),
            None => write!(f, "{} must be at least {}, got {}", self.field, self.min, self.value),
        }
    }
}

impl Error for FieldRangeError {}

/// Rejects NaN and values outside `min..=max`.
fn check_field(
    field: &'static str,
    value: f64,
    min: f64,
    max: Option<f64>,
) -> Result<(), FieldRangeError> {
    let above_max = max.is_some_and(|max| value > max);
    if value.is_nan() || value < min || above_max {
        return Err(FieldRangeError {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}

fn check_amount(field: &'static str, value: f64) -> Result<(), FieldRangeError> {
    check_field(field, value, 0.0, None)
}

/// Discriminant of a finance plan without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FinancePlanKind {
    #[serde(rename = "SIP")]
    Sip,
    #[serde(rename = "Monthly Budget")]
    MonthlyBudget,
    #[serde(rename = "Savings Goal")]
    SavingsGoal,
    #[serde(rename = "Stock Experiment")]
    StockExperiment,
}

impl FinancePlanKind {
    /// All kinds in form display order.
    pub const ALL: [FinancePlanKind; 4] = [
        FinancePlanKind::Sip,
        FinancePlanKind::MonthlyBudget,
        FinancePlanKind::SavingsGoal,
        FinancePlanKind::StockExperiment,
    ];

    /// Returns the persisted `type` tag.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Sip => SIP_TAG,
            Self::MonthlyBudget => MONTHLY_BUDGET_TAG,
            Self::SavingsGoal => SAVINGS_GOAL_TAG,
            Self::StockExperiment => STOCK_EXPERIMENT_TAG,
        }
    }

    /// Parses a persisted `type` tag.
    pub fn from_tag(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.tag() == value)
    }

    /// Short explanation shown next to the add form for this kind.
    pub fn description(self) -> &'static str {
        match self {
            Self::Sip => {
                "Systematic Investment Plan (SIP): Invest a fixed amount regularly to grow your savings."
            }
            Self::MonthlyBudget => "Plan your monthly expenses and income.",
            Self::SavingsGoal => "Set a target amount and track your progress.",
            Self::StockExperiment => "Simulate stock investments and track results.",
        }
    }
}

/// Systematic investment plan: fixed monthly contribution at an annual rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SipPlan {
    pub name: String,
    /// Monthly contribution, non-negative.
    pub amount: f64,
    /// Expected annual return in percent, 0..=20.
    pub rate: f64,
    /// Duration in years, 1..=50.
    pub years: u32,
}

impl SipPlan {
    /// Checks SIP inputs before they reach a projection.
    ///
    /// `amount >= 0`, `rate` in `0..=20`, `years` in `1..=50`.
    pub fn check_inputs(amount: f64, rate: f64, years: u32) -> Result<(), FieldRangeError> {
        let (min_years, max_years) = SIP_YEARS_RANGE;
        check_amount("amount", amount)?;
        check_field("rate", rate, 0.0, Some(SIP_MAX_RATE))?;
        check_field(
            "years",
            f64::from(years),
            f64::from(min_years),
            Some(f64::from(max_years)),
        )
    }
}

/// Monthly income/expense plan with optional category allocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyBudget {
    pub name: String,
    pub income: f64,
    pub expenses: f64,
    /// Category name -> allocated amount, in insertion order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<IndexMap<String, f64>>,
}

impl MonthlyBudget {
    /// Category allocations must be non-negative.
    pub fn check_category_amount(amount: f64) -> Result<(), FieldRangeError> {
        check_amount("category amount", amount)
    }

    /// Upserts one category allocation, creating the mapping when absent.
    ///
    /// An existing category keeps its position; a new one is appended.
    pub fn set_category(&mut self, name: impl Into<String>, amount: f64) {
        self.categories
            .get_or_insert_with(IndexMap::new)
            .insert(name.into(), amount);
    }

    /// Removes one category allocation if present.
    ///
    /// Remaining categories keep their relative order.
    pub fn remove_category(&mut self, name: &str) -> Option<f64> {
        self.categories
            .as_mut()
            .and_then(|categories| categories.shift_remove(name))
    }

    /// Returns category allocations in display order (empty when unset).
    pub fn category_entries(&self) -> Vec<(&str, f64)> {
        self.categories
            .iter()
            .flatten()
            .map(|(name, amount)| (name.as_str(), *amount))
            .collect()
    }
}

/// Target amount with progress so far.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsGoal {
    pub name: String,
    pub target: f64,
    pub saved: f64,
}

/// Simulated stock position: amount put in versus current value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockExperiment {
    pub name: String,
    pub stock: String,
    pub invested: f64,
    /// Current value of the position.
    pub result: f64,
}

/// One finance-tracking record, tagged on the wire by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum FinancePlan {
    #[serde(rename = "SIP")]
    Sip(SipPlan),
    #[serde(rename = "Monthly Budget")]
    MonthlyBudget(MonthlyBudget),
    #[serde(rename = "Savings Goal")]
    SavingsGoal(SavingsGoal),
    #[serde(rename = "Stock Experiment")]
    StockExperiment(StockExperiment),
}

impl FinancePlan {
    pub fn kind(&self) -> FinancePlanKind {
        match self {
            Self::Sip(_) => FinancePlanKind::Sip,
            Self::MonthlyBudget(_) => FinancePlanKind::MonthlyBudget,
            Self::SavingsGoal(_) => FinancePlanKind::SavingsGoal,
            Self::StockExperiment(_) => FinancePlanKind::StockExperiment,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Sip(plan) => &plan.name,
            Self::MonthlyBudget(plan) => &plan.name,
            Self::SavingsGoal(plan) => &plan.name,
            Self::StockExperiment(plan) => &plan.name,
        }
    }

    /// Display heading, e.g. `Savings Goal: Laptop`.
    pub fn label(&self) -> String {
        format!("{}: {}", self.kind().tag(), self.name())
    }

    /// Checks every numeric field against the add/edit form ranges.
    pub fn check_ranges(&self) -> Result<(), FieldRangeError> {
        match self {
            Self::Sip(plan) => SipPlan::check_inputs(plan.amount, plan.rate, plan.years),
            Self::MonthlyBudget(budget) => {
                check_amount("income", budget.income)?;
                check_amount("expenses", budget.expenses)?;
                budget
                    .category_entries()
                    .into_iter()
                    .try_for_each(|(_, amount)| MonthlyBudget::check_category_amount(amount))
            }
            Self::SavingsGoal(goal) => {
                check_amount("target", goal.target)?;
                check_amount("saved", goal.saved)
            }
            Self::StockExperiment(experiment) => {
                check_amount("invested", experiment.invested)?;
                check_amount("result", experiment.result)
            }
        }
    }

    /// Returns the budget payload when this plan is a monthly budget.
    pub fn as_budget_mut(&mut self) -> Option<&mut MonthlyBudget> {
        match self {
            Self::MonthlyBudget(budget) => Some(budget),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{FinancePlan, FinancePlanKind, MonthlyBudget, SavingsGoal, SipPlan};

    fn budget() -> MonthlyBudget {
        MonthlyBudget {
            name: "October".to_string(),
            income: 20_000.0,
            expenses: 12_000.0,
            categories: None,
        }
    }

    #[test]
    fn kind_tags_round_trip() {
        for kind in FinancePlanKind::ALL {
            assert_eq!(FinancePlanKind::from_tag(kind.tag()), Some(kind));
        }
        assert_eq!(FinancePlanKind::from_tag("Crypto"), None);
    }

    #[test]
    fn set_category_creates_mapping_and_upserts_in_place() {
        let mut budget = budget();
        budget.set_category("Rent", 8_000.0);
        budget.set_category("Food", 3_000.0);
        budget.set_category("Rent", 7_500.0);

        assert_eq!(
            budget.category_entries(),
            vec![("Rent", 7_500.0), ("Food", 3_000.0)]
        );
    }

    #[test]
    fn remove_category_keeps_order_and_ignores_unknown() {
        let mut budget = budget();
        assert_eq!(budget.remove_category("Rent"), None);

        budget.set_category("Rent", 8_000.0);
        budget.set_category("Food", 3_000.0);
        budget.set_category("Books", 500.0);
        assert_eq!(budget.remove_category("Food"), Some(3_000.0));
        assert_eq!(
            budget.category_entries(),
            vec![("Rent", 8_000.0), ("Books", 500.0)]
        );
    }

    #[test]
    fn label_uses_type_tag_and_name() {
        let plan = FinancePlan::SavingsGoal(SavingsGoal {
            name: "Laptop".to_string(),
            target: 60_000.0,
            saved: 15_000.0,
        });
        assert_eq!(plan.label(), "Savings Goal: Laptop");
    }

    #[test]
    fn sip_inputs_are_bounded() {
        assert!(SipPlan::check_inputs(1_000.0, 12.0, 1).is_ok());
        assert!(SipPlan::check_inputs(0.0, 0.0, 50).is_ok());

        let err = SipPlan::check_inputs(1.0, 1.0, u32::MAX).unwrap_err();
        assert_eq!(err.field, "years");
        assert_eq!(SipPlan::check_inputs(1.0, 1.0, 0).unwrap_err().field, "years");
        assert_eq!(SipPlan::check_inputs(1.0, 20.5, 5).unwrap_err().field, "rate");
        assert_eq!(SipPlan::check_inputs(-1.0, 5.0, 5).unwrap_err().field, "amount");
        assert_eq!(
            SipPlan::check_inputs(f64::NAN, 5.0, 5).unwrap_err().field,
            "amount"
        );
    }

    #[test]
    fn check_ranges_covers_budget_categories() {
        let mut plan = FinancePlan::MonthlyBudget(budget());
        assert!(plan.check_ranges().is_ok());

        plan.as_budget_mut().unwrap().set_category("Rent", -5.0);
        let err = plan.check_ranges().unwrap_err();
        assert_eq!(err.field, "category amount");
        assert_eq!(err.to_string(), "category amount must be at least 0, got -5");
    }
}
