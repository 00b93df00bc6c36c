use planner_core::{
    Document, FinancePlan, MonthlyBudget, MoveDirection, PlannerError, SavingsGoal, SipPlan,
};

fn goal(name: &str) -> FinancePlan {
    FinancePlan::SavingsGoal(SavingsGoal {
        name: name.to_string(),
        target: 1_000.0,
        saved: 250.0,
    })
}

fn budget(name: &str) -> FinancePlan {
    FinancePlan::MonthlyBudget(MonthlyBudget {
        name: name.to_string(),
        income: 10_000.0,
        expenses: 7_000.0,
        categories: None,
    })
}

fn names(doc: &Document) -> Vec<&str> {
    doc.finance.iter().map(FinancePlan::name).collect()
}

fn doc_with(plans: &[&str]) -> Document {
    let mut doc = Document::default();
    for name in plans {
        doc.append_finance(goal(name));
    }
    doc
}

#[test]
fn move_finance_reversed_move_restores_order() {
    for index in 0..3 {
        for direction in [MoveDirection::Up, MoveDirection::Down] {
            let mut doc = doc_with(&["a", "b", "c"]);
            if !doc.move_finance(index, direction) {
                assert_eq!(names(&doc), vec!["a", "b", "c"]);
                continue;
            }
            let target = match direction {
                MoveDirection::Up => index - 1,
                MoveDirection::Down => index + 1,
            };
            assert!(doc.move_finance(target, direction.reversed()));
            assert_eq!(names(&doc), vec!["a", "b", "c"]);
        }
    }
}

#[test]
fn move_finance_is_noop_at_boundaries() {
    let mut doc = doc_with(&["a", "b", "c"]);
    assert!(!doc.move_finance(0, MoveDirection::Up));
    assert!(!doc.move_finance(2, MoveDirection::Down));
    assert_eq!(names(&doc), vec!["a", "b", "c"]);

    assert!(doc.move_finance(0, MoveDirection::Down));
    assert_eq!(names(&doc), vec!["b", "a", "c"]);
}

#[test]
fn delete_finance_shifts_later_plans() {
    let mut doc = doc_with(&["a", "b", "c"]);
    let removed = doc.delete_finance(1).unwrap();
    assert_eq!(removed.name(), "b");
    assert_eq!(names(&doc), vec!["a", "c"]);
}

#[test]
fn update_finance_can_change_plan_kind() {
    let mut doc = doc_with(&["a"]);
    let sip = FinancePlan::Sip(SipPlan {
        name: "a".to_string(),
        amount: 500.0,
        rate: 10.0,
        years: 3,
    });
    doc.update_finance(0, sip.clone()).unwrap();
    assert_eq!(doc.finance, vec![sip]);
}

#[test]
fn budget_categories_upsert_and_delete() {
    let mut doc = Document::default();
    doc.append_finance(goal("g"));
    let index = doc.append_finance(budget("Monthly"));

    doc.set_budget_category(index, "Rent", 6_000.0).unwrap();
    doc.set_budget_category(index, "Travel", 800.0).unwrap();
    doc.set_budget_category(index, "Rent", 5_500.0).unwrap();
    assert_eq!(doc.delete_budget_category(index, "Missing").unwrap(), None);
    assert_eq!(
        doc.delete_budget_category(index, "Travel").unwrap(),
        Some(800.0)
    );

    match &doc.finance[index] {
        FinancePlan::MonthlyBudget(plan) => {
            assert_eq!(plan.category_entries(), vec![("Rent", 5_500.0)]);
        }
        other => panic!("unexpected plan: {other:?}"),
    }

    assert_eq!(
        doc.set_budget_category(0, "Rent", 1.0).unwrap_err(),
        PlannerError::NotMonthlyBudget(0)
    );
    assert_eq!(
        doc.delete_budget_category(7, "Rent").unwrap_err(),
        PlannerError::FinanceIndexOutOfRange { index: 7, len: 2 }
    );
}

#[test]
fn headline_values_follow_plan_kind() {
    let sip = FinancePlan::Sip(SipPlan {
        name: "s".to_string(),
        amount: 1_000.0,
        rate: 12.0,
        years: 1,
    });
    let headline = sip.headline_value().unwrap();
    assert!((headline - 12_682.50).abs() < 0.01);

    assert_eq!(goal("g").headline_value(), Some(25.0));
    assert_eq!(budget("b").headline_value(), None);
}
