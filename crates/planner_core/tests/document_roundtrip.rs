use planner_core::{
    Document, DocumentStore, FinancePlan, JsonFileStore, MemoryStore, MonthlyBudget, SavingsGoal,
    SipPlan, StockExperiment, StoreError, Task, TaskStatus,
};

fn sample_document() -> Document {
    let mut doc = Document::default();
    doc.append_finance(FinancePlan::Sip(SipPlan {
        name: "Index fund".to_string(),
        amount: 1500.0,
        rate: 11.5,
        years: 10,
    }));
    let mut budget = MonthlyBudget {
        name: "Semester budget".to_string(),
        income: 18_000.0,
        expenses: 14_250.5,
        categories: None,
    };
    budget.set_category("Rent", 9_000.0);
    budget.set_category("Food", 4_000.0);
    doc.append_finance(FinancePlan::MonthlyBudget(budget));
    doc.append_finance(FinancePlan::MonthlyBudget(MonthlyBudget {
        name: "Summer".to_string(),
        income: 0.0,
        expenses: 0.0,
        categories: None,
    }));
    doc.append_finance(FinancePlan::SavingsGoal(SavingsGoal {
        name: "Laptop".to_string(),
        target: 60_000.0,
        saved: 12_500.0,
    }));
    doc.append_finance(FinancePlan::StockExperiment(StockExperiment {
        name: "First trade".to_string(),
        stock: "INFY".to_string(),
        invested: 5_000.0,
        result: 5_420.75,
    }));

    doc.add_subject("Physics").unwrap();
    doc.add_subject("Algorithms").unwrap();
    doc.add_tasks_text("Physics", "Kinematics\nOptics").unwrap();
    doc.add_tasks_text("Algorithms", "Graphs").unwrap();
    doc.learning["Physics"][1].status = TaskStatus::InProgress;
    doc.set_task_status("Algorithms", 0, true).unwrap();
    doc
}

#[test]
fn save_then_load_is_lossless_for_every_variant() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("planner_data.json"));
    let doc = sample_document();

    store.save(&doc).unwrap();
    let loaded = store.load().unwrap();
    assert_eq!(loaded, doc);

    store.save(&loaded).unwrap();
    assert_eq!(store.load().unwrap(), doc);
}

#[test]
fn wire_shape_uses_type_tags_and_status_labels() {
    let store = MemoryStore::new();
    store.save(&sample_document()).unwrap();
    let json: serde_json::Value = serde_json::from_str(&store.text().unwrap()).unwrap();

    assert_eq!(json["finance"][0]["type"], "SIP");
    assert_eq!(json["finance"][0]["years"], 10);
    assert_eq!(json["finance"][1]["type"], "Monthly Budget");
    assert_eq!(json["finance"][1]["categories"]["Rent"], 9_000.0);
    assert!(json["finance"][2].get("categories").is_none());
    assert_eq!(json["finance"][3]["type"], "Savings Goal");
    assert_eq!(json["finance"][4]["type"], "Stock Experiment");
    assert_eq!(json["finance"][4]["stock"], "INFY");

    assert_eq!(
        json["learning"]["Physics"],
        serde_json::json!([
            {"task": "Kinematics", "status": "ToDo"},
            {"task": "Optics", "status": "In Progress"}
        ])
    );
    assert_eq!(json["learning"]["Algorithms"][0]["status"], "Done");
}

#[test]
fn subject_and_category_order_survive_reload() {
    let store = MemoryStore::with_text(
        r#"{"finance":[{"type":"Monthly Budget","name":"B","income":1,"expenses":2,
            "categories":{"Zeta":1.0,"Alpha":2.0,"Mid":3.0}}],
            "learning":{"Zoology":[],"Art":[],"Maths":[]}}"#,
    );
    let doc = store.load().unwrap();
    assert_eq!(doc.subject_names(), vec!["Zoology", "Art", "Maths"]);

    store.save(&doc).unwrap();
    let reloaded = store.load().unwrap();
    assert_eq!(reloaded.subject_names(), vec!["Zoology", "Art", "Maths"]);
    match &reloaded.finance[0] {
        FinancePlan::MonthlyBudget(budget) => {
            let names: Vec<&str> = budget
                .category_entries()
                .into_iter()
                .map(|(name, _)| name)
                .collect();
            assert_eq!(names, vec!["Zeta", "Alpha", "Mid"]);
        }
        other => panic!("unexpected plan: {other:?}"),
    }
}

#[test]
fn foreign_fields_do_not_leak_into_saved_plans() {
    let store = MemoryStore::with_text(
        r#"{"finance":[{"type":"Savings Goal","name":"Bike","target":100,"saved":10,
            "amount":999,"stock":"X"}],"learning":{}}"#,
    );
    let doc = store.load().unwrap();
    store.save(&doc).unwrap();

    let json: serde_json::Value = serde_json::from_str(&store.text().unwrap()).unwrap();
    assert_eq!(
        json["finance"][0],
        serde_json::json!({"type": "Savings Goal", "name": "Bike", "target": 100.0, "saved": 10.0})
    );
}

#[test]
fn missing_top_level_keys_default_to_empty() {
    let doc = MemoryStore::with_text("{}").load().unwrap();
    assert_eq!(doc, Document::default());
}

#[test]
fn unknown_plan_type_is_a_parse_error() {
    let err = MemoryStore::with_text(r#"{"finance":[{"type":"Crypto","name":"x"}],"learning":{}}"#)
        .load()
        .unwrap_err();
    assert!(matches!(err, StoreError::Parse(_)), "unexpected error: {err}");
}

#[test]
fn task_constructor_matches_persisted_default() {
    let task: Task = serde_json::from_value(serde_json::json!({"task": "Read", "status": "ToDo"}))
        .unwrap();
    assert_eq!(task, Task::new("Read"));
}
