use sc_app::{RunMode, compare_scenario, list_runs, load_run, load_scenario, save_run};

#[test]
fn summaries_persist_next_to_scenario() {
    let source = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos/hartfordville.yaml");
    let dir = std::env::temp_dir().join("sc_app_persistence");
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    let scenario_path = dir.join("hartfordville.yaml");
    std::fs::copy(&source, &scenario_path).unwrap();

    let scenario = load_scenario(&scenario_path).unwrap();
    let report = compare_scenario(&scenario).unwrap();

    let saved = save_run(&scenario_path, &scenario, &report.controlled).unwrap();
    assert!(saved.starts_with(dir.join(".sewerctl").join("runs")));
    save_run(&scenario_path, &scenario, &report.uncontrolled).unwrap();

    let runs = list_runs(&scenario_path, &scenario).unwrap();
    assert_eq!(runs.len(), 2);

    let stored = load_run(&scenario_path, &report.controlled.run_id).unwrap();
    assert_eq!(stored.manifest.mode, RunMode::Controlled);
    assert_eq!(stored.summary, report.controlled.summary);
}
