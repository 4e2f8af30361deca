//! Configuration errors surface before any simulation step runs.

use chrono::{NaiveDate, NaiveDateTime};
use sc_app::{AppError, RunMode, RunProgressEvent, RunStage, run_scenario_with_progress};
use sc_app::{RunOptions, compare_scenario, run_scenario};
use sc_controls::{HandleKind, RuleSet};
use sc_project::schema::*;
use sc_results::MetricDef;

fn at(hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, 1)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}

fn scenario() -> Scenario {
    Scenario {
        version: LATEST_VERSION,
        name: "tank".to_string(),
        network: NetworkDef {
            start: at(0),
            end: at(1),
            routing_step_s: 30.0,
            nodes: vec![
                NodeDef {
                    id: "T".to_string(),
                    kind: NodeKindDef::Storage {
                        area_ft2: 500.0,
                        max_depth_ft: 5.0,
                        initial_depth_ft: 0.0,
                    },
                    inflow: Some(InflowDef {
                        base_cfs: 2.0,
                        hydrograph: vec![],
                    }),
                },
                NodeDef {
                    id: "OUT".to_string(),
                    kind: NodeKindDef::Outfall,
                    inflow: None,
                },
            ],
            links: vec![LinkDef {
                id: "G".to_string(),
                from: "T".to_string(),
                to: "OUT".to_string(),
                kind: LinkKindDef::Orifice {
                    area_ft2: 0.5,
                    discharge_coeff: 0.6,
                    offset_ft: 0.0,
                },
                initial_setting: 1.0,
            }],
        },
        controls: Some(RuleSet::new().with_baseline("G", 0.5)),
        run: RunDef::default(),
        summary: Some(vec![
            MetricDef::node_inflow("to outfall", "OUT"),
            MetricDef::flooding("flooding"),
        ]),
    }
}

fn collect(scenario: &Scenario, mode: RunMode) -> (Result<sc_app::RunReport, AppError>, Vec<RunProgressEvent>) {
    let mut events = Vec::new();
    let result = run_scenario_with_progress(
        scenario,
        mode,
        &RunOptions::default(),
        Some(&mut |event| events.push(event)),
    );
    (result, events)
}

#[test]
fn unknown_actuator_aborts_before_stepping() {
    let mut s = scenario();
    s.controls = Some(RuleSet::new().with_baseline("NO_SUCH_GATE", 0.0));

    let (result, events) = collect(&s, RunMode::Controlled);
    match result {
        Err(AppError::UnknownHandle { kind, name }) => {
            assert_eq!(kind, HandleKind::Link);
            assert_eq!(name, "NO_SUCH_GATE");
        }
        other => panic!("unexpected: {other:?}"),
    }
    assert!(events.iter().all(|e| e.stage != RunStage::Simulating));
}

#[test]
fn default_summary_needs_its_nodes() {
    let mut s = scenario();
    s.summary = None;
    assert!(matches!(
        run_scenario(&s, RunMode::Uncontrolled),
        Err(AppError::UnknownHandle { .. })
    ));
}

#[test]
fn controlled_run_requires_controls() {
    let mut s = scenario();
    s.controls = None;
    assert!(matches!(
        run_scenario(&s, RunMode::Controlled),
        Err(AppError::InvalidInput(_))
    ));
    assert!(compare_scenario(&s).is_err());
    assert!(run_scenario(&s, RunMode::Uncontrolled).is_ok());
}

#[test]
fn progress_reports_every_step() {
    let (result, events) = collect(&scenario(), RunMode::Controlled);
    let report = result.unwrap();

    let stages: Vec<_> = events.iter().map(|e| e.stage).collect();
    assert_eq!(stages.first(), Some(&RunStage::CompilingEngine));
    assert!(stages.contains(&RunStage::CompilingControls));
    assert_eq!(stages.last(), Some(&RunStage::Completed));

    let steps: Vec<_> = events.iter().filter_map(|e| e.step.as_ref()).collect();
    assert_eq!(steps.len(), report.steps);
    assert_eq!(steps[0].fraction_complete, 0.0);
    assert!(steps.windows(2).all(|w| w[0].fraction_complete < w[1].fraction_complete));
}

#[test]
fn report_file_written_on_request() {
    let path = std::env::temp_dir()
        .join("sc_app_report_test")
        .join("tank.json");
    let _ = std::fs::remove_file(&path);

    let options = RunOptions {
        report_path: Some(path.clone()),
        ..RunOptions::default()
    };
    let report =
        run_scenario_with_progress(&scenario(), RunMode::Uncontrolled, &options, None).unwrap();

    let written = sc_sim::SessionReport::read_json(&path).unwrap();
    assert_eq!(written.steps, report.steps);
}
