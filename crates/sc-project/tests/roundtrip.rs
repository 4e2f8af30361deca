use chrono::{NaiveDate, NaiveDateTime};
use sc_controls::{ControlCurve, MonitoredRef, RuleSet};
use sc_project::schema::*;
use sc_project::{load_json, load_yaml, save_json, save_yaml, validate_scenario};

fn at(hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, 1)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}

fn scenario() -> Scenario {
    Scenario {
        version: LATEST_VERSION,
        name: "two pools".to_string(),
        network: NetworkDef {
            start: at(0),
            end: at(6),
            routing_step_s: 30.0,
            nodes: vec![
                NodeDef {
                    id: "J1".to_string(),
                    kind: NodeKindDef::Storage {
                        area_ft2: 1000.0,
                        max_depth_ft: 8.0,
                        initial_depth_ft: 1.0,
                    },
                    inflow: Some(InflowDef {
                        base_cfs: 0.5,
                        hydrograph: vec![(0.0, 0.0), (2.0, 10.0), (4.0, 0.0)],
                    }),
                },
                NodeDef {
                    id: "OUT".to_string(),
                    kind: NodeKindDef::Outfall,
                    inflow: None,
                },
            ],
            links: vec![LinkDef {
                id: "G1".to_string(),
                from: "J1".to_string(),
                to: "OUT".to_string(),
                kind: LinkKindDef::Orifice {
                    area_ft2: 1.0,
                    discharge_coeff: 0.6,
                    offset_ft: 0.0,
                },
                initial_setting: 1.0,
            }],
        },
        controls: Some(RuleSet::new().with_curve(
            "G1",
            MonitoredRef::node_depth("J1"),
            ControlCurve::new(vec![0.0, 3.0, 5.0], vec![0.0, 0.0, 1.0]).unwrap(),
        )),
        run: RunDef {
            record: vec![MonitoredRef::link_flow("G1")],
            ..RunDef::default()
        },
        summary: None,
    }
}

#[test]
fn roundtrip_yaml() {
    let scenario = scenario();
    validate_scenario(&scenario).unwrap();

    let path = std::env::temp_dir().join("sc_project_roundtrip.yaml");
    save_yaml(&path, &scenario).unwrap();
    let loaded = load_yaml(&path).unwrap();

    assert_eq!(scenario, loaded);
}

#[test]
fn roundtrip_json() {
    let scenario = scenario();
    let path = std::env::temp_dir().join("sc_project_roundtrip.json");
    save_json(&path, &scenario).unwrap();
    let loaded = load_json(&path).unwrap();

    assert_eq!(scenario, loaded);
}

#[test]
fn minimal_yaml_uses_defaults() {
    let yaml = r#"
version: 1
name: minimal
network:
  start: "2024-06-01T00:00:00"
  end: "2024-06-01T01:00:00"
  nodes:
    - id: T
      kind: { type: Storage, area_ft2: 100.0, max_depth_ft: 5.0 }
"#;
    let scenario: Scenario = serde_yaml::from_str(yaml).unwrap();
    validate_scenario(&scenario).unwrap();

    assert_eq!(scenario.network.routing_step_s, 30.0);
    assert_eq!(scenario.run, RunDef::default());
    assert!(scenario.controls.is_none());
    assert_eq!(scenario.summary_def().len(), 8);
}

#[test]
fn malformed_curve_is_rejected_on_load() {
    let yaml = r#"
version: 1
name: bad curve
network:
  start: "2024-06-01T00:00:00"
  end: "2024-06-01T01:00:00"
controls:
  curves:
    - actuator: G1
      input: { type: NodeDepth, node_id: J1 }
      curve: { xs: [0.0, 3.0], ys: [0.0] }
"#;
    let path = std::env::temp_dir().join("sc_project_bad_curve.yaml");
    std::fs::write(&path, yaml).unwrap();
    let err = load_yaml(&path).unwrap_err();
    assert!(matches!(err, sc_project::ProjectError::Yaml(_)));
}
