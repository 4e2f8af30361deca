use chrono::{NaiveDate, NaiveDateTime};
use sc_controls::{Comparison, Condition, MonitoredRef, RuleSet, Setting};
use sc_project::schema::*;
use sc_project::{ValidationError, validate_scenario};
use sc_results::MetricDef;

fn at(hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, 1)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}

fn storage(id: &str) -> NodeDef {
    NodeDef {
        id: id.to_string(),
        kind: NodeKindDef::Storage {
            area_ft2: 1000.0,
            max_depth_ft: 8.0,
            initial_depth_ft: 0.0,
        },
        inflow: None,
    }
}

fn outfall(id: &str) -> NodeDef {
    NodeDef {
        id: id.to_string(),
        kind: NodeKindDef::Outfall,
        inflow: None,
    }
}

fn gate(id: &str, from: &str, to: &str) -> LinkDef {
    LinkDef {
        id: id.to_string(),
        from: from.to_string(),
        to: to.to_string(),
        kind: LinkKindDef::Orifice {
            area_ft2: 1.0,
            discharge_coeff: 0.6,
            offset_ft: 0.0,
        },
        initial_setting: 1.0,
    }
}

fn base() -> Scenario {
    Scenario {
        version: LATEST_VERSION,
        name: "validation".to_string(),
        network: NetworkDef {
            start: at(0),
            end: at(4),
            routing_step_s: 30.0,
            nodes: vec![storage("J1"), outfall("OUT")],
            links: vec![gate("G1", "J1", "OUT")],
        },
        controls: None,
        run: RunDef::default(),
        summary: None,
    }
}

#[test]
fn base_is_valid() {
    validate_scenario(&base()).unwrap();
}

#[test]
fn rejects_unknown_version() {
    let mut s = base();
    s.version = LATEST_VERSION + 1;
    assert!(matches!(
        validate_scenario(&s),
        Err(ValidationError::UnsupportedVersion { .. })
    ));
}

#[test]
fn rejects_duplicate_nodes_and_links() {
    let mut s = base();
    s.network.nodes.push(storage("J1"));
    assert!(matches!(
        validate_scenario(&s),
        Err(ValidationError::DuplicateId { .. })
    ));

    let mut s = base();
    s.network.links.push(gate("G1", "J1", "OUT"));
    assert!(matches!(
        validate_scenario(&s),
        Err(ValidationError::DuplicateId { .. })
    ));
}

#[test]
fn rejects_dangling_link_endpoints() {
    let mut s = base();
    s.network.links.push(gate("G2", "J1", "NOWHERE"));
    match validate_scenario(&s) {
        Err(ValidationError::MissingReference { id, .. }) => assert_eq!(id, "NOWHERE"),
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn rejects_links_leaving_outfalls() {
    let mut s = base();
    s.network.links.push(gate("BACK", "OUT", "J1"));
    assert!(matches!(
        validate_scenario(&s),
        Err(ValidationError::InvalidValue { .. })
    ));
}

#[test]
fn rejects_bad_timing_and_geometry() {
    let mut s = base();
    s.network.end = s.network.start;
    assert!(validate_scenario(&s).is_err());

    let mut s = base();
    s.run.step_s = 0.0;
    assert!(validate_scenario(&s).is_err());

    let mut s = base();
    s.network.nodes[0].kind = NodeKindDef::Storage {
        area_ft2: 1000.0,
        max_depth_ft: 8.0,
        initial_depth_ft: 9.0,
    };
    assert!(validate_scenario(&s).is_err());

    let mut s = base();
    s.network.nodes[0].inflow = Some(InflowDef {
        base_cfs: 0.0,
        hydrograph: vec![(2.0, 1.0), (1.0, 0.0)],
    });
    assert!(validate_scenario(&s).is_err());
}

#[test]
fn rejects_controls_on_unknown_elements() {
    let mut s = base();
    s.controls = Some(RuleSet::new().with_baseline("MISSING_GATE", 0.0));
    match validate_scenario(&s) {
        Err(ValidationError::MissingReference { id, context }) => {
            assert_eq!(id, "MISSING_GATE");
            assert!(context.contains("actuator"));
        }
        other => panic!("unexpected: {other:?}"),
    }

    let mut s = base();
    s.controls = Some(RuleSet::new().with_override(
        Condition {
            input: MonitoredRef::node_depth("MISSING_NODE"),
            comparison: Comparison::Above,
            threshold: 7.0,
        },
        vec![Setting::new("G1", 1.0)],
    ));
    assert!(matches!(
        validate_scenario(&s),
        Err(ValidationError::MissingReference { .. })
    ));
}

#[test]
fn link_inputs_must_name_links() {
    let mut s = base();
    // J1 is a node, not a link
    s.run.record = vec![MonitoredRef::link_flow("J1")];
    assert!(matches!(
        validate_scenario(&s),
        Err(ValidationError::MissingReference { .. })
    ));
}

#[test]
fn rejects_non_finite_settings() {
    let mut s = base();
    s.controls = Some(RuleSet::new().with_baseline("G1", f64::NAN));
    assert!(matches!(
        validate_scenario(&s),
        Err(ValidationError::InvalidValue { .. })
    ));
}

#[test]
fn summary_metrics_must_resolve() {
    let mut s = base();
    s.summary = Some(vec![
        MetricDef::node_inflow("to plant", "OUT"),
        MetricDef::flooding("flooding").scaled(1000.0),
    ]);
    validate_scenario(&s).unwrap();

    s.summary = Some(vec![MetricDef::node_inflow("CSO3", "CSO3")]);
    assert!(matches!(
        validate_scenario(&s),
        Err(ValidationError::MissingReference { .. })
    ));

    s.summary = Some(vec![
        MetricDef::flooding("flooding"),
        MetricDef::flooding("flooding"),
    ]);
    assert!(matches!(
        validate_scenario(&s),
        Err(ValidationError::DuplicateId { .. })
    ));
}
