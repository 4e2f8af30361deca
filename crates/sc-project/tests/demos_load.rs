use std::path::Path;

#[test]
fn demos_load_and_validate() {
    let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos");
    let demos = ["hartfordville.yaml"];

    for name in demos {
        let path = root.join(name);
        let scenario = sc_project::load_yaml(&path)
            .unwrap_or_else(|e| panic!("Failed to load {}: {}", name, e));
        sc_project::validate_scenario(&scenario)
            .unwrap_or_else(|e| panic!("Failed to validate {}: {}", name, e));
    }
}

#[test]
fn hartfordville_contents() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos/hartfordville.yaml");
    let scenario = sc_project::load_yaml(&path).unwrap();

    assert_eq!(scenario.network.nodes.len(), 4);
    assert_eq!(scenario.network.links.len(), 4);
    assert_eq!(scenario.run.step_s, 300.0);

    let controls = scenario.controls.as_ref().unwrap();
    assert_eq!(controls.curves[0].curve.evaluate(5.0), 0.5);
    assert_eq!(controls.overrides[0].set.len(), 2);

    let summary = scenario.summary_def();
    assert_eq!(summary.last().unwrap().name, "FLOODING_VOLUME (KGal)");
    assert_eq!(summary.last().unwrap().scale, 1000.0);
}
