//! Scenario loading, saving, validation, and introspection.

use std::path::Path;

use sc_project::schema::{NodeKindDef, Scenario};

use crate::error::{AppError, AppResult};

/// Summary of a scenario for listing.
#[derive(Debug, Clone)]
pub struct ScenarioSummary {
    pub name: String,
    pub storage_count: usize,
    pub outfall_count: usize,
    pub link_count: usize,
    pub rule_count: usize,
    pub metric_count: usize,
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "json")
}

/// Load and validate a scenario from a YAML (or `.json`) file.
pub fn load_scenario(path: &Path) -> AppResult<Scenario> {
    let content = std::fs::read_to_string(path).map_err(|e| AppError::ScenarioFileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    let scenario: Scenario = if is_json(path) {
        serde_json::from_str(&content)
            .map_err(|e| AppError::Project(format!("Failed to parse scenario JSON: {}", e)))?
    } else {
        serde_yaml::from_str(&content)
            .map_err(|e| AppError::Project(format!("Failed to parse scenario YAML: {}", e)))?
    };

    validate_scenario(&scenario)?;
    Ok(scenario)
}

/// Save a scenario as YAML.
pub fn save_scenario(path: &Path, scenario: &Scenario) -> AppResult<()> {
    validate_scenario(scenario)?;
    let content = serde_yaml::to_string(scenario)
        .map_err(|e| AppError::Project(format!("Failed to serialize scenario: {}", e)))?;

    std::fs::write(path, content).map_err(|e| AppError::ScenarioFileWrite {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(())
}

pub fn validate_scenario(scenario: &Scenario) -> AppResult<()> {
    sc_project::validate_scenario(scenario)?;
    Ok(())
}

pub fn describe_scenario(scenario: &Scenario) -> ScenarioSummary {
    let nodes = &scenario.network.nodes;
    let storage_count = nodes
        .iter()
        .filter(|n| matches!(n.kind, NodeKindDef::Storage { .. }))
        .count();
    let rule_count = scenario.controls.as_ref().map_or(0, |c| {
        c.baseline.len() + c.time_windows.len() + c.curves.len() + c.overrides.len()
    });

    ScenarioSummary {
        name: scenario.name.clone(),
        storage_count,
        outfall_count: nodes.len() - storage_count,
        link_count: scenario.network.links.len(),
        rule_count,
        metric_count: scenario.summary_def().len(),
    }
}
