//! Scenario validation logic.

use std::collections::HashSet;

use sc_controls::{ControlCurve, HandleKind, MonitoredRef, RuleSet};

use crate::schema::{
    InflowDef, LATEST_VERSION, LinkDef, LinkKindDef, NetworkDef, NodeDef, NodeKindDef, RunDef,
    Scenario,
};

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Duplicate ID: {id} in {context}")]
    DuplicateId { id: String, context: String },

    #[error("Missing reference: {id} in {context}")]
    MissingReference { id: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

pub fn validate_scenario(scenario: &Scenario) -> Result<(), ValidationError> {
    if scenario.version == 0 || scenario.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: scenario.version,
        });
    }

    let names = validate_network(&scenario.network)?;
    validate_run(&scenario.run, &names)?;

    if let Some(controls) = &scenario.controls {
        validate_controls(controls, &names)?;
    }

    if let Some(summary) = &scenario.summary {
        let mut metric_names = HashSet::new();
        for metric in summary {
            if !metric_names.insert(&metric.name) {
                return Err(ValidationError::DuplicateId {
                    id: metric.name.clone(),
                    context: "summary metrics".to_string(),
                });
            }
            validate_finite(&format!("metric '{}' scale", metric.name), metric.scale)?;
            if let Some(node) = metric.node()
                && !names.nodes.contains(node)
            {
                return Err(ValidationError::MissingReference {
                    id: node.to_string(),
                    context: format!("summary metric '{}'", metric.name),
                });
            }
        }
    }

    Ok(())
}

/// Element names declared by a network.
struct Names<'a> {
    nodes: HashSet<&'a str>,
    links: HashSet<&'a str>,
}

impl Names<'_> {
    fn check(&self, r: &MonitoredRef, context: &str) -> Result<(), ValidationError> {
        let known = match r.quantity().handle_kind() {
            HandleKind::Node => self.nodes.contains(r.element()),
            HandleKind::Link => self.links.contains(r.element()),
        };
        if known {
            Ok(())
        } else {
            Err(ValidationError::MissingReference {
                id: r.element().to_string(),
                context: context.to_string(),
            })
        }
    }
}

fn validate_network(network: &NetworkDef) -> Result<Names<'_>, ValidationError> {
    if network.end <= network.start {
        return Err(ValidationError::InvalidValue {
            field: "network end".to_string(),
            value: network.end.to_string(),
            reason: format!("must be after start {}", network.start),
        });
    }
    validate_positive_finite("network routing_step_s", network.routing_step_s)?;

    let mut nodes = HashSet::new();
    for node in &network.nodes {
        if !nodes.insert(node.id.as_str()) {
            return Err(ValidationError::DuplicateId {
                id: node.id.clone(),
                context: "network nodes".to_string(),
            });
        }
        validate_node(node)?;
    }

    let mut links = HashSet::new();
    for link in &network.links {
        if !links.insert(link.id.as_str()) {
            return Err(ValidationError::DuplicateId {
                id: link.id.clone(),
                context: "network links".to_string(),
            });
        }
        validate_link(link, network)?;
    }

    Ok(Names { nodes, links })
}

fn validate_node(node: &NodeDef) -> Result<(), ValidationError> {
    if let NodeKindDef::Storage {
        area_ft2,
        max_depth_ft,
        initial_depth_ft,
    } = node.kind
    {
        validate_positive_finite(&format!("node '{}' area_ft2", node.id), area_ft2)?;
        validate_positive_finite(&format!("node '{}' max_depth_ft", node.id), max_depth_ft)?;
        if !initial_depth_ft.is_finite() || initial_depth_ft < 0.0 || initial_depth_ft > max_depth_ft
        {
            return Err(ValidationError::InvalidValue {
                field: format!("node '{}' initial_depth_ft", node.id),
                value: initial_depth_ft.to_string(),
                reason: "must be within [0, max_depth_ft]".to_string(),
            });
        }
    }

    if let Some(inflow) = &node.inflow {
        validate_inflow(inflow, &node.id)?;
    }
    Ok(())
}

fn validate_inflow(inflow: &InflowDef, node_id: &str) -> Result<(), ValidationError> {
    validate_non_negative_finite(&format!("node '{node_id}' inflow base_cfs"), inflow.base_cfs)?;
    if inflow.hydrograph.is_empty() {
        return Ok(());
    }
    for (_, q) in &inflow.hydrograph {
        validate_non_negative_finite(&format!("node '{node_id}' hydrograph flow"), *q)?;
    }
    ControlCurve::from_points(&inflow.hydrograph).map_err(|e| ValidationError::InvalidValue {
        field: format!("node '{node_id}' hydrograph"),
        value: format!("{} points", inflow.hydrograph.len()),
        reason: e.to_string(),
    })?;
    Ok(())
}

fn validate_link(link: &LinkDef, network: &NetworkDef) -> Result<(), ValidationError> {
    let from = network
        .node(&link.from)
        .ok_or_else(|| ValidationError::MissingReference {
            id: link.from.clone(),
            context: format!("link '{}' from", link.id),
        })?;
    if network.node(&link.to).is_none() {
        return Err(ValidationError::MissingReference {
            id: link.to.clone(),
            context: format!("link '{}' to", link.id),
        });
    }
    if matches!(from.kind, NodeKindDef::Outfall) {
        return Err(ValidationError::InvalidValue {
            field: format!("link '{}' from", link.id),
            value: link.from.clone(),
            reason: "outfalls cannot discharge into links".to_string(),
        });
    }
    validate_non_negative_finite(
        &format!("link '{}' initial_setting", link.id),
        link.initial_setting,
    )?;

    let field = |name: &str| format!("link '{}' {}", link.id, name);
    match link.kind {
        LinkKindDef::Orifice {
            area_ft2,
            discharge_coeff,
            offset_ft,
        } => {
            validate_positive_finite(&field("area_ft2"), area_ft2)?;
            validate_positive_finite(&field("discharge_coeff"), discharge_coeff)?;
            validate_non_negative_finite(&field("offset_ft"), offset_ft)?;
        }
        LinkKindDef::Weir {
            crest_ft,
            length_ft,
            coefficient,
        } => {
            validate_non_negative_finite(&field("crest_ft"), crest_ft)?;
            validate_positive_finite(&field("length_ft"), length_ft)?;
            validate_positive_finite(&field("coefficient"), coefficient)?;
        }
        LinkKindDef::Pump {
            capacity_cfs,
            on_depth_ft,
        } => {
            validate_positive_finite(&field("capacity_cfs"), capacity_cfs)?;
            validate_non_negative_finite(&field("on_depth_ft"), on_depth_ft)?;
        }
    }
    Ok(())
}

fn validate_run(run: &RunDef, names: &Names<'_>) -> Result<(), ValidationError> {
    validate_positive_finite("run step_s", run.step_s)?;
    if run.record_every == 0 {
        return Err(ValidationError::InvalidValue {
            field: "run record_every".to_string(),
            value: "0".to_string(),
            reason: "must be positive".to_string(),
        });
    }
    for r in &run.record {
        names.check(r, "run record")?;
    }
    Ok(())
}

fn validate_controls(controls: &RuleSet, names: &Names<'_>) -> Result<(), ValidationError> {
    for link in controls.referenced_links() {
        if !names.links.contains(link) {
            return Err(ValidationError::MissingReference {
                id: link.to_string(),
                context: "controls actuator".to_string(),
            });
        }
    }
    for input in controls.referenced_inputs() {
        names.check(input, "controls input")?;
    }

    let settings = controls
        .baseline
        .iter()
        .chain(controls.overrides.iter().flat_map(|o| o.set.iter()));
    for s in settings {
        validate_finite(&format!("controls setting for '{}'", s.actuator), s.value)?;
    }
    for w in &controls.time_windows {
        validate_finite(&format!("time window '{}' before", w.actuator), w.before)?;
        validate_finite(&format!("time window '{}' after", w.actuator), w.after)?;
    }
    for o in &controls.overrides {
        validate_finite(
            &format!("override threshold on '{}'", o.when.input.label()),
            o.when.threshold,
        )?;
    }
    Ok(())
}

fn validate_finite(field: &str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
            reason: "must be finite".to_string(),
        });
    }
    Ok(())
}

fn validate_positive_finite(field: &str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
            reason: "must be positive and finite".to_string(),
        });
    }
    Ok(())
}

fn validate_non_negative_finite(field: &str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
            reason: "must be non-negative and finite".to_string(),
        });
    }
    Ok(())
}
