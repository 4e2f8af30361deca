//! Runtime compilation of a scenario into an engine and a controller.

use std::path::PathBuf;

use sc_controls::{HandleResolver, RuleController, RuleSet};
use sc_project::schema::{LinkDef, LinkKindDef, NetworkDef, NodeDef, NodeKindDef, RunDef};
use sc_results::{MetricDef, SummarySource};
use sc_sim::{
    Engine, Hydrograph, LevelPoolEngine, LevelPoolNetwork, PoolLink, PoolLinkKind, PoolNode,
    SimOptions,
};

use crate::error::{AppError, AppResult};

/// Translate a network definition into the level-pool engine's input.
pub fn compile_network(network: &NetworkDef) -> AppResult<LevelPoolNetwork> {
    let nodes = network
        .nodes
        .iter()
        .map(compile_node)
        .collect::<AppResult<Vec<_>>>()?;
    let links = network.links.iter().map(compile_link).collect();

    Ok(LevelPoolNetwork {
        start: network.start,
        end: network.end,
        routing_step_s: network.routing_step_s,
        nodes,
        links,
    })
}

fn compile_node(node: &NodeDef) -> AppResult<PoolNode> {
    let mut pool = match node.kind {
        NodeKindDef::Storage {
            area_ft2,
            max_depth_ft,
            initial_depth_ft,
        } => PoolNode::storage(&node.id, area_ft2, max_depth_ft).with_initial_depth(initial_depth_ft),
        NodeKindDef::Outfall => PoolNode::outfall(&node.id),
    };

    if let Some(inflow) = &node.inflow {
        let hydrograph = if inflow.hydrograph.is_empty() {
            Hydrograph::constant(inflow.base_cfs)
        } else {
            Hydrograph::new(inflow.base_cfs, &inflow.hydrograph).map_err(|e| {
                AppError::Compile(format!("node '{}' hydrograph: {}", node.id, e))
            })?
        };
        pool = pool.with_inflow(hydrograph);
    }
    Ok(pool)
}

fn compile_link(link: &LinkDef) -> PoolLink {
    let kind = match link.kind {
        LinkKindDef::Orifice {
            area_ft2,
            discharge_coeff,
            offset_ft,
        } => PoolLinkKind::Orifice {
            area_ft2,
            discharge_coeff,
            offset_ft,
        },
        LinkKindDef::Weir {
            crest_ft,
            length_ft,
            coefficient,
        } => PoolLinkKind::Weir {
            crest_ft,
            length_ft,
            coefficient,
        },
        LinkKindDef::Pump {
            capacity_cfs,
            on_depth_ft,
        } => PoolLinkKind::Pump {
            capacity_cfs,
            on_depth_ft,
        },
    };
    PoolLink::new(&link.id, &link.from, &link.to, kind).with_initial_setting(link.initial_setting)
}

/// Build a fresh engine instance. Every run gets its own.
pub fn compile_engine(network: &NetworkDef) -> AppResult<LevelPoolEngine> {
    Ok(LevelPoolEngine::new(compile_network(network)?)?)
}

/// Resolve every rule against the engine's names.
pub fn compile_controller(
    rules: &RuleSet,
    resolver: &dyn HandleResolver,
) -> AppResult<RuleController> {
    Ok(rules.compile(resolver)?)
}

pub fn sim_options(run: &RunDef, report_path: Option<PathBuf>) -> SimOptions {
    SimOptions {
        step_s: run.step_s,
        record_every: run.record_every,
        record: run.record.clone(),
        report_path,
        ..SimOptions::default()
    }
}

/// Run totals read straight from an engine.
pub struct EngineTotals<'a, E: Engine + ?Sized> {
    engine: &'a E,
}

impl<'a, E: Engine + ?Sized> EngineTotals<'a, E> {
    pub fn new(engine: &'a E) -> Self {
        Self { engine }
    }
}

impl<E: Engine + ?Sized> SummarySource for EngineTotals<'_, E> {
    fn contains_node(&self, node: &str) -> bool {
        self.engine.node_index(node).is_some()
    }

    fn cumulative_inflow(&self, node: &str) -> f64 {
        self.engine
            .node_index(node)
            .map_or(0.0, |id| self.engine.cumulative_inflow(id))
    }

    fn system_flooding(&self) -> f64 {
        self.engine.routing_stats().flooding
    }
}

/// Fail before a run starts if a summary metric names a missing node.
pub fn check_summary_nodes(defs: &[MetricDef], totals: &dyn SummarySource) -> AppResult<()> {
    match defs
        .iter()
        .filter_map(MetricDef::node)
        .find(|n| !totals.contains_node(n))
    {
        Some(name) => Err(AppError::UnknownHandle {
            kind: sc_controls::HandleKind::Node,
            name: name.to_string(),
        }),
        None => Ok(()),
    }
}
