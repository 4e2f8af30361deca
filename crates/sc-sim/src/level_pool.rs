//! Level-pool reference engine.
//!
//! A deliberately small stand-in for a full hydraulic engine: every storage
//! node is a level pool (depth = volume / surface area), outfalls absorb
//! whatever reaches them, and links move water from an upstream pool using
//! orifice, weir or pump relations that depend only on the upstream depth.
//! Water above a pool's rim is lost as flooding.
//!
//! It implements [`Engine`] so that scenarios and control strategies can be
//! exercised end to end without a native engine.

use std::collections::HashMap;

use chrono::{NaiveDateTime, TimeDelta};

use sc_controls::{ControlCurve, HandleKind};
use sc_core::constants::SQRT_2G_FT;
use sc_core::{ActuatorId, Id, PointId, ensure_finite, ensure_non_negative};

use crate::engine::{Engine, RoutingStats};
use crate::error::{SimError, SimResult};
use crate::integrator::{ForwardEuler, Integrator};
use crate::model::TransientModel;

/// External inflow at a node: constant base flow plus an optional
/// time series in (hours since start, cfs).
#[derive(Debug, Clone, PartialEq)]
pub struct Hydrograph {
    base_cfs: f64,
    series: Option<ControlCurve>,
}

impl Hydrograph {
    pub fn constant(base_cfs: f64) -> Self {
        Self {
            base_cfs,
            series: None,
        }
    }

    /// Base flow plus a piecewise-linear series. Flow is held at the first
    /// and last ordinates outside the series.
    pub fn new(base_cfs: f64, points: &[(f64, f64)]) -> SimResult<Self> {
        let series = ControlCurve::from_points(points)?;
        Ok(Self {
            base_cfs,
            series: Some(series),
        })
    }

    /// Inflow (cfs) at `hours` after the start of the run, never negative.
    pub fn flow_at(&self, hours: f64) -> f64 {
        let series = self.series.as_ref().map_or(0.0, |c| c.evaluate(hours));
        (self.base_cfs + series).max(0.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PoolNodeKind {
    Storage {
        area_ft2: f64,
        max_depth_ft: f64,
        initial_depth_ft: f64,
    },
    Outfall,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PoolNode {
    pub name: String,
    pub kind: PoolNodeKind,
    pub inflow: Option<Hydrograph>,
}

impl PoolNode {
    pub fn storage(name: impl Into<String>, area_ft2: f64, max_depth_ft: f64) -> Self {
        Self {
            name: name.into(),
            kind: PoolNodeKind::Storage {
                area_ft2,
                max_depth_ft,
                initial_depth_ft: 0.0,
            },
            inflow: None,
        }
    }

    pub fn outfall(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: PoolNodeKind::Outfall,
            inflow: None,
        }
    }

    pub fn with_inflow(mut self, inflow: Hydrograph) -> Self {
        self.inflow = Some(inflow);
        self
    }

    pub fn with_initial_depth(mut self, depth_ft: f64) -> Self {
        if let PoolNodeKind::Storage {
            initial_depth_ft, ..
        } = &mut self.kind
        {
            *initial_depth_ft = depth_ft;
        }
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PoolLinkKind {
    /// q = s · Cd · A · sqrt(2g · (h - offset)), setting clamped to [0, 1].
    Orifice {
        area_ft2: f64,
        discharge_coeff: f64,
        offset_ft: f64,
    },
    /// q = s · Cw · L · (h - crest)^1.5, setting clamped to [0, 1].
    Weir {
        crest_ft: f64,
        length_ft: f64,
        coefficient: f64,
    },
    /// q = s · capacity while h > on_depth; setting is a speed multiplier.
    Pump { capacity_cfs: f64, on_depth_ft: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct PoolLink {
    pub name: String,
    pub from: String,
    pub to: String,
    pub kind: PoolLinkKind,
    /// Setting the engine starts with when no controller intervenes.
    pub initial_setting: f64,
}

impl PoolLink {
    pub fn new(
        name: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
        kind: PoolLinkKind,
    ) -> Self {
        Self {
            name: name.into(),
            from: from.into(),
            to: to.into(),
            kind,
            initial_setting: 1.0,
        }
    }

    pub fn with_initial_setting(mut self, setting: f64) -> Self {
        self.initial_setting = setting;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LevelPoolNetwork {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    /// Internal routing sub-step (seconds).
    pub routing_step_s: f64,
    pub nodes: Vec<PoolNode>,
    pub links: Vec<PoolLink>,
}

/// Integrated quantities. All volumes in ft³.
#[derive(Debug, Clone, Default)]
pub struct PoolState {
    volume: Vec<f64>,
    cumulative: Vec<f64>,
    outflow: f64,
    external: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Running,
    Finished,
}

#[derive(Debug, Clone)]
pub struct LevelPoolEngine {
    network: LevelPoolNetwork,
    node_lookup: HashMap<String, usize>,
    link_lookup: HashMap<String, usize>,
    /// (from, to) node indices per link.
    ends: Vec<(usize, usize)>,
    state: PoolState,
    settings: Vec<f64>,
    link_flows: Vec<f64>,
    node_inflows: Vec<f64>,
    flooded: Vec<f64>,
    initial_storage: f64,
    elapsed_s: f64,
    substep_s: f64,
    phase: Phase,
}

impl LevelPoolEngine {
    /// Validate the network and set up initial storage.
    ///
    /// # Errors
    ///
    /// - [`SimError::InvalidArg`] for bad geometry, timing or duplicate names
    /// - [`SimError::UnknownHandle`] for links that reference missing nodes
    pub fn new(network: LevelPoolNetwork) -> SimResult<Self> {
        if !(network.routing_step_s > 0.0 && network.routing_step_s.is_finite()) {
            return Err(invalid("routing_step_s must be positive"));
        }
        if network.end <= network.start {
            return Err(invalid("end time must be after start time"));
        }

        let mut node_lookup = HashMap::new();
        for (i, node) in network.nodes.iter().enumerate() {
            if node_lookup.insert(node.name.clone(), i).is_some() {
                return Err(invalid(format!("duplicate node '{}'", node.name)));
            }
            validate_node(node)?;
        }

        let mut link_lookup = HashMap::new();
        let mut ends = Vec::with_capacity(network.links.len());
        for (i, link) in network.links.iter().enumerate() {
            if link_lookup.insert(link.name.clone(), i).is_some() {
                return Err(invalid(format!("duplicate link '{}'", link.name)));
            }
            validate_link(link)?;
            let endpoint = |name: &str| {
                node_lookup
                    .get(name)
                    .copied()
                    .ok_or_else(|| SimError::UnknownHandle {
                        kind: HandleKind::Node,
                        name: name.to_string(),
                    })
            };
            ends.push((endpoint(&link.from)?, endpoint(&link.to)?));
        }

        let volume: Vec<f64> = network
            .nodes
            .iter()
            .map(|n| match n.kind {
                PoolNodeKind::Storage {
                    area_ft2,
                    initial_depth_ft,
                    ..
                } => area_ft2 * initial_depth_ft,
                PoolNodeKind::Outfall => 0.0,
            })
            .collect();
        let initial_storage = volume.iter().sum();
        let n_nodes = network.nodes.len();
        let n_links = network.links.len();

        Ok(Self {
            settings: network.links.iter().map(|l| l.initial_setting).collect(),
            state: PoolState {
                volume,
                cumulative: vec![0.0; n_nodes],
                outflow: 0.0,
                external: 0.0,
            },
            link_flows: vec![0.0; n_links],
            node_inflows: vec![0.0; n_nodes],
            flooded: vec![0.0; n_nodes],
            initial_storage,
            elapsed_s: 0.0,
            substep_s: network.routing_step_s,
            phase: Phase::Idle,
            network,
            node_lookup,
            link_lookup,
            ends,
        })
    }

    pub fn network(&self) -> &LevelPoolNetwork {
        &self.network
    }

    fn duration_s(&self) -> f64 {
        (self.network.end - self.network.start).num_milliseconds() as f64 / 1000.0
    }

    fn depth_of(&self, i: usize, volume: &[f64]) -> f64 {
        match self.network.nodes[i].kind {
            PoolNodeKind::Storage { area_ft2, .. } => volume[i] / area_ft2,
            PoolNodeKind::Outfall => 0.0,
        }
    }

    /// Unlimited flow through link `l` given the current pool depths.
    fn raw_link_flow(&self, l: usize, volume: &[f64]) -> f64 {
        let (from, _) = self.ends[l];
        let head = self.depth_of(from, volume);
        let setting = self.settings[l];
        match self.network.links[l].kind {
            PoolLinkKind::Orifice {
                area_ft2,
                discharge_coeff,
                offset_ft,
            } => {
                let h = head - offset_ft;
                if h <= 0.0 {
                    return 0.0;
                }
                setting.clamp(0.0, 1.0) * discharge_coeff * area_ft2 * SQRT_2G_FT * h.sqrt()
            }
            PoolLinkKind::Weir {
                crest_ft,
                length_ft,
                coefficient,
            } => {
                let h = head - crest_ft;
                if h <= 0.0 {
                    return 0.0;
                }
                setting.clamp(0.0, 1.0) * coefficient * length_ft * h.powf(1.5)
            }
            PoolLinkKind::Pump {
                capacity_cfs,
                on_depth_ft,
            } => {
                if head > on_depth_ft {
                    setting.max(0.0) * capacity_cfs
                } else {
                    0.0
                }
            }
        }
    }

    /// Spill water above each pool's rim into the flooding totals.
    fn spill(&mut self, state: &mut PoolState) {
        for (i, node) in self.network.nodes.iter().enumerate() {
            if let PoolNodeKind::Storage {
                area_ft2,
                max_depth_ft,
                ..
            } = node.kind
            {
                let capacity = area_ft2 * max_depth_ft;
                let v = &mut state.volume[i];
                if *v > capacity {
                    self.flooded[i] += *v - capacity;
                    *v = capacity;
                } else if *v < 0.0 {
                    *v = 0.0;
                }
            }
        }
    }

    fn check_running(&self, action: &str) -> SimResult<()> {
        match self.phase {
            Phase::Running => Ok(()),
            Phase::Idle => Err(SimError::EngineFailure {
                message: format!("cannot {action} before start"),
            }),
            Phase::Finished => Err(SimError::EngineFailure {
                message: format!("cannot {action} after finish"),
            }),
        }
    }
}

fn invalid(what: impl Into<String>) -> SimError {
    SimError::InvalidArg { what: what.into() }
}

fn non_negative(value: f64, what: &'static str) -> SimResult<()> {
    ensure_non_negative(value, what)?;
    Ok(())
}

fn validate_node(node: &PoolNode) -> SimResult<()> {
    if let PoolNodeKind::Storage {
        area_ft2,
        max_depth_ft,
        initial_depth_ft,
    } = node.kind
    {
        if !(area_ft2 > 0.0 && area_ft2.is_finite()) {
            return Err(invalid(format!("node '{}': area must be positive", node.name)));
        }
        if !(max_depth_ft > 0.0 && max_depth_ft.is_finite()) {
            return Err(invalid(format!(
                "node '{}': max depth must be positive",
                node.name
            )));
        }
        non_negative(initial_depth_ft, "initial depth")?;
        if initial_depth_ft > max_depth_ft {
            return Err(invalid(format!(
                "node '{}': initial depth exceeds max depth",
                node.name
            )));
        }
    }
    if let Some(inflow) = &node.inflow {
        ensure_finite(inflow.base_cfs, "base inflow")?;
    }
    Ok(())
}

fn validate_link(link: &PoolLink) -> SimResult<()> {
    if !link.initial_setting.is_finite() {
        return Err(invalid(format!("link '{}': initial setting", link.name)));
    }
    match link.kind {
        PoolLinkKind::Orifice {
            area_ft2,
            discharge_coeff,
            offset_ft,
        } => {
            non_negative(area_ft2, "orifice area")?;
            non_negative(discharge_coeff, "discharge coefficient")?;
            non_negative(offset_ft, "orifice offset")
        }
        PoolLinkKind::Weir {
            crest_ft,
            length_ft,
            coefficient,
        } => {
            non_negative(crest_ft, "weir crest")?;
            non_negative(length_ft, "weir length")?;
            non_negative(coefficient, "weir coefficient")
        }
        PoolLinkKind::Pump {
            capacity_cfs,
            on_depth_ft,
        } => {
            non_negative(capacity_cfs, "pump capacity")?;
            non_negative(on_depth_ft, "pump on depth")
        }
    }
}

impl TransientModel for LevelPoolEngine {
    type State = PoolState;

    fn rhs(&mut self, t: f64, x: &PoolState) -> SimResult<PoolState> {
        let n_nodes = self.network.nodes.len();
        let hours = t / 3600.0;

        let external: Vec<f64> = self
            .network
            .nodes
            .iter()
            .map(|n| n.inflow.as_ref().map_or(0.0, |h| h.flow_at(hours)))
            .collect();

        let mut flows: Vec<f64> = (0..self.ends.len())
            .map(|l| self.raw_link_flow(l, &x.volume))
            .collect();

        // A pool cannot release more than it holds within one sub-step.
        let mut demand = vec![0.0; n_nodes];
        for (l, &(from, _)) in self.ends.iter().enumerate() {
            demand[from] += flows[l];
        }
        for (l, &(from, _)) in self.ends.iter().enumerate() {
            let available = x.volume[from].max(0.0) / self.substep_s;
            if demand[from] > available {
                flows[l] *= available / demand[from];
            }
        }

        let mut dv = external.clone();
        let mut dcum = external.clone();
        for (l, &(from, to)) in self.ends.iter().enumerate() {
            dv[from] -= flows[l];
            dv[to] += flows[l];
            dcum[to] += flows[l];
        }

        let mut outflow = 0.0;
        for (i, node) in self.network.nodes.iter().enumerate() {
            if node.kind == PoolNodeKind::Outfall {
                outflow += dv[i];
                dv[i] = 0.0;
            }
        }

        self.node_inflows.clone_from(&dcum);
        self.link_flows = flows;

        Ok(PoolState {
            volume: dv,
            cumulative: dcum,
            outflow,
            external: external.iter().sum(),
        })
    }

    fn add(&self, a: &PoolState, b: &PoolState) -> PoolState {
        PoolState {
            volume: a.volume.iter().zip(&b.volume).map(|(x, y)| x + y).collect(),
            cumulative: a
                .cumulative
                .iter()
                .zip(&b.cumulative)
                .map(|(x, y)| x + y)
                .collect(),
            outflow: a.outflow + b.outflow,
            external: a.external + b.external,
        }
    }

    fn scale(&self, a: &PoolState, scale: f64) -> PoolState {
        PoolState {
            volume: a.volume.iter().map(|x| x * scale).collect(),
            cumulative: a.cumulative.iter().map(|x| x * scale).collect(),
            outflow: a.outflow * scale,
            external: a.external * scale,
        }
    }
}

impl Engine for LevelPoolEngine {
    fn node_index(&self, name: &str) -> Option<PointId> {
        self.node_lookup.get(name).copied().map(Id::from_index)
    }

    fn link_index(&self, name: &str) -> Option<ActuatorId> {
        self.link_lookup.get(name).copied().map(Id::from_index)
    }

    fn node_count(&self) -> usize {
        self.network.nodes.len()
    }

    fn link_count(&self) -> usize {
        self.network.links.len()
    }

    fn node_name(&self, node: PointId) -> Option<&str> {
        self.network.nodes.get(node.index()).map(|n| n.name.as_str())
    }

    fn link_name(&self, link: ActuatorId) -> Option<&str> {
        self.network.links.get(link.index()).map(|l| l.name.as_str())
    }

    fn start_time(&self) -> NaiveDateTime {
        self.network.start
    }

    fn end_time(&self) -> NaiveDateTime {
        self.network.end
    }

    fn current_time(&self) -> NaiveDateTime {
        let ms = (self.elapsed_s * 1000.0).round() as i64;
        self.network.start + TimeDelta::milliseconds(ms)
    }

    fn start(&mut self) -> SimResult<()> {
        if self.phase != Phase::Idle {
            return Err(SimError::EngineFailure {
                message: "engine already started".to_string(),
            });
        }
        self.phase = Phase::Running;
        Ok(())
    }

    fn advance(&mut self, dt_s: f64) -> SimResult<()> {
        self.check_running("advance")?;
        if !(dt_s > 0.0 && dt_s.is_finite()) {
            return Err(invalid("advance dt must be positive"));
        }

        let dt = dt_s.min(self.duration_s() - self.elapsed_s);
        if dt <= 0.0 {
            return Ok(());
        }
        let substeps = (dt / self.network.routing_step_s).ceil().max(1.0) as usize;
        self.substep_s = dt / substeps as f64;

        for _ in 0..substeps {
            let (t, h) = (self.elapsed_s, self.substep_s);
            let x = self.state.clone();
            let mut next = ForwardEuler.step(self, t, &x, h)?;
            self.spill(&mut next);
            if next.volume.iter().any(|v| !v.is_finite()) {
                return Err(SimError::EngineFailure {
                    message: format!("non-finite storage at t={}s", self.elapsed_s),
                });
            }
            self.state = next;
            self.elapsed_s += h;
        }
        Ok(())
    }

    fn finish(&mut self) -> SimResult<()> {
        self.phase = Phase::Finished;
        Ok(())
    }

    fn depth(&self, node: PointId) -> f64 {
        if node.index() >= self.node_count() {
            return 0.0;
        }
        self.depth_of(node.index(), &self.state.volume)
    }

    fn total_inflow(&self, node: PointId) -> f64 {
        self.node_inflows.get(node.index()).copied().unwrap_or(0.0)
    }

    fn cumulative_inflow(&self, node: PointId) -> f64 {
        self.state
            .cumulative
            .get(node.index())
            .copied()
            .unwrap_or(0.0)
    }

    fn volume(&self, node: PointId) -> f64 {
        self.state.volume.get(node.index()).copied().unwrap_or(0.0)
    }

    fn flooding_volume(&self, node: PointId) -> f64 {
        self.flooded.get(node.index()).copied().unwrap_or(0.0)
    }

    fn link_flow(&self, link: ActuatorId) -> f64 {
        self.link_flows.get(link.index()).copied().unwrap_or(0.0)
    }

    fn target_setting(&self, link: ActuatorId) -> f64 {
        self.settings.get(link.index()).copied().unwrap_or(0.0)
    }

    fn set_target_setting(&mut self, link: ActuatorId, setting: f64) {
        if let Some(s) = self.settings.get_mut(link.index()) {
            *s = setting;
        }
    }

    fn routing_stats(&self) -> RoutingStats {
        RoutingStats {
            flooding: self.flooded.iter().sum(),
            outflow: self.state.outflow,
            external_inflow: self.state.external,
            initial_storage: self.initial_storage,
            final_storage: self.state.volume.iter().sum(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn t0() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn orifice(area_ft2: f64) -> PoolLinkKind {
        PoolLinkKind::Orifice {
            area_ft2,
            discharge_coeff: 0.6,
            offset_ft: 0.0,
        }
    }

    /// Tank with 10 cfs of constant inflow draining through an orifice.
    fn tank_network(hours: i64, orifice_area: f64) -> LevelPoolNetwork {
        LevelPoolNetwork {
            start: t0(),
            end: t0() + TimeDelta::hours(hours),
            routing_step_s: 30.0,
            nodes: vec![
                PoolNode::storage("TANK", 1000.0, 10.0).with_inflow(Hydrograph::constant(10.0)),
                PoolNode::outfall("OUT"),
            ],
            links: vec![PoolLink::new("OR1", "TANK", "OUT", orifice(orifice_area))],
        }
    }

    fn run_to_end(engine: &mut LevelPoolEngine) {
        engine.start().unwrap();
        while engine.current_time() < engine.end_time() {
            engine.advance(300.0).unwrap();
        }
    }

    #[test]
    fn hydrograph_interpolates_and_holds() {
        let h = Hydrograph::new(1.0, &[(0.0, 0.0), (1.0, 10.0), (2.0, 0.0)]).unwrap();
        assert_eq!(h.flow_at(0.5), 6.0);
        assert_eq!(h.flow_at(5.0), 1.0);
        assert_eq!(Hydrograph::constant(-3.0).flow_at(0.0), 0.0);
    }

    #[test]
    fn resolves_names() {
        let engine = LevelPoolEngine::new(tank_network(1, 1.0)).unwrap();
        let tank = engine.node_index("TANK").unwrap();
        assert_eq!(engine.node_name(tank), Some("TANK"));
        assert!(engine.link_index("OR1").is_some());
        assert!(engine.node_index("OR1").is_none());
        assert_eq!(engine.node_count(), 2);
        assert_eq!(engine.link_count(), 1);
    }

    #[test]
    fn rejects_missing_endpoint() {
        let mut net = tank_network(1, 1.0);
        net.links[0].to = "NOWHERE".to_string();
        let err = LevelPoolEngine::new(net).unwrap_err();
        assert!(matches!(err, SimError::UnknownHandle { kind: HandleKind::Node, .. }));
    }

    #[test]
    fn rejects_bad_geometry_and_timing() {
        let mut net = tank_network(1, 1.0);
        net.nodes[0] = PoolNode::storage("TANK", 0.0, 10.0);
        assert!(LevelPoolEngine::new(net).is_err());

        let mut net = tank_network(1, 1.0);
        net.end = net.start;
        assert!(LevelPoolEngine::new(net).is_err());

        let mut net = tank_network(1, 1.0);
        net.nodes.push(PoolNode::outfall("OUT"));
        assert!(LevelPoolEngine::new(net).is_err());
    }

    #[test]
    fn advance_requires_start() {
        let mut engine = LevelPoolEngine::new(tank_network(1, 1.0)).unwrap();
        assert!(matches!(
            engine.advance(300.0),
            Err(SimError::EngineFailure { .. })
        ));
        engine.start().unwrap();
        assert!(engine.start().is_err());
        engine.finish().unwrap();
        assert!(engine.advance(300.0).is_err());
    }

    #[test]
    fn stops_at_end_time() {
        let mut engine = LevelPoolEngine::new(tank_network(1, 1.0)).unwrap();
        engine.start().unwrap();
        for _ in 0..20 {
            engine.advance(300.0).unwrap();
        }
        assert_eq!(engine.current_time(), engine.end_time());
    }

    #[test]
    fn tank_reaches_orifice_equilibrium() {
        // 10 cfs = 0.6 * 1 * 8.024 * sqrt(h)  =>  h ≈ 4.31 ft
        let mut engine = LevelPoolEngine::new(tank_network(12, 1.0)).unwrap();
        run_to_end(&mut engine);
        let tank = engine.node_index("TANK").unwrap();
        let expected = (10.0 / (0.6 * SQRT_2G_FT)).powi(2);
        assert!((engine.depth(tank) - expected).abs() < 0.05);
        assert_eq!(engine.flooding_volume(tank), 0.0);
    }

    #[test]
    fn closed_gate_floods_and_conserves_mass() {
        let mut net = tank_network(2, 1.0);
        net.links[0].initial_setting = 0.0;
        let mut engine = LevelPoolEngine::new(net).unwrap();
        run_to_end(&mut engine);

        let tank = engine.node_index("TANK").unwrap();
        let out = engine.node_index("OUT").unwrap();
        assert!((engine.depth(tank) - 10.0).abs() < 1e-9);
        // 2 h * 3600 s * 10 cfs - 10,000 ft³ of storage
        assert!((engine.flooding_volume(tank) - 62_000.0).abs() < 1e-6);
        assert_eq!(engine.cumulative_inflow(out), 0.0);

        let stats = engine.routing_stats();
        assert!((stats.external_inflow - 72_000.0).abs() < 1e-6);
        assert!(stats.continuity_error_pct().abs() < 1e-9);
    }

    #[test]
    fn controller_setting_changes_flow() {
        let mut engine = LevelPoolEngine::new(tank_network(6, 1.0)).unwrap();
        engine.start().unwrap();
        for _ in 0..12 {
            engine.advance(300.0).unwrap();
        }
        let or1 = engine.link_index("OR1").unwrap();
        let open_flow = engine.link_flow(or1);
        assert!(open_flow > 0.0);

        engine.set_target_setting(or1, 0.0);
        assert_eq!(engine.target_setting(or1), 0.0);
        engine.advance(300.0).unwrap();
        assert_eq!(engine.link_flow(or1), 0.0);
    }

    #[test]
    fn pump_respects_on_depth_and_never_overdraws() {
        let net = LevelPoolNetwork {
            start: t0(),
            end: t0() + TimeDelta::hours(1),
            routing_step_s: 60.0,
            nodes: vec![
                PoolNode::storage("WET_WELL", 100.0, 10.0).with_initial_depth(2.0),
                PoolNode::outfall("OUT"),
            ],
            links: vec![PoolLink::new(
                "P1",
                "WET_WELL",
                "OUT",
                PoolLinkKind::Pump {
                    capacity_cfs: 50.0,
                    on_depth_ft: 0.5,
                },
            )],
        };
        let mut engine = LevelPoolEngine::new(net).unwrap();
        run_to_end(&mut engine);

        let well = engine.node_index("WET_WELL").unwrap();
        let out = engine.node_index("OUT").unwrap();
        assert!(engine.volume(well) >= 0.0);
        assert!(engine.depth(well) <= 0.5 + 1e-9);
        let stats = engine.routing_stats();
        assert!((stats.outflow - engine.cumulative_inflow(out)).abs() < 1e-9);
        assert!(stats.continuity_error_pct().abs() < 1e-9);
    }
}
