//! Engine capability set.
//!
//! This is everything the control layer needs from a hydraulic engine:
//! name resolution, a time-stepping protocol, per-node and per-link state, and
//! run-level routing statistics. Units follow US customary conventions
//! (ft, ft³, cfs).

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use sc_core::{ActuatorId, PointId};

use crate::error::SimResult;

/// Run-level routing totals (ft³).
///
/// Authoritative only once the run has completed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RoutingStats {
    /// Volume lost from the system through node flooding.
    pub flooding: f64,
    /// Volume delivered to outfalls.
    pub outflow: f64,
    /// Volume entering the system from external inflows.
    pub external_inflow: f64,
    pub initial_storage: f64,
    pub final_storage: f64,
}

impl RoutingStats {
    /// Continuity error as a percentage of total inflow.
    pub fn continuity_error_pct(&self) -> f64 {
        let inflow = self.external_inflow + self.initial_storage;
        if inflow <= 0.0 {
            return 0.0;
        }
        let outflow = self.outflow + self.flooding + self.final_storage;
        100.0 * (inflow - outflow) / inflow
    }
}

/// Hydraulic engine driven by a [`Simulation`](crate::Simulation).
///
/// Reads take resolved handles; passing a handle from another engine yields an
/// unspecified value but never panics.
pub trait Engine {
    fn node_index(&self, name: &str) -> Option<PointId>;
    fn link_index(&self, name: &str) -> Option<ActuatorId>;
    fn node_count(&self) -> usize;
    fn link_count(&self) -> usize;
    fn node_name(&self, node: PointId) -> Option<&str>;
    fn link_name(&self, link: ActuatorId) -> Option<&str>;

    fn start_time(&self) -> NaiveDateTime;
    fn end_time(&self) -> NaiveDateTime;
    fn current_time(&self) -> NaiveDateTime;

    /// Run-setup hook, called once before the first step.
    fn start(&mut self) -> SimResult<()>;

    /// Route the network forward by `dt_s` seconds, stopping at the end time.
    fn advance(&mut self, dt_s: f64) -> SimResult<()>;

    /// Finalize output/report artifacts. Reads stay valid afterwards.
    fn finish(&mut self) -> SimResult<()>;

    fn depth(&self, node: PointId) -> f64;
    fn total_inflow(&self, node: PointId) -> f64;
    fn cumulative_inflow(&self, node: PointId) -> f64;
    fn volume(&self, node: PointId) -> f64;
    fn flooding_volume(&self, node: PointId) -> f64;

    fn link_flow(&self, link: ActuatorId) -> f64;
    fn target_setting(&self, link: ActuatorId) -> f64;
    fn set_target_setting(&mut self, link: ActuatorId, setting: f64);

    fn routing_stats(&self) -> RoutingStats;
}
