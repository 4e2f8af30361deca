//! Scenario schema definitions.

use std::path::PathBuf;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use sc_controls::{MonitoredRef, RuleSet};
use sc_results::MetricDef;

pub const LATEST_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Scenario {
    pub version: u32,
    pub name: String,
    pub network: NetworkDef,
    /// Rules for the controlled run. Absent means both runs are uncontrolled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub controls: Option<RuleSet>,
    #[serde(default)]
    pub run: RunDef,
    /// Metrics for the run summary. Absent means the default table.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<Vec<MetricDef>>,
}

impl Scenario {
    pub fn summary_def(&self) -> Vec<MetricDef> {
        self.summary
            .clone()
            .unwrap_or_else(sc_results::default_summary_def)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NetworkDef {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    #[serde(default = "default_routing_step_s")]
    pub routing_step_s: f64,
    #[serde(default)]
    pub nodes: Vec<NodeDef>,
    #[serde(default)]
    pub links: Vec<LinkDef>,
}

fn default_routing_step_s() -> f64 {
    30.0
}

impl NetworkDef {
    pub fn node(&self, id: &str) -> Option<&NodeDef> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn link(&self, id: &str) -> Option<&LinkDef> {
        self.links.iter().find(|l| l.id == id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NodeDef {
    pub id: String,
    pub kind: NodeKindDef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inflow: Option<InflowDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum NodeKindDef {
    Storage {
        area_ft2: f64,
        max_depth_ft: f64,
        #[serde(default)]
        initial_depth_ft: f64,
    },
    Outfall,
}

/// External inflow: base flow plus a hydrograph of `[hours, cfs]` pairs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InflowDef {
    #[serde(default)]
    pub base_cfs: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hydrograph: Vec<(f64, f64)>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LinkDef {
    pub id: String,
    pub from: String,
    pub to: String,
    pub kind: LinkKindDef,
    #[serde(default = "default_initial_setting")]
    pub initial_setting: f64,
}

fn default_initial_setting() -> f64 {
    1.0
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum LinkKindDef {
    Orifice {
        area_ft2: f64,
        discharge_coeff: f64,
        #[serde(default)]
        offset_ft: f64,
    },
    Weir {
        crest_ft: f64,
        length_ft: f64,
        coefficient: f64,
    },
    Pump {
        capacity_cfs: f64,
        #[serde(default)]
        on_depth_ft: f64,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunDef {
    /// Control step in seconds.
    #[serde(default = "default_step_s")]
    pub step_s: f64,
    #[serde(default = "default_record_every")]
    pub record_every: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub record: Vec<MonitoredRef>,
    /// Directory for per-run JSON reports.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_dir: Option<PathBuf>,
}

fn default_step_s() -> f64 {
    300.0
}

fn default_record_every() -> usize {
    1
}

impl Default for RunDef {
    fn default() -> Self {
        Self {
            step_s: default_step_s(),
            record_every: default_record_every(),
            record: Vec::new(),
            report_dir: None,
        }
    }
}
