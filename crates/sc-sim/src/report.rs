//! End-of-run report artifact.

use std::path::Path;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::engine::RoutingStats;
use crate::error::{SimError, SimResult};

/// Per-node statistics collected over a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeReport {
    pub name: String,
    /// Largest depth seen at the end of any step (ft).
    pub max_depth_ft: f64,
    pub flooding_ft3: f64,
    pub cumulative_inflow_ft3: f64,
}

/// Written when a session closes, if a report path was configured.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionReport {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub steps: usize,
    pub routing: RoutingStats,
    pub continuity_error_pct: f64,
    pub nodes: Vec<NodeReport>,
}

impl SessionReport {
    pub fn node(&self, name: &str) -> Option<&NodeReport> {
        self.nodes.iter().find(|n| n.name == name)
    }

    pub fn write_json(&self, path: &Path) -> SimResult<()> {
        let report_err = |message: String| SimError::Report {
            path: path.display().to_string(),
            message,
        };
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(|e| report_err(e.to_string()))?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|e| report_err(e.to_string()))?;
        std::fs::write(path, json).map_err(|e| report_err(e.to_string()))
    }

    pub fn read_json(path: &Path) -> SimResult<Self> {
        let report_err = |message: String| SimError::Report {
            path: path.display().to_string(),
            message,
        };
        let content = std::fs::read_to_string(path).map_err(|e| report_err(e.to_string()))?;
        serde_json::from_str(&content).map_err(|e| report_err(e.to_string()))
    }
}
