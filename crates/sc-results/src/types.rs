//! Stored run data types.

use serde::{Deserialize, Serialize};

use crate::summary::RunSummary;

pub type RunId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunMode {
    Uncontrolled,
    Controlled,
}

impl RunMode {
    pub fn as_str(self) -> &'static str {
        match self {
            RunMode::Uncontrolled => "uncontrolled",
            RunMode::Controlled => "controlled",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunManifest {
    pub run_id: RunId,
    pub scenario: String,
    pub timestamp: String,
    pub mode: RunMode,
    pub steps: usize,
    pub engine_version: String,
}

/// Everything persisted for one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredRun {
    pub manifest: RunManifest,
    pub summary: RunSummary,
}
