//! Summary storage API.

use crate::types::{RunManifest, StoredRun};
use crate::{ResultsError, ResultsResult};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Clone)]
pub struct SummaryStore {
    root_dir: PathBuf,
}

impl SummaryStore {
    pub fn new(root_dir: PathBuf) -> ResultsResult<Self> {
        if !root_dir.exists() {
            fs::create_dir_all(&root_dir)?;
        }
        Ok(Self { root_dir })
    }

    /// Store next to a scenario file, under `.sewerctl/runs`.
    pub fn for_scenario(scenario_path: &Path) -> ResultsResult<Self> {
        let dir = scenario_path
            .parent()
            .filter(|d| !d.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        Self::new(dir.join(".sewerctl").join("runs"))
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    fn run_path(&self, run_id: &str) -> PathBuf {
        self.root_dir.join(format!("{run_id}.json"))
    }

    pub fn has_run(&self, run_id: &str) -> bool {
        self.run_path(run_id).exists()
    }

    pub fn save_run(&self, run: &StoredRun) -> ResultsResult<PathBuf> {
        let path = self.run_path(&run.manifest.run_id);
        let json = serde_json::to_string_pretty(run)?;
        fs::write(&path, json)?;
        Ok(path)
    }

    pub fn load_run(&self, run_id: &str) -> ResultsResult<StoredRun> {
        let path = self.run_path(run_id);
        if !path.exists() {
            return Err(ResultsError::RunNotFound {
                run_id: run_id.to_string(),
            });
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Manifests of every stored run of `scenario`, oldest first.
    pub fn list_runs(&self, scenario: &str) -> ResultsResult<Vec<RunManifest>> {
        let mut runs = Vec::new();
        if !self.root_dir.exists() {
            return Ok(runs);
        }

        for entry in fs::read_dir(&self.root_dir)? {
            let path = entry?.path();
            if path.extension().is_none_or(|ext| ext != "json") {
                continue;
            }
            let Some(run_id) = path.file_stem().map(|s| s.to_string_lossy().to_string()) else {
                continue;
            };
            if let Ok(run) = self.load_run(&run_id)
                && run.manifest.scenario == scenario
            {
                runs.push(run.manifest);
            }
        }

        runs.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        Ok(runs)
    }

    pub fn delete_run(&self, run_id: &str) -> ResultsResult<()> {
        let path = self.run_path(run_id);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}
