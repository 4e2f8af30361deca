//! Run execution and comparison service.

use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::Utc;
use sc_controls::{ControlPlant, NoControl, StepController, StepInfo};
use sc_project::schema::Scenario;
use sc_results::{
    Comparison, RunManifest, RunSummary, StoredRun, SummaryStore, VolumeConversion, summarize,
};
use sc_sim::{Engine, RoutingStats, SessionReport, SimRecord, Simulation};
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::progress::{RunProgressEvent, RunStage, StepProgress};
use crate::runtime_compile::{self, EngineTotals};

pub use sc_results::RunMode;

/// Identifies the engine in stored run ids.
pub const ENGINE_VERSION: &str = concat!("level-pool/", env!("CARGO_PKG_VERSION"));

/// Options for running simulations.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Overrides the report location derived from the scenario's `report_dir`.
    pub report_path: Option<PathBuf>,
    /// Overrides the report volume conversion.
    pub conversion: Option<VolumeConversion>,
}

/// Everything one run produced.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub mode: RunMode,
    pub run_id: String,
    pub steps: usize,
    pub summary: RunSummary,
    pub routing: RoutingStats,
    pub record: SimRecord,
    pub session: SessionReport,
}

/// Both runs of a scenario and their side-by-side table.
#[derive(Debug, Clone)]
pub struct ComparisonReport {
    pub uncontrolled: RunReport,
    pub controlled: RunReport,
    pub comparison: Comparison,
}

fn emit_progress(
    progress_cb: &mut Option<&mut dyn FnMut(RunProgressEvent)>,
    mode: RunMode,
    stage: RunStage,
    started: Instant,
    message: Option<String>,
    step: Option<StepProgress>,
) {
    if let Some(cb) = progress_cb.as_deref_mut() {
        cb(RunProgressEvent {
            mode,
            stage,
            elapsed_wall_s: started.elapsed().as_secs_f64(),
            message,
            step,
        });
    }
}

/// Calls a per-step hook before handing the step to the wrapped controller.
struct Observed<'a> {
    inner: &'a mut dyn StepController,
    hook: &'a mut dyn FnMut(&StepInfo),
}

impl StepController for Observed<'_> {
    fn on_step(&mut self, step: &StepInfo, plant: &mut dyn ControlPlant) {
        (self.hook)(step);
        self.inner.on_step(step, plant);
    }
}

fn report_path(scenario: &Scenario, mode: RunMode, options: &RunOptions) -> Option<PathBuf> {
    options.report_path.clone().or_else(|| {
        scenario
            .run
            .report_dir
            .as_ref()
            .map(|dir| dir.join(format!("{}_{}.json", scenario.name, mode.as_str())))
    })
}

/// Run one scenario in one mode.
pub fn run_scenario(scenario: &Scenario, mode: RunMode) -> AppResult<RunReport> {
    run_scenario_with_progress(scenario, mode, &RunOptions::default(), None)
}

/// Run one scenario and stream progress events.
///
/// Every name the run depends on (recorded readings, summary metrics, rule
/// targets and inputs) is resolved before the first step.
pub fn run_scenario_with_progress(
    scenario: &Scenario,
    mode: RunMode,
    options: &RunOptions,
    mut progress_cb: Option<&mut dyn FnMut(RunProgressEvent)>,
) -> AppResult<RunReport> {
    let started = Instant::now();

    emit_progress(
        &mut progress_cb,
        mode,
        RunStage::CompilingEngine,
        started,
        Some("Compiling engine".to_string()),
        None,
    );
    let engine = runtime_compile::compile_engine(&scenario.network)?;
    let opts = runtime_compile::sim_options(&scenario.run, report_path(scenario, mode, options));
    let mut sim = Simulation::open(engine, opts)?;

    let defs = scenario.summary_def();
    runtime_compile::check_summary_nodes(&defs, &EngineTotals::new(sim.engine()))?;

    let mut controller: Box<dyn StepController> = match mode {
        RunMode::Uncontrolled => Box::new(NoControl),
        RunMode::Controlled => {
            emit_progress(
                &mut progress_cb,
                mode,
                RunStage::CompilingControls,
                started,
                Some("Compiling controls".to_string()),
                None,
            );
            let rules = scenario.controls.as_ref().ok_or_else(|| {
                AppError::InvalidInput(format!(
                    "scenario '{}' has no controls for a controlled run",
                    scenario.name
                ))
            })?;
            Box::new(runtime_compile::compile_controller(rules, &sim)?)
        }
    };

    info!(scenario = %scenario.name, mode = mode.as_str(), "running scenario");
    emit_progress(
        &mut progress_cb,
        mode,
        RunStage::Simulating,
        started,
        Some("Simulating".to_string()),
        None,
    );

    let (start, end) = (sim.engine().start_time(), sim.engine().end_time());
    let total_s = (end - start).num_seconds().max(1) as f64;
    let mut hook = |step: &StepInfo| {
        let progress = StepProgress {
            step: step.index,
            sim_time: step.time,
            end_time: end,
            fraction_complete: (step.time - start).num_seconds() as f64 / total_s,
        };
        emit_progress(
            &mut progress_cb,
            mode,
            RunStage::Simulating,
            started,
            None,
            Some(progress),
        );
    };
    let outcome = sim.run(&mut Observed {
        inner: controller.as_mut(),
        hook: &mut hook,
    })?;

    emit_progress(
        &mut progress_cb,
        mode,
        RunStage::Summarizing,
        started,
        Some("Summarizing".to_string()),
        None,
    );
    let conversion = options.conversion.unwrap_or_default();
    let summary = summarize(&defs, &EngineTotals::new(sim.engine()), conversion)?;
    let session = sim.close()?;

    emit_progress(
        &mut progress_cb,
        mode,
        RunStage::Completed,
        started,
        Some("Run completed".to_string()),
        None,
    );
    info!(
        scenario = %scenario.name,
        mode = mode.as_str(),
        steps = outcome.steps,
        flooding_ft3 = outcome.routing.flooding,
        "run completed"
    );

    Ok(RunReport {
        mode,
        run_id: sc_results::compute_run_id(scenario, mode, ENGINE_VERSION),
        steps: outcome.steps,
        summary,
        routing: outcome.routing,
        record: outcome.record,
        session,
    })
}

/// Run the scenario without and with controls, each on its own engine.
pub fn compare_scenario(scenario: &Scenario) -> AppResult<ComparisonReport> {
    compare_scenario_with_options(scenario, &RunOptions::default())
}

pub fn compare_scenario_with_options(
    scenario: &Scenario,
    options: &RunOptions,
) -> AppResult<ComparisonReport> {
    if scenario.controls.is_none() {
        return Err(AppError::InvalidInput(format!(
            "scenario '{}' has no controls to compare",
            scenario.name
        )));
    }
    // A single report path would be overwritten by the second run.
    let per_run = RunOptions {
        report_path: None,
        ..options.clone()
    };
    let uncontrolled = run_scenario_with_progress(scenario, RunMode::Uncontrolled, &per_run, None)?;
    let controlled = run_scenario_with_progress(scenario, RunMode::Controlled, &per_run, None)?;
    let comparison = Comparison::new(&uncontrolled.summary, &controlled.summary)?;

    Ok(ComparisonReport {
        uncontrolled,
        controlled,
        comparison,
    })
}

/// Persist a run summary next to the scenario file.
pub fn save_run(scenario_path: &Path, scenario: &Scenario, report: &RunReport) -> AppResult<PathBuf> {
    let store = SummaryStore::for_scenario(scenario_path)?;
    let run = StoredRun {
        manifest: RunManifest {
            run_id: report.run_id.clone(),
            scenario: scenario.name.clone(),
            timestamp: Utc::now().to_rfc3339(),
            mode: report.mode,
            steps: report.steps,
            engine_version: ENGINE_VERSION.to_string(),
        },
        summary: report.summary.clone(),
    };
    let path = store.save_run(&run)?;
    info!(path = %path.display(), "saved run summary");
    Ok(path)
}

/// Stored runs of a scenario, oldest first.
pub fn list_runs(scenario_path: &Path, scenario: &Scenario) -> AppResult<Vec<RunManifest>> {
    let store = SummaryStore::for_scenario(scenario_path)?;
    Ok(store.list_runs(&scenario.name)?)
}

pub fn load_run(scenario_path: &Path, run_id: &str) -> AppResult<StoredRun> {
    let store = SummaryStore::for_scenario(scenario_path)?;
    Ok(store.load_run(run_id)?)
}
