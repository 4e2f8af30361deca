//! Shared application service layer for sewerctl.
//!
//! This crate centralizes the logic the CLI needs: scenario management,
//! compilation of a scenario into an engine and a rule controller, running
//! the uncontrolled and controlled cases, and persisting their summaries.

pub mod error;
pub mod progress;
pub mod project_service;
pub mod run_service;
pub mod runtime_compile;

pub use error::{AppError, AppResult};
pub use progress::{RunProgressEvent, RunStage, StepProgress};
pub use project_service::{
    ScenarioSummary, describe_scenario, load_scenario, save_scenario, validate_scenario,
};
pub use run_service::{
    ComparisonReport, ENGINE_VERSION, RunMode, RunOptions, RunReport, compare_scenario,
    compare_scenario_with_options, list_runs, load_run, run_scenario, run_scenario_with_progress,
    save_run,
};
pub use runtime_compile::{
    EngineTotals, check_summary_nodes, compile_controller, compile_engine, compile_network,
    sim_options,
};
