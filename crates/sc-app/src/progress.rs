use chrono::NaiveDateTime;

use crate::run_service::RunMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStage {
    CompilingEngine,
    CompilingControls,
    Simulating,
    Summarizing,
    Completed,
}

impl RunStage {
    pub fn label(self) -> &'static str {
        match self {
            RunStage::CompilingEngine => "compile-engine",
            RunStage::CompilingControls => "compile-controls",
            RunStage::Simulating => "simulate",
            RunStage::Summarizing => "summarize",
            RunStage::Completed => "done",
        }
    }
}

#[derive(Debug, Clone)]
pub struct StepProgress {
    pub step: usize,
    pub sim_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub fraction_complete: f64,
}

#[derive(Debug, Clone)]
pub struct RunProgressEvent {
    pub mode: RunMode,
    pub stage: RunStage,
    pub elapsed_wall_s: f64,
    pub message: Option<String>,
    pub step: Option<StepProgress>,
}

impl RunProgressEvent {
    pub fn stage(
        mode: RunMode,
        stage: RunStage,
        elapsed_wall_s: f64,
        message: Option<String>,
    ) -> Self {
        Self {
            mode,
            stage,
            elapsed_wall_s,
            message,
            step: None,
        }
    }
}
