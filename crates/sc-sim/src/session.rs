//! Simulation session and step loop.
//!
//! A [`Simulation`] owns one engine for the duration of one run. The engine
//! is finalized exactly once: explicitly through [`Simulation::close`], or on
//! drop if the session is abandoned early (for example after an engine
//! failure).

use std::path::PathBuf;

use chrono::NaiveDateTime;
use tracing::{debug, info, warn};

use sc_controls::{HandleResolver, MonitoredPoint, MonitoredRef, StepController, StepInfo};
use sc_core::{ActuatorId, Id, PointId};

use crate::engine::{Engine, RoutingStats};
use crate::error::{SimError, SimResult};
use crate::plant::{EnginePlant, read_point};
use crate::report::{NodeReport, SessionReport};

/// Options for simulation runs.
#[derive(Clone, Debug)]
pub struct SimOptions {
    /// Control step: simulated seconds between controller invocations.
    pub step_s: f64,
    /// Maximum number of steps (safety limit).
    pub max_steps: usize,
    /// Record every N-th step.
    pub record_every: usize,
    /// Readings captured into the run record.
    pub record: Vec<MonitoredRef>,
    /// Where to write the JSON report on close.
    pub report_path: Option<PathBuf>,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            step_s: 300.0,
            max_steps: 1_000_000,
            record_every: 1,
            record: Vec::new(),
            report_path: None,
        }
    }
}

/// Recorded readings, one row per recorded step.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SimRecord {
    pub labels: Vec<String>,
    pub time: Vec<NaiveDateTime>,
    pub rows: Vec<Vec<f64>>,
}

impl SimRecord {
    /// Time series for one label.
    pub fn series(&self, label: &str) -> Option<Vec<(NaiveDateTime, f64)>> {
        let col = self.labels.iter().position(|l| l == label)?;
        Some(
            self.time
                .iter()
                .zip(&self.rows)
                .map(|(t, row)| (*t, row[col]))
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }
}

/// What a completed run produced.
#[derive(Clone, Debug)]
pub struct RunOutcome {
    pub steps: usize,
    pub end_time: NaiveDateTime,
    pub routing: RoutingStats,
    pub record: SimRecord,
}

/// Scoped simulation session.
pub struct Simulation<E: Engine> {
    engine: E,
    opts: SimOptions,
    recorded: Vec<MonitoredPoint>,
    max_depth: Vec<f64>,
    steps: usize,
    started: bool,
    closed: bool,
}

impl<E: Engine> Simulation<E> {
    /// Open a session over `engine`.
    ///
    /// # Errors
    ///
    /// - [`SimError::InvalidArg`] for non-positive step or record settings
    /// - [`SimError::UnknownHandle`] if a recorded reading names a missing element
    pub fn open(engine: E, opts: SimOptions) -> SimResult<Self> {
        if !(opts.step_s > 0.0 && opts.step_s.is_finite()) {
            return Err(SimError::InvalidArg {
                what: "step_s must be positive".to_string(),
            });
        }
        if opts.max_steps == 0 {
            return Err(SimError::InvalidArg {
                what: "max_steps must be positive".to_string(),
            });
        }
        if opts.record_every == 0 {
            return Err(SimError::InvalidArg {
                what: "record_every must be positive".to_string(),
            });
        }

        let mut sim = Self {
            max_depth: vec![0.0; engine.node_count()],
            engine,
            opts,
            recorded: Vec::new(),
            steps: 0,
            started: false,
            closed: false,
        };
        // Resolve before any step runs; a bad name aborts the open and the
        // half-built session is finalized by drop.
        sim.recorded = sim
            .opts
            .record
            .iter()
            .map(|r| r.resolve(&sim))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(sim)
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn options(&self) -> &SimOptions {
        &self.opts
    }

    /// Drive the engine from start to end, calling `controller` before each
    /// advance of `step_s`.
    ///
    /// A session runs once; a second call fails.
    pub fn run<C: StepController + ?Sized>(&mut self, controller: &mut C) -> SimResult<RunOutcome> {
        if self.started {
            return Err(SimError::InvalidArg {
                what: "session has already run".to_string(),
            });
        }
        if self.closed {
            return Err(SimError::EngineFailure {
                message: "session is closed".to_string(),
            });
        }

        info!(
            start = %self.engine.start_time(),
            end = %self.engine.end_time(),
            step_s = self.opts.step_s,
            "starting simulation"
        );
        self.started = true;
        self.engine.start()?;

        let mut record = SimRecord {
            labels: self.opts.record.iter().map(MonitoredRef::label).collect(),
            ..SimRecord::default()
        };

        let mut index = 0;
        while self.engine.current_time() < self.engine.end_time() {
            if index >= self.opts.max_steps {
                return Err(SimError::EngineFailure {
                    message: format!("step limit of {} reached", self.opts.max_steps),
                });
            }

            let step = StepInfo::new(index, self.engine.current_time());
            controller.on_step(&step, &mut EnginePlant::new(&mut self.engine));
            self.engine.advance(self.opts.step_s)?;
            self.track_maxima();
            index += 1;

            if index % self.opts.record_every == 0 {
                self.push_row(&mut record);
            }
            debug!(step = index, time = %self.engine.current_time(), "advanced");
        }
        if index % self.opts.record_every != 0 {
            self.push_row(&mut record);
        }
        self.steps = index;

        let routing = self.engine.routing_stats();
        info!(
            steps = index,
            flooding_ft3 = routing.flooding,
            continuity_error_pct = routing.continuity_error_pct(),
            "simulation complete"
        );

        Ok(RunOutcome {
            steps: index,
            end_time: self.engine.current_time(),
            routing,
            record,
        })
    }

    /// Finalize the engine and write the report if one is configured and the
    /// session has run.
    pub fn close(mut self) -> SimResult<SessionReport> {
        self.finalize()
    }

    /// Snapshot of the per-node statistics gathered so far.
    pub fn report(&self) -> SessionReport {
        let routing = self.engine.routing_stats();
        let nodes = (0..self.engine.node_count())
            .map(|i| {
                let id = Id::from_index(i);
                NodeReport {
                    name: self.engine.node_name(id).unwrap_or_default().to_string(),
                    max_depth_ft: self.max_depth[i],
                    flooding_ft3: self.engine.flooding_volume(id),
                    cumulative_inflow_ft3: self.engine.cumulative_inflow(id),
                }
            })
            .collect();
        SessionReport {
            start: self.engine.start_time(),
            end: self.engine.current_time(),
            steps: self.steps,
            routing,
            continuity_error_pct: routing.continuity_error_pct(),
            nodes,
        }
    }

    fn finalize(&mut self) -> SimResult<SessionReport> {
        if self.closed {
            return Err(SimError::EngineFailure {
                message: "session already closed".to_string(),
            });
        }
        self.closed = true;
        self.engine.finish()?;

        let report = self.report();
        if let (true, Some(path)) = (self.started, &self.opts.report_path) {
            report.write_json(path)?;
            info!(path = %path.display(), "wrote report");
        }
        Ok(report)
    }

    fn track_maxima(&mut self) {
        for (i, max) in self.max_depth.iter_mut().enumerate() {
            *max = max.max(self.engine.depth(Id::from_index(i)));
        }
    }

    fn push_row(&self, record: &mut SimRecord) {
        record.time.push(self.engine.current_time());
        record.rows.push(
            self.recorded
                .iter()
                .map(|p| read_point(&self.engine, *p))
                .collect(),
        );
    }
}

impl<E: Engine> HandleResolver for Simulation<E> {
    fn resolve_node(&self, name: &str) -> Option<PointId> {
        self.engine.node_index(name)
    }

    fn resolve_link(&self, name: &str) -> Option<ActuatorId> {
        self.engine.link_index(name)
    }
}

impl<E: Engine> Drop for Simulation<E> {
    fn drop(&mut self) {
        if !self.closed {
            if let Err(e) = self.finalize() {
                warn!(error = %e, "failed to finalize simulation on drop");
            }
        }
    }
}
