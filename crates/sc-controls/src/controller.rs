//! Step controller contract.
//!
//! The simulation session calls [`StepController::on_step`] once per advance
//! of the engine, before the engine routes the next time quantum. The
//! controller reads the current state and proposes actuator targets; the
//! engine keeps whatever value was written last.

use chrono::NaiveDateTime;

use sc_core::ActuatorId;

use crate::measured::Readings;

/// Position of the current invocation within the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepInfo {
    /// 0-based step counter.
    pub index: usize,
    /// Simulation time at which the step starts.
    pub time: NaiveDateTime,
}

impl StepInfo {
    pub fn new(index: usize, time: NaiveDateTime) -> Self {
        Self { index, time }
    }

    /// True for the first invocation of a run.
    pub fn is_first(&self) -> bool {
        self.index == 0
    }
}

/// Write access to actuator targets.
pub trait ActuatorSink {
    fn set_target(&mut self, actuator: ActuatorId, setting: f64);
}

/// Everything a controller may touch during a step.
pub trait ControlPlant: Readings + ActuatorSink {}

impl<T: Readings + ActuatorSink + ?Sized> ControlPlant for T {}

/// Per-step control callback.
pub trait StepController {
    fn on_step(&mut self, step: &StepInfo, plant: &mut dyn ControlPlant);
}

/// Closures work as ad-hoc controllers.
impl<F> StepController for F
where
    F: FnMut(&StepInfo, &mut dyn ControlPlant),
{
    fn on_step(&mut self, step: &StepInfo, plant: &mut dyn ControlPlant) {
        self(step, plant)
    }
}

/// Controller that never writes a target. Used for the baseline run.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoControl;

impl StepController for NoControl {
    fn on_step(&mut self, _step: &StepInfo, _plant: &mut dyn ControlPlant) {}
}

/// Targets proposed during one step.
///
/// Setting an actuator twice keeps the later value in the position of the
/// first write, so `iter` reports actuators in first-touched order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TargetPlan {
    targets: Vec<(ActuatorId, f64)>,
}

impl TargetPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a target, returning the value it replaced.
    pub fn set(&mut self, actuator: ActuatorId, setting: f64) -> Option<f64> {
        match self.targets.iter_mut().find(|(id, _)| *id == actuator) {
            Some((_, value)) => Some(std::mem::replace(value, setting)),
            None => {
                self.targets.push((actuator, setting));
                None
            }
        }
    }

    pub fn get(&self, actuator: ActuatorId) -> Option<f64> {
        self.targets
            .iter()
            .find(|(id, _)| *id == actuator)
            .map(|(_, v)| *v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ActuatorId, f64)> + '_ {
        self.targets.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Push every target into the sink.
    pub fn apply<S: ActuatorSink + ?Sized>(&self, sink: &mut S) {
        for (actuator, setting) in self.iter() {
            sink.set_target(actuator, setting);
        }
    }
}
