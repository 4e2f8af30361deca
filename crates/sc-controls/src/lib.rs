//! Real-time control primitives for sewerctl.
//!
//! This crate holds the control logic that runs alongside an external
//! hydraulic engine. It never touches the engine directly: readings come in
//! through [`Readings`], targets go out through [`ActuatorSink`], and names
//! are turned into handles once, at setup, through [`HandleResolver`].
//!
//! # Architecture
//!
//! - [`ControlCurve`]: piecewise-linear lookup from a monitored quantity to an
//!   actuator setting
//! - [`StepController`]: callback invoked once per simulation step
//! - [`RuleSet`] / [`RuleController`]: baseline settings, time windows, curve
//!   rules and safety overrides, evaluated in that order with last-write-wins

pub mod controller;
pub mod curve;
pub mod error;
pub mod measured;
pub mod rules;

pub use controller::{
    ActuatorSink, ControlPlant, NoControl, StepController, StepInfo, TargetPlan,
};
pub use curve::ControlCurve;
pub use error::{ControlError, ControlResult, HandleKind};
pub use measured::{HandleResolver, MonitoredPoint, MonitoredRef, Quantity, Readings};
pub use rules::{
    Comparison, Condition, CurveRule, OverrideRule, RuleController, RuleSet, Setting,
    TimeWindowRule,
};
