//! Rule-based step controller.
//!
//! A [`RuleSet`] names actuators and monitored points by their network names
//! and is usually loaded from a scenario file. [`RuleSet::compile`] resolves
//! every name against the engine up front and produces a [`RuleController`].
//!
//! Per step the controller evaluates, in this order:
//! 1. baseline settings (first step only)
//! 2. time-window rules
//! 3. curve rules
//! 4. override rules
//!
//! Later writes replace earlier ones for the same actuator, so overrides win.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use sc_core::ActuatorId;

use crate::controller::{ControlPlant, StepController, StepInfo, TargetPlan};
use crate::curve::ControlCurve;
use crate::error::{ControlError, ControlResult};
use crate::measured::{HandleResolver, MonitoredPoint, MonitoredRef, Readings};

/// Fixed target for one actuator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Setting {
    pub actuator: String,
    pub value: f64,
}

impl Setting {
    pub fn new(actuator: impl Into<String>, value: f64) -> Self {
        Self {
            actuator: actuator.into(),
            value,
        }
    }
}

/// `before` until `cutoff`, `after` from `cutoff` on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeWindowRule {
    pub actuator: String,
    pub cutoff: NaiveDateTime,
    pub before: f64,
    pub after: f64,
}

/// Actuator setting looked up from a live reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveRule {
    pub actuator: String,
    pub input: MonitoredRef,
    pub curve: ControlCurve,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Comparison {
    Above,
    AtOrAbove,
    Below,
    AtOrBelow,
}

impl Comparison {
    /// NaN never satisfies a comparison.
    pub fn holds(self, value: f64, threshold: f64) -> bool {
        match self {
            Self::Above => value > threshold,
            Self::AtOrAbove => value >= threshold,
            Self::Below => value < threshold,
            Self::AtOrBelow => value <= threshold,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub input: MonitoredRef,
    pub comparison: Comparison,
    pub threshold: f64,
}

/// Settings forced whenever `when` holds, regardless of earlier rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverrideRule {
    pub when: Condition,
    pub set: Vec<Setting>,
}

/// Unresolved control configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleSet {
    #[serde(default)]
    pub baseline: Vec<Setting>,
    #[serde(default)]
    pub time_windows: Vec<TimeWindowRule>,
    #[serde(default)]
    pub curves: Vec<CurveRule>,
    #[serde(default)]
    pub overrides: Vec<OverrideRule>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_baseline(mut self, actuator: impl Into<String>, value: f64) -> Self {
        self.baseline.push(Setting::new(actuator, value));
        self
    }

    pub fn with_time_window(
        mut self,
        actuator: impl Into<String>,
        cutoff: NaiveDateTime,
        before: f64,
        after: f64,
    ) -> Self {
        self.time_windows.push(TimeWindowRule {
            actuator: actuator.into(),
            cutoff,
            before,
            after,
        });
        self
    }

    pub fn with_curve(
        mut self,
        actuator: impl Into<String>,
        input: MonitoredRef,
        curve: ControlCurve,
    ) -> Self {
        self.curves.push(CurveRule {
            actuator: actuator.into(),
            input,
            curve,
        });
        self
    }

    pub fn with_override(mut self, when: Condition, set: Vec<Setting>) -> Self {
        self.overrides.push(OverrideRule { when, set });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.baseline.is_empty()
            && self.time_windows.is_empty()
            && self.curves.is_empty()
            && self.overrides.is_empty()
    }

    /// Every element name referenced by the rules, in rule order.
    pub fn referenced_links(&self) -> impl Iterator<Item = &str> {
        let baseline = self.baseline.iter().map(|s| s.actuator.as_str());
        let windows = self.time_windows.iter().map(|w| w.actuator.as_str());
        let curves = self.curves.iter().map(|c| c.actuator.as_str());
        let overrides = self
            .overrides
            .iter()
            .flat_map(|o| o.set.iter().map(|s| s.actuator.as_str()));
        baseline.chain(windows).chain(curves).chain(overrides)
    }

    /// Every monitored input referenced by the rules.
    pub fn referenced_inputs(&self) -> impl Iterator<Item = &MonitoredRef> {
        self.curves
            .iter()
            .map(|c| &c.input)
            .chain(self.overrides.iter().map(|o| &o.when.input))
    }

    /// Resolve all names and check all literals.
    ///
    /// # Errors
    ///
    /// - [`ControlError::UnknownHandle`] if any actuator or input name does not
    ///   exist in the network.
    /// - [`ControlError::InvalidArg`] if a setting or threshold is not finite.
    pub fn compile(&self, resolver: &dyn HandleResolver) -> ControlResult<RuleController> {
        let baseline = self
            .baseline
            .iter()
            .map(|s| resolve_setting(s, resolver))
            .collect::<ControlResult<Vec<_>>>()?;

        let time_windows = self
            .time_windows
            .iter()
            .map(|w| {
                check_finite(w.before, "time window 'before' setting")?;
                check_finite(w.after, "time window 'after' setting")?;
                Ok(CompiledWindow {
                    actuator: resolver.require_link(&w.actuator)?,
                    cutoff: w.cutoff,
                    before: w.before,
                    after: w.after,
                })
            })
            .collect::<ControlResult<Vec<_>>>()?;

        let curves = self
            .curves
            .iter()
            .map(|c| {
                Ok(CompiledCurve {
                    actuator: resolver.require_link(&c.actuator)?,
                    input: c.input.resolve(resolver)?,
                    curve: c.curve.clone(),
                })
            })
            .collect::<ControlResult<Vec<_>>>()?;

        let overrides = self
            .overrides
            .iter()
            .map(|o| {
                check_finite(o.when.threshold, "override threshold")?;
                Ok(CompiledOverride {
                    input: o.when.input.resolve(resolver)?,
                    comparison: o.when.comparison,
                    threshold: o.when.threshold,
                    set: o
                        .set
                        .iter()
                        .map(|s| resolve_setting(s, resolver))
                        .collect::<ControlResult<Vec<_>>>()?,
                })
            })
            .collect::<ControlResult<Vec<_>>>()?;

        Ok(RuleController {
            baseline,
            time_windows,
            curves,
            overrides,
        })
    }
}

fn check_finite(value: f64, what: &str) -> ControlResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ControlError::InvalidArg {
            what: format!("{what} must be finite, got {value}"),
        })
    }
}

fn resolve_setting(
    setting: &Setting,
    resolver: &dyn HandleResolver,
) -> ControlResult<(ActuatorId, f64)> {
    check_finite(setting.value, "setting")?;
    Ok((resolver.require_link(&setting.actuator)?, setting.value))
}

#[derive(Debug, Clone)]
struct CompiledWindow {
    actuator: ActuatorId,
    cutoff: NaiveDateTime,
    before: f64,
    after: f64,
}

#[derive(Debug, Clone)]
struct CompiledCurve {
    actuator: ActuatorId,
    input: MonitoredPoint,
    curve: ControlCurve,
}

#[derive(Debug, Clone)]
struct CompiledOverride {
    input: MonitoredPoint,
    comparison: Comparison,
    threshold: f64,
    set: Vec<(ActuatorId, f64)>,
}

/// Compiled rule set. Holds no state between steps.
#[derive(Debug, Clone)]
pub struct RuleController {
    baseline: Vec<(ActuatorId, f64)>,
    time_windows: Vec<CompiledWindow>,
    curves: Vec<CompiledCurve>,
    overrides: Vec<CompiledOverride>,
}

impl RuleController {
    /// Compute the targets for one step without writing them.
    pub fn plan<R: Readings + ?Sized>(&self, step: &StepInfo, readings: &R) -> TargetPlan {
        let mut plan = TargetPlan::new();

        if step.is_first() {
            for &(actuator, value) in &self.baseline {
                plan.set(actuator, value);
            }
        }

        for w in &self.time_windows {
            let value = if step.time < w.cutoff { w.before } else { w.after };
            plan.set(w.actuator, value);
        }

        for c in &self.curves {
            let reading = readings.read(c.input);
            plan.set(c.actuator, c.curve.evaluate(reading));
        }

        for o in &self.overrides {
            let reading = readings.read(o.input);
            if o.comparison.holds(reading, o.threshold) {
                tracing::debug!(
                    step = step.index,
                    reading,
                    threshold = o.threshold,
                    "override engaged"
                );
                for &(actuator, value) in &o.set {
                    plan.set(actuator, value);
                }
            }
        }

        plan
    }
}

impl StepController for RuleController {
    fn on_step(&mut self, step: &StepInfo, plant: &mut dyn ControlPlant) {
        let plan = self.plan(step, &*plant);
        plan.apply(plant);
    }
}
