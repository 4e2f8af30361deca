//! Piecewise-linear control curves.
//!
//! A control curve maps a monitored quantity (typically a water depth) to an
//! actuator setting (typically a fractional gate opening). Outside the
//! breakpoint range the curve is clamped to its end values, so evaluation is
//! defined for every input.

use serde::{Deserialize, Serialize};

use crate::error::{ControlError, ControlResult};

/// Immutable piecewise-linear lookup table.
///
/// Invariants (checked by [`ControlCurve::new`]):
/// - `xs.len() == ys.len() >= 2`
/// - every breakpoint is finite
/// - `xs` is non-decreasing; repeated values describe a vertical step
///
/// # Example
///
/// ```
/// use sc_controls::ControlCurve;
///
/// let curve = ControlCurve::new(vec![0.0, 3.0, 5.0], vec![0.0, 0.0, 1.0]).unwrap();
/// assert_eq!(curve.evaluate(4.0), 0.5);
/// assert_eq!(curve.evaluate(-1.0), 0.0);
/// assert_eq!(curve.evaluate(9.0), 1.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CurveRepr", into = "CurveRepr")]
pub struct ControlCurve {
    xs: Vec<f64>,
    ys: Vec<f64>,
}

impl ControlCurve {
    /// Build a curve from paired breakpoint sequences.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::InvalidCurve`] when the sequences differ in
    /// length, hold fewer than two points, contain non-finite values, or when
    /// `xs` decreases anywhere.
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> ControlResult<Self> {
        if xs.len() != ys.len() {
            return Err(ControlError::InvalidCurve {
                what: format!("{} x values but {} y values", xs.len(), ys.len()),
            });
        }
        if xs.len() < 2 {
            return Err(ControlError::InvalidCurve {
                what: format!("need at least 2 breakpoints, got {}", xs.len()),
            });
        }
        if let Some(i) = xs.iter().chain(&ys).position(|v| !v.is_finite()) {
            let axis = if i < xs.len() { "x" } else { "y" };
            return Err(ControlError::InvalidCurve {
                what: format!("non-finite {axis} breakpoint"),
            });
        }
        if let Some(i) = xs.windows(2).position(|w| w[1] < w[0]) {
            return Err(ControlError::InvalidCurve {
                what: format!(
                    "x values must be ascending (x[{}]={} > x[{}]={})",
                    i,
                    xs[i],
                    i + 1,
                    xs[i + 1]
                ),
            });
        }
        Ok(Self { xs, ys })
    }

    /// Build a curve from `(x, y)` pairs.
    pub fn from_points(points: &[(f64, f64)]) -> ControlResult<Self> {
        let (xs, ys) = points.iter().copied().unzip();
        Self::new(xs, ys)
    }

    /// Evaluate the curve at `x`.
    ///
    /// Inputs at or below the first breakpoint return the first y, inputs at
    /// or above the last breakpoint return the last y. At a vertical step
    /// (two breakpoints sharing an x) the value after the step is returned.
    /// A NaN input is treated as below range.
    pub fn evaluate(&self, x: f64) -> f64 {
        let last = self.xs.len() - 1;
        if x.is_nan() || x <= self.xs[0] {
            return self.ys[0];
        }
        if x >= self.xs[last] {
            return self.ys[last];
        }

        // Last breakpoint with xs[i] <= x, so a vertical step at x picks the
        // segment after it. 1 <= pp <= last here.
        let i = self.xs.partition_point(|&b| b <= x) - 1;
        let (x1, x2) = (self.xs[i], self.xs[i + 1]);
        let (y1, y2) = (self.ys[i], self.ys[i + 1]);

        let delta = x2 - x1;
        if delta <= 0.0 {
            return y2;
        }
        y1 + (y2 - y1) * (x - x1) / delta
    }

    /// Breakpoint x values.
    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    /// Breakpoint y values.
    pub fn ys(&self) -> &[f64] {
        &self.ys
    }

    /// Number of breakpoints.
    pub fn len(&self) -> usize {
        self.xs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    /// `(first x, last x)`.
    pub fn domain(&self) -> (f64, f64) {
        (self.xs[0], self.xs[self.xs.len() - 1])
    }
}

/// Serialized form. Either paired lists or a list of points.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum CurveRepr {
    Lists { xs: Vec<f64>, ys: Vec<f64> },
    Points { points: Vec<(f64, f64)> },
}

impl TryFrom<CurveRepr> for ControlCurve {
    type Error = ControlError;

    fn try_from(repr: CurveRepr) -> ControlResult<Self> {
        match repr {
            CurveRepr::Lists { xs, ys } => Self::new(xs, ys),
            CurveRepr::Points { points } => Self::from_points(&points),
        }
    }
}

impl From<ControlCurve> for CurveRepr {
    fn from(curve: ControlCurve) -> Self {
        CurveRepr::Lists {
            xs: curve.xs,
            ys: curve.ys,
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    /// Strictly increasing xs and non-decreasing ys of the same length.
    fn monotone_curve() -> impl Strategy<Value = ControlCurve> {
        (2usize..8)
            .prop_flat_map(|n| {
                (
                    -10.0_f64..10.0,
                    prop::collection::vec(0.01_f64..5.0, n - 1),
                    -5.0_f64..5.0,
                    prop::collection::vec(0.0_f64..2.0, n - 1),
                )
            })
            .prop_map(|(x0, dxs, y0, dys)| {
                let mut xs = vec![x0];
                let mut ys = vec![y0];
                for (dx, dy) in dxs.iter().zip(&dys) {
                    xs.push(xs[xs.len() - 1] + dx);
                    ys.push(ys[ys.len() - 1] + dy);
                }
                ControlCurve::new(xs, ys).unwrap()
            })
    }

    proptest! {
        #[test]
        fn clamps_outside_domain(curve in monotone_curve(), below in 0.0_f64..100.0, above in 0.0_f64..100.0) {
            let (lo, hi) = curve.domain();
            prop_assert_eq!(curve.evaluate(lo - below), curve.ys()[0]);
            prop_assert_eq!(curve.evaluate(hi + above), curve.ys()[curve.len() - 1]);
        }

        #[test]
        fn matches_segment_formula(curve in monotone_curve(), seg in 0usize..7, frac in 0.01_f64..0.99) {
            let i = seg % (curve.len() - 1);
            let (xs, ys) = (curve.xs(), curve.ys());
            let x = xs[i] + frac * (xs[i + 1] - xs[i]);
            let expected = ys[i] + (ys[i + 1] - ys[i]) * (x - xs[i]) / (xs[i + 1] - xs[i]);
            prop_assert!((curve.evaluate(x) - expected).abs() < 1e-9);
        }

        #[test]
        fn monotone_input_gives_monotone_output(curve in monotone_curve(), a in -20.0_f64..30.0, b in -20.0_f64..30.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(curve.evaluate(lo) <= curve.evaluate(hi) + 1e-12);
        }

        #[test]
        fn evaluation_is_repeatable(curve in monotone_curve(), x in -20.0_f64..30.0) {
            prop_assert_eq!(curve.evaluate(x).to_bits(), curve.evaluate(x).to_bits());
        }
    }
}
