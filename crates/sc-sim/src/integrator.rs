//! Fixed-step time integrators.

use crate::error::SimResult;
use crate::model::TransientModel;

/// Trait for time integrators.
pub trait Integrator {
    /// Advance state by one time step using the transient model.
    fn step<M: TransientModel>(
        &self,
        model: &mut M,
        t: f64,
        x: &M::State,
        dt: f64,
    ) -> SimResult<M::State>;
}

/// Forward Euler (explicit, 1st order).
///
/// Mass balance stays exact for storage models because every flux is applied
/// once, with the same rate, to both the node it leaves and the node it enters.
#[derive(Clone, Debug, Default)]
pub struct ForwardEuler;

impl Integrator for ForwardEuler {
    fn step<M: TransientModel>(
        &self,
        model: &mut M,
        t: f64,
        x: &M::State,
        dt: f64,
    ) -> SimResult<M::State> {
        let xdot = model.rhs(t, x)?;
        Ok(model.add(x, &model.scale(&xdot, dt)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// dx/dt = -x
    struct Decay;

    impl TransientModel for Decay {
        type State = f64;

        fn rhs(&mut self, _t: f64, x: &f64) -> SimResult<f64> {
            Ok(-x)
        }

        fn add(&self, a: &f64, b: &f64) -> f64 {
            a + b
        }

        fn scale(&self, a: &f64, scale: f64) -> f64 {
            a * scale
        }
    }

    #[test]
    fn euler_decay_step() {
        let x = ForwardEuler.step(&mut Decay, 0.0, &1.0, 0.1).unwrap();
        assert!((x - 0.9).abs() < 1e-12);
    }
}
