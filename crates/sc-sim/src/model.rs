//! TransientModel trait for lumped dynamic systems.

use crate::error::SimResult;

/// Trait for transient (dynamic) system models.
///
/// A TransientModel must implement:
/// - State type (Clone, for snapshots)
/// - RHS (right-hand side) computation: x_dot = f(t, x)
/// - Scalar field arithmetic for integration: add states, scale by scalar
pub trait TransientModel {
    type State: Clone;

    /// Compute state derivative dxdt = f(t, x).
    ///
    /// Takes `&mut self` so models can cache quantities computed along the
    /// way (link flows, for instance) for later reads.
    fn rhs(&mut self, t: f64, x: &Self::State) -> SimResult<Self::State>;

    /// result = a + b.
    fn add(&self, a: &Self::State, b: &Self::State) -> Self::State;

    /// result = scale * a.
    fn scale(&self, a: &Self::State, scale: f64) -> Self::State;
}
