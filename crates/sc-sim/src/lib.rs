//! Time-stepped simulation sessions for sewerctl.
//!
//! Provides:
//! - the [`Engine`] capability set consumed from a hydraulic engine
//! - a scoped [`Simulation`] session that drives the step loop and invokes a
//!   step controller once per advance
//! - a level-pool reference engine for demos and tests
//! - fixed-step integrators used by the reference engine

pub mod engine;
pub mod error;
pub mod integrator;
pub mod level_pool;
pub mod model;
pub mod plant;
pub mod report;
pub mod session;

pub use engine::{Engine, RoutingStats};
pub use error::{SimError, SimResult};
pub use integrator::{ForwardEuler, Integrator};
pub use level_pool::{
    Hydrograph, LevelPoolEngine, LevelPoolNetwork, PoolLink, PoolLinkKind, PoolNode,
    PoolNodeKind,
};
pub use model::TransientModel;
pub use plant::EnginePlant;
pub use report::{NodeReport, SessionReport};
pub use session::{RunOutcome, SimOptions, SimRecord, Simulation};
