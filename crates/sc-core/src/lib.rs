//! sc-core: shared foundation for sewerctl.
//!
//! Contains:
//! - units (uom volume/length/flow types + US customary constructors)
//! - numeric (Real + finiteness checks)
//! - ids (compact handle IDs for network elements)
//! - error (shared error types)

pub mod error;
pub mod ids;
pub mod numeric;
pub mod units;

pub use error::{CoreError, CoreResult};
pub use ids::*;
pub use numeric::*;
pub use units::*;
