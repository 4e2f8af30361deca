//! Volume unit conversion applied to engine totals.

use serde::{Deserialize, Serialize};

use sc_core::constants::FT3_TO_MGAL;
use sc_core::{ft3, to_million_gallons};

/// Multiplier from engine volume units (ft³) to report units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VolumeConversion {
    pub factor: f64,
}

impl VolumeConversion {
    pub fn new(factor: f64) -> Self {
        Self { factor }
    }

    /// ft³ to million gallons using the 7.481 gal/ft³ figure the reports
    /// have always been produced with.
    pub fn million_gallons() -> Self {
        Self::new(FT3_TO_MGAL)
    }

    /// ft³ to million gallons using the exact US gallon definition.
    pub fn exact() -> Self {
        Self::new(to_million_gallons(ft3(1.0)))
    }

    pub fn apply(&self, volume_ft3: f64) -> f64 {
        volume_ft3 * self.factor
    }
}

impl Default for VolumeConversion {
    fn default() -> Self {
        Self::million_gallons()
    }
}
