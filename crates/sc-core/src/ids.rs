use core::fmt;
use core::num::NonZeroU32;

/// Compact identifier for a resolved network element.
///
/// Stored as index+1 so that `Option<Id>` costs nothing extra.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Id(NonZeroU32);

impl Id {
    /// Create an Id from a 0-based index, or `None` if it does not fit.
    pub fn try_from_index(index: usize) -> Option<Self> {
        u32::try_from(index)
            .ok()
            .and_then(|i| i.checked_add(1))
            .and_then(NonZeroU32::new)
            .map(Self)
    }

    /// Create an Id from a 0-based index.
    ///
    /// Indices past `u32::MAX - 1` saturate, so they all alias one handle.
    /// Engines that can hold that many elements use [`Id::try_from_index`].
    pub fn from_index(index: usize) -> Self {
        Self::try_from_index(index).unwrap_or(Self(NonZeroU32::MAX))
    }

    /// Recover the 0-based index.
    pub fn index(self) -> usize {
        (self.0.get() - 1) as usize
    }
}

impl fmt::Debug for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.index())
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index())
    }
}

/// Monitored point (node) in the engine's network.
pub type PointId = Id;
/// Controllable link (gate, pump, regulator, weir).
pub type ActuatorId = Id;
