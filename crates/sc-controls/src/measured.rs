//! Monitored readings and name resolution.
//!
//! Rules refer to network elements by the names used in the network
//! definition. Before a run starts those names are resolved against the
//! engine through a [`HandleResolver`]; any name that does not resolve is a
//! configuration error. During the run only resolved [`MonitoredPoint`]s are
//! read.

use serde::{Deserialize, Serialize};

use sc_core::{ActuatorId, Id, PointId};

use crate::error::{ControlError, ControlResult, HandleKind};

/// Quantity exposed by the engine for the current step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Quantity {
    /// Water depth at a node (ft).
    Depth,
    /// Total inflow rate into a node (cfs).
    Inflow,
    /// Inflow volume accumulated since the start of the run (ft³).
    CumulativeInflow,
    /// Stored volume at a node (ft³).
    Volume,
    /// Flow through a link (cfs).
    LinkFlow,
}

impl Quantity {
    pub fn handle_kind(self) -> HandleKind {
        match self {
            Self::LinkFlow => HandleKind::Link,
            _ => HandleKind::Node,
        }
    }
}

/// Reference to a monitored quantity, by element name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MonitoredRef {
    NodeDepth { node_id: String },
    NodeInflow { node_id: String },
    NodeCumulativeInflow { node_id: String },
    NodeVolume { node_id: String },
    LinkFlow { link_id: String },
}

impl MonitoredRef {
    pub fn node_depth(node_id: impl Into<String>) -> Self {
        Self::NodeDepth {
            node_id: node_id.into(),
        }
    }

    pub fn node_inflow(node_id: impl Into<String>) -> Self {
        Self::NodeInflow {
            node_id: node_id.into(),
        }
    }

    pub fn node_cumulative_inflow(node_id: impl Into<String>) -> Self {
        Self::NodeCumulativeInflow {
            node_id: node_id.into(),
        }
    }

    pub fn node_volume(node_id: impl Into<String>) -> Self {
        Self::NodeVolume {
            node_id: node_id.into(),
        }
    }

    pub fn link_flow(link_id: impl Into<String>) -> Self {
        Self::LinkFlow {
            link_id: link_id.into(),
        }
    }

    /// Name of the referenced node or link.
    pub fn element(&self) -> &str {
        match self {
            Self::NodeDepth { node_id }
            | Self::NodeInflow { node_id }
            | Self::NodeCumulativeInflow { node_id }
            | Self::NodeVolume { node_id } => node_id,
            Self::LinkFlow { link_id } => link_id,
        }
    }

    pub fn quantity(&self) -> Quantity {
        match self {
            Self::NodeDepth { .. } => Quantity::Depth,
            Self::NodeInflow { .. } => Quantity::Inflow,
            Self::NodeCumulativeInflow { .. } => Quantity::CumulativeInflow,
            Self::NodeVolume { .. } => Quantity::Volume,
            Self::LinkFlow { .. } => Quantity::LinkFlow,
        }
    }

    /// Short label such as `J18.depth`, used for recorded series.
    pub fn label(&self) -> String {
        let suffix = match self.quantity() {
            Quantity::Depth => "depth",
            Quantity::Inflow => "inflow",
            Quantity::CumulativeInflow => "cumulative_inflow",
            Quantity::Volume => "volume",
            Quantity::LinkFlow => "flow",
        };
        format!("{}.{}", self.element(), suffix)
    }

    /// Resolve the element name to a handle.
    pub fn resolve(&self, resolver: &dyn HandleResolver) -> ControlResult<MonitoredPoint> {
        let quantity = self.quantity();
        let id = match quantity.handle_kind() {
            HandleKind::Node => resolver.require_node(self.element())?,
            HandleKind::Link => resolver.require_link(self.element())?,
        };
        Ok(MonitoredPoint { id, quantity })
    }
}

/// A resolved monitored quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MonitoredPoint {
    /// Node id for node quantities, link id for [`Quantity::LinkFlow`].
    pub id: Id,
    pub quantity: Quantity,
}

/// Read access to the engine state for the current step.
///
/// Values are only meaningful for the step in which they are read.
pub trait Readings {
    fn read(&self, point: MonitoredPoint) -> f64;
}

/// Resolves network element names to handles.
pub trait HandleResolver {
    fn resolve_node(&self, name: &str) -> Option<PointId>;

    fn resolve_link(&self, name: &str) -> Option<ActuatorId>;

    /// Like [`resolve_node`](Self::resolve_node) but fails with `UnknownHandle`.
    fn require_node(&self, name: &str) -> ControlResult<PointId> {
        self.resolve_node(name)
            .ok_or_else(|| ControlError::UnknownHandle {
                kind: HandleKind::Node,
                name: name.to_string(),
            })
    }

    /// Like [`resolve_link`](Self::resolve_link) but fails with `UnknownHandle`.
    fn require_link(&self, name: &str) -> ControlResult<ActuatorId> {
        self.resolve_link(name)
            .ok_or_else(|| ControlError::UnknownHandle {
                kind: HandleKind::Link,
                name: name.to_string(),
            })
    }
}
