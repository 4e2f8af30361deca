//! Adapters between an [`Engine`] and the control traits.

use sc_controls::{ActuatorSink, HandleResolver, MonitoredPoint, Quantity, Readings};
use sc_core::{ActuatorId, PointId};

use crate::engine::Engine;

/// Read a resolved monitored quantity from an engine.
pub fn read_point<E: Engine + ?Sized>(engine: &E, point: MonitoredPoint) -> f64 {
    match point.quantity {
        Quantity::Depth => engine.depth(point.id),
        Quantity::Inflow => engine.total_inflow(point.id),
        Quantity::CumulativeInflow => engine.cumulative_inflow(point.id),
        Quantity::Volume => engine.volume(point.id),
        Quantity::LinkFlow => engine.link_flow(point.id),
    }
}

/// Mutable view of an engine handed to a step controller.
pub struct EnginePlant<'a, E: Engine + ?Sized> {
    engine: &'a mut E,
}

impl<'a, E: Engine + ?Sized> EnginePlant<'a, E> {
    pub fn new(engine: &'a mut E) -> Self {
        Self { engine }
    }
}

impl<E: Engine + ?Sized> Readings for EnginePlant<'_, E> {
    fn read(&self, point: MonitoredPoint) -> f64 {
        read_point(&*self.engine, point)
    }
}

impl<E: Engine + ?Sized> ActuatorSink for EnginePlant<'_, E> {
    fn set_target(&mut self, actuator: ActuatorId, setting: f64) {
        self.engine.set_target_setting(actuator, setting);
    }
}

impl<E: Engine + ?Sized> HandleResolver for EnginePlant<'_, E> {
    fn resolve_node(&self, name: &str) -> Option<PointId> {
        self.engine.node_index(name)
    }

    fn resolve_link(&self, name: &str) -> Option<ActuatorId> {
        self.engine.link_index(name)
    }
}
