//! Simulation event delivery
//!
//! Upstream simulators report four kinds of events. A
//! [`SimulationEventReceiver`] reacts to them directly; producers that run on
//! another thread can queue [`SimulationEvent`] values instead and deliver
//! them later with [`SimulationEvent::deliver_to`].

use super::ComponentRef;
use crate::registry::SceneRegistry;

/// Structural change of the upstream circuit
#[derive(Debug, Clone, Default)]
pub struct CircuitChange {
    /// Every component of the circuit after the change
    pub components: Vec<ComponentRef>,
}

impl CircuitChange {
    /// Change whose resulting component set is `components`
    pub fn new(components: Vec<ComponentRef>) -> Self {
        Self { components }
    }
}

/// Receiver of upstream simulation events
pub trait SimulationEventReceiver {
    /// A component's output value changed
    fn on_signal_change(&mut self, component_id: &str, value: i32, bit_width: u32);

    /// The simulation clock ticked
    fn on_clock_tick(&mut self, timestamp: u64);

    /// Components were added or removed
    fn on_circuit_change(&mut self, change: &CircuitChange);

    /// Signal propagation settled
    fn on_propagation_complete(&mut self);

    /// Stop reacting to events
    fn cleanup(&mut self);
}

/// Queued form of a receiver callback
#[derive(Debug, Clone)]
pub enum SimulationEvent {
    /// See [`SimulationEventReceiver::on_signal_change`]
    SignalChanged {
        /// Component id
        component_id: String,
        /// New value
        value: i32,
        /// Bit width of the value
        bit_width: u32,
    },
    /// See [`SimulationEventReceiver::on_clock_tick`]
    ClockTick(u64),
    /// See [`SimulationEventReceiver::on_circuit_change`]
    CircuitChanged(CircuitChange),
    /// See [`SimulationEventReceiver::on_propagation_complete`]
    PropagationComplete,
}

impl SimulationEvent {
    /// Invoke the matching callback on `receiver`
    pub fn deliver_to(&self, receiver: &mut dyn SimulationEventReceiver) {
        match self {
            Self::SignalChanged {
                component_id,
                value,
                bit_width,
            } => receiver.on_signal_change(component_id, *value, *bit_width),
            Self::ClockTick(timestamp) => receiver.on_clock_tick(*timestamp),
            Self::CircuitChanged(change) => receiver.on_circuit_change(change),
            Self::PropagationComplete => receiver.on_propagation_complete(),
        }
    }
}

/// Applies simulation events to a [`SceneRegistry`]
#[derive(Debug)]
pub struct SceneEventAdapter<'a> {
    registry: &'a SceneRegistry,
    last_clock_tick: Option<u64>,
    active: bool,
}

impl<'a> SceneEventAdapter<'a> {
    /// Attach to `registry`
    pub fn new(registry: &'a SceneRegistry) -> Self {
        Self {
            registry,
            last_clock_tick: None,
            active: true,
        }
    }

    /// Timestamp of the most recent clock tick
    pub fn last_clock_tick(&self) -> Option<u64> {
        self.last_clock_tick
    }

    /// Whether events are still applied
    pub fn is_active(&self) -> bool {
        self.active
    }
}

impl SimulationEventReceiver for SceneEventAdapter<'_> {
    fn on_signal_change(&mut self, component_id: &str, value: i32, bit_width: u32) {
        if self.active {
            self.registry.update_component_state(component_id, value, bit_width);
        }
    }

    fn on_clock_tick(&mut self, timestamp: u64) {
        if self.active {
            log::trace!("Clock tick at {timestamp}");
            self.last_clock_tick = Some(timestamp);
        }
    }

    fn on_circuit_change(&mut self, change: &CircuitChange) {
        if self.active {
            self.registry.sync_with(&change.components);
        }
    }

    fn on_propagation_complete(&mut self) {
        if self.active {
            self.registry.request_render();
        }
    }

    fn cleanup(&mut self) {
        if self.active {
            log::debug!("Scene event adapter detached");
        }
        self.active = false;
    }
}
