//! Upstream circuit collaborators
//!
//! The scene never owns circuit logic. It sees upstream components through
//! the [`CircuitComponent`] trait, turns them into entities with a
//! [`ComponentFactory`], and reacts to simulation events delivered to a
//! [`SimulationEventReceiver`].

mod component;
mod events;
mod factory;

pub use component::{CircuitComponent, CircuitElement, ComponentRef};
pub use events::{CircuitChange, SceneEventAdapter, SimulationEvent, SimulationEventReceiver};
pub use factory::ComponentFactory;
