//! Upstream kind table and entity construction
//!
//! Maps upstream kind names to [`EntityKind`]s and places new entities at
//! their schematic location. Unrecognized kinds become `Unknown` entities.

use std::collections::HashMap;

use super::ComponentRef;
use crate::foundation::math::Vec3;
use crate::scene::{Entity, EntityKind};

/// Upstream kind names understood out of the box
const BUILTIN_KINDS: [(&str, EntityKind); 15] = [
    ("AndGate", EntityKind::AndGate),
    ("OrGate", EntityKind::OrGate),
    ("NotGate", EntityKind::NotGate),
    ("XorGate", EntityKind::XorGate),
    ("NandGate", EntityKind::NandGate),
    ("NorGate", EntityKind::NorGate),
    ("Buffer", EntityKind::Buffer),
    ("DFlipFlop", EntityKind::FlipFlopD),
    ("JKFlipFlop", EntityKind::FlipFlopJk),
    ("TFlipFlop", EntityKind::FlipFlopT),
    ("Ram", EntityKind::Ram),
    ("Rom", EntityKind::Rom),
    ("PullResistor", EntityKind::PullResistor),
    ("Clock", EntityKind::Clock),
    ("Pin", EntityKind::Pin),
];

/// Cross-section of a wire entity
const WIRE_THICKNESS: f32 = 0.1;

/// Builds entities from upstream components
#[derive(Debug, Clone)]
pub struct ComponentFactory {
    kinds: HashMap<String, EntityKind>,
}

impl Default for ComponentFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl ComponentFactory {
    /// Create a factory with the built-in kind table
    pub fn new() -> Self {
        Self {
            kinds: BUILTIN_KINDS
                .iter()
                .map(|(name, kind)| ((*name).to_string(), *kind))
                .collect(),
        }
    }

    /// Map an upstream kind name; unrecognized names map to `Unknown`
    pub fn kind_for(&self, kind_name: &str) -> EntityKind {
        self.kinds.get(kind_name).copied().unwrap_or(EntityKind::Unknown)
    }

    /// Teach the factory an additional (or replacement) upstream kind name
    pub fn register_kind(&mut self, kind_name: impl Into<String>, kind: EntityKind) {
        let kind_name = kind_name.into();
        log::debug!("Registered component kind '{kind_name}' as {kind}");
        self.kinds.insert(kind_name, kind);
    }

    /// Entity for `component`, placed on the Z = 0 plane
    pub fn create(&self, component: &ComponentRef) -> Entity {
        let kind = self.kind_for(component.kind_name());
        if kind == EntityKind::Unknown {
            log::debug!(
                "Component '{}' has unrecognized kind '{}'",
                component.id(),
                component.kind_name()
            );
        }

        let (x, y) = component.location();
        Entity::new(component.id(), kind)
            .with_position(x, y, 0.0)
            .with_source(ComponentRef::clone(component))
    }

    /// Wire entity from `start` to `end`, stretched along X to the wire length
    pub fn create_wire(&self, id: impl Into<String>, start: Vec3, end: Vec3) -> Entity {
        let length = (end - start).norm();
        let mut wire = Entity::new(id, EntityKind::Wire).with_position(start.x, start.y, start.z);
        wire.set_scale(length, WIRE_THICKNESS, WIRE_THICKNESS);
        wire
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::CircuitElement;
    use approx::assert_relative_eq;

    #[test]
    fn test_builtin_kinds() {
        let factory = ComponentFactory::new();
        assert_eq!(factory.kind_for("AndGate"), EntityKind::AndGate);
        assert_eq!(factory.kind_for("JKFlipFlop"), EntityKind::FlipFlopJk);
        assert_eq!(factory.kind_for("PullResistor"), EntityKind::PullResistor);
        assert_eq!(factory.kind_for("Splitter"), EntityKind::Unknown);
    }

    #[test]
    fn test_create_projects_onto_ground_plane() {
        let factory = ComponentFactory::new();
        let component = CircuitElement::shared("g1", "XorGate", 120.0, -40.0);

        let entity = factory.create(&component);
        assert_eq!(entity.id(), "g1");
        assert_eq!(entity.kind(), EntityKind::XorGate);
        assert_relative_eq!(entity.position(), Vec3::new(120.0, -40.0, 0.0));
        assert_eq!(entity.source().map(|s| s.id()), Some("g1"));
    }

    #[test]
    fn test_register_kind() {
        let mut factory = ComponentFactory::new();
        let component = CircuitElement::shared("s1", "Splitter", 0.0, 0.0);
        assert_eq!(factory.create(&component).kind(), EntityKind::Unknown);

        factory.register_kind("Splitter", EntityKind::Buffer);
        assert_eq!(factory.create(&component).kind(), EntityKind::Buffer);
    }

    #[test]
    fn test_wire_spans_its_endpoints() {
        let factory = ComponentFactory::new();
        let wire = factory.create_wire("w1", Vec3::new(1.0, 2.0, 0.0), Vec3::new(4.0, 6.0, 0.0));

        assert_eq!(wire.kind(), EntityKind::Wire);
        assert_relative_eq!(wire.position(), Vec3::new(1.0, 2.0, 0.0));
        assert_relative_eq!(wire.scale(), Vec3::new(5.0, 0.1, 0.1));
        assert_relative_eq!(wire.transform()[(0, 0)], 5.0);
        assert_relative_eq!(wire.transform()[(1, 3)], 2.0);
    }
}
