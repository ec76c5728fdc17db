//! Read-only view of upstream circuit components

use std::fmt;
use std::sync::Arc;

/// A component of the upstream circuit model
pub trait CircuitComponent: Send + Sync {
    /// Stable identity, reused as the entity id
    fn id(&self) -> &str;

    /// Upstream kind name such as `AndGate` or `JKFlipFlop`
    fn kind_name(&self) -> &str;

    /// Authoritative 2D placement on the schematic
    fn location(&self) -> (f32, f32);
}

/// Shared, read-only handle to an upstream component
pub type ComponentRef = Arc<dyn CircuitComponent>;

impl fmt::Debug for dyn CircuitComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CircuitComponent")
            .field("id", &self.id())
            .field("kind_name", &self.kind_name())
            .field("location", &self.location())
            .finish()
    }
}

/// Plain-data component for hosts without their own component type
#[derive(Debug, Clone, PartialEq)]
pub struct CircuitElement {
    id: String,
    kind_name: String,
    x: f32,
    y: f32,
}

impl CircuitElement {
    /// Create an element at schematic coordinates `(x, y)`
    pub fn new(id: impl Into<String>, kind_name: impl Into<String>, x: f32, y: f32) -> Self {
        Self {
            id: id.into(),
            kind_name: kind_name.into(),
            x,
            y,
        }
    }

    /// Create an element already wrapped as a [`ComponentRef`]
    pub fn shared(id: impl Into<String>, kind_name: impl Into<String>, x: f32, y: f32) -> ComponentRef {
        Arc::new(Self::new(id, kind_name, x, y))
    }
}

impl CircuitComponent for CircuitElement {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind_name(&self) -> &str {
        &self.kind_name
    }

    fn location(&self) -> (f32, f32) {
        (self.x, self.y)
    }
}
