//! Scene entities
//!
//! An [`Entity`] is the visual record of one circuit element or wire segment.
//! Identity is fixed at construction; everything else is freely mutable, and
//! the cached transform is rebuilt on every pose mutation so readers never see
//! a matrix that disagrees with the pose.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::circuit::ComponentRef;
use crate::foundation::math::{Mat4, Vec3};
use crate::scene::lod::LodTier;

/// Closed set of visual kinds an entity can represent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityKind {
    /// Two-input AND gate
    AndGate,
    /// OR gate
    OrGate,
    /// Inverter
    NotGate,
    /// Exclusive OR gate
    XorGate,
    /// NAND gate
    NandGate,
    /// NOR gate
    NorGate,
    /// Non-inverting buffer
    Buffer,
    /// D flip-flop
    FlipFlopD,
    /// JK flip-flop
    FlipFlopJk,
    /// T flip-flop
    FlipFlopT,
    /// Random access memory
    Ram,
    /// Read-only memory
    Rom,
    /// Pull-up / pull-down resistor
    PullResistor,
    /// Clock source
    Clock,
    /// Input/output pin
    Pin,
    /// Wire segment
    Wire,
    /// Anything not in the table above
    Unknown,
}

impl EntityKind {
    /// Every kind, in declaration order
    pub const ALL: [Self; 17] = [
        Self::AndGate,
        Self::OrGate,
        Self::NotGate,
        Self::XorGate,
        Self::NandGate,
        Self::NorGate,
        Self::Buffer,
        Self::FlipFlopD,
        Self::FlipFlopJk,
        Self::FlipFlopT,
        Self::Ram,
        Self::Rom,
        Self::PullResistor,
        Self::Clock,
        Self::Pin,
        Self::Wire,
        Self::Unknown,
    ];

    /// Canonical tag used in exports
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AndGate => "AND_GATE",
            Self::OrGate => "OR_GATE",
            Self::NotGate => "NOT_GATE",
            Self::XorGate => "XOR_GATE",
            Self::NandGate => "NAND_GATE",
            Self::NorGate => "NOR_GATE",
            Self::Buffer => "BUFFER",
            Self::FlipFlopD => "FLIP_FLOP_D",
            Self::FlipFlopJk => "FLIP_FLOP_JK",
            Self::FlipFlopT => "FLIP_FLOP_T",
            Self::Ram => "RAM",
            Self::Rom => "ROM",
            Self::PullResistor => "PULL_RESISTOR",
            Self::Clock => "CLOCK",
            Self::Pin => "PIN",
            Self::Wire => "WIRE",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Parse a canonical tag; unrecognized tags map to [`EntityKind::Unknown`]
    pub fn from_tag(tag: &str) -> Self {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == tag)
            .unwrap_or(Self::Unknown)
    }
}

impl FromStr for EntityKind {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_tag(s))
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// RGBA color with components nominally in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Red
    pub r: f32,
    /// Green
    pub g: f32,
    /// Blue
    pub b: f32,
    /// Alpha
    pub a: f32,
}

impl Color {
    /// Mid-gray, fully opaque
    pub const DEFAULT: Self = Self::new(0.5, 0.5, 0.5, 1.0);

    /// Create a color from its components
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Logic state carried by an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SignalState {
    /// Current signal value as reported by the simulator
    pub value: i32,
    /// Bus width in bits
    pub bit_width: u32,
}

impl SignalState {
    /// Create a signal state
    pub const fn new(value: i32, bit_width: u32) -> Self {
        Self { value, bit_width }
    }
}

impl Default for SignalState {
    fn default() -> Self {
        Self { value: 0, bit_width: 1 }
    }
}

/// Visual record of one circuit element or wire
#[derive(Clone)]
pub struct Entity {
    id: String,
    kind: EntityKind,
    position: Vec3,
    rotation: Vec3,
    scale: Vec3,
    transform: Mat4,
    color: Color,
    highlighted: bool,
    signal: SignalState,
    lod: LodTier,
    source: Option<ComponentRef>,
}

impl Entity {
    /// Create an entity at the origin with unit scale and an identity transform
    pub fn new(id: impl Into<String>, kind: EntityKind) -> Self {
        Self {
            id: id.into(),
            kind,
            position: Vec3::zeros(),
            rotation: Vec3::zeros(),
            scale: Vec3::new(1.0, 1.0, 1.0),
            transform: Mat4::identity(),
            color: Color::DEFAULT,
            highlighted: false,
            signal: SignalState::default(),
            lod: LodTier::High,
            source: None,
        }
    }

    /// Builder pattern: set position
    pub fn with_position(mut self, x: f32, y: f32, z: f32) -> Self {
        self.set_position(x, y, z);
        self
    }

    /// Builder pattern: attach the originating upstream component
    pub fn with_source(mut self, source: ComponentRef) -> Self {
        self.source = Some(source);
        self
    }

    /// Stable identity, matching the upstream component id
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Visual kind
    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// World position
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Euler rotation (radians)
    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    /// Per-axis scale
    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    /// Cached affine transform
    pub fn transform(&self) -> &Mat4 {
        &self.transform
    }

    /// RGBA color
    pub fn color(&self) -> Color {
        self.color
    }

    /// Whether the entity is highlighted
    pub fn is_highlighted(&self) -> bool {
        self.highlighted
    }

    /// Logic state
    pub fn signal(&self) -> SignalState {
        self.signal
    }

    /// Detail tier assigned by the last tick
    pub fn lod(&self) -> LodTier {
        self.lod
    }

    /// Originating upstream component, if any
    pub fn source(&self) -> Option<&ComponentRef> {
        self.source.as_ref()
    }

    /// Move the entity and rebuild its transform
    pub fn set_position(&mut self, x: f32, y: f32, z: f32) {
        self.position = Vec3::new(x, y, z);
        self.update_transform();
    }

    /// Set Euler rotation (radians) and rebuild the transform
    pub fn set_rotation(&mut self, x: f32, y: f32, z: f32) {
        self.rotation = Vec3::new(x, y, z);
        self.update_transform();
    }

    /// Set per-axis scale and rebuild the transform
    pub fn set_scale(&mut self, x: f32, y: f32, z: f32) {
        self.scale = Vec3::new(x, y, z);
        self.update_transform();
    }

    /// Replace the transform with a precomputed column-major 4x4 matrix.
    ///
    /// Returns `false` and leaves the entity untouched unless `matrix` holds
    /// exactly 16 elements. The pose fields are not derived back from it.
    pub fn set_transform(&mut self, matrix: &[f32]) -> bool {
        if matrix.len() != 16 {
            log::warn!(
                "Rejected transform for '{}': expected 16 elements, got {}",
                self.id,
                matrix.len()
            );
            return false;
        }
        self.transform = Mat4::from_column_slice(matrix);
        true
    }

    /// Set RGBA color
    pub fn set_color(&mut self, r: f32, g: f32, b: f32, a: f32) {
        self.color = Color::new(r, g, b, a);
    }

    /// Set logic state
    pub fn set_signal(&mut self, value: i32, bit_width: u32) {
        self.signal = SignalState::new(value, bit_width);
    }

    /// Toggle highlight
    pub fn set_highlighted(&mut self, highlighted: bool) {
        self.highlighted = highlighted;
    }

    pub(crate) fn set_lod(&mut self, tier: LodTier) {
        self.lod = tier;
    }

    // Scale on the diagonal, translation in the last column. Rotation is
    // stored but not composed into the matrix yet.
    fn update_transform(&mut self) {
        self.transform[(0, 0)] = self.scale.x;
        self.transform[(1, 1)] = self.scale.y;
        self.transform[(2, 2)] = self.scale.z;
        self.transform[(0, 3)] = self.position.x;
        self.transform[(1, 3)] = self.position.y;
        self.transform[(2, 3)] = self.position.z;
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("position", &self.position)
            .field("rotation", &self.rotation)
            .field("scale", &self.scale)
            .field("color", &self.color)
            .field("highlighted", &self.highlighted)
            .field("signal", &self.signal)
            .field("lod", &self.lod)
            .field("source", &self.source.as_ref().map(|s| s.id().to_string()))
            .finish_non_exhaustive()
    }
}
