//! Scene model: entities, LOD selection, and the camera rig

pub mod camera;
pub mod entity;
pub mod lod;

pub use camera::{CameraMode, CameraRig, UnknownCameraMode};
pub use entity::{Color, Entity, EntityKind, SignalState};
pub use lod::{LodSelector, LodTier};
