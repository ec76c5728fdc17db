//! # Circuit Scene
//!
//! A live 3D scene model for logic circuits. The crate mirrors an externally
//! simulated circuit into a pool of visual entities and keeps it navigable.
//!
//! ## Features
//!
//! - **Entity Pool**: thread-safe registry of gates, memories, pins and wires
//! - **Circuit Sync**: reconcile the pool with upstream components and signal events
//! - **Camera Rig**: overview, top-down, first-person and orbit navigation with smoothing
//! - **Level of Detail**: per-frame distance-banded detail tiers
//! - **Time Travel**: bounded undo/redo history of simulation snapshots
//! - **Signal Tracing**: per-component ring buffers of value changes
//! - **Export**: versioned JSON and XML scene documents
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use circuit_scene::prelude::*;
//!
//! let registry = SceneRegistry::new();
//! registry.sync_with(&[
//!     CircuitElement::shared("g1", "AndGate", 0.0, 0.0),
//!     CircuitElement::shared("g2", "OrGate", 40.0, 0.0),
//! ]);
//!
//! let mut events = SceneEventAdapter::new(&registry);
//! SimulationEvent::SignalChanged {
//!     component_id: "g1".to_string(),
//!     value: 1,
//!     bit_width: 1,
//! }
//! .deliver_to(&mut events);
//!
//! registry.set_camera_mode_by_name("ORBIT");
//! registry.tick(1.0 / 60.0);
//! let json = registry.export_json()?;
//! # Ok::<(), ExportError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod circuit;
pub mod config;
pub mod export;
pub mod foundation;
pub mod history;
pub mod registry;
pub mod scene;
pub mod trace;

/// Common imports for crate users
pub mod prelude {
    pub use crate::{
        circuit::{
            CircuitChange, CircuitComponent, CircuitElement, ComponentFactory, ComponentRef,
            SceneEventAdapter, SimulationEvent, SimulationEventReceiver,
        },
        config::{Config, ConfigError, SceneConfig},
        export::{ExportError, ExportFormat},
        foundation::math::{Mat4, Vec3},
        history::{HistoryRecorder, Snapshot},
        registry::SceneRegistry,
        scene::{CameraMode, CameraRig, Color, Entity, EntityKind, LodSelector, LodTier, SignalState},
        trace::{SignalEvent, SignalTracer},
    };
}
