//! # Scene Registry
//!
//! The registry is the single entry point to a scene session. It owns the
//! entity pool together with the camera rig, LOD selector, history recorder,
//! signal tracer and component factory, and exposes them to the circuit-sync,
//! export and UI sides of the host.
//!
//! ## Threading
//!
//! Every operation takes `&self`. One render loop calls [`SceneRegistry::tick`]
//! once per frame while producer threads add, remove and update entities
//! concurrently. The pool sits behind a `RwLock`; the other parts each have
//! their own lock. Locks are always taken in the order
//! camera → LOD → factory → pool, and the pool lock is never held while
//! waiting for the camera, history or tracer. Guards returned by
//! [`SceneRegistry::camera`] and friends must be dropped before calling
//! `tick`.
//!
//! ## Dirty tracking
//!
//! Every pool change sets the needs-render flag while the pool lock is still
//! held; only `tick` clears it, again under the pool lock, so a mutation can
//! never be lost between a frame's LOD pass and the flag reset.

#[cfg(test)]
mod tests;

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::{Mutex, MutexGuard, RwLock, RwLockReadGuard};

use crate::circuit::{ComponentFactory, ComponentRef};
use crate::config::SceneConfig;
use crate::export::{self, ExportError, ExportFormat};
use crate::foundation::time::SessionClock;
use crate::history::HistoryRecorder;
use crate::scene::{CameraRig, Entity, EntityKind, LodSelector, SignalState};
use crate::trace::SignalTracer;

/// Owner of all scene state for one session
#[derive(Debug)]
pub struct SceneRegistry {
    entities: RwLock<HashMap<String, Entity>>,
    camera: Mutex<CameraRig>,
    lod: RwLock<LodSelector>,
    history: Mutex<HistoryRecorder<SignalState>>,
    tracer: Mutex<SignalTracer>,
    factory: Mutex<ComponentFactory>,
    clock: SessionClock,
    needs_render: AtomicBool,
    show_labels: AtomicBool,
}

impl Default for SceneRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneRegistry {
    /// Create a registry with default configuration
    pub fn new() -> Self {
        Self::with_config(SceneConfig::default())
    }

    /// Create a registry with custom configuration
    pub fn with_config(config: SceneConfig) -> Self {
        if let Err(message) = config.validate() {
            log::warn!("Scene configuration has invalid values, replacing them with safe values: {message}");
        }

        log::info!("Scene registry created");
        Self {
            entities: RwLock::new(HashMap::new()),
            camera: Mutex::new(CameraRig::new(config.camera)),
            lod: RwLock::new(LodSelector::new(config.lod)),
            history: Mutex::new(HistoryRecorder::new(config.history)),
            tracer: Mutex::new(SignalTracer::new(config.trace)),
            factory: Mutex::new(ComponentFactory::new()),
            clock: SessionClock::new(),
            needs_render: AtomicBool::new(true),
            show_labels: AtomicBool::new(true),
        }
    }

    // ========== Entity pool ==========

    /// Insert `entity`, replacing any entity with the same id.
    ///
    /// Returns `true` if the id was new.
    pub fn add(&self, entity: Entity) -> bool {
        let mut entities = self.entities.write();
        let id = entity.id().to_string();
        let is_new = entities.insert(id.clone(), entity).is_none();
        self.mark_dirty();
        log::debug!("Added entity '{id}'");
        is_new
    }

    /// Remove the entity with `id`
    pub fn remove(&self, id: &str) -> Option<Entity> {
        let mut entities = self.entities.write();
        let removed = entities.remove(id);
        if removed.is_some() {
            self.mark_dirty();
            log::debug!("Removed entity '{id}'");
        }
        removed
    }

    /// Store `entity` under `id`.
    ///
    /// Rejected when `entity` carries a different id, since ids are
    /// immutable and the pool key must match.
    pub fn update(&self, id: &str, entity: Entity) -> bool {
        if entity.id() != id {
            log::warn!("Rejected update of '{id}' with entity '{}'", entity.id());
            return false;
        }
        let mut entities = self.entities.write();
        entities.insert(id.to_string(), entity);
        self.mark_dirty();
        true
    }

    /// Copy of the entity with `id`
    pub fn get(&self, id: &str) -> Option<Entity> {
        self.entities.read().get(id).cloned()
    }

    /// Copies of every entity, ordered by id
    pub fn get_all(&self) -> Vec<Entity> {
        let mut all: Vec<Entity> = self.entities.read().values().cloned().collect();
        all.sort_by(|a, b| a.id().cmp(b.id()));
        all
    }

    /// Whether an entity with `id` exists
    pub fn contains(&self, id: &str) -> bool {
        self.entities.read().contains_key(id)
    }

    /// Number of entities
    pub fn len(&self) -> usize {
        self.entities.read().len()
    }

    /// Whether the pool is empty
    pub fn is_empty(&self) -> bool {
        self.entities.read().is_empty()
    }

    /// Remove every entity
    pub fn clear(&self) {
        let mut entities = self.entities.write();
        entities.clear();
        self.mark_dirty();
        log::debug!("Cleared scene");
    }

    /// Replace the transform of `id` with a column-major 4x4 matrix
    pub fn update_transform(&self, id: &str, matrix: &[f32]) -> bool {
        self.modify(id, |entity| entity.set_transform(matrix))
    }

    /// Set the color of `id`
    pub fn update_color(&self, id: &str, r: f32, g: f32, b: f32, a: f32) -> bool {
        self.modify(id, |entity| {
            entity.set_color(r, g, b, a);
            true
        })
    }

    /// Toggle the highlight of `id`
    pub fn set_highlighted(&self, id: &str, highlighted: bool) -> bool {
        self.modify(id, |entity| {
            entity.set_highlighted(highlighted);
            true
        })
    }

    // ========== Circuit synchronization ==========

    /// Reconcile the pool with the upstream component list.
    ///
    /// Components without an entity are created through the factory and
    /// every entity whose id is not in `components` is removed, wires
    /// included. Existing entities keep their state, so repeated calls with
    /// the same list change nothing.
    pub fn sync_with(&self, components: &[ComponentRef]) {
        let factory = self.factory.lock();
        let wanted: HashSet<&str> = components.iter().map(|c| c.id()).collect();

        let mut entities = self.entities.write();
        let before = entities.len();

        entities.retain(|id, _| wanted.contains(id.as_str()));
        let removed = before - entities.len();

        let mut added = 0;
        for component in components {
            if !entities.contains_key(component.id()) {
                entities.insert(component.id().to_string(), factory.create(component));
                added += 1;
            }
        }

        if added > 0 || removed > 0 {
            self.mark_dirty();
            log::debug!("Synced scene: {added} added, {removed} removed");
        }
    }

    /// Apply a simulated signal change and feed the signal tracer
    pub fn update_component_state(&self, id: &str, value: i32, bit_width: u32) -> bool {
        let found = self.modify(id, |entity| {
            entity.set_signal(value, bit_width);
            true
        });
        self.tracer.lock().record(id, value, bit_width, self.clock.now_nanos());
        found
    }

    // ========== Frame ==========

    /// Advance the camera and reassign every entity's LOD tier
    pub fn tick(&self, delta_time: f32) {
        let mut camera = self.camera.lock();
        camera.update(delta_time);

        let lod = self.lod.read();
        let mut entities = self.entities.write();
        for entity in entities.values_mut() {
            let tier = lod.tier_for(camera.distance_to(&entity.position()));
            if tier != entity.lod() {
                log::trace!("Entity '{}' LOD {} -> {}", entity.id(), entity.lod(), tier);
                entity.set_lod(tier);
            }
        }

        self.needs_render.store(false, Ordering::Release);
    }

    /// Whether the scene changed since the last tick
    pub fn needs_render(&self) -> bool {
        self.needs_render.load(Ordering::Acquire)
    }

    /// Ask for a redraw without changing the pool
    pub fn request_render(&self) {
        self.needs_render.store(true, Ordering::Release);
    }

    /// Whether labels should be drawn
    pub fn show_labels(&self) -> bool {
        self.show_labels.load(Ordering::Relaxed)
    }

    /// Toggle label drawing
    pub fn set_show_labels(&self, show: bool) {
        self.show_labels.store(show, Ordering::Relaxed);
        self.request_render();
    }

    // ========== Owned parts ==========

    /// Lock the camera rig
    pub fn camera(&self) -> MutexGuard<'_, CameraRig> {
        self.camera.lock()
    }

    /// Read the LOD selector
    pub fn lod(&self) -> RwLockReadGuard<'_, LodSelector> {
        self.lod.read()
    }

    /// Replace the LOD thresholds; see [`LodSelector::set_thresholds`]
    pub fn set_lod_thresholds(&self, high: f32, medium: f32, low: f32) -> bool {
        self.lod.write().set_thresholds(high, medium, low)
    }

    /// Lock the history recorder
    pub fn history(&self) -> MutexGuard<'_, HistoryRecorder<SignalState>> {
        self.history.lock()
    }

    /// Lock the signal tracer
    pub fn tracer(&self) -> MutexGuard<'_, SignalTracer> {
        self.tracer.lock()
    }

    /// Lock the component factory
    pub fn factory(&self) -> MutexGuard<'_, ComponentFactory> {
        self.factory.lock()
    }

    /// Session clock used for trace timestamps
    pub fn clock(&self) -> &SessionClock {
        &self.clock
    }

    // ========== Camera helpers ==========

    /// Switch camera mode by name; unknown names are ignored
    pub fn set_camera_mode_by_name(&self, name: &str) -> bool {
        let changed = self.camera.lock().set_mode_by_name(name);
        if changed {
            self.request_render();
        }
        changed
    }

    /// Orbit the camera around the entity with `id`
    pub fn focus_on(&self, id: &str) -> bool {
        let Some(entity) = self.get(id) else {
            return false;
        };
        self.camera.lock().focus_on(&entity);
        self.request_render();
        true
    }

    // ========== History ==========

    /// Record the current logic state of every entity.
    ///
    /// Wire entities go into the wire map, everything else into the
    /// component map. Returns the new step, or `None` while recording is off.
    pub fn capture_snapshot(&self) -> Option<u64> {
        let (components, wires) = {
            let entities = self.entities.read();
            let mut components = HashMap::new();
            let mut wires = HashMap::new();
            for (id, entity) in entities.iter() {
                if entity.kind() == EntityKind::Wire {
                    wires.insert(id.clone(), entity.signal());
                } else {
                    components.insert(id.clone(), entity.signal());
                }
            }
            (components, wires)
        };

        self.history.lock().record(&components, &wires)
    }

    /// Step history back and restore that snapshot's logic state
    pub fn undo(&self) -> bool {
        self.travel(HistoryRecorder::undo)
    }

    /// Step history forward and restore that snapshot's logic state
    pub fn redo(&self) -> bool {
        self.travel(HistoryRecorder::redo)
    }

    /// Jump back to a retained history index and restore that snapshot's logic state
    pub fn jump_to(&self, index: usize) -> bool {
        self.travel(|history| history.jump_to(index))
    }

    // ========== Export ==========

    /// Serialize the scene
    pub fn export(&self, format: ExportFormat) -> Result<String, ExportError> {
        export::export(&self.get_all(), format)
    }

    /// Serialize the scene as JSON
    pub fn export_json(&self) -> Result<String, ExportError> {
        self.export(ExportFormat::Json)
    }

    /// Serialize the scene as XML
    pub fn export_xml(&self) -> Result<String, ExportError> {
        self.export(ExportFormat::Xml)
    }

    /// Write the scene to `path` in the named format (`json` or `xml`).
    ///
    /// Failures are logged and reported as `false`.
    pub fn save_to_file(&self, path: impl AsRef<Path>, format: &str) -> bool {
        let path = path.as_ref();
        let result = format
            .parse::<ExportFormat>()
            .and_then(|format| export::save_to_file(&self.get_all(), path, format));

        match result {
            Ok(()) => {
                log::info!("Exported scene to {}", path.display());
                true
            }
            Err(err) => {
                log::error!("Failed to export scene to {}: {err}", path.display());
                false
            }
        }
    }

    // ========== Internals ==========

    fn mark_dirty(&self) {
        self.needs_render.store(true, Ordering::Release);
    }

    fn modify(&self, id: &str, apply: impl FnOnce(&mut Entity) -> bool) -> bool {
        let mut entities = self.entities.write();
        let Some(entity) = entities.get_mut(id) else {
            return false;
        };
        let changed = apply(entity);
        if changed {
            self.mark_dirty();
        }
        changed
    }

    fn travel(&self, step: impl FnOnce(&mut HistoryRecorder<SignalState>) -> bool) -> bool {
        let snapshot = {
            let mut history = self.history.lock();
            if !step(&mut history) {
                return false;
            }
            history.current_state()
        };
        let Some(snapshot) = snapshot else {
            return false;
        };

        let mut entities = self.entities.write();
        for (id, state) in snapshot.components().iter().chain(snapshot.wires()) {
            if let Some(entity) = entities.get_mut(id) {
                entity.set_signal(state.value, state.bit_width);
            }
        }
        self.mark_dirty();
        log::debug!("Restored history step {}", snapshot.step());
        true
    }
}
