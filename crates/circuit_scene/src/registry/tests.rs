use super::*;
use crate::circuit::CircuitElement;
use crate::config::HistoryConfig;
use crate::foundation::math::Vec3;
use crate::scene::{CameraMode, LodTier};

fn gates(ids: &[&str]) -> Vec<ComponentRef> {
    ids.iter()
        .enumerate()
        .map(|(i, id)| CircuitElement::shared(*id, "AndGate", i as f32 * 10.0, 0.0))
        .collect()
}

fn ids(registry: &SceneRegistry) -> Vec<String> {
    registry.get_all().iter().map(|e| e.id().to_string()).collect()
}

#[test]
fn test_lod_changes_only_on_tick() {
    let registry = SceneRegistry::new();
    registry.add(Entity::new("g1", EntityKind::AndGate));

    registry.camera().set_position(Vec3::new(0.0, 0.0, 15.0));
    registry.tick(0.016);
    assert_eq!(registry.get("g1").unwrap().lod(), LodTier::High);

    registry.camera().set_position(Vec3::new(0.0, 0.0, 60.0));
    assert_eq!(registry.get("g1").unwrap().lod(), LodTier::High);

    registry.tick(0.016);
    assert_eq!(registry.get("g1").unwrap().lod(), LodTier::Low);
}

#[test]
fn test_threshold_change_applies_on_next_tick() {
    let registry = SceneRegistry::new();
    registry.add(Entity::new("g1", EntityKind::OrGate));
    registry.camera().set_position(Vec3::new(0.0, 0.0, 15.0));
    registry.tick(0.016);

    assert!(registry.set_lod_thresholds(10.0, 30.0, 60.0));
    assert!(!registry.set_lod_thresholds(60.0, 30.0, 10.0));
    assert_eq!(registry.get("g1").unwrap().lod(), LodTier::High);

    registry.tick(0.016);
    assert_eq!(registry.get("g1").unwrap().lod(), LodTier::Medium);
}

#[test]
fn test_sync_removes_missing_components() {
    let registry = SceneRegistry::new();
    registry.sync_with(&gates(&["g1", "g2", "g3", "g4", "g5"]));
    assert_eq!(registry.len(), 5);

    registry.sync_with(&gates(&["g1", "g3", "g5"]));
    assert_eq!(ids(&registry), vec!["g1", "g3", "g5"]);
}

#[test]
fn test_sync_is_idempotent() {
    let registry = SceneRegistry::new();
    let components = gates(&["a", "b", "c"]);

    registry.sync_with(&components);
    let once: Vec<(String, Vec3)> = registry.get_all().iter().map(|e| (e.id().to_string(), e.position())).collect();

    registry.tick(0.016);
    registry.sync_with(&components);
    let twice: Vec<(String, Vec3)> = registry.get_all().iter().map(|e| (e.id().to_string(), e.position())).collect();

    assert_eq!(once, twice);
    assert!(!registry.needs_render());
}

#[test]
fn test_sync_drops_wires_and_keeps_existing_state() {
    let registry = SceneRegistry::new();
    registry.sync_with(&gates(&["g1", "g2"]));
    registry.update_component_state("g1", 1, 1);

    let wire = registry
        .factory()
        .create_wire("w1", Vec3::zeros(), Vec3::new(10.0, 0.0, 0.0));
    registry.add(wire);
    assert_eq!(ids(&registry), vec!["g1", "g2", "w1"]);

    registry.sync_with(&gates(&["g1"]));
    assert_eq!(ids(&registry), vec!["g1"]);
    assert_eq!(registry.get("g1").unwrap().signal().value, 1);
}

#[test]
fn test_mutations_set_dirty_and_tick_clears() {
    let registry = SceneRegistry::new();
    assert!(registry.needs_render());
    registry.tick(0.016);
    assert!(!registry.needs_render());

    registry.add(Entity::new("g1", EntityKind::Buffer));
    assert!(registry.needs_render());
    registry.tick(0.016);

    assert!(registry.update_color("g1", 1.0, 0.0, 0.0, 1.0));
    assert!(registry.needs_render());
    registry.tick(0.016);

    // No-ops leave the flag alone
    assert!(!registry.update_color("missing", 1.0, 0.0, 0.0, 1.0));
    assert!(!registry.update_transform("g1", &[1.0; 9]));
    assert!(registry.remove("missing").is_none());
    assert!(!registry.needs_render());

    assert!(registry.update_transform("g1", &[2.0; 16]));
    assert!(registry.needs_render());
    registry.tick(0.016);

    registry.request_render();
    assert!(registry.needs_render());
}

#[test]
fn test_update_rejects_id_mismatch() {
    let registry = SceneRegistry::new();
    registry.add(Entity::new("g1", EntityKind::NotGate));

    assert!(!registry.update("g1", Entity::new("g2", EntityKind::NotGate)));
    assert!(!registry.contains("g2"));

    let moved = Entity::new("g1", EntityKind::NotGate).with_position(1.0, 2.0, 3.0);
    assert!(registry.update("g1", moved));
    assert_eq!(registry.get("g1").unwrap().position(), Vec3::new(1.0, 2.0, 3.0));
}

#[test]
fn test_highlight_labels_and_clear() {
    let registry = SceneRegistry::new();
    registry.sync_with(&gates(&["g1", "g2"]));

    assert!(registry.set_highlighted("g2", true));
    assert!(!registry.set_highlighted("g9", true));
    assert!(registry.get("g2").unwrap().is_highlighted());

    registry.tick(0.016);
    registry.set_show_labels(false);
    assert!(!registry.show_labels());
    assert!(registry.needs_render());

    registry.clear();
    assert!(registry.is_empty());
    assert!(registry.get_all().is_empty());
}

#[test]
fn test_get_returns_copy() {
    let registry = SceneRegistry::new();
    registry.add(Entity::new("g1", EntityKind::Rom));

    let mut copy = registry.get("g1").unwrap();
    copy.set_signal(42, 8);
    assert_eq!(registry.get("g1").unwrap().signal(), SignalState::default());
}

#[test]
fn test_component_state_feeds_tracer() {
    let registry = SceneRegistry::new();
    registry.sync_with(&gates(&["clk"]));
    registry.tracer().start_trace("clk");

    assert!(registry.update_component_state("clk", 1, 1));
    assert!(registry.update_component_state("clk", 0, 1));
    assert!(!registry.update_component_state("ghost", 1, 1));

    let trace = registry.tracer().trace("clk");
    assert_eq!(trace.len(), 2);
    assert_eq!((trace[1].old_value, trace[1].new_value), (1, 0));
    assert!(trace[0].timestamp_ns <= trace[1].timestamp_ns);
}

#[test]
fn test_traced_id_without_entity_still_records() {
    let registry = SceneRegistry::new();
    registry.tracer().start_trace("ghost");
    registry.tick(0.016);

    assert!(!registry.update_component_state("ghost", 1, 1));
    assert!(!registry.contains("ghost"));
    assert!(!registry.needs_render());

    let trace = registry.tracer().trace("ghost");
    assert_eq!(trace.len(), 1);
    assert_eq!(trace[0].new_value, 1);
}

#[test]
fn test_focus_and_mode_by_name() {
    let registry = SceneRegistry::new();
    registry.add(Entity::new("g1", EntityKind::XorGate).with_position(30.0, 0.0, 0.0));

    assert!(registry.focus_on("g1"));
    assert!(!registry.focus_on("missing"));
    assert_eq!(registry.camera().mode(), CameraMode::Orbit);
    assert_eq!(registry.camera().target(), Vec3::new(30.0, 0.0, 0.0));

    assert!(registry.set_camera_mode_by_name("top_down"));
    assert!(!registry.set_camera_mode_by_name("sideways"));
    assert_eq!(registry.camera().mode(), CameraMode::TopDown);
}

#[test]
fn test_snapshot_undo_restores_signals() {
    let registry = SceneRegistry::new();
    registry.sync_with(&gates(&["g1"]));
    let wire = registry.factory().create_wire("w1", Vec3::zeros(), Vec3::new(0.0, 5.0, 0.0));
    registry.add(wire);

    registry.update_component_state("g1", 0, 1);
    assert_eq!(registry.capture_snapshot(), Some(0));

    registry.update_component_state("g1", 1, 1);
    registry.update_component_state("w1", 1, 1);
    assert_eq!(registry.capture_snapshot(), Some(1));

    {
        let history = registry.history();
        let current = history.current_state().unwrap();
        assert_eq!(current.components()["g1"].value, 1);
        assert_eq!(current.wires()["w1"].value, 1);
        assert!(!current.components().contains_key("w1"));
    }

    assert!(registry.undo());
    assert_eq!(registry.get("g1").unwrap().signal().value, 0);
    assert_eq!(registry.get("w1").unwrap().signal().value, 0);

    assert!(registry.redo());
    assert_eq!(registry.get("g1").unwrap().signal().value, 1);
    assert!(!registry.redo());

    assert!(registry.jump_to(0));
    assert_eq!(registry.get("g1").unwrap().signal().value, 0);
}

#[test]
fn test_history_capacity_from_config() {
    let config = SceneConfig {
        history: HistoryConfig {
            capacity: 2,
            recording: true,
        },
        ..SceneConfig::default()
    };
    let registry = SceneRegistry::with_config(config);
    for _ in 0..5 {
        registry.capture_snapshot();
    }
    assert_eq!(registry.history().len(), 2);
    assert_eq!(registry.history().current_step(), Some(4));
}

#[test]
fn test_export_and_save() {
    let registry = SceneRegistry::new();
    registry.sync_with(&gates(&["g2", "g1"]));

    let json = registry.export_json().unwrap();
    assert!(json.find("\"g1\"").unwrap() < json.find("\"g2\"").unwrap());
    assert!(registry.export_xml().unwrap().contains("type=\"AND_GATE\""));

    let dir = tempfile::tempdir().unwrap();
    let json_path = dir.path().join("scene.json");
    assert!(registry.save_to_file(&json_path, "JSON"));
    assert!(std::fs::read_to_string(&json_path).unwrap().contains("\"schema_version\": \"1.0.0\""));

    assert!(registry.save_to_file(dir.path().join("scene.xml"), "xml"));
    assert!(!registry.save_to_file(dir.path().join("scene.obj"), "obj"));
    assert!(!registry.save_to_file(dir.path().join("no/such/dir.json"), "json"));
}

#[test]
fn test_concurrent_producers_and_ticks() {
    let registry = SceneRegistry::new();
    let producers = 4;
    let per_producer = 50;

    std::thread::scope(|scope| {
        for p in 0..producers {
            let registry = &registry;
            scope.spawn(move || {
                for i in 0..per_producer {
                    let id = format!("p{p}_{i}");
                    registry.add(Entity::new(id.clone(), EntityKind::Pin).with_position(i as f32, 0.0, 0.0));
                    registry.update_component_state(&id, i, 8);
                    if i % 2 == 1 {
                        registry.remove(&id);
                    }
                }
            });
        }

        for _ in 0..100 {
            registry.tick(0.016);
            let _ = registry.get_all();
        }
    });

    registry.tick(0.016);
    assert_eq!(registry.len(), producers * per_producer as usize / 2);
    assert!(registry.get_all().iter().all(|e| e.signal().bit_width == 8));
    assert!(!registry.needs_render());
}

#[test]
fn test_registry_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<SceneRegistry>();
}
