//! Scene viewer demo
//!
//! Drives a circuit scene the way a host application would: a simulator
//! thread streams events into the registry while the main thread runs a
//! fixed-rate frame loop, switches camera modes and records history. The
//! final scene is written as JSON and XML.
//!
//! ```text
//! scene_viewer [config.toml|config.ron] [output_dir]
//! ```

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use circuit_scene::foundation::{logging, time::SessionClock};
use circuit_scene::prelude::*;
use rand::Rng;
use thiserror::Error;

const FRAME_TIME: f32 = 1.0 / 60.0;
const FRAMES: u64 = 240;
const FRAMES_PER_MODE: u64 = 60;
const SNAPSHOT_INTERVAL: u64 = 20;
const SIMULATION_STEPS: u64 = 150;

const CAMERA_TOUR: [CameraMode; 4] = [
    CameraMode::Overview,
    CameraMode::Orbit,
    CameraMode::TopDown,
    CameraMode::Fps,
];

#[derive(Debug, Error)]
enum ViewerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Export failed for {0}")]
    Export(PathBuf),
}

struct SceneViewerApp {
    registry: SceneRegistry,
    output_dir: PathBuf,
}

impl SceneViewerApp {
    fn new(config: SceneConfig, output_dir: PathBuf) -> Self {
        Self {
            registry: SceneRegistry::with_config(config),
            output_dir,
        }
    }

    /// Half adder feeding a clocked register
    fn build_circuit() -> Vec<ComponentRef> {
        vec![
            CircuitElement::shared("in_a", "Pin", 0.0, 0.0),
            CircuitElement::shared("in_b", "Pin", 0.0, 40.0),
            CircuitElement::shared("sum", "XorGate", 60.0, 0.0),
            CircuitElement::shared("carry", "AndGate", 60.0, 40.0),
            CircuitElement::shared("clk", "Clock", 0.0, 80.0),
            CircuitElement::shared("reg", "DFlipFlop", 120.0, 20.0),
        ]
    }

    /// Wires are scene-only entities, so they are re-added after every sync
    fn add_wires(registry: &SceneRegistry) {
        let wires = [
            ("w_a_sum", Vec3::new(0.0, 0.0, 0.0), Vec3::new(60.0, 0.0, 0.0)),
            ("w_b_carry", Vec3::new(0.0, 40.0, 0.0), Vec3::new(60.0, 40.0, 0.0)),
            ("w_sum_reg", Vec3::new(60.0, 0.0, 0.0), Vec3::new(120.0, 20.0, 0.0)),
            ("w_clk_reg", Vec3::new(0.0, 80.0, 0.0), Vec3::new(120.0, 20.0, 0.0)),
        ];

        let entities: Vec<Entity> = {
            let factory = registry.factory();
            wires
                .iter()
                .map(|(id, start, end)| factory.create_wire(*id, *start, *end))
                .collect()
        };
        for wire in entities {
            registry.add(wire);
        }
    }

    fn run(&self) -> Result<(), ViewerError> {
        log::info!("Building circuit...");
        self.registry.sync_with(&Self::build_circuit());
        Self::add_wires(&self.registry);
        log::info!("Scene holds {} entities", self.registry.len());

        self.registry.tracer().start_trace("sum");
        self.registry.tracer().start_trace("reg");
        self.registry.capture_snapshot();

        let simulation_done = AtomicBool::new(false);
        std::thread::scope(|scope| {
            scope.spawn(|| {
                Self::simulate(&self.registry);
                simulation_done.store(true, Ordering::Release);
            });
            self.frame_loop(&simulation_done);
        });

        self.review_history();
        self.report_traces();

        self.registry.focus_on("reg");
        self.registry.camera().zoom_in();
        self.registry.tick(FRAME_TIME);

        self.export("scene.json", "json")?;
        self.export("scene.xml", "xml")?;
        Ok(())
    }

    /// Simulator side: random inputs, half adder outputs, clocked register
    fn simulate(registry: &SceneRegistry) {
        let mut events = SceneEventAdapter::new(registry);
        let mut rng = rand::thread_rng();
        let mut stored = 0;

        for step in 0..SIMULATION_STEPS {
            let a: i32 = rng.gen_range(0..=1);
            let b: i32 = rng.gen_range(0..=1);
            let clock = i32::from(step % 2 == 0);

            let mut queue = vec![
                SimulationEvent::ClockTick(step),
                signal("in_a", a),
                signal("in_b", b),
                signal("w_a_sum", a),
                signal("w_b_carry", b),
                signal("sum", a ^ b),
                signal("carry", a & b),
                signal("w_sum_reg", a ^ b),
                signal("clk", clock),
                signal("w_clk_reg", clock),
            ];
            if clock == 1 {
                stored = a ^ b;
            }
            queue.push(signal("reg", stored));
            queue.push(SimulationEvent::PropagationComplete);

            // An output buffer is attached a third of the way in and removed later
            let change = if step == SIMULATION_STEPS / 3 {
                let mut components = Self::build_circuit();
                components.push(CircuitElement::shared("out_buf", "Buffer", 180.0, 20.0));
                Some(components)
            } else if step == 2 * SIMULATION_STEPS / 3 {
                Some(Self::build_circuit())
            } else {
                None
            };
            if let Some(components) = change {
                SimulationEvent::CircuitChanged(CircuitChange::new(components)).deliver_to(&mut events);
                Self::add_wires(registry);
            }

            for event in &queue {
                event.deliver_to(&mut events);
            }
            std::thread::sleep(Duration::from_millis(rng.gen_range(5..15)));
        }

        log::info!(
            "Simulation finished after {} clock ticks",
            events.last_clock_tick().map_or(0, |t| t + 1)
        );
        events.cleanup();
    }

    fn frame_loop(&self, simulation_done: &AtomicBool) {
        let mut clock = SessionClock::new();
        let mut rendered = 0;

        while clock.frame_count() < FRAMES {
            let delta_time = clock.frame().min(0.1);
            let frame = clock.frame_count();

            if frame % FRAMES_PER_MODE == 1 {
                let index = usize::try_from(frame / FRAMES_PER_MODE).unwrap_or(0) % CAMERA_TOUR.len();
                let mode = CAMERA_TOUR[index];
                log::info!("Camera mode: {mode}");
                self.registry.camera().set_mode(mode);
            }
            self.drive_camera(frame);

            if frame % SNAPSHOT_INTERVAL == 0 && !simulation_done.load(Ordering::Acquire) {
                self.registry.capture_snapshot();
            }

            if self.registry.needs_render() {
                rendered += 1;
            }
            self.registry.tick(delta_time);

            std::thread::sleep(Duration::from_secs_f32(FRAME_TIME));
        }

        log::info!("{rendered} of {FRAMES} frames needed a redraw");
    }

    fn drive_camera(&self, frame: u64) {
        let mut camera = self.registry.camera();
        match camera.mode() {
            CameraMode::Orbit => camera.orbit(2.0, 0.0),
            CameraMode::Fps => {
                camera.move_forward(0.05);
                camera.look(1.0, 0.0);
            }
            CameraMode::TopDown if frame % 10 == 0 => camera.zoom(5.0),
            _ => {}
        }
    }

    fn review_history(&self) {
        let retained = self.registry.history().len();
        log::info!("History holds {retained} snapshots");

        if self.registry.undo() && self.registry.undo() {
            log::info!("Rewound to step {:?}", self.registry.history().current_step());
        }
        if self.registry.redo() {
            log::info!("Replayed to step {:?}", self.registry.history().current_step());
        }
        if self.registry.jump_to(0) {
            log::info!("Back at oldest step {:?}", self.registry.history().current_step());
        }
        while self.registry.redo() {}
        log::info!("Replayed to latest step {:?}", self.registry.history().current_step());
    }

    fn report_traces(&self) {
        let tracer = self.registry.tracer();
        for id in tracer.traced_ids() {
            let events = tracer.trace(&id);
            let changes = events.iter().filter(|e| e.has_changed()).count();
            log::info!("Signal '{id}': {} events, {changes} changes", events.len());
        }
    }

    fn export(&self, file_name: &str, format: &str) -> Result<(), ViewerError> {
        let path = self.output_dir.join(file_name);
        if self.registry.save_to_file(&path, format) {
            Ok(())
        } else {
            Err(ViewerError::Export(path))
        }
    }
}

fn signal(id: &str, value: i32) -> SimulationEvent {
    SimulationEvent::SignalChanged {
        component_id: id.to_string(),
        value,
        bit_width: 1,
    }
}

fn load_config(path: Option<&Path>) -> Result<SceneConfig, ViewerError> {
    match path {
        Some(path) => Ok(SceneConfig::load_from_file(path)?),
        None => Ok(SceneConfig::default()),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();
    let config_path = args.get(1).map(PathBuf::from);
    let output_dir = args.get(2).map_or_else(|| PathBuf::from("."), PathBuf::from);

    let config = load_config(config_path.as_deref())?;
    logging::init_with_level(&config.log_level);

    log::info!("Starting circuit scene viewer");
    let app = SceneViewerApp::new(config, output_dir);

    match app.run() {
        Ok(()) => {
            log::info!("Scene viewer completed successfully");
            Ok(())
        }
        Err(e) => {
            log::error!("Scene viewer failed: {e}");
            Err(e.into())
        }
    }
}
