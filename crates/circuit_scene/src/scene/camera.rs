//! # Camera Rig
//!
//! Multi-mode camera used to navigate the circuit scene. The rig owns the
//! camera pose, a pending pose that smoothing eases toward, orbit parameters,
//! and first-person yaw/pitch.
//!
//! ## Modes
//! - **Overview**: fixed pose above and in front of the origin
//! - **TopDown**: fixed pose straight above the origin
//! - **Fps**: free first-person movement driven by `move_*` and `look`
//! - **Orbit**: position derived from target, distance, azimuth and elevation
//! - **Focus**: transient; [`CameraRig::focus_on`] ends up in `Orbit`
//!
//! ## Coordinate System
//! Right-handed, Y-up. Angles are stored in degrees. Orbit azimuth turns
//! about the vertical axis; elevation and pitch are clamped to ±89° to keep
//! clear of the poles.
//!
//! No input is ever rejected: out-of-range values are clamped.

use std::fmt;
use std::str::FromStr;

use crate::config::CameraConfig;
use crate::foundation::math::{utils, Mat4, Mat4Ext, Vec3, WORLD_UP};
use crate::scene::entity::Entity;

/// Closest allowed orbit distance
pub const MIN_ORBIT_DISTANCE: f32 = 5.0;
/// Farthest allowed orbit distance
pub const MAX_ORBIT_DISTANCE: f32 = 500.0;
/// Elevation/pitch limit in degrees
pub const MAX_ELEVATION: f32 = 89.0;

/// Navigation mode of the rig
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CameraMode {
    /// Whole-circuit view
    Overview,
    /// First-person navigation
    Fps,
    /// Close-up on one entity
    Focus,
    /// Rotation around a target point
    Orbit,
    /// Traditional 2D view from above
    TopDown,
}

impl CameraMode {
    /// Canonical upper-case name
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Overview => "OVERVIEW",
            Self::Fps => "FPS",
            Self::Focus => "FOCUS",
            Self::Orbit => "ORBIT",
            Self::TopDown => "TOP_DOWN",
        }
    }
}

impl fmt::Display for CameraMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a mode name is not one of the five known modes
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown camera mode: {0}")]
pub struct UnknownCameraMode(pub String);

impl FromStr for CameraMode {
    type Err = UnknownCameraMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "OVERVIEW" => Ok(Self::Overview),
            "FPS" => Ok(Self::Fps),
            "FOCUS" => Ok(Self::Focus),
            "ORBIT" => Ok(Self::Orbit),
            "TOP_DOWN" => Ok(Self::TopDown),
            _ => Err(UnknownCameraMode(s.to_string())),
        }
    }
}

/// Multi-mode camera with smoothing, orbit and first-person controls
#[derive(Debug, Clone)]
pub struct CameraRig {
    mode: CameraMode,

    position: Vec3,
    target: Vec3,
    up: Vec3,

    /// Smoothing destination for `position`
    pending_position: Vec3,
    /// Smoothing destination for `target`
    pending_target: Vec3,

    orbit_distance: f32,
    orbit_azimuth: f32,
    orbit_elevation: f32,

    yaw: f32,
    pitch: f32,

    config: CameraConfig,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self::new(CameraConfig::default())
    }
}

impl CameraRig {
    /// Create a rig in overview mode.
    ///
    /// Out-of-range configuration values fall back to their defaults.
    pub fn new(config: CameraConfig) -> Self {
        let config = config.sanitized();
        let position = Vec3::new(0.0, 100.0, 100.0);
        let target = Vec3::zeros();

        Self {
            mode: CameraMode::Overview,
            position,
            target,
            up: Vec3::from(WORLD_UP),
            pending_position: position,
            pending_target: target,
            orbit_distance: utils::clamp(config.orbit_distance, MIN_ORBIT_DISTANCE, MAX_ORBIT_DISTANCE),
            orbit_azimuth: config.orbit_azimuth,
            orbit_elevation: utils::clamp(config.orbit_elevation, -MAX_ELEVATION, MAX_ELEVATION),
            yaw: 0.0,
            pitch: 0.0,
            config,
        }
    }

    /// Switch navigation mode and apply its canonical pose.
    ///
    /// Re-entering the current mode re-applies the pose. Orbit keeps the
    /// current target and only recomputes the position from the orbit
    /// parameters, so entering it after a focus keeps the view continuous.
    pub fn set_mode(&mut self, mode: CameraMode) {
        self.mode = mode;

        match mode {
            CameraMode::Overview => self.snap_to(Vec3::new(0.0, 100.0, 100.0), Vec3::zeros()),
            CameraMode::TopDown => self.snap_to(Vec3::new(0.0, 200.0, 0.0), Vec3::zeros()),
            CameraMode::Fps => {
                self.yaw = 0.0;
                self.pitch = 0.0;
                self.snap_to(Vec3::new(0.0, 5.0, 0.0), Vec3::new(0.0, 0.0, -1.0));
            }
            CameraMode::Orbit => {
                self.update_orbit_position();
                self.pending_position = self.position;
            }
            CameraMode::Focus => {}
        }

        log::debug!("Camera mode set to {mode}");
    }

    /// Switch mode by name (case-insensitive); unknown names are ignored
    pub fn set_mode_by_name(&mut self, name: &str) -> bool {
        match name.parse::<CameraMode>() {
            Ok(mode) => {
                self.set_mode(mode);
                true
            }
            Err(err) => {
                log::warn!("{err}");
                false
            }
        }
    }

    /// Orbit around `entity` at the configured close-range distance
    pub fn focus_on(&mut self, entity: &Entity) {
        self.target = entity.position();
        self.pending_target = self.target;
        self.orbit_distance = utils::clamp(self.config.focus_distance, MIN_ORBIT_DISTANCE, MAX_ORBIT_DISTANCE);
        self.mode = CameraMode::Orbit;
        self.update_orbit_position();
        self.pending_position = self.position;

        log::debug!("Camera focused on '{}' at {:?}", entity.id(), self.target);
    }

    /// Advance the rig by `delta_time` seconds
    pub fn update(&mut self, delta_time: f32) {
        if self.config.smoothing {
            let factor = (self.config.smoothing_rate * delta_time).clamp(0.0, 1.0);
            self.position = utils::lerp_vec3(&self.position, &self.pending_position, factor);
            self.target = utils::lerp_vec3(&self.target, &self.pending_target, factor);
        }

        if self.mode == CameraMode::Orbit {
            self.update_orbit_position();
        }

        log::trace!("Camera update - position: {:?}, target: {:?}", self.position, self.target);
    }

    /// Rotate around the target; deltas are scaled by the orbit sensitivity
    pub fn orbit(&mut self, delta_azimuth: f32, delta_elevation: f32) {
        let sensitivity = self.config.orbit_sensitivity;
        self.orbit_azimuth = finite_or(self.orbit_azimuth + delta_azimuth * sensitivity, self.orbit_azimuth);
        let elevation = self.orbit_elevation + delta_elevation * sensitivity;
        self.orbit_elevation = utils::clamp(
            finite_or(elevation, self.orbit_elevation),
            -MAX_ELEVATION,
            MAX_ELEVATION,
        );
        self.update_orbit_position();
    }

    /// Move toward (positive) or away from (negative) the target
    pub fn zoom(&mut self, delta: f32) {
        let distance = finite_or(self.orbit_distance - delta, self.orbit_distance);
        self.orbit_distance = utils::clamp(distance, MIN_ORBIT_DISTANCE, MAX_ORBIT_DISTANCE);
        self.update_orbit_position();
    }

    /// Zoom in by one toolbar step
    pub fn zoom_in(&mut self) {
        self.zoom(self.config.zoom_step);
    }

    /// Zoom out by one toolbar step
    pub fn zoom_out(&mut self) {
        self.zoom(-self.config.zoom_step);
    }

    /// Return to the overview pose
    pub fn reset_view(&mut self) {
        self.set_mode(CameraMode::Overview);
    }

    /// Move the pending position along the forward vector
    pub fn move_forward(&mut self, amount: f32) {
        let forward = self.forward_vector();
        self.translate_pending(forward * amount * self.config.move_speed);
    }

    /// Move the pending position along the right vector
    pub fn move_right(&mut self, amount: f32) {
        let right = self.right_vector();
        self.translate_pending(right * amount * self.config.move_speed);
    }

    /// Move the pending position along world up
    pub fn move_up(&mut self, amount: f32) {
        self.translate_pending(Vec3::new(0.0, amount * self.config.move_speed, 0.0));
    }

    /// Turn the first-person view; the pending look-at follows
    pub fn look(&mut self, delta_x: f32, delta_y: f32) {
        self.yaw = finite_or(self.yaw - delta_x * self.config.look_speed, self.yaw);
        let pitch = self.pitch - delta_y * self.config.look_speed;
        self.pitch = utils::clamp(finite_or(pitch, self.pitch), -MAX_ELEVATION, MAX_ELEVATION);
        self.pending_target = self.pending_position + self.forward_vector();
    }

    /// Teleport the camera (current and pending position)
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.pending_position = position;
        log::trace!("Camera position updated to: {:?}", position);
    }

    /// Teleport the look-at point (current and pending target)
    pub fn set_target(&mut self, target: Vec3) {
        self.target = target;
        self.pending_target = target;
        log::trace!("Camera target updated to: {:?}", target);
    }

    /// Enable or disable smoothing
    pub fn set_smoothing(&mut self, enabled: bool) {
        self.config.smoothing = enabled;
    }

    /// Euclidean distance from the current camera position
    pub fn distance_to(&self, point: &Vec3) -> f32 {
        (self.position - point).norm()
    }

    /// Unit view direction for the current yaw/pitch
    pub fn forward_vector(&self) -> Vec3 {
        let yaw = utils::deg_to_rad(self.yaw);
        let pitch = utils::deg_to_rad(self.pitch);
        Vec3::new(yaw.sin() * pitch.cos(), pitch.sin(), -yaw.cos() * pitch.cos())
    }

    /// Horizontal right direction for the current yaw
    pub fn right_vector(&self) -> Vec3 {
        let yaw = utils::deg_to_rad(self.yaw);
        Vec3::new(yaw.cos(), 0.0, yaw.sin())
    }

    /// World-to-camera transform
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at(self.position, self.target, self.up)
    }

    /// Perspective projection for a viewport aspect ratio
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective(
            utils::deg_to_rad(self.config.fov_degrees),
            aspect,
            self.config.near,
            self.config.far,
        )
    }

    /// Current mode
    pub fn mode(&self) -> CameraMode {
        self.mode
    }

    /// Current position
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Current look-at point
    pub fn target(&self) -> Vec3 {
        self.target
    }

    /// Up vector
    pub fn up(&self) -> Vec3 {
        self.up
    }

    /// Position smoothing is easing toward
    pub fn pending_position(&self) -> Vec3 {
        self.pending_position
    }

    /// Look-at point smoothing is easing toward
    pub fn pending_target(&self) -> Vec3 {
        self.pending_target
    }

    /// Orbit distance
    pub fn orbit_distance(&self) -> f32 {
        self.orbit_distance
    }

    /// Orbit azimuth (degrees)
    pub fn orbit_azimuth(&self) -> f32 {
        self.orbit_azimuth
    }

    /// Orbit elevation (degrees)
    pub fn orbit_elevation(&self) -> f32 {
        self.orbit_elevation
    }

    /// First-person yaw (degrees)
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    /// First-person pitch (degrees)
    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Vertical field of view (degrees)
    pub fn fov(&self) -> f32 {
        self.config.fov_degrees
    }

    /// Near clipping plane
    pub fn near(&self) -> f32 {
        self.config.near
    }

    /// Far clipping plane
    pub fn far(&self) -> f32 {
        self.config.far
    }

    fn translate_pending(&mut self, offset: Vec3) {
        if offset.iter().all(|c| c.is_finite()) {
            self.pending_position += offset;
        }
    }

    fn snap_to(&mut self, position: Vec3, target: Vec3) {
        self.position = position;
        self.target = target;
        self.pending_position = position;
        self.pending_target = target;
    }

    fn update_orbit_position(&mut self) {
        let azimuth = utils::deg_to_rad(self.orbit_azimuth);
        let elevation = utils::deg_to_rad(self.orbit_elevation);

        let offset = Vec3::new(
            azimuth.sin() * elevation.cos(),
            elevation.sin(),
            azimuth.cos() * elevation.cos(),
        );
        self.position = self.target + offset * self.orbit_distance;
    }
}

/// `value` when finite, otherwise `previous`
fn finite_or(value: f32, previous: f32) -> f32 {
    if value.is_finite() {
        value
    } else {
        previous
    }
}
