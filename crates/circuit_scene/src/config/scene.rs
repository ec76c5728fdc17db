//! # Scene Configuration
//!
//! Session-wide settings for the camera rig, LOD bands, simulation history and
//! signal tracing. Every section falls back to its defaults field by field, so a
//! config file only needs to mention what it changes.

use serde::{Deserialize, Serialize};

use super::Config;

/// # Camera Configuration
///
/// Projection parameters are fixed for the session; speeds and smoothing
/// shape how navigation input turns into camera motion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    /// Near clipping plane distance
    pub near: f32,
    /// Far clipping plane distance
    pub far: f32,
    /// FPS movement scale (units per input unit)
    pub move_speed: f32,
    /// FPS look scale (degrees per input unit)
    pub look_speed: f32,
    /// Orbit angle scale (degrees per input unit)
    pub orbit_sensitivity: f32,
    /// Whether position/target ease toward their pending values each tick
    pub smoothing: bool,
    /// Smoothing rate; the per-tick factor is `min(1, rate * dt)`
    pub smoothing_rate: f32,
    /// Orbit distance forced by focusing on an entity
    pub focus_distance: f32,
    /// Orbit distance at session start
    pub orbit_distance: f32,
    /// Orbit azimuth at session start (degrees)
    pub orbit_azimuth: f32,
    /// Orbit elevation at session start (degrees)
    pub orbit_elevation: f32,
    /// Distance moved by one toolbar zoom step
    pub zoom_step: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 60.0,
            near: 0.1,
            far: 1000.0,
            move_speed: 10.0,
            look_speed: 0.1,
            orbit_sensitivity: 0.5,
            smoothing: true,
            smoothing_rate: 5.0,
            focus_distance: 20.0,
            orbit_distance: 100.0,
            orbit_azimuth: 0.0,
            orbit_elevation: 45.0,
            zoom_step: 5.0,
        }
    }
}

impl CameraConfig {
    /// Validate the camera configuration
    pub fn validate(&self) -> Result<(), String> {
        if !(self.fov_degrees > 0.0 && self.fov_degrees < 180.0) {
            return Err(format!("Field of view must be in (0, 180) degrees, got {}", self.fov_degrees));
        }
        if !(self.near > 0.0 && self.far > self.near) {
            return Err(format!("Clip planes must satisfy 0 < near < far, got near={} far={}", self.near, self.far));
        }
        if self.smoothing_rate < 0.0 {
            return Err("Smoothing rate cannot be negative".to_string());
        }
        Ok(())
    }

    /// Copy with every out-of-range value replaced by its default.
    ///
    /// A `far` plane at or below `near` is pushed out to the default
    /// near/far ratio.
    pub fn sanitized(&self) -> Self {
        let defaults = Self::default();
        let or_default = |value: f32, valid: bool, default: f32| if value.is_finite() && valid { value } else { default };

        let near = or_default(self.near, self.near > 0.0, defaults.near);
        let far = if self.far.is_finite() && self.far > near {
            self.far
        } else {
            near * (defaults.far / defaults.near)
        };

        Self {
            fov_degrees: or_default(self.fov_degrees, self.fov_degrees > 0.0 && self.fov_degrees < 180.0, defaults.fov_degrees),
            near,
            far,
            move_speed: or_default(self.move_speed, true, defaults.move_speed),
            look_speed: or_default(self.look_speed, true, defaults.look_speed),
            orbit_sensitivity: or_default(self.orbit_sensitivity, true, defaults.orbit_sensitivity),
            smoothing: self.smoothing,
            smoothing_rate: or_default(self.smoothing_rate, self.smoothing_rate >= 0.0, defaults.smoothing_rate),
            focus_distance: or_default(self.focus_distance, true, defaults.focus_distance),
            orbit_distance: or_default(self.orbit_distance, true, defaults.orbit_distance),
            orbit_azimuth: or_default(self.orbit_azimuth, true, defaults.orbit_azimuth),
            orbit_elevation: or_default(self.orbit_elevation, true, defaults.orbit_elevation),
            zoom_step: or_default(self.zoom_step, true, defaults.zoom_step),
        }
    }
}

/// # LOD Configuration
///
/// Ascending distance thresholds separating the four detail tiers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LodConfig {
    /// Below this distance entities render at HIGH detail
    pub high: f32,
    /// Below this distance entities render at MEDIUM detail
    pub medium: f32,
    /// Below this distance entities render at LOW detail; beyond it ULTRA_LOW
    pub low: f32,
}

impl Default for LodConfig {
    fn default() -> Self {
        Self {
            high: 20.0,
            medium: 50.0,
            low: 100.0,
        }
    }
}

impl LodConfig {
    /// Whether the thresholds are finite, non-negative and ascending
    pub fn is_valid(&self) -> bool {
        [self.high, self.medium, self.low]
            .iter()
            .all(|t| t.is_finite() && *t >= 0.0)
            && self.high <= self.medium
            && self.medium <= self.low
    }
}

/// # History Configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Maximum number of retained snapshots
    pub capacity: usize,
    /// Whether recording starts enabled
    pub recording: bool,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            capacity: 10_000,
            recording: true,
        }
    }
}

/// # Signal Trace Configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraceConfig {
    /// Ring buffer capacity per traced id
    pub max_events_per_signal: usize,
    /// Whether tracing starts enabled
    pub enabled: bool,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            max_events_per_signal: 1000,
            enabled: true,
        }
    }
}

/// # Complete Scene Configuration
///
/// Top-level configuration a host session hands to
/// [`SceneRegistry::with_config`](crate::registry::SceneRegistry::with_config).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Default log filter used when `RUST_LOG` is unset
    pub log_level: String,
    /// Camera rig configuration
    pub camera: CameraConfig,
    /// LOD band configuration
    pub lod: LodConfig,
    /// History recorder configuration
    pub history: HistoryConfig,
    /// Signal tracer configuration
    pub trace: TraceConfig,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            camera: CameraConfig::default(),
            lod: LodConfig::default(),
            history: HistoryConfig::default(),
            trace: TraceConfig::default(),
        }
    }
}

impl SceneConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), String> {
        self.camera.validate()?;

        if !self.lod.is_valid() {
            return Err(format!(
                "LOD thresholds must be finite, non-negative and ascending, got ({}, {}, {})",
                self.lod.high, self.lod.medium, self.lod.low
            ));
        }
        if self.history.capacity == 0 {
            return Err("History capacity must be at least 1".to_string());
        }
        if self.trace.max_events_per_signal == 0 {
            return Err("Signal trace capacity must be at least 1".to_string());
        }

        Ok(())
    }
}

impl Config for SceneConfig {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigError;

    #[test]
    fn test_defaults_are_valid() {
        let config = SceneConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.lod, LodConfig { high: 20.0, medium: 50.0, low: 100.0 });
        assert_eq!(config.history.capacity, 10_000);
        assert_eq!(config.trace.max_events_per_signal, 1000);
    }

    #[test]
    fn test_descending_lod_is_invalid() {
        let mut config = SceneConfig::default();
        config.lod = LodConfig { high: 50.0, medium: 20.0, low: 100.0 };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_sanitized_camera_replaces_bad_values() {
        let camera = CameraConfig {
            fov_degrees: 240.0,
            near: -1.0,
            far: f32::NAN,
            smoothing_rate: -2.0,
            orbit_distance: f32::INFINITY,
            move_speed: 3.0,
            ..CameraConfig::default()
        };
        assert!(camera.validate().is_err());

        let fixed = camera.sanitized();
        assert!(fixed.validate().is_ok());
        assert_eq!(fixed.fov_degrees, 60.0);
        assert_eq!(fixed.near, 0.1);
        assert!(fixed.far > fixed.near);
        assert_eq!(fixed.smoothing_rate, 5.0);
        assert_eq!(fixed.orbit_distance, 100.0);
        assert_eq!(fixed.move_speed, 3.0);

        let inverted = CameraConfig { near: 50.0, far: 10.0, ..CameraConfig::default() };
        assert!(inverted.sanitized().far > 50.0);
        assert_eq!(CameraConfig::default().sanitized(), CameraConfig::default());
    }

    #[test]
    fn test_partial_toml_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.toml");
        std::fs::write(&path, "log_level = \"debug\"\n\n[lod]\nhigh = 10.0\n").unwrap();

        let config = SceneConfig::load_from_file(&path).unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.lod.high, 10.0);
        assert_eq!(config.lod.medium, 50.0);
        assert_eq!(config.camera, CameraConfig::default());
    }

    #[test]
    fn test_save_and_load_ron() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.ron");

        let mut config = SceneConfig::default();
        config.history.capacity = 32;
        config.camera.smoothing = false;
        config.save_to_file(&path).unwrap();

        let loaded = SceneConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.yaml");
        let result = SceneConfig::default().save_to_file(&path);
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }
}
