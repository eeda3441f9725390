//! Simulation and application configuration.
//!
//! [`FireworkConfig`] holds the physical constants of a single explosion and
//! is used directly by the library. [`AppConfig`] wraps it together with the
//! window, camera, reference plane and render settings used by the binary,
//! and can be loaded from a TOML file.
//!
//! # Example
//!
//! ```ignore
//! let config = FireworkConfig::default()
//!     .with_particle_count(2_000)
//!     .with_gravity(0.004)
//!     .with_fade_rate(0.01);
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use glam::Vec3;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::camera::PerspectiveCamera;
use crate::error::ConfigError;
use crate::picking::ReferencePlane;

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "fireworks.toml";

/// Environment variable that overrides the configuration file path.
pub const CONFIG_ENV: &str = "FIREWORKS_CONFIG";

/// Physical and visual constants for one firework explosion.
///
/// All rates are per rendered frame; the simulation uses a fixed unit
/// timestep of one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FireworkConfig {
    /// Particles per explosion. Constant for an emitter's lifetime.
    pub particle_count: u32,
    /// Lower bound of the initial burst speed.
    pub min_speed: f32,
    /// Upper bound of the initial burst speed.
    pub max_speed: f32,
    /// Downward velocity change applied every step.
    pub gravity: f32,
    /// Velocity multiplier applied every step after gravity.
    pub drag: f32,
    /// Opacity lost every step.
    pub fade_rate: f32,
    /// Opacity at spawn time.
    pub initial_opacity: f32,
    /// HSL saturation of the sampled base color.
    pub saturation: f32,
    /// HSL lightness of the sampled base color.
    pub lightness: f32,
    /// Rendered point size in world units.
    pub point_size: f32,
}

impl Default for FireworkConfig {
    fn default() -> Self {
        Self {
            particle_count: 500,
            min_speed: 0.05,
            max_speed: 0.15,
            gravity: 0.002,
            drag: 0.98,
            fade_rate: 0.015,
            initial_opacity: 1.0,
            saturation: 1.0,
            lightness: 0.5,
            point_size: 0.1,
        }
    }
}

impl FireworkConfig {
    /// Set the number of particles per explosion.
    pub fn with_particle_count(mut self, count: u32) -> Self {
        self.particle_count = count;
        self
    }

    /// Set the burst speed range.
    pub fn with_speed_range(mut self, min: f32, max: f32) -> Self {
        self.min_speed = min;
        self.max_speed = max;
        self
    }

    /// Set the per-step gravity.
    pub fn with_gravity(mut self, gravity: f32) -> Self {
        self.gravity = gravity;
        self
    }

    /// Set the per-step drag multiplier.
    pub fn with_drag(mut self, drag: f32) -> Self {
        self.drag = drag;
        self
    }

    /// Set the per-step opacity decay.
    pub fn with_fade_rate(mut self, fade_rate: f32) -> Self {
        self.fade_rate = fade_rate;
        self
    }

    /// Set the rendered point size.
    pub fn with_point_size(mut self, size: f32) -> Self {
        self.point_size = size;
        self
    }

    /// Number of steps an emitter lives before it expires.
    ///
    /// Repeats the same `f32` subtraction the emitter performs, so the result
    /// can be one more than `ceil(initial_opacity / fade_rate)` when rounding
    /// leaves a sliver of opacity. With the defaults this is 67.
    ///
    /// Returns `u32::MAX` if the opacity would never reach zero.
    pub fn lifetime_steps(&self) -> u32 {
        if self.fade_rate.is_nan() || self.fade_rate <= 0.0 {
            return u32::MAX;
        }

        let mut opacity = self.initial_opacity;
        let mut steps = 0u32;
        while opacity > 0.0 {
            let next = opacity - self.fade_rate;
            if next == opacity || steps == u32::MAX {
                return u32::MAX;
            }
            opacity = next;
            steps += 1;
        }
        steps
    }

    /// Clamp values to ranges the simulation can run with.
    ///
    /// `fade_rate` must stay positive so every emitter eventually expires.
    pub fn validate(&mut self) {
        self.particle_count = self.particle_count.max(1);
        self.min_speed = self.min_speed.max(0.0);
        self.max_speed = self.max_speed.max(self.min_speed);
        self.drag = self.drag.clamp(0.0, 1.0);
        self.fade_rate = self.fade_rate.max(1e-4);
        self.initial_opacity = self.initial_opacity.clamp(1e-4, 1.0);
        self.saturation = self.saturation.clamp(0.0, 1.0);
        self.lightness = self.lightness.clamp(0.0, 1.0);
        self.point_size = self.point_size.max(0.0);
    }
}

/// Window settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window title.
    pub title: String,
    /// Initial inner width in logical pixels.
    pub width: u32,
    /// Initial inner height in logical pixels.
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Fireworks".to_string(),
            width: 1000,
            height: 800,
        }
    }
}

/// Camera placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Camera position.
    pub position: [f32; 3],
    /// Point the camera looks at.
    pub target: [f32; 3],
    /// Vertical field of view in degrees.
    pub fov_y_degrees: f32,
    /// Near clip distance.
    pub near: f32,
    /// Far clip distance.
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 5.0],
            target: [0.0, 0.0, 0.0],
            fov_y_degrees: 75.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

impl CameraConfig {
    /// Build a camera for a viewport with the given aspect ratio.
    pub fn build(&self, aspect: f32) -> PerspectiveCamera {
        PerspectiveCamera {
            position: Vec3::from_array(self.position),
            target: Vec3::from_array(self.target),
            up: Vec3::Y,
            fov_y_degrees: self.fov_y_degrees,
            aspect,
            near: self.near,
            far: self.far,
        }
    }
}

/// The invisible plane clicks are projected onto.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaneConfig {
    /// Plane center.
    pub center: [f32; 3],
    /// Plane normal.
    pub normal: [f32; 3],
    /// Width and height of a bounded plane.
    pub size: [f32; 2],
    /// When false the plane is infinite and `size` is ignored.
    pub bounded: bool,
    /// Accept clicks that reach the plane from behind its normal.
    pub double_sided: bool,
}

impl Default for PlaneConfig {
    fn default() -> Self {
        Self {
            center: [0.0, 0.0, 0.0],
            normal: [0.0, 0.0, 1.0],
            size: [20.0, 20.0],
            bounded: true,
            double_sided: false,
        }
    }
}

impl PlaneConfig {
    /// Build the reference plane.
    pub fn build(&self) -> ReferencePlane {
        let center = Vec3::from_array(self.center);
        let normal = Vec3::from_array(self.normal);
        let plane = if self.bounded {
            ReferencePlane::rectangle(center, normal, self.size[0], self.size[1])
        } else {
            ReferencePlane::infinite(center, normal)
        };
        plane.with_double_sided(self.double_sided)
    }
}

/// How particle colors are combined with what is already on screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlendMode {
    /// Standard alpha blending.
    Alpha,
    /// Colors are summed, so overlapping particles glow.
    #[default]
    Additive,
}

/// Renderer settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Blend mode for particle sprites.
    pub blend_mode: BlendMode,
    /// Background color (linear RGB).
    pub clear_color: [f32; 3],
    /// Wait for vertical sync.
    pub vsync: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            blend_mode: BlendMode::Additive,
            clear_color: [0.0, 0.0, 0.0],
            vsync: true,
        }
    }
}

/// Top-level application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Window settings.
    pub window: WindowConfig,
    /// Camera settings.
    pub camera: CameraConfig,
    /// Reference plane settings.
    pub plane: PlaneConfig,
    /// Renderer settings.
    pub render: RenderConfig,
    /// Explosion settings.
    pub fireworks: FireworkConfig,
}

impl AppConfig {
    /// Load configuration from `$FIREWORKS_CONFIG` or `./fireworks.toml`.
    ///
    /// Falls back to defaults when the file is missing or invalid.
    pub fn load() -> Self {
        let path = Self::config_path();
        if !path.exists() {
            info!("Config file {} not found, using defaults", path.display());
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(config) => {
                info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                warn!("{e}; using defaults");
                Self::default()
            }
        }
    }

    /// Load and validate configuration from a specific path.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&contents)?;
        config.validate();
        Ok(config)
    }

    /// Save configuration to a specific path.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, toml::to_string_pretty(self)?)?;
        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Clamp every section to usable values.
    pub fn validate(&mut self) {
        self.window.width = self.window.width.max(1);
        self.window.height = self.window.height.max(1);
        self.camera.fov_y_degrees = self.camera.fov_y_degrees.clamp(1.0, 179.0);
        self.camera.near = self.camera.near.max(1e-4);
        self.camera.far = self.camera.far.max(self.camera.near * 2.0);
        self.fireworks.validate();
    }

    fn config_path() -> PathBuf {
        std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_lifetime() {
        assert_eq!(FireworkConfig::default().lifetime_steps(), 67);
    }

    #[test]
    fn test_lifetime_counts_rounding_sliver() {
        // 1.0 - 5 * 0.2 leaves a tiny positive opacity in f32
        assert_eq!(FireworkConfig::default().with_fade_rate(0.2).lifetime_steps(), 6);
        assert_eq!(FireworkConfig::default().with_fade_rate(0.025).lifetime_steps(), 41);
    }

    #[test]
    fn test_lifetime_never_expires() {
        let mut config = FireworkConfig::default();
        config.fade_rate = 0.0;
        assert_eq!(config.lifetime_steps(), u32::MAX);
        config.fade_rate = f32::NAN;
        assert_eq!(config.lifetime_steps(), u32::MAX);
    }

    #[test]
    fn test_builder() {
        let config = FireworkConfig::default()
            .with_particle_count(10)
            .with_speed_range(0.0, 0.0)
            .with_gravity(0.0)
            .with_drag(1.0)
            .with_fade_rate(0.5);
        assert_eq!(config.particle_count, 10);
        assert_eq!(config.max_speed, 0.0);
        assert_eq!(config.lifetime_steps(), 2);
    }

    #[test]
    fn test_validate_clamps() {
        let mut config = FireworkConfig {
            particle_count: 0,
            min_speed: 0.3,
            max_speed: 0.1,
            drag: 1.5,
            fade_rate: 0.0,
            ..Default::default()
        };
        config.validate();
        assert_eq!(config.particle_count, 1);
        assert_eq!(config.max_speed, 0.3);
        assert_eq!(config.drag, 1.0);
        assert!(config.fade_rate > 0.0);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [fireworks]
            particle_count = 1000

            [render]
            blend_mode = "alpha"
            "#,
        )
        .unwrap();
        assert_eq!(config.fireworks.particle_count, 1000);
        assert_eq!(config.fireworks.fade_rate, 0.015);
        assert_eq!(config.render.blend_mode, BlendMode::Alpha);
        assert_eq!(config.window.width, 1000);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE);

        let mut config = AppConfig::default();
        config.fireworks.particle_count = 42;
        config.plane.bounded = false;
        config.plane.double_sided = true;
        config.save_to(&path).unwrap();

        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_from_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "fireworks = 3").unwrap();
        assert!(matches!(AppConfig::load_from(&path), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_camera_config_build() {
        let camera = CameraConfig::default().build(1.25);
        assert_eq!(camera.position, Vec3::new(0.0, 0.0, 5.0));
        assert_eq!(camera.aspect, 1.25);
    }

    #[test]
    fn test_plane_config_build() {
        let plane = PlaneConfig::default().build();
        assert!(!plane.is_infinite());
        assert!(!plane.is_double_sided());

        let config: AppConfig = toml::from_str("[plane]\ndouble_sided = true\nbounded = false").unwrap();
        let plane = config.plane.build();
        assert!(plane.is_infinite());
        assert!(plane.is_double_sided());
    }
}
