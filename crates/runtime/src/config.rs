//! Application configuration.
//!
//! Every field has a default, so a config file only needs the keys it
//! changes:
//!
//! ```yaml
//! camera:
//!   fov: 60
//! model:
//!   material:
//!     color: 0xff8800
//! frame:
//!   on_render_error: continue
//! ```

use crate::error::ConfigError;
use cubeview_common::Color;
use cubeview_input::OrbitConfig;
use cubeview_scene::{BoxGeometry, PhongMaterial};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Identifier of the container element that hosts the drawing surface.
    pub container_id: String,
    pub background: Color,
    pub camera: CameraConfig,
    pub light: LightConfig,
    pub model: ModelConfig,
    pub controls: OrbitConfig,
    pub viewport: ViewportConfig,
    pub frame: FrameConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            container_id: "webgl-container".into(),
            background: Color::BLACK,
            camera: CameraConfig::default(),
            light: LightConfig::default(),
            model: ModelConfig::default(),
            controls: OrbitConfig::default(),
            viewport: ViewportConfig::default(),
            frame: FrameConfig::default(),
        }
    }
}

impl AppConfig {
    /// Parse and validate a YAML config.
    pub fn from_yaml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that leave the camera projection or the orbit
    /// controller ill-defined.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let camera = &self.camera;
        check(
            "camera.fov",
            camera.fov > 0.0 && camera.fov < 180.0,
            format!("{} is not within (0, 180) degrees", camera.fov),
        )?;
        check(
            "camera.near",
            camera.near > 0.0 && camera.near.is_finite(),
            format!("{} is not a positive distance", camera.near),
        )?;
        check(
            "camera.far",
            camera.far > camera.near && camera.far.is_finite(),
            format!("{} is not beyond near ({})", camera.far, camera.near),
        )?;

        let controls = &self.controls;
        check(
            "controls.damping_factor",
            controls.damping_factor > 0.0 && controls.damping_factor <= 1.0,
            format!("{} is not within (0, 1]", controls.damping_factor),
        )?;
        check(
            "controls.rotate_speed",
            controls.rotate_speed.is_finite(),
            format!("{} is not finite", controls.rotate_speed),
        )?;
        check(
            "controls.pan_speed",
            controls.pan_speed.is_finite(),
            format!("{} is not finite", controls.pan_speed),
        )?;
        check(
            "controls.zoom_speed",
            controls.zoom_speed > 0.0 && controls.zoom_speed.is_finite(),
            format!("{} is not a positive factor", controls.zoom_speed),
        )?;
        check(
            "controls.min_distance",
            controls.min_distance >= 0.0 && controls.min_distance.is_finite(),
            format!("{} is not a non-negative distance", controls.min_distance),
        )?;
        check(
            "controls.max_distance",
            controls.max_distance >= controls.min_distance,
            format!(
                "{} is less than min_distance ({})",
                controls.max_distance, controls.min_distance
            ),
        )?;
        check(
            "controls.min_polar_angle",
            controls.min_polar_angle >= 0.0,
            format!("{} is negative", controls.min_polar_angle),
        )?;
        check(
            "controls.max_polar_angle",
            controls.max_polar_angle >= controls.min_polar_angle && controls.max_polar_angle <= PI,
            format!(
                "{} is not within [min_polar_angle ({}), pi]",
                controls.max_polar_angle, controls.min_polar_angle
            ),
        )?;
        Ok(())
    }

    /// Read a YAML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml_str(&source)?;
        tracing::debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }
}

fn check(field: &'static str, ok: bool, reason: String) -> Result<(), ConfigError> {
    if ok {
        Ok(())
    } else {
        Err(ConfigError::Invalid { field, reason })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
    pub target: Vec3,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov: 75.0,
            near: 0.1,
            far: 100.0,
            position: Vec3::new(0.0, 0.0, 2.0),
            target: Vec3::ZERO,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightConfig {
    pub color: Color,
    pub intensity: f32,
    pub position: Vec3,
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            color: Color::from_hex(0xffffff),
            intensity: 1.0,
            position: Vec3::new(-1.0, 2.0, 4.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub geometry: BoxGeometry,
    pub material: PhongMaterial,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            geometry: BoxGeometry::new(1.0, 1.0, 1.0),
            material: PhongMaterial::with_color(Color::from_hex(0x044a88)),
        }
    }
}

/// What a resize does when the container has a zero width or height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DegeneratePolicy {
    /// Leave camera and renderer untouched and skip drawing until a later
    /// resize reports a usable size.
    #[default]
    Defer,
    /// Raise each side to at least one pixel and apply.
    Clamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub degenerate: DegeneratePolicy,
}

/// Order of the draw and update phases within one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameOrder {
    /// Updates made in frame N are first drawn in frame N+1.
    #[default]
    RenderThenUpdate,
    UpdateThenRender,
}

/// What the loop does when the renderer fails a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderFailurePolicy {
    /// Log, stop the loop and surface the error.
    #[default]
    Stop,
    /// Log, drop the frame and keep the loop running.
    Continue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameConfig {
    pub order: FrameOrder,
    pub on_render_error: RenderFailurePolicy,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_describe_the_cube_scene() {
        let config = AppConfig::default();
        assert_eq!(config.container_id, "webgl-container");
        assert_eq!(config.camera.fov, 75.0);
        assert_eq!(config.camera.near, 0.1);
        assert_eq!(config.camera.far, 100.0);
        assert_eq!(config.camera.position, Vec3::new(0.0, 0.0, 2.0));
        assert_eq!(config.light.color.to_hex(), 0xffffff);
        assert_eq!(config.light.position, Vec3::new(-1.0, 2.0, 4.0));
        assert_eq!(config.model.geometry, BoxGeometry::new(1.0, 1.0, 1.0));
        assert_eq!(config.model.material.color.to_hex(), 0x044a88);
        assert_eq!(config.viewport.degenerate, DegeneratePolicy::Defer);
        assert_eq!(config.frame.order, FrameOrder::RenderThenUpdate);
        assert_eq!(config.frame.on_render_error, RenderFailurePolicy::Stop);
    }

    #[test]
    fn partial_yaml_keeps_other_defaults() {
        let yaml = "\
camera:
  fov: 60
model:
  material:
    color: 0xff8800
frame:
  order: update_then_render
viewport:
  degenerate: clamp
";
        let config = AppConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.camera.fov, 60.0);
        assert_eq!(config.camera.far, 100.0);
        assert_eq!(config.model.material.color.to_hex(), 0xff8800);
        assert_eq!(config.model.material.shininess, 30.0);
        assert_eq!(config.frame.order, FrameOrder::UpdateThenRender);
        assert_eq!(config.frame.on_render_error, RenderFailurePolicy::Stop);
        assert_eq!(config.viewport.degenerate, DegeneratePolicy::Clamp);
    }

    #[test]
    fn yaml_output_reads_back() {
        let config = AppConfig::default();
        let yaml = config.to_yaml().unwrap();
        assert!(yaml.contains("container_id: webgl-container"));
        assert_eq!(AppConfig::from_yaml_str(&yaml).unwrap(), config);
    }

    #[test]
    fn unknown_policy_is_rejected() {
        let err = AppConfig::from_yaml_str("frame:\n  order: sideways\n").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    fn rejected_field(yaml: &str) -> &'static str {
        match AppConfig::from_yaml_str(yaml) {
            Err(ConfigError::Invalid { field, .. }) => field,
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("config should be rejected: {yaml}"),
        }
    }

    #[test]
    fn defaults_are_valid() {
        AppConfig::default().validate().unwrap();
    }

    #[test]
    fn inverted_orbit_limits_are_rejected() {
        assert_eq!(
            rejected_field("controls:\n  min_distance: 5\n  max_distance: 1\n"),
            "controls.max_distance"
        );
        assert_eq!(
            rejected_field("controls:\n  min_polar_angle: 2\n  max_polar_angle: 1\n"),
            "controls.max_polar_angle"
        );
        assert_eq!(
            rejected_field("controls:\n  min_distance: .nan\n"),
            "controls.min_distance"
        );
    }

    #[test]
    fn damping_factor_must_be_a_fraction() {
        for value in ["0", "-0.5", "1.5", ".nan"] {
            let yaml = format!("controls:\n  damping_factor: {value}\n");
            assert_eq!(rejected_field(&yaml), "controls.damping_factor");
        }
        let yaml = "controls:\n  enable_damping: true\n  damping_factor: 1\n";
        assert!(AppConfig::from_yaml_str(yaml).is_ok());
    }

    #[test]
    fn degenerate_projection_is_rejected() {
        assert_eq!(rejected_field("camera:\n  fov: 0\n"), "camera.fov");
        assert_eq!(rejected_field("camera:\n  fov: -30\n"), "camera.fov");
        assert_eq!(rejected_field("camera:\n  near: 0\n"), "camera.near");
        assert_eq!(rejected_field("camera:\n  near: -1\n"), "camera.near");
        assert_eq!(rejected_field("camera:\n  near: 5\n  far: 5\n"), "camera.far");
        assert_eq!(rejected_field("camera:\n  far: 0.05\n"), "camera.far");
    }

    #[test]
    fn zero_zoom_speed_is_rejected() {
        assert_eq!(rejected_field("controls:\n  zoom_speed: 0\n"), "controls.zoom_speed");
    }

    #[test]
    fn missing_file_reports_path() {
        let err = AppConfig::load("/nonexistent/cubeview.yaml").unwrap_err();
        match err {
            ConfigError::Io { path, .. } => {
                assert!(path.ends_with("cubeview.yaml"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
