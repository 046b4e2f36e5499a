use crate::gesture::Gesture;
use cubeview_scene::PerspectiveCamera;
use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

/// Keeps the polar angle away from the poles, where `look_at` degenerates.
const POLE_EPSILON: f32 = 1e-6;
/// Motion below this is treated as settled.
const REST_EPSILON: f32 = 1e-6;

/// Tuning for [`OrbitControls`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitConfig {
    /// Spread gesture motion over several frames instead of applying it at once.
    pub enable_damping: bool,
    /// Fraction of the remaining motion applied each frame when damping.
    pub damping_factor: f32,
    /// Radians per pixel of drag.
    pub rotate_speed: f32,
    /// Fraction of the orbit distance per pixel of drag.
    pub pan_speed: f32,
    /// Distance multiplier per wheel step towards the target.
    pub zoom_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    /// Polar angle limits in radians, measured from +Y.
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,
}

impl Default for OrbitConfig {
    fn default() -> Self {
        Self {
            enable_damping: false,
            damping_factor: 0.05,
            rotate_speed: 0.005,
            pan_speed: 0.002,
            zoom_speed: 0.95,
            min_distance: 0.1,
            max_distance: 1000.0,
            min_polar_angle: 0.0,
            max_polar_angle: PI,
        }
    }
}

/// Orbit camera controller.
///
/// Holds the orbit target and the motion still to be applied. Gestures are
/// queued with [`push`](Self::push) from input handlers and applied to the
/// camera by [`update`](Self::update), which the frame loop calls once per
/// frame before drawing.
#[derive(Debug, Clone)]
pub struct OrbitControls {
    config: OrbitConfig,
    target: Vec3,
    pending: Vec<Gesture>,
    theta_delta: f32,
    phi_delta: f32,
    pan_offset: Vec3,
    scale: f32,
}

impl OrbitControls {
    /// Bind to `camera`, orbiting around its current target.
    pub fn new(camera: &PerspectiveCamera, config: OrbitConfig) -> Self {
        Self {
            config,
            target: camera.target,
            pending: Vec::new(),
            theta_delta: 0.0,
            phi_delta: 0.0,
            pan_offset: Vec3::ZERO,
            scale: 1.0,
        }
    }

    pub fn config(&self) -> &OrbitConfig {
        &self.config
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Queue a gesture for the next [`update`](Self::update).
    pub fn push(&mut self, gesture: Gesture) {
        self.pending.push(gesture);
    }

    /// True while queued gestures or damped motion remain.
    pub fn is_moving(&self) -> bool {
        !self.pending.is_empty()
            || self.theta_delta.abs() > REST_EPSILON
            || self.phi_delta.abs() > REST_EPSILON
            || self.pan_offset.length_squared() > REST_EPSILON * REST_EPSILON
            || (self.scale - 1.0).abs() > REST_EPSILON
    }

    fn pan(&mut self, delta: Vec2, camera: &PerspectiveCamera) {
        let distance = (camera.position - self.target).length().max(REST_EPSILON);
        let forward = (self.target - camera.position).normalize_or(Vec3::NEG_Z);
        let right = forward.cross(camera.up).normalize_or(Vec3::X);
        let up = right.cross(forward);
        let k = self.config.pan_speed * distance;
        self.pan_offset += -right * delta.x * k + up * delta.y * k;
    }

    fn apply(&mut self, gesture: Gesture, camera: &PerspectiveCamera) {
        match gesture {
            Gesture::Rotate(delta) => {
                self.theta_delta -= delta.x * self.config.rotate_speed;
                self.phi_delta -= delta.y * self.config.rotate_speed;
            }
            Gesture::Pan(delta) => self.pan(delta, camera),
            Gesture::Zoom(steps) => {
                self.scale *= self.config.zoom_speed.powf(steps);
            }
        }
    }

    /// Drain queued gestures and move `camera`. Returns whether it moved.
    pub fn update(&mut self, camera: &mut PerspectiveCamera) -> bool {
        let pending = std::mem::take(&mut self.pending);
        for gesture in pending {
            self.apply(gesture, camera);
        }

        if !self.is_moving() && camera.target == self.target {
            return false;
        }

        let offset = camera.position - self.target;
        let mut radius = offset.length();
        let mut theta = offset.x.atan2(offset.z);
        let mut phi = if radius > 0.0 {
            (offset.y / radius).clamp(-1.0, 1.0).acos()
        } else {
            0.0
        };

        let factor = if self.config.enable_damping {
            self.config.damping_factor
        } else {
            1.0
        };

        theta += self.theta_delta * factor;
        phi += self.phi_delta * factor;
        // max/min rather than clamp: inverted or NaN limits must not panic.
        phi = phi
            .max(self.config.min_polar_angle.max(POLE_EPSILON))
            .min(self.config.max_polar_angle.min(PI - POLE_EPSILON));
        radius = (radius * self.scale)
            .max(self.config.min_distance)
            .min(self.config.max_distance);
        self.target += self.pan_offset * factor;

        let new_offset = Vec3::new(
            radius * phi.sin() * theta.sin(),
            radius * phi.cos(),
            radius * phi.sin() * theta.cos(),
        );
        let old_position = camera.position;
        let old_target = camera.target;
        camera.position = self.target + new_offset;
        camera.look_at(self.target);

        if self.config.enable_damping {
            self.theta_delta *= 1.0 - factor;
            self.phi_delta *= 1.0 - factor;
            self.pan_offset *= 1.0 - factor;
            if !self.is_moving() {
                self.settle();
            }
        } else {
            self.settle();
        }
        self.scale = 1.0;

        let moved = old_position.distance_squared(camera.position) > REST_EPSILON * REST_EPSILON
            || old_target != camera.target;
        if moved {
            tracing::trace!(
                x = camera.position.x,
                y = camera.position.y,
                z = camera.position.z,
                "orbit camera moved"
            );
        }
        moved
    }

    fn settle(&mut self) {
        self.theta_delta = 0.0;
        self.phi_delta = 0.0;
        self.pan_offset = Vec3::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera_at(position: Vec3) -> PerspectiveCamera {
        let mut camera = PerspectiveCamera::new(75.0, 1.0, 0.1, 100.0);
        camera.position = position;
        camera.look_at(Vec3::ZERO);
        camera
    }

    #[test]
    fn idle_update_leaves_camera_untouched() {
        let mut camera = camera_at(Vec3::new(0.0, 0.0, 2.0));
        let mut controls = OrbitControls::new(&camera, OrbitConfig::default());
        assert!(!controls.update(&mut camera));
        assert_eq!(camera.position, Vec3::new(0.0, 0.0, 2.0));
    }

    #[test]
    fn rotate_keeps_distance() {
        let mut camera = camera_at(Vec3::new(0.0, 0.0, 2.0));
        let mut controls = OrbitControls::new(&camera, OrbitConfig::default());

        controls.push(Gesture::Rotate(Vec2::new(100.0, 0.0)));
        assert_eq!(controls.pending(), 1);
        assert!(controls.update(&mut camera));
        assert_eq!(controls.pending(), 0);

        assert!((camera.position.length() - 2.0).abs() < 1e-4);
        assert!(camera.position.x < 0.0);
        assert_eq!(camera.target, Vec3::ZERO);
    }

    #[test]
    fn polar_angle_is_clamped() {
        let mut camera = camera_at(Vec3::new(0.0, 0.0, 2.0));
        let mut controls = OrbitControls::new(&camera, OrbitConfig::default());

        controls.push(Gesture::Rotate(Vec2::new(0.0, 10_000.0)));
        controls.update(&mut camera);

        assert!(camera.position.is_finite());
        assert!(camera.position.y > 0.0);
        assert!(camera.position.y <= 2.0);
        assert!(camera.view_matrix().is_finite());
    }

    #[test]
    fn zoom_changes_distance_within_limits() {
        let mut camera = camera_at(Vec3::new(0.0, 0.0, 2.0));
        let mut controls = OrbitControls::new(&camera, OrbitConfig::default());

        controls.push(Gesture::Zoom(1.0));
        controls.update(&mut camera);
        assert!((camera.position.length() - 1.9).abs() < 1e-4);

        controls.push(Gesture::Zoom(10_000.0));
        controls.update(&mut camera);
        assert!((camera.position.length() - 0.1).abs() < 1e-4);
    }

    #[test]
    fn inverted_limits_do_not_panic() {
        let config = OrbitConfig {
            min_distance: 5.0,
            max_distance: 1.0,
            min_polar_angle: 2.0,
            max_polar_angle: 1.0,
            ..OrbitConfig::default()
        };
        let mut camera = camera_at(Vec3::new(0.0, 0.0, 2.0));
        let mut controls = OrbitControls::new(&camera, config);

        controls.push(Gesture::Zoom(1.0));
        controls.push(Gesture::Rotate(Vec2::new(0.0, 50.0)));
        controls.update(&mut camera);

        assert!(camera.position.is_finite());
        assert!((camera.position.length() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn pan_moves_target_and_camera_together() {
        let mut camera = camera_at(Vec3::new(0.0, 0.0, 2.0));
        let mut controls = OrbitControls::new(&camera, OrbitConfig::default());

        controls.push(Gesture::Pan(Vec2::new(10.0, 0.0)));
        controls.update(&mut camera);

        assert!(controls.target().x < 0.0);
        assert_eq!(camera.target, controls.target());
        let offset = camera.position - camera.target;
        assert!((offset - Vec3::new(0.0, 0.0, 2.0)).length() < 1e-4);
    }

    #[test]
    fn damping_spreads_motion_over_frames() {
        let config = OrbitConfig {
            enable_damping: true,
            damping_factor: 0.5,
            ..OrbitConfig::default()
        };
        let mut camera = camera_at(Vec3::new(0.0, 0.0, 2.0));
        let mut controls = OrbitControls::new(&camera, config);

        controls.push(Gesture::Rotate(Vec2::new(100.0, 0.0)));
        controls.update(&mut camera);
        let first = camera.position;
        assert!(controls.is_moving());

        assert!(controls.update(&mut camera));
        assert_ne!(camera.position, first);

        for _ in 0..100 {
            controls.update(&mut camera);
        }
        assert!(!controls.is_moving());
        assert!((camera.position.length() - 2.0).abs() < 1e-4);
    }
}
