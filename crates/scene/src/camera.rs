use glam::{Mat4, Vec3};

/// Perspective camera with a cached projection matrix.
///
/// Projection parameters are public fields. After changing any of them the
/// owner must call [`update_projection_matrix`](Self::update_projection_matrix);
/// until then [`projection_matrix`](Self::projection_matrix) keeps returning
/// the previous projection and [`is_projection_stale`](Self::is_projection_stale)
/// reports `true`.
#[derive(Debug, Clone)]
pub struct PerspectiveCamera {
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    projection: Mat4,
    projected_with: [f32; 4],
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self::new(50.0, 1.0, 0.1, 2000.0)
    }
}

impl PerspectiveCamera {
    pub fn new(fov: f32, aspect: f32, near: f32, far: f32) -> Self {
        let mut camera = Self {
            fov,
            aspect,
            near,
            far,
            position: Vec3::ZERO,
            target: Vec3::NEG_Z,
            up: Vec3::Y,
            projection: Mat4::IDENTITY,
            projected_with: [0.0; 4],
        };
        camera.update_projection_matrix();
        camera
    }

    fn params(&self) -> [f32; 4] {
        [self.fov, self.aspect, self.near, self.far]
    }

    /// Recompute the projection from the current fov/aspect/near/far.
    pub fn update_projection_matrix(&mut self) {
        self.projection =
            Mat4::perspective_rh(self.fov.to_radians(), self.aspect, self.near, self.far);
        self.projected_with = self.params();
    }

    pub fn projection_matrix(&self) -> Mat4 {
        self.projection
    }

    pub fn is_projection_stale(&self) -> bool {
        self.projected_with != self.params()
    }

    /// Point the camera at `target`, keeping its position.
    pub fn look_at(&mut self, target: Vec3) {
        self.target = target;
    }

    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize_or_zero()
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_camera_has_current_projection() {
        let cam = PerspectiveCamera::new(75.0, 4.0 / 3.0, 0.1, 100.0);
        assert!(!cam.is_projection_stale());
        let expected = Mat4::perspective_rh(75.0_f32.to_radians(), 4.0 / 3.0, 0.1, 100.0);
        assert_eq!(cam.projection_matrix(), expected);
    }

    #[test]
    fn aspect_change_requires_explicit_update() {
        let mut cam = PerspectiveCamera::new(75.0, 1.0, 0.1, 100.0);
        let before = cam.projection_matrix();

        cam.aspect = 2.0;
        assert!(cam.is_projection_stale());
        assert_eq!(cam.projection_matrix(), before);

        cam.update_projection_matrix();
        assert!(!cam.is_projection_stale());
        assert_ne!(cam.projection_matrix(), before);
    }

    #[test]
    fn view_projection_is_finite() {
        let mut cam = PerspectiveCamera::new(75.0, 1.5, 0.1, 100.0);
        cam.position = Vec3::new(0.0, 0.0, 2.0);
        cam.look_at(Vec3::ZERO);
        let vp = cam.view_projection();
        assert!(vp.is_finite());
        assert_eq!(cam.forward(), Vec3::NEG_Z);
    }
}
