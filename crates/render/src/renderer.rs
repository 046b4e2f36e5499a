use cubeview_scene::{Node, PerspectiveCamera, Scene};

/// Errors a renderer can raise while being created or drawing a frame.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("no compatible graphics adapter found")]
    NoAdapter,
    #[error("failed to create drawing surface: {0}")]
    Surface(String),
    #[error("failed to acquire graphics device: {0}")]
    Device(String),
    #[error("failed to acquire frame: {0}")]
    Frame(String),
    #[error("camera projection is stale (aspect {aspect})")]
    StaleProjection { aspect: f32 },
}

/// What a successful [`Renderer::render`] call did with the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStatus {
    /// The frame was drawn and handed to the output surface.
    Presented,
    /// The output surface was unavailable for this frame; nothing was drawn.
    /// The renderer recovers on its own and the next frame may present.
    Skipped,
}

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// A renderer owns its output surface. Size is expressed in logical pixels;
/// the drawing buffer is that size multiplied by the pixel ratio.
pub trait Renderer {
    fn set_pixel_ratio(&mut self, ratio: f64);

    fn pixel_ratio(&self) -> f64;

    /// Resize the output surface to `width` x `height` logical pixels.
    fn set_size(&mut self, width: u32, height: u32);

    fn size(&self) -> (u32, u32);

    /// Size of the backing pixel buffer.
    fn drawing_buffer_size(&self) -> (u32, u32) {
        let (width, height) = self.size();
        let ratio = self.pixel_ratio();
        (
            (width as f64 * ratio).round() as u32,
            (height as f64 * ratio).round() as u32,
        )
    }

    /// Draw one frame of `scene` as seen from `camera`.
    ///
    /// Transient surface conditions are reported as [`RenderStatus::Skipped`],
    /// not as errors.
    fn render(
        &mut self,
        scene: &Scene,
        camera: &PerspectiveCamera,
    ) -> Result<RenderStatus, RenderError>;
}

/// Headless renderer producing a text description of each frame.
///
/// Every rendered frame is appended to an in-memory history, which makes it
/// useful for the CLI and for asserting what a given frame observed.
#[derive(Debug)]
pub struct DebugTextRenderer {
    width: u32,
    height: u32,
    pixel_ratio: f64,
    frames: Vec<String>,
}

impl Default for DebugTextRenderer {
    fn default() -> Self {
        Self {
            width: 300,
            height: 150,
            pixel_ratio: 1.0,
            frames: Vec::new(),
        }
    }
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn frames(&self) -> &[String] {
        &self.frames
    }

    pub fn last_frame(&self) -> Option<&str> {
        self.frames.last().map(String::as_str)
    }

    fn describe(&self, scene: &Scene, camera: &PerspectiveCamera) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "=== Frame {} (time={:.3}s, nodes={}) ===\n",
            self.frames.len() + 1,
            scene.time(),
            scene.len()
        ));
        let (buf_w, buf_h) = self.drawing_buffer_size();
        out.push_str(&format!(
            "Surface: {}x{} @{}x ({}x{} px) background={}\n",
            self.width,
            self.height,
            self.pixel_ratio,
            buf_w,
            buf_h,
            scene.background()
        ));
        let p = camera.position;
        let t = camera.target;
        out.push_str(&format!(
            "Camera: pos=({:.2}, {:.2}, {:.2}) target=({:.2}, {:.2}, {:.2}) fov={:.0} aspect={:.3} near={} far={}\n",
            p.x, p.y, p.z, t.x, t.y, t.z, camera.fov, camera.aspect, camera.near, camera.far
        ));

        for (id, node) in scene.nodes() {
            match node {
                Node::Light(light) => {
                    let lp = light.position;
                    out.push_str(&format!(
                        "  [{}] light color={} intensity={:.2} pos=({:.2}, {:.2}, {:.2})\n",
                        id.short(),
                        light.color,
                        light.intensity,
                        lp.x,
                        lp.y,
                        lp.z
                    ));
                }
                Node::Mesh(mesh) => {
                    let g = mesh.geometry;
                    let mp = mesh.transform.position;
                    out.push_str(&format!(
                        "  [{}] mesh box={}x{}x{} color={} pos=({:.2}, {:.2}, {:.2})\n",
                        id.short(),
                        g.width,
                        g.height,
                        g.depth,
                        mesh.material.color,
                        mp.x,
                        mp.y,
                        mp.z
                    ));
                }
            }
        }

        out
    }
}

impl Renderer for DebugTextRenderer {
    fn set_pixel_ratio(&mut self, ratio: f64) {
        self.pixel_ratio = ratio;
    }

    fn pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }

    fn set_size(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn render(
        &mut self,
        scene: &Scene,
        camera: &PerspectiveCamera,
    ) -> Result<RenderStatus, RenderError> {
        if camera.is_projection_stale() {
            return Err(RenderError::StaleProjection {
                aspect: camera.aspect,
            });
        }
        let text = self.describe(scene, camera);
        tracing::trace!(frame = self.frames.len() + 1, "debug frame rendered");
        self.frames.push(text);
        Ok(RenderStatus::Presented)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cubeview_common::Color;
    use cubeview_scene::{BoxGeometry, DirectionalLight, Mesh, PhongMaterial};
    use glam::Vec3;

    fn cube_scene() -> Scene {
        let mut scene = Scene::new();
        let mut light = DirectionalLight::new(Color::WHITE, 1.0);
        light.position = Vec3::new(-1.0, 2.0, 4.0);
        scene.add(light);
        scene.add(Mesh::new(
            BoxGeometry::default(),
            PhongMaterial::with_color(Color::from_hex(0x044a88)),
        ));
        scene
    }

    #[test]
    fn debug_renderer_empty_scene() {
        let mut renderer = DebugTextRenderer::new();
        let status = renderer
            .render(&Scene::new(), &PerspectiveCamera::default())
            .unwrap();
        assert_eq!(status, RenderStatus::Presented);

        let output = renderer.last_frame().unwrap();
        assert!(output.contains("Frame 1"));
        assert!(output.contains("nodes=0"));
    }

    #[test]
    fn debug_renderer_lists_nodes() {
        let mut renderer = DebugTextRenderer::new();
        renderer
            .render(&cube_scene(), &PerspectiveCamera::default())
            .unwrap();

        let output = renderer.last_frame().unwrap();
        assert!(output.contains("nodes=2"));
        assert!(output.contains("light color=#ffffff"));
        assert!(output.contains("mesh box=1x1x1 color=#044a88"));
    }

    #[test]
    fn frames_accumulate() {
        let mut renderer = DebugTextRenderer::new();
        let scene = cube_scene();
        let camera = PerspectiveCamera::default();
        for _ in 0..3 {
            renderer.render(&scene, &camera).unwrap();
        }
        assert_eq!(renderer.frame_count(), 3);
        assert!(renderer.frames()[2].contains("Frame 3"));
    }

    #[test]
    fn stale_projection_is_rejected() {
        let mut renderer = DebugTextRenderer::new();
        let mut camera = PerspectiveCamera::default();
        camera.aspect = 3.0;

        let err = renderer.render(&Scene::new(), &camera).unwrap_err();
        assert!(matches!(err, RenderError::StaleProjection { .. }));
        assert_eq!(renderer.frame_count(), 0);
    }

    #[test]
    fn drawing_buffer_follows_pixel_ratio() {
        let mut renderer = DebugTextRenderer::new();
        renderer.set_size(800, 600);
        renderer.set_pixel_ratio(2.0);
        assert_eq!(renderer.size(), (800, 600));
        assert_eq!(renderer.drawing_buffer_size(), (1600, 1200));
    }
}
