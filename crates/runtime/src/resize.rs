use crate::config::DegeneratePolicy;
use crate::host::Container;
use cubeview_common::Viewport;
use cubeview_render::Renderer;
use cubeview_scene::PerspectiveCamera;

/// Result of one resize pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeOutcome {
    /// The container size was applied as-is.
    Applied(Viewport),
    /// The container had a zero side; a clamped size was applied instead.
    Clamped {
        requested: Viewport,
        applied: Viewport,
    },
    /// The container had a zero side; camera and renderer were left alone.
    Deferred(Viewport),
}

impl ResizeOutcome {
    /// The size camera and renderer now agree on, if any was applied.
    pub fn applied(&self) -> Option<Viewport> {
        match self {
            ResizeOutcome::Applied(viewport) => Some(*viewport),
            ResizeOutcome::Clamped { applied, .. } => Some(*applied),
            ResizeOutcome::Deferred(_) => None,
        }
    }

    pub fn is_deferred(&self) -> bool {
        matches!(self, ResizeOutcome::Deferred(_))
    }
}

/// Keeps camera aspect and renderer size in step with the container.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResizeHandler {
    policy: DegeneratePolicy,
}

impl ResizeHandler {
    pub fn new(policy: DegeneratePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> DegeneratePolicy {
        self.policy
    }

    /// Read the container size and fit `camera` and `renderer` to it.
    ///
    /// Calling this again without the container changing leaves every
    /// observable value as it was.
    pub fn resize<R: Renderer + ?Sized>(
        &self,
        container: &impl Container,
        camera: &mut PerspectiveCamera,
        renderer: &mut R,
    ) -> ResizeOutcome {
        let ratio = container.pixel_ratio();
        if !(ratio.is_finite() && ratio > 0.0) {
            tracing::warn!(ratio, "container reports an unusable pixel ratio, keeping current");
        } else if ratio != renderer.pixel_ratio() {
            tracing::debug!(ratio, "pixel ratio changed");
            renderer.set_pixel_ratio(ratio);
        }

        let requested = container.client_size();
        if !requested.is_degenerate() {
            fit(requested, camera, renderer);
            return ResizeOutcome::Applied(requested);
        }

        match self.policy {
            DegeneratePolicy::Defer => {
                tracing::warn!(size = %requested, "degenerate viewport, resize deferred");
                ResizeOutcome::Deferred(requested)
            }
            DegeneratePolicy::Clamp => {
                let applied = requested.clamped();
                tracing::warn!(size = %requested, clamped = %applied, "degenerate viewport clamped");
                fit(applied, camera, renderer);
                ResizeOutcome::Clamped { requested, applied }
            }
        }
    }
}

fn fit<R: Renderer + ?Sized>(viewport: Viewport, camera: &mut PerspectiveCamera, renderer: &mut R) {
    camera.aspect = viewport.width as f32 / viewport.height as f32;
    camera.update_projection_matrix();
    renderer.set_size(viewport.width, viewport.height);
    tracing::debug!(size = %viewport, aspect = camera.aspect, "viewport resized");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::HeadlessContainer;
    use cubeview_render::DebugTextRenderer;

    fn camera() -> PerspectiveCamera {
        PerspectiveCamera::new(75.0, 1.0, 0.1, 100.0)
    }

    #[test]
    fn applies_aspect_and_size() {
        let handler = ResizeHandler::default();
        let mut camera = camera();
        let mut renderer = DebugTextRenderer::new();

        for (w, h) in [(800, 600), (1, 1), (1920, 1080), (300, 900), (4096, 17)] {
            let container = HeadlessContainer::new(w, h);
            let outcome = handler.resize(&container, &mut camera, &mut renderer);
            assert_eq!(outcome, ResizeOutcome::Applied(Viewport::new(w, h)));
            assert!((camera.aspect - w as f32 / h as f32).abs() < 1e-6);
            assert!(!camera.is_projection_stale());
            assert_eq!(renderer.size(), (w, h));
        }
    }

    #[test]
    fn repeated_resize_is_idempotent() {
        let handler = ResizeHandler::default();
        let container = HeadlessContainer::new(1024, 768).with_pixel_ratio(1.5);
        let mut camera = camera();
        let mut renderer = DebugTextRenderer::new();

        handler.resize(&container, &mut camera, &mut renderer);
        let first = (
            camera.aspect,
            camera.projection_matrix(),
            renderer.size(),
            renderer.pixel_ratio(),
        );
        handler.resize(&container, &mut camera, &mut renderer);
        let second = (
            camera.aspect,
            camera.projection_matrix(),
            renderer.size(),
            renderer.pixel_ratio(),
        );
        assert_eq!(first, second);
    }

    #[test]
    fn pixel_ratio_follows_container() {
        let handler = ResizeHandler::default();
        let container = HeadlessContainer::new(100, 100).with_pixel_ratio(2.0);
        let mut camera = camera();
        let mut renderer = DebugTextRenderer::new();

        handler.resize(&container, &mut camera, &mut renderer);
        assert_eq!(renderer.pixel_ratio(), 2.0);
        assert_eq!(renderer.drawing_buffer_size(), (200, 200));
    }

    #[test]
    fn unusable_pixel_ratio_is_ignored() {
        let handler = ResizeHandler::default();
        let mut camera = camera();
        let mut renderer = DebugTextRenderer::new();

        for ratio in [0.0, -2.0, f64::NAN, f64::INFINITY] {
            let container = HeadlessContainer::new(100, 50).with_pixel_ratio(ratio);
            handler.resize(&container, &mut camera, &mut renderer);
            assert_eq!(renderer.pixel_ratio(), 1.0);
            assert_eq!(renderer.drawing_buffer_size(), (100, 50));
        }
    }

    #[test]
    fn degenerate_viewport_is_deferred() {
        let handler = ResizeHandler::new(DegeneratePolicy::Defer);
        let mut camera = camera();
        let mut renderer = DebugTextRenderer::new();
        renderer.set_size(640, 480);

        let outcome = handler.resize(&HeadlessContainer::new(640, 0), &mut camera, &mut renderer);
        assert!(outcome.is_deferred());
        assert_eq!(outcome.applied(), None);
        assert_eq!(camera.aspect, 1.0);
        assert!(camera.aspect.is_finite());
        assert_eq!(renderer.size(), (640, 480));
    }

    #[test]
    fn degenerate_viewport_can_be_clamped() {
        let handler = ResizeHandler::new(DegeneratePolicy::Clamp);
        let mut camera = camera();
        let mut renderer = DebugTextRenderer::new();

        let outcome = handler.resize(&HeadlessContainer::new(0, 0), &mut camera, &mut renderer);
        assert_eq!(
            outcome,
            ResizeOutcome::Clamped {
                requested: Viewport::new(0, 0),
                applied: Viewport::new(1, 1),
            }
        );
        assert_eq!(camera.aspect, 1.0);
        assert_eq!(renderer.size(), (1, 1));
    }
}
