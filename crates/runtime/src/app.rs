use crate::config::{
    AppConfig, CameraConfig, FrameOrder, LightConfig, ModelConfig, RenderFailurePolicy,
};
use crate::error::{FrameError, InitError};
use crate::frame_loop::{FrameClock, FrameLoop, LoopState};
use crate::host::{Container, ContainerSource, FrameScheduler};
use crate::resize::{ResizeHandler, ResizeOutcome};
use cubeview_common::{NodeId, Viewport};
use cubeview_input::{Gesture, OrbitConfig, OrbitControls};
use cubeview_render::{RenderError, RenderStatus, Renderer};
use cubeview_scene::{DirectionalLight, Mesh, PerspectiveCamera, Scene};
use serde::Serialize;

/// What happened to the draw phase of one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameOutcome {
    /// The renderer drew the scene.
    Rendered,
    /// Nothing was drawn: the viewport is degenerate or the renderer's
    /// output surface was unavailable for this frame.
    Skipped,
    /// The renderer failed and the failure policy dropped the frame.
    Dropped,
}

/// Summary of one frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FrameReport {
    pub frame: u64,
    pub time_seconds: f32,
    pub outcome: FrameOutcome,
    pub camera_moved: bool,
    /// Loop state after the callback returned.
    pub state: LoopState,
}

/// Application root: owns the renderer, scene, camera and controls.
///
/// Built once by [`initialize`](Self::initialize), then driven by a host that
/// forwards size changes to [`on_resize`](Self::on_resize) and frame
/// callbacks to [`frame`](Self::frame).
pub struct App<C: Container, R: Renderer> {
    config: AppConfig,
    container: C,
    renderer: R,
    scene: Scene,
    camera: PerspectiveCamera,
    controls: OrbitControls,
    light: NodeId,
    model: NodeId,
    resize: ResizeHandler,
    viewport: Option<Viewport>,
    frame_loop: FrameLoop,
}

impl<C: Container, R: Renderer> App<C, R> {
    /// Look up the container, bind a renderer to it, compose the scene and
    /// fit everything to the container size.
    ///
    /// The config is validated first. Setup runs camera, light, model,
    /// controls in that order, then the pixel ratio and size are taken from
    /// the container. No frame is requested until [`start`](Self::start).
    pub fn initialize<S, F>(source: &S, config: AppConfig, make_renderer: F) -> Result<Self, InitError>
    where
        S: ContainerSource<Container = C>,
        F: FnOnce(&C) -> Result<R, RenderError>,
    {
        config.validate().map_err(InitError::Config)?;

        let container = source
            .container(&config.container_id)
            .ok_or_else(|| InitError::ContainerNotFound(config.container_id.clone()))?;

        let renderer = make_renderer(&container).map_err(InitError::RenderContext)?;

        let mut scene = Scene::new();
        scene.set_background(config.background);

        let camera = setup_camera(&config.camera, container.client_size());
        let light = setup_light(&mut scene, &config.light);
        let model = setup_model(&mut scene, &config.model);
        let controls = setup_controls(&camera, config.controls);

        let mut app = Self {
            resize: ResizeHandler::new(config.viewport.degenerate),
            config,
            container,
            renderer,
            scene,
            camera,
            controls,
            light,
            model,
            viewport: None,
            frame_loop: FrameLoop::new(),
        };
        let outcome = app.on_resize();

        tracing::info!(
            container = %app.config.container_id,
            nodes = app.scene.len(),
            viewport = ?outcome,
            "application initialized"
        );
        Ok(app)
    }

    /// Request the first frame. Returns false if the loop is already running.
    pub fn start(&mut self, scheduler: &mut impl FrameScheduler) -> bool {
        self.frame_loop.start(scheduler)
    }

    /// Stop requesting frames after the current or pending one.
    pub fn stop(&mut self) {
        self.frame_loop.stop();
    }

    /// Fit camera and renderer to the container's current size.
    pub fn on_resize(&mut self) -> ResizeOutcome {
        let outcome = self
            .resize
            .resize(&self.container, &mut self.camera, &mut self.renderer);
        self.viewport = outcome.applied();
        outcome
    }

    /// Frame callback: drain controls, draw, update the clock, re-arm.
    ///
    /// With the default [`FrameOrder::RenderThenUpdate`], the clock written
    /// in this frame is first visible to the renderer in the next frame.
    pub fn frame(
        &mut self,
        timestamp_ms: f64,
        scheduler: &mut impl FrameScheduler,
    ) -> Result<FrameReport, FrameError> {
        let clock = self.frame_loop.begin(timestamp_ms)?;
        let camera_moved = self.controls.update(&mut self.camera);

        let outcome = match self.config.frame.order {
            FrameOrder::RenderThenUpdate => {
                let outcome = self.draw(&clock)?;
                self.update(&clock);
                outcome
            }
            FrameOrder::UpdateThenRender => {
                self.update(&clock);
                self.draw(&clock)?
            }
        };

        let state = self.frame_loop.finish(scheduler);
        tracing::trace!(frame = clock.frame, ?outcome, ?state, "frame finished");

        Ok(FrameReport {
            frame: clock.frame,
            time_seconds: clock.seconds(),
            outcome,
            camera_moved,
            state,
        })
    }

    fn draw(&mut self, clock: &FrameClock) -> Result<FrameOutcome, FrameError> {
        if self.viewport.is_none() {
            tracing::debug!(frame = clock.frame, "viewport degenerate, draw skipped");
            return Ok(FrameOutcome::Skipped);
        }

        match self.renderer.render(&self.scene, &self.camera) {
            Ok(RenderStatus::Presented) => Ok(FrameOutcome::Rendered),
            Ok(RenderStatus::Skipped) => {
                tracing::debug!(frame = clock.frame, "renderer skipped the frame");
                Ok(FrameOutcome::Skipped)
            }
            Err(source) => match self.config.frame.on_render_error {
                RenderFailurePolicy::Stop => {
                    tracing::error!(frame = clock.frame, "render failed, stopping loop: {source}");
                    self.frame_loop.halt();
                    Err(FrameError::Render {
                        frame: clock.frame,
                        source,
                    })
                }
                RenderFailurePolicy::Continue => {
                    tracing::error!(frame = clock.frame, "render failed, frame dropped: {source}");
                    Ok(FrameOutcome::Dropped)
                }
            },
        }
    }

    fn update(&mut self, clock: &FrameClock) {
        self.scene.set_time(clock.seconds());
    }

    /// Queue a camera gesture for the next frame.
    pub fn push_gesture(&mut self, gesture: Gesture) {
        self.controls.push(gesture);
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn container(&self) -> &C {
        &self.container
    }

    /// Mutable access to the container. Follow size changes with
    /// [`on_resize`](Self::on_resize).
    pub fn container_mut(&mut self) -> &mut C {
        &mut self.container
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn controls(&self) -> &OrbitControls {
        &self.controls
    }

    pub fn light_id(&self) -> NodeId {
        self.light
    }

    pub fn model_id(&self) -> NodeId {
        self.model
    }

    /// Size last applied to camera and renderer, `None` while deferred.
    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    pub fn loop_state(&self) -> LoopState {
        self.frame_loop.state()
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_loop.frame_count()
    }
}

fn setup_camera(config: &CameraConfig, viewport: Viewport) -> PerspectiveCamera {
    let aspect = viewport.aspect().unwrap_or(1.0);
    let mut camera = PerspectiveCamera::new(config.fov, aspect, config.near, config.far);
    camera.position = config.position;
    camera.look_at(config.target);
    camera
}

fn setup_light(scene: &mut Scene, config: &LightConfig) -> NodeId {
    let mut light = DirectionalLight::new(config.color, config.intensity);
    light.position = config.position;
    scene.add(light)
}

fn setup_model(scene: &mut Scene, config: &ModelConfig) -> NodeId {
    scene.add(Mesh::new(config.geometry, config.material))
}

fn setup_controls(camera: &PerspectiveCamera, config: OrbitConfig) -> OrbitControls {
    OrbitControls::new(camera, config)
}
