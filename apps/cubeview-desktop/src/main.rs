mod host;

use anyhow::{Context, Result};
use clap::Parser;
use cubeview_input::{PointerButton, PointerEvent, PointerTracker};
use cubeview_runtime::{App, AppConfig, FrameError};
use cubeview_render_wgpu::WgpuRenderer;
use glam::Vec2;
use host::{RedrawScheduler, WindowContainer, WindowHost};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

/// Pixels of a precise scroll that count as one wheel step.
const PIXELS_PER_WHEEL_STEP: f32 = 50.0;

#[derive(Parser)]
#[command(name = "cubeview-desktop", about = "Interactive cube viewer")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Initial window width in logical pixels
    #[arg(long, default_value = "800")]
    width: u32,

    /// Initial window height in logical pixels
    #[arg(long, default_value = "600")]
    height: u32,

    /// Window title
    #[arg(long, default_value = "cubeview")]
    title: String,
}

struct DesktopApp {
    config: AppConfig,
    width: u32,
    height: u32,
    title: String,
    window: Option<Arc<Window>>,
    app: Option<App<WindowContainer, WgpuRenderer>>,
    pointer: PointerTracker,
    started: Instant,
    error: Option<anyhow::Error>,
}

impl DesktopApp {
    fn new(cli: &Cli, config: AppConfig) -> Self {
        Self {
            config,
            width: cli.width,
            height: cli.height,
            title: cli.title.clone(),
            window: None,
            app: None,
            pointer: PointerTracker::new(),
            started: Instant::now(),
            error: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        tracing::error!("{error:#}");
        self.error = Some(error);
        event_loop.exit();
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attributes = Window::default_attributes()
            .with_title(self.title.clone())
            .with_inner_size(LogicalSize::new(self.width, self.height));
        let window = Arc::new(
            event_loop
                .create_window(attributes)
                .context("failed to create window")?,
        );

        let host = WindowHost::new(self.config.container_id.clone(), window.clone());
        let mut app = App::initialize(&host, self.config.clone(), |container| {
            let size = window.inner_size();
            WgpuRenderer::new(container.window(), size.width, size.height)
        })?;

        let size = window.inner_size();
        app.renderer_mut().set_surface_size(size.width, size.height);

        let info = app.renderer().adapter_info();
        tracing::info!(
            backend = info.backend.to_str(),
            adapter = %info.name,
            "window ready"
        );

        app.start(&mut RedrawScheduler::new(&window));
        self.window = Some(window);
        self.app = Some(app);
        Ok(())
    }

    fn pointer_event(&mut self, event: PointerEvent) {
        let Some(app) = &mut self.app else {
            return;
        };
        if let Some(gesture) = self.pointer.handle(event) {
            app.push_gesture(gesture);
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(app), Some(window)) = (&mut self.app, &self.window) else {
            return;
        };
        let timestamp_ms = self.started.elapsed().as_secs_f64() * 1000.0;
        match app.frame(timestamp_ms, &mut RedrawScheduler::new(window)) {
            Ok(report) => {
                tracing::trace!(frame = report.frame, outcome = ?report.outcome, "frame");
            }
            // Redraws the compositor asks for outside the loop's own schedule.
            Err(FrameError::NotScheduled { .. }) => {}
            Err(e) => self.fail(event_loop, e.into()),
        }
    }
}

impl ApplicationHandler for DesktopApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.app.is_some() {
            return;
        }
        if let Err(e) = self.init(event_loop) {
            self.fail(event_loop, e);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                if let Some(app) = &mut self.app {
                    app.stop();
                }
                event_loop.exit();
            }
            WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => {
                if let (Some(app), Some(window)) = (&mut self.app, &self.window) {
                    app.on_resize();
                    let size = window.inner_size();
                    app.renderer_mut().set_surface_size(size.width, size.height);
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                let scale = self.window.as_ref().map_or(1.0, |w| w.scale_factor());
                let logical = position.to_logical::<f32>(scale);
                self.pointer_event(PointerEvent::Moved(Vec2::new(logical.x, logical.y)));
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let button = match button {
                    MouseButton::Left => PointerButton::Primary,
                    MouseButton::Right => PointerButton::Secondary,
                    MouseButton::Middle => PointerButton::Middle,
                    _ => return,
                };
                self.pointer_event(PointerEvent::Button {
                    button,
                    pressed: state == ElementState::Pressed,
                });
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let steps = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(p) => p.y as f32 / PIXELS_PER_WHEEL_STEP,
                };
                self.pointer_event(PointerEvent::Wheel(steps));
            }
            WindowEvent::ModifiersChanged(modifiers) => {
                self.pointer_event(PointerEvent::Shift(modifiers.state().shift_key()));
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let config = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };

    tracing::info!("cubeview-desktop starting");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut desktop = DesktopApp::new(&cli, config);
    event_loop.run_app(&mut desktop)?;

    match desktop.error.take() {
        Some(error) => Err(error),
        None => Ok(()),
    }
}
