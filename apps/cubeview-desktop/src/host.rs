use cubeview_common::Viewport;
use cubeview_runtime::{Container, ContainerSource, FrameScheduler};
use std::sync::Arc;
use winit::dpi::PhysicalSize;
use winit::window::Window;

/// Logical size of a physical window size, rounded to the nearest pixel.
pub fn logical_viewport(size: PhysicalSize<u32>, scale_factor: f64) -> Viewport {
    let logical = size.to_logical::<f64>(scale_factor);
    Viewport::new(
        logical.width.round() as u32,
        logical.height.round() as u32,
    )
}

/// A winit window acting as the drawing surface's container.
#[derive(Clone)]
pub struct WindowContainer {
    window: Arc<Window>,
}

impl WindowContainer {
    pub fn window(&self) -> Arc<Window> {
        self.window.clone()
    }
}

impl Container for WindowContainer {
    fn client_size(&self) -> Viewport {
        logical_viewport(self.window.inner_size(), self.window.scale_factor())
    }

    fn pixel_ratio(&self) -> f64 {
        self.window.scale_factor()
    }
}

/// Resolves the configured container id to the application window.
pub struct WindowHost {
    id: String,
    window: Arc<Window>,
}

impl WindowHost {
    pub fn new(id: impl Into<String>, window: Arc<Window>) -> Self {
        Self {
            id: id.into(),
            window,
        }
    }
}

impl ContainerSource for WindowHost {
    type Container = WindowContainer;

    fn container(&self, id: &str) -> Option<WindowContainer> {
        (id == self.id).then(|| WindowContainer {
            window: self.window.clone(),
        })
    }
}

/// Schedules frames through `Window::request_redraw`.
pub struct RedrawScheduler<'a> {
    window: &'a Window,
}

impl<'a> RedrawScheduler<'a> {
    pub fn new(window: &'a Window) -> Self {
        Self { window }
    }
}

impl FrameScheduler for RedrawScheduler<'_> {
    fn request_frame(&mut self) {
        self.window.request_redraw();
    }
}
