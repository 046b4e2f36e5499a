//! Host environment boundary: the container that hosts the drawing surface,
//! lookup of containers by identifier, and the per-frame scheduler.
//!
//! The headless implementations here drive the runtime without a window,
//! for the CLI and for tests.

use cubeview_common::Viewport;
use std::collections::BTreeMap;

/// The region that hosts the drawing surface.
pub trait Container {
    /// Current client size in logical pixels.
    fn client_size(&self) -> Viewport;

    /// Physical pixels per logical pixel.
    fn pixel_ratio(&self) -> f64 {
        1.0
    }
}

/// Looks up containers by identifier.
pub trait ContainerSource {
    type Container: Container;

    fn container(&self, id: &str) -> Option<Self::Container>;
}

/// Display-frame scheduling primitive.
///
/// `request_frame` arms exactly one future frame callback; the host later
/// invokes [`App::frame`](crate::App::frame) with the frame timestamp.
pub trait FrameScheduler {
    fn request_frame(&mut self);
}

/// In-memory container with a settable size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeadlessContainer {
    viewport: Viewport,
    pixel_ratio: f64,
}

impl HeadlessContainer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            viewport: Viewport::new(width, height),
            pixel_ratio: 1.0,
        }
    }

    pub fn with_pixel_ratio(mut self, ratio: f64) -> Self {
        self.pixel_ratio = ratio;
        self
    }

    /// Change the size the container reports. Callers notify the app with
    /// [`App::on_resize`](crate::App::on_resize).
    pub fn resize(&mut self, width: u32, height: u32) {
        self.viewport = Viewport::new(width, height);
    }

    pub fn set_pixel_ratio(&mut self, ratio: f64) {
        self.pixel_ratio = ratio;
    }
}

impl Container for HeadlessContainer {
    fn client_size(&self) -> Viewport {
        self.viewport
    }

    fn pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }
}

/// A set of named headless containers.
#[derive(Debug, Clone, Default)]
pub struct HeadlessHost {
    containers: BTreeMap<String, HeadlessContainer>,
}

impl HeadlessHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_container(mut self, id: impl Into<String>, container: HeadlessContainer) -> Self {
        self.containers.insert(id.into(), container);
        self
    }
}

impl ContainerSource for HeadlessHost {
    type Container = HeadlessContainer;

    fn container(&self, id: &str) -> Option<HeadlessContainer> {
        self.containers.get(id).copied()
    }
}

/// Scheduler that only counts requests; the driver decides when to fire.
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    pending: usize,
    requested: u64,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume one pending request. Returns false when none is armed.
    pub fn take(&mut self) -> bool {
        if self.pending == 0 {
            return false;
        }
        self.pending -= 1;
        true
    }

    pub fn pending(&self) -> usize {
        self.pending
    }

    /// Requests made over the scheduler's lifetime.
    pub fn total_requests(&self) -> u64 {
        self.requested
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) {
        self.pending += 1;
        self.requested += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headless_container_reports_size() {
        let mut container = HeadlessContainer::new(800, 600).with_pixel_ratio(2.0);
        assert_eq!(container.client_size(), Viewport::new(800, 600));
        assert_eq!(container.pixel_ratio(), 2.0);

        container.resize(400, 300);
        assert_eq!(container.client_size(), Viewport::new(400, 300));
    }

    #[test]
    fn host_looks_up_by_id() {
        let host = HeadlessHost::new().with_container("main", HeadlessContainer::new(10, 10));
        assert!(host.container("main").is_some());
        assert!(host.container("other").is_none());
    }

    #[test]
    fn manual_scheduler_counts_requests() {
        let mut scheduler = ManualScheduler::new();
        assert!(!scheduler.take());

        scheduler.request_frame();
        assert_eq!(scheduler.pending(), 1);
        assert!(scheduler.take());
        assert!(!scheduler.take());
        assert_eq!(scheduler.total_requests(), 1);
    }
}
