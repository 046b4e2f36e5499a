//! Application runtime: the app root, the render loop and the resize handler.
//!
//! # Invariants
//! - Exactly one camera and one renderer per [`App`].
//! - After every applied resize the camera aspect equals width / height and
//!   its projection matrix is current.
//! - No frame is drawn while the viewport is degenerate.
//! - Each frame callback requests at most one further frame.

pub mod app;
pub mod config;
pub mod error;
pub mod frame_loop;
pub mod host;
pub mod resize;

pub use app::{App, FrameOutcome, FrameReport};
pub use config::{
    AppConfig, CameraConfig, DegeneratePolicy, FrameConfig, FrameOrder, LightConfig,
    ModelConfig, RenderFailurePolicy, ViewportConfig,
};
pub use error::{ConfigError, FrameError, InitError};
pub use frame_loop::{FrameClock, FrameLoop, LoopState};
pub use host::{
    Container, ContainerSource, FrameScheduler, HeadlessContainer, HeadlessHost,
    ManualScheduler,
};
pub use resize::{ResizeHandler, ResizeOutcome};

pub fn crate_info() -> &'static str {
    "cubeview-runtime v0.1.0"
}
