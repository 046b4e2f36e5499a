use crate::frame_loop::LoopState;
use cubeview_render::RenderError;
use std::path::PathBuf;

/// Fatal errors raised while building the application.
#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("container element `{0}` not found")]
    ContainerNotFound(String),
    #[error("rendering context unavailable: {0}")]
    RenderContext(#[source] RenderError),
    #[error("invalid configuration: {0}")]
    Config(#[source] ConfigError),
}

/// Errors raised by a frame callback.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    #[error("frame callback invoked while the loop is {state:?}")]
    NotScheduled { state: LoopState },
    #[error("render failed on frame {frame}: {source}")]
    Render {
        frame: u64,
        #[source]
        source: RenderError,
    },
}

/// Errors from loading or writing configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}
