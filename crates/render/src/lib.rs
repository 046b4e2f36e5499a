//! Rendering Adapter: renderer-agnostic interface.
//!
//! # Invariants
//! - Renderers never mutate the scene or the camera.
//! - Output size is only changed through [`Renderer::set_size`].
//!
//! The GPU backend lives in `cubeview-render-wgpu`. [`DebugTextRenderer`]
//! implements the same trait without a GPU, for the CLI and for tests.

mod renderer;

pub use renderer::{DebugTextRenderer, RenderError, RenderStatus, Renderer};

pub fn crate_info() -> &'static str {
    "cubeview-render v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("render"));
    }
}
