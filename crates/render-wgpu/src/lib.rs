//! wgpu render backend for cubeview.
//!
//! Draws every box mesh in the scene as an instance of one unit cube, shaded
//! with Blinn-Phong from up to [`MAX_LIGHTS`] directional lights.
//!
//! # Invariants
//! - Renderer never mutates the scene or the camera.
//! - The surface is always configured with a non-zero size.

mod gpu;
mod mesh;
mod shaders;

pub use gpu::{MAX_LIGHTS, WgpuRenderer};

pub fn crate_info() -> &'static str {
    "cubeview-render-wgpu v0.1.0"
}
