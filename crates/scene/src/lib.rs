//! Scene graph: camera, lights and meshes composed for rendering.
//!
//! # Invariants
//! - Scene membership only grows; nodes are never removed.
//! - Meshes and lights are immutable once added.
//! - A camera's projection matrix changes only through
//!   [`PerspectiveCamera::update_projection_matrix`].

pub mod camera;
pub mod graph;
pub mod objects;

pub use camera::PerspectiveCamera;
pub use graph::{Node, Scene};
pub use objects::{BoxGeometry, DirectionalLight, Mesh, PhongMaterial};

pub fn crate_info() -> &'static str {
    "cubeview-scene v0.1.0"
}
