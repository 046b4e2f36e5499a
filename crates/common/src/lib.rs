//! Shared value types used across the cubeview workspace.

mod color;
mod types;

pub use color::Color;
pub use types::{NodeId, Transform, Viewport};

pub fn crate_info() -> &'static str {
    "cubeview-common v0.1.0"
}
