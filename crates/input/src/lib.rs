//! Camera controller: pointer gestures mapped onto orbit camera motion.
//!
//! # Invariants
//! - Gestures never touch the camera directly; they are queued and applied
//!   in a single [`OrbitControls::update`] pass per frame.
//! - Polar angle and orbit distance stay within their configured limits.

pub mod gesture;
pub mod orbit;

pub use gesture::{Gesture, PointerButton, PointerEvent, PointerTracker};
pub use orbit::{OrbitConfig, OrbitControls};

pub fn crate_info() -> &'static str {
    "cubeview-input v0.1.0"
}
