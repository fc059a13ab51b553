//! Camera and input state.

pub mod camera;
pub mod input;

pub use camera::{Camera, OPENGL_TO_WGPU_MATRIX};
pub use input::InputState;
