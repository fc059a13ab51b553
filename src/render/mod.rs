//! Rendering seam and GPU-side resources: the bridge trait the world core
//! talks to, its wgpu implementation, and texture atlas generation.

pub mod bridge;
pub mod renderer;
pub mod texture;

pub use bridge::{MeshHandle, MeshLayer, RenderBridge};
pub use renderer::{ChunkRenderer, DrawCmd, GpuMesh};
pub use texture::{generate_texture_atlas, load_texture_atlas_from_file};
