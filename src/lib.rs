//! blockwork, a streaming voxel-world engine.
//!
//! The library is the engine core: chunk voxel storage and meshing
//! ([`core`]), deterministic terrain generation and streaming ([`world`]),
//! and the narrow GPU seam ([`render`]). The windowed application lives in
//! the binary.

// Core data structures: blocks, chunks, vertices
pub mod core;

// Player module with camera and input
pub mod player;

// Render module with the bridge trait, wgpu renderer and textures
pub mod render;

// World module with generation and streaming
pub mod world;

// Other modules
pub mod config;
pub mod constants;

// Re-exports
pub use config::{
    DEFAULT_SETTINGS_FILE, EngineSettings, GraphicsSettings, WorldConfig, load_settings,
    save_settings,
};
pub use constants::*;
pub use crate::core::{
    BlockCategory, BlockType, Chunk, ChunkDims, ChunkMeshData, ChunkNeighbors, Face, MeshState,
    MeshStyle, Uniforms, Vertex,
};
pub use player::{Camera, InputState};
pub use render::{
    ChunkRenderer, MeshHandle, MeshLayer, RenderBridge, generate_texture_atlas,
    load_texture_atlas_from_file,
};
pub use world::{TerrainGenerator, World};
