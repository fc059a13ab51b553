//! Core data structures: blocks, chunks, vertices, uniforms.

pub mod block;
pub mod chunk;
pub mod uniforms;
pub mod vertex;

// Re-export commonly used types
pub use block::{BlockCategory, BlockType, MeshStyle};
pub use chunk::{
    Chunk, ChunkDims, ChunkMeshData, ChunkMeshes, ChunkNeighbors, MeshState, calculate_ao,
};
pub use uniforms::Uniforms;
pub use vertex::{Face, Vertex};
