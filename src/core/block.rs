use serde::{Deserialize, Serialize};

use crate::constants::*;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
pub enum BlockType {
    #[default]
    Air,
    Grass,
    Dirt,
    Stone,
    Sand,
    Water,
    Snow,
    Flower,
}

/// How a block interacts with face culling and ambient occlusion.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum BlockCategory {
    /// Occludes neighbors, receives AO, hides shared faces with other solids.
    Solid,
    /// Foliage-style blocks; never cull anything and are never culled.
    Transparent,
    /// Water; flat shading, culled against any non-air neighbor.
    Liquid,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MeshStyle {
    Cube,
    Cross,
}

impl BlockType {
    pub fn category(self) -> BlockCategory {
        match self {
            BlockType::Water => BlockCategory::Liquid,
            BlockType::Air | BlockType::Flower => BlockCategory::Transparent,
            _ => BlockCategory::Solid,
        }
    }

    pub fn mesh_style(self) -> MeshStyle {
        match self {
            BlockType::Flower => MeshStyle::Cross,
            _ => MeshStyle::Cube,
        }
    }

    pub fn is_solid(self) -> bool {
        self.category() == BlockCategory::Solid
    }

    /// Whether this block counts for AO probes (solid, non-water).
    pub fn occludes(self) -> bool {
        self.is_solid()
    }

    /// Per-axis atlas indices: x-facing faces read component 0, y-facing
    /// component 1, z-facing component 2. Lets a block carry a distinct
    /// top texture from its sides.
    pub fn texture_ids(self) -> [u8; 3] {
        match self {
            BlockType::Grass => [TEX_GRASS_SIDE, TEX_GRASS_TOP, TEX_GRASS_SIDE],
            BlockType::Dirt => [TEX_DIRT; 3],
            BlockType::Stone => [TEX_STONE; 3],
            BlockType::Sand => [TEX_SAND; 3],
            BlockType::Water => [TEX_WATER; 3],
            BlockType::Snow => [TEX_SNOW; 3],
            BlockType::Flower => [TEX_FLOWER; 3],
            // Air has no faces; anything asking for its texture gets the
            // missing tile so the mistake is visible in the frame.
            BlockType::Air => [TEX_MISSING; 3],
        }
    }
}
