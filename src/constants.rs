// Texture atlas layout: a 4x4 grid of square tiles, addressed by layer index.
pub const TEXTURE_SIZE: u32 = 32;
pub const ATLAS_SIZE: u32 = 4;
pub const ATLAS_TILES: u32 = ATLAS_SIZE * ATLAS_SIZE;

// Indexes of textures in atlas
pub const TEX_GRASS_TOP: u8 = 0;
pub const TEX_GRASS_SIDE: u8 = 1;
pub const TEX_DIRT: u8 = 2;
pub const TEX_STONE: u8 = 3;
pub const TEX_SAND: u8 = 4;
pub const TEX_WATER: u8 = 5;
pub const TEX_SNOW: u8 = 6;
pub const TEX_FLOWER: u8 = 7;
pub const TEX_MISSING: u8 = 15;
