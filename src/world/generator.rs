use crate::config::WorldConfig;
use crate::core::block::BlockType;
use crate::core::chunk::{Chunk, ChunkDims};

/// Deterministic terrain generation. Everything a column contains is a pure
/// function of (seed, world x, world z): the height field is a closed-form
/// sine sum, and the banded material jitter comes from seeded position
/// hashes rather than a process-global RNG, so output is byte-identical for
/// a given seed no matter which order chunks are generated in.
pub struct TerrainGenerator {
    dims: ChunkDims,
    sea_level: i32,
    pub seed: u32,
}

impl TerrainGenerator {
    pub fn new(seed: u32, config: &WorldConfig) -> Self {
        TerrainGenerator {
            dims: config.chunk_dims(),
            sea_level: config.sea_level,
            seed,
        }
    }

    /// Surface height for a world column: large rolling hills, medium
    /// detail, ridged mid-frequency swells and fine bumps, offset by the
    /// base elevation (sea level) and floored 32 blocks below it.
    pub fn surface_height(&self, world_x: i32, world_z: i32) -> i32 {
        let fx = world_x as f32;
        let fz = world_z as f32;

        let hills = (fx / 40.0).sin() * 50.0 + (fz / 50.0).sin() * 60.0;
        let detail = (fx / 3.0).sin() * 4.0 + (fz / 3.0).sin() * 4.0;
        let ridges = ((fx + 201.0) / 16.0).sin() * 5.0 * ((fz + 420.0) / 12.0).cos() * 5.0;
        let bumps = ((fx + 469.0) / 8.0).sin() * 2.0 * ((fz + 690.0) / 8.0).cos() * 2.0;

        let relief = (hills + detail + ridges + bumps).max(-32.0);
        (self.sea_level as f32 + relief) as i32
    }

    pub fn generate_chunk(&self, cx: i32, cz: i32) -> Chunk {
        let mut chunk = Chunk::new(cx, cz, self.dims);
        let base_x = cx * self.dims.size;
        let base_z = cz * self.dims.size;

        for lx in 0..self.dims.size {
            for lz in 0..self.dims.size {
                let world_x = base_x + lx;
                let world_z = base_z + lz;
                let height = self.surface_height(world_x, world_z).min(self.dims.height);

                for y in 0..self.dims.height {
                    if y < height {
                        let jitter = self.position_hash_3d(world_x, y, world_z);
                        // Stone core with a dirt cap; the boundary wanders
                        // by up to 9 blocks so it doesn't read as a line.
                        let stone_jitter = (jitter % 10) as i32;
                        let mut block = if y > self.sea_level + 20 + stone_jitter {
                            BlockType::Dirt
                        } else {
                            BlockType::Stone
                        };
                        // Shoreline sand band, itself slightly ragged.
                        let sand_jitter = ((jitter >> 8) % 3) as i32;
                        if y >= self.sea_level - 1 && y < self.sea_level + 6 + sand_jitter {
                            block = BlockType::Sand;
                        }
                        chunk.set_block(lx, y, lz, block);
                    } else if y < self.sea_level {
                        chunk.set_block(lx, y, lz, BlockType::Water);
                    } else if chunk.get_block(lx, y - 1, lz) == BlockType::Dirt {
                        // First air block above the column: promote the dirt
                        // below it to a surface block.
                        let surface = if y - 1 > self.sea_level + 96 {
                            BlockType::Snow
                        } else {
                            BlockType::Grass
                        };
                        chunk.set_block(lx, y - 1, lz, surface);
                    }
                }
            }
        }

        self.place_decorations(&mut chunk, cx, cz);
        chunk
    }

    /// Scatters flowers on grassy surfaces above the waterline. Driven by
    /// the same position hashes as the material bands, so decorations come
    /// back identical if the chunk is ever regenerated.
    fn place_decorations(&self, chunk: &mut Chunk, cx: i32, cz: i32) {
        let base_x = cx * self.dims.size;
        let base_z = cz * self.dims.size;

        for lx in 0..self.dims.size {
            for lz in 0..self.dims.size {
                let world_x = base_x + lx;
                let world_z = base_z + lz;
                let height = self.surface_height(world_x, world_z).min(self.dims.height);
                if height <= self.sea_level || height >= self.dims.height {
                    continue;
                }
                if chunk.get_block(lx, height - 1, lz) != BlockType::Grass {
                    continue;
                }
                if self.position_hash(world_x, world_z) % 100 < 4 {
                    chunk.set_block(lx, height, lz, BlockType::Flower);
                }
            }
        }
    }

    fn position_hash(&self, x: i32, z: i32) -> u32 {
        let mut hash = self.seed;
        hash = hash.wrapping_add(x as u32).wrapping_mul(73856093);
        hash = hash.wrapping_add(z as u32).wrapping_mul(19349663);
        hash ^ (hash >> 16)
    }

    fn position_hash_3d(&self, x: i32, y: i32, z: i32) -> u32 {
        let mut hash = self.seed;
        hash = hash.wrapping_add(x as u32).wrapping_mul(73856093);
        hash = hash.wrapping_add(y as u32).wrapping_mul(19349663);
        hash = hash.wrapping_add(z as u32).wrapping_mul(83492791);
        hash ^ (hash >> 16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> WorldConfig {
        WorldConfig {
            chunk_size: 16,
            chunk_height: 256,
            sea_level: 64,
            ..Default::default()
        }
    }

    fn generator(seed: u32) -> TerrainGenerator {
        TerrainGenerator::new(seed, &config())
    }

    #[test]
    fn same_seed_generates_identical_chunks() {
        let a = generator(2137).generate_chunk(3, -2);
        let b = generator(2137).generate_chunk(3, -2);
        let dims = a.dims();
        for y in 0..dims.height {
            for z in 0..dims.size {
                for x in 0..dims.size {
                    assert_eq!(a.get_block(x, y, z), b.get_block(x, y, z));
                }
            }
        }
    }

    #[test]
    fn different_seeds_disagree_somewhere() {
        let a = generator(1).generate_chunk(0, 0);
        let b = generator(2).generate_chunk(0, 0);
        let dims = a.dims();
        let mut differs = false;
        'scan: for y in 0..dims.height {
            for z in 0..dims.size {
                for x in 0..dims.size {
                    if a.get_block(x, y, z) != b.get_block(x, y, z) {
                        differs = true;
                        break 'scan;
                    }
                }
            }
        }
        assert!(differs, "seed should influence the material bands");
    }

    #[test]
    fn height_is_floored_below_the_base_elevation() {
        let gen = generator(0);
        for x in -200..200 {
            for z in -200..200 {
                assert!(gen.surface_height(x, z) >= 64 - 32);
            }
        }
    }

    #[test]
    fn low_columns_fill_with_water_up_to_sea_level() {
        let gen = generator(7);
        // Hunt for a column well below sea level within a few chunks.
        let mut checked = false;
        'outer: for cx in -4..4 {
            for cz in -4..4 {
                let chunk = gen.generate_chunk(cx, cz);
                for lx in 0..16 {
                    for lz in 0..16 {
                        let height = gen.surface_height(cx * 16 + lx, cz * 16 + lz);
                        if height < 60 {
                            for y in height..64 {
                                assert_eq!(chunk.get_block(lx, y, lz), BlockType::Water);
                            }
                            assert_eq!(chunk.get_block(lx, 64, lz), BlockType::Air);
                            checked = true;
                            break 'outer;
                        }
                    }
                }
            }
        }
        assert!(checked, "expected at least one submerged column nearby");
    }

    #[test]
    fn surfaces_get_grass_or_snow_above_sand_range() {
        let gen = generator(7);
        let mut grassy = 0;
        let mut snowy = 0;
        for cx in -6..6 {
            for cz in -6..6 {
                let chunk = gen.generate_chunk(cx, cz);
                for lx in 0..16 {
                    for lz in 0..16 {
                        let height = gen.surface_height(cx * 16 + lx, cz * 16 + lz);
                        // Above the highest possible stone/sand surface the
                        // top block must be grass, or snow past the snow
                        // line (the dirt cap starts at 64+20 plus up to 9
                        // blocks of jitter).
                        if height - 1 > 64 + 20 + 9 + 1 {
                            let surface = chunk.get_block(lx, height - 1, lz);
                            if height - 1 > 64 + 96 {
                                assert_eq!(surface, BlockType::Snow);
                                snowy += 1;
                            } else {
                                assert_eq!(surface, BlockType::Grass);
                                grassy += 1;
                            }
                        }
                    }
                }
            }
        }
        assert!(grassy > 0, "expected grassy surfaces in range");
        assert!(snowy > 0, "expected snowy peaks in range");
    }

    #[test]
    fn sand_band_sits_at_the_waterline() {
        let gen = generator(7);
        let chunk = gen.generate_chunk(0, 0);
        let mut sandy = 0;
        for lx in 0..16 {
            for lz in 0..16 {
                let height = gen.surface_height(lx, lz);
                // Sea level minus one is inside the band whenever terrain
                // reaches it.
                if height > 63 {
                    assert_eq!(chunk.get_block(lx, 63, lz), BlockType::Sand);
                    sandy += 1;
                }
            }
        }
        assert!(sandy > 0, "expected shoreline columns in the origin chunk");
    }

    #[test]
    fn flowers_only_grow_on_grass() {
        let gen = generator(42);
        let mut found = 0;
        for cx in -6..6 {
            for cz in -6..6 {
                let chunk = gen.generate_chunk(cx, cz);
                for lx in 0..16 {
                    for lz in 0..16 {
                        for y in 1..chunk.dims().height {
                            if chunk.get_block(lx, y, lz) == BlockType::Flower {
                                assert_eq!(
                                    chunk.get_block(lx, y - 1, lz),
                                    BlockType::Grass,
                                    "flower must sit on grass"
                                );
                                found += 1;
                            }
                        }
                    }
                }
            }
        }
        assert!(found > 0, "expected some flowers across 144 chunks");
    }

    #[test]
    fn tall_chunks_are_clamped_to_their_height() {
        let short = WorldConfig {
            chunk_height: 32,
            ..config()
        };
        let gen = TerrainGenerator::new(9, &short);
        // Must not panic even though the height field tops out far above 32.
        let chunk = gen.generate_chunk(1, 4);
        assert_eq!(chunk.dims().height, 32);
    }
}
