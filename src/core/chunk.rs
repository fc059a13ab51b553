use tracing::warn;

use crate::core::block::{BlockCategory, BlockType, MeshStyle};
use crate::core::vertex::{Face, Vertex};
use crate::render::bridge::MeshHandle;

/// Chunk dimensions: `size` along x and z, `height` along y. Runtime
/// configuration, shared by every chunk in a world.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ChunkDims {
    pub size: i32,
    pub height: i32,
}

impl ChunkDims {
    pub fn volume(self) -> usize {
        (self.size * self.size * self.height) as usize
    }

    pub fn contains(self, x: i32, y: i32, z: i32) -> bool {
        x >= 0 && x < self.size && z >= 0 && z < self.size && y >= 0 && y < self.height
    }

    /// Flat index for chunk-local coordinates: x fastest, then z, then y
    /// (`x + z*size + y*size*size`). The bounds contract lives here and
    /// nowhere else; violating it is a programming error, not a runtime
    /// condition, so it terminates.
    pub fn index(self, x: i32, y: i32, z: i32) -> usize {
        assert!(
            self.contains(x, y, z),
            "chunk index out of bounds: ({}, {}, {}) in {}x{}x{}",
            x,
            y,
            z,
            self.size,
            self.height,
            self.size
        );
        (x + z * self.size + y * self.size * self.size) as usize
    }
}

/// Mesh staleness. `Dirty` is set by any voxel edit or by a neighbor
/// appearing/disappearing at a seam; `World::apply_updates` drives
/// Dirty -> Regenerating -> Clean.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MeshState {
    Clean,
    Dirty,
    Regenerating,
}

/// Borrowed view of the four laterally adjacent chunks. Built by the World
/// from its chunk map right before meshing; a slot is `Some` exactly when a
/// live chunk exists at that coordinate. Chunks never hold on to each other.
#[derive(Default)]
pub struct ChunkNeighbors<'a> {
    pub left: Option<&'a Chunk>,
    pub right: Option<&'a Chunk>,
    pub front: Option<&'a Chunk>,
    pub back: Option<&'a Chunk>,
}

impl ChunkNeighbors<'_> {
    pub const NONE: ChunkNeighbors<'static> = ChunkNeighbors {
        left: None,
        right: None,
        front: None,
        back: None,
    };

    /// Presence bitmask (left, right, front, back). Comparing masks across
    /// frames is how seam changes are detected.
    pub fn mask(&self) -> u8 {
        self.left.is_some() as u8
            | (self.right.is_some() as u8) << 1
            | (self.front.is_some() as u8) << 2
            | (self.back.is_some() as u8) << 3
    }
}

/// GPU-side handles for a chunk's uploaded meshes, one slot per layer.
/// `None` means the layer had no geometry (or the upload was skipped).
#[derive(Default)]
pub struct ChunkMeshes {
    pub solid: Option<MeshHandle>,
    pub water: Option<MeshHandle>,
    pub flora: Option<MeshHandle>,
}

impl ChunkMeshes {
    pub fn drain(&mut self) -> impl Iterator<Item = MeshHandle> {
        [self.solid.take(), self.water.take(), self.flora.take()]
            .into_iter()
            .flatten()
    }
}

/// CPU-side output of `Chunk::generate_mesh`, one vertex list per layer.
#[derive(Default, Debug)]
pub struct ChunkMeshData {
    pub solid: Vec<Vertex>,
    pub water: Vec<Vertex>,
    pub flora: Vec<Vertex>,
}

/// Corner template per face: six (position, texcoord) pairs forming two
/// triangles of the unit cube.
const FACE_CORNERS: [[([i32; 3], [u8; 2]); 6]; 6] = [
    // Back (-z)
    [
        ([0, 0, 0], [0, 0]),
        ([0, 1, 0], [0, 1]),
        ([1, 1, 0], [1, 1]),
        ([1, 1, 0], [1, 1]),
        ([1, 0, 0], [1, 0]),
        ([0, 0, 0], [0, 0]),
    ],
    // Front (+z)
    [
        ([0, 0, 1], [0, 0]),
        ([1, 0, 1], [1, 0]),
        ([1, 1, 1], [1, 1]),
        ([1, 1, 1], [1, 1]),
        ([0, 1, 1], [0, 1]),
        ([0, 0, 1], [0, 0]),
    ],
    // Left (-x)
    [
        ([0, 0, 0], [0, 0]),
        ([0, 0, 1], [1, 0]),
        ([0, 1, 1], [1, 1]),
        ([0, 1, 1], [1, 1]),
        ([0, 1, 0], [0, 1]),
        ([0, 0, 0], [0, 0]),
    ],
    // Right (+x)
    [
        ([1, 0, 0], [0, 0]),
        ([1, 1, 0], [0, 1]),
        ([1, 1, 1], [1, 1]),
        ([1, 1, 1], [1, 1]),
        ([1, 0, 1], [1, 0]),
        ([1, 0, 0], [0, 0]),
    ],
    // Bottom (-y)
    [
        ([0, 0, 0], [0, 0]),
        ([1, 0, 0], [1, 0]),
        ([1, 0, 1], [1, 1]),
        ([1, 0, 1], [1, 1]),
        ([0, 0, 1], [0, 1]),
        ([0, 0, 0], [0, 0]),
    ],
    // Top (+y)
    [
        ([0, 1, 0], [0, 0]),
        ([0, 1, 1], [0, 1]),
        ([1, 1, 1], [1, 1]),
        ([1, 1, 1], [1, 1]),
        ([1, 1, 0], [1, 0]),
        ([0, 1, 0], [0, 0]),
    ],
];

/// In-plane AO probe directions for each face pair, indexed by
/// `Face::pair_index` (z faces, x faces, y faces).
const AO_SIDE_OFFSETS: [[[i32; 3]; 2]; 3] = [
    [[1, 0, 0], [0, 1, 0]],
    [[0, 1, 0], [0, 0, 1]],
    [[1, 0, 0], [0, 0, 1]],
];

/// Cross-quad template: two quads spanning the cell diagonals, eight
/// distinct corners over twelve triangle-list vertices.
const CROSS_CORNERS: [([i32; 3], [u8; 2]); 12] = [
    ([0, 0, 0], [0, 0]),
    ([1, 0, 1], [1, 0]),
    ([1, 1, 1], [1, 1]),
    ([1, 1, 1], [1, 1]),
    ([0, 1, 0], [0, 1]),
    ([0, 0, 0], [0, 0]),
    ([1, 0, 0], [0, 0]),
    ([0, 0, 1], [1, 0]),
    ([0, 1, 1], [1, 1]),
    ([0, 1, 1], [1, 1]),
    ([1, 1, 0], [0, 1]),
    ([1, 0, 0], [0, 0]),
];

/// https://0fps.net/2013/07/03/ambient-occlusion-for-minecraft-like-worlds/
pub fn calculate_ao(side1: bool, side2: bool, corner: bool) -> u8 {
    if side1 && side2 {
        return 0;
    }
    3 - (side1 as u8 + side2 as u8 + corner as u8)
}

fn uv_code(uv: [u8; 2]) -> u8 {
    uv[0] << 1 | uv[1]
}

/// One full-height column of voxels, the unit of generation, meshing and
/// streaming. Owned exclusively by the World.
pub struct Chunk {
    pub coord: (i32, i32),
    dims: ChunkDims,
    blocks: Vec<BlockType>,
    pub mesh_state: MeshState,
    /// Neighbor presence at the last relink, for seam-change detection.
    pub(crate) neighbor_mask: u8,
    pub meshes: ChunkMeshes,
}

impl Chunk {
    pub fn new(x: i32, z: i32, dims: ChunkDims) -> Self {
        Chunk {
            coord: (x, z),
            dims,
            blocks: vec![BlockType::Air; dims.volume()],
            mesh_state: MeshState::Dirty,
            neighbor_mask: 0,
            meshes: ChunkMeshes::default(),
        }
    }

    pub fn dims(&self) -> ChunkDims {
        self.dims
    }

    /// Strict in-chunk read; anything outside resolves to Air.
    pub fn get_block(&self, x: i32, y: i32, z: i32) -> BlockType {
        if self.dims.contains(x, y, z) {
            self.blocks[self.dims.index(x, y, z)]
        } else {
            BlockType::Air
        }
    }

    /// Boundary-extended read used by the mesher. x and z accept the
    /// inclusive range [-1, size]; the overhanging values resolve into the
    /// matching neighbor's edge column when that neighbor is loaded, Air
    /// otherwise. The four diagonal corners are reachable through no single
    /// neighbor and always resolve to Air. AO sampling never needs a true
    /// diagonal block more than one step out, so the gap is deliberate.
    pub fn block_at(&self, neighbors: &ChunkNeighbors<'_>, x: i32, y: i32, z: i32) -> BlockType {
        let s = self.dims.size;
        if x < -1 || x > s || z < -1 || z > s || y < 0 || y >= self.dims.height {
            return BlockType::Air;
        }
        if (x == -1 || x == s) && (z == -1 || z == s) {
            return BlockType::Air;
        }
        if x == -1 {
            return match neighbors.left {
                Some(n) => n.get_block(s - 1, y, z),
                None => BlockType::Air,
            };
        }
        if x == s {
            return match neighbors.right {
                Some(n) => n.get_block(0, y, z),
                None => BlockType::Air,
            };
        }
        if z == -1 {
            return match neighbors.back {
                Some(n) => n.get_block(x, y, s - 1),
                None => BlockType::Air,
            };
        }
        if z == s {
            return match neighbors.front {
                Some(n) => n.get_block(x, y, 0),
                None => BlockType::Air,
            };
        }
        self.blocks[self.dims.index(x, y, z)]
    }

    /// Writes a block and marks the mesh stale. Boundary extension applies
    /// to reads only; out-of-bounds writes are rejected with a warning.
    pub fn set_block(&mut self, x: i32, y: i32, z: i32, block: BlockType) {
        if !self.dims.contains(x, y, z) {
            warn!(x, y, z, "tried to set block at invalid coordinates");
            return;
        }
        let idx = self.dims.index(x, y, z);
        self.blocks[idx] = block;
        self.mesh_state = MeshState::Dirty;
    }

    /// Builds the chunk's vertex lists. Scan order is x outer, z middle,
    /// y inner; the column height dominates the block count, so y varies
    /// fastest along the flat storage.
    pub fn generate_mesh(&self, neighbors: &ChunkNeighbors<'_>) -> ChunkMeshData {
        let mut mesh = ChunkMeshData::default();

        for x in 0..self.dims.size {
            for z in 0..self.dims.size {
                for y in 0..self.dims.height {
                    let block = self.blocks[self.dims.index(x, y, z)];
                    if block == BlockType::Air {
                        continue;
                    }

                    match block.mesh_style() {
                        MeshStyle::Cross => emit_cross(&mut mesh.flora, block, x, y, z),
                        MeshStyle::Cube => {
                            let liquid = block.category() == BlockCategory::Liquid;
                            let target = if liquid { &mut mesh.water } else { &mut mesh.solid };
                            self.emit_cube(target, neighbors, block, liquid, x, y, z);
                        }
                    }
                }
            }
        }

        mesh
    }

    fn emit_cube(
        &self,
        out: &mut Vec<Vertex>,
        neighbors: &ChunkNeighbors<'_>,
        block: BlockType,
        liquid: bool,
        x: i32,
        y: i32,
        z: i32,
    ) {
        let texture = block.texture_ids();

        for face in Face::ALL {
            let [ox, oy, oz] = face.offset();
            let neighbor = self.block_at(neighbors, x + ox, y + oy, z + oz);

            // Seams between two solids are hidden; water hides behind any
            // neighbor; solids stay visible through water and foliage.
            let culled = neighbor != BlockType::Air
                && (liquid || neighbor.category() == BlockCategory::Solid);
            if culled {
                continue;
            }

            let atlas_index = texture[face.texture_axis()];
            let [side1_dir, side2_dir] = AO_SIDE_OFFSETS[face.pair_index()];

            for (corner, uv) in FACE_CORNERS[face as usize] {
                let ao = if liquid {
                    3 // flat shading for water
                } else {
                    // Mirror the in-plane probe directions into this
                    // corner's quadrant and sample the three blocks that
                    // crowd the corner on the far side of the face.
                    let mul = [
                        if corner[0] == 1 { 1 } else { -1 },
                        if corner[1] == 1 { 1 } else { -1 },
                        if corner[2] == 1 { 1 } else { -1 },
                    ];
                    let occupied = |dir: [i32; 3]| {
                        self.block_at(
                            neighbors,
                            x + ox + dir[0] * mul[0],
                            y + oy + dir[1] * mul[1],
                            z + oz + dir[2] * mul[2],
                        )
                        .occludes()
                    };
                    let side1 = occupied(side1_dir);
                    let side2 = occupied(side2_dir);
                    let corner_occupied = occupied([
                        side1_dir[0] + side2_dir[0],
                        side1_dir[1] + side2_dir[1],
                        side1_dir[2] + side2_dir[2],
                    ]);
                    calculate_ao(side1, side2, corner_occupied)
                };

                out.push(Vertex {
                    position: [
                        (x + corner[0]) as u16,
                        (y + corner[1]) as u16,
                        (z + corner[2]) as u16,
                    ],
                    face: face as u16,
                    uv: uv_code(uv),
                    ao,
                    atlas_index,
                    _pad: 0,
                });
            }
        }
    }
}

/// Cross blocks ignore culling and occlusion entirely: two fixed quads, the
/// x texture component, full brightness.
fn emit_cross(out: &mut Vec<Vertex>, block: BlockType, x: i32, y: i32, z: i32) {
    let atlas_index = block.texture_ids()[0];
    for (corner, uv) in CROSS_CORNERS {
        out.push(Vertex {
            position: [
                (x + corner[0]) as u16,
                (y + corner[1]) as u16,
                (z + corner[2]) as u16,
            ],
            face: Face::Top as u16,
            uv: uv_code(uv),
            ao: 3,
            atlas_index,
            _pad: 0,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{TEX_FLOWER, TEX_GRASS_TOP};
    use std::collections::HashSet;

    const DIMS: ChunkDims = ChunkDims { size: 4, height: 8 };

    fn chunk() -> Chunk {
        Chunk::new(0, 0, DIMS)
    }

    fn faces_of(mesh: &[Vertex], face: Face) -> Vec<&Vertex> {
        mesh.iter().filter(|v| v.face == face as u16).collect()
    }

    #[test]
    fn flat_index_is_a_bijection() {
        let mut seen = HashSet::new();
        for y in 0..DIMS.height {
            for z in 0..DIMS.size {
                for x in 0..DIMS.size {
                    let idx = DIMS.index(x, y, z);
                    assert!(seen.insert(idx), "collision at ({x}, {y}, {z})");
                    // Decode and recover the original coordinates.
                    let size = DIMS.size as usize;
                    assert_eq!(idx % size, x as usize);
                    assert_eq!((idx / size) % size, z as usize);
                    assert_eq!(idx / (size * size), y as usize);
                }
            }
        }
        assert_eq!(seen.len(), DIMS.volume());
    }

    #[test]
    #[should_panic(expected = "chunk index out of bounds")]
    fn flat_index_rejects_out_of_bounds() {
        DIMS.index(DIMS.size, 0, 0);
    }

    #[test]
    fn block_at_is_total_over_the_boundary_range() {
        let c = chunk();
        for x in -1..=DIMS.size {
            for z in -1..=DIMS.size {
                for y in 0..DIMS.height {
                    // Must never panic, and an empty chunk is all Air.
                    assert_eq!(c.block_at(&ChunkNeighbors::NONE, x, y, z), BlockType::Air);
                }
            }
        }
        assert_eq!(
            c.block_at(&ChunkNeighbors::NONE, -2, 0, 0),
            BlockType::Air
        );
        assert_eq!(
            c.block_at(&ChunkNeighbors::NONE, 0, DIMS.height, 0),
            BlockType::Air
        );
        assert_eq!(c.block_at(&ChunkNeighbors::NONE, 0, -1, 0), BlockType::Air);
    }

    #[test]
    fn block_at_redirects_into_neighbors() {
        let mut left = chunk();
        let mut right = chunk();
        let mut front = chunk();
        let mut back = chunk();
        left.set_block(DIMS.size - 1, 3, 2, BlockType::Stone);
        right.set_block(0, 3, 2, BlockType::Sand);
        front.set_block(2, 3, 0, BlockType::Dirt);
        back.set_block(2, 3, DIMS.size - 1, BlockType::Snow);

        let c = chunk();
        let neighbors = ChunkNeighbors {
            left: Some(&left),
            right: Some(&right),
            front: Some(&front),
            back: Some(&back),
        };

        assert_eq!(c.block_at(&neighbors, -1, 3, 2), BlockType::Stone);
        assert_eq!(c.block_at(&neighbors, DIMS.size, 3, 2), BlockType::Sand);
        assert_eq!(c.block_at(&neighbors, 2, 3, DIMS.size), BlockType::Dirt);
        assert_eq!(c.block_at(&neighbors, 2, 3, -1), BlockType::Snow);
    }

    #[test]
    fn diagonal_corners_resolve_to_air_even_with_neighbors() {
        let mut left = chunk();
        let mut back = chunk();
        for y in 0..DIMS.height {
            for i in 0..DIMS.size {
                left.set_block(DIMS.size - 1, y, i, BlockType::Stone);
                back.set_block(i, y, DIMS.size - 1, BlockType::Stone);
            }
        }
        let c = chunk();
        let neighbors = ChunkNeighbors {
            left: Some(&left),
            back: Some(&back),
            ..Default::default()
        };
        assert_eq!(c.block_at(&neighbors, -1, 2, -1), BlockType::Air);
        assert_eq!(c.block_at(&neighbors, -1, 2, DIMS.size), BlockType::Air);
        assert_eq!(c.block_at(&neighbors, DIMS.size, 2, -1), BlockType::Air);
        assert_eq!(
            c.block_at(&neighbors, DIMS.size, 2, DIMS.size),
            BlockType::Air
        );
    }

    #[test]
    fn set_block_out_of_bounds_is_rejected() {
        let mut c = chunk();
        c.mesh_state = MeshState::Clean;
        c.set_block(-1, 0, 0, BlockType::Stone);
        c.set_block(0, DIMS.height, 0, BlockType::Stone);
        c.set_block(DIMS.size, 0, 0, BlockType::Stone);
        assert_eq!(c.mesh_state, MeshState::Clean);
        for y in 0..DIMS.height {
            for z in 0..DIMS.size {
                for x in 0..DIMS.size {
                    assert_eq!(c.get_block(x, y, z), BlockType::Air);
                }
            }
        }
    }

    #[test]
    fn set_block_marks_the_chunk_dirty() {
        let mut c = chunk();
        c.mesh_state = MeshState::Clean;
        c.set_block(1, 2, 3, BlockType::Dirt);
        assert_eq!(c.mesh_state, MeshState::Dirty);
        assert_eq!(c.get_block(1, 2, 3), BlockType::Dirt);
    }

    #[test]
    fn lone_solid_block_emits_all_six_faces() {
        let mut c = chunk();
        c.set_block(1, 1, 1, BlockType::Stone);
        let mesh = c.generate_mesh(&ChunkNeighbors::NONE);
        assert_eq!(mesh.solid.len(), 36);
        assert!(mesh.water.is_empty());
        assert!(mesh.flora.is_empty());
        for face in Face::ALL {
            assert_eq!(faces_of(&mesh.solid, face).len(), 6);
        }
    }

    #[test]
    fn shared_face_between_two_solids_is_culled() {
        let mut c = chunk();
        c.set_block(1, 1, 1, BlockType::Stone);
        c.set_block(2, 1, 1, BlockType::Stone);
        let mesh = c.generate_mesh(&ChunkNeighbors::NONE);
        // 12 faces minus the two that meet in the middle.
        assert_eq!(mesh.solid.len(), 10 * 6);
        // No Right face from the left block, no Left face from the right one:
        // every remaining x-facing vertex sits on the pair's outer walls.
        for v in faces_of(&mesh.solid, Face::Right) {
            assert_eq!(v.position[0], 3);
        }
        for v in faces_of(&mesh.solid, Face::Left) {
            assert_eq!(v.position[0], 1);
        }
    }

    #[test]
    fn solid_slab_has_one_top_face_per_column() {
        let mut c = chunk();
        let top = 2;
        for x in 0..DIMS.size {
            for z in 0..DIMS.size {
                for y in 0..top {
                    c.set_block(x, y, z, BlockType::Stone);
                }
            }
        }
        let mesh = c.generate_mesh(&ChunkNeighbors::NONE);

        let columns = (DIMS.size * DIMS.size) as usize;
        let top_faces = faces_of(&mesh.solid, Face::Top);
        assert_eq!(top_faces.len(), columns * 6);
        // Every top face sits on the slab surface, so no internal faces.
        for v in top_faces {
            assert_eq!(v.position[1], top as u16);
        }
        // Side faces exist only on the slab's outer walls (no neighbors, so
        // the walls face Air).
        for v in faces_of(&mesh.solid, Face::Left) {
            assert_eq!(v.position[0], 0);
        }
        for v in faces_of(&mesh.solid, Face::Right) {
            assert_eq!(v.position[0], DIMS.size as u16);
        }
        let expected =
            columns * 6 * 2 + (DIMS.size * top as i32) as usize * 4 * 6;
        assert_eq!(mesh.solid.len(), expected);
    }

    #[test]
    fn slab_interior_faces_disappear_when_neighbors_continue_it() {
        let mut c = chunk();
        let mut filled = chunk();
        for x in 0..DIMS.size {
            for z in 0..DIMS.size {
                for y in 0..2 {
                    c.set_block(x, y, z, BlockType::Stone);
                    filled.set_block(x, y, z, BlockType::Stone);
                }
            }
        }
        let neighbors = ChunkNeighbors {
            left: Some(&filled),
            right: Some(&filled),
            front: Some(&filled),
            back: Some(&filled),
        };
        let mesh = c.generate_mesh(&neighbors);
        // The slab continues into every neighbor: only tops and bottoms left.
        let columns = (DIMS.size * DIMS.size) as usize;
        assert_eq!(mesh.solid.len(), columns * 6 * 2);
    }

    #[test]
    fn lone_water_block_emits_six_flat_faces() {
        let mut c = chunk();
        c.set_block(2, 3, 2, BlockType::Water);
        let mesh = c.generate_mesh(&ChunkNeighbors::NONE);
        assert!(mesh.solid.is_empty());
        assert_eq!(mesh.water.len(), 36);
        for v in &mesh.water {
            assert_eq!(v.ao, 3);
        }
    }

    #[test]
    fn water_is_culled_by_any_neighbor_but_never_culls_solids() {
        let mut c = chunk();
        c.set_block(1, 1, 1, BlockType::Water);
        c.set_block(2, 1, 1, BlockType::Stone);
        let mesh = c.generate_mesh(&ChunkNeighbors::NONE);
        // Water loses its face toward the stone; the stone keeps its face
        // toward the water so submerged terrain stays visible.
        assert_eq!(mesh.water.len(), 5 * 6);
        assert_eq!(mesh.solid.len(), 6 * 6);
        assert!(faces_of(&mesh.water, Face::Right).is_empty());
        assert_eq!(faces_of(&mesh.solid, Face::Left).len(), 6);
    }

    #[test]
    fn ao_levels() {
        assert_eq!(calculate_ao(true, true, true), 0);
        assert_eq!(calculate_ao(true, true, false), 0);
        assert_eq!(calculate_ao(false, false, false), 3);
        assert_eq!(calculate_ao(true, false, false), 2);
        assert_eq!(calculate_ao(false, true, false), 2);
        assert_eq!(calculate_ao(false, false, true), 2);
        assert_eq!(calculate_ao(true, false, true), 1);
    }

    #[test]
    fn side_block_darkens_the_shared_top_corners() {
        let mut c = chunk();
        c.set_block(1, 0, 1, BlockType::Stone);
        // One step up and to the left: occupies the side probe for the top
        // face's x=0 corners.
        c.set_block(0, 1, 1, BlockType::Stone);
        let mesh = c.generate_mesh(&ChunkNeighbors::NONE);

        let top: Vec<&Vertex> = mesh
            .solid
            .iter()
            .filter(|v| v.face == Face::Top as u16 && v.position[1] == 1)
            .collect();
        assert_eq!(top.len(), 6);
        for v in top {
            if v.position[0] == 1 {
                assert_eq!(v.ao, 2);
            } else {
                assert_eq!(v.ao, 3);
            }
        }
    }

    #[test]
    fn water_neighbors_do_not_occlude() {
        let mut c = chunk();
        c.set_block(1, 0, 1, BlockType::Stone);
        c.set_block(0, 1, 1, BlockType::Water);
        let mesh = c.generate_mesh(&ChunkNeighbors::NONE);
        for v in mesh
            .solid
            .iter()
            .filter(|v| v.face == Face::Top as u16)
        {
            assert_eq!(v.ao, 3);
        }
    }

    #[test]
    fn flowers_emit_crosses_unculled_and_unoccluded() {
        let mut c = chunk();
        c.set_block(1, 1, 1, BlockType::Flower);
        // Bury it: cross meshes ignore neighbors entirely.
        for face in Face::ALL {
            let [ox, oy, oz] = face.offset();
            c.set_block(1 + ox, 1 + oy, 1 + oz, BlockType::Stone);
        }
        let mesh = c.generate_mesh(&ChunkNeighbors::NONE);
        assert_eq!(mesh.flora.len(), 12);
        for v in &mesh.flora {
            assert_eq!(v.ao, 3);
            assert_eq!(v.atlas_index, TEX_FLOWER);
        }
        let corners: HashSet<[u16; 3]> = mesh.flora.iter().map(|v| v.position).collect();
        assert_eq!(corners.len(), 8);
    }

    #[test]
    fn face_texture_follows_the_dominant_axis() {
        let mut c = chunk();
        c.set_block(1, 1, 1, BlockType::Grass);
        let mesh = c.generate_mesh(&ChunkNeighbors::NONE);
        for v in &mesh.solid {
            let expected = BlockType::Grass.texture_ids()
                [Face::ALL[v.face as usize].texture_axis()];
            assert_eq!(v.atlas_index, expected);
        }
        assert_eq!(
            faces_of(&mesh.solid, Face::Top)[0].atlas_index,
            TEX_GRASS_TOP
        );
    }

    #[test]
    fn uv_codes_cover_the_four_corners() {
        let mut c = chunk();
        c.set_block(0, 0, 0, BlockType::Stone);
        let mesh = c.generate_mesh(&ChunkNeighbors::NONE);
        for face in Face::ALL {
            let codes: HashSet<u8> = faces_of(&mesh.solid, face).iter().map(|v| v.uv).collect();
            assert_eq!(codes, HashSet::from([0, 1, 2, 3]));
        }
    }

    #[test]
    fn boundary_faces_cull_against_neighbor_chunks() {
        let mut c = chunk();
        let mut right = chunk();
        c.set_block(DIMS.size - 1, 1, 1, BlockType::Stone);
        right.set_block(0, 1, 1, BlockType::Stone);

        let alone = c.generate_mesh(&ChunkNeighbors::NONE);
        assert_eq!(faces_of(&alone.solid, Face::Right).len(), 6);

        let linked = c.generate_mesh(&ChunkNeighbors {
            right: Some(&right),
            ..Default::default()
        });
        assert!(faces_of(&linked.solid, Face::Right).is_empty());
    }
}
