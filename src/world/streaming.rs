use std::collections::{HashMap, HashSet, VecDeque};

use cgmath::Point3;
use tracing::{debug, warn};

use crate::config::WorldConfig;
use crate::core::block::BlockType;
use crate::core::chunk::{Chunk, ChunkNeighbors, MeshState};
use crate::player::camera::Camera;
use crate::render::bridge::{MeshLayer, RenderBridge};
use crate::world::generator::TerrainGenerator;

/// Owns every live chunk and orchestrates the streaming lifecycle:
/// enqueue on approach, budgeted generation, neighbor relinking, dirty
/// remeshing, deferred deletion, and distance-ordered draw submission.
pub struct World {
    pub chunks: HashMap<(i32, i32), Chunk>,
    generator: TerrainGenerator,
    config: WorldConfig,
    /// FIFO of coordinates awaiting generation. Mirrored by `queued` so the
    /// queue never holds duplicates or already-loaded coordinates.
    chunk_queue: VecDeque<(i32, i32)>,
    queued: HashSet<(i32, i32)>,
    chunks_to_delete: HashSet<(i32, i32)>,
    /// Loaded coordinates in draw order; re-sorted lazily when the set
    /// changes.
    sorted_chunk_indices: Vec<(i32, i32)>,
    sort_dirty: bool,
    last_chunk: Option<(i32, i32)>,
}

impl World {
    pub fn new(config: WorldConfig, seed: u32) -> Self {
        World {
            chunks: HashMap::new(),
            generator: TerrainGenerator::new(seed, &config),
            config,
            chunk_queue: VecDeque::new(),
            queued: HashSet::new(),
            chunks_to_delete: HashSet::new(),
            sorted_chunk_indices: Vec::new(),
            sort_dirty: false,
            last_chunk: None,
        }
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn generator(&self) -> &TerrainGenerator {
        &self.generator
    }

    pub fn pending_count(&self) -> usize {
        self.chunk_queue.len()
    }

    pub fn chunk_coord(&self, x: f32, z: f32) -> (i32, i32) {
        let size = self.config.chunk_size as f32;
        ((x / size).floor() as i32, (z / size).floor() as i32)
    }

    /// Recomputes the desired chunk set around the camera. No-op while the
    /// camera stays inside the same chunk column. Coordinates inside the
    /// streaming radius are enqueued nearest rings first; loaded chunks
    /// outside it are marked for deletion and queued ones are cancelled
    /// outright, since generating them would only schedule another deletion.
    pub fn update_state(&mut self, position: Point3<f32>) {
        let center = self.chunk_coord(position.x, position.z);
        if self.last_chunk == Some(center) {
            return;
        }
        self.last_chunk = Some(center);
        let radius = self.config.render_distance;

        for layer in 0..=radius {
            for dz in -layer..=layer {
                for dx in -layer..=layer {
                    let key = (center.0 + dx, center.1 + dz);
                    if self.chunks.contains_key(&key) || self.queued.contains(&key) {
                        continue;
                    }
                    self.chunk_queue.push_back(key);
                    self.queued.insert(key);
                }
            }
        }

        let queued = &mut self.queued;
        self.chunk_queue.retain(|key| {
            let keep =
                (key.0 - center.0).abs() <= radius && (key.1 - center.1).abs() <= radius;
            if !keep {
                queued.remove(key);
            }
            keep
        });

        for key in self.chunks.keys() {
            if (key.0 - center.0).abs() > radius || (key.1 - center.1).abs() > radius {
                debug!(x = key.0, z = key.1, "pushed to erase");
                self.chunks_to_delete.insert(*key);
            }
        }

        // A chunk marked on an earlier pass may be back inside the radius if
        // the camera doubled back before the mark was processed.
        self.chunks_to_delete.retain(|key| {
            (key.0 - center.0).abs() > radius || (key.1 - center.1).abs() > radius
        });
    }

    /// One frame's worth of world work: generate up to the configured
    /// budget, relink neighbors, remesh whatever is dirty, then process the
    /// deletion set. Mesh data goes straight out through the bridge.
    pub fn apply_updates(&mut self, bridge: &mut dyn RenderBridge) {
        let mut generated = 0;
        while generated < self.config.max_chunks_per_frame {
            let Some(key) = self.chunk_queue.pop_front() else {
                break;
            };
            self.queued.remove(&key);
            // Doomed before it was ever built: drop it without spending
            // budget on it.
            if self.chunks_to_delete.contains(&key) {
                continue;
            }
            if self.chunks.contains_key(&key) {
                continue;
            }
            debug!(x = key.0, z = key.1, "generated chunk");
            let chunk = self.generator.generate_chunk(key.0, key.1);
            self.chunks.insert(key, chunk);
            self.sorted_chunk_indices.push(key);
            self.sort_dirty = true;
            generated += 1;
        }

        // A neighbor appearing or disappearing exposes or hides geometry at
        // the seam, so a presence flip re-dirties the chunk.
        let keys: Vec<(i32, i32)> = self.chunks.keys().copied().collect();
        for &key in &keys {
            let mask = self.neighbors_of(key).mask();
            if let Some(chunk) = self.chunks.get_mut(&key) {
                if chunk.neighbor_mask != mask {
                    chunk.neighbor_mask = mask;
                    chunk.mesh_state = MeshState::Dirty;
                }
            }
        }

        for &key in &keys {
            let needs_remesh = self
                .chunks
                .get(&key)
                .is_some_and(|c| c.mesh_state == MeshState::Dirty);
            // A chunk on the deletion list keeps its old mesh for its last
            // rendered frame.
            if !needs_remesh || self.chunks_to_delete.contains(&key) {
                continue;
            }
            if let Some(chunk) = self.chunks.get_mut(&key) {
                chunk.mesh_state = MeshState::Regenerating;
            }
            let data = {
                let chunk = &self.chunks[&key];
                chunk.generate_mesh(&self.neighbors_of(key))
            };
            if let Some(chunk) = self.chunks.get_mut(&key) {
                for old in chunk.meshes.drain() {
                    bridge.release(old);
                }
                // Layers without geometry are skipped rather than pushed
                // through the bridge as zero-length uploads.
                chunk.meshes.solid = if data.solid.is_empty() {
                    None
                } else {
                    bridge.upload(&data.solid)
                };
                chunk.meshes.water = if data.water.is_empty() {
                    None
                } else {
                    bridge.upload(&data.water)
                };
                chunk.meshes.flora = if data.flora.is_empty() {
                    None
                } else {
                    bridge.upload(&data.flora)
                };
                chunk.mesh_state = MeshState::Clean;
            }
        }

        // Deferred deletion. Survivors notice the missing neighbor at the
        // next relink pass and re-dirty their seams.
        for key in std::mem::take(&mut self.chunks_to_delete) {
            if let Some(mut chunk) = self.chunks.remove(&key) {
                for handle in chunk.meshes.drain() {
                    bridge.release(handle);
                }
                debug!(x = key.0, z = key.1, "erased chunk");
            }
            self.sorted_chunk_indices.retain(|k| *k != key);
            self.sort_dirty = true;
        }
    }

    /// Submits the frame's draws: solid meshes nearest-first, water and
    /// flora farthest-first so alpha blending composes correctly. The
    /// distance ordering is only rebuilt when the loaded set changed.
    pub fn render(&mut self, bridge: &mut dyn RenderBridge, camera: &Camera) {
        if self.sort_dirty {
            let size = self.config.chunk_size as f32;
            let cam = (camera.position.x, camera.position.z);
            self.sorted_chunk_indices.sort_by(|a, b| {
                distance_squared(*a, size, cam).total_cmp(&distance_squared(*b, size, cam))
            });
            self.sort_dirty = false;
        }

        for &(x, z) in &self.sorted_chunk_indices {
            let Some(chunk) = self.chunks.get(&(x, z)) else {
                continue;
            };
            if let Some(handle) = chunk.meshes.solid {
                bridge.draw(MeshLayer::Solid, handle, self.chunk_offset(x, z));
            }
        }

        for &(x, z) in self.sorted_chunk_indices.iter().rev() {
            let Some(chunk) = self.chunks.get(&(x, z)) else {
                continue;
            };
            let offset = self.chunk_offset(x, z);
            if let Some(handle) = chunk.meshes.water {
                bridge.draw(MeshLayer::Water, handle, offset);
            }
            if let Some(handle) = chunk.meshes.flora {
                bridge.draw(MeshLayer::Flora, handle, offset);
            }
        }
    }

    /// Unconditional teardown, used at shutdown. A later `update_state`
    /// starts streaming from scratch.
    pub fn delete_all(&mut self, bridge: &mut dyn RenderBridge) {
        for (_, mut chunk) in self.chunks.drain() {
            for handle in chunk.meshes.drain() {
                bridge.release(handle);
            }
        }
        self.sorted_chunk_indices.clear();
        self.chunk_queue.clear();
        self.queued.clear();
        self.chunks_to_delete.clear();
        self.last_chunk = None;
        self.sort_dirty = false;
    }

    /// The four-adjacent view for a coordinate; a slot is `Some` exactly
    /// when the map holds a live chunk there.
    pub fn neighbors_of(&self, key: (i32, i32)) -> ChunkNeighbors<'_> {
        let (x, z) = key;
        ChunkNeighbors {
            left: self.chunks.get(&(x - 1, z)),
            right: self.chunks.get(&(x + 1, z)),
            front: self.chunks.get(&(x, z + 1)),
            back: self.chunks.get(&(x, z - 1)),
        }
    }

    pub fn get_block(&self, x: i32, y: i32, z: i32) -> BlockType {
        if y < 0 || y >= self.config.chunk_height {
            return BlockType::Air;
        }
        let size = self.config.chunk_size;
        match self.chunks.get(&(x.div_euclid(size), z.div_euclid(size))) {
            Some(chunk) => chunk.get_block(x.rem_euclid(size), y, z.rem_euclid(size)),
            None => BlockType::Air,
        }
    }

    /// World-space edit. An edit on a chunk edge also re-dirties the
    /// adjacent chunk so the shared seam remeshes with the new occlusion.
    pub fn set_block(&mut self, x: i32, y: i32, z: i32, block: BlockType) {
        if y < 0 || y >= self.config.chunk_height {
            warn!(x, y, z, "tried to set block outside world height");
            return;
        }
        let size = self.config.chunk_size;
        let key = (x.div_euclid(size), z.div_euclid(size));
        let (lx, lz) = (x.rem_euclid(size), z.rem_euclid(size));
        let Some(chunk) = self.chunks.get_mut(&key) else {
            return;
        };
        chunk.set_block(lx, y, lz, block);

        let chunks = &mut self.chunks;
        let mut touch = |key: (i32, i32)| {
            if let Some(neighbor) = chunks.get_mut(&key) {
                neighbor.mesh_state = MeshState::Dirty;
            }
        };
        if lx == 0 {
            touch((key.0 - 1, key.1));
        }
        if lx == size - 1 {
            touch((key.0 + 1, key.1));
        }
        if lz == 0 {
            touch((key.0, key.1 - 1));
        }
        if lz == size - 1 {
            touch((key.0, key.1 + 1));
        }
    }

    fn chunk_offset(&self, x: i32, z: i32) -> [f32; 3] {
        [
            (x * self.config.chunk_size) as f32,
            0.0,
            (z * self.config.chunk_size) as f32,
        ]
    }
}

fn distance_squared(key: (i32, i32), chunk_size: f32, cam: (f32, f32)) -> f32 {
    let cx = (key.0 as f32 + 0.5) * chunk_size;
    let cz = (key.1 as f32 + 0.5) * chunk_size;
    let dx = cx - cam.0;
    let dz = cz - cam.1;
    dx * dx + dz * dz
}
