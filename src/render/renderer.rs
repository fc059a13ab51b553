use std::collections::HashMap;

use tracing::warn;
use wgpu::util::DeviceExt;

use crate::core::vertex::Vertex;
use crate::render::bridge::{MeshHandle, MeshLayer, RenderBridge};

pub struct GpuMesh {
    pub buffer: wgpu::Buffer,
    pub vertex_count: u32,
}

/// One recorded draw for the current frame.
pub struct DrawCmd {
    pub layer: MeshLayer,
    pub handle: MeshHandle,
    pub offset: [f32; 3],
}

/// wgpu-backed [`RenderBridge`]. Owns every chunk mesh buffer behind an
/// opaque handle and records draw submissions for playback inside the
/// frame's render pass (draws arrive while no pass is open, so they are
/// buffered rather than encoded directly).
pub struct ChunkRenderer {
    device: wgpu::Device,
    meshes: HashMap<MeshHandle, GpuMesh>,
    next_handle: u32,
    commands: Vec<DrawCmd>,
}

impl ChunkRenderer {
    const INSTANCE_ATTRIBS: [wgpu::VertexAttribute; 1] =
        wgpu::vertex_attr_array![2 => Float32x3];

    pub fn new(device: wgpu::Device) -> Self {
        ChunkRenderer {
            device,
            meshes: HashMap::new(),
            next_handle: 0,
            commands: Vec::new(),
        }
    }

    /// Vertex-buffer layout for the per-draw chunk offset (slot 1).
    pub fn instance_desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::INSTANCE_ATTRIBS,
        }
    }

    pub fn mesh(&self, handle: MeshHandle) -> Option<&GpuMesh> {
        self.meshes.get(&handle)
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    /// Drains the draws recorded since the last call, in submission order.
    pub fn take_commands(&mut self) -> Vec<DrawCmd> {
        std::mem::take(&mut self.commands)
    }

    /// Packs the recorded draw offsets into a fresh instance buffer, one
    /// `[f32; 3]` slot per command, in command order.
    pub fn build_instance_buffer(&self, commands: &[DrawCmd]) -> Option<wgpu::Buffer> {
        if commands.is_empty() {
            return None;
        }
        let offsets: Vec<[f32; 3]> = commands.iter().map(|cmd| cmd.offset).collect();
        Some(
            self.device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("chunk instance offsets"),
                    contents: bytemuck::cast_slice(&offsets),
                    usage: wgpu::BufferUsages::VERTEX,
                }),
        )
    }
}

impl RenderBridge for ChunkRenderer {
    fn upload(&mut self, vertices: &[Vertex]) -> Option<MeshHandle> {
        if vertices.is_empty() {
            warn!("skipping upload of an empty vertex list");
            return None;
        }
        let buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("chunk mesh"),
                contents: bytemuck::cast_slice(vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
        let handle = MeshHandle::from_raw(self.next_handle);
        self.next_handle += 1;
        self.meshes.insert(
            handle,
            GpuMesh {
                buffer,
                vertex_count: vertices.len() as u32,
            },
        );
        Some(handle)
    }

    fn release(&mut self, handle: MeshHandle) {
        if let Some(mesh) = self.meshes.remove(&handle) {
            mesh.buffer.destroy();
        }
    }

    fn draw(&mut self, layer: MeshLayer, handle: MeshHandle, offset: [f32; 3]) {
        if !self.meshes.contains_key(&handle) {
            warn!(handle = handle.raw(), "draw submitted for unknown mesh");
            return;
        }
        self.commands.push(DrawCmd {
            layer,
            handle,
            offset,
        });
    }
}
