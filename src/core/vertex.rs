use bytemuck::{Pod, Zeroable};

/// Axis-aligned face directions, in mesh-emission order. The discriminant is
/// what ends up in the vertex stream.
#[repr(u8)]
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Face {
    Back = 0,
    Front = 1,
    Left = 2,
    Right = 3,
    Bottom = 4,
    Top = 5,
}

impl Face {
    pub const ALL: [Face; 6] = [
        Face::Back,
        Face::Front,
        Face::Left,
        Face::Right,
        Face::Bottom,
        Face::Top,
    ];

    /// Unit offset toward the neighbor this face looks at.
    pub fn offset(self) -> [i32; 3] {
        match self {
            Face::Back => [0, 0, -1],
            Face::Front => [0, 0, 1],
            Face::Left => [-1, 0, 0],
            Face::Right => [1, 0, 0],
            Face::Bottom => [0, -1, 0],
            Face::Top => [0, 1, 0],
        }
    }

    /// Index of the face pair (0 = z, 1 = x, 2 = y), used to pick the
    /// in-plane AO probe directions.
    pub fn pair_index(self) -> usize {
        self as usize / 2
    }

    /// Which component of a block's texture-ID vector this face samples.
    pub fn texture_axis(self) -> usize {
        match self {
            Face::Left | Face::Right => 0,
            Face::Bottom | Face::Top => 1,
            Face::Back | Face::Front => 2,
        }
    }
}

/// One mesh vertex, packed to 12 bytes. Positions are chunk-local corner
/// coordinates; y can reach the full column height, hence u16. The second
/// attribute word carries the texture corner selector (bit 1 = u, bit 0 = v),
/// the AO level (0 occluded .. 3 lit) and the atlas layer.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [u16; 3],
    pub face: u16,
    pub uv: u8,
    pub ao: u8,
    pub atlas_index: u8,
    pub _pad: u8,
}

impl Vertex {
    const ATTRIBS: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Uint16x4, 1 => Uint8x4];

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_is_twelve_bytes() {
        assert_eq!(std::mem::size_of::<Vertex>(), 12);
    }

    #[test]
    fn face_offsets_are_unit_axis_vectors() {
        for face in Face::ALL {
            let offset = face.offset();
            let magnitude: i32 = offset.iter().map(|c| c.abs()).sum();
            assert_eq!(magnitude, 1);
            // The texture axis is the axis the face points along.
            assert_ne!(offset[face.texture_axis()], 0);
        }
    }

    #[test]
    fn pair_index_groups_opposite_faces() {
        assert_eq!(Face::Back.pair_index(), Face::Front.pair_index());
        assert_eq!(Face::Left.pair_index(), Face::Right.pair_index());
        assert_eq!(Face::Bottom.pair_index(), Face::Top.pair_index());
    }
}
