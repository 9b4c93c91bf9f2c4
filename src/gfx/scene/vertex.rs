//! # Vertex Data Structures
//!
//! GPU vertex format shared by every procedural mesh.

/// A 3D vertex carrying everything the scene shader can shade with.
///
/// # Memory Layout
///
/// `#[repr(C)]`, 17 tightly packed floats:
///
/// - location 0: `position` [x, y, z]
/// - location 1: `normal` [nx, ny, nz]
/// - location 2: `color` RGB vertex color
/// - location 3: `tex_coords` [u, v]
/// - location 4: `tangent`, along increasing `u`
/// - location 5: `bitangent`, along increasing `v`
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex3D {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 3],
    pub tex_coords: [f32; 2],
    pub tangent: [f32; 3],
    pub bitangent: [f32; 3],
}

impl Vertex3D {
    const ATTRIBUTES: [wgpu::VertexAttribute; 6] = wgpu::vertex_attr_array![
        0 => Float32x3,
        1 => Float32x3,
        2 => Float32x3,
        3 => Float32x2,
        4 => Float32x3,
        5 => Float32x3,
    ];

    /// Returns the vertex buffer layout for wgpu rendering.
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex3D>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_matches_struct() {
        let desc = Vertex3D::desc();
        assert_eq!(desc.array_stride, 17 * 4);
        assert_eq!(desc.attributes.len(), 6);
        assert_eq!(desc.attributes[3].offset, 9 * 4);
        assert_eq!(desc.attributes[5].offset, 14 * 4);
    }
}
