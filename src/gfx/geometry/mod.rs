//! # Procedural Geometry Generation
//!
//! Generates the primitive meshes the demo scenes are built from, so no
//! model files are needed.
//!
//! ## Supported Primitives
//!
//! - **Cube**: box with independent length (x), width (y) and height (z)
//! - **Sphere**, **Ellipsoid**: latitude/longitude grids around the z axis
//! - **Torus**: tube swept around the z axis
//! - **Cylinder**: capped tube along the z axis
//!
//! Every vertex carries position, normal, color, UV and a tangent frame for
//! normal mapping.
//!
//! ## Usage
//!
//! ```rust
//! use lantern::gfx::geometry::{generate_sphere, generate_torus};
//! use lantern::math::ColorType;
//!
//! let sphere = generate_sphere(1.0, 36, 36, ColorType::BLUE);
//! let ring = generate_torus(0.1, 0.6, 24, 48, ColorType::SOFTBLUE);
//! assert!(sphere.triangle_count() > 0 && ring.triangle_count() > 0);
//! ```

pub mod primitives;

pub use primitives::*;

use cgmath::{InnerSpace, Vector3};

use crate::gfx::scene::vertex::Vertex3D;
use crate::math::ColorType;

/// Generated geometry data ready for GPU upload
///
/// All per-vertex vectors have the same length.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub colors: Vec<[f32; 3]>,
    pub tex_coords: Vec<[f32; 2]>,
    pub tangents: Vec<[f32; 3]>,
    pub bitangents: Vec<[f32; 3]>,
    /// Triangle indices
    pub indices: Vec<u32>,
}

/// One evaluated point of a parametric surface.
pub(crate) struct SurfacePoint {
    pub position: Vector3<f32>,
    pub normal: Vector3<f32>,
    /// Partial derivative along the slice parameter.
    pub tangent: Vector3<f32>,
    /// Partial derivative along the stack parameter.
    pub bitangent: Vector3<f32>,
}

impl MeshData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Appends one vertex and returns its index.
    pub fn push_vertex(&mut self, vertex: Vertex3D) -> u32 {
        let index = self.positions.len() as u32;
        self.positions.push(vertex.position);
        self.normals.push(vertex.normal);
        self.colors.push(vertex.color);
        self.tex_coords.push(vertex.tex_coords);
        self.tangents.push(vertex.tangent);
        self.bitangents.push(vertex.bitangent);
        index
    }

    /// Interleaves the attribute arrays into the GPU vertex format.
    pub fn to_vertices(&self) -> Vec<Vertex3D> {
        (0..self.positions.len())
            .map(|i| Vertex3D {
                position: self.positions[i],
                normal: self.normals[i],
                color: self.colors[i],
                tex_coords: self.tex_coords[i],
                tangent: self.tangents[i],
                bitangent: self.bitangents[i],
            })
            .collect()
    }

    /// Appends a `stacks x slices` grid sampled from a parametric surface.
    ///
    /// `surface` receives `(s, t)` in `[0, 1]`, `s` running over stacks and
    /// `t` over slices; the texture coordinate is `(t, s)`. Slices always wrap
    /// around; stacks wrap only when `closed_stacks` is set.
    pub(crate) fn parametric_grid(
        &mut self,
        stacks: u32,
        slices: u32,
        closed_stacks: bool,
        color: ColorType,
        surface: impl Fn(f32, f32) -> SurfacePoint,
    ) {
        let base = self.positions.len() as u32;
        for stack in 0..stacks {
            let s = stack as f32 / (stacks - 1) as f32;
            for slice in 0..slices {
                let t = slice as f32 / (slices - 1) as f32;
                let p = surface(s, t);
                let normal = safe_normalize(p.normal, Vector3::unit_z());
                let tangent = safe_normalize(p.tangent, normal.cross(Vector3::unit_x()));
                let bitangent = safe_normalize(p.bitangent, normal.cross(tangent));
                self.push_vertex(Vertex3D {
                    position: p.position.into(),
                    normal: normal.into(),
                    color: color.to_array(),
                    tex_coords: [t, s],
                    tangent: tangent.into(),
                    bitangent: bitangent.into(),
                });
            }
        }

        let stack_quads = if closed_stacks { stacks } else { stacks - 1 };
        for stack in 0..stack_quads {
            let next_stack = (stack + 1) % stacks;
            for slice in 0..slices {
                let next_slice = (slice + 1) % slices;
                let a = base + stack * slices + slice;
                let b = base + next_stack * slices + slice;
                let c = base + stack * slices + next_slice;
                let d = base + next_stack * slices + next_slice;
                self.indices.extend_from_slice(&[a, b, c, c, b, d]);
            }
        }
    }
}

/// Normalizes `v`, or returns the normalized fallback for near-zero input.
fn safe_normalize(v: Vector3<f32>, fallback: Vector3<f32>) -> Vector3<f32> {
    if v.magnitude2() > 1e-12 {
        v.normalize()
    } else if fallback.magnitude2() > 1e-12 {
        fallback.normalize()
    } else {
        Vector3::unit_y()
    }
}
