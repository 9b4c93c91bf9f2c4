//! # Primitive Shape Generation
//!
//! All shapes are centered at the origin. Curved surfaces are parameterized
//! around the z axis.

use cgmath::{ElementWise, InnerSpace, Vector3, Zero};
use std::f32::consts::PI;

use super::{MeshData, SurfacePoint};
use crate::gfx::scene::vertex::Vertex3D;
use crate::math::ColorType;

/// Generate a box with its edges along the coordinate axes
///
/// # Arguments
/// * `length` - Extent along x
/// * `width` - Extent along y
/// * `height` - Extent along z
/// * `color` - Vertex color
pub fn generate_cube(length: f32, width: f32, height: f32, color: ColorType) -> MeshData {
    let mut data = MeshData::new();
    let half = Vector3::new(length, width, height) * 0.5;
    let (x, y, z) = (Vector3::unit_x(), Vector3::unit_y(), Vector3::unit_z());

    // (normal, tangent, bitangent) with tangent x bitangent == normal
    let faces = [
        (z, x, y),
        (-z, -x, y),
        (x, -z, y),
        (-x, z, y),
        (y, x, -z),
        (-y, x, z),
    ];

    for (normal, tangent, bitangent) in faces {
        let mut corners = [0u32; 4];
        for (i, (su, sv)) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)]
            .into_iter()
            .enumerate()
        {
            let position = (normal + tangent * su + bitangent * sv).mul_element_wise(half);
            corners[i] = data.push_vertex(Vertex3D {
                position: position.into(),
                normal: normal.into(),
                color: color.to_array(),
                tex_coords: [(su + 1.0) * 0.5, (sv + 1.0) * 0.5],
                tangent: tangent.into(),
                bitangent: bitangent.into(),
            });
        }
        let [a, b, c, d] = corners;
        data.indices.extend_from_slice(&[a, b, c, a, c, d]);
    }

    data
}

/// Generate a UV sphere
///
/// `stacks` run from the south pole to the north pole, `slices` around z.
pub fn generate_sphere(radius: f32, stacks: u32, slices: u32, color: ColorType) -> MeshData {
    generate_ellipsoid(radius, radius, radius, stacks, slices, color)
}

/// Generate an ellipsoid with radii `a`, `b`, `c` along x, y, z
pub fn generate_ellipsoid(
    a: f32,
    b: f32,
    c: f32,
    stacks: u32,
    slices: u32,
    color: ColorType,
) -> MeshData {
    let mut data = MeshData::new();
    data.parametric_grid(stacks.max(3), slices.max(3), false, color, |s, t| {
        let phi = -PI / 2.0 + s * PI;
        let theta = -PI + t * 2.0 * PI;
        let (sin_phi, cos_phi) = phi.sin_cos();
        let (sin_theta, cos_theta) = theta.sin_cos();
        let position = Vector3::new(
            a * cos_phi * cos_theta,
            b * cos_phi * sin_theta,
            c * sin_phi,
        );
        SurfacePoint {
            position,
            normal: Vector3::new(
                position.x / (a * a),
                position.y / (b * b),
                position.z / (c * c),
            ),
            tangent: Vector3::new(-a * cos_phi * sin_theta, b * cos_phi * cos_theta, 0.0),
            bitangent: Vector3::new(
                -a * sin_phi * cos_theta,
                -b * sin_phi * sin_theta,
                c * cos_phi,
            ),
        }
    });
    data
}

/// Generate a torus lying in the xy plane
///
/// # Arguments
/// * `inner_radius` - Radius of the tube
/// * `outer_radius` - Distance from the center to the middle of the tube
/// * `sides` - Segments around the tube
/// * `rings` - Segments around the z axis
pub fn generate_torus(
    inner_radius: f32,
    outer_radius: f32,
    sides: u32,
    rings: u32,
    color: ColorType,
) -> MeshData {
    let (r, big_r) = (inner_radius, outer_radius);
    let mut data = MeshData::new();
    data.parametric_grid(rings.max(3), sides.max(3), true, color, |s, t| {
        let theta = -PI + s * 2.0 * PI;
        let phi = -PI + t * 2.0 * PI;
        let (sin_theta, cos_theta) = theta.sin_cos();
        let (sin_phi, cos_phi) = phi.sin_cos();
        let ring = big_r + r * cos_phi;
        SurfacePoint {
            position: Vector3::new(ring * cos_theta, ring * sin_theta, r * sin_phi),
            normal: Vector3::new(cos_phi * cos_theta, cos_phi * sin_theta, sin_phi),
            tangent: Vector3::new(-r * sin_phi * cos_theta, -r * sin_phi * sin_theta, r * cos_phi),
            bitangent: Vector3::new(-ring * sin_theta, ring * cos_theta, 0.0),
        }
    });
    data
}

/// Generate a capped cylinder along z, centered at the origin
pub fn generate_cylinder(
    radius: f32,
    height: f32,
    stacks: u32,
    slices: u32,
    color: ColorType,
) -> MeshData {
    let slices = slices.max(3);
    let mut data = MeshData::new();
    data.parametric_grid(stacks.max(2), slices, false, color, |s, t| {
        let theta = -PI + t * 2.0 * PI;
        let (sin_theta, cos_theta) = theta.sin_cos();
        SurfacePoint {
            position: Vector3::new(radius * cos_theta, radius * sin_theta, -height / 2.0 + s * height),
            normal: Vector3::new(cos_theta, sin_theta, 0.0),
            tangent: Vector3::new(-sin_theta, cos_theta, 0.0),
            bitangent: Vector3::unit_z(),
        }
    });

    for side in [-1.0f32, 1.0] {
        let normal = Vector3::new(0.0, 0.0, side);
        let cap_vertex = |position: Vector3<f32>, uv: [f32; 2]| Vertex3D {
            position: position.into(),
            normal: normal.into(),
            color: color.to_array(),
            tex_coords: uv,
            tangent: [1.0, 0.0, 0.0],
            bitangent: [0.0, side, 0.0],
        };
        let center = data.push_vertex(cap_vertex(
            Vector3::new(0.0, 0.0, side * height / 2.0),
            [0.5, 0.5],
        ));
        let first = center + 1;
        for slice in 0..slices {
            let theta = slice as f32 / slices as f32 * 2.0 * PI;
            let (sin_theta, cos_theta) = theta.sin_cos();
            data.push_vertex(cap_vertex(
                Vector3::new(radius * cos_theta, radius * sin_theta, side * height / 2.0),
                [0.5 + 0.5 * cos_theta, 0.5 + 0.5 * sin_theta],
            ));
        }
        for slice in 0..slices {
            let a = first + slice;
            let b = first + (slice + 1) % slices;
            if side > 0.0 {
                data.indices.extend_from_slice(&[center, a, b]);
            } else {
                data.indices.extend_from_slice(&[center, b, a]);
            }
        }
    }

    data
}

/// Axis-aligned bounds of a mesh, `(min, max)`.
pub fn bounds(data: &MeshData) -> (Vector3<f32>, Vector3<f32>) {
    let mut points = data.positions.iter().map(|p| Vector3::from(*p));
    let Some(first) = points.next() else {
        return (Vector3::zero(), Vector3::zero());
    };
    points.fold((first, first), |(lo, hi), p| {
        (
            Vector3::new(lo.x.min(p.x), lo.y.min(p.y), lo.z.min(p.z)),
            Vector3::new(hi.x.max(p.x), hi.y.max(p.y), hi.z.max(p.z)),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_indices_valid(data: &MeshData) {
        let n = data.vertex_count() as u32;
        assert!(data.indices.iter().all(|i| *i < n));
        assert_eq!(data.indices.len() % 3, 0);
        assert_eq!(data.normals.len(), data.positions.len());
        assert_eq!(data.tangents.len(), data.positions.len());
    }

    #[test]
    fn test_cube_extents_and_faces() {
        let cube = generate_cube(2.0, 1.0, 0.5, ColorType::RED);
        assert_eq!(cube.vertex_count(), 24);
        assert_eq!(cube.triangle_count(), 12);
        assert_indices_valid(&cube);

        let (lo, hi) = bounds(&cube);
        assert_eq!(lo, Vector3::new(-1.0, -0.5, -0.25));
        assert_eq!(hi, Vector3::new(1.0, 0.5, 0.25));
    }

    #[test]
    fn test_cube_winding_faces_outward() {
        let cube = generate_cube(1.0, 1.0, 1.0, ColorType::RED);
        for tri in cube.indices.chunks(3) {
            let p = |i: u32| Vector3::from(cube.positions[i as usize]);
            let face = (p(tri[1]) - p(tri[0])).cross(p(tri[2]) - p(tri[0]));
            let normal = Vector3::from(cube.normals[tri[0] as usize]);
            assert!(face.dot(normal) > 0.0);
        }
    }

    #[test]
    fn test_sphere_points_lie_on_radius() {
        let sphere = generate_sphere(1.5, 12, 16, ColorType::BLUE);
        assert_indices_valid(&sphere);
        for (p, n) in sphere.positions.iter().zip(&sphere.normals) {
            let p = Vector3::from(*p);
            assert!((p.magnitude() - 1.5).abs() < 1e-4);
            assert!((Vector3::from(*n).magnitude() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_sphere_tangent_frame_is_perpendicular_to_normal() {
        let sphere = generate_sphere(1.0, 10, 10, ColorType::BLUE);
        for i in 0..sphere.vertex_count() {
            let n = Vector3::from(sphere.normals[i]);
            let t = Vector3::from(sphere.tangents[i]);
            let b = Vector3::from(sphere.bitangents[i]);
            assert!(n.dot(t).abs() < 1e-4);
            assert!(n.dot(b).abs() < 1e-4);
        }
    }

    #[test]
    fn test_ellipsoid_bounds() {
        let e = generate_ellipsoid(0.6, 0.8, 1.0, 31, 33, ColorType::PINK);
        let (lo, hi) = bounds(&e);
        assert!((hi.x - 0.6).abs() < 1e-3 && (lo.x + 0.6).abs() < 1e-3);
        assert!((hi.z - 1.0).abs() < 1e-5 && (lo.z + 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_torus_normals_point_away_from_tube_center() {
        let torus = generate_torus(0.25, 0.5, 12, 18, ColorType::SOFTBLUE);
        assert_indices_valid(&torus);
        // Closed in both directions: every grid quad emits two triangles.
        assert_eq!(torus.triangle_count(), 12 * 18 * 2);
        for (p, n) in torus.positions.iter().zip(&torus.normals) {
            let p = Vector3::from(*p);
            let ring = Vector3::new(p.x, p.y, 0.0).normalize() * 0.5;
            let offset = p - ring;
            assert!((offset.magnitude() - 0.25).abs() < 1e-4);
            assert!(offset.normalize().dot(Vector3::from(*n)) > 0.999);
        }
    }

    #[test]
    fn test_cylinder_caps() {
        let cyl = generate_cylinder(0.5, 2.0, 4, 16, ColorType::PINK);
        assert_indices_valid(&cyl);
        let (lo, hi) = bounds(&cyl);
        assert!((lo.z + 1.0).abs() < 1e-6 && (hi.z - 1.0).abs() < 1e-6);
        let caps = cyl
            .normals
            .iter()
            .filter(|n| n[2].abs() == 1.0)
            .count();
        assert_eq!(caps, 2 * (16 + 1));
    }
}
