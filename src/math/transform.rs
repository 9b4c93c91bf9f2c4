//! Matrix builders for model, view and projection transforms.

use cgmath::{InnerSpace, Matrix4, SquareMatrix, Vector3};

use super::Quaternion;

/// Two vectors whose normalized dot product is within this of ±1 are treated
/// as parallel.
const PARALLEL_EPSILON: f32 = 1e-6;

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

pub fn translate(x: f32, y: f32, z: f32) -> Matrix4<f32> {
    Matrix4::from_translation(Vector3::new(x, y, z))
}

pub fn scale(x: f32, y: f32, z: f32) -> Matrix4<f32> {
    Matrix4::from_nonuniform_scale(x, y, z)
}

/// Rotation of `angle` degrees about `axis`, derived from a quaternion.
///
/// Returns the identity when the quaternion built from the inputs has a
/// numerically zero norm.
pub fn rotate(angle: f32, axis: Vector3<f32>) -> Matrix4<f32> {
    let q = Quaternion::from_axis_angle(axis, angle);
    if q.norm() < 1e-6 {
        return Matrix4::identity();
    }
    q.normalize().to_matrix()
}

/// Perspective projection in the OpenGL clip convention.
///
/// # Arguments
/// * `fov` - Vertical field of view in degrees
/// * `width`, `height` - Viewport size, giving the aspect ratio
/// * `znear` - Near plane; zero is replaced by 0.001
/// * `zfar` - Far plane
pub fn perspective(fov: f32, width: f32, height: f32, znear: f32, zfar: f32) -> Matrix4<f32> {
    let znear = if znear == 0.0 { 0.001 } else { znear };
    let half = fov.to_radians() * 0.5;
    let h = half.cos() / half.sin();
    let w = h * height / width;

    let mut m = Matrix4::from_value(0.0);
    m[0][0] = w;
    m[1][1] = h;
    m[2][2] = -(zfar + znear) / (zfar - znear);
    m[3][2] = -(2.0 * zfar * znear) / (zfar - znear);
    m[2][3] = -1.0;
    m
}

/// Builds look-at view matrices that stay stable when the viewing direction
/// lines up with the requested up vector.
///
/// The last up axis that produced a valid basis is remembered and substituted
/// on degenerate frames, so orbiting through a pole does not flip the camera.
#[derive(Debug, Clone)]
pub struct ViewMatrixBuilder {
    last_up_axis: Vector3<f32>,
}

impl Default for ViewMatrixBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewMatrixBuilder {
    pub fn new() -> Self {
        Self {
            last_up_axis: Vector3::unit_y(),
        }
    }

    pub fn last_up_axis(&self) -> Vector3<f32> {
        self.last_up_axis
    }

    pub fn view(
        &mut self,
        eye: Vector3<f32>,
        look_at: Vector3<f32>,
        up: Vector3<f32>,
    ) -> Matrix4<f32> {
        let offset = eye - look_at;
        let viewing_dir = if offset.magnitude2() > 0.0 {
            offset.normalize()
        } else {
            Vector3::unit_z()
        };

        let candidates = [up, self.last_up_axis, Vector3::unit_x(), Vector3::unit_z()];
        let (up, dot) = candidates
            .into_iter()
            .filter(|c| c.magnitude2() > 0.0)
            .map(|c| {
                let c = c.normalize();
                (c, viewing_dir.dot(c))
            })
            .find(|(_, dot)| 1.0 - dot.abs() >= PARALLEL_EPSILON)
            .unwrap_or((Vector3::unit_x(), viewing_dir.x));

        let up_axis = (up - viewing_dir * dot).normalize();
        self.last_up_axis = up_axis;
        let x_axis = up_axis.cross(viewing_dir).normalize();

        #[rustfmt::skip]
        let basis = Matrix4::new(
            x_axis.x, up_axis.x, viewing_dir.x, 0.0,
            x_axis.y, up_axis.y, viewing_dir.y, 0.0,
            x_axis.z, up_axis.z, viewing_dir.z, 0.0,
            0.0,      0.0,       0.0,           1.0,
        );
        basis * Matrix4::from_translation(-eye)
    }
}
