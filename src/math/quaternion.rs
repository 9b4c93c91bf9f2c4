use std::ops::Mul;

use cgmath::{InnerSpace, Matrix4, Vector3, Zero};

/// Below this norm a quaternion is left alone by [`Quaternion::normalize`].
const NORM_EPSILON: f32 = 1e-6;

/// Quaternion `s + v.x i + v.y j + v.z k`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quaternion {
    pub s: f32,
    pub v: Vector3<f32>,
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::identity()
    }
}

impl Quaternion {
    pub fn new(s: f32, v0: f32, v1: f32, v2: f32) -> Self {
        Self {
            s,
            v: Vector3::new(v0, v1, v2),
        }
    }

    pub fn identity() -> Self {
        Self {
            s: 1.0,
            v: Vector3::zero(),
        }
    }

    /// Rotation of `degrees` about `axis`, built from half-angles.
    ///
    /// The axis is used as given; the result is unit length only when the
    /// axis is.
    pub fn from_axis_angle(axis: Vector3<f32>, degrees: f32) -> Self {
        let half = degrees.to_radians() * 0.5;
        Self {
            s: half.cos(),
            v: axis * half.sin(),
        }
    }

    pub fn norm(&self) -> f32 {
        (self.s * self.s + self.v.magnitude2()).sqrt()
    }

    /// Scales to unit length unless the norm is numerically zero.
    pub fn normalize(self) -> Self {
        let mag = self.norm();
        if mag <= NORM_EPSILON {
            return self;
        }
        Self {
            s: self.s / mag,
            v: self.v / mag,
        }
    }

    pub fn conjugate(self) -> Self {
        Self {
            s: self.s,
            v: -self.v,
        }
    }

    /// Homogeneous rotation matrix acting on column vectors.
    pub fn to_matrix(&self) -> Matrix4<f32> {
        let (s, a, b, c) = (self.s, self.v.x, self.v.y, self.v.z);
        #[rustfmt::skip]
        let m = Matrix4::new(
            1.0 - 2.0 * b * b - 2.0 * c * c, 2.0 * a * b + 2.0 * s * c,       2.0 * a * c - 2.0 * s * b,       0.0,
            2.0 * a * b - 2.0 * s * c,       1.0 - 2.0 * a * a - 2.0 * c * c, 2.0 * b * c + 2.0 * s * a,       0.0,
            2.0 * a * c + 2.0 * s * b,       2.0 * b * c - 2.0 * s * a,       1.0 - 2.0 * a * a - 2.0 * b * b, 0.0,
            0.0,                             0.0,                             0.0,                             1.0,
        );
        m
    }
}

/// Hamilton product. `(p * q)` applies `q` first when used as a rotation.
impl Mul for Quaternion {
    type Output = Quaternion;

    fn mul(self, q: Quaternion) -> Quaternion {
        Quaternion {
            s: self.s * q.s - self.v.dot(q.v),
            v: q.v * self.s + self.v * q.s + self.v.cross(q.v),
        }
    }
}
