use std::f32::consts::{FRAC_PI_2, PI, TAU};

use cgmath::{InnerSpace, Matrix4, SquareMatrix, Vector3, Vector4, Zero};

use crate::math::{perspective, ViewMatrixBuilder};

/// Closest the camera may get to its look-at point.
pub const MIN_DISTANCE: f32 = 0.01;

/// Camera orbiting a look-at point on a sphere.
///
/// `theta` is the azimuth in the xz plane, wrapped to `[0, 2π)`; `phi` is the
/// elevation, clamped to `[-π/2, π/2]`. The eye sits at
/// `look_at + distance * (cos θ cos φ, sin φ, sin θ cos φ)`.
///
/// View and projection are recomputed on every mutation, so
/// [`unproject`](Self::unproject) always reflects the current state.
#[derive(Debug, Clone)]
pub struct SphericalCamera {
    distance: f32,
    theta: f32,
    phi: f32,
    look_at: Vector3<f32>,
    up: Vector3<f32>,
    fov: f32,
    width: f32,
    height: f32,
    znear: f32,
    zfar: f32,
    view_builder: ViewMatrixBuilder,
    view: Matrix4<f32>,
    projection: Matrix4<f32>,
}

impl SphericalCamera {
    /// # Arguments
    /// * `width`, `height` - Canvas size in pixels
    /// * `fov` - Vertical field of view in degrees
    /// * `znear`, `zfar` - Clip planes
    pub fn new(width: u32, height: u32, fov: f32, znear: f32, zfar: f32) -> Self {
        let mut camera = Self {
            distance: 6.0,
            theta: FRAC_PI_2,
            phi: PI / 6.0,
            look_at: Vector3::zero(),
            up: Vector3::unit_y(),
            fov,
            width: width.max(1) as f32,
            height: height.max(1) as f32,
            znear,
            zfar,
            view_builder: ViewMatrixBuilder::new(),
            view: Matrix4::identity(),
            projection: Matrix4::identity(),
        };
        camera.refresh();
        camera
    }

    /// Back to the starting pose: origin target, +Y up, distance 6, φ = π/6,
    /// θ = π/2.
    pub fn reset_view(&mut self) {
        self.look_at = Vector3::zero();
        self.up = Vector3::unit_y();
        self.distance = 6.0;
        self.phi = PI / 6.0;
        self.theta = FRAC_PI_2;
        self.refresh();
    }

    fn refresh(&mut self) {
        self.view = self.view_builder.view(self.eye(), self.look_at, self.up);
        self.projection = perspective(self.fov, self.width, self.height, self.znear, self.zfar);
    }

    pub fn eye(&self) -> Vector3<f32> {
        let (sin_theta, cos_theta) = self.theta.sin_cos();
        let (sin_phi, cos_phi) = self.phi.sin_cos();
        self.look_at
            + Vector3::new(cos_theta * cos_phi, sin_phi, sin_theta * cos_phi) * self.distance
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn theta(&self) -> f32 {
        self.theta
    }

    pub fn phi(&self) -> f32 {
        self.phi
    }

    pub fn look_at(&self) -> Vector3<f32> {
        self.look_at
    }

    pub fn up(&self) -> Vector3<f32> {
        self.up
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    /// Floored at [`MIN_DISTANCE`].
    pub fn set_distance(&mut self, distance: f32) {
        self.distance = distance.max(MIN_DISTANCE);
        self.refresh();
    }

    pub fn set_theta(&mut self, theta: f32) {
        self.theta = theta.rem_euclid(TAU);
        // rem_euclid can round up to exactly TAU for tiny negative inputs
        if self.theta >= TAU {
            self.theta = 0.0;
        }
        self.refresh();
    }

    pub fn set_phi(&mut self, phi: f32) {
        self.phi = phi.clamp(-FRAC_PI_2, FRAC_PI_2);
        self.refresh();
    }

    pub fn set_look_at(&mut self, look_at: Vector3<f32>) {
        self.look_at = look_at;
        self.refresh();
    }

    pub fn set_up(&mut self, up: Vector3<f32>) {
        self.up = up;
        self.refresh();
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width.max(1) as f32;
        self.height = height.max(1) as f32;
        self.refresh();
    }

    pub fn view(&self) -> Matrix4<f32> {
        self.view
    }

    /// Projection in the OpenGL clip convention.
    pub fn projection(&self) -> Matrix4<f32> {
        self.projection
    }

    pub fn view_projection(&self) -> Matrix4<f32> {
        self.projection * self.view
    }

    /// Maps a canvas pixel to world space.
    ///
    /// `x`, `y` use a bottom-left origin. Perspective depth is not linear in
    /// NDC z, so the near-plane and far-plane points are computed separately
    /// and `u` interpolates between them in world space.
    pub fn unproject(&self, x: f32, y: f32, u: f32) -> Vector3<f32> {
        let inverse = match self.view_projection().invert() {
            Some(m) => m,
            None => {
                log::warn!("Camera view-projection is singular, unprojecting to look-at point");
                return self.look_at;
            }
        };
        let ndc_x = 2.0 * x / self.width - 1.0;
        let ndc_y = 2.0 * y / self.height - 1.0;
        let at_depth = |z: f32| {
            let p = inverse * Vector4::new(ndc_x, ndc_y, z, 1.0);
            p.truncate() / p.w
        };
        let near = at_depth(-1.0);
        let far = at_depth(1.0);
        near * (1.0 - u) + far * u
    }

    /// Maps a world point to canvas `(x, y)` and the depth parameter `u`
    /// that [`unproject`](Self::unproject) takes back to the same point.
    pub fn project(&self, world: Vector3<f32>) -> (f32, f32, f32) {
        let clip = self.view_projection() * world.extend(1.0);
        let x = (clip.x / clip.w + 1.0) * 0.5 * self.width;
        let y = (clip.y / clip.w + 1.0) * 0.5 * self.height;
        let near = self.unproject(x, y, 0.0);
        let ray = self.unproject(x, y, 1.0) - near;
        let u = if ray.magnitude2() > 0.0 {
            (world - near).dot(ray) / ray.magnitude2()
        } else {
            0.0
        };
        (x, y, u)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> SphericalCamera {
        SphericalCamera::new(500, 500, 45.0, 0.01, 100.0)
    }

    #[test]
    fn test_default_eye_position() {
        let cam = camera();
        let expected = Vector3::new(0.0, 6.0 * (PI / 6.0).sin(), 6.0 * (PI / 6.0).cos());
        assert!((cam.eye() - expected).magnitude() < 1e-5);
    }

    #[test]
    fn test_theta_wraps_and_phi_clamps() {
        let mut cam = camera();
        cam.set_theta(-0.5);
        assert!((cam.theta() - (TAU - 0.5)).abs() < 1e-5);
        cam.set_theta(7.0);
        assert!((cam.theta() - (7.0 - TAU)).abs() < 1e-5);
        cam.set_phi(3.0);
        assert_eq!(cam.phi(), FRAC_PI_2);
        cam.set_distance(-2.0);
        assert_eq!(cam.distance(), MIN_DISTANCE);
    }

    #[test]
    fn test_canvas_center_unprojects_along_view_axis() {
        let cam = camera();
        let mid = cam.unproject(250.0, 250.0, 0.5);
        let to_target = (cam.look_at() - cam.eye()).normalize();
        let to_mid = (mid - cam.eye()).normalize();
        assert!(to_target.dot(to_mid) > 0.9999);
    }

    #[test]
    fn test_project_unproject_round_trip() {
        // Moderate clip planes keep the far-plane unprojection well conditioned in f32.
        let mut cam = SphericalCamera::new(640, 480, 45.0, 0.5, 20.0);
        cam.set_theta(1.1);
        cam.set_phi(-0.4);
        cam.set_look_at(Vector3::new(0.5, -0.2, 1.0));
        for world in [
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(1.0, 0.5, -0.3),
            Vector3::new(-0.7, 1.2, 2.0),
        ] {
            let (x, y, u) = cam.project(world);
            let back = cam.unproject(x, y, u);
            assert!((back - world).magnitude() < 1e-3, "{:?} -> {:?}", world, back);
        }
    }

    #[test]
    fn test_orbit_through_pole_stays_finite() {
        let mut cam = camera();
        cam.set_phi(FRAC_PI_2);
        let view = cam.view();
        for c in 0..4 {
            for r in 0..4 {
                assert!(view[c][r].is_finite());
            }
        }
    }

    #[test]
    fn test_reset_view() {
        let mut cam = camera();
        cam.set_distance(2.0);
        cam.set_look_at(Vector3::new(1.0, 1.0, 1.0));
        cam.reset_view();
        assert_eq!(cam.distance(), 6.0);
        assert_eq!(cam.look_at(), Vector3::zero());
        assert_eq!(cam.theta(), FRAC_PI_2);
    }
}
