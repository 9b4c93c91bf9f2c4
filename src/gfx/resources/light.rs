//! Light sources and their GPU layout.
//!
//! A light is either directional (infinitely far, lit along a fixed
//! direction) or positional. Positional lights may carry radial attenuation
//! and may additionally be spotlights.

use cgmath::{InnerSpace, MetricSpace, Vector3, Zero};

use crate::error::SceneError;

/// Exponent of the spotlight angular falloff.
const SPOT_FALLOFF_EXPONENT: f32 = 10.99999;

/// Radial attenuation `1 / (quadratic d^2 + linear d + constant)`.
///
/// All-zero factors disable attenuation.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Attenuation {
    pub quadratic: f32,
    pub linear: f32,
    pub constant: f32,
}

impl Attenuation {
    pub fn new(quadratic: f32, linear: f32, constant: f32) -> Self {
        Self {
            quadratic,
            linear,
            constant,
        }
    }

    pub fn is_none(&self) -> bool {
        self.quadratic == 0.0 && self.linear == 0.0 && self.constant == 0.0
    }

    pub fn factor(&self, distance: f32) -> f32 {
        if self.is_none() {
            return 1.0;
        }
        1.0 / (self.quadratic * distance * distance + self.linear * distance + self.constant)
    }
}

/// Spotlight cone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spot {
    pub direction: Vector3<f32>,
    /// Half-angle of the cone in radians.
    pub angle_limit: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightMode {
    Directional {
        direction: Vector3<f32>,
    },
    Positional {
        attenuation: Attenuation,
        spot: Option<Spot>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    position: Vector3<f32>,
    color: [f32; 4],
    mode: LightMode,
}

/// GPU uniform data for one light slot
///
/// `direction.w` flags a directional light, `spot_direction.w` a spotlight
/// and `attenuation.w` carries the spot angle limit.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightUniform {
    pub position: [f32; 4],
    pub color: [f32; 4],
    pub direction: [f32; 4],
    pub spot_direction: [f32; 4],
    pub attenuation: [f32; 4],
}

impl Light {
    /// Positional light without attenuation.
    pub fn point(position: Vector3<f32>, color: [f32; 4]) -> Self {
        Self {
            position,
            color,
            mode: LightMode::Positional {
                attenuation: Attenuation::default(),
                spot: None,
            },
        }
    }

    /// Infinitely distant light shining from `direction`.
    pub fn directional(position: Vector3<f32>, color: [f32; 4], direction: Vector3<f32>) -> Self {
        Self {
            position,
            color,
            mode: LightMode::Directional { direction },
        }
    }

    /// Attenuated spotlight.
    ///
    /// # Arguments
    /// * `direction` - Cone axis
    /// * `attenuation` - Radial attenuation factors
    /// * `angle_limit` - Cone half-angle in radians
    pub fn spot(
        position: Vector3<f32>,
        color: [f32; 4],
        direction: Vector3<f32>,
        attenuation: Attenuation,
        angle_limit: f32,
    ) -> Self {
        Self {
            position,
            color,
            mode: LightMode::Positional {
                attenuation,
                spot: Some(Spot {
                    direction,
                    angle_limit,
                }),
            },
        }
    }

    /// Value written into unused light slots; contributes nothing.
    pub fn off() -> Self {
        Self::point(Vector3::zero(), [0.0; 4])
    }

    /// Scales the RGBA color, the usual way scenes set intensity.
    pub fn with_intensity(mut self, intensity: f32) -> Self {
        self.color = self.color.map(|c| c * intensity);
        self
    }

    pub fn position(&self) -> Vector3<f32> {
        self.position
    }

    pub fn color(&self) -> [f32; 4] {
        self.color
    }

    pub fn mode(&self) -> LightMode {
        self.mode
    }

    pub fn is_off(&self) -> bool {
        self.color.iter().all(|c| *c == 0.0)
    }

    pub fn is_directional(&self) -> bool {
        matches!(self.mode, LightMode::Directional { .. })
    }

    pub fn is_spot(&self) -> bool {
        matches!(self.mode, LightMode::Positional { spot: Some(_), .. })
    }

    pub fn set_position(&mut self, position: Vector3<f32>) {
        self.position = position;
    }

    pub fn set_color(&mut self, color: &[f32]) -> Result<(), SceneError> {
        let invalid = || SceneError::InvalidVector {
            name: "light color",
            expected: 4,
        };
        let color: [f32; 4] = color.try_into().map_err(|_| invalid())?;
        if !color.iter().all(|c| c.is_finite()) {
            return Err(invalid());
        }
        self.color = color;
        Ok(())
    }

    /// Radial attenuation at `point`. Directional lights never attenuate.
    pub fn radial_factor(&self, point: Vector3<f32>) -> f32 {
        match self.mode {
            LightMode::Directional { .. } => 1.0,
            LightMode::Positional { attenuation, .. } => {
                attenuation.factor(self.position.distance(point))
            }
        }
    }

    /// Spotlight angular falloff at `point`; 1 for non-spot lights.
    ///
    /// Inside the cone the falloff is `cos^10.99999` of the angle between the
    /// cone axis and the direction to the point, independent of the cone size.
    pub fn angular_factor(&self, point: Vector3<f32>) -> f32 {
        let LightMode::Positional {
            spot: Some(spot), ..
        } = self.mode
        else {
            return 1.0;
        };
        let to_point = point - self.position;
        if to_point.magnitude2() == 0.0 || spot.direction.magnitude2() == 0.0 {
            return 0.0;
        }
        let cos = to_point.normalize().dot(spot.direction.normalize());
        if cos > spot.angle_limit.cos() {
            cos.powf(SPOT_FALLOFF_EXPONENT)
        } else {
            0.0
        }
    }

    pub fn to_uniform(&self) -> LightUniform {
        let p = self.position;
        let mut uniform = LightUniform {
            position: [p.x, p.y, p.z, 1.0],
            color: self.color,
            direction: [0.0; 4],
            spot_direction: [0.0; 4],
            attenuation: [0.0; 4],
        };
        match self.mode {
            LightMode::Directional { direction: d } => {
                uniform.direction = [d.x, d.y, d.z, 1.0];
            }
            LightMode::Positional { attenuation, spot } => {
                uniform.attenuation = [
                    attenuation.quadratic,
                    attenuation.linear,
                    attenuation.constant,
                    0.0,
                ];
                if let Some(spot) = spot {
                    let d = spot.direction;
                    uniform.spot_direction = [d.x, d.y, d.z, 1.0];
                    uniform.attenuation[3] = spot.angle_limit;
                }
            }
        }
        uniform
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_attenuation_factor() {
        let a = Attenuation::new(0.4, 0.5, 0.1);
        assert!((a.factor(2.0) - 1.0 / (1.6 + 1.0 + 0.1)).abs() < 1e-6);
        assert_eq!(Attenuation::default().factor(100.0), 1.0);
    }

    #[test]
    fn test_directional_ignores_attenuation() {
        let l = Light::directional(Vector3::zero(), [1.0; 4], Vector3::unit_y());
        assert!(l.is_directional());
        assert_eq!(l.radial_factor(Vector3::new(50.0, 0.0, 0.0)), 1.0);
        assert_eq!(l.angular_factor(Vector3::new(50.0, 0.0, 0.0)), 1.0);
    }

    #[test]
    fn test_spot_falloff() {
        let l = Light::spot(
            Vector3::zero(),
            [1.0; 4],
            Vector3::unit_x(),
            Attenuation::default(),
            PI / 6.0,
        );
        assert!(l.is_spot());
        assert!((l.angular_factor(Vector3::new(3.0, 0.0, 0.0)) - 1.0).abs() < 1e-6);
        // 45 degrees off-axis is outside a 30 degree cone.
        assert_eq!(l.angular_factor(Vector3::new(1.0, 1.0, 0.0)), 0.0);

        let inside = Vector3::new(1.0, 0.2, 0.0);
        let cos = inside.normalize().x;
        assert!((l.angular_factor(inside) - cos.powf(10.99999)).abs() < 1e-6);
    }

    #[test]
    fn test_uniform_layout_flags() {
        let spot = Light::spot(
            Vector3::new(1.0, 2.0, 3.0),
            [0.5; 4],
            Vector3::unit_y(),
            Attenuation::new(0.1, 0.2, 0.3),
            0.5,
        )
        .to_uniform();
        assert_eq!(spot.direction[3], 0.0);
        assert_eq!(spot.spot_direction, [0.0, 1.0, 0.0, 1.0]);
        assert_eq!(spot.attenuation, [0.1, 0.2, 0.3, 0.5]);

        let directional = Light::directional(Vector3::zero(), [1.0; 4], Vector3::unit_z()).to_uniform();
        assert_eq!(directional.direction, [0.0, 0.0, 1.0, 1.0]);
    }

    #[test]
    fn test_off_and_intensity() {
        assert!(Light::off().is_off());
        let l = Light::point(Vector3::zero(), [0.5, 0.5, 0.0, 1.0]).with_intensity(2.0);
        assert_eq!(l.color(), [1.0, 1.0, 0.0, 2.0]);
        let mut l = l;
        assert!(l.set_color(&[1.0, 0.0]).is_err());
        assert_eq!(l.color(), [1.0, 1.0, 0.0, 2.0]);
    }
}
