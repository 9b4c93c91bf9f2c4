use cgmath::Vector3;

use super::ColorType;
use crate::error::MathError;

/// A point or vector of any dimension.
///
/// Carries an optional color and texture coordinate so that mesh producers
/// can pass whole vertices around. Arithmetic keeps the attachments of the
/// left operand; binary operations fail with [`MathError::DimensionMismatch`]
/// when operand dimensions differ.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Point {
    coords: Vec<f32>,
    color: Option<ColorType>,
    texture_coords: Option<[f32; 2]>,
}

impl Point {
    pub fn new(coords: impl Into<Vec<f32>>) -> Self {
        Self {
            coords: coords.into(),
            color: None,
            texture_coords: None,
        }
    }

    pub fn xyz(x: f32, y: f32, z: f32) -> Self {
        Self::new(vec![x, y, z])
    }

    pub fn with_color(mut self, color: ColorType) -> Self {
        self.color = Some(color);
        self
    }

    pub fn with_texture_coords(mut self, uv: [f32; 2]) -> Self {
        self.texture_coords = Some(uv);
        self
    }

    pub fn coords(&self) -> &[f32] {
        &self.coords
    }

    pub fn dim(&self) -> usize {
        self.coords.len()
    }

    pub fn color(&self) -> Option<ColorType> {
        self.color
    }

    pub fn texture_coords(&self) -> Option<[f32; 2]> {
        self.texture_coords
    }

    fn check_dim(&self, other: &Point) -> Result<(), MathError> {
        if self.dim() != other.dim() {
            return Err(MathError::DimensionMismatch {
                expected: self.dim(),
                found: other.dim(),
            });
        }
        Ok(())
    }

    fn with_coords(&self, coords: Vec<f32>) -> Point {
        Point {
            coords,
            color: self.color,
            texture_coords: self.texture_coords,
        }
    }

    pub fn add(&self, other: &Point) -> Result<Point, MathError> {
        self.check_dim(other)?;
        let coords = self.coords.iter().zip(&other.coords).map(|(a, b)| a + b);
        Ok(self.with_coords(coords.collect()))
    }

    pub fn sub(&self, other: &Point) -> Result<Point, MathError> {
        self.check_dim(other)?;
        let coords = self.coords.iter().zip(&other.coords).map(|(a, b)| a - b);
        Ok(self.with_coords(coords.collect()))
    }

    pub fn scale(&self, factor: f32) -> Point {
        self.with_coords(self.coords.iter().map(|c| c * factor).collect())
    }

    pub fn dot(&self, other: &Point) -> Result<f32, MathError> {
        self.check_dim(other)?;
        Ok(self.coords.iter().zip(&other.coords).map(|(a, b)| a * b).sum())
    }

    pub fn norm(&self) -> f32 {
        self.coords.iter().map(|c| c * c).sum::<f32>().sqrt()
    }

    /// Unit-length copy. A zero vector comes back unchanged.
    pub fn normalize(&self) -> Point {
        let norm = self.norm();
        if norm == 0.0 {
            return self.clone();
        }
        self.with_coords(self.coords.iter().map(|c| c / norm).collect())
    }

    /// Reflects this vector about the plane with the given normal.
    pub fn reflect(&self, normal: &Point) -> Result<Point, MathError> {
        let n = normal.normalize();
        let ndp = 2.0 * self.dot(&n)?;
        self.sub(&n.scale(ndp))
    }

    /// Cross product; both operands must be three dimensional.
    pub fn cross3d(&self, other: &Point) -> Result<Point, MathError> {
        for p in [self, other] {
            if p.dim() != 3 {
                return Err(MathError::DimensionMismatch {
                    expected: 3,
                    found: p.dim(),
                });
            }
        }
        let (s, d) = (&self.coords, &other.coords);
        Ok(Point::xyz(
            s[1] * d[2] - s[2] * d[1],
            s[2] * d[0] - s[0] * d[2],
            s[0] * d[1] - s[1] * d[0],
        ))
    }
}

impl From<Vector3<f32>> for Point {
    fn from(v: Vector3<f32>) -> Self {
        Point::xyz(v.x, v.y, v.z)
    }
}

impl From<[f32; 3]> for Point {
    fn from(v: [f32; 3]) -> Self {
        Point::new(v.to_vec())
    }
}

impl TryFrom<&Point> for Vector3<f32> {
    type Error = MathError;

    fn try_from(p: &Point) -> Result<Self, Self::Error> {
        match p.coords() {
            [x, y, z] => Ok(Vector3::new(*x, *y, *z)),
            other => Err(MathError::DimensionMismatch {
                expected: 3,
                found: other.len(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_sub_keep_left_attachments() {
        let a = Point::xyz(1.0, 2.0, 3.0).with_color(ColorType::RED);
        let b = Point::xyz(0.5, 0.5, 0.5);
        let sum = a.add(&b).unwrap();
        assert_eq!(sum.coords(), &[1.5, 2.5, 3.5]);
        assert_eq!(sum.color(), Some(ColorType::RED));
        assert_eq!(a.sub(&b).unwrap().coords(), &[0.5, 1.5, 2.5]);
    }

    #[test]
    fn test_normalize_keeps_attachments() {
        let p = Point::xyz(3.0, 0.0, 4.0)
            .with_color(ColorType::RED)
            .with_texture_coords([0.5, 1.0]);
        let n = p.normalize();
        assert_eq!(n.coords(), &[0.6, 0.0, 0.8]);
        assert_eq!(n.color(), Some(ColorType::RED));
        assert_eq!(n.texture_coords(), Some([0.5, 1.0]));
    }

    #[test]
    fn test_dimension_mismatch() {
        let a = Point::xyz(1.0, 0.0, 0.0);
        let b = Point::new(vec![1.0, 0.0]);
        assert_eq!(
            a.dot(&b),
            Err(MathError::DimensionMismatch { expected: 3, found: 2 })
        );
        assert!(a.add(&b).is_err());
        assert!(b.cross3d(&b).is_err());
    }

    #[test]
    fn test_normalize_zero_vector_is_unchanged() {
        let zero = Point::xyz(0.0, 0.0, 0.0);
        assert_eq!(zero.normalize(), zero);

        let n = Point::xyz(3.0, 0.0, 4.0).normalize();
        assert!((n.norm() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cross_and_reflect() {
        let x = Point::xyz(1.0, 0.0, 0.0);
        let y = Point::xyz(0.0, 1.0, 0.0);
        assert_eq!(x.cross3d(&y).unwrap().coords(), &[0.0, 0.0, 1.0]);

        let v = Point::xyz(1.0, -1.0, 0.0);
        let r = v.reflect(&Point::xyz(0.0, 2.0, 0.0)).unwrap();
        assert_eq!(r.coords(), &[1.0, 1.0, 0.0]);
    }

    #[test]
    fn test_vector3_conversion() {
        let p = Point::xyz(1.0, 2.0, 3.0);
        assert_eq!(Vector3::try_from(&p).unwrap(), Vector3::new(1.0, 2.0, 3.0));
        assert!(Vector3::try_from(&Point::new(vec![1.0])).is_err());
    }
}
