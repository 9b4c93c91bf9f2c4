/// RGB color with every channel kept inside `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ColorType {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl ColorType {
    pub const RED: Self = Self::rgb(1.0, 0.0, 0.0);
    pub const GREEN: Self = Self::rgb(0.0, 1.0, 0.0);
    pub const BLUE: Self = Self::rgb(0.0, 0.0, 1.0);
    pub const YELLOW: Self = Self::rgb(1.0, 1.0, 0.0);
    pub const ORANGE: Self = Self::rgb(1.0, 0.5, 0.0);
    pub const PURPLE: Self = Self::rgb(0.5, 0.0, 0.5);
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    pub const GRAY: Self = Self::rgb(0.2, 0.2, 0.2);
    pub const SILVER: Self = Self::rgb(0.75, 0.75, 0.75);
    pub const NAVY: Self = Self::rgb(0.0, 0.0, 0.5);
    pub const SOFTRED: Self = Self::rgb(1.0, 127.0 / 255.0, 154.0 / 255.0);
    pub const SOFTGREEN: Self = Self::rgb(192.0 / 255.0, 238.0 / 255.0, 0.0);
    pub const SOFTBLUE: Self = Self::rgb(115.0 / 255.0, 197.0 / 255.0, 1.0);
    pub const PINK: Self = Self::rgb(1.0, 192.0 / 255.0, 203.0 / 255.0);
    pub const DARKORANGE1: Self = Self::rgb(1.0, 140.0 / 255.0, 0.0);
    pub const BLUEGREEN: Self = Self::rgb(3.0 / 255.0, 106.0 / 255.0, 110.0 / 255.0);

    const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Creates a color, clamping each channel to `[0, 1]`.
    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self {
            r: r.clamp(0.0, 1.0),
            g: g.clamp(0.0, 1.0),
            b: b.clamp(0.0, 1.0),
        }
    }

    /// Creates a color from 8-bit channels.
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::rgb(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    /// RGBA array with the given alpha, as used by lights and materials.
    pub fn with_alpha(self, alpha: f32) -> [f32; 4] {
        [self.r, self.g, self.b, alpha]
    }

    pub fn to_rgb8(self) -> [u8; 3] {
        [
            (self.r * 255.0).round() as u8,
            (self.g * 255.0).round() as u8,
            (self.b * 255.0).round() as u8,
        ]
    }
}

impl From<ColorType> for wgpu::Color {
    fn from(color: ColorType) -> Self {
        wgpu::Color {
            r: color.r as f64,
            g: color.g as f64,
            b: color.b as f64,
            a: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_clamps_channels() {
        let c = ColorType::new(1.5, -0.2, 0.4);
        assert_eq!(c, ColorType { r: 1.0, g: 0.0, b: 0.4 });
    }

    #[test]
    fn test_rgb8_round_trip() {
        let c = ColorType::from_rgb8(3, 106, 110);
        assert_eq!(c, ColorType::BLUEGREEN);
        assert_eq!(c.to_rgb8(), [3, 106, 110]);
    }
}
