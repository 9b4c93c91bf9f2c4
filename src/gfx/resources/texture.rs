//! CPU-side textures and the texture unit allocator.
//!
//! Pixel data is decoded once and shared through an `Arc`; the GPU copy is
//! created by the render engine the first time a unit is bound.

use std::path::Path;
use std::sync::Arc;

use crate::error::SceneError;
use crate::math::ColorType;

/// Number of texture units handed out before wrapping back to the first.
pub const TEXTURE_UNIT_COUNT: u32 = 16;

/// Decoded RGBA8 image, rows stored bottom-up to match texture coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl TextureImage {
    /// Loads and decodes an image file.
    ///
    /// A missing file is reported as [`SceneError::TextureNotFound`] before
    /// decoding is attempted.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SceneError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(SceneError::TextureNotFound(path.to_path_buf()));
        }
        let decoded = image::open(path).map_err(|source| SceneError::TextureDecode {
            path: path.to_path_buf(),
            source,
        })?;
        let rgba = decoded.flipv().to_rgba8();
        log::debug!(
            "Loaded texture {} ({}x{})",
            path.display(),
            rgba.width(),
            rgba.height()
        );
        Ok(Self {
            width: rgba.width(),
            height: rgba.height(),
            pixels: rgba.into_raw(),
        })
    }

    /// 1x1 image of a single opaque color.
    pub fn solid(color: ColorType) -> Self {
        let [r, g, b] = color.to_rgb8();
        Self {
            width: 1,
            height: 1,
            pixels: vec![r, g, b, 255],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}

/// A texture slot issued by [`TextureUnitAllocator`].
///
/// Slots wrap, so two live textures can share a slot; `generation` tells
/// them apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureUnit {
    pub slot: u32,
    pub generation: u64,
}

/// Hands out texture units `1..=16`, wrapping around.
#[derive(Debug)]
pub struct TextureUnitAllocator {
    next: u32,
    issued: u64,
}

impl Default for TextureUnitAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl TextureUnitAllocator {
    pub fn new() -> Self {
        Self { next: 1, issued: 0 }
    }

    pub fn allocate(&mut self) -> TextureUnit {
        let unit = TextureUnit {
            slot: self.next,
            generation: self.issued,
        };
        self.next = self.next % TEXTURE_UNIT_COUNT + 1;
        self.issued += 1;
        unit
    }

    /// Total number of units issued so far.
    pub fn issued(&self) -> u64 {
        self.issued
    }
}

/// An image bound to a texture unit.
#[derive(Debug, Clone)]
pub struct Texture {
    unit: TextureUnit,
    image: Arc<TextureImage>,
}

impl Texture {
    pub fn new(image: TextureImage, allocator: &mut TextureUnitAllocator) -> Self {
        Self {
            unit: allocator.allocate(),
            image: Arc::new(image),
        }
    }

    /// Loads `path` and assigns it the next free unit.
    pub fn from_file(
        path: impl AsRef<Path>,
        allocator: &mut TextureUnitAllocator,
    ) -> Result<Self, SceneError> {
        let image = TextureImage::load(path)?;
        Ok(Self::new(image, allocator))
    }

    pub fn unit(&self) -> TextureUnit {
        self.unit
    }

    pub fn image(&self) -> &Arc<TextureImage> {
        &self.image
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ASSET_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/assets");

    #[test]
    fn test_allocator_wraps_after_sixteen() {
        let mut allocator = TextureUnitAllocator::new();
        let slots: Vec<u32> = (0..18).map(|_| allocator.allocate().slot).collect();
        assert_eq!(slots[0], 1);
        assert_eq!(slots[15], 16);
        assert_eq!(slots[16], 1);
        assert_eq!(slots[17], 2);
        assert_eq!(allocator.issued(), 18);
    }

    #[test]
    fn test_wrapped_units_differ_by_generation() {
        let mut allocator = TextureUnitAllocator::new();
        let first = allocator.allocate();
        for _ in 0..15 {
            allocator.allocate();
        }
        let wrapped = allocator.allocate();
        assert_eq!(first.slot, wrapped.slot);
        assert_ne!(first, wrapped);
    }

    #[test]
    fn test_missing_texture_file() {
        let err = TextureImage::load("does/not/exist.bmp").unwrap_err();
        assert!(matches!(err, SceneError::TextureNotFound(_)));
    }

    #[test]
    fn test_load_bundled_asset() {
        let mut allocator = TextureUnitAllocator::new();
        let texture = Texture::from_file(format!("{ASSET_DIR}/earth.bmp"), &mut allocator).unwrap();
        let image = texture.image();
        assert!(image.width() > 0 && image.height() > 0);
        assert_eq!(
            image.pixels().len(),
            (image.width() * image.height() * 4) as usize
        );
        assert_eq!(texture.unit().slot, 1);
    }

    #[test]
    fn test_solid_image() {
        let image = TextureImage::solid(ColorType::WHITE);
        assert_eq!(image.pixels(), &[255, 255, 255, 255]);
    }
}
