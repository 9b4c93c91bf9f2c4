//! Light, material and texture resources
//!
//! Value objects shared between the scene graph and the shading stage, plus
//! the GPU texture wrapper used by the render engine.

pub mod light;
pub mod material;
pub mod texture;
pub mod texture_resource;

pub use light::{Attenuation, Light, LightMode, LightUniform, Spot};
pub use material::{Material, MaterialUniform};
pub use texture::{Texture, TextureImage, TextureUnit, TextureUnitAllocator, TEXTURE_UNIT_COUNT};
pub use texture_resource::{DepthBuffer, TextureResource};
