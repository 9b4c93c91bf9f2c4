//! # Math Module
//!
//! Small value types and matrix builders used by the scene graph and camera.
//!
//! ## Conventions
//!
//! All matrices are `cgmath::Matrix4<f32>` and act on column vectors, so a
//! transform applied first sits rightmost in a product. Projection matrices
//! follow the OpenGL clip convention (depth in `-1..1`); the renderer converts
//! them with [`OPENGL_TO_WGPU_MATRIX`] right before upload.
//!
//! - [`Point`] - variable-dimension point/vector with optional color and UV
//! - [`Quaternion`] - Hamilton-product quaternion with matrix conversion
//! - [`ColorType`] - clamped RGB color and the named palette
//! - [`transform`] - translate/scale/rotate/perspective and the view builder

pub mod color;
pub mod point;
pub mod quaternion;
pub mod transform;

pub use color::ColorType;
pub use point::Point;
pub use quaternion::Quaternion;
pub use transform::{
    perspective, rotate, scale, translate, ViewMatrixBuilder, OPENGL_TO_WGPU_MATRIX,
};
