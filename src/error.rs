//! Error types shared by the math, scene and resource layers.
//!
//! Validation failures are raised before any state is touched, so a failed
//! setter never leaves a component half-updated.

use std::path::PathBuf;

use thiserror::Error;

use crate::gfx::scene::ComponentId;

/// Errors raised by [`Point`](crate::math::Point) arithmetic.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MathError {
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },
}

/// Errors raised while building or mutating a scene graph.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("axis handle does not belong to component {0}")]
    UnknownAxis(ComponentId),

    #[error("component only accepts uniform scaling, got {0:?}")]
    NonUniformScale([f32; 3]),

    #[error("expected {expected} components, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    #[error("{name} must be {expected} finite values")]
    InvalidVector { name: &'static str, expected: usize },

    #[error("unknown rendering routing '{0}'")]
    UnknownRouting(String),

    #[error("unknown reset mode '{0}'")]
    UnknownResetMode(String),

    #[error("texture file not found: {}", .0.display())]
    TextureNotFound(PathBuf),

    #[error("failed to decode texture {}: {source}", path.display())]
    TextureDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("no scene registered at index {0}")]
    SceneIndex(usize),

    #[error(transparent)]
    Math(#[from] MathError),
}

/// Errors raised while setting up or driving the GPU renderer.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to create window surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    #[error("no compatible graphics adapter: {0}")]
    RequestAdapter(#[from] wgpu::RequestAdapterError),

    #[error("failed to open graphics device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),

    #[error("surface reports no supported formats")]
    UnsupportedSurface,

    #[error("surface error: {0}")]
    Surface(#[from] wgpu::SurfaceError),

    #[error("shader '{0}' not loaded")]
    ShaderNotFound(String),

    #[error("pipeline '{0}' not registered")]
    PipelineNotFound(String),
}
