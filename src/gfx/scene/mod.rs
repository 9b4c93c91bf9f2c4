//! # Scene Graph
//!
//! Hierarchical [`Component`] tree with per-node transforms, materials,
//! textures and rendering routing.
//!
//! ## Key Components
//!
//! - [`Component`] - Node owning its children, an optional [`Drawable`] and
//!   three rotation axes
//! - [`Mesh`] - Static triangle mesh drawable
//! - [`Vertex3D`] - Interleaved vertex layout shared with the GPU pipeline

pub mod component;
pub mod drawable;
pub mod vertex;

pub use component::{Axis, AxisHandle, Component, ComponentId, ResetMode};
pub use drawable::{Drawable, Mesh};
pub use vertex::Vertex3D;
