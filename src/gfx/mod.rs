//! # Graphics Module
//!
//! Camera, geometry, scene graph and the wgpu renderer.
//!
//! - **Camera** ([`camera`]) - Spherical camera with orbit, pan and zoom
//! - **Geometry** ([`geometry`]) - Procedural primitive meshes
//! - **Scene** ([`scene`]) - Component hierarchy and drawables
//! - **Rendering** ([`rendering`]) - Draw recording and GPU replay
//! - **Resources** ([`resources`]) - Materials, lights and textures

pub mod camera;
pub mod geometry;
pub mod rendering;
pub mod resources;
pub mod scene;

pub use camera::SphericalCamera;
pub use rendering::RenderEngine;
