//! Lantern 3D scene viewer
//!
//! A hierarchical scene graph with a fixed multi-light Phong shading model,
//! an orbiting camera and a handful of demo scenes, drawn with wgpu.

pub mod app;
pub mod config;
pub mod error;
pub mod gfx;
pub mod math;
pub mod scenes;
pub mod viewer;
pub mod wgpu_utils;

pub use app::LanternApp;
pub use config::ViewerConfig;
pub use viewer::{Viewer, ViewerCommand};
