//! Core rendering functionality
//!
//! The scene graph talks to a [`RenderFacade`]. [`RenderState`] records what
//! a frame asks for and [`RenderEngine`] replays it on the GPU.

pub mod facade;
pub mod pipeline_manager;
pub mod render_engine;
pub mod render_state;
pub mod routing;

pub use facade::{LightingTerms, MeshHandle, RenderFacade, MAX_LIGHTS};
pub use pipeline_manager::{PipelineConfig, PipelineManager};
pub use render_engine::RenderEngine;
pub use render_state::{DrawCommand, RenderState};
pub use routing::RenderingRouting;
