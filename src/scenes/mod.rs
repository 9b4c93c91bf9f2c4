//! # Demo Scenes
//!
//! Each scene owns a [`Component`] tree and the lights it binds to the
//! first light slots. Scenes are built by factories registered in a
//! [`SceneRegistry`] so the viewer can construct a replacement before it
//! tears down the active one.

use std::path::{Path, PathBuf};

use crate::error::SceneError;
use crate::gfx::geometry::{generate_cube, MeshData};
use crate::gfx::rendering::RenderingRouting;
use crate::gfx::resources::{Light, Texture, TextureUnitAllocator};
use crate::gfx::scene::{Component, Mesh};
use crate::math::{ColorType, Point};

pub mod binary_suns;
pub mod model_axes;
pub mod primitive_showcase;
pub mod spotlight_gallery;
pub mod texture_carousel;

pub use model_axes::ModelAxes;

/// A scene that changes over time.
pub trait Animatable {
    /// Advances the scene by one frame.
    fn animation_update(&mut self);
}

pub trait Scene {
    fn name(&self) -> &str;

    fn root(&self) -> &Component;

    fn root_mut(&mut self) -> &mut Component;

    /// Lights bound to slots `0..lights().len()` while the scene is active.
    fn lights(&self) -> &[Light];

    /// Whether the bound texture perturbs lighting normals in this scene.
    fn normal_mapping(&self) -> bool {
        false
    }

    fn as_animatable_mut(&mut self) -> Option<&mut dyn Animatable> {
        None
    }
}

/// Resources a scene factory may draw on.
pub struct SceneContext<'a> {
    pub allocator: &'a mut TextureUnitAllocator,
    pub asset_dir: PathBuf,
}

impl<'a> SceneContext<'a> {
    pub fn new(allocator: &'a mut TextureUnitAllocator, asset_dir: impl AsRef<Path>) -> Self {
        Self {
            allocator,
            asset_dir: asset_dir.as_ref().to_path_buf(),
        }
    }

    /// Loads `name` from the asset directory onto a fresh texture unit.
    pub fn load_texture(&mut self, name: &str) -> Result<Texture, SceneError> {
        Texture::from_file(self.asset_dir.join(name), self.allocator)
    }
}

pub type SceneFactory = fn(&mut SceneContext) -> Result<Box<dyn Scene>, SceneError>;

/// Ordered list of named scene factories.
#[derive(Clone, Default)]
pub struct SceneRegistry {
    entries: Vec<(&'static str, SceneFactory)>,
}

impl SceneRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in scene in browsing order.
    pub fn with_demo_scenes() -> Self {
        let mut registry = Self::new();
        registry.register(spotlight_gallery::NAME, spotlight_gallery::build);
        registry.register(binary_suns::NAME, binary_suns::build);
        registry.register(primitive_showcase::NAME, primitive_showcase::build);
        registry.register(texture_carousel::NAME, texture_carousel::build);
        registry
    }

    pub fn register(&mut self, name: &'static str, factory: SceneFactory) {
        self.entries.push((name, factory));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn name(&self, index: usize) -> Option<&'static str> {
        self.entries.get(index).map(|(name, _)| *name)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|(n, _)| *n == name)
    }

    /// Runs the factory at `index`; `None` if the index is out of range.
    pub fn build(
        &self,
        index: usize,
        context: &mut SceneContext,
    ) -> Option<Result<Box<dyn Scene>, SceneError>> {
        self.entries.get(index).map(|(_, factory)| factory(context))
    }
}

/// Component at `position` drawing `mesh`.
pub(crate) fn mesh_node(position: [f32; 3], mesh: MeshData) -> Result<Component, SceneError> {
    Component::new(&Point::from(position), Some(Box::new(Mesh::new(mesh))))
}

/// Small vertex-colored cube marking a light position.
pub(crate) fn light_marker(position: [f32; 3], color: ColorType) -> Result<Component, SceneError> {
    let mut marker = mesh_node(position, generate_cube(0.1, 0.1, 0.1, color))?;
    marker.set_rendering_routing(RenderingRouting::VERTEX);
    Ok(marker)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::gfx::rendering::RenderState;

    pub(crate) fn asset_dir() -> &'static str {
        concat!(env!("CARGO_MANIFEST_DIR"), "/assets")
    }

    /// Builds a scene, initializes it and returns the number of draws.
    pub(crate) fn build_and_draw(factory: SceneFactory) -> (Box<dyn Scene>, usize) {
        let mut allocator = TextureUnitAllocator::new();
        let mut context = SceneContext::new(&mut allocator, asset_dir());
        let mut scene = factory(&mut context).expect("scene builds");
        let mut state = RenderState::new();
        scene.root_mut().initialize(&mut state);
        scene.root().draw(&mut state);
        (scene, state.commands().len())
    }

    #[test]
    fn test_registry_order_and_lookup() {
        let registry = SceneRegistry::with_demo_scenes();
        assert_eq!(registry.len(), 4);
        assert_eq!(registry.name(0), Some(spotlight_gallery::NAME));
        assert_eq!(registry.index_of(texture_carousel::NAME), Some(3));
        assert!(registry.name(4).is_none());
    }

    #[test]
    fn test_build_out_of_range_is_none() {
        let registry = SceneRegistry::with_demo_scenes();
        let mut allocator = TextureUnitAllocator::new();
        let mut context = SceneContext::new(&mut allocator, asset_dir());
        assert!(registry.build(9, &mut context).is_none());
    }

    #[test]
    fn test_missing_asset_fails_scene_build() {
        let registry = SceneRegistry::with_demo_scenes();
        let mut allocator = TextureUnitAllocator::new();
        let mut context = SceneContext::new(&mut allocator, "/nonexistent/assets");
        let index = registry.index_of(binary_suns::NAME).unwrap();
        let result = registry.build(index, &mut context).unwrap();
        assert!(matches!(result, Err(SceneError::TextureNotFound(_))));
    }
}
