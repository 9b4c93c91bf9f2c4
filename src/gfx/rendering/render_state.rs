//! In-memory [`RenderFacade`] that records everything the scene submits.
//!
//! The viewer draws into a `RenderState` each frame; the wgpu
//! [`RenderEngine`](super::RenderEngine) then uploads whatever changed and
//! replays the recorded draw commands.

use std::collections::HashMap;
use std::sync::Arc;

use cgmath::{Matrix4, SquareMatrix, Vector3, Zero};

use super::facade::{LightingTerms, MeshHandle, RenderFacade, MAX_LIGHTS};
use super::RenderingRouting;
use crate::gfx::geometry::MeshData;
use crate::gfx::resources::{Light, Material, Texture, TextureImage, TextureUnit};

/// One recorded draw call with the state latched for it.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCommand {
    pub mesh: MeshHandle,
    pub model: Matrix4<f32>,
    pub material: Material,
    pub routing: RenderingRouting,
    pub texture: Option<TextureUnit>,
}

pub struct RenderState {
    meshes: Vec<MeshData>,
    textures: HashMap<TextureUnit, Arc<TextureImage>>,
    lights: [Light; MAX_LIGHTS],
    terms: LightingTerms,
    view: Matrix4<f32>,
    projection: Matrix4<f32>,
    eye: Vector3<f32>,
    model: Matrix4<f32>,
    material: Material,
    routing: RenderingRouting,
    texture: Option<TextureUnit>,
    commands: Vec<DrawCommand>,
    // Bumped whenever meshes and textures are released.
    resource_epoch: u64,
}

impl Default for RenderState {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderState {
    pub fn new() -> Self {
        Self {
            meshes: Vec::new(),
            textures: HashMap::new(),
            lights: [Light::off(); MAX_LIGHTS],
            terms: LightingTerms::default(),
            view: Matrix4::identity(),
            projection: Matrix4::identity(),
            eye: Vector3::zero(),
            model: Matrix4::identity(),
            material: Material::default(),
            routing: RenderingRouting::default(),
            texture: None,
            commands: Vec::new(),
            resource_epoch: 0,
        }
    }

    /// Drops last frame's draw commands; meshes, lights and textures persist.
    pub fn begin_frame(&mut self) {
        self.commands.clear();
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn meshes(&self) -> &[MeshData] {
        &self.meshes
    }

    pub fn mesh(&self, handle: MeshHandle) -> Option<&MeshData> {
        self.meshes.get(handle.0)
    }

    pub fn texture(&self, unit: &TextureUnit) -> Option<&Arc<TextureImage>> {
        self.textures.get(unit)
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    /// Changes every time [`RenderFacade::release_resources`] runs, so a
    /// backend mirroring meshes and textures knows to drop its copies.
    pub fn resource_epoch(&self) -> u64 {
        self.resource_epoch
    }

    pub fn lights(&self) -> &[Light; MAX_LIGHTS] {
        &self.lights
    }

    /// Number of slots holding a light that contributes anything.
    pub fn active_light_count(&self) -> usize {
        self.lights.iter().filter(|l| !l.is_off()).count()
    }

    pub fn lighting_terms(&self) -> LightingTerms {
        self.terms
    }

    pub fn view(&self) -> Matrix4<f32> {
        self.view
    }

    pub fn projection(&self) -> Matrix4<f32> {
        self.projection
    }

    pub fn eye(&self) -> Vector3<f32> {
        self.eye
    }
}

impl RenderFacade for RenderState {
    fn upload_mesh(&mut self, mesh: &MeshData) -> MeshHandle {
        self.meshes.push(mesh.clone());
        MeshHandle(self.meshes.len() - 1)
    }

    fn set_view(&mut self, view: Matrix4<f32>, projection: Matrix4<f32>, eye: Vector3<f32>) {
        self.view = view;
        self.projection = projection;
        self.eye = eye;
    }

    fn set_model_matrix(&mut self, model: Matrix4<f32>) {
        self.model = model;
    }

    fn set_material(&mut self, material: &Material) {
        self.material = *material;
    }

    fn set_routing(&mut self, routing: RenderingRouting) {
        self.routing = routing;
    }

    fn bind_texture(&mut self, texture: &Texture) {
        let unit = texture.unit();
        self.textures
            .entry(unit)
            .or_insert_with(|| Arc::clone(texture.image()));
        self.texture = Some(unit);
    }

    fn unbind_texture(&mut self) {
        self.texture = None;
    }

    fn draw_mesh(&mut self, mesh: MeshHandle) {
        if mesh.0 >= self.meshes.len() {
            log::warn!("Draw call for unknown mesh {}", mesh.0);
            return;
        }
        self.commands.push(DrawCommand {
            mesh,
            model: self.model,
            material: self.material,
            routing: self.routing,
            texture: self.texture,
        });
    }

    fn set_light(&mut self, slot: usize, light: &Light) {
        match self.lights.get_mut(slot) {
            Some(target) => *target = *light,
            None => log::warn!("Light slot {} out of range (max {})", slot, MAX_LIGHTS),
        }
    }

    fn clear_all_lights(&mut self) {
        self.lights = [Light::off(); MAX_LIGHTS];
    }

    fn release_resources(&mut self) {
        log::debug!(
            "Releasing {} meshes and {} textures",
            self.meshes.len(),
            self.textures.len()
        );
        self.meshes.clear();
        self.textures.clear();
        self.commands.clear();
        self.texture = None;
        self.resource_epoch += 1;
    }

    fn set_lighting_terms(&mut self, terms: LightingTerms) {
        self.terms = terms;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::geometry::generate_cube;
    use crate::gfx::resources::{TextureImage, TextureUnitAllocator};
    use crate::math::ColorType;

    #[test]
    fn test_draw_latches_current_state() {
        let mut state = RenderState::new();
        let mesh = state.upload_mesh(&generate_cube(1.0, 1.0, 1.0, ColorType::RED));
        let material = Material::new([0.1; 4], [0.2; 4], [0.3; 4], 8.0);

        state.set_model_matrix(Matrix4::from_scale(2.0));
        state.set_material(&material);
        state.set_routing(RenderingRouting::VERTEX);
        state.draw_mesh(mesh);
        state.set_model_matrix(Matrix4::identity());
        state.draw_mesh(mesh);

        let commands = state.commands();
        assert_eq!(commands.len(), 2);
        assert_eq!(commands[0].model, Matrix4::from_scale(2.0));
        assert_eq!(commands[0].material, material);
        assert_eq!(commands[1].routing, RenderingRouting::VERTEX);

        state.begin_frame();
        assert!(state.commands().is_empty());
        assert_eq!(state.meshes().len(), 1);
    }

    #[test]
    fn test_unknown_mesh_is_not_recorded() {
        let mut state = RenderState::new();
        state.draw_mesh(MeshHandle(3));
        assert!(state.commands().is_empty());
    }

    #[test]
    fn test_texture_bind_and_unbind() {
        let mut state = RenderState::new();
        let mesh = state.upload_mesh(&generate_cube(1.0, 1.0, 1.0, ColorType::RED));
        let mut allocator = TextureUnitAllocator::new();
        let texture = Texture::new(TextureImage::solid(ColorType::GREEN), &mut allocator);

        state.bind_texture(&texture);
        state.draw_mesh(mesh);
        state.unbind_texture();
        state.draw_mesh(mesh);

        assert_eq!(state.commands()[0].texture, Some(texture.unit()));
        assert_eq!(state.commands()[1].texture, None);
        assert!(state.texture(&texture.unit()).is_some());
    }

    #[test]
    fn test_light_slots() {
        let mut state = RenderState::new();
        let light = Light::point(Vector3::new(1.0, 2.0, 3.0), [1.0; 4]);
        state.set_light(0, &light);
        state.set_light(4, &light);
        state.set_light(MAX_LIGHTS, &light);
        assert_eq!(state.active_light_count(), 2);

        state.clear_all_lights();
        assert_eq!(state.active_light_count(), 0);
    }

    #[test]
    fn test_release_resources_invalidates_old_handles() {
        let mut state = RenderState::new();
        let mesh = state.upload_mesh(&generate_cube(1.0, 1.0, 1.0, ColorType::RED));
        let mut allocator = TextureUnitAllocator::new();
        let texture = Texture::new(TextureImage::solid(ColorType::GREEN), &mut allocator);
        state.bind_texture(&texture);
        state.draw_mesh(mesh);
        let epoch = state.resource_epoch();

        state.release_resources();
        assert!(state.meshes().is_empty());
        assert_eq!(state.texture_count(), 0);
        assert!(state.commands().is_empty());
        assert_ne!(state.resource_epoch(), epoch);

        state.draw_mesh(mesh);
        assert!(state.commands().is_empty());

        // uploads start over from the first handle
        let again = state.upload_mesh(&generate_cube(1.0, 1.0, 1.0, ColorType::RED));
        assert_eq!(again.index(), 0);
        state.draw_mesh(again);
        assert_eq!(state.commands()[0].texture, None);
    }
}
