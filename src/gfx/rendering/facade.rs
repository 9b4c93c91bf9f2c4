//! The boundary between the scene graph and whatever draws it.

use cgmath::{Matrix4, Vector3};

use super::RenderingRouting;
use crate::gfx::geometry::MeshData;
use crate::gfx::resources::{Light, Material, Texture};

/// Number of light slots the shading stage exposes.
pub const MAX_LIGHTS: usize = 20;

/// Opaque reference to a mesh uploaded through [`RenderFacade::upload_mesh`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshHandle(pub(crate) usize);

impl MeshHandle {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Global toggles for the three Phong terms plus normal mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LightingTerms {
    pub ambient: bool,
    pub diffuse: bool,
    pub specular: bool,
    pub normal_mapping: bool,
}

impl Default for LightingTerms {
    fn default() -> Self {
        Self {
            ambient: true,
            diffuse: true,
            specular: true,
            normal_mapping: false,
        }
    }
}

/// Rendering operations the scene graph issues.
///
/// Per-draw state (`set_model_matrix`, `set_material`, `set_routing`,
/// `bind_texture`/`unbind_texture`) is latched and consumed by the next
/// `draw_mesh`.
pub trait RenderFacade {
    /// Stores static geometry and returns a handle for drawing it.
    fn upload_mesh(&mut self, mesh: &MeshData) -> MeshHandle;

    fn set_view(&mut self, view: Matrix4<f32>, projection: Matrix4<f32>, eye: Vector3<f32>);

    fn set_model_matrix(&mut self, model: Matrix4<f32>);

    fn set_material(&mut self, material: &Material);

    fn set_routing(&mut self, routing: RenderingRouting);

    fn bind_texture(&mut self, texture: &Texture);

    fn unbind_texture(&mut self);

    fn draw_mesh(&mut self, mesh: MeshHandle);

    /// Writes `light` into `slot`. Slots outside `0..MAX_LIGHTS` are ignored.
    fn set_light(&mut self, slot: usize, light: &Light);

    /// Resets every slot to [`Light::off`].
    fn clear_all_lights(&mut self);

    /// Drops every uploaded mesh and bound texture. Handles issued before
    /// the call are no longer valid.
    fn release_resources(&mut self);

    fn set_lighting_terms(&mut self, terms: LightingTerms);
}
