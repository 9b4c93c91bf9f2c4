use crate::gfx::geometry::MeshData;
use crate::gfx::rendering::{MeshHandle, RenderFacade};

/// Geometry payload attached to a [`Component`](super::Component).
///
/// `initialize` runs once before the first draw and uploads whatever static
/// data the payload needs; `draw` issues the draw call. Transform and
/// material are already pushed by the owning component.
pub trait Drawable {
    fn initialize(&mut self, facade: &mut dyn RenderFacade);

    fn draw(&self, facade: &mut dyn RenderFacade);
}

/// Static triangle mesh.
pub struct Mesh {
    data: MeshData,
    handle: Option<MeshHandle>,
}

impl Mesh {
    pub fn new(data: MeshData) -> Self {
        Self { data, handle: None }
    }

    pub fn data(&self) -> &MeshData {
        &self.data
    }

    pub fn handle(&self) -> Option<MeshHandle> {
        self.handle
    }
}

impl From<MeshData> for Mesh {
    fn from(data: MeshData) -> Self {
        Mesh::new(data)
    }
}

impl Drawable for Mesh {
    fn initialize(&mut self, facade: &mut dyn RenderFacade) {
        if self.handle.is_none() {
            self.handle = Some(facade.upload_mesh(&self.data));
        }
    }

    fn draw(&self, facade: &mut dyn RenderFacade) {
        match self.handle {
            Some(handle) => facade.draw_mesh(handle),
            None => log::warn!("Mesh drawn before initialization, skipping"),
        }
    }
}
