//! Orientation gizmo: three colored bars along world x, y and z.

use cgmath::Vector3;

use super::mesh_node;
use crate::error::SceneError;
use crate::gfx::geometry::generate_cube;
use crate::gfx::rendering::{RenderFacade, RenderingRouting};
use crate::gfx::scene::Component;
use crate::math::{ColorType, Point};

const BAR_THICKNESS: f32 = 0.05;
const BAR_LENGTH: f32 = 2.0;

/// Axes gizmo drawn on top of every scene.
///
/// The bars start at the gizmo origin, so moving it with [`ModelAxes::place`]
/// moves the corner the three axes share.
pub struct ModelAxes {
    root: Component,
}

impl ModelAxes {
    pub fn new() -> Result<Self, SceneError> {
        let mut root = Component::new(&Point::xyz(0.0, 0.0, 0.0), None)?;

        // Cubes are built along z; x and y bars are turned into place.
        let mut x = bar([1.0, 0.0, 0.0], ColorType::SOFTRED)?;
        let v = x.v_axis();
        x.set_default_angle(90.0, v)?;

        let mut y = bar([0.0, 1.0, 0.0], ColorType::SOFTGREEN)?;
        let u = y.u_axis();
        y.set_default_angle(-90.0, u)?;

        let z = bar([0.0, 0.0, 1.0], ColorType::SOFTBLUE)?;

        root.add_child(x);
        root.add_child(y);
        root.add_child(z);
        Ok(Self { root })
    }

    pub fn root(&self) -> &Component {
        &self.root
    }

    pub fn initialize(&mut self, facade: &mut dyn RenderFacade) {
        self.root.initialize(facade);
    }

    /// Moves the gizmo origin to `position` in world space.
    pub fn place(&mut self, position: Vector3<f32>) -> Result<(), SceneError> {
        self.root.set_current_position(&Point::from(position))
    }

    pub fn draw(&self, facade: &mut dyn RenderFacade) {
        self.root.draw(facade);
    }
}

fn bar(position: [f32; 3], color: ColorType) -> Result<Component, SceneError> {
    let mut bar = mesh_node(
        position,
        generate_cube(BAR_THICKNESS, BAR_THICKNESS, BAR_LENGTH, color),
    )?;
    bar.set_rendering_routing(RenderingRouting::VERTEX);
    Ok(bar)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::rendering::RenderState;
    use cgmath::{InnerSpace, Vector4};

    fn far_end(bar: &Component) -> Vector3<f32> {
        (bar.transform() * Vector4::new(0.0, 0.0, 1.0, 1.0)).truncate()
    }

    #[test]
    fn test_bars_point_along_world_axes() {
        let mut axes = ModelAxes::new().unwrap();
        axes.initialize(&mut RenderState::new());
        let bars = axes.root().children();
        assert!((far_end(&bars[0]) - Vector3::new(2.0, 0.0, 0.0)).magnitude() < 1e-5);
        assert!((far_end(&bars[1]) - Vector3::new(0.0, 2.0, 0.0)).magnitude() < 1e-5);
        assert!((far_end(&bars[2]) - Vector3::new(0.0, 0.0, 2.0)).magnitude() < 1e-5);
    }

    #[test]
    fn test_place_moves_every_bar() {
        let mut axes = ModelAxes::new().unwrap();
        let mut state = RenderState::new();
        axes.initialize(&mut state);
        axes.place(Vector3::new(1.0, 2.0, 3.0)).unwrap();

        let x = &axes.root().children()[0];
        assert!((x.world_position() - Vector3::new(2.0, 2.0, 3.0)).magnitude() < 1e-5);

        axes.draw(&mut state);
        assert_eq!(state.commands().len(), 3);
        assert!(state
            .commands()
            .iter()
            .all(|c| c.routing == RenderingRouting::VERTEX));
    }
}
