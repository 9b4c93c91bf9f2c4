//! Three lit solids in a row, each facing its own light, under a distant
//! directional sun.

use std::f32::consts::PI;

use cgmath::Vector3;

use super::{light_marker, mesh_node, Scene, SceneContext};
use crate::error::SceneError;
use crate::gfx::geometry::{generate_cube, generate_cylinder, generate_sphere};
use crate::gfx::rendering::RenderingRouting;
use crate::gfx::resources::{Attenuation, Light, Material};
use crate::gfx::scene::Component;
use crate::math::{ColorType, Point};

pub const NAME: &str = "Spotlight Gallery";

pub struct SpotlightGallery {
    root: Component,
    lights: Vec<Light>,
}

pub fn build(_context: &mut SceneContext) -> Result<Box<dyn Scene>, SceneError> {
    let mut root = Component::new(&Point::xyz(0.0, 0.0, 0.0), None)?;

    let matte = Material::new(
        [0.3, 0.3, 0.3, 0.3],
        [0.2, 0.2, 0.2, 1.0],
        [0.5, 0.5, 0.5, 0.1],
        100.0,
    );
    let glow = Material::new(
        [1.0, 1.0, 1.0, 1.0],
        [0.2, 0.2, 0.2, 1.0],
        [0.2, 0.2, 0.8, 1.0],
        64.0,
    );

    let mut sphere = mesh_node([3.0, 0.0, 0.0], generate_sphere(1.0, 50, 50, ColorType::PINK))?;
    sphere.set_material(matte);
    root.add_child(sphere);

    let mut cube = mesh_node([3.0, 0.0, -3.0], generate_cube(1.0, 1.2, 1.5, ColorType::PINK))?;
    cube.set_material(matte);
    root.add_child(cube);

    let mut cylinder = mesh_node(
        [3.0, 0.0, 3.0],
        generate_cylinder(0.8, 1.0, 30, 30, ColorType::BLUE),
    )?;
    cylinder.set_material(matte);
    root.add_child(cylinder);

    let mut sun = mesh_node([0.0, 25.0, 0.0], generate_sphere(5.0, 50, 50, ColorType::YELLOW))?;
    sun.set_material(glow);
    sun.set_rendering_routing(RenderingRouting::VERTEX);
    root.add_child(sun);

    let mut center = mesh_node([0.0, 0.0, 0.0], generate_sphere(0.1, 20, 20, ColorType::BLACK))?;
    center.set_material(glow);
    center.set_rendering_routing(RenderingRouting::VERTEX);
    root.add_child(center);

    let spot_falloff = Attenuation::new(0.4, 0.5, 0.1);
    let purple = ColorType::PURPLE.with_alpha(1.0);
    let lights = vec![
        Light::spot(
            Vector3::new(0.0, 0.4, 0.0),
            purple,
            Vector3::unit_x(),
            spot_falloff,
            PI / 20.0,
        )
        .with_intensity(5.0),
        Light::point(Vector3::new(0.0, 0.4, -3.0), ColorType::GREEN.with_alpha(1.0)),
        Light::point(Vector3::new(0.0, 0.4, 3.0), ColorType::BLUE.with_alpha(1.0)),
        Light::directional(
            Vector3::new(0.0, 0.4, 3.0),
            ColorType::YELLOW.with_alpha(1.0),
            Vector3::new(0.0, 500.0, 0.0),
        )
        .with_intensity(3.0),
        Light::spot(
            Vector3::new(-1.0, 0.4, 0.0),
            purple,
            Vector3::unit_x(),
            spot_falloff,
            PI / 20.0,
        )
        .with_intensity(5.0),
    ];

    root.add_child(light_marker([0.0, 0.4, 0.0], ColorType::PURPLE)?);
    root.add_child(light_marker([0.0, 0.4, -3.0], ColorType::GREEN)?);
    root.add_child(light_marker([0.0, 0.4, 3.0], ColorType::BLUE)?);
    root.add_child(light_marker([-1.0, 0.4, 0.0], ColorType::PURPLE)?);

    Ok(Box::new(SpotlightGallery { root, lights }))
}

impl Scene for SpotlightGallery {
    fn name(&self) -> &str {
        NAME
    }

    fn root(&self) -> &Component {
        &self.root
    }

    fn root_mut(&mut self) -> &mut Component {
        &mut self.root
    }

    fn lights(&self) -> &[Light] {
        &self.lights
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenes::tests::build_and_draw;

    #[test]
    fn test_gallery_contents() {
        let (mut scene, draws) = build_and_draw(build);
        assert_eq!(scene.lights().len(), 5);
        assert_eq!(scene.lights().iter().filter(|l| l.is_spot()).count(), 2);
        assert!(scene.lights()[3].is_directional());
        // five solids and four light markers
        assert_eq!(draws, 9);
        assert!(scene.as_animatable_mut().is_none());
    }
}
