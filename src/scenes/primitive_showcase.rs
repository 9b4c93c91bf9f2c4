//! One of each lit primitive around the origin, with a normal-mapped sphere.

use std::f32::consts::PI;

use cgmath::Vector3;

use super::{light_marker, mesh_node, Scene, SceneContext};
use crate::error::SceneError;
use crate::gfx::geometry::{generate_cylinder, generate_ellipsoid, generate_sphere, generate_torus};
use crate::gfx::rendering::RenderingRouting;
use crate::gfx::resources::{Attenuation, Light, Material};
use crate::gfx::scene::Component;
use crate::math::{ColorType, Point};

pub const NAME: &str = "Primitive Showcase";

pub struct PrimitiveShowcase {
    root: Component,
    lights: Vec<Light>,
}

pub fn build(context: &mut SceneContext) -> Result<Box<dyn Scene>, SceneError> {
    let mut root = Component::new(&Point::xyz(0.0, 0.0, 0.0), None)?;

    let satin = Material::new(
        [0.2, 0.2, 0.2, 0.2],
        [0.2, 0.2, 0.2, 1.0],
        [0.5, 0.5, 0.5, 1.0],
        64.0,
    );

    let mut sphere = mesh_node([0.0, 3.0, 0.0], generate_sphere(1.0, 50, 50, ColorType::ORANGE))?;
    sphere.set_material(satin);
    sphere.set_rendering_routing(RenderingRouting::LIGHTING);
    sphere.set_texture(context.load_texture("normalmap.bmp")?);
    root.add_child(sphere);

    let mut torus = mesh_node(
        [-3.0, 0.0, 0.0],
        generate_torus(0.25, 0.5, 36, 36, ColorType::SOFTBLUE),
    )?;
    torus.set_material(satin);
    torus.set_rendering_routing(RenderingRouting::LIGHTING);
    root.add_child(torus);

    let mut ellipsoid = mesh_node(
        [0.0, 0.0, 3.0],
        generate_ellipsoid(0.6, 0.8, 1.0, 36, 36, ColorType::BLUE),
    )?;
    ellipsoid.set_material(satin);
    ellipsoid.set_rendering_routing(RenderingRouting::LIGHTING);
    root.add_child(ellipsoid);

    let mut cylinder = mesh_node(
        [3.0, 0.0, 0.0],
        generate_cylinder(0.5, 1.0, 36, 36, ColorType::BLUE),
    )?;
    cylinder.set_material(satin);
    cylinder.set_rendering_routing(RenderingRouting::LIGHTING);
    root.add_child(cylinder);

    let point_position = Vector3::new(0.0, 1.5, 0.0);
    let spot_position = Vector3::new(2.0, 3.0, 0.0);
    root.add_child(light_marker(point_position.into(), ColorType::RED)?);
    root.add_child(light_marker(spot_position.into(), ColorType::GREEN)?);

    let lights = vec![
        Light::point(point_position, ColorType::SOFTRED.with_alpha(1.0)),
        Light::spot(
            spot_position,
            ColorType::SOFTGREEN.with_alpha(1.0),
            Vector3::new(-1.0, 0.0, 0.0),
            Attenuation::new(0.1, 0.1, 0.0),
            PI / 3.0,
        ),
        Light::directional(
            Vector3::new(0.0, 1.0, 0.0),
            ColorType::YELLOW.with_alpha(1.0),
            Vector3::new(0.0, 10.0, 0.0),
        )
        .with_intensity(3.0),
    ];

    Ok(Box::new(PrimitiveShowcase { root, lights }))
}

impl Scene for PrimitiveShowcase {
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

    fn normal_mapping(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenes::tests::build_and_draw;

    #[test]
    fn test_showcase_contents() {
        let (mut scene, draws) = build_and_draw(build);
        assert_eq!(draws, 6);
        assert!(scene.normal_mapping());
        assert!(scene.as_animatable_mut().is_none());

        let lights = scene.lights();
        assert_eq!(lights.len(), 3);
        assert!(lights[1].is_spot());
        assert!(lights[2].is_directional());
    }

    #[test]
    fn test_only_the_sphere_carries_the_normal_map() {
        let (scene, _) = build_and_draw(build);
        let children = scene.root().children();
        assert!(children[0].texture().is_some());
        assert!(children[1..].iter().all(|c| c.texture().is_none()));
        assert!(children[..4]
            .iter()
            .all(|c| c.routing() == RenderingRouting::LIGHTING));
        assert_eq!(children[4].routing(), RenderingRouting::VERTEX);
    }
}
