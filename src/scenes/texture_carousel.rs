//! Textured sphere and torus lit by three lights circling on tilted rings.

use cgmath::{Matrix4, Vector3, Vector4};

use super::{light_marker, mesh_node, Animatable, Scene, SceneContext};
use crate::error::SceneError;
use crate::gfx::geometry::{generate_sphere, generate_torus};
use crate::gfx::rendering::RenderingRouting;
use crate::gfx::resources::{Light, Material};
use crate::gfx::scene::{Component, ComponentId};
use crate::math::{rotate, translate, ColorType, Point};

pub const NAME: &str = "Texture Carousel";

const RING_RADIUS: f32 = 3.0;

/// A light travelling around a circle of radius 3 in the xz plane, carried
/// into place by `placement`. Angles are in degrees.
struct Carousel {
    marker: ComponentId,
    placement: Matrix4<f32>,
    angle: f32,
    step: f32,
}

fn ring_position(placement: &Matrix4<f32>, angle: f32) -> Vector3<f32> {
    let (sin, cos) = angle.to_radians().sin_cos();
    let local = Vector4::new(RING_RADIUS * cos, 0.0, RING_RADIUS * sin, 1.0);
    (placement * local).truncate()
}

pub struct TextureCarousel {
    root: Component,
    lights: Vec<Light>,
    carousels: Vec<Carousel>,
}

pub fn build(context: &mut SceneContext) -> Result<Box<dyn Scene>, SceneError> {
    let mut root = Component::new(&Point::xyz(0.0, 0.0, 0.0), None)?;
    let textured = RenderingRouting::TEXTURE | RenderingRouting::LIGHTING;

    let mut sphere = mesh_node([-1.0, 0.0, 0.0], generate_sphere(1.0, 50, 50, ColorType::RED))?;
    sphere.set_material(Material::new(
        [0.1, 0.1, 0.1, 0.1],
        [0.2, 0.2, 0.2, 1.0],
        [0.4, 0.4, 0.4, 0.1],
        64.0,
    ));
    sphere.set_rendering_routing(textured);
    sphere.set_texture(context.load_texture("earth.bmp")?);
    root.add_child(sphere);

    let mut torus = mesh_node(
        [1.0, 0.0, 0.0],
        generate_torus(0.25, 0.5, 36, 36, ColorType::YELLOW),
    )?;
    torus.set_material(Material::new(
        [0.1, 0.1, 0.1, 0.1],
        [0.2, 0.2, 0.2, 1.0],
        [0.3, 0.3, 0.3, 1.0],
        64.0,
    ));
    torus.set_rendering_routing(textured);
    let u = torus.u_axis();
    torus.rotate(90.0, u)?;
    torus.set_texture(context.load_texture("marble.bmp")?);
    root.add_child(torus);

    let specs = [
        (translate(0.0, 2.0, 0.0), 0.5, ColorType::SOFTRED),
        (rotate(60.0, Vector3::unit_z()), 0.7, ColorType::SOFTBLUE),
        (rotate(120.0, Vector3::unit_z()), 1.0, ColorType::SOFTGREEN),
    ];
    let mut lights = Vec::with_capacity(specs.len());
    let mut carousels = Vec::with_capacity(specs.len());
    for (placement, step, color) in specs {
        let position = ring_position(&placement, 0.0);
        let marker = root.add_child(light_marker(position.into(), color)?);
        lights.push(Light::point(position, color.with_alpha(1.0)));
        carousels.push(Carousel {
            marker,
            placement,
            angle: 0.0,
            step,
        });
    }

    Ok(Box::new(TextureCarousel {
        root,
        lights,
        carousels,
    }))
}

impl Animatable for TextureCarousel {
    fn animation_update(&mut self) {
        for (carousel, light) in self.carousels.iter_mut().zip(self.lights.iter_mut()) {
            carousel.angle = (carousel.angle + carousel.step).rem_euclid(360.0);
            let position = ring_position(&carousel.placement, carousel.angle);
            light.set_position(position);
            if let Some(marker) = self.root.find_mut(carousel.marker) {
                if let Err(e) = marker.set_current_position(&Point::from(position)) {
                    log::warn!("Failed to move light marker {}: {}", carousel.marker, e);
                }
            }
        }
    }
}

impl Scene for TextureCarousel {
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

    fn as_animatable_mut(&mut self) -> Option<&mut dyn Animatable> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenes::tests::build_and_draw;
    use cgmath::InnerSpace;

    #[test]
    fn test_lights_start_on_their_rings() {
        let (scene, draws) = build_and_draw(build);
        assert_eq!(scene.lights().len(), 3);
        assert_eq!(draws, 5);
        assert!((scene.lights()[0].position() - Vector3::new(3.0, 2.0, 0.0)).magnitude() < 1e-5);
        // (3, 0, 0) turned 60 degrees about z
        let expected = Vector3::new(1.5, 3.0 * 60f32.to_radians().sin(), 0.0);
        assert!((scene.lights()[1].position() - expected).magnitude() < 1e-4);
    }

    #[test]
    fn test_markers_track_lights() {
        let (mut scene, _) = build_and_draw(build);
        for _ in 0..90 {
            scene.as_animatable_mut().expect("carousel animates").animation_update();
        }
        for (index, light) in scene.lights().iter().enumerate() {
            let marker = &scene.root().children()[2 + index];
            assert!((marker.world_position() - light.position()).magnitude() < 1e-4);
        }
        // 90 steps of 1 degree put the third light a quarter turn around
        let z = scene.lights()[2].position().z;
        assert!((z - 3.0).abs() < 1e-3);
    }
}
