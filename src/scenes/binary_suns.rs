//! Two suns circling each other with textured planets on wider orbits.
//!
//! The suns carry point lights that follow them. A spotlight sits on a cube
//! near the outer orbit and a faint directional light fills from +z.

use std::f32::consts::{PI, TAU};

use cgmath::Vector3;

use super::{mesh_node, Animatable, Scene, SceneContext};
use crate::error::SceneError;
use crate::gfx::geometry::{generate_cube, generate_ellipsoid, generate_sphere, generate_torus};
use crate::gfx::rendering::RenderingRouting;
use crate::gfx::resources::{Attenuation, Light, Material};
use crate::gfx::scene::{Component, ComponentId};
use crate::math::{ColorType, Point};

pub const NAME: &str = "Binary Suns";

/// Circular orbit in the xy plane.
#[derive(Debug, Clone, Copy)]
struct Orbit {
    radius: f32,
    speed: f32,
    angle: f32,
}

impl Orbit {
    fn advance(&mut self) -> Point {
        self.angle = (self.angle + self.speed).rem_euclid(TAU);
        let (sin, cos) = self.angle.sin_cos();
        Point::xyz(self.radius * cos, self.radius * sin, 0.0)
    }
}

pub struct BinarySuns {
    root: Component,
    lights: Vec<Light>,
    suns: [(ComponentId, Orbit); 2],
    planets: [(ComponentId, Orbit); 3],
}

pub fn build(context: &mut SceneContext) -> Result<Box<dyn Scene>, SceneError> {
    let mut root = Component::new(&Point::xyz(0.0, 0.0, 0.0), None)?;
    let material = Material::new(
        [0.2, 0.2, 0.2, 0.2],
        [0.2, 0.2, 0.2, 1.0],
        [0.5, 0.5, 0.5, 1.0],
        10.0,
    );
    let textured = RenderingRouting::TEXTURE | RenderingRouting::LIGHTING;

    let mut sun_ids = Vec::with_capacity(2);
    for (position, color) in [
        ([1.0, 0.0, 0.0], ColorType::DARKORANGE1),
        ([-1.0, 0.0, 0.0], ColorType::SOFTRED),
    ] {
        let mut sun = mesh_node(position, generate_sphere(0.5, 50, 50, color))?;
        sun.set_rendering_routing(RenderingRouting::VERTEX);
        sun.set_material(material);
        sun_ids.push(root.add_child(sun));
    }

    let planet_specs = [
        ([3.0, 0.0, 0.0], generate_sphere(0.3, 50, 50, ColorType::GRAY), "stonewall.bmp"),
        (
            [4.0, 0.0, 0.0],
            generate_ellipsoid(0.4, 0.3, 0.4, 30, 30, ColorType::BLUE),
            "cloudy_sphere.bmp",
        ),
        ([5.0, 0.0, 0.0], generate_sphere(0.2, 50, 50, ColorType::NAVY), "earth.bmp"),
    ];
    let mut planet_ids = Vec::with_capacity(3);
    for (position, mesh, texture) in planet_specs {
        let mut planet = mesh_node(position, mesh)?;
        planet.set_material(material);
        planet.set_rendering_routing(textured);
        planet.set_texture(context.load_texture(texture)?);
        planet_ids.push(root.add_child(planet));
    }

    let mut ring = mesh_node([0.0, 0.0, 0.0], generate_torus(0.1, 5.0, 36, 36, ColorType::SOFTBLUE))?;
    ring.set_material(material);
    root.add_child(ring);

    let mut flashlight = mesh_node([4.9, 0.0, 0.0], generate_cube(0.2, 0.2, 0.2, ColorType::BLUE))?;
    flashlight.set_material(material);
    root.add_child(flashlight);

    let lights = vec![
        Light::point(Vector3::new(1.0, 0.0, 0.0), ColorType::YELLOW.with_alpha(0.5))
            .with_intensity(2.0),
        Light::point(Vector3::new(-1.0, 0.0, 0.0), ColorType::RED.with_alpha(0.5))
            .with_intensity(2.0),
        Light::spot(
            Vector3::new(4.9, 0.0, 0.0),
            ColorType::BLUE.with_alpha(0.5),
            -Vector3::unit_x(),
            Attenuation::new(0.1, 0.2, 0.1),
            PI / 5.0,
        )
        .with_intensity(5.0),
        Light::directional(
            Vector3::new(0.0, 0.0, 10.0),
            ColorType::SILVER.with_alpha(1.0),
            Vector3::new(0.0, 0.0, 100.0),
        )
        .with_intensity(3.0),
    ];

    let sun_orbit = |angle| Orbit {
        radius: 0.7,
        speed: 0.02,
        angle,
    };
    let planet_orbit = |radius, speed, angle| Orbit {
        radius,
        speed,
        angle,
    };

    Ok(Box::new(BinarySuns {
        root,
        lights,
        suns: [(sun_ids[0], sun_orbit(0.0)), (sun_ids[1], sun_orbit(PI))],
        planets: [
            (planet_ids[0], planet_orbit(2.0, 0.01, 0.0)),
            (planet_ids[1], planet_orbit(3.0, 0.007, 0.5 * PI)),
            (planet_ids[2], planet_orbit(4.0, 0.005, PI)),
        ],
    }))
}

impl Animatable for BinarySuns {
    fn animation_update(&mut self) {
        for (index, (id, orbit)) in self.suns.iter_mut().enumerate() {
            let position = orbit.advance();
            if let Ok(world) = Vector3::try_from(&position) {
                self.lights[index].set_position(world);
            }
            if let Some(sun) = self.root.find_mut(*id) {
                if let Err(e) = sun.set_current_position(&position) {
                    log::warn!("Failed to move sun {}: {}", id, e);
                }
            }
        }
        for (id, orbit) in self.planets.iter_mut() {
            let position = orbit.advance();
            if let Some(planet) = self.root.find_mut(*id) {
                if let Err(e) = planet.set_current_position(&position) {
                    log::warn!("Failed to move planet {}: {}", id, e);
                }
            }
        }
    }
}

impl Scene for BinarySuns {
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
