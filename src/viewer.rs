//! Frame driver tying the active scene, the camera and the render state.
//!
//! The viewer owns everything that survives a scene switch: the recorded
//! [`RenderState`], the camera and its controller, the texture unit
//! allocator, the lighting toggles and the axes gizmo. Windowing lives in
//! [`crate::app`]; this type only needs commands and input events.

use std::path::PathBuf;

use cgmath::{Matrix4, SquareMatrix};
use winit::event::WindowEvent;
use winit::keyboard::KeyCode;

use crate::config::{StartScene, ViewerConfig};
use crate::error::SceneError;
use crate::gfx::camera::{CameraController, SphericalCamera};
use crate::gfx::rendering::{LightingTerms, RenderFacade, RenderState, MAX_LIGHTS};
use crate::gfx::resources::{Light, TextureUnitAllocator};
use crate::scenes::{ModelAxes, Scene, SceneContext, SceneRegistry};

/// Light slots the number keys can switch off.
pub const LIGHT_TOGGLES: usize = 4;

/// Canvas point and depth where the axes gizmo is anchored.
const AXES_ANCHOR: [f32; 3] = [0.9, 0.1, 0.3];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerCommand {
    NextScene,
    PreviousScene,
    TogglePause,
    ToggleAmbient,
    ToggleDiffuse,
    ToggleSpecular,
    /// Slot index in `0..LIGHT_TOGGLES`.
    ToggleLight(usize),
    ResetView,
    ZoomIn,
    ZoomOut,
    Refresh,
}

impl ViewerCommand {
    pub fn from_key(key: KeyCode) -> Option<Self> {
        let command = match key {
            KeyCode::ArrowRight => Self::NextScene,
            KeyCode::ArrowLeft => Self::PreviousScene,
            KeyCode::ArrowUp => Self::ZoomIn,
            KeyCode::ArrowDown => Self::ZoomOut,
            KeyCode::KeyP => Self::TogglePause,
            KeyCode::KeyA => Self::ToggleAmbient,
            KeyCode::KeyD => Self::ToggleDiffuse,
            KeyCode::KeyS => Self::ToggleSpecular,
            KeyCode::KeyR => Self::ResetView,
            KeyCode::Enter | KeyCode::NumpadEnter => Self::Refresh,
            KeyCode::Digit1 => Self::ToggleLight(0),
            KeyCode::Digit2 => Self::ToggleLight(1),
            KeyCode::Digit3 => Self::ToggleLight(2),
            KeyCode::Digit4 => Self::ToggleLight(3),
            _ => return None,
        };
        Some(command)
    }
}

pub struct Viewer {
    registry: SceneRegistry,
    scene: Box<dyn Scene>,
    scene_index: usize,
    state: RenderState,
    camera: SphericalCamera,
    controller: CameraController,
    allocator: TextureUnitAllocator,
    asset_dir: PathBuf,
    terms: LightingTerms,
    paused: bool,
    light_enabled: [bool; LIGHT_TOGGLES],
    axes: ModelAxes,
}

impl Viewer {
    /// Viewer browsing the built-in demo scenes.
    pub fn new(config: &ViewerConfig) -> Result<Self, SceneError> {
        Self::with_registry(config, SceneRegistry::with_demo_scenes())
    }

    /// Builds the configured start scene and binds it.
    ///
    /// An unknown start scene name falls back to the first scene.
    pub fn with_registry(config: &ViewerConfig, registry: SceneRegistry) -> Result<Self, SceneError> {
        let scene_index = match &config.start_scene {
            StartScene::Index(index) => *index,
            StartScene::Name(name) => registry.index_of(name).unwrap_or_else(|| {
                log::warn!("Unknown start scene '{}', using the first scene", name);
                0
            }),
        };

        let mut allocator = TextureUnitAllocator::new();
        let scene = {
            let mut context = SceneContext::new(&mut allocator, &config.asset_dir);
            registry
                .build(scene_index, &mut context)
                .ok_or(SceneError::SceneIndex(scene_index))??
        };

        let mut state = RenderState::new();
        let mut axes = ModelAxes::new()?;
        axes.initialize(&mut state);

        let mut viewer = Self {
            registry,
            scene,
            scene_index,
            state,
            camera: SphericalCamera::new(
                config.width,
                config.height,
                config.fov,
                config.znear,
                config.zfar,
            ),
            controller: CameraController::new(config.rotate_speed, config.zoom_step),
            allocator,
            asset_dir: config.asset_dir.clone(),
            terms: LightingTerms::default(),
            paused: false,
            light_enabled: [true; LIGHT_TOGGLES],
            axes,
        };
        viewer.activate_scene();
        Ok(viewer)
    }

    pub fn state(&self) -> &RenderState {
        &self.state
    }

    pub fn camera(&self) -> &SphericalCamera {
        &self.camera
    }

    pub fn scene(&self) -> &dyn Scene {
        self.scene.as_ref()
    }

    pub fn scene_index(&self) -> usize {
        self.scene_index
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn lighting_terms(&self) -> LightingTerms {
        self.terms
    }

    pub fn light_enabled(&self, slot: usize) -> bool {
        self.light_enabled.get(slot).copied().unwrap_or(true)
    }

    /// Records one frame into the render state.
    pub fn frame(&mut self) {
        self.state.begin_frame();
        self.state
            .set_view(self.camera.view(), self.camera.projection(), self.camera.eye());
        self.state.set_lighting_terms(self.terms);

        if !self.paused {
            if let Some(animatable) = self.scene.as_animatable_mut() {
                animatable.animation_update();
                self.bind_lights();
            }
        }

        self.scene.root_mut().update_with_parent(Matrix4::identity());
        self.scene.root().draw(&mut self.state);

        let [x, y, depth] = AXES_ANCHOR;
        let anchor = self
            .camera
            .unproject(x * self.camera.width(), y * self.camera.height(), depth);
        if let Err(e) = self.axes.place(anchor) {
            log::warn!("Failed to place axes gizmo: {}", e);
        }
        self.axes.draw(&mut self.state);
    }

    /// Applies `command`. Returns true if the picture may have changed.
    pub fn handle_command(&mut self, command: ViewerCommand) -> bool {
        match command {
            ViewerCommand::NextScene => {
                let next = (self.scene_index + 1) % self.registry.len().max(1);
                self.switch_scene_logged(next);
            }
            ViewerCommand::PreviousScene => {
                let count = self.registry.len().max(1);
                let previous = (self.scene_index + count - 1) % count;
                self.switch_scene_logged(previous);
            }
            ViewerCommand::TogglePause => {
                self.paused = !self.paused;
                log::info!("Animation {}", if self.paused { "paused" } else { "resumed" });
            }
            ViewerCommand::ToggleAmbient => self.terms.ambient = !self.terms.ambient,
            ViewerCommand::ToggleDiffuse => self.terms.diffuse = !self.terms.diffuse,
            ViewerCommand::ToggleSpecular => self.terms.specular = !self.terms.specular,
            ViewerCommand::ToggleLight(slot) => {
                let Some(enabled) = self.light_enabled.get_mut(slot) else {
                    return false;
                };
                *enabled = !*enabled;
                log::info!("Light {} {}", slot + 1, if *enabled { "on" } else { "off" });
                self.bind_lights();
            }
            ViewerCommand::ResetView => self.camera.reset_view(),
            ViewerCommand::ZoomIn => self.controller.scroll(1.0, &mut self.camera),
            ViewerCommand::ZoomOut => self.controller.scroll(-1.0, &mut self.camera),
            ViewerCommand::Refresh => {
                self.scene.root_mut().update_with_parent(Matrix4::identity());
                self.bind_lights();
            }
        }
        self.state.set_lighting_terms(self.terms);
        true
    }

    /// Forwards mouse input to the camera controller.
    pub fn handle_window_event(&mut self, event: &WindowEvent) -> bool {
        self.controller.process_event(event, &mut self.camera)
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera.resize(width, height);
    }

    /// Replaces the active scene with the one at `index`.
    ///
    /// The new scene is built before anything is torn down, so on error the
    /// current scene stays fully active. On success the old scene's meshes
    /// and textures are released along with its tree.
    pub fn switch_scene(&mut self, index: usize) -> Result<(), SceneError> {
        let scene = {
            let mut context = SceneContext::new(&mut self.allocator, &self.asset_dir);
            self.registry
                .build(index, &mut context)
                .ok_or(SceneError::SceneIndex(index))??
        };
        // Gizmo meshes hold handles into the released state, so it is rebuilt.
        let mut axes = ModelAxes::new()?;

        self.scene.root_mut().clear();
        self.state.release_resources();
        axes.initialize(&mut self.state);
        self.axes = axes;
        self.scene = scene;
        self.scene_index = index;
        self.activate_scene();
        Ok(())
    }

    fn switch_scene_logged(&mut self, index: usize) {
        if let Err(e) = self.switch_scene(index) {
            log::error!(
                "Failed to load scene {}, keeping '{}': {}",
                self.registry.name(index).unwrap_or("?"),
                self.scene.name(),
                e
            );
        }
    }

    fn activate_scene(&mut self) {
        self.state.clear_all_lights();
        self.light_enabled = [true; LIGHT_TOGGLES];
        self.scene.root_mut().initialize(&mut self.state);
        self.terms.normal_mapping = self.scene.normal_mapping();
        self.state.set_lighting_terms(self.terms);
        self.bind_lights();
        log::info!(
            "Showing scene '{}' with {} lights",
            self.scene.name(),
            self.scene.lights().len()
        );
    }

    /// Writes the scene's lights into their slots, leaving toggled-off
    /// slots dark.
    fn bind_lights(&mut self) {
        let off = Light::off();
        for (slot, light) in self.scene.lights().iter().enumerate().take(MAX_LIGHTS) {
            if self.light_enabled.get(slot).copied().unwrap_or(true) {
                self.state.set_light(slot, light);
            } else {
                self.state.set_light(slot, &off);
            }
        }
    }
}
