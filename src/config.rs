//! Viewer settings.

use std::path::PathBuf;

use crate::math::ColorType;

/// Which scene the viewer opens with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartScene {
    Index(usize),
    Name(String),
}

/// Window, camera and pacing settings for a [`Viewer`](crate::viewer::Viewer).
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
    /// Target frames per second.
    pub fps: u32,
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub znear: f32,
    pub zfar: f32,
    pub rotate_speed: f32,
    pub zoom_step: f32,
    pub background: ColorType,
    pub start_scene: StartScene,
    pub asset_dir: PathBuf,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            width: 500,
            height: 500,
            title: "Lantern".to_string(),
            fps: 120,
            fov: 45.0,
            znear: 0.01,
            zfar: 100.0,
            rotate_speed: 1.0,
            zoom_step: 0.1,
            background: ColorType::BLUEGREEN,
            start_scene: StartScene::Index(0),
            asset_dir: PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/assets")),
        }
    }
}

impl ViewerConfig {
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_owned();
        self
    }

    /// Zero is raised to one frame per second.
    pub fn with_fps(mut self, fps: u32) -> Self {
        self.fps = fps.max(1);
        self
    }

    pub fn with_projection(mut self, fov: f32, znear: f32, zfar: f32) -> Self {
        self.fov = fov;
        self.znear = znear;
        self.zfar = zfar;
        self
    }

    pub fn with_rotate_speed(mut self, speed: f32) -> Self {
        self.rotate_speed = speed;
        self
    }

    pub fn with_zoom_step(mut self, step: f32) -> Self {
        self.zoom_step = step;
        self
    }

    pub fn with_background(mut self, color: ColorType) -> Self {
        self.background = color;
        self
    }

    pub fn with_start_scene(mut self, scene: StartScene) -> Self {
        self.start_scene = scene;
        self
    }

    pub fn with_asset_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.asset_dir = dir.into();
        self
    }

    /// Time budget of one frame.
    pub fn frame_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs_f64(1.0 / f64::from(self.fps.max(1)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ViewerConfig::default();
        assert_eq!((config.width, config.height), (500, 500));
        assert_eq!(config.fps, 120);
        assert_eq!(config.start_scene, StartScene::Index(0));
        assert_eq!(config.background, ColorType::BLUEGREEN);
    }

    #[test]
    fn test_builders_and_frame_interval() {
        let config = ViewerConfig::default()
            .with_size(800, 600)
            .with_fps(0)
            .with_start_scene(StartScene::Name("Texture Carousel".into()));
        assert_eq!(config.width, 800);
        assert_eq!(config.fps, 1);
        assert_eq!(config.frame_interval(), std::time::Duration::from_secs(1));
        assert_eq!(
            config.start_scene,
            StartScene::Name("Texture Carousel".to_string())
        );
    }
}
