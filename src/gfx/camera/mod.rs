//! Spherical viewing camera and its mouse controller.

pub mod camera_controller;
pub mod spherical_camera;

pub use camera_controller::{CameraController, DragButton};
pub use spherical_camera::{SphericalCamera, MIN_DISTANCE};
