use winit::{
    dpi::PhysicalPosition,
    event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent},
};

use super::spherical_camera::SphericalCamera;

/// Pan speed at the default camera distance of 6.
const PAN_FACTOR: f32 = 0.185;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragButton {
    Left,
    Middle,
    Right,
}

/// Turns mouse input into camera motion.
///
/// Left drag orbits, middle or right drag pans the look-at point and the
/// wheel zooms. Positions are canvas pixels with a bottom-left origin. The
/// first motion sample of a drag only records a reference point.
#[derive(Debug, Clone)]
pub struct CameraController {
    pub rotate_speed: f32,
    pub zoom_step: f32,
    left_down: bool,
    middle_down: bool,
    right_down: bool,
    dragging: bool,
    last_left: [f32; 2],
    last_pan: [f32; 2],
    cursor: [f32; 2],
}

impl Default for CameraController {
    fn default() -> Self {
        Self::new(1.0, 0.1)
    }
}

impl CameraController {
    pub fn new(rotate_speed: f32, zoom_step: f32) -> Self {
        Self {
            rotate_speed,
            zoom_step,
            left_down: false,
            middle_down: false,
            right_down: false,
            dragging: false,
            last_left: [0.0; 2],
            last_pan: [0.0; 2],
            cursor: [0.0; 2],
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn press(&mut self, button: DragButton) {
        match button {
            DragButton::Left => self.left_down = true,
            DragButton::Middle => self.middle_down = true,
            DragButton::Right => self.right_down = true,
        }
    }

    /// Releasing the left button records the cursor as the click point.
    pub fn release(&mut self, button: DragButton) {
        match button {
            DragButton::Left => {
                self.left_down = false;
                self.last_left = self.cursor;
            }
            DragButton::Middle => self.middle_down = false,
            DragButton::Right => self.right_down = false,
        }
    }

    /// Handles a cursor move to canvas `(x, y)`.
    pub fn motion(&mut self, x: f32, y: f32, camera: &mut SphericalCamera) {
        self.cursor = [x, y];
        if !(self.left_down || self.middle_down || self.right_down) {
            self.dragging = false;
            return;
        }
        let new_drag = !self.dragging;
        self.dragging = true;

        if self.left_down {
            self.orbit(x, y, new_drag, camera);
        } else {
            self.pan(x, y, new_drag, camera);
        }
    }

    fn orbit(&mut self, x: f32, y: f32, new_drag: bool, camera: &mut SphericalCamera) {
        if !new_drag {
            let dx = x - self.last_left[0];
            let dy = y - self.last_left[1];
            camera.set_phi(camera.phi() - dy / 50.0);
            camera.set_theta(camera.theta() + dx / 100.0 * self.rotate_speed);
        }
        self.last_left = [x, y];
    }

    fn pan(&mut self, x: f32, y: f32, new_drag: bool, camera: &mut SphericalCamera) {
        if new_drag {
            self.last_pan = [x, y];
            return;
        }
        let previous = camera.unproject(self.last_pan[0], self.last_pan[1], 0.5);
        self.last_pan = [x, y];
        let current = camera.unproject(x, y, 0.5);
        let speed = PAN_FACTOR * camera.distance() / 6.0;
        camera.set_look_at(camera.look_at() - (current - previous) * speed);
    }

    /// Only the sign of `delta` matters; positive zooms in.
    pub fn scroll(&mut self, delta: f32, camera: &mut SphericalCamera) {
        if delta == 0.0 {
            return;
        }
        camera.set_distance(camera.distance() - delta.signum() * self.zoom_step);
    }

    /// Feeds a winit window event. Returns true if the camera may have moved.
    pub fn process_event(&mut self, event: &WindowEvent, camera: &mut SphericalCamera) -> bool {
        match event {
            WindowEvent::MouseInput { state, button, .. } => {
                let button = match button {
                    MouseButton::Left => DragButton::Left,
                    MouseButton::Middle => DragButton::Middle,
                    MouseButton::Right => DragButton::Right,
                    _ => return false,
                };
                match state {
                    ElementState::Pressed => self.press(button),
                    ElementState::Released => self.release(button),
                }
                false
            }
            WindowEvent::CursorMoved { position, .. } => {
                // winit reports a top-left origin
                let x = position.x as f32;
                let y = camera.height() - position.y as f32;
                self.motion(x, y, camera);
                self.dragging
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let amount = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(PhysicalPosition { y, .. }) => *y as f32,
                };
                self.scroll(amount, camera);
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{InnerSpace, Vector3};

    fn camera() -> SphericalCamera {
        SphericalCamera::new(500, 500, 45.0, 0.01, 100.0)
    }

    #[test]
    fn test_first_drag_sample_does_not_move_camera() {
        let mut cam = camera();
        let mut controller = CameraController::default();
        controller.press(DragButton::Left);
        let (theta, phi) = (cam.theta(), cam.phi());

        controller.motion(400.0, 100.0, &mut cam);
        assert_eq!((cam.theta(), cam.phi()), (theta, phi));

        controller.motion(450.0, 110.0, &mut cam);
        assert!((cam.theta() - (theta + 0.5)).abs() < 1e-5);
        assert!((cam.phi() - (phi - 0.2)).abs() < 1e-5);
    }

    #[test]
    fn test_new_gesture_after_release_starts_fresh() {
        let mut cam = camera();
        let mut controller = CameraController::default();
        controller.press(DragButton::Left);
        controller.motion(10.0, 10.0, &mut cam);
        controller.release(DragButton::Left);
        controller.motion(300.0, 300.0, &mut cam);
        assert!(!controller.is_dragging());

        let theta = cam.theta();
        controller.press(DragButton::Left);
        controller.motion(300.0, 300.0, &mut cam);
        assert_eq!(cam.theta(), theta);
    }

    #[test]
    fn test_vertical_drag_clamps_at_pole() {
        let mut cam = camera();
        let mut controller = CameraController::default();
        controller.press(DragButton::Left);
        controller.motion(0.0, 1000.0, &mut cam);
        controller.motion(0.0, 0.0, &mut cam);
        assert_eq!(cam.phi(), std::f32::consts::FRAC_PI_2);
    }

    #[test]
    fn test_pan_moves_look_at_against_drag() {
        let mut cam = camera();
        let mut controller = CameraController::default();
        controller.press(DragButton::Right);
        controller.motion(250.0, 250.0, &mut cam);
        assert_eq!(cam.look_at(), Vector3::new(0.0, 0.0, 0.0));

        let before = cam.unproject(250.0, 250.0, 0.5);
        let after = cam.unproject(300.0, 250.0, 0.5);
        controller.motion(300.0, 250.0, &mut cam);
        let expected = -(after - before) * 0.185;
        assert!((cam.look_at() - expected).magnitude() < 1e-4);
    }

    #[test]
    fn test_pan_speed_scales_with_distance() {
        let mut cam = camera();
        cam.set_distance(12.0);
        let mut controller = CameraController::default();
        controller.press(DragButton::Middle);
        controller.motion(250.0, 250.0, &mut cam);

        let before = cam.unproject(250.0, 250.0, 0.5);
        let after = cam.unproject(250.0, 300.0, 0.5);
        controller.motion(250.0, 300.0, &mut cam);
        // twice the default distance pans at twice the base speed
        let expected = -(after - before) * 0.185 * 2.0;
        assert!((cam.look_at() - expected).magnitude() < 1e-4);
    }

    #[test]
    fn test_scroll_zooms_by_step_with_floor() {
        let mut cam = camera();
        let mut controller = CameraController::default();
        controller.scroll(120.0, &mut cam);
        assert!((cam.distance() - 5.9).abs() < 1e-5);
        controller.scroll(-3.0, &mut cam);
        assert!((cam.distance() - 6.0).abs() < 1e-5);

        cam.set_distance(0.05);
        controller.scroll(1.0, &mut cam);
        assert_eq!(cam.distance(), 0.01);
    }
}
