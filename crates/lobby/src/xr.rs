//! XR session model: session state, controllers, motion controllers.
//!
//! The XR device itself is outside this crate. A device publishes each
//! motion controller's gamepad buttons on a `watch` channel; everything in
//! here only reads from it.

use tokio::sync::watch;

use crate::state::scene::{CameraId, Scene};

/// WebXR-style session state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum XrState {
    #[default]
    NotInXr,
    EnteringXr,
    InXr,
    ExitingXr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handedness {
    Left,
    Right,
    None,
}

/// Motion controller with a gamepad-like button array (`pressed` per index)
#[derive(Debug, Clone)]
pub struct MotionController {
    pub id: String,
    pub handedness: Handedness,
    buttons: watch::Receiver<Vec<bool>>,
}

impl MotionController {
    pub fn new(id: impl Into<String>, handedness: Handedness, buttons: watch::Receiver<Vec<bool>>) -> Self {
        Self {
            id: id.into(),
            handedness,
            buttons,
        }
    }

    pub fn button_count(&self) -> usize {
        self.buttons.borrow().len()
    }

    pub fn pressed(&self, index: usize) -> bool {
        self.buttons.borrow().get(index).copied().unwrap_or(false)
    }

    /// Current button array (copied out of the channel)
    pub fn buttons(&self) -> Vec<bool> {
        self.buttons.borrow().clone()
    }

    /// Fresh receiver for a polling task
    pub fn subscribe(&self) -> watch::Receiver<Vec<bool>> {
        self.buttons.clone()
    }
}

/// Create a simulated gamepad: the sender side plays the device
pub fn gamepad(button_count: usize) -> (watch::Sender<Vec<bool>>, watch::Receiver<Vec<bool>>) {
    watch::channel(vec![false; button_count])
}

/// Connected XR input source. The motion controller shows up once the
/// device profile has loaded, so it may be missing.
#[derive(Debug, Clone)]
pub struct XrController {
    pub id: String,
    pub motion_controller: Option<MotionController>,
}

/// XR helper handed to experiences
pub struct XrHelper {
    state: XrState,
    controllers: Vec<XrController>,
    xr_camera: CameraId,
    desktop_camera: Option<CameraId>,
}

impl XrHelper {
    /// Set up XR on a scene. The scene's active camera is remembered as the
    /// desktop camera; a dedicated XR camera is added next to it.
    pub fn new(scene: &mut Scene) -> Self {
        let desktop_camera = scene.active_camera_id().cloned();
        let position = scene
            .active_camera()
            .map(|c| c.position)
            .unwrap_or(glam::Vec3::ZERO);
        let xr_camera = scene.add_camera("webxr_camera", position);
        if let Some(id) = &desktop_camera {
            scene.set_active_camera(id);
        }
        tracing::info!("XR helper ready");
        Self {
            state: XrState::NotInXr,
            controllers: Vec::new(),
            xr_camera,
            desktop_camera,
        }
    }

    pub fn state(&self) -> XrState {
        self.state
    }

    pub fn xr_camera_id(&self) -> &CameraId {
        &self.xr_camera
    }

    pub fn controllers(&self) -> &[XrController] {
        &self.controllers
    }

    pub fn add_controller(&mut self, controller: XrController) {
        tracing::info!(
            "Controller added: {} (motion controller: {})",
            controller.id,
            controller.motion_controller.is_some()
        );
        self.controllers.push(controller);
    }

    /// Attach a motion controller to an already connected controller
    pub fn init_motion_controller(&mut self, controller_id: &str, motion_controller: MotionController) -> bool {
        let Some(c) = self.controllers.iter_mut().find(|c| c.id == controller_id) else {
            return false;
        };
        tracing::info!("Motion controller initialized: {}", motion_controller.id);
        c.motion_controller = Some(motion_controller);
        true
    }

    /// Motion controller of the first connected controller, if it has one
    pub fn first_motion_controller(&self) -> Option<&MotionController> {
        self.controllers.first()?.motion_controller.as_ref()
    }

    /// Apply a session state change. Entering XR makes the XR camera active,
    /// leaving XR reverts to the desktop camera.
    pub fn set_state(&mut self, state: XrState, scene: &mut Scene) {
        if self.state == state {
            return;
        }
        self.state = state;
        match state {
            XrState::InXr => {
                if let Some(active) = scene.active_camera_id() {
                    if *active != self.xr_camera {
                        self.desktop_camera = Some(active.clone());
                    }
                }
                scene.set_active_camera(&self.xr_camera);
                tracing::info!("Entered XR");
            }
            XrState::NotInXr => {
                if let Some(id) = &self.desktop_camera {
                    scene.set_active_camera(id);
                }
                tracing::info!("Left XR");
            }
            XrState::EnteringXr | XrState::ExitingXr => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn scene_with_camera() -> (Scene, CameraId) {
        let mut scene = Scene::new();
        let cam = scene.add_camera("camera", Vec3::new(0.0, 2.0, -4.0));
        (scene, cam)
    }

    #[test]
    fn test_new_keeps_desktop_camera_active() {
        let (mut scene, cam) = scene_with_camera();
        let xr = XrHelper::new(&mut scene);
        assert_eq!(scene.active_camera_id(), Some(&cam));
        assert_ne!(xr.xr_camera_id(), &cam);
        assert_eq!(scene.camera(xr.xr_camera_id()).unwrap().position, Vec3::new(0.0, 2.0, -4.0));
    }

    #[test]
    fn test_state_change_swaps_camera() {
        let (mut scene, cam) = scene_with_camera();
        let mut xr = XrHelper::new(&mut scene);

        xr.set_state(XrState::EnteringXr, &mut scene);
        assert_eq!(scene.active_camera_id(), Some(&cam));

        xr.set_state(XrState::InXr, &mut scene);
        assert_eq!(scene.active_camera_id(), Some(xr.xr_camera_id()));

        xr.set_state(XrState::NotInXr, &mut scene);
        assert_eq!(scene.active_camera_id(), Some(&cam));
    }

    #[test]
    fn test_first_motion_controller() {
        let (mut scene, _) = scene_with_camera();
        let mut xr = XrHelper::new(&mut scene);
        assert!(xr.first_motion_controller().is_none());

        xr.add_controller(XrController { id: "left".into(), motion_controller: None });
        assert!(xr.first_motion_controller().is_none());

        let (_tx, rx) = gamepad(6);
        assert!(xr.init_motion_controller("left", MotionController::new("mc-left", Handedness::Left, rx)));
        let mc = xr.first_motion_controller().unwrap();
        assert_eq!(mc.button_count(), 6);
        assert!(!xr.init_motion_controller("missing", mc.clone()));
    }

    #[test]
    fn test_motion_controller_reads_device_state() {
        let (tx, rx) = gamepad(6);
        let mc = MotionController::new("mc", Handedness::Right, rx);
        assert!(!mc.pressed(5));
        tx.send_modify(|b| b[5] = true);
        assert!(mc.pressed(5));
        assert!(!mc.pressed(42));
    }
}
