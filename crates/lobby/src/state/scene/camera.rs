//! Scene cameras

use glam::Vec3;

use super::Scene;

pub type CameraId = String;

#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub id: CameraId,
    pub name: String,
    pub position: Vec3,
    /// Near clipping plane
    pub min_z: f32,
    /// Far clipping plane
    pub max_z: f32,
}

impl Scene {
    /// Add a camera. The first camera added becomes active.
    pub fn add_camera(&mut self, name: impl Into<String>, position: Vec3) -> CameraId {
        let id = uuid::Uuid::new_v4().to_string();
        self.cameras.push(Camera {
            id: id.clone(),
            name: name.into(),
            position,
            min_z: 0.1,
            max_z: 2000.0,
        });
        if self.active_camera.is_none() {
            self.active_camera = Some(id.clone());
        }
        self.version += 1;
        id
    }

    pub fn cameras(&self) -> &[Camera] {
        &self.cameras
    }

    pub fn camera(&self, id: &str) -> Option<&Camera> {
        self.cameras.iter().find(|c| c.id == id)
    }

    pub fn camera_mut(&mut self, id: &str) -> Option<&mut Camera> {
        self.cameras.iter_mut().find(|c| c.id == id)
    }

    pub fn active_camera_id(&self) -> Option<&CameraId> {
        self.active_camera.as_ref()
    }

    pub fn active_camera(&self) -> Option<&Camera> {
        self.active_camera.as_deref().and_then(|id| self.camera(id))
    }

    /// Switch the active camera. Returns false if the ID is unknown.
    pub fn set_active_camera(&mut self, id: &str) -> bool {
        if self.camera(id).is_none() {
            return false;
        }
        self.active_camera = Some(id.to_string());
        self.version += 1;
        true
    }
}
