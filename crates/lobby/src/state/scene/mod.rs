//! Scene graph
//!
//! Ordered mesh and light collections plus cameras. Objects are appended in
//! creation order, which the experience lifecycle relies on when it records a
//! baseline before running a script.

mod camera;
mod display;
mod object_ops;

pub use camera::{Camera, CameraId};
pub use display::{object_display_name, object_icon, short_id};

use shared::SceneObject;

/// Scene graph shared by the lobby and whatever experience is loaded into it
#[derive(Default)]
pub struct Scene {
    pub(crate) meshes: Vec<SceneObject>,
    pub(crate) lights: Vec<SceneObject>,
    pub(crate) cameras: Vec<Camera>,
    pub(crate) active_camera: Option<CameraId>,
    /// Monotonically increasing version counter for UI cache invalidation
    pub(crate) version: u64,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current scene version (increments on every mutation)
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Bump version after mutating an object through `get_mut`
    pub fn notify_mutated(&mut self) {
        self.version += 1;
    }

    pub fn meshes(&self) -> &[SceneObject] {
        &self.meshes
    }

    pub fn lights(&self) -> &[SceneObject] {
        &self.lights
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    pub fn light_count(&self) -> usize {
        self.lights.len()
    }

    /// All meshes followed by all lights
    pub fn objects(&self) -> impl Iterator<Item = &SceneObject> {
        self.meshes.iter().chain(self.lights.iter())
    }

    pub fn objects_mut(&mut self) -> impl Iterator<Item = &mut SceneObject> {
        self.meshes.iter_mut().chain(self.lights.iter_mut())
    }

    /// Get an object by ID
    pub fn get(&self, id: &str) -> Option<&SceneObject> {
        self.objects().find(|o| o.id == id)
    }

    /// Get mutable object by ID
    pub fn get_mut(&mut self, id: &str) -> Option<&mut SceneObject> {
        self.objects_mut().find(|o| o.id == id)
    }

    /// First mesh with exactly this name
    pub fn find_mesh(&self, name: &str) -> Option<&SceneObject> {
        self.meshes.iter().find(|m| m.name == name)
    }

    /// First light with exactly this name
    pub fn find_light(&self, name: &str) -> Option<&SceneObject> {
        self.lights.iter().find(|l| l.name == name)
    }

    /// Resolve a name against meshes first, then lights
    pub fn find_by_name(&self, name: &str) -> Option<&SceneObject> {
        self.find_mesh(name).or_else(|| self.find_light(name))
    }

    /// Enable or disable an object. Returns false if the ID is unknown.
    pub fn set_enabled(&mut self, id: &str, enabled: bool) -> bool {
        let Some(obj) = self.get_mut(id) else {
            return false;
        };
        if obj.enabled != enabled {
            obj.enabled = enabled;
            self.version += 1;
        }
        true
    }

    /// Enabled state of an object, None if it is not in the scene
    pub fn is_enabled(&self, id: &str) -> Option<bool> {
        self.get(id).map(|o| o.enabled)
    }
}
