//! Object create / rename / dispose

use shared::{LightKind, Metadata, ObjectId, ObjectKind, SceneObject, Shape};

use super::Scene;

impl Scene {
    /// Create a mesh and return its ID
    pub fn create_mesh(&mut self, name: impl Into<String>, shape: Shape, position: [f32; 3]) -> ObjectId {
        self.insert(SceneObject {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            kind: ObjectKind::Mesh { shape },
            position,
            enabled: true,
            metadata: Metadata::new(),
        })
    }

    /// Create a light and return its ID
    pub fn create_light(
        &mut self,
        name: impl Into<String>,
        light: LightKind,
        position: [f32; 3],
    ) -> ObjectId {
        self.insert(SceneObject {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            kind: ObjectKind::Light { light },
            position,
            enabled: true,
            metadata: Metadata::new(),
        })
    }

    /// Append a prepared object to the mesh or light collection by its kind
    pub fn insert(&mut self, object: SceneObject) -> ObjectId {
        let id = object.id.clone();
        if object.is_mesh() {
            self.meshes.push(object);
        } else {
            self.lights.push(object);
        }
        self.version += 1;
        id
    }

    /// Rename an object. Returns false if the ID is unknown.
    pub fn rename(&mut self, id: &str, name: impl Into<String>) -> bool {
        let Some(obj) = self.get_mut(id) else {
            return false;
        };
        obj.name = name.into();
        self.version += 1;
        true
    }

    /// Remove an object from the scene graph and hand it back
    pub fn dispose(&mut self, id: &str) -> Option<SceneObject> {
        let removed = if let Some(pos) = self.meshes.iter().position(|m| m.id == id) {
            Some(self.meshes.remove(pos))
        } else if let Some(pos) = self.lights.iter().position(|l| l.id == id) {
            Some(self.lights.remove(pos))
        } else {
            None
        };
        if removed.is_some() {
            self.version += 1;
        }
        removed
    }

    /// Dispose every object matching the predicate, returning the removed objects
    pub fn dispose_where(&mut self, mut pred: impl FnMut(&SceneObject) -> bool) -> Vec<SceneObject> {
        let mut removed = Vec::new();
        for list in [&mut self.meshes, &mut self.lights] {
            let mut kept = Vec::with_capacity(list.len());
            for obj in list.drain(..) {
                if pred(&obj) {
                    removed.push(obj);
                } else {
                    kept.push(obj);
                }
            }
            *list = kept;
        }
        if !removed.is_empty() {
            self.version += 1;
        }
        removed
    }

    /// Remove all meshes and lights (cameras are kept)
    pub fn clear(&mut self) {
        self.meshes.clear();
        self.lights.clear();
        self.version += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box() -> Shape {
        Shape::Box { width: 1.0, height: 1.0, depth: 1.0 }
    }

    #[test]
    fn test_create_keeps_kinds_apart() {
        let mut s = Scene::new();
        s.create_mesh("a", unit_box(), [0.0; 3]);
        s.create_light("sun", LightKind::Point { intensity: 1.0 }, [0.0, 5.0, 0.0]);
        assert_eq!(s.mesh_count(), 1);
        assert_eq!(s.light_count(), 1);
        assert_eq!(s.objects().count(), 2);
    }

    #[test]
    fn test_creation_order_is_append_only() {
        let mut s = Scene::new();
        let a = s.create_mesh("a", unit_box(), [0.0; 3]);
        let b = s.create_mesh("b", unit_box(), [0.0; 3]);
        assert_eq!(s.meshes()[0].id, a);
        assert_eq!(s.meshes()[1].id, b);
    }

    #[test]
    fn test_rename_and_find() {
        let mut s = Scene::new();
        let id = s.create_mesh("old", unit_box(), [0.0; 3]);
        assert!(s.rename(&id, "new"));
        assert!(s.find_mesh("old").is_none());
        assert_eq!(s.find_by_name("new").unwrap().id, id);
        assert!(!s.rename("missing", "x"));
    }

    #[test]
    fn test_dispose_mesh_and_light() {
        let mut s = Scene::new();
        let m = s.create_mesh("m", unit_box(), [0.0; 3]);
        let l = s.create_light("l", LightKind::Point { intensity: 1.0 }, [0.0; 3]);
        assert_eq!(s.dispose(&m).unwrap().name, "m");
        assert_eq!(s.dispose(&l).unwrap().name, "l");
        assert!(s.dispose(&m).is_none());
        assert_eq!(s.objects().count(), 0);
    }

    #[test]
    fn test_dispose_where() {
        let mut s = Scene::new();
        s.create_mesh("keep", unit_box(), [0.0; 3]);
        s.create_mesh("drop_1", unit_box(), [0.0; 3]);
        s.create_light("drop_2", LightKind::Point { intensity: 1.0 }, [0.0; 3]);
        let removed = s.dispose_where(|o| o.name.starts_with("drop"));
        assert_eq!(removed.len(), 2);
        assert_eq!(s.mesh_count(), 1);
        assert_eq!(s.light_count(), 0);
    }

    #[test]
    fn test_set_enabled_bumps_version_only_on_change() {
        let mut s = Scene::new();
        let id = s.create_mesh("m", unit_box(), [0.0; 3]);
        let v = s.version();
        assert!(s.set_enabled(&id, true));
        assert_eq!(s.version(), v);
        assert!(s.set_enabled(&id, false));
        assert_eq!(s.version(), v + 1);
        assert_eq!(s.is_enabled(&id), Some(false));
        assert!(!s.set_enabled("missing", false));
    }
}
