//! Lobby hide / restore

use serde::{Deserialize, Serialize};
use shared::ObjectId;

use crate::state::scene::Scene;

/// Names that identify lobby content in the scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LobbyLayout {
    /// Every mesh whose name starts with this belongs to the lobby
    pub mesh_prefix: String,
    /// Name of the lobby's directional light
    pub directional_light: String,
    /// Name of the skybox mesh
    pub skybox: String,
}

impl Default for LobbyLayout {
    fn default() -> Self {
        Self {
            mesh_prefix: "lobby".to_string(),
            directional_light: "lobby_dirLight".to_string(),
            skybox: "skyBox".to_string(),
        }
    }
}

/// Lobby objects and their enabled state at capture time
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LobbySnapshot {
    meshes: Vec<(ObjectId, bool)>,
    directional_light: Option<(ObjectId, bool)>,
    skybox: Option<(ObjectId, bool)>,
}

impl LobbySnapshot {
    pub fn capture(scene: &Scene, layout: &LobbyLayout) -> Self {
        let entry = |obj: &shared::SceneObject| (obj.id.clone(), obj.enabled);
        Self {
            meshes: scene
                .meshes()
                .iter()
                .filter(|m| m.name.starts_with(&layout.mesh_prefix))
                .map(entry)
                .collect(),
            directional_light: scene.find_light(&layout.directional_light).map(entry),
            skybox: scene.find_mesh(&layout.skybox).map(entry),
        }
    }

    pub fn mesh_ids(&self) -> impl Iterator<Item = &ObjectId> {
        self.meshes.iter().map(|(id, _)| id)
    }

    pub fn directional_light(&self) -> Option<&ObjectId> {
        self.directional_light.as_ref().map(|(id, _)| id)
    }

    pub fn skybox(&self) -> Option<&ObjectId> {
        self.skybox.as_ref().map(|(id, _)| id)
    }

    /// Number of captured objects
    pub fn len(&self) -> usize {
        self.meshes.len()
            + usize::from(self.directional_light.is_some())
            + usize::from(self.skybox.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Take enabled states from an earlier snapshot for objects it also captured.
    /// Used when a failed load left the lobby hidden.
    pub fn inherit(mut self, earlier: &LobbySnapshot) -> Self {
        let lookup = |id: &ObjectId| earlier.entries().find(|(e, _)| e == id).map(|(_, on)| *on);
        for (id, enabled) in self
            .meshes
            .iter_mut()
            .chain(self.directional_light.iter_mut())
            .chain(self.skybox.iter_mut())
        {
            if let Some(on) = lookup(&*id) {
                *enabled = on;
            }
        }
        self
    }

    fn entries(&self) -> impl Iterator<Item = &(ObjectId, bool)> {
        self.meshes
            .iter()
            .chain(self.directional_light.iter())
            .chain(self.skybox.iter())
    }
}

/// Disable every captured lobby object. Objects no longer in the scene are skipped.
pub fn hide_lobby(scene: &mut Scene, snapshot: &LobbySnapshot) {
    for (id, _) in snapshot.entries() {
        scene.set_enabled(id, false);
    }
    tracing::debug!("Lobby hidden ({} objects)", snapshot.len());
}

/// Put every captured lobby object back to its enabled state at capture time
pub fn restore_lobby(scene: &mut Scene, snapshot: &LobbySnapshot) {
    for (id, enabled) in snapshot.entries() {
        scene.set_enabled(id, *enabled);
    }
    tracing::debug!("Lobby restored ({} objects)", snapshot.len());
}
