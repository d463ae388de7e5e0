//! JSON command protocol for fetched experience scripts.
//!
//! A script is a JSON array of commands. Compiling parses and checks the
//! whole array up front; running applies the commands in order through the
//! experience bindings and stops at the first fault.

use serde::{Deserialize, Serialize};
use shared::{LightKind, Metadata, ObjectId, Shape};

use super::error::ScriptError;
use super::sandbox::{ExperienceBindings, ExperienceModule};
use crate::state::scene::Scene;

/// A single command an experience script can run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum ExperienceCommand {
    /// Create a mesh
    CreateMesh {
        name: String,
        shape: Shape,
        #[serde(default)]
        position: [f32; 3],
        #[serde(default)]
        metadata: Metadata,
    },
    /// Create a light
    CreateLight {
        name: String,
        light: LightKind,
        #[serde(default)]
        position: [f32; 3],
    },
    /// Enable or disable an object by name
    SetEnabled { target: String, enabled: bool },
    /// Rename an object
    Rename { target: String, to: String },
    /// Set one metadata key on an object
    SetMetadata {
        target: String,
        key: String,
        value: serde_json::Value,
    },
    /// Move the bound camera
    MoveCamera { position: [f32; 3] },
    /// Remove an object from the scene
    Dispose { target: String },
    /// Write a line to the log
    Log { message: String },
    /// Stop the script with a runtime fault
    Abort { message: String },
}

/// Compiled script, ready to attach
#[derive(Debug, Clone)]
pub struct ScriptModule {
    name: String,
    commands: Vec<ExperienceCommand>,
}

impl ScriptModule {
    pub fn compile(name: impl Into<String>, text: &str) -> Result<Self, ScriptError> {
        let commands: Vec<ExperienceCommand> =
            serde_json::from_str(text).map_err(|e| ScriptError::Compile(e.to_string()))?;
        Ok(Self {
            name: name.into(),
            commands,
        })
    }

    pub fn commands(&self) -> &[ExperienceCommand] {
        &self.commands
    }
}

impl ExperienceModule for ScriptModule {
    fn name(&self) -> &str {
        &self.name
    }

    fn attach(&self, bindings: &mut ExperienceBindings<'_>) -> Result<(), ScriptError> {
        for command in &self.commands {
            run_command(bindings, command)?;
        }
        Ok(())
    }
}

fn resolve(scene: &Scene, target: &str) -> Result<ObjectId, ScriptError> {
    scene
        .find_by_name(target)
        .map(|o| o.id.clone())
        .ok_or_else(|| ScriptError::UnknownObject(target.to_string()))
}

fn run_command(b: &mut ExperienceBindings<'_>, command: &ExperienceCommand) -> Result<(), ScriptError> {
    match command {
        ExperienceCommand::CreateMesh {
            name,
            shape,
            position,
            metadata,
        } => {
            let id = b.scene.create_mesh(name.clone(), shape.clone(), *position);
            if !metadata.is_empty() {
                if let Some(obj) = b.scene.get_mut(&id) {
                    obj.metadata.extend(metadata.clone());
                }
            }
        }

        ExperienceCommand::CreateLight {
            name,
            light,
            position,
        } => {
            b.scene.create_light(name.clone(), light.clone(), *position);
        }

        ExperienceCommand::SetEnabled { target, enabled } => {
            let id = resolve(b.scene, target)?;
            b.scene.set_enabled(&id, *enabled);
        }

        ExperienceCommand::Rename { target, to } => {
            let id = resolve(b.scene, target)?;
            b.scene.rename(&id, to.clone());
        }

        ExperienceCommand::SetMetadata { target, key, value } => {
            let id = resolve(b.scene, target)?;
            if let Some(obj) = b.scene.get_mut(&id) {
                obj.metadata.insert(key.clone(), value.clone());
            }
            b.scene.notify_mutated();
        }

        ExperienceCommand::MoveCamera { position } => {
            let camera = match b.camera.as_deref() {
                Some(id) => b.scene.camera_mut(id),
                None => None,
            };
            match camera {
                Some(camera) => camera.position = glam::Vec3::from_array(*position),
                None => tracing::warn!("move_camera ignored: no active camera"),
            }
        }

        ExperienceCommand::Dispose { target } => {
            let id = resolve(b.scene, target)?;
            b.scene.dispose(&id);
        }

        ExperienceCommand::Log { message } => {
            tracing::info!(target: "experience", "{message}");
        }

        ExperienceCommand::Abort { message } => {
            return Err(ScriptError::Aborted(message.clone()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::experience::sandbox::execute;
    use glam::Vec3;

    fn run(scene: &mut Scene, text: &str) -> Result<(), ScriptError> {
        let module = ScriptModule::compile("test", text)?;
        let (mut b, _) = ExperienceBindings::new(scene, None);
        execute(&module, &mut b)
    }

    #[test]
    fn test_command_serde_create_mesh() {
        let json = r#"{"command": "create_mesh", "name": "ball", "shape": {"type": "sphere", "diameter": 1.0}}"#;
        let cmd: ExperienceCommand = serde_json::from_str(json).unwrap();
        match cmd {
            ExperienceCommand::CreateMesh { name, position, .. } => {
                assert_eq!(name, "ball");
                assert_eq!(position, [0.0; 3]);
            }
            _ => panic!("Expected CreateMesh"),
        }
    }

    #[test]
    fn test_compile_rejects_invalid_json() {
        let err = ScriptModule::compile("bad", "camera.position = 1;").unwrap_err();
        assert!(matches!(err, ScriptError::Compile(_)));
    }

    #[test]
    fn test_compile_rejects_unknown_command() {
        let err = ScriptModule::compile("bad", r#"[{"command": "format_disk"}]"#).unwrap_err();
        assert!(matches!(err, ScriptError::Compile(_)));
    }

    #[test]
    fn test_compile_accepts_empty_script() {
        let module = ScriptModule::compile("empty", "[]").unwrap();
        assert!(module.commands().is_empty());
    }

    #[test]
    fn test_run_creates_objects_with_metadata() {
        let mut scene = Scene::new();
        run(
            &mut scene,
            r#"[
                {"command": "create_light", "name": "skyLight", "light": {"type": "hemispheric", "direction": [0, 1, 0]}},
                {"command": "create_mesh", "name": "ground", "shape": {"type": "ground", "width": 100, "height": 100}, "metadata": {"team": "red"}}
            ]"#,
        )
        .unwrap();
        assert_eq!(scene.light_count(), 1);
        let ground = scene.find_mesh("ground").unwrap();
        assert_eq!(ground.metadata["team"], "red");
    }

    #[test]
    fn test_run_mutates_existing_objects() {
        let mut scene = Scene::new();
        scene.create_mesh("lobby_floor", Shape::Plane { size: 10.0 }, [0.0; 3]);
        run(
            &mut scene,
            r#"[
                {"command": "set_enabled", "target": "lobby_floor", "enabled": false},
                {"command": "set_metadata", "target": "lobby_floor", "key": "touched", "value": 1},
                {"command": "rename", "target": "lobby_floor", "to": "arena_floor"}
            ]"#,
        )
        .unwrap();
        let floor = scene.find_mesh("arena_floor").unwrap();
        assert!(!floor.enabled);
        assert_eq!(floor.metadata["touched"], 1);
    }

    #[test]
    fn test_run_moves_bound_camera() {
        let mut scene = Scene::new();
        scene.add_camera("camera", Vec3::ZERO);
        run(&mut scene, r#"[{"command": "move_camera", "position": [0, 2, -4]}]"#).unwrap();
        assert_eq!(scene.active_camera().unwrap().position, Vec3::new(0.0, 2.0, -4.0));
    }

    #[test]
    fn test_run_unknown_target_stops_script() {
        let mut scene = Scene::new();
        let err = run(
            &mut scene,
            r#"[
                {"command": "create_mesh", "name": "a", "shape": {"type": "plane", "size": 1}},
                {"command": "dispose", "target": "ghost"},
                {"command": "create_mesh", "name": "b", "shape": {"type": "plane", "size": 1}}
            ]"#,
        )
        .unwrap_err();
        assert_eq!(err, ScriptError::UnknownObject("ghost".into()));
        // Commands before the fault already ran
        assert_eq!(scene.mesh_count(), 1);
    }

    #[test]
    fn test_run_abort() {
        let mut scene = Scene::new();
        let err = run(
            &mut scene,
            r#"[{"command": "log", "message": "hi"}, {"command": "abort", "message": "no assets"}]"#,
        )
        .unwrap_err();
        assert_eq!(err, ScriptError::Aborted("no assets".into()));
    }
}
