//! Experience execution boundary.
//!
//! An experience only ever sees the four values in `ExperienceBindings`.
//! Within that surface it may create, rename or mutate anything in the scene.

use std::any::Any;
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use super::error::{LoadWarning, ScriptError};
use crate::state::scene::{CameraId, Scene};
use crate::xr::{MotionController, XrHelper};

/// Collaborators injected into an experience
pub struct ExperienceBindings<'a> {
    pub scene: &'a mut Scene,
    pub xr: Option<&'a XrHelper>,
    pub camera: Option<CameraId>,
    pub motion_controller: Option<&'a MotionController>,
}

impl<'a> ExperienceBindings<'a> {
    /// Bind the active camera and the first motion controller.
    /// A missing motion controller is reported, not treated as an error.
    pub fn new(scene: &'a mut Scene, xr: Option<&'a XrHelper>) -> (Self, Vec<LoadWarning>) {
        let camera = scene.active_camera_id().cloned();
        let motion_controller = xr.and_then(|xr| xr.first_motion_controller());
        let mut warnings = Vec::new();
        if motion_controller.is_none() {
            tracing::warn!("Motion controller is not available");
            warnings.push(LoadWarning::MissingMotionController);
        }
        (
            Self {
                scene,
                xr,
                camera,
                motion_controller,
            },
            warnings,
        )
    }
}

/// Entry point every experience exposes
pub trait ExperienceModule: Send + Sync {
    fn name(&self) -> &str;

    fn attach(&self, bindings: &mut ExperienceBindings<'_>) -> Result<(), ScriptError>;
}

/// Adapter so a plain function or closure can act as a module
pub struct FnModule<F> {
    name: String,
    attach: F,
}

impl<F> FnModule<F>
where
    F: Fn(&mut ExperienceBindings<'_>) -> Result<(), ScriptError> + Send + Sync,
{
    pub fn new(name: impl Into<String>, attach: F) -> Self {
        Self {
            name: name.into(),
            attach,
        }
    }
}

impl<F> ExperienceModule for FnModule<F>
where
    F: Fn(&mut ExperienceBindings<'_>) -> Result<(), ScriptError> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn attach(&self, bindings: &mut ExperienceBindings<'_>) -> Result<(), ScriptError> {
        (self.attach)(bindings)
    }
}

/// Run a module. A panic inside it becomes `ScriptError::Panicked`.
pub fn execute(module: &dyn ExperienceModule, bindings: &mut ExperienceBindings<'_>) -> Result<(), ScriptError> {
    tracing::debug!("Executing experience module '{}'", module.name());
    match panic::catch_unwind(AssertUnwindSafe(|| module.attach(bindings))) {
        Ok(result) => result,
        Err(payload) => Err(ScriptError::Panicked(panic_message(payload.as_ref()))),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Native experiences keyed by the URL that would otherwise be fetched
#[derive(Default, Clone)]
pub struct ModuleRegistry {
    modules: HashMap<String, Arc<dyn ExperienceModule>>,
}

impl ModuleRegistry {
    pub fn register(&mut self, url: impl Into<String>, module: Arc<dyn ExperienceModule>) {
        let url = url.into();
        tracing::info!("Registered native experience '{}' at {url}", module.name());
        self.modules.insert(url, module);
    }

    pub fn get(&self, url: &str) -> Option<Arc<dyn ExperienceModule>> {
        self.modules.get(url).cloned()
    }

    pub fn contains(&self, url: &str) -> bool {
        self.modules.contains_key(url)
    }
}
