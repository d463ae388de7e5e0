//! Experience loading and teardown.
//!
//! An experience is a script (or a native module) that takes over the scene
//! while the lobby is hidden. Everything it creates is tagged so that
//! dismissing it removes exactly those objects and brings the lobby back.

pub mod dismiss;
pub mod error;
pub mod lifecycle;
pub mod loader;
pub mod sandbox;
pub mod script;
pub mod tagger;
pub mod visibility;

pub use dismiss::DismissListener;
pub use error::{ExperienceError, LoadWarning, ScriptError, TransportError};
pub use lifecycle::{
    ActiveExperience, ExperienceLifecycle, FailurePolicy, LifecycleState, LoadReport, PendingLoad,
    TeardownReport,
};
pub use loader::{load_script, HttpScriptSource, ScriptSource, StaticScriptSource};
pub use sandbox::{execute, ExperienceBindings, ExperienceModule, FnModule, ModuleRegistry};
pub use script::{ExperienceCommand, ScriptModule};
pub use visibility::{hide_lobby, restore_lobby, LobbyLayout, LobbySnapshot};
