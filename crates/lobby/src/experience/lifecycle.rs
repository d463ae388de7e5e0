//! Experience lifecycle: Idle -> Loading -> Active -> Unloading -> Idle
//!
//! Loading is split in two so a GUI can fetch in the background:
//! `begin_load` validates and reserves the slot, `complete_load` applies the
//! fetched script to the scene on the caller's thread. `load` chains both for
//! async callers, `select` additionally logs and swallows failures.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use shared::{ExperienceMetadata, ObjectId};

use super::dismiss::DismissListener;
use super::error::{ExperienceError, LoadWarning};
use super::loader::{load_script, ScriptSource};
use super::sandbox::{execute, ExperienceBindings, ExperienceModule, ModuleRegistry};
use super::script::ScriptModule;
use super::tagger::{
    clear_experience_flag, is_experience_object, tag_all_existing_as_non_experience, tag_as_experience_object,
};
use super::visibility::{hide_lobby, restore_lobby, LobbyLayout, LobbySnapshot};
use crate::input::{InputEvent, InputReceiver};
use crate::state::scene::Scene;
use crate::state::settings::LobbySettings;
use crate::xr::XrHelper;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LifecycleState {
    #[default]
    Idle,
    Loading,
    Active,
    Unloading,
}

impl LifecycleState {
    pub fn label(&self) -> &'static str {
        match self {
            LifecycleState::Idle => "idle",
            LifecycleState::Loading => "loading",
            LifecycleState::Active => "active",
            LifecycleState::Unloading => "unloading",
        }
    }
}

/// What happens to the scene when an experience faults after the lobby was hidden
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Dispose everything created since the baseline and restore the lobby
    #[default]
    Rollback,
    /// Leave partial objects and the hidden lobby as they are
    LeavePartial,
}

/// Ticket for a load in progress
#[derive(Debug, Clone)]
pub struct PendingLoad {
    id: u64,
    url: String,
    metadata: ExperienceMetadata,
}

impl PendingLoad {
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn metadata(&self) -> &ExperienceMetadata {
        &self.metadata
    }
}

/// The experience currently owning the scene
#[derive(Debug, Clone)]
pub struct ActiveExperience {
    pub metadata: ExperienceMetadata,
    pub module: String,
    snapshot: LobbySnapshot,
}

impl ActiveExperience {
    pub fn snapshot(&self) -> &LobbySnapshot {
        &self.snapshot
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadReport {
    pub name: String,
    pub created_meshes: usize,
    pub created_lights: usize,
    pub warnings: Vec<LoadWarning>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TeardownReport {
    pub name: String,
    pub disposed_meshes: usize,
    pub disposed_lights: usize,
}

/// Objects present before a script ran
struct Baseline {
    known: HashSet<ObjectId>,
    /// Objects already experience-owned (left by an earlier partial load)
    owned: HashSet<ObjectId>,
}

impl Baseline {
    fn record(scene: &Scene) -> Self {
        Self {
            known: scene.objects().map(|o| o.id.clone()).collect(),
            owned: scene
                .objects()
                .filter(|o| is_experience_object(o))
                .map(|o| o.id.clone())
                .collect(),
        }
    }

    /// Undo ownership flags the script put on objects it did not create
    fn clear_claimed_flags(&self, scene: &mut Scene) -> usize {
        let mut cleared = 0;
        for obj in scene.objects_mut() {
            if self.known.contains(&obj.id) && !self.owned.contains(&obj.id) && is_experience_object(obj) {
                clear_experience_flag(obj);
                cleared += 1;
            }
        }
        if cleared > 0 {
            scene.notify_mutated();
        }
        cleared
    }

    /// Tag every object the script added and return their IDs
    fn tag_new_objects(&self, scene: &mut Scene) -> Vec<ObjectId> {
        let mut created = Vec::new();
        for obj in scene.objects_mut() {
            if !self.known.contains(&obj.id) {
                tag_as_experience_object(obj);
                created.push(obj.id.clone());
            }
        }
        if !created.is_empty() {
            scene.notify_mutated();
        }
        created
    }
}

pub struct ExperienceLifecycle {
    state: LifecycleState,
    pending: Option<u64>,
    next_load_id: u64,
    active: Option<ActiveExperience>,
    /// Snapshot of a failed load that left the lobby hidden
    stranded: Option<LobbySnapshot>,
    layout: LobbyLayout,
    failure_policy: FailurePolicy,
    dismiss: DismissListener,
    modules: ModuleRegistry,
}

impl Default for ExperienceLifecycle {
    fn default() -> Self {
        Self::from_settings(&LobbySettings::default())
    }
}

impl ExperienceLifecycle {
    pub fn new(layout: LobbyLayout, dismiss: DismissListener, failure_policy: FailurePolicy) -> Self {
        Self {
            state: LifecycleState::Idle,
            pending: None,
            next_load_id: 0,
            active: None,
            stranded: None,
            layout,
            failure_policy,
            dismiss,
            modules: ModuleRegistry::default(),
        }
    }

    pub fn from_settings(settings: &LobbySettings) -> Self {
        Self::new(
            settings.lobby.clone(),
            DismissListener::from_settings(&settings.input),
            settings.failure_policy,
        )
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == LifecycleState::Idle
    }

    pub fn active(&self) -> Option<&ActiveExperience> {
        self.active.as_ref()
    }

    pub fn dismiss_listener(&self) -> &DismissListener {
        &self.dismiss
    }

    pub fn failure_policy(&self) -> FailurePolicy {
        self.failure_policy
    }

    pub fn set_failure_policy(&mut self, policy: FailurePolicy) {
        self.failure_policy = policy;
    }

    /// Serve `url` from a native module instead of fetching it
    pub fn register_module(&mut self, url: impl Into<String>, module: Arc<dyn ExperienceModule>) {
        self.modules.register(url, module);
    }

    /// True when the pending load is served by a native module (no fetch needed)
    pub fn is_native(&self, pending: &PendingLoad) -> bool {
        self.modules.contains(&pending.url)
    }

    // ── Loading ───────────────────────────────────────────────

    /// Idle -> Loading. Rejected outside Idle; a missing URL leaves the state Idle.
    pub fn begin_load(&mut self, metadata: &ExperienceMetadata) -> Result<PendingLoad, ExperienceError> {
        if self.state != LifecycleState::Idle {
            tracing::warn!(
                "Ignoring selection of '{}': experience {}",
                metadata.name,
                self.state.label()
            );
            return Err(ExperienceError::Busy(self.state.label()));
        }
        let url = metadata
            .script_url()
            .ok_or(ExperienceError::InvalidMetadata)?
            .to_string();

        self.next_load_id += 1;
        self.pending = Some(self.next_load_id);
        self.state = LifecycleState::Loading;
        tracing::info!("Loading experience for: {} ({url})", metadata.name);

        Ok(PendingLoad {
            id: self.next_load_id,
            url,
            metadata: metadata.clone(),
        })
    }

    /// Loading -> Active, or back to Idle on any error.
    ///
    /// `fetched` is ignored for URLs served by a native module.
    pub fn complete_load(
        &mut self,
        scene: &mut Scene,
        xr: Option<&XrHelper>,
        pending: PendingLoad,
        fetched: Result<String, ExperienceError>,
    ) -> Result<LoadReport, ExperienceError> {
        if self.state != LifecycleState::Loading || self.pending != Some(pending.id) {
            return Err(ExperienceError::StaleLoad);
        }
        self.pending = None;

        let result = self.apply(scene, xr, &pending, fetched);
        if result.is_err() {
            self.dismiss.disarm();
            self.state = LifecycleState::Idle;
        }
        result
    }

    /// Fetch and apply in one go
    pub async fn load<S>(
        &mut self,
        scene: &mut Scene,
        xr: Option<&XrHelper>,
        source: &S,
        metadata: &ExperienceMetadata,
    ) -> Result<LoadReport, ExperienceError>
    where
        S: ScriptSource + ?Sized,
    {
        let pending = self.begin_load(metadata)?;
        let fetched = if self.is_native(&pending) {
            Ok(String::new())
        } else {
            load_script(source, pending.metadata()).await
        };
        self.complete_load(scene, xr, pending, fetched)
    }

    /// User picked a planet. Errors are logged and never escalate.
    pub async fn select<S>(
        &mut self,
        scene: &mut Scene,
        xr: Option<&XrHelper>,
        source: &S,
        metadata: &ExperienceMetadata,
    ) -> Option<LoadReport>
    where
        S: ScriptSource + ?Sized,
    {
        match self.load(scene, xr, source, metadata).await {
            Ok(report) => Some(report),
            Err(e) => {
                tracing::error!("Error loading experience: {e}");
                None
            }
        }
    }

    fn apply(
        &mut self,
        scene: &mut Scene,
        xr: Option<&XrHelper>,
        pending: &PendingLoad,
        fetched: Result<String, ExperienceError>,
    ) -> Result<LoadReport, ExperienceError> {
        let module: Arc<dyn ExperienceModule> = match self.modules.get(&pending.url) {
            Some(native) => native,
            None => {
                let text = fetched?;
                Arc::new(ScriptModule::compile(pending.url.clone(), &text)?)
            }
        };

        // Prepare: snapshot + hide lobby, mark what exists, remember it
        let mut snapshot = LobbySnapshot::capture(scene, &self.layout);
        if let Some(earlier) = self.stranded.take() {
            snapshot = snapshot.inherit(&earlier);
        }
        hide_lobby(scene, &snapshot);
        tag_all_existing_as_non_experience(scene.objects_mut());
        let baseline = Baseline::record(scene);

        // Execute against the injected bindings only
        let (mut bindings, warnings) = ExperienceBindings::new(scene, xr);
        let outcome = execute(module.as_ref(), &mut bindings);
        let created = baseline.tag_new_objects(scene);

        if let Err(e) = outcome {
            tracing::error!("Experience '{}' failed: {e}", module.name());
            match self.failure_policy {
                FailurePolicy::Rollback => {
                    for id in &created {
                        scene.dispose(id);
                    }
                    restore_lobby(scene, &snapshot);
                    let cleared = baseline.clear_claimed_flags(scene);
                    tracing::info!(
                        "Rolled back {} objects ({cleared} ownership flags cleared) and restored the lobby",
                        created.len()
                    );
                }
                FailurePolicy::LeavePartial => {
                    tracing::warn!(
                        "Leaving {} partial objects; lobby stays hidden with no dismiss armed",
                        created.len()
                    );
                    self.stranded = Some(snapshot);
                }
            }
            return Err(e.into());
        }

        let created_meshes = created
            .iter()
            .filter(|id| scene.get(id).is_some_and(|o| o.is_mesh()))
            .count();
        let report = LoadReport {
            name: pending.metadata.name.clone(),
            created_meshes,
            created_lights: created.len() - created_meshes,
            warnings,
        };

        self.dismiss.arm();
        self.active = Some(ActiveExperience {
            metadata: pending.metadata.clone(),
            module: module.name().to_string(),
            snapshot,
        });
        self.state = LifecycleState::Active;
        tracing::info!(
            "Experience '{}' active ({} meshes, {} lights)",
            report.name,
            report.created_meshes,
            report.created_lights
        );
        Ok(report)
    }

    // ── Unloading ─────────────────────────────────────────────

    /// Feed an input event; runs teardown when it is the dismiss trigger
    pub fn handle_input(&mut self, scene: &mut Scene, event: &InputEvent) -> Option<TeardownReport> {
        if !self.dismiss.observe(event) {
            return None;
        }
        tracing::info!("Dismiss triggered by {event:?}");
        self.dismiss(scene)
    }

    /// Handle every event currently queued on the receiver
    pub fn drain_input(&mut self, scene: &mut Scene, events: &mut InputReceiver) -> Vec<TeardownReport> {
        let mut reports = Vec::new();
        while let Ok(event) = events.try_recv() {
            reports.extend(self.handle_input(scene, &event));
        }
        reports
    }

    /// Active -> Unloading -> Idle: restore the lobby, dispose every
    /// experience-owned object. No-op outside Active.
    pub fn dismiss(&mut self, scene: &mut Scene) -> Option<TeardownReport> {
        if self.state != LifecycleState::Active {
            tracing::debug!("Dismiss ignored: experience {}", self.state.label());
            return None;
        }
        self.state = LifecycleState::Unloading;
        self.dismiss.disarm();
        let active = self.active.take();

        tracing::info!("Deleting experience and restoring the lobby");
        if let Some(active) = &active {
            restore_lobby(scene, &active.snapshot);
        }

        let removed = scene.dispose_where(is_experience_object);
        for obj in &removed {
            let kind = if obj.is_mesh() { "mesh" } else { "light" };
            tracing::debug!("Removing experience {kind}: {}", obj.name);
        }
        let disposed_meshes = removed.iter().filter(|o| o.is_mesh()).count();

        self.state = LifecycleState::Idle;
        tracing::info!("Experience deleted and lobby restored");
        Some(TeardownReport {
            name: active.map(|a| a.metadata.name).unwrap_or_default(),
            disposed_meshes,
            disposed_lights: removed.len() - disposed_meshes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::experience::error::ScriptError;
    use crate::experience::loader::StaticScriptSource;
    use crate::experience::sandbox::FnModule;
    use shared::Shape;

    const TWO_BOXES: &str = r#"[
        {"command": "create_mesh", "name": "box_a", "shape": {"type": "box", "width": 1, "height": 1, "depth": 1}},
        {"command": "create_mesh", "name": "box_b", "shape": {"type": "box", "width": 1, "height": 1, "depth": 1}}
    ]"#;

    fn meta(url: &str) -> ExperienceMetadata {
        ExperienceMetadata {
            url: Some(url.to_string()),
            name: "Boxes".into(),
            ..Default::default()
        }
    }

    fn lobby() -> Scene {
        let mut s = Scene::new();
        s.create_mesh("lobby_floor", Shape::Plane { size: 10.0 }, [0.0; 3]);
        s
    }

    #[test]
    fn test_begin_load_missing_url_stays_idle() {
        let mut lc = ExperienceLifecycle::default();
        let err = lc.begin_load(&ExperienceMetadata::default()).unwrap_err();
        assert!(matches!(err, ExperienceError::InvalidMetadata));
        assert!(lc.is_idle());
    }

    #[test]
    fn test_begin_load_rejects_when_busy() {
        let mut lc = ExperienceLifecycle::default();
        lc.begin_load(&meta("/exp/a.json")).unwrap();
        assert_eq!(lc.state(), LifecycleState::Loading);
        let err = lc.begin_load(&meta("/exp/b.json")).unwrap_err();
        assert!(matches!(err, ExperienceError::Busy("loading")));
    }

    #[test]
    fn test_complete_load_stale_ticket() {
        let mut lc = ExperienceLifecycle::default();
        let mut scene = lobby();
        let first = lc.begin_load(&meta("/exp/a.json")).unwrap();
        lc.complete_load(&mut scene, None, first.clone(), Ok(TWO_BOXES.into()))
            .unwrap();
        lc.dismiss(&mut scene);

        let err = lc
            .complete_load(&mut scene, None, first, Ok(TWO_BOXES.into()))
            .unwrap_err();
        assert!(matches!(err, ExperienceError::StaleLoad));
        assert!(lc.is_idle());
    }

    #[test]
    fn test_transport_error_returns_to_idle() {
        let mut lc = ExperienceLifecycle::default();
        let mut scene = lobby();
        let pending = lc.begin_load(&meta("/exp/a.json")).unwrap();
        let fetched = Err(ExperienceError::Transport(
            crate::experience::error::TransportError::status("/exp/a.json", 500, "boom"),
        ));
        assert!(lc.complete_load(&mut scene, None, pending, fetched).is_err());
        assert!(lc.is_idle());
        assert!(scene.meshes()[0].enabled);
    }

    #[tokio::test]
    async fn test_load_and_dismiss() {
        let mut lc = ExperienceLifecycle::default();
        let mut scene = lobby();
        let source = StaticScriptSource::new().with("/exp/a.json", TWO_BOXES);

        let report = lc.load(&mut scene, None, &source, &meta("/exp/a.json")).await.unwrap();
        assert_eq!(report.created_meshes, 2);
        assert_eq!(report.warnings, vec![LoadWarning::MissingMotionController]);
        assert_eq!(lc.state(), LifecycleState::Active);
        assert!(lc.dismiss_listener().is_armed());
        assert!(!scene.find_mesh("lobby_floor").unwrap().enabled);

        let teardown = lc.dismiss(&mut scene).unwrap();
        assert_eq!(teardown.disposed_meshes, 2);
        assert_eq!(teardown.name, "Boxes");
        assert!(lc.is_idle());
        assert!(!lc.dismiss_listener().is_armed());
        assert_eq!(scene.mesh_count(), 1);
        assert!(scene.find_mesh("lobby_floor").unwrap().enabled);
    }

    #[tokio::test]
    async fn test_native_module_skips_fetch() {
        let mut lc = ExperienceLifecycle::default();
        let mut scene = lobby();
        lc.register_module(
            "builtin:light",
            Arc::new(FnModule::new("light", |b: &mut ExperienceBindings<'_>| {
                b.scene.create_light(
                    "sun",
                    shared::LightKind::Point { intensity: 1.0 },
                    [0.0, 3.0, 0.0],
                );
                Ok(())
            })),
        );
        // Empty source: any fetch would 404
        let source = StaticScriptSource::new();
        let report = lc.load(&mut scene, None, &source, &meta("builtin:light")).await.unwrap();
        assert_eq!(report.created_lights, 1);
        assert_eq!(lc.active().unwrap().module, "light");
    }

    #[tokio::test]
    async fn test_select_swallows_errors() {
        let mut lc = ExperienceLifecycle::default();
        let mut scene = lobby();
        let source = StaticScriptSource::new();
        assert!(lc.select(&mut scene, None, &source, &meta("/exp/missing.json")).await.is_none());
        assert!(lc.is_idle());
    }

    #[test]
    fn test_script_fault_rollback() {
        let mut lc = ExperienceLifecycle::default();
        let mut scene = lobby();
        let module = FnModule::new("half", |b: &mut ExperienceBindings<'_>| {
            b.scene.create_mesh("half", Shape::Plane { size: 1.0 }, [0.0; 3]);
            Err(ScriptError::Aborted("halfway".into()))
        });
        lc.register_module("builtin:half", Arc::new(module));
        let pending = lc.begin_load(&meta("builtin:half")).unwrap();
        let err = lc
            .complete_load(&mut scene, None, pending, Ok(String::new()))
            .unwrap_err();
        assert!(matches!(err, ExperienceError::ScriptExecution(ScriptError::Aborted(_))));
        assert!(lc.is_idle());
        assert_eq!(scene.mesh_count(), 1);
        assert!(scene.meshes()[0].enabled);
    }

    #[test]
    fn test_script_fault_leave_partial() {
        let mut lc = ExperienceLifecycle::default();
        lc.set_failure_policy(FailurePolicy::LeavePartial);
        let mut scene = lobby();
        let pending = lc.begin_load(&meta("/exp/a.json")).unwrap();
        let script = r#"[
            {"command": "create_mesh", "name": "orphan", "shape": {"type": "plane", "size": 1}},
            {"command": "abort", "message": "no"}
        ]"#;
        assert!(lc.complete_load(&mut scene, None, pending, Ok(script.into())).is_err());
        assert!(lc.is_idle());
        assert!(!lc.dismiss_listener().is_armed());
        assert!(!scene.find_mesh("lobby_floor").unwrap().enabled);
        let orphan = scene.find_mesh("orphan").unwrap();
        assert!(is_experience_object(orphan));
    }

    #[test]
    fn test_compile_error_before_any_mutation() {
        let mut lc = ExperienceLifecycle::default();
        let mut scene = lobby();
        let version = scene.version();
        let pending = lc.begin_load(&meta("/exp/a.json")).unwrap();
        let err = lc
            .complete_load(&mut scene, None, pending, Ok("not json".into()))
            .unwrap_err();
        assert!(matches!(err, ExperienceError::ScriptExecution(ScriptError::Compile(_))));
        assert_eq!(scene.version(), version);
    }

    #[test]
    fn test_dismiss_when_idle_is_noop() {
        let mut lc = ExperienceLifecycle::default();
        let mut scene = lobby();
        assert!(lc.dismiss(&mut scene).is_none());
        assert!(lc
            .handle_input(&mut scene, &InputEvent::key_down("Delete"))
            .is_none());
    }
}
