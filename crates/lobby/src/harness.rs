//! Headless harness for driving the lobby without a window.
//!
//! Owns a scene, an XR helper, the experience lifecycle, an in-memory script
//! source and the input channel, and exposes the user-level actions: pick a
//! planet, press a key, press a controller button.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use shared::{ExperienceMetadata, GameList, ObjectId};
use tokio::sync::watch;

use crate::experience::{
    ExperienceError, ExperienceLifecycle, ExperienceModule, LoadReport, StaticScriptSource, TeardownReport,
};
use crate::input::{input_channel, ButtonPoller, InputEvent, InputReceiver, InputSender};
use crate::lobby::{build_lobby, pick_planet, LobbyReport};
use crate::state::scene::Scene;
use crate::state::settings::LobbySettings;
use crate::xr::{gamepad, Handedness, MotionController, XrController, XrHelper, XrState};

pub struct LobbyHarness {
    pub scene: Scene,
    pub xr: XrHelper,
    pub lifecycle: ExperienceLifecycle,
    pub source: StaticScriptSource,
    pub lobby: LobbyReport,
    input_tx: InputSender,
    input_rx: InputReceiver,
    /// Gamepad senders and their pollers, by controller ID
    gamepads: Vec<(String, watch::Sender<Vec<bool>>, ButtonPoller)>,
}

impl LobbyHarness {
    /// Build a lobby for `games` with a fixed RNG seed and default settings
    pub fn new(games: &GameList) -> Self {
        Self::with_settings(games, &LobbySettings::default())
    }

    pub fn with_settings(games: &GameList, settings: &LobbySettings) -> Self {
        let mut scene = Scene::new();
        let lobby = build_lobby(&mut scene, games, &mut StdRng::seed_from_u64(42));
        let xr = XrHelper::new(&mut scene);
        let (input_tx, input_rx) = input_channel();
        Self {
            scene,
            xr,
            lifecycle: ExperienceLifecycle::from_settings(settings),
            source: StaticScriptSource::new(),
            lobby,
            input_tx,
            input_rx,
            gamepads: Vec::new(),
        }
    }

    /// Serve `text` for `url`
    pub fn serve(&mut self, url: &str, text: &str) {
        self.source.insert(url, text);
    }

    pub fn register_module(&mut self, url: &str, module: Arc<dyn ExperienceModule>) {
        self.lifecycle.register_module(url, module);
    }

    /// Planet ID for a game slug
    pub fn planet(&self, slug: &str) -> Option<&ObjectId> {
        self.lobby.planets.iter().find(|(_, s)| s == slug).map(|(id, _)| id)
    }

    pub fn metadata(&self, slug: &str) -> Option<ExperienceMetadata> {
        pick_planet(&self.scene, self.planet(slug)?)
    }

    // ── Actions ───────────────────────────────────────────────

    /// Load the experience behind a planet
    pub async fn select(&mut self, slug: &str) -> Result<LoadReport, ExperienceError> {
        let metadata = self.metadata(slug).ok_or(ExperienceError::InvalidMetadata)?;
        self.lifecycle
            .load(&mut self.scene, Some(&self.xr), &self.source, &metadata)
            .await
    }

    /// Load arbitrary metadata, bypassing the planets
    pub async fn load(&mut self, metadata: &ExperienceMetadata) -> Result<LoadReport, ExperienceError> {
        self.lifecycle
            .load(&mut self.scene, Some(&self.xr), &self.source, metadata)
            .await
    }

    pub fn press_key(&mut self, key: &str) -> Vec<TeardownReport> {
        let _ = self.input_tx.send(InputEvent::key_down(key));
        self.pump()
    }

    /// Add a controller with an initialised motion controller of `buttons` buttons
    pub fn connect_controller(&mut self, id: &str, buttons: usize) {
        let (tx, rx) = gamepad(buttons);
        self.xr.add_controller(XrController {
            id: id.to_string(),
            motion_controller: Some(MotionController::new(format!("{id}-mc"), Handedness::Right, rx)),
        });
        self.gamepads.push((id.to_string(), tx, ButtonPoller::new(id, buttons)));
    }

    /// Set a button, run one polling tick and feed the resulting events
    pub fn set_button(&mut self, controller: &str, index: usize, pressed: bool) -> Vec<TeardownReport> {
        if let Some((_, tx, poller)) = self.gamepads.iter_mut().find(|(id, _, _)| id == controller) {
            tx.send_modify(|buttons| {
                if index < buttons.len() {
                    buttons[index] = pressed;
                }
            });
            let sample = tx.borrow().clone();
            for event in poller.tick(&sample) {
                let _ = self.input_tx.send(event);
            }
        }
        self.pump()
    }

    /// Press and release a button
    pub fn click_button(&mut self, controller: &str, index: usize) -> Vec<TeardownReport> {
        let mut reports = self.set_button(controller, index, true);
        reports.extend(self.set_button(controller, index, false));
        reports
    }

    pub fn set_xr_state(&mut self, state: XrState) {
        self.xr.set_state(state, &mut self.scene);
    }

    fn pump(&mut self) -> Vec<TeardownReport> {
        self.lifecycle.drain_input(&mut self.scene, &mut self.input_rx)
    }

    // ── Queries ───────────────────────────────────────────────

    /// Enabled flags of every object, in scene order
    pub fn enabled_flags(&self) -> Vec<(String, bool)> {
        self.scene.objects().map(|o| (o.name.clone(), o.enabled)).collect()
    }

    pub fn lobby_visible(&self) -> bool {
        self.scene
            .objects()
            .filter(|o| o.name.starts_with("lobby") || o.name == "skyBox")
            .all(|o| o.enabled)
    }
}
