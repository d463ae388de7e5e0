pub mod scene;
pub mod settings;

use shared::{GameList, ObjectId};

use crate::experience::ExperienceLifecycle;
use crate::lobby::{build_lobby, LobbyReport};
use crate::xr::XrHelper;
pub use scene::{object_display_name, object_icon, short_id, Scene};
pub use settings::{CatalogSettings, InputSettings, LobbySettings, UiSettings};

/// Panel visibility flags
pub struct PanelVisibility {
    pub planets: bool,
    pub scene_tree: bool,
}

impl Default for PanelVisibility {
    fn default() -> Self {
        Self {
            planets: true,
            scene_tree: true,
        }
    }
}

/// Combined application state
pub struct AppState {
    pub scene: Scene,
    pub xr: XrHelper,
    pub lifecycle: ExperienceLifecycle,
    pub games: GameList,
    pub lobby: LobbyReport,
    pub panels: PanelVisibility,
    pub settings: LobbySettings,
    /// Planet highlighted in the planet list
    pub selected: Option<ObjectId>,
    /// Last message for the status bar
    pub status: Option<String>,
}

impl AppState {
    pub fn new(settings: LobbySettings, games: GameList) -> Self {
        let mut scene = Scene::new();
        let lobby = build_lobby(&mut scene, &games, &mut rand::rng());
        let xr = XrHelper::new(&mut scene);
        Self {
            scene,
            xr,
            lifecycle: ExperienceLifecycle::from_settings(&settings),
            games,
            lobby,
            panels: PanelVisibility::default(),
            settings,
            selected: None,
            status: None,
        }
    }

    /// Rebuild the lobby for a new game list. Only valid while idle.
    pub fn replace_games(&mut self, games: GameList) -> bool {
        if !self.lifecycle.is_idle() {
            return false;
        }
        self.scene.clear();
        self.lobby = build_lobby(&mut self.scene, &games, &mut rand::rng());
        self.games = games;
        self.selected = None;
        true
    }
}
