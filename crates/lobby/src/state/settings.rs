//! Application settings

use serde::{Deserialize, Serialize};

use crate::experience::{FailurePolicy, LobbyLayout};
use crate::i18n::Lang;

/// Where the game list and the experience scripts come from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogSettings {
    /// Base URL that relative script URLs are resolved against
    pub base_url: String,
    /// Path of the game list, relative to `base_url`
    pub games_path: String,
    /// Timeout for a single request, in seconds
    pub request_timeout_secs: u64,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3001".to_string(),
            games_path: "/api/games".to_string(),
            request_timeout_secs: 10,
        }
    }
}

/// Dismiss bindings and gamepad polling
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputSettings {
    /// Keyboard key that tears down the active experience
    pub dismiss_key: String,
    /// Controller button index that tears down the active experience
    pub dismiss_button: usize,
    /// Gamepad polling period in milliseconds
    pub poll_interval_ms: u64,
}

impl Default for InputSettings {
    fn default() -> Self {
        Self {
            dismiss_key: "Delete".to_string(),
            dismiss_button: 5,
            poll_interval_ms: 100,
        }
    }
}

impl InputSettings {
    pub fn poll_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.poll_interval_ms.max(1))
    }
}

/// UI settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiSettings {
    /// Font size in points
    pub font_size: f32,
    #[serde(default)]
    pub language: Lang,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            font_size: 14.0,
            language: Lang::default(),
        }
    }
}

/// All application settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LobbySettings {
    #[serde(default)]
    pub catalog: CatalogSettings,
    #[serde(default)]
    pub input: InputSettings,
    /// Names that identify lobby content
    #[serde(default)]
    pub lobby: LobbyLayout,
    /// What to do with the scene when an experience faults mid-load
    #[serde(default)]
    pub failure_policy: FailurePolicy,
    #[serde(default)]
    pub ui: UiSettings,
}

impl LobbySettings {
    fn config_path() -> Option<std::path::PathBuf> {
        directories::ProjectDirs::from("com", "planet-lobby", "planet-lobby")
            .map(|dirs| dirs.config_dir().join("settings.json"))
    }

    /// Load settings from file, or return default if not found
    pub fn load() -> Self {
        if let Some(config_path) = Self::config_path() {
            if let Ok(json) = std::fs::read_to_string(&config_path) {
                match serde_json::from_str(&json) {
                    Ok(settings) => return settings,
                    Err(e) => tracing::warn!("Ignoring invalid {}: {e}", config_path.display()),
                }
            }
        }
        Self::default()
    }

    /// Save settings to file
    pub fn save(&self) {
        if let Some(config_path) = Self::config_path() {
            if let Some(config_dir) = config_path.parent() {
                if std::fs::create_dir_all(config_dir).is_ok() {
                    if let Ok(json) = serde_json::to_string_pretty(self) {
                        if let Err(e) = std::fs::write(&config_path, json) {
                            tracing::warn!("Failed to save settings: {e}");
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = LobbySettings::default();
        assert_eq!(s.input.dismiss_key, "Delete");
        assert_eq!(s.input.dismiss_button, 5);
        assert_eq!(s.input.poll_interval(), std::time::Duration::from_millis(100));
        assert_eq!(s.failure_policy, FailurePolicy::Rollback);
        assert_eq!(s.lobby.mesh_prefix, "lobby");
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let s: LobbySettings =
            serde_json::from_str(r#"{"failure_policy": "leave_partial", "input": {"dismiss_key": "Escape", "dismiss_button": 3, "poll_interval_ms": 50}}"#)
                .unwrap();
        assert_eq!(s.failure_policy, FailurePolicy::LeavePartial);
        assert_eq!(s.input.dismiss_key, "Escape");
        assert_eq!(s.catalog.games_path, "/api/games");
        assert_eq!(s.lobby.skybox, "skyBox");
    }
}
