use std::time::Duration;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

pub struct ConfigPlugin;

impl Plugin for ConfigPlugin {
    fn build(&self, app: &mut App) {
        // Loaded while the app is built so other plugins and main can read it right away
        app.insert_resource(load_config());
    }
}

/// How the game-over panel appears once the lead-in delay is over.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RevealStyle {
    /// Scale pops to 110% then settles while the panel fades in.
    #[default]
    Tweened,
    /// Single per-frame loop: ease-out-back scale plus a linear fade.
    PerFrame,
}

/// Tuning for the game-over and restart sequences.
///
/// Read from `game_manager.ron` when present. Every field is optional in the
/// file; anything missing keeps the value from `Default`, so a file containing
/// just `(reveal_style: PerFrame)` is valid.
#[derive(Resource, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct GameManagerConfig {
    /// Name logged when the scene is reloaded.
    pub scene_name: String,
    /// Asset path of the game-over clip, relative to `assets/`. `None` plays no sound.
    pub game_over_sound: Option<String>,
    pub reveal_style: RevealStyle,
    /// Pause between the game-over effects and the panel reveal.
    pub reveal_delay_ms: u64,
    /// Pause between a restart request and the scene reload.
    pub restart_delay_ms: u64,
    /// Restart button scale while the click feedback is held.
    pub click_feedback_scale: f32,
    pub click_feedback_ms: u64,
}

impl Default for GameManagerConfig {
    fn default() -> Self {
        Self {
            scene_name: "main".to_string(),
            game_over_sound: None,
            reveal_style: RevealStyle::Tweened,
            reveal_delay_ms: 500,
            restart_delay_ms: 300,
            click_feedback_scale: 0.9,
            click_feedback_ms: 100,
        }
    }
}

impl GameManagerConfig {
    pub fn reveal_delay(&self) -> Duration {
        Duration::from_millis(self.reveal_delay_ms)
    }

    pub fn restart_delay(&self) -> Duration {
        Duration::from_millis(self.restart_delay_ms)
    }

    pub fn click_feedback(&self) -> Duration {
        Duration::from_millis(self.click_feedback_ms)
    }
}

pub fn parse_config(contents: &str) -> Result<GameManagerConfig, ron::error::SpannedError> {
    ron::from_str::<GameManagerConfig>(contents)
}

#[cfg(not(target_arch = "wasm32"))]
mod storage {
    use std::path::PathBuf;

    use super::{parse_config, GameManagerConfig};
    use bevy::prelude::*;

    const FILE_NAME: &str = "game_manager.ron";

    /// Working directory first, then the per-user config directory.
    fn candidate_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(FILE_NAME)];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("game-manager").join(FILE_NAME));
        }
        paths
    }

    pub fn load() -> Option<GameManagerConfig> {
        let Some(path) = candidate_paths().into_iter().find(|path| path.exists()) else {
            info!("No {} found. Using default tuning.", FILE_NAME);
            return None;
        };

        match std::fs::read_to_string(&path) {
            Ok(contents) => match parse_config(&contents) {
                Ok(config) => {
                    info!("Loaded config from {:?}: {:?}", path, config);
                    Some(config)
                }
                Err(e) => {
                    error!("Failed to parse {:?}: {}. Using defaults.", path, e);
                    None
                }
            },
            Err(e) => {
                error!("Failed to read {:?}: {}. Using defaults.", path, e);
                None
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
mod storage {
    use super::GameManagerConfig;
    use bevy::prelude::*;

    pub fn load() -> Option<GameManagerConfig> {
        info!("Config files are not read on the web build. Using defaults.");
        None
    }
}

/// Reads game_manager.ron, or falls back to defaults if it is missing or broken.
pub fn load_config() -> GameManagerConfig {
    storage::load().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_fixed_timings() {
        let config = GameManagerConfig::default();
        assert_eq!(config.reveal_delay(), Duration::from_millis(500));
        assert_eq!(config.restart_delay(), Duration::from_millis(300));
        assert_eq!(config.click_feedback(), Duration::from_millis(100));
        assert_eq!(config.reveal_style, RevealStyle::Tweened);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config = parse_config("(reveal_style: PerFrame, restart_delay_ms: 450)").unwrap();
        assert_eq!(config.reveal_style, RevealStyle::PerFrame);
        assert_eq!(config.restart_delay_ms, 450);
        assert_eq!(config.reveal_delay_ms, 500);
        assert_eq!(config.scene_name, "main");
    }

    #[test]
    fn sound_is_opt_in() {
        assert_eq!(GameManagerConfig::default().game_over_sound, None);

        let config = parse_config("(game_over_sound: Some(\"audio/game_over.ogg\"))").unwrap();
        assert_eq!(config.game_over_sound.as_deref(), Some("audio/game_over.ogg"));
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(parse_config("(reveal_delay_ms: \"soon\")").is_err());
    }

    #[test]
    fn round_trips_through_pretty_ron() {
        let config = GameManagerConfig {
            scene_name: "arena".to_string(),
            ..default()
        };
        let text = ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::default()).unwrap();
        assert_eq!(parse_config(&text).unwrap(), config);
    }
}
