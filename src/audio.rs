use bevy::prelude::*;

use crate::config::GameManagerConfig;

pub struct GameAudioPlugin;

impl Plugin for GameAudioPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_audio);
    }
}

/// Audio output for the game-over flow. When this resource is absent there is
/// no audio output and sound steps are skipped.
#[derive(Resource, Default)]
pub struct GameAudio {
    /// Handle<T> is Bevy's way of referencing assets.
    pub game_over: Option<Handle<AudioSource>>,
}

pub fn setup_audio(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    config: Res<GameManagerConfig>,
) {
    // The actual loading happens in the background - asset_server.load()
    // returns immediately with a Handle that will be valid once loading completes.
    let game_over = config
        .game_over_sound
        .as_ref()
        .map(|path| asset_server.load(path.clone()));

    if game_over.is_none() {
        info!("No game-over sound configured");
    }
    commands.insert_resource(GameAudio { game_over });
}
