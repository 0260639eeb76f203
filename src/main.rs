use bevy::prelude::*;

use crate::scene::SceneLoader;

fn main() {
    let mut app = App::new();
    app.add_plugins((
        DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Game Over".into(),
                ..default()
            }),
            ..default()
        }),
        config::ConfigPlugin,
        audio::GameAudioPlugin,
        manager::ManagerPlugin,
        game_state::GameStatePlugin,
        tween::TweenPlugin,
        game_over::GameOverPlugin,
        restart::RestartPlugin,
        scene::ScenePlugin,
        hud::HudPlugin,
    ));

    // The scene is built by a one-shot system so a restart can rebuild it
    let setup = app.register_system(hud::setup_scene);
    let scene_name = app
        .world()
        .resource::<config::GameManagerConfig>()
        .scene_name
        .clone();
    app.insert_resource(SceneLoader::new(scene_name, setup));

    app.run();
}

mod audio;
mod config;
mod easing;
mod effects;
mod game_over;
mod game_state;
mod hud;
mod manager;
mod restart;
mod scene;
#[cfg(test)]
mod test_support;
mod tween;
