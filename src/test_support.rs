//! Headless app with the whole game-over flow and a tiny scene, for tests.

use std::time::Duration;

use bevy::{prelude::*, time::TimeUpdateStrategy};

use crate::{
    game_over::GameOverPlugin,
    game_state::GameStatePlugin,
    manager::{ControllerHooks, GameManager, ManagerPlugin},
    restart::RestartPlugin,
    scene::{SceneEntity, SceneLoader, ScenePlugin},
    tween::{FadeSurface, TweenPlugin},
};

/// Hooks handed to the next scene built by `spawn_test_scene`.
#[derive(Resource, Default, Clone, Copy)]
pub struct TestHooks(pub ControllerHooks);

/// Counters bumped by hook systems registered in tests.
#[derive(Resource, Default)]
pub struct HookCalls {
    pub effect: u32,
    pub shown_score: Option<i32>,
}

/// Every frame advances time by 100 ms. The first `update()` has a zero delta
/// and loads the scene, so tests call it once before doing anything timed.
pub fn test_app() -> App {
    let mut app = App::new();
    app.add_plugins((
        MinimalPlugins,
        ManagerPlugin,
        GameStatePlugin,
        TweenPlugin,
        GameOverPlugin,
        RestartPlugin,
        ScenePlugin,
    ));
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(100)));
    app.init_resource::<ButtonInput<MouseButton>>();
    app.init_resource::<HookCalls>();

    let setup = app.register_system(spawn_test_scene);
    app.insert_resource(SceneLoader::new("test", setup));
    app
}

pub fn spawn_test_scene(mut commands: Commands, hooks: Option<Res<TestHooks>>) {
    let score_text = commands.spawn((SceneEntity, Text::new("Score : 0"))).id();
    let final_score_text = commands.spawn(Text::new("")).id();
    let restart_button = commands
        .spawn((Button, Node::default(), UiTransform::default()))
        .id();
    let panel = commands
        .spawn((
            SceneEntity,
            Node::default(),
            UiTransform::default(),
            Visibility::Visible,
            BackgroundColor(Color::BLACK),
            FadeSurface::default(),
        ))
        .add_children(&[final_score_text, restart_button])
        .id();

    commands.spawn((
        SceneEntity,
        GameManager {
            score_text: Some(score_text),
            final_score_text: Some(final_score_text),
            panel: Some(panel),
            restart_button: Some(restart_button),
            hooks: hooks.map(|hooks| hooks.0).unwrap_or_default(),
        },
    ));
}

/// The live manager's wiring.
pub fn scene(app: &mut App) -> GameManager {
    app.world_mut()
        .query::<&GameManager>()
        .single(app.world())
        .cloned()
        .unwrap()
}
