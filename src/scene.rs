use bevy::{ecs::system::SystemId, prelude::*};

use crate::{game_over::GameOverSequencer, game_state::GameState};

pub struct ScenePlugin;

impl Plugin for ScenePlugin {
    fn build(&self, app: &mut App) {
        app.add_observer(reload_scene)
            .add_systems(Startup, load_initial_scene);
    }
}

/// Root entities of the running scene. Despawned (with their children) on reload.
#[derive(Component, Default)]
pub struct SceneEntity;

/// Knows how to build the current scene from scratch.
#[derive(Resource)]
pub struct SceneLoader {
    pub name: String,
    /// One-shot system that spawns the scene.
    pub setup: SystemId,
    pub reloads: u32,
}

impl SceneLoader {
    pub fn new(name: impl Into<String>, setup: SystemId) -> Self {
        SceneLoader {
            name: name.into(),
            setup,
            reloads: 0,
        }
    }
}

/// Throws the running scene away and builds it again from its initial state.
#[derive(Event, Debug, Clone, Copy)]
pub struct ReloadScene;

fn load_initial_scene(mut commands: Commands, loader: Option<Res<SceneLoader>>) {
    let Some(loader) = loader else {
        warn!("No SceneLoader configured, nothing to load");
        return;
    };
    info!(scene = %loader.name, "Loading scene");
    commands.run_system(loader.setup);
}

fn reload_scene(
    _event: On<ReloadScene>,
    mut commands: Commands,
    loader: Option<ResMut<SceneLoader>>,
    roots: Query<Entity, With<SceneEntity>>,
    mut state: ResMut<GameState>,
    mut sequencer: ResMut<GameOverSequencer>,
) {
    let Some(mut loader) = loader else {
        warn!("ReloadScene without a SceneLoader, ignoring");
        return;
    };
    loader.reloads += 1;
    info!(scene = %loader.name, reloads = loader.reloads, "Reloading scene");

    for entity in &roots {
        commands.entity(entity).despawn();
    }
    // Anything still in flight belongs to the old scene
    state.reset();
    *sequencer = GameOverSequencer::default();

    commands.run_system(loader.setup);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        game_state::{AddScore, PlayerDied},
        manager::GameManager,
        test_support::{scene, test_app},
    };

    #[test]
    fn reload_rebuilds_scene_and_resets_state() {
        let mut app = test_app();
        app.update();
        let before = scene(&mut app);

        app.world_mut().trigger(AddScore { delta: 30 });
        app.world_mut().trigger(PlayerDied);
        assert!(app.world().resource::<GameOverSequencer>().is_game_over_running());

        app.world_mut().trigger(ReloadScene);
        app.update();

        let after = scene(&mut app);
        let world = app.world();
        assert_eq!(world.resource::<GameState>(), &GameState::default());
        assert!(!world.resource::<GameOverSequencer>().is_game_over_running());
        assert_eq!(world.resource::<SceneLoader>().reloads, 1);
        assert!(world.get_entity(before.panel.unwrap()).is_err());
        assert!(world.get_entity(before.final_score_text.unwrap()).is_err());
        assert_ne!(before.panel, after.panel);
        assert_eq!(world.get::<Visibility>(after.panel.unwrap()), Some(&Visibility::Hidden));
    }

    #[test]
    fn reload_leaves_exactly_one_manager() {
        let mut app = test_app();
        app.update();
        app.world_mut().trigger(ReloadScene);
        app.update();
        app.world_mut().trigger(ReloadScene);
        app.update();

        let managers = app
            .world_mut()
            .query::<&GameManager>()
            .iter(app.world())
            .count();
        assert_eq!(managers, 1);
    }

    #[test]
    fn missing_loader_is_tolerated() {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, ScenePlugin));
        app.init_resource::<GameState>();
        app.init_resource::<GameOverSequencer>();
        app.update();
        app.world_mut().trigger(ReloadScene);
        assert_eq!(app.world().resource::<GameState>(), &GameState::default());
    }
}
