use bevy::{
    ecs::system::{SystemId, SystemParam},
    prelude::*,
};

use crate::tween::FadeSurface;

pub struct ManagerPlugin;

impl Plugin for ManagerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ActiveGameManager>()
            .add_systems(PreUpdate, register_game_managers);
    }
}

/// Wires one scene's UI and optional controllers into the game-over flow.
///
/// Every collaborator is optional. Whatever is missing gets skipped by the
/// pipelines instead of failing. Only one manager may be live per scene;
/// extra ones are despawned with a warning.
#[derive(Component, Default, Debug, Clone)]
pub struct GameManager {
    /// Text showing "Score : n" while playing.
    pub score_text: Option<Entity>,
    /// Text filled with "Final Score: n" on game over.
    pub final_score_text: Option<Entity>,
    /// Panel revealed on game over. Starts hidden.
    pub panel: Option<Entity>,
    /// Button that requests a restart and gets the click-feedback pulse.
    pub restart_button: Option<Entity>,
    pub hooks: ControllerHooks,
}

/// Optional controllers that can take over parts of the game-over presentation.
/// The default (all `None`) runs the built-in behaviour.
#[derive(Default, Debug, Clone, Copy)]
pub struct ControllerHooks {
    /// Replaces the whole default game-over presentation. Receives the final score.
    pub game_over_ui: Option<SystemId<In<i32>>>,
    /// Extra effect played alongside the game-over sound.
    pub game_over_effect: Option<SystemId>,
    /// Replaces the built-in panel reveal animation.
    pub ui_animation: Option<SystemId>,
}

/// The manager accepted by registration. Duplicates never replace it.
#[derive(Resource, Default, Debug, Clone, Copy)]
pub struct ActiveGameManager(Option<Entity>);

impl ActiveGameManager {
    pub fn entity(&self) -> Option<Entity> {
        self.0
    }
}

/// Looks up the live manager for systems and observers.
///
/// Prefers the registered manager, so a duplicate waiting to be discarded
/// never hides it. Before anything is registered (or right after the
/// registered one was despawned by a reload) a lone manager is used as is.
#[derive(SystemParam)]
pub struct ActiveManager<'w, 's> {
    record: Option<Res<'w, ActiveGameManager>>,
    managers: Query<'w, 's, &'static GameManager>,
}

impl ActiveManager<'_, '_> {
    pub fn get(&self) -> Option<&GameManager> {
        let registered = self
            .record
            .as_ref()
            .and_then(|record| record.entity())
            .and_then(|entity| self.managers.get(entity).ok());
        registered.or_else(|| self.managers.single().ok())
    }
}

/// Accepts the first manager, rejects any later one while it lives, and prepares
/// the panel of the accepted manager: hidden and fully transparent until game over.
fn register_game_managers(
    mut commands: Commands,
    mut active: ResMut<ActiveGameManager>,
    managers: Query<(), With<GameManager>>,
    added: Query<(Entity, &GameManager), Added<GameManager>>,
    mut visibility: Query<&mut Visibility>,
    mut fades: Query<&mut FadeSurface>,
) {
    for (entity, manager) in &added {
        let established = active
            .entity()
            .is_some_and(|current| current != entity && managers.contains(current));
        if established {
            warn!(?entity, "More than one GameManager in the scene, discarding the new one");
            commands.entity(entity).despawn();
            continue;
        }
        active.0 = Some(entity);

        if let Some(panel) = manager.panel {
            if let Ok(mut panel_visibility) = visibility.get_mut(panel) {
                *panel_visibility = Visibility::Hidden;
            }
            if let Ok(mut fade) = fades.get_mut(panel) {
                fade.opacity = 0.0;
            }
        }
        info!(?entity, "GameManager registered");
    }
}
