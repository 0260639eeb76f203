use bevy::prelude::*;

use crate::{
    config::GameManagerConfig,
    effects::{EffectStep, EffectTargets},
    game_over::{GameOverSequencer, SequencerSet},
    game_state::GameState,
    manager::{ActiveManager, GameManager},
    tween::Tween,
};

pub struct RestartPlugin;

impl Plugin for RestartPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GameManagerConfig>()
            .add_observer(on_restart_requested)
            .add_systems(
                Update,
                (
                    restart_on_click.run_if(resource_exists::<ButtonInput<MouseButton>>),
                    restart_button_system,
                )
                    .after(SequencerSet),
            );
    }
}

/// Asks for the scene to be restarted. Ignored while a restart is already underway.
#[derive(Event, Debug, Clone, Copy)]
pub struct RestartRequested;

/// Click pulse on the restart button (if any), the restart delay, then the reload.
pub fn restart_plan(manager: Option<&GameManager>, config: &GameManagerConfig) -> Vec<EffectStep> {
    let mut steps = Vec::new();
    if let Some(button) = manager.and_then(|m| m.restart_button) {
        steps.push(EffectStep::Scale {
            target: button,
            tween: Tween::hold(config.click_feedback_scale, config.click_feedback()).then_snap(1.0),
        });
    }
    steps.push(EffectStep::Delay(config.restart_delay()));
    steps.push(EffectStep::ReloadScene);
    steps
}

fn on_restart_requested(
    _event: On<RestartRequested>,
    mut sequencer: ResMut<GameOverSequencer>,
    config: Res<GameManagerConfig>,
    manager: ActiveManager,
    mut targets: EffectTargets,
) {
    if sequencer.is_restarting() {
        debug!("Restart already underway, ignoring request");
        return;
    }

    let plan = restart_plan(manager.get(), &config);
    let Some(due) = sequencer.start_restart(plan) else {
        return;
    };
    info!(scene = %config.scene_name, "Restart requested");
    for step in due {
        targets.apply(step);
    }
}

/// Any left click restarts once the game is over.
fn restart_on_click(
    mut commands: Commands,
    mouse: Res<ButtonInput<MouseButton>>,
    state: Res<GameState>,
) {
    if state.is_game_over() && mouse.just_pressed(MouseButton::Left) {
        commands.trigger(RestartRequested);
    }
}

fn restart_button_system(
    mut commands: Commands,
    manager: ActiveManager,
    interactions: Query<&Interaction, Changed<Interaction>>,
) {
    let Some(button) = manager.get().and_then(|m| m.restart_button) else {
        return;
    };
    if matches!(interactions.get(button), Ok(Interaction::Pressed)) {
        commands.trigger(RestartRequested);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::{
        game_state::PlayerDied,
        scene::SceneLoader,
        test_support::{scene, test_app},
        tween::ScaleTween,
    };

    fn reloads(app: &App) -> u32 {
        app.world().resource::<SceneLoader>().reloads
    }

    fn click(app: &mut App) {
        let mut mouse = app.world_mut().resource_mut::<ButtonInput<MouseButton>>();
        mouse.release(MouseButton::Left);
        mouse.clear();
        mouse.press(MouseButton::Left);
    }

    fn hold(app: &mut App) {
        // Keeps the button down but drops this frame's just_pressed edge
        app.world_mut()
            .resource_mut::<ButtonInput<MouseButton>>()
            .clear();
    }

    #[test]
    fn plan_pulses_button_then_waits_then_reloads() {
        let mut world = World::new();
        let manager = GameManager {
            restart_button: Some(world.spawn_empty().id()),
            ..default()
        };
        let steps = restart_plan(Some(&manager), &GameManagerConfig::default());

        assert_eq!(steps.len(), 3);
        assert!(matches!(steps[0], EffectStep::Scale { .. }));
        assert_eq!(steps[1], EffectStep::Delay(Duration::from_millis(300)));
        assert_eq!(steps[2], EffectStep::ReloadScene);
    }

    #[test]
    fn plan_without_button_still_waits_the_same() {
        let steps = restart_plan(None, &GameManagerConfig::default());
        assert_eq!(
            steps,
            vec![
                EffectStep::Delay(Duration::from_millis(300)),
                EffectStep::ReloadScene
            ]
        );
    }

    #[test]
    fn click_while_playing_does_nothing() {
        let mut app = test_app();
        app.update();

        click(&mut app);
        for _ in 0..5 {
            app.update();
            hold(&mut app);
        }

        assert_eq!(reloads(&app), 0);
        assert!(!app.world().resource::<GameOverSequencer>().is_restarting());
    }

    #[test]
    fn click_after_game_over_reloads_after_restart_delay() {
        let mut app = test_app();
        app.update();
        app.world_mut().trigger(PlayerDied);

        click(&mut app);
        app.update();
        hold(&mut app);
        assert!(app.world().resource::<GameOverSequencer>().is_restarting());

        app.update();
        app.update();
        assert_eq!(reloads(&app), 0);

        app.update();
        assert_eq!(reloads(&app), 1);
        assert!(!app.world().resource::<GameState>().is_game_over());
    }

    #[test]
    fn held_or_repeated_clicks_start_one_restart() {
        let mut app = test_app();
        app.update();
        app.world_mut().trigger(PlayerDied);

        // Held down across ticks
        click(&mut app);
        app.update();
        hold(&mut app);
        app.update();

        // A fresh click while the restart is underway
        click(&mut app);
        app.update();
        hold(&mut app);
        assert_eq!(reloads(&app), 0);

        app.update();
        assert_eq!(reloads(&app), 1);
        for _ in 0..5 {
            app.update();
        }
        assert_eq!(reloads(&app), 1);
    }

    #[test]
    fn restart_button_gets_click_feedback() {
        let mut app = test_app();
        app.update();
        let button = scene(&mut app).restart_button.unwrap();

        app.world_mut().trigger(RestartRequested);

        let world = app.world();
        assert_eq!(world.get::<UiTransform>(button).unwrap().scale, Vec2::splat(0.9));
        assert!(world.get::<ScaleTween>(button).is_some());

        // Requests during the restart are dropped
        app.world_mut().trigger(RestartRequested);
        app.update();
        let scale = app.world().get::<UiTransform>(button).unwrap().scale;
        assert_eq!(scale, Vec2::ONE);
    }

    #[test]
    fn pressing_restart_button_requests_restart() {
        let mut app = test_app();
        app.update();
        let button = scene(&mut app).restart_button.unwrap();

        app.world_mut().entity_mut(button).insert(Interaction::Pressed);
        app.update();

        assert!(app.world().resource::<GameOverSequencer>().is_restarting());
    }
}
