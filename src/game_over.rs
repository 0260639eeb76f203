use std::time::Duration;

use bevy::prelude::*;

use crate::{
    audio::GameAudio,
    config::{GameManagerConfig, RevealStyle},
    effects::{EffectPipeline, EffectStep, EffectTargets, HookCall},
    game_state::{final_score_label, GameState, PlayerDied},
    manager::{ActiveManager, GameManager},
    tween::{FadeSurface, Tween},
};

/// Reveal timings for the tweened panel pop.
const POP_SCALE: f32 = 1.1;
const POP_DURATION: Duration = Duration::from_millis(400);
const SETTLE_DURATION: Duration = Duration::from_millis(150);
const FADE_DURATION: Duration = Duration::from_millis(600);
const EASE_REVEAL_DURATION: Duration = Duration::from_millis(500);

pub struct GameOverPlugin;

impl Plugin for GameOverPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GameOverSequencer>()
            .init_resource::<GameManagerConfig>()
            .add_observer(on_player_died)
            .add_systems(Update, advance_sequencer.in_set(SequencerSet));
    }
}

/// Pipelines advance in this set. Input that starts new pipelines runs after it,
/// so a pipeline is never ticked by the frame that started it.
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub struct SequencerSet;

/// In-flight presentation sequences. A filled slot doubles as the
/// "already running" guard for that kind of sequence.
#[derive(Resource, Default, Debug)]
pub struct GameOverSequencer {
    game_over: Option<EffectPipeline>,
    restart: Option<EffectPipeline>,
}

impl GameOverSequencer {
    #[cfg(test)]
    pub fn is_game_over_running(&self) -> bool {
        self.game_over.is_some()
    }

    pub fn is_restarting(&self) -> bool {
        self.restart.is_some()
    }

    /// Starts the game-over sequence and returns the steps due right away.
    /// Returns `None` when one is already running.
    pub fn start_game_over(&mut self, steps: Vec<EffectStep>) -> Option<Vec<EffectStep>> {
        start(&mut self.game_over, steps)
    }

    /// Starts the restart sequence and returns the steps due right away.
    /// Returns `None` when one is already running.
    pub fn start_restart(&mut self, steps: Vec<EffectStep>) -> Option<Vec<EffectStep>> {
        start(&mut self.restart, steps)
    }

    /// Advances both sequences by `delta`, dropping the ones that completed.
    pub fn advance(&mut self, delta: Duration) -> Vec<EffectStep> {
        let mut due = advance_slot(&mut self.game_over, delta);
        due.extend(advance_slot(&mut self.restart, delta));
        due
    }
}

fn start(slot: &mut Option<EffectPipeline>, steps: Vec<EffectStep>) -> Option<Vec<EffectStep>> {
    if slot.is_some() {
        return None;
    }
    let mut pipeline = EffectPipeline::new(steps);
    let due = pipeline.advance(Duration::ZERO);
    if !pipeline.is_finished() {
        *slot = Some(pipeline);
    }
    Some(due)
}

fn advance_slot(slot: &mut Option<EffectPipeline>, delta: Duration) -> Vec<EffectStep> {
    let Some(pipeline) = slot.as_mut() else {
        return Vec::new();
    };
    let due = pipeline.advance(delta);
    if pipeline.is_finished() {
        *slot = None;
    }
    due
}

/// What the game-over plan needs to know about the scene.
#[derive(Default, Clone, Copy)]
pub struct GameOverScene<'a> {
    pub manager: Option<&'a GameManager>,
    pub clip: Option<&'a Handle<AudioSource>>,
    /// Whether the panel carries a `FadeSurface`.
    pub panel_fades: bool,
}

/// Builds the game-over sequence for `score`.
///
/// A game-over UI controller takes over completely. Otherwise the final score,
/// effect hook and sound play at once, and the panel is revealed after the
/// configured delay, either by the UI animation controller or by the built-in
/// reveal.
pub fn game_over_plan(
    scene: GameOverScene,
    score: i32,
    config: &GameManagerConfig,
) -> Vec<EffectStep> {
    let fallback = GameManager::default();
    let manager = scene.manager.unwrap_or(&fallback);

    if let Some(system) = manager.hooks.game_over_ui {
        return vec![EffectStep::Hook(HookCall::ShowGameOverUi { system, score })];
    }

    let mut steps = Vec::new();
    if let Some(target) = manager.final_score_text {
        steps.push(EffectStep::SetText {
            target,
            text: final_score_label(score),
        });
    }
    if let Some(system) = manager.hooks.game_over_effect {
        steps.push(EffectStep::Hook(HookCall::PlayGameOverEffect(system)));
    }
    if let Some(clip) = scene.clip {
        steps.push(EffectStep::Sound(clip.clone()));
    }
    steps.push(EffectStep::Delay(config.reveal_delay()));

    let Some(panel) = manager.panel else {
        return steps;
    };
    steps.push(EffectStep::Activate(panel));

    if let Some(system) = manager.hooks.ui_animation {
        steps.push(EffectStep::Hook(HookCall::PlayUiAnimation(system)));
        return steps;
    }

    match config.reveal_style {
        RevealStyle::Tweened => {
            steps.push(EffectStep::Scale {
                target: panel,
                tween: Tween::new(0.0, POP_SCALE, POP_DURATION, EaseFunction::BackOut).then(
                    1.0,
                    SETTLE_DURATION,
                    EaseFunction::SineInOut,
                ),
            });
            if scene.panel_fades {
                steps.push(EffectStep::Fade {
                    target: panel,
                    tween: Tween::new(0.0, 1.0, FADE_DURATION, EaseFunction::CubicOut),
                });
            }
            // Wait for the longest of the two animations
            steps.push(EffectStep::Delay(
                FADE_DURATION.max(POP_DURATION + SETTLE_DURATION),
            ));
        }
        RevealStyle::PerFrame => {
            steps.push(EffectStep::EaseReveal {
                target: panel,
                duration: EASE_REVEAL_DURATION,
            });
            steps.push(EffectStep::Delay(EASE_REVEAL_DURATION));
        }
    }
    steps
}

fn on_player_died(
    _event: On<PlayerDied>,
    mut state: ResMut<GameState>,
    mut sequencer: ResMut<GameOverSequencer>,
    config: Res<GameManagerConfig>,
    audio: Option<Res<GameAudio>>,
    active: ActiveManager,
    fades: Query<(), With<FadeSurface>>,
    mut targets: EffectTargets,
) {
    if !state.notify_death() {
        debug!("PlayerDied while already game over, ignoring");
        return;
    }
    let score = state.score();
    info!(score, "Game over");

    let manager = active.get();
    let scene = GameOverScene {
        manager,
        clip: audio.as_ref().and_then(|audio| audio.game_over.as_ref()),
        panel_fades: manager
            .and_then(|m| m.panel)
            .is_some_and(|panel| fades.contains(panel)),
    };

    let Some(due) = sequencer.start_game_over(game_over_plan(scene, score, &config)) else {
        return;
    };
    for step in due {
        targets.apply(step);
    }
}

fn advance_sequencer(
    time: Res<Time>,
    mut sequencer: ResMut<GameOverSequencer>,
    mut targets: EffectTargets,
) {
    for step in sequencer.advance(time.delta()) {
        targets.apply(step);
    }
}
