use std::{collections::VecDeque, time::Duration};

use bevy::{
    ecs::system::{SystemId, SystemParam},
    prelude::*,
};

use crate::{
    scene::ReloadScene,
    tween::{EaseReveal, FadeSurface, FadeTween, ScaleTween, Tween},
};

/// One unit of a presentation sequence. Everything except `Delay` happens
/// instantly when reached; `Delay` is the only suspension point.
#[derive(Debug, Clone, PartialEq)]
pub enum EffectStep {
    Delay(Duration),
    SetText { target: Entity, text: String },
    Hook(HookCall),
    Sound(Handle<AudioSource>),
    Activate(Entity),
    Scale { target: Entity, tween: Tween },
    Fade { target: Entity, tween: Tween },
    EaseReveal { target: Entity, duration: Duration },
    ReloadScene,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookCall {
    ShowGameOverUi { system: SystemId<In<i32>>, score: i32 },
    PlayGameOverEffect(SystemId),
    PlayUiAnimation(SystemId),
}

/// Runs a fixed list of steps in order, waiting out each `Delay` on a timer.
#[derive(Debug, Clone)]
pub struct EffectPipeline {
    steps: VecDeque<EffectStep>,
    wait: Option<Timer>,
}

impl EffectPipeline {
    pub fn new(steps: impl IntoIterator<Item = EffectStep>) -> Self {
        EffectPipeline {
            steps: steps.into_iter().collect(),
            wait: None,
        }
    }

    /// Ticks the pending delay by `delta` and returns every step that became due,
    /// stopping at the next delay that still has time left on it.
    pub fn advance(&mut self, delta: Duration) -> Vec<EffectStep> {
        let mut due = Vec::new();

        if let Some(timer) = self.wait.as_mut() {
            timer.tick(delta);
            if !timer.is_finished() {
                return due;
            }
            self.wait = None;
        }

        while let Some(step) = self.steps.pop_front() {
            match step {
                EffectStep::Delay(duration) if duration.is_zero() => {}
                EffectStep::Delay(duration) => {
                    self.wait = Some(Timer::new(duration, TimerMode::Once));
                    break;
                }
                step => due.push(step),
            }
        }
        due
    }

    #[cfg(test)]
    pub fn is_waiting(&self) -> bool {
        self.wait.is_some()
    }

    pub fn is_finished(&self) -> bool {
        self.wait.is_none() && self.steps.is_empty()
    }
}

/// Everything a step may touch. Missing targets are skipped.
#[derive(SystemParam)]
pub struct EffectTargets<'w, 's> {
    commands: Commands<'w, 's>,
    texts: Query<'w, 's, &'static mut Text>,
    visibility: Query<'w, 's, &'static mut Visibility>,
    transforms: Query<'w, 's, &'static mut UiTransform>,
    fades: Query<'w, 's, &'static mut FadeSurface>,
    running_scales: Query<'w, 's, &'static ScaleTween>,
}

impl EffectTargets<'_, '_> {
    pub fn apply(&mut self, step: EffectStep) {
        match step {
            EffectStep::Delay(_) => {}
            EffectStep::SetText { target, text } => {
                if let Ok(mut current) = self.texts.get_mut(target) {
                    current.0 = text;
                }
            }
            EffectStep::Hook(HookCall::ShowGameOverUi { system, score }) => {
                self.commands.run_system_with(system, score);
            }
            EffectStep::Hook(HookCall::PlayGameOverEffect(system))
            | EffectStep::Hook(HookCall::PlayUiAnimation(system)) => {
                self.commands.run_system(system);
            }
            EffectStep::Sound(clip) => {
                self.commands
                    .spawn((AudioPlayer::new(clip), PlaybackSettings::DESPAWN));
            }
            EffectStep::Activate(target) => {
                if let Ok(mut visibility) = self.visibility.get_mut(target) {
                    *visibility = Visibility::Visible;
                }
            }
            EffectStep::Scale { target, tween } => {
                let Ok(mut transform) = self.transforms.get_mut(target) else {
                    debug!(?target, "scale target has no UiTransform, skipping");
                    return;
                };
                // A pulse started mid-animation scales relative to the original size
                let base = self
                    .running_scales
                    .get(target)
                    .map_or(transform.scale, |running| running.base);
                transform.scale = base * tween.value();
                self.commands.entity(target).insert(ScaleTween { base, tween });
            }
            EffectStep::Fade { target, tween } => {
                if let Ok(mut surface) = self.fades.get_mut(target) {
                    surface.opacity = tween.value();
                    self.commands.entity(target).insert(FadeTween(tween));
                }
            }
            EffectStep::EaseReveal { target, duration } => {
                let Ok(mut transform) = self.transforms.get_mut(target) else {
                    return;
                };
                let base = transform.scale;
                transform.scale = Vec2::ZERO;
                if let Ok(mut surface) = self.fades.get_mut(target) {
                    surface.opacity = 0.0;
                }
                self.commands.entity(target).insert(EaseReveal {
                    base,
                    timer: Timer::new(duration, TimerMode::Once),
                });
            }
            EffectStep::ReloadScene => {
                self.commands.trigger(ReloadScene);
            }
        }
    }
}
