use std::{collections::VecDeque, time::Duration};

use bevy::prelude::*;

use crate::easing::ease_out_back;

pub struct TweenPlugin;

impl Plugin for TweenPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (
                (scale_tween_system, fade_tween_system, ease_reveal_system),
                apply_fade_surface_system,
            )
                .chain(),
        );
    }
}

/// Group opacity for a UI subtree (the panel and everything under it).
/// `background_alpha` is the panel's own alpha at full opacity.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct FadeSurface {
    pub opacity: f32,
    pub background_alpha: f32,
}

impl Default for FadeSurface {
    fn default() -> Self {
        Self {
            opacity: 1.0,
            background_alpha: 1.0,
        }
    }
}

/// One leg of a tween: `from` → `to` over `duration`, shaped by `ease`.
#[derive(Debug, Clone, PartialEq)]
pub struct TweenSegment {
    pub from: f32,
    pub to: f32,
    pub duration: Duration,
    pub ease: EaseFunction,
}

/// A chain of segments played back to back. The value snaps to the last
/// segment's `to` once everything has elapsed.
#[derive(Debug, Clone, PartialEq)]
pub struct Tween {
    segments: VecDeque<TweenSegment>,
    elapsed: Duration,
    value: f32,
}

impl Tween {
    pub fn new(from: f32, to: f32, duration: Duration, ease: EaseFunction) -> Self {
        let mut segments = VecDeque::new();
        segments.push_back(TweenSegment {
            from,
            to,
            duration,
            ease,
        });
        Tween {
            segments,
            elapsed: Duration::ZERO,
            value: from,
        }
    }

    /// Stays at `value` for `duration`.
    pub fn hold(value: f32, duration: Duration) -> Self {
        Tween::new(value, value, duration, EaseFunction::Linear)
    }

    /// Continues from where the previous segment ends.
    pub fn then(mut self, to: f32, duration: Duration, ease: EaseFunction) -> Self {
        let from = self.end_value();
        self.segments.push_back(TweenSegment {
            from,
            to,
            duration,
            ease,
        });
        self
    }

    /// Jumps to `to` as soon as the previous segments finish.
    pub fn then_snap(self, to: f32) -> Self {
        self.then(to, Duration::ZERO, EaseFunction::Linear)
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn end_value(&self) -> f32 {
        self.segments.back().map_or(self.value, |segment| segment.to)
    }

    #[cfg(test)]
    pub fn total_duration(&self) -> Duration {
        self.segments
            .iter()
            .map(|segment| segment.duration)
            .sum::<Duration>()
            .saturating_sub(self.elapsed)
    }

    pub fn is_finished(&self) -> bool {
        self.segments.is_empty()
    }

    /// Moves the playhead forward and returns the new value.
    pub fn advance(&mut self, delta: Duration) -> f32 {
        self.elapsed += delta;

        while let Some(segment) = self.segments.front() {
            if self.elapsed < segment.duration {
                let t = self.elapsed.as_secs_f32() / segment.duration.as_secs_f32();
                self.value = segment.from + (segment.to - segment.from) * segment.ease.sample_clamped(t);
                return self.value;
            }
            self.elapsed -= segment.duration;
            self.value = segment.to;
            self.segments.pop_front();
        }

        self.elapsed = Duration::ZERO;
        self.value
    }
}

/// Scales a UI node relative to the scale it had when the tween started.
#[derive(Component, Debug, Clone)]
pub struct ScaleTween {
    pub base: Vec2,
    pub tween: Tween,
}

/// Drives the `FadeSurface` opacity of the same entity.
#[derive(Component, Debug, Clone)]
pub struct FadeTween(pub Tween);

/// Built-in reveal loop: eases scale with ease-out-back and fades in linearly.
/// Used instead of the scale/fade tweens when the reveal style asks for it.
#[derive(Component, Debug, Clone)]
pub struct EaseReveal {
    pub base: Vec2,
    pub timer: Timer,
}

fn scale_tween_system(
    mut commands: Commands,
    mut query: Query<(Entity, &mut UiTransform, &mut ScaleTween)>,
    time: Res<Time>,
) {
    for (entity, mut transform, mut scale_tween) in query.iter_mut() {
        let factor = scale_tween.tween.advance(time.delta());
        transform.scale = scale_tween.base * factor;

        if scale_tween.tween.is_finished() {
            commands.entity(entity).remove::<ScaleTween>();
        }
    }
}

fn fade_tween_system(
    mut commands: Commands,
    mut query: Query<(Entity, &mut FadeSurface, &mut FadeTween)>,
    time: Res<Time>,
) {
    for (entity, mut surface, mut fade_tween) in query.iter_mut() {
        surface.opacity = fade_tween.0.advance(time.delta());

        if fade_tween.0.is_finished() {
            commands.entity(entity).remove::<FadeTween>();
        }
    }
}

fn ease_reveal_system(
    mut commands: Commands,
    mut query: Query<(Entity, &mut UiTransform, Option<&mut FadeSurface>, &mut EaseReveal)>,
    time: Res<Time>,
) {
    for (entity, mut transform, surface, mut reveal) in query.iter_mut() {
        reveal.timer.tick(time.delta());

        let progress = if reveal.timer.is_finished() {
            // Snap to exact final values and remove the component
            commands.entity(entity).remove::<EaseReveal>();
            transform.scale = reveal.base;
            1.0
        } else {
            let progress = reveal.timer.fraction();
            transform.scale = reveal.base * ease_out_back(progress);
            progress
        };

        if let Some(mut surface) = surface {
            surface.opacity = progress;
        }
    }
}

fn set_border_alpha(border: &mut BorderColor, alpha: f32) {
    for side in [
        &mut border.top,
        &mut border.right,
        &mut border.bottom,
        &mut border.left,
    ] {
        side.set_alpha(alpha);
    }
}

/// Pushes each surface's opacity down to the alpha of every node in its subtree.
fn apply_fade_surface_system(
    surfaces: Query<(Entity, &FadeSurface), Changed<FadeSurface>>,
    children: Query<&Children>,
    mut backgrounds: Query<&mut BackgroundColor>,
    mut text_colors: Query<&mut TextColor>,
    mut borders: Query<&mut BorderColor>,
) {
    for (root, surface) in &surfaces {
        let opacity = surface.opacity.clamp(0.0, 1.0);

        if let Ok(mut background) = backgrounds.get_mut(root) {
            background.0.set_alpha(surface.background_alpha * opacity);
        }

        let mut pending: Vec<Entity> = Vec::new();
        if let Ok(kids) = children.get(root) {
            pending.extend(kids.iter());
        }
        while let Some(node) = pending.pop() {
            if let Ok(mut background) = backgrounds.get_mut(node) {
                background.0.set_alpha(opacity);
            }
            if let Ok(mut color) = text_colors.get_mut(node) {
                color.0.set_alpha(opacity);
            }
            if let Ok(mut border) = borders.get_mut(node) {
                set_border_alpha(&mut border, opacity);
            }
            if let Ok(kids) = children.get(node) {
                pending.extend(kids.iter());
            }
        }
    }
}
