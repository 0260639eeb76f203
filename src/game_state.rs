// game_state.rs - Score and game-over status for the running scene.
// There's exactly one GameState per scene. Scene reload replaces it with a fresh one.

use bevy::prelude::*;

use crate::manager::ActiveManager;

pub struct GameStatePlugin;

impl Plugin for GameStatePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GameState>().add_observer(on_add_score);
    }
}

/// GameState resource - the single source of truth for score and game-over status.
#[derive(Resource, Debug, Default, Clone, PartialEq, Eq)]
pub struct GameState {
    score: i32,
    is_game_over: bool,
}

impl GameState {
    pub fn score(&self) -> i32 {
        self.score
    }

    pub fn is_game_over(&self) -> bool {
        self.is_game_over
    }

    /// Adds `delta` to the score unless the game is already over.
    /// Returns whether the score was touched.
    pub fn add_score(&mut self, delta: i32) -> bool {
        if self.is_game_over {
            return false;
        }
        self.score = self.score.saturating_add(delta);
        true
    }

    /// Flips into the game-over state. Returns true only on the first transition,
    /// so callers can start the game-over pipeline exactly once.
    pub fn notify_death(&mut self) -> bool {
        if self.is_game_over {
            return false;
        }
        self.is_game_over = true;
        true
    }

    pub fn reset(&mut self) {
        *self = GameState::default();
    }
}

pub fn score_label(score: i32) -> String {
    format!("Score : {}", score)
}

pub fn final_score_label(score: i32) -> String {
    format!("Final Score: {}", score)
}

/// Gameplay code triggers this whenever points are earned.
#[derive(Event, Debug, Clone, Copy)]
pub struct AddScore {
    pub delta: i32,
}

/// Triggered when the player character dies. Starts the game-over pipeline once.
#[derive(Event, Debug, Clone, Copy)]
pub struct PlayerDied;

fn on_add_score(
    event: On<AddScore>,
    mut state: ResMut<GameState>,
    manager: ActiveManager,
    mut texts: Query<&mut Text>,
) {
    if !state.add_score(event.delta) {
        // Game over: late points are dropped silently
        return;
    }

    let Some(score_text) = manager.get().and_then(|m| m.score_text) else {
        return;
    };
    if let Ok(mut text) = texts.get_mut(score_text) {
        text.0 = score_label(state.score());
    }
}
