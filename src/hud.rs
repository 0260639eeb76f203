use bevy::prelude::*;

use crate::{
    game_state::{score_label, AddScore, PlayerDied},
    manager::GameManager,
    scene::SceneEntity,
    tween::FadeSurface,
};

pub struct HudPlugin;

impl Plugin for HudPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, demo_controls_system);
    }
}

const PANEL_ALPHA: f32 = 0.75;

/// Space scores, K kills the player. Stands in for real gameplay.
fn demo_controls_system(mut commands: Commands, keys: Res<ButtonInput<KeyCode>>) {
    if keys.just_pressed(KeyCode::Space) {
        commands.trigger(AddScore { delta: 10 });
    }
    if keys.just_pressed(KeyCode::KeyK) {
        commands.trigger(PlayerDied);
    }
}

/// Builds the scene: camera, score text, and the hidden game-over panel.
/// Registered as a one-shot system so a reload can run it again.
pub fn setup_scene(mut commands: Commands) {
    commands.spawn((SceneEntity, Camera2d));

    let score_text = commands
        .spawn((
            SceneEntity,
            Text::new(score_label(0)),
            TextFont {
                font_size: 40.0,
                ..default()
            },
            TextColor(Color::WHITE),
            Node {
                position_type: PositionType::Absolute,
                top: Val::Px(16.0),
                left: Val::Px(16.0),
                ..default()
            },
        ))
        .id();

    commands.spawn((
        SceneEntity,
        Text::new("Space: +10 points    K: die    Click: restart after game over"),
        TextFont {
            font_size: 18.0,
            ..default()
        },
        TextColor(Color::srgb(0.7, 0.7, 0.7)),
        Node {
            position_type: PositionType::Absolute,
            bottom: Val::Px(16.0),
            left: Val::Px(16.0),
            ..default()
        },
    ));

    let final_score_text = commands
        .spawn((
            Text::new(""),
            TextFont {
                font_size: 48.0,
                ..default()
            },
            TextColor(Color::WHITE),
            TextLayout::new_with_justify(Justify::Center),
        ))
        .id();

    let restart_button = commands
        .spawn((
            Button,
            Node {
                width: Val::Px(220.0),
                height: Val::Px(70.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                border: UiRect::all(Val::Px(3.0)),
                ..default()
            },
            BackgroundColor(Color::srgb(0.5, 0.1, 0.1)),
            BorderColor::all(Color::srgb(0.8, 0.3, 0.3)),
        ))
        .with_children(|button| {
            button.spawn((
                Text::new("Restart"),
                TextFont {
                    font_size: 36.0,
                    ..default()
                },
                TextColor(Color::WHITE),
            ));
        })
        .id();

    // Full-screen centered panel, hidden until game over
    let panel = commands
        .spawn((
            SceneEntity,
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                row_gap: Val::Px(24.0),
                ..default()
            },
            BackgroundColor(Color::BLACK.with_alpha(PANEL_ALPHA)),
            FadeSurface {
                opacity: 0.0,
                background_alpha: PANEL_ALPHA,
            },
            Visibility::Hidden,
            GlobalZIndex(10),
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new("GAME OVER"),
                TextFont {
                    font_size: 120.0,
                    ..default()
                },
                TextColor(Color::WHITE),
                TextLayout::new_with_justify(Justify::Center),
            ));
        })
        .add_children(&[final_score_text, restart_button])
        .id();

    commands.spawn((
        SceneEntity,
        GameManager {
            score_text: Some(score_text),
            final_score_text: Some(final_score_text),
            panel: Some(panel),
            restart_button: Some(restart_button),
            ..default()
        },
    ));
}
