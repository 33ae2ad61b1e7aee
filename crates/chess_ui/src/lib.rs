use bevy::{
    prelude::*,
    sprite::Anchor,
    window::{PresentMode, WindowResolution},
};
use chess_core::{
    Color as ChessColor, Game, GameEvent, Outcome, PieceId, PieceType as ChessPieceType, Position,
    SelectionSquare, BOARD_SIZE,
};
use std::collections::HashMap;

const SQUARE_SIZE: f32 = 80.0;
const WINDOW_SIZE: f32 = 800.0;
const MOVE_SPEED: f32 = 500.0;

const PIECE_Z: f32 = 2.0;
const HINT_Z: f32 = 1.5;

/// Renders a [`Game`] and feeds clicks back into it. The game keeps all
/// the rules; this plugin only mirrors its events.
pub struct ChessUiPlugin {
    game: Game,
}

impl ChessUiPlugin {
    pub fn new(game: Game) -> Self {
        Self { game }
    }
}

#[derive(Resource)]
struct ChessGame {
    game: Game,
    sprites: HashMap<PieceId, Entity>,
    hints: Vec<Entity>,
}

#[derive(Component)]
struct StatusText;

#[derive(Component)]
struct PromotionPicker;

#[derive(Component, Copy, Clone)]
struct PromotionButton(ChessPieceType);

#[derive(Component)]
struct MovingPiece {
    target_position: Vec3,
    speed: f32,
}

impl Plugin for ChessUiPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Chess".into(),
                resolution: WindowResolution::new(WINDOW_SIZE, WINDOW_SIZE),
                present_mode: PresentMode::AutoVsync,
                resizable: false,
                ..default()
            }),
            ..default()
        }))
        .insert_resource(ChessGame {
            game: self.game.clone(),
            sprites: HashMap::new(),
            hints: Vec::new(),
        })
        .add_systems(Startup, setup)
        .add_systems(
            Update,
            (
                handle_input,
                handle_promotion_buttons,
                handle_restart,
                apply_game_events,
                update_piece_movement,
            )
                .chain(),
        );
    }
}

fn setup(mut commands: Commands) {
    commands.spawn(Camera2dBundle::default());

    let board_size = BOARD_SIZE as f32 * SQUARE_SIZE;
    commands.spawn(SpriteBundle {
        sprite: Sprite {
            color: Color::rgb(0.1, 0.1, 0.1),
            custom_size: Some(Vec2::new(board_size + 20.0, board_size + 20.0)),
            ..default()
        },
        transform: Transform::from_xyz(0.0, 0.0, 0.0),
        ..default()
    });

    for rank in 0..BOARD_SIZE {
        for file in 0..BOARD_SIZE {
            // a1 is a dark square
            let is_light = (rank + file) % 2 == 1;
            commands.spawn(SpriteBundle {
                sprite: Sprite {
                    color: if is_light {
                        Color::rgb(0.9, 0.9, 0.9)
                    } else {
                        Color::rgb(0.3, 0.3, 0.3)
                    },
                    custom_size: Some(Vec2::new(SQUARE_SIZE, SQUARE_SIZE)),
                    ..default()
                },
                transform: Transform::from_translation(board_position_to_world(
                    Position::new(file, rank),
                    1.0,
                )),
                ..default()
            });
        }
    }

    spawn_ui(&mut commands);
}

fn spawn_ui(commands: &mut Commands) {
    commands.spawn((
        TextBundle::from_section(
            "",
            TextStyle {
                font_size: 30.0,
                color: Color::WHITE,
                ..default()
            },
        )
        .with_style(Style {
            position_type: PositionType::Absolute,
            top: Val::Px(10.0),
            left: Val::Px(10.0),
            ..default()
        }),
        StatusText,
    ));

    commands
        .spawn((
            NodeBundle {
                style: Style {
                    position_type: PositionType::Absolute,
                    top: Val::Px(10.0),
                    right: Val::Px(10.0),
                    ..default()
                },
                visibility: Visibility::Hidden,
                ..default()
            },
            PromotionPicker,
        ))
        .with_children(|picker| {
            for kind in ChessPieceType::PROMOTIONS {
                picker
                    .spawn((
                        ButtonBundle {
                            style: Style {
                                width: Val::Px(50.0),
                                height: Val::Px(50.0),
                                margin: UiRect::all(Val::Px(4.0)),
                                justify_content: JustifyContent::Center,
                                align_items: AlignItems::Center,
                                ..default()
                            },
                            background_color: Color::rgb(0.25, 0.25, 0.35).into(),
                            ..default()
                        },
                        PromotionButton(kind),
                    ))
                    .with_children(|button| {
                        button.spawn(TextBundle::from_section(
                            kind.to_char(ChessColor::White).to_string(),
                            TextStyle {
                                font_size: 30.0,
                                color: Color::WHITE,
                                ..default()
                            },
                        ));
                    });
            }
        });
}

fn spawn_piece(
    commands: &mut Commands,
    piece_type: ChessPieceType,
    color: ChessColor,
    position: Position,
) -> Entity {
    let (fill, ink) = match color {
        ChessColor::White => (Color::rgb(0.95, 0.92, 0.85), Color::rgb(0.1, 0.1, 0.1)),
        ChessColor::Black => (Color::rgb(0.15, 0.15, 0.15), Color::rgb(0.95, 0.95, 0.95)),
    };

    commands
        .spawn(SpriteBundle {
            transform: Transform::from_translation(board_position_to_world(position, PIECE_Z)),
            sprite: Sprite {
                color: fill,
                custom_size: Some(Vec2::new(SQUARE_SIZE * 0.7, SQUARE_SIZE * 0.7)),
                anchor: Anchor::Center,
                ..default()
            },
            ..default()
        })
        .with_children(|parent| {
            parent.spawn(Text2dBundle {
                text: Text::from_section(
                    piece_type.to_char(ChessColor::White).to_string(),
                    TextStyle {
                        font_size: SQUARE_SIZE * 0.5,
                        color: ink,
                        ..default()
                    },
                ),
                transform: Transform::from_xyz(0.0, 0.0, 0.1),
                ..default()
            });
        })
        .id()
}

fn spawn_hints(
    commands: &mut Commands,
    selected: Option<Position>,
    squares: &[SelectionSquare],
) -> Vec<Entity> {
    let mut hints = Vec::new();
    let Some(selected) = selected else {
        return hints;
    };

    let mut spawn_hint = |position: Position, color: Color| {
        let entity = commands
            .spawn(SpriteBundle {
                transform: Transform::from_translation(board_position_to_world(position, HINT_Z)),
                sprite: Sprite {
                    color,
                    custom_size: Some(Vec2::new(SQUARE_SIZE, SQUARE_SIZE)),
                    ..default()
                },
                ..default()
            })
            .id();
        hints.push(entity);
    };

    spawn_hint(selected, Color::rgba(0.9, 0.8, 0.2, 0.5));
    for square in squares {
        let color = if square.is_free {
            Color::rgba(0.2, 0.8, 0.3, 0.5)
        } else {
            Color::rgba(0.9, 0.2, 0.2, 0.5)
        };
        spawn_hint(square.position, color);
    }
    hints
}

fn handle_input(
    windows: Query<&Window>,
    camera_q: Query<(&Camera, &GlobalTransform)>,
    mouse_button: Res<Input<MouseButton>>,
    mut chess: ResMut<ChessGame>,
) {
    if !mouse_button.just_pressed(MouseButton::Left) {
        return;
    }
    let (Ok(window), Ok((camera, camera_transform))) = (windows.get_single(), camera_q.get_single())
    else {
        return;
    };

    if let Some(world_position) = window
        .cursor_position()
        .and_then(|cursor| camera.viewport_to_world(camera_transform, cursor))
        .map(|ray| ray.origin.truncate())
    {
        let clicked = world_to_board_position(world_position);
        if clicked.is_on_board() {
            chess.game.on_square_selected(clicked);
        }
    }
}

fn handle_promotion_buttons(
    buttons: Query<(&Interaction, &PromotionButton), Changed<Interaction>>,
    mut chess: ResMut<ChessGame>,
) {
    for (interaction, button) in &buttons {
        if *interaction == Interaction::Pressed {
            if let Err(err) = chess.game.choose_promotion(button.0) {
                warn!("promotion to {:?} refused: {}", button.0, err);
            }
        }
    }
}

fn handle_restart(keys: Res<Input<KeyCode>>, mut chess: ResMut<ChessGame>) {
    if keys.just_pressed(KeyCode::R) {
        if let Err(err) = chess.game.restart() {
            warn!("restart failed: {}", err);
        }
    }
}

/// Mirrors the engine's events onto sprites and text.
fn apply_game_events(
    mut commands: Commands,
    mut chess: ResMut<ChessGame>,
    mut status: Query<&mut Text, With<StatusText>>,
    mut picker: Query<&mut Visibility, With<PromotionPicker>>,
) {
    let events = chess.game.drain_events();
    if events.is_empty() {
        return;
    }

    for event in events {
        match event {
            GameEvent::PieceCreated {
                id,
                piece_type,
                color,
                position,
            } => {
                let entity = spawn_piece(&mut commands, piece_type, color, position);
                chess.sprites.insert(id, entity);
            }
            GameEvent::PieceRemoved { id, .. } => {
                if let Some(entity) = chess.sprites.remove(&id) {
                    commands.entity(entity).despawn_recursive();
                }
            }
            GameEvent::PieceMoved { id, to, .. } => {
                if let Some(&entity) = chess.sprites.get(&id) {
                    commands.entity(entity).insert(MovingPiece {
                        target_position: board_position_to_world(to, PIECE_Z),
                        speed: MOVE_SPEED,
                    });
                }
            }
            GameEvent::SelectionChanged { selected, squares } => {
                for entity in chess.hints.drain(..) {
                    commands.entity(entity).despawn();
                }
                chess.hints = spawn_hints(&mut commands, selected, &squares);
            }
            GameEvent::PromotionRequested(request) => {
                info!("choose a piece for the pawn on {}", request.position);
            }
            GameEvent::TurnEnded { active } => {
                debug!("{} to move", active);
            }
            GameEvent::GameFinished(outcome) => {
                info!("game over: {}", outcome_line(outcome));
            }
        }
    }

    if let Ok(mut text) = status.get_single_mut() {
        text.sections[0].value = status_line(&chess.game);
    }
    if let Ok(mut visibility) = picker.get_single_mut() {
        *visibility = if chess.game.pending_promotion().is_some() {
            Visibility::Visible
        } else {
            Visibility::Hidden
        };
    }
}

fn update_piece_movement(
    mut commands: Commands,
    time: Res<Time>,
    mut query: Query<(Entity, &mut Transform, &MovingPiece)>,
) {
    for (entity, mut transform, moving) in query.iter_mut() {
        let offset = moving.target_position - transform.translation;
        let step = moving.speed * time.delta_seconds();

        if offset.length() <= step.max(1.0) {
            transform.translation = moving.target_position;
            commands.entity(entity).remove::<MovingPiece>();
        } else {
            transform.translation += offset.normalize() * step;
        }
    }
}

fn status_line(game: &Game) -> String {
    if let Some(request) = game.pending_promotion() {
        return format!("{} promotes on {}", request.team, request.position);
    }
    match game.outcome() {
        Some(outcome) => format!("{} - R to restart", outcome_line(outcome)),
        None if game.is_in_check(game.active_team()) => {
            format!("{} to move (check)", game.active_team())
        }
        None => format!("{} to move", game.active_team()),
    }
}

fn outcome_line(outcome: Outcome) -> String {
    match outcome {
        Outcome::Checkmate { winner } => format!("{} won", winner),
        Outcome::Stalemate => "Stalemate".to_string(),
    }
}

fn board_position_to_world(pos: Position, z: f32) -> Vec3 {
    let half = BOARD_SIZE as f32 / 2.0 - 0.5;
    Vec3::new(
        (pos.file as f32 - half) * SQUARE_SIZE,
        (pos.rank as f32 - half) * SQUARE_SIZE,
        z,
    )
}

fn world_to_board_position(world: Vec2) -> Position {
    let half_board = BOARD_SIZE as f32 * SQUARE_SIZE / 2.0;
    Position::new(
        ((world.x + half_board) / SQUARE_SIZE).floor() as i8,
        ((world.y + half_board) / SQUARE_SIZE).floor() as i8,
    )
}
