use glam::{Vec2, Vec3};

use breakout::Settings;
use breakout::audio::{AudioManager, LogSink};
use breakout::consts::*;
use breakout::services::TextureRegistry;
use breakout::sim::powerup;
use breakout::sim::{
    Body, Direction, GameEvent, GamePhase, GameState, Key, KeyState, Level, PowerUpKind,
    ball_aabb, tick,
};
use breakout::App;

const DT: f32 = 1.0 / 60.0;

fn game(levels: &[&str]) -> GameState {
    let settings = Settings::default();
    let registry = TextureRegistry::new();
    let levels = levels
        .iter()
        .map(|text| Level::parse(text, settings.width, settings.height / 2.0, &registry))
        .collect();
    GameState::with_levels(&settings, levels, &registry)
}

fn tap(state: &mut GameState, keys: &mut KeyState, key: Key) {
    keys.press(key);
    tick(state, keys, DT);
    keys.release(key);
}

#[test]
fn test_two_brick_grid_scenario() {
    let registry = TextureRegistry::new();
    let mut level = Level::from_grid(&[vec![1, 2], vec![0, 0]], 200.0, 100.0, &registry);

    assert_eq!(level.bricks.len(), 2);
    assert!(level.bricks[0].body.solid);
    assert_eq!(level.bricks[0].body.pos, Vec2::ZERO);
    assert_eq!(level.bricks[1].body.pos, Vec2::new(100.0, 0.0));
    assert!(!level.is_complete());

    level.bricks[1].body.destroyed = true;
    assert!(level.is_complete());
    assert!(!level.bricks[0].body.destroyed);
}

#[test]
fn test_corner_near_miss_then_hit() {
    let brick = Body::new(Vec2::ZERO, Vec2::new(50.0, 50.0));

    let ball = Body::new(Vec2::new(45.0, 45.0), Vec2::splat(20.0));
    assert!(!ball_aabb(&ball, 10.0, &brick).hit);

    let ball = Body::new(Vec2::new(38.0, 38.0), Vec2::splat(20.0));
    let collision = ball_aabb(&ball, 10.0, &brick);
    assert!(collision.hit);
    assert_eq!(collision.direction, Direction::Up);
}

#[test]
fn test_level_select_is_cyclic_and_edge_triggered() {
    let mut state = game(&["2", "3", "4", "5"]);
    let mut keys = KeyState::new();

    keys.press(Key::NextLevel);
    for _ in 0..10 {
        tick(&mut state, &mut keys, DT);
    }
    keys.release(Key::NextLevel);
    assert_eq!(state.level_index, 1);

    tap(&mut state, &mut keys, Key::PrevLevel);
    tap(&mut state, &mut keys, Key::PrevLevel);
    assert_eq!(state.level_index, 3);

    tap(&mut state, &mut keys, Key::Confirm);
    assert_eq!(state.phase, GamePhase::Active);
    assert!(state.drain_events().contains(&GameEvent::LevelStarted { level: 3 }));
}

#[test]
fn test_losing_every_life_returns_to_menu() {
    let mut state = game(&["2 2 2 2"]);
    let mut keys = KeyState::new();
    tap(&mut state, &mut keys, Key::Confirm);

    for _ in 0..STARTING_LIVES {
        state.launch_ball();
        let ball = &mut state.world[state.ball].body;
        ball.pos = Vec2::new(400.0, 700.0);
        ball.vel = Vec2::new(0.0, 100.0);
        tick(&mut state, &mut keys, DT);
    }

    assert_eq!(state.phase, GamePhase::Menu);
    assert_eq!(state.lives, STARTING_LIVES);
    let events = state.drain_events();
    let lost = events
        .iter()
        .filter(|e| matches!(e, GameEvent::LifeLost { .. }))
        .count();
    assert_eq!(lost, STARTING_LIVES as usize);
    assert!(events.contains(&GameEvent::GameOver));

    // A fresh game is ready to go
    assert!(state.ball_is_static());
    assert_eq!(state.paddle_body().size, PLAYER_SIZE);
}

#[test]
fn test_lost_ball_keeps_live_power_up_effects() {
    let mut state = game(&["2 2 2 2"]);
    let mut keys = KeyState::new();
    tap(&mut state, &mut keys, Key::Confirm);

    let drop_at = state.paddle_body().pos - Vec2::new(0.0, 10.0);
    for kind in [PowerUpKind::Sticky, PowerUpKind::PassThrough] {
        let id = state.next_entity_id();
        state.power_ups.push(powerup::spawn(id, kind, drop_at, None));
    }
    tick(&mut state, &mut keys, DT);
    assert!(state.ball_state().sticky);
    assert!(state.ball_state().pass_through);

    state.launch_ball();
    let ball = &mut state.world[state.ball].body;
    ball.pos = Vec2::new(400.0, 700.0);
    ball.vel = Vec2::new(0.0, 100.0);
    tick(&mut state, &mut keys, DT);

    assert_eq!(state.lives, STARTING_LIVES - 1);
    assert!(state.ball_is_static());
    assert_eq!(state.world.parent_of(state.ball), Some(state.paddle));
    assert_eq!(state.ball_body().vel, INITIAL_BALL_VELOCITY);
    assert!(state.ball_state().sticky);
    assert!(state.ball_state().pass_through);
    assert_eq!(state.paddle_body().color, STICKY_PADDLE_COLOR);
    assert_eq!(state.ball_body().color, PASS_THROUGH_BALL_COLOR);
    assert!(state.has_active_power_up(PowerUpKind::Sticky));
    assert!(state.has_active_power_up(PowerUpKind::PassThrough));

    // The effects still wear off on schedule
    for _ in 0..(21 * 60) {
        tick(&mut state, &mut keys, DT);
    }
    assert!(!state.ball_state().sticky);
    assert!(!state.ball_state().pass_through);
    assert_eq!(state.paddle_body().color, Vec3::ONE);
    assert_eq!(state.ball_body().color, Vec3::ONE);
    assert!(state.power_ups.is_empty());
}

#[test]
fn test_win_resets_current_level() {
    let mut state = game(&["1 2"]);
    let mut keys = KeyState::new();
    tap(&mut state, &mut keys, Key::Confirm);

    if let Some(level) = state.current_level_mut() {
        level.bricks[1].body.destroyed = true;
    }
    tick(&mut state, &mut keys, DT);
    assert_eq!(state.phase, GamePhase::Win);
    assert!(state.effects.chaos);

    // Nothing moves on the win screen
    let ball = state.ball_body().pos;
    keys.press(Key::Left);
    tick(&mut state, &mut keys, DT);
    keys.release(Key::Left);
    assert_eq!(state.ball_body().pos, ball);

    tap(&mut state, &mut keys, Key::Confirm);
    assert_eq!(state.phase, GamePhase::Menu);
    assert!(!state.effects.chaos);
    assert_eq!(state.current_level().map(|l| l.remaining()), Some(1));
}

#[test]
fn test_same_seed_same_game() {
    let play = || {
        let settings = Settings::default();
        let registry = TextureRegistry::new();
        let levels = vec![Level::parse(
            "5 5 5 5 5 5 5 5\n4 4 4 4 4 4 4 4\n3 3 3 3 3 3 3 3\n2 2 2 2 2 2 2 2",
            settings.width,
            settings.height / 2.0,
            &registry,
        )];
        let state = GameState::with_levels(&settings, levels, &registry);
        let mut audio = AudioManager::new(Box::new(LogSink), &settings);
        let mut app = App::with_state(state, &registry, &mut audio);
        app.set_autopilot(true);
        let mut events = Vec::new();
        for _ in 0..(20 * 60) {
            events.extend(app.update(DT, &mut audio));
        }
        (events, app.state.ball_body().pos)
    };

    let (a_events, a_ball) = play();
    let (b_events, b_ball) = play();
    assert_eq!(a_events, b_events);
    assert_eq!(a_ball, b_ball);
}

#[test]
fn test_shipped_levels_parse() {
    let registry = TextureRegistry::new();
    for path in Settings::default().levels {
        let level = Level::load(
            format!("{}/{}", env!("CARGO_MANIFEST_DIR"), path),
            SCREEN_WIDTH,
            SCREEN_HEIGHT / 2.0,
            &registry,
        );
        assert!(!level.bricks.is_empty(), "{} has no bricks", path);
        assert!(!level.is_complete(), "{} has nothing to break", path);
    }
}
