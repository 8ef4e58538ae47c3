//! Per-frame game step
//!
//! Input first, then integration, collisions, effects and power-ups in a
//! fixed order. Corrections compound within a tick, so the order matters.

use glam::Vec2;

use super::collision::{aabb_overlap, ball_aabb, resolve};
use super::entity::Body;
use super::input::{Key, KeyState};
use super::powerup;
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::*;

/// Advance the game by one frame of `dt` seconds.
pub fn tick(state: &mut GameState, keys: &mut KeyState, dt: f32) {
    process_input(state, keys, dt);
    update(state, dt);
}

/// Apply the current key state for this phase.
pub fn process_input(state: &mut GameState, keys: &mut KeyState, dt: f32) {
    match state.phase {
        GamePhase::Menu => {
            if keys.take_press(Key::Confirm) {
                state.start_game();
                return;
            }
            if keys.take_press(Key::NextLevel) {
                state.select_next_level();
            }
            if keys.take_press(Key::PrevLevel) {
                state.select_prev_level();
            }
        }
        GamePhase::Win => {
            if keys.take_press(Key::Confirm) {
                state.leave_win_screen();
            }
        }
        GamePhase::Active => {
            let mut vx = 0.0;
            if keys.is_down(Key::Left) {
                vx -= PLAYER_VELOCITY;
            }
            if keys.is_down(Key::Right) {
                vx += PLAYER_VELOCITY;
            }
            let width = state.width;
            let paddle = &mut state.world[state.paddle].body;
            paddle.vel = Vec2::new(confine_paddle(paddle, width, vx, dt), 0.0);

            if keys.is_down(Key::Launch) {
                state.launch_ball();
            }
        }
    }
}

/// Limit a horizontal paddle velocity so one step keeps it inside `[0, width]`.
pub fn confine_paddle(paddle: &Body, width: f32, vx: f32, dt: f32) -> f32 {
    if dt <= 0.0 {
        return 0.0;
    }
    let max_x = (width - paddle.size.x).max(0.0);
    let target = (paddle.pos.x + vx * dt).clamp(0.0, max_x);
    (target - paddle.pos.x) / dt
}

/// Simulation step. Only runs while a level is being played.
pub fn update(state: &mut GameState, dt: f32) {
    if state.phase != GamePhase::Active {
        return;
    }
    state.time += dt;

    state.world.update(dt);
    resolve_collisions(state);
    update_effects(state, dt);
    update_power_ups(state, dt);

    if state.ball_body().pos.y >= state.height + BALL_LOSS_MARGIN {
        state.lose_life();
    }
    if state.phase == GamePhase::Active && state.level_complete() {
        state.complete_level();
    }
}

enum BrickHit {
    Solid,
    Broken(Vec2),
}

/// Ball vs bricks, walls, paddle; then power-ups vs paddle.
fn resolve_collisions(state: &mut GameState) {
    let ball_id = state.ball;
    let ball_state = state.ball_state();
    let radius = ball_state.radius;

    // Bricks
    let mut hits = Vec::new();
    if let Some(level) = state.levels.get_mut(state.level_index) {
        let ball = &mut state.world[ball_id].body;
        for brick in level.bricks.iter_mut().filter(|b| !b.body.destroyed) {
            let collision = ball_aabb(ball, radius, &brick.body);
            if !collision.hit {
                continue;
            }
            if brick.body.solid {
                resolve(ball, radius, &collision);
                hits.push(BrickHit::Solid);
            } else {
                brick.body.destroyed = true;
                if !ball_state.pass_through {
                    resolve(ball, radius, &collision);
                }
                hits.push(BrickHit::Broken(brick.body.pos));
            }
        }
    }
    for hit in hits {
        match hit {
            BrickHit::Solid => {
                state.events.push(GameEvent::SolidBrickHit);
                state.shake();
            }
            BrickHit::Broken(pos) => {
                state.events.push(GameEvent::BrickDestroyed { pos });
                state.spawn_power_ups(pos);
            }
        }
    }

    // Walls
    for wall in state.walls {
        let wall = state.world[wall].body.clone();
        let ball = &mut state.world[ball_id].body;
        let collision = ball_aabb(ball, radius, &wall);
        resolve(ball, radius, &collision);
    }

    // Paddle
    let paddle = state.world[state.paddle].body.clone();
    if !state.ball_is_static() {
        let ball = &mut state.world[ball_id].body;
        if ball_aabb(ball, radius, &paddle).hit {
            bounce_off_paddle(ball, radius, &paddle);
            state.events.push(GameEvent::PaddleHit);
            if state.ball_state().sticky {
                state.stick_ball();
            }
        }
    }

    // Power-ups
    let floor = state.height;
    let mut collected = Vec::new();
    for entity in &mut state.power_ups {
        if entity.body.destroyed {
            continue;
        }
        if entity.body.pos.y >= floor {
            entity.body.destroyed = true;
            continue;
        }
        if !aabb_overlap(&paddle, &entity.body) {
            continue;
        }
        entity.body.destroyed = true;
        if let Some(p) = entity.as_power_up_mut() {
            p.active = !p.kind.is_instant();
            collected.push((p.id, p.kind));
        }
    }
    for (id, kind) in collected {
        state.events.push(GameEvent::PowerUpCollected { id, kind });
        state.activate_power_up(kind);
    }
}

/// Redirect the ball by where it struck the paddle, keeping its speed.
///
/// Always sends the ball upward, whatever direction it came from.
pub fn bounce_off_paddle(ball: &mut Body, radius: f32, paddle: &Body) {
    let paddle_center = paddle.pos.x + paddle.size.x / 2.0;
    let offset = (ball.pos.x + radius) - paddle_center;
    let percentage = (offset / (paddle.size.x / 2.0)).clamp(-1.0, 1.0);

    let speed = ball.vel.length();
    ball.vel.x = INITIAL_BALL_VELOCITY.x * percentage * PADDLE_BOUNCE_STRENGTH;
    ball.vel = ball.vel.normalize_or_zero() * speed;
    ball.vel.y = -ball.vel.y.abs();
}

/// Ball trail and the shake countdown.
fn update_effects(state: &mut GameState, dt: f32) {
    if state.particles_enabled {
        let ball = &state.world[state.ball].body;
        let (origin, vel) = (ball.pos, ball.vel);
        let radius = state.ball_state().radius;
        state.particles.update(
            &mut state.rng,
            dt,
            origin,
            vel,
            PARTICLES_PER_TICK,
            Vec2::splat(radius / 2.0),
        );
    }

    if state.shake_time > 0.0 {
        state.shake_time -= dt;
        if state.shake_time <= 0.0 {
            state.shake_time = 0.0;
            state.effects.shake = false;
        }
    }
}

/// Move power-ups, run expiries, then drop the spent ones.
fn update_power_ups(state: &mut GameState, dt: f32) {
    for entity in &mut state.power_ups {
        if let Some(expired) = powerup::advance(entity, dt) {
            state.expired.push(expired);
        }
    }
    let expired = std::mem::take(&mut state.expired);
    state.apply_expiries(expired);
    state.power_ups.retain(|p| !powerup::is_spent(p));
}
