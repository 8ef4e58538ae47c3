//! Frame composition
//!
//! Walks the game state back to front and issues quads through the
//! `Renderer` trait, then the HUD through `TextOverlay`. Entities whose
//! texture never loaded are skipped.

use glam::{Vec2, Vec3};

use crate::consts::PARTICLE_SIZE;
use crate::services::{Renderer, TextOverlay};
use crate::sim::{Body, GamePhase, GameState};

/// Draw one complete frame.
pub fn draw_frame(state: &GameState, renderer: &mut dyn Renderer, text: &mut dyn TextOverlay) {
    renderer.begin_frame();

    if let Some(background) = state.textures.background {
        renderer.draw_quad(
            background,
            Vec2::ZERO,
            Vec2::new(state.width, state.height),
            0.0,
            Vec3::ONE,
        );
    }
    if let Some(level) = state.current_level() {
        for brick in &level.bricks {
            draw_body(renderer, &brick.body);
        }
    }
    draw_body(renderer, state.paddle_body());
    for power_up in &state.power_ups {
        draw_body(renderer, &power_up.body);
    }
    if let Some(texture) = state.textures.particle.filter(|_| state.particles_enabled) {
        for p in state.particles.alive() {
            renderer.draw_particle(texture, p.pos, PARTICLE_SIZE, p.color);
        }
    }
    draw_body(renderer, state.ball_body());

    renderer.end_frame(&state.effects, state.time);

    draw_hud(state, text);
}

/// Draw a live body. Destroyed or untextured bodies are no-ops.
fn draw_body(renderer: &mut dyn Renderer, body: &Body) {
    if body.destroyed {
        return;
    }
    if let Some(texture) = body.texture {
        renderer.draw_quad(texture, body.pos, body.size, body.rotation, body.color);
    }
}

/// Lives counter plus phase prompts.
fn draw_hud(state: &GameState, text: &mut dyn TextOverlay) {
    let mid = state.height / 2.0;
    text.render_text(&format!("Lives: {}", state.lives), Vec2::new(5.0, 5.0), 1.0, Vec3::ONE);
    match state.phase {
        GamePhase::Menu => {
            text.render_text("Press ENTER to start", Vec2::new(250.0, mid), 1.0, Vec3::ONE);
            text.render_text(
                "Press W or S to select level",
                Vec2::new(245.0, mid + 20.0),
                0.75,
                Vec3::ONE,
            );
        }
        GamePhase::Win => {
            text.render_text(
                "You WON!!!",
                Vec2::new(320.0, mid - 20.0),
                1.0,
                Vec3::new(0.0, 1.0, 0.0),
            );
            text.render_text(
                "Press ENTER to retry or ESC to quit",
                Vec2::new(130.0, mid),
                1.0,
                Vec3::new(1.0, 1.0, 0.0),
            );
        }
        GamePhase::Active => {}
    }
}
