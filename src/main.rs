//! BreakOut - headless native runner
//!
//! Plays the game with the autopilot at a fixed 60 Hz for the configured
//! number of seconds, then prints a JSON summary. Windowing and GPU output
//! plug in through the `Renderer` and `TextOverlay` traits.

use std::collections::BTreeMap;

use glam::{Vec2, Vec3};
use serde::Serialize;

use breakout::audio::{AudioManager, LogSink};
use breakout::services::{Renderer, TextOverlay, TextureHandle, TextureRegistry};
use breakout::sim::{GameEvent, PowerUpKind};
use breakout::{App, Settings};

const SETTINGS_PATH: &str = "breakout.json";
const FRAME_DT: f32 = 1.0 / 60.0;

/// Renderer that only counts what it was asked to draw
#[derive(Default)]
struct CountingRenderer {
    quads: u64,
    frames: u64,
}

impl Renderer for CountingRenderer {
    fn draw_quad(&mut self, _: TextureHandle, _: Vec2, _: Vec2, _: f32, _: Vec3) {
        self.quads += 1;
    }

    fn end_frame(&mut self, _effects: &breakout::sim::PostEffects, _time: f32) {
        self.frames += 1;
    }
}

#[derive(Default)]
struct NullText;

impl TextOverlay for NullText {
    fn render_text(&mut self, _: &str, _: Vec2, _: f32, _: Vec3) {}
}

#[derive(Debug, Default, Serialize)]
struct Summary {
    frames: u64,
    quads_drawn: u64,
    bricks_destroyed: u64,
    solid_hits: u64,
    paddle_hits: u64,
    lives_lost: u64,
    games_over: u64,
    levels_completed: u64,
    power_ups: BTreeMap<&'static str, u64>,
    final_level: usize,
    final_lives: u8,
}

impl Summary {
    fn record(&mut self, event: &GameEvent) {
        match event {
            GameEvent::BrickDestroyed { .. } => self.bricks_destroyed += 1,
            GameEvent::SolidBrickHit => self.solid_hits += 1,
            GameEvent::PaddleHit => self.paddle_hits += 1,
            GameEvent::LifeLost { .. } => self.lives_lost += 1,
            GameEvent::GameOver => self.games_over += 1,
            GameEvent::LevelComplete { .. } => self.levels_completed += 1,
            GameEvent::PowerUpCollected { kind, .. } => {
                *self.power_ups.entry(kind.as_str()).or_default() += 1;
            }
            _ => {}
        }
    }
}

fn resources() -> TextureRegistry {
    let mut names = vec!["background", "face", "paddle", "particle", "brick", "brick_solid"];
    names.extend(PowerUpKind::ALL.iter().map(|k| k.texture_name()));
    TextureRegistry::with_names(&names, &breakout::app::SHADER_NAMES)
}

fn main() {
    env_logger::init();
    log::info!("BreakOut (headless) starting...");

    let settings = Settings::load_from(SETTINGS_PATH);
    let resources = resources();
    let mut audio = AudioManager::new(Box::new(LogSink), &settings);
    let mut app = App::new(&settings, &resources, &mut audio);
    app.set_autopilot(true);

    let mut renderer = CountingRenderer::default();
    let mut text = NullText;
    let mut summary = Summary::default();

    let frames = (settings.demo_seconds.max(0.0) / FRAME_DT).round() as u64;
    for _ in 0..frames {
        for event in app.update(FRAME_DT, &mut audio) {
            summary.record(&event);
        }
        app.render(&mut renderer, &mut text);
    }

    summary.frames = renderer.frames;
    summary.quads_drawn = renderer.quads;
    summary.final_level = app.state.level_index;
    summary.final_lives = app.state.lives;

    match serde_json::to_string_pretty(&summary) {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("Failed to serialize summary: {}", e),
    }
}
