//! Host-side glue
//!
//! Owns the game state and key state, feeds clamped frame times into the
//! simulation, forwards events to audio and draws through the render traits.

use crate::audio::AudioManager;
use crate::consts::MAX_FRAME_DT;
use crate::render;
use crate::services::{Renderer, ResourceProvider, TextOverlay};
use crate::settings::Settings;
use crate::sim::{GameEvent, GamePhase, GameState, Key, KeyState, tick};

/// Shaders the renderer is expected to have compiled
pub const SHADER_NAMES: [&str; 4] = ["sprite", "particle", "postprocessing", "text"];

/// Paddle dead zone for the autopilot, in pixels
const AUTOPILOT_DEAD_ZONE: f32 = 5.0;

/// Computer player for demos and headless runs
#[derive(Debug, Clone, Default)]
pub struct Autopilot {
    /// Move to the next level before starting again
    advance_level: bool,
}

impl Autopilot {
    /// Replace the key state with what the autopilot wants this frame.
    pub fn drive(&mut self, state: &GameState, keys: &mut KeyState) {
        keys.release_all();
        match state.phase {
            GamePhase::Menu => {
                if self.advance_level {
                    self.advance_level = false;
                    keys.press(Key::NextLevel);
                } else {
                    keys.press(Key::Confirm);
                }
            }
            GamePhase::Win => keys.press(Key::Confirm),
            GamePhase::Active => {
                if state.ball_is_static() {
                    keys.press(Key::Launch);
                }
                let ball = state.ball_body();
                let paddle = state.paddle_body();
                let offset = ball.center().x - paddle.center().x;
                if offset > AUTOPILOT_DEAD_ZONE {
                    keys.press(Key::Right);
                } else if offset < -AUTOPILOT_DEAD_ZONE {
                    keys.press(Key::Left);
                }
            }
        }
    }

    pub fn observe(&mut self, event: &GameEvent) {
        if let GameEvent::LevelComplete { .. } = event {
            self.advance_level = true;
        }
    }
}

/// The running game
pub struct App {
    pub state: GameState,
    pub keys: KeyState,
    pub autopilot: Option<Autopilot>,
}

impl App {
    /// Build the game from settings and start the background music.
    pub fn new(
        settings: &Settings,
        resources: &dyn ResourceProvider,
        audio: &mut AudioManager,
    ) -> Self {
        Self::with_state(GameState::new(settings, resources), resources, audio)
    }

    pub fn with_state(
        state: GameState,
        resources: &dyn ResourceProvider,
        audio: &mut AudioManager,
    ) -> Self {
        for name in SHADER_NAMES {
            if resources.shader(name).is_none() {
                log::warn!("Shader {:?} not loaded", name);
            }
        }
        audio.start_music();
        log::info!(
            "BreakOut ready: {}x{}, {} level(s)",
            state.width,
            state.height,
            state.levels.len()
        );
        Self {
            state,
            keys: KeyState::new(),
            autopilot: None,
        }
    }

    pub fn set_autopilot(&mut self, enabled: bool) {
        self.autopilot = enabled.then(Autopilot::default);
        log::info!("Autopilot: {}", enabled);
    }

    /// Forward a key transition from the host's input poller.
    pub fn key_event(&mut self, key: Key, down: bool) {
        if down {
            self.keys.press(key);
        } else {
            self.keys.release(key);
        }
    }

    /// Advance one frame and play the resulting sound cues.
    pub fn update(&mut self, dt: f32, audio: &mut AudioManager) -> Vec<GameEvent> {
        let dt = dt.clamp(0.0, MAX_FRAME_DT);
        if let Some(autopilot) = &mut self.autopilot {
            autopilot.drive(&self.state, &mut self.keys);
        }

        tick(&mut self.state, &mut self.keys, dt);

        let events = self.state.drain_events();
        for event in &events {
            audio.handle_event(event);
            if let Some(autopilot) = &mut self.autopilot {
                autopilot.observe(event);
            }
        }
        events
    }

    /// Render the current frame
    pub fn render(&self, renderer: &mut dyn Renderer, text: &mut dyn TextOverlay) {
        render::draw_frame(&self.state, renderer, text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::LogSink;
    use crate::services::TextureRegistry;
    use crate::sim::Level;

    fn app(grid: &str) -> (App, AudioManager) {
        let settings = Settings::default();
        let registry = TextureRegistry::new();
        let level = Level::parse(grid, settings.width, settings.height / 2.0, &registry);
        let state = GameState::with_levels(&settings, vec![level], &registry);
        let mut audio = AudioManager::new(Box::new(LogSink), &settings);
        let app = App::with_state(state, &registry, &mut audio);
        (app, audio)
    }

    #[test]
    fn test_music_started_on_creation() {
        let (_, audio) = app("2 2");
        assert!(audio.music_started());
    }

    #[test]
    fn test_frame_time_clamped() {
        let (mut app, mut audio) = app("2 2");
        app.key_event(Key::Confirm, true);
        app.update(5.0, &mut audio);
        assert_eq!(app.state.phase, GamePhase::Active);
        assert!((app.state.time - MAX_FRAME_DT).abs() < 1e-6);

        app.update(-1.0, &mut audio);
        assert!((app.state.time - MAX_FRAME_DT).abs() < 1e-6);
    }

    #[test]
    fn test_autopilot_breaks_bricks() {
        let (mut app, mut audio) = app("2 2 2 2\n2 2 2 2");
        app.set_autopilot(true);
        let mut broken = 0;
        for _ in 0..120 {
            broken += app
                .update(1.0 / 60.0, &mut audio)
                .iter()
                .filter(|e| matches!(e, GameEvent::BrickDestroyed { .. }))
                .count();
        }
        assert!(broken > 0);
    }

    #[test]
    fn test_autopilot_leaves_win_screen_for_next_level() {
        let settings = Settings::default();
        let registry = TextureRegistry::new();
        let levels = vec![
            Level::parse("2", settings.width, settings.height / 2.0, &registry),
            Level::parse("2", settings.width, settings.height / 2.0, &registry),
        ];
        let state = GameState::with_levels(&settings, levels, &registry);
        let mut audio = AudioManager::new(Box::new(LogSink), &settings);
        let mut app = App::with_state(state, &registry, &mut audio);
        app.set_autopilot(true);

        app.update(1.0 / 60.0, &mut audio);
        assert_eq!(app.state.phase, GamePhase::Active);
        app.state.complete_level();
        let events = app.state.drain_events();
        if let Some(autopilot) = &mut app.autopilot {
            for event in &events {
                autopilot.observe(event);
            }
        }

        app.update(1.0 / 60.0, &mut audio);
        assert_eq!(app.state.phase, GamePhase::Menu);
        app.update(1.0 / 60.0, &mut audio);
        assert_eq!(app.state.level_index, 1);
        app.update(1.0 / 60.0, &mut audio);
        assert_eq!(app.state.phase, GamePhase::Active);
    }
}
