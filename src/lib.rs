//! BreakOut - a paddle-and-ball arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, levels, collisions, game state)
//! - `services`: Narrow interfaces to the renderer, resources and text overlay
//! - `audio`: Fire-and-forget sound cues
//! - `render`: Frame composition on top of `services::Renderer`
//! - `app`: Host glue tying input, simulation, audio and rendering together
//! - `settings`: Data-driven configuration

pub mod app;
pub mod audio;
pub mod render;
pub mod services;
pub mod settings;
pub mod sim;

pub use app::App;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    use glam::{Vec2, Vec3};

    /// Default screen dimensions
    pub const SCREEN_WIDTH: f32 = 800.0;
    pub const SCREEN_HEIGHT: f32 = 600.0;

    /// Longest frame the host will feed into a single tick
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Paddle defaults
    pub const PLAYER_SIZE: Vec2 = Vec2::new(100.0, 20.0);
    /// Paddle speed (pixels/s)
    pub const PLAYER_VELOCITY: f32 = 500.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 12.5;
    pub const INITIAL_BALL_VELOCITY: Vec2 = Vec2::new(100.0, -350.0);
    /// Horizontal deflection strength when bouncing off the paddle
    pub const PADDLE_BOUNCE_STRENGTH: f32 = 2.0;
    /// How far past the bottom edge the ball must fall before a life is lost
    pub const BALL_LOSS_MARGIN: f32 = 2.0 * BALL_RADIUS;

    /// Power-up defaults
    pub const POWER_UP_SIZE: Vec2 = Vec2::new(60.0, 20.0);
    pub const POWER_UP_VELOCITY: Vec2 = Vec2::new(0.0, 150.0);
    /// Ball velocity multiplier applied by the speed power-up
    pub const SPEED_MULTIPLIER: f32 = 1.2;
    /// Paddle width gained per pad-size-increase power-up
    pub const PAD_SIZE_INCREASE: f32 = 50.0;
    /// Paddle tint while the sticky power-up is live
    pub const STICKY_PADDLE_COLOR: Vec3 = Vec3::new(1.0, 0.5, 1.0);
    /// Ball tint while the pass-through power-up is live
    pub const PASS_THROUGH_BALL_COLOR: Vec3 = Vec3::new(1.0, 0.5, 0.5);

    /// Camera shake after hitting a solid brick (seconds)
    pub const SHAKE_DURATION: f32 = 0.05;

    /// Thickness of the left/right/top boundary walls
    pub const WALL_THICKNESS: f32 = 100.0;

    /// Lives at the start of a game
    pub const STARTING_LIVES: u8 = 3;

    /// Ball trail particles
    pub const MAX_PARTICLES: usize = 500;
    pub const PARTICLES_PER_TICK: usize = 2;
    pub const PARTICLE_SIZE: f32 = 10.0;
}
