//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - Frame delta supplied by the host, no clocks
//! - Seeded RNG only
//! - No rendering, audio or platform dependencies

pub mod collision;
pub mod entity;
pub mod input;
pub mod level;
pub mod particles;
pub mod powerup;
pub mod state;
pub mod tick;

pub use collision::{Collision, Direction, aabb_overlap, ball_aabb, circle_aabb, classify, resolve};
pub use entity::{BallState, Body, Entity, EntityId, EntityKind, World};
pub use input::{Key, KeyState};
pub use level::Level;
pub use particles::{Particle, ParticleTrail};
pub use powerup::{PowerUpExpired, PowerUpKind, PowerUpState};
pub use state::{GameEvent, GamePhase, GameState, PostEffects, Textures};
pub use tick::{bounce_off_paddle, process_input, tick, update};
