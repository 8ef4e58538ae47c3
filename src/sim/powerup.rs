//! Power-up types, their tuning tables and per-tick countdown

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::entity::{Body, Entity, EntityKind};
use crate::consts::{POWER_UP_SIZE, POWER_UP_VELOCITY};
use crate::services::TextureHandle;

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    Speed,
    Sticky,
    PassThrough,
    PadSizeIncrease,
    Confuse,
    Chaos,
}

impl PowerUpKind {
    /// Roll order when a brick breaks
    pub const ALL: [PowerUpKind; 6] = [
        PowerUpKind::Speed,
        PowerUpKind::Sticky,
        PowerUpKind::PassThrough,
        PowerUpKind::PadSizeIncrease,
        PowerUpKind::Confuse,
        PowerUpKind::Chaos,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PowerUpKind::Speed => "speed",
            PowerUpKind::Sticky => "sticky",
            PowerUpKind::PassThrough => "pass-through",
            PowerUpKind::PadSizeIncrease => "pad-size-increase",
            PowerUpKind::Confuse => "confuse",
            PowerUpKind::Chaos => "chaos",
        }
    }

    /// One-in-N chance of spawning from a broken brick
    pub fn spawn_chance(&self) -> u32 {
        match self {
            PowerUpKind::Confuse | PowerUpKind::Chaos => 15,
            _ => 75,
        }
    }

    /// Seconds the effect stays live; 0 means applied once, never expires
    pub fn duration(&self) -> f32 {
        match self {
            PowerUpKind::Speed => 0.0,
            PowerUpKind::Sticky => 20.0,
            PowerUpKind::PassThrough => 10.0,
            PowerUpKind::PadSizeIncrease => 0.0,
            PowerUpKind::Confuse => 15.0,
            PowerUpKind::Chaos => 15.0,
        }
    }

    pub fn is_instant(&self) -> bool {
        self.duration() <= 0.0
    }

    pub fn color(&self) -> Vec3 {
        match self {
            PowerUpKind::Speed => Vec3::new(0.5, 0.5, 1.0),
            PowerUpKind::Sticky => Vec3::new(1.0, 0.5, 1.0),
            PowerUpKind::PassThrough => Vec3::new(0.5, 1.0, 0.5),
            PowerUpKind::PadSizeIncrease => Vec3::new(1.0, 0.6, 0.4),
            PowerUpKind::Confuse => Vec3::new(1.0, 0.3, 0.3),
            PowerUpKind::Chaos => Vec3::new(0.9, 0.25, 0.25),
        }
    }

    pub fn texture_name(&self) -> &'static str {
        match self {
            PowerUpKind::Speed => "powerup_speed",
            PowerUpKind::Sticky => "powerup_sticky",
            PowerUpKind::PassThrough => "powerup_passthrough",
            PowerUpKind::PadSizeIncrease => "powerup_increase",
            PowerUpKind::Confuse => "powerup_confuse",
            PowerUpKind::Chaos => "powerup_chaos",
        }
    }

    /// Position in `ALL`, for per-kind lookup tables
    pub fn index(&self) -> usize {
        match self {
            PowerUpKind::Speed => 0,
            PowerUpKind::Sticky => 1,
            PowerUpKind::PassThrough => 2,
            PowerUpKind::PadSizeIncrease => 3,
            PowerUpKind::Confuse => 4,
            PowerUpKind::Chaos => 5,
        }
    }
}

/// Power-up specific state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUpState {
    pub id: u32,
    pub kind: PowerUpKind,
    /// Seconds remaining while active
    pub duration: f32,
    /// Collected and effect is live
    pub active: bool,
}

/// Emitted exactly once when an active power-up runs out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerUpExpired {
    pub id: u32,
    pub kind: PowerUpKind,
}

/// Create a falling power-up at `pos`.
pub fn spawn(id: u32, kind: PowerUpKind, pos: Vec2, texture: Option<TextureHandle>) -> Entity {
    let body = Body::new(pos, POWER_UP_SIZE)
        .with_velocity(POWER_UP_VELOCITY)
        .with_color(kind.color())
        .with_texture(texture);
    Entity::new(
        body,
        EntityKind::PowerUp(PowerUpState {
            id,
            kind,
            duration: kind.duration(),
            active: false,
        }),
    )
}

/// Move a power-up and count down its effect.
///
/// Returns the expiry notice on the tick the effect runs out.
pub fn advance(entity: &mut Entity, dt: f32) -> Option<PowerUpExpired> {
    entity.advance(dt);
    let state = entity.as_power_up_mut()?;
    if !state.active {
        return None;
    }
    state.duration -= dt;
    if state.duration <= 0.0 {
        state.active = false;
        return Some(PowerUpExpired {
            id: state.id,
            kind: state.kind,
        });
    }
    None
}

/// Collected-and-expired or missed power-ups can be dropped.
pub fn is_spent(entity: &Entity) -> bool {
    entity.body.destroyed && !entity.as_power_up().is_some_and(|p| p.active)
}
