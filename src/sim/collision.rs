//! Collision detection and response for axis-aligned geometry
//!
//! The ball is a circle, everything else is a box. Detection reports the
//! vector from the ball center to the nearest point on the box; the response
//! reflects one velocity axis and pushes the ball back out along it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::Body;

/// Compass direction of the penetration, in screen space (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    /// Tie-break order: earlier entries win
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    pub fn unit(&self) -> Vec2 {
        match self {
            Direction::Up => Vec2::new(0.0, 1.0),
            Direction::Right => Vec2::new(1.0, 0.0),
            Direction::Down => Vec2::new(0.0, -1.0),
            Direction::Left => Vec2::new(-1.0, 0.0),
        }
    }

    pub fn is_horizontal(&self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }
}

/// Result of a collision check
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collision {
    pub hit: bool,
    pub direction: Direction,
    /// Closest box point minus circle center
    pub displacement: Vec2,
}

impl Collision {
    pub fn miss() -> Self {
        Self {
            hit: false,
            direction: Direction::Up,
            displacement: Vec2::ZERO,
        }
    }
}

/// Box vs box overlap. Touching edges count.
pub fn aabb_overlap(a: &Body, b: &Body) -> bool {
    let x = a.pos.x + a.size.x >= b.pos.x && b.pos.x + b.size.x >= a.pos.x;
    let y = a.pos.y + a.size.y >= b.pos.y && b.pos.y + b.size.y >= a.pos.y;
    x && y
}

/// Circle vs box. Exact tangency is not a hit.
pub fn circle_aabb(center: Vec2, radius: f32, rect: &Body) -> Collision {
    let half = rect.half_extents();
    let rect_center = rect.pos + half;
    let clamped = (center - rect_center).clamp(-half, half);
    let closest = rect_center + clamped;
    let displacement = closest - center;

    if displacement.length() < radius {
        Collision {
            hit: true,
            direction: classify(displacement),
            displacement,
        }
    } else {
        Collision::miss()
    }
}

/// Circle vs box for a ball body whose top-left is `body.pos`.
pub fn ball_aabb(ball: &Body, radius: f32, rect: &Body) -> Collision {
    circle_aabb(ball.pos + Vec2::splat(radius), radius, rect)
}

/// Compass direction closest to `v`. A zero vector resolves to `Up`.
pub fn classify(v: Vec2) -> Direction {
    let dir = v.normalize_or_zero();
    let mut best = Direction::Up;
    let mut max = f32::NEG_INFINITY;
    for candidate in Direction::ALL {
        let dot = dir.dot(candidate.unit());
        if dot > max {
            max = dot;
            best = candidate;
        }
    }
    best
}

/// Reflect the penetrating axis and push the ball out along it.
pub fn resolve(ball: &mut Body, radius: f32, collision: &Collision) {
    if !collision.hit {
        return;
    }
    if collision.direction.is_horizontal() {
        ball.vel.x = -ball.vel.x;
        let penetration = radius - collision.displacement.x.abs();
        if collision.direction == Direction::Left {
            ball.pos.x += penetration;
        } else {
            ball.pos.x -= penetration;
        }
    } else {
        ball.vel.y = -ball.vel.y;
        let penetration = radius - collision.displacement.y.abs();
        if collision.direction == Direction::Up {
            ball.pos.y -= penetration;
        } else {
            ball.pos.y += penetration;
        }
    }
}
