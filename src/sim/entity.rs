//! Entity model and the arena that owns kinematic objects
//!
//! Every simulation object shares a `Body` (position, size, velocity, look).
//! What makes a ball a ball or a power-up a power-up lives in `EntityKind`.
//! Parent/child links are ids into the `World`, so attaching and detaching
//! the ball is just a relationship update.

use std::ops::{Index, IndexMut};

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::powerup::PowerUpState;
use crate::services::TextureHandle;

/// Stable index of an entity inside a `World`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// Common kinematic and visual record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub vel: Vec2,
    pub color: Vec3,
    /// Degrees, cosmetic only
    pub rotation: f32,
    /// Blocks the ball but can never be destroyed
    pub solid: bool,
    /// Removed from the active simulation
    pub destroyed: bool,
    pub texture: Option<TextureHandle>,
}

impl Body {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            size,
            vel: Vec2::ZERO,
            color: Vec3::ONE,
            rotation: 0.0,
            solid: false,
            destroyed: false,
            texture: None,
        }
    }

    pub fn with_velocity(mut self, vel: Vec2) -> Self {
        self.vel = vel;
        self
    }

    pub fn with_color(mut self, color: Vec3) -> Self {
        self.color = color;
        self
    }

    pub fn with_texture(mut self, texture: Option<TextureHandle>) -> Self {
        self.texture = texture;
        self
    }

    pub fn solid(mut self) -> Self {
        self.solid = true;
        self
    }

    #[inline]
    pub fn half_extents(&self) -> Vec2 {
        self.size * 0.5
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.half_extents()
    }
}

/// Ball-specific flags
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BallState {
    pub radius: f32,
    /// Riding the paddle; velocity integration suppressed
    pub is_static: bool,
    /// Re-attach to the paddle on next contact
    pub sticky: bool,
    /// Brick hits are detected but not corrected
    pub pass_through: bool,
}

impl BallState {
    pub fn new(radius: f32) -> Self {
        Self {
            radius,
            is_static: true,
            sticky: false,
            pass_through: false,
        }
    }
}

/// What an entity is, beyond its body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EntityKind {
    /// Paddle and boundary walls
    Plain,
    /// Level brick with the tile code it was loaded from
    Brick { tile: u32 },
    Ball(BallState),
    PowerUp(PowerUpState),
}

/// A simulation object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub body: Body,
    pub kind: EntityKind,
    /// Entities displaced in lockstep with this one (non-owning)
    pub children: Vec<EntityId>,
}

impl Entity {
    pub fn new(body: Body, kind: EntityKind) -> Self {
        Self {
            body,
            kind,
            children: Vec::new(),
        }
    }

    pub fn plain(body: Body) -> Self {
        Self::new(body, EntityKind::Plain)
    }

    /// Build a ball whose bounding box is `2 * radius` on each axis.
    pub fn ball(pos: Vec2, radius: f32, vel: Vec2, texture: Option<TextureHandle>) -> Self {
        let body = Body::new(pos, Vec2::splat(radius * 2.0))
            .with_velocity(vel)
            .with_texture(texture);
        Self::new(body, EntityKind::Ball(BallState::new(radius)))
    }

    pub fn as_ball(&self) -> Option<&BallState> {
        match &self.kind {
            EntityKind::Ball(ball) => Some(ball),
            _ => None,
        }
    }

    pub fn as_ball_mut(&mut self) -> Option<&mut BallState> {
        match &mut self.kind {
            EntityKind::Ball(ball) => Some(ball),
            _ => None,
        }
    }

    pub fn as_power_up(&self) -> Option<&PowerUpState> {
        match &self.kind {
            EntityKind::PowerUp(power_up) => Some(power_up),
            _ => None,
        }
    }

    pub fn as_power_up_mut(&mut self) -> Option<&mut PowerUpState> {
        match &mut self.kind {
            EntityKind::PowerUp(power_up) => Some(power_up),
            _ => None,
        }
    }

    /// Static balls neither integrate nor carry their children.
    pub fn is_static(&self) -> bool {
        self.as_ball().is_some_and(|b| b.is_static)
    }

    /// Move by own velocity, returning the displacement applied.
    pub fn advance(&mut self, dt: f32) -> Vec2 {
        if self.is_static() {
            return Vec2::ZERO;
        }
        let displacement = self.body.vel * dt;
        self.body.pos += displacement;
        displacement
    }
}

/// Arena of long-lived entities (paddle, ball, walls)
///
/// Ids are never reused. `roots` lists the entities integrated on their own;
/// anything attached to a parent is only moved through that parent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct World {
    entities: Vec<Entity>,
    roots: Vec<EntityId>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entity as an independent root.
    pub fn spawn(&mut self, entity: Entity) -> EntityId {
        let id = EntityId(self.entities.len() as u32);
        self.entities.push(entity);
        self.roots.push(id);
        id
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id.0 as usize)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(id.0 as usize)
    }

    pub fn is_root(&self, id: EntityId) -> bool {
        self.roots.contains(&id)
    }

    pub fn parent_of(&self, child: EntityId) -> Option<EntityId> {
        self.entities
            .iter()
            .position(|e| e.children.contains(&child))
            .map(|i| EntityId(i as u32))
    }

    /// Make `child` ride `parent`. No-op for self-attachment or unknown ids.
    pub fn attach(&mut self, child: EntityId, parent: EntityId) {
        if child == parent || self.get(child).is_none() || self.get(parent).is_none() {
            return;
        }
        self.unlink(child);
        self.roots.retain(|&id| id != child);
        self[parent].children.push(child);
    }

    /// Release `child` from its parent so it integrates on its own again.
    pub fn detach(&mut self, child: EntityId) {
        if self.get(child).is_none() {
            return;
        }
        self.unlink(child);
        if !self.roots.contains(&child) {
            self.roots.push(child);
        }
    }

    /// Integrate every root entity, carrying attached children along.
    pub fn update(&mut self, dt: f32) {
        for i in 0..self.roots.len() {
            let id = self.roots[i];
            let displacement = self[id].advance(dt);
            if displacement != Vec2::ZERO {
                self.displace_children(id, displacement);
            }
        }
    }

    /// Move an entity and everything riding it by `delta`.
    pub fn translate(&mut self, id: EntityId, delta: Vec2) {
        if self.get(id).is_none() {
            return;
        }
        self[id].body.pos += delta;
        self.displace_children(id, delta);
    }

    /// Shift every descendant of `id` by exactly the parent's displacement.
    fn displace_children(&mut self, id: EntityId, displacement: Vec2) {
        let children = self[id].children.clone();
        for child in children {
            self[child].body.pos += displacement;
            self.displace_children(child, displacement);
        }
    }

    fn unlink(&mut self, child: EntityId) {
        for entity in &mut self.entities {
            entity.children.retain(|&c| c != child);
        }
    }
}

impl Index<EntityId> for World {
    type Output = Entity;

    fn index(&self, id: EntityId) -> &Entity {
        &self.entities[id.0 as usize]
    }
}

impl IndexMut<EntityId> for World {
    fn index_mut(&mut self, id: EntityId) -> &mut Entity {
        &mut self.entities[id.0 as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paddle() -> Entity {
        Entity::plain(Body::new(Vec2::new(100.0, 500.0), Vec2::new(100.0, 20.0)))
    }

    #[test]
    fn test_advance_moves_by_velocity() {
        let mut e = paddle();
        e.body.vel = Vec2::new(10.0, -4.0);
        let d = e.advance(0.5);
        assert_eq!(d, Vec2::new(5.0, -2.0));
        assert_eq!(e.body.pos, Vec2::new(105.0, 498.0));
    }

    #[test]
    fn test_static_ball_does_not_integrate() {
        let mut ball = Entity::ball(Vec2::ZERO, 10.0, Vec2::new(50.0, 50.0), None);
        assert!(ball.is_static());
        assert_eq!(ball.advance(1.0), Vec2::ZERO);
        assert_eq!(ball.body.pos, Vec2::ZERO);
        assert_eq!(ball.body.size, Vec2::splat(20.0));
    }

    #[test]
    fn test_child_follows_parent_displacement() {
        let mut world = World::new();
        let p = world.spawn(paddle());
        let b = world.spawn(Entity::ball(
            Vec2::new(137.5, 475.0),
            12.5,
            Vec2::new(100.0, -350.0),
            None,
        ));
        world.attach(b, p);
        assert!(!world.is_root(b));
        assert_eq!(world.parent_of(b), Some(p));

        world[p].body.vel = Vec2::new(-500.0, 0.0);
        world.update(0.1);

        assert_eq!(world[p].body.pos, Vec2::new(50.0, 500.0));
        // Ball moved with the paddle, not with its own velocity
        assert_eq!(world[b].body.pos, Vec2::new(87.5, 475.0));
    }

    #[test]
    fn test_detach_restores_independent_motion() {
        let mut world = World::new();
        let p = world.spawn(paddle());
        let b = world.spawn(Entity::ball(Vec2::ZERO, 5.0, Vec2::new(0.0, -10.0), None));
        world.attach(b, p);
        world.detach(b);
        world[b].as_ball_mut().unwrap().is_static = false;

        assert!(world.is_root(b));
        assert!(world[p].children.is_empty());

        world[p].body.vel = Vec2::new(100.0, 0.0);
        world.update(1.0);
        assert_eq!(world[b].body.pos, Vec2::new(0.0, -10.0));
    }

    #[test]
    fn test_attach_is_not_duplicated() {
        let mut world = World::new();
        let p = world.spawn(paddle());
        let b = world.spawn(Entity::ball(Vec2::ZERO, 5.0, Vec2::ZERO, None));
        world.attach(b, p);
        world.attach(b, p);
        world.attach(p, p);
        assert_eq!(world[p].children, vec![b]);
        assert!(world.is_root(p));
    }

    #[test]
    fn test_translate_carries_children() {
        let mut world = World::new();
        let p = world.spawn(paddle());
        let b = world.spawn(Entity::ball(Vec2::new(137.5, 475.0), 12.5, Vec2::ZERO, None));
        world.attach(b, p);
        world.translate(p, Vec2::new(-20.0, 0.0));
        assert_eq!(world[p].body.pos, Vec2::new(80.0, 500.0));
        assert_eq!(world[b].body.pos, Vec2::new(117.5, 475.0));
    }

    #[test]
    fn test_multi_level_chain_is_rigid() {
        let mut world = World::new();
        let a = world.spawn(paddle());
        let b = world.spawn(Entity::plain(Body::new(Vec2::ZERO, Vec2::ONE)));
        let c = world.spawn(Entity::plain(Body::new(Vec2::ONE, Vec2::ONE)));
        world[b].body.vel = Vec2::new(999.0, 999.0);
        world.attach(b, a);
        world.attach(c, b);

        world[a].body.vel = Vec2::new(0.0, 10.0);
        world.update(1.0);

        assert_eq!(world[b].body.pos, Vec2::new(0.0, 10.0));
        assert_eq!(world[c].body.pos, Vec2::new(1.0, 11.0));
    }
}
