//! Ball trail particles
//!
//! Fixed-size pool; dead slots are recycled. Purely visual, never affects
//! gameplay, but draws from the game RNG so runs stay reproducible.

use glam::{Vec2, Vec4};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// A particle for visual effects
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: Vec4,
    /// Seconds left; dead at or below zero
    pub life: f32,
}

impl Default for Particle {
    fn default() -> Self {
        Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            color: Vec4::ONE,
            life: 0.0,
        }
    }
}

impl Particle {
    pub fn is_alive(&self) -> bool {
        self.life > 0.0
    }
}

/// Particle pool trailing the ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticleTrail {
    particles: Vec<Particle>,
    last_used: usize,
}

impl ParticleTrail {
    pub fn new(capacity: usize) -> Self {
        Self {
            particles: vec![Particle::default(); capacity],
            last_used: 0,
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn alive(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter().filter(|p| p.is_alive())
    }

    /// Spawn `count` particles at `origin + offset` and age the rest.
    pub fn update<R: Rng>(
        &mut self,
        rng: &mut R,
        dt: f32,
        origin: Vec2,
        vel: Vec2,
        count: usize,
        offset: Vec2,
    ) {
        if self.particles.is_empty() {
            return;
        }
        for _ in 0..count {
            let slot = self.first_unused();
            self.respawn(rng, slot, origin, vel, offset);
        }
        for p in &mut self.particles {
            p.life -= dt;
            if p.is_alive() {
                p.pos -= p.vel * dt;
                p.color.w -= dt * 2.5;
            }
        }
    }

    /// Kill every particle.
    pub fn clear(&mut self) {
        for p in &mut self.particles {
            p.life = 0.0;
        }
        self.last_used = 0;
    }

    /// First dead slot, searching from the last one handed out. Overwrites
    /// slot 0 when everything is alive; the next search starts after it.
    fn first_unused(&mut self) -> usize {
        let len = self.particles.len();
        let found = (self.last_used..len)
            .chain(0..self.last_used)
            .find(|&i| !self.particles[i].is_alive());
        match found {
            Some(i) => {
                self.last_used = i;
                i
            }
            None => {
                self.last_used = 1 % len.max(1);
                0
            }
        }
    }

    fn respawn<R: Rng>(&mut self, rng: &mut R, slot: usize, origin: Vec2, vel: Vec2, offset: Vec2) {
        let jitter = Vec2::new(rng.random_range(-5.0..5.0), rng.random_range(-5.0..5.0));
        let shade = rng.random_range(0.5..1.5);
        self.particles[slot] = Particle {
            pos: origin + jitter + offset,
            vel: vel * 0.1,
            color: Vec4::new(shade, shade, shade, 1.0),
            life: 1.0,
        };
    }
}
