//! Game state and entity lifecycle
//!
//! Owns every entity: paddle, ball and walls live in the `World` arena,
//! bricks in their `Level`, falling and active power-ups in `power_ups`.

use glam::{Vec2, Vec3};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entity::{BallState, Body, Entity, EntityId, World};
use super::level::Level;
use super::particles::ParticleTrail;
use super::powerup::{self, PowerUpExpired, PowerUpKind};
use crate::consts::*;
use crate::services::{ResourceProvider, TextureHandle};
use crate::settings::Settings;

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Level selection
    Menu,
    /// Playing a level
    Active,
    /// Level cleared, waiting for confirm
    Win,
}

/// Full-screen post-processing toggles
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostEffects {
    pub confuse: bool,
    pub chaos: bool,
    pub shake: bool,
}

/// Things that happened during a tick, drained by the host
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    BrickDestroyed { pos: Vec2 },
    SolidBrickHit,
    PaddleHit,
    PowerUpSpawned { id: u32, kind: PowerUpKind },
    PowerUpCollected { id: u32, kind: PowerUpKind },
    PowerUpExpired { id: u32, kind: PowerUpKind },
    BallLaunched,
    LifeLost { remaining: u8 },
    GameOver,
    LevelStarted { level: usize },
    LevelComplete { level: usize },
}

/// Texture handles resolved once at startup
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Textures {
    pub background: Option<TextureHandle>,
    pub ball: Option<TextureHandle>,
    pub paddle: Option<TextureHandle>,
    pub particle: Option<TextureHandle>,
    pub power_ups: [Option<TextureHandle>; 6],
}

impl Textures {
    pub fn resolve(resources: &dyn ResourceProvider) -> Self {
        let lookup = |name: &str| {
            let handle = resources.texture(name);
            if handle.is_none() {
                log::warn!("Texture {:?} not loaded; it will not be drawn", name);
            }
            handle
        };
        Self {
            background: lookup("background"),
            ball: lookup("face"),
            paddle: lookup("paddle"),
            particle: lookup("particle"),
            power_ups: PowerUpKind::ALL.map(|kind| lookup(kind.texture_name())),
        }
    }
}

/// Complete game state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub width: f32,
    pub height: f32,
    pub phase: GamePhase,
    pub lives: u8,
    /// Lives restored on every new game
    pub max_lives: u8,
    pub levels: Vec<Level>,
    pub level_index: usize,
    pub world: World,
    pub paddle: EntityId,
    pub ball: EntityId,
    /// Left wall, right wall, ceiling. No floor.
    pub walls: [EntityId; 3],
    pub power_ups: Vec<Entity>,
    pub effects: PostEffects,
    /// Seconds of camera shake left
    pub shake_time: f32,
    pub particles: ParticleTrail,
    pub particles_enabled: bool,
    pub screen_shake_enabled: bool,
    pub textures: Textures,
    /// Seconds spent in ACTIVE play
    pub time: f32,
    pub seed: u64,
    #[serde(skip, default = "unseeded_rng")]
    pub(crate) rng: Pcg32,
    pub events: Vec<GameEvent>,
    /// Power-up expiries waiting to be applied this tick
    pub(crate) expired: Vec<PowerUpExpired>,
    next_id: u32,
}

fn unseeded_rng() -> Pcg32 {
    Pcg32::seed_from_u64(0)
}

impl GameState {
    /// Create a game, loading every level file named in the settings.
    pub fn new(settings: &Settings, resources: &dyn ResourceProvider) -> Self {
        let levels = settings
            .levels
            .iter()
            .map(|path| Level::load(path, settings.width, settings.height / 2.0, resources))
            .collect();
        Self::with_levels(settings, levels, resources)
    }

    /// Create a game around already-built levels.
    pub fn with_levels(
        settings: &Settings,
        levels: Vec<Level>,
        resources: &dyn ResourceProvider,
    ) -> Self {
        let width = settings.width;
        let height = settings.height;
        let textures = Textures::resolve(resources);

        let mut world = World::new();
        let walls = [
            world.spawn(Entity::plain(Body::new(
                Vec2::new(-WALL_THICKNESS, 0.0),
                Vec2::new(WALL_THICKNESS, height),
            ))),
            world.spawn(Entity::plain(Body::new(
                Vec2::new(width, 0.0),
                Vec2::new(WALL_THICKNESS, height),
            ))),
            world.spawn(Entity::plain(Body::new(
                Vec2::new(-WALL_THICKNESS, -WALL_THICKNESS),
                Vec2::new(width + 2.0 * WALL_THICKNESS, WALL_THICKNESS),
            ))),
        ];
        let paddle = world.spawn(Entity::plain(
            Body::new(Vec2::ZERO, PLAYER_SIZE).with_texture(textures.paddle),
        ));
        let ball = world.spawn(Entity::ball(
            Vec2::ZERO,
            BALL_RADIUS,
            INITIAL_BALL_VELOCITY,
            textures.ball,
        ));

        let mut state = Self {
            width,
            height,
            phase: GamePhase::Menu,
            lives: settings.lives,
            max_lives: settings.lives,
            levels,
            level_index: 0,
            world,
            paddle,
            ball,
            walls,
            power_ups: Vec::new(),
            effects: PostEffects::default(),
            shake_time: 0.0,
            particles: ParticleTrail::new(MAX_PARTICLES),
            particles_enabled: settings.particles,
            screen_shake_enabled: settings.effective_screen_shake(),
            textures,
            time: 0.0,
            seed: settings.seed,
            rng: Pcg32::seed_from_u64(settings.seed),
            events: Vec::new(),
            expired: Vec::new(),
            next_id: 1,
        };
        state.reset_player();
        state.reset_ball();
        state
    }

    /// Allocate a new power-up ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn current_level(&self) -> Option<&Level> {
        self.levels.get(self.level_index)
    }

    pub fn current_level_mut(&mut self) -> Option<&mut Level> {
        self.levels.get_mut(self.level_index)
    }

    /// A missing level counts as cleared.
    pub fn level_complete(&self) -> bool {
        self.current_level().is_none_or(|level| level.is_complete())
    }

    pub fn ball_state(&self) -> BallState {
        self.world[self.ball]
            .as_ball()
            .copied()
            .unwrap_or_else(|| BallState::new(BALL_RADIUS))
    }

    pub fn ball_state_mut(&mut self) -> Option<&mut BallState> {
        self.world[self.ball].as_ball_mut()
    }

    pub fn ball_body(&self) -> &Body {
        &self.world[self.ball].body
    }

    pub fn paddle_body(&self) -> &Body {
        &self.world[self.paddle].body
    }

    /// True while the ball rides the paddle
    pub fn ball_is_static(&self) -> bool {
        self.ball_state().is_static
    }

    pub fn select_next_level(&mut self) {
        if !self.levels.is_empty() {
            self.level_index = (self.level_index + 1) % self.levels.len();
        }
    }

    pub fn select_prev_level(&mut self) {
        if !self.levels.is_empty() {
            self.level_index = if self.level_index > 0 {
                self.level_index - 1
            } else {
                self.levels.len() - 1
            };
        }
    }

    /// Leave the menu and play the selected level.
    pub fn start_game(&mut self) {
        self.clear_power_ups();
        self.reset_player();
        self.reset_ball();
        self.lives = self.max_lives;
        self.effects.shake = false;
        self.shake_time = 0.0;
        self.particles.clear();
        self.phase = GamePhase::Active;
        self.events.push(GameEvent::LevelStarted {
            level: self.level_index,
        });
        log::info!("Starting level {}", self.level_index + 1);
    }

    /// Paddle back to bottom center at its default size and color.
    pub fn reset_player(&mut self) {
        let (width, height) = (self.width, self.height);
        let paddle = &mut self.world[self.paddle].body;
        paddle.size = PLAYER_SIZE;
        paddle.pos = Vec2::new(width / 2.0 - PLAYER_SIZE.x / 2.0, height - PLAYER_SIZE.y);
        paddle.vel = Vec2::ZERO;
        paddle.color = Vec3::ONE;
    }

    /// Put the ball back on the paddle, static, with default velocity and
    /// no power-up flags.
    pub fn reset_ball(&mut self) {
        self.respawn_ball();
        let ball = &mut self.world[self.ball];
        if let Some(state) = ball.as_ball_mut() {
            *state = BallState::new(BALL_RADIUS);
        }
        ball.body.size = Vec2::splat(BALL_RADIUS * 2.0);
        ball.body.color = Vec3::ONE;
    }

    /// Seat the ball on the paddle after it was lost. Live power-up effects
    /// (sticky, pass-through and their tints) carry over.
    pub fn respawn_ball(&mut self) {
        self.world.attach(self.ball, self.paddle);
        let paddle = self.world[self.paddle].body.clone();
        let ball = &mut self.world[self.ball];
        let radius = ball.as_ball().map_or(BALL_RADIUS, |b| b.radius);
        if let Some(state) = ball.as_ball_mut() {
            state.is_static = true;
        }
        ball.body.pos = paddle.pos + Vec2::new(paddle.size.x / 2.0 - radius, -radius * 2.0);
        ball.body.vel = INITIAL_BALL_VELOCITY;
    }

    /// Release a riding ball. Does nothing if it is already free.
    pub fn launch_ball(&mut self) {
        if !self.ball_is_static() {
            return;
        }
        self.world.detach(self.ball);
        if let Some(state) = self.ball_state_mut() {
            state.is_static = false;
        }
        self.events.push(GameEvent::BallLaunched);
    }

    /// Re-attach the ball to the paddle where it is (sticky catch).
    pub fn stick_ball(&mut self) {
        self.world.attach(self.ball, self.paddle);
        if let Some(state) = self.ball_state_mut() {
            state.is_static = true;
        }
    }

    /// Roll every power-up type for a broken brick at `pos`.
    pub fn spawn_power_ups(&mut self, pos: Vec2) {
        for kind in PowerUpKind::ALL {
            if self.rng.random_range(0..kind.spawn_chance()) != 0 {
                continue;
            }
            let id = self.next_entity_id();
            let texture = self.textures.power_ups[kind.index()];
            self.power_ups.push(powerup::spawn(id, kind, pos, texture));
            self.events.push(GameEvent::PowerUpSpawned { id, kind });
            log::debug!("Spawned {} power-up #{}", kind.as_str(), id);
        }
    }

    /// Apply a collected power-up's effect.
    pub fn activate_power_up(&mut self, kind: PowerUpKind) {
        log::debug!("Activating {} power-up", kind.as_str());
        match kind {
            PowerUpKind::Speed => {
                self.world[self.ball].body.vel *= SPEED_MULTIPLIER;
            }
            PowerUpKind::Sticky => {
                if let Some(ball) = self.ball_state_mut() {
                    ball.sticky = true;
                }
                self.world[self.paddle].body.color = STICKY_PADDLE_COLOR;
            }
            PowerUpKind::PassThrough => {
                if let Some(ball) = self.ball_state_mut() {
                    ball.pass_through = true;
                }
                self.world[self.ball].body.color = PASS_THROUGH_BALL_COLOR;
            }
            PowerUpKind::PadSizeIncrease => {
                self.world[self.paddle].body.size.x += PAD_SIZE_INCREASE;
                self.keep_paddle_inside();
            }
            PowerUpKind::Confuse => {
                if !self.effects.chaos {
                    self.effects.confuse = true;
                }
            }
            PowerUpKind::Chaos => {
                if !self.effects.confuse {
                    self.effects.chaos = true;
                }
            }
        }
    }

    /// Undo a power-up's effect once its time runs out.
    pub fn on_power_up_expired(&mut self, expired: PowerUpExpired) {
        log::debug!("{} power-up #{} expired", expired.kind.as_str(), expired.id);
        match expired.kind {
            PowerUpKind::Sticky => {
                if let Some(ball) = self.ball_state_mut() {
                    ball.sticky = false;
                }
                self.world[self.paddle].body.color = Vec3::ONE;
            }
            PowerUpKind::PassThrough => {
                if let Some(ball) = self.ball_state_mut() {
                    ball.pass_through = false;
                }
                self.world[self.ball].body.color = Vec3::ONE;
            }
            PowerUpKind::Confuse => {
                if !self.has_active_power_up(PowerUpKind::Confuse) {
                    self.effects.confuse = false;
                }
            }
            PowerUpKind::Chaos => {
                if !self.has_active_power_up(PowerUpKind::Chaos) {
                    self.effects.chaos = false;
                }
            }
            PowerUpKind::Speed | PowerUpKind::PadSizeIncrease => {}
        }
    }

    /// Is another power-up of this kind still live?
    pub fn has_active_power_up(&self, kind: PowerUpKind) -> bool {
        self.power_ups
            .iter()
            .filter_map(|p| p.as_power_up())
            .any(|p| p.active && p.kind == kind)
    }

    /// Drop every power-up, firing expiry for the live ones first.
    pub fn clear_power_ups(&mut self) {
        let mut expired = std::mem::take(&mut self.expired);
        for state in self.power_ups.iter_mut().filter_map(|p| p.as_power_up_mut()) {
            if state.active {
                state.active = false;
                expired.push(PowerUpExpired {
                    id: state.id,
                    kind: state.kind,
                });
            }
        }
        self.power_ups.clear();
        self.apply_expiries(expired);
    }

    /// Run expiry effects and report them as events.
    pub(crate) fn apply_expiries(&mut self, expired: Vec<PowerUpExpired>) {
        for e in expired {
            self.events.push(GameEvent::PowerUpExpired {
                id: e.id,
                kind: e.kind,
            });
            self.on_power_up_expired(e);
        }
    }

    /// The ball fell out. Respawn it or end the game.
    pub fn lose_life(&mut self) {
        self.lives = self.lives.saturating_sub(1);
        self.events.push(GameEvent::LifeLost {
            remaining: self.lives,
        });
        if self.lives == 0 {
            self.game_over();
        } else {
            log::info!("Ball lost, {} lives left", self.lives);
            self.respawn_ball();
        }
    }

    /// Out of lives: restore the level and go back to the menu.
    pub fn game_over(&mut self) {
        log::info!("Game over on level {}", self.level_index + 1);
        self.clear_power_ups();
        if let Some(level) = self.current_level_mut() {
            level.reset();
        }
        self.reset_player();
        self.reset_ball();
        self.lives = self.max_lives;
        self.effects = PostEffects::default();
        self.shake_time = 0.0;
        self.phase = GamePhase::Menu;
        self.events.push(GameEvent::GameOver);
    }

    /// Every breakable brick is gone.
    pub fn complete_level(&mut self) {
        log::info!("Level {} complete", self.level_index + 1);
        self.clear_power_ups();
        self.reset_player();
        self.reset_ball();
        self.effects = PostEffects {
            chaos: true,
            ..PostEffects::default()
        };
        self.shake_time = 0.0;
        self.phase = GamePhase::Win;
        self.events.push(GameEvent::LevelComplete {
            level: self.level_index,
        });
    }

    /// Confirm on the win screen: rebuild the level and return to the menu.
    pub fn leave_win_screen(&mut self) {
        self.effects.chaos = false;
        if let Some(level) = self.current_level_mut() {
            level.reset();
        }
        self.phase = GamePhase::Menu;
    }

    /// Start or extend the camera shake.
    pub fn shake(&mut self) {
        if self.screen_shake_enabled {
            self.shake_time = SHAKE_DURATION;
            self.effects.shake = true;
        }
    }

    /// Pull the paddle back inside the playfield, carrying the riding ball.
    pub fn keep_paddle_inside(&mut self) {
        let body = &self.world[self.paddle].body;
        let max_x = (self.width - body.size.x).max(0.0);
        let target = body.pos.x.clamp(0.0, max_x);
        let delta = Vec2::new(target - body.pos.x, 0.0);
        if delta != Vec2::ZERO {
            self.world.translate(self.paddle, delta);
        }
    }

    /// Hand the accumulated events to the caller.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
