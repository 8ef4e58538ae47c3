//! Interfaces to the collaborators the simulation never touches directly
//!
//! Window, GPU, texture decoding and fonts live behind these traits. The core
//! only ever asks to "draw a textured quad", "look up a resource by name" or
//! "render a line of text".

use std::collections::HashMap;

use glam::{Vec2, Vec3, Vec4};
use serde::{Deserialize, Serialize};

use crate::sim::PostEffects;

/// Opaque reference to a texture owned by the resource provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextureHandle(pub u32);

/// Opaque reference to a compiled shader owned by the resource provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShaderHandle(pub u32);

/// Name-keyed lookup of loaded resources.
///
/// Missing names yield `None`; callers treat that as "nothing to draw".
pub trait ResourceProvider {
    fn texture(&self, name: &str) -> Option<TextureHandle>;
    fn shader(&self, name: &str) -> Option<ShaderHandle>;
}

/// In-memory registry handing out sequential handles per name.
#[derive(Debug, Clone, Default)]
pub struct TextureRegistry {
    textures: HashMap<String, TextureHandle>,
    shaders: HashMap<String, ShaderHandle>,
    next_id: u32,
}

impl TextureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry that already knows the given texture and shader names.
    pub fn with_names(textures: &[&str], shaders: &[&str]) -> Self {
        let mut registry = Self::new();
        for name in textures {
            registry.register_texture(name);
        }
        for name in shaders {
            registry.register_shader(name);
        }
        registry
    }

    /// Register a texture, returning the existing handle if the name is known.
    pub fn register_texture(&mut self, name: &str) -> TextureHandle {
        if let Some(handle) = self.textures.get(name) {
            return *handle;
        }
        let handle = TextureHandle(self.bump());
        self.textures.insert(name.to_string(), handle);
        handle
    }

    pub fn register_shader(&mut self, name: &str) -> ShaderHandle {
        if let Some(handle) = self.shaders.get(name) {
            return *handle;
        }
        let handle = ShaderHandle(self.bump());
        self.shaders.insert(name.to_string(), handle);
        handle
    }

    pub fn len(&self) -> usize {
        self.textures.len() + self.shaders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn bump(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

impl ResourceProvider for TextureRegistry {
    fn texture(&self, name: &str) -> Option<TextureHandle> {
        self.textures.get(name).copied()
    }

    fn shader(&self, name: &str) -> Option<ShaderHandle> {
        self.shaders.get(name).copied()
    }
}

/// Sprite renderer consumed by the core.
pub trait Renderer {
    /// Draw a textured quad. Rotation is in degrees around the quad center.
    fn draw_quad(
        &mut self,
        texture: TextureHandle,
        position: Vec2,
        size: Vec2,
        rotation: f32,
        color: Vec3,
    );

    /// Draw a translucent particle sprite. Defaults to an opaque quad.
    fn draw_particle(&mut self, texture: TextureHandle, position: Vec2, size: f32, color: Vec4) {
        self.draw_quad(texture, position, Vec2::splat(size), 0.0, color.truncate());
    }

    /// Called before any quad of a frame is drawn.
    fn begin_frame(&mut self) {}

    /// Called after the last quad, with the post-processing toggles for this frame.
    fn end_frame(&mut self, _effects: &PostEffects, _time: f32) {}
}

/// Text overlay consumed by the core.
pub trait TextOverlay {
    fn render_text(&mut self, text: &str, position: Vec2, scale: f32, color: Vec3);
}
