//! Brick levels parsed from whitespace-separated tile grids
//!
//! Tile codes: `0` empty, `1` solid, `2..=5` breakable with distinct colors.

use std::fs;
use std::path::Path;

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::entity::{Body, Entity, EntityKind};
use crate::services::ResourceProvider;

pub const TILE_EMPTY: u32 = 0;
pub const TILE_SOLID: u32 = 1;

/// Color for a tile code, `None` for codes outside the table
pub fn tile_color(tile: u32) -> Option<Vec3> {
    match tile {
        1 => Some(Vec3::new(0.8, 0.8, 0.7)),
        2 => Some(Vec3::new(0.2, 0.6, 1.0)),
        3 => Some(Vec3::new(0.0, 0.7, 0.0)),
        4 => Some(Vec3::new(0.8, 0.8, 0.4)),
        5 => Some(Vec3::new(1.0, 0.5, 0.5)),
        _ => None,
    }
}

/// One level's bricks
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Level {
    pub bricks: Vec<Entity>,
}

impl Level {
    /// Load a level file. Unreadable files produce an empty level.
    pub fn load(
        path: impl AsRef<Path>,
        width: f32,
        height: f32,
        resources: &dyn ResourceProvider,
    ) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(text) => {
                let level = Self::parse(&text, width, height, resources);
                log::info!("Loaded level {} ({} bricks)", path.display(), level.bricks.len());
                level
            }
            Err(e) => {
                log::warn!("Failed loading level file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Parse level text: one row per line, whitespace-separated tile codes.
    pub fn parse(text: &str, width: f32, height: f32, resources: &dyn ResourceProvider) -> Self {
        let grid = parse_grid(text);
        Self::from_grid(&grid, width, height, resources)
    }

    /// Build bricks from a tile grid. Row 0 decides the column count.
    pub fn from_grid(
        grid: &[Vec<u32>],
        width: f32,
        height: f32,
        resources: &dyn ResourceProvider,
    ) -> Self {
        let rows = grid.len();
        let cols = grid.first().map_or(0, |row| row.len());
        if rows == 0 || cols == 0 {
            return Self::default();
        }

        let cell = Vec2::new(width / cols as f32, height / rows as f32);
        let solid_texture = resources.texture("brick_solid");
        let brick_texture = resources.texture("brick");

        let mut bricks = Vec::new();
        for (row, tiles) in grid.iter().enumerate() {
            if tiles.len() != cols {
                log::warn!(
                    "Level row {} has {} tiles, expected {}; missing cells left empty",
                    row,
                    tiles.len(),
                    cols
                );
            }
            for (col, &tile) in tiles.iter().take(cols).enumerate() {
                if tile == TILE_EMPTY {
                    continue;
                }
                let Some(color) = tile_color(tile) else {
                    log::warn!("Unknown tile code {} at ({}, {}), ignored", tile, row, col);
                    continue;
                };
                let pos = Vec2::new(col as f32 * cell.x, row as f32 * cell.y);
                let mut body = Body::new(pos, cell).with_color(color);
                if tile == TILE_SOLID {
                    body = body.solid().with_texture(solid_texture);
                } else {
                    body = body.with_texture(brick_texture);
                }
                bricks.push(Entity::new(body, EntityKind::Brick { tile }));
            }
        }

        Self { bricks }
    }

    /// True once every breakable brick is destroyed. Solid bricks never count.
    pub fn is_complete(&self) -> bool {
        self.bricks
            .iter()
            .all(|b| b.body.solid || b.body.destroyed)
    }

    /// Breakable bricks still standing
    pub fn remaining(&self) -> usize {
        self.bricks
            .iter()
            .filter(|b| !b.body.solid && !b.body.destroyed)
            .count()
    }

    /// Bring every brick back without reparsing.
    pub fn reset(&mut self) {
        for brick in &mut self.bricks {
            brick.body.destroyed = false;
        }
    }
}

/// Split level text into rows of tile codes.
///
/// Blank lines are skipped; a row stops at its first token that is not a
/// non-negative integer.
fn parse_grid(text: &str) -> Vec<Vec<u32>> {
    let mut grid = Vec::new();
    for (line_no, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let mut row = Vec::new();
        for token in line.split_whitespace() {
            match token.parse::<u32>() {
                Ok(tile) => row.push(tile),
                Err(_) => {
                    log::warn!("Bad tile token {:?} on line {}", token, line_no + 1);
                    break;
                }
            }
        }
        grid.push(row);
    }
    grid
}
