//! Platform abstraction layer
//!
//! The browser frontend lives in `web` (wasm32 only). Coordinate mapping that
//! both the renderer and the touch listeners agree on lives here so it can be
//! tested natively.

#[cfg(target_arch = "wasm32")]
pub mod web;

use glam::Vec2;

use crate::consts::{ARENA_HEIGHT, ARENA_WIDTH};

/// Map a point in page pixels to arena coordinates, given the canvas's
/// on-page origin and size. Inverse of the renderer's letterboxing.
pub fn client_to_arena(point: Vec2, canvas_origin: Vec2, canvas_size: Vec2) -> Vec2 {
    let size = canvas_size.max(Vec2::ONE);
    let scale = (size.x / ARENA_WIDTH).min(size.y / ARENA_HEIGHT);
    let content = Vec2::new(ARENA_WIDTH, ARENA_HEIGHT) * scale;
    let offset = (size - content) / 2.0;
    (point - canvas_origin - offset) / scale
}
