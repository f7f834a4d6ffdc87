//! Special-move projectiles

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::fighter::{Element, Fighter};
use super::input::PlayerSlot;
use crate::consts::*;
use crate::tuning::Tuning;

/// A projectile in flight
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub owner: PlayerSlot,
    pub element: Element,
    /// Centre
    pub pos: Vec2,
    pub vel: Vec2,
    pub damage: f32,
    pub stun: u32,
    pub knockback: f32,
    /// Seconds left before it fizzles
    pub lifetime: f32,
}

impl Projectile {
    /// Launch from the caster's front edge at chest height, along its facing
    pub fn spawn(id: u32, caster: &Fighter, tuning: &Tuning) -> Self {
        let dir = caster.facing.sign();
        let offset = FIGHTER_WIDTH / 2.0 + PROJECTILE_WIDTH / 2.0;
        let special = &tuning.special;
        Self {
            id,
            owner: caster.slot,
            element: caster.element,
            pos: Vec2::new(caster.pos.x + dir * offset, caster.pos.y - FIGHTER_HEIGHT * 0.6),
            vel: Vec2::new(dir * special.projectile_speed, 0.0),
            damage: special.projectile_damage,
            stun: special.projectile_stun,
            knockback: special.projectile_knockback,
            lifetime: special.projectile_lifetime,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_center(self.pos, Vec2::new(PROJECTILE_WIDTH, PROJECTILE_HEIGHT))
    }

    /// Travel direction sign (-1 or +1)
    pub fn direction(&self) -> f32 {
        if self.vel.x < 0.0 { -1.0 } else { 1.0 }
    }

    pub fn update(&mut self, dt: f32) {
        self.pos += self.vel * dt;
        self.lifetime -= dt;
    }

    /// Lifetime spent or fully outside the arena
    pub fn is_expired(&self) -> bool {
        let bounds = self.bounds();
        self.lifetime <= 0.0 || bounds.max().x < 0.0 || bounds.min.x > ARENA_WIDTH
    }
}
