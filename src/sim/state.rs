//! Game state and core simulation types
//!
//! Everything the simulation owns lives in [`GameState`]. Visual effects are
//! kept alongside but never feed back into gameplay.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::combat::HitOutcome;
use super::fighter::{Element, Fighter, FighterEvent};
use super::input::PlayerSlot;
use super::projectile::Projectile;
use super::round::{RoundMatchController, RoundResult};
use crate::tuning::Tuning;

/// What a particle looks like
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleKind {
    Spark,
    Guard,
    Ice,
    Fire,
}

impl From<Element> for ParticleKind {
    fn from(element: Element) -> Self {
        match element {
            Element::Ice => ParticleKind::Ice,
            Element::Fire => ParticleKind::Fire,
        }
    }
}

/// A visual particle
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub kind: ParticleKind,
    pub life: f32, // 0-1, decreases over time
    pub size: f32,
}

/// Maximum particles
pub const MAX_PARTICLES: usize = 256;

/// Particle fall acceleration (units/s²)
const PARTICLE_GRAVITY: f32 = 900.0;

/// Seconds a particle lives
const PARTICLE_LIFETIME: f32 = 0.5;

/// Transient hit feedback: decays on its own, never affects gameplay
#[derive(Debug, Clone, Default)]
pub struct Effects {
    /// Shake amplitude in arena units
    pub screen_shake: f32,
    pub particles: Vec<Particle>,
}

impl Effects {
    pub fn add_shake(&mut self, amount: f32) {
        self.screen_shake = self.screen_shake.max(amount);
    }

    pub fn update(&mut self, dt: f32) {
        self.screen_shake *= 0.9_f32.powf(dt / crate::consts::SIM_DT);
        if self.screen_shake < 0.01 {
            self.screen_shake = 0.0;
        }

        for p in &mut self.particles {
            p.pos += p.vel * dt;
            p.vel.y += PARTICLE_GRAVITY * dt;
            p.life -= dt / PARTICLE_LIFETIME;
        }
        self.particles.retain(|p| p.life > 0.0);
    }

    pub fn clear(&mut self) {
        self.screen_shake = 0.0;
        self.particles.clear();
    }
}

/// RNG state wrapper for serialization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    pub stream: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed, stream: 0 }
    }

    /// Fresh generator for the next burst; each call advances the stream
    pub fn next_rng(&mut self) -> Pcg32 {
        let rng = Pcg32::new(self.seed, self.stream);
        self.stream = self.stream.wrapping_add(1);
        rng
    }
}

/// Something that happened during the last tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    CountdownStarted { round: u32 },
    FightStarted { round: u32 },
    Fighter { slot: PlayerSlot, event: FighterEvent },
    ProjectileSpawned { id: u32, owner: PlayerSlot },
    ProjectileExpired { id: u32 },
    Hit(HitOutcome),
    RoundOver(RoundResult),
    MatchOver { winner: PlayerSlot },
}

/// Complete game state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Seed for effect randomness
    pub seed: u64,
    pub rng_state: RngState,
    pub tuning: Tuning,
    /// Indexed by [`PlayerSlot::index`]
    pub fighters: [Fighter; 2],
    /// Projectiles in flight (sorted by id for determinism)
    pub projectiles: Vec<Projectile>,
    pub round: RoundMatchController,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Visual effects (not gameplay-affecting)
    #[serde(skip)]
    pub effects: Effects,
    /// Events produced by the most recent tick
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let fighters = [
            Fighter::new(PlayerSlot::One, &tuning),
            Fighter::new(PlayerSlot::Two, &tuning),
        ];
        let round = RoundMatchController::new(&tuning);
        Self {
            seed,
            rng_state: RngState::new(seed),
            tuning,
            fighters,
            projectiles: Vec::new(),
            round,
            time_ticks: 0,
            effects: Effects::default(),
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    #[inline]
    pub fn fighter(&self, slot: PlayerSlot) -> &Fighter {
        &self.fighters[slot.index()]
    }

    /// Start-of-round layout: both fighters reset, arena cleared
    pub fn reset_round(&mut self) {
        for fighter in &mut self.fighters {
            fighter.reset_for_round(&self.tuning);
        }
        self.projectiles.clear();
    }

    /// New match from any phase
    pub fn restart(&mut self) {
        self.round.restart(&self.tuning);
        self.reset_round();
        self.effects.clear();
        self.events.clear();
    }

    pub fn spawn_projectile(&mut self, owner: PlayerSlot) -> u32 {
        let id = self.next_entity_id();
        let projectile = Projectile::spawn(id, &self.fighters[owner.index()], &self.tuning);
        self.projectiles.push(projectile);
        id
    }

    /// Spray `count` particles from `origin`, biased along `direction`
    pub fn burst(&mut self, origin: Vec2, direction: f32, kind: ParticleKind, count: usize) {
        let room = MAX_PARTICLES.saturating_sub(self.effects.particles.len());
        let mut rng = self.rng_state.next_rng();
        for _ in 0..count.min(room) {
            let angle = rng.random_range(-std::f32::consts::PI..std::f32::consts::PI);
            let speed = rng.random_range(80.0..320.0);
            let mut vel = Vec2::new(angle.cos(), angle.sin()) * speed;
            vel.x += direction * 120.0;
            vel.y -= 120.0;
            self.effects.particles.push(Particle {
                pos: origin,
                vel,
                kind,
                life: rng.random_range(0.6..1.0),
                size: rng.random_range(3.0..7.0),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state() {
        let state = GameState::new(7, Tuning::default());
        assert_eq!(state.fighter(PlayerSlot::One).slot, PlayerSlot::One);
        assert_eq!(state.fighter(PlayerSlot::Two).slot, PlayerSlot::Two);
        assert!(state.projectiles.is_empty());
        assert!(state.fighters[0].pos.x < state.fighters[1].pos.x);
    }

    #[test]
    fn test_burst_is_seeded_and_capped() {
        let mut a = GameState::new(42, Tuning::default());
        let mut b = GameState::new(42, Tuning::default());
        a.burst(Vec2::new(500.0, 400.0), 1.0, ParticleKind::Spark, 10);
        b.burst(Vec2::new(500.0, 400.0), 1.0, ParticleKind::Spark, 10);
        assert_eq!(a.effects.particles.len(), 10);
        for (pa, pb) in a.effects.particles.iter().zip(&b.effects.particles) {
            assert_eq!(pa.vel, pb.vel);
        }

        a.burst(Vec2::ZERO, 1.0, ParticleKind::Fire, MAX_PARTICLES * 2);
        assert_eq!(a.effects.particles.len(), MAX_PARTICLES);
    }

    #[test]
    fn test_effects_decay() {
        let mut effects = Effects::default();
        effects.add_shake(12.0);
        effects.particles.push(Particle {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            kind: ParticleKind::Guard,
            life: 1.0,
            size: 4.0,
        });
        for _ in 0..120 {
            effects.update(crate::consts::SIM_DT);
        }
        assert_eq!(effects.screen_shake, 0.0);
        assert!(effects.particles.is_empty());
    }

    #[test]
    fn test_restart_resets_everything() {
        let mut state = GameState::new(1, Tuning::default());
        state.fighters[0].health = 10.0;
        state.round.wins = [1, 1];
        state.spawn_projectile(PlayerSlot::One);
        state.restart();
        assert_eq!(state.fighters[0].health, state.tuning.fighter.max_health);
        assert_eq!(state.round.wins, [0, 0]);
        assert!(state.projectiles.is_empty());
    }
}
