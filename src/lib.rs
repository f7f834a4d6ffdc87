//! Arena Fighter - a two-player 1v1 fighting game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (fighters, combat, projectiles, rounds)
//! - `engine`: Frame loop driving the simulation and renderer
//! - `renderer`: Scene generation and WebGPU rendering pipeline
//! - `platform`: Browser frontend (canvas surface, input listeners, scheduling)
//! - `tuning`: Data-driven game balance
//! - `settings`: Presentation preferences

pub mod engine;
pub mod error;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use engine::{Frontend, GameLoop, HeadlessFrontend, SharedInput};
pub use error::EngineError;
pub use settings::{QualityPreset, Settings};
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one tick per animation frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta fed into the accumulator (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Arena dimensions (logical units, y grows downward)
    pub const ARENA_WIDTH: f32 = 1024.0;
    pub const ARENA_HEIGHT: f32 = 576.0;
    /// Floor line fighters stand on
    pub const GROUND_Y: f32 = 496.0;
    /// Closest a fighter's centre may get to either wall
    pub const WALL_MARGIN: f32 = 40.0;

    /// Fighter body size
    pub const FIGHTER_WIDTH: f32 = 60.0;
    pub const FIGHTER_HEIGHT: f32 = 120.0;

    /// Round start positions (feet centre x)
    pub const P1_START_X: f32 = 300.0;
    pub const P2_START_X: f32 = 724.0;

    /// Projectile body size
    pub const PROJECTILE_WIDTH: f32 = 36.0;
    pub const PROJECTILE_HEIGHT: f32 = 24.0;
}

/// Clamp a fighter's centre x inside the arena walls
#[inline]
pub fn clamp_to_arena(pos: Vec2) -> Vec2 {
    Vec2::new(
        pos.x
            .clamp(consts::WALL_MARGIN, consts::ARENA_WIDTH - consts::WALL_MARGIN),
        pos.y.min(consts::GROUND_Y),
    )
}

/// Move `value` toward zero by a per-tick friction factor, scaled for `dt`
#[inline]
pub fn damp(value: f32, friction_per_tick: f32, dt: f32) -> f32 {
    let damped = value * friction_per_tick.powf(dt / consts::SIM_DT);
    if damped.abs() < 1.0 { 0.0 } else { damped }
}
