//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only (and only for visual effects)
//! - Stable iteration order (player slot, then projectile ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod combat;
pub mod fighter;
pub mod input;
pub mod projectile;
pub mod round;
pub mod state;
pub mod tick;

pub use collision::Rect;
pub use combat::{HitOutcome, HitSource, resolve};
pub use fighter::{ActionState, AttackKind, Element, Facing, Fighter, FighterEvent};
pub use input::{
    Action, ActionFlags, InputState, PlayerInput, PlayerSlot, TickInput, TouchButton, TouchLayout,
    TouchTracker, binding_for_key,
};
pub use projectile::Projectile;
pub use round::{MatchPhase, PhaseChange, RoundEndReason, RoundMatchController, RoundOutcome, RoundResult};
pub use state::{Effects, GameEvent, GameState, MAX_PARTICLES, Particle, ParticleKind};
pub use tick::tick;
