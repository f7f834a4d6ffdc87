//! Fighter state machine
//!
//! Each fighter owns its kinematics, vitals, timers and a tagged
//! [`ActionState`]. Transitions driven by the fighter's own input happen in
//! [`Fighter::update`]; transitions caused by being struck are applied by the
//! combat resolver, and round results by the round controller.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::input::{Action, PlayerInput, PlayerSlot};
use crate::consts::*;
use crate::tuning::{AttackSpec, Tuning};
use crate::{clamp_to_arena, damp};

/// Horizontal facing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Facing {
    Left,
    Right,
}

impl Facing {
    /// -1 for left, +1 for right
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }
}

/// Special-move flavor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Element {
    Ice,
    Fire,
}

/// Melee attack strength
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttackKind {
    Light,
    Heavy,
}

impl AttackKind {
    pub fn spec(self, tuning: &Tuning) -> &AttackSpec {
        match self {
            AttackKind::Light => &tuning.light,
            AttackKind::Heavy => &tuning.heavy,
        }
    }
}

/// Current action, with per-state frame counters counting down to completion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionState {
    Idle,
    Walking,
    /// `connected` is set once the swing has resolved against the opponent
    LightAttack { remaining: u32, connected: bool },
    HeavyAttack { remaining: u32, connected: bool },
    Blocking,
    Casting { remaining: u32 },
    Hitstun { remaining: u32 },
    KnockedDown,
    RoundWin,
    RoundLose,
}

/// Notable things a fighter did during its own update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FighterEvent {
    AttackStarted(AttackKind),
    CastStarted,
    /// Cast finished: energy was debited and a projectile must be spawned
    SpecialReleased,
    Jumped,
}

/// A fighter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fighter {
    pub slot: PlayerSlot,
    pub element: Element,
    pub facing: Facing,
    /// Feet centre
    pub pos: Vec2,
    pub vel: Vec2,
    pub on_ground: bool,
    pub health: f32,
    pub energy: f32,
    pub state: ActionState,
    pub invincibility_ms: f32,
    pub combo_window_ms: f32,
    pub combo_count: u32,
    pub special_cooldown_ms: f32,
}

impl Fighter {
    /// Fresh fighter at its start position with full vitals
    pub fn new(slot: PlayerSlot, tuning: &Tuning) -> Self {
        let element = match slot {
            PlayerSlot::One => Element::Ice,
            PlayerSlot::Two => Element::Fire,
        };
        let mut fighter = Self {
            slot,
            element,
            facing: Facing::Right,
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            on_ground: true,
            health: 0.0,
            energy: 0.0,
            state: ActionState::Idle,
            invincibility_ms: 0.0,
            combo_window_ms: 0.0,
            combo_count: 0,
            special_cooldown_ms: 0.0,
        };
        fighter.reset_for_round(tuning);
        fighter
    }

    /// Back to the start line with full health/energy and no timers
    pub fn reset_for_round(&mut self, tuning: &Tuning) {
        let (x, facing) = match self.slot {
            PlayerSlot::One => (P1_START_X, Facing::Right),
            PlayerSlot::Two => (P2_START_X, Facing::Left),
        };
        self.pos = Vec2::new(x, GROUND_Y);
        self.vel = Vec2::ZERO;
        self.facing = facing;
        self.on_ground = true;
        self.health = tuning.fighter.max_health;
        self.energy = tuning.fighter.max_energy;
        self.state = ActionState::Idle;
        self.invincibility_ms = 0.0;
        self.combo_window_ms = 0.0;
        self.combo_count = 0;
        self.special_cooldown_ms = 0.0;
    }

    /// Body region that can be struck
    pub fn hurtbox(&self) -> Rect {
        Rect::new(
            self.pos.x - FIGHTER_WIDTH / 2.0,
            self.pos.y - FIGHTER_HEIGHT,
            FIGHTER_WIDTH,
            FIGHTER_HEIGHT,
        )
    }

    /// Current melee attack, if any: (kind, frames elapsed, already connected)
    pub fn current_attack(&self, tuning: &Tuning) -> Option<(AttackKind, u32, bool)> {
        let (kind, remaining, connected) = match self.state {
            ActionState::LightAttack { remaining, connected } => (AttackKind::Light, remaining, connected),
            ActionState::HeavyAttack { remaining, connected } => (AttackKind::Heavy, remaining, connected),
            _ => return None,
        };
        let elapsed = kind.spec(tuning).total_frames().saturating_sub(remaining);
        Some((kind, elapsed, connected))
    }

    /// Hitbox of an attack in its active window that has not connected yet
    pub fn active_hitbox(&self, tuning: &Tuning) -> Option<(AttackKind, Rect)> {
        let (kind, elapsed, connected) = self.current_attack(tuning)?;
        let spec = kind.spec(tuning);
        if connected || !spec.is_active_at(elapsed) {
            return None;
        }
        let front = self.pos.x + self.facing.sign() * FIGHTER_WIDTH / 2.0;
        let x = match self.facing {
            Facing::Right => front,
            Facing::Left => front - spec.reach,
        };
        let y = self.pos.y - FIGHTER_HEIGHT * 0.75 - spec.height / 2.0;
        Some((kind, Rect::new(x, y, spec.reach, spec.height)))
    }

    /// Record that the current swing resolved, so it cannot resolve again
    pub fn mark_connected(&mut self) {
        match &mut self.state {
            ActionState::LightAttack { connected, .. } | ActionState::HeavyAttack { connected, .. } => {
                *connected = true;
            }
            _ => {}
        }
    }

    /// Free to start a new action
    #[inline]
    pub fn is_actionable(&self) -> bool {
        matches!(self.state, ActionState::Idle | ActionState::Walking)
    }

    #[inline]
    pub fn is_blocking(&self) -> bool {
        matches!(self.state, ActionState::Blocking)
    }

    #[inline]
    pub fn is_invincible(&self) -> bool {
        self.invincibility_ms > 0.0
    }

    /// Can take damage from an overlap this tick
    pub fn can_be_hit(&self) -> bool {
        !self.is_invincible() && self.health > 0.0 && self.state != ActionState::KnockedDown
    }

    /// Facing a point at `x` (a point directly on top counts as in front)
    pub fn faces_toward(&self, x: f32) -> bool {
        (x - self.pos.x) * self.facing.sign() >= 0.0
    }

    pub fn can_cast(&self, tuning: &Tuning) -> bool {
        self.is_actionable()
            && self.energy >= tuning.special.energy_cost
            && self.special_cooldown_ms <= 0.0
    }

    /// Damage multiplier for the current combo count
    pub fn combo_multiplier(&self, tuning: &Tuning) -> f32 {
        let chained = self.combo_count.saturating_sub(1) as f32;
        (1.0 + tuning.combat.combo_step * chained).min(tuning.combat.combo_max_multiplier)
    }

    /// A hit of ours landed: extend or start the combo, gain energy, and
    /// return the multiplier that applies to this hit.
    pub fn register_hit(&mut self, tuning: &Tuning) -> f32 {
        if self.combo_window_ms > 0.0 {
            self.combo_count += 1;
        } else {
            self.combo_count = 1;
        }
        self.combo_window_ms = tuning.combat.combo_window_ms;
        self.add_energy(tuning.fighter.energy_on_hit, tuning);
        self.combo_multiplier(tuning)
    }

    pub fn add_energy(&mut self, amount: f32, tuning: &Tuning) {
        self.energy = (self.energy + amount).clamp(0.0, tuning.fighter.max_energy);
    }

    /// Subtract health, clamped at zero; returns the health actually lost
    pub fn apply_damage(&mut self, amount: f32) -> f32 {
        let before = self.health;
        self.health = (self.health - amount.max(0.0)).max(0.0);
        before - self.health
    }

    /// Energy regenerates except while casting, stunned, blocking or down
    pub fn regenerates_energy(&self) -> bool {
        !matches!(
            self.state,
            ActionState::Casting { .. }
                | ActionState::Hitstun { .. }
                | ActionState::Blocking
                | ActionState::KnockedDown
        )
    }

    /// Round is over for this fighter: winners celebrate, KO'd fighters stay down
    pub fn set_round_result(&mut self, won: bool) {
        if self.state == ActionState::KnockedDown {
            return;
        }
        self.state = if won {
            ActionState::RoundWin
        } else {
            ActionState::RoundLose
        };
        self.vel.x = 0.0;
    }

    fn tick_timers(&mut self, dt_ms: f32) {
        self.invincibility_ms = (self.invincibility_ms - dt_ms).max(0.0);
        self.special_cooldown_ms = (self.special_cooldown_ms - dt_ms).max(0.0);
        if self.combo_window_ms > 0.0 {
            self.combo_window_ms = (self.combo_window_ms - dt_ms).max(0.0);
            if self.combo_window_ms == 0.0 {
                self.combo_count = 0;
            }
        }
    }

    /// Count down committed states; returns a release event when a cast ends
    fn advance_state(&mut self, input: &PlayerInput, tuning: &Tuning) -> Option<FighterEvent> {
        match self.state {
            ActionState::Hitstun { remaining } => {
                self.state = if remaining <= 1 {
                    ActionState::Idle
                } else {
                    ActionState::Hitstun { remaining: remaining - 1 }
                };
            }
            ActionState::LightAttack { remaining, connected } => {
                self.state = if remaining <= 1 {
                    ActionState::Idle
                } else {
                    ActionState::LightAttack { remaining: remaining - 1, connected }
                };
            }
            ActionState::HeavyAttack { remaining, connected } => {
                self.state = if remaining <= 1 {
                    ActionState::Idle
                } else {
                    ActionState::HeavyAttack { remaining: remaining - 1, connected }
                };
            }
            ActionState::Casting { remaining } => {
                if remaining <= 1 {
                    self.energy = (self.energy - tuning.special.energy_cost).max(0.0);
                    self.special_cooldown_ms = tuning.special.cooldown_ms;
                    self.state = ActionState::Idle;
                    return Some(FighterEvent::SpecialReleased);
                }
                self.state = ActionState::Casting { remaining: remaining - 1 };
            }
            ActionState::Blocking => {
                if !input.held.contains(Action::Block) || !self.on_ground {
                    self.state = ActionState::Idle;
                }
            }
            _ => {}
        }
        None
    }

    /// Start whatever the player asked for, if the fighter is free to act
    fn handle_input(&mut self, input: &PlayerInput, opponent_x: f32, tuning: &Tuning) -> Option<FighterEvent> {
        if !self.is_actionable() {
            return None;
        }

        if opponent_x > self.pos.x {
            self.facing = Facing::Right;
        } else if opponent_x < self.pos.x {
            self.facing = Facing::Left;
        }

        if input.pressed.contains(Action::Special) && self.can_cast(tuning) {
            self.state = ActionState::Casting {
                remaining: tuning.special.cast_frames.max(1),
            };
            return Some(FighterEvent::CastStarted);
        }
        if input.pressed.contains(Action::HeavyAttack) {
            self.state = ActionState::HeavyAttack {
                remaining: tuning.heavy.total_frames(),
                connected: false,
            };
            return Some(FighterEvent::AttackStarted(AttackKind::Heavy));
        }
        if input.pressed.contains(Action::LightAttack) {
            self.state = ActionState::LightAttack {
                remaining: tuning.light.total_frames(),
                connected: false,
            };
            return Some(FighterEvent::AttackStarted(AttackKind::Light));
        }
        if input.held.contains(Action::Block) && self.on_ground {
            self.state = ActionState::Blocking;
            return None;
        }

        self.state = if input.move_axis() != 0.0 {
            ActionState::Walking
        } else {
            ActionState::Idle
        };

        if input.pressed.contains(Action::Jump) && self.on_ground {
            self.vel.y = -tuning.fighter.jump_velocity;
            self.on_ground = false;
            return Some(FighterEvent::Jumped);
        }
        None
    }

    fn integrate(&mut self, input: &PlayerInput, tuning: &Tuning, dt: f32) {
        if self.state == ActionState::Walking {
            self.vel.x = input.move_axis() * tuning.fighter.walk_speed;
        } else if self.on_ground {
            self.vel.x = damp(self.vel.x, tuning.fighter.friction, dt);
        }

        if !self.on_ground {
            self.vel.y += tuning.fighter.gravity * dt;
        }

        let next = self.pos + self.vel * dt;
        let clamped = clamp_to_arena(next);
        if clamped.x != next.x {
            self.vel.x = 0.0;
        }
        if next.y >= GROUND_Y {
            self.on_ground = true;
            self.vel.y = 0.0;
        }
        self.pos = clamped;
    }

    /// Advance one tick from this fighter's own input
    pub fn update(&mut self, input: &PlayerInput, opponent_x: f32, tuning: &Tuning, dt: f32) -> Option<FighterEvent> {
        if matches!(
            self.state,
            ActionState::RoundWin | ActionState::RoundLose
        ) {
            return None;
        }

        self.tick_timers(dt * 1000.0);
        let regenerating = self.regenerates_energy();

        let mut event = self.advance_state(input, tuning);
        if self.state != ActionState::KnockedDown {
            // A cast release and a new action never share a tick
            if event.is_none() {
                event = self.handle_input(input, opponent_x, tuning);
            }
        }

        if regenerating {
            let regen = tuning.fighter.energy_regen * dt;
            self.add_energy(regen, tuning);
        }

        self.integrate(input, tuning, dt);
        event
    }
}

/// Push overlapping grounded bodies apart so fighters cannot walk through each other
pub fn separate(a: &mut Fighter, b: &mut Fighter) {
    if !(a.on_ground && b.on_ground) {
        return;
    }
    let overlap = a.hurtbox().overlap_x(&b.hurtbox());
    if overlap <= 0.0 || !a.hurtbox().overlaps(&b.hurtbox()) {
        return;
    }
    let dir = if a.pos.x <= b.pos.x { -1.0 } else { 1.0 };
    a.pos = clamp_to_arena(a.pos + Vec2::new(dir * overlap / 2.0, 0.0));
    b.pos = clamp_to_arena(b.pos - Vec2::new(dir * overlap / 2.0, 0.0));

    // A body pinned to a wall pushes the other the rest of the way
    let remaining = a.hurtbox().overlap_x(&b.hurtbox());
    if remaining > 0.0 {
        if a.pos.x == WALL_MARGIN || a.pos.x == ARENA_WIDTH - WALL_MARGIN {
            b.pos = clamp_to_arena(b.pos - Vec2::new(dir * remaining, 0.0));
        } else {
            a.pos = clamp_to_arena(a.pos + Vec2::new(dir * remaining, 0.0));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::input::ActionFlags;

    fn pressed(actions: &[Action]) -> PlayerInput {
        PlayerInput {
            held: ActionFlags::from_actions(actions),
            pressed: ActionFlags::from_actions(actions),
        }
    }

    fn held(actions: &[Action]) -> PlayerInput {
        PlayerInput {
            held: ActionFlags::from_actions(actions),
            pressed: ActionFlags::NONE,
        }
    }

    #[test]
    fn test_new_fighter_full_vitals() {
        let tuning = Tuning::default();
        let f = Fighter::new(PlayerSlot::Two, &tuning);
        assert_eq!(f.health, tuning.fighter.max_health);
        assert_eq!(f.energy, tuning.fighter.max_energy);
        assert_eq!(f.state, ActionState::Idle);
        assert_eq!(f.facing, Facing::Left);
        assert_eq!(f.element, Element::Fire);
    }

    #[test]
    fn test_walk_and_stop() {
        let tuning = Tuning::default();
        let mut f = Fighter::new(PlayerSlot::One, &tuning);
        let start = f.pos.x;
        f.update(&held(&[Action::MoveRight]), P2_START_X, &tuning, SIM_DT);
        assert_eq!(f.state, ActionState::Walking);
        assert!(f.pos.x > start);

        f.update(&PlayerInput::default(), P2_START_X, &tuning, SIM_DT);
        assert_eq!(f.state, ActionState::Idle);
    }

    #[test]
    fn test_attack_is_committed() {
        let tuning = Tuning::default();
        let mut f = Fighter::new(PlayerSlot::One, &tuning);
        let event = f.update(&pressed(&[Action::LightAttack]), P2_START_X, &tuning, SIM_DT);
        assert_eq!(event, Some(FighterEvent::AttackStarted(AttackKind::Light)));

        // Heavy press mid-swing is ignored
        for _ in 1..tuning.light.total_frames() {
            f.update(&pressed(&[Action::HeavyAttack, Action::Block]), P2_START_X, &tuning, SIM_DT);
            assert!(matches!(f.state, ActionState::LightAttack { .. }));
        }
        f.update(&PlayerInput::default(), P2_START_X, &tuning, SIM_DT);
        assert_eq!(f.state, ActionState::Idle);
    }

    #[test]
    fn test_hitbox_only_in_active_window() {
        let tuning = Tuning::default();
        let mut f = Fighter::new(PlayerSlot::One, &tuning);
        f.update(&pressed(&[Action::LightAttack]), P2_START_X, &tuning, SIM_DT);

        let mut active_frames = 0;
        for _ in 0..tuning.light.total_frames() {
            if let Some((kind, rect)) = f.active_hitbox(&tuning) {
                assert_eq!(kind, AttackKind::Light);
                // Facing right: hitbox starts at the front edge
                assert!(rect.min.x >= f.pos.x);
                active_frames += 1;
            }
            f.update(&PlayerInput::default(), P2_START_X, &tuning, SIM_DT);
        }
        assert_eq!(active_frames, tuning.light.active);
    }

    #[test]
    fn test_connected_attack_exposes_no_hitbox() {
        let tuning = Tuning::default();
        let mut f = Fighter::new(PlayerSlot::One, &tuning);
        f.state = ActionState::LightAttack {
            remaining: tuning.light.total_frames() - tuning.light.startup,
            connected: false,
        };
        assert!(f.active_hitbox(&tuning).is_some());
        f.mark_connected();
        assert!(f.active_hitbox(&tuning).is_none());
    }

    #[test]
    fn test_block_while_held() {
        let tuning = Tuning::default();
        let mut f = Fighter::new(PlayerSlot::One, &tuning);
        f.update(&held(&[Action::Block]), P2_START_X, &tuning, SIM_DT);
        assert!(f.is_blocking());
        f.update(&held(&[Action::Block, Action::MoveRight]), P2_START_X, &tuning, SIM_DT);
        assert!(f.is_blocking());
        f.update(&PlayerInput::default(), P2_START_X, &tuning, SIM_DT);
        assert_eq!(f.state, ActionState::Idle);
    }

    #[test]
    fn test_hitstun_blocks_actions() {
        let tuning = Tuning::default();
        let mut f = Fighter::new(PlayerSlot::One, &tuning);
        f.state = ActionState::Hitstun { remaining: 3 };
        f.update(&pressed(&[Action::LightAttack]), P2_START_X, &tuning, SIM_DT);
        assert_eq!(f.state, ActionState::Hitstun { remaining: 2 });
        f.update(&pressed(&[Action::Special]), P2_START_X, &tuning, SIM_DT);
        assert_eq!(f.state, ActionState::Hitstun { remaining: 1 });
        // Stun ends and the fighter may act on the same tick
        f.update(&held(&[Action::Block]), P2_START_X, &tuning, SIM_DT);
        assert!(f.is_blocking());
    }

    #[test]
    fn test_knocked_down_cannot_act() {
        let tuning = Tuning::default();
        let mut f = Fighter::new(PlayerSlot::One, &tuning);
        f.state = ActionState::KnockedDown;
        let event = f.update(&pressed(&[Action::HeavyAttack]), P2_START_X, &tuning, SIM_DT);
        assert!(event.is_none());
        assert_eq!(f.state, ActionState::KnockedDown);
    }

    #[test]
    fn test_cast_debits_energy_on_release() {
        let tuning = Tuning::default();
        let mut f = Fighter::new(PlayerSlot::One, &tuning);
        let event = f.update(&pressed(&[Action::Special]), P2_START_X, &tuning, SIM_DT);
        assert_eq!(event, Some(FighterEvent::CastStarted));
        // Nothing spent while casting
        assert_eq!(f.energy, tuning.fighter.max_energy);

        let mut released = false;
        for _ in 0..tuning.special.cast_frames {
            if f.update(&PlayerInput::default(), P2_START_X, &tuning, SIM_DT)
                == Some(FighterEvent::SpecialReleased)
            {
                released = true;
                break;
            }
        }
        assert!(released);
        assert_eq!(f.state, ActionState::Idle);
        assert!((f.energy - (tuning.fighter.max_energy - tuning.special.energy_cost)).abs() < 1e-4);
        assert_eq!(f.special_cooldown_ms, tuning.special.cooldown_ms);
        // On cooldown: cannot cast again
        assert!(!f.can_cast(&tuning));
    }

    #[test]
    fn test_cast_needs_energy() {
        let tuning = Tuning::default();
        let mut f = Fighter::new(PlayerSlot::One, &tuning);
        f.energy = tuning.special.energy_cost - 1.0;
        let event = f.update(&pressed(&[Action::Special]), P2_START_X, &tuning, SIM_DT);
        assert_ne!(event, Some(FighterEvent::CastStarted));
        assert!(!matches!(f.state, ActionState::Casting { .. }));
    }

    #[test]
    fn test_energy_regen_policy() {
        let tuning = Tuning::default();
        let mut f = Fighter::new(PlayerSlot::One, &tuning);
        f.energy = 50.0;

        // Idle regenerates
        f.update(&PlayerInput::default(), P2_START_X, &tuning, 0.5);
        assert!((f.energy - 55.0).abs() < 1e-4);

        // Blocking does not
        f.update(&held(&[Action::Block]), P2_START_X, &tuning, 0.5);
        f.update(&held(&[Action::Block]), P2_START_X, &tuning, 0.5);
        assert!(f.is_blocking());
        let before = f.energy;
        f.update(&held(&[Action::Block]), P2_START_X, &tuning, 0.5);
        assert_eq!(f.energy, before);

        // Hitstun does not
        f.state = ActionState::Hitstun { remaining: 10 };
        f.update(&PlayerInput::default(), P2_START_X, &tuning, 0.5);
        assert_eq!(f.energy, before);

        // Casting does not
        f.state = ActionState::Casting { remaining: 10 };
        f.update(&PlayerInput::default(), P2_START_X, &tuning, 0.5);
        assert_eq!(f.energy, before);

        // Never exceeds max
        f.state = ActionState::Idle;
        for _ in 0..100 {
            f.update(&PlayerInput::default(), P2_START_X, &tuning, 0.5);
        }
        assert_eq!(f.energy, tuning.fighter.max_energy);
    }

    #[test]
    fn test_combo_window_expiry() {
        let tuning = Tuning::default();
        let mut f = Fighter::new(PlayerSlot::One, &tuning);
        assert_eq!(f.register_hit(&tuning), 1.0);
        assert_eq!(f.combo_count, 1);
        f.update(&PlayerInput::default(), P2_START_X, &tuning, 0.5);
        let mult = f.register_hit(&tuning);
        assert_eq!(f.combo_count, 2);
        assert!(mult > 1.0);

        // Let the window lapse
        f.update(&PlayerInput::default(), P2_START_X, &tuning, 1.0);
        f.update(&PlayerInput::default(), P2_START_X, &tuning, 0.001);
        assert_eq!(f.combo_count, 0);
        assert_eq!(f.register_hit(&tuning), 1.0);
    }

    #[test]
    fn test_combo_multiplier_caps() {
        let tuning = Tuning::default();
        let mut f = Fighter::new(PlayerSlot::One, &tuning);
        for _ in 0..20 {
            f.register_hit(&tuning);
        }
        assert_eq!(f.combo_multiplier(&tuning), tuning.combat.combo_max_multiplier);
    }

    #[test]
    fn test_jump_and_land() {
        let tuning = Tuning::default();
        let mut f = Fighter::new(PlayerSlot::One, &tuning);
        let event = f.update(&pressed(&[Action::Jump]), P2_START_X, &tuning, SIM_DT);
        assert_eq!(event, Some(FighterEvent::Jumped));
        assert!(!f.on_ground);
        assert!(f.pos.y < GROUND_Y);

        // No double jump and no blocking in the air
        f.update(&pressed(&[Action::Jump, Action::Block]), P2_START_X, &tuning, SIM_DT);
        assert!(!f.is_blocking());

        for _ in 0..240 {
            f.update(&PlayerInput::default(), P2_START_X, &tuning, SIM_DT);
        }
        assert!(f.on_ground);
        assert_eq!(f.pos.y, GROUND_Y);
    }

    #[test]
    fn test_faces_opponent_and_stays_in_arena() {
        let tuning = Tuning::default();
        let mut f = Fighter::new(PlayerSlot::One, &tuning);
        f.update(&PlayerInput::default(), 0.0, &tuning, SIM_DT);
        assert_eq!(f.facing, Facing::Left);

        for _ in 0..600 {
            f.update(&held(&[Action::MoveLeft]), 0.0, &tuning, SIM_DT);
        }
        assert_eq!(f.pos.x, WALL_MARGIN);
    }

    #[test]
    fn test_separate_pushes_apart() {
        let tuning = Tuning::default();
        let mut a = Fighter::new(PlayerSlot::One, &tuning);
        let mut b = Fighter::new(PlayerSlot::Two, &tuning);
        a.pos.x = 500.0;
        b.pos.x = 520.0;
        separate(&mut a, &mut b);
        assert!(!a.hurtbox().overlaps(&b.hurtbox()));
        assert!(a.pos.x < b.pos.x);

        // Pinned against the left wall
        a.pos.x = WALL_MARGIN;
        b.pos.x = WALL_MARGIN + 10.0;
        separate(&mut a, &mut b);
        assert!(!a.hurtbox().overlaps(&b.hurtbox()));
        assert_eq!(a.pos.x, WALL_MARGIN);
    }
}
