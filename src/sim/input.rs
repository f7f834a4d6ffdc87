//! Player input: logical actions, fixed key bindings, touch pad, and the
//! per-tick snapshot the simulation consumes.
//!
//! Event callbacks only ever write into [`InputState`]. The game loop calls
//! [`InputState::snapshot`] exactly once per tick, which hands the simulation
//! a stable copy and clears the latched press edges.

use std::collections::HashMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{ARENA_HEIGHT, ARENA_WIDTH};
use crate::error::EngineError;

/// Player slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerSlot {
    One,
    Two,
}

impl PlayerSlot {
    pub const ALL: [PlayerSlot; 2] = [PlayerSlot::One, PlayerSlot::Two];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            PlayerSlot::One => 0,
            PlayerSlot::Two => 1,
        }
    }

    #[inline]
    pub fn opponent(self) -> Self {
        match self {
            PlayerSlot::One => PlayerSlot::Two,
            PlayerSlot::Two => PlayerSlot::One,
        }
    }
}

/// Logical player action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    MoveLeft,
    MoveRight,
    Jump,
    LightAttack,
    HeavyAttack,
    Block,
    Special,
}

impl Action {
    pub const ALL: [Action; 7] = [
        Action::MoveLeft,
        Action::MoveRight,
        Action::Jump,
        Action::LightAttack,
        Action::HeavyAttack,
        Action::Block,
        Action::Special,
    ];

    #[inline]
    const fn bit(self) -> u8 {
        1 << self as u8
    }
}

/// Bitset of actions, one bit per [`Action`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionFlags(u8);

impl ActionFlags {
    pub const NONE: Self = Self(0);

    #[inline]
    pub fn contains(self, action: Action) -> bool {
        self.0 & action.bit() != 0
    }

    #[inline]
    pub fn insert(&mut self, action: Action) {
        self.0 |= action.bit();
    }

    #[inline]
    pub fn remove(&mut self, action: Action) {
        self.0 &= !action.bit();
    }

    pub fn from_actions(actions: &[Action]) -> Self {
        let mut flags = Self::NONE;
        for &action in actions {
            flags.insert(action);
        }
        flags
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

/// One player's input for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerInput {
    /// Actions currently held down
    pub held: ActionFlags,
    /// Actions pressed since the previous snapshot (edge-triggered)
    pub pressed: ActionFlags,
}

impl PlayerInput {
    /// Horizontal intent: -1 left, +1 right, 0 none or both
    pub fn move_axis(&self) -> f32 {
        let left = self.held.contains(Action::MoveLeft);
        let right = self.held.contains(Action::MoveRight);
        match (left, right) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }
}

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub players: [PlayerInput; 2],
}

impl TickInput {
    #[inline]
    pub fn player(&self, slot: PlayerSlot) -> &PlayerInput {
        &self.players[slot.index()]
    }
}

/// Live pressed/held status written by event callbacks
#[derive(Debug, Clone, Default)]
pub struct InputState {
    held: [ActionFlags; 2],
    pressed: [ActionFlags; 2],
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a press; key-repeat of an already held action is not a new edge
    pub fn press(&mut self, slot: PlayerSlot, action: Action) {
        let i = slot.index();
        if !self.held[i].contains(action) {
            self.pressed[i].insert(action);
        }
        self.held[i].insert(action);
    }

    pub fn release(&mut self, slot: PlayerSlot, action: Action) {
        self.held[slot.index()].remove(action);
    }

    /// Apply a raw keyboard event. Unbound keys are rejected.
    pub fn apply_key(&mut self, key: &str, down: bool) -> Result<(), EngineError> {
        let (slot, action) = binding_for_key(key)?;
        if down {
            self.press(slot, action);
        } else {
            self.release(slot, action);
        }
        Ok(())
    }

    /// Drop every held action (focus loss, restart)
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Copy out this tick's input and clear the latched press edges
    pub fn snapshot(&mut self) -> TickInput {
        let mut players = [PlayerInput::default(); 2];
        for (i, player) in players.iter_mut().enumerate() {
            player.held = self.held[i];
            player.pressed = self.pressed[i];
        }
        self.pressed = [ActionFlags::NONE; 2];
        TickInput { players }
    }
}

/// Fixed keyboard bindings. Letters are case-insensitive.
pub fn binding_for_key(key: &str) -> Result<(PlayerSlot, Action), EngineError> {
    use Action::*;
    use PlayerSlot::*;

    let binding = match key {
        "ArrowLeft" => Some((Two, MoveLeft)),
        "ArrowRight" => Some((Two, MoveRight)),
        "ArrowUp" => Some((Two, Jump)),
        _ if key.chars().count() == 1 => match key.to_ascii_lowercase().as_str() {
            "a" => Some((One, MoveLeft)),
            "d" => Some((One, MoveRight)),
            "w" => Some((One, Jump)),
            "g" => Some((One, LightAttack)),
            "h" => Some((One, HeavyAttack)),
            "r" => Some((One, Block)),
            "t" => Some((One, Special)),
            "k" => Some((Two, LightAttack)),
            "l" => Some((Two, HeavyAttack)),
            "o" => Some((Two, Block)),
            "i" => Some((Two, Special)),
            _ => None,
        },
        _ => None,
    };

    binding.ok_or_else(|| EngineError::InvalidInputBinding(key.to_string()))
}

/// A virtual on-screen button (arena coordinates)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchButton {
    pub center: Vec2,
    pub radius: f32,
    pub slot: PlayerSlot,
    pub action: Action,
}

impl TouchButton {
    pub fn contains(&self, point: Vec2) -> bool {
        point.distance_squared(self.center) <= self.radius * self.radius
    }
}

const PAD_RADIUS: f32 = 30.0;
const PAD_SPACING: f32 = 68.0;

/// Fixed touch pad: a movement cluster and an action cluster per player.
/// Player 1 owns the left half of the screen, player 2 the right half.
#[derive(Debug, Clone)]
pub struct TouchLayout {
    pub buttons: Vec<TouchButton>,
}

impl Default for TouchLayout {
    fn default() -> Self {
        let row_low = ARENA_HEIGHT - 50.0;
        let row_high = row_low - PAD_SPACING;
        let mut buttons = Vec::with_capacity(14);

        for slot in PlayerSlot::ALL {
            // Mirror the pad for player 2 so movement sits on the outer edge
            let (edge, dir) = match slot {
                PlayerSlot::One => (50.0, 1.0),
                PlayerSlot::Two => (ARENA_WIDTH - 50.0, -1.0),
            };
            let x = |step: f32| edge + dir * step * PAD_SPACING;
            let (left_x, right_x) = match slot {
                PlayerSlot::One => (x(0.0), x(2.0)),
                PlayerSlot::Two => (x(2.0), x(0.0)),
            };
            let layout = [
                (Vec2::new(left_x, row_low), Action::MoveLeft),
                (Vec2::new(right_x, row_low), Action::MoveRight),
                (Vec2::new(x(1.0), row_high), Action::Jump),
                (Vec2::new(x(3.5), row_low), Action::LightAttack),
                (Vec2::new(x(4.5), row_low), Action::HeavyAttack),
                (Vec2::new(x(3.5), row_high), Action::Block),
                (Vec2::new(x(4.5), row_high), Action::Special),
            ];
            buttons.extend(layout.into_iter().map(|(center, action)| TouchButton {
                center,
                radius: PAD_RADIUS,
                slot,
                action,
            }));
        }

        Self { buttons }
    }
}

impl TouchLayout {
    /// Button under an arena-space point
    pub fn hit(&self, point: Vec2) -> Result<&TouchButton, EngineError> {
        self.buttons
            .iter()
            .find(|b| b.contains(point))
            .ok_or_else(|| {
                EngineError::InvalidInputBinding(format!("touch at ({:.0}, {:.0})", point.x, point.y))
            })
    }
}

/// Tracks which virtual button each active touch identifier is holding
#[derive(Debug, Clone, Default)]
pub struct TouchTracker {
    layout: TouchLayout,
    active: HashMap<i32, (PlayerSlot, Action)>,
}

impl TouchTracker {
    pub fn new(layout: TouchLayout) -> Self {
        Self {
            layout,
            active: HashMap::new(),
        }
    }

    pub fn layout(&self) -> &TouchLayout {
        &self.layout
    }

    /// A finger went down or moved; slides between buttons release the old one
    pub fn touch(&mut self, id: i32, point: Vec2, input: &mut InputState) {
        let target = self.layout.hit(point).map(|b| (b.slot, b.action)).ok();
        let previous = self.active.get(&id).copied();
        if previous == target {
            return;
        }
        if let Some((slot, action)) = previous {
            self.active.remove(&id);
            if !self.is_held_by_other(slot, action) {
                input.release(slot, action);
            }
        }
        if let Some((slot, action)) = target {
            self.active.insert(id, (slot, action));
            input.press(slot, action);
        }
    }

    /// A finger lifted or the touch was cancelled
    pub fn lift(&mut self, id: i32, input: &mut InputState) {
        if let Some((slot, action)) = self.active.remove(&id) {
            if !self.is_held_by_other(slot, action) {
                input.release(slot, action);
            }
        }
    }

    pub fn clear(&mut self) {
        self.active.clear();
    }

    fn is_held_by_other(&self, slot: PlayerSlot, action: Action) -> bool {
        self.active.values().any(|&held| held == (slot, action))
    }
}
