//! Data-driven game balance
//!
//! All gameplay numbers live here so a match can be rebalanced from JSON
//! without touching simulation code. Frame counts are simulation ticks
//! (60 per second); timers that the rules express in milliseconds stay in
//! milliseconds.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Frame data and payload of a melee attack
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttackSpec {
    pub damage: f32,
    /// Frames before the hitbox appears
    pub startup: u32,
    /// Frames the hitbox is live
    pub active: u32,
    /// Frames after the hitbox closes before the fighter can act
    pub recovery: u32,
    /// Hitbox reach beyond the front edge of the body
    pub reach: f32,
    /// Hitbox height, centred on the upper body
    pub height: f32,
    /// Base hitstun inflicted on an unblocked hit (frames)
    pub stun: u32,
    /// Knockback speed applied to the defender (units/s)
    pub knockback: f32,
}

impl AttackSpec {
    /// Total committed duration in frames
    pub fn total_frames(&self) -> u32 {
        self.startup + self.active + self.recovery
    }

    /// Whether the hitbox is live `elapsed` frames after the attack began
    pub fn is_active_at(&self, elapsed: u32) -> bool {
        elapsed >= self.startup && elapsed < self.startup + self.active
    }
}

/// Movement and vitals
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FighterTuning {
    pub max_health: f32,
    pub max_energy: f32,
    /// Passive regeneration (energy/s)
    pub energy_regen: f32,
    /// Energy granted to the attacker on a landed hit
    pub energy_on_hit: f32,
    pub walk_speed: f32,
    pub jump_velocity: f32,
    pub gravity: f32,
    /// Per-tick multiplier applied to horizontal knockback velocity
    pub friction: f32,
}

impl Default for FighterTuning {
    fn default() -> Self {
        Self {
            max_health: 100.0,
            max_energy: 100.0,
            energy_regen: 10.0,
            energy_on_hit: 4.0,
            walk_speed: 240.0,
            jump_velocity: 620.0,
            gravity: 1800.0,
            friction: 0.85,
        }
    }
}

/// Energy-gated projectile special
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpecialTuning {
    pub energy_cost: f32,
    pub cooldown_ms: f32,
    /// Frames spent casting before the projectile appears
    pub cast_frames: u32,
    pub projectile_speed: f32,
    pub projectile_damage: f32,
    pub projectile_lifetime: f32,
    pub projectile_stun: u32,
    pub projectile_knockback: f32,
}

impl Default for SpecialTuning {
    fn default() -> Self {
        Self {
            energy_cost: 30.0,
            cooldown_ms: 2000.0,
            cast_frames: 18,
            projectile_speed: 480.0,
            projectile_damage: 14.0,
            projectile_lifetime: 2.5,
            projectile_stun: 18,
            projectile_knockback: 240.0,
        }
    }
}

/// Hit resolution rules
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatTuning {
    /// Damage fraction taken when blocking a frontal hit
    pub block_multiplier: f32,
    /// Post-hit grace window (ms)
    pub invincibility_ms: f32,
    /// Time allowed between landed hits for them to chain (ms)
    pub combo_window_ms: f32,
    /// Damage bonus per chained hit
    pub combo_step: f32,
    pub combo_max_multiplier: f32,
    /// Hitstun frames per frame of base stun
    pub hitstun_scale: f32,
}

impl Default for CombatTuning {
    fn default() -> Self {
        Self {
            block_multiplier: 0.3,
            invincibility_ms: 500.0,
            combo_window_ms: 1000.0,
            combo_step: 0.25,
            combo_max_multiplier: 2.0,
            hitstun_scale: 1.0,
        }
    }
}

/// Round and match structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RoundTuning {
    pub round_seconds: f32,
    pub countdown_seconds: f32,
    pub round_end_seconds: f32,
    pub wins_to_match: u8,
}

impl Default for RoundTuning {
    fn default() -> Self {
        Self {
            round_seconds: 99.0,
            countdown_seconds: 3.0,
            round_end_seconds: 3.0,
            wins_to_match: 2,
        }
    }
}

/// Complete balance sheet
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub fighter: FighterTuning,
    pub light: AttackSpec,
    pub heavy: AttackSpec,
    pub special: SpecialTuning,
    pub combat: CombatTuning,
    pub round: RoundTuning,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            fighter: FighterTuning::default(),
            light: AttackSpec {
                damage: 8.0,
                startup: 4,
                active: 4,
                recovery: 8,
                reach: 55.0,
                height: 30.0,
                stun: 14,
                knockback: 180.0,
            },
            heavy: AttackSpec {
                damage: 16.0,
                startup: 9,
                active: 5,
                recovery: 16,
                reach: 70.0,
                height: 40.0,
                stun: 24,
                knockback: 360.0,
            },
            special: SpecialTuning::default(),
            combat: CombatTuning::default(),
            round: RoundTuning::default(),
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) tuning sheet; missing fields keep defaults
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values the simulation cannot honour
    pub fn validate(&self) -> Result<(), EngineError> {
        let f = &self.fighter;
        if f.max_health <= 0.0 || f.max_energy <= 0.0 {
            return Err(EngineError::InvalidTuning(
                "max_health and max_energy must be positive".into(),
            ));
        }
        if !(0.0..=1.0).contains(&f.friction) {
            return Err(EngineError::InvalidTuning("friction must be in [0, 1]".into()));
        }
        for (name, attack) in [("light", &self.light), ("heavy", &self.heavy)] {
            if attack.active == 0 || attack.damage < 0.0 {
                return Err(EngineError::InvalidTuning(format!(
                    "{name} attack needs active frames and non-negative damage"
                )));
            }
        }
        if self.special.energy_cost > f.max_energy {
            return Err(EngineError::InvalidTuning(
                "special costs more energy than a fighter can hold".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.combat.block_multiplier) {
            return Err(EngineError::InvalidTuning(
                "block_multiplier must be in [0, 1]".into(),
            ));
        }
        if self.round.wins_to_match == 0 || self.round.round_seconds <= 0.0 {
            return Err(EngineError::InvalidTuning(
                "a match needs a positive round length and at least one win".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let tuning = Tuning::default();
        assert!(tuning.validate().is_ok());
        assert_eq!(tuning.light.total_frames(), 16);
        assert_eq!(tuning.combat.combo_window_ms, 1000.0);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "round": { "round_seconds": 60.0 } }"#).unwrap();
        assert_eq!(tuning.round.round_seconds, 60.0);
        assert_eq!(tuning.round.wins_to_match, 2);
        assert_eq!(tuning.fighter.max_health, 100.0);
    }

    #[test]
    fn test_rejects_bad_values() {
        let err = Tuning::from_json(r#"{ "combat": { "block_multiplier": 1.5 } }"#);
        assert!(matches!(err, Err(EngineError::InvalidTuning(_))));

        let err = Tuning::from_json("not json");
        assert!(matches!(err, Err(EngineError::TuningParse(_))));
    }

    #[test]
    fn test_active_window() {
        let light = Tuning::default().light;
        assert!(!light.is_active_at(3));
        assert!(light.is_active_at(4));
        assert!(light.is_active_at(7));
        assert!(!light.is_active_at(8));
    }
}
