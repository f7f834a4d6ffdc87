//! Hit detection and resolution
//!
//! Melee resolves first, from a snapshot of both hitboxes taken before any
//! damage is applied, so simultaneous swings trade. Projectiles resolve
//! afterwards in id order. Hittability is re-checked before every
//! application, so a fighter made invincible (or knocked out) by an earlier
//! hit in the same tick cannot be struck again.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::fighter::{ActionState, AttackKind, Fighter};
use super::input::PlayerSlot;
use super::projectile::Projectile;
use crate::tuning::Tuning;

/// What delivered a hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HitSource {
    Melee(AttackKind),
    Projectile { id: u32 },
}

/// Payload of a single strike before block/combo scaling
#[derive(Debug, Clone, Copy)]
struct Strike {
    damage: f32,
    stun: u32,
    knockback: f32,
    /// Knockback direction sign
    direction: f32,
    /// Where the strike comes from, for the frontal-block test
    origin_x: f32,
}

/// Result of one resolved hit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HitOutcome {
    pub attacker: PlayerSlot,
    pub defender: PlayerSlot,
    pub source: HitSource,
    /// Health actually removed
    pub damage: f32,
    pub blocked: bool,
    pub knocked_down: bool,
    /// Attacker's combo count after this hit (0 for projectiles)
    pub combo_count: u32,
    /// Contact point
    pub position: Vec2,
}

fn pair_mut(fighters: &mut [Fighter; 2], attacker: PlayerSlot) -> (&mut Fighter, &mut Fighter) {
    let [one, two] = fighters;
    match attacker {
        PlayerSlot::One => (one, two),
        PlayerSlot::Two => (two, one),
    }
}

/// Apply damage, knockback and the resulting state change to the defender.
/// Returns (health removed, blocked).
fn apply_strike(defender: &mut Fighter, strike: &Strike, tuning: &Tuning) -> (f32, bool) {
    let blocked = defender.is_blocking() && defender.faces_toward(strike.origin_x);
    let damage = if blocked {
        strike.damage * tuning.combat.block_multiplier
    } else {
        strike.damage
    };
    let dealt = defender.apply_damage(damage);
    defender.vel.x = strike.direction * strike.knockback;

    if defender.health <= 0.0 {
        defender.state = ActionState::KnockedDown;
    } else if !blocked {
        let frames = (strike.stun as f32 * tuning.combat.hitstun_scale).round().max(1.0);
        defender.state = ActionState::Hitstun {
            remaining: frames as u32,
        };
        defender.invincibility_ms = tuning.combat.invincibility_ms;
    }

    (dealt, blocked)
}

/// Resolve every overlap for this tick. Consumed projectiles are removed.
pub fn resolve(
    fighters: &mut [Fighter; 2],
    projectiles: &mut Vec<Projectile>,
    tuning: &Tuning,
) -> Vec<HitOutcome> {
    let mut outcomes = Vec::new();

    let hitboxes = [
        fighters[0].active_hitbox(tuning),
        fighters[1].active_hitbox(tuning),
    ];

    for slot in PlayerSlot::ALL {
        let Some((kind, hitbox)) = hitboxes[slot.index()] else {
            continue;
        };
        let (attacker, defender) = pair_mut(fighters, slot);
        if !defender.can_be_hit() {
            continue;
        }
        let Some(contact) = hitbox.intersection_center(&defender.hurtbox()) else {
            continue;
        };

        attacker.mark_connected();
        let multiplier = attacker.register_hit(tuning);
        let spec = kind.spec(tuning);
        let strike = Strike {
            damage: spec.damage * multiplier,
            stun: spec.stun,
            knockback: spec.knockback,
            direction: attacker.facing.sign(),
            origin_x: attacker.pos.x,
        };
        let (damage, blocked) = apply_strike(defender, &strike, tuning);

        log::debug!(
            "{:?} {:?} hit {:?} for {:.1}{} (combo {})",
            slot,
            kind,
            slot.opponent(),
            damage,
            if blocked { " blocked" } else { "" },
            attacker.combo_count
        );
        outcomes.push(HitOutcome {
            attacker: slot,
            defender: slot.opponent(),
            source: HitSource::Melee(kind),
            damage,
            blocked,
            knocked_down: defender.state == ActionState::KnockedDown,
            combo_count: attacker.combo_count,
            position: contact,
        });
    }

    projectiles.sort_by_key(|p| p.id);
    projectiles.retain(|projectile| {
        let target = projectile.owner.opponent();
        let defender = &mut fighters[target.index()];
        if !defender.can_be_hit() {
            return true;
        }
        let Some(contact) = projectile.bounds().intersection_center(&defender.hurtbox()) else {
            return true;
        };

        let strike = Strike {
            damage: projectile.damage,
            stun: projectile.stun,
            knockback: projectile.knockback,
            direction: projectile.direction(),
            origin_x: projectile.pos.x,
        };
        let (damage, blocked) = apply_strike(defender, &strike, tuning);
        let knocked_down = defender.state == ActionState::KnockedDown;
        fighters[projectile.owner.index()].add_energy(tuning.fighter.energy_on_hit, tuning);

        log::debug!(
            "{:?} projectile {} hit {:?} for {:.1}{}",
            projectile.owner,
            projectile.id,
            target,
            damage,
            if blocked { " blocked" } else { "" }
        );
        outcomes.push(HitOutcome {
            attacker: projectile.owner,
            defender: target,
            source: HitSource::Projectile { id: projectile.id },
            damage,
            blocked,
            knocked_down,
            combo_count: 0,
            position: contact,
        });
        false
    });

    outcomes
}
