//! Fixed timestep simulation tick
//!
//! Order within a tick: round timers, fighters, projectiles, combat, round
//! resolution. Effects decay every tick, even once the match is over.

use glam::Vec2;

use super::combat::{self, HitSource};
use super::fighter::{FighterEvent, separate};
use super::input::{PlayerSlot, TickInput};
use super::round::{MatchPhase, PhaseChange, RoundOutcome};
use super::state::{GameEvent, GameState, ParticleKind};

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    state.events.clear();
    state.effects.update(dt);

    // Match decided: nothing moves until restart
    if state.round.phase == MatchPhase::MatchEnd {
        return;
    }
    state.time_ticks += 1;

    match state.round.advance(dt, &state.tuning) {
        Some(PhaseChange::FightStarted { round }) => {
            log::info!("Round {round}: fight!");
            state.events.push(GameEvent::FightStarted { round });
        }
        Some(PhaseChange::CountdownStarted { round }) => {
            state.reset_round();
            state.events.push(GameEvent::CountdownStarted { round });
        }
        None => {}
    }

    // Inputs are ignored during the countdown and fighters hold still after a round
    if !state.round.is_fighting() {
        return;
    }

    update_fighters(state, input, dt);
    update_projectiles(state, dt);
    resolve_combat(state);
    resolve_round(state);
}

fn update_fighters(state: &mut GameState, input: &TickInput, dt: f32) {
    let mut casts = Vec::new();
    for slot in PlayerSlot::ALL {
        let opponent_x = state.fighter(slot.opponent()).pos.x;
        let fighter = &mut state.fighters[slot.index()];
        let Some(event) = fighter.update(input.player(slot), opponent_x, &state.tuning, dt) else {
            continue;
        };
        match event {
            FighterEvent::SpecialReleased => casts.push(slot),
            FighterEvent::CastStarted => log::debug!("{slot:?} casting"),
            _ => {}
        }
        state.events.push(GameEvent::Fighter { slot, event });
    }

    let [one, two] = &mut state.fighters;
    separate(one, two);

    for slot in casts {
        let id = state.spawn_projectile(slot);
        let fighter = state.fighter(slot);
        let origin = fighter.pos - Vec2::new(0.0, 70.0);
        let direction = fighter.facing.sign();
        let kind = ParticleKind::from(fighter.element);
        state.burst(origin, direction, kind, 6);
        state.events.push(GameEvent::ProjectileSpawned { id, owner: slot });
    }
}

fn update_projectiles(state: &mut GameState, dt: f32) {
    for projectile in &mut state.projectiles {
        projectile.update(dt);
    }

    let mut expired = Vec::new();
    state.projectiles.retain(|p| {
        if p.is_expired() {
            expired.push((p.id, p.pos, p.direction(), ParticleKind::from(p.element)));
            false
        } else {
            true
        }
    });
    for (id, pos, direction, kind) in expired {
        state.burst(pos, direction, kind, 4);
        state.events.push(GameEvent::ProjectileExpired { id });
    }
}

fn resolve_combat(state: &mut GameState) {
    let outcomes = combat::resolve(&mut state.fighters, &mut state.projectiles, &state.tuning);
    for outcome in outcomes {
        let direction = state.fighter(outcome.attacker).facing.sign();
        let kind = match (outcome.blocked, outcome.source) {
            (true, _) => ParticleKind::Guard,
            (false, HitSource::Projectile { .. }) => state.fighter(outcome.attacker).element.into(),
            (false, HitSource::Melee(_)) => ParticleKind::Spark,
        };
        let magnitude = if outcome.knocked_down {
            18.0
        } else {
            outcome.damage.clamp(2.0, 14.0)
        };
        state.effects.add_shake(magnitude);
        let count = if outcome.knocked_down { 40 } else { 6 + outcome.damage as usize };
        state.burst(outcome.position, direction, kind, count);
        state.events.push(GameEvent::Hit(outcome));
    }
}

fn resolve_round(state: &mut GameState) {
    let Some(result) = state.round.resolve_round(&state.fighters, &state.tuning) else {
        return;
    };

    for fighter in &mut state.fighters {
        let won = result.outcome == RoundOutcome::Winner(fighter.slot);
        fighter.set_round_result(won);
    }
    log::info!(
        "Round {} over: {:?} by {:?} (wins {:?})",
        result.round,
        result.outcome,
        result.reason,
        state.round.wins
    );
    state.events.push(GameEvent::RoundOver(result));

    if let Some(winner) = state.round.match_winner {
        log::info!("Match over: {winner:?} wins");
        state.events.push(GameEvent::MatchOver { winner });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::fighter::ActionState;
    use crate::sim::input::{Action, ActionFlags, PlayerInput};
    use crate::tuning::Tuning;
    use proptest::prelude::*;

    fn fast_tuning() -> Tuning {
        let mut tuning = Tuning::default();
        tuning.round.countdown_seconds = SIM_DT;
        tuning.round.round_end_seconds = SIM_DT * 2.0;
        tuning
    }

    fn idle() -> TickInput {
        TickInput::default()
    }

    fn press(slot: PlayerSlot, action: Action) -> TickInput {
        let mut input = TickInput::default();
        input.players[slot.index()] = PlayerInput {
            held: ActionFlags::from_actions(&[action]),
            pressed: ActionFlags::from_actions(&[action]),
        };
        input
    }

    fn start_fight(state: &mut GameState) {
        while !state.round.is_fighting() {
            tick(state, &idle(), SIM_DT);
        }
    }

    #[test]
    fn test_countdown_ignores_input() {
        let mut state = GameState::new(1, Tuning::default());
        let start = state.fighters[0].pos;
        for _ in 0..60 {
            tick(&mut state, &press(PlayerSlot::One, Action::MoveRight), SIM_DT);
        }
        assert_eq!(state.round.phase, MatchPhase::Countdown);
        assert_eq!(state.fighters[0].pos, start);
    }

    #[test]
    fn test_special_spawns_projectile_that_lands() {
        let mut state = GameState::new(1, fast_tuning());
        start_fight(&mut state);

        tick(&mut state, &press(PlayerSlot::One, Action::Special), SIM_DT);
        let mut spawned = false;
        let mut landed = false;
        for _ in 0..240 {
            tick(&mut state, &idle(), SIM_DT);
            for event in &state.events {
                match event {
                    GameEvent::ProjectileSpawned { owner, .. } => {
                        assert_eq!(*owner, PlayerSlot::One);
                        spawned = true;
                    }
                    GameEvent::Hit(hit) => {
                        assert_eq!(hit.defender, PlayerSlot::Two);
                        landed = true;
                    }
                    _ => {}
                }
            }
        }
        assert!(spawned && landed);
        let p2 = state.fighter(PlayerSlot::Two);
        assert_eq!(p2.health, state.tuning.fighter.max_health - state.tuning.special.projectile_damage);
        assert!(state.projectiles.is_empty());
    }

    #[test]
    fn test_round_end_freezes_fighters() {
        let mut state = GameState::new(1, Tuning::default());
        start_fight(&mut state);
        state.fighters[1].health = 0.0;
        state.fighters[1].state = ActionState::KnockedDown;
        tick(&mut state, &idle(), SIM_DT);

        assert_eq!(state.round.phase, MatchPhase::RoundEnd);
        assert!(state.events.iter().any(|e| matches!(e, GameEvent::RoundOver(_))));
        assert_eq!(state.fighters[0].state, ActionState::RoundWin);
        assert_eq!(state.fighters[1].state, ActionState::KnockedDown);

        let pos = state.fighters[0].pos;
        tick(&mut state, &press(PlayerSlot::One, Action::MoveLeft), SIM_DT);
        assert_eq!(state.fighters[0].pos, pos);
    }

    #[test]
    fn test_next_countdown_resets_fighters() {
        let mut state = GameState::new(1, fast_tuning());
        start_fight(&mut state);
        state.fighters[0].health = 0.0;
        state.fighters[0].state = ActionState::KnockedDown;
        state.spawn_projectile(PlayerSlot::Two);
        tick(&mut state, &idle(), SIM_DT);
        assert_eq!(state.round.phase, MatchPhase::RoundEnd);

        while state.round.phase != MatchPhase::Countdown {
            tick(&mut state, &idle(), SIM_DT);
        }
        assert_eq!(state.round.round_number, 2);
        assert_eq!(state.round.wins, [0, 1]);
        assert!(state.fighters.iter().all(|f| f.health == state.tuning.fighter.max_health));
        assert!(state.fighters.iter().all(|f| f.state == ActionState::Idle));
        assert!(state.projectiles.is_empty());
    }

    #[test]
    fn test_match_end_freezes_state() {
        let mut state = GameState::new(9, fast_tuning());
        start_fight(&mut state);
        state.round.wins = [1, 0];
        state.fighters[1].health = 0.0;
        state.fighters[1].state = ActionState::KnockedDown;
        tick(&mut state, &idle(), SIM_DT);
        assert_eq!(state.round.phase, MatchPhase::MatchEnd);
        assert!(
            state
                .events
                .contains(&GameEvent::MatchOver { winner: PlayerSlot::One })
        );

        let frozen = serde_json::to_string(&state).unwrap();
        for i in 0..300 {
            let action = Action::ALL[i % Action::ALL.len()];
            tick(&mut state, &press(PlayerSlot::Two, action), SIM_DT);
            assert!(state.events.is_empty());
        }
        assert_eq!(serde_json::to_string(&state).unwrap(), frozen);

        state.restart();
        assert_eq!(state.round.phase, MatchPhase::Countdown);
        assert_eq!(state.round.wins, [0, 0]);
    }

    fn arb_player_input() -> impl Strategy<Value = PlayerInput> {
        (any::<u8>(), any::<u8>()).prop_map(|(held, pressed)| {
            let pick = |bits: u8| {
                let actions: Vec<Action> = Action::ALL
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| bits & (1 << i) != 0)
                    .map(|(_, a)| *a)
                    .collect();
                ActionFlags::from_actions(&actions)
            };
            PlayerInput {
                held: pick(held),
                pressed: pick(pressed),
            }
        })
    }

    fn arb_tick_input() -> impl Strategy<Value = TickInput> {
        (arb_player_input(), arb_player_input()).prop_map(|(a, b)| TickInput { players: [a, b] })
    }

    proptest! {
        #[test]
        fn prop_vitals_stay_in_bounds(inputs in prop::collection::vec(arb_tick_input(), 1..600)) {
            let mut state = GameState::new(3, fast_tuning());
            let max_health = state.tuning.fighter.max_health;
            let max_energy = state.tuning.fighter.max_energy;
            for input in &inputs {
                tick(&mut state, input, SIM_DT);
                for f in &state.fighters {
                    prop_assert!(f.health >= 0.0 && f.health <= max_health);
                    prop_assert!(f.energy >= 0.0 && f.energy <= max_energy);
                }
            }
        }

        #[test]
        fn prop_invincible_fighters_never_lose_health(inputs in prop::collection::vec(arb_tick_input(), 1..600)) {
            let mut state = GameState::new(5, fast_tuning());
            let tick_ms = SIM_DT * 1000.0;
            for input in &inputs {
                let before: Vec<(f32, f32)> = state
                    .fighters
                    .iter()
                    .map(|f| (f.invincibility_ms, f.health))
                    .collect();
                tick(&mut state, input, SIM_DT);
                for (f, (invincible_ms, health)) in state.fighters.iter().zip(before) {
                    if invincible_ms > tick_ms + 1e-3 {
                        prop_assert!(f.health >= health);
                    }
                }
            }
        }
    }
}
