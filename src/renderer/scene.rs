//! Frame composition
//!
//! Turns a [`GameState`] into a triangle list in arena coordinates. This is a
//! pure read: nothing here mutates the simulation, and the same state always
//! produces the same frame.

use glam::Vec2;

use super::shapes::{self, push_rect};
use super::vertex::{Vertex, colors};
use crate::consts::*;
use crate::settings::Settings;
use crate::sim::{
    ActionState, Element, Fighter, GameState, MatchPhase, ParticleKind, PlayerSlot, Projectile, Rect,
    RoundOutcome, TickInput, TouchLayout,
};

/// On-screen touch pad plus the input it is currently producing
pub struct TouchOverlay<'a> {
    pub layout: &'a TouchLayout,
    pub input: &'a TickInput,
}

const HUD_MARGIN: f32 = 40.0;
const HEALTH_BAR_WIDTH: f32 = 400.0;
const HEALTH_BAR_HEIGHT: f32 = 22.0;
const ENERGY_BAR_HEIGHT: f32 = 8.0;
const HUD_TOP: f32 = 24.0;

fn element_colors(element: Element) -> ([f32; 4], [f32; 4]) {
    match element {
        Element::Ice => (colors::ICE, colors::ICE_DARK),
        Element::Fire => (colors::FIRE, colors::FIRE_DARK),
    }
}

fn particle_color(kind: ParticleKind) -> [f32; 4] {
    match kind {
        ParticleKind::Spark => colors::SPARK,
        ParticleKind::Guard => colors::GUARD,
        ParticleKind::Ice => colors::ICE,
        ParticleKind::Fire => colors::FIRE,
    }
}

/// Camera offset from the current screen shake
pub fn shake_offset(state: &GameState, settings: &Settings) -> Vec2 {
    let amount = state.effects.screen_shake;
    if amount <= 0.0 || !settings.effective_screen_shake() {
        return Vec2::ZERO;
    }
    let t = state.time_ticks as f32;
    Vec2::new((t * 1.7).sin(), (t * 2.3).cos()) * amount
}

fn translate(vertices: &mut [Vertex], offset: Vec2) {
    if offset == Vec2::ZERO {
        return;
    }
    for v in vertices {
        v.position[0] += offset.x;
        v.position[1] += offset.y;
    }
}

fn draw_stage(out: &mut Vec<Vertex>) {
    push_rect(out, &Rect::new(0.0, 0.0, ARENA_WIDTH, GROUND_Y), colors::SKY_BAND);
    push_rect(
        out,
        &Rect::new(0.0, GROUND_Y, ARENA_WIDTH, ARENA_HEIGHT - GROUND_Y),
        colors::GROUND,
    );
    push_rect(out, &Rect::new(0.0, GROUND_Y, ARENA_WIDTH, 3.0), colors::GROUND_EDGE);
}

fn draw_fighter(out: &mut Vec<Vertex>, fighter: &Fighter, state: &GameState, settings: &Settings) {
    let (main, dark) = element_colors(fighter.element);
    let segments = settings.quality.circle_segments();
    let tick = state.time_ticks;

    if fighter.state == ActionState::KnockedDown {
        // Lying flat on the floor
        let body = Rect::new(
            fighter.pos.x - FIGHTER_HEIGHT / 2.0,
            fighter.pos.y - FIGHTER_WIDTH / 2.0,
            FIGHTER_HEIGHT,
            FIGHTER_WIDTH / 2.0,
        );
        push_rect(out, &body, colors::KNOCKED_DOWN);
        return;
    }

    let mut body_color = match fighter.state {
        ActionState::Hitstun { .. } if settings.effective_flashes() && (tick / 3) % 2 == 0 => {
            colors::HITSTUN_FLASH
        }
        ActionState::Hitstun { .. } | ActionState::RoundLose => dark,
        _ => main,
    };
    // Grace window blinks
    if fighter.is_invincible() && (tick / 4) % 2 == 0 {
        body_color = colors::fade(body_color, 0.45);
    }

    let hurtbox = fighter.hurtbox();
    let torso = Rect::new(
        hurtbox.min.x,
        hurtbox.min.y + FIGHTER_WIDTH * 0.5,
        hurtbox.size.x,
        hurtbox.size.y - FIGHTER_WIDTH * 0.5,
    );
    push_rect(out, &torso, body_color);

    let head_radius = FIGHTER_WIDTH * 0.3;
    let head = Vec2::new(fighter.pos.x, hurtbox.min.y + head_radius);
    out.extend(shapes::circle(head, head_radius, body_color, segments));

    // Eye marks facing
    let eye = head + Vec2::new(fighter.facing.sign() * head_radius * 0.45, -2.0);
    push_rect(out, &Rect::from_center(eye, Vec2::new(5.0, 5.0)), colors::BACKGROUND);

    match fighter.state {
        ActionState::Blocking => {
            let front = fighter.pos.x + fighter.facing.sign() * (FIGHTER_WIDTH / 2.0 + 6.0);
            let shield = Rect::from_center(
                Vec2::new(front, fighter.pos.y - FIGHTER_HEIGHT / 2.0),
                Vec2::new(10.0, FIGHTER_HEIGHT * 0.8),
            );
            push_rect(out, &shield, colors::SHIELD);
        }
        ActionState::Casting { remaining } => {
            let charge = 1.0 - remaining as f32 / state.tuning.special.cast_frames.max(1) as f32;
            let center = fighter.pos - Vec2::new(0.0, FIGHTER_HEIGHT * 0.6);
            let radius = 10.0 + 30.0 * charge;
            out.extend(shapes::ring(center, radius - 4.0, radius, colors::CAST_GLOW, segments));
        }
        ActionState::RoundWin => {
            // Fist raised
            let arm = Rect::from_center(
                Vec2::new(fighter.pos.x + fighter.facing.sign() * 12.0, hurtbox.min.y - 10.0),
                Vec2::new(8.0, 28.0),
            );
            push_rect(out, &arm, body_color);
        }
        _ => {}
    }

    // Arm: extended while the hitbox is live, chambered during startup/recovery
    if let Some((_, rect)) = fighter.active_hitbox(&state.tuning) {
        push_rect(out, &rect, colors::HITBOX);
    } else if let Some((kind, _, _)) = fighter.current_attack(&state.tuning) {
        let reach = kind.spec(&state.tuning).reach * 0.3;
        let front = fighter.pos.x + fighter.facing.sign() * FIGHTER_WIDTH / 2.0;
        let x = if fighter.facing.sign() > 0.0 { front } else { front - reach };
        let arm = Rect::new(x, fighter.pos.y - FIGHTER_HEIGHT * 0.75 - 5.0, reach, 10.0);
        push_rect(out, &arm, dark);
    }
}

fn draw_projectile(out: &mut Vec<Vertex>, projectile: &Projectile, segments: u32) {
    let (main, dark) = element_colors(projectile.element);
    let radius = PROJECTILE_HEIGHT / 2.0;
    let tail = projectile.pos - Vec2::new(projectile.direction() * PROJECTILE_WIDTH * 0.5, 0.0);
    out.extend(shapes::circle(tail, radius * 0.7, colors::fade(dark, 0.7), segments));
    out.extend(shapes::circle(projectile.pos, radius, main, segments));
}

fn draw_particles(out: &mut Vec<Vertex>, state: &GameState, settings: &Settings) {
    for p in state.effects.particles.iter().take(settings.max_particles()) {
        let color = colors::fade(particle_color(p.kind), p.life);
        let size = p.size * (0.5 + 0.5 * p.life);
        push_rect(out, &Rect::from_center(p.pos, Vec2::splat(size)), color);
    }
}

fn draw_player_hud(out: &mut Vec<Vertex>, fighter: &Fighter, state: &GameState) {
    let mirrored = fighter.slot == PlayerSlot::Two;
    let x = if mirrored {
        ARENA_WIDTH - HUD_MARGIN - HEALTH_BAR_WIDTH
    } else {
        HUD_MARGIN
    };
    let tuning = &state.tuning;

    let health = fighter.health / tuning.fighter.max_health;
    let health_color = if health < 0.25 { colors::HEALTH_LOW } else { colors::HEALTH };
    out.extend(shapes::bar(
        &Rect::new(x, HUD_TOP, HEALTH_BAR_WIDTH, HEALTH_BAR_HEIGHT),
        health,
        colors::BAR_BACK,
        health_color,
        mirrored,
    ));

    let energy = fighter.energy / tuning.fighter.max_energy;
    let energy_color = if fighter.energy >= tuning.special.energy_cost && fighter.special_cooldown_ms <= 0.0 {
        colors::ENERGY_READY
    } else {
        colors::ENERGY
    };
    let energy_top = HUD_TOP + HEALTH_BAR_HEIGHT + 4.0;
    let energy_width = HEALTH_BAR_WIDTH * 0.6;
    // Energy bar hugs the outer edge on both sides
    let energy_x = if mirrored {
        ARENA_WIDTH - HUD_MARGIN - energy_width
    } else {
        HUD_MARGIN
    };
    out.extend(shapes::bar(
        &Rect::new(energy_x, energy_top, energy_width, ENERGY_BAR_HEIGHT),
        energy,
        colors::BAR_BACK,
        energy_color,
        mirrored,
    ));

    // Round pips under the bars
    let wins = state.round.wins_for(fighter.slot);
    let pip_y = energy_top + ENERGY_BAR_HEIGHT + 12.0;
    for i in 0..tuning.round.wins_to_match {
        let offset = 10.0 + i as f32 * 22.0;
        let pip_x = if mirrored {
            ARENA_WIDTH - HUD_MARGIN - offset
        } else {
            HUD_MARGIN + offset
        };
        let color = if i < wins { colors::PIP_WON } else { colors::PIP_EMPTY };
        out.extend(shapes::circle(Vec2::new(pip_x, pip_y), 7.0, color, 10));
    }

    if fighter.combo_count >= 2 {
        let combo_x = if mirrored {
            ARENA_WIDTH - HUD_MARGIN - 60.0
        } else {
            HUD_MARGIN + 60.0
        };
        out.extend(shapes::number(combo_x, pip_y + 16.0, 28.0, fighter.combo_count, colors::COMBO));
    }
}

fn draw_hud(out: &mut Vec<Vertex>, state: &GameState) {
    for fighter in &state.fighters {
        draw_player_hud(out, fighter, state);
    }

    let clock = state.round.round_clock.ceil().max(0.0) as u32;
    out.extend(shapes::number(ARENA_WIDTH / 2.0, HUD_TOP - 4.0, 36.0, clock, colors::TEXT));
}

fn winner_color(outcome: Option<RoundOutcome>, state: &GameState) -> [f32; 4] {
    match outcome {
        Some(RoundOutcome::Winner(slot)) => element_colors(state.fighter(slot).element).0,
        _ => colors::TEXT,
    }
}

fn draw_banner(out: &mut Vec<Vertex>, state: &GameState) {
    let round = &state.round;
    let center_y = ARENA_HEIGHT * 0.4;
    match round.phase {
        MatchPhase::Countdown => {
            if let Some(n) = round.countdown_display() {
                out.extend(shapes::number(ARENA_WIDTH / 2.0, center_y - 40.0, 80.0, n, colors::TEXT));
            }
        }
        MatchPhase::Fighting => {
            // Brief flash as the round opens
            let elapsed = state.tuning.round.round_seconds - round.round_clock;
            if elapsed < 0.5 {
                let alpha = 1.0 - elapsed / 0.5;
                push_rect(
                    out,
                    &Rect::new(0.0, center_y - 30.0, ARENA_WIDTH, 60.0),
                    colors::fade(colors::COMBO, alpha * 0.5),
                );
            }
        }
        MatchPhase::RoundEnd => {
            let outcome = round.last_result.map(|r| r.outcome);
            push_rect(out, &Rect::new(0.0, center_y - 40.0, ARENA_WIDTH, 80.0), colors::BANNER);
            push_rect(
                out,
                &Rect::new(ARENA_WIDTH * 0.3, center_y - 4.0, ARENA_WIDTH * 0.4, 8.0),
                winner_color(outcome, state),
            );
        }
        MatchPhase::MatchEnd => {
            push_rect(out, &Rect::new(0.0, center_y - 80.0, ARENA_WIDTH, 160.0), colors::BANNER);
            let outcome = round.match_winner.map(RoundOutcome::Winner);
            let color = winner_color(outcome, state);
            if let Some(winner) = round.match_winner {
                let label = winner.index() as u32 + 1;
                out.extend(shapes::number(ARENA_WIDTH / 2.0, center_y - 50.0, 100.0, label, color));
            }
            push_rect(
                out,
                &Rect::new(ARENA_WIDTH * 0.25, center_y + 60.0, ARENA_WIDTH * 0.5, 6.0),
                color,
            );
        }
    }
}

fn draw_touch(out: &mut Vec<Vertex>, overlay: &TouchOverlay<'_>, segments: u32) {
    for button in &overlay.layout.buttons {
        let held = overlay.input.player(button.slot).held.contains(button.action);
        let color = if held {
            colors::TOUCH_BUTTON_HELD
        } else {
            colors::TOUCH_BUTTON
        };
        out.extend(shapes::circle(button.center, button.radius, color, segments));
    }
}

/// Compose a full frame in arena coordinates
pub fn build_frame(state: &GameState, settings: &Settings, touch: Option<&TouchOverlay<'_>>) -> Vec<Vertex> {
    let segments = settings.quality.circle_segments();
    let mut out = Vec::with_capacity(2048);

    // World layer, shaken as a whole
    draw_stage(&mut out);
    for projectile in &state.projectiles {
        draw_projectile(&mut out, projectile, segments);
    }
    for fighter in &state.fighters {
        draw_fighter(&mut out, fighter, state, settings);
    }
    draw_particles(&mut out, state, settings);
    translate(&mut out, shake_offset(state, settings));

    // Screen layer
    draw_hud(&mut out, state);
    draw_banner(&mut out, state);
    if let Some(overlay) = touch {
        draw_touch(&mut out, overlay, segments);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Action, ActionFlags, PlayerInput, tick};
    use crate::tuning::Tuning;

    fn fighting_state() -> GameState {
        let mut state = GameState::new(11, Tuning::default());
        while !state.round.is_fighting() {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        state
    }

    #[test]
    fn test_build_frame_is_pure() {
        let mut state = fighting_state();
        state.effects.add_shake(8.0);
        state.burst(Vec2::new(500.0, 400.0), 1.0, ParticleKind::Spark, 20);
        let before = serde_json::to_string(&state).unwrap();
        let settings = Settings::default();

        let a = build_frame(&state, &settings, None);
        let b = build_frame(&state, &settings, None);
        assert_eq!(a, b);
        assert!(!a.is_empty());
        assert_eq!(serde_json::to_string(&state).unwrap(), before);
        assert_eq!(state.effects.particles.len(), 20);
    }

    #[test]
    fn test_reduced_motion_disables_shake() {
        let mut state = fighting_state();
        state.effects.add_shake(10.0);
        state.time_ticks = 5;

        let mut settings = Settings::default();
        let shaken = build_frame(&state, &settings, None);
        settings.reduced_motion = true;
        let still = build_frame(&state, &settings, None);

        assert_ne!(shaken[0].position, still[0].position);
        assert_eq!(still[0].position, [0.0, 0.0]);
    }

    #[test]
    fn test_particles_respect_settings() {
        let mut state = fighting_state();
        state.burst(Vec2::new(500.0, 400.0), 1.0, ParticleKind::Fire, 30);
        let mut settings = Settings::default();
        let with = build_frame(&state, &settings, None).len();
        settings.particles = false;
        let without = build_frame(&state, &settings, None).len();
        assert_eq!(with - without, 30 * 6);
    }

    #[test]
    fn test_touch_overlay_highlights_held_buttons() {
        let state = fighting_state();
        let settings = Settings::default();
        let layout = TouchLayout::default();
        let idle = TickInput::default();
        let mut held = TickInput::default();
        held.players[0] = PlayerInput {
            held: ActionFlags::from_actions(&[Action::Block]),
            pressed: ActionFlags::NONE,
        };

        let base = build_frame(&state, &settings, None).len();
        let overlay = TouchOverlay { layout: &layout, input: &idle };
        let plain = build_frame(&state, &settings, Some(&overlay));
        assert_eq!(
            plain.len() - base,
            layout.buttons.len() * settings.quality.circle_segments() as usize * 3
        );

        let overlay = TouchOverlay { layout: &layout, input: &held };
        let lit = build_frame(&state, &settings, Some(&overlay));
        let count = |frame: &[Vertex]| {
            frame
                .iter()
                .filter(|v| v.color == colors::TOUCH_BUTTON_HELD)
                .count()
        };
        assert_eq!(count(&plain), 0);
        assert!(count(&lit) > 0);
    }

    #[test]
    fn test_match_end_banner_drawn() {
        let mut state = fighting_state();
        let settings = Settings::default();
        let fighting = build_frame(&state, &settings, None);
        assert!(!fighting.iter().any(|v| v.color == colors::BANNER));

        state.round.phase = MatchPhase::MatchEnd;
        state.round.match_winner = Some(PlayerSlot::Two);
        let ended = build_frame(&state, &settings, None);
        let fire = |frame: &[Vertex]| frame.iter().filter(|v| v.color == colors::FIRE).count();
        assert!(ended.iter().any(|v| v.color == colors::BANNER));
        // Winner's number and underline in player 2's color
        assert!(fire(&ended) > fire(&fighting));
    }
}
