//! Round and match flow
//!
//! Countdown → Fighting → RoundEnd → Countdown … until a player collects
//! enough round wins, at which point the match ends immediately and stays
//! frozen until [`RoundMatchController::restart`].

use serde::{Deserialize, Serialize};

use super::fighter::Fighter;
use super::input::PlayerSlot;
use crate::tuning::Tuning;

/// Match phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchPhase {
    /// Pre-round pause; inputs ignored
    Countdown,
    /// Round in progress
    Fighting,
    /// Post-round pause; fighters frozen
    RoundEnd,
    /// Match decided; everything frozen until restart
    MatchEnd,
}

/// How a round ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundOutcome {
    Winner(PlayerSlot),
    Draw,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundEndReason {
    KnockOut,
    TimeUp,
}

/// A finished round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundResult {
    pub round: u32,
    pub outcome: RoundOutcome,
    pub reason: RoundEndReason,
}

/// Phase change produced by the controller's own timers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseChange {
    FightStarted { round: u32 },
    /// Fighters must be reset and projectiles cleared
    CountdownStarted { round: u32 },
}

/// Round/match state machine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundMatchController {
    pub phase: MatchPhase,
    /// Seconds left in Countdown or RoundEnd
    pub phase_timer: f32,
    /// Seconds left in the current round
    pub round_clock: f32,
    /// 1-based; draws replay the same number
    pub round_number: u32,
    pub wins: [u8; 2],
    pub last_result: Option<RoundResult>,
    pub match_winner: Option<PlayerSlot>,
}

impl RoundMatchController {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            phase: MatchPhase::Countdown,
            phase_timer: tuning.round.countdown_seconds,
            round_clock: tuning.round.round_seconds,
            round_number: 1,
            wins: [0; 2],
            last_result: None,
            match_winner: None,
        }
    }

    /// Back to round 1 with no wins, from any phase
    pub fn restart(&mut self, tuning: &Tuning) {
        *self = Self::new(tuning);
    }

    #[inline]
    pub fn is_fighting(&self) -> bool {
        self.phase == MatchPhase::Fighting
    }

    /// Fighters hold still outside Countdown/Fighting
    #[inline]
    pub fn freezes_fighters(&self) -> bool {
        matches!(self.phase, MatchPhase::RoundEnd | MatchPhase::MatchEnd)
    }

    pub fn wins_for(&self, slot: PlayerSlot) -> u8 {
        self.wins[slot.index()]
    }

    /// Whole seconds left on the countdown, for display
    pub fn countdown_display(&self) -> Option<u32> {
        match self.phase {
            MatchPhase::Countdown => Some(self.phase_timer.ceil().max(1.0) as u32),
            _ => None,
        }
    }

    /// Run phase timers
    pub fn advance(&mut self, dt: f32, tuning: &Tuning) -> Option<PhaseChange> {
        match self.phase {
            MatchPhase::Countdown => {
                self.phase_timer -= dt;
                if self.phase_timer <= 0.0 {
                    self.phase = MatchPhase::Fighting;
                    self.phase_timer = 0.0;
                    self.round_clock = tuning.round.round_seconds;
                    return Some(PhaseChange::FightStarted {
                        round: self.round_number,
                    });
                }
            }
            MatchPhase::Fighting => {
                self.round_clock = (self.round_clock - dt).max(0.0);
            }
            MatchPhase::RoundEnd => {
                self.phase_timer -= dt;
                if self.phase_timer <= 0.0 {
                    if !matches!(
                        self.last_result,
                        Some(RoundResult {
                            outcome: RoundOutcome::Draw,
                            ..
                        })
                    ) {
                        self.round_number += 1;
                    }
                    self.phase = MatchPhase::Countdown;
                    self.phase_timer = tuning.round.countdown_seconds;
                    self.round_clock = tuning.round.round_seconds;
                    return Some(PhaseChange::CountdownStarted {
                        round: self.round_number,
                    });
                }
            }
            MatchPhase::MatchEnd => {}
        }
        None
    }

    /// Decide the round if a fighter is down or the clock ran out
    pub fn resolve_round(&mut self, fighters: &[Fighter; 2], tuning: &Tuning) -> Option<RoundResult> {
        if self.phase != MatchPhase::Fighting {
            return None;
        }

        let [one, two] = fighters;
        let (outcome, reason) = match (one.health <= 0.0, two.health <= 0.0) {
            (true, true) => (RoundOutcome::Draw, RoundEndReason::KnockOut),
            (true, false) => (RoundOutcome::Winner(PlayerSlot::Two), RoundEndReason::KnockOut),
            (false, true) => (RoundOutcome::Winner(PlayerSlot::One), RoundEndReason::KnockOut),
            (false, false) if self.round_clock <= 0.0 => {
                let outcome = if one.health > two.health {
                    RoundOutcome::Winner(PlayerSlot::One)
                } else if two.health > one.health {
                    RoundOutcome::Winner(PlayerSlot::Two)
                } else {
                    RoundOutcome::Draw
                };
                (outcome, RoundEndReason::TimeUp)
            }
            (false, false) => return None,
        };

        let result = RoundResult {
            round: self.round_number,
            outcome,
            reason,
        };
        self.last_result = Some(result);

        if let RoundOutcome::Winner(slot) = outcome {
            self.wins[slot.index()] += 1;
            if self.wins[slot.index()] >= tuning.round.wins_to_match {
                self.phase = MatchPhase::MatchEnd;
                self.match_winner = Some(slot);
                return Some(result);
            }
        }

        self.phase = MatchPhase::RoundEnd;
        self.phase_timer = tuning.round.round_end_seconds;
        Some(result)
    }
}
