//! Match end: terminal predicate, winner resolution and final summary

use serde::{Deserialize, Serialize};

use super::state::{Boost, WorldState};
use crate::consts::{MAX_TICKS, TRACK_LENGTH};

/// True once either combatant is knocked out or past the finish, or the tick cap is exceeded
pub fn is_terminal(state: &WorldState) -> bool {
    !state.controlled.is_alive()
        || !state.adversary.is_alive()
        || state.controlled.pos >= TRACK_LENGTH
        || state.adversary.pos >= TRACK_LENGTH
        || state.tick > MAX_TICKS
}

/// Who won a finished match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Winner {
    Controlled,
    Adversary,
    Draw,
}

/// Decide the winner of a terminal state.
///
/// A knockout beats everything, then a sole finisher, then track position.
pub fn resolve_winner(state: &WorldState) -> Winner {
    let c = &state.controlled;
    let a = &state.adversary;

    match (c.is_alive(), a.is_alive()) {
        (true, false) => return Winner::Controlled,
        (false, true) => return Winner::Adversary,
        _ => {}
    }

    let c_finished = c.pos >= TRACK_LENGTH;
    let a_finished = a.pos >= TRACK_LENGTH;
    match (c_finished, a_finished) {
        (true, false) => return Winner::Controlled,
        (false, true) => return Winner::Adversary,
        _ => {}
    }

    if c.pos > a.pos {
        Winner::Controlled
    } else if a.pos > c.pos {
        Winner::Adversary
    } else {
        Winner::Draw
    }
}

/// Controlled rider's boost, as shown on a status line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoostStatus {
    Ready,
    Active(u32),
    Used,
}

impl From<&Boost> for BoostStatus {
    fn from(boost: &Boost) -> Self {
        if boost.is_active() {
            BoostStatus::Active(boost.ticks_left)
        } else if boost.available {
            BoostStatus::Ready
        } else {
            BoostStatus::Used
        }
    }
}

/// Final stats for a summary display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSummary {
    pub winner: Winner,
    pub ticks: u64,
    pub controlled_health: f32,
    pub adversary_health: f32,
    pub controlled_pos: f32,
    pub adversary_pos: f32,
    pub neutrals_remaining: usize,
    pub neutrals_total: usize,
}

impl MatchSummary {
    pub fn from_state(state: &WorldState) -> Self {
        Self {
            winner: resolve_winner(state),
            ticks: state.tick,
            controlled_health: state.controlled.health,
            adversary_health: state.adversary.health,
            controlled_pos: state.controlled.pos,
            adversary_pos: state.adversary.pos,
            neutrals_remaining: state.neutrals_remaining(),
            neutrals_total: state.neutrals.len(),
        }
    }
}

impl std::fmt::Display for MatchSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let winner = match self.winner {
            Winner::Controlled => "PLAYER",
            Winner::Adversary => "OPPONENT",
            Winner::Draw => "DRAW",
        };
        write!(
            f,
            "winner={} ticks={} you: pos={:.1} hp={:.2} | opp: pos={:.1} hp={:.2} | neutrals {}/{}",
            winner,
            self.ticks,
            self.controlled_pos,
            self.controlled_health,
            self.adversary_pos,
            self.adversary_health,
            self.neutrals_remaining,
            self.neutrals_total
        )
    }
}
