//! Heuristic evaluation, always scored from the controlled rider's side
//!
//! Higher is better for the controlled rider; the adversary searches to push it down.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::WorldState;

/// Same-lane distance under which the riders count as colliding
pub const COLLISION_RANGE: f32 = 3.0;

/// Opponent personality: picks both the weight table and the search depth
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleProfile {
    Aggressive,
    #[default]
    Balanced,
    /// Never searches
    Random,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown style profile `{0}` (expected aggressive, balanced or random)")]
pub struct ParseStyleError(pub String);

impl StyleProfile {
    pub const ALL: [StyleProfile; 3] = [
        StyleProfile::Aggressive,
        StyleProfile::Balanced,
        StyleProfile::Random,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StyleProfile::Aggressive => "aggressive",
            StyleProfile::Balanced => "balanced",
            StyleProfile::Random => "random",
        }
    }

    /// Plies searched per decision, None for the non-searching style
    pub fn search_depth(&self) -> Option<u8> {
        match self {
            StyleProfile::Aggressive => Some(4),
            StyleProfile::Balanced => Some(3),
            StyleProfile::Random => None,
        }
    }

    pub fn weights(&self) -> Weights {
        match self {
            StyleProfile::Aggressive => Weights {
                progress: 55.0,
                speed: 18.0,
                lead: 35.0,
                health: 60.0,
                collision: -50.0,
                attack: 70.0,
            },
            StyleProfile::Balanced | StyleProfile::Random => Weights {
                progress: 60.0,
                speed: 18.0,
                lead: 40.0,
                health: 80.0,
                collision: -65.0,
                attack: 45.0,
            },
        }
    }
}

impl FromStr for StyleProfile {
    type Err = ParseStyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "aggressive" => Ok(StyleProfile::Aggressive),
            "balanced" => Ok(StyleProfile::Balanced),
            "random" => Ok(StyleProfile::Random),
            _ => Err(ParseStyleError(s.to_string())),
        }
    }
}

impl std::fmt::Display for StyleProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Hand-tuned linear weights over [`Features`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weights {
    pub progress: f32,
    pub speed: f32,
    pub lead: f32,
    pub health: f32,
    pub collision: f32,
    pub attack: f32,
}

/// Normalized features of a state, relative to the controlled rider
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Features {
    /// Controlled position / track length
    pub progress: f32,
    /// Controlled speed / boosted ceiling
    pub speed: f32,
    /// Signed gap to the adversary / track length
    pub lead: f32,
    pub health: f32,
    /// 1.0 when the riders are in the same lane and close
    pub collision: f32,
    /// 1.0 when the adversary is just ahead in the same lane, within attack range
    pub attack: f32,
}

impl Features {
    pub fn of(state: &WorldState) -> Self {
        let c = &state.controlled;
        let gap = state.adversary.pos - c.pos;
        let same_lane = state.combatants_share_lane();
        Self {
            progress: c.pos / TRACK_LENGTH,
            speed: c.speed / (MAX_SPEED * BOOST_SPEED_MULT),
            lead: state.lead() / TRACK_LENGTH,
            health: c.health,
            collision: indicator(same_lane && gap.abs() < COLLISION_RANGE),
            attack: indicator(same_lane && gap > 0.0 && gap <= ATTACK_RANGE),
        }
    }

    pub fn score(&self, w: &Weights) -> f32 {
        w.progress * self.progress
            + w.speed * self.speed
            + w.lead * self.lead
            + w.health * self.health
            + w.collision * self.collision
            + w.attack * self.attack
    }
}

fn indicator(cond: bool) -> f32 {
    if cond { 1.0 } else { 0.0 }
}

/// Score a state for the controlled rider under a style's weight table
pub fn evaluate(state: &WorldState, style: StyleProfile) -> f32 {
    Features::of(state).score(&style.weights())
}
