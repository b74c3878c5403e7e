//! World state and core simulation types
//!
//! Everything a tick reads or writes lives here, including the seeded random
//! stream, so a snapshot fully determines its future given the actions.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::spawn::{spawn_hazards, spawn_neutrals};
use crate::consts::*;

/// Per-tick action for a combatant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Action {
    Accelerate,
    Brake,
    SteerLeft,
    SteerRight,
    Attack,
    #[default]
    Maintain,
}

impl Action {
    /// Every tick action, in canonical search order
    pub const ALL: [Action; 6] = [
        Action::Accelerate,
        Action::Brake,
        Action::SteerLeft,
        Action::SteerRight,
        Action::Attack,
        Action::Maintain,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Accelerate => "ACCEL",
            Action::Brake => "BRAKE",
            Action::SteerLeft => "LEFT",
            Action::SteerRight => "RIGHT",
            Action::Attack => "ATTACK",
            Action::Maintain => "MAINTAIN",
        }
    }

    /// Speed change per second requested by this action
    pub fn speed_delta(&self) -> f32 {
        match self {
            Action::Accelerate => ACCEL,
            Action::Brake => BRAKE,
            _ => 0.0,
        }
    }

    /// Lane change requested by this action
    pub fn lane_delta(&self) -> i8 {
        match self {
            Action::SteerLeft => -1,
            Action::SteerRight => 1,
            _ => 0,
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A combatant: the controlled rider or the adversary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Racer {
    /// Distance along the track
    pub pos: f32,
    pub speed: f32,
    pub lane: u8,
    /// 0.0 = knocked out
    pub health: f32,
    /// Tick of the last attack attempt (None = never attacked)
    pub last_attack_tick: Option<u64>,
}

impl Racer {
    pub fn new(pos: f32, speed: f32, lane: u8, health: f32) -> Self {
        Self {
            pos,
            speed,
            lane,
            health,
            last_attack_tick: None,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    /// Whether an attack issued at `tick` is off cooldown
    pub fn can_attack(&self, tick: u64) -> bool {
        self.last_attack_tick
            .is_none_or(|last| tick.saturating_sub(last) >= ATTACK_COOLDOWN_TICKS)
    }

    /// Subtract health, clamped to [0, MAX_HEALTH]
    pub fn take_damage(&mut self, amount: f32) {
        self.health = (self.health - amount).clamp(0.0, MAX_HEALTH);
    }

    /// Same lane and within `range` longitudinally (either direction)
    pub fn within_reach(&self, pos: f32, lane: u8, range: f32) -> bool {
        self.lane == lane && (self.pos - pos).abs() <= range
    }
}

/// One-shot speed boost carried by the controlled rider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Boost {
    pub available: bool,
    pub ticks_left: u32,
}

impl Default for Boost {
    fn default() -> Self {
        Self {
            available: true,
            ticks_left: 0,
        }
    }
}

impl Boost {
    pub fn is_active(&self) -> bool {
        self.ticks_left > 0
    }

    /// Current speed ceiling for the rider holding this boost
    pub fn speed_ceiling(&self) -> f32 {
        if self.is_active() {
            MAX_SPEED * BOOST_SPEED_MULT
        } else {
            MAX_SPEED
        }
    }
}

/// A non-adversarial biker drifting along the track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Neutral {
    pub id: u32,
    pub pos: f32,
    pub lane: u8,
    pub speed: f32,
    pub health: f32,
    /// Tick of the last lane drift (rate-limits drifting)
    pub last_drift_tick: u64,
}

impl Neutral {
    pub fn new(id: u32, pos: f32, lane: u8, speed: f32, health: f32) -> Self {
        Self {
            id,
            pos,
            lane,
            speed,
            health,
            last_drift_tick: 0,
        }
    }

    /// Knocked-out neutrals stay in the list but take no further part
    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }
}

/// Hazard types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HazardKind {
    Pothole,
    /// Slicker than a pothole, but softer
    Oil,
}

impl HazardKind {
    /// Multiplicative speed factor applied to whoever crosses it
    pub fn slip_factor(&self) -> f32 {
        match self {
            HazardKind::Pothole => HAZARD_SLIP_FACTOR,
            HazardKind::Oil => 0.45,
        }
    }

    /// Health lost by whoever crosses it
    pub fn damage(&self) -> f32 {
        match self {
            HazardKind::Pothole => HAZARD_DAMAGE,
            HazardKind::Oil => 0.03,
        }
    }
}

/// A fixed track hazard, placed once per session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hazard {
    pub pos: f32,
    pub lane: u8,
    pub kind: HazardKind,
}

impl Hazard {
    /// Whether something at `pos`/`lane` moving at `speed` crosses this hazard this tick
    pub fn touches(&self, pos: f32, lane: u8, speed: f32, dt: f32) -> bool {
        self.lane == lane && (pos - self.pos).abs() < speed * dt + HAZARD_MARGIN
    }
}

/// Transient per-tick events, recomputed every tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EventFlags {
    /// Controlled rider's attack connected (adversary or neutral)
    pub controlled_landed_hit: bool,
    /// Adversary's attack connected (controlled rider or neutral)
    pub adversary_landed_hit: bool,
    /// The controlled rider specifically took an attack
    pub controlled_was_hit: bool,
    pub controlled_hit_hazard: bool,
    pub adversary_hit_hazard: bool,
}

impl EventFlags {
    pub fn any(&self) -> bool {
        self.controlled_landed_hit
            || self.adversary_landed_hit
            || self.controlled_was_hit
            || self.controlled_hit_hazard
            || self.adversary_hit_hazard
    }
}

/// Complete world state (deterministic, serializable)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldState {
    /// Session seed for reproducibility
    pub seed: u64,
    /// Random stream consumed by neutral drift and hazard rolls
    pub rng: Pcg32,
    /// Simulation tick counter
    pub tick: u64,
    /// The rider driven by input
    pub controlled: Racer,
    pub boost: Boost,
    /// The searching opponent
    pub adversary: Racer,
    /// Neutral bikers, in spawn order
    pub neutrals: Vec<Neutral>,
    /// Track hazards (never removed)
    pub hazards: Vec<Hazard>,
    /// Events raised by the most recent tick
    pub events: EventFlags,
}

impl WorldState {
    /// Create a fresh session world: hazards and neutrals are generated from `seed`
    pub fn new(seed: u64) -> Self {
        let mut spawn_rng = Pcg32::seed_from_u64(seed);
        let hazards = spawn_hazards(&mut spawn_rng);
        let neutrals = spawn_neutrals(&mut spawn_rng);
        log::info!(
            "World generated (seed {}): {} hazards, {} neutrals",
            seed,
            hazards.len(),
            neutrals.len()
        );
        Self::with_entities(hazards, neutrals, seed)
    }

    /// Initial pose around caller-supplied hazards and neutrals
    pub fn with_entities(hazards: Vec<Hazard>, neutrals: Vec<Neutral>, seed: u64) -> Self {
        Self {
            seed,
            // Separate stream from world generation
            rng: Pcg32::seed_from_u64(seed ^ 0x9e37_79b9_7f4a_7c15),
            tick: 0,
            controlled: Racer::new(0.0, 3.0, 1, MAX_HEALTH),
            boost: Boost::default(),
            adversary: Racer::new(6.0, 3.5, 1, 0.8),
            neutrals,
            hazards,
            events: EventFlags::default(),
        }
    }

    /// Start the controlled rider's boost. Returns false if it was used or is running.
    pub fn activate_boost(&mut self) -> bool {
        if !self.boost.available || self.boost.is_active() {
            return false;
        }
        self.boost.available = false;
        self.boost.ticks_left = BOOST_DURATION_TICKS;
        true
    }

    /// Signed longitudinal gap, positive when the controlled rider is ahead
    pub fn lead(&self) -> f32 {
        self.controlled.pos - self.adversary.pos
    }

    pub fn combatants_share_lane(&self) -> bool {
        self.controlled.lane == self.adversary.lane
    }

    pub fn neutrals_remaining(&self) -> usize {
        self.neutrals.iter().filter(|n| n.is_alive()).count()
    }
}
