//! Lane Rash - a lane-based motorbike racing/combat game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (world state, transition, outcome)
//! - `ai`: Opponent evaluation and alpha-beta search
//! - `session`: Headless tick driver tying the two together
//! - `settings`: Session configuration

pub mod ai;
pub mod session;
pub mod settings;
pub mod sim;

pub use ai::{Decision, SearchStats, StyleProfile, choose_adversary_action, evaluate};
pub use session::{Session, TickInput, TickReport, autopilot};
pub use settings::{Settings, SettingsError};
pub use sim::{Action, WorldState, is_terminal, step};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (seconds per tick)
    pub const TICK_DT: f32 = 0.14;

    /// Track dimensions
    pub const LANES: u8 = 3;
    pub const TRACK_LENGTH: f32 = 220.0;

    /// Combatant motion
    pub const MAX_SPEED: f32 = 14.0;
    pub const ACCEL: f32 = 3.0;
    pub const BRAKE: f32 = -5.0;
    pub const MAX_HEALTH: f32 = 1.0;

    /// Combat
    pub const ATTACK_RANGE: f32 = 3.5;
    pub const ATTACK_DAMAGE: f32 = 0.28;
    /// floor(1.8s / TICK_DT)
    pub const ATTACK_COOLDOWN_TICKS: u64 = 12;

    /// Boost: floor(2.0s / TICK_DT)
    pub const BOOST_DURATION_TICKS: u32 = 14;
    pub const BOOST_SPEED_MULT: f32 = 1.5;

    /// Hazards
    pub const HAZARD_COUNT: usize = 8;
    pub const HAZARD_SLIP_FACTOR: f32 = 0.55;
    pub const HAZARD_DAMAGE: f32 = 0.05;
    /// Added to speed * dt when testing hazard proximity
    pub const HAZARD_MARGIN: f32 = 0.6;
    pub const ADVERSARY_SLIP_CHANCE: f64 = 0.7;
    pub const NEUTRAL_SLIP_CHANCE: f64 = 0.6;

    /// Neutral bikers
    pub const NEUTRAL_COUNT: usize = 5;
    pub const NEUTRAL_MIN_SPEED: f32 = 0.5;
    pub const NEUTRAL_MAX_SPEED: f32 = 8.0;
    /// floor(0.6s / TICK_DT)
    pub const NEUTRAL_DRIFT_INTERVAL_TICKS: u64 = 4;
    pub const NEUTRAL_DRIFT_CHANCE: f64 = 0.25;
    pub const NEUTRAL_JITTER: f32 = 0.6;

    /// Passive bumps between a live neutral and a combatant
    pub const BUMP_DISTANCE: f32 = 0.8;
    pub const BUMP_DAMAGE: f32 = 0.02;
    pub const BUMP_SPEED_FACTOR: f32 = 0.9;

    /// Session safety bound; the match ends once the tick counter exceeds it
    pub const MAX_TICKS: u64 = 7000;
}

/// Clamp a lane index moved by `delta` into the valid lane range
#[inline]
pub fn shift_lane(lane: u8, delta: i8) -> u8 {
    (lane as i16 + delta as i16).clamp(0, consts::LANES as i16 - 1) as u8
}
