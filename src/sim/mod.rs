//! Deterministic simulation module
//!
//! All race logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only, carried inside the world state
//! - Stable iteration order (neutrals keep their spawn order)
//! - No rendering or platform dependencies

pub mod outcome;
pub mod spawn;
pub mod state;
pub mod tick;

pub use outcome::{BoostStatus, MatchSummary, Winner, is_terminal, resolve_winner};
pub use spawn::{spawn_hazards, spawn_neutrals};
pub use state::{Action, Boost, EventFlags, Hazard, HazardKind, Neutral, Racer, WorldState};
pub use tick::step;
