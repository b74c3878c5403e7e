//! Session world generation
//!
//! Hazards and neutrals are placed once, at session start, from a seeded RNG.

use rand::Rng;

use super::state::{Hazard, HazardKind, Neutral};
use crate::consts::*;

/// Scatter hazards along the track, keeping clear of the start and finish
pub fn spawn_hazards<R: Rng + ?Sized>(rng: &mut R) -> Vec<Hazard> {
    (0..HAZARD_COUNT)
        .map(|_| {
            let pos = rng.random_range(20.0..=TRACK_LENGTH - 20.0);
            let lane = rng.random_range(0..LANES);
            let kind = if rng.random_bool(0.5) {
                HazardKind::Pothole
            } else {
                HazardKind::Oil
            };
            Hazard { pos, lane, kind }
        })
        .collect()
}

/// Place neutral bikers ahead of the start line. Ids start at 1.
pub fn spawn_neutrals<R: Rng + ?Sized>(rng: &mut R) -> Vec<Neutral> {
    (0..NEUTRAL_COUNT)
        .map(|i| {
            let pos = rng.random_range(10.0..=TRACK_LENGTH - 30.0);
            let lane = rng.random_range(0..LANES);
            let speed = rng.random_range(2.0..=NEUTRAL_MAX_SPEED);
            let health = 0.6 + rng.random::<f32>() * 0.4;
            Neutral::new(i as u32 + 1, pos, lane, speed, health)
        })
        .collect()
}
