//! Fixed timestep simulation tick
//!
//! `step` advances a world by one tick. It never touches its input: the search
//! calls it thousands of times per decision on speculative branches.

use rand::Rng;
use rand::seq::IndexedRandom;

use super::state::{Action, Neutral, Racer, WorldState};
use crate::consts::*;
use crate::shift_lane;

/// What an attack connected with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AttackHit {
    Racer,
    Neutral,
}

/// Advance the world by one fixed timestep and return the new state.
///
/// Step order matters: attacks, hazards and bumps read the lanes and
/// positions written earlier in the same tick.
pub fn step(state: &WorldState, controlled: Action, adversary: Action, dt: f32) -> WorldState {
    assert!(
        dt.is_finite() && dt > 0.0,
        "tick dt must be positive and finite, got {dt}"
    );
    let mut s = state.clone();

    // Throttle
    s.controlled.speed = (s.controlled.speed + controlled.speed_delta() * dt)
        .clamp(0.0, s.boost.speed_ceiling());
    s.adversary.speed = (s.adversary.speed + adversary.speed_delta() * dt).clamp(0.0, MAX_SPEED);

    for n in s.neutrals.iter_mut() {
        drift_neutral(n, s.tick, dt, &mut s.rng);
    }

    // Steering
    s.controlled.lane = shift_lane(s.controlled.lane, controlled.lane_delta());
    s.adversary.lane = shift_lane(s.adversary.lane, adversary.lane_delta());

    s.controlled.pos += s.controlled.speed * dt;
    s.adversary.pos += s.adversary.speed * dt;

    if s.boost.is_active() {
        s.boost.ticks_left -= 1;
        if s.boost.ticks_left == 0 {
            s.controlled.speed = s.controlled.speed.min(MAX_SPEED);
        }
    }

    s.events = Default::default();

    // Controlled rider resolves first
    if controlled == Action::Attack
        && resolve_attack(&mut s.controlled, &mut s.adversary, &mut s.neutrals, s.tick).is_some()
    {
        s.events.controlled_landed_hit = true;
    }
    if adversary == Action::Attack {
        if let Some(hit) = resolve_attack(&mut s.adversary, &mut s.controlled, &mut s.neutrals, s.tick)
        {
            s.events.adversary_landed_hit = true;
            if hit == AttackHit::Racer {
                s.events.controlled_was_hit = true;
            }
        }
    }

    // Hazards: the controlled rider always slips; everyone else rolls for it
    for hz in &s.hazards {
        if hz.touches(s.controlled.pos, s.controlled.lane, s.controlled.speed, dt) {
            s.controlled.speed *= hz.kind.slip_factor();
            s.controlled.take_damage(hz.kind.damage());
            s.events.controlled_hit_hazard = true;
        }

        if hz.touches(s.adversary.pos, s.adversary.lane, s.adversary.speed, dt)
            && s.rng.random_bool(ADVERSARY_SLIP_CHANCE)
        {
            s.adversary.speed *= hz.kind.slip_factor() + 0.08 * s.rng.random::<f32>();
            s.adversary
                .take_damage(hz.kind.damage() * (0.5 + s.rng.random::<f32>()));
            s.events.adversary_hit_hazard = true;
        }

        for n in s.neutrals.iter_mut() {
            if hz.touches(n.pos, n.lane, n.speed, dt) && s.rng.random_bool(NEUTRAL_SLIP_CHANCE) {
                n.speed *= hz.kind.slip_factor() + 0.1 * s.rng.random::<f32>();
                let damage = hz.kind.damage() * (0.5 + s.rng.random::<f32>());
                n.health = (n.health - damage).clamp(0.0, MAX_HEALTH);
            }
        }
    }

    // Bumps: the neutral shrugs it off, the combatant pays
    for n in s.neutrals.iter().filter(|n| n.is_alive()) {
        for racer in [&mut s.controlled, &mut s.adversary] {
            if n.lane == racer.lane && (n.pos - racer.pos).abs() < BUMP_DISTANCE {
                racer.take_damage(BUMP_DAMAGE);
                racer.speed *= BUMP_SPEED_FACTOR;
            }
        }
    }

    s.tick += 1;
    s
}

/// Random lane drift (rate limited), speed jitter, and forward motion
fn drift_neutral<R: Rng + ?Sized>(n: &mut Neutral, tick: u64, dt: f32, rng: &mut R) {
    if tick.saturating_sub(n.last_drift_tick) > NEUTRAL_DRIFT_INTERVAL_TICKS
        && rng.random_bool(NEUTRAL_DRIFT_CHANCE)
    {
        let delta = *[-1i8, 0, 1].choose(rng).unwrap_or(&0);
        n.lane = shift_lane(n.lane, delta);
        n.last_drift_tick = tick;
    }
    n.speed = (n.speed + rng.random_range(-NEUTRAL_JITTER..=NEUTRAL_JITTER) * dt)
        .clamp(NEUTRAL_MIN_SPEED, NEUTRAL_MAX_SPEED);
    n.pos += n.speed * dt;
}

/// Attempt an attack. The opposing combatant takes priority, then the first live
/// neutral in list order. The cooldown is consumed even on a miss.
fn resolve_attack(
    attacker: &mut Racer,
    target: &mut Racer,
    neutrals: &mut [Neutral],
    tick: u64,
) -> Option<AttackHit> {
    if !attacker.can_attack(tick) {
        return None;
    }
    attacker.last_attack_tick = Some(tick);

    if attacker.within_reach(target.pos, target.lane, ATTACK_RANGE) {
        target.take_damage(ATTACK_DAMAGE);
        return Some(AttackHit::Racer);
    }

    let victim = neutrals
        .iter_mut()
        .find(|n| n.is_alive() && attacker.within_reach(n.pos, n.lane, ATTACK_RANGE))?;
    victim.health = (victim.health - ATTACK_DAMAGE).clamp(0.0, MAX_HEALTH);
    Some(AttackHit::Neutral)
}
