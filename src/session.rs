//! Headless session driver
//!
//! Owns the authoritative world and threads it forward one tick at a time:
//! adversary decision, boost, transition. Rendering and input capture sit
//! outside and only see `TickReport`s and state snapshots.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::ai::{Decision, StyleProfile, decide};
use crate::consts::*;
use crate::sim::{Action, EventFlags, MatchSummary, WorldState, is_terminal, step};

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Controlled rider's action (None = Maintain)
    pub action: Option<Action>,
    /// Fire the one-shot boost before this tick
    pub boost: bool,
}

/// What happened during one tick
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    /// Tick counter after the step
    pub tick: u64,
    pub controlled: Action,
    pub adversary: Action,
    pub boost_activated: bool,
    pub events: EventFlags,
    pub decision: Decision,
    pub finished: bool,
}

/// One match between the controlled rider and a searching adversary
pub struct Session<R = Pcg32> {
    state: WorldState,
    style: StyleProfile,
    /// Drives the opponent's shuffles and random picks
    opponent_rng: R,
}

impl Session<Pcg32> {
    /// Fresh match from a seed; the same seed and inputs replay the same match
    pub fn new(seed: u64, style: StyleProfile) -> Self {
        let opponent_rng = Pcg32::seed_from_u64(seed.rotate_left(17) ^ 0x5851_f42d_4c95_7f2d);
        Self::with_parts(WorldState::new(seed), style, opponent_rng)
    }
}

impl<R: Rng> Session<R> {
    /// Session around an existing world and opponent generator
    pub fn with_parts(state: WorldState, style: StyleProfile, opponent_rng: R) -> Self {
        log::info!(
            "Match start: seed {}, opponent style {}",
            state.seed,
            style
        );
        Self {
            state,
            style,
            opponent_rng,
        }
    }

    pub fn state(&self) -> &WorldState {
        &self.state
    }

    pub fn style(&self) -> StyleProfile {
        self.style
    }

    pub fn is_over(&self) -> bool {
        is_terminal(&self.state)
    }

    /// Advance the match by one tick. Returns None once the match is over.
    pub fn advance(&mut self, input: &TickInput) -> Option<TickReport> {
        if self.is_over() {
            return None;
        }

        // The adversary commits before it sees this tick's boost
        let decision = decide(&self.state, self.style, &mut self.opponent_rng);
        log::debug!(
            "tick {}: adversary {} (searched {:?}, value {:?}, {} nodes, {} leaves{})",
            self.state.tick,
            decision.action,
            decision.searched_action,
            decision.value,
            decision.stats.nodes,
            decision.stats.leaves,
            if decision.overridden { ", overridden" } else { "" }
        );

        let boost_activated = input.boost && self.state.activate_boost();
        if boost_activated {
            log::debug!("tick {}: boost activated", self.state.tick);
        }

        let controlled = input.action.unwrap_or_default();

        self.state = step(&self.state, controlled, decision.action, TICK_DT);
        log::trace!(
            "tick {}: controlled {} -> pos {:.2} hp {:.2} | adversary {} -> pos {:.2} hp {:.2}",
            self.state.tick,
            controlled,
            self.state.controlled.pos,
            self.state.controlled.health,
            decision.action,
            self.state.adversary.pos,
            self.state.adversary.health
        );

        let events = self.state.events;
        if events.any() {
            log::debug!("tick {}: {:?}", self.state.tick, events);
        }

        let finished = self.is_over();
        if finished {
            log::info!("Match over: {}", MatchSummary::from_state(&self.state));
        }

        Some(TickReport {
            tick: self.state.tick,
            controlled,
            adversary: decision.action,
            boost_activated,
            events,
            decision,
            finished,
        })
    }

    /// Final stats, once the match is over
    pub fn summary(&self) -> Option<MatchSummary> {
        self.is_over().then(|| MatchSummary::from_state(&self.state))
    }

    /// Play until the match ends or `max_ticks` ticks have been played,
    /// asking `policy` for the controlled rider's input each tick
    pub fn run<F>(&mut self, max_ticks: Option<u64>, mut policy: F) -> MatchSummary
    where
        F: FnMut(&WorldState) -> TickInput,
    {
        let mut played = 0;
        while max_ticks.is_none_or(|cap| played < cap) {
            let input = policy(&self.state);
            if self.advance(&input).is_none() {
                break;
            }
            played += 1;
        }
        if !self.is_over() {
            log::info!("Stopped after {} ticks with the match still running", played);
        }
        MatchSummary::from_state(&self.state)
    }
}

/// Distance ahead within which the autopilot steers around a hazard
const AUTOPILOT_LOOKAHEAD: f32 = 4.0;
/// Fire boost once this far along the track
const AUTOPILOT_BOOST_AT: f32 = TRACK_LENGTH * 0.6;

/// Simple scripted rider for headless play: dodge, strike, boost, throttle
pub fn autopilot(state: &WorldState) -> TickInput {
    let me = &state.controlled;
    let boost = state.boost.available && me.pos >= AUTOPILOT_BOOST_AT;

    let hazard_ahead = |lane: u8| {
        state
            .hazards
            .iter()
            .any(|hz| hz.lane == lane && hz.pos >= me.pos && hz.pos - me.pos <= AUTOPILOT_LOOKAHEAD)
    };

    if hazard_ahead(me.lane) {
        // Prefer the centre-most clear lane next door
        let mut options = [me.lane as i16 - 1, me.lane as i16 + 1];
        options.sort_by_key(|l| (l - (LANES as i16 - 1) / 2).abs());
        for lane in options {
            if (0..LANES as i16).contains(&lane) && !hazard_ahead(lane as u8) {
                let action = if lane < me.lane as i16 {
                    Action::SteerLeft
                } else {
                    Action::SteerRight
                };
                return TickInput {
                    action: Some(action),
                    boost,
                };
            }
        }
    }

    let action = if me.can_attack(state.tick)
        && me.within_reach(state.adversary.pos, state.adversary.lane, ATTACK_RANGE)
    {
        Action::Attack
    } else {
        Action::Accelerate
    };
    TickInput {
        action: Some(action),
        boost,
    }
}
