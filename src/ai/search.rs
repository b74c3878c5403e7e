//! Opponent decision procedure: depth-limited alpha-beta over `step`
//!
//! The adversary minimizes the controlled rider's evaluation. Below the root the
//! plies alternate: the controlled rider picks a move to maximize the score while
//! the adversary holds, then the adversary picks a move to minimize it while the
//! controlled rider holds.

use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};

use super::eval::{StyleProfile, evaluate};
use crate::consts::{ATTACK_RANGE, TICK_DT};
use crate::sim::{Action, WorldState, is_terminal, step};

/// Chance that a searched decision is replaced by a uniformly random action
pub const RANDOM_OVERRIDE_CHANCE: f64 = 0.1;
/// Chance the random style attacks when it has the controlled rider in reach
pub const RANDOM_STYLE_ATTACK_CHANCE: f64 = 0.5;
/// Extra reach for the random style's attack window
pub const RANDOM_STYLE_ATTACK_SLACK: f32 = 0.7;
/// Extra reach for trying Attack first at the root
pub const ATTACK_FIRST_SLACK: f32 = 0.5;

/// Work done by one search
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Nodes entered below the root
    pub nodes: u64,
    /// Leaf evaluations
    pub leaves: u64,
}

/// Outcome of one adversary decision
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    /// Action to play this tick
    pub action: Action,
    /// What the search picked before any random override (None for the random style)
    pub searched_action: Option<Action>,
    /// Minimax value of `searched_action`
    pub value: Option<f32>,
    pub overridden: bool,
    pub stats: SearchStats,
}

/// Pick the adversary's action for this tick
pub fn choose_adversary_action<R: Rng + ?Sized>(
    state: &WorldState,
    style: StyleProfile,
    rng: &mut R,
) -> Action {
    decide(state, style, rng).action
}

/// Pick the adversary's action, reporting search details
pub fn decide<R: Rng + ?Sized>(state: &WorldState, style: StyleProfile, rng: &mut R) -> Decision {
    let Some(depth) = style.search_depth() else {
        return Decision {
            action: random_style_action(state, rng),
            searched_action: None,
            value: None,
            overridden: false,
            stats: SearchStats::default(),
        };
    };

    let candidates = root_order(state, rng);
    let mut stats = SearchStats::default();
    let (best, value) = search_root(state, &candidates, depth, style, &mut stats);

    let overridden = rng.random_bool(RANDOM_OVERRIDE_CHANCE);
    let action = if overridden { random_action(rng) } else { best };

    Decision {
        action,
        searched_action: Some(best),
        value: Some(value),
        overridden,
        stats,
    }
}

/// Shuffled root moves, with Attack moved to the front when the riders are close.
/// Only affects pruning and tie-breaks.
pub fn root_order<R: Rng + ?Sized>(state: &WorldState, rng: &mut R) -> [Action; 6] {
    let mut candidates = Action::ALL;
    candidates.shuffle(rng);
    if adversary_in_reach(state, ATTACK_RANGE + ATTACK_FIRST_SLACK) {
        // Stable: the rest keep their shuffled order
        candidates.sort_by_key(|a| *a != Action::Attack);
    }
    candidates
}

/// Root of the search: the adversary tries each candidate (controlled holds) and
/// keeps the lowest score. Ties go to the earliest candidate.
pub fn search_root(
    state: &WorldState,
    candidates: &[Action],
    depth: u8,
    style: StyleProfile,
    stats: &mut SearchStats,
) -> (Action, f32) {
    let alpha = f32::NEG_INFINITY;
    let mut beta = f32::INFINITY;
    let mut best_action = Action::Maintain;
    let mut best_value = f32::INFINITY;

    for &candidate in candidates {
        let child = step(state, Action::Maintain, candidate, TICK_DT);
        let value = alpha_beta(&child, depth.saturating_sub(1), alpha, beta, true, style, stats);
        if value < best_value {
            best_value = value;
            best_action = candidate;
        }
        beta = beta.min(best_value);
        if alpha >= beta {
            break;
        }
    }

    (best_action, best_value)
}

/// Alpha-beta minimax. `maximizing` is the controlled rider's ply.
pub fn alpha_beta(
    state: &WorldState,
    depth: u8,
    mut alpha: f32,
    mut beta: f32,
    maximizing: bool,
    style: StyleProfile,
    stats: &mut SearchStats,
) -> f32 {
    stats.nodes += 1;
    if depth == 0 || is_terminal(state) {
        stats.leaves += 1;
        return evaluate(state, style);
    }

    if maximizing {
        let mut value = f32::NEG_INFINITY;
        for action in Action::ALL {
            let child = step(state, action, Action::Maintain, TICK_DT);
            value = value.max(alpha_beta(&child, depth - 1, alpha, beta, false, style, stats));
            alpha = alpha.max(value);
            if alpha >= beta {
                break; // Beta cutoff
            }
        }
        value
    } else {
        let mut value = f32::INFINITY;
        for action in Action::ALL {
            let child = step(state, Action::Maintain, action, TICK_DT);
            value = value.min(alpha_beta(&child, depth - 1, alpha, beta, true, style, stats));
            beta = beta.min(value);
            if alpha >= beta {
                break; // Alpha cutoff
            }
        }
        value
    }
}

/// Plain minimax over the same tree as [`alpha_beta`], without pruning
pub fn minimax(
    state: &WorldState,
    depth: u8,
    maximizing: bool,
    style: StyleProfile,
    stats: &mut SearchStats,
) -> f32 {
    stats.nodes += 1;
    if depth == 0 || is_terminal(state) {
        stats.leaves += 1;
        return evaluate(state, style);
    }

    let children = Action::ALL.iter().map(|&action| {
        let child = if maximizing {
            step(state, action, Action::Maintain, TICK_DT)
        } else {
            step(state, Action::Maintain, action, TICK_DT)
        };
        minimax(&child, depth - 1, !maximizing, style, stats)
    });
    if maximizing {
        children.fold(f32::NEG_INFINITY, f32::max)
    } else {
        children.fold(f32::INFINITY, f32::min)
    }
}

/// Same lane and within `reach` of the controlled rider
fn adversary_in_reach(state: &WorldState, reach: f32) -> bool {
    state
        .adversary
        .within_reach(state.controlled.pos, state.controlled.lane, reach)
}

fn random_action<R: Rng + ?Sized>(rng: &mut R) -> Action {
    *Action::ALL.choose(rng).unwrap_or(&Action::Maintain)
}

fn random_style_action<R: Rng + ?Sized>(state: &WorldState, rng: &mut R) -> Action {
    if adversary_in_reach(state, ATTACK_RANGE + RANDOM_STYLE_ATTACK_SLACK)
        && rng.random_bool(RANDOM_STYLE_ATTACK_CHANCE)
    {
        return Action::Attack;
    }
    random_action(rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Neutral;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn world() -> WorldState {
        WorldState::with_entities(Vec::new(), Vec::new(), 1)
    }

    /// A busier mid-race position with neutrals and hazards in play
    fn mid_race() -> WorldState {
        let mut s = WorldState::new(2718);
        s.controlled.pos = 40.0;
        s.controlled.speed = 9.0;
        s.adversary.pos = 42.0;
        s.adversary.speed = 8.5;
        s.neutrals.push(Neutral::new(99, 44.0, 1, 6.0, 0.9));
        s.tick = 120;
        s
    }

    #[test]
    fn test_pruning_matches_minimax() {
        for style in [StyleProfile::Aggressive, StyleProfile::Balanced] {
            for state in [world(), mid_race()] {
                for depth in 1..=3 {
                    for maximizing in [true, false] {
                        let mut pruned = SearchStats::default();
                        let mut full = SearchStats::default();
                        let a = alpha_beta(
                            &state,
                            depth,
                            f32::NEG_INFINITY,
                            f32::INFINITY,
                            maximizing,
                            style,
                            &mut pruned,
                        );
                        let b = minimax(&state, depth, maximizing, style, &mut full);
                        assert_eq!(a, b, "style {style} depth {depth}");
                        assert!(pruned.leaves <= full.leaves);
                        assert_eq!(full.leaves, 6u64.pow(depth as u32));
                    }
                }
            }
        }
    }

    #[test]
    fn test_root_value_matches_minimax() {
        let state = mid_race();
        let style = StyleProfile::Balanced;
        let depth = 3;
        let mut rng = Pcg32::seed_from_u64(8);
        let order = root_order(&state, &mut rng);

        let mut stats = SearchStats::default();
        let (action, value) = search_root(&state, &order, depth, style, &mut stats);
        assert!(stats.leaves <= 6u64.pow(depth as u32));

        let mut scratch = SearchStats::default();
        let values: Vec<f32> = order
            .iter()
            .map(|&a| {
                let child = step(&state, Action::Maintain, a, TICK_DT);
                minimax(&child, depth - 1, true, style, &mut scratch)
            })
            .collect();
        let expected = values.iter().copied().fold(f32::INFINITY, f32::min);
        assert_eq!(value, expected);
        // First candidate holding the minimum wins
        let first = values.iter().position(|&v| v == expected).unwrap();
        assert_eq!(action, order[first]);
    }

    #[test]
    fn test_leaf_budget_at_full_depth() {
        let state = mid_race();
        let mut rng = Pcg32::seed_from_u64(3);
        for style in [StyleProfile::Aggressive, StyleProfile::Balanced] {
            let decision = decide(&state, style, &mut rng);
            let depth = style.search_depth().unwrap() as u32;
            assert!(decision.stats.leaves > 0);
            assert!(decision.stats.leaves <= 6u64.pow(depth));
        }
    }

    #[test]
    fn test_equal_candidates_keep_first() {
        // Far apart: steering or holding leaves the score unchanged
        let mut state = world();
        state.adversary.pos = 60.0;
        state.adversary.lane = 0;
        let mut stats = SearchStats::default();

        let order = [Action::SteerRight, Action::SteerLeft, Action::Maintain];
        let (action, _) = search_root(&state, &order, 1, StyleProfile::Balanced, &mut stats);
        assert_eq!(action, Action::SteerRight);

        let order = [Action::Maintain, Action::SteerLeft, Action::SteerRight];
        let (action, _) = search_root(&state, &order, 1, StyleProfile::Balanced, &mut stats);
        assert_eq!(action, Action::Maintain);
    }

    #[test]
    fn test_attacks_when_in_reach() {
        let mut state = world();
        state.controlled.pos = 4.0;
        let mut stats = SearchStats::default();
        let (action, value) =
            search_root(&state, &Action::ALL, 1, StyleProfile::Balanced, &mut stats);
        assert_eq!(action, Action::Attack);
        let hit = step(&state, Action::Maintain, Action::Attack, TICK_DT);
        assert_eq!(value, evaluate(&hit, StyleProfile::Balanced));
    }

    #[test]
    fn test_attack_tried_first_when_close() {
        let mut state = world();
        state.controlled.pos = 3.0;
        let mut rng = Pcg32::seed_from_u64(11);
        for _ in 0..20 {
            assert_eq!(root_order(&state, &mut rng)[0], Action::Attack);
        }

        // Out of lane: order is just a shuffle of all six
        state.adversary.lane = 2;
        let order = root_order(&state, &mut rng);
        for action in Action::ALL {
            assert!(order.contains(&action));
        }
    }

    #[test]
    fn test_search_does_not_touch_state() {
        let state = mid_race();
        let before = state.clone();
        let mut rng = Pcg32::seed_from_u64(5);
        let _ = decide(&state, StyleProfile::Aggressive, &mut rng);
        assert_eq!(state, before);
    }

    #[test]
    fn test_decision_is_reproducible() {
        let state = mid_race();
        let mut a = Pcg32::seed_from_u64(21);
        let mut b = Pcg32::seed_from_u64(21);
        for _ in 0..5 {
            assert_eq!(
                decide(&state, StyleProfile::Balanced, &mut a),
                decide(&state, StyleProfile::Balanced, &mut b)
            );
        }
    }

    #[test]
    fn test_random_override_rate() {
        let mut state = world();
        state.adversary.pos = 60.0;
        let mut rng = Pcg32::seed_from_u64(99);
        let mut overridden = 0;
        for _ in 0..400 {
            let d = decide(&state, StyleProfile::Balanced, &mut rng);
            if d.overridden {
                overridden += 1;
            } else {
                assert_eq!(Some(d.action), d.searched_action);
            }
        }
        // ~10% of 400
        assert!((15..=70).contains(&overridden), "overridden = {overridden}");
    }

    #[test]
    fn test_random_style_prefers_attack_in_reach() {
        let mut rng = Pcg32::seed_from_u64(17);

        let mut close = world();
        close.controlled.pos = 3.0;
        let attacks = (0..1000)
            .filter(|_| choose_adversary_action(&close, StyleProfile::Random, &mut rng) == Action::Attack)
            .count();
        // 0.5 + 0.5/6 ≈ 0.58
        assert!((500..=670).contains(&attacks), "attacks = {attacks}");

        let far = world();
        let attacks = (0..1000)
            .filter(|_| choose_adversary_action(&far, StyleProfile::Random, &mut rng) == Action::Attack)
            .count();
        // ≈ 1/6
        assert!((110..=230).contains(&attacks), "attacks = {attacks}");

        let d = decide(&far, StyleProfile::Random, &mut rng);
        assert_eq!(d.searched_action, None);
        assert_eq!(d.stats, SearchStats::default());
    }
}
