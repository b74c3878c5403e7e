//! Opponent AI
//!
//! `eval` scores states for the controlled rider; `search` drives the adversary
//! by running the simulation forward inside an alpha-beta tree search.

pub mod eval;
pub mod search;

pub use eval::{Features, ParseStyleError, StyleProfile, Weights, evaluate};
pub use search::{
    Decision, SearchStats, alpha_beta, choose_adversary_action, decide, minimax, root_order,
    search_root,
};
