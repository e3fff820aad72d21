//! Leaf evaluation for the tree search.
//!
//! Rewards are always from the point of view of the player who made the move
//! leading to the node, i.e. the opposite of the node's side to move. That is
//! the player choosing between this node and its siblings.

use fastrand::Rng;

use crate::board::Color;
use crate::config::RolloutPolicy;
use crate::heuristic::{evaluate, sigmoid};
use crate::movegen::generate;
use crate::position::State;

/// Score `state` (with `to_move` to play) under `policy`. Returns a value in `[0, 1]`.
pub fn rollout(state: &State, to_move: Color, policy: RolloutPolicy, rng: &mut Rng) -> f64 {
    match policy {
        RolloutPolicy::Heuristic => heuristic_rollout(state, to_move),
        RolloutPolicy::Random => random_playout(state, to_move, rng),
    }
}

/// Sigmoid of the heuristic evaluation, flipped when White is to move.
pub fn heuristic_rollout(state: &State, to_move: Color) -> f64 {
    let white_wins = sigmoid(evaluate(state, to_move));
    match to_move {
        Color::White => 1.0 - white_wins,
        Color::Black => white_wins,
    }
}

/// Play uniformly random moves until someone is stuck.
///
/// Returns 1.0 if the player who moved into `state` wins, 0.0 otherwise.
/// The game always ends: every move fires an arrow onto an empty square.
pub fn random_playout(state: &State, to_move: Color, rng: &mut Rng) -> f64 {
    let mut pos = state.clone();
    let mut color = to_move;

    loop {
        let moves = generate(&pos, color);
        if moves.is_empty() {
            return if color == to_move { 1.0 } else { 0.0 };
        }
        let mv = moves[rng.usize(..moves.len())];
        pos = pos.apply_move(&mv);
        color = color.opposite();
    }
}
