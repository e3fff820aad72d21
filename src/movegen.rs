//! Legal move generation.
//!
//! Every move is a queen slide along one of the 8 compass rays followed by an
//! arrow shot along a ray from the landing square. Rays stop at the first
//! non-empty or off-board square. The arrow lines are walked on a board where
//! the queen has already moved, so the vacated source square is open to the
//! arrow.

use crate::board::{Board, Color, Point, step};
use crate::constants::{DIRECTIONS, N};
use crate::position::{Move, State};

/// Squares reachable from `from` by sliding along each ray until blocked.
pub fn ray_targets(board: &Board, from: Point) -> impl Iterator<Item = Point> + '_ {
    DIRECTIONS.into_iter().flat_map(move |dir| {
        (1..N as isize)
            .map(move |d| step(from, dir, d))
            .take_while(move |pt| pt.is_some_and(|pt| board.is_empty_at(pt)))
            .flatten()
    })
}

/// Generate every legal move for `color`.
///
/// An empty result means `color` cannot act and has lost.
pub fn generate(state: &State, color: Color) -> Vec<Move> {
    let mut moves = Vec::new();
    for from in state.board.queens(color) {
        for to in ray_targets(&state.board, from) {
            let after_queen = state.apply_queen_move(from, to);
            moves.extend(ray_targets(&after_queen, to).map(|arrow| Move::new(from, to, arrow)));
        }
    }
    moves
}

/// True if `color` has at least one legal move.
///
/// Stops at the first queen slide found; an arrow always has at least the
/// vacated source square to land on.
pub fn has_legal_move(state: &State, color: Color) -> bool {
    state
        .board
        .queens(color)
        .into_iter()
        .any(|from| ray_targets(&state.board, from).next().is_some())
}
