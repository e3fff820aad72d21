//! Amazons position representation and move execution.
//!
//! A [`State`] pairs the [`Board`] with a mobility map counting the empty
//! compass neighbours of every square. The map is kept in sync incrementally:
//! a move only touches the neighbourhoods of the three squares whose contents
//! change (queen source, queen destination, arrow).
//!
//! States are values. Applying a move returns a fresh `State` and never
//! touches the original, so sibling search nodes cannot see each other's moves.

use std::fmt;

use crate::board::{Board, Cell, Point, step};
use crate::constants::{DIRECTIONS, N};

/// Per-square count of empty neighbours (0..=8).
pub type MobilityMap = [[u8; N]; N];

/// A full turn: queen move followed by an arrow shot from the landing square.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Point,
    pub to: Point,
    pub arrow: Point,
}

impl Move {
    pub fn new(from: Point, to: Point, arrow: Point) -> Self {
        Self { from, to, arrow }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({},{})->({},{}) arrow ({},{})",
            self.from.0, self.from.1, self.to.0, self.to.1, self.arrow.0, self.arrow.1
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct State {
    pub board: Board,
    pub mobility: MobilityMap,
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

impl State {
    /// The standard starting position.
    pub fn new() -> Self {
        Self::from_board(Board::starting())
    }

    /// Wrap an arbitrary board, deriving its mobility map from scratch.
    pub fn from_board(board: Board) -> Self {
        let mobility = mobility_map(&board);
        Self { board, mobility }
    }

    /// Play `mv` and return the resulting state.
    ///
    /// The caller is responsible for legality; moves coming from
    /// [`crate::movegen::generate`] always are.
    pub fn apply_move(&self, mv: &Move) -> State {
        let mut next = self.clone();
        let queen = next.board.get(mv.from);
        next.board.set(mv.from, Cell::Empty);
        next.board.set(mv.to, queen);
        next.board.set(mv.arrow, Cell::Blocked);

        adjust_neighbours(&mut next.mobility, mv.from, 1);
        adjust_neighbours(&mut next.mobility, mv.to, -1);
        adjust_neighbours(&mut next.mobility, mv.arrow, -1);
        next
    }

    /// Relocate a queen without firing an arrow.
    ///
    /// Only the board is returned: this is used to walk arrow lines during
    /// move generation and never becomes a real position.
    pub fn apply_queen_move(&self, from: Point, to: Point) -> Board {
        let mut board = self.board.clone();
        let queen = board.get(from);
        board.set(from, Cell::Empty);
        board.set(to, queen);
        board
    }
}

/// Compute the mobility map of `board` from scratch.
pub fn mobility_map(board: &Board) -> MobilityMap {
    let mut map = [[0u8; N]; N];
    for (row, line) in map.iter_mut().enumerate() {
        for (col, slot) in line.iter_mut().enumerate() {
            *slot = DIRECTIONS
                .iter()
                .filter_map(|&dir| step((row, col), dir, 1))
                .filter(|&pt| board.is_empty_at(pt))
                .count() as u8;
        }
    }
    map
}

/// Add `delta` to every on-board neighbour of `center`.
fn adjust_neighbours(map: &mut MobilityMap, center: Point, delta: i8) {
    for &dir in &DIRECTIONS {
        if let Some((row, col)) = step(center, dir, 1) {
            map[row][col] = map[row][col].wrapping_add_signed(delta);
        }
    }
}
