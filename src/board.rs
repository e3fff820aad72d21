//! Squares, colors and the 10x10 grid.
//!
//! Rows and columns are 0-based internally; only the text protocol uses
//! 1-based coordinates.

use std::fmt;

use crate::constants::{BLACK_START, N, QUEENS_PER_COLOR, WHITE_START};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn opposite(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "white"),
            Color::Black => write!(f, "black"),
        }
    }
}

/// Contents of a single square.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Cell {
    #[default]
    Empty,
    Queen(Color),
    /// A spent arrow. Never becomes empty again.
    Blocked,
}

/// A square as 0-based `(row, col)`.
pub type Point = (usize, usize);

/// True if `(row, col)` lies on the board.
#[inline]
pub fn on_board(row: isize, col: isize) -> bool {
    row >= 0 && row < N as isize && col >= 0 && col < N as isize
}

/// The square `dist` steps from `from` along `dir`, if it is on the board.
#[inline]
pub fn step(from: Point, dir: (isize, isize), dist: isize) -> Option<Point> {
    let row = from.0 as isize + dir.0 * dist;
    let col = from.1 as isize + dir.1 * dist;
    on_board(row, col).then_some((row as usize, col as usize))
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    cells: [[Cell; N]; N],
}

impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}

impl Board {
    pub fn empty() -> Self {
        Self {
            cells: [[Cell::Empty; N]; N],
        }
    }

    /// The standard opening: four queens per color on their home squares.
    pub fn starting() -> Self {
        let mut board = Self::empty();
        for &pt in &WHITE_START {
            board.set(pt, Cell::Queen(Color::White));
        }
        for &pt in &BLACK_START {
            board.set(pt, Cell::Queen(Color::Black));
        }
        board
    }

    #[inline]
    pub fn get(&self, pt: Point) -> Cell {
        self.cells[pt.0][pt.1]
    }

    #[inline]
    pub fn set(&mut self, pt: Point, cell: Cell) {
        self.cells[pt.0][pt.1] = cell;
    }

    #[inline]
    pub fn is_empty_at(&self, pt: Point) -> bool {
        self.get(pt) == Cell::Empty
    }

    /// Squares holding a queen of `color`, in row-major order.
    pub fn queens(&self, color: Color) -> Vec<Point> {
        let mut out = Vec::with_capacity(QUEENS_PER_COLOR);
        for row in 0..N {
            for col in 0..N {
                if self.cells[row][col] == Cell::Queen(color) {
                    out.push((row, col));
                }
            }
        }
        out
    }

    pub fn count(&self, cell: Cell) -> usize {
        self.cells.iter().flatten().filter(|&&c| c == cell).count()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..N {
            for col in 0..N {
                let ch = match self.cells[row][col] {
                    Cell::Queen(Color::White) => 'W',
                    Cell::Queen(Color::Black) => 'B',
                    Cell::Blocked => '#',
                    Cell::Empty => '.',
                };
                write!(f, "{ch} ")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
