//! Constants for board geometry, evaluator weights, and search parameters.
//!
//! The board is a fixed 10x10 grid addressed by 0-based `(row, col)` pairs.
//! Everything tunable about the engine lives here so the evaluator and the
//! search read their numbers from one place.

// =============================================================================
// Board Geometry
// =============================================================================

/// Board size (NxN). Game of the Amazons is played on 10x10.
pub const N: usize = 10;

/// Number of queens each color starts with.
pub const QUEENS_PER_COLOR: usize = 4;

/// The 8 compass directions as `(row delta, col delta)`.
/// Order: North, NW, West, SW, South, SE, East, NE
pub const DIRECTIONS: [(isize, isize); 8] = [
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
];

/// Starting squares for the White queens.
pub const WHITE_START: [(usize, usize); QUEENS_PER_COLOR] = [(0, 3), (0, 6), (3, 0), (3, 9)];

/// Starting squares for the Black queens.
pub const BLACK_START: [(usize, usize); QUEENS_PER_COLOR] = [(6, 0), (6, 9), (9, 3), (9, 6)];

// =============================================================================
// Heuristic Evaluator
// =============================================================================

/// Bonus for a square both colors reach at the same distance, signed for the
/// side to move.
pub const TURN_ADVANTAGE: f64 = 0.15;

/// Divergence weight above which the king-distance and mobility terms are added.
pub const DIVERGENCE_THRESHOLD: f64 = 10.0;

/// Base of the per-queen mobility decay `w * base^(-mobility) / divisor`.
pub const MOBILITY_DECAY_BASE: f64 = 1.2;

/// Divisor of the per-queen mobility decay.
pub const MOBILITY_DECAY_DIVISOR: f64 = 45.0;

/// Divisor applied to the evaluation before the logistic squash.
pub const SIGMOID_DIVISOR: f64 = 5.0;

// =============================================================================
// MCTS Parameters
// =============================================================================

/// UCB score reported for a node that has never been visited.
pub const UNVISITED_UCB: f64 = 10000.0;

/// Default thinking time per move in milliseconds.
pub const DEFAULT_TIME_MS: u64 = 29000;

/// Default UCB1 exploration coefficient.
pub const DEFAULT_EXPLORATION: f64 = 1.4;

/// Reward assigned when the selected leaf is terminal (the side to move there has lost).
pub const TERMINAL_REWARD: f64 = 1.0;
