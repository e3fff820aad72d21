//! Territory and mobility evaluation for non-terminal positions.
//!
//! The evaluator estimates who controls more of the board by running a
//! multi-source BFS from each color's queens and comparing, square by square,
//! which color gets there first:
//!
//! 1. Queen distance: one BFS layer per queen move (full ray slides).
//! 2. Territory (+1/-1 per square closer to White/Black, ties reached by both
//!    get a small bonus for the side to move) and control
//!    (`2 * sum(2^-dW - 2^-dB)`).
//! 3. A divergence weight `sum(2^-|dW - dB|)` over squares both colors reach.
//!    When it is high the position is still contested, so king-distance
//!    territory/control and a queen mobility term are blended in as well.
//!
//! Scores are from White's point of view: positive favors White.

use std::collections::VecDeque;

use crate::board::{Board, Color, Point, step};
use crate::constants::{
    DIRECTIONS, DIVERGENCE_THRESHOLD, MOBILITY_DECAY_BASE, MOBILITY_DECAY_DIVISOR, N,
    SIGMOID_DIVISOR, TURN_ADVANTAGE,
};
use crate::movegen::ray_targets;
use crate::position::{MobilityMap, State};

/// Distance of a square no queen of the color can reach.
pub const UNREACHED: u32 = u32::MAX;

pub type DistanceMap = [[u32; N]; N];

/// How far one BFS layer may travel.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Reach {
    /// Full queen slides along each ray.
    Queen,
    /// A single step in each direction.
    King,
}

/// Territory, control, and divergence computed from one pair of distance maps.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct DistanceMetrics {
    pub territory: f64,
    pub control: f64,
    pub divergence: f64,
}

/// Evaluate `state` with `to_move` about to play. Positive favors White.
pub fn evaluate(state: &State, to_move: Color) -> f64 {
    let queen = distance_metrics(&state.board, to_move, Reach::Queen);
    let mut weight = queen.divergence;

    let (king, mobility) = if weight > DIVERGENCE_THRESHOLD {
        (
            distance_metrics(&state.board, to_move, Reach::King),
            mobility_term(&state.board, &state.mobility, weight),
        )
    } else {
        weight = 0.0;
        (DistanceMetrics::default(), 0.0)
    };

    let f1 = (100.0 - weight) / 100.0;
    let rest = (1.0 - f1) / 4.0;
    f1 * queen.territory + rest * queen.control + rest * king.territory + rest * king.control + mobility
}

/// Logistic squash of an evaluation into `[0, 1]`.
#[inline]
pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x / SIGMOID_DIVISOR).exp())
}

/// Multi-source BFS distances from every queen of `color`.
pub fn distances(board: &Board, color: Color, reach: Reach) -> DistanceMap {
    let mut dist = [[UNREACHED; N]; N];
    let mut queue: VecDeque<Point> = VecDeque::with_capacity(N * N);

    for pt in board.queens(color) {
        dist[pt.0][pt.1] = 0;
        queue.push_back(pt);
    }

    while let Some(pt) = queue.pop_front() {
        let next = dist[pt.0][pt.1] + 1;
        let mut relax = |target: Point| {
            if dist[target.0][target.1] > next {
                dist[target.0][target.1] = next;
                queue.push_back(target);
            }
        };
        match reach {
            Reach::Queen => ray_targets(board, pt).for_each(&mut relax),
            Reach::King => DIRECTIONS
                .iter()
                .filter_map(|&dir| step(pt, dir, 1))
                .filter(|&target| board.is_empty_at(target))
                .for_each(&mut relax),
        }
    }
    dist
}

/// Compare White's and Black's distance maps square by square.
pub fn distance_metrics(board: &Board, to_move: Color, reach: Reach) -> DistanceMetrics {
    let white = distances(board, Color::White, reach);
    let black = distances(board, Color::Black, reach);
    let tie_bonus = match to_move {
        Color::White => TURN_ADVANTAGE,
        Color::Black => -TURN_ADVANTAGE,
    };

    let mut metrics = DistanceMetrics::default();
    for row in 0..N {
        for col in 0..N {
            let (dw, db) = (white[row][col], black[row][col]);
            metrics.control += inverse_pow2(dw) - inverse_pow2(db);
            if dw != UNREACHED && db != UNREACHED {
                metrics.divergence += inverse_pow2(dw.abs_diff(db));
            }
            if dw < db {
                metrics.territory += 1.0;
            } else if dw > db {
                metrics.territory -= 1.0;
            } else if dw != UNREACHED {
                metrics.territory += tie_bonus;
            }
        }
    }
    metrics.control *= 2.0;
    metrics
}

/// `2^-d`, with unreachable squares contributing nothing.
#[inline]
fn inverse_pow2(d: u32) -> f64 {
    if d == UNREACHED {
        0.0
    } else {
        (-(d as f64)).exp2()
    }
}

/// Black's aggregate minus White's aggregate queen mobility decay.
fn mobility_term(board: &Board, mobility: &MobilityMap, weight: f64) -> f64 {
    color_mobility(board, mobility, Color::Black, weight)
        - color_mobility(board, mobility, Color::White, weight)
}

/// Sum of `w * 1.2^(-m) / 45` over the queens of `color`, where `m` adds up
/// the mobility of every square a queen can slide to, halved per extra step.
fn color_mobility(board: &Board, mobility: &MobilityMap, color: Color, weight: f64) -> f64 {
    board
        .queens(color)
        .into_iter()
        .map(|queen| {
            let mut aggregate = 0.0;
            for &dir in &DIRECTIONS {
                for d in 1..N as isize {
                    match step(queen, dir, d) {
                        Some(pt) if board.is_empty_at(pt) => {
                            aggregate += (-((d - 1) as f64)).exp2() * mobility[pt.0][pt.1] as f64;
                        }
                        _ => break,
                    }
                }
            }
            weight * MOBILITY_DECAY_BASE.powf(-aggregate) / MOBILITY_DECAY_DIVISOR
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Cell;

    #[test]
    fn test_queen_distances_on_empty_row() {
        let mut board = Board::empty();
        board.set((0, 0), Cell::Queen(Color::White));
        let dist = distances(&board, Color::White, Reach::Queen);

        assert_eq!(dist[0][0], 0);
        assert_eq!(dist[0][9], 1);
        assert_eq!(dist[9][9], 1);
        // Knight's-move square needs two slides
        assert_eq!(dist[1][2], 2);
    }

    #[test]
    fn test_king_distances() {
        let mut board = Board::empty();
        board.set((0, 0), Cell::Queen(Color::White));
        let dist = distances(&board, Color::White, Reach::King);

        assert_eq!(dist[1][1], 1);
        assert_eq!(dist[0][9], 9);
        assert_eq!(dist[9][9], 9);
        assert_eq!(dist[5][2], 5);
    }

    #[test]
    fn test_king_distances_around_a_blocked_neighbour() {
        let mut board = Board::empty();
        board.set((5, 5), Cell::Queen(Color::White));
        // North is the first direction tried
        board.set((4, 5), Cell::Blocked);
        let dist = distances(&board, Color::White, Reach::King);

        for pt in [(4, 4), (5, 4), (6, 4), (6, 5), (6, 6), (5, 6), (4, 6)] {
            assert_eq!(dist[pt.0][pt.1], 1, "{pt:?}");
        }
        assert_eq!(dist[4][5], UNREACHED);
        assert_eq!(dist[3][5], 2);
    }

    /// Board blocked everywhere except `open`, with the given queens.
    fn walled(open: &[Point], white: &[Point], black: &[Point]) -> Board {
        let mut board = Board::empty();
        for row in 0..N {
            for col in 0..N {
                board.set((row, col), Cell::Blocked);
            }
        }
        for &pt in open {
            board.set(pt, Cell::Empty);
        }
        for &pt in white {
            board.set(pt, Cell::Queen(Color::White));
        }
        for &pt in black {
            board.set(pt, Cell::Queen(Color::Black));
        }
        board
    }

    /// White on (0,0) and Black on (0,4) share a corridor; Black also owns a
    /// short column below its queen.
    fn corridor() -> Board {
        walled(&[(0, 1), (0, 2), (0, 3), (1, 4), (2, 4)], &[(0, 0)], &[(0, 4)])
    }

    #[test]
    fn test_distance_metrics_on_corridor() {
        let board = corridor();
        let white = distances(&board, Color::White, Reach::Queen);
        assert_eq!(white[1][4], 2);
        assert_eq!(white[2][4], 3);

        // Queen squares +1 -1, three shared ties, two Black squares
        let m = distance_metrics(&board, Color::White, Reach::Queen);
        assert!((m.territory - (-2.0 + 3.0 * TURN_ADVANTAGE)).abs() < 1e-12, "{m:?}");
        // 2 * ((1 - 1) + (0.25 - 0.5) + (0.125 - 0.5))
        assert!((m.control - -1.25).abs() < 1e-12, "{m:?}");
        // 3 * 2^0 + 2^-1 + 2^-2
        assert!((m.divergence - 3.75).abs() < 1e-12, "{m:?}");

        let m = distance_metrics(&board, Color::Black, Reach::Queen);
        assert!((m.territory - (-2.0 - 3.0 * TURN_ADVANTAGE)).abs() < 1e-12, "{m:?}");
    }

    #[test]
    fn test_low_divergence_uses_queen_territory_only() {
        let state = State::from_board(corridor());
        let queen = distance_metrics(&state.board, Color::White, Reach::Queen);
        assert!(queen.divergence <= DIVERGENCE_THRESHOLD);
        assert_eq!(evaluate(&state, Color::White), queen.territory);
    }

    /// Opening position with three of Black's queens walled in by arrows.
    fn cramped_black() -> State {
        let mut board = Board::starting();
        let arrows = [
            (5, 0), (5, 1), (6, 1), (7, 0), (7, 1),
            (8, 2), (8, 3), (8, 4), (9, 2), (9, 4),
            (8, 5), (8, 6), (8, 7), (9, 5), (9, 7),
        ];
        for pt in arrows {
            board.set(pt, Cell::Blocked);
        }
        State::from_board(board)
    }

    #[test]
    fn test_high_divergence_blends_king_and_mobility_terms() {
        let state = cramped_black();
        let queen = distance_metrics(&state.board, Color::White, Reach::Queen);
        let king = distance_metrics(&state.board, Color::White, Reach::King);
        let weight = queen.divergence;
        assert!(weight > DIVERGENCE_THRESHOLD, "weight={weight}");

        // Cramped Black queens decay far more than free White ones
        let mobility = mobility_term(&state.board, &state.mobility, weight);
        assert!(mobility > 1.0, "mobility={mobility}");

        let f1 = (100.0 - weight) / 100.0;
        let rest = (1.0 - f1) / 4.0;
        let expected = f1 * queen.territory
            + rest * (queen.control + king.territory + king.control)
            + mobility;
        let score = evaluate(&state, Color::White);
        assert!((score - expected).abs() < 1e-9, "score={score} expected={expected}");
        assert!(score > 30.0, "score={score}");
    }

    #[test]
    fn test_mirrored_position_negates_score() {
        let state = cramped_black();
        let mut mirrored = Board::empty();
        for row in 0..N {
            for col in 0..N {
                let cell = match state.board.get((row, col)) {
                    Cell::Queen(color) => Cell::Queen(color.opposite()),
                    other => other,
                };
                mirrored.set((N - 1 - row, col), cell);
            }
        }
        let mirrored = State::from_board(mirrored);

        let a = evaluate(&state, Color::White);
        let b = evaluate(&mirrored, Color::Black);
        assert!((a + b).abs() < 1e-9, "a={a} b={b}");
        assert!(mobility_term(&mirrored.board, &mirrored.mobility, 20.0) < 0.0);
    }

    #[test]
    fn test_walls_leave_squares_unreached() {
        let mut board = Board::empty();
        board.set((0, 0), Cell::Queen(Color::White));
        board.set((0, 1), Cell::Blocked);
        board.set((1, 0), Cell::Blocked);
        board.set((1, 1), Cell::Blocked);
        let dist = distances(&board, Color::White, Reach::Queen);

        assert_eq!(dist[0][0], 0);
        assert_eq!(dist[5][5], UNREACHED);
        assert_eq!(distances(&board, Color::Black, Reach::Queen)[3][3], UNREACHED);
    }

    #[test]
    fn test_start_position_is_balanced() {
        let state = State::new();
        let white = evaluate(&state, Color::White);
        let black = evaluate(&state, Color::Black);
        // Mirror-symmetric start: only the side-to-move bonus differs
        assert!((white + black).abs() < 1e-9, "white={white} black={black}");
        assert!(white > 0.0);
    }

    #[test]
    fn test_trapped_side_is_losing() {
        let mut board = Board::empty();
        board.set((0, 0), Cell::Queen(Color::Black));
        board.set((0, 1), Cell::Blocked);
        board.set((1, 0), Cell::Blocked);
        board.set((1, 1), Cell::Blocked);
        board.set((5, 5), Cell::Queen(Color::White));
        let state = State::from_board(board);

        assert!(evaluate(&state, Color::Black) > 50.0);
        assert!(sigmoid(evaluate(&state, Color::Black)) > 0.99);
    }

    #[test]
    fn test_evaluate_is_repeatable() {
        let state = State::new().apply_move(&crate::position::Move::new((0, 3), (4, 3), (4, 7)));
        let a = evaluate(&state, Color::Black);
        let b = evaluate(&state, Color::Black);
        assert_eq!(a.to_bits(), b.to_bits());
    }

    #[test]
    fn test_sigmoid() {
        assert_eq!(sigmoid(0.0), 0.5);
        assert!(sigmoid(20.0) > 0.98);
        assert!(sigmoid(-20.0) < 0.02);
    }
}
