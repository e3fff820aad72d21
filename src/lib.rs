//! Amazons-MCTS: a Monte Carlo Tree Search engine for the Game of the Amazons.
//!
//! Two colors each move four queens on a 10x10 board. A turn is a queen move
//! followed by an arrow shot from the landing square; queens and arrows block
//! their squares for good. The player who cannot move loses.
//!
//! ## Modules
//!
//! - [`constants`] - Board geometry, evaluator weights, search defaults
//! - [`board`] - Squares, colors and the 10x10 grid
//! - [`position`] - Moves, states and the incremental mobility map
//! - [`movegen`] - Legal move generation
//! - [`heuristic`] - Territory/mobility evaluation
//! - [`playout`] - Rollout policies used to score new nodes
//! - [`mcts`] - Tree search with UCB1 and tree reuse across moves
//! - [`config`] - Search configuration
//! - [`protocol`] - Text command loop for driving the engine
//! - [`error`] - Protocol errors
//!
//! ## Example
//!
//! ```
//! use amazons_mcts::board::Color;
//! use amazons_mcts::config::SearchConfig;
//! use amazons_mcts::mcts::{advance_root, initialize_root, tree_search};
//!
//! let mut root = initialize_root(Color::Black);
//! let mut rng = fastrand::Rng::with_seed(1);
//! let config = SearchConfig::default().with_max_iterations(100);
//!
//! let best = tree_search(&mut root, &config, &mut rng).best.unwrap();
//! println!("Black plays {best}");
//!
//! // Keep the searched subtree for White's turn
//! let root = advance_root(root, &best);
//! assert_eq!(root.color, Color::White);
//! ```

pub mod board;
pub mod config;
pub mod constants;
pub mod error;
pub mod heuristic;
pub mod mcts;
pub mod movegen;
pub mod playout;
pub mod position;
pub mod protocol;
