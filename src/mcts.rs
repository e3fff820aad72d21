//! Monte Carlo Tree Search (MCTS) with UCB1 selection.
//!
//! Each iteration:
//! - descends from the root along the highest-UCB children, stopping at the
//!   first node that still has untried moves or has no children at all
//! - expands one random untried move there and scores the new child with a
//!   rollout (or scores a terminal leaf as a win for the player who reached it)
//! - walks the recorded path back, flipping the reward at every ply
//!
//! Nodes own their children. The parent link is the descent path itself: a
//! list of child indices from the root, which is all backpropagation and UCB
//! need. Re-rooting moves one child out of the old root and drops the rest.

use std::time::{Duration, Instant};

use fastrand::Rng;
use log::{debug, info, warn};

use crate::board::Color;
use crate::config::SearchConfig;
use crate::constants::{TERMINAL_REWARD, UNVISITED_UCB};
use crate::movegen::generate;
use crate::playout::rollout;
use crate::position::{Move, State};

/// Expansion state of a node.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NodePhase {
    /// No children yet.
    Unexpanded,
    /// Some children exist and some moves are still untried.
    PartiallyExpanded,
    /// Every legal move has a child.
    FullyExpanded,
    /// The side to move has no legal move and has lost.
    Terminal,
}

/// A node in the search tree.
pub struct TreeNode {
    /// Position at this node
    pub state: State,
    /// Side to move
    pub color: Color,
    /// Move that produced this node (None for a root)
    pub mv: Option<Move>,
    /// Visit count
    pub visits: u32,
    /// Cumulative reward for the player who moved into this node
    pub reward: f64,
    /// Expanded children
    pub children: Vec<TreeNode>,
    /// Legal moves without a child yet; generated on first use.
    /// `Some(empty)` once every move has a child (or none exist).
    untried: Option<Vec<Move>>,
}

impl Default for TreeNode {
    fn default() -> Self {
        initialize_root(Color::Black)
    }
}

impl TreeNode {
    /// Create a root for `state` with `color` to move.
    pub fn new_root(state: State, color: Color) -> Self {
        Self {
            state,
            color,
            mv: None,
            visits: 0,
            reward: 0.0,
            children: Vec::new(),
            untried: None,
        }
    }

    /// Create the child reached by playing `mv` from `parent`.
    fn new_child(parent: &TreeNode, mv: Move) -> Self {
        Self {
            state: parent.state.apply_move(&mv),
            color: parent.color.opposite(),
            mv: Some(mv),
            visits: 0,
            reward: 0.0,
            children: Vec::new(),
            untried: None,
        }
    }

    fn untried_moves(&mut self) -> &mut Vec<Move> {
        let (state, color) = (&self.state, self.color);
        self.untried.get_or_insert_with(|| generate(state, color))
    }

    /// True if neither untried moves nor children remain.
    pub fn is_terminal(&mut self) -> bool {
        self.untried_moves().is_empty() && self.children.is_empty()
    }

    pub fn has_unexpanded_moves(&mut self) -> bool {
        !self.untried_moves().is_empty()
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Number of legal moves that have no child yet.
    pub fn unexpanded_count(&mut self) -> usize {
        self.untried_moves().len()
    }

    pub fn phase(&mut self) -> NodePhase {
        match (self.has_unexpanded_moves(), self.has_children()) {
            (false, false) => NodePhase::Terminal,
            (true, false) => NodePhase::Unexpanded,
            (true, true) => NodePhase::PartiallyExpanded,
            (false, true) => NodePhase::FullyExpanded,
        }
    }

    /// Create a child for every untried move.
    pub fn expand_all_children(&mut self) {
        let moves = std::mem::take(self.untried_moves());
        let parent = &*self;
        let new_children: Vec<TreeNode> = moves.into_iter().map(|mv| TreeNode::new_child(parent, mv)).collect();
        self.children.extend(new_children);
    }

    /// Expand one uniformly random untried move and return the new child's index.
    ///
    /// Returns `None` if every move already has a child.
    pub fn expand_one_random_child(&mut self, rng: &mut Rng) -> Option<usize> {
        let untried = self.untried_moves();
        if untried.is_empty() {
            return None;
        }
        let pick = rng.usize(..untried.len());
        let mv = untried.swap_remove(pick);
        let child = TreeNode::new_child(self, mv);
        self.children.push(child);
        Some(self.children.len() - 1)
    }

    /// UCB1 score given the parent's visit count.
    pub fn ucb_score(&self, parent_visits: u32, exploration: f64) -> f64 {
        if self.visits == 0 {
            return UNVISITED_UCB;
        }
        let n = self.visits as f64;
        self.reward / n + exploration * ((parent_visits as f64).ln() / n).sqrt()
    }

    /// Average reward, or 0 for an unvisited node.
    #[inline]
    pub fn win_rate(&self) -> f64 {
        if self.visits > 0 {
            self.reward / self.visits as f64
        } else {
            0.0
        }
    }
}

/// Build the root for the standard opening with `color` to move.
pub fn initialize_root(color: Color) -> TreeNode {
    TreeNode::new_root(State::new(), color)
}

/// Counters gathered during one search.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SearchStats {
    pub iterations: usize,
    /// Deepest node evaluated, in plies below the root
    pub max_depth: usize,
    pub elapsed: Duration,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SearchResult {
    /// None only if the side to move at the root has no legal move
    pub best: Option<Move>,
    pub stats: SearchStats,
}

/// Index of the child with the highest UCB score; ties keep the first.
fn most_urgent(node: &TreeNode, exploration: f64) -> usize {
    let mut best = 0;
    let mut best_score = f64::NEG_INFINITY;
    for (i, child) in node.children.iter().enumerate() {
        let score = child.ucb_score(node.visits, exploration);
        if score > best_score {
            best_score = score;
            best = i;
        }
    }
    best
}

/// Descend to a frontier node, expand and score it.
///
/// Returns the path of child indices to the scored node and its reward.
fn tree_descend(root: &mut TreeNode, config: &SearchConfig, rng: &mut Rng) -> (Vec<usize>, f64) {
    let mut path = Vec::new();
    let mut node = root;

    while !node.has_unexpanded_moves() && node.has_children() {
        let idx = most_urgent(node, config.exploration);
        path.push(idx);
        node = &mut node.children[idx];
    }

    match node.expand_one_random_child(rng) {
        Some(idx) => {
            path.push(idx);
            let child = &node.children[idx];
            let reward = rollout(&child.state, child.color, config.rollout, rng);
            (path, reward)
        }
        None => (path, TERMINAL_REWARD),
    }
}

/// Credit `result` to the node at the end of `path` and its ancestors,
/// flipping it at every ply.
fn tree_update(root: &mut TreeNode, path: &[usize], result: f64) {
    let mut score = if path.len() % 2 == 0 { result } else { 1.0 - result };
    let mut node = root;
    node.visits += 1;
    node.reward += score;

    for &idx in path {
        score = 1.0 - score;
        node = &mut node.children[idx];
        node.visits += 1;
        node.reward += score;
    }
}

/// Run MCTS from `root` until the time budget (or iteration cap) runs out.
///
/// At least one iteration runs on a non-terminal root, so a move is always
/// returned when one exists. The best move is the child with the highest
/// average reward.
pub fn tree_search(root: &mut TreeNode, config: &SearchConfig, rng: &mut Rng) -> SearchResult {
    let start = Instant::now();
    let mut stats = SearchStats::default();

    if root.is_terminal() {
        info!("{} to move has no legal move", root.color);
        stats.elapsed = start.elapsed();
        return SearchResult { best: None, stats };
    }

    loop {
        let (path, result) = tree_descend(root, config, rng);
        stats.max_depth = stats.max_depth.max(path.len());
        tree_update(root, &path, result);
        stats.iterations += 1;

        if start.elapsed() >= config.time_budget
            || config.max_iterations.is_some_and(|cap| stats.iterations >= cap)
        {
            break;
        }
    }
    stats.elapsed = start.elapsed();

    let best = best_child(root);
    if let Some(child) = best {
        info!(
            "{} iterations in {:?}, max depth {}, best {} wr={:.3} v={}",
            stats.iterations,
            stats.elapsed,
            stats.max_depth,
            root.children[child].mv.map(|m| m.to_string()).unwrap_or_default(),
            root.children[child].win_rate(),
            root.children[child].visits
        );
    }
    SearchResult {
        best: best.and_then(|i| root.children[i].mv),
        stats,
    }
}

/// Index of the child with the highest average reward; ties keep the first.
fn best_child(root: &TreeNode) -> Option<usize> {
    let mut best = None;
    let mut best_rate = f64::NEG_INFINITY;
    for (i, child) in root.children.iter().enumerate() {
        let rate = child.win_rate();
        if rate > best_rate {
            best_rate = rate;
            best = Some(i);
        }
    }
    best
}

/// Search for `time_ms` milliseconds and return the move to play.
pub fn choose_move(root: &mut TreeNode, time_ms: u64, exploration: f64, rng: &mut Rng) -> Option<Move> {
    let config = SearchConfig::default()
        .with_time_ms(time_ms)
        .with_exploration(exploration);
    tree_search(root, &config, rng).best
}

/// Move the root down to the child matching `mv`, keeping its statistics.
///
/// If no child matches, the resulting position is built directly and the
/// search starts over from a fresh root.
pub fn advance_root(mut root: TreeNode, mv: &Move) -> TreeNode {
    root.expand_all_children();
    match root.children.iter().position(|c| c.mv.as_ref() == Some(mv)) {
        Some(i) => {
            let mut child = root.children.swap_remove(i);
            child.mv = None;
            debug!("advanced root to {mv} (v={} q={:.2})", child.visits, child.reward);
            child
        }
        None => {
            warn!("move {mv} not among {} children; rebuilding root", root.children.len());
            TreeNode::new_root(root.state.apply_move(mv), root.color.opposite())
        }
    }
}

/// Log statistics for the root's children.
pub fn dump_children(root: &TreeNode) {
    for child in &root.children {
        debug!(
            "move {} v={} q={:.2} wr={:.3}",
            child.mv.map(|m| m.to_string()).unwrap_or_default(),
            child.visits,
            child.reward,
            child.win_rate()
        );
    }
}
