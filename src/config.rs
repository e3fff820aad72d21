//! Search configuration.
//!
//! Defaults come from [`crate::constants`]; the binary overrides them from
//! command-line flags.

use std::time::Duration;

use clap::ValueEnum;

use crate::constants::{DEFAULT_EXPLORATION, DEFAULT_TIME_MS};

/// How a freshly expanded node is scored.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum RolloutPolicy {
    /// Territory/mobility evaluation squashed through a sigmoid.
    #[default]
    Heuristic,
    /// Uniformly random play until one side cannot move.
    Random,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SearchConfig {
    /// Wall-clock budget for one search.
    pub time_budget: Duration,
    /// UCB1 exploration coefficient.
    pub exploration: f64,
    /// Optional cap on iterations, checked alongside the deadline.
    pub max_iterations: Option<usize>,
    pub rollout: RolloutPolicy,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            time_budget: Duration::from_millis(DEFAULT_TIME_MS),
            exploration: DEFAULT_EXPLORATION,
            max_iterations: None,
            rollout: RolloutPolicy::default(),
        }
    }
}

impl SearchConfig {
    pub fn with_time_ms(mut self, ms: u64) -> Self {
        self.time_budget = Duration::from_millis(ms);
        self
    }

    pub fn with_exploration(mut self, exploration: f64) -> Self {
        self.exploration = exploration;
        self
    }

    pub fn with_max_iterations(mut self, iterations: usize) -> Self {
        self.max_iterations = Some(iterations);
        self
    }

    pub fn with_rollout(mut self, rollout: RolloutPolicy) -> Self {
        self.rollout = rollout;
        self
    }
}
