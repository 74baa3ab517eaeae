//! Search agent configuration.
//!
//! These parameters are fixed when an agent is built and read-only while it
//! searches.

use std::fmt;
use std::str::FromStr;

use multiagent_core::{MultiAgentError, Result};
use serde::{Deserialize, Serialize};

use crate::evaluator::CompositeWeights;

/// Default search depth, in full rounds.
pub const DEFAULT_DEPTH: usize = 2;

/// Default evaluation function name.
pub const DEFAULT_EVALUATION: &str = "score";

/// Tree-search strategy used by a [`SearchAgent`](crate::SearchAgent).
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Adversaries minimize, every branch explored.
    Minimax,
    /// Minimax with alpha-beta pruning; picks the same action as `Minimax`.
    AlphaBeta,
    /// Adversaries move uniformly at random; their nodes average.
    Expectimax,
}

impl Strategy {
    pub const ALL: [Strategy; 3] = [Strategy::Minimax, Strategy::AlphaBeta, Strategy::Expectimax];
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Strategy::Minimax => "minimax",
            Strategy::AlphaBeta => "alphabeta",
            Strategy::Expectimax => "expectimax",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for Strategy {
    type Err = MultiAgentError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "minimax" | "minimaxagent" => Ok(Strategy::Minimax),
            "alphabeta" | "alpha-beta" | "alphabetaagent" => Ok(Strategy::AlphaBeta),
            "expectimax" | "expectimaxagent" => Ok(Strategy::Expectimax),
            _ => Err(MultiAgentError::UnknownStrategy(s.to_string())),
        }
    }
}

/// Search agent configuration parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Depth limit in full rounds (every agent moves once per round).
    pub depth: usize,

    /// Name of the evaluation function applied at leaves.
    /// See [`EvaluationFunction::from_name`](crate::EvaluationFunction::from_name).
    pub evaluation: String,

    /// Weights used when `evaluation` selects the composite heuristic.
    pub composite: CompositeWeights,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            depth: DEFAULT_DEPTH,
            evaluation: DEFAULT_EVALUATION.to_string(),
            composite: CompositeWeights::default(),
        }
    }
}

impl SearchConfig {
    /// Create a config with the named evaluation function and depth.
    pub fn new(evaluation: impl Into<String>, depth: usize) -> Self {
        Self {
            depth,
            evaluation: evaluation.into(),
            ..Default::default()
        }
    }

    /// Create a default config with the specified depth.
    pub fn with_depth(depth: usize) -> Self {
        Self {
            depth,
            ..Default::default()
        }
    }

    /// Check the depth limit.
    ///
    /// # Errors
    /// Returns `MultiAgentError::InvalidDepth` for a zero depth.
    pub fn validate(&self) -> Result<()> {
        if self.depth == 0 {
            return Err(MultiAgentError::InvalidDepth(self.depth));
        }
        Ok(())
    }
}
