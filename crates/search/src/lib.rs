//! Adversarial tree search for one maximizer against many adversaries.
//!
//! This crate provides depth-limited search over any game implementing the
//! `multiagent_core::Game` trait, where agent 0 maximizes and every other
//! agent moves after it in index order.
//!
//! # Features
//!
//! - **Minimax**: adversaries minimize; depth counted in full rounds
//! - **Alpha-beta**: pruned minimax that picks the same action as minimax
//! - **Expectimax**: adversaries modeled as uniformly random movers
//! - **Evaluator abstraction**: game score, composite grid heuristic, or any
//!   custom `Evaluator`
//! - **Reflex baseline**: one-ply greedy policy with random tie-breaking
//!
//! # Example
//!
//! ```
//! use multiagent_search::{games::{layouts, Pacman}, SearchAgent, SearchConfig, Strategy};
//!
//! let game = Pacman::parse(layouts::MINIMAX_CLASSIC).unwrap();
//! let state = game.initial_state();
//!
//! let config = SearchConfig::new("better", 2);
//! let agent = SearchAgent::from_config(Strategy::AlphaBeta, &config).unwrap();
//!
//! let result = agent.search(&game, &state);
//! println!("Best action: {:?}", result.action);
//! println!("Root value: {}", result.value);
//! assert!(result.action.is_some());
//! ```

pub mod agent;
pub mod config;
pub mod evaluator;
pub mod games;
pub mod reflex;
pub mod search;

pub use agent::{Agent, RandomAgent, SearchAgent};
pub use config::{SearchConfig, Strategy};
pub use evaluator::{
    CompositeEvaluator, CompositeWeights, EvaluationFunction, Evaluator, ScoreEvaluator,
};
pub use reflex::{ReflexPolicy, ReflexWeights};
pub use search::{SearchEngine, SearchResult, SearchStats};
