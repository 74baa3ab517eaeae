//! Multi-agent core - game abstractions and common types
//!
//! This crate provides the [`Game`] trait that any turn-based game must
//! implement to be searched by `multiagent-search`, plus the value and grid
//! types shared by search and evaluation.
//!
//! # Types
//!
//! - [`Game`] - Trait for game implementations
//! - [`GridGame`] - Grid observables used by heuristic evaluation
//! - [`Value`] - Totally ordered search value with win/loss sentinels
//! - [`Position`] - Grid coordinate with Manhattan distance
//! - [`Direction`] - Compass moves plus `Stop`

mod error;
mod game;
mod types;

pub use error::{MultiAgentError, Result};
pub use game::{AgentIndex, Game, GridGame, MAX_AGENT};
pub use types::{Direction, GhostView, Position, Value};
