//! Game implementations for exercising the search agents.
//!
//! - [`tree`]: explicit trees with exact leaf values, for checking search
//!   semantics node by node
//! - [`pacman`]: a maze pursuit game with any number of ghosts

pub mod layouts;
pub mod pacman;
pub mod tree;

pub use pacman::{GhostState, Pacman, PacmanState};
pub use tree::{GameTree, Node, TreeAction, TreeState};
