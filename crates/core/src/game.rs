use std::fmt::Debug;
use std::hash::Hash;

use crate::types::{GhostView, Position};

/// Index of an agent in the turn order.
///
/// Agent 0 is the maximizer; agents `1..num_agents` are adversaries and move
/// in ascending order after it, every round.
pub type AgentIndex = usize;

/// The maximizing agent's index.
pub const MAX_AGENT: AgentIndex = 0;

/// A turn-based, perfect-information game played by one maximizer against
/// any number of adversaries.
///
/// The game object holds whatever is shared by every position (board shape,
/// walls, rules); `State` is the immutable per-position data. Search code
/// never mutates a state: every transition goes through [`Game::successor`].
pub trait Game: Clone + Send + Sync {
    /// The game state (e.g., a maze position with food and ghosts)
    type State: Clone + Send;

    /// A game action (e.g., a compass direction)
    type Action: Clone + Copy + Send + Eq + Hash + Debug;

    /// Returns the legal actions for `agent` in generation order.
    ///
    /// An empty vector means the agent cannot move; search treats such a node
    /// as a leaf.
    fn legal_actions(&self, state: &Self::State, agent: AgentIndex) -> Vec<Self::Action>;

    /// Applies `action` for `agent`, returning a new state (immutable operation)
    fn successor(
        &self,
        state: &Self::State,
        agent: AgentIndex,
        action: Self::Action,
    ) -> Self::State;

    /// Total number of agents, including the maximizer (always >= 1)
    fn num_agents(&self, state: &Self::State) -> usize;

    /// Returns true if the maximizer has won
    fn is_win(&self, state: &Self::State) -> bool;

    /// Returns true if the maximizer has lost
    fn is_lose(&self, state: &Self::State) -> bool;

    /// Current game score, the baseline evaluation of a state
    fn score(&self, state: &Self::State) -> f64;

    /// Returns true if the game has ended either way
    fn is_terminal(&self, state: &Self::State) -> bool {
        self.is_win(state) || self.is_lose(state)
    }
}

/// Grid observables used by the heuristic evaluation functions.
pub trait GridGame: Game {
    /// Position of the maximizing agent
    fn agent_position(&self, state: &Self::State) -> Position;

    /// Positions of every remaining food pellet
    fn food(&self, state: &Self::State) -> Vec<Position>;

    /// Number of remaining food pellets
    fn food_count(&self, state: &Self::State) -> usize {
        self.food(state).len()
    }

    /// Position and scared timer of every adversary, in agent order
    fn ghosts(&self, state: &Self::State) -> Vec<GhostView>;

    /// Positions of every remaining capsule
    fn capsules(&self, state: &Self::State) -> Vec<Position>;

    /// Returns true if `action` keeps the agent in place
    fn is_stop(&self, action: Self::Action) -> bool;
}
