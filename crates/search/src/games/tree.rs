//! Explicit game trees for checking search semantics.
//!
//! Every node carries a score (what the evaluation sees at a cutoff) and its
//! children in action order. The turn order is implied by the shape: children
//! of a node belong to the next agent in round-robin order.

use std::ops::RangeInclusive;
use std::sync::Arc;

use multiagent_core::{AgentIndex, Game};
use rand::Rng;

/// A node of an explicit game tree.
#[derive(Debug)]
pub struct Node {
    value: f64,
    outcome: Option<Outcome>,
    children: Vec<Arc<Node>>,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Outcome {
    Win,
    Lose,
}

impl Node {
    /// A node without children scoring `value`.
    pub fn leaf(value: f64) -> Self {
        Self::branch_valued(value, Vec::new())
    }

    /// An inner node scoring 0 at a cutoff.
    pub fn branch(children: Vec<Node>) -> Self {
        Self::branch_valued(0.0, children)
    }

    /// An inner node scoring `value` at a cutoff.
    pub fn branch_valued(value: f64, children: Vec<Node>) -> Self {
        Self {
            value,
            outcome: None,
            children: children.into_iter().map(Arc::new).collect(),
        }
    }

    /// A won terminal node.
    pub fn win() -> Self {
        Self {
            value: f64::INFINITY,
            outcome: Some(Outcome::Win),
            children: Vec::new(),
        }
    }

    /// A lost terminal node.
    pub fn lose() -> Self {
        Self {
            value: f64::NEG_INFINITY,
            outcome: Some(Outcome::Lose),
            children: Vec::new(),
        }
    }

    /// A random tree `plies` levels deep.
    ///
    /// Inner nodes get a branching factor drawn from `branching` (a zero
    /// lower bound produces early dead ends) and every node an integer score
    /// from `values`, so equal values are common.
    pub fn random<R: Rng>(
        rng: &mut R,
        plies: usize,
        branching: RangeInclusive<usize>,
        values: RangeInclusive<i32>,
    ) -> Self {
        let value = f64::from(rng.gen_range(values.clone()));
        if plies == 0 {
            return Self::leaf(value);
        }
        let width = rng.gen_range(branching.clone());
        let children = (0..width)
            .map(|_| Self::random(rng, plies - 1, branching.clone(), values.clone()))
            .collect();
        Self::branch_valued(value, children)
    }

    /// Number of nodes in this subtree.
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(|c| c.size()).sum::<usize>()
    }
}

/// Position in a tree: a shared pointer to the current node.
#[derive(Clone, Debug)]
pub struct TreeState(Arc<Node>);

impl TreeState {
    pub fn node(&self) -> &Node {
        &self.0
    }
}

/// Index of the child to move to.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct TreeAction(pub usize);

/// A game played on a fixed tree by `num_agents` agents.
#[derive(Clone, Debug)]
pub struct GameTree {
    num_agents: usize,
    root: Arc<Node>,
}

impl GameTree {
    pub fn new(num_agents: usize, root: Node) -> Self {
        Self {
            num_agents: num_agents.max(1),
            root: Arc::new(root),
        }
    }

    pub fn root(&self) -> TreeState {
        TreeState(Arc::clone(&self.root))
    }
}

impl Game for GameTree {
    type State = TreeState;
    type Action = TreeAction;

    fn legal_actions(&self, state: &Self::State, _agent: AgentIndex) -> Vec<Self::Action> {
        if state.0.outcome.is_some() {
            return Vec::new();
        }
        (0..state.0.children.len()).map(TreeAction).collect()
    }

    fn successor(
        &self,
        state: &Self::State,
        _agent: AgentIndex,
        action: Self::Action,
    ) -> Self::State {
        TreeState(Arc::clone(&state.0.children[action.0]))
    }

    fn num_agents(&self, _state: &Self::State) -> usize {
        self.num_agents
    }

    fn is_win(&self, state: &Self::State) -> bool {
        state.0.outcome == Some(Outcome::Win)
    }

    fn is_lose(&self, state: &Self::State) -> bool {
        state.0.outcome == Some(Outcome::Lose)
    }

    fn score(&self, state: &Self::State) -> f64 {
        state.0.value
    }
}
