//! Agents: anything that picks an action for a given agent index each turn.

use log::debug;
use multiagent_core::{AgentIndex, Game, GridGame, MultiAgentError, Result, MAX_AGENT};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::{SearchConfig, Strategy};
use crate::evaluator::{EvaluationFunction, Evaluator};
use crate::reflex::ReflexPolicy;
use crate::search::{SearchEngine, SearchResult};

/// A participant in the control loop.
pub trait Agent<G: Game> {
    /// Pick the action `agent` plays in `state`, or `None` if it has no move.
    fn get_action(&mut self, game: &G, state: &G::State, agent: AgentIndex) -> Option<G::Action>;
}

/// Tree-search agent for the maximizer.
///
/// Strategy, depth and evaluation function are fixed at construction; each
/// call to [`SearchAgent::choose_action`] runs one independent search.
#[derive(Clone, Debug)]
pub struct SearchAgent<E> {
    strategy: Strategy,
    depth: usize,
    evaluator: E,
}

impl<E> SearchAgent<E> {
    /// Create a new agent searching `depth` full rounds.
    ///
    /// # Errors
    /// Returns `MultiAgentError::InvalidDepth` if `depth` is zero.
    pub fn new(strategy: Strategy, evaluator: E, depth: usize) -> Result<Self> {
        if depth == 0 {
            return Err(MultiAgentError::InvalidDepth(depth));
        }
        Ok(Self {
            strategy,
            depth,
            evaluator,
        })
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn evaluator(&self) -> &E {
        &self.evaluator
    }

    /// Run a full search from `state` and return value, action and counters.
    pub fn search<G>(&self, game: &G, state: &G::State) -> SearchResult<G::Action>
    where
        G: Game,
        E: Evaluator<G>,
    {
        SearchEngine::new(game, &self.evaluator, self.strategy, self.depth).search(state)
    }

    /// The maximizer's action for this turn, `None` if it has no legal move.
    pub fn choose_action<G>(&self, game: &G, state: &G::State) -> Option<G::Action>
    where
        G: Game,
        E: Evaluator<G>,
    {
        let result = self.search(game, state);
        debug!(
            "{} depth {}: {:?} value {} ({} expanded, {} evaluated, {} cutoffs)",
            self.strategy,
            self.depth,
            result.action,
            result.value,
            result.stats.nodes_expanded,
            result.stats.evaluations,
            result.stats.cutoffs
        );
        result.action
    }
}

impl SearchAgent<EvaluationFunction> {
    /// Build an agent from a configuration, resolving the evaluation function
    /// by name.
    ///
    /// # Errors
    /// Returns `MultiAgentError::UnknownEvaluationFunction` for an unknown
    /// name and `MultiAgentError::InvalidDepth` for a zero depth.
    pub fn from_config(strategy: Strategy, config: &SearchConfig) -> Result<Self> {
        config.validate()?;
        let evaluator = EvaluationFunction::with_weights(&config.evaluation, config.composite.clone())?;
        Self::new(strategy, evaluator, config.depth)
    }
}

impl<G, E> Agent<G> for SearchAgent<E>
where
    G: Game,
    E: Evaluator<G>,
{
    fn get_action(&mut self, game: &G, state: &G::State, agent: AgentIndex) -> Option<G::Action> {
        debug_assert_eq!(agent, MAX_AGENT, "search agents play the maximizer");
        self.choose_action(game, state)
    }
}

impl<G: GridGame, R: Rng> Agent<G> for ReflexPolicy<R> {
    fn get_action(&mut self, game: &G, state: &G::State, agent: AgentIndex) -> Option<G::Action> {
        debug_assert_eq!(agent, MAX_AGENT, "reflex policy plays the maximizer");
        self.choose_action(game, state)
    }
}

/// Agent choosing uniformly among its legal actions, for any agent index.
///
/// This is exactly the adversary that expectimax assumes.
pub struct RandomAgent<R: Rng> {
    rng: R,
}

impl<R: Rng> RandomAgent<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<G: Game, R: Rng> Agent<G> for RandomAgent<R> {
    fn get_action(&mut self, game: &G, state: &G::State, agent: AgentIndex) -> Option<G::Action> {
        game.legal_actions(state, agent).choose(&mut self.rng).copied()
    }
}
