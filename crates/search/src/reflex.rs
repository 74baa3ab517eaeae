//! One-ply greedy policy.
//!
//! Scores each immediate successor with a hand-tuned heuristic and picks
//! uniformly among the best. No lookahead, no adversary model; useful as a
//! baseline for the tree-search agents.

use multiagent_core::{Game, GridGame, Value, MAX_AGENT};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Weights of the reflex heuristic.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReflexWeights {
    /// Per-ghost distance cap; farther ghosts earn nothing more.
    pub ghost_cap: u32,
    pub ghost_weight: f64,
    /// Penalty per step to the nearest remaining food.
    pub food_weight: f64,
    /// Reward per pellet eaten by the move.
    pub food_eaten_reward: f64,
    /// Reward for stepping onto a capsule.
    pub capsule_bonus: f64,
    /// Penalty for standing still.
    pub stop_penalty: f64,
}

impl Default for ReflexWeights {
    fn default() -> Self {
        Self {
            ghost_cap: 3,
            ghost_weight: 3.0,
            food_weight: 1.0,
            food_eaten_reward: 9.0,
            capsule_bonus: 20.0,
            stop_penalty: 3.0,
        }
    }
}

/// Greedy single-ply policy for the maximizing agent.
///
/// The random number generator is only consulted to break ties between
/// equally scored actions.
pub struct ReflexPolicy<R: Rng> {
    weights: ReflexWeights,
    rng: R,
}

impl<R: Rng> ReflexPolicy<R> {
    pub fn new(rng: R) -> Self {
        Self::with_weights(ReflexWeights::default(), rng)
    }

    pub fn with_weights(weights: ReflexWeights, rng: R) -> Self {
        Self { weights, rng }
    }

    pub fn weights(&self) -> &ReflexWeights {
        &self.weights
    }

    /// Score taking `action` from `state`.
    pub fn score_action<G: GridGame>(&self, game: &G, state: &G::State, action: G::Action) -> Value {
        let next = game.successor(state, MAX_AGENT, action);
        if game.is_win(&next) {
            return Value::WIN;
        }

        let w = &self.weights;
        let position = game.agent_position(&next);
        let mut value = game.score(&next);

        for ghost in game.ghosts(&next) {
            let distance = position.manhattan(ghost.position).min(w.ghost_cap);
            value += f64::from(distance) * w.ghost_weight;
        }

        let food = game.food(&next);
        if let Some(nearest) = position.nearest(&food) {
            value -= f64::from(nearest) * w.food_weight;
        }

        let eaten = game.food_count(state).saturating_sub(food.len());
        value += eaten as f64 * w.food_eaten_reward;

        if game.capsules(state).contains(&position) {
            value += w.capsule_bonus;
        }
        if game.is_stop(action) {
            value -= w.stop_penalty;
        }

        Value::from_f64(value)
    }

    /// Every legal action sharing the top score, in generation order.
    pub fn best_actions<G: GridGame>(&self, game: &G, state: &G::State) -> Vec<G::Action> {
        let scored: Vec<(G::Action, Value)> = game
            .legal_actions(state, MAX_AGENT)
            .into_iter()
            .map(|a| (a, self.score_action(game, state, a)))
            .collect();
        let Some(best) = scored.iter().map(|(_, v)| *v).max() else {
            return Vec::new();
        };
        scored
            .into_iter()
            .filter(|(_, v)| *v == best)
            .map(|(a, _)| a)
            .collect()
    }

    /// Pick uniformly at random among the best actions.
    pub fn choose_action<G: GridGame>(&mut self, game: &G, state: &G::State) -> Option<G::Action> {
        let best = self.best_actions(game, state);
        best.choose(&mut self.rng).copied()
    }
}
