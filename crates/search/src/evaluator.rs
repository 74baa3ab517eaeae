//! Evaluation abstraction for tree search.
//!
//! The `Evaluator` trait allows swapping between different leaf scoring
//! strategies:
//! - `ScoreEvaluator` returns the game's own score
//! - `CompositeEvaluator` combines score, food, capsule and ghost distances
//! - `EvaluationFunction` selects one of the above by name

use multiagent_core::{Game, GridGame, MultiAgentError, Result, Value};
use serde::{Deserialize, Serialize};

/// Trait for scoring game positions from the maximizer's point of view.
///
/// Implementations must be pure: the same state always yields the same value.
/// They are called at depth cutoffs and at states where the agent to move has
/// no legal action.
pub trait Evaluator<G: Game> {
    fn evaluate(&self, game: &G, state: &G::State) -> Value;
}

/// Evaluator returning the current game score.
#[derive(Clone, Copy, Debug, Default)]
pub struct ScoreEvaluator;

impl<G: Game> Evaluator<G> for ScoreEvaluator {
    fn evaluate(&self, game: &G, state: &G::State) -> Value {
        Value::from_f64(game.score(state))
    }
}

/// Weights of the composite heuristic.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositeWeights {
    /// Ghost distance beyond which fleeing earns nothing more.
    pub ghost_cap: u32,

    /// Reward per step of distance to the nearest dangerous ghost.
    pub ghost_weight: f64,

    /// Penalty per step of distance to the nearest food.
    pub food_weight: f64,

    /// Penalty per remaining food pellet.
    pub food_count_penalty: f64,

    /// Penalty per remaining capsule.
    pub capsule_penalty: f64,
}

impl Default for CompositeWeights {
    fn default() -> Self {
        Self {
            ghost_cap: 4,
            ghost_weight: 2.0,
            food_weight: 1.5,
            food_count_penalty: 4.0,
            capsule_penalty: 3.5,
        }
    }
}

/// Composite heuristic for grid pursuit games.
///
/// ```text
/// score + min(nearest dangerous ghost, cap) * ghost_weight
///       - nearest food * food_weight
///       - food left * food_count_penalty
///       - capsules left * capsule_penalty
/// ```
///
/// Won and lost states short-circuit to the sentinels before any food or
/// ghost is inspected. Scared ghosts are not dangerous; with no dangerous
/// ghost on the board the ghost term sits at the cap.
#[derive(Clone, Debug, Default)]
pub struct CompositeEvaluator {
    weights: CompositeWeights,
}

impl CompositeEvaluator {
    pub fn new(weights: CompositeWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &CompositeWeights {
        &self.weights
    }
}

impl<G: GridGame> Evaluator<G> for CompositeEvaluator {
    fn evaluate(&self, game: &G, state: &G::State) -> Value {
        if game.is_win(state) {
            return Value::WIN;
        }
        if game.is_lose(state) {
            return Value::LOSS;
        }

        let w = &self.weights;
        let position = game.agent_position(state);
        let food = game.food(state);
        let capsules = game.capsules(state);

        let nearest_ghost = game
            .ghosts(state)
            .iter()
            .filter(|g| !g.is_scared())
            .map(|g| position.manhattan(g.position))
            .min()
            .map_or(w.ghost_cap, |d| d.min(w.ghost_cap));
        let nearest_food = position.nearest(&food).unwrap_or(0);

        let value = game.score(state) + f64::from(nearest_ghost) * w.ghost_weight
            - f64::from(nearest_food) * w.food_weight
            - food.len() as f64 * w.food_count_penalty
            - capsules.len() as f64 * w.capsule_penalty;
        Value::from_f64(value)
    }
}

/// Evaluation function selected by name.
#[derive(Clone, Debug)]
pub enum EvaluationFunction {
    /// The game score.
    Score(ScoreEvaluator),
    /// The composite grid heuristic.
    Better(CompositeEvaluator),
}

impl EvaluationFunction {
    /// Names accepted by [`EvaluationFunction::from_name`].
    pub const NAMES: [&'static str; 4] = [
        "score",
        "scoreEvaluationFunction",
        "better",
        "betterEvaluationFunction",
    ];

    /// Look up an evaluation function by name, using default weights.
    ///
    /// # Errors
    /// Returns `MultiAgentError::UnknownEvaluationFunction` for any name not
    /// listed in [`EvaluationFunction::NAMES`].
    pub fn from_name(name: &str) -> Result<Self> {
        Self::with_weights(name, CompositeWeights::default())
    }

    /// Look up an evaluation function by name, using `weights` if it is the
    /// composite heuristic.
    pub fn with_weights(name: &str, weights: CompositeWeights) -> Result<Self> {
        match name {
            "score" | "scoreEvaluationFunction" => Ok(Self::Score(ScoreEvaluator)),
            "better" | "betterEvaluationFunction" => {
                Ok(Self::Better(CompositeEvaluator::new(weights)))
            }
            _ => Err(MultiAgentError::UnknownEvaluationFunction(name.to_string())),
        }
    }

    /// Canonical short name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Score(_) => "score",
            Self::Better(_) => "better",
        }
    }
}

impl<G: GridGame> Evaluator<G> for EvaluationFunction {
    fn evaluate(&self, game: &G, state: &G::State) -> Value {
        match self {
            Self::Score(e) => e.evaluate(game, state),
            Self::Better(e) => e.evaluate(game, state),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::{Pacman, PacmanState};

    fn load(layout: &str) -> (Pacman, PacmanState) {
        let game = Pacman::parse(layout).unwrap();
        let state = game.initial_state();
        (game, state)
    }

    fn better(layout: &str) -> Value {
        let (game, state) = load(layout);
        CompositeEvaluator::default().evaluate(&game, &state)
    }

    #[test]
    fn test_score_evaluator() {
        let (game, state) = load("%%%%%\n%P.G%\n%%%%%");
        assert_eq!(ScoreEvaluator.evaluate(&game, &state), Value::ZERO);
    }

    #[test]
    fn test_composite_closer_food_scores_higher() {
        let near = better(
            "%%%%%%%%%%%%\n\
             %P  .      %\n\
             %          %\n\
             %         G%\n\
             %%%%%%%%%%%%",
        );
        let far = better(
            "%%%%%%%%%%%%\n\
             %P    .    %\n\
             %          %\n\
             %         G%\n\
             %%%%%%%%%%%%",
        );
        assert!(near > far, "near {} should beat far {}", near, far);
        assert_eq!(near.get() - far.get(), 2.0 * 1.5);
    }

    #[test]
    fn test_composite_farther_ghost_scores_higher() {
        let close = better(
            "%%%%%%%%%\n\
             %.  PG  %\n\
             %%%%%%%%%",
        );
        let farther = better(
            "%%%%%%%%%\n\
             %.  P  G%\n\
             %%%%%%%%%",
        );
        assert!(farther > close, "farther {} should beat close {}", farther, close);
        assert_eq!(farther.get() - close.get(), 2.0 * 2.0);
    }

    #[test]
    fn test_composite_ghost_term_capped() {
        let at_cap = better(
            "%%%%%%%%%%%%\n\
             %.P   G    %\n\
             %%%%%%%%%%%%",
        );
        let beyond_cap = better(
            "%%%%%%%%%%%%\n\
             %.P       G%\n\
             %%%%%%%%%%%%",
        );
        assert_eq!(at_cap, beyond_cap);
    }

    #[test]
    fn test_composite_counts_food_and_capsules() {
        let fewer = better("%%%%%%%\n%P.  G%\n%%%%%%%");
        let more_food = better("%%%%%%%\n%P.. G%\n%%%%%%%");
        let with_capsule = better("%%%%%%%\n%P. oG%\n%%%%%%%");
        assert!(fewer > more_food);
        assert!(fewer > with_capsule);
    }

    #[test]
    fn test_composite_terminal_sentinels() {
        use multiagent_core::{Direction, Game};

        let (game, state) = load("%%%%%\n%P.G%\n%%%%%");
        let won = game.successor(&state, 0, Direction::East);
        assert!(game.is_win(&won));
        assert_eq!(CompositeEvaluator::default().evaluate(&game, &won), Value::WIN);

        let (game, state) = load("%%%%%\n%PG.%\n%%%%%");
        let lost = game.successor(&state, 0, Direction::East);
        assert!(game.is_lose(&lost));
        assert_eq!(CompositeEvaluator::default().evaluate(&game, &lost), Value::LOSS);
    }

    #[test]
    fn test_evaluation_function_registry() {
        for name in EvaluationFunction::NAMES {
            assert!(EvaluationFunction::from_name(name).is_ok(), "{}", name);
        }
        assert_eq!(EvaluationFunction::from_name("better").unwrap().name(), "better");
        assert_eq!(
            EvaluationFunction::from_name("nope").unwrap_err(),
            MultiAgentError::UnknownEvaluationFunction("nope".to_string())
        );
    }

    #[test]
    fn test_custom_weights_apply() {
        let weights = CompositeWeights {
            food_count_penalty: 0.0,
            ..Default::default()
        };
        let f = EvaluationFunction::with_weights("better", weights.clone()).unwrap();
        match f {
            EvaluationFunction::Better(e) => assert_eq!(e.weights(), &weights),
            other => panic!("unexpected {:?}", other),
        }
    }
}
