//! Depth-limited adversarial tree search.
//!
//! One maximizer (agent 0) moves first in every round, then each adversary in
//! ascending index order. Depth counts full rounds: the depth limit is checked
//! only at the maximizer's nodes, and the depth grows by one each time the
//! last adversary has moved.
//!
//! All three strategies share one traversal:
//! - `Minimax`: adversary nodes take the minimum child value
//! - `AlphaBeta`: as minimax, with (alpha, beta) bounds threaded down each path
//! - `Expectimax`: adversary nodes average their children (uniform play)

use log::trace;
use multiagent_core::{AgentIndex, Game, Value, MAX_AGENT};

use crate::config::Strategy;
use crate::evaluator::Evaluator;

/// Node counters collected during one search.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Nodes whose legal actions were generated and explored.
    pub nodes_expanded: usize,

    /// Calls to the evaluation function.
    pub evaluations: usize,

    /// Alpha or beta cutoffs taken (alpha-beta only).
    pub cutoffs: usize,
}

/// Result of a search from the root.
#[derive(Clone, Debug)]
pub struct SearchResult<A> {
    /// Backed-up value of the root.
    pub value: Value,

    /// Chosen maximizer action, `None` if the root is a leaf.
    pub action: Option<A>,

    /// Work done by the search.
    pub stats: SearchStats,
}

/// Value of a node plus the action that achieved it, if it was a decision node.
type Scored<A> = (Value, Option<A>);

/// Pruning bounds for alpha-beta.
///
/// `alpha` is the best value the maximizer can already guarantee on the
/// current path, `beta` the best the adversaries can guarantee. Passed by
/// value, so siblings never see each other's updates.
#[derive(Clone, Copy, Debug)]
struct Window {
    alpha: Value,
    beta: Value,
}

impl Window {
    const OPEN: Self = Self {
        alpha: Value::LOSS,
        beta: Value::WIN,
    };
}

/// Adversarial search over a [`Game`], scoring leaves with an [`Evaluator`].
///
/// The engine is single-use per root: [`SearchEngine::search`] resets the
/// statistics and the agent count before every run.
pub struct SearchEngine<'a, G: Game, E: Evaluator<G>> {
    game: &'a G,
    evaluator: &'a E,
    strategy: Strategy,
    max_depth: usize,
    num_agents: usize,
    stats: SearchStats,
}

impl<'a, G, E> SearchEngine<'a, G, E>
where
    G: Game,
    E: Evaluator<G>,
{
    /// Create a new engine searching `max_depth` full rounds.
    pub fn new(game: &'a G, evaluator: &'a E, strategy: Strategy, max_depth: usize) -> Self {
        Self {
            game,
            evaluator,
            strategy,
            max_depth,
            num_agents: 1,
            stats: SearchStats::default(),
        }
    }

    /// Search from `state` with the maximizer to move.
    pub fn search(&mut self, state: &G::State) -> SearchResult<G::Action> {
        self.stats = SearchStats::default();
        self.num_agents = self.game.num_agents(state).max(1);

        let (value, action) = self.max_node(state, 0, Window::OPEN);
        SearchResult {
            value,
            action,
            stats: self.stats,
        }
    }

    /// Counters from the most recent search.
    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Agent and depth of the node reached after `agent` has moved at `depth`.
    fn next_turn(&self, agent: AgentIndex, depth: usize) -> (AgentIndex, usize) {
        let next = agent + 1;
        if next >= self.num_agents {
            (MAX_AGENT, depth + 1)
        } else {
            (next, depth)
        }
    }

    fn prunes(&self) -> bool {
        self.strategy == Strategy::AlphaBeta
    }

    fn leaf(&mut self, state: &G::State) -> Scored<G::Action> {
        self.stats.evaluations += 1;
        (self.evaluator.evaluate(self.game, state), None)
    }

    /// Dispatch to the node type owned by `agent`.
    fn value(
        &mut self,
        state: &G::State,
        agent: AgentIndex,
        depth: usize,
        window: Window,
    ) -> Scored<G::Action> {
        if agent == MAX_AGENT {
            self.max_node(state, depth, window)
        } else if self.strategy == Strategy::Expectimax {
            self.chance_node(state, agent, depth)
        } else {
            self.min_node(state, agent, depth, window)
        }
    }

    fn max_node(
        &mut self,
        state: &G::State,
        depth: usize,
        mut window: Window,
    ) -> Scored<G::Action> {
        let actions = self.game.legal_actions(state, MAX_AGENT);
        if depth >= self.max_depth || actions.is_empty() {
            return self.leaf(state);
        }
        self.stats.nodes_expanded += 1;

        let (next_agent, next_depth) = self.next_turn(MAX_AGENT, depth);
        let mut best: Option<(Value, G::Action)> = None;

        for action in actions {
            let child = self.game.successor(state, MAX_AGENT, action);
            let (value, _) = self.value(&child, next_agent, next_depth, window);

            // Strictly greater: the first of several equal actions wins.
            if best.map_or(true, |(b, _)| value > b) {
                best = Some((value, action));
            }

            if self.prunes() {
                if value > window.beta {
                    self.stats.cutoffs += 1;
                    trace!("beta cutoff at depth {}: {} > {}", depth, value, window.beta);
                    return (value, Some(action));
                }
                window.alpha = window.alpha.max(value);
            }
        }

        match best {
            Some((value, action)) => (value, Some(action)),
            None => self.leaf(state),
        }
    }

    fn min_node(
        &mut self,
        state: &G::State,
        agent: AgentIndex,
        depth: usize,
        mut window: Window,
    ) -> Scored<G::Action> {
        let actions = self.game.legal_actions(state, agent);
        if actions.is_empty() {
            return self.leaf(state);
        }
        self.stats.nodes_expanded += 1;

        let (next_agent, next_depth) = self.next_turn(agent, depth);
        let mut best: Option<(Value, G::Action)> = None;

        for action in actions {
            let child = self.game.successor(state, agent, action);
            let (value, _) = self.value(&child, next_agent, next_depth, window);

            if best.map_or(true, |(b, _)| value < b) {
                best = Some((value, action));
            }

            if self.prunes() {
                if value < window.alpha {
                    self.stats.cutoffs += 1;
                    trace!(
                        "alpha cutoff at agent {} depth {}: {} < {}",
                        agent,
                        depth,
                        value,
                        window.alpha
                    );
                    return (value, Some(action));
                }
                window.beta = window.beta.min(value);
            }
        }

        match best {
            Some((value, action)) => (value, Some(action)),
            None => self.leaf(state),
        }
    }

    fn chance_node(
        &mut self,
        state: &G::State,
        agent: AgentIndex,
        depth: usize,
    ) -> Scored<G::Action> {
        let actions = self.game.legal_actions(state, agent);
        if actions.is_empty() {
            return self.leaf(state);
        }
        self.stats.nodes_expanded += 1;

        let (next_agent, next_depth) = self.next_turn(agent, depth);
        let mut values = Vec::with_capacity(actions.len());
        for action in actions {
            let child = self.game.successor(state, agent, action);
            values.push(self.value(&child, next_agent, next_depth, Window::OPEN).0);
        }

        match Value::mean(values) {
            Some(value) => (value, None),
            None => self.leaf(state),
        }
    }
}

/// Run a single search with a fresh engine.
pub fn search<G, E>(
    game: &G,
    evaluator: &E,
    strategy: Strategy,
    max_depth: usize,
    state: &G::State,
) -> SearchResult<G::Action>
where
    G: Game,
    E: Evaluator<G>,
{
    SearchEngine::new(game, evaluator, strategy, max_depth).search(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::ScoreEvaluator;
    use crate::games::tree::{GameTree, Node, TreeAction};

    fn run(tree: &GameTree, strategy: Strategy, depth: usize) -> SearchResult<TreeAction> {
        search(tree, &ScoreEvaluator, strategy, depth, &tree.root())
    }

    /// Classic two-agent example: the maximizer's best guaranteed value is 3.
    fn textbook() -> GameTree {
        GameTree::new(
            2,
            Node::branch(vec![
                Node::branch(vec![Node::leaf(3.0), Node::leaf(12.0), Node::leaf(8.0)]),
                Node::branch(vec![Node::leaf(2.0), Node::leaf(4.0), Node::leaf(6.0)]),
                Node::branch(vec![Node::leaf(14.0), Node::leaf(5.0), Node::leaf(2.0)]),
            ]),
        )
    }

    #[test]
    fn test_minimax_textbook() {
        let result = run(&textbook(), Strategy::Minimax, 1);
        assert_eq!(result.value, Value::from_f64(3.0));
        assert_eq!(result.action, Some(TreeAction(0)));
        assert_eq!(result.stats.nodes_expanded, 4);
        assert_eq!(result.stats.evaluations, 9);
    }

    #[test]
    fn test_alphabeta_textbook_prunes() {
        let result = run(&textbook(), Strategy::AlphaBeta, 1);
        assert_eq!(result.value, Value::from_f64(3.0));
        assert_eq!(result.action, Some(TreeAction(0)));
        // Later subtrees stop as soon as a reply drops below 3.
        assert_eq!(result.stats.evaluations, 7);
        assert_eq!(result.stats.cutoffs, 2);
    }

    #[test]
    fn test_expectimax_textbook() {
        let result = run(&textbook(), Strategy::Expectimax, 1);
        // Means: 23/3, 4, 7
        assert_eq!(result.action, Some(TreeAction(0)));
        assert!((result.value.get() - 23.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_chance_node_mean_is_exact() {
        let tree = GameTree::new(
            2,
            Node::branch(vec![Node::branch(vec![Node::leaf(4.0), Node::leaf(10.0)])]),
        );
        let result = run(&tree, Strategy::Expectimax, 1);
        assert_eq!(result.value, Value::from_f64(7.0));
        assert_eq!(result.action, Some(TreeAction(0)));
    }

    #[test]
    fn test_ties_keep_first_action() {
        let tree = GameTree::new(
            1,
            Node::branch(vec![Node::leaf(5.0), Node::leaf(9.0), Node::leaf(9.0), Node::leaf(1.0)]),
        );
        for strategy in Strategy::ALL {
            let result = run(&tree, strategy, 1);
            assert_eq!(result.action, Some(TreeAction(1)), "{}", strategy);
            assert_eq!(result.value, Value::from_f64(9.0));
        }
    }

    #[test]
    fn test_min_node_ties_keep_first() {
        // Both adversary replies give 2; the min node must report the first.
        let tree = GameTree::new(
            2,
            Node::branch(vec![Node::branch(vec![Node::leaf(2.0), Node::leaf(2.0)])]),
        );
        let mut engine = SearchEngine::new(&tree, &ScoreEvaluator, Strategy::Minimax, 1);
        let child = tree.successor(&tree.root(), 0, TreeAction(0));
        let (value, action) = engine.min_node(&child, 1, 0, Window::OPEN);
        assert_eq!(value, Value::from_f64(2.0));
        assert_eq!(action, Some(TreeAction(0)));
    }

    #[test]
    fn test_depth_counts_full_rounds() {
        // Three agents: one round is three plies deep.
        let tree = GameTree::new(
            3,
            Node::branch_valued(
                100.0,
                vec![Node::branch(vec![Node::branch(vec![Node::branch_valued(
                    -1.0,
                    vec![Node::branch(vec![Node::branch(vec![Node::leaf(50.0)])])],
                )])])],
            ),
        );
        let one = run(&tree, Strategy::Minimax, 1);
        assert_eq!(one.value, Value::from_f64(-1.0));
        assert_eq!(one.stats.nodes_expanded, 3);

        let two = run(&tree, Strategy::Minimax, 2);
        assert_eq!(two.value, Value::from_f64(50.0));
        assert_eq!(two.stats.nodes_expanded, 6);
    }

    #[test]
    fn test_adversary_without_moves_is_leaf() {
        // The adversary node has a value but no children: evaluated in place,
        // depth untouched.
        let tree = GameTree::new(
            2,
            Node::branch(vec![Node::leaf(-4.0), Node::branch_valued(6.0, vec![])]),
        );
        for strategy in Strategy::ALL {
            let result = run(&tree, strategy, 3);
            assert_eq!(result.value, Value::from_f64(6.0), "{}", strategy);
            assert_eq!(result.action, Some(TreeAction(1)));
        }
    }

    #[test]
    fn test_single_agent_reenters_max_node() {
        let tree = GameTree::new(
            1,
            Node::branch(vec![
                Node::branch(vec![Node::leaf(1.0), Node::leaf(7.0)]),
                Node::branch(vec![Node::leaf(5.0)]),
            ]),
        );
        let result = run(&tree, Strategy::Minimax, 2);
        assert_eq!(result.value, Value::from_f64(7.0));
        assert_eq!(result.action, Some(TreeAction(0)));

        let shallow = run(&tree, Strategy::Minimax, 1);
        // Depth 1 evaluates the children's own values (0.0 each).
        assert_eq!(shallow.value, Value::ZERO);
        assert_eq!(shallow.action, Some(TreeAction(0)));
    }

    #[test]
    fn test_terminal_root_is_not_expanded() {
        for root in [Node::win(), Node::lose()] {
            let tree = GameTree::new(3, root);
            for strategy in Strategy::ALL {
                let result = run(&tree, strategy, 4);
                assert!(result.value.is_win() || result.value.is_loss());
                assert_eq!(result.action, None);
                assert_eq!(result.stats.nodes_expanded, 0);
                assert_eq!(result.stats.evaluations, 1);
            }
        }
    }

    #[test]
    fn test_forced_loss_is_avoided() {
        let tree = GameTree::new(
            2,
            Node::branch(vec![
                Node::branch(vec![Node::leaf(100.0), Node::lose()]),
                Node::branch(vec![Node::leaf(1.0), Node::leaf(2.0)]),
            ]),
        );
        for strategy in [Strategy::Minimax, Strategy::AlphaBeta] {
            let result = run(&tree, strategy, 1);
            assert_eq!(result.action, Some(TreeAction(1)));
            assert_eq!(result.value, Value::from_f64(1.0));
        }
        // Averaging over a possible loss is still a loss.
        let result = run(&tree, Strategy::Expectimax, 1);
        assert_eq!(result.action, Some(TreeAction(1)));
    }

    #[test]
    fn test_stats_reset_between_searches() {
        let tree = textbook();
        let mut engine = SearchEngine::new(&tree, &ScoreEvaluator, Strategy::Minimax, 1);
        let first = engine.search(&tree.root()).stats;
        let second = engine.search(&tree.root()).stats;
        assert_eq!(first, second);
        assert_eq!(engine.stats(), second);
    }
}
