//! Grid pursuit game used to exercise the search agents.
//!
//! Pacman (agent 0) eats food in a walled maze while ghosts (agents 1..)
//! chase it. Rules:
//! - every pacman move costs 1 point; each food pellet is worth 10
//! - eating the last pellet wins (+500)
//! - eating a capsule scares every ghost for 40 ghost moves
//! - touching a scared ghost is worth 200 and sends it back to its start
//! - touching any other ghost loses (-500)
//! - ghosts never stop and only reverse at dead ends
//!
//! Terminal states have no legal actions for anyone.

use std::fmt::Write as _;
use std::sync::Arc;

use multiagent_core::{
    AgentIndex, Direction, Game, GhostView, GridGame, MultiAgentError, Position, Result,
    MAX_AGENT,
};

/// Points lost per pacman move.
pub const TIME_PENALTY: f64 = 1.0;

/// Points per food pellet.
pub const FOOD_REWARD: f64 = 10.0;

/// Bonus for clearing the board.
pub const WIN_REWARD: f64 = 500.0;

/// Points lost when caught.
pub const LOSE_PENALTY: f64 = 500.0;

/// Points for eating a scared ghost.
pub const GHOST_REWARD: f64 = 200.0;

/// Ghost moves a capsule keeps ghosts scared.
pub const SCARED_TIME: u32 = 40;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Outcome {
    Win,
    Lose,
}

/// Static maze data shared by every state of a game.
#[derive(Debug)]
struct Layout {
    width: i32,
    height: i32,
    walls: Vec<bool>,
    food: Vec<bool>,
    capsules: Vec<Position>,
    pacman: Position,
    ghosts: Vec<Position>,
}

impl Layout {
    fn index(&self, p: Position) -> Option<usize> {
        if p.x < 0 || p.y < 0 || p.x >= self.width || p.y >= self.height {
            None
        } else {
            Some((p.y * self.width + p.x) as usize)
        }
    }

    fn position(&self, index: usize) -> Position {
        let index = index as i32;
        Position::new(index % self.width, index / self.width)
    }

    fn is_wall(&self, p: Position) -> bool {
        self.index(p).map_or(true, |i| self.walls[i])
    }
}

/// A ghost's dynamic state.
#[derive(Clone, Debug, PartialEq)]
pub struct GhostState {
    pub position: Position,
    pub start: Position,
    /// Direction of the last move (`Stop` before the first one).
    pub direction: Direction,
    pub scared_timer: u32,
}

impl GhostState {
    fn new(start: Position) -> Self {
        Self {
            position: start,
            start,
            direction: Direction::Stop,
            scared_timer: 0,
        }
    }

    pub fn is_scared(&self) -> bool {
        self.scared_timer > 0
    }
}

/// Dynamic state of a game in progress.
#[derive(Clone, Debug, PartialEq)]
pub struct PacmanState {
    pacman: Position,
    ghosts: Vec<GhostState>,
    food: Vec<bool>,
    food_left: usize,
    capsules: Vec<Position>,
    score: f64,
    outcome: Option<Outcome>,
}

impl PacmanState {
    pub fn pacman(&self) -> Position {
        self.pacman
    }

    pub fn ghost_states(&self) -> &[GhostState] {
        &self.ghosts
    }

    pub fn food_left(&self) -> usize {
        self.food_left
    }

    pub fn score(&self) -> f64 {
        self.score
    }
}

/// The game: a parsed maze.
#[derive(Clone, Debug)]
pub struct Pacman {
    layout: Arc<Layout>,
}

impl Pacman {
    /// Parse a text layout.
    ///
    /// # Errors
    /// Returns `MultiAgentError::InvalidLayout` if the layout is empty or
    /// ragged, has no pacman or more than one, or contains an unknown cell.
    pub fn parse(text: &str) -> Result<Self> {
        let rows: Vec<&str> = text
            .lines()
            .map(|l| l.trim_end_matches('\r'))
            .filter(|l| !l.trim().is_empty())
            .collect();
        if rows.is_empty() {
            return Err(MultiAgentError::InvalidLayout("layout is empty".to_string()));
        }

        let width = rows[0].chars().count();
        if let Some(row) = rows.iter().position(|r| r.chars().count() != width) {
            return Err(MultiAgentError::InvalidLayout(format!(
                "row {} has {} cells, expected {}",
                row,
                rows[row].chars().count(),
                width
            )));
        }

        let height = rows.len();
        let mut layout = Layout {
            width: width as i32,
            height: height as i32,
            walls: vec![false; width * height],
            food: vec![false; width * height],
            capsules: Vec::new(),
            pacman: Position::default(),
            ghosts: Vec::new(),
        };
        let mut pacman = None;

        for (row, line) in rows.iter().enumerate() {
            // The first text row is the northernmost.
            let y = (height - 1 - row) as i32;
            for (x, cell) in line.chars().enumerate() {
                let p = Position::new(x as i32, y);
                let i = y as usize * width + x;
                match cell {
                    '%' => layout.walls[i] = true,
                    '.' => layout.food[i] = true,
                    'o' => layout.capsules.push(p),
                    'P' => {
                        if pacman.replace(p).is_some() {
                            return Err(MultiAgentError::InvalidLayout(
                                "more than one pacman".to_string(),
                            ));
                        }
                    }
                    'G' | '1'..='4' => layout.ghosts.push(p),
                    ' ' => {}
                    other => {
                        return Err(MultiAgentError::InvalidLayout(format!(
                            "unknown cell '{}' at {}",
                            other, p
                        )))
                    }
                }
            }
        }

        layout.pacman = pacman
            .ok_or_else(|| MultiAgentError::InvalidLayout("no pacman".to_string()))?;
        layout.capsules.sort_by_key(|p| (p.y, p.x));
        layout.ghosts.sort_by_key(|p| (p.y, p.x));

        Ok(Self {
            layout: Arc::new(layout),
        })
    }

    /// The starting position of the maze.
    pub fn initial_state(&self) -> PacmanState {
        let layout = &self.layout;
        PacmanState {
            pacman: layout.pacman,
            ghosts: layout.ghosts.iter().copied().map(GhostState::new).collect(),
            food: layout.food.clone(),
            food_left: layout.food.iter().filter(|f| **f).count(),
            capsules: layout.capsules.clone(),
            score: 0.0,
            outcome: None,
        }
    }

    pub fn width(&self) -> i32 {
        self.layout.width
    }

    pub fn height(&self) -> i32 {
        self.layout.height
    }

    pub fn is_wall(&self, p: Position) -> bool {
        self.layout.is_wall(p)
    }

    /// Draw `state` as text in layout notation (scared ghosts as `g`).
    pub fn render(&self, state: &PacmanState) -> String {
        let mut out = String::new();
        for y in (0..self.layout.height).rev() {
            for x in 0..self.layout.width {
                let p = Position::new(x, y);
                let cell = if p == state.pacman {
                    'P'
                } else if let Some(g) = state.ghosts.iter().find(|g| g.position == p) {
                    if g.is_scared() {
                        'g'
                    } else {
                        'G'
                    }
                } else if self.layout.is_wall(p) {
                    '%'
                } else if state.capsules.contains(&p) {
                    'o'
                } else if self.layout.index(p).map_or(false, |i| state.food[i]) {
                    '.'
                } else {
                    ' '
                };
                out.push(cell);
            }
            out.push('\n');
        }
        let _ = write!(out, "Score: {}", state.score);
        out
    }

    fn move_pacman(&self, state: &mut PacmanState, action: Direction) {
        state.score -= TIME_PENALTY;
        state.pacman = state.pacman.step(action);

        if let Some(i) = self.layout.index(state.pacman) {
            if state.food[i] {
                state.food[i] = false;
                state.food_left -= 1;
                state.score += FOOD_REWARD;
                if state.food_left == 0 && state.outcome.is_none() {
                    state.score += WIN_REWARD;
                    state.outcome = Some(Outcome::Win);
                }
            }
        }

        if let Some(k) = state.capsules.iter().position(|c| *c == state.pacman) {
            state.capsules.remove(k);
            for ghost in &mut state.ghosts {
                ghost.scared_timer = SCARED_TIME;
            }
        }

        for ghost in 0..state.ghosts.len() {
            resolve_contact(state, ghost);
        }
    }

    fn move_ghost(&self, state: &mut PacmanState, ghost: usize, action: Direction) {
        let g = &mut state.ghosts[ghost];
        g.position = g.position.step(action);
        g.direction = action;
        g.scared_timer = g.scared_timer.saturating_sub(1);
        resolve_contact(state, ghost);
    }
}

/// Settle a pacman/ghost meeting, if the two share a cell.
fn resolve_contact(state: &mut PacmanState, ghost: usize) {
    let g = &mut state.ghosts[ghost];
    if g.position != state.pacman {
        return;
    }
    if g.is_scared() {
        state.score += GHOST_REWARD;
        g.position = g.start;
        g.direction = Direction::Stop;
        g.scared_timer = 0;
    } else if state.outcome.is_none() {
        state.score -= LOSE_PENALTY;
        state.outcome = Some(Outcome::Lose);
    }
}

impl Game for Pacman {
    type State = PacmanState;
    type Action = Direction;

    fn legal_actions(&self, state: &Self::State, agent: AgentIndex) -> Vec<Self::Action> {
        if state.outcome.is_some() {
            return Vec::new();
        }

        if agent == MAX_AGENT {
            return Direction::ALL
                .into_iter()
                .filter(|d| !self.layout.is_wall(state.pacman.step(*d)))
                .collect();
        }

        debug_assert!(agent <= state.ghosts.len(), "agent {} out of range", agent);
        let Some(ghost) = state.ghosts.get(agent - 1) else {
            return Vec::new();
        };
        let mut moves: Vec<Direction> = Direction::ALL
            .into_iter()
            .filter(|d| *d != Direction::Stop && !self.layout.is_wall(ghost.position.step(*d)))
            .collect();
        if moves.len() > 1 {
            let reverse = ghost.direction.reverse();
            moves.retain(|d| *d != reverse);
        }
        moves
    }

    fn successor(
        &self,
        state: &Self::State,
        agent: AgentIndex,
        action: Self::Action,
    ) -> Self::State {
        debug_assert!(
            state.outcome.is_none(),
            "cannot generate a successor of a terminal state"
        );
        debug_assert!(
            self.legal_actions(state, agent).contains(&action),
            "illegal action {} for agent {}",
            action,
            agent
        );

        let mut next = state.clone();
        if agent == MAX_AGENT {
            self.move_pacman(&mut next, action);
        } else {
            self.move_ghost(&mut next, agent - 1, action);
        }
        next
    }

    fn num_agents(&self, state: &Self::State) -> usize {
        1 + state.ghosts.len()
    }

    fn is_win(&self, state: &Self::State) -> bool {
        state.outcome == Some(Outcome::Win)
    }

    fn is_lose(&self, state: &Self::State) -> bool {
        state.outcome == Some(Outcome::Lose)
    }

    fn score(&self, state: &Self::State) -> f64 {
        state.score
    }
}

impl GridGame for Pacman {
    fn agent_position(&self, state: &Self::State) -> Position {
        state.pacman
    }

    fn food(&self, state: &Self::State) -> Vec<Position> {
        state
            .food
            .iter()
            .enumerate()
            .filter(|(_, f)| **f)
            .map(|(i, _)| self.layout.position(i))
            .collect()
    }

    fn food_count(&self, state: &Self::State) -> usize {
        state.food_left
    }

    fn ghosts(&self, state: &Self::State) -> Vec<GhostView> {
        state
            .ghosts
            .iter()
            .map(|g| GhostView {
                position: g.position,
                scared_timer: g.scared_timer,
            })
            .collect()
    }

    fn capsules(&self, state: &Self::State) -> Vec<Position> {
        state.capsules.clone()
    }

    fn is_stop(&self, action: Self::Action) -> bool {
        action == Direction::Stop
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::layouts;

    fn load(layout: &str) -> (Pacman, PacmanState) {
        let game = Pacman::parse(layout).unwrap();
        let state = game.initial_state();
        (game, state)
    }

    #[test]
    fn test_parse_test_classic() {
        let (game, state) = load(layouts::TEST_CLASSIC);
        assert_eq!(game.width(), 5);
        assert_eq!(game.height(), 10);
        assert_eq!(state.pacman(), Position::new(1, 1));
        assert_eq!(state.food_left(), 8);
        assert_eq!(game.food(&state).len(), 8);
        assert_eq!(game.num_agents(&state), 2);
        assert_eq!(game.ghosts(&state)[0].position, Position::new(2, 7));
        assert!(!game.is_terminal(&state));
    }

    #[test]
    fn test_parse_errors() {
        let cases = [
            ("", "empty"),
            ("%%%\n%P%%\n%%%", "ragged"),
            ("%%%\n% %\n%%%", "no pacman"),
            ("%%%%\n%PP%\n%%%%", "two pacmen"),
            ("%%%\n%P#\n%%%", "unknown cell"),
        ];
        for (layout, why) in cases {
            assert!(
                matches!(Pacman::parse(layout), Err(MultiAgentError::InvalidLayout(_))),
                "{}",
                why
            );
        }
    }

    #[test]
    fn test_pacman_legal_actions() {
        let (game, state) = load(layouts::TEST_CLASSIC);
        assert_eq!(
            game.legal_actions(&state, 0),
            vec![Direction::North, Direction::East, Direction::Stop]
        );
    }

    #[test]
    fn test_ghost_never_stops_or_reverses() {
        let (game, state) = load("%%%%%%%\n%P . G%\n%%%%%%%");
        assert_eq!(game.legal_actions(&state, 1), vec![Direction::West]);

        let state = game.successor(&state, 1, Direction::West);
        assert_eq!(state.ghost_states()[0].position, Position::new(4, 1));
        // East is open but would reverse.
        assert_eq!(game.legal_actions(&state, 1), vec![Direction::West]);
    }

    #[test]
    fn test_ghost_reverses_at_dead_end() {
        let (game, state) = load("%%%%%%%\n%P. G %\n%%%%%%%");
        let state = game.successor(&state, 1, Direction::East);
        assert_eq!(game.legal_actions(&state, 1), vec![Direction::West]);
    }

    #[test]
    fn test_eating_food_and_winning() {
        let (game, state) = load("%%%%%%\n%P..G%\n%%%%%%");
        let state = game.successor(&state, 0, Direction::East);
        assert_eq!(state.score(), FOOD_REWARD - TIME_PENALTY);
        assert_eq!(state.food_left(), 1);
        assert!(!game.is_terminal(&state));

        let state = game.successor(&state, 0, Direction::East);
        assert!(game.is_win(&state));
        assert_eq!(state.score(), 2.0 * (FOOD_REWARD - TIME_PENALTY) + WIN_REWARD);
        for agent in 0..game.num_agents(&state) {
            assert!(game.legal_actions(&state, agent).is_empty());
        }
    }

    #[test]
    fn test_capsule_scares_and_scared_ghost_is_eaten() {
        let (game, state) = load("%%%%%%%%\n%Po G .%\n%%%%%%%%");
        let state = game.successor(&state, 0, Direction::East);
        assert!(game.capsules(&state).is_empty());
        assert!(game.ghosts(&state).iter().all(|g| g.scared_timer == SCARED_TIME));

        let state = game.successor(&state, 1, Direction::West);
        assert_eq!(state.ghost_states()[0].scared_timer, SCARED_TIME - 1);
        assert_eq!(state.ghost_states()[0].position, Position::new(3, 1));

        let state = game.successor(&state, 0, Direction::East);
        assert_eq!(state.score(), -2.0 * TIME_PENALTY + GHOST_REWARD);
        let ghost = &state.ghost_states()[0];
        assert_eq!(ghost.position, ghost.start);
        assert!(!ghost.is_scared());
        assert!(!game.is_terminal(&state));
    }

    #[test]
    fn test_ghost_catches_pacman() {
        let (game, state) = load("%%%%%%\n%P G.%\n%%%%%%");
        let state = game.successor(&state, 0, Direction::East);
        let state = game.successor(&state, 1, Direction::West);
        assert!(game.is_lose(&state));
        assert_eq!(state.score(), -TIME_PENALTY - LOSE_PENALTY);
        assert!(game.legal_actions(&state, 0).is_empty());
    }

    #[test]
    fn test_successor_leaves_parent_untouched() {
        let (game, state) = load(layouts::SMALL_CLASSIC);
        let before = state.clone();
        for agent in 0..game.num_agents(&state) {
            for action in game.legal_actions(&state, agent) {
                let _ = game.successor(&state, agent, action);
            }
        }
        assert_eq!(state, before);
    }

    #[test]
    fn test_is_stop() {
        let (game, _) = load(layouts::TEST_CLASSIC);
        assert!(game.is_stop(Direction::Stop));
        assert!(!game.is_stop(Direction::North));
    }

    #[test]
    fn test_render_roundtrip() {
        let (game, state) = load(layouts::MINIMAX_CLASSIC);
        let drawn = game.render(&state);
        let maze: Vec<&str> = drawn.lines().take(game.height() as usize).collect();
        assert_eq!(maze.join("\n"), layouts::MINIMAX_CLASSIC);
        assert!(drawn.ends_with("Score: 0"));
    }
}
