//! Pacman arena for the multi-agent search agents.
//!
//! Plays batches of games on a maze with one chosen pacman agent against
//! uniformly random ghosts and reports how it fared.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use log::{debug, info};
use multiagent_core::{Game, MAX_AGENT};
use multiagent_search::games::{layouts, Pacman};
use multiagent_search::{
    Agent, EvaluationFunction, RandomAgent, ReflexPolicy, ReflexWeights, SearchAgent,
    SearchConfig, Strategy,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Multi-agent search arena.
#[derive(Parser)]
#[command(name = "multiagent-arena")]
#[command(about = "Play pacman games with search agents against random ghosts")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a batch of games and print the results.
    Play {
        /// Built-in layout name or path to a layout file.
        #[arg(short, long, default_value = "smallClassic")]
        layout: String,

        /// Pacman agent.
        #[arg(short, long, value_enum, default_value = "alphabeta")]
        agent: AgentKind,

        /// Search depth in full rounds (overrides the config file).
        #[arg(short, long)]
        depth: Option<usize>,

        /// Evaluation function name (overrides the config file).
        #[arg(short, long)]
        evaluation: Option<String>,

        /// Number of games to play.
        #[arg(short, long, default_value = "10")]
        games: usize,

        /// Random seed for reproducibility.
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Pacman moves after which a game is abandoned.
        #[arg(long, default_value = "500")]
        max_moves: usize,

        /// JSON file with search and reflex settings.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Write a JSON summary of every game here.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List the built-in layouts.
    Layouts,
}

/// Which agent controls pacman.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
enum AgentKind {
    Minimax,
    Alphabeta,
    Expectimax,
    Reflex,
}

impl AgentKind {
    fn strategy(self) -> Option<Strategy> {
        match self {
            AgentKind::Minimax => Some(Strategy::Minimax),
            AgentKind::Alphabeta => Some(Strategy::AlphaBeta),
            AgentKind::Expectimax => Some(Strategy::Expectimax),
            AgentKind::Reflex => None,
        }
    }
}

/// Settings read from `--config`; every field is optional.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
struct ArenaConfig {
    search: SearchConfig,
    reflex: ReflexWeights,
}

impl ArenaConfig {
    fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        serde_json::from_str(&text).with_context(|| format!("Failed to parse config file: {:?}", path))
    }
}

/// A pacman agent ready to be instantiated once per game.
enum Player {
    Search(SearchAgent<EvaluationFunction>),
    Reflex(ReflexWeights),
}

impl Player {
    fn build(kind: AgentKind, config: &ArenaConfig) -> Result<Self> {
        match kind.strategy() {
            Some(strategy) => {
                let agent = SearchAgent::from_config(strategy, &config.search)
                    .with_context(|| format!("Invalid {} configuration", strategy))?;
                Ok(Player::Search(agent))
            }
            None => Ok(Player::Reflex(config.reflex.clone())),
        }
    }

    /// A fresh agent for one game; only the reflex policy uses `seed`.
    fn agent(&self, seed: u64) -> Box<dyn Agent<Pacman>> {
        match self {
            Player::Search(agent) => Box::new(agent.clone()),
            Player::Reflex(weights) => Box::new(ReflexPolicy::with_weights(
                weights.clone(),
                ChaCha8Rng::seed_from_u64(seed),
            )),
        }
    }

    fn describe(&self) -> String {
        match self {
            Player::Search(agent) => format!(
                "{} (depth {}, {} evaluation)",
                agent.strategy(),
                agent.depth(),
                agent.evaluator().name()
            ),
            Player::Reflex(_) => "reflex".to_string(),
        }
    }
}

/// How a game ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum Outcome {
    Win,
    Loss,
    /// Hit the move limit first.
    Timeout,
}

/// Result of a single game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct GameRecord {
    seed: u64,
    outcome: Outcome,
    score: f64,
    /// Pacman moves played.
    moves: usize,
}

/// Aggregate results, also the `--output` document.
#[derive(Debug, Serialize)]
struct Summary {
    layout: String,
    agent: String,
    games: usize,
    wins: usize,
    losses: usize,
    timeouts: usize,
    average_score: f64,
    records: Vec<GameRecord>,
}

impl Summary {
    fn new(layout: &str, agent: String, records: Vec<GameRecord>) -> Self {
        let count = |outcome| records.iter().filter(|r| r.outcome == outcome).count();
        let average_score = if records.is_empty() {
            0.0
        } else {
            records.iter().map(|r| r.score).sum::<f64>() / records.len() as f64
        };
        Self {
            layout: layout.to_string(),
            agent,
            games: records.len(),
            wins: count(Outcome::Win),
            losses: count(Outcome::Loss),
            timeouts: count(Outcome::Timeout),
            average_score,
            records,
        }
    }

    fn win_rate(&self) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            self.wins as f64 / self.games as f64
        }
    }
}

/// Resolve a built-in layout name, falling back to reading a file.
fn load_layout(name: &str) -> Result<Pacman> {
    if let Some(text) = layouts::by_name(name) {
        return Ok(Pacman::parse(text)?);
    }
    let text = fs::read_to_string(name)
        .with_context(|| format!("No built-in layout and no layout file named {:?}", name))?;
    Pacman::parse(&text).with_context(|| format!("Failed to parse layout file: {:?}", name))
}

/// Play one game: pacman moves, then each ghost in index order, every round.
fn play_game(game: &Pacman, pacman: &mut dyn Agent<Pacman>, seed: u64, max_moves: usize) -> GameRecord {
    let mut ghosts = RandomAgent::new(ChaCha8Rng::seed_from_u64(seed));
    let mut state = game.initial_state();
    let mut moves = 0;

    'game: while moves < max_moves {
        for agent in 0..game.num_agents(&state) {
            if game.is_terminal(&state) {
                break 'game;
            }
            let action = if agent == MAX_AGENT {
                pacman.get_action(game, &state, agent)
            } else {
                ghosts.get_action(game, &state, agent)
            };
            let Some(action) = action else {
                continue;
            };
            if agent == MAX_AGENT {
                moves += 1;
            }
            state = game.successor(&state, agent, action);
        }
    }

    let outcome = if game.is_win(&state) {
        Outcome::Win
    } else if game.is_lose(&state) {
        Outcome::Loss
    } else {
        Outcome::Timeout
    };
    let score = game.score(&state);
    debug!("game {}: {:?} with score {} after {} moves", seed, outcome, score, moves);

    GameRecord {
        seed,
        outcome,
        score,
        moves,
    }
}

/// Play `games` independent games in parallel.
fn run_games(game: &Pacman, player: &Player, games: usize, seed: u64, max_moves: usize) -> Vec<GameRecord> {
    (0..games)
        .into_par_iter()
        .map(|i| {
            let game_seed = seed.wrapping_add(i as u64 * 1000);
            let mut agent = player.agent(game_seed.wrapping_add(1));
            play_game(game, agent.as_mut(), game_seed, max_moves)
        })
        .collect()
}

/// Run the play command.
#[allow(clippy::too_many_arguments)]
fn cmd_play(
    layout: String,
    agent: AgentKind,
    depth: Option<usize>,
    evaluation: Option<String>,
    games: usize,
    seed: u64,
    max_moves: usize,
    config: Option<PathBuf>,
    output: Option<PathBuf>,
) -> Result<()> {
    let mut settings = match &config {
        Some(path) => ArenaConfig::load(path)?,
        None => ArenaConfig::default(),
    };
    if let Some(depth) = depth {
        settings.search.depth = depth;
    }
    if let Some(evaluation) = evaluation {
        settings.search.evaluation = evaluation;
    }

    let game = load_layout(&layout)?;
    let player = Player::build(agent, &settings)?;
    info!("settings: {:?}", settings);

    println!("Playing {} games on {} with {}", games, layout, player.describe());
    println!("Seed: {}, move limit: {}", seed, max_moves);

    let start = Instant::now();
    let records = run_games(&game, &player, games, seed, max_moves);
    let elapsed = start.elapsed();

    let summary = Summary::new(&layout, player.describe(), records);

    println!("\nCompleted in {:.2}s", elapsed.as_secs_f64());
    println!("================================================");
    println!("Wins:     {} ({:.1}%)", summary.wins, summary.win_rate() * 100.0);
    println!("Losses:   {}", summary.losses);
    println!("Timeouts: {}", summary.timeouts);
    println!("Average score: {:.2}", summary.average_score);

    if let Some(path) = output {
        let file = File::create(&path).with_context(|| format!("Failed to create file: {:?}", path))?;
        serde_json::to_writer_pretty(BufWriter::new(file), &summary)
            .with_context(|| format!("Failed to write summary to {:?}", path))?;
        println!("Summary saved to: {:?}", path);
    }

    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Play {
            layout,
            agent,
            depth,
            evaluation,
            games,
            seed,
            max_moves,
            config,
            output,
        } => cmd_play(layout, agent, depth, evaluation, games, seed, max_moves, config, output),

        Commands::Layouts => {
            for (name, text) in layouts::ALL {
                let game = Pacman::parse(text)?;
                let state = game.initial_state();
                println!(
                    "{:<16} {}x{}, {} ghosts, {} food",
                    name,
                    game.width(),
                    game.height(),
                    game.num_agents(&state) - 1,
                    state.food_left()
                );
            }
            Ok(())
        }
    }
}
