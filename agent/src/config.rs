//! Configuration for the agent process
//!
//! Configuration is loaded from config.toml with environment variable overrides.
//! CLI arguments take highest priority, followed by env vars, then config.toml.

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use engine_config::{load_config, CentralConfig};
use games_connect4::Player;
use mcts::MctsConfig;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::level_filters::LevelFilter;

use crate::play::Opponent;

// Load central config once at startup
static CENTRAL_CONFIG: Lazy<CentralConfig> = Lazy::new(load_config);

// Default value functions that read from central config
fn default_log_level() -> String {
    CENTRAL_CONFIG.common.log_level.clone()
}

fn default_player() -> String {
    CENTRAL_CONFIG.agent.player.clone()
}

fn default_simulations() -> u32 {
    CENTRAL_CONFIG.mcts.num_simulations
}

fn default_chunk_size() -> u32 {
    CENTRAL_CONFIG.mcts.chunk_size
}

fn default_games() -> u32 {
    CENTRAL_CONFIG.agent.games
}

fn default_opponent() -> String {
    CENTRAL_CONFIG.agent.opponent.clone()
}

#[derive(Parser, Debug, Clone, Serialize, Deserialize)]
#[command(name = "agent")]
#[command(about = "Connect Four MCTS agent")]
#[command(
    long_about = "Plays Connect Four with a Monte Carlo Tree Search bot.

With --moves, replays the given columns (Red first) and prints the bot's reply.
Otherwise plays a series of games against a random opponent or itself.

Configuration is loaded from config.toml with environment variable overrides.
CLI arguments take highest priority."
)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value_t = default_log_level())]
    pub log_level: String,

    /// Side the bot plays in match mode (red moves first)
    #[arg(long, default_value_t = default_player())]
    pub player: String,

    /// RNG seed for reproducible play (entropy when unset)
    #[arg(long)]
    pub seed: Option<u64>,

    /// MCTS simulations per move
    #[arg(long, default_value_t = default_simulations())]
    pub simulations: u32,

    /// Simulations between cooperative yield points
    #[arg(long, default_value_t = default_chunk_size())]
    pub chunk_size: u32,

    /// Number of games to play in match mode
    #[arg(long, default_value_t = default_games())]
    pub games: u32,

    /// Match opponent: random or self
    #[arg(long, default_value_t = default_opponent())]
    pub opponent: String,

    /// Comma-separated columns to replay before asking for a move, e.g. 3,3,4
    #[arg(long)]
    pub moves: Option<String>,
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        self.validate_with(&CENTRAL_CONFIG.mcts)
    }

    /// Validate against the given `[mcts]` section instead of the loaded one.
    fn validate_with(&self, central: &engine_config::MctsConfig) -> Result<()> {
        if self.log_level.parse::<LevelFilter>().is_err() {
            return Err(anyhow!(
                "invalid log level '{}', expected one of trace, debug, info, warn, error",
                self.log_level
            ));
        }

        self.agent_player()?;
        self.opponent()?;

        if self.chunk_size == 0 {
            return Err(anyhow!("chunk_size must be greater than 0"));
        }

        mcts_config_from(central, self.simulations, self.chunk_size)
            .validate()
            .map_err(|e| anyhow!("invalid search settings: {e}"))?;

        if let Some(moves) = &self.moves {
            parse_moves(moves)?;
        }

        Ok(())
    }

    pub fn agent_player(&self) -> Result<Player> {
        self.player
            .parse()
            .map_err(|_| anyhow!("invalid player '{}', expected red or yellow", self.player))
    }

    pub fn opponent(&self) -> Result<Opponent> {
        self.opponent.parse()
    }

    /// CLI seed, else the configured one.
    pub fn seed(&self) -> Option<u64> {
        self.seed.or(CENTRAL_CONFIG.agent.seed)
    }

    /// Search settings from config.toml with CLI overrides applied.
    pub fn mcts_config(&self) -> MctsConfig {
        mcts_config_from(&CENTRAL_CONFIG.mcts, self.simulations, self.chunk_size)
    }

    pub fn parsed_moves(&self) -> Result<Option<Vec<u8>>> {
        self.moves.as_deref().map(parse_moves).transpose()
    }
}

fn mcts_config_from(
    central: &engine_config::MctsConfig,
    simulations: u32,
    chunk_size: u32,
) -> MctsConfig {
    let mut config = MctsConfig::default()
        .with_simulations(simulations)
        .with_exploration(central.exploration)
        .with_chunk_size(chunk_size)
        .with_cache_capacity(central.cache_capacity)
        .with_warmup_simulations(central.warmup_simulations);
    config.max_simulations = central.max_simulations;
    config.max_tree_nodes = central.max_tree_nodes;
    config
}

/// Parse a comma-separated list of columns.
pub fn parse_moves(text: &str) -> Result<Vec<u8>> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<u8>()
                .with_context(|| format!("invalid column '{s}' in move list"))
        })
        .collect()
}
