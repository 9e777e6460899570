//! Configuration struct definitions.
//!
//! All config structs with serde deserialization support and default values.

use crate::defaults;
use serde::Deserialize;

// ============================================================================
// Serde default functions (required for #[serde(default = "...")])
// These call the accessor functions from defaults module
// ============================================================================

fn d_log_level() -> String {
    defaults::log_level().into()
}
fn d_num_sims() -> u32 {
    defaults::num_simulations()
}
fn d_max_sims() -> u32 {
    defaults::max_simulations()
}
fn d_exploration() -> f32 {
    defaults::exploration()
}
fn d_chunk_size() -> u32 {
    defaults::chunk_size()
}
fn d_cache_capacity() -> usize {
    defaults::cache_capacity()
}
fn d_warmup_sims() -> u32 {
    defaults::warmup_simulations()
}
fn d_max_tree_nodes() -> usize {
    defaults::max_tree_nodes()
}
fn d_player() -> String {
    defaults::player().into()
}
fn d_games() -> u32 {
    defaults::games()
}
fn d_opponent() -> String {
    defaults::opponent().into()
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Root configuration structure matching config.toml
#[derive(Debug, Deserialize, Default, Clone)]
pub struct CentralConfig {
    #[serde(default)]
    pub common: CommonConfig,
    #[serde(default)]
    pub mcts: MctsConfig,
    #[serde(default)]
    pub agent: AgentConfig,
}

/// Common configuration shared by all components
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CommonConfig {
    #[serde(default = "d_log_level")]
    pub log_level: String,
}

impl Default for CommonConfig {
    fn default() -> Self {
        Self {
            log_level: defaults::log_level().into(),
        }
    }
}

/// MCTS (Monte Carlo Tree Search) configuration
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MctsConfig {
    #[serde(default = "d_num_sims")]
    pub num_simulations: u32,
    #[serde(default = "d_max_sims")]
    pub max_simulations: u32,
    #[serde(default = "d_exploration")]
    pub exploration: f32,
    #[serde(default = "d_chunk_size")]
    pub chunk_size: u32,
    #[serde(default = "d_cache_capacity")]
    pub cache_capacity: usize,
    #[serde(default = "d_warmup_sims")]
    pub warmup_simulations: u32,
    #[serde(default = "d_max_tree_nodes")]
    pub max_tree_nodes: usize,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            num_simulations: defaults::num_simulations(),
            max_simulations: defaults::max_simulations(),
            exploration: defaults::exploration(),
            chunk_size: defaults::chunk_size(),
            cache_capacity: defaults::cache_capacity(),
            warmup_simulations: defaults::warmup_simulations(),
            max_tree_nodes: defaults::max_tree_nodes(),
        }
    }
}

/// Agent (host process) configuration
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AgentConfig {
    /// Side the bot plays ("red" or "yellow")
    #[serde(default = "d_player")]
    pub player: String,
    /// Fixed RNG seed; entropy-seeded when absent
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "d_games")]
    pub games: u32,
    /// Opponent for match play ("random" or "self")
    #[serde(default = "d_opponent")]
    pub opponent: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            player: defaults::player().into(),
            seed: None,
            games: defaults::games(),
            opponent: defaults::opponent().into(),
        }
    }
}
