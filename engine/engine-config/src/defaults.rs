//! Default configuration values loaded from config.defaults.toml.
//!
//! This module loads defaults from the shared TOML file at compile time, so
//! the documented defaults file and the binary can never disagree.

use once_cell::sync::Lazy;
use serde::Deserialize;

/// The embedded defaults TOML file (loaded at compile time)
const DEFAULTS_TOML: &str = include_str!("../../../config.defaults.toml");

/// Parsed defaults structure (parsed once at first use)
static DEFAULTS: Lazy<DefaultsConfig> = Lazy::new(|| {
    toml::from_str(DEFAULTS_TOML).expect("config.defaults.toml should be valid TOML")
});

// ============================================================================
// Internal structs for parsing config.defaults.toml
// ============================================================================

#[derive(Debug, Deserialize)]
struct DefaultsConfig {
    common: CommonDefaults,
    mcts: MctsDefaults,
    agent: AgentDefaults,
}

#[derive(Debug, Deserialize)]
struct CommonDefaults {
    log_level: String,
}

#[derive(Debug, Deserialize)]
struct MctsDefaults {
    num_simulations: u32,
    max_simulations: u32,
    exploration: f32,
    chunk_size: u32,
    cache_capacity: usize,
    warmup_simulations: u32,
    max_tree_nodes: usize,
}

#[derive(Debug, Deserialize)]
struct AgentDefaults {
    player: String,
    games: u32,
    opponent: String,
}

// ============================================================================
// Public accessor functions
// ============================================================================

// Common
pub fn log_level() -> &'static str {
    &DEFAULTS.common.log_level
}

// MCTS
pub fn num_simulations() -> u32 {
    DEFAULTS.mcts.num_simulations
}
pub fn max_simulations() -> u32 {
    DEFAULTS.mcts.max_simulations
}
pub fn exploration() -> f32 {
    DEFAULTS.mcts.exploration
}
pub fn chunk_size() -> u32 {
    DEFAULTS.mcts.chunk_size
}
pub fn cache_capacity() -> usize {
    DEFAULTS.mcts.cache_capacity
}
pub fn warmup_simulations() -> u32 {
    DEFAULTS.mcts.warmup_simulations
}
pub fn max_tree_nodes() -> usize {
    DEFAULTS.mcts.max_tree_nodes
}

// Agent
pub fn player() -> &'static str {
    &DEFAULTS.agent.player
}
pub fn games() -> u32 {
    DEFAULTS.agent.games
}
pub fn opponent() -> &'static str {
    &DEFAULTS.agent.opponent
}
