//! MCTS configuration parameters.

use crate::search::SearchError;

/// Configuration for Monte Carlo Tree Search.
#[derive(Debug, Clone)]
pub struct MctsConfig {
    /// Number of simulations to run per search when the caller does not
    /// supply a budget.
    pub num_simulations: u32,

    /// Upper bound on any requested budget.
    pub max_simulations: u32,

    /// Exploration constant `C` in the UCB1 formula.
    /// 1.414 (about sqrt 2) is the textbook value.
    pub exploration: f32,

    /// Simulations run between two yield points of a cooperative search.
    pub chunk_size: u32,

    /// Position cache size above which the whole cache is cleared.
    pub cache_capacity: usize,

    /// Simulations run on the empty board by `StrongBot::initialize`.
    pub warmup_simulations: u32,

    /// Arena size above which the tree and cache are reclaimed between searches.
    pub max_tree_nodes: usize,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            num_simulations: 1000,
            max_simulations: 5000,
            exploration: 1.414,
            chunk_size: 50,
            cache_capacity: 10_000,
            warmup_simulations: 50,
            max_tree_nodes: 100_000,
        }
    }
}

impl MctsConfig {
    /// Create a fast config for testing.
    pub fn for_testing() -> Self {
        Self {
            num_simulations: 200,
            max_simulations: 5000,
            exploration: 1.414,
            chunk_size: 16,
            cache_capacity: 1_000,
            warmup_simulations: 10,
            max_tree_nodes: 10_000,
        }
    }

    /// Builder pattern: set number of simulations.
    pub fn with_simulations(mut self, n: u32) -> Self {
        self.num_simulations = n;
        self
    }

    /// Builder pattern: set the UCB1 exploration constant.
    pub fn with_exploration(mut self, c: f32) -> Self {
        self.exploration = c;
        self
    }

    /// Builder pattern: set the cooperative chunk size.
    pub fn with_chunk_size(mut self, size: u32) -> Self {
        self.chunk_size = size;
        self
    }

    /// Builder pattern: set the position cache capacity.
    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }

    /// Builder pattern: set the number of warm-up simulations.
    pub fn with_warmup_simulations(mut self, n: u32) -> Self {
        self.warmup_simulations = n;
        self
    }

    /// Clamp a requested budget to `max_simulations`.
    pub fn clamp_budget(&self, requested: u32) -> u32 {
        requested.min(self.max_simulations)
    }

    /// Reject settings that would stall or corrupt a search.
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.chunk_size == 0 {
            return Err(SearchError::InvalidConfig(
                "chunk_size must be at least 1".to_string(),
            ));
        }
        if !self.exploration.is_finite() || self.exploration < 0.0 {
            return Err(SearchError::InvalidConfig(format!(
                "exploration must be a finite non-negative number, got {}",
                self.exploration
            )));
        }
        if self.cache_capacity == 0 {
            return Err(SearchError::InvalidConfig(
                "cache_capacity must be at least 1".to_string(),
            ));
        }
        if self.max_tree_nodes == 0 {
            return Err(SearchError::InvalidConfig(
                "max_tree_nodes must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
