//! MCTS search implementation.
//!
//! Implements the core MCTS algorithm:
//! 1. Selection: Traverse tree using UCB1 to find a node with untried moves
//! 2. Expansion: Add one random untried child and index it in the cache
//! 3. Evaluation: Terminal value, or a score from the evaluator
//! 4. Backpropagation: Update statistics along the path up to the search root
//!
//! A search is a resumable task. [`MctsSearch::step`] runs one chunk of
//! simulations and returns, so a host can yield to its scheduler between
//! chunks; [`MctsSearch::run`] drives it to completion in one go.

use games_connect4::{Board, Player, RulesError, COLS};
use rand::seq::SliceRandom;
use rand_chacha::ChaCha20Rng;
use thiserror::Error;
use tracing::{debug, trace};

use crate::cache::PositionCache;
use crate::config::MctsConfig;
use crate::evaluator::{Evaluator, EvaluatorError};
use crate::node::NodeId;
use crate::tree::MctsTree;

/// Errors that can occur during MCTS search.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Invalid MCTS configuration: {0}")]
    InvalidConfig(String),

    #[error("Expansion failed: {0}")]
    ExpansionFailure(#[from] RulesError),

    #[error("Evaluator error: {0}")]
    Evaluator(#[from] EvaluatorError),

    #[error("No legal moves available")]
    NoLegalMoves,
}

/// Progress report returned after each chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchProgress {
    /// More simulations remain; call `step` again after yielding.
    Pending { completed: u32, budget: u32 },
    /// The budget is exhausted; call `finish`.
    Complete,
}

/// Counters collected while a search runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Iterations attempted, void ones included
    pub simulations: u32,

    /// Iterations abandoned after a failed expansion or evaluation
    pub void_iterations: u32,

    /// Iterations scored with a precomputed terminal value
    pub terminal_evaluations: u32,

    /// Iterations whose evaluated node was the search root itself
    pub root_evaluations: u32,

    /// Iterations scored by the evaluator
    pub rollouts: u32,

    /// New positions recorded in the cache
    pub cache_insertions: u32,

    /// Full cache clears triggered during this search
    pub cache_clears: u32,

    /// Whether the root was adopted from the cache
    pub warm_start: bool,
}

/// Result of an MCTS search.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Column to play
    pub action: u8,

    /// Visit count of each root child, indexed by column
    pub visits: [u32; COLS],

    /// Mean score at the root, from the view of the player who moved into it
    pub value: f32,

    /// True when no child was available and `action` was drawn at random
    pub fallback: bool,

    pub stats: SearchStats,
}

/// MCTS search state.
///
/// Borrows the arena and cache exclusively for its whole lifetime, so neither
/// can be reclaimed while a search is in flight.
pub struct MctsSearch<'a, E: Evaluator> {
    tree: &'a mut MctsTree,
    cache: &'a mut PositionCache,
    evaluator: &'a E,
    config: MctsConfig,
    root: NodeId,
    budget: u32,
    stats: SearchStats,
}

impl<'a, E: Evaluator> MctsSearch<'a, E> {
    /// Create a search for `board` with `to_move` to play and `budget`
    /// simulations.
    ///
    /// If the cache already knows this position with the same player to move,
    /// the existing node becomes the root and its statistics carry over.
    /// Only expansion writes to the cache; a fresh root is not indexed.
    pub fn new(
        tree: &'a mut MctsTree,
        cache: &'a mut PositionCache,
        evaluator: &'a E,
        config: MctsConfig,
        board: Board,
        to_move: Player,
        budget: u32,
    ) -> Result<Self, SearchError> {
        config.validate()?;

        let key = board.key();
        let mut stats = SearchStats::default();

        let root = match cache.lookup(tree, key, to_move) {
            Some(id) => {
                stats.warm_start = true;
                debug!(
                    root = id.0,
                    visits = tree.get(id).visit_count,
                    children = tree.get(id).children.len(),
                    "Warm start from cached position"
                );
                id
            }
            None => tree.add_root(board, to_move),
        };

        Ok(Self {
            tree,
            cache,
            evaluator,
            config,
            root,
            budget,
            stats,
        })
    }

    /// Run one chunk of at most `chunk_size` simulations.
    pub fn step(&mut self, rng: &mut ChaCha20Rng) -> SearchProgress {
        let remaining = self.budget.saturating_sub(self.stats.simulations);
        let chunk = remaining.min(self.config.chunk_size);

        for _ in 0..chunk {
            self.simulate(rng);
        }

        if chunk > 0 {
            debug!(
                completed = self.stats.simulations,
                budget = self.budget,
                void = self.stats.void_iterations,
                "MCTS chunk complete"
            );
        }

        if self.is_complete() {
            SearchProgress::Complete
        } else {
            SearchProgress::Pending {
                completed: self.stats.simulations,
                budget: self.budget,
            }
        }
    }

    /// Run every remaining chunk back to back.
    pub fn run(&mut self, rng: &mut ChaCha20Rng) {
        while let SearchProgress::Pending { .. } = self.step(rng) {}
    }

    /// Pick the most visited root child, optionally restricted to `allowed`.
    ///
    /// Falls back to a uniformly random column from `allowed` (or the root's
    /// legal moves) when no candidate child exists.
    pub fn finish(
        self,
        allowed: Option<&[u8]>,
        rng: &mut ChaCha20Rng,
    ) -> Result<SearchResult, SearchError> {
        let root = self.tree.get(self.root);
        let visits = self.tree.visit_counts(self.root);
        let value = root.mean_value();

        let (action, fallback) = match self.tree.best_action_among(self.root, allowed) {
            Some((action, _)) => (action, false),
            None => {
                let candidates = match allowed {
                    Some(columns) => columns.to_vec(),
                    None => root.board.legal_moves(),
                };
                let action = *candidates.choose(rng).ok_or(SearchError::NoLegalMoves)?;
                debug!(action, "No searched child available, picking at random");
                (action, true)
            }
        };

        Ok(SearchResult {
            action,
            visits,
            value,
            fallback,
            stats: self.stats,
        })
    }

    /// Run a single simulation (select -> expand -> evaluate -> backpropagate).
    fn simulate(&mut self, rng: &mut ChaCha20Rng) {
        self.stats.simulations += 1;

        // Selection
        let mut leaf_id = self.select();

        // Expansion
        if self.tree.get(leaf_id).is_expandable() {
            match self.tree.expand(leaf_id, rng) {
                Ok(Some(child_id)) => {
                    let key = self.tree.get(child_id).key;
                    let insert = self.cache.insert(key, child_id);
                    self.stats.cache_insertions += insert.inserted as u32;
                    self.stats.cache_clears += insert.cleared as u32;
                    leaf_id = child_id;
                }
                Ok(None) => {}
                Err(e) => {
                    self.stats.void_iterations += 1;
                    trace!(node = leaf_id.0, error = %e, "Expansion failed, iteration void");
                    return;
                }
            }
        }

        // Evaluation
        let leaf = self.tree.get(leaf_id);
        let score = if leaf.is_terminal {
            self.stats.terminal_evaluations += 1;
            leaf.terminal_value
        } else {
            match self.evaluator.evaluate(&leaf.board, leaf.to_move, rng) {
                Ok(score) => {
                    self.stats.rollouts += 1;
                    score
                }
                Err(e) => {
                    self.stats.void_iterations += 1;
                    trace!(node = leaf_id.0, error = %e, "Evaluation failed, iteration void");
                    return;
                }
            }
        };
        if leaf_id == self.root {
            self.stats.root_evaluations += 1;
        }

        // Backpropagation
        self.tree.backpropagate(leaf_id, self.root, score);

        trace!(leaf = leaf_id.0, score, "MCTS simulation complete");
    }

    /// Descend by UCB1 while the current node is fully expanded.
    fn select(&self) -> NodeId {
        let mut current = self.root;

        while self.tree.get(current).is_fully_expanded() {
            match self.tree.select_child(current, self.config.exploration) {
                Some(child_id) => current = child_id,
                None => break,
            }
        }

        current
    }

    pub fn is_complete(&self) -> bool {
        self.stats.simulations >= self.budget
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn budget(&self) -> u32 {
        self.budget
    }

    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// Get the search tree (for inspection/debugging).
    pub fn tree(&self) -> &MctsTree {
        &*self.tree
    }
}

/// Convenience function to run a complete search and pick a move.
#[allow(clippy::too_many_arguments)]
pub fn run_mcts<E: Evaluator>(
    tree: &mut MctsTree,
    cache: &mut PositionCache,
    evaluator: &E,
    config: MctsConfig,
    board: Board,
    to_move: Player,
    budget: u32,
    rng: &mut ChaCha20Rng,
) -> Result<SearchResult, SearchError> {
    let mut search = MctsSearch::new(tree, cache, evaluator, config, board, to_move, budget)?;
    search.run(rng);
    search.finish(None, rng)
}
