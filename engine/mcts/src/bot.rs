//! Move selection facade over the search engine.
//!
//! [`StrongBot`] owns everything that outlives a single decision: the node
//! arena, the position cache and the random source. Each decision goes
//! through the tactical pre-filter first and only falls through to a tree
//! search when no forced move exists.

use games_connect4::{Board, Player};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::cache::PositionCache;
use crate::config::MctsConfig;
use crate::evaluator::{Evaluator, RolloutEvaluator};
use crate::search::{MctsSearch, SearchError, SearchProgress, SearchResult, SearchStats};
use crate::tactics::find_forced_move;
use crate::tree::MctsTree;

/// Column preferred when the bot has to move without searching.
const CENTER_COLUMN: u8 = 3;

/// Errors surfaced to the caller of [`StrongBot`].
#[derive(Debug, Error)]
pub enum BotError {
    #[error("Bot initialization failed: {0}")]
    Initialization(#[source] SearchError),

    #[error("No legal moves available")]
    NoLegalMoves,

    #[error("Search failed: {0}")]
    Search(#[from] SearchError),
}

/// Outcome of [`StrongBot::begin_search`].
pub enum MoveDecision<'a, E: Evaluator> {
    /// The move is known without searching.
    Immediate(u8),
    /// A search must be stepped to completion first.
    Search(PendingSearch<'a, E>),
}

/// A tree search in progress, driven chunk by chunk by the host.
pub struct PendingSearch<'a, E: Evaluator> {
    search: MctsSearch<'a, E>,
    rng: &'a mut ChaCha20Rng,
    allowed: Vec<u8>,
}

impl<'a, E: Evaluator> PendingSearch<'a, E> {
    /// Run the next chunk of simulations.
    pub fn step(&mut self) -> SearchProgress {
        self.search.step(self.rng)
    }

    /// Run all remaining chunks without yielding.
    pub fn run(&mut self) {
        self.search.run(self.rng);
    }

    pub fn is_complete(&self) -> bool {
        self.search.is_complete()
    }

    pub fn budget(&self) -> u32 {
        self.search.budget()
    }

    pub fn stats(&self) -> &SearchStats {
        self.search.stats()
    }

    /// Pick the move. Simulations still outstanding are simply not run.
    pub fn finish(self) -> Result<SearchResult, BotError> {
        let tree = self.search.tree().stats(self.search.root());
        let result = self.search.finish(Some(self.allowed.as_slice()), self.rng)?;
        info!(
            column = result.action,
            simulations = result.stats.simulations,
            root_visits = tree.root_visits,
            depth = tree.max_depth,
            nodes = tree.total_nodes,
            void = result.stats.void_iterations,
            warm_start = result.stats.warm_start,
            fallback = result.fallback,
            visits = ?result.visits,
            "MCTS move selected"
        );
        Ok(result)
    }
}

/// MCTS player for one side of the board.
pub struct StrongBot<E: Evaluator = RolloutEvaluator> {
    config: MctsConfig,
    agent: Player,
    evaluator: E,
    tree: MctsTree,
    cache: PositionCache,
    rng: ChaCha20Rng,
    initialized: bool,
}

impl StrongBot<RolloutEvaluator> {
    /// Create a bot seeded from system entropy.
    pub fn new(config: MctsConfig, agent: Player) -> Self {
        Self::with_evaluator(config, agent, RolloutEvaluator::new(), ChaCha20Rng::from_entropy())
    }

    /// Create a bot with a fixed seed (for reproducibility).
    pub fn with_seed(config: MctsConfig, agent: Player, seed: u64) -> Self {
        Self::with_evaluator(
            config,
            agent,
            RolloutEvaluator::new(),
            ChaCha20Rng::seed_from_u64(seed),
        )
    }
}

impl<E: Evaluator> StrongBot<E> {
    pub fn with_evaluator(
        config: MctsConfig,
        agent: Player,
        evaluator: E,
        rng: ChaCha20Rng,
    ) -> Self {
        let cache = PositionCache::new(config.cache_capacity);
        Self {
            config,
            agent,
            evaluator,
            tree: MctsTree::new(),
            cache,
            rng,
            initialized: false,
        }
    }

    pub fn agent(&self) -> Player {
        self.agent
    }

    pub fn config(&self) -> &MctsConfig {
        &self.config
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn tree_len(&self) -> usize {
        self.tree.len()
    }

    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    /// Full cache clears since the bot was created.
    pub fn cache_clears(&self) -> u64 {
        self.cache.clears()
    }

    /// Run the warm-up search on the empty board with Red to move.
    ///
    /// Does nothing after the first success.
    pub fn initialize(&mut self) -> Result<(), BotError> {
        if self.initialized {
            return Ok(());
        }

        let mut search = MctsSearch::new(
            &mut self.tree,
            &mut self.cache,
            &self.evaluator,
            self.config.clone(),
            Board::new(),
            Player::Red,
            self.config.warmup_simulations,
        )
        .map_err(BotError::Initialization)?;
        search.run(&mut self.rng);

        info!(
            simulations = search.stats().simulations,
            nodes = search.tree().len(),
            "Strong bot initialized"
        );
        self.initialized = true;
        Ok(())
    }

    /// Choose a column for the agent on `board`.
    ///
    /// The result is always a member of `legal`. A `budget` above
    /// `max_simulations` is clamped.
    pub fn select_move(
        &mut self,
        board: &Board,
        legal: &[u8],
        budget: u32,
    ) -> Result<u8, BotError> {
        match self.begin_search(board, legal, budget)? {
            MoveDecision::Immediate(column) => Ok(column),
            MoveDecision::Search(mut pending) => {
                pending.run();
                Ok(pending.finish()?.action)
            }
        }
    }

    /// Decide what to do for `board` without running any simulation yet.
    ///
    /// Returns the move directly when there is a single legal column, when
    /// initialization failed, or when the tactical pre-filter fires.
    /// Otherwise returns a [`PendingSearch`] the caller steps to completion.
    pub fn begin_search(
        &mut self,
        board: &Board,
        legal: &[u8],
        budget: u32,
    ) -> Result<MoveDecision<'_, E>, BotError> {
        match legal {
            [] => return Err(BotError::NoLegalMoves),
            [only] => {
                debug!(column = *only, "Single legal move");
                return Ok(MoveDecision::Immediate(*only));
            }
            _ => {}
        }

        if let Err(e) = self.initialize() {
            let column = self.fallback_move(legal)?;
            warn!(error = %e, column, "Initialization failed, playing fallback move");
            return Ok(MoveDecision::Immediate(column));
        }

        if let Some(forced) = find_forced_move(board, legal, self.agent) {
            info!(column = forced.column, kind = ?forced.kind, "Tactical move");
            return Ok(MoveDecision::Immediate(forced.column));
        }

        self.reclaim_if_needed();

        // Columns the caller allows that can actually be played here
        let playable: Vec<u8> = legal.iter().copied().filter(|&c| board.is_legal(c)).collect();
        let allowed = if playable.is_empty() {
            legal.to_vec()
        } else {
            playable
        };

        let budget = self.config.clamp_budget(budget);
        let search = MctsSearch::new(
            &mut self.tree,
            &mut self.cache,
            &self.evaluator,
            self.config.clone(),
            board.clone(),
            self.agent,
            budget,
        )?;

        Ok(MoveDecision::Search(PendingSearch {
            search,
            rng: &mut self.rng,
            allowed,
        }))
    }

    /// Drop the arena and its index together once the arena grows too big.
    fn reclaim_if_needed(&mut self) {
        if self.tree.len() > self.config.max_tree_nodes {
            debug!(
                nodes = self.tree.len(),
                limit = self.config.max_tree_nodes,
                "Reclaiming search tree"
            );
            self.tree.clear();
            self.cache.clear();
        }
    }

    /// Center column when allowed, otherwise a random allowed column.
    fn fallback_move(&mut self, legal: &[u8]) -> Result<u8, BotError> {
        if legal.contains(&CENTER_COLUMN) {
            return Ok(CENTER_COLUMN);
        }
        legal
            .choose(&mut self.rng)
            .copied()
            .ok_or(BotError::NoLegalMoves)
    }
}
