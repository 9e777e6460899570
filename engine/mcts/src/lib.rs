//! Monte Carlo Tree Search (MCTS) move engine for Connect Four.
//!
//! # Overview
//!
//! MCTS is a search algorithm that builds a search tree by running simulations.
//! Each simulation consists of four phases:
//!
//! 1. **Selection**: Traverse the tree using UCB1 (Upper Confidence Bound) to
//!    balance exploration and exploitation
//! 2. **Expansion**: When reaching a node with untried moves, add one child
//!    for a randomly chosen untried column
//! 3. **Evaluation**: Score the new node with a random rollout (or its fixed
//!    value if the game is already over)
//! 4. **Backpropagation**: Update visit counts and scores along the path from
//!    the leaf back to the search root
//!
//! Before any of that, a one-ply tactical pre-filter plays immediate wins and
//! blocks immediate losses.
//!
//! # Usage
//!
//! ```rust,ignore
//! use games_connect4::{Board, Player};
//! use mcts::{MctsConfig, StrongBot};
//!
//! let mut bot = StrongBot::with_seed(MctsConfig::default(), Player::Yellow, 42);
//! bot.initialize()?;
//!
//! let mut board = Board::new();
//! board.apply_move(3, Player::Red)?;
//!
//! let column = bot.select_move(&board, &board.legal_moves(), 1000)?;
//! println!("Bot plays column {column}");
//! ```
//!
//! Hosts that must stay responsive call [`StrongBot::begin_search`] instead
//! and step the returned [`PendingSearch`] one chunk at a time.
//!
//! # Configuration
//!
//! The [`MctsConfig`] struct controls search behavior:
//!
//! - `num_simulations`: Default budget per move (default: 1000)
//! - `max_simulations`: Hard cap on any requested budget (default: 5000)
//! - `exploration`: UCB1 exploration constant (default: 1.414)
//! - `chunk_size`: Simulations between yield points (default: 50)
//! - `cache_capacity`: Position cache size before a full clear (default: 10 000)
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                          StrongBot                           │
//! │   tactics ──► MctsSearch (one chunk per step)                │
//! ├──────────────────────────────────────────────────────────────┤
//! │  ┌─────────────┐  ┌───────────────┐  ┌─────────────────────┐ │
//! │  │  MctsTree   │  │ PositionCache │  │     Evaluator       │ │
//! │  │  (arena)    │◄─┤ (key → node)  │  │  (random rollout)   │ │
//! │  └─────────────┘  └───────────────┘  └─────────────────────┘ │
//! └──────────────────────────────────────────────────────────────┘
//! ```

pub mod bot;
pub mod cache;
pub mod config;
pub mod evaluator;
pub mod node;
pub mod search;
pub mod tactics;
pub mod tree;

// Re-export main types
pub use bot::{BotError, MoveDecision, PendingSearch, StrongBot};
pub use cache::{CacheInsert, PositionCache};
pub use config::MctsConfig;
pub use evaluator::{rollout, Evaluator, EvaluatorError, RolloutEvaluator, RolloutOutcome};
pub use node::{MctsNode, NodeId, DRAW_SCORE, LOSS_SCORE, WIN_SCORE};
pub use search::{run_mcts, MctsSearch, SearchError, SearchProgress, SearchResult, SearchStats};
pub use tactics::{find_forced_move, winning_move, TacticKind, TacticalMove};
pub use tree::{MctsTree, TreeStats};
