//! MCTS tree node representation.
//!
//! Each node represents a board position reached by dropping a disc from the
//! parent position. Nodes store the visit statistics used for UCB1 selection.

use games_connect4::{Board, BoardKey, Player};

/// Score of a won game for the player it is credited to.
pub const WIN_SCORE: f32 = 1.0;
/// Score of a lost game.
pub const LOSS_SCORE: f32 = -WIN_SCORE;
/// Score of a drawn game.
pub const DRAW_SCORE: f32 = 0.0;

/// Index into the node arena. Using a newtype for type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    pub const NONE: NodeId = NodeId(u32::MAX);

    pub fn is_none(self) -> bool {
        self == Self::NONE
    }

    pub fn is_some(self) -> bool {
        !self.is_none()
    }
}

/// A node in the MCTS tree.
///
/// `visit_count` and `win_score` are credited from the point of view of the
/// player who moved *into* this node (the opponent of `to_move`), which is
/// the player choosing among siblings when the parent runs UCB1.
#[derive(Debug, Clone)]
pub struct MctsNode {
    /// Parent node index (NONE for a root created fresh)
    pub parent: NodeId,

    /// Column that led to this node from its parent
    pub action: Option<u8>,

    /// Position at this node (owned copy)
    pub board: Board,

    /// Player whose turn it is at this node
    pub to_move: Player,

    /// Canonical cache key of `board`
    pub key: BoardKey,

    /// Number of times this node has been visited
    pub visit_count: u32,

    /// Sum of scores backpropagated through this node
    pub win_score: f32,

    /// Expanded children as (column, NodeId) pairs, in expansion order
    pub children: Vec<(u8, NodeId)>,

    /// Legal columns not yet expanded into children
    pub untried: Vec<u8>,

    /// Whether this is a finished game
    pub is_terminal: bool,

    /// Score of the finished game for `to_move` (only valid if is_terminal)
    pub terminal_value: f32,
}

impl MctsNode {
    /// Create a node for `board` with `to_move` to play.
    ///
    /// Terminal status, terminal value and the cache key are computed here
    /// once and never recomputed.
    pub fn new(board: Board, to_move: Player, parent: NodeId, action: Option<u8>) -> Self {
        let untried = board.legal_moves();
        let (is_terminal, terminal_value) = match board.winner() {
            Some(winner) if winner == to_move => (true, WIN_SCORE),
            Some(_) => (true, LOSS_SCORE),
            None if untried.is_empty() => (true, DRAW_SCORE),
            None => (false, DRAW_SCORE),
        };
        let key = board.key();

        Self {
            parent,
            action,
            board,
            to_move,
            key,
            visit_count: 0,
            win_score: 0.0,
            children: Vec::new(),
            untried,
            is_terminal,
            terminal_value,
        }
    }

    /// Create a root node (no parent, no originating move).
    pub fn new_root(board: Board, to_move: Player) -> Self {
        Self::new(board, to_move, NodeId::NONE, None)
    }

    /// Average score per visit. Returns 0.0 if never visited.
    #[inline]
    pub fn mean_value(&self) -> f32 {
        if self.visit_count == 0 {
            0.0
        } else {
            self.win_score / self.visit_count as f32
        }
    }

    /// UCB1 selection score.
    ///
    /// UCB1 = win_score / N + C * sqrt(ln(N_parent) / N)
    ///
    /// Unvisited nodes score `f32::INFINITY` so they are always tried before
    /// any visited sibling.
    ///
    /// Note: Takes pre-computed ln(parent_visits) to avoid redundant ln calls
    /// when comparing multiple children.
    #[inline]
    pub fn ucb1(&self, parent_visits_ln: f32, exploration: f32) -> f32 {
        if self.visit_count == 0 {
            return f32::INFINITY;
        }
        let visits = self.visit_count as f32;
        let exploitation = self.win_score / visits;
        let exploration = exploration * (parent_visits_ln / visits).sqrt();
        exploitation + exploration
    }

    /// Record one visit with a score already oriented for this node.
    #[inline]
    pub fn update(&mut self, score: f32) {
        self.visit_count += 1;
        self.win_score += score;
    }

    /// Whether expansion can add another child here.
    #[inline]
    pub fn is_expandable(&self) -> bool {
        !self.is_terminal && !self.untried.is_empty()
    }

    /// Selection descends through nodes that are fully expanded, non-terminal
    /// and have at least one child.
    #[inline]
    pub fn is_fully_expanded(&self) -> bool {
        !self.is_terminal && self.untried.is_empty() && !self.children.is_empty()
    }
}
