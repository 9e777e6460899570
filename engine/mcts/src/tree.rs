//! MCTS tree structure with arena allocation.
//!
//! The tree uses arena allocation for efficient node storage and
//! cache-friendly traversal. Nodes are stored in a contiguous Vec
//! and referenced by NodeId indices; children hold their parent's id, so
//! there are no ownership cycles.
//!
//! One arena outlives individual searches. Every search is rooted at some
//! node inside it, either freshly added or adopted from the position cache.

use games_connect4::{Board, Player, RulesError, COLS};
use rand::Rng;
use rand_chacha::ChaCha20Rng;

use crate::node::{MctsNode, NodeId};

/// MCTS tree with arena-based node storage.
#[derive(Debug, Default)]
pub struct MctsTree {
    /// Arena storing all nodes
    nodes: Vec<MctsNode>,
}

impl MctsTree {
    /// Create an empty arena.
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Add a parentless node for `board` and return its id.
    pub fn add_root(&mut self, board: Board, to_move: Player) -> NodeId {
        self.allocate(MctsNode::new_root(board, to_move))
    }

    /// Get a reference to a node by ID.
    #[inline]
    pub fn get(&self, id: NodeId) -> &MctsNode {
        &self.nodes[id.0 as usize]
    }

    /// Get a mutable reference to a node by ID.
    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut MctsNode {
        &mut self.nodes[id.0 as usize]
    }

    /// Non-panicking lookup, used to validate ids held by the cache.
    #[inline]
    pub fn try_get(&self, id: NodeId) -> Option<&MctsNode> {
        self.nodes.get(id.0 as usize)
    }

    /// Allocate a new node and return its ID.
    pub fn allocate(&mut self, node: MctsNode) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Get the total number of nodes in the arena.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Drop every node. All outstanding NodeIds become invalid, so the
    /// position cache must be cleared alongside.
    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    /// Select the best child of a node using UCB1.
    ///
    /// Ties go to the child encountered first.
    pub fn select_child(&self, node_id: NodeId, exploration: f32) -> Option<NodeId> {
        let node = self.get(node_id);
        // Pre-compute ln once instead of per-child comparison
        let parent_visits_ln = (node.visit_count as f32).ln();

        let mut best: Option<(NodeId, f32)> = None;
        for &(_, child_id) in &node.children {
            let score = self.get(child_id).ucb1(parent_visits_ln, exploration);
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((child_id, score)),
            }
        }
        best.map(|(id, _)| id)
    }

    /// Expand one random untried move of `node_id`.
    ///
    /// Returns `Ok(None)` when the node is terminal or has nothing left to
    /// try. The drawn move is removed from `untried` before it is applied, so
    /// a failed application never leaves a duplicate behind.
    pub fn expand(
        &mut self,
        node_id: NodeId,
        rng: &mut ChaCha20Rng,
    ) -> Result<Option<NodeId>, RulesError> {
        let node = self.get_mut(node_id);
        if !node.is_expandable() {
            return Ok(None);
        }

        let index = rng.gen_range(0..node.untried.len());
        let column = node.untried.swap_remove(index);
        let player = node.to_move;
        let board = node.board.with_move(column, player)?;

        let child = MctsNode::new(board, player.opponent(), node_id, Some(column));
        let child_id = self.allocate(child);
        self.get_mut(node_id).children.push((column, child_id));

        Ok(Some(child_id))
    }

    /// Backpropagate a score from `leaf_id` up to and including `root_id`.
    ///
    /// `score` is the evaluation for the player to move at the leaf. Each
    /// node is credited from the view of the player who moved into it, so
    /// nodes where the leaf's player is to move receive `-score` and the
    /// others `+score`.
    pub fn backpropagate(&mut self, leaf_id: NodeId, root_id: NodeId, score: f32) {
        let leaf_to_move = self.get(leaf_id).to_move;
        let mut current_id = leaf_id;

        while current_id.is_some() {
            let node = self.get_mut(current_id);
            let credit = if node.to_move == leaf_to_move {
                -score
            } else {
                score
            };
            node.update(credit);

            if current_id == root_id {
                break;
            }
            current_id = node.parent;
        }
    }

    /// Get the most visited child of `root_id`.
    /// Returns (action, visit_count) or None if it has no children.
    pub fn best_action(&self, root_id: NodeId) -> Option<(u8, u32)> {
        self.best_action_among(root_id, None)
    }

    /// Like [`MctsTree::best_action`], optionally restricted to `allowed`
    /// columns. Ties go to the child expanded first.
    pub fn best_action_among(&self, root_id: NodeId, allowed: Option<&[u8]>) -> Option<(u8, u32)> {
        let mut best: Option<(u8, u32)> = None;
        for &(action, child_id) in &self.get(root_id).children {
            if allowed.is_some_and(|cols| !cols.contains(&action)) {
                continue;
            }
            let visits = self.get(child_id).visit_count;
            match best {
                Some((_, best_visits)) if visits <= best_visits => {}
                _ => best = Some((action, visits)),
            }
        }
        best
    }

    /// Visit count per column for the children of `root_id`.
    pub fn visit_counts(&self, root_id: NodeId) -> [u32; COLS] {
        let mut counts = [0u32; COLS];
        for &(action, child_id) in &self.get(root_id).children {
            counts[action as usize] = self.get(child_id).visit_count;
        }
        counts
    }

    /// Get statistics about the subtree under `root_id` for debugging.
    pub fn stats(&self, root_id: NodeId) -> TreeStats {
        let root = self.get(root_id);
        TreeStats {
            total_nodes: self.nodes.len(),
            root_visits: root.visit_count,
            root_value: root.mean_value(),
            max_depth: self.compute_max_depth(root_id),
        }
    }

    fn compute_max_depth(&self, root_id: NodeId) -> u32 {
        // Iterative walk: a game is at most 42 plies deep but the arena may
        // hold many subtrees.
        let mut max_depth = 0;
        let mut stack = vec![(root_id, 0u32)];
        while let Some((id, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            for &(_, child) in &self.get(id).children {
                stack.push((child, depth + 1));
            }
        }
        max_depth
    }
}

/// Statistics about an MCTS tree.
#[derive(Debug, Clone)]
pub struct TreeStats {
    pub total_nodes: usize,
    pub root_visits: u32,
    pub root_value: f32,
    pub max_depth: u32,
}
