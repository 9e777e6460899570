//! Position cache: canonical board key to arena node.
//!
//! The cache is an index into the long-lived [`MctsTree`] arena, never the
//! owner of any node. Clearing it drops only the index entries, so nodes held
//! by an in-progress search stay valid.

use std::collections::HashMap;

use games_connect4::{BoardKey, Player};
use tracing::debug;

use crate::node::NodeId;
use crate::tree::MctsTree;

/// What happened on a [`PositionCache::insert`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheInsert {
    /// The key was new and has been recorded
    pub inserted: bool,

    /// The insert pushed the cache over capacity and it was emptied
    pub cleared: bool,
}

/// Bounded map from [`BoardKey`] to the node first built for that position.
///
/// Eviction is all-or-nothing: once the cache holds more than `capacity`
/// entries it is cleared in full.
#[derive(Debug)]
pub struct PositionCache {
    entries: HashMap<BoardKey, NodeId>,
    capacity: usize,
    clears: u64,
}

impl PositionCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            capacity,
            clears: 0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of full clears triggered by crossing the capacity.
    pub fn clears(&self) -> u64 {
        self.clears
    }

    /// Raw lookup without validation.
    pub fn get(&self, key: BoardKey) -> Option<NodeId> {
        self.entries.get(&key).copied()
    }

    /// Find a node in `tree` for `key` with `to_move` to play.
    ///
    /// Entries pointing past the end of the arena, or at a node for another
    /// position, are treated as misses.
    pub fn lookup(&self, tree: &MctsTree, key: BoardKey, to_move: Player) -> Option<NodeId> {
        let id = self.get(key)?;
        let node = tree.try_get(id)?;
        (node.key == key && node.to_move == to_move).then_some(id)
    }

    /// Record `id` for `key` unless the key is already present.
    pub fn insert(&mut self, key: BoardKey, id: NodeId) -> CacheInsert {
        if self.entries.contains_key(&key) {
            return CacheInsert::default();
        }
        self.entries.insert(key, id);

        let cleared = self.entries.len() > self.capacity;
        if cleared {
            debug!(
                capacity = self.capacity,
                clears = self.clears + 1,
                "Position cache over capacity, clearing"
            );
            self.entries.clear();
            self.clears += 1;
        }

        CacheInsert {
            inserted: true,
            cleared,
        }
    }

    /// Drop every entry. Used when the arena itself is reclaimed.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use games_connect4::Board;

    #[test]
    fn test_insert_if_absent() {
        let mut cache = PositionCache::new(10);
        let key = Board::new().key();

        assert_eq!(
            cache.insert(key, NodeId(1)),
            CacheInsert {
                inserted: true,
                cleared: false
            }
        );
        // Second insert keeps the first node
        assert_eq!(cache.insert(key, NodeId(2)), CacheInsert::default());
        assert_eq!(cache.get(key), Some(NodeId(1)));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_clears_in_full_past_capacity() {
        let mut cache = PositionCache::new(3);
        let boards: Vec<Board> = (0..4u8)
            .map(|col| Board::new().with_move(col, Player::Red).unwrap())
            .collect();

        for (i, board) in boards.iter().take(3).enumerate() {
            let result = cache.insert(board.key(), NodeId(i as u32));
            assert!(!result.cleared);
        }
        assert_eq!(cache.len(), 3);

        let result = cache.insert(boards[3].key(), NodeId(3));
        assert!(result.inserted);
        assert!(result.cleared);
        assert!(cache.is_empty());
        assert_eq!(cache.clears(), 1);
    }

    #[test]
    fn test_lookup_validates_node() {
        let mut tree = MctsTree::new();
        let board = Board::new();
        let root = tree.add_root(board.clone(), Player::Red);

        let mut cache = PositionCache::new(10);
        cache.insert(board.key(), root);

        assert_eq!(cache.lookup(&tree, board.key(), Player::Red), Some(root));
        // Same position, other player to move
        assert_eq!(cache.lookup(&tree, board.key(), Player::Yellow), None);

        // Entry survives an arena reclaim but must not resolve
        tree.clear();
        assert_eq!(cache.lookup(&tree, board.key(), Player::Red), None);

        // Stale id pointing at a different position
        let other = Board::new().with_move(3, Player::Red).unwrap();
        tree.add_root(other, Player::Yellow);
        assert_eq!(cache.lookup(&tree, board.key(), Player::Red), None);
    }
}
