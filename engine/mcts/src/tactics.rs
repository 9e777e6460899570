//! One-ply tactical checks run before tree search.
//!
//! Random rollouts are not reliable at spotting an immediate win or an
//! immediate threat at small budgets, so these checks take precedence over
//! the search result whenever they fire.

use games_connect4::{Board, Player};

/// Why a forced move was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TacticKind {
    /// The move connects four for the agent.
    Win,
    /// The move occupies the cell where the opponent would connect four.
    Block,
}

/// A move the pre-filter plays without searching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TacticalMove {
    pub column: u8,
    pub kind: TacticKind,
}

/// First column in `legal` (in the given order) where `player` connects four.
///
/// Columns that cannot be played on `board` are skipped.
pub fn winning_move(board: &Board, legal: &[u8], player: Player) -> Option<u8> {
    legal.iter().copied().find(|&column| {
        let mut probe = board.clone();
        match probe.apply_move(column, player) {
            Ok(row) => probe.wins_at(column as usize, row),
            Err(_) => false,
        }
    })
}

/// Look for a win for `agent`, then for a column that stops the opponent's
/// win, each pass in column order.
pub fn find_forced_move(board: &Board, legal: &[u8], agent: Player) -> Option<TacticalMove> {
    if let Some(column) = winning_move(board, legal, agent) {
        return Some(TacticalMove {
            column,
            kind: TacticKind::Win,
        });
    }

    winning_move(board, legal, agent.opponent()).map(|column| TacticalMove {
        column,
        kind: TacticKind::Block,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use games_connect4::{COLS, ROWS};

    fn bottom_row(cells: [u8; COLS]) -> Board {
        let mut rows = [[0u8; COLS]; ROWS];
        rows[ROWS - 1] = cells;
        Board::from_rows(&rows).unwrap()
    }

    fn all_columns() -> Vec<u8> {
        (0..COLS as u8).collect()
    }

    #[test]
    fn test_finds_own_win() {
        let board = bottom_row([2, 2, 2, 0, 1, 1, 0]);
        let forced = find_forced_move(&board, &all_columns(), Player::Yellow);
        assert_eq!(
            forced,
            Some(TacticalMove {
                column: 3,
                kind: TacticKind::Win
            })
        );
    }

    #[test]
    fn test_win_beats_block() {
        // Both sides threaten; the agent's own win comes first
        let board = bottom_row([1, 1, 1, 0, 2, 2, 2]);
        let forced = find_forced_move(&board, &all_columns(), Player::Yellow).unwrap();
        assert_eq!(forced.kind, TacticKind::Win);
        assert_eq!(forced.column, 3);
    }

    #[test]
    fn test_blocks_opponent() {
        let board = bottom_row([1, 1, 1, 0, 0, 0, 0]);
        let forced = find_forced_move(&board, &all_columns(), Player::Yellow);
        assert_eq!(
            forced,
            Some(TacticalMove {
                column: 3,
                kind: TacticKind::Block
            })
        );
    }

    #[test]
    fn test_vertical_threat() {
        let mut board = Board::new();
        for _ in 0..3 {
            board.apply_move(5, Player::Red).unwrap();
        }
        assert_eq!(winning_move(&board, &all_columns(), Player::Red), Some(5));
        assert_eq!(winning_move(&board, &all_columns(), Player::Yellow), None);
    }

    #[test]
    fn test_only_listed_columns_are_considered() {
        let board = bottom_row([1, 1, 1, 0, 0, 0, 0]);
        assert_eq!(find_forced_move(&board, &[0, 1, 2, 4, 5], Player::Yellow), None);
    }

    #[test]
    fn test_full_and_invalid_columns_are_skipped() {
        let mut board = bottom_row([0, 1, 1, 1, 0, 0, 0]);
        // Fill column 0 so the left end is unavailable
        for i in 0..ROWS {
            let player = if i % 2 == 0 { Player::Yellow } else { Player::Red };
            board.apply_move(0, player).unwrap();
        }
        assert_eq!(winning_move(&board, &[0, 9, 4], Player::Red), Some(4));
    }

    #[test]
    fn test_quiet_position() {
        assert_eq!(
            find_forced_move(&Board::new(), &all_columns(), Player::Red),
            None
        );
    }
}
