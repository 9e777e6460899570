use super::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// Play alternating moves starting with Red.
fn play(columns: &[u8]) -> Board {
    let mut board = Board::new();
    let mut player = Player::Red;
    for &col in columns {
        board.apply_move(col, player).unwrap();
        player = player.opponent();
    }
    board
}

/// Board holding `player` discs at the given (col, row) cells, stacked on
/// opponent filler so gravity holds.
fn board_with_line(player: Player, cells: &[(usize, usize)]) -> Board {
    let mut rows = [[0u8; COLS]; ROWS];
    for &(col, row) in cells {
        for below in 0..row {
            let slot = &mut rows[ROWS - 1 - below][col];
            if *slot == 0 {
                *slot = player.opponent().as_u8();
            }
        }
        rows[ROWS - 1 - row][col] = player.as_u8();
    }
    Board::from_rows(&rows).unwrap()
}

#[test]
fn test_initial_board() {
    let board = Board::new();
    assert_eq!(board.moves_played(), 0);
    assert_eq!(board.winner(), None);
    assert!(!board.is_draw());
    assert!(!board.is_full());
    assert_eq!(board.next_player(), Player::Red);
}

#[test]
fn test_legal_moves() {
    let board = Board::new();
    assert_eq!(board.legal_moves(), (0..COLS as u8).collect::<Vec<_>>());
    assert_eq!(board.legal_moves_mask(), 0x7Fu8); // All 7 columns

    let board = play(&[3]);
    let legal = board.legal_moves();
    assert_eq!(legal.len(), 7); // All columns still available
    assert!(legal.contains(&3));
}

#[test]
fn test_apply_move_returns_row() {
    let mut board = Board::new();
    assert_eq!(board.apply_move(3, Player::Red), Ok(0));
    assert_eq!(board.apply_move(3, Player::Yellow), Ok(1));
    assert_eq!(board.cell(3, 0), Some(Cell::Red));
    assert_eq!(board.cell(3, 1), Some(Cell::Yellow));
    assert_eq!(board.column_height(3), Some(2));
    assert_eq!(board.next_player(), Player::Red);
}

#[test]
fn test_with_move_leaves_original_untouched() {
    let board = Board::new();
    let next = board.with_move(2, Player::Red).unwrap();
    assert_eq!(board.moves_played(), 0);
    assert_eq!(next.moves_played(), 1);
    assert_eq!(next.cell(2, 0), Some(Cell::Red));
}

#[test]
fn test_full_column_is_rejected() {
    let mut board = play(&[0, 0, 0, 0, 0, 0]);
    assert!(!board.legal_moves().contains(&0));
    assert_eq!(board.legal_moves_mask() & 1, 0);

    let before = board.clone();
    assert_eq!(
        board.apply_move(0, Player::Red),
        Err(RulesError::ColumnFull { column: 0 })
    );
    // Board should be unchanged
    assert_eq!(before, board);
}

#[test]
fn test_invalid_column_is_rejected() {
    let mut board = Board::new();
    assert_eq!(
        board.apply_move(7, Player::Red),
        Err(RulesError::InvalidColumn { column: 7 })
    );
    assert!(!board.is_legal(7));
}

#[test]
fn test_horizontal_win() {
    let board = board_with_line(Player::Red, &[(0, 0), (1, 0), (2, 0), (3, 0)]);
    assert_eq!(board.winner(), Some(Player::Red));
    assert!(board.wins_at(3, 0));
    assert!(board.wins_at(0, 0));
}

#[test]
fn test_vertical_win() {
    let board = board_with_line(Player::Yellow, &[(4, 0), (4, 1), (4, 2), (4, 3)]);
    assert_eq!(board.winner(), Some(Player::Yellow));
    assert!(board.wins_at(4, 3));
}

#[test]
fn test_diagonal_win_ascending() {
    let board = board_with_line(Player::Red, &[(0, 0), (1, 1), (2, 2), (3, 3)]);
    assert_eq!(board.winner(), Some(Player::Red));
    assert!(board.wins_at(2, 2));
}

#[test]
fn test_diagonal_win_descending() {
    let board = board_with_line(Player::Yellow, &[(3, 0), (2, 1), (1, 2), (0, 3)]);
    assert_eq!(board.winner(), Some(Player::Yellow));
    assert!(board.wins_at(0, 3));
}

#[test]
fn test_diagonal_win_by_play() {
    // Build ascending diagonal for Red: (0,0), (1,1), (2,2), (3,3)
    // Yellow supplies the supporting discs underneath
    let board = play(&[0, 1, 1, 2, 2, 3, 2, 3, 3, 5, 3]);
    assert_eq!(board.winner(), Some(Player::Red));
}

#[test]
fn test_three_with_gap_is_not_a_win() {
    // Red: 0, 1, 3 on the bottom row, column 2 empty
    let mut rows = [[0u8; COLS]; ROWS];
    rows[ROWS - 1] = [1, 1, 0, 1, 0, 0, 0];
    let board = Board::from_rows(&rows).unwrap();
    assert_eq!(board.winner(), None);
    assert!(!board.wins_at(3, 0));

    // Three in a column with the fourth belonging to the opponent
    let board = play(&[0, 1, 0, 1, 0, 0]);
    assert_eq!(board.winner(), None);
}

#[test]
fn test_draw_board() {
    // Pattern that avoids 4-in-a-row (bottom row listed last):
    let pattern = [
        [1, 2, 1, 2, 1, 2, 1],
        [1, 2, 1, 2, 1, 2, 1],
        [2, 1, 2, 1, 2, 1, 2],
        [2, 1, 2, 1, 2, 1, 2],
        [1, 2, 1, 2, 1, 2, 1],
        [1, 2, 1, 2, 1, 2, 1],
    ];
    let board = Board::from_rows(&pattern).unwrap();
    assert!(board.is_full());
    assert!(board.legal_moves().is_empty());
    assert_eq!(board.winner(), None);
    assert!(board.is_draw());
}

#[test]
fn test_from_rows_rejects_floating_disc() {
    let mut rows = [[0u8; COLS]; ROWS];
    rows[ROWS - 2][4] = 1; // row 1 of column 4 with nothing below
    assert_eq!(
        Board::from_rows(&rows),
        Err(RulesError::FloatingPiece { column: 4, row: 1 })
    );
}

#[test]
fn test_from_rows_rejects_unknown_cell() {
    let mut rows = [[0u8; COLS]; ROWS];
    rows[ROWS - 1][0] = 7;
    assert_eq!(Board::from_rows(&rows), Err(RulesError::InvalidCell(7)));
}

#[test]
fn test_rows_conversion_matches_play() {
    let board = play(&[3, 3, 4]);
    let rows = board.to_rows();
    assert_eq!(rows[ROWS - 1], [0, 0, 0, 1, 1, 0, 0]);
    assert_eq!(rows[ROWS - 2], [0, 0, 0, 2, 0, 0, 0]);
    assert_eq!(Board::from_rows(&rows).unwrap(), board);
}

#[test]
fn test_key_identity_and_distinctness() {
    let a = play(&[3, 3, 4]);
    let b = play(&[4, 3, 3]);
    // Different move orders, same cells except which player owns (3,0)/(4,0)
    assert_ne!(a, b);
    assert_ne!(a.key(), b.key());

    let c = play(&[3, 2, 4]);
    let d = {
        let mut board = Board::new();
        board.apply_move(4, Player::Red).unwrap();
        board.apply_move(2, Player::Yellow).unwrap();
        board.apply_move(3, Player::Red).unwrap();
        board
    };
    assert_eq!(c, d);
    assert_eq!(c.key(), d.key());
}

#[test]
fn test_key_distinguishes_single_cell_changes() {
    let base = play(&[0, 1, 2, 3, 4, 5, 6]);
    for col in 0..COLS as u8 {
        for player in [Player::Red, Player::Yellow] {
            let changed = base.with_move(col, player).unwrap();
            assert_ne!(changed.key(), base.key());
        }
    }
    let red = base.with_move(3, Player::Red).unwrap();
    let yellow = base.with_move(3, Player::Yellow).unwrap();
    assert_ne!(red.key(), yellow.key());
}

#[test]
fn test_key_string_form() {
    let board = play(&[0]);
    let text = board.key().to_string();
    assert_eq!(text.len(), BOARD_SIZE);
    // Top row first; the Red disc sits at the start of the last row
    assert_eq!(&text[35..], "1000000");
    assert!(text[..35].chars().all(|c| c == '0'));
}

#[test]
fn test_display_renders_grid() {
    let board = play(&[3, 3]);
    let text = board.to_string();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), ROWS + 1);
    assert_eq!(lines[ROWS - 1], ". . . X . . .");
    assert_eq!(lines[ROWS - 2], ". . . O . . .");
}

#[test]
fn test_player_parsing() {
    assert_eq!("red".parse::<Player>(), Ok(Player::Red));
    assert_eq!("Yellow".parse::<Player>(), Ok(Player::Yellow));
    assert_eq!("second".parse::<Player>(), Ok(Player::Yellow));
    assert!("blue".parse::<Player>().is_err());
    assert_eq!(Player::from_u8(2), Some(Player::Yellow));
    assert_eq!(Player::from_u8(0), None);
}

#[test]
fn test_random_games_keep_gravity() {
    for seed in 0..20 {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let mut board = Board::new();
        let mut player = Player::Red;

        loop {
            let legal = board.legal_moves();
            if legal.is_empty() {
                break;
            }
            let col = legal[rng.gen_range(0..legal.len())];
            let row = board.apply_move(col, player).unwrap();
            assert_eq!(board.column_height(col as usize), Some(row as u8 + 1));

            // Every column is a contiguous stack from the bottom
            for c in 0..COLS {
                let height = board.column_height(c).unwrap() as usize;
                for r in 0..ROWS {
                    let filled = board.cell(c, r) != Some(Cell::Empty);
                    assert_eq!(filled, r < height, "gravity broken (seed={seed})");
                }
            }

            // Local and full scans agree on the move that ends the game
            if board.wins_at(col as usize, row) {
                assert_eq!(board.winner(), Some(player), "seed={seed}");
                break;
            }
            assert_eq!(board.winner(), None, "seed={seed}");
            player = player.opponent();
        }

        assert!(board.moves_played() <= BOARD_SIZE);
    }
}
