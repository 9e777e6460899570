//! Connect 4 rules for the MCTS move engine
//!
//! Connect 4 is a two-player connection game where players drop colored discs
//! into a 7-column, 6-row vertically suspended grid. The objective is to be
//! the first to form a horizontal, vertical, or diagonal line of four discs.
//!
//! # Board Layout
//!
//! The board is stored in row-major order, with row 0 at the bottom:
//! ```text
//! Row 5: [35][36][37][38][39][40][41]  <- Top
//! Row 4: [28][29][30][31][32][33][34]
//! Row 3: [21][22][23][24][25][26][27]
//! Row 2: [14][15][16][17][18][19][20]
//! Row 1: [ 7][ 8][ 9][10][11][12][13]
//! Row 0: [ 0][ 1][ 2][ 3][ 4][ 5][ 6]  <- Bottom
//!         Col 0  1  2  3  4  5  6
//! ```
//!
//! Hosts usually hold the grid in display order (top row first). Use
//! [`Board::from_rows`] and [`Board::to_rows`] to convert.
//!
//! # Usage
//!
//! ```rust
//! use games_connect4::{Board, Player};
//!
//! let mut board = Board::new();
//! for col in 0..4 {
//!     board.apply_move(col, Player::Red).unwrap();
//! }
//! assert_eq!(board.winner(), Some(Player::Red));
//! ```

use std::fmt;

use thiserror::Error;

/// Board dimensions
pub const COLS: usize = 7;
pub const ROWS: usize = 6;
pub const BOARD_SIZE: usize = COLS * ROWS; // 42

/// Number of discs in a row needed to win.
pub const CONNECT: usize = 4;

/// Errors raised by move application and board construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RulesError {
    #[error("column {column} is full")]
    ColumnFull { column: u8 },

    #[error("column {column} is outside the board")]
    InvalidColumn { column: u8 },

    #[error("disc at column {column}, row {row} has an empty cell beneath it")]
    FloatingPiece { column: u8, row: u8 },

    #[error("invalid cell value {0} (expected 0, 1 or 2)")]
    InvalidCell(u8),
}

/// A player. Red always moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Player {
    Red,
    Yellow,
}

impl Player {
    /// The other player.
    #[inline]
    pub fn opponent(self) -> Self {
        match self {
            Player::Red => Player::Yellow,
            Player::Yellow => Player::Red,
        }
    }

    /// Host encoding: 1 = Red, 2 = Yellow.
    pub fn as_u8(self) -> u8 {
        match self {
            Player::Red => 1,
            Player::Yellow => 2,
        }
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(Player::Red),
            2 => Some(Player::Yellow),
            _ => None,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::Red => write!(f, "red"),
            Player::Yellow => write!(f, "yellow"),
        }
    }
}

impl std::str::FromStr for Player {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "red" | "1" | "first" => Ok(Player::Red),
            "yellow" | "2" | "second" => Ok(Player::Yellow),
            other => Err(format!("unknown player '{other}' (expected red or yellow)")),
        }
    }
}

/// Contents of a single board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    #[default]
    Empty,
    Red,
    Yellow,
}

impl Cell {
    /// Two-bit code used by the canonical key: 0 = empty, 1 = Red, 2 = Yellow.
    #[inline]
    fn code(self) -> u8 {
        match self {
            Cell::Empty => 0,
            Cell::Red => 1,
            Cell::Yellow => 2,
        }
    }

    fn from_code(code: u8) -> Result<Self, RulesError> {
        match code {
            0 => Ok(Cell::Empty),
            1 => Ok(Cell::Red),
            2 => Ok(Cell::Yellow),
            other => Err(RulesError::InvalidCell(other)),
        }
    }

    pub fn player(self) -> Option<Player> {
        match self {
            Cell::Empty => None,
            Cell::Red => Some(Player::Red),
            Cell::Yellow => Some(Player::Yellow),
        }
    }
}

impl From<Player> for Cell {
    fn from(player: Player) -> Self {
        match player {
            Player::Red => Cell::Red,
            Player::Yellow => Cell::Yellow,
        }
    }
}

/// Canonical position key used by the search cache.
///
/// Packs two bits per cell (84 bits total), so two boards share a key
/// exactly when their cell contents are identical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BoardKey(pub u128);

impl fmt::Display for BoardKey {
    /// Renders the 42-digit string form, top row first.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in (0..ROWS).rev() {
            for col in 0..COLS {
                let code = (self.0 >> (2 * Board::pos(col, row))) & 0b11;
                write!(f, "{code}")?;
            }
        }
        Ok(())
    }
}

/// Connect4 board
///
/// Holds cell contents and the height of each column. Gravity is maintained
/// by construction: every mutation goes through [`Board::apply_move`] or the
/// validated [`Board::from_rows`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    cells: [Cell; BOARD_SIZE],
    /// Height of each column (0-6 means number of pieces in column)
    column_heights: [u8; COLS],
}

/// Direction vectors: horizontal, vertical, diagonal /, diagonal \
const DIRECTIONS: [(i32, i32); 4] = [(1, 0), (0, 1), (1, 1), (1, -1)];

impl Board {
    /// Create an empty board
    pub fn new() -> Self {
        Self {
            cells: [Cell::Empty; BOARD_SIZE],
            column_heights: [0; COLS],
        }
    }

    /// Build a board from a host grid in display order (row 0 is the top).
    ///
    /// Cell values are 0 (empty), 1 (Red) or 2 (Yellow).
    pub fn from_rows(rows: &[[u8; COLS]; ROWS]) -> Result<Self, RulesError> {
        let mut board = Self::new();
        for col in 0..COLS {
            let mut seen_empty = false;
            for row in 0..ROWS {
                let cell = Cell::from_code(rows[ROWS - 1 - row][col])?;
                if cell == Cell::Empty {
                    seen_empty = true;
                    continue;
                }
                if seen_empty {
                    return Err(RulesError::FloatingPiece {
                        column: col as u8,
                        row: row as u8,
                    });
                }
                board.cells[Self::pos(col, row)] = cell;
                board.column_heights[col] += 1;
            }
        }
        Ok(board)
    }

    /// Inverse of [`Board::from_rows`].
    pub fn to_rows(&self) -> [[u8; COLS]; ROWS] {
        let mut rows = [[0u8; COLS]; ROWS];
        for (display_row, out) in rows.iter_mut().enumerate() {
            let row = ROWS - 1 - display_row;
            for (col, slot) in out.iter_mut().enumerate() {
                *slot = self.cells[Self::pos(col, row)].code();
            }
        }
        rows
    }

    /// Convert column and row to board index
    #[inline]
    fn pos(col: usize, row: usize) -> usize {
        row * COLS + col
    }

    /// Cell at (column, row), row 0 being the bottom. `None` when off-board.
    pub fn cell(&self, col: usize, row: usize) -> Option<Cell> {
        if col < COLS && row < ROWS {
            Some(self.cells[Self::pos(col, row)])
        } else {
            None
        }
    }

    /// Number of discs in a column.
    pub fn column_height(&self, col: usize) -> Option<u8> {
        self.column_heights.get(col).copied()
    }

    /// Whether a disc can be dropped into `column`.
    #[inline]
    pub fn is_legal(&self, column: u8) -> bool {
        (column as usize) < COLS && self.column_heights[column as usize] < ROWS as u8
    }

    /// Get legal moves (columns that are not full), ascending.
    pub fn legal_moves(&self) -> Vec<u8> {
        (0..COLS as u8).filter(|&col| self.is_legal(col)).collect()
    }

    /// Bit-mask representation of legal moves.
    ///
    /// Bits 0-6 correspond to columns 0-6. A bit set to 1 indicates the
    /// column is not full and a piece can be dropped there.
    pub fn legal_moves_mask(&self) -> u8 {
        self.column_heights
            .iter()
            .enumerate()
            .fold(0u8, |mask, (col, &height)| {
                if height < ROWS as u8 {
                    mask | (1u8 << col)
                } else {
                    mask
                }
            })
    }

    /// Drop a disc for `player` into `column`, returning the row it landed on.
    pub fn apply_move(&mut self, column: u8, player: Player) -> Result<usize, RulesError> {
        let col = column as usize;
        if col >= COLS {
            return Err(RulesError::InvalidColumn { column });
        }
        let row = self.column_heights[col] as usize;
        if row >= ROWS {
            return Err(RulesError::ColumnFull { column });
        }

        self.cells[Self::pos(col, row)] = player.into();
        self.column_heights[col] += 1;
        Ok(row)
    }

    /// Copying variant of [`Board::apply_move`].
    pub fn with_move(&self, column: u8, player: Player) -> Result<Board, RulesError> {
        let mut next = self.clone();
        next.apply_move(column, player)?;
        Ok(next)
    }

    /// Count consecutive `cell` discs starting one step from (col, row) along (dc, dr).
    fn run_length(&self, col: usize, row: usize, dc: i32, dr: i32, cell: Cell) -> usize {
        let mut count = 0;
        let (mut c, mut r) = (col as i32 + dc, row as i32 + dr);
        while c >= 0 && c < COLS as i32 && r >= 0 && r < ROWS as i32 {
            if self.cells[Self::pos(c as usize, r as usize)] != cell {
                break;
            }
            count += 1;
            c += dc;
            r += dr;
        }
        count
    }

    /// Check if the disc at (col, row) is part of a line of four.
    pub fn wins_at(&self, col: usize, row: usize) -> bool {
        let Some(cell) = self.cell(col, row) else {
            return false;
        };
        if cell == Cell::Empty {
            return false;
        }

        DIRECTIONS.iter().any(|&(dc, dr)| {
            1 + self.run_length(col, row, dc, dr, cell) + self.run_length(col, row, -dc, -dr, cell)
                >= CONNECT
        })
    }

    /// Scan every line of four on the board and return the first owner found.
    ///
    /// Lines are scanned horizontally, vertically, then along both diagonals.
    pub fn winner(&self) -> Option<Player> {
        for &(dc, dr) in &DIRECTIONS {
            for row in 0..ROWS as i32 {
                for col in 0..COLS as i32 {
                    let end_c = col + dc * (CONNECT as i32 - 1);
                    let end_r = row + dr * (CONNECT as i32 - 1);
                    if !(0..COLS as i32).contains(&end_c) || !(0..ROWS as i32).contains(&end_r) {
                        continue;
                    }
                    let first = self.cells[Self::pos(col as usize, row as usize)];
                    let Some(player) = first.player() else {
                        continue;
                    };
                    let complete = (1..CONNECT as i32).all(|i| {
                        self.cells[Self::pos((col + dc * i) as usize, (row + dr * i) as usize)]
                            == first
                    });
                    if complete {
                        return Some(player);
                    }
                }
            }
        }
        None
    }

    /// Whether every column is full.
    pub fn is_full(&self) -> bool {
        self.column_heights.iter().all(|&h| h >= ROWS as u8)
    }

    /// No winner and no legal moves.
    pub fn is_draw(&self) -> bool {
        self.is_full() && self.winner().is_none()
    }

    /// Number of discs owned by `player`.
    pub fn piece_count(&self, player: Player) -> usize {
        let cell = Cell::from(player);
        self.cells.iter().filter(|&&c| c == cell).count()
    }

    /// Total number of discs on the board.
    pub fn moves_played(&self) -> usize {
        self.column_heights.iter().map(|&h| h as usize).sum()
    }

    /// Player to move inferred from disc parity (Red moves first).
    pub fn next_player(&self) -> Player {
        if self.piece_count(Player::Red) > self.piece_count(Player::Yellow) {
            Player::Yellow
        } else {
            Player::Red
        }
    }

    /// Canonical cache key for this position.
    pub fn key(&self) -> BoardKey {
        let packed = self
            .cells
            .iter()
            .enumerate()
            .fold(0u128, |acc, (i, cell)| {
                acc | (u128::from(cell.code()) << (2 * i))
            });
        BoardKey(packed)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in (0..ROWS).rev() {
            for col in 0..COLS {
                let symbol = match self.cells[Self::pos(col, row)] {
                    Cell::Empty => '.',
                    Cell::Red => 'X',
                    Cell::Yellow => 'O',
                };
                if col > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{symbol}")?;
            }
            writeln!(f)?;
        }
        write!(f, "0 1 2 3 4 5 6")
    }
}

#[cfg(test)]
mod tests;
