//! N×N board with a win-length-N rule
//!
//! Cells are stored row-major in a flat vector. Every scan in this module
//! (empty cells, winning lines) walks that same order, which is what gives
//! the search its top-left-first tie-break.

use std::fmt;
use std::ops::{Deref, DerefMut};

use crate::types::{Cell, Player, Position};

/// Score of a position the computer has won
pub const WIN_SCORE: i32 = 10;
/// Score of a position the human has won
pub const LOSS_SCORE: i32 = -10;
/// Score of a drawn or unresolved position
pub const DRAW_SCORE: i32 = 0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    size: usize,
    win_length: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// Creates an empty board. The win length always equals the side length.
    pub fn new(size: usize) -> Self {
        Board {
            size,
            win_length: size,
            cells: vec![Cell::Empty; size * size],
        }
    }

    /// Builds a board from one string per row using `X` (human), `O` (computer)
    /// and `.` (empty)
    pub fn from_rows(rows: &[&str]) -> Result<Self, String> {
        let size = rows.len();
        let mut board = Board::new(size);

        for (row, line) in rows.iter().enumerate() {
            let chars: Vec<char> = line.chars().collect();
            if chars.len() != size {
                return Err(format!(
                    "Row {} has {} cells, expected {}",
                    row,
                    chars.len(),
                    size
                ));
            }
            for (col, c) in chars.into_iter().enumerate() {
                let cell = match c {
                    'X' | 'x' => Cell::Human,
                    'O' | 'o' => Cell::Computer,
                    '.' | ' ' => Cell::Empty,
                    other => {
                        return Err(format!(
                            "Invalid character '{}' at ({}, {})",
                            other, row, col
                        ))
                    }
                };
                board.cells[row * size + col] = cell;
            }
        }

        Ok(board)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn win_length(&self) -> usize {
        self.win_length
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.row < self.size && pos.col < self.size
    }

    pub fn get(&self, pos: Position) -> Option<Cell> {
        if self.in_bounds(pos) {
            Some(self.cells[self.index(pos)])
        } else {
            None
        }
    }

    pub fn is_empty_at(&self, pos: Position) -> bool {
        self.get(pos) == Some(Cell::Empty)
    }

    /// Marks the cell for `player` if it is empty and on the board.
    /// Occupied or out-of-range cells leave the board untouched and return false.
    pub fn place(&mut self, row: usize, col: usize, player: Player) -> bool {
        let pos = Position::new(row, col);
        if !self.is_empty_at(pos) {
            return false;
        }
        let index = self.index(pos);
        self.cells[index] = player.to_cell();
        true
    }

    /// Temporarily places `player` at `pos`. The cell is reset to empty when the
    /// returned guard is dropped, on every exit path.
    pub fn speculate(&mut self, pos: Position, player: Player) -> SpeculativeMove<'_> {
        debug_assert!(self.is_empty_at(pos), "speculating on occupied cell {}", pos);
        let index = self.index(pos);
        self.cells[index] = player.to_cell();
        SpeculativeMove { board: self, index }
    }

    /// True iff some row, column or diagonal holds `win_length` consecutive marks
    pub fn is_winner(&self, player: Player) -> bool {
        let target = player.to_cell();
        let n = self.size;

        for row in 0..n {
            if self.has_run((0..n).map(|col| self.cells[row * n + col]), target) {
                return true;
            }
        }

        for col in 0..n {
            if self.has_run((0..n).map(|row| self.cells[row * n + col]), target) {
                return true;
            }
        }

        if self.has_run((0..n).map(|i| self.cells[i * n + i]), target) {
            return true;
        }

        self.has_run((0..n).map(|i| self.cells[i * n + (n - 1 - i)]), target)
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|&c| c != Cell::Empty)
    }

    /// +10 when the computer holds a winning line, -10 when the human does, else 0
    pub fn evaluate(&self) -> i32 {
        if self.is_winner(Player::Computer) {
            WIN_SCORE
        } else if self.is_winner(Player::Human) {
            LOSS_SCORE
        } else {
            DRAW_SCORE
        }
    }

    /// Empty cells in row-major order
    pub fn empty_positions(&self) -> Vec<Position> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| **c == Cell::Empty)
            .map(|(i, _)| Position::new(i / self.size, i % self.size))
            .collect()
    }

    pub fn count(&self, cell: Cell) -> usize {
        self.cells.iter().filter(|&&c| c == cell).count()
    }

    /// One string per row, for JSON responses and logs
    pub fn rows(&self) -> Vec<String> {
        self.cells
            .chunks(self.size)
            .map(|row| row.iter().map(|c| c.to_char()).collect())
            .collect()
    }

    fn index(&self, pos: Position) -> usize {
        pos.row * self.size + pos.col
    }

    fn has_run<I: Iterator<Item = Cell>>(&self, line: I, target: Cell) -> bool {
        let mut count = 0;
        for cell in line {
            if cell == target {
                count += 1;
                if count == self.win_length {
                    return true;
                }
            } else {
                count = 0;
            }
        }
        false
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "   ")?;
        for col in 0..self.size {
            write!(f, " {}", col)?;
        }
        writeln!(f)?;
        for (row, line) in self.rows().iter().enumerate() {
            write!(f, "{:>2} ", row)?;
            for c in line.chars() {
                write!(f, " {}", c)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Guard returned by [`Board::speculate`]; derefs to the board and undoes the
/// placement on drop
pub struct SpeculativeMove<'a> {
    board: &'a mut Board,
    index: usize,
}

impl Deref for SpeculativeMove<'_> {
    type Target = Board;

    fn deref(&self) -> &Board {
        self.board
    }
}

impl DerefMut for SpeculativeMove<'_> {
    fn deref_mut(&mut self) -> &mut Board {
        self.board
    }
}

impl Drop for SpeculativeMove<'_> {
    fn drop(&mut self) {
        self.board.cells[self.index] = Cell::Empty;
    }
}
