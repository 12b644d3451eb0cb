use std::collections::BTreeSet;

use crate::error::EngineError;

use super::chip::{Chip, GameStatus};

/// Smallest playable grid: the classic board is 7 columns by 6 rows.
pub const MIN_COLS: usize = 7;
pub const MIN_ROWS: usize = 6;

/// All cells contributing to a win for one chip.
///
/// A single move can complete more than one four-in-a-row; the set merges the
/// cells of every matching line. Coordinates are `(row, col)` with row 0 at
/// the top.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WinResult {
    pub cells: BTreeSet<(usize, usize)>,
}

impl WinResult {
    /// True iff at least one winning line exists.
    pub fn won(&self) -> bool {
        !self.cells.is_empty()
    }
}

/// The grid itself: cells, gravity, and win detection. Turn order and scoring
/// live in [`BoardEngine`](super::BoardEngine).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    columns: usize,
    rows: usize,
    // Flat storage, index = row * columns + col. Row 0 is the top.
    cells: Vec<Chip>,
}

// The four line orientations as (d_row, d_col) steps: horizontal, vertical,
// diagonal down-right, diagonal down-left.
const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

impl Board {
    /// Create an empty board. The grid may be larger than the classic 7x6 but
    /// never smaller.
    pub fn new(columns: usize, rows: usize) -> Result<Self, EngineError> {
        if columns < MIN_COLS || rows < MIN_ROWS {
            return Err(EngineError::InvalidDimension { columns, rows });
        }
        Ok(Board {
            columns,
            rows,
            cells: vec![Chip::Empty; columns * rows],
        })
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// The cell at `(row, col)`; row 0 is the top, `rows - 1` the bottom.
    pub fn get(&self, row: usize, col: usize) -> Chip {
        self.cells[row * self.columns + col]
    }

    /// True iff the column's top cell is empty, i.e. it accepts another chip.
    pub fn is_column_available(&self, col: usize) -> Result<bool, EngineError> {
        if col >= self.columns {
            return Err(EngineError::OutOfRange {
                column: col,
                columns: self.columns,
            });
        }
        Ok(self.get(0, col) == Chip::Empty)
    }

    /// Column indices that accept another chip, in ascending order.
    pub fn available_columns(&self) -> Vec<usize> {
        (0..self.columns)
            .filter(|&col| self.get(0, col) == Chip::Empty)
            .collect()
    }

    /// True iff every column's top cell is occupied.
    pub fn is_filled(&self) -> bool {
        (0..self.columns).all(|col| self.get(0, col) != Chip::Empty)
    }

    /// Drop a chip into a column and return the row it landed in.
    ///
    /// Gravity: the chip rests in the lowest empty row of the column.
    pub fn drop_chip(&mut self, col: usize, chip: Chip) -> Result<usize, EngineError> {
        if !self.is_column_available(col)? {
            return Err(EngineError::ColumnFull { column: col });
        }
        if chip == Chip::Empty {
            return Err(EngineError::InvalidChip);
        }

        for row in (0..self.rows).rev() {
            if self.get(row, col) == Chip::Empty {
                self.cells[row * self.columns + col] = chip;
                return Ok(row);
            }
        }

        unreachable!("column {col} reported available but has no empty cell");
    }

    /// Reset every cell to empty.
    pub fn clear(&mut self) {
        self.cells.fill(Chip::Empty);
    }

    /// Every cell belonging to a four-in-a-row of `chip`.
    ///
    /// Scans all four orientations from every valid start cell, testing 4
    /// consecutive cells per window; runs of 5+ are covered by overlapping
    /// windows. `Empty` never wins.
    pub fn win_locations(&self, chip: Chip) -> WinResult {
        let mut result = WinResult::default();
        if chip == Chip::Empty {
            return result;
        }

        for row in 0..self.rows {
            for col in 0..self.columns {
                for (d_row, d_col) in DIRECTIONS {
                    let end_row = row as isize + 3 * d_row;
                    let end_col = col as isize + 3 * d_col;
                    if end_row < 0
                        || end_row >= self.rows as isize
                        || end_col < 0
                        || end_col >= self.columns as isize
                    {
                        continue;
                    }

                    let line = (0..4).map(|i| {
                        (
                            (row as isize + i * d_row) as usize,
                            (col as isize + i * d_col) as usize,
                        )
                    });
                    if line.clone().all(|(r, c)| self.get(r, c) == chip) {
                        result.cells.extend(line);
                    }
                }
            }
        }

        result
    }

    /// Derive the game status from the cells alone. Red is evaluated before
    /// Yellow, then a filled board is a tie, otherwise the game is ongoing.
    pub fn status(&self) -> GameStatus {
        if self.win_locations(Chip::Red).won() {
            GameStatus::RedWon
        } else if self.win_locations(Chip::Yellow).won() {
            GameStatus::YellowWon
        } else if self.is_filled() {
            GameStatus::Tied
        } else {
            GameStatus::Ongoing
        }
    }
}
