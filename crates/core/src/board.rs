//! Board module - manages the game grid
//!
//! The board is a `width x height` grid (canonically 10x20) where each cell is
//! either empty or filled. Cells are stored in a flat vector, row-major
//! (`y * width + x`), so the length is always exactly `width * height`.
//! Coordinates: (x, y) where x grows to the right and y grows downward.
//! Rows with negative y lie above the visible field; pieces may occupy them
//! while entering but the board never stores them.

use crate::pieces::Piece;
use crate::types::{Cell, BOARD_HEIGHT, BOARD_WIDTH};

/// The game board using flat vector storage
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    width: u8,
    height: u8,
    /// Flat vector of cells, row-major order (y * width + x)
    cells: Vec<Cell>,
}

impl Board {
    /// Create a new empty board with the canonical 10x20 size
    pub fn new() -> Self {
        Self::with_size(BOARD_WIDTH, BOARD_HEIGHT)
    }

    /// Create an empty board of the given size.
    ///
    /// Dimensions are clamped to `1..=127` so every cell is addressable with
    /// `i8` coordinates.
    pub fn with_size(width: u8, height: u8) -> Self {
        let width = width.clamp(1, i8::MAX as u8);
        let height = height.clamp(1, i8::MAX as u8);
        Self {
            width,
            height,
            cells: vec![Cell::Empty; width as usize * height as usize],
        }
    }

    /// Build a board from text rows, top to bottom.
    ///
    /// `#`, `X` and `x` are filled cells, anything else is empty. The width is
    /// taken from the longest row; shorter rows are padded with empty cells.
    ///
    /// ```
    /// use tetris_ladder_core::Board;
    ///
    /// let board = Board::from_ascii(&["..#", "###"]);
    /// assert_eq!(board.width(), 3);
    /// assert!(board.is_row_full(1));
    /// ```
    pub fn from_ascii(rows: &[&str]) -> Self {
        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);
        let mut board = Self::with_size(width as u8, rows.len() as u8);
        for (y, row) in rows.iter().enumerate().take(board.height as usize) {
            for (x, ch) in row.chars().enumerate().take(board.width as usize) {
                if matches!(ch, '#' | 'X' | 'x') {
                    board.set(x as i8, y as i8, Cell::Filled);
                }
            }
        }
        board
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(&self, x: i16, y: i16) -> Option<usize> {
        if x < 0 || x >= self.width as i16 || y < 0 || y >= self.height as i16 {
            return None;
        }
        Some((y as usize) * (self.width as usize) + (x as usize))
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    /// Get cell at position (x, y).
    /// Returns None if out of bounds.
    pub fn get(&self, x: i8, y: i8) -> Option<Cell> {
        self.index(x as i16, y as i16).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y).
    /// Returns false if out of bounds.
    pub fn set(&mut self, x: i8, y: i8, cell: Cell) -> bool {
        match self.index(x as i16, y as i16) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Check if position is within bounds and filled
    pub fn is_filled(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(Cell::Filled))
    }

    /// Check whether `piece`, shifted by `(dx, dy)`, fits on the board.
    ///
    /// A cell fails when its column is outside `[0, width)`, its row is at or
    /// below `height`, or its row is on the board and already filled. Rows
    /// above the top are always unobstructed.
    pub fn is_valid_position(&self, piece: &Piece, dx: i8, dy: i8) -> bool {
        piece.cells().iter().all(|&(px, py)| {
            let x = px as i16 + dx as i16;
            let y = py as i16 + dy as i16;
            if x < 0 || x >= self.width as i16 || y >= self.height as i16 {
                return false;
            }
            if y < 0 {
                return true;
            }
            match self.index(x, y) {
                Some(idx) => !self.cells[idx].is_filled(),
                None => false,
            }
        })
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        self.row(y)
            .map(|row| row.iter().all(|cell| cell.is_filled()))
            .unwrap_or(false)
    }

    /// Check if a row has no filled cell
    pub fn is_row_empty(&self, y: usize) -> bool {
        self.row(y)
            .map(|row| row.iter().all(|cell| !cell.is_filled()))
            .unwrap_or(false)
    }

    /// Borrow one row of cells
    pub fn row(&self, y: usize) -> Option<&[Cell]> {
        if y >= self.height as usize {
            return None;
        }
        let width = self.width as usize;
        let start = y * width;
        Some(&self.cells[start..start + width])
    }

    /// Mark every cell of `piece` as filled, in place.
    ///
    /// Cells above the top row are skipped. Returns how many were skipped so
    /// the caller can treat a partially hidden lock as a top-out.
    pub fn lock(&mut self, piece: &Piece) -> usize {
        let mut clipped = 0;
        for (x, y) in piece.cells() {
            if y < 0 {
                clipped += 1;
                continue;
            }
            self.set(x, y, Cell::Filled);
        }
        clipped
    }

    /// Return a new board with `piece` placed at its current position.
    ///
    /// Cells above the top row are silently dropped.
    pub fn place(&self, piece: &Piece) -> Board {
        let mut next = self.clone();
        next.lock(piece);
        next
    }

    /// Remove all full rows, compacting the remaining rows downward.
    ///
    /// Scans bottom to top with a read and a write cursor, so non-contiguous
    /// full rows are handled in one pass and the relative order of kept rows
    /// is preserved. Returns the number of rows removed.
    pub fn clear_full_rows(&mut self) -> usize {
        let width = self.width as usize;
        let height = self.height as usize;
        let mut write_y = height;
        let mut cleared = 0;

        for read_y in (0..height).rev() {
            if self.is_row_full(read_y) {
                cleared += 1;
            } else {
                write_y -= 1;
                if write_y != read_y {
                    let src_start = read_y * width;
                    let dst_start = write_y * width;
                    self.cells
                        .copy_within(src_start..src_start + width, dst_start);
                }
            }
        }

        // Fresh empty rows at the top
        self.cells[..write_y * width].fill(Cell::Empty);

        cleared
    }

    /// Return the compacted board and the number of rows removed.
    pub fn clear_lines(&self) -> (Board, usize) {
        let mut next = self.clone();
        let cleared = next.clear_full_rows();
        (next, cleared)
    }

    /// Get a reference to the internal cells
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Number of filled cells
    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_filled()).count()
    }

    /// Clear the entire board
    pub fn clear(&mut self) {
        self.cells.fill(Cell::Empty);
    }

    /// Render as text rows (`#` filled, `.` empty), top to bottom
    pub fn to_ascii(&self) -> Vec<String> {
        (0..self.height as usize)
            .filter_map(|y| self.row(y))
            .map(|row| {
                row.iter()
                    .map(|c| if c.is_filled() { '#' } else { '.' })
                    .collect()
            })
            .collect()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PieceKind;

    #[test]
    fn test_board_index_calculation() {
        let board = Board::new();
        assert_eq!(board.index(0, 0), Some(0));
        assert_eq!(board.index(9, 0), Some(9));
        assert_eq!(board.index(0, 1), Some(10));
        assert_eq!(board.index(9, 19), Some(199));
        assert_eq!(board.index(-1, 0), None);
        assert_eq!(board.index(10, 0), None);
        assert_eq!(board.index(0, 20), None);
    }

    #[test]
    fn test_board_length_invariant() {
        assert_eq!(Board::new().cells().len(), 200);
        assert_eq!(Board::with_size(4, 6).cells().len(), 24);
        assert_eq!(Board::with_size(0, 0).cells().len(), 1);
    }

    #[test]
    fn test_place_is_pure() {
        let board = Board::new();
        let piece = Piece::at(PieceKind::O, 0, 18);
        let placed = board.place(&piece);

        assert_eq!(board.filled_count(), 0);
        assert_eq!(placed.filled_count(), 4);
        assert!(placed.is_filled(0, 18));
        assert!(placed.is_filled(1, 19));
    }

    #[test]
    fn test_lock_reports_clipped_cells() {
        let mut board = Board::new();
        // T: [[0,1,0],[1,1,1]] with its top row at y = -1
        let piece = Piece::at(PieceKind::T, 3, -1);
        assert_eq!(board.lock(&piece), 1);
        assert_eq!(board.filled_count(), 3);
    }

    #[test]
    fn test_clear_full_rows_in_place() {
        let mut board = Board::from_ascii(&[".#..", "####", "#...", "####"]);
        assert_eq!(board.clear_full_rows(), 2);
        assert_eq!(board.to_ascii(), vec!["....", "....", ".#..", "#..."]);
    }

    #[test]
    fn test_from_ascii_pads_short_rows() {
        let board = Board::from_ascii(&["#", "###"]);
        assert_eq!(board.width(), 3);
        assert_eq!(board.height(), 2);
        assert_eq!(board.to_ascii(), vec!["#..", "###"]);
    }
}
