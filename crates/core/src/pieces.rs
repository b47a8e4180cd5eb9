//! Pieces module - tetromino shape matrices and rotation
//!
//! A shape is a small rectangular boolean matrix, rows top to bottom. Every
//! shape in play is either a kind's canonical matrix or one of its 90°
//! clockwise rotations; there is no public constructor for arbitrary matrices.

use arrayvec::ArrayVec;

use crate::types::{PieceKind, SPAWN_ROW};

/// Largest matrix side of any tetromino (the I bar)
pub const MAX_SHAPE_SIDE: usize = 4;

/// Number of minos in a tetromino
pub const MINOS: usize = 4;

/// Absolute board coordinates of the minos of a piece
pub type PieceCells = ArrayVec<(i8, i8), MINOS>;

/// Rectangular boolean matrix describing a tetromino orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    rows: u8,
    cols: u8,
    bits: [[bool; MAX_SHAPE_SIDE]; MAX_SHAPE_SIDE],
}

impl Shape {
    /// Canonical spawn matrix for a kind
    pub fn canonical(kind: PieceKind) -> Self {
        let rows: &[&[u8]] = match kind {
            PieceKind::I => &[&[1, 1, 1, 1]],
            PieceKind::O => &[&[1, 1], &[1, 1]],
            PieceKind::T => &[&[0, 1, 0], &[1, 1, 1]],
            PieceKind::S => &[&[0, 1, 1], &[1, 1, 0]],
            PieceKind::Z => &[&[1, 1, 0], &[0, 1, 1]],
            PieceKind::J => &[&[1, 0, 0], &[1, 1, 1]],
            PieceKind::L => &[&[0, 0, 1], &[1, 1, 1]],
        };
        Self::from_rows(rows)
    }

    fn from_rows(rows: &[&[u8]]) -> Self {
        let mut bits = [[false; MAX_SHAPE_SIDE]; MAX_SHAPE_SIDE];
        for (r, row) in rows.iter().enumerate() {
            for (c, &v) in row.iter().enumerate() {
                bits[r][c] = v != 0;
            }
        }
        Self {
            rows: rows.len() as u8,
            cols: rows.first().map(|r| r.len()).unwrap_or(0) as u8,
            bits,
        }
    }

    /// Matrix height
    pub fn rows(&self) -> u8 {
        self.rows
    }

    /// Matrix width
    pub fn cols(&self) -> u8 {
        self.cols
    }

    pub fn is_filled(&self, row: usize, col: usize) -> bool {
        row < self.rows as usize && col < self.cols as usize && self.bits[row][col]
    }

    /// 90° clockwise rotation: `new[c][rows - 1 - r] = old[r][c]`
    pub fn rotate_cw(&self) -> Self {
        let rows = self.rows as usize;
        let cols = self.cols as usize;
        let mut bits = [[false; MAX_SHAPE_SIDE]; MAX_SHAPE_SIDE];
        for r in 0..rows {
            for c in 0..cols {
                bits[c][rows - 1 - r] = self.bits[r][c];
            }
        }
        Self {
            rows: self.cols,
            cols: self.rows,
            bits,
        }
    }

    /// Offsets `(col, row)` of the filled cells, row-major
    pub fn offsets(&self) -> PieceCells {
        let mut out = PieceCells::new();
        for r in 0..self.rows as usize {
            for c in 0..self.cols as usize {
                if self.bits[r][c] {
                    // Canonical tetromino matrices hold exactly four cells.
                    let _ = out.try_push((c as i8, r as i8));
                }
            }
        }
        out
    }

    /// Matrix rows as `0`/`1` values, for display and tests
    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        (0..self.rows as usize)
            .map(|r| {
                (0..self.cols as usize)
                    .map(|c| self.bits[r][c] as u8)
                    .collect()
            })
            .collect()
    }
}

/// Active falling piece
///
/// `x`/`y` anchor the top-left corner of the shape matrix in board
/// coordinates. `y` may be negative while the piece is entering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub shape: Shape,
    pub x: i8,
    pub y: i8,
}

impl Piece {
    /// Piece in canonical orientation at an explicit anchor
    pub fn at(kind: PieceKind, x: i8, y: i8) -> Self {
        Self {
            kind,
            shape: Shape::canonical(kind),
            x,
            y,
        }
    }

    /// Piece at its spawn anchor: horizontally centered, on the spawn row.
    ///
    /// `x = floor(width / 2) - floor(shape_width / 2)`
    pub fn spawn(kind: PieceKind, board_width: u8) -> Self {
        let shape = Shape::canonical(kind);
        let x = (board_width / 2) as i8 - (shape.cols() / 2) as i8;
        Self {
            kind,
            shape,
            x,
            y: SPAWN_ROW,
        }
    }

    /// Absolute coordinates of the occupied cells
    pub fn cells(&self) -> PieceCells {
        self.shape
            .offsets()
            .into_iter()
            .map(|(dx, dy)| (self.x.saturating_add(dx), self.y.saturating_add(dy)))
            .collect()
    }

    /// Same piece moved by `(dx, dy)`
    pub fn shifted(&self, dx: i8, dy: i8) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
            ..*self
        }
    }

    /// Same piece rotated clockwise around its anchor
    pub fn rotated(&self) -> Self {
        Self {
            shape: self.shape.rotate_cw(),
            ..*self
        }
    }

    pub fn width(&self) -> u8 {
        self.shape.cols()
    }

    pub fn height(&self) -> u8 {
        self.shape.rows()
    }

    /// Number of cells above the top row of the board
    pub fn cells_above_top(&self) -> usize {
        self.cells().iter().filter(|&&(_, y)| y < 0).count()
    }
}
